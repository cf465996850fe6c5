use chrono::{Local, NaiveDate};
use clap::Parser;
use itertools::Itertools;
use reqwest::Url;
use serde::Serialize;

use crate::{
    api::predict,
    core::{Dashboard, ForecastMode, MetricsSummary, Region, TimeSeriesDataPoint},
    ops::DateRange,
    prelude::*,
    tables::{build_metrics_table, build_series_table},
};

#[derive(Parser)]
pub struct PredictApiArgs {
    /// Prediction endpoint.
    #[clap(long = "api-url", env = "FORECAST_API_URL", default_value = predict::DEFAULT_URL)]
    pub url: Url,

    #[clap(long = "request-timeout", env = "FORECAST_REQUEST_TIMEOUT", default_value = "30s")]
    pub timeout: humantime::Duration,
}

impl PredictApiArgs {
    pub fn new_client(&self) -> Result<predict::Api> {
        predict::Api::new(self.url.clone(), self.timeout.into())
    }
}

#[derive(Parser)]
pub struct ForecastArgs {
    #[clap(flatten)]
    api: PredictApiArgs,

    /// First forecasted date, today by default.
    #[clap(long, env = "START_DATE")]
    start_date: Option<NaiveDate>,

    /// Last forecasted date, a week after the start date by default.
    #[clap(long, env = "END_DATE")]
    end_date: Option<NaiveDate>,

    /// Forecast modes to render, in order.
    #[clap(long = "mode", env = "FORECAST_MODE", value_delimiter = ',', default_value = "demand")]
    modes: Vec<ForecastMode>,

    #[clap(long, env = "REGION", default_value = "national-grid")]
    region: Region,

    /// Confidence interval of the forecast band, in percent.
    #[clap(
        long,
        env = "CONFIDENCE_INTERVAL",
        default_value = "90",
        value_parser = clap::value_parser!(u8).range(80..=99),
    )]
    confidence_interval: u8,

    /// Print the series and the summaries as JSON instead of tables.
    #[clap(long)]
    json: bool,
}

impl ForecastArgs {
    const DEFAULT_N_DAYS: u64 = 7;

    fn date_range(&self) -> Result<DateRange> {
        let start = self.start_date.unwrap_or_else(|| Local::now().date_naive());
        match self.end_date {
            Some(end) => DateRange::try_new(start, end),
            None => DateRange::starting_on(start, Self::DEFAULT_N_DAYS),
        }
    }

    fn modes(&self) -> Vec<ForecastMode> {
        self.modes.iter().copied().unique().collect_vec()
    }

    #[instrument(skip_all, fields(region = %self.region))]
    pub async fn run(self) -> Result {
        let range = self.date_range()?;
        let modes = self.modes();
        let api = self.api.new_client()?;
        let (dashboard, summaries) = generate(&api, range, &modes).await;

        if self.json {
            let report = Report {
                region: self.region,
                start_date: range.min,
                end_date: range.max,
                series: dashboard.series(),
                summaries: &summaries,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for summary in &summaries {
                let mode = summary.mode();
                println!(
                    "{} forecast for {} ({} – {})",
                    mode.title(),
                    self.region,
                    range.min,
                    range.max,
                );
                println!("{}", build_metrics_table(summary));
                println!(
                    "{}",
                    build_series_table(dashboard.series(), mode, self.confidence_interval)
                );
            }
        }

        Ok(())
    }
}

/// Fetch the series and summarize it in every mode.
///
/// A failed request is logged and results in an empty series.
async fn generate(
    api: &predict::Api,
    range: DateRange,
    modes: &[ForecastMode],
) -> (Dashboard, Vec<MetricsSummary>) {
    let mut dashboard = Dashboard::new(modes.first().copied().unwrap_or_default());

    let ticket = dashboard.begin_request();
    info!(n_days = range.n_days(), is_loading = dashboard.is_loading(), "generating…");
    let series = match api.get_forecast(range).await {
        Ok(series) => series,
        Err(error) => {
            error!("failed to generate the forecast: {:#}", Error::from(error));
            Vec::new()
        }
    };
    dashboard.complete(ticket, series);
    if dashboard.series().is_empty() {
        warn!(?range, "no forecast data available");
    }

    let mut summaries = Vec::with_capacity(modes.len());
    for &mode in modes {
        dashboard.set_mode(mode);
        if let Some(summary) = dashboard.metrics() {
            info!(%mode, len = dashboard.series().len(), "generated the electricity forecast");
            summaries.push(summary.clone());
        }
    }
    (dashboard, summaries)
}

#[derive(Serialize)]
struct Report<'a> {
    region: Region,
    start_date: NaiveDate,
    end_date: NaiveDate,
    series: &'a [TimeSeriesDataPoint],
    summaries: &'a [MetricsSummary],
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockito::{Mock, Server, ServerGuard};
    use serde_json::json;

    use super::*;

    async fn failing_server() -> (ServerGuard, Mock) {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(json!({"error": "bad dates"}).to_string())
            .create_async()
            .await;
        (server, mock)
    }

    fn parse(args: &[&str]) -> Result<ForecastArgs> {
        Ok(ForecastArgs::try_parse_from(["forecast"].iter().chain(args))?)
    }

    #[test]
    fn date_range_ok() -> Result {
        let args = parse(&["--start-date", "2025-03-01", "--end-date", "2025-03-03"])?;
        let range = args.date_range()?;
        assert_eq!(range.min, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(range.max, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        Ok(())
    }

    #[test]
    fn default_end_date_is_week_later() -> Result {
        let range = parse(&["--start-date", "2025-03-01"])?.date_range()?;
        assert_eq!(range.max, NaiveDate::from_ymd_opt(2025, 3, 8).unwrap());
        Ok(())
    }

    #[test]
    fn reversed_date_range_fails() -> Result {
        let args = parse(&["--start-date", "2025-03-08", "--end-date", "2025-03-01"])?;
        assert!(args.date_range().is_err());
        Ok(())
    }

    #[test]
    fn modes_are_deduplicated() -> Result {
        let args = parse(&["--mode", "price,demand,price"])?;
        assert_eq!(args.modes(), [ForecastMode::Price, ForecastMode::Demand]);
        Ok(())
    }

    #[test]
    fn confidence_interval_out_of_range_fails() {
        assert!(parse(&["--confidence-interval", "50"]).is_err());
    }

    #[test]
    fn region_ok() -> Result {
        assert_eq!(parse(&["--region", "east-zone"])?.region, Region::EastZone);
        Ok(())
    }

    #[tokio::test]
    async fn failed_request_gives_empty_summaries() -> Result {
        let (server, _mock) = failing_server().await;
        let api = predict::Api::new(
            format!("{}/predict", server.url()).parse()?,
            Duration::from_secs(5),
        )?;
        let range = DateRange::starting_on(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 7)?;
        let modes = [ForecastMode::Demand, ForecastMode::Price];

        let (dashboard, summaries) = generate(&api, range, &modes).await;

        assert!(dashboard.series().is_empty());
        assert!(!dashboard.is_loading());
        assert_eq!(summaries.len(), 2);
        for (summary, mode) in summaries.iter().zip(modes) {
            assert_eq!(summary.mode(), mode);
            assert_eq!(*summary, MetricsSummary::aggregate(&[], mode, &mut rand::thread_rng()));
        }
        Ok(())
    }

    #[tokio::test]
    async fn failed_request_still_renders() -> Result {
        let (server, _mock) = failing_server().await;
        let url = format!("{}/predict", server.url());
        parse(&["--api-url", &url, "--start-date", "2025-03-01", "--mode", "demand,price"])?
            .run()
            .await?;
        parse(&["--api-url", &url, "--start-date", "2025-03-01", "--json"])?.run().await?;
        Ok(())
    }
}
