use std::time::Duration;

use chrono::NaiveDate;
use clap::crate_name;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{core::TimeSeriesDataPoint, ops::DateRange, prelude::*};

/// Address of the local prediction service.
pub const DEFAULT_URL: &str = "http://localhost:5000/predict";

/// Shown when the service fails without explaining why.
const FALLBACK_MESSAGE: &str = "failed to fetch forecast data";

#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("failed to call the forecasting service")]
    Transport(#[from] reqwest::Error),

    #[error("forecasting service responded with {status}: {}", message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    Status { status: StatusCode, message: Option<String> },
}

pub struct Api {
    client: reqwest::Client,
    url: Url,
}

impl Api {
    #[instrument(skip_all, fields(url = %url))]
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(crate_name!()).timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// Request the forecast for the date range.
    ///
    /// A successful response of any shape other than an array of forecast records results
    /// in an empty series.
    #[instrument(skip_all, fields(start = %range.min, end = %range.max))]
    pub async fn get_forecast(
        &self,
        range: DateRange,
    ) -> Result<Vec<TimeSeriesDataPoint>, ForecastError> {
        info!("requesting…");
        let response = self.client.post(self.url.clone()).json(&Request::from(range)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.json::<ErrorResponse>().await.ok().and_then(|body| body.error);
            error!(%status, ?message, "the forecasting service has failed");
            return Err(ForecastError::Status { status, message });
        }

        let body = response.bytes().await?;
        let series = normalize(&body);
        info!(len = series.len(), "fetched");
        Ok(series)
    }
}

/// Parse the response body and rename the producer's fields.
fn normalize(body: &[u8]) -> Vec<TimeSeriesDataPoint> {
    let value = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(error) => {
            warn!("the response is not valid JSON: {error:#}");
            return Vec::new();
        }
    };
    let Some(records) = value.as_array() else {
        warn!(%value, "the response is not an array");
        return Vec::new();
    };
    records.iter().map(normalize_record).collect()
}

/// Map a single forecast record, leaving mistyped fields absent.
fn normalize_record(record: &Value) -> TimeSeriesDataPoint {
    let timestamp = record.get("ds").and_then(Value::as_str).unwrap_or_else(|| {
        warn!(%record, "the forecast record has no timestamp");
        ""
    });
    TimeSeriesDataPoint::builder()
        .timestamp(timestamp)
        .maybe_forecast(record.get("demand_forecast").and_then(Value::as_f64))
        .maybe_forecast_price(record.get("price_forecast").and_then(Value::as_f64))
        .build()
}

#[derive(Serialize)]
struct Request {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl From<DateRange> for Request {
    fn from(range: DateRange) -> Self {
        Self { start_date: range.min, end_date: range.max }
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}
