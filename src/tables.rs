use average::Mean;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{DemandMetrics, ForecastMode, MetricsSummary, PriceMetrics, TimeSeriesDataPoint},
    fmt::{FormattedOption, FormattedTimestamp},
    quantity::{energy::KilowattHours, price::MegawattHourPrice},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn format_value(mode: ForecastMode, value: Option<f64>) -> String {
    match mode {
        ForecastMode::Demand => FormattedOption(value.map(KilowattHours)).to_string(),
        ForecastMode::Price => FormattedOption(value.map(MegawattHourPrice)).to_string(),
    }
}

pub fn build_metrics_table(summary: &MetricsSummary) -> Table {
    match summary {
        MetricsSummary::Demand(metrics) => build_demand_metrics_table(metrics),
        MetricsSummary::Price(metrics) => build_price_metrics_table(metrics),
    }
}

fn build_demand_metrics_table(metrics: &DemandMetrics) -> Table {
    let mut table = new_table();
    table
        .set_header(vec![
            Cell::from("Peak\ndemand"),
            Cell::from("Expected\non"),
            Cell::from("Total forecasted\nusage"),
            Cell::from("Accuracy\nscore"),
        ])
        .add_row(vec![
            Cell::from(metrics.peak_demand.value).fg(Color::Red),
            Cell::from(FormattedTimestamp(&metrics.peak_demand.timestamp))
                .add_attribute(Attribute::Dim),
            Cell::from(metrics.total_usage),
            Cell::from(metrics.accuracy_score).add_attribute(Attribute::Dim),
        ]);
    table
}

fn build_price_metrics_table(metrics: &PriceMetrics) -> Table {
    let mut table = new_table();
    let (lowest_price, lowest_timestamp) = metrics.lowest_price.as_ref().map_or_else(
        || (FormattedOption::<MegawattHourPrice>(None).to_string(), FormattedTimestamp("").to_string()),
        |lowest| {
            (
                FormattedOption(Some(lowest.value)).to_string(),
                FormattedTimestamp(&lowest.timestamp).to_string(),
            )
        },
    );
    table
        .set_header(vec![
            Cell::from("Peak\nprice"),
            Cell::from("Expected\non"),
            Cell::from("Average\nprice"),
            Cell::from("Lowest\nprice"),
            Cell::from("Expected\non"),
            Cell::from("Accuracy\nscore"),
        ])
        .add_row(vec![
            Cell::from(metrics.peak_price.value).fg(Color::Red),
            Cell::from(FormattedTimestamp(&metrics.peak_price.timestamp))
                .add_attribute(Attribute::Dim),
            Cell::from(metrics.average_price),
            Cell::from(lowest_price).fg(Color::Green),
            Cell::from(lowest_timestamp).add_attribute(Attribute::Dim),
            Cell::from(metrics.accuracy_score).add_attribute(Attribute::Dim),
        ]);
    table
}

pub fn build_series_table(
    series: &[TimeSeriesDataPoint],
    mode: ForecastMode,
    confidence_interval: u8,
) -> Table {
    let mean_forecast = {
        let estimate: Mean = series.iter().filter_map(|point| point.values(mode).forecast).collect();
        if estimate.is_empty() { None } else { Some(estimate.mean()) }
    };
    let has_actual = series.iter().any(|point| point.values(mode).actual.is_some());

    let mut table = new_table();
    let mut header = vec![
        Cell::from("Date"),
        Cell::from("Time"),
        Cell::from("Forecast"),
        Cell::from(format!("Lower\n{confidence_interval}% CI")),
        Cell::from(format!("Upper\n{confidence_interval}% CI")),
    ];
    if has_actual {
        header.push(Cell::from("Actual"));
    }
    table.set_header(header);

    for point in series {
        let values = point.values(mode);
        let (date, time) = FormattedTimestamp(&point.timestamp).parse().map_or_else(
            || (point.timestamp.clone(), String::new()),
            |timestamp| (timestamp.format("%b %d").to_string(), timestamp.format("%H:%M").to_string()),
        );
        let forecast_color = match (values.forecast, mean_forecast) {
            (Some(forecast), Some(mean)) if forecast >= mean => Color::Red,
            (Some(_), Some(_)) => Color::Green,
            _ => Color::Reset,
        };
        let mut row = vec![
            Cell::new(date).add_attribute(Attribute::Dim),
            Cell::new(time),
            Cell::new(format_value(mode, values.forecast))
                .set_alignment(CellAlignment::Right)
                .fg(forecast_color),
            Cell::new(format_value(mode, values.lower))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(format_value(mode, values.upper))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ];
        if has_actual {
            row.push(Cell::new(format_value(mode, values.actual)).set_alignment(CellAlignment::Right));
        }
        table.add_row(row);
    }
    table
}
