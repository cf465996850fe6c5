use bon::Builder;
use serde::Serialize;

use crate::{
    core::ForecastMode,
    quantity::{energy::KilowattHours, price::MegawattHourPrice},
};

/// Normalized forecast point.
///
/// Absent values mean «no value for that point» and are never coerced to zero here.
#[must_use]
#[derive(Clone, Debug, PartialEq, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesDataPoint {
    #[builder(into)]
    pub timestamp: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_price: Option<f64>,
}

impl TimeSeriesDataPoint {
    /// Forecasted demand, with absent values counted as zero.
    pub fn demand_or_zero(&self) -> KilowattHours {
        KilowattHours(self.forecast.unwrap_or_default())
    }

    /// Forecasted price, with absent values counted as zero.
    pub fn price_or_zero(&self) -> MegawattHourPrice {
        MegawattHourPrice(self.forecast_price.unwrap_or_default())
    }

    /// Pick the `(actual, forecast, lower, upper)` values meaningful for the mode.
    #[must_use]
    pub const fn values(&self, mode: ForecastMode) -> ModeValues {
        match mode {
            ForecastMode::Demand => ModeValues {
                actual: self.actual,
                forecast: self.forecast,
                lower: self.lower,
                upper: self.upper,
            },
            ForecastMode::Price => ModeValues {
                actual: self.actual_price,
                forecast: self.forecast_price,
                lower: self.lower_price,
                upper: self.upper_price,
            },
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModeValues {
    pub actual: Option<f64>,
    pub forecast: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}
