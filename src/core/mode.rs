use derive_more::Display;
use serde::Serialize;

/// Which of the forecast values the dashboard is looking at.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMode {
    /// Electricity demand.
    #[default]
    #[display("demand")]
    Demand,

    /// Wholesale electricity price.
    #[display("price")]
    Price,
}

impl ForecastMode {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Demand => "Demand",
            Self::Price => "Price",
        }
    }
}
