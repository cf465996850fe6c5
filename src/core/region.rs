use derive_more::Display;
use serde::Serialize;

/// Grid region the forecast is presented for.
///
/// The forecasting service is not region-aware, so this only labels the output.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Display, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[default]
    #[display("National Grid")]
    NationalGrid,

    #[display("East Zone")]
    EastZone,

    #[display("West Zone")]
    WestZone,

    #[display("North Zone")]
    NorthZone,

    #[display("South Zone")]
    SouthZone,
}
