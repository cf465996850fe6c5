mod forecast;

use clap::{Parser, Subcommand};

use crate::cli::forecast::ForecastArgs;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Request the forecast for the date range and render the summary.
    #[clap(name = "forecast")]
    Forecast(Box<ForecastArgs>),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_args() {
        Args::command().debug_assert();
    }
}
