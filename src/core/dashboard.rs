use rand::{Rng, rngs::ThreadRng};

use crate::{
    core::{ForecastMode, MetricsSummary, TimeSeriesDataPoint},
    prelude::*,
};

/// Identifies a forecast request issued by the dashboard.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Presentation state: the current series, the active mode and the derived metrics.
///
/// Every request is tagged with a [`Ticket`], and only the most recent one may replace the
/// series, so a slow response can never overwrite a newer one.
pub struct Dashboard<R = ThreadRng> {
    rng: R,
    mode: ForecastMode,
    generation: u64,
    is_loading: bool,
    series: Vec<TimeSeriesDataPoint>,
    metrics: Option<MetricsSummary>,
}

impl Dashboard<ThreadRng> {
    pub fn new(mode: ForecastMode) -> Self {
        Self::with_rng(mode, rand::thread_rng())
    }
}

impl<R: Rng> Dashboard<R> {
    pub const fn with_rng(mode: ForecastMode, rng: R) -> Self {
        Self { rng, mode, generation: 0, is_loading: false, series: Vec::new(), metrics: None }
    }

    pub const fn begin_request(&mut self) -> Ticket {
        self.generation += 1;
        self.is_loading = true;
        Ticket(self.generation)
    }

    /// Apply the response to the request identified by the ticket.
    ///
    /// Returns `false` and leaves the state untouched if a newer request has been issued since.
    #[instrument(skip_all, fields(ticket = ticket.0, len = series.len()))]
    pub fn complete(&mut self, ticket: Ticket, series: Vec<TimeSeriesDataPoint>) -> bool {
        if ticket.0 != self.generation {
            warn!(latest = self.generation, "discarding the stale response");
            return false;
        }
        self.is_loading = false;
        self.series = series;
        self.recompute();
        true
    }

    pub fn set_mode(&mut self, mode: ForecastMode) {
        if self.mode != mode {
            self.mode = mode;
            if self.metrics.is_some() {
                self.recompute();
            }
        }
    }

    fn recompute(&mut self) {
        self.metrics = Some(MetricsSummary::aggregate(&self.series, self.mode, &mut self.rng));
    }

    pub const fn mode(&self) -> ForecastMode {
        self.mode
    }

    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn series(&self) -> &[TimeSeriesDataPoint] {
        &self.series
    }

    /// Metrics of the current series, `None` until the first forecast is applied.
    pub const fn metrics(&self) -> Option<&MetricsSummary> {
        self.metrics.as_ref()
    }
}
