mod dashboard;
mod metrics;
mod mode;
mod point;
mod region;

pub use self::{
    dashboard::Dashboard,
    metrics::{DemandMetrics, MetricsSummary, PriceMetrics},
    mode::ForecastMode,
    point::TimeSeriesDataPoint,
    region::Region,
};
