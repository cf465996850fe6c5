use std::fmt::{Display, Formatter};

use rand::Rng;
use serde::Serialize;

use crate::{
    core::{ForecastMode, TimeSeriesDataPoint},
    quantity::{Zero, energy::KilowattHours, price::MegawattHourPrice},
};

/// Point of the series where an extremum was found.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Peak<V> {
    pub value: V,
    pub timestamp: String,
}

impl<V: Zero> Peak<V> {
    /// Zero-valued sentinel used before any positive value is seen.
    pub const ZERO: Self = Self { value: V::ZERO, timestamp: String::new() };
}

impl<V> Peak<V> {
    fn at(value: V, point: &TimeSeriesDataPoint) -> Self {
        Self { value, timestamp: point.timestamp.clone() }
    }
}

/// Synthetic model accuracy, in percent.
///
/// This is a display placeholder: it is drawn at random from a fixed band and carries no
/// information about the forecast.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct AccuracyScore(pub f64);

impl AccuracyScore {
    pub const ZERO: Self = Self(0.0);

    const SPREAD: f64 = 8.0;

    fn synthetic(base: f64, rng: &mut impl Rng) -> Self {
        Self((base + rng.gen_range(0.0..Self::SPREAD)).round())
    }
}

impl Display for AccuracyScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}%", self.0)
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MetricsSummary {
    Demand(DemandMetrics),
    Price(PriceMetrics),
}

impl MetricsSummary {
    pub fn aggregate(
        series: &[TimeSeriesDataPoint],
        mode: ForecastMode,
        rng: &mut impl Rng,
    ) -> Self {
        match mode {
            ForecastMode::Demand => Self::Demand(DemandMetrics::aggregate(series, rng)),
            ForecastMode::Price => Self::Price(PriceMetrics::aggregate(series, rng)),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ForecastMode {
        match self {
            Self::Demand(_) => ForecastMode::Demand,
            Self::Price(_) => ForecastMode::Price,
        }
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DemandMetrics {
    pub peak_demand: Peak<KilowattHours>,
    pub total_usage: KilowattHours,
    pub accuracy_score: AccuracyScore,
}

impl DemandMetrics {
    const ACCURACY_BASE: f64 = 88.0;

    pub fn aggregate(series: &[TimeSeriesDataPoint], rng: &mut impl Rng) -> Self {
        let mut peak_demand = Peak::ZERO;
        let mut total_usage = KilowattHours::ZERO;

        for point in series {
            let demand = point.demand_or_zero();
            if demand > peak_demand.value {
                peak_demand = Peak::at(demand, point);
            }
            total_usage += demand;
        }

        let accuracy_score = if series.is_empty() {
            AccuracyScore::ZERO
        } else {
            AccuracyScore::synthetic(Self::ACCURACY_BASE, rng)
        };
        Self { peak_demand, total_usage, accuracy_score }
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceMetrics {
    pub peak_price: Peak<MegawattHourPrice>,

    /// Lowest strictly positive price, `None` when the series has none.
    pub lowest_price: Option<Peak<MegawattHourPrice>>,

    /// Mean over all the points, including zero and absent prices.
    pub average_price: MegawattHourPrice,

    pub accuracy_score: AccuracyScore,
}

impl PriceMetrics {
    const ACCURACY_BASE: f64 = 85.0;

    pub fn aggregate(series: &[TimeSeriesDataPoint], rng: &mut impl Rng) -> Self {
        let mut peak_price = Peak::ZERO;
        let mut lowest_price: Option<Peak<MegawattHourPrice>> = None;
        let mut total_price = MegawattHourPrice::ZERO;
        let mut count = 0_u32;

        for point in series {
            let price = point.price_or_zero();
            if price > peak_price.value {
                peak_price = Peak::at(price, point);
            }
            if price > MegawattHourPrice::ZERO
                && lowest_price.as_ref().is_none_or(|lowest| price < lowest.value)
            {
                lowest_price = Some(Peak::at(price, point));
            }
            total_price += price;
            count += 1;
        }

        let (average_price, accuracy_score) = if count == 0 {
            (MegawattHourPrice::ZERO, AccuracyScore::ZERO)
        } else {
            (
                MegawattHourPrice(total_price.0 / f64::from(count)).round_to_cents(),
                AccuracyScore::synthetic(Self::ACCURACY_BASE, rng),
            )
        };
        Self { peak_price, lowest_price, average_price, accuracy_score }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn demand(timestamp: &str, forecast: f64) -> TimeSeriesDataPoint {
        TimeSeriesDataPoint::builder().timestamp(timestamp).forecast(forecast).build()
    }

    fn price(timestamp: &str, forecast_price: f64) -> TimeSeriesDataPoint {
        TimeSeriesDataPoint::builder().timestamp(timestamp).forecast_price(forecast_price).build()
    }

    #[test]
    fn empty_demand_ok() {
        let metrics = DemandMetrics::aggregate(&[], &mut rng());
        assert_eq!(metrics.peak_demand, Peak::ZERO);
        assert_eq!(metrics.total_usage, KilowattHours::ZERO);
        assert_eq!(metrics.accuracy_score, AccuracyScore::ZERO);
    }

    #[test]
    fn empty_price_ok() {
        let metrics = PriceMetrics::aggregate(&[], &mut rng());
        assert_eq!(metrics.peak_price, Peak::ZERO);
        assert_eq!(metrics.lowest_price, None);
        assert_eq!(metrics.average_price, MegawattHourPrice::ZERO);
        assert_eq!(metrics.accuracy_score, AccuracyScore::ZERO);
    }

    #[test]
    fn absent_demand_counts_as_zero() {
        let series = [
            TimeSeriesDataPoint::builder().timestamp("t1").build(),
            TimeSeriesDataPoint::builder().timestamp("t2").forecast_price(40.0).build(),
        ];
        let metrics = DemandMetrics::aggregate(&series, &mut rng());
        assert_eq!(metrics.total_usage, KilowattHours::ZERO);
        assert_eq!(metrics.peak_demand.value, KilowattHours::ZERO);
        assert_eq!(metrics.peak_demand.timestamp, "");
    }

    #[test]
    fn demand_tie_keeps_first_peak() {
        let series = [demand("t1", 10.0), demand("t2", 25.0), demand("t3", 25.0)];
        let metrics = DemandMetrics::aggregate(&series, &mut rng());
        assert_eq!(metrics.peak_demand.value, KilowattHours(25.0));
        assert_eq!(metrics.peak_demand.timestamp, "t2");
        assert_abs_diff_eq!(metrics.total_usage.0, 60.0);
    }

    #[test]
    fn price_excludes_zero_from_lowest() {
        let series = [price("t1", 50.0), price("t2", 0.0), price("t3", 30.0)];
        let metrics = PriceMetrics::aggregate(&series, &mut rng());
        assert_eq!(metrics.peak_price.value, MegawattHourPrice(50.0));
        assert_eq!(metrics.peak_price.timestamp, "t1");
        let lowest = metrics.lowest_price.unwrap();
        assert_eq!(lowest.value, MegawattHourPrice(30.0));
        assert_eq!(lowest.timestamp, "t3");
        assert_abs_diff_eq!(metrics.average_price.0, 26.67);
    }

    #[test]
    fn price_counts_absent_points_in_average() {
        let series = [
            price("t1", 10.0),
            TimeSeriesDataPoint::builder().timestamp("t2").forecast(100.0).build(),
        ];
        let metrics = PriceMetrics::aggregate(&series, &mut rng());
        assert_abs_diff_eq!(metrics.average_price.0, 5.0);
        assert_eq!(metrics.lowest_price.unwrap().value, MegawattHourPrice(10.0));
    }

    #[test]
    fn all_zero_prices_have_no_lowest() {
        let series = [price("t1", 0.0), price("t2", 0.0)];
        let metrics = PriceMetrics::aggregate(&series, &mut rng());
        assert_eq!(metrics.lowest_price, None);
        assert_eq!(metrics.peak_price, Peak::ZERO);
    }

    #[test]
    fn accuracy_score_stays_in_band() {
        let mut rng = rng();
        let series = [demand("t1", 1.0)];
        for _ in 0..100 {
            let MetricsSummary::Demand(metrics) =
                MetricsSummary::aggregate(&series, ForecastMode::Demand, &mut rng)
            else {
                unreachable!()
            };
            assert!((88.0..=96.0).contains(&metrics.accuracy_score.0));

            let MetricsSummary::Price(metrics) =
                MetricsSummary::aggregate(&series, ForecastMode::Price, &mut rng)
            else {
                unreachable!()
            };
            assert!((85.0..=93.0).contains(&metrics.accuracy_score.0));
        }
    }

    #[test]
    fn summary_mode_ok() {
        let summary = MetricsSummary::aggregate(&[], ForecastMode::Price, &mut rng());
        assert_eq!(summary.mode(), ForecastMode::Price);
    }
}
