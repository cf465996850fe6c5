use std::fmt::{Debug, Formatter};

use chrono::{Days, NaiveDate};

use crate::prelude::*;

/// Calendar dates requested from the forecasting service, both ends included.
pub type DateRange = RangeInclusive<NaiveDate>;

#[must_use]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct RangeInclusive<T: Copy> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + Debug> Debug for RangeInclusive<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..={:?}", self.min, self.max)
    }
}

impl<T: Copy> RangeInclusive<T> {
    pub const fn from_std(range: std::ops::RangeInclusive<T>) -> Self {
        Self { min: *range.start(), max: *range.end() }
    }
}

impl DateRange {
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        ensure!(start <= end, "the end date ({end}) must not precede the start date ({start})");
        Ok(Self::from_std(start..=end))
    }

    /// Range starting on the given date and spanning the following `n_days` days.
    pub fn starting_on(start: NaiveDate, n_days: u64) -> Result<Self> {
        let end = start
            .checked_add_days(Days::new(n_days))
            .with_context(|| format!("`{start}` plus {n_days} days is out of range"))?;
        Self::try_new(start, end)
    }

    /// Number of calendar days covered, ends included.
    #[must_use]
    pub fn n_days(self) -> i64 {
        (self.max - self.min).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_ok() -> Result {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        let range = DateRange::try_new(start, end)?;
        assert_eq!(range.n_days(), 8);
        assert_eq!(range.min, start);
        assert_eq!(range.max, end);
        Ok(())
    }

    #[test]
    fn single_day_ok() -> Result {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(DateRange::try_new(day, day)?.n_days(), 1);
        Ok(())
    }

    #[test]
    fn reversed_range_fails() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(DateRange::try_new(start, end).is_err());
    }

    #[test]
    fn starting_on_ok() -> Result {
        let start = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        let range = DateRange::starting_on(start, 7)?;
        assert_eq!(range.max, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
        Ok(())
    }
}
