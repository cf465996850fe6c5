use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp of a forecast point as shown to the user, for example `Mar 05, 14:00`.
///
/// Timestamps the service sends in an unknown format are shown verbatim.
pub struct FormattedTimestamp<'a>(pub &'a str);

impl FormattedTimestamp<'_> {
    const FORMATS: [&'static str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    pub fn parse(&self) -> Option<NaiveDateTime> {
        Self::FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(self.0, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(self.0, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

impl Display for FormattedTimestamp<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "N/A")
        } else if let Some(timestamp) = self.parse() {
            write!(f, "{}", timestamp.format("%b %d, %H:%M"))
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Optional value, rendered as `N/A` when absent.
pub struct FormattedOption<T>(pub Option<T>);

impl<T: Display> Display for FormattedOption<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(value) => Display::fmt(value, f),
            None => write!(f, "N/A"),
        }
    }
}
