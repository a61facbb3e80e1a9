//! Recency weighting of comments by posting month.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Reference month used when none is configured.
pub const DEFAULT_REFERENCE_MONTH: &str = "2025-01";

/// Maps a `YYYY-MM` posting month to a weight multiplier.
///
/// Elapsed whole months against the reference month:
/// `<= 2` → 1.5, `<= 6` → 1.2, `<= 12` → 1.0, older → 0.7.
/// Unparseable input weighs 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWeighter {
    reference: NaiveDate,
}

impl Default for RecencyWeighter {
    fn default() -> Self {
        Self {
            reference: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
        }
    }
}

impl RecencyWeighter {
    /// Weighter anchored at the first day of `reference` (`YYYY-MM`).
    /// Returns `None` if the month does not parse.
    pub fn with_reference_month(reference: &str) -> Option<Self> {
        parse_month(reference).map(|reference| Self { reference })
    }

    pub fn reference_month(&self) -> String {
        self.reference.format("%Y-%m").to_string()
    }

    /// Whole months between `time_posted` and the reference month.
    /// Negative for months after the reference.
    pub fn months_elapsed(&self, time_posted: &str) -> Option<i32> {
        let posted = parse_month(time_posted)?;
        let years = self.reference.year() - posted.year();
        let months = self.reference.month() as i32 - posted.month() as i32;
        Some(years * 12 + months)
    }

    pub fn weight(&self, time_posted: &str) -> f64 {
        match self.months_elapsed(time_posted) {
            Some(m) if m <= 2 => 1.5,
            Some(m) if m <= 6 => 1.2,
            Some(m) if m <= 12 => 1.0,
            Some(_) => 0.7,
            None => {
                debug!(time_posted, "unparseable posting month, using neutral weight");
                1.0
            }
        }
    }
}

fn parse_month(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_boundaries() {
        let w = RecencyWeighter::default();
        assert_eq!(w.weight("2024-12"), 1.5);
        assert_eq!(w.weight("2024-11"), 1.5); // 2 months
        assert_eq!(w.weight("2024-10"), 1.2);
        assert_eq!(w.weight("2024-07"), 1.2); // 6 months
        assert_eq!(w.weight("2024-06"), 1.0);
        assert_eq!(w.weight("2024-01"), 1.0); // 12 months
        assert_eq!(w.weight("2023-12"), 0.7);
        assert_eq!(w.weight("2019-05"), 0.7);
    }

    #[test]
    fn garbage_is_neutral() {
        let w = RecencyWeighter::default();
        assert_eq!(w.weight("last spring"), 1.0);
        assert_eq!(w.weight("2024-13"), 1.0);
        assert_eq!(w.weight(""), 1.0);
    }

    #[test]
    fn future_months_count_as_recent() {
        let w = RecencyWeighter::default();
        assert_eq!(w.months_elapsed("2025-04"), Some(-3));
        assert_eq!(w.weight("2025-04"), 1.5);
    }

    #[test]
    fn custom_reference_month() {
        let w = RecencyWeighter::with_reference_month("2026-03").unwrap();
        assert_eq!(w.reference_month(), "2026-03");
        assert_eq!(w.weight("2025-12"), 1.2);
        assert!(RecencyWeighter::with_reference_month("March").is_none());
    }
}
