#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Time-series aggregation over the housing metric fact tables.
//!
//! Each public function pulls one metric family's observations for a
//! region, restricted to a validated filter tuple and date window, and
//! returns them ordered by date ascending. Derivation over the fetched
//! series lives in `market_pulse_derive`; this crate owns the SQL.

pub mod crossindex;
pub mod rankings;
pub mod series;
pub mod snapshot;

use chrono::{Months, NaiveDate};
use market_pulse_metrics_models::InvalidFilterError;
use thiserror::Error;

/// Errors that can occur during metric aggregation.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// A caller-supplied dimensional filter was outside its allow-list.
    #[error("{0}")]
    InvalidFilter(#[from] InvalidFilterError),
}

/// Start of a trailing window of `months` ending today.
#[must_use]
pub fn window_start(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Parses a `date::text` column value.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_start_subtracts_months() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(
            window_start(today, 12),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
        assert_eq!(
            window_start(today, 60),
            NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()
        );
    }

    #[test]
    fn parses_date_text() {
        assert_eq!(
            parse_date("2025-01-31"),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );
        assert_eq!(parse_date("not-a-date"), None);
    }
}
