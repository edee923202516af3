#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Multi-region comparison assembly.
//!
//! Fans the single-region aggregation out across up to eight regions and
//! merges the per-date series into sparse wide tables keyed by region ID.
//! Bundles are built fresh per request and never persisted.

mod palette;

pub use palette::{PALETTE, assign_colors};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use market_pulse_derive::price_to_rent_ratio;
use market_pulse_metrics::{MetricsError, series, snapshot};
use market_pulse_metrics_models::{MarketSnapshot, SeriesFilters, SeriesPoint};
use market_pulse_regions::{RegionError, directory};
use market_pulse_regions_models::GeographyLevel;
use serde::{Deserialize, Serialize};
use switchy_database::Database;
use thiserror::Error;

/// Most regions a single comparison may include.
pub const MAX_COMPARE_REGIONS: usize = 8;

/// Errors that can occur while assembling a comparison.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Zero or more than [`MAX_COMPARE_REGIONS`] regions requested.
    #[error("comparison requires between 1 and {MAX_COMPARE_REGIONS} regions, got {count}")]
    InvalidCardinality {
        /// Number of regions in the request.
        count: usize,
    },

    /// Region directory lookup failed.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// Metric aggregation failed.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Per-region stats and chart color within a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRegion {
    /// Region display label.
    pub region_name: String,
    /// Hierarchy level.
    pub geography_level: GeographyLevel,
    /// Two-letter state code, when level-appropriate.
    pub state: Option<String>,
    /// Assigned chart color (hex).
    pub color: String,
    /// Latest market stats, including the region identifier.
    #[serde(flatten)]
    pub stats: MarketSnapshot,
}

/// One row of a wide trend table: a date plus a value per region that
/// reported that month. Absent regions are absent keys, not zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WideRow {
    /// Observation date.
    pub date: NaiveDate,
    /// Human-readable month label (e.g. "Jan 2024").
    pub formatted_date: String,
    /// Per-region values, keyed by region ID.
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

/// A request-scoped comparison across regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonBundle {
    /// Resolved regions keyed by region ID. Requested IDs that did not
    /// resolve are simply absent; callers check completeness themselves.
    pub regions: BTreeMap<String, ComparisonRegion>,
    /// Home-value wide table.
    pub home_value_trends: Vec<WideRow>,
    /// Rent wide table.
    pub rent_trends: Vec<WideRow>,
    /// Price-to-rent wide table. Rows exist only for dates where at least
    /// one region has a computable ratio.
    pub price_to_rent_trends: Vec<WideRow>,
}

/// Rejects empty or oversized comparison requests before any query runs.
///
/// # Errors
///
/// Returns [`CompareError::InvalidCardinality`] outside 1..=8.
pub const fn validate_cardinality(count: usize) -> Result<(), CompareError> {
    if count == 0 || count > MAX_COMPARE_REGIONS {
        return Err(CompareError::InvalidCardinality { count });
    }
    Ok(())
}

fn format_month(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

fn wide_rows(table: BTreeMap<NaiveDate, BTreeMap<String, f64>>) -> Vec<WideRow> {
    table
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(date, values)| WideRow {
            date,
            formatted_date: format_month(date),
            values,
        })
        .collect()
}

fn merge_series(
    table: &mut BTreeMap<NaiveDate, BTreeMap<String, f64>>,
    region_id: &str,
    points: &[SeriesPoint],
) {
    for point in points {
        table
            .entry(point.date)
            .or_default()
            .insert(region_id.to_string(), point.value);
    }
}

/// Assembles a comparison bundle for the given regions.
///
/// Requested IDs that do not resolve are omitted from the output without
/// error. Colors are assigned deterministically in request order via
/// [`assign_colors`]; `prior_colors` carries assignments from an earlier
/// selection so reused regions keep their color across re-renders.
///
/// # Errors
///
/// Returns [`CompareError::InvalidCardinality`] for an empty or oversized
/// request, and propagates database errors from lookups.
pub async fn compare(
    db: &dyn Database,
    region_ids: &[String],
    filters: &SeriesFilters,
    prior_colors: &BTreeMap<String, String>,
) -> Result<ComparisonBundle, CompareError> {
    validate_cardinality(region_ids.len())?;

    let resolved = directory::get_regions(db, region_ids).await?;
    if resolved.len() < region_ids.len() {
        log::debug!(
            "comparison resolved {} of {} requested regions",
            resolved.len(),
            region_ids.len()
        );
    }

    let resolved_ids: Vec<String> = region_ids
        .iter()
        .filter(|id| resolved.iter().any(|r| &r.region_id == *id))
        .cloned()
        .collect();
    let colors = assign_colors(&resolved_ids, prior_colors);

    let mut regions = BTreeMap::new();
    let mut home_value_table: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    let mut rent_table: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    let mut ratio_table: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();

    for region in resolved {
        let region_id = region.region_id.clone();

        let home_values = series::home_value_series(db, &region_id, filters).await?;
        let rents = series::rent_series(db, &region_id, filters).await?;

        merge_series(&mut home_value_table, &region_id, &home_values);
        merge_series(&mut rent_table, &region_id, &rents);

        // Ratio per date needs both series at that exact date.
        let rent_by_date: BTreeMap<NaiveDate, f64> =
            rents.iter().map(|p| (p.date, p.value)).collect();
        for point in &home_values {
            if let Some(ratio) =
                price_to_rent_ratio(Some(point.value), rent_by_date.get(&point.date).copied())
            {
                ratio_table
                    .entry(point.date)
                    .or_default()
                    .insert(region_id.clone(), ratio);
            }
        }

        let stats = snapshot::market_overview(db, &region_id)
            .await?
            .unwrap_or_else(|| empty_snapshot(&region_id));

        let color = colors.get(&region_id).cloned().unwrap_or_default();
        regions.insert(
            region_id,
            ComparisonRegion {
                region_name: region.label(),
                geography_level: region.geography_level,
                state: region.state.clone(),
                color,
                stats,
            },
        );
    }

    Ok(ComparisonBundle {
        regions,
        home_value_trends: wide_rows(home_value_table),
        rent_trends: wide_rows(rent_table),
        price_to_rent_trends: wide_rows(ratio_table),
    })
}

fn empty_snapshot(region_id: &str) -> MarketSnapshot {
    MarketSnapshot {
        region_id: region_id.to_string(),
        as_of: None,
        home_value: None,
        home_value_yoy_pct: None,
        home_value_mom_pct: None,
        rent_value: None,
        rent_yoy_pct: None,
        rent_mom_pct: None,
        price_to_rent: None,
        rent_yield_pct: None,
        classification: market_pulse_derive::classify_market(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn points(dates: &[NaiveDate]) -> Vec<SeriesPoint> {
        dates
            .iter()
            .map(|&d| SeriesPoint {
                date: d,
                value: 100.0,
            })
            .collect()
    }

    #[test]
    fn sparse_merge_keeps_only_reporting_regions_per_row() {
        // Region A reports Jan-Mar, region B reports Feb-Apr.
        let jan = date(2025, 1);
        let feb = date(2025, 2);
        let mar = date(2025, 3);
        let apr = date(2025, 4);

        let mut table = BTreeMap::new();
        merge_series(&mut table, "A", &points(&[jan, feb, mar]));
        merge_series(&mut table, "B", &points(&[feb, mar, apr]));

        let rows = wide_rows(table);
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0].date, jan);
        assert!(rows[0].values.contains_key("A"));
        assert!(!rows[0].values.contains_key("B"));

        assert!(rows[1].values.contains_key("A"));
        assert!(rows[1].values.contains_key("B"));

        assert_eq!(rows[3].date, apr);
        assert!(!rows[3].values.contains_key("A"));
        assert!(rows[3].values.contains_key("B"));
    }

    #[test]
    fn wide_rows_formats_month_labels() {
        let mut table = BTreeMap::new();
        merge_series(&mut table, "A", &points(&[date(2024, 1)]));
        let rows = wide_rows(table);
        assert_eq!(rows[0].formatted_date, "Jan 2024");
    }

    #[test]
    fn cardinality_rejects_zero_and_nine() {
        assert!(matches!(
            validate_cardinality(0),
            Err(CompareError::InvalidCardinality { count: 0 })
        ));
        assert!(matches!(
            validate_cardinality(9),
            Err(CompareError::InvalidCardinality { count: 9 })
        ));
        assert!(validate_cardinality(1).is_ok());
        assert!(validate_cardinality(8).is_ok());
    }
}
