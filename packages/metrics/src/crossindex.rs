//! Cross-index fallback joins against the national house-price index.
//!
//! The HPI dataset is published per state and per metro area, so County
//! and City regions have no entry at their own granularity and fall back
//! to their parent State's series. Metro regions attempt an
//! identifier-equality join against the HPI metro code space directly; no
//! name-based matching is attempted, so metros whose identifiers diverge
//! between the two datasets silently under-match (a known data-quality
//! gap in the source data, not an error).

use chrono::Utc;
use market_pulse_metrics_models::SeriesPoint;
use market_pulse_regions_models::{GeographyLevel, Region};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::{MetricsError, parse_date, window_start};

/// Fetches the house-price-index series for a region, applying the
/// level-dependent fallback rules.
///
/// Returns an empty series when no join target exists for the region.
///
/// # Errors
///
/// Returns [`MetricsError`] if the database operation fails.
pub async fn hpi_series(
    db: &dyn Database,
    region: &Region,
    window_months: u32,
) -> Result<Vec<SeriesPoint>, MetricsError> {
    match region.geography_level {
        GeographyLevel::Metro => {
            let Some(metro) = &region.metro else {
                log::debug!(
                    "no metro identifier for region {}; skipping HPI join",
                    region.region_id
                );
                return Ok(Vec::new());
            };
            let points = hpi_metro_series(db, metro, window_months).await?;
            if points.is_empty() {
                log::debug!(
                    "HPI metro join missed for region {} (metro code '{metro}')",
                    region.region_id
                );
            }
            Ok(points)
        }
        GeographyLevel::County | GeographyLevel::City | GeographyLevel::State => {
            let Some(state) = &region.state else {
                log::debug!(
                    "no state for region {}; skipping HPI fallback",
                    region.region_id
                );
                return Ok(Vec::new());
            };
            hpi_state_series(db, state, window_months).await
        }
        GeographyLevel::National | GeographyLevel::Zip => Ok(Vec::new()),
    }
}

async fn hpi_state_series(
    db: &dyn Database,
    state: &str,
    window_months: u32,
) -> Result<Vec<SeriesPoint>, MetricsError> {
    let start = window_start(Utc::now().date_naive(), window_months);
    let rows = db
        .query_raw_params(
            "SELECT date::text as date, index_value as value
             FROM hpi_state
             WHERE state = $1 AND date >= $2
             ORDER BY date ASC",
            &[
                DatabaseValue::String(state.to_uppercase()),
                DatabaseValue::DateTime(start.and_hms_opt(0, 0, 0).unwrap_or_default()),
            ],
        )
        .await?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            let date: String = row.to_value("date").ok()?;
            let value: f64 = row.to_value("value").ok()?;
            Some(SeriesPoint {
                date: parse_date(&date)?,
                value,
            })
        })
        .collect())
}

async fn hpi_metro_series(
    db: &dyn Database,
    metro_code: &str,
    window_months: u32,
) -> Result<Vec<SeriesPoint>, MetricsError> {
    let start = window_start(Utc::now().date_naive(), window_months);
    let rows = db
        .query_raw_params(
            "SELECT date::text as date, index_value as value
             FROM hpi_metro
             WHERE metro_code = $1 AND date >= $2
             ORDER BY date ASC",
            &[
                DatabaseValue::String(metro_code.to_string()),
                DatabaseValue::DateTime(start.and_hms_opt(0, 0, 0).unwrap_or_default()),
            ],
        )
        .await?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            let date: String = row.to_value("date").ok()?;
            let value: f64 = row.to_value("value").ok()?;
            Some(SeriesPoint {
                date: parse_date(&date)?,
                value,
            })
        })
        .collect())
}
