//! Market summary snapshots and the single-region trend assembly.
//!
//! The `market_summary` table is a materialized convenience view over the
//! latest observations. Reads prefer it, but every field can be recomputed
//! directly from observations when the row is stale or absent, so callers
//! like the chat tool never miss a region that has data.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use market_pulse_derive::{classify_market, gross_rent_yield, price_to_rent_ratio};
use market_pulse_metrics_models::{MarketSnapshot, SeriesFilters, TrendPoint};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::{MetricsError, parse_date, series};

/// Window used when recomputing a snapshot from observations. Two years
/// of monthly data guarantees a lag-12 predecessor for the latest point.
const RECOMPUTE_WINDOW_MONTHS: u32 = 24;

/// Reads the materialized snapshot row for a region, if one exists.
///
/// # Errors
///
/// Returns [`MetricsError`] if the database operation fails.
pub async fn read_snapshot(
    db: &dyn Database,
    region_id: &str,
) -> Result<Option<MarketSnapshot>, MetricsError> {
    let rows = db
        .query_raw_params(
            "SELECT region_id, as_of::text as as_of, home_value, home_value_yoy_pct,
                    home_value_mom_pct, rent_value, rent_yoy_pct, rent_mom_pct,
                    price_to_rent, rent_yield_pct, classification
             FROM market_summary
             WHERE region_id = $1",
            &[DatabaseValue::String(region_id.to_string())],
        )
        .await?;

    Ok(rows.first().map(|row| {
        let as_of: Option<String> = row.to_value("as_of").unwrap_or(None);
        let home_value_yoy_pct: Option<f64> = row.to_value("home_value_yoy_pct").unwrap_or(None);
        let classification_name: Option<String> = row.to_value("classification").unwrap_or(None);
        let classification = classification_name
            .and_then(|c| c.parse().ok())
            .unwrap_or_else(|| classify_market(home_value_yoy_pct));

        MarketSnapshot {
            region_id: row.to_value("region_id").unwrap_or_default(),
            as_of: as_of.as_deref().and_then(parse_date),
            home_value: row.to_value("home_value").unwrap_or(None),
            home_value_yoy_pct,
            home_value_mom_pct: row.to_value("home_value_mom_pct").unwrap_or(None),
            rent_value: row.to_value("rent_value").unwrap_or(None),
            rent_yoy_pct: row.to_value("rent_yoy_pct").unwrap_or(None),
            rent_mom_pct: row.to_value("rent_mom_pct").unwrap_or(None),
            price_to_rent: row.to_value("price_to_rent").unwrap_or(None),
            rent_yield_pct: row.to_value("rent_yield_pct").unwrap_or(None),
            classification,
        }
    }))
}

/// Recomputes a snapshot directly from observations.
///
/// Returns `None` when the region has neither home-value nor rent data.
///
/// # Errors
///
/// Returns [`MetricsError`] if a database operation fails.
pub async fn recompute_snapshot(
    db: &dyn Database,
    region_id: &str,
) -> Result<Option<MarketSnapshot>, MetricsError> {
    let filters = SeriesFilters {
        window_months: RECOMPUTE_WINDOW_MONTHS,
        ..SeriesFilters::default()
    };

    let home_values = series::home_value_series(db, region_id, &filters).await?;
    let rents = series::rent_series(db, region_id, &filters).await?;

    if home_values.is_empty() && rents.is_empty() {
        return Ok(None);
    }

    let home_derived = market_pulse_derive::derive_points(&home_values);
    let rent_derived = market_pulse_derive::derive_points(&rents);

    let latest_home = home_derived.last();
    let latest_rent = rent_derived.last();

    let home_value = latest_home.map(|p| p.value);
    let rent_value = latest_rent.map(|p| p.value);
    let home_value_yoy_pct = latest_home.and_then(|p| p.yoy_change_pct);

    Ok(Some(MarketSnapshot {
        region_id: region_id.to_string(),
        as_of: latest_home.or(latest_rent).map(|p| p.date),
        home_value,
        home_value_yoy_pct,
        home_value_mom_pct: latest_home.and_then(|p| p.mom_change_pct),
        rent_value,
        rent_yoy_pct: latest_rent.and_then(|p| p.yoy_change_pct),
        rent_mom_pct: latest_rent.and_then(|p| p.mom_change_pct),
        price_to_rent: price_to_rent_ratio(home_value, rent_value),
        rent_yield_pct: gross_rent_yield(rent_value, home_value),
        classification: classify_market(home_value_yoy_pct),
    }))
}

/// Returns a region's market snapshot, preferring the materialized row and
/// recomputing from observations when it is absent.
///
/// # Errors
///
/// Returns [`MetricsError`] if a database operation fails.
pub async fn market_overview(
    db: &dyn Database,
    region_id: &str,
) -> Result<Option<MarketSnapshot>, MetricsError> {
    if let Some(snapshot) = read_snapshot(db, region_id).await? {
        return Ok(Some(snapshot));
    }
    recompute_snapshot(db, region_id).await
}

/// Assembles the single-region trend rows: home value and rent aligned by
/// date with month-over-month change and the price-to-rent ratio.
///
/// Rows exist for the union of dates in the two series; a month observed
/// in only one series carries `None` for the other's fields.
///
/// # Errors
///
/// Returns [`MetricsError`] if a database operation fails.
pub async fn trend_points(
    db: &dyn Database,
    region_id: &str,
    filters: &SeriesFilters,
) -> Result<Vec<TrendPoint>, MetricsError> {
    let home_values = series::home_value_series(db, region_id, filters).await?;
    let rents = series::rent_series(db, region_id, filters).await?;

    let home_derived = market_pulse_derive::derive_points(&home_values);

    let mut by_date: BTreeMap<NaiveDate, TrendPoint> = BTreeMap::new();

    for point in &home_derived {
        by_date.insert(
            point.date,
            TrendPoint {
                date: point.date,
                home_value: Some(point.value),
                rent_value: None,
                mom_change_pct: point.mom_change_pct,
                price_to_rent_ratio: None,
            },
        );
    }

    for point in &rents {
        let entry = by_date.entry(point.date).or_insert(TrendPoint {
            date: point.date,
            home_value: None,
            rent_value: None,
            mom_change_pct: None,
            price_to_rent_ratio: None,
        });
        entry.rent_value = Some(point.value);
        entry.price_to_rent_ratio = price_to_rent_ratio(entry.home_value, entry.rent_value);
    }

    Ok(by_date.into_values().collect())
}
