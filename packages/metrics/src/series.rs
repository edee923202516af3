//! Per-family observation queries.
//!
//! All queries share the same shape: parameterized WHERE clause over the
//! family's fact table, `date >= window start`, `ORDER BY date ASC`.
//! Filter values arrive as validated enums; raw caller strings never
//! reach SQL construction.

use chrono::Utc;
use market_pulse_metrics_models::{
    AffordabilityMetric, AffordabilityPoint, AffordabilitySummaryRow, DEFAULT_DOWN_PAYMENT_PCT,
    InventorySnapshot, MetricFamily, SeriesFilters, SeriesPoint,
};
use market_pulse_regions_models::GeographyLevel;
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::{MetricsError, parse_date, window_start};

fn window_cutoff(window_months: u32) -> DatabaseValue {
    let start = window_start(Utc::now().date_naive(), window_months);
    DatabaseValue::DateTime(start.and_hms_opt(0, 0, 0).unwrap_or_default())
}

fn points_from_rows(rows: &[switchy_database::Row]) -> Vec<SeriesPoint> {
    rows.iter()
        .filter_map(|row| {
            let date: String = row.to_value("date").ok()?;
            let value: f64 = row.to_value("value").ok()?;
            Some(SeriesPoint {
                date: parse_date(&date)?,
                value,
            })
        })
        .collect()
}

/// Fetches the home-value (ZHVI-like) series for a region under the given
/// filters.
///
/// When `filters.bedrooms` is set the query selects the bedroom-specific
/// cut; bedroom cuts are stored only for the All Homes / Mid-Tier
/// combination, which [`SeriesFilters::bedroom_cut`] pins.
///
/// # Errors
///
/// Returns [`MetricsError`] if the database operation fails.
pub async fn home_value_series(
    db: &dyn Database,
    region_id: &str,
    filters: &SeriesFilters,
) -> Result<Vec<SeriesPoint>, MetricsError> {
    let mut params = vec![
        DatabaseValue::String(region_id.to_string()),
        DatabaseValue::String(filters.home_type.to_string()),
        DatabaseValue::String(filters.tier.to_string()),
        DatabaseValue::Bool(filters.smoothed),
        DatabaseValue::Bool(filters.seasonally_adjusted),
        window_cutoff(filters.window_months),
    ];

    let bedrooms_clause = match filters.bedrooms {
        Some(bedrooms) => {
            params.push(DatabaseValue::Int32(i32::from(bedrooms)));
            "bedrooms = $7"
        }
        None => "bedrooms IS NULL",
    };

    let sql = format!(
        "SELECT date::text as date, value
         FROM home_value_observations
         WHERE region_id = $1 AND home_type = $2 AND tier = $3
           AND smoothed = $4 AND seasonally_adjusted = $5
           AND date >= $6 AND {bedrooms_clause}
         ORDER BY date ASC"
    );

    let rows = db.query_raw_params(&sql, &params).await?;
    let points = points_from_rows(&rows);
    log::trace!(
        "{} series for region {region_id}: {} points ({filters:?})",
        MetricFamily::HomeValue,
        points.len()
    );
    Ok(points)
}

/// Fetches the rent (ZORI-like) series for a region.
///
/// Rent has no tier or bedroom dimensions; only the smoothing flags apply.
///
/// # Errors
///
/// Returns [`MetricsError`] if the database operation fails.
pub async fn rent_series(
    db: &dyn Database,
    region_id: &str,
    filters: &SeriesFilters,
) -> Result<Vec<SeriesPoint>, MetricsError> {
    let rows = db
        .query_raw_params(
            "SELECT date::text as date, value
             FROM rent_observations
             WHERE region_id = $1 AND smoothed = $2 AND seasonally_adjusted = $3
               AND date >= $4
             ORDER BY date ASC",
            &[
                DatabaseValue::String(region_id.to_string()),
                DatabaseValue::Bool(filters.smoothed),
                DatabaseValue::Bool(filters.seasonally_adjusted),
                window_cutoff(filters.window_months),
            ],
        )
        .await?;

    let points = points_from_rows(&rows);
    log::trace!(
        "{} series for region {region_id}: {} points",
        MetricFamily::Rent,
        points.len()
    );
    Ok(points)
}

/// Fetches the for-sale inventory series for a region (smoothed counts).
///
/// # Errors
///
/// Returns [`MetricsError`] if the database operation fails.
pub async fn inventory_series(
    db: &dyn Database,
    region_id: &str,
    window_months: u32,
) -> Result<Vec<SeriesPoint>, MetricsError> {
    let rows = db
        .query_raw_params(
            "SELECT date::text as date, for_sale_count as value
             FROM inventory_observations
             WHERE region_id = $1 AND smoothed = TRUE AND date >= $2
             ORDER BY date ASC",
            &[
                DatabaseValue::String(region_id.to_string()),
                window_cutoff(window_months),
            ],
        )
        .await?;

    Ok(points_from_rows(&rows))
}

/// Latest inventory reading per region at a geography level, for the
/// national summary table. Ordered by for-sale count descending.
///
/// # Errors
///
/// Returns [`MetricsError`] if the database operation fails.
pub async fn inventory_level_summary(
    db: &dyn Database,
    level: GeographyLevel,
    limit: u32,
) -> Result<Vec<InventorySnapshot>, MetricsError> {
    let rows = db
        .query_raw_params(
            "SELECT i.region_id, r.region_name, i.date::text as date,
                    i.for_sale_count, i.new_listings
             FROM inventory_observations i
             JOIN regions r ON r.region_id = i.region_id
             WHERE r.geography_level = $1 AND i.smoothed = TRUE
               AND i.date = (SELECT MAX(date) FROM inventory_observations i2
                             WHERE i2.region_id = i.region_id AND i2.smoothed = TRUE)
             ORDER BY i.for_sale_count DESC
             LIMIT $2",
            &[
                DatabaseValue::String(level.to_string()),
                DatabaseValue::Int64(i64::from(limit)),
            ],
        )
        .await?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            let date: String = row.to_value("date").ok()?;
            Some(InventorySnapshot {
                region_id: row.to_value("region_id").unwrap_or_default(),
                region_name: row.to_value("region_name").unwrap_or_default(),
                date: parse_date(&date)?,
                for_sale_count: row.to_value("for_sale_count").unwrap_or_default(),
                new_listings: row.to_value("new_listings").unwrap_or(None),
            })
        })
        .collect())
}

/// Fetches one affordability series for a region.
///
/// Payment-type metrics are additionally keyed by down-payment
/// percentage; income metrics carry no down-payment dimension.
///
/// # Errors
///
/// Returns [`MetricsError`] if the database operation fails.
pub async fn affordability_series(
    db: &dyn Database,
    region_id: &str,
    metric: AffordabilityMetric,
    down_payment_pct: Option<u8>,
    window_months: u32,
) -> Result<Vec<AffordabilityPoint>, MetricsError> {
    let down_payment = metric
        .has_down_payment()
        .then(|| down_payment_pct.unwrap_or(DEFAULT_DOWN_PAYMENT_PCT));

    let mut params = vec![
        DatabaseValue::String(region_id.to_string()),
        DatabaseValue::String(metric.to_string()),
        window_cutoff(window_months),
    ];

    let down_payment_clause = match down_payment {
        Some(pct) => {
            params.push(DatabaseValue::Int32(i32::from(pct)));
            "down_payment_pct = $4"
        }
        None => "down_payment_pct IS NULL",
    };

    let sql = format!(
        "SELECT date::text as date, value
         FROM affordability_observations
         WHERE region_id = $1 AND metric_type = $2 AND date >= $3
           AND {down_payment_clause}
         ORDER BY date ASC"
    );

    let rows = db.query_raw_params(&sql, &params).await?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            let date: String = row.to_value("date").ok()?;
            let value: f64 = row.to_value("value").ok()?;
            Some(AffordabilityPoint {
                date: parse_date(&date)?,
                metric_type: metric,
                down_payment_pct: down_payment,
                value,
            })
        })
        .collect())
}

/// Latest income-needed affordability reading per region at a geography
/// level, for the multi-region summary table.
///
/// # Errors
///
/// Returns [`MetricsError`] if the database operation fails.
pub async fn affordability_level_summary(
    db: &dyn Database,
    level: GeographyLevel,
    limit: u32,
) -> Result<Vec<AffordabilitySummaryRow>, MetricsError> {
    let rows = db
        .query_raw_params(
            "SELECT a.region_id, r.region_name, a.date::text as date, a.value
             FROM affordability_observations a
             JOIN regions r ON r.region_id = a.region_id
             WHERE r.geography_level = $1 AND a.metric_type = $2
               AND a.down_payment_pct IS NULL
               AND a.date = (SELECT MAX(date) FROM affordability_observations a2
                             WHERE a2.region_id = a.region_id AND a2.metric_type = a.metric_type)
             ORDER BY a.value DESC
             LIMIT $3",
            &[
                DatabaseValue::String(level.to_string()),
                DatabaseValue::String(AffordabilityMetric::HomeownerIncomeNeeded.to_string()),
                DatabaseValue::Int64(i64::from(limit)),
            ],
        )
        .await?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            let date: String = row.to_value("date").ok()?;
            let value: f64 = row.to_value("value").ok()?;
            Some(AffordabilitySummaryRow {
                region_id: row.to_value("region_id").unwrap_or_default(),
                region_name: row.to_value("region_name").unwrap_or_default(),
                date: parse_date(&date)?,
                homeowner_income_needed: value,
            })
        })
        .collect())
}

/// Fetches the market heat index series for a region. One scalar per
/// region per date; no dimensional filters beyond the window.
///
/// # Errors
///
/// Returns [`MetricsError`] if the database operation fails.
pub async fn heat_index_series(
    db: &dyn Database,
    region_id: &str,
    window_months: u32,
) -> Result<Vec<SeriesPoint>, MetricsError> {
    let rows = db
        .query_raw_params(
            "SELECT date::text as date, score as value
             FROM heat_index_observations
             WHERE region_id = $1 AND date >= $2
             ORDER BY date ASC",
            &[
                DatabaseValue::String(region_id.to_string()),
                window_cutoff(window_months),
            ],
        )
        .await?;

    Ok(points_from_rows(&rows))
}
