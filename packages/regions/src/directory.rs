//! Exact-key lookups against the region directory.

use market_pulse_regions_models::{GeographyLevel, Region};
use switchy_database::{Database, DatabaseValue};

use crate::{REGION_COLUMNS, RegionError, region_from_row};

/// Fetches a single region by its identifier.
///
/// # Errors
///
/// Returns [`RegionError`] if the database operation fails.
pub async fn get_region(db: &dyn Database, region_id: &str) -> Result<Option<Region>, RegionError> {
    let sql = format!("SELECT {REGION_COLUMNS} FROM regions WHERE region_id = $1");
    let rows = db
        .query_raw_params(&sql, &[DatabaseValue::String(region_id.to_string())])
        .await?;

    Ok(rows.first().and_then(region_from_row))
}

/// Batch lookup by region IDs.
///
/// Missing IDs are silently omitted and result order is not guaranteed —
/// callers detect gaps by counting results.
///
/// # Errors
///
/// Returns [`RegionError`] if the database operation fails.
pub async fn get_regions(
    db: &dyn Database,
    region_ids: &[String],
) -> Result<Vec<Region>, RegionError> {
    if region_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = (1..=region_ids.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("SELECT {REGION_COLUMNS} FROM regions WHERE region_id IN ({placeholders})");

    let params: Vec<DatabaseValue> = region_ids
        .iter()
        .map(|id| DatabaseValue::String(id.clone()))
        .collect();

    let rows = db.query_raw_params(&sql, &params).await?;

    Ok(rows.iter().filter_map(region_from_row).collect())
}

/// Lists regions of a given level ordered by `size_rank` ascending with
/// null ranks last.
///
/// # Errors
///
/// Returns [`RegionError`] if the database operation fails.
pub async fn list_regions(
    db: &dyn Database,
    level: GeographyLevel,
    limit: u32,
) -> Result<Vec<Region>, RegionError> {
    let sql = format!(
        "SELECT {REGION_COLUMNS} FROM regions
         WHERE geography_level = $1
         ORDER BY size_rank ASC NULLS LAST, region_name ASC
         LIMIT $2"
    );

    let rows = db
        .query_raw_params(
            &sql,
            &[
                DatabaseValue::String(level.to_string()),
                DatabaseValue::Int64(i64::from(limit)),
            ],
        )
        .await?;

    Ok(rows.iter().filter_map(region_from_row).collect())
}
