//! Free-text region resolution.
//!
//! Both entry points share one ranking rule: level precedence first
//! (National < State < Metro < County < City < Zip), then `size_rank`
//! ascending with null ranks last. This makes resolution deterministic —
//! "Texas" always resolves to the State before any same-named city.

use market_pulse_regions_models::{GeographyLevel, Region};
use switchy_database::{Database, DatabaseValue};

use crate::{LEVEL_PRECEDENCE_CASE, REGION_COLUMNS, RegionError, region_from_row};

/// Minimum query length for substring matching. Shorter queries either
/// return nothing or fall back to a size-ranked listing of the requested
/// level.
const MIN_QUERY_LEN: usize = 2;

/// Searches the directory for regions matching `query`.
///
/// * Query shorter than two characters, no level filter: empty result.
/// * Query shorter than two characters with a level filter: top `limit`
///   regions of that level by `size_rank`.
/// * Otherwise: case-insensitive substring match against the name columns,
///   restricted to `level_filter` when given, else to
///   {National, State, Metro}.
///
/// Invalid level filter strings are ignored as if absent.
///
/// # Errors
///
/// Returns [`RegionError`] if the database operation fails.
pub async fn search(
    db: &dyn Database,
    query: &str,
    level_filter: Option<GeographyLevel>,
    limit: u32,
) -> Result<Vec<Region>, RegionError> {
    let query = query.trim();

    if query.len() < MIN_QUERY_LEN {
        return match level_filter {
            Some(level) => crate::directory::list_regions(db, level, limit).await,
            None => Ok(Vec::new()),
        };
    }

    let levels: Vec<GeographyLevel> = level_filter.map_or_else(
        || GeographyLevel::default_search_levels().to_vec(),
        |level| vec![level],
    );

    search_levels(db, query, &levels, limit).await
}

/// Resolves free text to the single best-matching region across all
/// levels, for the conversational agent. Returns `None` when nothing
/// matches — never an error.
///
/// # Errors
///
/// Returns [`RegionError`] if the database operation fails.
pub async fn resolve_one(db: &dyn Database, free_text: &str) -> Result<Option<Region>, RegionError> {
    let query = free_text.trim();
    if query.len() < MIN_QUERY_LEN {
        return Ok(None);
    }

    let all_levels = [
        GeographyLevel::National,
        GeographyLevel::State,
        GeographyLevel::Metro,
        GeographyLevel::County,
        GeographyLevel::City,
        GeographyLevel::Zip,
    ];

    let matches = search_levels(db, query, &all_levels, 1).await?;
    Ok(matches.into_iter().next())
}

/// Substring search restricted to a level set, ranked by precedence then
/// size rank.
async fn search_levels(
    db: &dyn Database,
    query: &str,
    levels: &[GeographyLevel],
    limit: u32,
) -> Result<Vec<Region>, RegionError> {
    let mut params: Vec<DatabaseValue> = Vec::new();
    let mut idx = 1u32;

    let pattern = format!("%{query}%");
    params.push(DatabaseValue::String(pattern));
    let pattern_idx = idx;
    idx += 1;

    let level_placeholders = levels
        .iter()
        .map(|level| {
            params.push(DatabaseValue::String(level.to_string()));
            let placeholder = format!("${idx}");
            idx += 1;
            placeholder
        })
        .collect::<Vec<_>>()
        .join(", ");

    let limit_idx = idx;
    params.push(DatabaseValue::Int64(i64::from(limit)));

    let sql = format!(
        "SELECT {REGION_COLUMNS} FROM regions
         WHERE geography_level IN ({level_placeholders})
           AND (region_name ILIKE ${pattern_idx}
                OR display_name ILIKE ${pattern_idx}
                OR state_name ILIKE ${pattern_idx}
                OR city ILIKE ${pattern_idx}
                OR county ILIKE ${pattern_idx}
                OR metro ILIKE ${pattern_idx})
         ORDER BY {LEVEL_PRECEDENCE_CASE}, size_rank ASC NULLS LAST, region_name ASC
         LIMIT ${limit_idx}"
    );

    let rows = db.query_raw_params(&sql, &params).await?;

    Ok(rows.iter().filter_map(region_from_row).collect())
}
