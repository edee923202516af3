#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region directory lookups and free-text region resolution.
//!
//! The directory answers exact-key lookups (`get_region`, `get_regions`,
//! `list_regions`); the resolver maps free text to ranked region matches
//! with a fixed level precedence. Both run parameterized SQL against the
//! `regions` table via `switchy_database`.

pub mod directory;
pub mod resolver;

use market_pulse_regions_models::{GeographyLevel, Region};
use moosicbox_json_utils::database::ToValue as _;
use thiserror::Error;

/// Errors that can occur during region lookups.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),
}

/// Column list shared by every region query.
pub(crate) const REGION_COLUMNS: &str = "region_id, geography_level, region_name, display_name, \
     state, state_name, city, county, metro, size_rank";

/// Maps a database row to a [`Region`].
///
/// Rows with an unrecognized `geography_level` are dropped rather than
/// failing the whole result set.
pub(crate) fn region_from_row(row: &switchy_database::Row) -> Option<Region> {
    let level: String = row.to_value("geography_level").ok()?;
    let geography_level: GeographyLevel = level.parse().ok()?;

    Some(Region {
        region_id: row.to_value("region_id").unwrap_or_default(),
        geography_level,
        region_name: row.to_value("region_name").unwrap_or_default(),
        display_name: row.to_value("display_name").unwrap_or(None),
        state: row.to_value("state").unwrap_or(None),
        state_name: row.to_value("state_name").unwrap_or(None),
        city: row.to_value("city").unwrap_or(None),
        county: row.to_value("county").unwrap_or(None),
        metro: row.to_value("metro").unwrap_or(None),
        size_rank: row.to_value("size_rank").unwrap_or(None),
    })
}

/// SQL `CASE` expression ranking rows by level precedence, matching
/// [`GeographyLevel::precedence`].
pub(crate) const LEVEL_PRECEDENCE_CASE: &str = "CASE geography_level \
     WHEN 'National' THEN 0 \
     WHEN 'State' THEN 1 \
     WHEN 'Metro' THEN 2 \
     WHEN 'County' THEN 3 \
     WHEN 'City' THEN 4 \
     WHEN 'Zip' THEN 5 \
     ELSE 6 END";

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn precedence_case_has_an_arm_for_every_level() {
        for level in GeographyLevel::iter() {
            let arm = format!("WHEN '{level}' THEN {}", level.precedence());
            assert!(
                LEVEL_PRECEDENCE_CASE.contains(&arm),
                "resolver SQL is missing the arm {arm:?}"
            );
        }
    }

    #[test]
    fn precedence_case_sorts_unknown_levels_last() {
        let max = GeographyLevel::iter()
            .map(GeographyLevel::precedence)
            .max()
            .unwrap_or_default();
        assert!(LEVEL_PRECEDENCE_CASE.contains(&format!("ELSE {} END", max + 1)));
    }
}
