#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic region types for the housing market dashboard.
//!
//! Defines the six-level geography hierarchy and the canonical region
//! directory row shared by every other crate. Search precedence between
//! levels lives here so that resolver and rankings code agree on it.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Nested administrative scope of a region, from country down to ZIP code.
///
/// The declaration order doubles as search precedence: a free-text query
/// that matches both a State and a same-named City resolves to the State.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum GeographyLevel {
    /// The whole country (single row).
    National,
    /// US state.
    State,
    /// Metropolitan statistical area.
    Metro,
    /// County.
    County,
    /// City.
    City,
    /// ZIP code.
    Zip,
}

/// Error returned when a caller-supplied geography level is outside the
/// allow-list. Carries the valid options for the 400 response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLevelError {
    /// The rejected value.
    pub value: String,
}

impl std::fmt::Display for InvalidLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid geographyLevel '{}': expected one of {}",
            self.value,
            GeographyLevel::ALLOWED.join(", ")
        )
    }
}

impl std::error::Error for InvalidLevelError {}

impl GeographyLevel {
    /// Allow-listed wire values, for error messages.
    pub const ALLOWED: &'static [&'static str] =
        &["National", "State", "Metro", "County", "City", "Zip"];

    /// Numeric search precedence. Lower sorts first.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::National => 0,
            Self::State => 1,
            Self::Metro => 2,
            Self::County => 3,
            Self::City => 4,
            Self::Zip => 5,
        }
    }

    /// Parses a caller-supplied level filter.
    ///
    /// Invalid values are treated as if no filter was supplied, per the
    /// search contract — they are never an error.
    #[must_use]
    pub fn parse_filter(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| v.parse().ok())
    }

    /// Parses a caller-supplied level where an invalid value must be
    /// rejected rather than ignored (rankings and level summaries).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLevelError`] when the value is not allow-listed.
    pub fn from_param(value: &str) -> Result<Self, InvalidLevelError> {
        value.parse().map_err(|_| InvalidLevelError {
            value: value.to_string(),
        })
    }

    /// Levels included in an unscoped text search. Cities, counties and
    /// ZIP codes are excluded to keep default results high-level.
    #[must_use]
    pub const fn default_search_levels() -> [Self; 3] {
        [Self::National, Self::State, Self::Metro]
    }
}

/// A region directory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Opaque stable region identifier.
    pub region_id: String,
    /// Hierarchy level.
    pub geography_level: GeographyLevel,
    /// Canonical region name (e.g. "Austin, TX").
    pub region_name: String,
    /// Preferred display label; falls back to [`Self::label`] when absent.
    pub display_name: Option<String>,
    /// Two-letter state code, when level-appropriate.
    pub state: Option<String>,
    /// Full state name.
    pub state_name: Option<String>,
    /// City name for City/Zip rows.
    pub city: Option<String>,
    /// County name for County/Zip rows.
    pub county: Option<String>,
    /// Parent metro name for Metro/County/City/Zip rows.
    pub metro: Option<String>,
    /// Population/size rank used for default ordering. Null sorts last.
    pub size_rank: Option<i32>,
}

impl Region {
    /// Human label for UI display: `display_name` when present, otherwise
    /// the region name composed with the state code.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(display) = &self.display_name {
            return display.clone();
        }
        match (&self.state, self.geography_level) {
            (Some(state), GeographyLevel::County | GeographyLevel::City | GeographyLevel::Zip)
                if !self.region_name.contains(',') =>
            {
                format!("{}, {state}", self.region_name)
            }
            _ => self.region_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_orders_national_before_zip() {
        assert!(GeographyLevel::National.precedence() < GeographyLevel::State.precedence());
        assert!(GeographyLevel::State.precedence() < GeographyLevel::Metro.precedence());
        assert!(GeographyLevel::Metro.precedence() < GeographyLevel::County.precedence());
        assert!(GeographyLevel::County.precedence() < GeographyLevel::City.precedence());
        assert!(GeographyLevel::City.precedence() < GeographyLevel::Zip.precedence());
    }

    #[test]
    fn parses_valid_level_filter() {
        assert_eq!(
            GeographyLevel::parse_filter(Some("Metro")),
            Some(GeographyLevel::Metro)
        );
    }

    #[test]
    fn ignores_invalid_level_filter() {
        assert_eq!(GeographyLevel::parse_filter(Some("Galaxy")), None);
        assert_eq!(GeographyLevel::parse_filter(None), None);
    }

    #[test]
    fn from_param_accepts_allowed_levels() {
        assert_eq!(GeographyLevel::from_param("Zip"), Ok(GeographyLevel::Zip));
    }

    #[test]
    fn from_param_rejects_unknown_level_listing_options() {
        let err = GeographyLevel::from_param("Galaxy").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid geographyLevel 'Galaxy': expected one of National, State, Metro, County, City, Zip"
        );
    }

    #[test]
    fn allowed_list_matches_variants() {
        use strum::IntoEnumIterator as _;

        let names: Vec<String> = GeographyLevel::iter().map(|l| l.to_string()).collect();
        assert_eq!(names, GeographyLevel::ALLOWED);
    }

    #[test]
    fn label_prefers_display_name() {
        let region = Region {
            region_id: "r1".to_string(),
            geography_level: GeographyLevel::City,
            region_name: "Austin".to_string(),
            display_name: Some("Austin, TX".to_string()),
            state: Some("TX".to_string()),
            state_name: Some("Texas".to_string()),
            city: Some("Austin".to_string()),
            county: None,
            metro: None,
            size_rank: Some(25),
        };
        assert_eq!(region.label(), "Austin, TX");
    }

    #[test]
    fn label_composes_city_with_state() {
        let region = Region {
            region_id: "r1".to_string(),
            geography_level: GeographyLevel::City,
            region_name: "Austin".to_string(),
            display_name: None,
            state: Some("TX".to_string()),
            state_name: Some("Texas".to_string()),
            city: Some("Austin".to_string()),
            county: None,
            metro: None,
            size_rank: None,
        };
        assert_eq!(region.label(), "Austin, TX");
    }
}
