#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Conversational tool surface for the housing market data.
//!
//! Exposes the tool definitions an LLM agent mounts and the executor
//! functions behind them. The agent loop itself is an external
//! collaborator; this crate only resolves locations and assembles the
//! same trend+summary shape the single-region trend endpoint returns.

use market_pulse_derive::score::{MarketHealthScore, health_score};
use market_pulse_derive::{estimate_days_on_market, estimate_months_of_supply};
use market_pulse_metrics::{MetricsError, series, snapshot};
use market_pulse_metrics_models::{
    DEFAULT_WINDOW_MONTHS, MarketSnapshot, SeriesFilters, TrendPoint,
};
use market_pulse_regions::{RegionError, resolver};
use market_pulse_regions_models::{GeographyLevel, Region};
use serde::Serialize;
use switchy_database::Database;
use thiserror::Error;

/// Match cap for the `search_regions` tool when the agent omits `limit`.
const DEFAULT_SEARCH_MATCHES: u32 = 10;

/// Errors that can occur while executing a chat tool.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Region resolution failed.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// Metric aggregation failed.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// A successful market lookup: the resolved region with its summary,
/// health score, heuristic estimates, and trend rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketLookup {
    /// The region the free-text location resolved to.
    pub region: Region,
    /// Latest market summary.
    pub summary: MarketSnapshot,
    /// Composite 0-100 health score with category breakdown.
    pub health_score: MarketHealthScore,
    /// Estimated months of supply (heuristic, from inventory momentum).
    pub months_of_supply_estimate: Option<f64>,
    /// Estimated days on market (heuristic, from value momentum).
    pub days_on_market_estimate: Option<u32>,
    /// Home value and rent trend rows.
    pub trend: Vec<TrendPoint>,
}

/// Outcome of a market lookup. Serializes either as the full lookup or as
/// an `{error}` object the agent can surface verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarketLookupResult {
    /// The location resolved to a region with data.
    Found(Box<MarketLookup>),
    /// No region matched the location.
    NoMatch {
        /// User-facing explanation.
        error: String,
    },
}

/// Resolves a free-text location and assembles its market overview.
///
/// "No region found" is a normal outcome carried in the result, not an
/// error — only database failures surface as [`ChatError`].
///
/// # Errors
///
/// Returns [`ChatError`] if a database operation fails.
pub async fn market_lookup(
    db: &dyn Database,
    location: &str,
) -> Result<MarketLookupResult, ChatError> {
    let Some(region) = resolver::resolve_one(db, location).await? else {
        return Ok(MarketLookupResult::NoMatch {
            error: format!("No region found matching \"{location}\". Try a more specific name."),
        });
    };

    log::debug!(
        "resolved location '{location}' to region {} ({})",
        region.region_id,
        region.geography_level
    );

    let summary = snapshot::market_overview(db, &region.region_id)
        .await?
        .unwrap_or_else(|| empty_summary(&region.region_id));

    let filters = SeriesFilters::default();
    let trend = snapshot::trend_points(db, &region.region_id, &filters).await?;

    let inventory = series::inventory_series(db, &region.region_id, DEFAULT_WINDOW_MONTHS).await?;
    let inventory_yoy = market_pulse_derive::derive_points(&inventory)
        .last()
        .and_then(|p| p.yoy_change_pct);

    let health = health_score(
        summary.home_value_yoy_pct,
        summary.rent_yoy_pct,
        summary.price_to_rent,
        summary.rent_yield_pct,
    );

    Ok(MarketLookupResult::Found(Box::new(MarketLookup {
        months_of_supply_estimate: estimate_months_of_supply(inventory_yoy),
        days_on_market_estimate: estimate_days_on_market(
            summary.home_value_yoy_pct,
            summary.home_value_mom_pct,
        ),
        health_score: health,
        region,
        summary,
        trend,
    })))
}

/// Executes the `search_regions` tool: directory search by partial name
/// with optional level scoping. Invalid level strings are ignored the
/// same way the search endpoint ignores them, so the agent never has to
/// retry over a typoed filter.
///
/// # Errors
///
/// Returns [`ChatError`] if a database operation fails.
pub async fn search_regions(
    db: &dyn Database,
    query: &str,
    level: Option<&str>,
    limit: Option<u32>,
) -> Result<Vec<Region>, ChatError> {
    let level = GeographyLevel::parse_filter(level);
    let limit = limit.unwrap_or(DEFAULT_SEARCH_MATCHES);
    Ok(resolver::search(db, query, level, limit).await?)
}

fn empty_summary(region_id: &str) -> MarketSnapshot {
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

/// Returns the JSON Schema definitions for the tools the agent can mount.
#[must_use]
pub fn tool_definitions() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({
            "name": "market_lookup",
            "description": "Look up the housing market for a location named in natural language (e.g., 'Austin, TX', 'California'). Resolves the location to a region and returns the latest home value, rent, year-over-year changes, price-to-rent ratio, market classification, health score, and recent trend. Returns an error field if no region matches.",
            "parameters": {
                "type": "object",
                "properties": {
                    "location": { "type": "string", "description": "Place name to look up (city, metro, county, state, or ZIP)" }
                },
                "required": ["location"]
            }
        }),
        serde_json::json!({
            "name": "search_regions",
            "description": "Search the region directory by name. Use this when a location is ambiguous or the user wants to pick between matches. Returns ranked matches, highest-level geographies first.",
            "parameters": {
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Partial or full place name" },
                    "level": { "type": "string", "description": "Optional geography level filter: National, State, Metro, County, City, Zip" },
                    "limit": { "type": "integer", "description": "Maximum matches to return (default 10)" }
                },
                "required": ["query"]
            }
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_match_serializes_as_error_object() {
        let outcome = MarketLookupResult::NoMatch {
            error: "No region found matching \"Atlantis\". Try a more specific name.".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("error").is_some());
        assert!(json.get("region").is_none());
    }

    #[test]
    fn tool_definitions_cover_both_tools() {
        let tools = tool_definitions();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], "market_lookup");
        assert_eq!(
            tools[0]["parameters"]["required"],
            serde_json::json!(["location"])
        );
        assert_eq!(tools[1]["name"], "search_regions");
        assert_eq!(
            tools[1]["parameters"]["required"],
            serde_json::json!(["query"])
        );
    }

    #[test]
    fn search_definition_documents_the_default_limit() {
        let tools = tool_definitions();
        let limit_doc = tools[1]["parameters"]["properties"]["limit"]["description"]
            .as_str()
            .unwrap_or_default();
        assert!(limit_doc.contains(&format!("default {DEFAULT_SEARCH_MATCHES}")));
    }
}
