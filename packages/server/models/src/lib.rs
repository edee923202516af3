#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the market pulse server.
//!
//! These types define the JSON contract the dashboard UI and the chat
//! agent depend on; field names are load-bearing. They are separate from
//! the internal row types to allow independent evolution of the API.

use std::collections::BTreeMap;

use market_pulse_compare::ComparisonBundle;
use market_pulse_metrics_models::{
    AffordabilityPoint, AffordabilitySummaryRow, DerivedPoint, InventorySnapshot, MarketSnapshot,
    RankedSnapshot, SeriesFilters, SeriesPoint, TrendPoint,
};
use market_pulse_regions_models::Region;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is up.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Query parameters for region search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryParams {
    /// Free-text query.
    pub q: Option<String>,
    /// Optional geography level filter; invalid values are ignored.
    pub level: Option<String>,
    /// Maximum results (default 10).
    pub limit: Option<u32>,
}

/// Region search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Ranked matches.
    pub results: Vec<Region>,
}

/// Query parameters for the single-region trend endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendQueryParams {
    /// Region identifier.
    pub region_id: String,
    /// Property type filter (allow-listed).
    pub home_type: Option<String>,
    /// Price tier filter (allow-listed).
    pub tier: Option<String>,
    /// Date window in months (allow-listed, falls back to default).
    pub months: Option<u32>,
}

/// Single-region trend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse {
    /// Trend rows, date ascending.
    pub data: Vec<TrendPoint>,
    /// The filters the series was resolved under, echoed back.
    pub filters: SeriesFilters,
}

/// Query parameters for the market overview endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewQueryParams {
    /// Region identifier.
    pub region_id: String,
}

/// Market overview response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    /// The region's snapshot.
    pub data: MarketSnapshot,
}

/// Query parameters for the rankings endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsQueryParams {
    /// Sort column (allow-listed).
    pub sort_by: Option<String>,
    /// Sort direction, `asc` or `desc` (default desc).
    pub order: Option<String>,
    /// Geography level to rank (default Metro).
    pub geography_level: Option<String>,
    /// Maximum rows, capped at 100.
    pub limit: Option<u32>,
}

/// Rankings response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsResponse {
    /// Ranked snapshot rows.
    pub data: Vec<RankedSnapshot>,
}

/// Query parameters for the bedroom and property-type cut endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutQueryParams {
    /// Region identifier.
    pub region_id: String,
    /// Date window in months (allow-listed, falls back to default).
    pub months: Option<u32>,
}

/// One labeled cut series (e.g. "3 BR" or "Condo").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutTrend {
    /// Cut label.
    pub label: String,
    /// Derived points, date ascending.
    pub points: Vec<DerivedPoint>,
}

/// Latest stats for one cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutStat {
    /// Cut label.
    pub label: String,
    /// Latest observed value.
    pub latest_value: Option<f64>,
    /// Latest month-over-month percent change.
    pub mom_change_pct: Option<f64>,
    /// Latest year-over-year percent change.
    pub yoy_change_pct: Option<f64>,
}

/// Bedroom/property-type cut response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutData {
    /// Per-cut trend series.
    pub trends: Vec<CutTrend>,
    /// Per-cut latest stats.
    pub stats: Vec<CutStat>,
}

/// Bedroom/property-type cut response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutResponse {
    /// Cut payload.
    pub data: CutData,
}

/// Query parameters for the affordability endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityQueryParams {
    /// Region for a single-region breakdown.
    pub region_id: Option<String>,
    /// Geography level for the multi-region summary.
    pub geography_level: Option<String>,
    /// Maximum summary rows.
    pub limit: Option<u32>,
    /// Restrict the breakdown to a single metric (allow-listed).
    pub metric_type: Option<String>,
    /// Down-payment percentage for payment metrics (5, 10, or 20).
    pub down_payment_pct: Option<u8>,
    /// Date window in months.
    pub months: Option<u32>,
}

/// One metric's series within a region affordability breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityBreakdown {
    /// Metric variant name.
    pub metric_type: String,
    /// Down-payment percentage for payment metrics.
    pub down_payment_pct: Option<u8>,
    /// Observed points, date ascending.
    pub points: Vec<AffordabilityPoint>,
}

/// Affordability response: either a region breakdown or a level summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum AffordabilityResponse {
    /// Single-region breakdown across all metric variants.
    Breakdown {
        /// Per-metric series.
        data: Vec<AffordabilityBreakdown>,
    },
    /// Multi-region summary at one geography level.
    Summary {
        /// Per-region latest income-needed rows.
        data: Vec<AffordabilitySummaryRow>,
    },
}

/// Query parameters for the inventory endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQueryParams {
    /// Region for a single-region series.
    pub region_id: Option<String>,
    /// Geography level for the latest-per-region summary.
    pub geography_level: Option<String>,
    /// Maximum summary rows.
    pub limit: Option<u32>,
    /// Date window in months.
    pub months: Option<u32>,
}

/// Inventory response: either a region series or a level summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum InventoryResponse {
    /// For-sale counts for one region, date ascending.
    Series {
        /// Observed points.
        data: Vec<SeriesPoint>,
    },
    /// Latest inventory per region at one geography level.
    Summary {
        /// Per-region latest rows, ordered by for-sale count.
        data: Vec<InventorySnapshot>,
    },
}

/// Query parameters for the market heat endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatQueryParams {
    /// Region identifier.
    pub region_id: String,
    /// Date window in months.
    pub months: Option<u32>,
}

/// Market heat payload: heat index observations plus the house price
/// index series joined through the region's metro or state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatData {
    /// Heat index scores, date ascending.
    pub heat_index: Vec<SeriesPoint>,
    /// House price index values, date ascending; empty when no join
    /// target exists for the region's level.
    pub hpi: Vec<SeriesPoint>,
}

/// Market heat response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatResponse {
    /// Heat payload.
    pub data: HeatData,
}

/// Body of a comparison request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    /// Regions to compare, 1-8, in display order.
    pub region_ids: Vec<String>,
    /// Property type filter (allow-listed).
    pub home_type: Option<String>,
    /// Price tier filter (allow-listed).
    pub tier: Option<String>,
    /// Date window in months.
    pub months: Option<u32>,
    /// Color assignments from a prior selection, for stability across
    /// re-renders.
    #[serde(default)]
    pub prior_colors: BTreeMap<String, String>,
}

/// Comparison response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    /// The assembled bundle.
    pub data: ComparisonBundle,
}

/// Body of a chat lookup request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLookupRequest {
    /// Natural-language place name.
    pub location: String,
}
