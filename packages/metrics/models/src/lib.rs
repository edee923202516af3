#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Metric dimension, filter, and time-series point types.
//!
//! Every dimensional filter the aggregator accepts is an allow-listed enum
//! defined here, and the shared defaults live in one [`SeriesFilters`]
//! object so endpoints that are supposed to share semantics cannot drift.
//! Raw caller strings are parsed into these types at the boundary; query
//! construction never sees an unvalidated string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Metric families served by the aggregator. Used for logging context and
/// error messages, not as a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricFamily {
    /// Smoothed, seasonally-adjusted typical home value (ZHVI-like).
    HomeValue,
    /// Smoothed, seasonally-adjusted typical observed rent (ZORI-like).
    Rent,
    /// For-sale inventory counts.
    Inventory,
    /// Affordability payment/income series.
    Affordability,
    /// Composite 0-100 seller's-market heat index.
    HeatIndex,
}

/// Error returned when a caller-supplied filter value is outside its
/// allow-list. Carries the valid options for the 400 response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFilterError {
    /// Which filter was invalid (e.g. "homeType").
    pub field: &'static str,
    /// The rejected value.
    pub value: String,
    /// The allow-listed options.
    pub allowed: &'static [&'static str],
}

impl std::fmt::Display for InvalidFilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} '{}': expected one of {}",
            self.field,
            self.value,
            self.allowed.join(", ")
        )
    }
}

impl std::error::Error for InvalidFilterError {}

/// Property type segment for home-value series.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum HomeType {
    /// All property types combined.
    #[serde(rename = "All Homes")]
    #[strum(serialize = "All Homes")]
    AllHomes,
    /// Single-family detached homes.
    #[serde(rename = "Single Family")]
    #[strum(serialize = "Single Family")]
    SingleFamily,
    /// Condominiums and co-ops.
    #[serde(rename = "Condo")]
    #[strum(serialize = "Condo")]
    Condo,
    /// Multi-family buildings.
    #[serde(rename = "Multi Family")]
    #[strum(serialize = "Multi Family")]
    MultiFamily,
}

impl HomeType {
    /// Allow-listed wire values, for error messages.
    pub const ALLOWED: &'static [&'static str] =
        &["All Homes", "Single Family", "Condo", "Multi Family"];

    /// Parses an optional caller-supplied value, defaulting to
    /// [`Self::AllHomes`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFilterError`] when the value is not allow-listed.
    pub fn from_param(value: Option<&str>) -> Result<Self, InvalidFilterError> {
        match value {
            None => Ok(Self::AllHomes),
            Some(v) => v.parse().map_err(|_| InvalidFilterError {
                field: "homeType",
                value: v.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Price-percentile tier for home-value series.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum PriceTier {
    /// Bottom third of the price distribution.
    #[serde(rename = "Bottom-Tier")]
    #[strum(serialize = "Bottom-Tier")]
    BottomTier,
    /// Middle third (the headline series).
    #[serde(rename = "Mid-Tier")]
    #[strum(serialize = "Mid-Tier")]
    MidTier,
    /// Top third.
    #[serde(rename = "Top-Tier")]
    #[strum(serialize = "Top-Tier")]
    TopTier,
}

impl PriceTier {
    /// Allow-listed wire values, for error messages.
    pub const ALLOWED: &'static [&'static str] = &["Bottom-Tier", "Mid-Tier", "Top-Tier"];

    /// Parses an optional caller-supplied value, defaulting to
    /// [`Self::MidTier`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFilterError`] when the value is not allow-listed.
    pub fn from_param(value: Option<&str>) -> Result<Self, InvalidFilterError> {
        match value {
            None => Ok(Self::MidTier),
            Some(v) => v.parse().map_err(|_| InvalidFilterError {
                field: "tier",
                value: v.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Affordability series variants.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AffordabilityMetric {
    /// Monthly principal + interest on a typical home.
    MortgagePayment,
    /// Mortgage plus taxes and insurance.
    TotalMonthlyPayment,
    /// Income needed to afford the typical home.
    HomeownerIncomeNeeded,
    /// Income needed to afford the typical rent.
    RenterIncomeNeeded,
}

impl AffordabilityMetric {
    /// Allow-listed wire values, for error messages.
    pub const ALLOWED: &'static [&'static str] = &[
        "mortgage_payment",
        "total_monthly_payment",
        "homeowner_income_needed",
        "renter_income_needed",
    ];

    /// Whether this metric is crossed with a down-payment percentage.
    #[must_use]
    pub const fn has_down_payment(self) -> bool {
        matches!(self, Self::MortgagePayment | Self::TotalMonthlyPayment)
    }

    /// Parses a caller-supplied value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFilterError`] when the value is not allow-listed.
    pub fn from_param(value: &str) -> Result<Self, InvalidFilterError> {
        value.parse().map_err(|_| InvalidFilterError {
            field: "metricType",
            value: value.to_string(),
            allowed: Self::ALLOWED,
        })
    }
}

/// Down-payment percentages available for the payment-type affordability
/// series.
pub const DOWN_PAYMENT_OPTIONS: [u8; 3] = [5, 10, 20];

/// Default down payment when none is requested.
pub const DEFAULT_DOWN_PAYMENT_PCT: u8 = 20;

/// Bedroom counts available for bedroom-specific home-value cuts. Bedroom
/// cuts are not crossed with tier or home type in the source data.
pub const BEDROOM_OPTIONS: [u8; 5] = [1, 2, 3, 4, 5];

/// Date windows accepted by trend endpoints, in months.
pub const WINDOW_OPTIONS: [u32; 5] = [12, 24, 36, 60, 120];

/// Default window for trend endpoints.
pub const DEFAULT_WINDOW_MONTHS: u32 = 60;

/// Default window for bedroom and property-type cut endpoints.
pub const DEFAULT_CUT_WINDOW_MONTHS: u32 = 24;

/// Returns the requested window when allow-listed, otherwise the call
/// site's default. Out-of-list windows fall back rather than erroring.
#[must_use]
pub fn window_or_default(requested: Option<u32>, default: u32) -> u32 {
    match requested {
        Some(months) if WINDOW_OPTIONS.contains(&months) => months,
        _ => default,
    }
}

/// Consolidated dimensional filters for home-value series, with the shared
/// defaults every endpoint uses. One instance of this struct is built per
/// request at the boundary and passed down; the aggregator never re-derives
/// defaults per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesFilters {
    /// Property type segment.
    pub home_type: HomeType,
    /// Price tier.
    pub tier: PriceTier,
    /// Bedroom count for bedroom-specific cuts. When set, `tier` and
    /// `home_type` are pinned to Mid-Tier / All Homes by
    /// [`Self::bedroom_cut`].
    pub bedrooms: Option<u8>,
    /// Smoothed series flag.
    pub smoothed: bool,
    /// Seasonally-adjusted series flag.
    pub seasonally_adjusted: bool,
    /// Date window in months.
    pub window_months: u32,
}

impl Default for SeriesFilters {
    fn default() -> Self {
        Self {
            home_type: HomeType::AllHomes,
            tier: PriceTier::MidTier,
            bedrooms: None,
            smoothed: true,
            seasonally_adjusted: true,
            window_months: DEFAULT_WINDOW_MONTHS,
        }
    }
}

impl SeriesFilters {
    /// Builds filters from raw caller parameters.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFilterError`] when `home_type` or `tier` is outside
    /// its allow-list.
    pub fn from_params(
        home_type: Option<&str>,
        tier: Option<&str>,
        months: Option<u32>,
    ) -> Result<Self, InvalidFilterError> {
        Ok(Self {
            home_type: HomeType::from_param(home_type)?,
            tier: PriceTier::from_param(tier)?,
            bedrooms: None,
            smoothed: true,
            seasonally_adjusted: true,
            window_months: window_or_default(months, DEFAULT_WINDOW_MONTHS),
        })
    }

    /// Builds a bedroom-cut filter. Bedroom cuts pin tier and home type to
    /// the aggregate series.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFilterError`] when `bedrooms` is outside 1-5.
    pub fn bedroom_cut(bedrooms: u8, months: Option<u32>) -> Result<Self, InvalidFilterError> {
        if !BEDROOM_OPTIONS.contains(&bedrooms) {
            return Err(InvalidFilterError {
                field: "bedrooms",
                value: bedrooms.to_string(),
                allowed: &["1", "2", "3", "4", "5"],
            });
        }
        Ok(Self {
            bedrooms: Some(bedrooms),
            window_months: window_or_default(months, DEFAULT_CUT_WINDOW_MONTHS),
            ..Self::default()
        })
    }
}

/// Allow-listed sort keys for the rankings endpoint.
///
/// Each key maps to exactly one snapshot column through [`Self::column`];
/// raw caller strings never reach query construction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortKey {
    /// Latest typical home value.
    HomeValue,
    /// Home value year-over-year change.
    HomeValueYoy,
    /// Latest typical rent.
    RentValue,
    /// Rent year-over-year change.
    RentYoy,
    /// Price-to-rent ratio.
    PriceToRent,
    /// Gross rent yield.
    RentYield,
}

impl SortKey {
    /// Allow-listed wire values, for error messages.
    pub const ALLOWED: &'static [&'static str] = &[
        "homeValue",
        "homeValueYoy",
        "rentValue",
        "rentYoy",
        "priceToRent",
        "rentYield",
    ];

    /// The `market_summary` column this key sorts on.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::HomeValue => "home_value",
            Self::HomeValueYoy => "home_value_yoy_pct",
            Self::RentValue => "rent_value",
            Self::RentYoy => "rent_yoy_pct",
            Self::PriceToRent => "price_to_rent",
            Self::RentYield => "rent_yield_pct",
        }
    }

    /// Parses a caller-supplied sort key.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFilterError`] when the value is not allow-listed.
    pub fn from_param(value: &str) -> Result<Self, InvalidFilterError> {
        value.parse().map_err(|_| InvalidFilterError {
            field: "sortBy",
            value: value.to_string(),
            allowed: Self::ALLOWED,
        })
    }
}

/// Sort direction for rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parses an optional caller-supplied order, defaulting to descending.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or(Self::Desc)
    }
}

/// A single dated observation from one filtered series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Observed value.
    pub value: f64,
}

/// A series point paired with its lag-1 and lag-12 percent changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedPoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Observed value.
    pub value: f64,
    /// Month-over-month percent change; null without a usable predecessor.
    pub mom_change_pct: Option<f64>,
    /// Year-over-year percent change; null without a usable predecessor.
    pub yoy_change_pct: Option<f64>,
}

/// One row of the single-region trend endpoint: home value and rent at a
/// date with the derived month-over-month change and price-to-rent ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Typical home value, when observed this month.
    pub home_value: Option<f64>,
    /// Typical rent, when observed this month.
    pub rent_value: Option<f64>,
    /// Home-value month-over-month percent change.
    pub mom_change_pct: Option<f64>,
    /// Price-to-rent ratio, when both inputs are present.
    pub price_to_rent_ratio: Option<f64>,
}

/// Hot/Warm/Cold market classification derived from home-value YoY.
///
/// Hot requires strictly more than 10% appreciation; exactly 10.0% is
/// Warm.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum MarketClassification {
    /// YoY appreciation above 10%.
    Hot,
    /// YoY appreciation between 3% and 10%.
    Warm,
    /// YoY appreciation below 3%, or unknown.
    Cold,
}

/// One region's market summary snapshot: latest values, deltas, and the
/// derived classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// Region identifier.
    pub region_id: String,
    /// Date of the latest underlying observations.
    pub as_of: Option<NaiveDate>,
    /// Latest typical home value.
    pub home_value: Option<f64>,
    /// Home value year-over-year percent change.
    pub home_value_yoy_pct: Option<f64>,
    /// Home value month-over-month percent change.
    pub home_value_mom_pct: Option<f64>,
    /// Latest typical rent.
    pub rent_value: Option<f64>,
    /// Rent year-over-year percent change.
    pub rent_yoy_pct: Option<f64>,
    /// Rent month-over-month percent change.
    pub rent_mom_pct: Option<f64>,
    /// Price-to-rent ratio, one decimal.
    pub price_to_rent: Option<f64>,
    /// Gross rent yield percent.
    pub rent_yield_pct: Option<f64>,
    /// Hot/Warm/Cold classification from home-value YoY.
    pub classification: MarketClassification,
}

/// A snapshot annotated with its rank and region labels for the rankings
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSnapshot {
    /// 1-based rank under the requested sort.
    pub rank: u32,
    /// Region display label.
    pub region_name: String,
    /// Two-letter state code, when level-appropriate.
    pub state: Option<String>,
    /// Snapshot fields, including the region identifier.
    #[serde(flatten)]
    pub snapshot: MarketSnapshot,
}

/// One dated value from an affordability series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityPoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Metric variant.
    pub metric_type: AffordabilityMetric,
    /// Down-payment percentage for payment-type metrics.
    pub down_payment_pct: Option<u8>,
    /// Observed value (dollars).
    pub value: f64,
}

/// Latest income-needed reading for one region in the multi-region
/// affordability summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilitySummaryRow {
    /// Region identifier.
    pub region_id: String,
    /// Region display label.
    pub region_name: String,
    /// Latest observation date.
    pub date: NaiveDate,
    /// Income needed to afford the typical home.
    pub homeowner_income_needed: f64,
}

/// Latest inventory reading for a region, used by the level summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    /// Region identifier.
    pub region_id: String,
    /// Region display label.
    pub region_name: String,
    /// Latest observation date.
    pub date: NaiveDate,
    /// Homes listed for sale.
    pub for_sale_count: f64,
    /// New listings this month, when reported.
    pub new_listings: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_type_defaults_to_all_homes() {
        assert_eq!(HomeType::from_param(None).unwrap(), HomeType::AllHomes);
    }

    #[test]
    fn home_type_parses_wire_values() {
        assert_eq!(
            HomeType::from_param(Some("Single Family")).unwrap(),
            HomeType::SingleFamily
        );
    }

    #[test]
    fn home_type_rejects_unknown_value() {
        let err = HomeType::from_param(Some("Houseboat")).unwrap_err();
        assert_eq!(err.field, "homeType");
        assert!(err.to_string().contains("All Homes"));
    }

    #[test]
    fn tier_defaults_to_mid() {
        assert_eq!(PriceTier::from_param(None).unwrap(), PriceTier::MidTier);
    }

    #[test]
    fn window_falls_back_on_out_of_list_value() {
        assert_eq!(window_or_default(Some(13), DEFAULT_WINDOW_MONTHS), 60);
        assert_eq!(window_or_default(Some(24), DEFAULT_WINDOW_MONTHS), 24);
        assert_eq!(window_or_default(None, DEFAULT_CUT_WINDOW_MONTHS), 24);
    }

    #[test]
    fn bedroom_cut_pins_tier_and_home_type() {
        let filters = SeriesFilters::bedroom_cut(3, None).unwrap();
        assert_eq!(filters.home_type, HomeType::AllHomes);
        assert_eq!(filters.tier, PriceTier::MidTier);
        assert_eq!(filters.bedrooms, Some(3));
        assert_eq!(filters.window_months, DEFAULT_CUT_WINDOW_MONTHS);
    }

    #[test]
    fn bedroom_cut_rejects_out_of_range() {
        assert!(SeriesFilters::bedroom_cut(6, None).is_err());
        assert!(SeriesFilters::bedroom_cut(0, None).is_err());
    }

    #[test]
    fn sort_key_maps_to_fixed_columns() {
        assert_eq!(SortKey::from_param("homeValueYoy").unwrap().column(), "home_value_yoy_pct");
        assert_eq!(SortKey::from_param("priceToRent").unwrap().column(), "price_to_rent");
    }

    #[test]
    fn sort_key_rejects_raw_column_injection() {
        assert!(SortKey::from_param("home_value; DROP TABLE regions").is_err());
    }

    #[test]
    fn sort_order_defaults_to_desc() {
        assert_eq!(SortOrder::from_param(None), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("sideways")), SortOrder::Desc);
    }
}
