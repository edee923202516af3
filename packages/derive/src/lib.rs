#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure derived-metric calculations over already-fetched series.
//!
//! No I/O lives here. Every function is total: missing or zero inputs
//! produce `None` (or a zero category contribution for the health score),
//! never `NaN`, `Infinity`, or a panic, so partial data can flow through
//! to a response unchanged.
//!
//! The months-of-supply and days-on-market figures are heuristic proxies
//! derived from inventory momentum in the absence of sales-volume data.
//! They are exposed through `estimate_`-prefixed functions to make that
//! explicit to downstream consumers.

pub mod score;

use market_pulse_metrics_models::{DerivedPoint, MarketClassification, SeriesPoint};
use serde::{Deserialize, Serialize};

/// Assumed baseline monthly turnover of for-sale inventory.
pub const BASE_TURNOVER_RATE: f64 = 0.06;

/// How strongly inventory YoY momentum dampens the turnover rate.
pub const TURNOVER_YOY_DAMPING: f64 = 0.5;

/// Clamp bounds for the adjusted monthly turnover rate.
pub const TURNOVER_MIN: f64 = 0.02;
/// Upper clamp bound for the adjusted monthly turnover rate.
pub const TURNOVER_MAX: f64 = 0.15;

/// Baseline estimated days on market.
pub const DOM_BASE: f64 = 30.0;
/// Weight of home-value YoY change in the days-on-market estimate.
pub const DOM_YOY_WEIGHT: f64 = 0.5;
/// Weight of home-value MoM change in the days-on-market estimate.
pub const DOM_MOM_WEIGHT: f64 = 2.0;
/// Clamp bounds for estimated days on market.
pub const DOM_MIN: f64 = 10.0;
/// Upper clamp bound for estimated days on market.
pub const DOM_MAX: f64 = 120.0;

/// Home-value YoY threshold above which a market classifies as Hot
/// (strict).
pub const HOT_YOY_THRESHOLD: f64 = 10.0;
/// Home-value YoY threshold at or above which a market classifies as
/// Warm.
pub const WARM_YOY_THRESHOLD: f64 = 3.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percent change from `previous` to `current`, rounded to two decimals.
///
/// `None` when the predecessor is missing or zero — never `NaN` or
/// `Infinity`.
#[must_use]
pub fn pct_change(current: f64, previous: Option<f64>) -> Option<f64> {
    let previous = previous?;
    if previous == 0.0 {
        return None;
    }
    let change = (current - previous) / previous * 100.0;
    change.is_finite().then(|| round2(change))
}

/// Pairs each observation with its lag-1 (MoM) and lag-12 (YoY)
/// predecessor within the same filtered series.
///
/// The input must already be sorted by date ascending, which is how the
/// aggregator returns it. Points without a predecessor at the required lag
/// carry `None`.
#[must_use]
pub fn derive_points(series: &[SeriesPoint]) -> Vec<DerivedPoint> {
    series
        .iter()
        .enumerate()
        .map(|(i, point)| DerivedPoint {
            date: point.date,
            value: point.value,
            mom_change_pct: pct_change(
                point.value,
                i.checked_sub(1).map(|prev| series[prev].value),
            ),
            yoy_change_pct: pct_change(
                point.value,
                i.checked_sub(12).map(|prev| series[prev].value),
            ),
        })
        .collect()
}

/// Price-to-rent ratio: home value over annualized rent, one decimal.
///
/// `None` when either input is missing or rent is not positive.
#[must_use]
pub fn price_to_rent_ratio(home_value: Option<f64>, rent_value: Option<f64>) -> Option<f64> {
    let home_value = home_value?;
    let rent = rent_value?;
    if rent <= 0.0 {
        return None;
    }
    let ratio = home_value / (rent * 12.0);
    ratio.is_finite().then(|| round1(ratio))
}

/// Interpretation band for a price-to-rent ratio. Used consistently
/// everywhere the ratio is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceToRentBand {
    /// Ratio below 15: buying is favored.
    BuyFavorable,
    /// Ratio between 15 and 20.
    Neutral,
    /// Ratio above 20: renting is favored.
    RentFavorable,
}

impl PriceToRentBand {
    /// Classifies a ratio into its interpretation band.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 15.0 {
            Self::BuyFavorable
        } else if ratio <= 20.0 {
            Self::Neutral
        } else {
            Self::RentFavorable
        }
    }
}

/// Gross rent yield: annualized rent as a percentage of home value, two
/// decimals.
///
/// `None` when either input is missing or home value is not positive.
#[must_use]
pub fn gross_rent_yield(monthly_rent: Option<f64>, home_value: Option<f64>) -> Option<f64> {
    let rent = monthly_rent?;
    let home_value = home_value?;
    if home_value <= 0.0 {
        return None;
    }
    let yield_pct = rent * 12.0 / home_value * 100.0;
    yield_pct.is_finite().then(|| round2(yield_pct))
}

/// Classifies a market from its home-value YoY change.
///
/// Hot requires strictly more than 10%; exactly 10.0% is Warm. Unknown
/// YoY classifies as Cold.
#[must_use]
pub fn classify_market(home_value_yoy_pct: Option<f64>) -> MarketClassification {
    match home_value_yoy_pct {
        Some(yoy) if yoy > HOT_YOY_THRESHOLD => MarketClassification::Hot,
        Some(yoy) if yoy >= WARM_YOY_THRESHOLD => MarketClassification::Warm,
        _ => MarketClassification::Cold,
    }
}

/// Estimates months of supply from inventory YoY momentum, one decimal.
///
/// Rising inventory implies slowing turnover, so the baseline monthly
/// turnover rate is dampened by half the YoY change and clamped to
/// [`TURNOVER_MIN`], [`TURNOVER_MAX`]. This is a proxy in the absence of
/// sales-volume data, not a measured quantity.
#[must_use]
pub fn estimate_months_of_supply(inventory_yoy_pct: Option<f64>) -> Option<f64> {
    let yoy = inventory_yoy_pct?;
    let adjusted = BASE_TURNOVER_RATE * (1.0 - (yoy / 100.0) * TURNOVER_YOY_DAMPING);
    let adjusted = adjusted.clamp(TURNOVER_MIN, TURNOVER_MAX);
    Some(round1(1.0 / adjusted))
}

/// Estimates days on market from home-value momentum, clamped to
/// [`DOM_MIN`], [`DOM_MAX`] and rounded to the nearest day.
///
/// A missing component contributes nothing; `None` only when both are
/// missing. Same proxy caveat as [`estimate_months_of_supply`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_days_on_market(
    home_value_yoy_pct: Option<f64>,
    home_value_mom_pct: Option<f64>,
) -> Option<u32> {
    if home_value_yoy_pct.is_none() && home_value_mom_pct.is_none() {
        return None;
    }
    let yoy = home_value_yoy_pct.unwrap_or(0.0);
    let mom = home_value_mom_pct.unwrap_or(0.0);
    let dom = DOM_MOM_WEIGHT.mul_add(mom, DOM_YOY_WEIGHT.mul_add(yoy, DOM_BASE));
    Some(dom.clamp(DOM_MIN, DOM_MAX).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use market_pulse_metrics_models::MarketClassification;

    fn date(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn series(values: &[f64]) -> Vec<SeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| SeriesPoint {
                #[allow(clippy::cast_possible_truncation)]
                date: date(2024, 1).checked_add_months(chrono::Months::new(i as u32)).unwrap(),
                value,
            })
            .collect()
    }

    #[test]
    fn pct_change_rounds_to_two_decimals() {
        assert_eq!(pct_change(103.0, Some(100.0)), Some(3.0));
        assert_eq!(pct_change(100.0, Some(300.0)), Some(-66.67));
    }

    #[test]
    fn pct_change_null_on_missing_or_zero_predecessor() {
        assert_eq!(pct_change(100.0, None), None);
        assert_eq!(pct_change(100.0, Some(0.0)), None);
    }

    #[test]
    fn derive_points_lags_one_and_twelve() {
        let values: Vec<f64> = (0..14).map(|i| 100.0 + f64::from(i)).collect();
        let derived = derive_points(&series(&values));

        assert_eq!(derived[0].mom_change_pct, None);
        assert_eq!(derived[0].yoy_change_pct, None);
        assert_eq!(derived[1].mom_change_pct, Some(1.0));
        assert_eq!(derived[11].yoy_change_pct, None);
        // index 12 pairs with index 0: (112 - 100) / 100
        assert_eq!(derived[12].yoy_change_pct, Some(12.0));
        assert_eq!(derived[13].yoy_change_pct, Some(11.88));
    }

    #[test]
    fn derive_points_never_produce_nan_or_infinity() {
        let derived = derive_points(&series(&[0.0, 5.0, 0.0, 3.0]));
        assert_eq!(derived[1].mom_change_pct, None);
        assert_eq!(derived[3].mom_change_pct, None);
        for point in derived {
            if let Some(change) = point.mom_change_pct {
                assert!(change.is_finite());
            }
        }
    }

    #[test]
    fn price_to_rent_matches_band_fixture() {
        // 400000 / (2000 * 12) = 16.666... -> 16.7, neutral band
        let ratio = price_to_rent_ratio(Some(400_000.0), Some(2_000.0)).unwrap();
        assert!((ratio - 16.7).abs() < f64::EPSILON);
        assert_eq!(PriceToRentBand::from_ratio(ratio), PriceToRentBand::Neutral);
    }

    #[test]
    fn price_to_rent_null_on_bad_inputs() {
        assert_eq!(price_to_rent_ratio(None, Some(2_000.0)), None);
        assert_eq!(price_to_rent_ratio(Some(400_000.0), None), None);
        assert_eq!(price_to_rent_ratio(Some(400_000.0), Some(0.0)), None);
        assert_eq!(price_to_rent_ratio(Some(400_000.0), Some(-5.0)), None);
    }

    #[test]
    fn price_to_rent_bands() {
        assert_eq!(PriceToRentBand::from_ratio(14.9), PriceToRentBand::BuyFavorable);
        assert_eq!(PriceToRentBand::from_ratio(15.0), PriceToRentBand::Neutral);
        assert_eq!(PriceToRentBand::from_ratio(20.0), PriceToRentBand::Neutral);
        assert_eq!(PriceToRentBand::from_ratio(20.1), PriceToRentBand::RentFavorable);
    }

    #[test]
    fn rent_yield_computes_percent() {
        assert_eq!(gross_rent_yield(Some(2_000.0), Some(400_000.0)), Some(6.0));
        assert_eq!(gross_rent_yield(Some(2_000.0), Some(0.0)), None);
        assert_eq!(gross_rent_yield(None, Some(400_000.0)), None);
    }

    #[test]
    fn classification_boundary_at_ten_percent() {
        assert_eq!(classify_market(Some(10.0)), MarketClassification::Warm);
        assert_eq!(classify_market(Some(10.01)), MarketClassification::Hot);
        assert_eq!(classify_market(Some(3.0)), MarketClassification::Warm);
        assert_eq!(classify_market(Some(2.99)), MarketClassification::Cold);
        assert_eq!(classify_market(None), MarketClassification::Cold);
    }

    #[test]
    fn months_of_supply_clamps_extreme_inventory_growth() {
        // +200% YoY drives the raw adjusted turnover negative; the floor
        // clamp must produce exactly 1 / 0.02 = 50.0.
        assert_eq!(estimate_months_of_supply(Some(200.0)), Some(50.0));
    }

    #[test]
    fn months_of_supply_clamps_collapsing_inventory() {
        // Large negative YoY pushes turnover above the ceiling: 1 / 0.15.
        assert_eq!(estimate_months_of_supply(Some(-400.0)), Some(6.7));
    }

    #[test]
    fn months_of_supply_baseline() {
        // Flat inventory: 1 / 0.06 = 16.666... -> 16.7
        assert_eq!(estimate_months_of_supply(Some(0.0)), Some(16.7));
        assert_eq!(estimate_months_of_supply(None), None);
    }

    #[test]
    fn days_on_market_clamps_and_rounds() {
        assert_eq!(estimate_days_on_market(Some(0.0), Some(0.0)), Some(30));
        assert_eq!(estimate_days_on_market(Some(10.0), Some(2.0)), Some(39));
        // 30 + 50 + 60 = 140 caps at the ceiling.
        assert_eq!(estimate_days_on_market(Some(100.0), Some(30.0)), Some(120));
        // 30 - 5 - 40 = -15 bottoms out at the floor.
        assert_eq!(estimate_days_on_market(Some(-10.0), Some(-20.0)), Some(10));
        assert_eq!(estimate_days_on_market(None, None), None);
        assert_eq!(estimate_days_on_market(Some(4.0), None), Some(32));
    }
}
