//! Composite market health scoring.
//!
//! Four independently-scored 0-25 categories summed into a 0-100 total.
//! Each category uses a fixed non-linear band table; a category whose
//! input is missing contributes 0 points and the denominator stays 100 —
//! no renormalization.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Maximum points a single category can contribute.
pub const CATEGORY_MAX_POINTS: u8 = 25;

/// Qualitative label for a total health score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum HealthLabel {
    /// Total 85 or above.
    Excellent,
    /// Total 70-84.
    Good,
    /// Total 55-69.
    Fair,
    /// Total 40-54.
    Weak,
    /// Total below 40.
    Poor,
}

impl HealthLabel {
    /// Labels a total score.
    #[must_use]
    pub const fn from_total(total: u8) -> Self {
        if total >= 85 {
            Self::Excellent
        } else if total >= 70 {
            Self::Good
        } else if total >= 55 {
            Self::Fair
        } else if total >= 40 {
            Self::Weak
        } else {
            Self::Poor
        }
    }
}

/// Composite 0-100 market health score with its category breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketHealthScore {
    /// Points from home-value appreciation (0-25).
    pub appreciation_pts: u8,
    /// Points from rent growth (0-25).
    pub rent_growth_pts: u8,
    /// Points from the price-to-rent ratio (0-25).
    pub price_to_rent_pts: u8,
    /// Points from gross rent yield (0-25).
    pub rent_yield_pts: u8,
    /// Exact sum of the four categories.
    pub total: u8,
    /// Qualitative label for the total.
    pub label: HealthLabel,
}

/// Scores a market from its four health inputs.
///
/// Missing inputs score 0 for their category rather than being skipped.
#[must_use]
pub fn health_score(
    home_value_yoy_pct: Option<f64>,
    rent_yoy_pct: Option<f64>,
    price_to_rent: Option<f64>,
    rent_yield_pct: Option<f64>,
) -> MarketHealthScore {
    let appreciation_pts = home_value_yoy_pct.map_or(0, appreciation_points);
    let rent_growth_pts = rent_yoy_pct.map_or(0, rent_growth_points);
    let price_to_rent_pts = price_to_rent.map_or(0, price_to_rent_points);
    let rent_yield_pts = rent_yield_pct.map_or(0, rent_yield_points);

    let total = appreciation_pts + rent_growth_pts + price_to_rent_pts + rent_yield_pts;

    MarketHealthScore {
        appreciation_pts,
        rent_growth_pts,
        price_to_rent_pts,
        rent_yield_pts,
        total,
        label: HealthLabel::from_total(total),
    }
}

/// Home-value appreciation band table: steady 3-8% growth scores best;
/// overheated (>12%) and declining markets score lower.
fn appreciation_points(yoy: f64) -> u8 {
    if (3.0..=8.0).contains(&yoy) {
        25
    } else if yoy > 8.0 && yoy <= 12.0 {
        20
    } else if yoy > 12.0 {
        15
    } else if yoy >= 0.0 {
        18
    } else if yoy >= -3.0 {
        10
    } else {
        5
    }
}

/// Rent growth band table: 2-6% is the sweet spot.
fn rent_growth_points(yoy: f64) -> u8 {
    if (2.0..=6.0).contains(&yoy) {
        25
    } else if yoy > 6.0 && yoy <= 10.0 {
        20
    } else if yoy > 10.0 {
        15
    } else if yoy >= 0.0 {
        18
    } else if yoy >= -2.0 {
        12
    } else {
        5
    }
}

/// Price-to-rent band table: lower ratios favor investment.
fn price_to_rent_points(ratio: f64) -> u8 {
    if ratio < 15.0 {
        25
    } else if ratio <= 18.0 {
        22
    } else if ratio <= 20.0 {
        18
    } else if ratio <= 25.0 {
        12
    } else {
        5
    }
}

/// Gross rent yield band table: 8%+ scores best.
fn rent_yield_points(yield_pct: f64) -> u8 {
    if yield_pct >= 8.0 {
        25
    } else if yield_pct >= 6.0 {
        22
    } else if yield_pct >= 5.0 {
        18
    } else if yield_pct >= 4.0 {
        12
    } else {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_exact_sum_of_categories() {
        let score = health_score(Some(5.0), Some(3.0), Some(14.0), Some(9.0));
        assert_eq!(score.appreciation_pts, 25);
        assert_eq!(score.rent_growth_pts, 25);
        assert_eq!(score.price_to_rent_pts, 25);
        assert_eq!(score.rent_yield_pts, 25);
        assert_eq!(score.total, 100);
        assert_eq!(score.label, HealthLabel::Excellent);
    }

    #[test]
    fn total_stays_within_bounds() {
        let combos: [(Option<f64>, Option<f64>, Option<f64>, Option<f64>); 5] = [
            (None, None, None, None),
            (Some(-50.0), Some(-50.0), Some(80.0), Some(0.5)),
            (Some(50.0), Some(50.0), Some(1.0), Some(50.0)),
            (Some(10.0), None, Some(19.0), None),
            (Some(0.0), Some(0.0), Some(20.0), Some(4.0)),
        ];
        for (a, b, c, d) in combos {
            let score = health_score(a, b, c, d);
            assert!(score.total <= 100);
            assert_eq!(
                score.total,
                score.appreciation_pts
                    + score.rent_growth_pts
                    + score.price_to_rent_pts
                    + score.rent_yield_pts
            );
        }
    }

    #[test]
    fn missing_input_scores_zero_not_skipped() {
        let score = health_score(None, Some(3.0), None, None);
        assert_eq!(score.appreciation_pts, 0);
        assert_eq!(score.rent_growth_pts, 25);
        assert_eq!(score.total, 25);
        assert_eq!(score.label, HealthLabel::Poor);
    }

    #[test]
    fn appreciation_band_boundaries() {
        assert_eq!(appreciation_points(3.0), 25);
        assert_eq!(appreciation_points(8.0), 25);
        assert_eq!(appreciation_points(8.01), 20);
        assert_eq!(appreciation_points(12.0), 20);
        assert_eq!(appreciation_points(12.01), 15);
        assert_eq!(appreciation_points(0.0), 18);
        assert_eq!(appreciation_points(-1.0), 10);
        assert_eq!(appreciation_points(-3.0), 10);
        assert_eq!(appreciation_points(-3.01), 5);
    }

    #[test]
    fn rent_growth_band_boundaries() {
        assert_eq!(rent_growth_points(2.0), 25);
        assert_eq!(rent_growth_points(6.0), 25);
        assert_eq!(rent_growth_points(10.0), 20);
        assert_eq!(rent_growth_points(10.5), 15);
        assert_eq!(rent_growth_points(1.0), 18);
        assert_eq!(rent_growth_points(-1.0), 12);
        assert_eq!(rent_growth_points(-2.5), 5);
    }

    #[test]
    fn price_to_rent_band_boundaries() {
        assert_eq!(price_to_rent_points(14.9), 25);
        assert_eq!(price_to_rent_points(15.0), 22);
        assert_eq!(price_to_rent_points(18.0), 22);
        assert_eq!(price_to_rent_points(18.1), 18);
        assert_eq!(price_to_rent_points(20.0), 18);
        assert_eq!(price_to_rent_points(25.0), 12);
        assert_eq!(price_to_rent_points(25.1), 5);
    }

    #[test]
    fn rent_yield_band_boundaries() {
        assert_eq!(rent_yield_points(8.0), 25);
        assert_eq!(rent_yield_points(6.0), 22);
        assert_eq!(rent_yield_points(5.0), 18);
        assert_eq!(rent_yield_points(4.0), 12);
        assert_eq!(rent_yield_points(3.9), 5);
    }

    #[test]
    fn label_bands() {
        assert_eq!(HealthLabel::from_total(85), HealthLabel::Excellent);
        assert_eq!(HealthLabel::from_total(84), HealthLabel::Good);
        assert_eq!(HealthLabel::from_total(70), HealthLabel::Good);
        assert_eq!(HealthLabel::from_total(55), HealthLabel::Fair);
        assert_eq!(HealthLabel::from_total(40), HealthLabel::Weak);
        assert_eq!(HealthLabel::from_total(39), HealthLabel::Poor);
    }
}
