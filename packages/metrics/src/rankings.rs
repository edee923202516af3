//! Region rankings over the market summary table.

use market_pulse_derive::classify_market;
use market_pulse_metrics_models::{MarketSnapshot, RankedSnapshot, SortKey, SortOrder};
use market_pulse_regions_models::GeographyLevel;
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::{MetricsError, parse_date};

/// Maximum number of ranked rows a single request may ask for.
pub const MAX_RANKING_LIMIT: u32 = 100;

/// Ranks regions of a geography level by an allow-listed snapshot column.
///
/// The sort key is an enum-to-column table ([`SortKey::column`]); a raw
/// caller string never reaches query construction. Rows with a null sort
/// value sort last regardless of direction. `limit` is clamped to
/// [`MAX_RANKING_LIMIT`].
///
/// # Errors
///
/// Returns [`MetricsError`] if the database operation fails.
pub async fn rank_regions(
    db: &dyn Database,
    level: GeographyLevel,
    sort_by: SortKey,
    order: SortOrder,
    limit: u32,
) -> Result<Vec<RankedSnapshot>, MetricsError> {
    let limit = limit.min(MAX_RANKING_LIMIT);
    let column = sort_by.column();
    let direction = order.sql();

    let sql = format!(
        "SELECT s.region_id, r.region_name, r.display_name, r.state,
                s.as_of::text as as_of, s.home_value, s.home_value_yoy_pct,
                s.home_value_mom_pct, s.rent_value, s.rent_yoy_pct, s.rent_mom_pct,
                s.price_to_rent, s.rent_yield_pct, s.classification
         FROM market_summary s
         JOIN regions r ON r.region_id = s.region_id
         WHERE r.geography_level = $1 AND s.{column} IS NOT NULL
         ORDER BY s.{column} {direction} NULLS LAST
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

    Ok(rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let as_of: Option<String> = row.to_value("as_of").unwrap_or(None);
            let home_value_yoy_pct: Option<f64> =
                row.to_value("home_value_yoy_pct").unwrap_or(None);
            let classification_name: Option<String> =
                row.to_value("classification").unwrap_or(None);
            let classification = classification_name
                .and_then(|c| c.parse().ok())
                .unwrap_or_else(|| classify_market(home_value_yoy_pct));

            let display_name: Option<String> = row.to_value("display_name").unwrap_or(None);
            let region_name: String = row.to_value("region_name").unwrap_or_default();

            #[allow(clippy::cast_possible_truncation)]
            RankedSnapshot {
                rank: i as u32 + 1,
                region_name: display_name.unwrap_or(region_name),
                state: row.to_value("state").unwrap_or(None),
                snapshot: MarketSnapshot {
                    region_id: row.to_value("region_id").unwrap_or_default(),
                    as_of: as_of.as_deref().and_then(parse_date),
                    home_value: row.to_value("home_value").unwrap_or(None),
                    home_value_yoy_pct,
                    home_value_mom_pct: row.to_value("home_value_mom_pct").unwrap_or(None),
                    rent_value: row.to_value("rent_value").unwrap_or(None),
                    rent_yoy_pct: row.to_value("rent_yoy_pct").unwrap_or(None),
                    rent_mom_pct: row.to_value("rent_mom_pct").unwrap_or(None),
                    price_to_rent: row.to_value("price_to_rent").unwrap_or(None),
                    rent_yield_pct: row.to_value("rent_yield_pct").unwrap_or(None),
                    classification,
                },
            }
        })
        .collect())
}
