//! HTTP handler functions for the market pulse API.
//!
//! Handlers translate raw query parameters into the typed filters the
//! inner crates accept. Invalid allow-listed values come back as 400s
//! that list the accepted options; database failures are logged with
//! their query context and surface as opaque 500s.

use actix_web::{HttpResponse, web};
use market_pulse_metrics::{MetricsError, crossindex, rankings, series, snapshot};
use market_pulse_metrics_models::{
    AffordabilityMetric, BEDROOM_OPTIONS, DEFAULT_DOWN_PAYMENT_PCT, DEFAULT_WINDOW_MONTHS,
    DOWN_PAYMENT_OPTIONS, SeriesFilters, SortKey, SortOrder, window_or_default,
};
use market_pulse_regions::{directory, resolver};
use market_pulse_regions_models::{GeographyLevel, InvalidLevelError, Region};
use market_pulse_server_models::{
    AffordabilityBreakdown, AffordabilityQueryParams, AffordabilityResponse, ApiHealth,
    ChatLookupRequest, CompareRequest, CompareResponse, CutData, CutQueryParams, CutResponse,
    CutStat, CutTrend, HeatData, HeatQueryParams, HeatResponse, InventoryQueryParams,
    InventoryResponse, OverviewQueryParams, OverviewResponse, RankingsQueryParams,
    RankingsResponse, SearchQueryParams, SearchResponse, TrendQueryParams, TrendResponse,
};
use strum::IntoEnumIterator as _;
use switchy_database::Database;

use crate::AppState;

/// Default result cap for region search.
const DEFAULT_SEARCH_LIMIT: u32 = 10;
/// Default row cap for rankings and level summaries.
const DEFAULT_SUMMARY_LIMIT: u32 = 50;

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": message }))
}

fn internal_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": message }))
}

/// Level filter for rankings and level summaries: absent means Metro, but
/// a supplied value outside the allow-list is rejected. Only region
/// search treats invalid levels as unfiltered.
fn level_or_default(value: Option<&str>) -> Result<GeographyLevel, InvalidLevelError> {
    value.map_or(Ok(GeographyLevel::Metro), GeographyLevel::from_param)
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/regions/search`
///
/// Free-text region search with optional geography level scoping.
/// Invalid level values are ignored as if absent.
pub async fn search_regions(
    state: web::Data<AppState>,
    params: web::Query<SearchQueryParams>,
) -> HttpResponse {
    let query = params.q.as_deref().unwrap_or("");
    let level = GeographyLevel::parse_filter(params.level.as_deref());
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    match resolver::search(state.db.as_ref(), query, level, limit).await {
        Ok(results) => HttpResponse::Ok().json(SearchResponse { results }),
        Err(e) => {
            log::error!("Region search failed for query '{query}': {e}");
            internal_error("Failed to search regions")
        }
    }
}

/// `GET /api/regions/{regionId}`
pub async fn get_region(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let region_id = path.into_inner();

    match directory::get_region(state.db.as_ref(), &region_id).await {
        Ok(Some(region)) => HttpResponse::Ok().json(region),
        Ok(None) => not_found("Region not found"),
        Err(e) => {
            log::error!("Region lookup failed for '{region_id}': {e}");
            internal_error("Failed to look up region")
        }
    }
}

/// `GET /api/trends`
///
/// Single-region home value + rent trend rows under the requested
/// filters. The resolved filters are echoed back so the client can see
/// which defaults applied.
pub async fn trends(
    state: web::Data<AppState>,
    params: web::Query<TrendQueryParams>,
) -> HttpResponse {
    let filters = match SeriesFilters::from_params(
        params.home_type.as_deref(),
        params.tier.as_deref(),
        params.months,
    ) {
        Ok(filters) => filters,
        Err(e) => return bad_request(&e.to_string()),
    };

    match snapshot::trend_points(state.db.as_ref(), &params.region_id, &filters).await {
        Ok(data) => HttpResponse::Ok().json(TrendResponse { data, filters }),
        Err(e) => {
            log::error!(
                "Trend query failed for region {} ({filters:?}): {e}",
                params.region_id
            );
            internal_error("Failed to load trends")
        }
    }
}

/// `GET /api/overview`
pub async fn overview(
    state: web::Data<AppState>,
    params: web::Query<OverviewQueryParams>,
) -> HttpResponse {
    match snapshot::market_overview(state.db.as_ref(), &params.region_id).await {
        Ok(Some(data)) => HttpResponse::Ok().json(OverviewResponse { data }),
        Ok(None) => not_found("No market data for region"),
        Err(e) => {
            log::error!("Overview query failed for region {}: {e}", params.region_id);
            internal_error("Failed to load market overview")
        }
    }
}

/// `GET /api/rankings`
///
/// Regions at one geography level ordered by a snapshot column. The sort
/// key is allow-listed; an unknown key is a 400 naming the options.
pub async fn rankings(
    state: web::Data<AppState>,
    params: web::Query<RankingsQueryParams>,
) -> HttpResponse {
    let sort_by = match params.sort_by.as_deref() {
        Some(value) => match SortKey::from_param(value) {
            Ok(key) => key,
            Err(e) => return bad_request(&e.to_string()),
        },
        None => SortKey::HomeValue,
    };
    let order = SortOrder::from_param(params.order.as_deref());
    let level = match level_or_default(params.geography_level.as_deref()) {
        Ok(level) => level,
        Err(e) => return bad_request(&e.to_string()),
    };
    let limit = params.limit.unwrap_or(DEFAULT_SUMMARY_LIMIT);

    match rankings::rank_regions(state.db.as_ref(), level, sort_by, order, limit).await {
        Ok(data) => HttpResponse::Ok().json(RankingsResponse { data }),
        Err(e) => {
            log::error!("Rankings query failed for level {level} sorted by {sort_by}: {e}");
            internal_error("Failed to load rankings")
        }
    }
}

async fn bedroom_cuts(
    db: &dyn Database,
    region_id: &str,
    months: Option<u32>,
) -> Result<CutData, MetricsError> {
    let mut trends = Vec::with_capacity(BEDROOM_OPTIONS.len());
    let mut stats = Vec::with_capacity(BEDROOM_OPTIONS.len());

    for bedrooms in BEDROOM_OPTIONS {
        let filters = SeriesFilters::bedroom_cut(bedrooms, months)?;
        let observed = series::home_value_series(db, region_id, &filters).await?;
        let points = market_pulse_derive::derive_points(&observed);
        let label = format!("{bedrooms} BR");

        let latest = points.last();
        stats.push(CutStat {
            label: label.clone(),
            latest_value: latest.map(|p| p.value),
            mom_change_pct: latest.and_then(|p| p.mom_change_pct),
            yoy_change_pct: latest.and_then(|p| p.yoy_change_pct),
        });
        trends.push(CutTrend { label, points });
    }

    Ok(CutData { trends, stats })
}

/// `GET /api/bedrooms`
///
/// Home-value trends and latest stats for each bedroom count (1-5).
pub async fn bedrooms(
    state: web::Data<AppState>,
    params: web::Query<CutQueryParams>,
) -> HttpResponse {
    match bedroom_cuts(state.db.as_ref(), &params.region_id, params.months).await {
        Ok(data) => HttpResponse::Ok().json(CutResponse { data }),
        Err(e) => {
            log::error!(
                "Bedroom cut query failed for region {}: {e}",
                params.region_id
            );
            internal_error("Failed to load bedroom trends")
        }
    }
}

async fn affordability_breakdown(
    db: &dyn Database,
    region_id: &str,
    only: Option<AffordabilityMetric>,
    down_payment_pct: Option<u8>,
    window_months: u32,
) -> Result<Vec<AffordabilityBreakdown>, MetricsError> {
    let metrics: Vec<AffordabilityMetric> = match only {
        Some(metric) => vec![metric],
        None => AffordabilityMetric::iter().collect(),
    };

    let mut data = Vec::with_capacity(metrics.len());
    for metric in metrics {
        let points =
            series::affordability_series(db, region_id, metric, down_payment_pct, window_months)
                .await?;
        data.push(AffordabilityBreakdown {
            metric_type: metric.to_string(),
            down_payment_pct: metric
                .has_down_payment()
                .then(|| down_payment_pct.unwrap_or(DEFAULT_DOWN_PAYMENT_PCT)),
            points,
        });
    }

    Ok(data)
}

/// `GET /api/affordability`
///
/// With `regionId`: the per-metric affordability breakdown for one
/// region. Without it: the latest income-needed summary across regions at
/// one geography level.
pub async fn affordability(
    state: web::Data<AppState>,
    params: web::Query<AffordabilityQueryParams>,
) -> HttpResponse {
    if let Some(pct) = params.down_payment_pct {
        if !DOWN_PAYMENT_OPTIONS.contains(&pct) {
            return bad_request(&format!(
                "invalid downPaymentPct '{pct}': expected one of 5, 10, 20"
            ));
        }
    }

    let metric = match params.metric_type.as_deref() {
        Some(value) => match AffordabilityMetric::from_param(value) {
            Ok(metric) => Some(metric),
            Err(e) => return bad_request(&e.to_string()),
        },
        None => None,
    };

    if let Some(region_id) = params.region_id.as_deref() {
        let window = window_or_default(params.months, DEFAULT_WINDOW_MONTHS);
        return match affordability_breakdown(
            state.db.as_ref(),
            region_id,
            metric,
            params.down_payment_pct,
            window,
        )
        .await
        {
            Ok(data) => HttpResponse::Ok().json(AffordabilityResponse::Breakdown { data }),
            Err(e) => {
                log::error!("Affordability breakdown failed for region {region_id}: {e}");
                internal_error("Failed to load affordability data")
            }
        };
    }

    let level = match level_or_default(params.geography_level.as_deref()) {
        Ok(level) => level,
        Err(e) => return bad_request(&e.to_string()),
    };
    let limit = params.limit.unwrap_or(DEFAULT_SUMMARY_LIMIT);

    match series::affordability_level_summary(state.db.as_ref(), level, limit).await {
        Ok(data) => HttpResponse::Ok().json(AffordabilityResponse::Summary { data }),
        Err(e) => {
            log::error!("Affordability summary failed for level {level}: {e}");
            internal_error("Failed to load affordability data")
        }
    }
}

/// `GET /api/inventory`
///
/// With `regionId`: the smoothed for-sale count series for one region.
/// Without it: the latest inventory reading per region at one geography
/// level.
pub async fn inventory(
    state: web::Data<AppState>,
    params: web::Query<InventoryQueryParams>,
) -> HttpResponse {
    if let Some(region_id) = params.region_id.as_deref() {
        let window = window_or_default(params.months, DEFAULT_WINDOW_MONTHS);
        return match series::inventory_series(state.db.as_ref(), region_id, window).await {
            Ok(data) => HttpResponse::Ok().json(InventoryResponse::Series { data }),
            Err(e) => {
                log::error!("Inventory query failed for region {region_id}: {e}");
                internal_error("Failed to load inventory data")
            }
        };
    }

    let level = match level_or_default(params.geography_level.as_deref()) {
        Ok(level) => level,
        Err(e) => return bad_request(&e.to_string()),
    };
    let limit = params.limit.unwrap_or(DEFAULT_SUMMARY_LIMIT);

    match series::inventory_level_summary(state.db.as_ref(), level, limit).await {
        Ok(data) => HttpResponse::Ok().json(InventoryResponse::Summary { data }),
        Err(e) => {
            log::error!("Inventory summary failed for level {level}: {e}");
            internal_error("Failed to load inventory data")
        }
    }
}

async fn heat_data(
    db: &dyn Database,
    region: &Region,
    window_months: u32,
) -> Result<HeatData, MetricsError> {
    let heat_index = series::heat_index_series(db, &region.region_id, window_months).await?;
    let hpi = crossindex::hpi_series(db, region, window_months).await?;
    Ok(HeatData { heat_index, hpi })
}

/// `GET /api/heat`
///
/// Heat index observations plus the house price index series joined
/// through the region's metro or state.
pub async fn heat(state: web::Data<AppState>, params: web::Query<HeatQueryParams>) -> HttpResponse {
    let region = match directory::get_region(state.db.as_ref(), &params.region_id).await {
        Ok(Some(region)) => region,
        Ok(None) => return not_found("Region not found"),
        Err(e) => {
            log::error!("Region lookup failed for '{}': {e}", params.region_id);
            return internal_error("Failed to look up region");
        }
    };

    let window = window_or_default(params.months, DEFAULT_WINDOW_MONTHS);
    match heat_data(state.db.as_ref(), &region, window).await {
        Ok(data) => HttpResponse::Ok().json(HeatResponse { data }),
        Err(e) => {
            log::error!("Heat query failed for region {}: {e}", params.region_id);
            internal_error("Failed to load market heat data")
        }
    }
}

/// `POST /api/compare`
///
/// Side-by-side comparison of up to 8 regions: per-region snapshot stats
/// with stable colors and date-aligned wide tables for charting.
pub async fn compare(
    state: web::Data<AppState>,
    body: web::Json<CompareRequest>,
) -> HttpResponse {
    let filters = match SeriesFilters::from_params(
        body.home_type.as_deref(),
        body.tier.as_deref(),
        body.months,
    ) {
        Ok(filters) => filters,
        Err(e) => return bad_request(&e.to_string()),
    };

    match market_pulse_compare::compare(
        state.db.as_ref(),
        &body.region_ids,
        &filters,
        &body.prior_colors,
    )
    .await
    {
        Ok(data) => HttpResponse::Ok().json(CompareResponse { data }),
        Err(e @ market_pulse_compare::CompareError::InvalidCardinality { .. }) => {
            bad_request(&e.to_string())
        }
        Err(e) => {
            log::error!(
                "Comparison failed for regions {:?}: {e}",
                body.region_ids
            );
            internal_error("Failed to build comparison")
        }
    }
}

/// `POST /api/chat/lookup`
///
/// Resolves a natural-language place name and returns its market summary
/// and trend. An unresolvable location is a normal `{error}` payload, not
/// an HTTP error.
pub async fn chat_lookup(
    state: web::Data<AppState>,
    body: web::Json<ChatLookupRequest>,
) -> HttpResponse {
    match market_pulse_chat::market_lookup(state.db.as_ref(), &body.location).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            log::error!("Chat lookup failed for '{}': {e}", body.location);
            internal_error("Failed to look up market data")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_level_defaults_to_metro() {
        assert_eq!(level_or_default(None), Ok(GeographyLevel::Metro));
        assert_eq!(
            level_or_default(Some("County")),
            Ok(GeographyLevel::County)
        );
    }

    #[test]
    fn unknown_level_is_rejected_not_coerced() {
        let err = level_or_default(Some("Galaxy")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid geographyLevel 'Galaxy': expected one of National, State, Metro, County, City, Zip"
        );
    }
}
