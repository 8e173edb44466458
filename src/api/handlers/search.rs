/// Stateless search, insight and browse handlers
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::api::types::ApiResponse;
use crate::api::types::DistrictsResponse;
use crate::api::types::InsightParams;
use crate::api::types::InsightResponse;
use crate::api::types::LocationParams;
use crate::api::types::SearchParams;
use crate::api::types::SearchResponse;
use crate::catalog;
use crate::links;
use crate::links::LocationLinks;

/// Resolve a query without session state (GET /api/search)
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<ApiResponse<SearchResponse>> {
    info!("GET /api/search?q={} ai={}", params.q, params.ai);
    let resolution = state.services.pipeline.resolve(&params.q, params.ai).await;
    Json(ApiResponse::success(SearchResponse::from(resolution)))
}

/// Locality insights for an area (GET /api/insights)
pub async fn insights(
    State(state): State<AppState>,
    Query(params): Query<InsightParams>,
) -> Result<Json<ApiResponse<InsightResponse>>, StatusCode> {
    info!("GET /api/insights area={} pincode={}", params.area, params.pincode);

    if params.area.trim().is_empty() || params.pincode.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let report = state
        .services
        .insights
        .fetch_insights(&params.area, &params.pincode, &params.state)
        .await;

    let response = InsightResponse {
        area: params.area,
        pincode: params.pincode,
        report,
    };
    if response.report.is_some() {
        Ok(Json(ApiResponse::success(response)))
    } else {
        Ok(Json(ApiResponse {
            success: false,
            data: Some(response),
            error: Some("Locality insights are unavailable right now".to_string()),
        }))
    }
}

/// Live location links (GET /api/share-location)
pub async fn share_location(
    Query(params): Query<LocationParams>,
) -> Result<Json<ApiResponse<LocationLinks>>, StatusCode> {
    info!("GET /api/share-location lat={} lon={}", params.lat, params.lon);
    let links = links::location_links(params.lat, params.lon).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok(Json(ApiResponse::success(links)))
}

/// All states (GET /api/states)
pub async fn list_states() -> Json<ApiResponse<Vec<&'static str>>> {
    Json(ApiResponse::success(catalog::states().to_vec()))
}

/// Major districts of a state (GET /api/states/:state/districts)
pub async fn list_districts(
    Path(state_name): Path<String>,
) -> Result<Json<ApiResponse<DistrictsResponse>>, StatusCode> {
    info!("GET /api/states/{}/districts", state_name);

    let state = catalog::find_state(&state_name).ok_or(StatusCode::NOT_FOUND)?;
    let districts = catalog::districts(state)
        .unwrap_or_default()
        .iter()
        .map(|d| (*d).to_string())
        .collect();

    Ok(Json(ApiResponse::success(DistrictsResponse {
        state: state.to_string(),
        districts,
    })))
}

/// Featured pincodes (GET /api/featured)
pub async fn featured() -> Json<ApiResponse<Vec<&'static str>>> {
    Json(ApiResponse::success(catalog::featured_pincodes().to_vec()))
}
