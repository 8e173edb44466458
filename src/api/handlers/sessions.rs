/// Session handlers: searches, detail views and their insight fetches
use std::sync::Arc;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;
use tracing::info;

use super::AppState;
use crate::api::session::DetailClaim;
use crate::api::session::PincodeSession;
use crate::api::types::ApiResponse;
use crate::api::types::NearRequest;
use crate::api::types::SelectRequest;
use crate::api::types::SessionResponse;
use crate::api::types::SessionSearchRequest;
use crate::models::QueryOrigin;
use crate::models::RawQuery;
use crate::session::SessionState;

type SessionResult = Result<Json<ApiResponse<SessionResponse>>, StatusCode>;

fn respond(session: &PincodeSession, state: SessionState) -> SessionResult {
    Ok(Json(ApiResponse::success(SessionResponse::new(
        session.session_id(),
        state,
    ))))
}

fn lookup(state: &AppState, session_id: &str) -> Result<Arc<PincodeSession>, StatusCode> {
    state
        .sessions
        .get_session(session_id)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Fetch insights for a claimed detail view unless it is cancelled first
async fn run_detail_fetch(state: &AppState, session: &PincodeSession, claim: DetailClaim) -> Option<SessionState> {
    let DetailClaim { ticket, record, token } = claim;
    let report = tokio::select! {
        () = token.cancelled() => {
            debug!("Insight fetch for {} cancelled", record.pincode);
            return None;
        }
        report = state.services.insights.fetch_for_record(&record) => report,
    };
    session.complete_detail(ticket, report).await
}

/// Insights for a detail view opened by a search arrive in the background
fn spawn_pending_detail(state: &AppState, session: Arc<PincodeSession>) {
    let state = state.clone();
    tokio::spawn(async move {
        if let Some(claim) = session.claim_pending_detail().await {
            run_detail_fetch(&state, &session, claim).await;
        }
    });
}

/// Run one session search to completion or until superseded
async fn run_search(state: &AppState, session: &Arc<PincodeSession>, query: &RawQuery, force_ai: bool) -> SessionState {
    let (ticket, token) = session.begin_search(query.text()).await;

    let resolution = tokio::select! {
        () = token.cancelled() => None,
        resolution = state.services.pipeline.resolve(query.text(), force_ai) => Some(resolution),
    };

    let applied = match resolution {
        Some(resolution) => session.complete_search(ticket, resolution).await,
        None => None,
    };

    match applied {
        Some(snapshot) => {
            if snapshot.pending_detail().is_some() {
                spawn_pending_detail(state, Arc::clone(session));
            }
            snapshot
        }
        None => {
            debug!("Search for '{}' superseded", query);
            session.snapshot().await
        }
    }
}

/// Create a session (POST /api/sessions)
pub async fn create_session(State(state): State<AppState>) -> SessionResult {
    let session = state.sessions.create_session();
    info!("POST /api/sessions -> {}", session.session_id());
    let snapshot = session.snapshot().await;
    respond(&session, snapshot)
}

/// Current snapshot (GET /api/sessions/:id)
pub async fn get_session(State(state): State<AppState>, Path(session_id): Path<String>) -> SessionResult {
    let session = lookup(&state, &session_id)?;
    let snapshot = session.snapshot().await;
    respond(&session, snapshot)
}

/// Search within a session (POST /api/sessions/:id/search)
pub async fn session_search(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SessionSearchRequest>,
) -> SessionResult {
    info!("POST /api/sessions/{}/search: {}", session_id, request.query);
    let session = lookup(&state, &session_id)?;

    let query = RawQuery::new(&request.query, request.origin).map_err(|_| StatusCode::BAD_REQUEST)?;
    let force_ai = request.ai || query.origin().forces_ai();

    let snapshot = run_search(&state, &session, &query, force_ai).await;
    respond(&session, snapshot)
}

/// Search from coordinates (POST /api/sessions/:id/near)
pub async fn session_near(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<NearRequest>,
) -> SessionResult {
    info!("POST /api/sessions/{}/near: ({}, {})", session_id, request.lat, request.lon);
    let session = lookup(&state, &session_id)?;

    let label = format!("{},{}", request.lat, request.lon);
    let (ticket, token) = session.begin_search(&label).await;

    let locality = tokio::select! {
        () = token.cancelled() => None,
        locality = state.services.pipeline.locality(request.lat, request.lon) => locality,
    };

    let snapshot = match locality {
        Some(locality) => {
            let query = RawQuery::new(&locality, QueryOrigin::Geolocation).map_err(|_| StatusCode::BAD_GATEWAY)?;
            run_search(&state, &session, &query, true).await
        }
        None => match session.abandon_search(ticket).await {
            Some(snapshot) => snapshot,
            None => session.snapshot().await,
        },
    };
    respond(&session, snapshot)
}

/// Open a detail view and wait for its insights (POST /api/sessions/:id/select)
pub async fn select_record(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SelectRequest>,
) -> SessionResult {
    info!("POST /api/sessions/{}/select: {}", session_id, request.index);
    let session = lookup(&state, &session_id)?;

    let claim = session
        .open_detail(request.index)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    let snapshot = match run_detail_fetch(&state, &session, claim).await {
        Some(snapshot) => snapshot,
        None => session.snapshot().await,
    };
    respond(&session, snapshot)
}

/// Close the detail view (DELETE /api/sessions/:id/select)
pub async fn close_record(State(state): State<AppState>, Path(session_id): Path<String>) -> SessionResult {
    info!("DELETE /api/sessions/{}/select", session_id);
    let session = lookup(&state, &session_id)?;
    let snapshot = session.close_detail().await;
    respond(&session, snapshot)
}
