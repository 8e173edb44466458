/// Support chat handler
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::ApiResponse;
use crate::api::types::SupportRequest;
use crate::api::types::SupportResponse;
use crate::errors::PincodeError;

/// One support exchange (POST /api/support)
pub async fn support_chat(
    State(state): State<AppState>,
    Json(request): Json<SupportRequest>,
) -> Result<Json<ApiResponse<SupportResponse>>, StatusCode> {
    info!("POST /api/support");

    let session = state.sessions.get_or_create(request.session_id.as_deref());
    match session
        .support_reply(&state.services.support, &request.message)
        .await
    {
        Ok((reply, messages)) => Ok(Json(ApiResponse::success(SupportResponse {
            session_id: session.session_id().to_string(),
            reply,
            messages,
        }))),
        Err(PincodeError::EmptyQuery) => Err(StatusCode::BAD_REQUEST),
        Err(e) => {
            error!("Support chat failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
