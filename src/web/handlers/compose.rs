//! Compose handler.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::app::{ComposeDraft, NotificationLog};
use crate::web::dto::{ApiResponse, ComposeRequest, ComposeResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /api/compose - Build a draft from the request and send it.
///
/// Invalid and repeated addresses are dropped and listed as `rejected`. At
/// least one valid recipient must remain.
pub async fn compose(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ComposeRequest>,
) -> Result<Json<ApiResponse<ComposeResponse>>, ApiError> {
    state.require_auth()?;

    let mut draft = ComposeDraft::new();
    let rejected: Vec<String> = req
        .to
        .iter()
        .filter(|address| !draft.add_recipient(address))
        .cloned()
        .collect();
    if draft.recipients().is_empty() {
        return Err(ApiError::unprocessable("No valid recipients"));
    }
    if let Some(subject) = req.subject {
        draft.set_subject(subject);
    }
    draft.set_body(req.body);

    let log = NotificationLog::new();
    draft.submit(&state.slot, &log).await?;

    let response = ComposeResponse {
        recipients: draft.recipients().to_vec(),
        rejected,
    };
    Ok(Json(ApiResponse::new(response).with_notifications(log.take())))
}
