//! Single-mail handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::web::dto::{AckResponse, ApiResponse, MailDetailResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/mails/:id - Fetch a full mail. The canister marks it read.
pub async fn get_mail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MailDetailResponse>>, ApiError> {
    let storage = state.storage().await?;
    let mail = storage.fetch_mail(&id).await?;
    Ok(Json(ApiResponse::new(MailDetailResponse::new(&id, &mail))))
}

/// DELETE /api/mails/:id - Move a mail to the trash.
pub async fn delete_mail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AckResponse>>, ApiError> {
    let storage = state.storage().await?;
    storage.delete_mail(&id).await?;
    tracing::info!(mail_id = %id, "mail moved to trash");
    Ok(Json(ApiResponse::new(AckResponse { id })))
}

/// POST /api/mails/:id/restore - Move a mail back from the trash.
pub async fn restore_mail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AckResponse>>, ApiError> {
    let storage = state.storage().await?;
    storage.restore_mail(&id).await?;
    tracing::info!(mail_id = %id, "mail restored");
    Ok(Json(ApiResponse::new(AckResponse { id })))
}
