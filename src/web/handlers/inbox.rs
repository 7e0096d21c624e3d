//! Inbox handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::app::{InboxState, NotificationLog};
use crate::sdk::MailCount;
use crate::web::dto::{ApiResponse, InboxQuery};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/inbox - Run the inbox flow and return its state.
///
/// Failures are part of the returned state, not an HTTP error.
pub async fn get_inbox(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InboxQuery>,
) -> Json<ApiResponse<InboxState>> {
    let log = NotificationLog::new();
    let current = {
        let mut inbox = state.inbox.lock().await;
        inbox.load(query.page, &log).await.clone()
    };
    Json(ApiResponse::new(current).with_notifications(log.take()))
}

/// GET /api/inbox/count - Unread and read totals.
pub async fn get_mail_count(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<MailCount>>, ApiError> {
    let storage = state.storage().await?;
    let count = storage.get_mail_count().await?;
    Ok(Json(ApiResponse::new(count)))
}
