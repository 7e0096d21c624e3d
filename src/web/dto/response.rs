//! Response DTOs for the web API.

use serde::Serialize;

use crate::app::{Notification, Recipient};
use crate::types::{timestamp_to_datetime, Mail};

/// Generic API response wrapper.
///
/// Notifications raised while serving the request travel with the data so a
/// frontend can show them as toasts.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            notifications: Vec::new(),
        }
    }

    pub fn with_notifications(mut self, notifications: Vec<Notification>) -> Self {
        self.notifications = notifications;
        self
    }
}

/// Full mail as returned by `GET /api/mails/:id`.
#[derive(Debug, Serialize)]
pub struct MailDetailResponse {
    pub id: String,
    pub from: String,
    pub sender_name: Option<String>,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: Option<String>,
    pub content_type: Option<String>,
    /// Canister timestamp in nanoseconds.
    pub date: u64,
    /// RFC 3339 rendering of `date`.
    pub received_at: Option<String>,
    pub body: String,
    pub replies: usize,
}

impl MailDetailResponse {
    pub fn new(id: &str, mail: &Mail) -> Self {
        let header = &mail.header;
        let received_at = timestamp_to_datetime(header.timestamp).map(|at| at.to_rfc3339());

        Self {
            id: id.to_string(),
            from: header.from.clone(),
            sender_name: header.sender_name.clone(),
            to: header.to.clone(),
            cc: header.cc.clone().unwrap_or_default(),
            subject: header.subject.clone(),
            content_type: header.content_type.clone(),
            date: header.timestamp,
            received_at,
            body: mail.body_text(),
            replies: mail.reply_messages.as_ref().map_or(0, Vec::len),
        }
    }
}

/// Result of `POST /api/compose`.
#[derive(Debug, Serialize)]
pub struct ComposeResponse {
    /// Recipients the mail was addressed to after validation.
    pub recipients: Vec<Recipient>,
    /// Addresses dropped as invalid or repeated.
    pub rejected: Vec<String>,
}

/// Acknowledgement for mutations without a payload.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub id: String,
}
