//! Request DTOs for the web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{plain_text, recipient_addresses, single_line};

/// Query for `GET /api/inbox`.
#[derive(Debug, Default, Deserialize)]
pub struct InboxQuery {
    /// Zero-based page. Absent means the canister's default page.
    #[serde(default)]
    pub page: Option<u64>,
}

/// Body of `POST /api/compose`.
#[derive(Debug, Deserialize, Validate)]
pub struct ComposeRequest {
    #[validate(
        length(min = 1, max = 100, message = "Between 1 and 100 recipients"),
        custom(function = "recipient_addresses")
    )]
    pub to: Vec<String>,
    #[serde(default)]
    #[validate(
        length(max = 998, message = "Subject is too long"),
        custom(function = "single_line")
    )]
    pub subject: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "plain_text"))]
    pub body: String,
}
