//! Compose request checks and the validating JSON extractor.
//!
//! Field checks here only reject input the canister could never accept.
//! Addresses that are present but malformed are left to
//! [`ComposeDraft::add_recipient`](crate::app::ComposeDraft::add_recipient),
//! which drops them and reports them back as rejected.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::app::MAX_ADDRESS_LEN;
use crate::web::error::ApiError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON is a 400, a body that parses but breaks a rule is a 422
/// with the offending fields listed.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "request body rejected");
            ApiError::bad_request(format!("Invalid JSON: {}", e.body_text()))
        })?;

        if let Err(errors) = value.validate() {
            let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
            tracing::debug!(?fields, "request failed validation");
            return Err(ApiError::from_validation_errors(errors));
        }

        Ok(ValidatedJson(value))
    }
}

fn rule(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Every recipient must be non-blank and fit in an address.
pub fn recipient_addresses(to: &[String]) -> Result<(), ValidationError> {
    for (i, address) in to.iter().enumerate() {
        let address = address.trim();
        if address.is_empty() {
            return Err(rule("blank_recipient", format!("Recipient {} is blank", i + 1)));
        }
        if address.len() > MAX_ADDRESS_LEN {
            return Err(rule(
                "recipient_too_long",
                format!("Recipient {} exceeds {MAX_ADDRESS_LEN} characters", i + 1),
            ));
        }
    }
    Ok(())
}

/// Subjects end up in a mail header, so no line breaks or control characters.
pub fn single_line(subject: &str) -> Result<(), ValidationError> {
    if subject.chars().any(char::is_control) {
        return Err(rule(
            "single_line",
            "Subject must be a single line of text".to_string(),
        ));
    }
    Ok(())
}

/// Bodies are sent as `text/plain`; only tabs and line breaks are allowed
/// among control characters.
pub fn plain_text(body: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| matches!(c, '\n' | '\r' | '\t');
    if body.chars().any(|c| c.is_control() && !allowed(c)) {
        return Err(rule(
            "plain_text",
            "Body must not contain control characters".to_string(),
        ));
    }
    Ok(())
}
