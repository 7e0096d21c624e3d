//! Error types for dmail.

use thiserror::Error;

use crate::types::{MailError, RegistryError};

/// Common error type for dmail.
#[derive(Error, Debug)]
pub enum DmailError {
    /// The replica rejected the call or could not be reached.
    #[error("agent error: {0}")]
    Agent(String),

    /// Candid encoding or decoding failed.
    #[error("candid error: {0}")]
    Candid(#[from] candid::Error),

    /// The registry canister answered with a tagged error.
    #[error("registry error: {0}")]
    Registry(RegistryError),

    /// A mail storage canister answered with a tagged error.
    #[error("mail error: {0}")]
    Mail(MailError),

    /// No mail storage has been resolved for this session yet.
    #[error("mail storage is not available, sign in first")]
    StorageUnavailable,

    /// Identity could not be loaded.
    #[error("identity error: {0}")]
    Identity(String),

    /// A canister id or address could not be parsed.
    #[error("invalid principal: {0}")]
    InvalidPrincipal(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DmailError {
    /// Whether the error was reported by a canister rather than by the
    /// transport or the local client.
    pub fn is_backend(&self) -> bool {
        matches!(self, DmailError::Registry(_) | DmailError::Mail(_))
    }

    /// Serialized form of the error, as shown to the user.
    ///
    /// Tagged backend errors render as their JSON encoding so the variant
    /// name reaches the user verbatim.
    pub fn to_notice(&self) -> String {
        let encoded = match self {
            DmailError::Registry(e) => serde_json::to_string(e).ok(),
            DmailError::Mail(e) => serde_json::to_string(e).ok(),
            _ => None,
        };
        encoded.unwrap_or_else(|| self.to_string())
    }
}

impl From<ic_agent::AgentError> for DmailError {
    fn from(e: ic_agent::AgentError) -> Self {
        DmailError::Agent(e.to_string())
    }
}

impl From<RegistryError> for DmailError {
    fn from(e: RegistryError) -> Self {
        DmailError::Registry(e)
    }
}

impl From<MailError> for DmailError {
    fn from(e: MailError) -> Self {
        DmailError::Mail(e)
    }
}

/// Result type alias for dmail operations.
pub type Result<T> = std::result::Result<T, DmailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_display() {
        let err = DmailError::Registry(RegistryError::NotFound);
        assert_eq!(err.to_string(), "registry error: Resource not Found");
        assert!(err.is_backend());
    }

    #[test]
    fn test_mail_error_display() {
        let err: DmailError = MailError::MailNotFound.into();
        assert_eq!(err.to_string(), "mail error: Mail not found");
    }

    #[test]
    fn test_storage_unavailable_display() {
        let err = DmailError::StorageUnavailable;
        assert_eq!(
            err.to_string(),
            "mail storage is not available, sign in first"
        );
        assert!(!err.is_backend());
    }

    #[test]
    fn test_notice_serializes_backend_errors() {
        let err = DmailError::Registry(RegistryError::NotFound);
        assert_eq!(err.to_notice(), "\"NotFound\"");

        let err = DmailError::Mail(MailError::GeneralError("quota".to_string()));
        assert_eq!(err.to_notice(), "{\"GeneralError\":\"quota\"}");
    }

    #[test]
    fn test_notice_falls_back_to_display() {
        let err = DmailError::Agent("connection refused".to_string());
        assert_eq!(err.to_notice(), "agent error: connection refused");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DmailError = io_err.into();
        assert!(matches!(err, DmailError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(DmailError::Validation("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
