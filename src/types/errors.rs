//! Tagged errors returned by the registry and mail storage canisters.

use candid::CandidType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error variant returned by a mail storage canister.
#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("No user Address Found")]
    NoUserAddressFound,
    #[error("A rare event of Hash map collision")]
    InternalSystemMailCollision,
    #[error("System failed to Generate Mail Id")]
    FailedToGenerateMailId,
    #[error("Mail not found")]
    MailNotFound,
    #[error("You are not authorized")]
    NotAuthorized,
    #[error("This is a Permissioned System")]
    PermissionedSystem,
    #[error("Address do exist")]
    AddressExist,
    #[error("Domain not Found")]
    DomainNotFound,
    #[error("Mail Transfer Error: {0}")]
    MailTransferError(String),
    #[error("Not Found")]
    NotFound,
    #[error("Error using internal HTTP outcall: {0}")]
    HttpSendMail(String),
    #[error("{0}")]
    GeneralError(String),
}

/// Error variant returned by the registry canister.
#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Resource not Found")]
    NotFound,
    #[error("Failed to upgrade: {0}")]
    FailedToUpgrade(String),
    #[error("Failed to create new canister")]
    FailedToCreateCanister,
    #[error("Failed to install code: {0}")]
    FailedToInstallCode(String),
    #[error("General Error: {0}")]
    GeneralError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_error_candid_roundtrip() {
        let bytes = candid::encode_one(MailError::MailTransferError("x.com".into())).unwrap();
        let decoded: MailError = candid::decode_one(&bytes).unwrap();
        assert_eq!(decoded, MailError::MailTransferError("x.com".to_string()));
    }

    #[test]
    fn test_registry_error_json() {
        let json = serde_json::to_string(&RegistryError::NotFound).unwrap();
        assert_eq!(json, "\"NotFound\"");
    }

    #[test]
    fn test_general_error_display() {
        let err = MailError::GeneralError("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");

        let err = RegistryError::GeneralError("Not Enough Cycles".to_string());
        assert_eq!(err.to_string(), "General Error: Not Enough Cycles");
    }
}
