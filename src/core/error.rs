//! Error types for the WiFi association service

use thiserror::Error;

use super::types::CallbackHandle;

/// Result type for connectivity platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Result type for association requests
pub type AssociationResult<T> = Result<T, AssociationError>;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised by a connectivity platform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Network request registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Failed to release callback {handle}: {reason}")]
    HandleReleaseFailure {
        handle: CallbackHandle,
        reason: String,
    },

    #[error("Unknown callback handle: {0}")]
    UnknownHandle(CallbackHandle),

    #[error("wpa_supplicant control socket not found: {0}")]
    ControlSocketMissing(String),

    #[error("wpa_supplicant error: {0}")]
    WpaSupplicant(String),
}

/// Errors surfaced synchronously to the initiator of an association request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssociationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Platform does not support association requests")]
    UnsupportedPlatform,

    #[error("Association request submission failed: {0}")]
    SubmissionFailed(#[from] PlatformError),
}

/// Errors related to transport layer
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
