//! Error types for the animation editing engine and its document store.

use thiserror::Error;

/// Result type alias for editing operations.
pub type LottieResult<T> = Result<T, LottieError>;

/// Errors that can occur while transforming or storing animation documents.
///
/// Store lookups never produce these: a missing session or document is an
/// `Option::None` at the store boundary. The `*NotFound` variants exist for
/// callers (batch runner, CLI) that need to turn a miss into an error.
#[derive(Error, Debug)]
pub enum LottieError {
    /// A palette operation was given no colors.
    #[error("Palette must contain at least one color")]
    EmptyPalette,

    /// Layer selector could not be built (e.g. an empty name set).
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Document cannot be measured (zero-length serialization).
    #[error("Degenerate document: {0}")]
    DegenerateDocument(String),

    /// Invalid UUID string.
    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    /// Session not found in the store.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Document not found in a session.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Store configuration is invalid.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LottieError {
    /// Creates an InvalidSelector error.
    pub fn invalid_selector(msg: impl Into<String>) -> Self {
        Self::InvalidSelector(msg.into())
    }

    /// Creates a DegenerateDocument error.
    pub fn degenerate_document(msg: impl Into<String>) -> Self {
        Self::DegenerateDocument(msg.into())
    }

    /// Creates an InvalidUuid error.
    pub fn invalid_uuid(uuid: impl Into<String>) -> Self {
        Self::InvalidUuid(uuid.into())
    }

    /// Creates a SessionNotFound error.
    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound(id.into())
    }

    /// Creates a DocumentNotFound error.
    pub fn document_not_found(id: impl Into<String>) -> Self {
        Self::DocumentNotFound(id.into())
    }

    /// Creates an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a Serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for LottieError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
