//! Domain error model.

use thiserror::Error;

/// Coarse classification of a [`DomainError`].
///
/// Callers (the HTTP layer in particular) branch on the kind rather than on
/// the concrete variant, so new variants only need a `kind()` arm.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed client input (bad identifier, payload violating the schema).
    Validation,
    /// No document exists for the requested identifier.
    NotFound,
    /// The persistence collaborator failed.
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Storage => "storage",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level error.
///
/// The `Display` output is the human-readable detail and is surfaced to
/// clients as-is, so variants carry the final message rather than a prefix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed payload).
    #[error("{0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("{0}")]
    InvalidId(String),

    /// A requested resource was not found.
    #[error("Product not found")]
    NotFound,

    /// The storage backend reported a failure. Detail is passed through verbatim.
    #[error("{0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) | DomainError::InvalidId(_) => ErrorKind::Validation,
            DomainError::NotFound => ErrorKind::NotFound,
            DomainError::Storage(_) => ErrorKind::Storage,
        }
    }
}
