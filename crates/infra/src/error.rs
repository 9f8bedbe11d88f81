//! Session-level error taxonomy.

use thiserror::Error;

use stockpile_core::DomainError;

use crate::store::StoreError;

/// The closed set of failure kinds a caller needs to tell apart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The inventory file does not exist.
    FileNotFound,
    /// The inventory file exists but cannot be read or written.
    PermissionDenied,
    /// Any other file-system failure.
    Io,
    /// The inventory file content is not a valid inventory.
    Parse,
    /// The referenced item is not in the inventory.
    KeyNotFound,
    /// The operation was rejected before mutating anything.
    Validation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::Io => "io",
            ErrorKind::Parse => "parse",
            ErrorKind::KeyNotFound => "key_not_found",
            ErrorKind::Validation => "validation",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a session operation: either the store or the domain rejected it.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Store(StoreError::NotFound { .. }) => ErrorKind::FileNotFound,
            SessionError::Store(StoreError::PermissionDenied { .. }) => ErrorKind::PermissionDenied,
            SessionError::Store(StoreError::Io { .. }) => ErrorKind::Io,
            SessionError::Store(StoreError::Malformed { .. }) => ErrorKind::Parse,
            SessionError::Domain(DomainError::NotFound(_)) => ErrorKind::KeyNotFound,
            SessionError::Domain(DomainError::Validation(_) | DomainError::InvalidName(_)) => {
                ErrorKind::Validation
            }
        }
    }
}
