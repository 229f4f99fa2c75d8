//! Error types for Gridlink.
//!
//! All errors are strongly typed using thiserror. Malformed single records are
//! never surfaced as errors by the matching layer; they are skipped and
//! counted. Errors are reserved for store misuse and I/O.

use thiserror::Error;

use crate::identity::Platform;
use crate::store::StoreError;

/// Validation errors that occur when mutating an identity.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Record has no usable name.
    #[error("Record has no usable name")]
    MissingName,

    /// Record has no usable position.
    #[error("Record has no usable position")]
    MissingPosition,

    /// An empty platform id was offered.
    #[error("Platform id cannot be empty")]
    EmptyPlatformId,

    /// The platform slot already holds a different id.
    #[error("Platform slot {platform} already holds '{existing}', refusing '{incoming}'")]
    PlatformIdOccupied {
        /// Platform whose slot is occupied.
        platform: Platform,
        /// Id currently in the slot.
        existing: String,
        /// Id that was refused.
        incoming: String,
    },
}

/// Top-level error type for Gridlink.
#[derive(Debug, Error)]
pub enum LinkError {
    /// A record or identity failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The persistence layer failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An invariant was violated internally.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable description.
        message: String,
    },
}

impl LinkError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a store error.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type alias for Gridlink operations.
pub type LinkResult<T> = Result<T, LinkError>;
