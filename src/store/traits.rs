//! Abstract storage trait for resolved identities.
//!
//! The trait defines the contract persistence backends must implement:
//! atomic batch replacement plus the lookup paths callers need (canonical
//! id, platform id, attributes). In-memory and snapshot-file backends live
//! alongside; a relational backend would implement the same contract.

use thiserror::Error;

use crate::identity::{CanonicalId, Platform};
use crate::store::IdentityRow;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Identity not found.
    #[error("Identity not found: {0}")]
    NotFound(String),

    /// Two rows in one batch claim the same platform id.
    #[error("Duplicate {platform} id '{id}' on {first} and {second}")]
    DuplicatePlatformId {
        /// The platform whose id space collided.
        platform: Platform,
        /// The colliding id value.
        id: String,
        /// First claimant.
        first: CanonicalId,
        /// Second claimant.
        second: CanonicalId,
    },

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    Serde(String),

    /// Snapshot file failed its integrity check.
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),

    /// Backend error.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Storage contract for the resolved identity set.
///
/// `replace_all` is the single mutating operation and must be atomic: a
/// failed write leaves the previously stored set fully intact.
pub trait IdentityStore: Send + Sync {
    /// Replaces the entire stored set in one transactional operation.
    /// Returns the number of rows stored.
    ///
    /// # Errors
    /// - `DuplicatePlatformId` if the batch violates uniqueness-per-platform
    /// - backend-specific errors; in every case the prior set is unchanged
    fn replace_all(&self, rows: Vec<IdentityRow>) -> Result<usize, StoreError>;

    /// Looks up an identity by canonical id.
    fn get(&self, id: &CanonicalId) -> Result<Option<IdentityRow>, StoreError>;

    /// Looks up the identity holding a platform id.
    fn find_by_platform_id(
        &self,
        platform: &Platform,
        id: &str,
    ) -> Result<Option<IdentityRow>, StoreError>;

    /// Finds identities by name and position, optionally narrowed by team.
    /// Inputs are normalized before comparison.
    fn find_by_attributes(
        &self,
        name: &str,
        position: &str,
        team: Option<&str>,
    ) -> Result<Vec<IdentityRow>, StoreError>;

    /// Loads the full stored set.
    fn load_all(&self) -> Result<Vec<IdentityRow>, StoreError>;

    /// Number of stored identities.
    fn len(&self) -> Result<usize, StoreError>;

    /// True when nothing is stored.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
