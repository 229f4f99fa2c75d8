//! # Gridlink - Player Identity Resolution
//!
//! Gridlink reconciles player records from multiple fantasy-football platforms
//! (each with its own identifiers and naming conventions) into a single
//! canonical identity per real-world player.
//!
//! ## Core Concepts
//!
//! - **`PlayerIdentity`**: the resolved entity, keyed by a deterministic canonical ID
//! - **Crosswalk**: an authoritative reference dataset mapping many platforms' ids
//!   to the same player, used to seed resolution
//! - **Layered matching**: exact platform-id match, then name+position fallback,
//!   then creation of a new identity
//! - **`IdentityStore`**: conflict-free, uniquely-keyed persistence of the resolved set
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gridlink::{CrosswalkRow, MatchingEngine, Platform};
//!
//! let mut engine = MatchingEngine::new();
//! engine.seed(crosswalk_rows);
//! engine.reconcile(Platform::Sleeper, sleeper_records);
//! engine.reconcile(Platform::Mfl, mfl_records);
//!
//! let resolution = engine.into_resolution();
//! println!("{}", resolution.report);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crosswalk;
pub mod error;
pub mod identity;
pub mod normalize;
pub mod resolve;
pub mod stats;
pub mod store;

// Re-export primary types at crate root for convenience
pub use crosswalk::CrosswalkRow;
pub use error::{LinkError, LinkResult, ValidationError};
pub use identity::{generate_canonical_id, CanonicalId, Platform, PlayerIdentity};
pub use normalize::{merge_key, normalize_name, normalize_team, Position};
pub use resolve::{
    is_placeholder, mfl_records, sleeper_records, LiveRecord, MatchingEngine, MflPlayer,
    Resolution, ResolutionReport, SleeperPlayer, SourceCounts,
};
pub use stats::MappingStatistics;
pub use store::{
    dedupe_identities, DedupReport, IdentityRow, IdentityStore, InMemoryIdentityStore,
    SnapshotStore, StoreError,
};
