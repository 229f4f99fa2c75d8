//! Attribute normalizers.
//!
//! Pure functions that convert arbitrary platform-supplied strings into
//! canonical forms. All normalizers are stable under repeated application:
//! `normalize(normalize(x)) == normalize(x)`.

pub mod name;
pub mod position;
pub mod team;

pub use name::{merge_key, normalize_name};
pub use position::Position;
pub use team::normalize_team;
