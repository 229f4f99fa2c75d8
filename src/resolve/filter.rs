//! Team-defense and placeholder filtering.
//!
//! Live platform feeds mix real players with organizational rows: team
//! defenses, `"City, Team"` entries, bare franchise codes. None of these may
//! ever become a [`crate::PlayerIdentity`], so every raw record passes
//! through this filter before matching.

use std::sync::OnceLock;

use regex::Regex;

use crate::normalize::position::Position;
use crate::normalize::team::{franchise_code, FRANCHISE_CITIES, FRANCHISE_NICKNAMES};

fn bare_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2,4}$").unwrap_or_else(|_| unreachable!()))
}

/// Returns true when a record's name describes an organization rather than a
/// person.
///
/// Catches, in order of cheapness:
/// - empty names and bare 2-4 letter uppercase codes (`"BUF"`)
/// - `"Team ..."` prefixed entries
/// - full franchise names (`"Buffalo Bills"`)
/// - `"Nickname, City"` comma forms (`"Bills, Buffalo"`)
/// - defense-position records carrying a franchise nickname
#[must_use]
pub fn is_placeholder(name: &str, position: &Position) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return true;
    }
    if bare_code_re().is_match(name) {
        return true;
    }

    let upper = name.to_uppercase();
    if upper.starts_with("TEAM ") {
        return true;
    }
    if franchise_code(&upper).is_some() {
        return true;
    }
    if upper.contains(',') && FRANCHISE_CITIES.iter().any(|city| upper.contains(city)) {
        return true;
    }
    if *position == Position::Def
        && FRANCHISE_NICKNAMES
            .iter()
            .any(|nickname| upper.contains(nickname))
    {
        return true;
    }

    false
}
