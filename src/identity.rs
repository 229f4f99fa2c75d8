//! Player identity types and canonical ID generation.
//!
//! A canonical ID is the one identifier this system assigns to a real-world
//! player, independent of any platform. It is a pure function of the
//! normalized (name, position, team) triple, so recomputing it for the same
//! attributes always yields the same value, and it never changes after an
//! identity is created.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::normalize::{normalize_name, normalize_team, Position};

/// Hex width of the digest portion of a canonical ID.
///
/// 64 bits of digest; the original 32-bit width had marginal collision
/// resistance at tens of thousands of identities.
const ID_HEX_LEN: usize = 16;

/// Prefix carried by every canonical ID.
const ID_PREFIX: &str = "NFL_";

/// A fantasy-sports platform that supplies player records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    /// Sleeper
    Sleeper,
    /// MyFantasyLeague
    Mfl,
    /// ESPN
    Espn,
    /// Yahoo
    Yahoo,
    /// Pro Football Reference
    Pfr,
    /// NFL GSIS
    Gsis,
    /// Sportradar
    Sportradar,
    /// A platform outside the built-in set
    Other(String),
}

impl Platform {
    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sleeper => "sleeper",
            Self::Mfl => "mfl",
            Self::Espn => "espn",
            Self::Yahoo => "yahoo",
            Self::Pfr => "pfr",
            Self::Gsis => "gsis",
            Self::Sportradar => "sportradar",
            Self::Other(name) => name,
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let name = value.trim().to_lowercase();
        if name.is_empty() {
            return Err("platform name cannot be empty".to_string());
        }
        Ok(match name.as_str() {
            "sleeper" => Self::Sleeper,
            "mfl" => Self::Mfl,
            "espn" => Self::Espn,
            "yahoo" => Self::Yahoo,
            "pfr" => Self::Pfr,
            "gsis" => Self::Gsis,
            "sportradar" => Self::Sportradar,
            _ => Self::Other(name),
        })
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deterministic canonical player identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CanonicalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CanonicalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates the canonical ID for a (name, position, team) triple.
///
/// All three inputs are normalized before hashing, so the same player
/// described in different platform conventions yields the same ID.
///
/// Two distinct real players sharing identical normalized name, position,
/// and team are indistinguishable by design; this is a documented limitation
/// of attribute-derived identity, not something callers should patch around.
#[must_use]
pub fn generate_canonical_id(name: &str, position: &str, team: &str) -> CanonicalId {
    let name_part: String = normalize_name(name)
        .to_uppercase()
        .chars()
        .filter(|c| *c != '.' && *c != '\'')
        .collect();
    let position_part = Position::parse(position);
    let team_part = normalize_team(team);

    let identifier = format!("{name_part}_{}_{team_part}", position_part.as_str());
    let digest = blake3::hash(identifier.as_bytes());

    let mut id = String::with_capacity(ID_PREFIX.len() + ID_HEX_LEN);
    id.push_str(ID_PREFIX);
    for byte in &digest.as_bytes()[..ID_HEX_LEN / 2] {
        id.push_str(&format!("{byte:02X}"));
    }
    CanonicalId(id)
}

/// The resolved entity: one real-world player across all platforms.
///
/// `canonical_id` is immutable once assigned; `name`, `position`, `team`,
/// and `active` are refreshed from the most recent live record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    /// Deterministic identifier, fixed at creation.
    pub canonical_id: CanonicalId,

    /// Normalized display name.
    pub name: String,

    /// Normalized position.
    pub position: Position,

    /// Normalized team code.
    pub team: String,

    /// Platform-specific identifiers, at most one per platform.
    pub platform_ids: BTreeMap<Platform, String>,

    /// True when this identity was seeded from the authoritative crosswalk
    /// rather than created ad hoc from a live platform feed.
    pub from_crosswalk: bool,

    /// Most recent platform activity signal.
    pub active: bool,

    /// Birthdate, carried through from the crosswalk only.
    pub birthdate: Option<NaiveDate>,

    /// Draft year, carried through from the crosswalk only.
    pub draft_year: Option<u16>,

    /// When this identity was last created or mutated.
    pub updated_at: DateTime<Utc>,
}

impl PlayerIdentity {
    /// Creates a new identity from raw attributes, normalizing them and
    /// deriving the canonical ID.
    #[must_use]
    pub fn new(
        name: &str,
        position: &str,
        team: &str,
        from_crosswalk: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let canonical_id = generate_canonical_id(name, position, team);
        Self {
            canonical_id,
            name: normalize_name(name),
            position: Position::parse(position),
            team: normalize_team(team),
            platform_ids: BTreeMap::new(),
            from_crosswalk,
            active: true,
            birthdate: None,
            draft_year: None,
            updated_at: now,
        }
    }

    /// Returns the stored id for a platform, if any.
    #[must_use]
    pub fn platform_id(&self, platform: &Platform) -> Option<&str> {
        self.platform_ids.get(platform).map(String::as_str)
    }

    /// Attaches a platform id.
    ///
    /// Attaching the value already stored for the platform is a no-op. A slot
    /// occupied by a *different* value is never overwritten; the caller
    /// decides whether that is a conflict to count or an error to surface.
    ///
    /// # Errors
    /// - `EmptyPlatformId` if `id` is empty after trimming
    /// - `PlatformIdOccupied` if the slot holds a different value
    pub fn set_platform_id(
        &mut self,
        platform: Platform,
        id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyPlatformId);
        }
        match self.platform_ids.get(&platform) {
            Some(existing) if *existing == id => Ok(()),
            Some(existing) => Err(ValidationError::PlatformIdOccupied {
                platform,
                existing: existing.clone(),
                incoming: id,
            }),
            None => {
                self.platform_ids.insert(platform, id);
                self.updated_at = now;
                Ok(())
            }
        }
    }

    /// Refreshes mutable attributes from a live record.
    ///
    /// Live data is considered fresher than crosswalk data for these fields.
    /// An unknown live team never clobbers a known one, and the canonical ID
    /// is never recomputed.
    pub fn refresh(
        &mut self,
        team: Option<&str>,
        position: Option<Position>,
        active: Option<bool>,
        now: DateTime<Utc>,
    ) {
        if let Some(team) = team {
            let team = normalize_team(team);
            if team != crate::normalize::team::UNKNOWN_TEAM {
                self.team = team;
            }
        }
        if let Some(position) = position {
            self.position = position;
        }
        if let Some(active) = active {
            self.active = active;
        }
        self.updated_at = now;
    }

    /// True when at least two platforms know this player.
    #[must_use]
    pub fn is_cross_platform(&self) -> bool {
        self.platform_ids.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_id_is_deterministic() {
        let a = generate_canonical_id("Josh Allen", "QB", "BUF");
        let b = generate_canonical_id("Josh Allen", "QB", "BUF");
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_id_normalizes_inputs_first() {
        let a = generate_canonical_id("Allen, Josh", "QB", "Buffalo Bills");
        let b = generate_canonical_id("Josh Allen", "QB", "BUF");
        assert_eq!(a, b);

        let c = generate_canonical_id("DJ Moore", "WR", "CHI");
        let d = generate_canonical_id("D.J. Moore", "WR", "CHI");
        assert_eq!(c, d);
    }

    #[test]
    fn canonical_id_shape() {
        let id = generate_canonical_id("Josh Allen", "QB", "BUF");
        let s = id.as_str();
        assert!(s.starts_with("NFL_"));
        assert_eq!(s.len(), 4 + 16);
        assert!(s[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn distinct_triples_yield_distinct_ids() {
        let triples = [
            ("Josh Allen", "QB", "BUF"),
            ("Josh Allen", "WR", "BUF"),
            ("Josh Allen", "QB", "MIA"),
            ("Keenan Allen", "WR", "CHI"),
            ("Patrick Mahomes", "QB", "KC"),
            ("Travis Kelce", "TE", "KC"),
            ("Justin Tucker", "K", "BAL"),
        ];
        let mut ids: Vec<_> = triples
            .iter()
            .map(|(n, p, t)| generate_canonical_id(n, p, t))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), triples.len());
    }

    #[test]
    fn set_platform_id_rejects_different_value() {
        let now = Utc::now();
        let mut identity = PlayerIdentity::new("Josh Allen", "QB", "BUF", true, now);
        identity
            .set_platform_id(Platform::Sleeper, "4046", now)
            .unwrap();
        // Same value is a no-op.
        identity
            .set_platform_id(Platform::Sleeper, "4046", now)
            .unwrap();

        let err = identity
            .set_platform_id(Platform::Sleeper, "9999", now)
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::PlatformIdOccupied { .. }
        ));
        assert_eq!(identity.platform_id(&Platform::Sleeper), Some("4046"));
    }

    #[test]
    fn refresh_keeps_canonical_id_and_known_team() {
        let now = Utc::now();
        let mut identity = PlayerIdentity::new("Josh Allen", "QB", "BUF", true, now);
        let original_id = identity.canonical_id.clone();

        identity.refresh(Some("MIA"), None, Some(false), now);
        assert_eq!(identity.team, "MIA");
        assert!(!identity.active);
        assert_eq!(identity.canonical_id, original_id);

        // Unknown live team never clobbers a known one.
        identity.refresh(Some(""), None, None, now);
        assert_eq!(identity.team, "MIA");
    }

    #[test]
    fn cross_platform_requires_two_ids() {
        let now = Utc::now();
        let mut identity = PlayerIdentity::new("Josh Allen", "QB", "BUF", true, now);
        assert!(!identity.is_cross_platform());
        identity
            .set_platform_id(Platform::Sleeper, "4046", now)
            .unwrap();
        assert!(!identity.is_cross_platform());
        identity
            .set_platform_id(Platform::Mfl, "13593", now)
            .unwrap();
        assert!(identity.is_cross_platform());
    }

    #[test]
    fn platform_serde_round_trip() {
        let p: Platform = serde_json::from_str("\"sleeper\"").unwrap();
        assert_eq!(p, Platform::Sleeper);
        let other: Platform = serde_json::from_str("\"rotowire\"").unwrap();
        assert_eq!(other, Platform::Other("rotowire".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"rotowire\"");
    }
}
