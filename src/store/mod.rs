//! Persistence layer for resolved identities.
//!
//! Before anything is written, the identity set passes a defensive
//! deduplication scan: the matching layer guarantees uniqueness-per-platform,
//! but the store never trusts that. Writes are all-or-nothing batch
//! replacements.

pub mod memory;
pub mod snapshot;
pub mod traits;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{CanonicalId, Platform, PlayerIdentity};
use crate::normalize::Position;

pub use memory::InMemoryIdentityStore;
pub use snapshot::SnapshotStore;
pub use traits::{IdentityStore, StoreError};

/// Flat row-per-identity persistence form.
///
/// Each built-in platform id is its own nullable column carrying a
/// uniqueness constraint; ids for platforms outside the built-in set go to
/// `other_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRow {
    /// Canonical identifier.
    pub canonical_id: CanonicalId,
    /// Normalized display name.
    pub name: String,
    /// Normalized position code.
    pub position: String,
    /// Normalized team code.
    pub team: String,
    /// Sleeper id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleeper_id: Option<String>,
    /// MyFantasyLeague id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfl_id: Option<String>,
    /// ESPN id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub espn_id: Option<String>,
    /// Yahoo id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yahoo_id: Option<String>,
    /// Pro Football Reference id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfr_id: Option<String>,
    /// NFL GSIS id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gsis_id: Option<String>,
    /// Sportradar id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sportradar_id: Option<String>,
    /// Ids for platforms outside the built-in column set.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other_ids: BTreeMap<String, String>,
    /// Crosswalk provenance flag.
    pub from_crosswalk: bool,
    /// Most recent activity signal.
    pub active: bool,
    /// Whether the position typically fills a starting lineup slot.
    pub is_starter: bool,
    /// Birthdate, crosswalk-only metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    /// Draft year, crosswalk-only metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_year: Option<u16>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl IdentityRow {
    /// Returns the id stored for a platform, if any.
    #[must_use]
    pub fn platform_id(&self, platform: &Platform) -> Option<&str> {
        match platform {
            Platform::Sleeper => self.sleeper_id.as_deref(),
            Platform::Mfl => self.mfl_id.as_deref(),
            Platform::Espn => self.espn_id.as_deref(),
            Platform::Yahoo => self.yahoo_id.as_deref(),
            Platform::Pfr => self.pfr_id.as_deref(),
            Platform::Gsis => self.gsis_id.as_deref(),
            Platform::Sportradar => self.sportradar_id.as_deref(),
            Platform::Other(name) => self.other_ids.get(name).map(String::as_str),
        }
    }

    /// Collects every populated platform id.
    #[must_use]
    pub fn platform_ids(&self) -> BTreeMap<Platform, String> {
        let mut ids = BTreeMap::new();
        let columns = [
            (Platform::Sleeper, &self.sleeper_id),
            (Platform::Mfl, &self.mfl_id),
            (Platform::Espn, &self.espn_id),
            (Platform::Yahoo, &self.yahoo_id),
            (Platform::Pfr, &self.pfr_id),
            (Platform::Gsis, &self.gsis_id),
            (Platform::Sportradar, &self.sportradar_id),
        ];
        for (platform, id) in columns {
            if let Some(id) = id {
                ids.insert(platform, id.clone());
            }
        }
        for (name, id) in &self.other_ids {
            ids.insert(Platform::Other(name.clone()), id.clone());
        }
        ids
    }

    /// Rebuilds the in-memory identity from this row.
    #[must_use]
    pub fn to_identity(&self) -> PlayerIdentity {
        PlayerIdentity {
            canonical_id: self.canonical_id.clone(),
            name: self.name.clone(),
            position: Position::parse(&self.position),
            team: self.team.clone(),
            platform_ids: self.platform_ids(),
            from_crosswalk: self.from_crosswalk,
            active: self.active,
            birthdate: self.birthdate,
            draft_year: self.draft_year,
            updated_at: self.updated_at,
        }
    }
}

impl From<&PlayerIdentity> for IdentityRow {
    fn from(identity: &PlayerIdentity) -> Self {
        let mut row = Self {
            canonical_id: identity.canonical_id.clone(),
            name: identity.name.clone(),
            position: identity.position.as_str().to_string(),
            team: identity.team.clone(),
            sleeper_id: None,
            mfl_id: None,
            espn_id: None,
            yahoo_id: None,
            pfr_id: None,
            gsis_id: None,
            sportradar_id: None,
            other_ids: BTreeMap::new(),
            from_crosswalk: identity.from_crosswalk,
            active: identity.active,
            is_starter: identity.position.is_starter(),
            birthdate: identity.birthdate,
            draft_year: identity.draft_year,
            updated_at: identity.updated_at,
        };
        for (platform, id) in &identity.platform_ids {
            match platform {
                Platform::Sleeper => row.sleeper_id = Some(id.clone()),
                Platform::Mfl => row.mfl_id = Some(id.clone()),
                Platform::Espn => row.espn_id = Some(id.clone()),
                Platform::Yahoo => row.yahoo_id = Some(id.clone()),
                Platform::Pfr => row.pfr_id = Some(id.clone()),
                Platform::Gsis => row.gsis_id = Some(id.clone()),
                Platform::Sportradar => row.sportradar_id = Some(id.clone()),
                Platform::Other(name) => {
                    row.other_ids.insert(name.clone(), id.clone());
                }
            }
        }
        row
    }
}

/// One platform-id collision repair performed before a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupRepair {
    /// Platform whose id space collided.
    pub platform: Platform,
    /// The colliding id value.
    pub id: String,
    /// Identity that kept the id (most recently updated).
    pub kept: CanonicalId,
    /// Identity whose slot was cleared.
    pub cleared: CanonicalId,
}

impl fmt::Display for DedupRepair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} id '{}' kept on {}, cleared from {}",
            self.platform, self.id, self.kept, self.cleared
        )
    }
}

/// Structured record of every repair a deduplication pass performed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    /// Repairs in the order they were applied.
    pub repairs: Vec<DedupRepair>,
}

impl DedupReport {
    /// True when no repairs were needed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.repairs.is_empty()
    }
}

/// Defensively repairs platform-id collisions before persistence.
///
/// Should never find anything when the matching layer behaved; when two
/// identities claim the same platform id anyway, the most-recently-updated
/// one keeps it and the other's slot is cleared. Every repair is returned in
/// the report and logged; nothing is dropped silently.
pub fn dedupe_identities(identities: &mut Vec<PlayerIdentity>) -> DedupReport {
    // Deterministic scan order regardless of caller ordering.
    identities.sort_by(|a, b| a.canonical_id.cmp(&b.canonical_id));

    let mut report = DedupReport::default();
    let mut claims: HashMap<(Platform, String), usize> = HashMap::new();

    for index in 0..identities.len() {
        let ids: Vec<(Platform, String)> = identities[index]
            .platform_ids
            .iter()
            .map(|(platform, id)| (platform.clone(), id.clone()))
            .collect();

        for (platform, id) in ids {
            let key = (platform.clone(), id.clone());
            let Some(&holder) = claims.get(&key) else {
                claims.insert(key, index);
                continue;
            };

            // Most-recently-updated identity keeps the id; ties keep the
            // earlier canonical id.
            let (winner, loser) = if identities[index].updated_at > identities[holder].updated_at {
                (index, holder)
            } else {
                (holder, index)
            };

            identities[loser].platform_ids.remove(&platform);
            claims.insert(key, winner);

            let repair = DedupRepair {
                platform,
                id,
                kept: identities[winner].canonical_id.clone(),
                cleared: identities[loser].canonical_id.clone(),
            };
            log::warn!("platform-id collision repaired: {repair}");
            report.repairs.push(repair);
        }
    }
    report
}
