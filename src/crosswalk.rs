//! Authoritative crosswalk rows.
//!
//! The crosswalk is a third-party reference dataset mapping many platforms'
//! ids to the same player. Loading it is a collaborator's job; this module
//! only defines the row shape and its conversion into a seeded
//! [`PlayerIdentity`]. A missing or empty crosswalk is never fatal: the
//! matching engine simply runs without a seed set.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{Platform, PlayerIdentity};

/// One raw crosswalk row. Every column is optional; rows without a usable
/// name are discarded during seeding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosswalkRow {
    /// Player display name.
    pub name: Option<String>,
    /// Pre-computed loose matching name, when the dataset provides one.
    pub merge_name: Option<String>,
    /// Position code.
    pub position: Option<String>,
    /// Team name or abbreviation.
    pub team: Option<String>,
    /// Birthdate.
    pub birthdate: Option<NaiveDate>,
    /// Draft year.
    pub draft_year: Option<u16>,
    /// Sleeper id.
    pub sleeper_id: Option<String>,
    /// MyFantasyLeague id.
    pub mfl_id: Option<String>,
    /// ESPN id.
    pub espn_id: Option<String>,
    /// Yahoo id.
    pub yahoo_id: Option<String>,
    /// Pro Football Reference id.
    pub pfr_id: Option<String>,
    /// NFL GSIS id.
    pub gsis_id: Option<String>,
    /// Sportradar id.
    pub sportradar_id: Option<String>,
}

impl CrosswalkRow {
    /// Iterates the non-empty platform ids on this row.
    pub fn platform_ids(&self) -> impl Iterator<Item = (Platform, &str)> {
        [
            (Platform::Sleeper, &self.sleeper_id),
            (Platform::Mfl, &self.mfl_id),
            (Platform::Espn, &self.espn_id),
            (Platform::Yahoo, &self.yahoo_id),
            (Platform::Pfr, &self.pfr_id),
            (Platform::Gsis, &self.gsis_id),
            (Platform::Sportradar, &self.sportradar_id),
        ]
        .into_iter()
        .filter_map(|(platform, id)| {
            let id = id.as_deref()?.trim();
            if id.is_empty() {
                None
            } else {
                Some((platform, id))
            }
        })
    }

    /// Converts this row into a crosswalk-seeded identity.
    ///
    /// Returns `None` when the row has no usable name. Position and team fall
    /// back to their unknown forms when absent, so id-rich but attribute-poor
    /// rows still seed.
    #[must_use]
    pub fn to_identity(&self, now: DateTime<Utc>) -> Option<PlayerIdentity> {
        let name = self.name.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() {
            return None;
        }
        let position = self.position.as_deref().unwrap_or("");
        let team = self.team.as_deref().unwrap_or("");

        let mut identity = PlayerIdentity::new(name, position, team, true, now);
        identity.birthdate = self.birthdate;
        identity.draft_year = self.draft_year;
        for (platform, id) in self.platform_ids() {
            // A fresh identity has every slot free; this cannot conflict.
            let _ = identity.set_platform_id(platform, id, now);
        }
        Some(identity)
    }
}
