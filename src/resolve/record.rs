//! Live platform record shapes.
//!
//! The two wire shapes the engine consumes: Sleeper's map of platform id to
//! player object, and MFL's list of player objects. Both convert into the
//! platform-neutral [`LiveRecord`] before matching.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A Sleeper-style player object, keyed externally by its platform id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleeperPlayer {
    /// Preferred display name.
    pub full_name: Option<String>,
    /// Fallback display name some dump variants carry instead.
    pub name: Option<String>,
    /// Position code.
    pub position: Option<String>,
    /// Team abbreviation.
    pub team: Option<String>,
    /// Activity signal.
    pub active: Option<bool>,
}

/// An MFL-style player object carrying its own id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MflPlayer {
    /// MFL player id.
    pub id: String,
    /// Display name, typically `"Last, First"`.
    pub name: Option<String>,
    /// Position code.
    pub position: Option<String>,
    /// Team abbreviation.
    pub team: Option<String>,
}

/// A platform-neutral live record, ready for reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveRecord {
    /// The record's id on its platform.
    pub platform_id: String,
    /// Raw display name.
    pub name: Option<String>,
    /// Raw position code.
    pub position: Option<String>,
    /// Raw team name or abbreviation.
    pub team: Option<String>,
    /// Activity signal, when the platform reports one.
    pub active: Option<bool>,
}

impl LiveRecord {
    /// Builds a record from one entry of a Sleeper players dump.
    #[must_use]
    pub fn from_sleeper(platform_id: impl Into<String>, player: &SleeperPlayer) -> Self {
        Self {
            platform_id: platform_id.into(),
            name: player.full_name.clone().or_else(|| player.name.clone()),
            position: player.position.clone(),
            team: player.team.clone(),
            active: player.active,
        }
    }

    /// Builds a record from an MFL player object.
    #[must_use]
    pub fn from_mfl(player: &MflPlayer) -> Self {
        Self {
            platform_id: player.id.clone(),
            name: player.name.clone(),
            position: player.position.clone(),
            team: player.team.clone(),
            active: None,
        }
    }
}

/// Converts a Sleeper players dump into records, ordered by platform id so
/// reconciliation is deterministic regardless of map iteration order.
#[must_use]
pub fn sleeper_records(players: &HashMap<String, SleeperPlayer>) -> Vec<LiveRecord> {
    let mut ids: Vec<&String> = players.keys().collect();
    ids.sort();
    ids.into_iter()
        .map(|id| LiveRecord::from_sleeper(id.clone(), &players[id]))
        .collect()
}

/// Converts an MFL player list into records.
#[must_use]
pub fn mfl_records(players: &[MflPlayer]) -> Vec<LiveRecord> {
    players.iter().map(LiveRecord::from_mfl).collect()
}
