//! In-memory identity store.
//!
//! Reference backend for tests and single-process use. Rows live in a
//! `BTreeMap` behind an `RwLock`, with a platform-id index maintained
//! alongside. `replace_all` validates the incoming batch into a fresh state
//! before swapping, so a rejected batch leaves the stored set untouched.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::identity::{CanonicalId, Platform};
use crate::normalize::{normalize_name, normalize_team, Position};
use crate::store::traits::{IdentityStore, StoreError};
use crate::store::IdentityRow;

#[derive(Debug, Default)]
struct StoreState {
    rows: BTreeMap<CanonicalId, IdentityRow>,
    by_platform: HashMap<(Platform, String), CanonicalId>,
}

impl StoreState {
    fn build(rows: Vec<IdentityRow>) -> Result<Self, StoreError> {
        let mut state = Self::default();
        for row in rows {
            for (platform, id) in row.platform_ids() {
                let key = (platform, id);
                if let Some(first) = state.by_platform.get(&key) {
                    let (platform, id) = key;
                    return Err(StoreError::DuplicatePlatformId {
                        platform,
                        id,
                        first: first.clone(),
                        second: row.canonical_id.clone(),
                    });
                }
                state.by_platform.insert(key, row.canonical_id.clone());
            }
            state.rows.insert(row.canonical_id.clone(), row);
        }
        Ok(state)
    }
}

/// Thread-safe in-memory identity store.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    state: RwLock<StoreState>,
}

fn lock_err(operation: &str) -> StoreError {
    StoreError::Backend(format!("lock poisoned during {operation}"))
}

impl InMemoryIdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn replace_all(&self, rows: Vec<IdentityRow>) -> Result<usize, StoreError> {
        // Validate into a fresh state first; only swap on success.
        let next = StoreState::build(rows)?;
        let count = next.rows.len();
        let mut state = self.state.write().map_err(|_| lock_err("replace_all"))?;
        *state = next;
        Ok(count)
    }

    fn get(&self, id: &CanonicalId) -> Result<Option<IdentityRow>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("get"))?;
        Ok(state.rows.get(id).cloned())
    }

    fn find_by_platform_id(
        &self,
        platform: &Platform,
        id: &str,
    ) -> Result<Option<IdentityRow>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("find_by_platform_id"))?;
        let key = (platform.clone(), id.to_string());
        Ok(state
            .by_platform
            .get(&key)
            .and_then(|canonical| state.rows.get(canonical))
            .cloned())
    }

    fn find_by_attributes(
        &self,
        name: &str,
        position: &str,
        team: Option<&str>,
    ) -> Result<Vec<IdentityRow>, StoreError> {
        let name = normalize_name(name);
        let position = Position::parse(position).as_str().to_string();
        let team = team.map(normalize_team);

        let state = self
            .state
            .read()
            .map_err(|_| lock_err("find_by_attributes"))?;
        Ok(state
            .rows
            .values()
            .filter(|row| {
                row.name == name
                    && row.position == position
                    && team.as_ref().map_or(true, |t| row.team == *t)
            })
            .cloned()
            .collect())
    }

    fn load_all(&self) -> Result<Vec<IdentityRow>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("load_all"))?;
        Ok(state.rows.values().cloned().collect())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("len"))?;
        Ok(state.rows.len())
    }
}
