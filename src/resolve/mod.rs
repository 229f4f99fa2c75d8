//! Layered identity resolution.
//!
//! The matching engine seeds identities from the authoritative crosswalk
//! (Layer 1), then reconciles live per-platform records against them in
//! priority order (Layer 2/3): exact platform-id match, name+position
//! fallback match, then creation of a new identity.
//!
//! Two properties the original order-dependent design did not guarantee are
//! load-bearing here:
//!
//! - **Canonical-id immutability**: an identity's id is never regenerated,
//!   even when fresher live data changes its team.
//! - **Source-order independence**: reconciling Sleeper-then-MFL or
//!   MFL-then-Sleeper over the same inputs yields the same final identity
//!   set. Unmatched records are grouped by their fallback key and only
//!   turned into identities at finalization, with a deterministic
//!   representative, so creation does not depend on which source arrived
//!   first.

pub mod filter;
pub mod record;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::Utc;
use serde::Serialize;

use crate::crosswalk::CrosswalkRow;
use crate::identity::{CanonicalId, Platform, PlayerIdentity};
use crate::normalize::{merge_key, normalize_name, normalize_team, Position};
use crate::stats::MappingStatistics;
use crate::store::IdentityRow;

pub use filter::is_placeholder;
pub use record::{mfl_records, sleeper_records, LiveRecord, MflPlayer, SleeperPlayer};

/// Fallback index key: loose name merge key plus canonical position.
type FallbackKey = (String, Position);

/// Counters for Layer 1 seeding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedCounts {
    /// Crosswalk rows offered.
    pub rows: usize,
    /// Identities created.
    pub seeded: usize,
    /// Rows discarded for lacking a usable name.
    pub discarded: usize,
    /// Rows folded into an already-seeded identity.
    pub merged: usize,
    /// Platform-id slots refused while folding duplicate rows.
    pub slot_conflicts: usize,
}

/// Per-source counters for Layer 2/3 reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    /// Records offered by the source.
    pub processed: usize,
    /// New identities created from this source.
    pub created: usize,
    /// Existing identities refreshed or extended.
    pub updated: usize,
    /// Records skipped: missing fields or placeholder entries.
    pub skipped: usize,
    /// Records whose platform-id slot was already taken by a different id.
    pub conflicts: usize,
}

impl std::ops::AddAssign for SourceCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.processed += rhs.processed;
        self.created += rhs.created;
        self.updated += rhs.updated;
        self.skipped += rhs.skipped;
        self.conflicts += rhs.conflicts;
    }
}

/// Structured summary of a resolution run.
///
/// Conflicts are part of the report, never only a log line, so callers can
/// decide whether to alert or halt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    /// Layer 1 seeding counters.
    pub seed: SeedCounts,
    /// Layer 2/3 counters per source platform.
    pub sources: BTreeMap<Platform, SourceCounts>,
}

impl ResolutionReport {
    fn source_mut(&mut self, platform: &Platform) -> &mut SourceCounts {
        self.sources.entry(platform.clone()).or_default()
    }

    /// Counters for one source platform, if it was reconciled.
    #[must_use]
    pub fn source(&self, platform: &Platform) -> Option<&SourceCounts> {
        self.sources.get(platform)
    }

    /// Total platform-id conflicts across all sources.
    #[must_use]
    pub fn total_conflicts(&self) -> usize {
        self.sources.values().map(|c| c.conflicts).sum()
    }
}

impl fmt::Display for ResolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "seed: {} rows, {} seeded, {} merged, {} discarded, {} slot conflicts",
            self.seed.rows,
            self.seed.seeded,
            self.seed.merged,
            self.seed.discarded,
            self.seed.slot_conflicts
        )?;
        for (platform, counts) in &self.sources {
            writeln!(
                f,
                "{platform}: {} processed, {} created, {} updated, {} skipped, {} conflicts",
                counts.processed, counts.created, counts.updated, counts.skipped, counts.conflicts
            )?;
        }
        Ok(())
    }
}

/// The final output of a resolution run.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Resolved identities keyed by canonical id.
    pub identities: BTreeMap<CanonicalId, PlayerIdentity>,
    /// Structured per-source summary.
    pub report: ResolutionReport,
}

impl Resolution {
    /// The resolved canonical-id set.
    #[must_use]
    pub fn canonical_ids(&self) -> Vec<CanonicalId> {
        self.identities.keys().cloned().collect()
    }

    /// Flattens identities into persistable rows.
    #[must_use]
    pub fn rows(&self) -> Vec<IdentityRow> {
        self.identities.values().map(IdentityRow::from).collect()
    }

    /// Aggregate statistics over the resolved set.
    #[must_use]
    pub fn stats(&self) -> MappingStatistics {
        MappingStatistics::from_identities(self.identities.values())
    }
}

/// Index over the in-flight identity set, built once per resolution run.
///
/// Registration happens at identity creation; entries are never rewritten
/// when attributes are later refreshed.
#[derive(Debug, Default)]
struct IdentityIndex {
    by_platform: HashMap<(Platform, String), CanonicalId>,
    fallback: HashMap<FallbackKey, CanonicalId>,
}

impl IdentityIndex {
    fn register_identity(&mut self, identity: &PlayerIdentity, extra_merge_name: Option<&str>) {
        for (platform, id) in &identity.platform_ids {
            self.by_platform
                .entry((platform.clone(), id.clone()))
                .or_insert_with(|| identity.canonical_id.clone());
        }
        let key = (merge_key(&identity.name), identity.position.clone());
        self.fallback
            .entry(key)
            .or_insert_with(|| identity.canonical_id.clone());
        if let Some(merge_name) = extra_merge_name {
            let extra = merge_key(merge_name);
            if !extra.is_empty() {
                self.fallback
                    .entry((extra, identity.position.clone()))
                    .or_insert_with(|| identity.canonical_id.clone());
            }
        }
    }
}

/// An unmatched live record, held back until finalization.
#[derive(Debug, Clone)]
struct PendingRecord {
    platform: Platform,
    platform_id: String,
    name: String,
    position: Position,
    team: String,
    active: Option<bool>,
}

/// The layered matching engine.
///
/// Typical flow: [`MatchingEngine::seed`] with crosswalk rows, one
/// [`MatchingEngine::reconcile`] call per live source, then
/// [`MatchingEngine::into_resolution`].
#[derive(Debug, Default)]
pub struct MatchingEngine {
    identities: BTreeMap<CanonicalId, PlayerIdentity>,
    index: IdentityIndex,
    pending: BTreeMap<FallbackKey, Vec<PendingRecord>>,
    report: ResolutionReport,
}

impl MatchingEngine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer 1: seeds identities from authoritative crosswalk rows.
    ///
    /// Rows without a usable name are discarded and counted. Duplicate rows
    /// (same canonical triple) fold their platform ids into the first-seen
    /// identity. An empty iterator is fine; the engine then operates in
    /// Layer 2/3-only mode.
    pub fn seed<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = CrosswalkRow>,
    {
        let now = Utc::now();
        for row in rows {
            self.report.seed.rows += 1;
            let Some(identity) = row.to_identity(now) else {
                self.report.seed.discarded += 1;
                continue;
            };

            if let Some(existing) = self.identities.get_mut(&identity.canonical_id) {
                // Duplicate crosswalk row: first writer wins per slot, and
                // every refused slot is counted, never silently dropped.
                for (platform, id) in identity.platform_ids {
                    match existing.set_platform_id(platform.clone(), id.clone(), now) {
                        Ok(()) => {
                            self.index
                                .by_platform
                                .entry((platform, id))
                                .or_insert_with(|| existing.canonical_id.clone());
                        }
                        Err(err) => {
                            log::warn!(
                                "duplicate crosswalk row for {}: {err}",
                                existing.canonical_id
                            );
                            self.report.seed.slot_conflicts += 1;
                        }
                    }
                }
                self.report.seed.merged += 1;
                continue;
            }

            self.index
                .register_identity(&identity, row.merge_name.as_deref());
            self.identities
                .insert(identity.canonical_id.clone(), identity);
            self.report.seed.seeded += 1;
        }
        log::info!(
            "seeded {} identities from {} crosswalk rows ({} discarded, {} merged)",
            self.report.seed.seeded,
            self.report.seed.rows,
            self.report.seed.discarded,
            self.report.seed.merged
        );
    }

    /// Layer 2/3: reconciles one source's live records.
    ///
    /// Each record independently walks the match ladder: exact platform-id
    /// match, then name+position fallback, then deferred creation. Malformed
    /// records and placeholder entries are skipped and counted, never raised.
    pub fn reconcile<I>(&mut self, platform: Platform, records: I)
    where
        I: IntoIterator<Item = LiveRecord>,
    {
        let now = Utc::now();
        let mut counts = SourceCounts::default();

        for record in records {
            counts.processed += 1;

            let raw_name = record.name.as_deref().unwrap_or("").trim();
            let raw_position = record.position.as_deref().unwrap_or("").trim();
            if raw_name.is_empty() || raw_position.is_empty() || record.platform_id.trim().is_empty()
            {
                counts.skipped += 1;
                continue;
            }

            let name = normalize_name(raw_name);
            let position = Position::parse(raw_position);
            if is_placeholder(raw_name, &position) || is_placeholder(&name, &position) {
                counts.skipped += 1;
                continue;
            }
            let team = record.team.as_deref().map_or_else(String::new, normalize_team);

            // Step 1: exact platform-id match refreshes mutable fields.
            let platform_key = (platform.clone(), record.platform_id.clone());
            if let Some(canonical_id) = self.index.by_platform.get(&platform_key).cloned() {
                if let Some(identity) = self.identities.get_mut(&canonical_id) {
                    identity.refresh(
                        record.team.as_deref(),
                        Some(position),
                        record.active,
                        now,
                    );
                    counts.updated += 1;
                    continue;
                }
            }

            // Step 2: fallback name+position match attaches the id, unless the
            // slot already holds a different id.
            let fallback_key = (merge_key(&name), position.clone());
            if let Some(canonical_id) = self.index.fallback.get(&fallback_key).cloned() {
                if let Some(identity) = self.identities.get_mut(&canonical_id) {
                    match identity.platform_id(&platform) {
                        Some(existing) if existing != record.platform_id => {
                            log::warn!(
                                "{platform} id conflict for {canonical_id}: slot holds {existing}, record {} skipped",
                                record.platform_id
                            );
                            counts.conflicts += 1;
                        }
                        _ => {
                            if identity
                                .set_platform_id(
                                    platform.clone(),
                                    record.platform_id.clone(),
                                    now,
                                )
                                .is_ok()
                            {
                                self.index
                                    .by_platform
                                    .insert(platform_key, canonical_id.clone());
                            }
                            identity.refresh(
                                record.team.as_deref(),
                                Some(position),
                                record.active,
                                now,
                            );
                            counts.updated += 1;
                        }
                    }
                    continue;
                }
            }

            // Step 3: no match; hold the record back for deterministic
            // creation at finalization.
            self.pending
                .entry(fallback_key)
                .or_default()
                .push(PendingRecord {
                    platform: platform.clone(),
                    platform_id: record.platform_id,
                    name,
                    position,
                    team,
                    active: record.active,
                });
        }

        log::info!(
            "{platform}: {} records, {} updated, {} skipped, {} conflicts",
            counts.processed,
            counts.updated,
            counts.skipped,
            counts.conflicts
        );
        *self.report.source_mut(&platform) += counts;
    }

    /// Finalizes the run: creates identities for unmatched records and
    /// returns the resolved set with its report.
    ///
    /// Pending records are grouped by fallback key; each group's
    /// representative (smallest platform and platform id) creates the
    /// identity, and the rest attach to it. This makes the final identity
    /// set independent of the order sources were reconciled in.
    #[must_use]
    pub fn into_resolution(mut self) -> Resolution {
        let now = Utc::now();
        let pending = std::mem::take(&mut self.pending);

        for (fallback_key, mut group) in pending {
            group.sort_by(|a, b| {
                (&a.platform, &a.platform_id).cmp(&(&b.platform, &b.platform_id))
            });

            let representative = &group[0];
            let created = PlayerIdentity::new(
                &representative.name,
                representative.position.as_str(),
                &representative.team,
                false,
                now,
            );
            let canonical_id = created.canonical_id.clone();

            let mut rest = &group[..];
            if self.identities.contains_key(&canonical_id) {
                // Same canonical triple as an existing identity despite a
                // fresh fallback key; fold the whole group into it.
                log::warn!("pending group collides with existing identity {canonical_id}");
            } else {
                let mut identity = created;
                identity.active = representative.active.unwrap_or(true);
                if identity
                    .set_platform_id(
                        representative.platform.clone(),
                        representative.platform_id.clone(),
                        now,
                    )
                    .is_ok()
                {
                    self.index.by_platform.insert(
                        (
                            representative.platform.clone(),
                            representative.platform_id.clone(),
                        ),
                        canonical_id.clone(),
                    );
                }
                self.index
                    .fallback
                    .entry(fallback_key)
                    .or_insert_with(|| canonical_id.clone());
                log::debug!(
                    "created {canonical_id} from {} record {}",
                    representative.platform,
                    representative.platform_id
                );
                self.identities.insert(canonical_id.clone(), identity);
                self.report.source_mut(&representative.platform).created += 1;
                rest = &group[1..];
            }

            for record in rest {
                let Some(identity) = self.identities.get_mut(&canonical_id) else {
                    break;
                };
                match identity.platform_id(&record.platform) {
                    Some(existing) if existing != record.platform_id => {
                        log::warn!(
                            "{} id conflict for {canonical_id}: slot holds {existing}, record {} skipped",
                            record.platform,
                            record.platform_id
                        );
                        self.report.source_mut(&record.platform).conflicts += 1;
                    }
                    occupied => {
                        if occupied.is_none()
                            && identity
                                .set_platform_id(
                                    record.platform.clone(),
                                    record.platform_id.clone(),
                                    now,
                                )
                                .is_ok()
                        {
                            self.index.by_platform.insert(
                                (record.platform.clone(), record.platform_id.clone()),
                                canonical_id.clone(),
                            );
                        }
                        identity.refresh(
                            Some(&record.team),
                            Some(record.position.clone()),
                            record.active,
                            now,
                        );
                        self.report.source_mut(&record.platform).updated += 1;
                    }
                }
            }
        }

        log::info!("resolved {} identities", self.identities.len());
        Resolution {
            identities: self.identities,
            report: self.report,
        }
    }
}
