//! Aggregate statistics over a resolved identity set.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::identity::{Platform, PlayerIdentity};

/// Coverage summary of a resolved identity set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingStatistics {
    /// Total identities.
    pub total: usize,
    /// Identities carrying an id per platform.
    pub per_platform: BTreeMap<Platform, usize>,
    /// Identities known to two or more platforms.
    pub cross_platform: usize,
    /// Identities currently marked active.
    pub active: usize,
    /// Identities seeded from the crosswalk.
    pub from_crosswalk: usize,
}

impl MappingStatistics {
    /// Computes statistics over a set of identities.
    pub fn from_identities<'a, I>(identities: I) -> Self
    where
        I: IntoIterator<Item = &'a PlayerIdentity>,
    {
        let mut stats = Self::default();
        for identity in identities {
            stats.total += 1;
            for platform in identity.platform_ids.keys() {
                *stats.per_platform.entry(platform.clone()).or_insert(0) += 1;
            }
            if identity.is_cross_platform() {
                stats.cross_platform += 1;
            }
            if identity.active {
                stats.active += 1;
            }
            if identity.from_crosswalk {
                stats.from_crosswalk += 1;
            }
        }
        stats
    }

    /// Fraction of identities known to two or more platforms.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cross_platform_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.cross_platform as f64 / self.total as f64
    }
}

impl fmt::Display for MappingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "identities: {}", self.total)?;
        for (platform, count) in &self.per_platform {
            writeln!(f, "  with {platform} id: {count}")?;
        }
        writeln!(
            f,
            "  cross-platform: {} ({:.1}%)",
            self.cross_platform,
            self.cross_platform_rate() * 100.0
        )?;
        writeln!(f, "  active: {}", self.active)?;
        write!(f, "  from crosswalk: {}", self.from_crosswalk)
    }
}
