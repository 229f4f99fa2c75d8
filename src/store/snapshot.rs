//! File-backed snapshot store.
//!
//! Persists the identity set as a single JSON snapshot with a checksummed
//! header. Writes go to a sibling temp file followed by an atomic rename, so
//! a crash mid-write never leaves a truncated snapshot, and a checksum
//! mismatch on open is reported as corruption instead of loading bad data.
//!
//! Format: one header line `gridlink-snapshot v1 <crc32-hex>` followed by the
//! JSON body. The CRC covers the body bytes only.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::identity::{CanonicalId, Platform};
use crate::store::memory::InMemoryIdentityStore;
use crate::store::traits::{IdentityStore, StoreError};
use crate::store::IdentityRow;

const MAGIC: &str = "gridlink-snapshot";
const VERSION: &str = "v1";

/// Identity store persisted to a snapshot file.
///
/// Reads are served from an in-memory copy loaded at open; every successful
/// `replace_all` rewrites the file before the in-memory copy is updated.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    memory: InMemoryIdentityStore,
}

impl SnapshotStore {
    /// Opens a snapshot store, loading the file at `path` if it exists.
    ///
    /// # Errors
    /// - `Corrupt` if the file exists but fails its header or checksum check
    /// - `Serde` if the body is not valid snapshot JSON
    /// - `Io` on filesystem failures
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let memory = InMemoryIdentityStore::new();
        if path.exists() {
            let rows = read_snapshot(&path)?;
            let count = memory.replace_all(rows)?;
            log::info!("loaded {count} identities from {}", path.display());
        }
        Ok(Self { path, memory })
    }

    /// Path of the backing snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_snapshot(path: &Path) -> Result<Vec<IdentityRow>, StoreError> {
    let raw = fs::read_to_string(path)?;
    let (header, body) = raw
        .split_once('\n')
        .ok_or_else(|| StoreError::Corrupt("missing snapshot header".to_string()))?;

    let mut fields = header.split(' ');
    let magic = fields.next().unwrap_or_default();
    let version = fields.next().unwrap_or_default();
    let checksum = fields.next().unwrap_or_default();
    if magic != MAGIC {
        return Err(StoreError::Corrupt(format!("bad magic '{magic}'")));
    }
    if version != VERSION {
        return Err(StoreError::Corrupt(format!(
            "unsupported snapshot version '{version}'"
        )));
    }

    let actual = crc32fast::hash(body.as_bytes());
    let expected = u32::from_str_radix(checksum, 16)
        .map_err(|_| StoreError::Corrupt(format!("unparseable checksum '{checksum}'")))?;
    if actual != expected {
        return Err(StoreError::Corrupt(format!(
            "checksum mismatch: header {expected:08x}, body {actual:08x}"
        )));
    }

    serde_json::from_str(body).map_err(|e| StoreError::Serde(e.to_string()))
}

fn write_snapshot(path: &Path, rows: &[IdentityRow]) -> Result<(), StoreError> {
    let body = serde_json::to_string(rows).map_err(|e| StoreError::Serde(e.to_string()))?;
    let checksum = crc32fast::hash(body.as_bytes());

    // Appended rather than substituted, so snapshots sharing a stem in one
    // directory never contend for the same temp file.
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    {
        let mut file = fs::File::create(&tmp)?;
        writeln!(file, "{MAGIC} {VERSION} {checksum:08x}")?;
        file.write_all(body.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

impl IdentityStore for SnapshotStore {
    fn replace_all(&self, rows: Vec<IdentityRow>) -> Result<usize, StoreError> {
        // Validate into a scratch set and persist it to disk first; the
        // served set only changes once the file write has succeeded, so a
        // failed write leaves both file and memory on the prior set.
        let scratch = InMemoryIdentityStore::new();
        scratch.replace_all(rows)?;
        let validated = scratch.load_all()?;
        write_snapshot(&self.path, &validated)?;
        self.memory.replace_all(validated)
    }

    fn get(&self, id: &CanonicalId) -> Result<Option<IdentityRow>, StoreError> {
        self.memory.get(id)
    }

    fn find_by_platform_id(
        &self,
        platform: &Platform,
        id: &str,
    ) -> Result<Option<IdentityRow>, StoreError> {
        self.memory.find_by_platform_id(platform, id)
    }

    fn find_by_attributes(
        &self,
        name: &str,
        position: &str,
        team: Option<&str>,
    ) -> Result<Vec<IdentityRow>, StoreError> {
        self.memory.find_by_attributes(name, position, team)
    }

    fn load_all(&self) -> Result<Vec<IdentityRow>, StoreError> {
        self.memory.load_all()
    }

    fn len(&self) -> Result<usize, StoreError> {
        self.memory.len()
    }
}
