//! Persistence round trip: resolve, dedupe, snapshot to disk, reload, and
//! verify the reloaded set is equivalent. Also exercises corruption
//! detection on reload.

use std::fs;

use gridlink::{
    dedupe_identities, CrosswalkRow, IdentityRow, IdentityStore, MatchingEngine, Platform,
    SnapshotStore,
};

fn resolve_sample() -> Vec<gridlink::PlayerIdentity> {
    let mut engine = MatchingEngine::new();
    engine.seed(vec![
        CrosswalkRow {
            name: Some("Allen, Josh".to_string()),
            position: Some("QB".to_string()),
            team: Some("BUF".to_string()),
            sleeper_id: Some("4046".to_string()),
            mfl_id: Some("13593".to_string()),
            ..CrosswalkRow::default()
        },
        CrosswalkRow {
            name: Some("Jefferson, Justin".to_string()),
            position: Some("WR".to_string()),
            team: Some("MIN".to_string()),
            sleeper_id: Some("6794".to_string()),
            ..CrosswalkRow::default()
        },
    ]);
    engine.into_resolution().identities.into_values().collect()
}

#[test]
fn dedupe_persist_reload_preserves_identity_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("identities.snap");

    let mut identities = resolve_sample();
    let dedup = dedupe_identities(&mut identities);
    assert!(dedup.is_clean());

    let expected: Vec<(String, _)> = identities
        .iter()
        .map(|i| (i.canonical_id.to_string(), i.platform_ids.clone()))
        .collect();

    let store = SnapshotStore::open(&path).unwrap();
    let rows: Vec<IdentityRow> = identities.iter().map(IdentityRow::from).collect();
    let count = store.replace_all(rows).unwrap();
    assert_eq!(count, expected.len());
    drop(store);

    let reopened = SnapshotStore::open(&path).unwrap();
    assert_eq!(reopened.len().unwrap(), expected.len());
    for (canonical_id, platform_ids) in &expected {
        let row = reopened
            .get(&canonical_id.as_str().into())
            .unwrap()
            .unwrap();
        assert_eq!(&row.platform_ids(), platform_ids);
    }

    // Reloaded rows rebuild identities equal to what was resolved.
    let mut reloaded: Vec<_> = reopened
        .load_all()
        .unwrap()
        .iter()
        .map(IdentityRow::to_identity)
        .collect();
    reloaded.sort_by(|a, b| a.canonical_id.cmp(&b.canonical_id));
    identities.sort_by(|a, b| a.canonical_id.cmp(&b.canonical_id));
    assert_eq!(reloaded, identities);
}

#[test]
fn colliding_platform_ids_are_repaired_before_persisting() {
    use chrono::{Duration, Utc};
    use gridlink::PlayerIdentity;

    let old = Utc::now() - Duration::hours(1);
    let new = Utc::now();
    let mut stale = PlayerIdentity::new("Josh Allen", "QB", "BUF", false, old);
    stale
        .set_platform_id(Platform::Sleeper, "4046", old)
        .unwrap();
    let mut fresh = PlayerIdentity::new("Joshua Allen", "QB", "BUF", false, new);
    fresh
        .set_platform_id(Platform::Sleeper, "4046", new)
        .unwrap();
    let fresh_id = fresh.canonical_id.clone();

    let mut identities = vec![stale, fresh];
    let dedup = dedupe_identities(&mut identities);
    assert_eq!(dedup.repairs.len(), 1);
    assert_eq!(dedup.repairs[0].kept, fresh_id);

    // After repair the batch satisfies the store's uniqueness constraint.
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::open(dir.path().join("identities.snap")).unwrap();
    let rows: Vec<IdentityRow> = identities.iter().map(IdentityRow::from).collect();
    store.replace_all(rows).unwrap();

    let holder = store
        .find_by_platform_id(&Platform::Sleeper, "4046")
        .unwrap()
        .unwrap();
    assert_eq!(holder.canonical_id, fresh_id);
}

#[test]
fn tampered_snapshot_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("identities.snap");

    let mut identities = resolve_sample();
    dedupe_identities(&mut identities);
    let store = SnapshotStore::open(&path).unwrap();
    store
        .replace_all(identities.iter().map(IdentityRow::from).collect())
        .unwrap();
    drop(store);

    // Flip a byte in the body without touching the header checksum.
    let raw = fs::read_to_string(&path).unwrap();
    let tampered = raw.replacen("Josh", "Jxsh", 1);
    assert_ne!(raw, tampered);
    fs::write(&path, tampered).unwrap();

    let err = SnapshotStore::open(&path).unwrap_err();
    assert!(matches!(err, gridlink::StoreError::Corrupt(_)));
}
