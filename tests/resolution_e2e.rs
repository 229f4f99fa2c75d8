//! End-to-end resolution: crosswalk seed, two live platform feeds in their
//! native wire shapes, report and statistics checks.

use std::collections::HashMap;

use gridlink::{
    mfl_records, sleeper_records, CrosswalkRow, MatchingEngine, MflPlayer, Platform,
    SleeperPlayer,
};

fn crosswalk() -> Vec<CrosswalkRow> {
    vec![
        CrosswalkRow {
            name: Some("Allen, Josh".to_string()),
            position: Some("QB".to_string()),
            team: Some("BUF".to_string()),
            sleeper_id: Some("4046".to_string()),
            gsis_id: Some("00-0034857".to_string()),
            draft_year: Some(2018),
            ..CrosswalkRow::default()
        },
        CrosswalkRow {
            name: Some("Jefferson, Justin".to_string()),
            position: Some("WR".to_string()),
            team: Some("MIN".to_string()),
            sleeper_id: Some("6794".to_string()),
            ..CrosswalkRow::default()
        },
        // Nameless row, must be discarded without aborting the seed.
        CrosswalkRow {
            sleeper_id: Some("9999".to_string()),
            ..CrosswalkRow::default()
        },
    ]
}

fn sleeper_dump() -> HashMap<String, SleeperPlayer> {
    let mut players = HashMap::new();
    players.insert(
        "4046".to_string(),
        SleeperPlayer {
            full_name: Some("Josh Allen".to_string()),
            position: Some("QB".to_string()),
            team: Some("BUF".to_string()),
            active: Some(true),
            ..SleeperPlayer::default()
        },
    );
    players.insert(
        "6794".to_string(),
        SleeperPlayer {
            full_name: Some("Justin Jefferson".to_string()),
            position: Some("WR".to_string()),
            team: Some("MIN".to_string()),
            active: Some(true),
            ..SleeperPlayer::default()
        },
    );
    // Team defense entry, must be filtered out.
    players.insert(
        "BUF".to_string(),
        SleeperPlayer {
            full_name: Some("Buffalo Bills".to_string()),
            position: Some("DEF".to_string()),
            team: Some("BUF".to_string()),
            active: Some(true),
            ..SleeperPlayer::default()
        },
    );
    players
}

fn mfl_feed() -> Vec<MflPlayer> {
    vec![
        MflPlayer {
            id: "13593".to_string(),
            name: Some("Allen, Josh".to_string()),
            position: Some("QB".to_string()),
            team: Some("BUF".to_string()),
        },
        MflPlayer {
            id: "15281".to_string(),
            name: Some("Jefferson, Justin".to_string()),
            position: Some("WR".to_string()),
            team: Some("MIN".to_string()),
        },
        // Unknown to the crosswalk, becomes an ad-hoc identity.
        MflPlayer {
            id: "16183".to_string(),
            name: Some("Nacua, Puka".to_string()),
            position: Some("WR".to_string()),
            team: Some("LAR".to_string()),
        },
        // Placeholder, must be filtered out.
        MflPlayer {
            id: "0526".to_string(),
            name: Some("Bills, Buffalo".to_string()),
            position: Some("DEF".to_string()),
            team: Some("BUF".to_string()),
        },
    ]
}

#[test]
fn full_pipeline_resolves_across_platforms() {
    let mut engine = MatchingEngine::new();
    engine.seed(crosswalk());
    engine.reconcile(Platform::Sleeper, sleeper_records(&sleeper_dump()));
    engine.reconcile(Platform::Mfl, mfl_records(&mfl_feed()));
    let resolution = engine.into_resolution();

    // Two seeded players plus one ad-hoc creation; placeholders never land.
    assert_eq!(resolution.identities.len(), 3);

    let allen = resolution
        .identities
        .values()
        .find(|i| i.name == "Josh Allen")
        .unwrap();
    assert!(allen.from_crosswalk);
    assert!(allen.active);
    assert_eq!(allen.platform_id(&Platform::Sleeper), Some("4046"));
    assert_eq!(allen.platform_id(&Platform::Mfl), Some("13593"));
    assert_eq!(allen.platform_id(&Platform::Gsis), Some("00-0034857"));
    assert_eq!(allen.draft_year, Some(2018));
    assert!(allen.is_cross_platform());

    let nacua = resolution
        .identities
        .values()
        .find(|i| i.name == "Puka Nacua")
        .unwrap();
    assert!(!nacua.from_crosswalk);
    assert_eq!(nacua.team, "LAR");
    assert_eq!(nacua.platform_id(&Platform::Mfl), Some("16183"));
}

#[test]
fn report_accounts_for_every_record() {
    let mut engine = MatchingEngine::new();
    engine.seed(crosswalk());
    engine.reconcile(Platform::Sleeper, sleeper_records(&sleeper_dump()));
    engine.reconcile(Platform::Mfl, mfl_records(&mfl_feed()));
    let resolution = engine.into_resolution();
    let report = &resolution.report;

    assert_eq!(report.seed.rows, 3);
    assert_eq!(report.seed.seeded, 2);
    assert_eq!(report.seed.discarded, 1);

    let sleeper = report.source(&Platform::Sleeper).unwrap();
    assert_eq!(sleeper.processed, 3);
    assert_eq!(sleeper.updated, 2);
    assert_eq!(sleeper.skipped, 1);
    assert_eq!(sleeper.created, 0);

    let mfl = report.source(&Platform::Mfl).unwrap();
    assert_eq!(mfl.processed, 4);
    assert_eq!(mfl.updated, 2);
    assert_eq!(mfl.created, 1);
    assert_eq!(mfl.skipped, 1);

    assert_eq!(report.total_conflicts(), 0);

    let rendered = report.to_string();
    assert!(rendered.contains("sleeper"));
    assert!(rendered.contains("mfl"));
}

#[test]
fn statistics_summarize_the_resolved_set() {
    let mut engine = MatchingEngine::new();
    engine.seed(crosswalk());
    engine.reconcile(Platform::Sleeper, sleeper_records(&sleeper_dump()));
    engine.reconcile(Platform::Mfl, mfl_records(&mfl_feed()));
    let resolution = engine.into_resolution();

    let stats = resolution.stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.per_platform.get(&Platform::Sleeper), Some(&2));
    assert_eq!(stats.per_platform.get(&Platform::Mfl), Some(&3));
    assert_eq!(stats.cross_platform, 2);
    assert_eq!(stats.from_crosswalk, 2);
}

#[test]
fn reconciling_the_same_feed_twice_changes_nothing() {
    let mut engine = MatchingEngine::new();
    engine.seed(crosswalk());
    engine.reconcile(Platform::Sleeper, sleeper_records(&sleeper_dump()));
    engine.reconcile(Platform::Sleeper, sleeper_records(&sleeper_dump()));
    let resolution = engine.into_resolution();

    assert_eq!(resolution.identities.len(), 2);
    let allen = resolution
        .identities
        .values()
        .find(|i| i.name == "Josh Allen")
        .unwrap();
    assert_eq!(allen.platform_id(&Platform::Sleeper), Some("4046"));
    assert_eq!(resolution.report.total_conflicts(), 0);
}
