use std::fs;
use std::path::PathBuf;

use lineup_board::persist::{
    CacheFile, load_cache_file, restore_roster, save_cache_file, update_cache,
};
use lineup_board::roster::{Delta, PlayerRecord, Role, Roster, apply_delta};
use lineup_board::session::Session;

fn temp_cache_path(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("lineup_board_test_{}_{name}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir.join("cache.json")
}

fn record(id: i64, category: &str) -> PlayerRecord {
    PlayerRecord {
        id,
        last_name: "Petit".to_string(),
        first_name: "Hugo".to_string(),
        number: Some("7".to_string()),
        role: Role::FieldPlayer,
        category: category.to_string(),
        on_board: true,
        x: -12.0,
        y: 64.0,
    }
}

fn roster_with(category: &str, players: Vec<PlayerRecord>) -> Roster {
    let mut roster = Roster::new(vec![category.to_string()], category, None);
    apply_delta(
        &mut roster,
        Delta::SetRoster {
            category: category.to_string(),
            players,
        },
    );
    roster
}

#[test]
fn cache_round_trips_through_disk() {
    let path = temp_cache_path("round_trip");
    let mut roster = roster_with("U9", vec![record(1, "U9")]);
    roster.session = Some(Session {
        access_token: "tok".to_string(),
        email: None,
        expires_at: Some(42),
    });

    let mut cache = CacheFile::default();
    update_cache(&mut cache, &roster);
    save_cache_file(&path, &cache).unwrap();

    let loaded = load_cache_file(&path).expect("cache should load");
    assert_eq!(loaded, cache);
    assert_eq!(loaded.last_category.as_deref(), Some("U9"));
    assert_eq!(loaded.rosters["U9"][0].x, -12.0);
    assert_eq!(loaded.session.unwrap().expires_at, Some(42));

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn loading_roster_is_not_cached() {
    let mut cache = CacheFile::default();
    update_cache(&mut cache, &roster_with("U9", vec![record(1, "U9")]));

    let mut switching = roster_with("U9", vec![record(1, "U9")]);
    switching.reload();
    switching.players.clear();
    update_cache(&mut cache, &switching);

    assert_eq!(cache.rosters["U9"].len(), 1);
}

#[test]
fn stale_versions_and_garbage_are_ignored() {
    let path = temp_cache_path("stale");
    fs::write(&path, r#"{"version":0,"last_category":"U9"}"#).unwrap();
    assert!(load_cache_file(&path).is_none());

    fs::write(&path, "not json").unwrap();
    assert!(load_cache_file(&path).is_none());

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn cached_players_fill_the_board_until_the_store_answers() {
    let mut cache = CacheFile::default();
    cache
        .rosters
        .insert("U11".to_string(), vec![record(5, "U11")]);

    let mut roster = Roster::new(vec!["U11".to_string()], "U11", None);
    restore_roster(&mut roster, &cache);
    assert_eq!(roster.players.len(), 1);

    let mut other = Roster::new(vec!["U7".to_string()], "U7", None);
    restore_roster(&mut other, &cache);
    assert!(other.players.is_empty());
}

#[test]
fn failed_switch_never_files_players_under_the_new_category() {
    let mut roster = Roster::new(
        vec!["U9".to_string(), "U11".to_string()],
        "U9",
        None,
    );
    apply_delta(
        &mut roster,
        Delta::SetRoster {
            category: "U9".to_string(),
            players: vec![record(1, "U9"), record(2, "U9")],
        },
    );

    roster.list("U11");
    assert!(roster.players.is_empty());
    apply_delta(
        &mut roster,
        Delta::ListFailed {
            category: "U11".to_string(),
        },
    );
    assert!(!roster.loading);

    let mut cache = CacheFile::default();
    update_cache(&mut cache, &roster);
    assert!(cache.rosters.get("U11").is_none_or(|rows| rows.is_empty()));

    let mut mixed = roster_with("U11", vec![record(3, "U11")]);
    mixed.players.push(record(1, "U9"));
    let mut cache = CacheFile::default();
    update_cache(&mut cache, &mixed);
    assert!(!cache.rosters.contains_key("U11"));
}

#[test]
fn unwritable_cache_dir_is_reported() {
    let path = temp_cache_path("blocked");
    let blocker = path.parent().unwrap().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let err = save_cache_file(&blocker.join("cache.json"), &CacheFile::default());
    assert!(err.is_err());

    let _ = fs::remove_dir_all(path.parent().unwrap());
}
