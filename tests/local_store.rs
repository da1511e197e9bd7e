use std::path::PathBuf;
use std::sync::mpsc;

use lineup_board::config::{AppConfig, Backend, DEFAULT_CATEGORIES};
use lineup_board::local_db::LocalStore;
use lineup_board::roster::{Delta, NewPlayer, PlayerPatch, Role, StoreCommand};
use lineup_board::store::RecordStore;
use lineup_board::worker::run_store_worker;

fn local_config(admin: bool) -> AppConfig {
    AppConfig {
        backend: Backend::Local {
            db_path: PathBuf::from(":memory:"),
            admin,
        },
        categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        default_category: "Seniors A".to_string(),
        export_dir: PathBuf::from("."),
        http_timeout_secs: 10,
    }
}

fn seeded() -> LocalStore {
    let store = LocalStore::open_in_memory().expect("in-memory db");
    for (last, first, category) in [
        ("Zidane", "Enzo", "U11"),
        ("Abel", "Jean", "U11"),
        ("Martin", "Luc", "U9"),
    ] {
        store
            .insert(&NewPlayer::new(last, first, None, Role::FieldPlayer, category))
            .unwrap();
    }
    store
}

#[test]
fn lists_one_category_ordered_by_last_name() {
    let store = seeded();
    store
        .insert(&NewPlayer::new("de Vries", "Tom", None, Role::FieldPlayer, "U11"))
        .unwrap();
    store
        .insert(&NewPlayer::new("abel", "Noé", None, Role::FieldPlayer, "U11"))
        .unwrap();
    let rows = store.select_by_category("U11").unwrap();
    let names: Vec<&str> = rows.iter().map(|p| p.last_name.as_str()).collect();
    assert_eq!(names, vec!["Abel", "abel", "de Vries", "Zidane"]);
    assert!(rows.iter().all(|p| p.category == "U11"));
    assert!(store.select_by_category("U7").unwrap().is_empty());
}

#[test]
fn open_reports_a_blocked_parent_dir() {
    let mut dir = std::env::temp_dir();
    dir.push(format!("lineup_board_db_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("not_a_dir");
    std::fs::write(&blocker, "x").unwrap();

    let err = LocalStore::open(&blocker.join("board.db")).err().expect("open should fail");
    assert!(format!("{err:#}").contains("not_a_dir"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn insert_returns_the_stored_row() {
    let store = LocalStore::open_in_memory().unwrap();
    let created = store
        .insert(&NewPlayer::new("Durand", "Paul", Some("1"), Role::Goalkeeper, "U9"))
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.number.as_deref(), Some("1"));
    assert_eq!(created.role, Role::Goalkeeper);
    assert!(!created.on_board);
    assert_eq!((created.x, created.y), (0.0, 0.0));
}

#[test]
fn patches_leave_unset_fields_alone() {
    let store = seeded();
    let id = store.select_by_category("U11").unwrap()[0].id;

    store
        .update(
            id,
            &PlayerPatch {
                on_board: Some(true),
                x: Some(0.0),
                y: Some(2000.0),
            },
        )
        .unwrap();
    store.update(id, &PlayerPatch::off_board()).unwrap();

    let p = store.select_by_category("U11").unwrap().remove(0);
    assert!(!p.on_board);
    assert_eq!(p.y, 2000.0);

    store.update(id, &PlayerPatch::coordinates(-30.0, 45.0)).unwrap();
    let p = store.select_by_category("U11").unwrap().remove(0);
    assert!(!p.on_board);
    assert_eq!((p.x, p.y), (-30.0, 45.0));
}

#[test]
fn delete_is_permanent() {
    let store = seeded();
    let id = store.select_by_category("U9").unwrap()[0].id;
    store.delete(id).unwrap();
    assert!(store.select_by_category("U9").unwrap().is_empty());
    // Deleting a missing row is not an error.
    store.delete(id).unwrap();
}

#[test]
fn worker_answers_list_and_insert() {
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    cmd_tx
        .send(StoreCommand::Insert(NewPlayer::new(
            "Blanc",
            "Marc",
            Some("5"),
            Role::FieldPlayer,
            "U11",
        )))
        .unwrap();
    cmd_tx
        .send(StoreCommand::List {
            category: "U11".to_string(),
        })
        .unwrap();
    drop(cmd_tx);

    run_store_worker(Box::new(seeded()), &local_config(true), &tx, cmd_rx);
    drop(tx);

    let deltas: Vec<Delta> = rx.iter().collect();
    assert_eq!(deltas.len(), 2);
    match &deltas[0] {
        Delta::PlayerCreated(p) => assert_eq!(p.last_name, "Blanc"),
        other => panic!("unexpected delta {other:?}"),
    }
    match &deltas[1] {
        Delta::SetRoster { category, players } => {
            assert_eq!(category, "U11");
            let names: Vec<&str> = players.iter().map(|p| p.last_name.as_str()).collect();
            assert_eq!(names, vec!["Abel", "Blanc", "Zidane"]);
        }
        other => panic!("unexpected delta {other:?}"),
    }
}

#[test]
fn worker_reports_sign_in_refusal_as_a_warning() {
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    cmd_tx
        .send(StoreCommand::SignIn {
            email: "coach@club.fr".to_string(),
            password: "secret".to_string(),
        })
        .unwrap();
    drop(cmd_tx);

    run_store_worker(Box::new(seeded()), &local_config(false), &tx, cmd_rx);
    drop(tx);

    match rx.iter().collect::<Vec<_>>().as_slice() {
        [Delta::Log(msg)] => assert!(msg.starts_with("[WARN] Sign-in failed")),
        other => panic!("unexpected deltas {other:?}"),
    }
}

#[test]
fn worker_signs_in_locally_when_editing_is_allowed() {
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    cmd_tx
        .send(StoreCommand::SignIn {
            email: " coach@club.fr ".to_string(),
            password: "secret".to_string(),
        })
        .unwrap();
    drop(cmd_tx);

    run_store_worker(Box::new(seeded()), &local_config(true), &tx, cmd_rx);
    drop(tx);

    match rx.iter().collect::<Vec<_>>().as_slice() {
        [Delta::SignedIn(session)] => {
            assert_eq!(session.email.as_deref(), Some("coach@club.fr"));
            assert_eq!(session.expires_at, None);
        }
        other => panic!("unexpected deltas {other:?}"),
    }
}
