use std::sync::mpsc::{self, Receiver};

use lineup_board::position::{Zone, ZoneScheme};
use lineup_board::roster::{
    Delta, NewPlayer, PlayerPatch, PlayerRecord, Role, Roster, StoreCommand, apply_delta,
};
use lineup_board::session::Session;

fn player(id: i64, last: &str, on_board: bool, y: f64) -> PlayerRecord {
    PlayerRecord {
        id,
        last_name: last.to_string(),
        first_name: "Jean".to_string(),
        number: Some(id.to_string()),
        role: Role::FieldPlayer,
        category: "U11".to_string(),
        on_board,
        x: 15.0,
        y,
    }
}

fn loaded_roster() -> (Roster, Receiver<StoreCommand>) {
    let (tx, rx) = mpsc::channel();
    let categories = vec!["U9".to_string(), "U11".to_string(), "U13-U12".to_string()];
    let mut roster = Roster::new(categories, "U11", Some(tx));
    apply_delta(
        &mut roster,
        Delta::SetRoster {
            category: "U11".to_string(),
            players: vec![
                player(1, "Abel", true, 40.0),
                player(2, "Bernard", true, 1000.0),
                player(3, "Colin", false, 0.0),
            ],
        },
    );
    (roster, rx)
}

fn drain(rx: &Receiver<StoreCommand>) -> Vec<StoreCommand> {
    rx.try_iter().collect()
}

#[test]
fn bench_snaps_to_canonical_point_and_writes_all_fields() {
    let (mut roster, rx) = loaded_roster();
    roster.set_zone(3, Zone::Bench);

    let p = roster.get(3).unwrap();
    assert!(p.on_board);
    assert_eq!((p.x, p.y), (0.0, 1000.0));
    assert_eq!(p.zone(&roster.scheme), Zone::Bench);

    let cmds = drain(&rx);
    assert_eq!(cmds.len(), 1);
    match &cmds[0] {
        StoreCommand::Update { id, patch } => {
            assert_eq!(*id, 3);
            assert_eq!(
                *patch,
                PlayerPatch {
                    on_board: Some(true),
                    x: Some(0.0),
                    y: Some(1000.0)
                }
            );
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn each_secondary_zone_lands_in_its_band() {
    let (mut roster, _rx) = loaded_roster();
    for zone in [Zone::Injured, Zone::Suspended, Zone::OnField, Zone::Bench] {
        roster.set_zone(1, zone);
        assert_eq!(roster.get(1).unwrap().zone(&roster.scheme), zone);
    }
}

#[test]
fn two_zone_boards_send_injured_players_to_the_bench() {
    let (mut roster, _rx) = loaded_roster();
    roster.scheme = ZoneScheme::TWO_ZONE;
    roster.set_zone(3, Zone::Injured);
    assert_eq!(roster.get(3).unwrap().zone(&roster.scheme), Zone::Bench);
}

#[test]
fn removing_from_board_only_clears_the_flag() {
    let (mut roster, rx) = loaded_roster();
    roster.remove_from_board(1);

    let p = roster.get(1).unwrap();
    assert!(!p.on_board);
    assert_eq!(p.zone(&roster.scheme), Zone::Unplaced);

    match drain(&rx).as_slice() {
        [StoreCommand::Update { id: 1, patch }] => assert_eq!(*patch, PlayerPatch::off_board()),
        other => panic!("unexpected commands {other:?}"),
    }
}

#[test]
fn move_updates_coordinates_without_touching_the_flag() {
    let (mut roster, rx) = loaded_roster();
    roster.move_to(1, -120.0, 88.0);

    let p = roster.get(1).unwrap();
    assert!(p.on_board);
    assert_eq!((p.x, p.y), (-120.0, 88.0));
    match drain(&rx).as_slice() {
        [StoreCommand::Update { id: 1, patch }] => {
            assert_eq!(*patch, PlayerPatch::coordinates(-120.0, 88.0))
        }
        other => panic!("unexpected commands {other:?}"),
    }
}

#[test]
fn unknown_ids_are_ignored() {
    let (mut roster, rx) = loaded_roster();
    roster.set_zone(99, Zone::Bench);
    roster.move_to(99, 1.0, 1.0);
    roster.request_delete(99);
    assert!(roster.pending_delete.is_none());
    assert!(drain(&rx).is_empty());
}

#[test]
fn declined_delete_changes_nothing() {
    let (mut roster, rx) = loaded_roster();
    let before = roster.players.clone();
    roster.request_delete(2);
    assert_eq!(roster.pending_delete, Some(2));

    roster.resolve_delete(false);
    assert!(roster.pending_delete.is_none());
    assert_eq!(roster.players, before);
    assert!(drain(&rx).is_empty());
}

#[test]
fn confirmed_delete_removes_locally_then_in_store() {
    let (mut roster, rx) = loaded_roster();
    roster.selected = 2;
    roster.request_delete(2);
    roster.resolve_delete(true);

    assert!(roster.get(2).is_none());
    assert_eq!(roster.players.len(), 2);
    assert!(roster.selected < roster.players.len());
    match drain(&rx).as_slice() {
        [StoreCommand::Delete { id: 2 }] => {}
        other => panic!("unexpected commands {other:?}"),
    }
}

#[test]
fn create_requires_a_last_name() {
    let (mut roster, rx) = loaded_roster();
    let blank = NewPlayer::new("  ", "Jean", None, Role::FieldPlayer, "U11");
    assert!(!roster.create(blank));
    assert!(drain(&rx).is_empty());

    let ok = NewPlayer::new("Durand", "", Some("4"), Role::Goalkeeper, "U11");
    assert!(roster.create(ok.clone()));
    match drain(&rx).as_slice() {
        [StoreCommand::Insert(sent)] => assert_eq!(*sent, ok),
        other => panic!("unexpected commands {other:?}"),
    }
    // Not listed until the store hands back an id.
    assert_eq!(roster.players.len(), 3);
}

#[test]
fn created_player_is_appended_once_in_the_reserve() {
    let (mut roster, _rx) = loaded_roster();
    let mut created = player(40, "Durand", false, 0.0);
    created.x = 0.0;

    apply_delta(&mut roster, Delta::PlayerCreated(created.clone()));
    apply_delta(&mut roster, Delta::PlayerCreated(created));

    assert_eq!(roster.players.len(), 4);
    assert_eq!(roster.players[3].id, 40);
    assert_eq!(
        roster.get(40).unwrap().zone(&roster.scheme),
        Zone::Unplaced
    );
}

#[test]
fn replies_for_another_category_are_dropped() {
    let (mut roster, rx) = loaded_roster();
    roster.cycle_category(true);
    assert_eq!(roster.category, "U13-U12");
    assert!(roster.loading);
    assert!(roster.players.is_empty());
    match drain(&rx).as_slice() {
        [StoreCommand::List { category }] => assert_eq!(category, "U13-U12"),
        other => panic!("unexpected commands {other:?}"),
    }

    apply_delta(
        &mut roster,
        Delta::SetRoster {
            category: "U11".to_string(),
            players: vec![player(8, "Late", true, 0.0)],
        },
    );
    assert!(roster.get(8).is_none());
    assert!(roster.loading);

    let mut stray = player(9, "Stray", false, 0.0);
    stray.category = "U11".to_string();
    apply_delta(&mut roster, Delta::PlayerCreated(stray));
    assert!(roster.get(9).is_none());

    apply_delta(
        &mut roster,
        Delta::ListFailed {
            category: "U13-U12".to_string(),
        },
    );
    assert!(!roster.loading);
}

#[test]
fn category_cycle_wraps_both_ways() {
    let (mut roster, _rx) = loaded_roster();
    roster.cycle_category(false);
    assert_eq!(roster.category, "U9");
    roster.cycle_category(false);
    assert_eq!(roster.category, "U13-U12");
    roster.cycle_category(true);
    assert_eq!(roster.category, "U9");
}

#[test]
fn reload_keeps_the_selected_player() {
    let (mut roster, _rx) = loaded_roster();
    roster.select_id(3);
    let selected = roster.selected_id();
    assert_eq!(selected, Some(3));

    apply_delta(
        &mut roster,
        Delta::SetRoster {
            category: "U11".to_string(),
            players: vec![player(3, "Colin", false, 0.0), player(1, "Abel", true, 0.0)],
        },
    );
    assert_eq!(roster.selected_id(), Some(3));
}

#[test]
fn view_order_walks_pitch_then_zones_then_reserve() {
    let (roster, _rx) = loaded_roster();
    let order: Vec<i64> = roster.view_order().iter().map(|p| p.id).collect();
    assert_eq!(order, vec![1, 2, 3]);
    let counts = roster.zone_counts();
    assert_eq!(counts.get(&Zone::OnField), Some(&1));
    assert_eq!(counts.get(&Zone::Bench), Some(&1));
    assert_eq!(counts.get(&Zone::Unplaced), Some(&1));
}

#[test]
fn sign_in_and_out_toggle_editing() {
    let (mut roster, rx) = loaded_roster();
    assert!(!roster.is_admin);
    apply_delta(
        &mut roster,
        Delta::SignedIn(Session {
            access_token: "tok".to_string(),
            email: Some("coach@club.fr".to_string()),
            expires_at: None,
        }),
    );
    assert!(roster.is_admin);

    roster.request_delete(1);
    roster.sign_out();
    assert!(!roster.is_admin);
    assert!(roster.session.is_none());
    assert!(roster.pending_delete.is_none());

    let cmds = drain(&rx);
    assert!(matches!(cmds.first(), Some(StoreCommand::SignOut(s)) if s.access_token == "tok"));
    assert!(matches!(cmds.last(), Some(StoreCommand::List { category }) if category == "U11"));
}

#[test]
fn missing_store_is_reported_not_fatal() {
    let mut roster = Roster::new(vec!["U7".to_string()], "U7", None);
    roster.reload();
    assert_eq!(
        roster.logs.back().map(String::as_str),
        Some("[INFO] Store unavailable")
    );
}
