use lineup_board::position::{Placement, Zone, ZoneScheme, zone_label};

#[test]
fn four_zone_bands_split_on_thresholds() {
    let s = ZoneScheme::FOUR_ZONE;
    assert_eq!(s.classify(true, -300.0), Zone::OnField);
    assert_eq!(s.classify(true, 999.9), Zone::OnField);
    assert_eq!(s.classify(true, 1000.0), Zone::Bench);
    assert_eq!(s.classify(true, 1999.0), Zone::Bench);
    assert_eq!(s.classify(true, 2000.0), Zone::Injured);
    assert_eq!(s.classify(true, 3000.0), Zone::Suspended);
    assert_eq!(s.classify(true, 1e9), Zone::Suspended);
}

#[test]
fn off_board_players_are_unplaced_whatever_their_y() {
    for y in [0.0, 1000.0, 2500.0, -4.0] {
        assert_eq!(ZoneScheme::FOUR_ZONE.classify(false, y), Zone::Unplaced);
        assert_eq!(ZoneScheme::TWO_ZONE.classify(false, y), Zone::Unplaced);
    }
}

#[test]
fn two_zone_board_has_no_injury_bands() {
    let s = ZoneScheme::TWO_ZONE;
    assert_eq!(s.zones(), &[Zone::OnField, Zone::Bench]);
    assert_eq!(s.classify(true, 3500.0), Zone::Bench);
    assert_eq!(s.canonical_y(Zone::Suspended), 1000.0);
}

#[test]
fn entering_a_zone_resets_coordinates() {
    let s = ZoneScheme::FOUR_ZONE;
    let mut p = Placement {
        on_board: true,
        x: 120.0,
        y: -80.0,
    };
    p.enter(&s, Zone::Injured);
    assert_eq!(p, Placement { on_board: true, x: 0.0, y: 2000.0 });

    p.enter(&s, Zone::OnField);
    assert_eq!((p.x, p.y), (0.0, 0.0));
    assert_eq!(p.zone(&s), Zone::OnField);

    p.enter(&s, Zone::Unplaced);
    assert_eq!(p.zone(&s), Zone::Unplaced);
}

#[test]
fn reserve_is_the_label_for_unplaced() {
    assert_eq!(zone_label(Zone::Unplaced), "Reserve");
    assert_eq!(zone_label(Zone::Bench), "Bench");
}
