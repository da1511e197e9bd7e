use serde::{Deserialize, Serialize};

/// Where a player shows up on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    OnField,
    Bench,
    Injured,
    Suspended,
    Unplaced,
}

impl Zone {
    pub const PLACED: [Zone; 4] = [Zone::OnField, Zone::Bench, Zone::Injured, Zone::Suspended];
}

/// Ordered `y` thresholds splitting placed players into bands.
///
/// Band `i` covers `thresholds[i - 1] <= y < thresholds[i]`; the first band is
/// unbounded below and the last one unbounded above. The stored `y` of a placed
/// player is both its display coordinate and its zone selector, so these values
/// are part of the persisted data format and must not change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneScheme {
    thresholds: &'static [f64],
    bands: &'static [Zone],
}

impl ZoneScheme {
    pub const TWO_ZONE: ZoneScheme = ZoneScheme {
        thresholds: &[1000.0],
        bands: &[Zone::OnField, Zone::Bench],
    };

    pub const FOUR_ZONE: ZoneScheme = ZoneScheme {
        thresholds: &[1000.0, 2000.0, 3000.0],
        bands: &[Zone::OnField, Zone::Bench, Zone::Injured, Zone::Suspended],
    };

    pub fn classify(&self, on_board: bool, y: f64) -> Zone {
        if !on_board {
            return Zone::Unplaced;
        }
        let band = self.thresholds.iter().take_while(|t| y >= **t).count();
        self.bands[band]
    }

    pub fn zones(&self) -> &'static [Zone] {
        self.bands
    }

    /// Canonical `y` a player snaps to when entering `zone`.
    ///
    /// Zones the scheme has no band for fall into the last band.
    pub fn canonical_y(&self, zone: Zone) -> f64 {
        let band = self
            .bands
            .iter()
            .position(|z| *z == zone)
            .unwrap_or(self.bands.len() - 1);
        if band == 0 {
            0.0
        } else {
            self.thresholds[band - 1]
        }
    }

    pub fn canonical_point(&self, zone: Zone) -> (f64, f64) {
        (0.0, self.canonical_y(zone))
    }
}

impl Default for ZoneScheme {
    fn default() -> Self {
        Self::FOUR_ZONE
    }
}

/// The part of a record that decides its zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub on_board: bool,
    pub x: f64,
    pub y: f64,
}

impl Placement {
    pub const POOL: Placement = Placement {
        on_board: false,
        x: 0.0,
        y: 0.0,
    };

    pub fn zone(&self, scheme: &ZoneScheme) -> Zone {
        scheme.classify(self.on_board, self.y)
    }

    /// Snap into `zone`, dropping any previous coordinates.
    pub fn enter(&mut self, scheme: &ZoneScheme, zone: Zone) {
        if zone == Zone::Unplaced {
            self.remove_from_board();
            return;
        }
        let (x, y) = scheme.canonical_point(zone);
        self.on_board = true;
        self.x = x;
        self.y = y;
    }

    /// Back to the pool. Coordinates are kept but no longer mean anything.
    pub fn remove_from_board(&mut self) {
        self.on_board = false;
    }
}

pub fn zone_label(zone: Zone) -> &'static str {
    match zone {
        Zone::OnField => "On field",
        Zone::Bench => "Bench",
        Zone::Injured => "Injured",
        Zone::Suspended => "Suspended",
        Zone::Unplaced => "Reserve",
    }
}
