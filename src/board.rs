use crate::drag::{self, DragSession, Point, ScreenRect};
use crate::position::Zone;
use crate::roster::{PlayerId, PlayerRecord};

/// Native pitch size in logical pixels. Stored coordinates use this scale.
pub const BOARD_WIDTH: f64 = 450.0;
pub const BOARD_HEIGHT: f64 = 600.0;

/// The pitch container: maps logical center-origin coordinates to wherever the
/// pitch is drawn and keeps dragged tokens inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Board {
    pub width: f64,
    pub height: f64,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

impl Board {
    /// Screen units per logical pixel on each axis.
    pub fn scale(&self, container: &ScreenRect) -> (f64, f64) {
        (container.width / self.width, container.height / self.height)
    }

    pub fn to_screen(&self, logical: Point, container: &ScreenRect) -> Point {
        let (sx, sy) = self.scale(container);
        Point::new(logical.x * sx, logical.y * sy)
    }

    pub fn to_logical(&self, screen: Point, container: &ScreenRect) -> Point {
        let (sx, sy) = self.scale(container);
        if sx <= 0.0 || sy <= 0.0 {
            return Point::default();
        }
        Point::new(screen.x / sx, screen.y / sy)
    }

    /// Where a token of `size` screen units is drawn, clamped into the container.
    pub fn token_rect(
        &self,
        record: &PlayerRecord,
        size: (f64, f64),
        container: &ScreenRect,
    ) -> ScreenRect {
        let pos = self.to_screen(Point::new(record.x, record.y), container);
        drag::place(pos, size, container).clamped_within(container)
    }

    /// Topmost token under `pointer`; later entries are drawn on top.
    pub fn hit_test<'a, F>(
        &self,
        tokens: &[&'a PlayerRecord],
        container: &ScreenRect,
        pointer: Point,
        size_of: F,
    ) -> Option<(&'a PlayerRecord, ScreenRect)>
    where
        F: Fn(&PlayerRecord) -> (f64, f64),
    {
        tokens.iter().rev().find_map(|record| {
            let rect = self.token_rect(record, size_of(record), container);
            rect.contains(pointer).then_some((*record, rect))
        })
    }

    /// Settle a drag into logical coordinates. `None` drops the move.
    pub fn finish_drag(
        &self,
        session: DragSession,
        container: Option<ScreenRect>,
    ) -> Option<(PlayerId, Point)> {
        let measured = container.filter(ScreenRect::is_measurable)?;
        let (id, screen) = session.finish(Some(measured))?;
        let logical = self.to_logical(screen, &measured);
        Some((id, Point::new(logical.x.round(), logical.y.round())))
    }
}

/// Only on-field players are laid out on the pitch.
pub fn pitch_tokens<'a>(
    players: &'a [PlayerRecord],
    zone_of: impl Fn(&PlayerRecord) -> Zone,
) -> Vec<&'a PlayerRecord> {
    players
        .iter()
        .filter(|p| zone_of(p) == Zone::OnField)
        .collect()
}
