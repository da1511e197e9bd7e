use crate::roster::PlayerId;

/// Axis-aligned rectangle in screen units, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// A rect with no area has not been laid out yet.
    pub fn is_measurable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.x.is_finite() && self.y.is_finite()
    }

    /// Move `self` so it lies fully inside `bounds`. A rect larger than the bounds
    /// is pinned to the bounds' top-left corner.
    pub fn clamped_within(&self, bounds: &ScreenRect) -> ScreenRect {
        let max_x = (bounds.x + bounds.width - self.width).max(bounds.x);
        let max_y = (bounds.y + bounds.height - self.height).max(bounds.y);
        ScreenRect {
            x: self.x.clamp(bounds.x, max_x),
            y: self.y.clamp(bounds.y, max_y),
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Center-origin position of a settled token inside its container.
///
/// Works from where the token was actually drawn, not from pointer deltas: once
/// the container clamps a drag, the pointer offset no longer matches the token's
/// displacement. Returns `None` when either rect cannot be measured.
pub fn reconcile(token: Option<ScreenRect>, container: Option<ScreenRect>) -> Option<Point> {
    let token = token.filter(ScreenRect::is_measurable)?;
    let container = container.filter(ScreenRect::is_measurable)?;

    let center = token.center();
    let half_w = container.width / 2.0;
    let half_h = container.height / 2.0;
    let x = center.x - container.x - half_w;
    let y = center.y - container.y - half_h;

    Some(Point {
        x: x.clamp(-half_w, half_w),
        y: y.clamp(-half_h, half_h),
    })
}

/// Token rect for a center-origin position, the inverse of [`reconcile`].
pub fn place(pos: Point, size: (f64, f64), container: &ScreenRect) -> ScreenRect {
    let (width, height) = size;
    ScreenRect {
        x: container.x + container.width / 2.0 + pos.x - width / 2.0,
        y: container.y + container.height / 2.0 + pos.y - height / 2.0,
        width,
        height,
    }
}

/// One pointer drag on a token, from press to release.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub player: PlayerId,
    grab: Point,
    origin: ScreenRect,
    token: ScreenRect,
}

impl DragSession {
    /// `pointer` is where the press happened, `token` where the token was drawn.
    pub fn start(player: PlayerId, pointer: Point, token: ScreenRect) -> Self {
        Self {
            player,
            grab: Point::new(pointer.x - token.x, pointer.y - token.y),
            origin: token,
            token,
        }
    }

    /// Follow the pointer. The container is a hard limit: the token never leaves it.
    pub fn drag_to(&mut self, pointer: Point, container: &ScreenRect) {
        let moved = ScreenRect {
            x: pointer.x - self.grab.x,
            y: pointer.y - self.grab.y,
            ..self.token
        };
        self.token = moved.clamped_within(container);
    }

    pub fn token_rect(&self) -> ScreenRect {
        self.token
    }

    /// A press and release without motion is a click, not a move.
    pub fn has_moved(&self) -> bool {
        self.token != self.origin
    }

    /// Settle the token; `None` when the container is gone.
    pub fn finish(self, container: Option<ScreenRect>) -> Option<(PlayerId, Point)> {
        reconcile(Some(self.token), container).map(|p| (self.player, p))
    }
}
