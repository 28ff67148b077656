//! Rectangles and points used for monitor/client geometry.
//!
//! Coordinates are signed: clients are parked off-screen at negative `x` while hidden (see
//! [`crate::focus::showhide`]), which an unsigned representation cannot express.

/// A single (x, y) coordinate in screen space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Construct a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle: top-left corner plus width/height.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl Rect {
    /// Construct a new rectangle.
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (`x + w`).
    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    /// Bottom edge (`y + h`).
    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    /// The center point of this rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w as i32 / 2, self.y + self.h as i32 / 2)
    }

    /// Area of the intersection between this rectangle and `other`, in pixels.
    ///
    /// Used to decide which monitor a dragged client "mostly" belongs to (§4.7).
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let ix = self.x.max(other.x);
        let iy = self.y.max(other.y);
        let iright = self.right().min(other.right());
        let ibottom = self.bottom().min(other.bottom());

        if iright <= ix || ibottom <= iy {
            0
        } else {
            (iright - ix) as i64 * (ibottom - iy) as i64
        }
    }

    /// Does `p` fall within this rectangle?
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Shrink every edge inward by `border` (used when translating a client's stored frame
    /// geometry into the coordinates passed to an `XConfigureWindow`-style request, which do
    /// not include the border).
    pub fn shrink_border(&self, border: u32) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.w.saturating_sub(2 * border),
            self.h.saturating_sub(2 * border),
        )
    }
}

/// Find which of `rects` (monitor geometries) `r`'s center lies within, preferring the
/// rectangle with the largest intersection area if the center is exactly on a boundary shared
/// by more than one (ties resolved by first match, matching iteration order).
pub fn best_overlap<'a>(r: &Rect, rects: impl Iterator<Item = (usize, &'a Rect)>) -> Option<usize> {
    rects
        .map(|(i, m)| (i, r.intersection_area(m)))
        .filter(|(_, area)| *area > 0)
        .max_by_key(|(_, area)| *area)
        .map(|(i, _)| i)
}
