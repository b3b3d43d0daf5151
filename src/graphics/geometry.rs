//! Points, extents and rectangles used by bitmaps and BitBlt.
//!
//! Coordinates are signed so that requests may name regions that lie
//! partially (or entirely) outside a bitmap; clipping sorts them out.
//! Edges are computed in `i64` so that no combination of `i32` inputs can
//! overflow.

/// 2D point (x, y)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Point {
        Point::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }
}

/// 2D size (width, height)
///
/// A non-positive width or height describes an empty area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Rectangle described by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub corner: Point,
    pub extent: Extent,
}

impl Rect {
    pub const fn new(corner: Point, extent: Extent) -> Self {
        Self { corner, extent }
    }

    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            corner: Point::new(x, y),
            extent: Extent::new(width, height),
        }
    }

    pub fn x(&self) -> i32 {
        self.corner.x
    }

    pub fn y(&self) -> i32 {
        self.corner.y
    }

    pub fn width(&self) -> i32 {
        self.extent.width
    }

    pub fn height(&self) -> i32 {
        self.extent.height
    }

    /// Right edge x-coordinate (exclusive)
    pub fn right(&self) -> i64 {
        self.corner.x as i64 + self.extent.width as i64
    }

    /// Bottom edge y-coordinate (exclusive)
    pub fn bottom(&self) -> i64 {
        self.corner.y as i64 + self.extent.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_empty()
    }

    /// Check if a point is within the rectangle
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.corner.x
            && point.y >= self.corner.y
            && (point.x as i64) < self.right()
            && (point.y as i64) < self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle.
    ///
    /// An empty rectangle is contained by anything.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.corner.x >= self.corner.x
                && other.corner.y >= self.corner.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    /// Check if this rectangle intersects with another
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.right() > other.corner.x as i64
            && self.bottom() > other.corner.y as i64
            && (self.corner.x as i64) < other.right()
            && (self.corner.y as i64) < other.bottom()
    }

    /// Get the intersection of two rectangles (if any)
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        let x1 = self.corner.x.max(other.corner.x);
        let y1 = self.corner.y.max(other.corner.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        // Both edges lie inside `self`, so the differences fit an i32.
        Some(Rect::from_xywh(
            x1,
            y1,
            (x2 - x1 as i64) as i32,
            (y2 - y1 as i64) as i32,
        ))
    }
}
