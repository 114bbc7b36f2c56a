#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are device pixels with the origin at the top-left.
//! Rectangles are half-open: `(x0, y0)` inclusive, `(x1, y1)` exclusive,
//! so two rectangles sharing an edge do not overlap and tile cleanly.

/// An axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x0: i32,
    /// Top edge (inclusive).
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

impl Rect {
    /// Create a new rectangle from its edges.
    #[inline]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from origin and size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width in pixels. Zero for inverted rectangles.
    #[inline]
    pub const fn width(&self) -> i32 {
        if self.x1 > self.x0 { self.x1 - self.x0 } else { 0 }
    }

    /// Height in pixels. Zero for inverted rectangles.
    #[inline]
    pub const fn height(&self) -> i32 {
        if self.y1 > self.y0 { self.y1 - self.y0 } else { 0 }
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Check if the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Check that the edges are not inverted.
    ///
    /// A valid rectangle may still be empty (zero width or height).
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Check if `other` lies entirely within this rectangle.
    #[inline]
    pub const fn contains(&self, other: &Rect) -> bool {
        self.x0 <= other.x0 && self.x1 >= other.x1 && self.y0 <= other.y0 && self.y1 >= other.y1
    }

    /// Check if this rectangle shares any pixel with `other`.
    #[inline]
    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && self.x1 > other.x0 && self.y0 < other.y1 && self.y1 > other.y0
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns `None` if the rectangles share no pixels.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let r = Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if r.is_empty() { None } else { Some(r) }
    }

    /// The smallest rectangle containing both this rectangle and `other`.
    pub fn union_with(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A point in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A line segment between two points.
///
/// Coordinates are at the centre of the line's width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Line {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Line {
    /// Create a new line segment.
    #[inline]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}
