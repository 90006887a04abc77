#![forbid(unsafe_code)]

//! Geometric primitives.

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A bounding rectangle in viewport (client) coordinates, as reported by
/// `Element.getBoundingClientRect()`.
///
/// Origin is the top-left of the viewport; `x` grows right, `y` grows down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: f64,
    /// Top edge (inclusive).
    pub top: f64,
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// True when the rectangle cannot be used as a divisor: zero, negative or
    /// non-finite extent, or a non-finite origin.
    ///
    /// A container that has not been laid out yet reports a zero-sized rect.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.width.is_finite()
            || !self.height.is_finite()
            || !self.left.is_finite()
            || !self.top.is_finite()
    }

    /// Check if a point is inside the rectangle. Degenerate rectangles
    /// contain nothing.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        !self.is_degenerate()
            && x >= self.left
            && x < self.right()
            && y >= self.top
            && y < self.bottom()
    }

    /// Translate a client-space point into rectangle-relative pixels.
    #[inline]
    pub fn relative(&self, x: f64, y: f64) -> Point {
        Point::new(x - self.left, y - self.top)
    }

    /// Map a client-space point to percentages of the rectangle extent,
    /// each clamped to `[0, 100]`.
    ///
    /// Returns `None` when the rectangle is degenerate or the point is not
    /// finite, so `NaN`/`Infinity` never escape.
    pub fn percent_of(&self, x: f64, y: f64) -> Option<Point> {
        if self.is_degenerate() || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let px = ((x - self.left) / self.width * 100.0).clamp(0.0, 100.0);
        let py = ((y - self.top) / self.height * 100.0).clamp(0.0, 100.0);
        Some(Point::new(px, py))
    }
}
