//! Geometric primitives in layout units.
//!
//! Layout coordinates are `f64` with the origin at the top-left corner of the
//! layout. A [`Rect`] is stored by its four edges, the same way areas are
//! described by their four tabs.

use serde::{Deserialize, Serialize};

/// Two values closer than this are considered equal by [`fuzzy_eq`].
pub const FUZZY_TOLERANCE: f64 = 0.1;

/// Loose equality used when comparing solved tab positions.
#[inline]
pub fn fuzzy_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < FUZZY_TOLERANCE
}

/// Layout axis. `X` tabs are vertical lines, `Y` tabs are horizontal lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The other axis.
    #[inline]
    pub const fn orthogonal(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Component of `point` along this axis.
    #[inline]
    pub const fn of_point(self, point: Point) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
        }
    }
}

/// A position in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

    /// Point translated by `delta`.
    #[inline]
    #[must_use]
    pub fn offset(self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }
}

/// A width/height pair in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along `axis`.
    #[inline]
    pub const fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }
}

/// A rectangle described by its edges.
///
/// `left <= right` and `top <= bottom` for well-formed rectangles; degenerate
/// (zero-width or zero-height) rectangles are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Create a rectangle from its edges.
    #[inline]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from its top-left corner and size.
    #[inline]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    #[inline]
    pub const fn left_top(&self) -> Point {
        Point::new(self.left, self.top)
    }

    #[inline]
    pub const fn right_bottom(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    /// Both edges along `axis` as `(near, far)`.
    #[inline]
    pub const fn edges(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.left, self.right),
            Axis::Y => (self.top, self.bottom),
        }
    }

    /// Check if a point lies inside the rectangle, edges included.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Check whether the interiors of two rectangles share any space.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.overlap_along(other, Axis::X) > 0.0 && self.overlap_along(other, Axis::Y) > 0.0
    }

    /// Length of the shared interval along `axis` (negative if disjoint).
    #[inline]
    pub fn overlap_along(&self, other: &Rect, axis: Axis) -> f64 {
        let (a1, a2) = self.edges(axis);
        let (b1, b2) = other.edges(axis);
        a2.min(b2) - a1.max(b1)
    }

    /// Check whether two rectangles overlap by more than `tolerance` on both axes.
    #[inline]
    pub fn overlaps_beyond(&self, other: &Rect, tolerance: f64) -> bool {
        self.overlap_along(other, Axis::X) > tolerance
            && self.overlap_along(other, Axis::Y) > tolerance
    }

    /// Rectangle shrunk by `dx` on the left and right and `dy` on the top and bottom.
    #[inline]
    #[must_use]
    pub fn inset_by(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right - dx, self.bottom - dy)
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Self {
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}
