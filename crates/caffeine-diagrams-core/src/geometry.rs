//! Points, sizes and rectangles in diagram space.
//!
//! Diagram space uses SVG coordinates: the origin is the top-left corner of
//! the canvas, x grows to the right and y grows downwards. Layout places
//! every element by its center, so most code moves between a center
//! [`Point`] and a [`Bounds`] through [`Point::to_bounds`].

/// A position on the canvas.
///
/// ```
/// # use caffeine_diagrams_core::geometry::Point;
/// let api = Point::new(10.0, 20.0);
/// let db = Point::new(30.0, 60.0);
///
/// assert_eq!(api.add_point(db), Point::new(40.0, 80.0));
/// assert_eq!(api.midpoint(db), Point::new(20.0, 40.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Same point moved horizontally to `x`
    pub fn with_x(self, x: f32) -> Self {
        Self::new(x, self.y)
    }

    /// Same point moved vertically to `y`
    pub fn with_y(self, y: f32) -> Self {
        Self::new(self.x, y)
    }

    /// Offsets this point by `offset`.
    pub fn add_point(self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    pub fn midpoint(self, other: Point) -> Self {
        self.add_point(other).scale(0.5)
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Bounds of an element of `size` centered on this point.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::from_center(self, size)
    }
}

/// Extent of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Wide enough and tall enough for both sizes.
    pub fn max(self, other: Size) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    pub fn add_padding(self, insets: Insets) -> Self {
        Self::new(
            self.width + insets.horizontal_sum(),
            self.height + insets.vertical_sum(),
        )
    }

    /// An empty size, as produced by blank labels.
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// An axis-aligned rectangle stored as its top-left and bottom-right corners.
///
/// ```
/// # use caffeine_diagrams_core::geometry::{Bounds, Point, Size};
/// let cluster = Bounds::from_origin(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
/// let node = Bounds::from_origin(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
///
/// let frame = cluster.merge(&node);
/// assert_eq!(frame.width(), 130.0);
/// assert_eq!(frame.height(), 120.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    pub fn from_center(center: Point, size: Size) -> Self {
        let half = Point::new(size.width / 2.0, size.height / 2.0);
        Self {
            min: center.add_point(half.scale(-1.0)),
            max: center.add_point(half),
        }
    }

    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self {
            min: origin,
            max: origin.add_point(Point::new(size.width, size.height)),
        }
    }

    pub fn min_x(self) -> f32 {
        self.min.x
    }

    pub fn min_y(self) -> f32 {
        self.min.y
    }

    pub fn max_x(self) -> f32 {
        self.max.x
    }

    pub fn max_y(self) -> f32 {
        self.max.y
    }

    pub fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Top-left corner
    pub fn min_point(self) -> Point {
        self.min
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min: self.min.add_point(offset),
            max: self.max.add_point(offset),
        }
    }

    /// Grows every side outwards by its inset.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min: self.min.add_point(Point::new(-insets.left, -insets.top)),
            max: self.max.add_point(Point::new(insets.right, insets.bottom)),
        }
    }

    /// Whether `other` fits inside, touching edges included.
    pub fn contains(&self, other: &Self) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Whether the two rectangles share interior area.
    pub fn intersects(&self, other: &Self) -> bool {
        let apart_x = self.max.x <= other.min.x || other.max.x <= self.min.x;
        let apart_y = self.max.y <= other.min.y || other.max.y <= self.min.y;
        !(apart_x || apart_y)
    }
}

/// Per-side spacing, in CSS order (top, right, bottom, left).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_helpers() {
        let p = Point::new(3.5, 4.0);

        assert_eq!(p.add_point(Point::new(1.5, -2.0)), Point::new(5.0, 2.0));
        assert_eq!(p.scale(2.0), Point::new(7.0, 8.0));
        assert_eq!(p.with_x(0.0).with_y(1.0), Point::new(0.0, 1.0));
        assert_eq!(p.midpoint(Point::new(-3.5, 0.0)), Point::new(0.0, 2.0));
    }

    #[test]
    fn test_size_padding_and_zero() {
        let padded = Size::new(100.0, 50.0).add_padding(Insets::new(10.0, 5.0, 20.0, 15.0));
        assert_approx_eq!(f32, padded.width(), 120.0);
        assert_approx_eq!(f32, padded.height(), 80.0);

        assert!(Size::default().is_zero());
        assert!(!Size::new(0.0, 1.0).is_zero());
        assert_eq!(
            Size::new(10.0, 40.0).max(Size::new(30.0, 5.0)),
            Size::new(30.0, 40.0)
        );
    }

    #[test]
    fn test_icon_bounds_from_center() {
        let bounds = Point::new(50.0, 50.0).to_bounds(Size::new(64.0, 90.0));
        assert_approx_eq!(f32, bounds.min_x(), 18.0);
        assert_approx_eq!(f32, bounds.min_y(), 5.0);
        assert_approx_eq!(f32, bounds.max_x(), 82.0);
        assert_approx_eq!(f32, bounds.max_y(), 95.0);
        assert_eq!(bounds.center(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_translate_keeps_size() {
        let bounds = Bounds::from_origin(Point::new(10.0, 20.0), Size::new(50.0, 30.0));
        let moved = bounds.translate(Point::new(100.0, 50.0));
        assert_eq!(moved.min_point(), Point::new(110.0, 70.0));
        assert_eq!(moved.to_size(), bounds.to_size());
    }

    #[test]
    fn test_cluster_padding_contains_content() {
        let content = Bounds::from_origin(Point::new(10.0, 10.0), Size::new(10.0, 10.0));
        let frame = content.add_padding(Insets::new(30.0, 5.0, 5.0, 5.0));
        assert_eq!(frame.min_point(), Point::new(5.0, -20.0));
        assert_approx_eq!(f32, frame.width(), 20.0);
        assert_approx_eq!(f32, frame.height(), 45.0);
        assert!(frame.contains(&content));
        assert!(!content.contains(&frame));
    }

    #[test]
    fn test_intersects_ignores_shared_edges() {
        let a = Bounds::from_origin(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Bounds::from_origin(Point::new(5.0, 5.0), Size::new(10.0, 10.0));
        let neighbour = Bounds::from_origin(Point::new(10.0, 0.0), Size::new(10.0, 10.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&neighbour));
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn any_bounds() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::from_origin(Point::new(x, y), Size::new(w, h)))
    }

    proptest! {
        #[test]
        fn merge_covers_both(a in any_bounds(), b in any_bounds()) {
            let merged = a.merge(&b);
            prop_assert!(merged.contains(&a));
            prop_assert!(merged.contains(&b));
        }

        #[test]
        fn merge_is_commutative(a in any_bounds(), b in any_bounds()) {
            prop_assert_eq!(a.merge(&b), b.merge(&a));
        }

        #[test]
        fn center_survives_to_bounds(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            w in 0.0f32..500.0,
            h in 0.0f32..500.0,
        ) {
            let bounds = Point::new(x, y).to_bounds(Size::new(w, h));
            prop_assert!(approx_eq!(f32, bounds.center().x(), x, epsilon = 0.01));
            prop_assert!(approx_eq!(f32, bounds.center().y(), y, epsilon = 0.01));
            prop_assert!(approx_eq!(f32, bounds.width(), w, epsilon = 0.01));
        }
    }
}
