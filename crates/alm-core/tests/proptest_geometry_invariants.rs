//! Property-based invariant tests for the edge-based geometry primitives.
//!
//! 1. Intersection is symmetric and agrees with the per-axis overlap.
//! 2. Rectangles touching along an edge never intersect.
//! 3. Union contains both inputs.
//! 4. `from_origin_size` and `size` agree.
//! 5. Insetting shrinks each dimension by twice the inset.
//! 6. The orthogonal axis is an involution.

use alm_core::geometry::{Axis, Point, Rect, Size, fuzzy_eq};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Well-formed rectangles on integer coordinates, so sums stay exact.
fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0u16..=500, 0u16..=500, 0u16..=300, 0u16..=300).prop_map(|(x, y, w, h)| {
        let (x, y) = (f64::from(x), f64::from(y));
        Rect::new(x, y, x + f64::from(w), y + f64::from(h))
    })
}

fn axis_strategy() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y)]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Intersection symmetry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn intersection_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        for axis in [Axis::X, Axis::Y] {
            prop_assert_eq!(a.overlap_along(&b, axis), b.overlap_along(&a, axis));
        }
        prop_assert_eq!(
            a.intersects(&b),
            a.overlap_along(&b, Axis::X) > 0.0 && a.overlap_along(&b, Axis::Y) > 0.0
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Edge contact is not overlap
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn touching_rects_do_not_intersect(a in rect_strategy(), w in 1u16..=100, axis in axis_strategy()) {
        let w = f64::from(w);
        let neighbour = match axis {
            Axis::X => Rect::new(a.right, a.top, a.right + w, a.bottom),
            Axis::Y => Rect::new(a.left, a.bottom, a.right, a.bottom + w),
        };
        prop_assert!(!a.intersects(&neighbour), "{:?} vs {:?}", a, neighbour);
        prop_assert!(!a.overlaps_beyond(&neighbour, 0.0));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Union bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn union_contains_both(a in rect_strategy(), b in rect_strategy()) {
        let u = a.union(&b);
        for r in [a, b] {
            prop_assert!(u.contains(r.left_top()));
            prop_assert!(u.contains(r.right_bottom()));
        }
        prop_assert_eq!(u, b.union(&a));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Origin and size
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn origin_size_round_trip(x in 0u16..=500, y in 0u16..=500, w in 0u16..=300, h in 0u16..=300) {
        let size = Size::new(f64::from(w), f64::from(h));
        let rect = Rect::from_origin_size(Point::new(f64::from(x), f64::from(y)), size);
        prop_assert_eq!(rect.size(), size);
        prop_assert_eq!(rect.width(), size.along(Axis::X));
        prop_assert_eq!(rect.height(), size.along(Axis::Y));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Inset
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn inset_shrinks_both_dimensions(a in rect_strategy(), dx in 0u8..=20, dy in 0u8..=20) {
        let (dx, dy) = (f64::from(dx), f64::from(dy));
        let inner = a.inset_by(dx, dy);
        prop_assert!(fuzzy_eq(inner.width(), a.width() - 2.0 * dx));
        prop_assert!(fuzzy_eq(inner.height(), a.height() - 2.0 * dy));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Axis algebra
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn orthogonal_is_an_involution(axis in axis_strategy(), x in -1e6f64..1e6, y in -1e6f64..1e6) {
        prop_assert_eq!(axis.orthogonal().orthogonal(), axis);
        prop_assert_ne!(axis.orthogonal(), axis);
        let point = Point::new(x, y);
        prop_assert_eq!(Axis::X.of_point(point), x);
        prop_assert_eq!(Axis::Y.of_point(point), y);
    }
}
