//! Runtime direction policies.
//!
//! Group moves, insertion and neighbour searches share one algorithm body for
//! all four directions. A [`SearchDirection`] picks a row of a static policy
//! table that says which area edge is searched, which edges are orthogonal,
//! how far apart two frames are, and which way a group moves.

use alm_core::geometry::{Axis, Point, Rect};

use crate::area::{Area, AreaId, AreaSide};
use crate::connections::TabLinks;
use crate::layout::Layout;
use crate::tab::TabId;

/// One of the four cardinal search directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchDirection {
    Left,
    Top,
    Right,
    Bottom,
}

/// Row of the policy table.
#[derive(Debug, Clone, Copy)]
pub struct DirectionPolicy {
    /// Edge of an area facing the search direction.
    pub search_side: AreaSide,
    /// Lower orthogonal edge.
    pub orth_side1: AreaSide,
    /// Higher orthogonal edge.
    pub orth_side2: AreaSide,
    /// Sign of a move toward the search direction.
    pub sign: f64,
    /// Gap between an outside frame and a frame that moves toward it.
    pub compare: fn(&Rect, &Rect) -> f64,
}

fn compare_left(outside: &Rect, inside: &Rect) -> f64 {
    inside.left - outside.right
}

fn compare_right(outside: &Rect, inside: &Rect) -> f64 {
    outside.left - inside.right
}

fn compare_top(outside: &Rect, inside: &Rect) -> f64 {
    inside.top - outside.bottom
}

fn compare_bottom(outside: &Rect, inside: &Rect) -> f64 {
    outside.top - inside.bottom
}

static POLICIES: [DirectionPolicy; 4] = [
    DirectionPolicy {
        search_side: AreaSide::Left,
        orth_side1: AreaSide::Top,
        orth_side2: AreaSide::Bottom,
        sign: -1.0,
        compare: compare_left,
    },
    DirectionPolicy {
        search_side: AreaSide::Top,
        orth_side1: AreaSide::Left,
        orth_side2: AreaSide::Right,
        sign: -1.0,
        compare: compare_top,
    },
    DirectionPolicy {
        search_side: AreaSide::Right,
        orth_side1: AreaSide::Top,
        orth_side2: AreaSide::Bottom,
        sign: 1.0,
        compare: compare_right,
    },
    DirectionPolicy {
        search_side: AreaSide::Bottom,
        orth_side1: AreaSide::Left,
        orth_side2: AreaSide::Right,
        sign: 1.0,
        compare: compare_bottom,
    },
];

fn rect_edge(rect: &Rect, side: AreaSide) -> f64 {
    match side {
        AreaSide::Left => rect.left,
        AreaSide::Top => rect.top,
        AreaSide::Right => rect.right,
        AreaSide::Bottom => rect.bottom,
    }
}

impl SearchDirection {
    pub const ALL: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];

    #[must_use]
    pub fn policy(self) -> &'static DirectionPolicy {
        let row = match self {
            Self::Left => 0,
            Self::Top => 1,
            Self::Right => 2,
            Self::Bottom => 3,
        };
        &POLICIES[row]
    }

    /// Direction searching toward `side`.
    #[must_use]
    pub const fn toward(side: AreaSide) -> Self {
        match side {
            AreaSide::Left => Self::Left,
            AreaSide::Top => Self::Top,
            AreaSide::Right => Self::Right,
            AreaSide::Bottom => Self::Bottom,
        }
    }

    #[must_use]
    pub fn side(self) -> AreaSide {
        self.policy().search_side
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        Self::toward(self.side().opposite())
    }

    #[must_use]
    pub fn axis(self) -> Axis {
        self.side().axis()
    }

    /// Left and top search toward lower coordinates.
    #[must_use]
    pub fn is_near(self) -> bool {
        self.side().is_near()
    }

    #[must_use]
    pub fn search_tab(self, area: &Area) -> TabId {
        area.tab(self.side())
    }

    #[must_use]
    pub fn opposite_search_tab(self, area: &Area) -> TabId {
        area.tab(self.side().opposite())
    }

    #[must_use]
    pub fn layout_border(self, layout: &Layout) -> TabId {
        layout.border(self.side())
    }

    #[must_use]
    pub fn opposite_layout_border(self, layout: &Layout) -> TabId {
        layout.border(self.side().opposite())
    }

    /// Areas of `links` lying in the search direction.
    #[must_use]
    pub fn areas_search_direction(self, links: &TabLinks) -> &[AreaId] {
        links.areas_toward(self.is_near())
    }

    /// Areas of `links` lying against the search direction.
    #[must_use]
    pub fn areas_opposite_direction(self, links: &TabLinks) -> &[AreaId] {
        links.areas_toward(!self.is_near())
    }

    #[must_use]
    pub fn orth_tab1(self, area: &Area) -> TabId {
        area.tab(self.policy().orth_side1)
    }

    #[must_use]
    pub fn orth_tab2(self, area: &Area) -> TabId {
        area.tab(self.policy().orth_side2)
    }

    /// Gap `inside` has to travel in this direction to touch `outside`.
    #[must_use]
    pub fn compare(self, outside: &Rect, inside: &Rect) -> f64 {
        (self.policy().compare)(outside, inside)
    }

    /// Like [`compare`](Self::compare), but `-1` when the frames do not
    /// share any orthogonal span.
    #[must_use]
    pub fn distance(self, outside: &Rect, inside: &Rect) -> f64 {
        let policy = self.policy();
        if rect_edge(outside, policy.orth_side1) >= rect_edge(inside, policy.orth_side2)
            || rect_edge(outside, policy.orth_side2) <= rect_edge(inside, policy.orth_side1)
        {
            return -1.0;
        }
        self.compare(outside, inside)
    }

    /// Offset moving by `distance` in this direction.
    #[must_use]
    pub fn make_delta(self, distance: f64) -> Point {
        let step = self.policy().sign * distance;
        match self.axis() {
            Axis::X => Point::new(step, 0.0),
            Axis::Y => Point::new(0.0, step),
        }
    }
}

/// Orientation of a row (horizontal) or column (vertical) of areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Axis whose tabs separate neighbours of the row or column.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Horizontal => Axis::X,
            Self::Vertical => Axis::Y,
        }
    }

    #[must_use]
    pub const fn of_axis(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::Horizontal,
            Axis::Y => Self::Vertical,
        }
    }

    #[must_use]
    pub const fn orth_axis(self) -> Axis {
        self.axis().orthogonal()
    }

    /// Directions toward lower and higher coordinates along the axis.
    #[must_use]
    pub const fn directions(self) -> (SearchDirection, SearchDirection) {
        match self {
            Self::Horizontal => (SearchDirection::Left, SearchDirection::Right),
            Self::Vertical => (SearchDirection::Top, SearchDirection::Bottom),
        }
    }

    #[must_use]
    pub const fn side1(self, rect: &Rect) -> f64 {
        rect.edges(self.axis()).0
    }

    #[must_use]
    pub const fn side2(self, rect: &Rect) -> f64 {
        rect.edges(self.axis()).1
    }

    #[must_use]
    pub const fn orth_side1(self, rect: &Rect) -> f64 {
        rect.edges(self.orth_axis()).0
    }

    #[must_use]
    pub const fn orth_side2(self, rect: &Rect) -> f64 {
        rect.edges(self.orth_axis()).1
    }

    #[must_use]
    pub fn extent(self, rect: &Rect) -> f64 {
        self.side2(rect) - self.side1(rect)
    }

    #[must_use]
    pub fn orth_extent(self, rect: &Rect) -> f64 {
        self.orth_side2(rect) - self.orth_side1(rect)
    }

    #[must_use]
    pub const fn orth_tab1(self, area: &Area) -> TabId {
        area.tab(AreaSide::near(self.orth_axis()))
    }

    #[must_use]
    pub const fn orth_tab2(self, area: &Area) -> TabId {
        area.tab(AreaSide::far(self.orth_axis()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rows_match_their_direction() {
        for direction in SearchDirection::ALL {
            assert_eq!(SearchDirection::toward(direction.side()), direction);
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.policy().orth_side1.axis(), direction.axis());
        }
    }

    #[test]
    fn compare_measures_gap_toward_the_outside_frame() {
        let outside = Rect::new(0.0, 0.0, 20.0, 50.0);
        let inside = Rect::new(35.0, 10.0, 60.0, 40.0);
        assert_eq!(SearchDirection::Left.compare(&outside, &inside), 15.0);
        assert_eq!(SearchDirection::Left.distance(&outside, &inside), 15.0);
        assert_eq!(SearchDirection::Right.compare(&inside, &outside), 15.0);
        let below = Rect::new(0.0, 60.0, 20.0, 80.0);
        // No shared vertical span.
        assert_eq!(SearchDirection::Left.distance(&below, &inside), -1.0);
        assert_eq!(SearchDirection::Top.compare(&inside, &below), 20.0);
    }

    #[test]
    fn deltas_point_toward_the_search_side() {
        assert_eq!(SearchDirection::Left.make_delta(5.0), Point::new(-5.0, 0.0));
        assert_eq!(SearchDirection::Right.make_delta(5.0), Point::new(5.0, 0.0));
        assert_eq!(SearchDirection::Top.make_delta(2.0), Point::new(0.0, -2.0));
        assert_eq!(SearchDirection::Bottom.make_delta(2.0), Point::new(0.0, 2.0));
    }

    #[test]
    fn link_sides_follow_the_search_direction() {
        let before = AreaId::MIN;
        let after = AreaId::new(2).expect("non-zero");
        let links = TabLinks {
            areas1: vec![before],
            areas2: vec![after],
            ..TabLinks::default()
        };
        assert_eq!(SearchDirection::Left.areas_search_direction(&links), [before]);
        assert_eq!(SearchDirection::Left.areas_opposite_direction(&links), [after]);
        assert_eq!(SearchDirection::Bottom.areas_opposite_direction(&links), [before]);
    }

    #[test]
    fn orientation_reads_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 40.0, 80.0);
        let h = Orientation::Horizontal;
        assert_eq!((h.side1(&rect), h.side2(&rect)), (10.0, 40.0));
        assert_eq!((h.orth_side1(&rect), h.orth_side2(&rect)), (20.0, 80.0));
        assert_eq!(h.extent(&rect), 30.0);
        assert_eq!(Orientation::Vertical.orth_extent(&rect), 30.0);
        assert_eq!(h.directions(), (SearchDirection::Left, SearchDirection::Right));
    }
}
