//! Placement of areas into empty space.
//!
//! A drop point picks the grid cell formed by consecutive tabs around it.
//! The cell grows toward the dragged frame and then greedily while it stays
//! clear of every other area, and finally snaps its edges to nearby tabs.
//! Sides that do not snap anywhere are left open and get a fresh tab when
//! the target area is created.

use alm_core::geometry::{Axis, Point, Rect, Size, fuzzy_eq};
use serde::{Deserialize, Serialize};

use crate::area::{AreaId, AreaRef, AreaSide};
use crate::config::EditorConfig;
use crate::connections::TabConnections;
use crate::constraint::{EDIT_HELPER_LABEL, Relation, Strength, Term};
use crate::direction::SearchDirection;
use crate::error::LayoutError;
use crate::layout::Layout;
use crate::probe::tab_near_point;
use crate::tab::TabId;

/// Frames of every area except `ignore`.
fn taken_frames(layout: &Layout, ignore: Option<AreaId>) -> Vec<Rect> {
    layout
        .areas()
        .iter()
        .filter(|area| Some(area.id) != ignore)
        .filter_map(|area| layout.frame(area.id))
        .collect()
}

/// The tab cell around `point`, or `None` when the point lies inside an
/// area other than `ignore` or outside the tab grid.
#[must_use]
pub fn find_empty_area(layout: &Layout, point: Point, ignore: Option<AreaId>) -> Option<AreaRef> {
    if point.x <= 0.0 || point.y <= 0.0 {
        return None;
    }
    if taken_frames(layout, ignore)
        .iter()
        .any(|frame| frame.contains(point))
    {
        return None;
    }
    let (left, right) = enclosing_tabs(layout, Axis::X, point.x)?;
    let (top, bottom) = enclosing_tabs(layout, Axis::Y, point.y)?;
    Some(AreaRef::new(left, top, right, bottom))
}

fn enclosing_tabs(layout: &Layout, axis: Axis, position: f64) -> Option<(TabId, TabId)> {
    let sorted = layout.tabs_sorted(axis);
    sorted
        .windows(2)
        .find(|pair| position < layout.value_or_zero(pair[1]))
        .map(|pair| (pair[0], pair[1]))
}

/// Position of every tab bound by a cell in the value-sorted tab lists.
struct GridCursor {
    xs: Vec<TabId>,
    ys: Vec<TabId>,
}

impl GridCursor {
    fn new(layout: &Layout) -> Self {
        Self {
            xs: layout.tabs_sorted(Axis::X),
            ys: layout.tabs_sorted(Axis::Y),
        }
    }

    /// Next tab past `tab` on the outer side of `side`.
    fn outward(&self, side: AreaSide, tab: TabId) -> Option<TabId> {
        let sorted = match side.axis() {
            Axis::X => &self.xs,
            Axis::Y => &self.ys,
        };
        let index = sorted.iter().position(|t| *t == tab)?;
        let next = if side.is_near() {
            index.checked_sub(1)?
        } else {
            index + 1
        };
        sorted.get(next).copied()
    }
}

/// Grow `cell` toward `target` and then as far as it stays empty.
///
/// Candidate cells are tested with their frame inset by one unit so that
/// touching neighbours do not block growth. `ignore` is treated as free
/// space, which lets an area being moved grow into its own old place.
#[must_use]
pub fn maximize_empty_area(
    layout: &Layout,
    cell: AreaRef,
    target: &Rect,
    ignore: Option<AreaId>,
) -> AreaRef {
    let taken = taken_frames(layout, ignore);
    let cursor = GridCursor::new(layout);
    let blocked = |candidate: &AreaRef| {
        layout.ref_frame(candidate).is_none_or(|frame| {
            let inner = frame.inset_by(1.0, 1.0);
            taken.iter().any(|other| other.intersects(&inner))
        })
    };
    let edge = |tab: TabId| layout.value_or_zero(tab);

    let mut region = cell;
    for side in [
        AreaSide::Left,
        AreaSide::Right,
        AreaSide::Top,
        AreaSide::Bottom,
    ] {
        let wanted = side_of(target, side);
        loop {
            let current = edge(region.tab(side));
            let short = if side.is_near() {
                current > wanted
            } else {
                current < wanted
            };
            if !short {
                break;
            }
            let Some(next) = cursor.outward(side, region.tab(side)) else {
                break;
            };
            let grown = region.with_tab(side, next);
            if blocked(&grown) {
                break;
            }
            region = grown;
        }
    }

    loop {
        let Some(previous) = layout.ref_frame(&region) else {
            break;
        };
        let mut gains = [-1.0_f64; 4];
        let mut steps = [None; 4];
        for (slot, side) in [
            AreaSide::Left,
            AreaSide::Right,
            AreaSide::Top,
            AreaSide::Bottom,
        ]
        .into_iter()
        .enumerate()
        {
            let Some(next) = cursor.outward(side, region.tab(side)) else {
                continue;
            };
            let grown = region.with_tab(side, next);
            if blocked(&grown) {
                continue;
            }
            let moved = (edge(next) - side_of(&previous, side)).abs();
            let breadth = match side.axis() {
                Axis::X => previous.height(),
                Axis::Y => previous.width(),
            };
            gains[slot] = breadth * moved;
            steps[slot] = Some(grown);
        }

        let [left, right, top, bottom] = gains;
        let pick = if left > 0.0 && left > right && left > top && left > bottom {
            Some(0)
        } else if right > 0.0 && right > top && right > bottom {
            Some(1)
        } else if top > 0.0 && top > bottom {
            Some(2)
        } else if bottom > 0.0 {
            Some(3)
        } else {
            None
        };
        if let Some(grown) = pick.and_then(|slot| steps[slot]) {
            region = grown;
        }

        let Some(current) = layout.ref_frame(&region) else {
            break;
        };
        if fuzzy_eq(previous.width(), current.width())
            && fuzzy_eq(previous.height(), current.height())
        {
            break;
        }
    }
    region
}

fn side_of(rect: &Rect, side: AreaSide) -> f64 {
    match side {
        AreaSide::Left => rect.left,
        AreaSide::Top => rect.top,
        AreaSide::Right => rect.right,
        AreaSide::Bottom => rect.bottom,
    }
}

/// Snap candidates among the edges of the areas bordering a region.
#[derive(Debug, Clone, Copy)]
pub struct InnerAreaTabs<'a> {
    layout: &'a Layout,
    connections: &'a TabConnections,
}

impl<'a> InnerAreaTabs<'a> {
    #[must_use]
    pub const fn new(layout: &'a Layout, connections: &'a TabConnections) -> Self {
        Self {
            layout,
            connections,
        }
    }

    /// X tab near `position` among the areas above and below `region`.
    #[must_use]
    pub fn find_horizontal_inner_tab(
        &self,
        position: f64,
        tolerance: f64,
        region: &AreaRef,
    ) -> Option<TabId> {
        self.closer(
            self.find_inner_tab(SearchDirection::Top, position, tolerance, region.top),
            self.find_inner_tab(SearchDirection::Bottom, position, tolerance, region.bottom),
        )
    }

    /// Y tab near `position` among the areas left and right of `region`.
    #[must_use]
    pub fn find_vertical_inner_tab(
        &self,
        position: f64,
        tolerance: f64,
        region: &AreaRef,
    ) -> Option<TabId> {
        self.closer(
            self.find_inner_tab(SearchDirection::Left, position, tolerance, region.left),
            self.find_inner_tab(SearchDirection::Right, position, tolerance, region.right),
        )
    }

    fn closer(
        &self,
        first: Option<(TabId, f64)>,
        second: Option<(TabId, f64)>,
    ) -> Option<TabId> {
        let distance = |found: Option<(TabId, f64)>| found.map_or(f64::INFINITY, |(_, d)| d);
        if distance(first) < distance(second) {
            first.map(|(tab, _)| tab)
        } else {
            second.map(|(tab, _)| tab)
        }
    }

    fn find_inner_tab(
        &self,
        search: SearchDirection,
        position: f64,
        tolerance: f64,
        border: TabId,
    ) -> Option<(TabId, f64)> {
        let links = self.connections.links(search.axis(), border)?;
        let mut best: Option<(TabId, f64)> = None;
        for area in search
            .areas_search_direction(links)
            .iter()
            .filter_map(|id| self.layout.area(*id))
        {
            let tab1 = search.orth_tab1(area);
            let tab2 = search.orth_tab2(area);
            let dist1 = (position - self.layout.value_or_zero(tab1)).abs();
            let dist2 = (position - self.layout.value_or_zero(tab2)).abs();
            if dist1 > tolerance && dist2 > tolerance {
                continue;
            }
            let candidate = if dist1 < dist2 {
                (tab1, dist1)
            } else {
                (tab2, dist2)
            };
            if best.is_none_or(|(_, min)| candidate.1 < min) {
                best = Some(candidate);
            }
        }
        best
    }
}

/// Where a dragged frame would be dropped into empty space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimalArea {
    pub left: Option<TabId>,
    pub top: Option<TabId>,
    pub right: Option<TabId>,
    pub bottom: Option<TabId>,
    /// The grown cell before snapping.
    pub maximal: AreaRef,
}

impl OptimalArea {
    /// Placement target for an item of `preferred_size`.
    #[must_use]
    pub fn into_target(self, free_position: Point, preferred_size: Size) -> EmptyAreaTarget {
        EmptyAreaTarget {
            left: self.left,
            top: self.top,
            right: self.right,
            bottom: self.bottom,
            free_position,
            preferred_size,
            spacing: Size::ZERO,
        }
    }
}

/// Find the empty region a frame dragged to `point` should drop into.
///
/// `drag_frame` is the frame under the pointer and `target` the size the
/// dropped item wants; a negative component disables snapping on that axis.
/// `moved_area` is the area being dragged, if any; its own space and tabs
/// do not count as obstacles or snap targets.
#[must_use]
pub fn find_optimal_area(
    layout: &Layout,
    connections: &TabConnections,
    config: &EditorConfig,
    point: Point,
    drag_frame: &Rect,
    target: Size,
    moved_area: Option<AreaId>,
) -> Option<OptimalArea> {
    let cell = find_empty_area(layout, point, moved_area)?;
    let maximal = maximize_empty_area(layout, cell, drag_frame, moved_area);
    let moved = moved_area.and_then(|id| layout.area(id)).map(AreaRef::of);
    let foreign = |tab: &TabId, axis: Axis| {
        moved.is_none_or(|own| {
            *tab != own.tab(AreaSide::near(axis)) && *tab != own.tab(AreaSide::far(axis))
        })
    };
    let value = |tab: TabId| layout.value_or_zero(tab);
    let snap = config.snap_distance;

    let mut placed = OptimalArea {
        left: Some(maximal.left),
        top: Some(maximal.top),
        right: Some(maximal.right),
        bottom: Some(maximal.bottom),
        maximal,
    };

    // Shrink the grown cell back onto a tab right next to the drag frame.
    let empty = layout.ref_frame(&maximal)?;
    let wanted_width = drag_frame.width();
    if target.width >= 0.0
        && empty.width() > wanted_width
        && drag_frame.right + snap < empty.right
        && drag_frame.left - snap > empty.left
    {
        if let Some(left) = tab_near_point(layout, Axis::X, drag_frame.left_top(), snap)
            .filter(|tab| foreign(tab, Axis::X))
        {
            if empty.right - value(left) >= wanted_width {
                placed.left = Some(left);
            }
        } else if let Some(right) =
            tab_near_point(layout, Axis::X, Point::new(drag_frame.right, drag_frame.top), snap)
                .filter(|tab| foreign(tab, Axis::X) && value(*tab) - empty.left >= wanted_width)
        {
            placed.right = Some(right);
        }
    }
    let wanted_height = drag_frame.height();
    if target.height >= 0.0
        && empty.height() > wanted_height
        && drag_frame.bottom + snap < empty.bottom
        && drag_frame.top - snap > empty.top
    {
        if let Some(top) = tab_near_point(layout, Axis::Y, drag_frame.left_top(), snap)
            .filter(|tab| foreign(tab, Axis::Y))
        {
            if empty.bottom - value(top) >= wanted_height {
                placed.top = Some(top);
            }
        } else if let Some(bottom) =
            tab_near_point(layout, Axis::Y, drag_frame.right_bottom(), snap)
                .filter(|tab| foreign(tab, Axis::Y) && value(*tab) - empty.top >= wanted_height)
        {
            placed.bottom = Some(bottom);
        }
    }

    // Snap the open edge onto an inner tab of a bordering area.
    let new_snap = config.new_tab_snap_distance;
    let inner = InnerAreaTabs::new(layout, connections);
    let current = AreaRef::new(
        placed.left.unwrap_or(maximal.left),
        placed.top.unwrap_or(maximal.top),
        placed.right.unwrap_or(maximal.right),
        placed.bottom.unwrap_or(maximal.bottom),
    );
    let empty = layout.ref_frame(&current)?;
    let ordered = |low: Option<TabId>, high: Option<TabId>| match (low, high) {
        (Some(low), Some(high)) => value(low) < value(high),
        _ => true,
    };

    let mut x_snapped = true;
    if target.width >= 0.0 && empty.width() - target.width > new_snap {
        if drag_frame.left - empty.left < new_snap {
            placed.right =
                inner.find_horizontal_inner_tab(empty.left + target.width, new_snap, &maximal);
            if !ordered(placed.left, placed.right) {
                placed.right = None;
            }
        } else if empty.right - drag_frame.right < new_snap {
            placed.left =
                inner.find_horizontal_inner_tab(empty.right - target.width, new_snap, &maximal);
            if !ordered(placed.left, placed.right) {
                placed.left = None;
            }
        } else {
            x_snapped = false;
        }
    }
    let mut y_snapped = true;
    if target.height >= 0.0 && empty.height() - target.height > new_snap {
        if drag_frame.top - empty.top < new_snap {
            placed.bottom =
                inner.find_vertical_inner_tab(empty.top + target.height, new_snap, &maximal);
            if !ordered(placed.top, placed.bottom) {
                placed.bottom = None;
            }
        } else if empty.bottom - drag_frame.bottom < new_snap {
            placed.top =
                inner.find_vertical_inner_tab(empty.bottom - target.height, new_snap, &maximal);
            if !ordered(placed.top, placed.bottom) {
                placed.top = None;
            }
        } else {
            y_snapped = false;
        }
    }

    if config.free_placement {
        if !x_snapped {
            placed.left = None;
            placed.right = None;
        }
        if !y_snapped {
            placed.top = None;
            placed.bottom = None;
        }
    }
    Some(placed)
}

/// Region a new or moved area is placed into.
///
/// Bound sides reuse existing tabs; open sides get a new tab placed from the
/// preferred size. An axis open on both sides is positioned freely at
/// `free_position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmptyAreaTarget {
    pub left: Option<TabId>,
    pub top: Option<TabId>,
    pub right: Option<TabId>,
    pub bottom: Option<TabId>,
    pub free_position: Point,
    pub preferred_size: Size,
    #[serde(default)]
    pub spacing: Size,
}

impl EmptyAreaTarget {
    /// Target bound to all four tabs of `cell`.
    #[must_use]
    pub const fn cell(cell: AreaRef) -> Self {
        Self {
            left: Some(cell.left),
            top: Some(cell.top),
            right: Some(cell.right),
            bottom: Some(cell.bottom),
            free_position: Point::new(0.0, 0.0),
            preferred_size: Size::ZERO,
            spacing: Size::ZERO,
        }
    }

    /// Unbound target of `preferred_size` at `position`.
    #[must_use]
    pub const fn free(position: Point, preferred_size: Size) -> Self {
        Self {
            left: None,
            top: None,
            right: None,
            bottom: None,
            free_position: position,
            preferred_size,
            spacing: Size::ZERO,
        }
    }

    #[must_use]
    pub const fn with_spacing(mut self, spacing: Size) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub const fn tab(&self, side: AreaSide) -> Option<TabId> {
        match side {
            AreaSide::Left => self.left,
            AreaSide::Top => self.top,
            AreaSide::Right => self.right,
            AreaSide::Bottom => self.bottom,
        }
    }

    /// Frame the target area will initially occupy.
    #[must_use]
    pub fn target_frame(&self, layout: &Layout) -> Rect {
        let (left, right) = self.span(layout, Axis::X);
        let (top, bottom) = self.span(layout, Axis::Y);
        Rect::new(left, top, right, bottom)
    }

    fn span(&self, layout: &Layout, axis: Axis) -> (f64, f64) {
        let extent = self.preferred_size.along(axis) + self.spacing.along(axis);
        let near = self
            .tab(AreaSide::near(axis))
            .and_then(|tab| layout.tab_value(tab));
        let far = self
            .tab(AreaSide::far(axis))
            .and_then(|tab| layout.tab_value(tab));
        match (near, far) {
            (Some(near), Some(far)) => (near, far),
            (Some(near), None) => (near, near + extent),
            (None, Some(far)) => (far - extent, far),
            (None, None) => {
                let start = axis.of_point(self.free_position);
                (start, start + extent)
            }
        }
    }

    /// Bind the target to tabs, creating the missing ones.
    ///
    /// A freely positioned axis also gets an edit-helper constraint of
    /// `strength` pinning its near tab; the editor drops it once the tab is
    /// anchored to a border.
    pub fn create_target_area(
        &self,
        layout: &mut Layout,
        strength: Strength,
    ) -> Result<AreaRef, LayoutError> {
        let frame = self.target_frame(layout);
        let mut bound = [layout.left(), layout.top(), layout.right(), layout.bottom()];
        for (slot, side) in AreaSide::ALL.into_iter().enumerate() {
            bound[slot] = match self.tab(side) {
                Some(tab) => tab,
                None => layout.add_tab_at(side.axis(), side_of(&frame, side))?,
            };
        }
        let [left, top, right, bottom] = bound;

        for (axis, near) in [(Axis::X, left), (Axis::Y, top)] {
            let open = self.tab(AreaSide::near(axis)).is_none()
                && self.tab(AreaSide::far(axis)).is_none();
            if open {
                layout.add_constraint(
                    vec![Term::new(1.0, near)],
                    Relation::Eq,
                    axis.of_point(self.free_position),
                    strength,
                    Some(EDIT_HELPER_LABEL),
                )?;
            }
        }
        Ok(AreaRef::new(left, top, right, bottom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::ItemId;

    /// A 100x100 layout with one area in the top-left quarter.
    fn quarter() -> (Layout, AreaId, TabId, TabId) {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let x50 = layout.add_tab_at(Axis::X, 50.0).expect("tab");
        let y50 = layout.add_tab_at(Axis::Y, 50.0).expect("tab");
        let b = layout.borders();
        let area = layout
            .add_area(ItemId(1), AreaRef::new(b.left, b.top, x50, y50))
            .expect("area");
        (layout, area, x50, y50)
    }

    #[test]
    fn empty_cell_comes_from_neighbouring_tabs() {
        let (layout, area, x50, y50) = quarter();
        let b = layout.borders();
        assert_eq!(
            find_empty_area(&layout, Point::new(75.0, 75.0), None),
            Some(AreaRef::new(x50, y50, b.right, b.bottom))
        );
        assert_eq!(find_empty_area(&layout, Point::new(10.0, 10.0), None), None);
        assert_eq!(
            find_empty_area(&layout, Point::new(10.0, 10.0), Some(area)),
            Some(AreaRef::new(b.left, b.top, x50, y50))
        );
        assert_eq!(find_empty_area(&layout, Point::new(0.0, 10.0), None), None);
    }

    #[test]
    fn cell_grows_around_the_occupied_quarter() {
        let (layout, _, x50, y50) = quarter();
        let b = layout.borders();
        let cell = AreaRef::new(x50, y50, b.right, b.bottom);

        // Growing left and growing up gain the same space; a tie does not
        // beat the top edge, and afterwards the left side is blocked.
        let grown = maximize_empty_area(&layout, cell, &Rect::new(60.0, 60.0, 90.0, 90.0), None);
        assert_eq!(grown, AreaRef::new(x50, b.top, b.right, b.bottom));

        // A target reaching left pulls the left edge first.
        let grown = maximize_empty_area(&layout, cell, &Rect::new(10.0, 60.0, 90.0, 90.0), None);
        assert_eq!(grown, AreaRef::new(b.left, y50, b.right, b.bottom));
    }

    #[test]
    fn inner_tabs_snap_to_edges_of_bordering_areas() {
        let (layout, _, x50, y50) = quarter();
        let b = layout.borders();
        let connections = TabConnections::from_layout(&layout);
        let inner = InnerAreaTabs::new(&layout, &connections);
        // Region below the quarter: the area above it ends at x=50.
        let below = AreaRef::new(b.left, y50, b.right, b.bottom);
        assert_eq!(inner.find_horizontal_inner_tab(47.0, 5.0, &below), Some(x50));
        assert_eq!(inner.find_horizontal_inner_tab(30.0, 5.0, &below), None);
        let beside = AreaRef::new(x50, b.top, b.right, b.bottom);
        assert_eq!(inner.find_vertical_inner_tab(52.0, 5.0, &beside), Some(y50));
    }

    #[test]
    fn free_target_gets_new_tabs_and_a_position_helper() {
        let mut layout = Layout::new(Size::new(200.0, 200.0));
        let target = EmptyAreaTarget::free(Point::new(20.0, 30.0), Size::new(40.0, 10.0))
            .with_spacing(Size::new(2.0, 2.0));
        assert_eq!(target.target_frame(&layout), Rect::new(20.0, 30.0, 62.0, 42.0));

        let bound = target
            .create_target_area(&mut layout, Strength::Strong)
            .expect("target");
        assert_eq!(layout.ref_frame(&bound), Some(Rect::new(20.0, 30.0, 62.0, 42.0)));
        let helpers: Vec<_> = layout
            .constraints()
            .iter()
            .filter(|c| c.has_label(EDIT_HELPER_LABEL))
            .collect();
        assert_eq!(helpers.len(), 2);
        assert_eq!(helpers[0].first_tab(), Some(bound.left));
        assert_eq!(helpers[0].rhs, 20.0);
        assert_eq!(helpers[1].first_tab(), Some(bound.top));
        assert_eq!(helpers[0].strength, Strength::Strong);
    }

    #[test]
    fn half_bound_target_extends_from_its_bound_side() {
        let (mut layout, _, x50, y50) = quarter();
        let target = EmptyAreaTarget {
            left: Some(x50),
            top: None,
            right: None,
            bottom: Some(y50),
            free_position: Point::new(0.0, 0.0),
            preferred_size: Size::new(20.0, 15.0),
            spacing: Size::ZERO,
        };
        assert_eq!(target.target_frame(&layout), Rect::new(50.0, 35.0, 70.0, 50.0));
        let bound = target
            .create_target_area(&mut layout, Strength::Strong)
            .expect("target");
        assert_eq!((bound.left, bound.bottom), (x50, y50));
        assert!(layout.constraints().is_empty());
    }

    #[test]
    fn drop_next_to_the_quarter_snaps_to_its_edge() {
        let (layout, _, x50, y50) = quarter();
        let b = layout.borders();
        let connections = TabConnections::from_layout(&layout);
        let config = EditorConfig::default();
        let drag = Rect::new(55.0, 5.0, 95.0, 45.0);
        let placed = find_optimal_area(
            &layout,
            &connections,
            &config,
            Point::new(75.0, 25.0),
            &drag,
            Size::new(40.0, 40.0),
            None,
        )
        .expect("empty space");
        assert_eq!(placed.maximal, AreaRef::new(x50, b.top, b.right, b.bottom));
        assert_eq!(placed.left, Some(x50));
        assert_eq!(placed.right, Some(b.right));
        assert_eq!(placed.top, Some(b.top));
        // The open bottom edge snaps onto the quarter's bottom tab.
        assert_eq!(placed.bottom, Some(y50));
    }
}
