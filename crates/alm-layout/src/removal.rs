//! Gap closing after an area left a region or an edge was detached.
//!
//! When an edge stops sharing a tab with its neighbours, the areas behind
//! that tab may lose every chain of areas leading to a layout border. Such a
//! detached group slides toward the nearest anchor in one of the four
//! cardinal directions: the closest outside area edge that shares some
//! orthogonal span with the group, or the layout border when none does.
//!
//! Each entry point performs a single pass. Filling one gap can open
//! another in pathological layouts; those are left for the next edit.

use std::collections::BTreeSet;

use alm_core::geometry::{Axis, Point};
use alm_core::{debug, debug_span, trace};

use crate::area::{AreaId, AreaRef, AreaSide};
use crate::connections::TabConnections;
use crate::direction::{Orientation, SearchDirection};
use crate::error::LayoutError;
use crate::layout::Layout;
use crate::tab::TabId;

/// Close the gap left behind by an area that used to span `vacated`.
///
/// Builds its own connection index, so it can run right after any rebinding.
pub fn fill_empty_space(layout: &mut Layout, vacated: AreaRef) -> Result<(), LayoutError> {
    let mut connections = TabConnections::new();
    AreaRemoval::new(layout, &mut connections).area_removed(vacated)
}

/// Anchor a detached group slides to.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Anchor {
    tab: TabId,
    /// Group member whose search-side edge ends up on `tab`.
    area: AreaId,
    distance: f64,
}

/// Space-filling pass over a layout and its connection index.
///
/// The index is refilled by every entry point and patched while groups move.
#[derive(Debug)]
pub struct AreaRemoval<'a> {
    layout: &'a mut Layout,
    connections: &'a mut TabConnections,
}

impl<'a> AreaRemoval<'a> {
    pub fn new(layout: &'a mut Layout, connections: &'a mut TabConnections) -> Self {
        Self {
            layout,
            connections,
        }
    }

    /// Slide every group that lost its border anchor when `vacated` emptied.
    ///
    /// A tab of the vacated rectangle that still reaches either border of its
    /// axis leaves its neighbours in place.
    pub fn area_removed(&mut self, vacated: AreaRef) -> Result<(), LayoutError> {
        let _span = debug_span!("alm.removal.area_removed").entered();
        self.connections.fill(&*self.layout);

        for side in [
            AreaSide::Left,
            AreaSide::Right,
            AreaSide::Top,
            AreaSide::Bottom,
        ] {
            let tab = vacated.tab(side);
            if self.anchored_on_axis(tab, side.axis()) {
                continue;
            }
            // Neighbours slide back over the vacated span.
            let search = SearchDirection::toward(side.opposite());
            for near in [side.is_near(), !side.is_near()] {
                let seeds = self.connections.areas_toward(side.axis(), tab, near);
                self.move_groups(search, &seeds)?;
            }
        }
        Ok(())
    }

    /// Horizontal edge of `area` moved off `old_tab`.
    ///
    /// Sides on the other axis are ignored.
    pub fn area_detached_x(
        &mut self,
        area: AreaId,
        side: AreaSide,
        old_tab: TabId,
    ) -> Result<(), LayoutError> {
        if side.axis() != Axis::X {
            return Ok(());
        }
        self.area_detached(area, side, old_tab)
    }

    /// Vertical edge of `area` moved off `old_tab`.
    pub fn area_detached_y(
        &mut self,
        area: AreaId,
        side: AreaSide,
        old_tab: TabId,
    ) -> Result<(), LayoutError> {
        if side.axis() != Axis::Y {
            return Ok(());
        }
        self.area_detached(area, side, old_tab)
    }

    /// The area is pushed away from its new edge, and whatever still sits on
    /// `old_tab` is pulled apart toward both ends of the axis.
    pub fn area_detached(
        &mut self,
        area: AreaId,
        side: AreaSide,
        old_tab: TabId,
    ) -> Result<(), LayoutError> {
        let _span = debug_span!("alm.removal.area_detached", area = area.get()).entered();
        self.connections.fill(&*self.layout);

        let axis = side.axis();
        let (toward_low, toward_high) = Orientation::of_axis(axis).directions();
        let own = if side.is_near() {
            toward_high
        } else {
            toward_low
        };
        self.move_groups(own, &[area])?;

        if !self.connections.contains(axis, old_tab) {
            return Ok(());
        }
        let before = self.connections.areas_toward(axis, old_tab, true);
        self.move_groups(toward_low, &before)?;
        let after = self.connections.areas_toward(axis, old_tab, false);
        self.move_groups(toward_high, &after)
    }

    fn anchored_on_axis(&self, tab: TabId, axis: Axis) -> bool {
        let layout: &Layout = &*self.layout;
        self.connections
            .connected_to_border(layout, AreaSide::near(axis), tab)
            || self
                .connections
                .connected_to_border(layout, AreaSide::far(axis), tab)
    }

    fn move_groups(&mut self, search: SearchDirection, seeds: &[AreaId]) -> Result<(), LayoutError> {
        for &seed in seeds {
            let Some(group) = self.find_detached_group(search, seed) else {
                continue;
            };
            let Some(anchor) = self.find_closest_tab(search, &group) else {
                continue;
            };
            debug!(
                seed = seed.get(),
                members = group.len(),
                distance = anchor.distance,
                direction = ?search,
                "moving detached group"
            );
            self.move_group_by(&group, search.make_delta(anchor.distance))?;
            self.update_connections(search, anchor.area, anchor.tab)?;
        }
        Ok(())
    }

    /// All areas transitively tied to `start` through tabs of the search
    /// axis, or `None` when any of them touches a border of that axis.
    fn find_detached_group(&self, search: SearchDirection, start: AreaId) -> Option<Vec<AreaId>> {
        let mut group = Vec::new();
        let mut members = BTreeSet::new();
        self.collect_detached(search, start, &mut group, &mut members)
            .then_some(group)
    }

    fn collect_detached(
        &self,
        search: SearchDirection,
        area: AreaId,
        group: &mut Vec<AreaId>,
        members: &mut BTreeSet<AreaId>,
    ) -> bool {
        let layout: &Layout = &*self.layout;
        let Some(current) = layout.area(area) else {
            return true;
        };
        if search.search_tab(current) == search.layout_border(layout)
            || search.opposite_search_tab(current) == search.opposite_layout_border(layout)
        {
            return false;
        }
        if !members.insert(area) {
            return true;
        }
        group.push(area);

        for tab in [search.search_tab(current), search.opposite_search_tab(current)] {
            let Some(links) = self.connections.links(search.axis(), tab) else {
                continue;
            };
            for &next in links.areas1.iter().chain(&links.areas2) {
                if !self.collect_detached(search, next, group, members) {
                    return false;
                }
            }
        }
        true
    }

    fn find_closest_tab(&self, search: SearchDirection, group: &[AreaId]) -> Option<Anchor> {
        let layout: &Layout = &*self.layout;
        let mut best: Option<Anchor> = None;
        for outside in layout.areas() {
            if group.contains(&outside.id) {
                continue;
            }
            let Some(outside_frame) = layout.frame(outside.id) else {
                continue;
            };
            for &inner in group {
                let Some(inside_frame) = layout.frame(inner) else {
                    continue;
                };
                let distance = search.distance(&outside_frame, &inside_frame);
                if distance < 0.0 {
                    continue;
                }
                if best.is_none_or(|anchor| distance < anchor.distance) {
                    best = Some(Anchor {
                        tab: search.opposite_search_tab(outside),
                        area: inner,
                        distance,
                    });
                }
            }
        }
        if best.is_some() {
            return best;
        }

        // No outside edge faces the group: slide onto the border.
        let border = search.layout_border(layout);
        let border_value = layout.value_or_zero(border);
        for &inner in group {
            let Some(area) = layout.area(inner) else {
                continue;
            };
            let distance = (layout.value_or_zero(search.search_tab(area)) - border_value).abs();
            if best.is_none_or(|anchor| distance < anchor.distance) {
                best = Some(Anchor {
                    tab: border,
                    area: inner,
                    distance,
                });
            }
        }
        best
    }

    /// Shift every tab bound by the group once.
    fn move_group_by(&mut self, group: &[AreaId], delta: Point) -> Result<(), LayoutError> {
        let mut tabs: BTreeSet<TabId> = BTreeSet::new();
        for area in group.iter().filter_map(|id| self.layout.area(*id)) {
            tabs.extend(AreaSide::ALL.map(|side| area.tab(side)));
        }
        for tab in tabs {
            let Some(axis) = self.layout.tab_axis(tab) else {
                continue;
            };
            let offset = match axis {
                Axis::X => delta.x,
                Axis::Y => delta.y,
            };
            if offset == 0.0 {
                continue;
            }
            let moved = self.layout.value_or_zero(tab) + offset;
            self.layout.set_tab_value(tab, moved)?;
        }
        Ok(())
    }

    /// Rebind the search-side edge of `area` onto `tab` and patch the index.
    fn update_connections(
        &mut self,
        search: SearchDirection,
        area: AreaId,
        tab: TabId,
    ) -> Result<(), LayoutError> {
        let side = search.side();
        let axis = side.axis();
        // The area lies after a near edge and before a far edge.
        let listed_near = !side.is_near();
        let old = self.layout.set_side(area, side, tab)?;
        if old == tab {
            return Ok(());
        }
        trace!(area = area.get(), from = old.get(), to = tab.get(), "edge rebound");
        self.connections
            .links_mut(axis, old)
            .areas_toward_mut(listed_near)
            .retain(|listed| *listed != area);
        self.connections
            .links_mut(axis, tab)
            .areas_toward_mut(listed_near)
            .push(area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::ItemId;
    use alm_core::geometry::{Rect, Size};

    #[test]
    fn removed_neighbour_leaves_a_gap_that_closes_toward_the_border() {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let x30 = layout.add_tab_at(Axis::X, 30.0).expect("tab");
        let x60 = layout.add_tab_at(Axis::X, 60.0).expect("tab");
        let b = layout.borders();
        let a = layout
            .add_area(ItemId(1), AreaRef::new(b.left, b.top, x30, b.bottom))
            .expect("area");
        let right = layout
            .add_area(ItemId(2), AreaRef::new(x30, b.top, x60, b.bottom))
            .expect("area");

        let removed = layout.remove_area(a).expect("removed");
        fill_empty_space(&mut layout, AreaRef::of(&removed)).expect("fill");

        let moved = layout.area(right).expect("area");
        assert_eq!(moved.left, layout.left());
        assert_eq!(moved.right, x60);
        assert_eq!(layout.frame(right), Some(Rect::new(0.0, 0.0, 30.0, 100.0)));
        assert!(layout.areas().iter().all(|area| !area.uses_tab(x30)));
    }

    #[test]
    fn neighbour_still_on_the_far_border_stays_put() {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let x30 = layout.add_tab_at(Axis::X, 30.0).expect("tab");
        let b = layout.borders();
        let a = layout
            .add_area(ItemId(1), AreaRef::new(b.left, b.top, x30, b.bottom))
            .expect("area");
        let right = layout
            .add_area(ItemId(2), AreaRef::new(x30, b.top, b.right, b.bottom))
            .expect("area");

        let removed = layout.remove_area(a).expect("removed");
        fill_empty_space(&mut layout, AreaRef::of(&removed)).expect("fill");

        assert_eq!(layout.area(right).map(|area| area.left), Some(x30));
        assert_eq!(layout.tab_value(x30), Some(30.0));
    }

    #[test]
    fn vacated_border_tabs_never_move_anything() {
        let mut layout = Layout::new(Size::new(80.0, 40.0));
        let only = layout.add_area(ItemId(1), layout.borders()).expect("area");
        let removed = layout.remove_area(only).expect("removed");
        let before = layout.clone();
        fill_empty_space(&mut layout, AreaRef::of(&removed)).expect("fill");
        assert_eq!(layout, before);
    }

    #[test]
    fn detaching_an_edge_pulls_the_orphaned_neighbour_to_the_border() {
        // | a | b |    with nothing between b and the right border.
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let x30 = layout.add_tab_at(Axis::X, 30.0).expect("tab");
        let x60 = layout.add_tab_at(Axis::X, 60.0).expect("tab");
        let b = layout.borders();
        let a = layout
            .add_area(ItemId(1), AreaRef::new(b.left, b.top, x30, b.bottom))
            .expect("area");
        let orphan = layout
            .add_area(ItemId(2), AreaRef::new(x30, b.top, x60, b.bottom))
            .expect("area");

        let fresh = layout.add_tab_at(Axis::X, 30.0).expect("tab");
        let old = layout.set_side(a, AreaSide::Right, fresh).expect("rebind");
        let mut connections = TabConnections::new();
        AreaRemoval::new(&mut layout, &mut connections)
            .area_detached_x(a, AreaSide::Right, old)
            .expect("detach");

        assert_eq!(layout.area(orphan).map(|area| area.right), Some(layout.right()));
        assert_eq!(layout.frame(orphan), Some(Rect::new(70.0, 0.0, 100.0, 100.0)));
        // The detached area itself still reaches the left border.
        assert_eq!(layout.frame(a), Some(Rect::new(0.0, 0.0, 30.0, 100.0)));
    }

    #[test]
    fn detach_on_the_other_axis_is_ignored() {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let only = layout.add_area(ItemId(1), layout.borders()).expect("area");
        let left = layout.left();
        let before = layout.clone();
        let mut connections = TabConnections::new();
        AreaRemoval::new(&mut layout, &mut connections)
            .area_detached_y(only, AreaSide::Left, left)
            .expect("detach");
        assert_eq!(layout, before);
        assert!(connections.is_empty());
    }
}
