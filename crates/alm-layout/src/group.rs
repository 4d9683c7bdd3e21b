//! Row and column detection along a shared tab.
//!
//! [`GroupDetection::find_adjacent_areas`] collects the single chain of areas
//! that share one edge tab with a seed area, walking outward along that tab
//! in both directions. It is not a flood fill: the chain stops at the first
//! area that does not continue on the same tab.

use crate::area::{AreaId, AreaSide};
use crate::connections::TabConnections;
use crate::direction::{Orientation, SearchDirection};
use crate::layout::Layout;
use crate::tab::TabId;
use crate::walk::PathGuard;

/// Extremal tab of `side` over `group`. Ties keep the first area in group
/// order.
fn extreme(layout: &Layout, group: &[AreaId], side: AreaSide, lowest: bool) -> Option<TabId> {
    let mut best: Option<(f64, TabId)> = None;
    for area in group.iter().filter_map(|id| layout.area(*id)) {
        let tab = area.tab(side);
        let value = layout.value_or_zero(tab);
        let better = match best {
            None => true,
            Some((current, _)) if lowest => value < current,
            Some((current, _)) => value > current,
        };
        if better {
            best = Some((value, tab));
        }
    }
    best.map(|(_, tab)| tab)
}

/// Lowest left tab of the group.
#[must_use]
pub fn left(layout: &Layout, group: &[AreaId]) -> Option<TabId> {
    extreme(layout, group, AreaSide::Left, true)
}

#[must_use]
pub fn top(layout: &Layout, group: &[AreaId]) -> Option<TabId> {
    extreme(layout, group, AreaSide::Top, true)
}

#[must_use]
pub fn right(layout: &Layout, group: &[AreaId]) -> Option<TabId> {
    extreme(layout, group, AreaSide::Right, false)
}

#[must_use]
pub fn bottom(layout: &Layout, group: &[AreaId]) -> Option<TabId> {
    extreme(layout, group, AreaSide::Bottom, false)
}

/// Right tab closest to the left of the layout.
#[must_use]
pub fn leftmost_right(layout: &Layout, group: &[AreaId]) -> Option<TabId> {
    extreme(layout, group, AreaSide::Right, true)
}

#[must_use]
pub fn topmost_bottom(layout: &Layout, group: &[AreaId]) -> Option<TabId> {
    extreme(layout, group, AreaSide::Bottom, true)
}

#[must_use]
pub fn rightmost_left(layout: &Layout, group: &[AreaId]) -> Option<TabId> {
    extreme(layout, group, AreaSide::Left, false)
}

#[must_use]
pub fn bottommost_top(layout: &Layout, group: &[AreaId]) -> Option<TabId> {
    extreme(layout, group, AreaSide::Top, false)
}

/// Whether any area of `group` is bound to `tab`.
#[must_use]
pub fn group_owns_tab(layout: &Layout, tab: TabId, group: &[AreaId]) -> bool {
    group
        .iter()
        .filter_map(|id| layout.area(*id))
        .any(|area| area.uses_tab(tab))
}

/// Neighbour detection over a filled connection index.
#[derive(Debug, Clone, Copy)]
pub struct GroupDetection<'a> {
    connections: &'a TabConnections,
    layout: &'a Layout,
}

impl<'a> GroupDetection<'a> {
    #[must_use]
    pub const fn new(connections: &'a TabConnections, layout: &'a Layout) -> Self {
        Self {
            connections,
            layout,
        }
    }

    /// The seed area followed by its neighbours sharing the tab on `side`,
    /// first walking toward lower coordinates, then toward higher ones.
    #[must_use]
    pub fn find_adjacent_areas(&self, area: AreaId, side: AreaSide) -> Vec<AreaId> {
        let mut group = vec![area];
        let Some(seed) = self.layout.area(area) else {
            return group;
        };
        let tab = seed.tab(side);
        let along = SearchDirection::toward(side.opposite());
        let (toward_low, toward_high) = Orientation::of_axis(side.axis().orthogonal()).directions();
        for search in [toward_low, toward_high] {
            self.collect_all_neighbours(tab, area, search, along, &mut group);
        }
        group
    }

    fn collect_all_neighbours(
        &self,
        tab: TabId,
        mut area: AreaId,
        search: SearchDirection,
        along: SearchDirection,
        group: &mut Vec<AreaId>,
    ) {
        let mut guard = PathGuard::new();
        guard.enter(area);
        while let Some(next) = self.find_neighbour(tab, area, search, along) {
            if !guard.enter(next) {
                break;
            }
            group.push(next);
            area = next;
        }
    }

    /// Area next to `area` in direction `search` whose edge also sits on
    /// `tab`.
    fn find_neighbour(
        &self,
        tab: TabId,
        area: AreaId,
        search: SearchDirection,
        along: SearchDirection,
    ) -> Option<AreaId> {
        let area = self.layout.area(area)?;
        let tab_links = self.connections.links(along.axis(), tab)?;
        let area_links = self
            .connections
            .links(search.axis(), search.search_tab(area))?;
        let beside = search.areas_search_direction(area_links);
        along
            .areas_search_direction(tab_links)
            .iter()
            .copied()
            .find(|candidate| beside.contains(candidate))
    }
}
