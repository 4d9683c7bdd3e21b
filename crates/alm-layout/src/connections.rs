//! Tab adjacency index.
//!
//! For every tab the index records the areas whose far edge sits on it
//! (`areas1`, they lie before the tab) and the areas whose near edge sits on
//! it (`areas2`, they lie after the tab), together with the tabs on the other
//! side of those areas. The index is derived from the layout and rebuilt with
//! [`TabConnections::fill`]; the overlap engine later adds tab-to-tab links
//! for the ordering constraints it synthesizes.

use std::collections::BTreeMap;

use alm_core::geometry::Axis;

use crate::area::{AreaId, AreaSide};
use crate::layout::Layout;
use crate::tab::TabId;
use crate::walk::PathGuard;

/// Adjacency record of one tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabLinks {
    /// Neighbour tabs at lower coordinates.
    pub tabs1: Vec<TabId>,
    /// Neighbour tabs at higher coordinates.
    pub tabs2: Vec<TabId>,
    /// Areas ending on this tab.
    pub areas1: Vec<AreaId>,
    /// Areas starting on this tab.
    pub areas2: Vec<AreaId>,
}

impl TabLinks {
    /// `areas1` for near-side walks, `areas2` for far-side walks.
    #[inline]
    pub fn areas_toward(&self, near: bool) -> &[AreaId] {
        if near { &self.areas1 } else { &self.areas2 }
    }

    #[inline]
    pub fn tabs_toward(&self, near: bool) -> &[TabId] {
        if near { &self.tabs1 } else { &self.tabs2 }
    }

    pub(crate) fn tabs_toward_mut(&mut self, near: bool) -> &mut Vec<TabId> {
        if near { &mut self.tabs1 } else { &mut self.tabs2 }
    }

    pub(crate) fn areas_toward_mut(&mut self, near: bool) -> &mut Vec<AreaId> {
        if near { &mut self.areas1 } else { &mut self.areas2 }
    }
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

/// Adjacency index for both axes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabConnections {
    x: BTreeMap<TabId, TabLinks>,
    y: BTreeMap<TabId, TabLinks>,
}

impl TabConnections {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index built from `layout`.
    #[must_use]
    pub fn from_layout(layout: &Layout) -> Self {
        let mut connections = Self::new();
        connections.fill(layout);
        connections
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty()
    }

    /// Rebuild the index from the current areas of `layout`.
    ///
    /// # Panics
    ///
    /// In debug builds, when a tab ends up with the same neighbour on both
    /// sides, which only a malformed layout produces.
    pub fn fill(&mut self, layout: &Layout) {
        self.clear();
        for axis in [Axis::X, Axis::Y] {
            let near_side = AreaSide::near(axis);
            let far_side = AreaSide::far(axis);
            for tab in layout.tabs().ids(axis) {
                let mut links = TabLinks::default();
                for area in layout.areas() {
                    if area.tab(near_side) == tab {
                        push_unique(&mut links.tabs2, area.tab(far_side));
                        links.areas2.push(area.id);
                    } else if area.tab(far_side) == tab {
                        push_unique(&mut links.tabs1, area.tab(near_side));
                        links.areas1.push(area.id);
                    }
                }
                debug_assert!(
                    links.tabs1.iter().all(|t| !links.tabs2.contains(t)),
                    "tab {tab} has a neighbour on both sides"
                );
                self.map_mut(axis).insert(tab, links);
            }
        }
    }

    #[must_use]
    pub fn map(&self, axis: Axis) -> &BTreeMap<TabId, TabLinks> {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn map_mut(&mut self, axis: Axis) -> &mut BTreeMap<TabId, TabLinks> {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    #[must_use]
    pub fn links(&self, axis: Axis, tab: TabId) -> Option<&TabLinks> {
        self.map(axis).get(&tab)
    }

    /// Links of `tab`, created empty when missing.
    pub fn links_mut(&mut self, axis: Axis, tab: TabId) -> &mut TabLinks {
        self.map_mut(axis).entry(tab).or_default()
    }

    #[must_use]
    pub fn contains(&self, axis: Axis, tab: TabId) -> bool {
        self.map(axis).contains_key(&tab)
    }

    /// Areas on the `near` (areas1) or far (areas2) side of `tab`; empty for
    /// unknown tabs.
    #[must_use]
    pub fn areas_toward(&self, axis: Axis, tab: TabId, near: bool) -> Vec<AreaId> {
        self.links(axis, tab)
            .map(|links| links.areas_toward(near).to_vec())
            .unwrap_or_default()
    }

    /// Whether `tab` reaches the border on `side` through a chain of areas.
    ///
    /// The walk goes through the areas lying between `tab` and that border,
    /// hopping from each area's edge facing the tab to its edge facing the
    /// border.
    #[must_use]
    pub fn connected_to_border(&self, layout: &Layout, side: AreaSide, tab: TabId) -> bool {
        let mut memo = BTreeMap::new();
        let mut guard = PathGuard::new();
        self.reaches_border(layout, side, tab, &mut memo, &mut guard)
    }

    fn reaches_border(
        &self,
        layout: &Layout,
        side: AreaSide,
        tab: TabId,
        memo: &mut BTreeMap<TabId, bool>,
        guard: &mut PathGuard<TabId>,
    ) -> bool {
        if tab == layout.border(side) {
            return true;
        }
        if let Some(known) = memo.get(&tab) {
            return *known;
        }
        if !guard.enter(tab) {
            return false;
        }
        let mut reached = false;
        for area in self.areas_toward(side.axis(), tab, side.is_near()) {
            let Some(area) = layout.area(area) else {
                continue;
            };
            if self.reaches_border(layout, side, area.tab(side), memo, guard) {
                reached = true;
                break;
            }
        }
        guard.leave(tab);
        memo.insert(tab, reached);
        reached
    }

    #[must_use]
    pub fn connected_to_left_border(&self, layout: &Layout, tab: TabId) -> bool {
        self.connected_to_border(layout, AreaSide::Left, tab)
    }

    #[must_use]
    pub fn connected_to_top_border(&self, layout: &Layout, tab: TabId) -> bool {
        self.connected_to_border(layout, AreaSide::Top, tab)
    }

    #[must_use]
    pub fn connected_to_right_border(&self, layout: &Layout, tab: TabId) -> bool {
        self.connected_to_border(layout, AreaSide::Right, tab)
    }

    #[must_use]
    pub fn connected_to_bottom_border(&self, layout: &Layout, tab: TabId) -> bool {
        self.connected_to_border(layout, AreaSide::Bottom, tab)
    }

    /// Whether the edge of `area` on `side` touches another area.
    ///
    /// The area itself is listed on the inner side of its own tab, so that
    /// side needs a second entry while the outer side needs any.
    #[must_use]
    pub fn connected_to(&self, layout: &Layout, area: AreaId, side: AreaSide) -> bool {
        let Some(area) = layout.area(area) else {
            return false;
        };
        let Some(links) = self.links(side.axis(), area.tab(side)) else {
            return false;
        };
        let (inner, outer) = if side.is_near() {
            (&links.areas2, &links.areas1)
        } else {
            (&links.areas1, &links.areas2)
        };
        inner.len() > 1 || !outer.is_empty()
    }
}
