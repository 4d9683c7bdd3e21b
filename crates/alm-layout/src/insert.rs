//! Insertion-point detection next to a hovered tab.

use alm_core::geometry::{FUZZY_TOLERANCE, Rect};

use crate::area::{AreaId, AreaSide};
use crate::connections::TabConnections;
use crate::direction::{Orientation, SearchDirection};
use crate::layout::Layout;
use crate::tab::TabId;

/// Where a dragged frame can be inserted next to a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPoint {
    /// Areas between the bounding tabs that get pushed aside.
    pub areas: Vec<AreaId>,
    /// Side of the hovered tab the insertion happens on.
    pub direction: AreaSide,
}

/// Orthogonal tabs bracketing the target frame on one side of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bracket {
    low: TabId,
    high: TabId,
}

#[derive(Debug, Clone, Copy)]
pub struct InsertDetection<'a> {
    layout: &'a Layout,
    connections: &'a TabConnections,
}

impl<'a> InsertDetection<'a> {
    #[must_use]
    pub const fn new(layout: &'a Layout, connections: &'a TabConnections) -> Self {
        Self {
            layout,
            connections,
        }
    }

    /// Areas to push aside when inserting `target` next to `tab`, or `None`
    /// when neither side of the tab brackets the target.
    ///
    /// Both sides are scored by how well the bracketed span matches the
    /// target's orthogonal extent; the lower side wins ties.
    #[must_use]
    pub fn get_insert_areas(&self, tab: TabId, target: &Rect) -> Option<InsertionPoint> {
        let axis = self.layout.tab_axis(tab)?;
        let orientation = Orientation::of_axis(axis);
        let (low_dir, high_dir) = orientation.directions();

        let (bracket1, candidates1) = self.find_insert_tabs(tab, low_dir, orientation, target);
        let (bracket2, candidates2) = self.find_insert_tabs(tab, high_dir, orientation, target);
        if bracket1.is_none() && bracket2.is_none() {
            return None;
        }

        let extent = orientation.orth_extent(target);
        let fit = |bracket: Option<Bracket>| {
            bracket.map_or(f64::MAX, |b| {
                let span = self.layout.value_or_zero(b.high) - self.layout.value_or_zero(b.low);
                (span - extent).abs()
            })
        };
        let (bracket, candidates, direction) = if fit(bracket1) <= fit(bracket2) {
            (bracket1, candidates1, low_dir)
        } else {
            (bracket2, candidates2, high_dir)
        };
        let bracket = bracket?;
        Some(InsertionPoint {
            areas: self.fill_areas_between(bracket, orientation, &candidates),
            direction: direction.side(),
        })
    }

    /// Areas on the `search` side of every tab sharing the position of `tab`.
    fn all_areas_for(&self, tab: TabId, search: SearchDirection) -> Vec<AreaId> {
        let axis = search.axis();
        let value = self.layout.value_or_zero(tab);
        let mut areas = Vec::new();
        for current in self.layout.tabs().ids(axis) {
            if (self.layout.value_or_zero(current) - value).abs() >= FUZZY_TOLERANCE {
                continue;
            }
            if let Some(links) = self.connections.links(axis, current) {
                areas.extend_from_slice(search.areas_search_direction(links));
            }
        }
        areas
    }

    fn find_insert_tabs(
        &self,
        tab: TabId,
        search: SearchDirection,
        orientation: Orientation,
        target: &Rect,
    ) -> (Option<Bracket>, Vec<AreaId>) {
        let candidates = self.all_areas_for(tab, search);
        let low_edge = orientation.orth_side1(target);
        let high_edge = orientation.orth_side2(target);
        let middle = low_edge + orientation.orth_extent(target) / 2.0;

        let mut low: Option<(f64, TabId)> = None;
        let mut high: Option<(f64, TabId)> = None;
        for area in candidates.iter().filter_map(|id| self.layout.area(*id)) {
            let tab1 = orientation.orth_tab1(area);
            let value1 = self.layout.value_or_zero(tab1);
            let dist1 = (low_edge - value1).abs();
            if value1 < middle && low.is_none_or(|(best, _)| dist1 < best) {
                low = Some((dist1, tab1));
            }

            let tab2 = orientation.orth_tab2(area);
            let value2 = self.layout.value_or_zero(tab2);
            let dist2 = (value2 - high_edge).abs();
            if value2 > middle && high.is_none_or(|(best, _)| dist2 < best) {
                high = Some((dist2, tab2));
            }
        }

        let bracket = match (low, high) {
            (Some((_, low)), Some((_, high)))
                if self.layout.value_or_zero(low) <= high_edge
                    && self.layout.value_or_zero(high) >= low_edge =>
            {
                Some(Bracket { low, high })
            }
            _ => None,
        };
        (bracket, candidates)
    }

    fn fill_areas_between(
        &self,
        bracket: Bracket,
        orientation: Orientation,
        candidates: &[AreaId],
    ) -> Vec<AreaId> {
        let low = self.layout.value_or_zero(bracket.low);
        let high = self.layout.value_or_zero(bracket.high);
        candidates
            .iter()
            .copied()
            .filter(|id| {
                self.layout.area(*id).is_some_and(|area| {
                    low <= self.layout.value_or_zero(orientation.orth_tab1(area))
                        && self.layout.value_or_zero(orientation.orth_tab2(area)) <= high
                })
            })
            .collect()
    }
}
