//! Non-overlap constraint synthesis.
//!
//! Areas sharing tabs can never overlap; areas that only sit next to each
//! other need an explicit ordering constraint between their facing tabs.
//! [`SimpleOverlapEngine`] adds the smallest set of `>=` constraints it can
//! find: for every area it prunes the candidates already ordered through
//! established tab links and orders the closest remaining one, preferring a
//! tab further along an existing chain over the area's own edge. Edges left
//! without any neighbour are tied to the layout border.
//!
//! [`OverlapManager`] owns the synthesized constraints so that they can be
//! dropped wholesale before the next structural edit.

use std::collections::BTreeSet;

use alm_core::{debug, debug_span, trace};

use crate::area::{AreaId, AreaRef, AreaSide};
use crate::connections::TabConnections;
use crate::constraint::{ConstraintId, OVERLAP_LABEL, Relation, Strength, Term};
use crate::error::LayoutError;
use crate::layout::Layout;
use crate::tab::TabId;
use crate::walk::PathGuard;

/// Gaps smaller than this count as touching.
pub const GAP_TOLERANCE: f64 = 1e-5;

const SIDE_ORDER: [AreaSide; 4] = [
    AreaSide::Left,
    AreaSide::Top,
    AreaSide::Right,
    AreaSide::Bottom,
];

/// Owner of the overlap constraints of one layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlapManager {
    connections: TabConnections,
    constraints: Vec<ConstraintId>,
}

impl OverlapManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connection index the last connect ran on, including the tab links
    /// the engine added.
    #[must_use]
    pub fn connections(&self) -> &TabConnections {
        &self.connections
    }

    /// Constraints currently owned, in creation order.
    #[must_use]
    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }

    /// Remove every owned constraint from `layout` and forget the index.
    pub fn disconnect_areas(&mut self, layout: &mut Layout) {
        let _span =
            debug_span!("alm.overlap.disconnect", constraints = self.constraints.len()).entered();
        for id in self.constraints.drain(..) {
            layout.remove_constraint(id);
        }
        self.connections.clear();
    }

    /// Rebuild the connection index from the current bindings.
    pub fn fill_tab_connections(&mut self, layout: &Layout) {
        self.connections.fill(layout);
    }

    /// Synthesize the overlap constraints of `layout`.
    ///
    /// Constraints from an earlier call are removed first and the index is
    /// refilled, so repeated calls never stack duplicates. Returns the number
    /// of constraints added.
    pub fn connect_areas(&mut self, layout: &mut Layout, fill: bool) -> Result<usize, LayoutError> {
        let mut fill = fill || self.connections.is_empty();
        if !self.constraints.is_empty() {
            self.disconnect_areas(layout);
            fill = true;
        }
        if fill {
            self.fill_tab_connections(layout);
        }
        self.constraints = SimpleOverlapEngine::new(layout, &mut self.connections).connect_areas()?;
        Ok(self.constraints.len())
    }

    /// Disconnect, refill and connect again.
    pub fn reconnect_areas(&mut self, layout: &mut Layout) -> Result<usize, LayoutError> {
        self.disconnect_areas(layout);
        self.connect_areas(layout, true)
    }
}

/// Gaps from a main area to another one, per side of the main area.
///
/// Overlapping sides are infinitely far; near-touching ones are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Gaps([f64; 4]);

impl Gaps {
    fn between(layout: &Layout, main: &AreaRef, other: &AreaRef) -> Self {
        let v = |tab: TabId| layout.value_or_zero(tab);
        let raw = [
            v(main.left) - v(other.right),
            v(main.top) - v(other.bottom),
            v(other.left) - v(main.right),
            v(other.top) - v(main.bottom),
        ];
        Self(raw.map(|gap| {
            if gap.abs() < GAP_TOLERANCE {
                0.0
            } else if gap < 0.0 {
                f64::INFINITY
            } else {
                gap
            }
        }))
    }

    /// Smallest finite gap, first side in left, top, right, bottom order on
    /// ties.
    fn closest(&self) -> Option<(AreaSide, f64)> {
        let mut best: Option<(AreaSide, f64)> = None;
        for (side, gap) in SIDE_ORDER.into_iter().zip(self.0) {
            if gap < best.map_or(f64::INFINITY, |(_, current)| current) {
                best = Some((side, gap));
            }
        }
        best
    }
}

/// One synthesis pass over a layout.
#[derive(Debug)]
pub struct SimpleOverlapEngine<'a> {
    layout: &'a mut Layout,
    connections: &'a mut TabConnections,
}

impl<'a> SimpleOverlapEngine<'a> {
    /// `connections` must already describe the bindings of `layout`.
    pub fn new(layout: &'a mut Layout, connections: &'a mut TabConnections) -> Self {
        Self {
            layout,
            connections,
        }
    }

    /// Add the ordering and border constraints; returns their ids.
    pub fn connect_areas(&mut self) -> Result<Vec<ConstraintId>, LayoutError> {
        let _span = debug_span!("alm.overlap.connect", areas = self.layout.area_count()).entered();
        let ids = self.layout.area_ids();
        let mut created = Vec::new();
        for &id in &ids {
            let Some(main) = self.layout.area(id).map(AreaRef::of) else {
                continue;
            };
            let mut candidates: Vec<AreaId> = ids.iter().copied().filter(|o| *o != id).collect();
            for side in SIDE_ORDER {
                self.remove_connected_areas(side, main.tab(side), &mut candidates);
            }

            while let Some((closest, side)) = self.find_closest_area(&main, &candidates) {
                candidates.retain(|candidate| *candidate != closest);
                let Some(other) = self.layout.area(closest).map(AreaRef::of) else {
                    continue;
                };
                if let Some((found, constraint)) = self.order_against(side, &main, &other)? {
                    created.push(constraint);
                    self.remove_connected_areas(side, found, &mut candidates);
                }
            }

            created.extend(self.anchor_to_borders(&main)?);
        }
        debug!(constraints = created.len(), "overlap constraints synthesized");
        Ok(created)
    }

    /// Drop from `candidates` every area ordered behind `tab` on `side`.
    fn remove_connected_areas(&self, side: AreaSide, tab: TabId, candidates: &mut Vec<AreaId>) {
        let mut guard = PathGuard::new();
        let mut visited = BTreeSet::new();
        self.prune_behind(side, tab, candidates, &mut guard, &mut visited);
    }

    fn prune_behind(
        &self,
        side: AreaSide,
        tab: TabId,
        candidates: &mut Vec<AreaId>,
        guard: &mut PathGuard<TabId>,
        visited: &mut BTreeSet<TabId>,
    ) {
        if tab == self.layout.border(side) || candidates.is_empty() {
            return;
        }
        if !guard.enter(tab) {
            return;
        }
        let links = visited
            .insert(tab)
            .then(|| self.connections.links(side.axis(), tab))
            .flatten();
        if let Some(links) = links {
            let near = side.is_near();
            candidates.retain(|candidate| !links.areas_toward(near).contains(candidate));
            for &next in links.tabs_toward(near) {
                self.prune_behind(side, next, candidates, guard, visited);
            }
        }
        guard.leave(tab);
    }

    fn find_closest_area(
        &self,
        main: &AreaRef,
        candidates: &[AreaId],
    ) -> Option<(AreaId, AreaSide)> {
        let mut best: Option<(AreaId, AreaSide, f64)> = None;
        for &candidate in candidates {
            let Some(other) = self.layout.area(candidate).map(AreaRef::of) else {
                continue;
            };
            let Some((side, gap)) = Gaps::between(&*self.layout, main, &other).closest() else {
                continue;
            };
            if best.is_none_or(|(_, _, current)| gap < current) {
                best = Some((candidate, side, gap));
            }
        }
        best.map(|(area, side, _)| (area, side))
    }

    /// Tab on the `side` chain of `main` nearest to the facing edge of
    /// `other`.
    fn closest_connected_tab(&self, side: AreaSide, main: &AreaRef, other: &AreaRef) -> TabId {
        let target = other.tab(side.opposite());
        let mut guard = PathGuard::new();
        self.find_closest_connected_tab(side, main.tab(side), target, &mut guard)
            .0
    }

    /// Walk the tab links from `start` toward `side` and return the tab
    /// closest to `target` that is still on the near side of it, together
    /// with its distance.
    fn find_closest_connected_tab(
        &self,
        side: AreaSide,
        start: TabId,
        target: TabId,
        guard: &mut PathGuard<TabId>,
    ) -> (TabId, f64) {
        let toward_low = side.is_near();
        let target_value = self.layout.value_or_zero(target);
        let gap = |tab: TabId| {
            let value = self.layout.value_or_zero(tab);
            if toward_low {
                value - target_value
            } else {
                target_value - value
            }
        };

        let mut found = start;
        let mut min = gap(start);
        if !guard.enter(start) {
            return (found, min);
        }
        if let Some(links) = self.connections.links(side.axis(), start) {
            for &next in links.tabs_toward(toward_low) {
                if gap(next) <= 0.0 {
                    continue;
                }
                let (candidate, distance) =
                    self.find_closest_connected_tab(side, next, target, guard);
                if distance < min {
                    found = candidate;
                    min = distance;
                }
            }
        }
        guard.leave(start);
        (found, min)
    }

    /// Order `main` after (or before) `other` along `side` and link the two
    /// facing tabs. Returns the tab of `main`'s chain the order was attached
    /// to, or `None` when those tabs were already linked.
    fn order_against(
        &mut self,
        side: AreaSide,
        main: &AreaRef,
        other: &AreaRef,
    ) -> Result<Option<(TabId, ConstraintId)>, LayoutError> {
        let axis = side.axis();
        let near = side.is_near();
        let target = other.tab(side.opposite());
        let found = self.closest_connected_tab(side, main, other);

        let linked = self
            .connections
            .links(axis, target)
            .is_some_and(|links| links.tabs_toward(near).contains(&found));
        if linked {
            return Ok(None);
        }

        let (low, high) = if near {
            (target, found)
        } else {
            (found, target)
        };
        let id = self.add_order(low, high)?;
        trace!(
            constraint = id.get(),
            low = low.get(),
            high = high.get(),
            "ordering constraint"
        );
        self.connections
            .links_mut(axis, found)
            .tabs_toward_mut(near)
            .push(target);
        self.connections
            .links_mut(axis, target)
            .tabs_toward_mut(!near)
            .push(found);
        Ok(Some((found, id)))
    }

    /// Tie every edge of `main` without an ordered neighbour to the border.
    fn anchor_to_borders(&mut self, main: &AreaRef) -> Result<Vec<ConstraintId>, LayoutError> {
        let mut created = Vec::new();
        for side in SIDE_ORDER {
            let tab = main.tab(side);
            let border = self.layout.border(side);
            let near = side.is_near();
            let unordered = self
                .connections
                .links(side.axis(), tab)
                .is_none_or(|links| links.tabs_toward(near).is_empty());
            if tab == border || !unordered {
                continue;
            }
            let (low, high) = if near { (border, tab) } else { (tab, border) };
            created.push(self.add_order(low, high)?);
            self.connections
                .links_mut(side.axis(), tab)
                .tabs_toward_mut(near)
                .push(border);
        }
        Ok(created)
    }

    /// `high - low >= 0`
    fn add_order(&mut self, low: TabId, high: TabId) -> Result<ConstraintId, LayoutError> {
        self.layout.add_constraint(
            vec![Term::new(-1.0, low), Term::new(1.0, high)],
            Relation::Ge,
            0.0,
            Strength::Required,
            Some(OVERLAP_LABEL),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::ItemId;
    use alm_core::geometry::{Axis, Size};

    fn overlap_constraints(layout: &Layout) -> usize {
        layout
            .constraints()
            .iter()
            .filter(|c| c.has_label(OVERLAP_LABEL))
            .count()
    }

    #[test]
    fn disjoint_columns_get_one_ordering_constraint() {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let xa = layout.add_tab_at(Axis::X, 50.0).expect("tab");
        let xb = layout.add_tab_at(Axis::X, 60.0).expect("tab");
        let b = layout.borders();
        layout
            .add_area(ItemId(1), AreaRef::new(b.left, b.top, xa, b.bottom))
            .expect("area");
        layout
            .add_area(ItemId(2), AreaRef::new(xb, b.top, b.right, b.bottom))
            .expect("area");

        let mut manager = OverlapManager::new();
        assert_eq!(manager.connect_areas(&mut layout, true).expect("connect"), 1);
        let constraint = layout
            .constraint(manager.constraints()[0])
            .expect("constraint");
        assert_eq!(constraint.relation, Relation::Ge);
        assert_eq!(
            constraint.terms,
            vec![Term::new(-1.0, xa), Term::new(1.0, xb)]
        );

        // Connecting again replaces instead of stacking.
        manager.connect_areas(&mut layout, false).expect("connect");
        assert_eq!(overlap_constraints(&layout), 1);
    }

    #[test]
    fn areas_sharing_tabs_need_no_constraints() {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let mid = layout.add_tab_at(Axis::X, 40.0).expect("tab");
        let b = layout.borders();
        layout
            .add_area(ItemId(1), AreaRef::new(b.left, b.top, mid, b.bottom))
            .expect("area");
        layout
            .add_area(ItemId(2), AreaRef::new(mid, b.top, b.right, b.bottom))
            .expect("area");

        let mut manager = OverlapManager::new();
        assert_eq!(manager.connect_areas(&mut layout, true).expect("connect"), 0);
    }

    #[test]
    fn facing_tabs_already_linked_stay_acyclic() {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let t1 = layout.add_tab_at(Axis::X, 40.0).expect("tab");
        let t2 = layout.add_tab_at(Axis::X, 40.0).expect("tab");
        let b = layout.borders();
        layout
            .add_area(ItemId(1), AreaRef::new(b.left, b.top, t1, b.bottom))
            .expect("area");
        // Zero width, running from t2 back to t1.
        layout
            .add_area(ItemId(2), AreaRef::new(t2, b.top, t1, b.bottom))
            .expect("area");
        layout
            .add_area(ItemId(3), AreaRef::new(t2, b.top, b.right, b.bottom))
            .expect("area");

        let mut connections = TabConnections::from_layout(&layout);
        SimpleOverlapEngine::new(&mut layout, &mut connections)
            .connect_areas()
            .expect("connect");
        for (tab, links) in connections.map(Axis::X) {
            for other in links.tabs_toward(true) {
                assert!(
                    !links.tabs_toward(false).contains(other),
                    "{tab:?} links {other:?} on both sides"
                );
            }
        }

        // The manager path walks the same graph again on reconnect.
        let mut manager = OverlapManager::new();
        manager.connect_areas(&mut layout, true).expect("connect");
        manager.reconnect_areas(&mut layout).expect("reconnect");
    }

    #[test]
    fn floating_area_is_tied_to_all_borders() {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let l = layout.add_tab_at(Axis::X, 10.0).expect("tab");
        let r = layout.add_tab_at(Axis::X, 50.0).expect("tab");
        let t = layout.add_tab_at(Axis::Y, 10.0).expect("tab");
        let bm = layout.add_tab_at(Axis::Y, 50.0).expect("tab");
        layout
            .add_area(ItemId(1), AreaRef::new(l, t, r, bm))
            .expect("area");

        let mut manager = OverlapManager::new();
        assert_eq!(manager.connect_areas(&mut layout, true).expect("connect"), 4);
        let left_anchor = layout
            .constraint(manager.constraints()[0])
            .expect("constraint");
        assert_eq!(
            left_anchor.terms,
            vec![Term::new(-1.0, layout.left()), Term::new(1.0, l)]
        );

        manager.disconnect_areas(&mut layout);
        assert!(manager.constraints().is_empty());
        assert!(manager.connections().is_empty());
        assert_eq!(overlap_constraints(&layout), 0);
    }

    #[test]
    fn reconnect_follows_rebound_areas() {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let l = layout.add_tab_at(Axis::X, 10.0).expect("tab");
        let r = layout.add_tab_at(Axis::X, 50.0).expect("tab");
        let b = layout.borders();
        let area = layout
            .add_area(ItemId(1), AreaRef::new(l, b.top, r, b.bottom))
            .expect("area");

        let mut manager = OverlapManager::new();
        assert_eq!(manager.connect_areas(&mut layout, true).expect("connect"), 2);
        layout
            .rebind_area(area, AreaRef::new(b.left, b.top, r, b.bottom))
            .expect("rebind");
        assert_eq!(manager.reconnect_areas(&mut layout).expect("reconnect"), 1);
        assert_eq!(overlap_constraints(&layout), 1);
    }

    #[test]
    fn chained_tabs_are_not_ordered_twice() {
        // a | b   c    where b and c are both right of a but c only touches
        // a through b's chain.
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let x30 = layout.add_tab_at(Axis::X, 30.0).expect("tab");
        let x60 = layout.add_tab_at(Axis::X, 60.0).expect("tab");
        let x70 = layout.add_tab_at(Axis::X, 70.0).expect("tab");
        let b = layout.borders();
        layout
            .add_area(ItemId(1), AreaRef::new(b.left, b.top, x30, b.bottom))
            .expect("area");
        layout
            .add_area(ItemId(2), AreaRef::new(x30, b.top, x60, b.bottom))
            .expect("area");
        layout
            .add_area(ItemId(3), AreaRef::new(x70, b.top, b.right, b.bottom))
            .expect("area");

        let mut manager = OverlapManager::new();
        manager.connect_areas(&mut layout, true).expect("connect");
        let orders_x70 = layout
            .constraints()
            .iter()
            .filter(|c| c.references(x70))
            .count();
        assert_eq!(orders_x70, 1);
        assert_eq!(overlap_constraints(&layout), 1);
    }

    #[test]
    fn gaps_treat_overlap_as_infinite() {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let x40 = layout.add_tab_at(Axis::X, 40.0).expect("tab");
        let x60 = layout.add_tab_at(Axis::X, 60.0).expect("tab");
        let b = layout.borders();
        let main = AreaRef::new(b.left, b.top, x60, b.bottom);
        let other = AreaRef::new(x40, b.top, b.right, b.bottom);
        let gaps = Gaps::between(&layout, &main, &other);
        assert!(gaps.0.iter().all(|gap| gap.is_infinite()));
        assert_eq!(gaps.closest(), None);

        let touching = AreaRef::new(x60, b.top, b.right, b.bottom);
        let gaps = Gaps::between(&layout, &main, &touching);
        assert_eq!(gaps.closest(), Some((AreaSide::Right, 0.0)));
    }
}
