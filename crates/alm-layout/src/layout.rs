//! The area/tab model.
//!
//! A [`Layout`] owns every tab, area and constraint. Areas are kept in
//! insertion order, which is the iteration order every algorithm of the
//! crate relies on for its tie-breaking. Connection indexes and overlap
//! constraints are derived from this model and never authoritative.

use std::collections::BTreeSet;

use alm_core::debug;
use alm_core::geometry::{Axis, Rect, Size};

use crate::area::{Alignment, Area, AreaId, AreaRef, AreaSide, ItemId};
use crate::constraint::{Constraint, ConstraintId, Relation, Strength, Term};
use crate::error::LayoutError;
use crate::solver::{self, Feasibility};
use crate::tab::{TabArena, TabId};

/// A constraint-based layout: four border tabs, areas bound to tabs, and
/// linear constraints over tab values.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub(crate) tabs: TabArena,
    pub(crate) areas: Vec<Area>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) next_area: AreaId,
    pub(crate) next_constraint: ConstraintId,
    pub(crate) borders: AreaRef,
}

impl Layout {
    /// Empty layout of the given size. The top-left corner is the origin.
    #[must_use]
    pub fn new(size: Size) -> Self {
        let (tabs, [left, top, right, bottom]) = TabArena::with_borders(size.width, size.height);
        Self {
            tabs,
            areas: Vec::new(),
            constraints: Vec::new(),
            next_area: AreaId::MIN,
            next_constraint: ConstraintId::MIN,
            borders: AreaRef::new(left, top, right, bottom),
        }
    }

    #[must_use]
    pub const fn left(&self) -> TabId {
        self.borders.left
    }

    #[must_use]
    pub const fn top(&self) -> TabId {
        self.borders.top
    }

    #[must_use]
    pub const fn right(&self) -> TabId {
        self.borders.right
    }

    #[must_use]
    pub const fn bottom(&self) -> TabId {
        self.borders.bottom
    }

    /// The four border tabs.
    #[must_use]
    pub const fn borders(&self) -> AreaRef {
        self.borders
    }

    #[must_use]
    pub const fn border(&self, side: AreaSide) -> TabId {
        self.borders.tab(side)
    }

    #[must_use]
    pub fn is_border(&self, tab: TabId) -> bool {
        AreaSide::ALL.iter().any(|side| self.borders.tab(*side) == tab)
    }

    /// Current layout size, read from the far border tabs.
    #[must_use]
    pub fn size(&self) -> Size {
        let width = self.tab_value(self.right()).unwrap_or(0.0);
        let height = self.tab_value(self.bottom()).unwrap_or(0.0);
        Size::new(width, height)
    }

    /// Move the far borders. Constraints are not re-solved.
    pub fn set_size(&mut self, size: Size) {
        self.tabs.set_value(self.borders.right, size.width);
        self.tabs.set_value(self.borders.bottom, size.height);
    }

    // ── Tabs ────────────────────────────────────────────────────────

    #[must_use]
    pub fn tabs(&self) -> &TabArena {
        &self.tabs
    }

    /// New tab on `axis` at position 0.
    pub fn add_tab(&mut self, axis: Axis) -> Result<TabId, LayoutError> {
        self.tabs.alloc(axis, 0.0)
    }

    /// New tab on `axis` at `value`.
    pub fn add_tab_at(&mut self, axis: Axis, value: f64) -> Result<TabId, LayoutError> {
        self.tabs.alloc(axis, value)
    }

    pub fn add_x_tab(&mut self) -> Result<TabId, LayoutError> {
        self.add_tab(Axis::X)
    }

    pub fn add_y_tab(&mut self) -> Result<TabId, LayoutError> {
        self.add_tab(Axis::Y)
    }

    #[must_use]
    pub fn tab_value(&self, tab: TabId) -> Option<f64> {
        self.tabs.value(tab)
    }

    pub fn set_tab_value(&mut self, tab: TabId, value: f64) -> Result<(), LayoutError> {
        if self.tabs.set_value(tab, value) {
            Ok(())
        } else {
            Err(LayoutError::UnknownTab { tab })
        }
    }

    #[must_use]
    pub fn tab_axis(&self, tab: TabId) -> Option<Axis> {
        self.tabs.axis(tab)
    }

    #[must_use]
    pub fn contains_tab(&self, tab: TabId) -> bool {
        self.tabs.contains(tab)
    }

    /// Tabs on `axis` in creation order.
    #[must_use]
    pub fn tab_ids(&self, axis: Axis) -> Vec<TabId> {
        self.tabs.ids(axis).collect()
    }

    /// Tabs on `axis` ordered by value.
    #[must_use]
    pub fn tabs_sorted(&self, axis: Axis) -> Vec<TabId> {
        self.tabs.sorted_by_value(axis)
    }

    /// Value of `tab`, or 0 for unknown handles. For the algorithms that
    /// only ever see tabs reachable from areas of this layout.
    #[inline]
    pub(crate) fn value_or_zero(&self, tab: TabId) -> f64 {
        self.tabs.value(tab).unwrap_or(0.0)
    }

    // ── Areas ───────────────────────────────────────────────────────

    /// Bind `item` to a new area spanning the four given tabs.
    pub fn add_area(&mut self, item: ItemId, at: AreaRef) -> Result<AreaId, LayoutError> {
        for side in AreaSide::ALL {
            self.check_side_tab(side, at.tab(side))?;
        }
        let id = self.next_area;
        self.next_area = id.checked_next()?;
        self.areas.push(Area {
            id,
            item,
            left: at.left,
            top: at.top,
            right: at.right,
            bottom: at.bottom,
            min_size: Size::ZERO,
            max_size: None,
            preferred_size: None,
            alignment: Alignment::default(),
        });
        Ok(id)
    }

    /// Unbind an area. Its tabs stay in the arena until garbage collection.
    pub fn remove_area(&mut self, id: AreaId) -> Option<Area> {
        let index = self.areas.iter().position(|area| area.id == id)?;
        Some(self.areas.remove(index))
    }

    #[must_use]
    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.iter().find(|area| area.id == id)
    }

    pub fn area_mut(&mut self, id: AreaId) -> Option<&mut Area> {
        self.areas.iter_mut().find(|area| area.id == id)
    }

    /// Areas in insertion order.
    #[must_use]
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    #[must_use]
    pub fn area_ids(&self) -> Vec<AreaId> {
        self.areas.iter().map(|area| area.id).collect()
    }

    #[must_use]
    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    #[must_use]
    pub fn area_for_item(&self, item: ItemId) -> Option<&Area> {
        self.areas.iter().find(|area| area.item == item)
    }

    /// Rebind one side of an area and return the tab it was bound to.
    pub fn set_side(
        &mut self,
        area: AreaId,
        side: AreaSide,
        tab: TabId,
    ) -> Result<TabId, LayoutError> {
        self.check_side_tab(side, tab)?;
        let target = self
            .area_mut(area)
            .ok_or(LayoutError::UnknownArea { area })?;
        let old = target.tab(side);
        target.set_tab(side, tab);
        Ok(old)
    }

    /// Rebind all four sides of an area and return the previous bindings.
    pub fn rebind_area(&mut self, area: AreaId, to: AreaRef) -> Result<AreaRef, LayoutError> {
        for side in AreaSide::ALL {
            self.check_side_tab(side, to.tab(side))?;
        }
        let target = self
            .area_mut(area)
            .ok_or(LayoutError::UnknownArea { area })?;
        let old = AreaRef::of(target);
        target.rebind(to);
        Ok(old)
    }

    /// Frame of an area from the current tab values.
    #[must_use]
    pub fn frame(&self, area: AreaId) -> Option<Rect> {
        self.area(area)
            .and_then(|area| self.ref_frame(&AreaRef::of(area)))
    }

    /// Frame spanned by four tabs.
    #[must_use]
    pub fn ref_frame(&self, at: &AreaRef) -> Option<Rect> {
        Some(Rect::new(
            self.tabs.value(at.left)?,
            self.tabs.value(at.top)?,
            self.tabs.value(at.right)?,
            self.tabs.value(at.bottom)?,
        ))
    }

    fn check_side_tab(&self, side: AreaSide, tab: TabId) -> Result<(), LayoutError> {
        let expected = side.axis();
        match self.tabs.axis(tab) {
            None => Err(LayoutError::UnknownTab { tab }),
            Some(axis) if axis != expected => Err(LayoutError::AxisMismatch { tab, expected }),
            Some(_) => Ok(()),
        }
    }

    // ── Constraints ─────────────────────────────────────────────────

    /// Add `sum(terms) <relation> rhs`.
    pub fn add_constraint(
        &mut self,
        terms: Vec<Term>,
        relation: Relation,
        rhs: f64,
        strength: Strength,
        label: Option<&str>,
    ) -> Result<ConstraintId, LayoutError> {
        if let Some(term) = terms.iter().find(|term| !self.tabs.contains(term.tab)) {
            return Err(LayoutError::UnknownTab { tab: term.tab });
        }
        let id = self.next_constraint;
        self.next_constraint = id.checked_next()?;
        self.constraints.push(Constraint {
            id,
            terms,
            relation,
            rhs,
            strength,
            label: label.map(str::to_owned),
        });
        Ok(id)
    }

    pub fn remove_constraint(&mut self, id: ConstraintId) -> Option<Constraint> {
        let index = self.constraints.iter().position(|c| c.id == id)?;
        Some(self.constraints.remove(index))
    }

    /// Constraints in insertion order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[must_use]
    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.id == id)
    }

    // ── Maintenance ─────────────────────────────────────────────────

    /// Drop every non-border tab that no area and no constraint references.
    ///
    /// Returns the number of freed tabs.
    pub fn collect_garbage(&mut self) -> usize {
        let mut live: BTreeSet<TabId> = BTreeSet::new();
        live.extend(AreaSide::ALL.iter().map(|side| self.borders.tab(*side)));
        for area in &self.areas {
            live.extend(AreaSide::ALL.iter().map(|side| area.tab(*side)));
        }
        for constraint in &self.constraints {
            live.extend(constraint.terms.iter().map(|term| term.tab));
        }
        let dead: Vec<TabId> = self
            .tabs
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !live.contains(id))
            .collect();
        for tab in &dead {
            self.tabs.remove(*tab);
        }
        if !dead.is_empty() {
            debug!(freed = dead.len(), "unreferenced tabs collected");
        }
        dead.len()
    }

    /// Check that every handle resolves and every area side sits on a tab of
    /// the matching axis.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for side in AreaSide::ALL {
            self.check_side_tab(side, self.borders.tab(side))?;
        }
        let mut seen = BTreeSet::new();
        for area in &self.areas {
            if !seen.insert(area.id) {
                return Err(LayoutError::DuplicateArea { area: area.id });
            }
            for side in AreaSide::ALL {
                self.check_side_tab(side, area.tab(side))?;
            }
        }
        let mut seen = BTreeSet::new();
        for constraint in &self.constraints {
            if !seen.insert(constraint.id) {
                return Err(LayoutError::DuplicateConstraint {
                    constraint: constraint.id,
                });
            }
            if let Some(term) = constraint
                .terms
                .iter()
                .find(|term| !self.tabs.contains(term.tab))
            {
                return Err(LayoutError::UnknownTab { tab: term.tab });
            }
        }
        Ok(())
    }

    /// Feasibility check through the LP solver.
    ///
    /// Solved tab values are written back only when the layout is feasible;
    /// an infeasible layout keeps its previous values.
    pub fn solve(&mut self) -> Result<Feasibility, LayoutError> {
        self.validate()?;
        match solver::solve(self)? {
            Some(solution) => {
                for (tab, value) in solution.values() {
                    self.tabs.set_value(tab, value);
                }
                Ok(Feasibility::Feasible)
            }
            None => Ok(Feasibility::Infeasible),
        }
    }

    /// Deterministic hash of tabs, areas and constraints.
    ///
    /// Intended for journal rows and replay diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix(hash: &mut u64, byte: u8) {
            *hash ^= u64::from(byte);
            *hash = hash.wrapping_mul(PRIME);
        }

        fn mix_u64(hash: &mut u64, value: u64) {
            for byte in value.to_le_bytes() {
                mix(hash, byte);
            }
        }

        fn mix_f64(hash: &mut u64, value: f64) {
            mix_u64(hash, value.to_bits());
        }

        fn mix_axis(hash: &mut u64, axis: Axis) {
            mix(
                hash,
                match axis {
                    Axis::X => 1,
                    Axis::Y => 2,
                },
            );
        }

        fn mix_size(hash: &mut u64, size: Option<Size>) {
            match size {
                Some(size) => {
                    mix(hash, 1);
                    mix_f64(hash, size.width);
                    mix_f64(hash, size.height);
                }
                None => mix(hash, 0),
            }
        }

        fn mix_str(hash: &mut u64, value: Option<&str>) {
            match value {
                Some(value) => {
                    mix(hash, 1);
                    mix_u64(hash, value.len() as u64);
                    for byte in value.as_bytes() {
                        mix(hash, *byte);
                    }
                }
                None => mix(hash, 0),
            }
        }

        let mut hash = OFFSET_BASIS;
        mix_u64(&mut hash, self.tabs.len() as u64);
        for (id, slot) in self.tabs.iter() {
            mix_u64(&mut hash, id.get());
            mix_axis(&mut hash, slot.axis);
            mix_f64(&mut hash, slot.value);
        }

        mix_u64(&mut hash, self.areas.len() as u64);
        for area in &self.areas {
            mix_u64(&mut hash, area.id.get());
            mix_u64(&mut hash, area.item.0);
            for side in AreaSide::ALL {
                mix_u64(&mut hash, area.tab(side).get());
            }
            mix_size(&mut hash, Some(area.min_size));
            mix_size(&mut hash, area.max_size);
            mix_size(&mut hash, area.preferred_size);
            mix(&mut hash, area.alignment.horizontal as u8);
            mix(&mut hash, area.alignment.vertical as u8);
        }

        mix_u64(&mut hash, self.constraints.len() as u64);
        for constraint in &self.constraints {
            mix_u64(&mut hash, constraint.id.get());
            mix_u64(&mut hash, constraint.terms.len() as u64);
            for term in &constraint.terms {
                mix_f64(&mut hash, term.coefficient);
                mix_u64(&mut hash, term.tab.get());
            }
            mix(&mut hash, constraint.relation as u8);
            mix_f64(&mut hash, constraint.rhs);
            mix(&mut hash, constraint.strength as u8);
            mix_str(&mut hash, constraint.label.as_deref());
        }

        hash
    }
}
