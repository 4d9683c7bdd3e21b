//! Edit actions: the structural edits a user gesture resolves to.
//!
//! An action rebinds area sides and then lets [`AreaRemoval`] close the gaps
//! it opened. Actions never check feasibility; the editor runs them on a
//! working copy and solves afterwards. Undo restores the layout snapshot
//! taken before the action ran, plus the inverse of any roster call.

use std::collections::BTreeSet;

use alm_core::geometry::Axis;
use serde::{Deserialize, Serialize};

use crate::area::{
    Alignment, AreaId, AreaRef, AreaSide, HorizontalAlignment, ItemId, VerticalAlignment,
};
use crate::config::EditorConfig;
use crate::connections::TabConnections;
use crate::constraint::{EDIT_HELPER_LABEL, Relation, Strength, Term};
use crate::empty_area::EmptyAreaTarget;
use crate::error::EditFailure;
use crate::layout::Layout;
use crate::removal::{AreaRemoval, fill_empty_space};
use crate::roster::ItemRoster;
use crate::snapshot::LayoutSnapshot;
use crate::tab::TabId;

/// Supported structural edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditAction {
    /// Move `area` next to the X tab `tab`, pushing `areas` aside.
    InsertAreaHorizontal {
        area: AreaId,
        tab: TabId,
        areas: Vec<AreaId>,
        direction: AreaSide,
        alignment: VerticalAlignment,
    },
    /// Move `area` next to the Y tab `tab`, pushing `areas` aside.
    InsertAreaVertical {
        area: AreaId,
        tab: TabId,
        areas: Vec<AreaId>,
        direction: AreaSide,
        alignment: HorizontalAlignment,
    },
    /// Place a new area for `item` next to the X tab `tab`.
    InsertNewHorizontal {
        item: ItemId,
        tab: TabId,
        areas: Vec<AreaId>,
        direction: AreaSide,
        alignment: VerticalAlignment,
    },
    /// Place a new area for `item` next to the Y tab `tab`.
    InsertNewVertical {
        item: ItemId,
        tab: TabId,
        areas: Vec<AreaId>,
        direction: AreaSide,
        alignment: HorizontalAlignment,
    },
    /// Place a new area for `item` into empty space.
    InsertNewInEmptyArea { item: ItemId, target: EmptyAreaTarget },
    /// Move `area` into empty space.
    Move { area: AreaId, target: EmptyAreaTarget },
    /// Exchange the bindings of two areas.
    Swap { from: AreaId, to: AreaId },
    /// Rebind the dragged edges of `area` onto existing tabs.
    Resize {
        area: AreaId,
        x_from: Option<TabId>,
        y_from: Option<TabId>,
        x_to: Option<TabId>,
        y_to: Option<TabId>,
    },
    /// Give the `side` edge its own tab, held at `position` by a size
    /// constraint.
    HardResize {
        area: AreaId,
        side: AreaSide,
        position: f64,
    },
    /// Detach the `side` edge of `area` onto a fresh tab.
    InsertTab { area: AreaId, side: AreaSide },
    /// Rebind the `side` edge of every area in `areas` to `to_tab`.
    ResizeGroup {
        areas: Vec<AreaId>,
        side: AreaSide,
        to_tab: TabId,
    },
    /// Move the `side` edge of every area in `areas` onto one fresh tab.
    InsertGroupTab { areas: Vec<AreaId>, side: AreaSide },
    /// Remove `area` and trash its item.
    RemoveItem { area: AreaId },
    SetAlignment { area: AreaId, alignment: Alignment },
}

/// Stable action discriminator used in logs and journal rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditActionKind {
    InsertAreaHorizontal,
    InsertAreaVertical,
    InsertNewHorizontal,
    InsertNewVertical,
    InsertNewInEmptyArea,
    Move,
    Swap,
    Resize,
    HardResize,
    InsertTab,
    ResizeGroup,
    InsertGroupTab,
    RemoveItem,
    SetAlignment,
}

/// What an action runs against.
pub struct ActionContext<'a> {
    pub layout: &'a mut Layout,
    pub roster: &'a mut dyn ItemRoster,
    pub config: &'a EditorConfig,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        layout: &'a mut Layout,
        roster: &'a mut dyn ItemRoster,
        config: &'a EditorConfig,
    ) -> Self {
        Self {
            layout,
            roster,
            config,
        }
    }
}

impl std::fmt::Debug for ActionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("layout", &self.layout)
            .field("roster", &"<dyn ItemRoster>")
            .field("config", &self.config)
            .finish()
    }
}

/// Which orthogonal edges an inserted area shares with a single split
/// neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SharedEdges {
    Both,
    Near,
    Far,
}

impl From<VerticalAlignment> for SharedEdges {
    fn from(alignment: VerticalAlignment) -> Self {
        match alignment {
            VerticalAlignment::Top => Self::Near,
            VerticalAlignment::Bottom => Self::Far,
            VerticalAlignment::Middle | VerticalAlignment::UseFullHeight => Self::Both,
        }
    }
}

impl From<HorizontalAlignment> for SharedEdges {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => Self::Near,
            HorizontalAlignment::Right => Self::Far,
            HorizontalAlignment::Center | HorizontalAlignment::UseFullWidth => Self::Both,
        }
    }
}

impl EditAction {
    /// Short verb shown in advisory messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InsertAreaHorizontal { .. }
            | Self::InsertAreaVertical { .. }
            | Self::InsertNewHorizontal { .. }
            | Self::InsertNewVertical { .. }
            | Self::InsertNewInEmptyArea { .. } => "insert",
            Self::Move { .. } => "move",
            Self::Swap { .. } => "swap",
            Self::Resize { .. } | Self::HardResize { .. } | Self::ResizeGroup { .. } => "resize",
            Self::InsertTab { .. } | Self::InsertGroupTab { .. } => "detach",
            Self::RemoveItem { .. } => "remove",
            Self::SetAlignment { .. } => "align",
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EditActionKind {
        match self {
            Self::InsertAreaHorizontal { .. } => EditActionKind::InsertAreaHorizontal,
            Self::InsertAreaVertical { .. } => EditActionKind::InsertAreaVertical,
            Self::InsertNewHorizontal { .. } => EditActionKind::InsertNewHorizontal,
            Self::InsertNewVertical { .. } => EditActionKind::InsertNewVertical,
            Self::InsertNewInEmptyArea { .. } => EditActionKind::InsertNewInEmptyArea,
            Self::Move { .. } => EditActionKind::Move,
            Self::Swap { .. } => EditActionKind::Swap,
            Self::Resize { .. } => EditActionKind::Resize,
            Self::HardResize { .. } => EditActionKind::HardResize,
            Self::InsertTab { .. } => EditActionKind::InsertTab,
            Self::ResizeGroup { .. } => EditActionKind::ResizeGroup,
            Self::InsertGroupTab { .. } => EditActionKind::InsertGroupTab,
            Self::RemoveItem { .. } => EditActionKind::RemoveItem,
            Self::SetAlignment { .. } => EditActionKind::SetAlignment,
        }
    }

    /// Distinct areas named by the action itself, in id order.
    #[must_use]
    pub fn referenced_areas(&self) -> Vec<AreaId> {
        let ids = match self {
            Self::InsertAreaHorizontal { area, areas, .. }
            | Self::InsertAreaVertical { area, areas, .. } => {
                let mut out = vec![*area];
                out.extend(areas.iter().copied());
                out
            }
            Self::InsertNewHorizontal { areas, .. }
            | Self::InsertNewVertical { areas, .. }
            | Self::ResizeGroup { areas, .. }
            | Self::InsertGroupTab { areas, .. } => areas.clone(),
            Self::InsertNewInEmptyArea { .. } => Vec::new(),
            Self::Move { area, .. }
            | Self::Resize { area, .. }
            | Self::HardResize { area, .. }
            | Self::InsertTab { area, .. }
            | Self::RemoveItem { area }
            | Self::SetAlignment { area, .. } => vec![*area],
            Self::Swap { from, to } => vec![*from, *to],
        };
        let distinct: BTreeSet<AreaId> = ids.into_iter().collect();
        distinct.into_iter().collect()
    }

    /// Apply the action and return every area it touched, including areas it
    /// created.
    pub fn perform(&self, ctx: &mut ActionContext<'_>) -> Result<Vec<AreaId>, EditFailure> {
        let mut touched: BTreeSet<AreaId> = self.referenced_areas().into_iter().collect();
        self.apply(ctx, &mut touched)?;
        Ok(touched.into_iter().collect())
    }

    /// Restore the layout captured before [`perform`](Self::perform) and undo
    /// its roster calls.
    pub fn undo(
        &self,
        ctx: &mut ActionContext<'_>,
        before: &LayoutSnapshot,
    ) -> Result<(), EditFailure> {
        let restored = Layout::from_snapshot(before.clone())?;
        self.revert_roster(ctx.roster, &restored);
        *ctx.layout = restored;
        Ok(())
    }

    /// Undo the roster calls of a successful perform. `before` is the layout
    /// the action ran on.
    pub fn revert_roster(&self, roster: &mut dyn ItemRoster, before: &Layout) {
        match self {
            Self::InsertNewHorizontal { item, .. }
            | Self::InsertNewVertical { item, .. }
            | Self::InsertNewInEmptyArea { item, .. } => roster.remove_from_shelf(*item),
            Self::RemoveItem { area } => {
                if let Some(area) = before.area(*area) {
                    roster.untrash(area.item);
                }
            }
            _ => {}
        }
    }

    fn apply(
        &self,
        ctx: &mut ActionContext<'_>,
        touched: &mut BTreeSet<AreaId>,
    ) -> Result<(), EditFailure> {
        let layout = &mut *ctx.layout;
        match self {
            Self::InsertAreaHorizontal {
                area,
                tab,
                areas,
                direction,
                alignment,
            } => insert_area(layout, *area, *tab, areas, *direction, (*alignment).into()),
            Self::InsertAreaVertical {
                area,
                tab,
                areas,
                direction,
                alignment,
            } => insert_area(layout, *area, *tab, areas, *direction, (*alignment).into()),
            Self::InsertNewHorizontal {
                item,
                tab,
                areas,
                direction,
                alignment,
            } => {
                let placed = insert_between(layout, *tab, areas, *direction, (*alignment).into())?;
                touched.insert(layout.add_area(*item, placed)?);
                ctx.roster.add_to_shelf(*item);
                Ok(())
            }
            Self::InsertNewVertical {
                item,
                tab,
                areas,
                direction,
                alignment,
            } => {
                let placed = insert_between(layout, *tab, areas, *direction, (*alignment).into())?;
                touched.insert(layout.add_area(*item, placed)?);
                ctx.roster.add_to_shelf(*item);
                Ok(())
            }
            Self::InsertNewInEmptyArea { item, target } => {
                let placed = target.create_target_area(layout, ctx.config.edit_helper_penalty)?;
                touched.insert(layout.add_area(*item, placed)?);
                ctx.roster.add_to_shelf(*item);
                Ok(())
            }
            Self::Move { area, target } => {
                let from = bindings(layout, *area)?;
                let to = target.create_target_area(layout, ctx.config.edit_helper_penalty)?;
                layout.rebind_area(*area, to)?;
                fill_empty_space(layout, from)?;
                Ok(())
            }
            Self::Swap { from, to } => swap(layout, *from, *to),
            Self::Resize {
                area,
                x_from,
                y_from,
                x_to,
                y_to,
            } => {
                resize_axis(layout, *area, Axis::X, *x_from, *x_to)?;
                resize_axis(layout, *area, Axis::Y, *y_from, *y_to)
            }
            Self::HardResize {
                area,
                side,
                position,
            } => hard_resize(layout, *area, *side, *position),
            Self::InsertTab { area, side } => {
                let old = bindings(layout, *area)?.tab(*side);
                let fresh = layout.add_tab_at(side.axis(), layout.value_or_zero(old))?;
                layout.set_side(*area, *side, fresh)?;
                detach(layout, *area, *side, old)
            }
            Self::ResizeGroup {
                areas,
                side,
                to_tab,
            } => {
                check_side_tab(layout, *to_tab, *side)?;
                if areas.is_empty() {
                    return Err(EditFailure::EmptyAreaList);
                }
                for area in areas {
                    layout.set_side(*area, *side, *to_tab)?;
                }
                Ok(())
            }
            Self::InsertGroupTab { areas, side } => {
                let Some(first) = areas.first() else {
                    return Err(EditFailure::EmptyAreaList);
                };
                let value = layout.value_or_zero(bindings(layout, *first)?.tab(*side));
                let fresh = layout.add_tab_at(side.axis(), value)?;
                for area in areas {
                    layout.set_side(*area, *side, fresh)?;
                }
                Ok(())
            }
            Self::RemoveItem { area } => {
                let removed = layout
                    .remove_area(*area)
                    .ok_or(EditFailure::MissingArea { area: *area })?;
                fill_empty_space(layout, AreaRef::of(&removed))?;
                ctx.roster.trash(removed.item);
                Ok(())
            }
            Self::SetAlignment { area, alignment } => {
                layout
                    .area_mut(*area)
                    .ok_or(EditFailure::MissingArea { area: *area })?
                    .alignment = *alignment;
                Ok(())
            }
        }
    }
}

fn bindings(layout: &Layout, area: AreaId) -> Result<AreaRef, EditFailure> {
    layout
        .area(area)
        .map(AreaRef::of)
        .ok_or(EditFailure::MissingArea { area })
}

fn check_side_tab(layout: &Layout, tab: TabId, side: AreaSide) -> Result<(), EditFailure> {
    match layout.tab_axis(tab) {
        None => Err(EditFailure::MissingTab { tab }),
        Some(axis) if axis != side.axis() => Err(EditFailure::SideMismatch { tab, side }),
        Some(_) => Ok(()),
    }
}

/// Bindings of an area inserted on the `direction` side of `tab`.
///
/// `areas` are the neighbours on that side; their facing edge moves onto a
/// fresh tab at the same position, so the insertion starts out empty and
/// the solver opens it up. The orthogonal span covers all neighbours.
fn insert_between(
    layout: &mut Layout,
    tab: TabId,
    areas: &[AreaId],
    direction: AreaSide,
    shared: SharedEdges,
) -> Result<AreaRef, EditFailure> {
    check_side_tab(layout, tab, direction)?;
    let orth = direction.axis().orthogonal();
    let (orth_near, orth_far) = (AreaSide::near(orth), AreaSide::far(orth));

    let mut low: Option<TabId> = None;
    let mut high: Option<TabId> = None;
    for area in areas {
        let bound = bindings(layout, *area)?;
        let (near, far) = (bound.tab(orth_near), bound.tab(orth_far));
        if low.is_none_or(|low| layout.value_or_zero(near) < layout.value_or_zero(low)) {
            low = Some(near);
        }
        if high.is_none_or(|high| layout.value_or_zero(far) > layout.value_or_zero(high)) {
            high = Some(far);
        }
    }
    let (Some(mut low), Some(mut high)) = (low, high) else {
        return Err(EditFailure::EmptyAreaList);
    };

    // A single split neighbour keeps the aligned edge; the other one gets
    // its own tab so the inserted area has an extent of its own.
    if areas.len() == 1 {
        match shared {
            SharedEdges::Near => high = layout.add_tab_at(orth, layout.value_or_zero(high))?,
            SharedEdges::Far => low = layout.add_tab_at(orth, layout.value_or_zero(low))?,
            SharedEdges::Both => {}
        }
    }

    let fresh = layout.add_tab_at(direction.axis(), layout.value_or_zero(tab))?;
    for area in areas {
        layout.set_side(*area, direction.opposite(), fresh)?;
    }
    Ok(layout
        .borders()
        .with_tab(direction.opposite(), tab)
        .with_tab(direction, fresh)
        .with_tab(orth_near, low)
        .with_tab(orth_far, high))
}

fn insert_area(
    layout: &mut Layout,
    area: AreaId,
    tab: TabId,
    areas: &[AreaId],
    direction: AreaSide,
    shared: SharedEdges,
) -> Result<(), EditFailure> {
    let from = bindings(layout, area)?;
    let placed = insert_between(layout, tab, areas, direction, shared)?;
    layout.rebind_area(area, placed)?;
    fill_empty_space(layout, from)?;
    Ok(())
}

fn swap(layout: &mut Layout, from: AreaId, to: AreaId) -> Result<(), EditFailure> {
    if from == to {
        return Err(EditFailure::SameArea { area: from });
    }
    let first = bindings(layout, from)?;
    let second = bindings(layout, to)?;
    layout.rebind_area(from, second)?;
    layout.rebind_area(to, first)?;
    Ok(())
}

/// Let [`AreaRemoval`] react to the `side` edge of `area` leaving `old`.
fn detach(
    layout: &mut Layout,
    area: AreaId,
    side: AreaSide,
    old: TabId,
) -> Result<(), EditFailure> {
    let mut connections = TabConnections::new();
    let mut removal = AreaRemoval::new(layout, &mut connections);
    match side.axis() {
        Axis::X => removal.area_detached_x(area, side, old)?,
        Axis::Y => removal.area_detached_y(area, side, old)?,
    }
    Ok(())
}

fn resize_axis(
    layout: &mut Layout,
    area: AreaId,
    axis: Axis,
    from: Option<TabId>,
    to: Option<TabId>,
) -> Result<(), EditFailure> {
    let (Some(from), Some(to)) = (from, to) else {
        return Ok(());
    };
    let bound = bindings(layout, area)?;
    let side = [AreaSide::near(axis), AreaSide::far(axis)]
        .into_iter()
        .find(|side| bound.tab(*side) == from)
        .ok_or(EditFailure::NotBound { area, tab: from })?;
    check_side_tab(layout, to, side)?;
    let old = layout.set_side(area, side, to)?;
    detach(layout, area, side, old)
}

/// The edge starts on top of the opposite edge; a required size constraint
/// then pulls it out to `position`.
fn hard_resize(
    layout: &mut Layout,
    area: AreaId,
    side: AreaSide,
    position: f64,
) -> Result<(), EditFailure> {
    let anchor = bindings(layout, area)?.tab(side.opposite());
    let anchor_value = layout.value_or_zero(anchor);
    let fresh = layout.add_tab_at(side.axis(), anchor_value)?;
    layout.set_side(area, side, fresh)?;

    let (near, far, extent) = if side.is_near() {
        (fresh, anchor, anchor_value - position)
    } else {
        (anchor, fresh, position - anchor_value)
    };
    layout.add_constraint(
        vec![Term::new(1.0, far), Term::new(-1.0, near)],
        Relation::Eq,
        extent,
        Strength::Required,
        Some(EDIT_HELPER_LABEL),
    )?;
    Ok(())
}
