//! The edit pipeline.
//!
//! Every action runs on a working copy of the layout and its overlap
//! constraints: disconnect, perform, refill the connection index, drop edit
//! helpers that became redundant, synthesize overlap constraints, solve. A
//! feasible copy replaces the committed state and lands in the history; an
//! infeasible one is discarded, so a rejected action never leaves a trace in
//! the committed layout. Every committed or rejected attempt is journaled.

use alm_core::geometry::{Axis, Point, Rect, Size};
use alm_core::{debug, debug_span, warn};
use serde::{Deserialize, Serialize};

use crate::action::{ActionContext, EditAction, EditActionKind};
use crate::area::{
    AreaId, AreaSide, HorizontalAlignment, ItemId, VerticalAlignment,
};
use crate::config::EditorConfig;
use crate::connections::TabConnections;
use crate::constraint::{Constraint, ConstraintId, EDIT_HELPER_LABEL};
use crate::empty_area::find_optimal_area;
use crate::error::{EditError, EditFailure, LayoutError};
use crate::history::{EditHistory, HistoryEntry};
use crate::insert::InsertDetection;
use crate::layout::Layout;
use crate::overlap::OverlapManager;
use crate::probe;
use crate::roster::{Informant, ItemRoster, NullInformant, NullRoster};
use crate::snapshot::LayoutSnapshot;
use crate::tab::TabId;

/// Successful action result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub operation_id: u64,
    pub kind: EditActionKind,
    pub touched_areas: Vec<AreaId>,
    pub before_hash: u64,
    pub after_hash: u64,
}

/// One journal row per attempted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditJournalEntry {
    pub sequence: u64,
    pub operation_id: u64,
    pub action: EditAction,
    pub kind: EditActionKind,
    pub touched_areas: Vec<AreaId>,
    pub before_hash: u64,
    pub after_hash: u64,
    pub result: EditJournalResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditJournalResult {
    Applied,
    Rejected { reason: String },
}

/// How a dragged area edge resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeDrag {
    /// The edge only snaps to existing tabs.
    Snap,
    /// The edge leaves its tab for a fresh one.
    Detach,
    /// The edge gets its own tab pinned at `position`.
    HardResize { position: f64 },
}

/// What a drag gesture carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragSource {
    /// An area already in the layout.
    Area { area: AreaId },
    /// An item not placed yet.
    Item { item: ItemId },
}

/// A drop under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropRequest {
    pub source: DragSource,
    pub point: Point,
    /// Frame drawn under the pointer.
    pub drag_frame: Rect,
    pub preferred_size: Size,
}

/// Drop edit helpers whose first tab is now anchored by areas.
///
/// A single-term position helper goes once its tab reaches either border of
/// its axis; a size helper once it reaches both. Returns the number of
/// removed constraints.
pub fn check_temp_edit_constraints(layout: &mut Layout, connections: &TabConnections) -> usize {
    let stale: Vec<ConstraintId> = layout
        .constraints()
        .iter()
        .filter(|constraint| constraint.has_label(EDIT_HELPER_LABEL))
        .filter(|constraint| helper_is_anchored(layout, connections, constraint))
        .map(|constraint| constraint.id)
        .collect();
    for id in &stale {
        layout.remove_constraint(*id);
    }
    if !stale.is_empty() {
        debug!(removed = stale.len(), "edit helpers dropped");
    }
    stale.len()
}

fn helper_is_anchored(
    layout: &Layout,
    connections: &TabConnections,
    constraint: &Constraint,
) -> bool {
    let Some(tab) = constraint.first_tab() else {
        return false;
    };
    let Some(axis) = layout.tab_axis(tab) else {
        return false;
    };
    let (near_side, far_side) = (AreaSide::near(axis), AreaSide::far(axis));
    let mut near = connections.connected_to_border(layout, near_side, tab);
    let mut far = connections.connected_to_border(layout, far_side, tab);
    if tab == layout.border(near_side) {
        far = false;
    } else if tab == layout.border(far_side) {
        near = false;
    }
    if constraint.terms.len() == 1 {
        near || far
    } else {
        near && far
    }
}

/// Result of running an action on a working copy.
struct Trial {
    touched: Vec<AreaId>,
    /// Whether the action itself succeeded before the result was known.
    performed: bool,
    result: Result<(), EditFailure>,
}

fn run_trial(
    layout: &mut Layout,
    overlap: &mut OverlapManager,
    roster: &mut dyn ItemRoster,
    config: &EditorConfig,
    action: &EditAction,
) -> Trial {
    overlap.disconnect_areas(layout);
    let touched = match action.perform(&mut ActionContext::new(layout, roster, config)) {
        Ok(touched) => touched,
        Err(reason) => {
            return Trial {
                touched: action.referenced_areas(),
                performed: false,
                result: Err(reason),
            };
        }
    };
    Trial {
        touched,
        performed: true,
        result: settle(layout, overlap),
    }
}

fn settle(layout: &mut Layout, overlap: &mut OverlapManager) -> Result<(), EditFailure> {
    overlap.fill_tab_connections(layout);
    check_temp_edit_constraints(layout, overlap.connections());
    overlap.connect_areas(layout, false)?;
    let feasibility = layout.solve().map_err(|err| {
        warn!(error = %err, "solver failed");
        err
    })?;
    if feasibility.is_feasible() {
        Ok(())
    } else {
        Err(EditFailure::Infeasible)
    }
}

/// Layout editor: committed layout, overlap constraints, history and
/// journal, plus the host collaborators.
#[derive(Debug)]
pub struct Editor<R = NullRoster, I = NullInformant> {
    layout: Layout,
    overlap: OverlapManager,
    history: EditHistory,
    journal: Vec<EditJournalEntry>,
    config: EditorConfig,
    roster: R,
    informant: I,
    next_operation: u64,
    next_sequence: u64,
}

impl Editor {
    /// Editor without host collaborators.
    pub fn new(layout: Layout, config: EditorConfig) -> Result<Self, LayoutError> {
        Self::with_collaborators(layout, config, NullRoster, NullInformant)
    }
}

impl<R: ItemRoster, I: Informant> Editor<R, I> {
    /// Take over `layout` and synthesize its overlap constraints.
    pub fn with_collaborators(
        mut layout: Layout,
        config: EditorConfig,
        roster: R,
        informant: I,
    ) -> Result<Self, LayoutError> {
        let mut overlap = OverlapManager::new();
        overlap.connect_areas(&mut layout, true)?;
        Ok(Self {
            layout,
            overlap,
            history: EditHistory::new(config.history_capacity),
            journal: Vec::new(),
            config,
            roster,
            informant,
            next_operation: 1,
            next_sequence: 1,
        })
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn overlap(&self) -> &OverlapManager {
        &self.overlap
    }

    #[must_use]
    pub fn connections(&self) -> &TabConnections {
        self.overlap.connections()
    }

    #[must_use]
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Journal rows in attempt order.
    #[must_use]
    pub fn journal(&self) -> &[EditJournalEntry] {
        &self.journal
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_free_placement(&mut self, enabled: bool) {
        self.config.free_placement = enabled;
    }

    #[must_use]
    pub fn roster(&self) -> &R {
        &self.roster
    }

    #[must_use]
    pub fn informant(&self) -> &I {
        &self.informant
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Pipeline ────────────────────────────────────────────────────

    /// Apply `action` and commit it when the result is feasible.
    ///
    /// On failure the committed layout is untouched and nothing is added to
    /// the history.
    pub fn perform_action(&mut self, action: EditAction) -> Result<ActionOutcome, EditError> {
        let _span = debug_span!("alm.editor.perform", action = action.name()).entered();
        let operation_id = self.next_operation_id();
        let (outcome, before, overlap) = self.execute(operation_id, &action)?;
        self.history.push(HistoryEntry {
            operation_id,
            action,
            before,
            overlap,
        });
        Ok(outcome)
    }

    /// Whether `action` would succeed. Never changes the committed state or
    /// the roster; an infeasible result is reported to the informant.
    pub fn test_action(&mut self, action: &EditAction) -> bool {
        match self.try_action(action) {
            Ok(()) => true,
            Err(reason) => {
                if reason == EditFailure::Infeasible {
                    self.notify_rejected(action);
                }
                false
            }
        }
    }

    /// Trial run on working copies, without telling the informant.
    fn try_action(&self, action: &EditAction) -> Result<(), EditFailure> {
        let _span = debug_span!("alm.editor.test", action = action.name()).entered();
        let mut layout = self.layout.clone();
        let mut overlap = self.overlap.clone();
        let trial = run_trial(
            &mut layout,
            &mut overlap,
            &mut NullRoster,
            &self.config,
            action,
        );
        trial.result.map_err(|reason| {
            debug!(reason = %reason, "test action failed");
            reason
        })
    }

    fn notify_rejected(&mut self, action: &EditAction) {
        self.informant
            .error(&format!("Can't perform {} operation here.", action.name()));
    }

    /// Perform `action` only if a test run succeeds. `Ok(None)` when the
    /// test rejected it.
    pub fn test_and_perform_action(
        &mut self,
        action: EditAction,
    ) -> Result<Option<ActionOutcome>, EditError> {
        if !self.test_action(&action) {
            return Ok(None);
        }
        self.perform_action(action).map(Some)
    }

    /// Revert the last committed action. `Ok(false)` when there is nothing
    /// to undo; a failure clears the history.
    pub fn undo(&mut self) -> Result<bool, EditError> {
        let Some(entry) = self.history.undo_entry().cloned() else {
            return Ok(false);
        };
        let before_hash = self.layout.state_hash();
        let mut layout = self.layout.clone();
        let undone = entry.action.undo(
            &mut ActionContext::new(&mut layout, &mut self.roster, &self.config),
            &entry.before,
        );
        match undone.and_then(|()| layout.validate().map_err(EditFailure::from)) {
            Ok(()) => {
                self.layout = layout;
                self.overlap = entry.overlap;
                self.history.step_back();
                Ok(true)
            }
            Err(reason) => {
                self.history.reset();
                Err(EditError {
                    operation_id: entry.operation_id,
                    kind: entry.action.kind(),
                    touched_areas: entry.action.referenced_areas(),
                    before_hash,
                    after_hash: layout.state_hash(),
                    reason,
                })
            }
        }
    }

    /// Re-apply the last undone action. `Ok(false)` when there is nothing to
    /// redo; a failure clears the history.
    pub fn redo(&mut self) -> Result<bool, EditError> {
        let Some(entry) = self.history.redo_entry().cloned() else {
            return Ok(false);
        };
        match self.execute(entry.operation_id, &entry.action) {
            Ok(_) => {
                self.history.step_forward();
                Ok(true)
            }
            Err(err) => {
                self.history.reset();
                Err(err)
            }
        }
    }

    /// Remove `area` and trash its item.
    pub fn trash_area(&mut self, area: AreaId) -> Result<ActionOutcome, EditError> {
        self.perform_action(EditAction::RemoveItem { area })
    }

    /// Drop redundant edit helpers from the committed layout.
    pub fn check_temp_edit_constraints(&mut self) -> usize {
        check_temp_edit_constraints(&mut self.layout, self.overlap.connections())
    }

    fn execute(
        &mut self,
        operation_id: u64,
        action: &EditAction,
    ) -> Result<(ActionOutcome, LayoutSnapshot, OverlapManager), EditError> {
        let kind = action.kind();
        let before_hash = self.layout.state_hash();
        let mut layout = self.layout.clone();
        let mut overlap = self.overlap.clone();
        let trial = run_trial(
            &mut layout,
            &mut overlap,
            &mut self.roster,
            &self.config,
            action,
        );

        if let Err(reason) = trial.result {
            if trial.performed {
                action.revert_roster(&mut self.roster, &self.layout);
            }
            let after_hash = layout.state_hash();
            debug!(operation_id, kind = ?kind, reason = %reason, "edit action rejected");
            self.record(
                operation_id,
                action,
                &trial.touched,
                (before_hash, after_hash),
                EditJournalResult::Rejected {
                    reason: reason.to_string(),
                },
            );
            return Err(EditError {
                operation_id,
                kind,
                touched_areas: trial.touched,
                before_hash,
                after_hash,
                reason,
            });
        }

        layout.collect_garbage();
        let after_hash = layout.state_hash();
        let before = std::mem::replace(&mut self.layout, layout).to_snapshot();
        let overlap_before = std::mem::replace(&mut self.overlap, overlap);
        debug!(operation_id, kind = ?kind, "edit action applied");
        self.record(
            operation_id,
            action,
            &trial.touched,
            (before_hash, after_hash),
            EditJournalResult::Applied,
        );
        let outcome = ActionOutcome {
            operation_id,
            kind,
            touched_areas: trial.touched,
            before_hash,
            after_hash,
        };
        Ok((outcome, before, overlap_before))
    }

    fn record(
        &mut self,
        operation_id: u64,
        action: &EditAction,
        touched: &[AreaId],
        (before_hash, after_hash): (u64, u64),
        result: EditJournalResult,
    ) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        self.journal.push(EditJournalEntry {
            sequence,
            operation_id,
            action: action.clone(),
            kind: action.kind(),
            touched_areas: touched.to_vec(),
            before_hash,
            after_hash,
            result,
        });
    }

    fn next_operation_id(&mut self) -> u64 {
        let id = self.next_operation;
        self.next_operation = self.next_operation.saturating_add(1);
        id
    }

    // ── Connectivity queries ────────────────────────────────────────

    fn edge_reaches_border(&self, area: AreaId, side: AreaSide) -> bool {
        self.layout.area(area).is_some_and(|record| {
            self.overlap
                .connections()
                .connected_to_border(&self.layout, side, record.tab(side))
        })
    }

    #[must_use]
    pub fn connected_to_left_border(&self, area: AreaId) -> bool {
        self.edge_reaches_border(area, AreaSide::Left)
    }

    #[must_use]
    pub fn connected_to_top_border(&self, area: AreaId) -> bool {
        self.edge_reaches_border(area, AreaSide::Top)
    }

    #[must_use]
    pub fn connected_to_right_border(&self, area: AreaId) -> bool {
        self.edge_reaches_border(area, AreaSide::Right)
    }

    #[must_use]
    pub fn connected_to_bottom_border(&self, area: AreaId) -> bool {
        self.edge_reaches_border(area, AreaSide::Bottom)
    }

    /// Whether the `side` edge of `area` touches another area.
    #[must_use]
    pub fn connected_to(&self, area: AreaId, side: AreaSide) -> bool {
        self.overlap
            .connections()
            .connected_to(&self.layout, area, side)
    }

    /// Whether some member reaches the near border of `axis` and some member
    /// the far one.
    #[must_use]
    pub fn group_connected_to_borders(&self, group: &[AreaId], axis: Axis) -> bool {
        let near = group
            .iter()
            .any(|area| self.edge_reaches_border(*area, AreaSide::near(axis)));
        near && group
            .iter()
            .any(|area| self.edge_reaches_border(*area, AreaSide::far(axis)))
    }

    // ── Pointer helpers ─────────────────────────────────────────────

    #[must_use]
    pub fn find_area(&self, point: Point) -> Option<AreaId> {
        probe::area_at(&self.layout, point)
    }

    #[must_use]
    pub fn x_tab_near_point(&self, point: Point, tolerance: f64) -> Option<TabId> {
        probe::tab_near_point(&self.layout, Axis::X, point, tolerance)
    }

    #[must_use]
    pub fn y_tab_near_point(&self, point: Point, tolerance: f64) -> Option<TabId> {
        probe::tab_near_point(&self.layout, Axis::Y, point, tolerance)
    }

    #[must_use]
    pub fn area_x_tab_near_point(&self, area: AreaId, point: Point, tolerance: f64) -> Option<TabId> {
        probe::area_tab_near_point(&self.layout, area, Axis::X, point, tolerance)
    }

    #[must_use]
    pub fn area_y_tab_near_point(&self, area: AreaId, point: Point, tolerance: f64) -> Option<TabId> {
        probe::area_tab_near_point(&self.layout, area, Axis::Y, point, tolerance)
    }

    /// Tab a dragged X edge on `start` should land on.
    #[must_use]
    pub fn best_x_tab(&self, start: TabId, point: Point) -> Option<TabId> {
        self.best_tab(start, point, Axis::X)
    }

    #[must_use]
    pub fn best_y_tab(&self, start: TabId, point: Point) -> Option<TabId> {
        self.best_tab(start, point, Axis::Y)
    }

    fn best_tab(&self, start: TabId, point: Point, axis: Axis) -> Option<TabId> {
        if self.layout.tab_axis(start) != Some(axis) {
            return None;
        }
        probe::best_tab(&self.layout, start, point, self.config.snap_distance)
    }

    // ── Gestures ────────────────────────────────────────────────────

    /// Classify dragging the `side` edge of `area` to `point`.
    ///
    /// Only an edge whose opposite edge touches another area can detach.
    /// Hard resizing needs free placement and a drag beyond its threshold
    /// that keeps the area above its minimum size or flips it over.
    #[must_use]
    pub fn classify_edge_drag(&self, area: AreaId, side: AreaSide, point: Point) -> EdgeDrag {
        let (Some(record), Some(frame)) = (self.layout.area(area), self.layout.frame(area)) else {
            return EdgeDrag::Snap;
        };
        if !self.connected_to(area, side.opposite()) {
            return EdgeDrag::Snap;
        }
        let axis = side.axis();
        let position = axis.of_point(point);
        let (near, far) = frame.edges(axis);
        let (distance, extent) = if side.is_near() {
            ((position - near).abs(), far - position)
        } else {
            ((far - position).abs(), position - near)
        };
        let hard = self.config.effective_hard_resize_threshold();
        let min = record.min_size.along(axis);
        if distance > hard && (extent > min || extent < 0.0) {
            EdgeDrag::HardResize { position }
        } else if distance > self.config.detach_threshold {
            EdgeDrag::Detach
        } else {
            EdgeDrag::Snap
        }
    }

    /// Action for an edge drag released at `point`, if the drag does more
    /// than snap.
    #[must_use]
    pub fn edge_drag_action(&self, area: AreaId, side: AreaSide, point: Point) -> Option<EditAction> {
        match self.classify_edge_drag(area, side, point) {
            EdgeDrag::Snap => None,
            EdgeDrag::Detach => Some(EditAction::InsertTab { area, side }),
            EdgeDrag::HardResize { position } => Some(EditAction::HardResize {
                area,
                side,
                position,
            }),
        }
    }

    /// Action a drop resolves to.
    ///
    /// Tried in order: insertion next to a tab under the pointer (X, then
    /// Y), placement into empty space, swapping with the area under the
    /// pointer. The first candidate that passes [`test_action`](Self::test_action)
    /// wins.
    pub fn plan_drop(&mut self, request: &DropRequest) -> Option<EditAction> {
        let moved = match request.source {
            DragSource::Area { area } => Some(area),
            DragSource::Item { .. } => None,
        };
        // Candidates are tried quietly; only a drop with no workable
        // candidate is reported.
        let mut rejected: Option<EditAction> = None;
        let mut accept = |editor: &Self, action: EditAction| match editor.try_action(&action) {
            Ok(()) => Some(action),
            Err(reason) => {
                if reason == EditFailure::Infeasible {
                    rejected = Some(action);
                }
                None
            }
        };

        for axis in [Axis::X, Axis::Y] {
            if let Some(action) = self.plan_insert(request, axis, moved) {
                if let Some(action) = accept(self, action) {
                    return Some(action);
                }
            }
        }

        let optimal = find_optimal_area(
            &self.layout,
            self.overlap.connections(),
            &self.config,
            request.point,
            &request.drag_frame,
            request.preferred_size,
            moved,
        );
        if let Some(optimal) = optimal {
            let target = optimal.into_target(request.drag_frame.left_top(), request.preferred_size);
            let action = match request.source {
                DragSource::Area { area } => EditAction::Move { area, target },
                DragSource::Item { item } => EditAction::InsertNewInEmptyArea { item, target },
            };
            if let Some(action) = accept(self, action) {
                return Some(action);
            }
        }

        let swap = moved.and_then(|from| {
            let to = self.find_area(request.point).filter(|to| *to != from)?;
            Some(EditAction::Swap { from, to })
        });
        if let Some(action) = swap.and_then(|action| accept(self, action)) {
            return Some(action);
        }
        if let Some(action) = rejected {
            self.notify_rejected(&action);
        }
        None
    }

    fn plan_insert(&self, request: &DropRequest, axis: Axis, moved: Option<AreaId>) -> Option<EditAction> {
        let tab = probe::tab_near_point(&self.layout, axis, request.point, self.config.tab_tolerance)?;
        self.find_area(request.point)?;
        let insertion = InsertDetection::new(&self.layout, self.overlap.connections())
            .get_insert_areas(tab, &request.drag_frame)?;
        let areas: Vec<AreaId> = insertion
            .areas
            .into_iter()
            .filter(|area| Some(*area) != moved)
            .collect();
        if areas.is_empty() {
            return None;
        }

        // A single split neighbour much larger than the item keeps the item
        // on the half of it the pointer is in.
        let orth = axis.orthogonal();
        let near_half = match areas.as_slice() {
            [single] => self.layout.frame(*single).and_then(|frame| {
                let (low, high) = frame.edges(orth);
                let roomy = request.preferred_size.along(orth)
                    < high - low - self.config.alignment_threshold;
                let position = orth.of_point(request.point);
                roomy.then_some(position - low < high - position)
            }),
            _ => None,
        };
        let direction = insertion.direction;

        Some(match (axis, request.source) {
            (Axis::X, source) => {
                let alignment = match near_half {
                    Some(true) => VerticalAlignment::Top,
                    Some(false) => VerticalAlignment::Bottom,
                    None => VerticalAlignment::UseFullHeight,
                };
                match source {
                    DragSource::Area { area } => EditAction::InsertAreaHorizontal {
                        area,
                        tab,
                        areas,
                        direction,
                        alignment,
                    },
                    DragSource::Item { item } => EditAction::InsertNewHorizontal {
                        item,
                        tab,
                        areas,
                        direction,
                        alignment,
                    },
                }
            }
            (Axis::Y, source) => {
                let alignment = match near_half {
                    Some(true) => HorizontalAlignment::Left,
                    Some(false) => HorizontalAlignment::Right,
                    None => HorizontalAlignment::UseFullWidth,
                };
                match source {
                    DragSource::Area { area } => EditAction::InsertAreaVertical {
                        area,
                        tab,
                        areas,
                        direction,
                        alignment,
                    },
                    DragSource::Item { item } => EditAction::InsertNewVertical {
                        item,
                        tab,
                        areas,
                        direction,
                        alignment,
                    },
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaRef;
    use crate::constraint::{Relation, Strength, Term};
    use crate::roster::{RecordingInformant, RecordingRoster, RosterEvent};

    /// `| a | b | c |` at x=30 and x=60 on a 100x100 layout.
    fn three_columns() -> (Layout, [AreaId; 3]) {
        let mut layout = Layout::new(Size::new(100.0, 100.0));
        let x30 = layout.add_tab_at(Axis::X, 30.0).expect("tab");
        let x60 = layout.add_tab_at(Axis::X, 60.0).expect("tab");
        let b = layout.borders();
        let a = layout
            .add_area(ItemId(1), AreaRef::new(b.left, b.top, x30, b.bottom))
            .expect("area");
        let m = layout
            .add_area(ItemId(2), AreaRef::new(x30, b.top, x60, b.bottom))
            .expect("area");
        let c = layout
            .add_area(ItemId(3), AreaRef::new(x60, b.top, b.right, b.bottom))
            .expect("area");
        (layout, [a, m, c])
    }

    fn recording(
        layout: Layout,
        config: EditorConfig,
    ) -> Editor<RecordingRoster, RecordingInformant> {
        Editor::with_collaborators(
            layout,
            config,
            RecordingRoster::new(),
            RecordingInformant::default(),
        )
        .expect("editor")
    }

    #[test]
    fn committed_action_is_journaled_and_undoable() {
        let (layout, [a, ..]) = three_columns();
        let x30 = layout.area(a).map(|area| area.right).expect("area");
        let mut editor = Editor::new(layout, EditorConfig::default()).expect("editor");
        let original = editor.layout().to_snapshot();
        let outcome = editor
            .perform_action(EditAction::InsertTab {
                area: a,
                side: AreaSide::Right,
            })
            .expect("detach");
        assert_eq!(outcome.kind, EditActionKind::InsertTab);
        assert_eq!(outcome.operation_id, 1);
        assert!(outcome.touched_areas.contains(&a));
        assert!(editor.can_undo());
        assert_eq!(editor.journal().len(), 1);
        assert_eq!(editor.journal()[0].result, EditJournalResult::Applied);

        assert_eq!(editor.undo(), Ok(true));
        assert_eq!(editor.layout().to_snapshot(), original);
        assert!(editor.can_redo());
        assert_eq!(editor.undo(), Ok(false));

        assert_eq!(editor.redo(), Ok(true));
        assert!(!editor.can_redo());
        assert_ne!(editor.layout().area(a).map(|area| area.right), Some(x30));
    }

    #[test]
    fn infeasible_action_is_rejected_without_a_trace() {
        let (mut layout, [a, ..]) = three_columns();
        if let Some(area) = layout.area_mut(a) {
            area.min_size = Size::new(20.0, 0.0);
        }
        let mut editor = recording(layout, EditorConfig::default());
        let before = editor.layout().clone();
        let shrink = EditAction::HardResize {
            area: a,
            side: AreaSide::Right,
            position: 10.0,
        };

        assert!(!editor.test_action(&shrink));
        assert_eq!(
            editor.informant().messages,
            ["Can't perform resize operation here."]
        );
        assert_eq!(editor.layout(), &before);

        let err = editor.perform_action(shrink).expect_err("infeasible");
        assert_eq!(err.reason, EditFailure::Infeasible);
        assert_eq!(err.before_hash, before.state_hash());
        assert_eq!(editor.layout(), &before);
        assert!(!editor.can_undo());
        assert!(matches!(
            editor.journal()[0].result,
            EditJournalResult::Rejected { .. }
        ));
    }

    #[test]
    fn failing_perform_reports_the_reason() {
        let (layout, [a, ..]) = three_columns();
        let mut editor = recording(layout, EditorConfig::default());
        let err = editor
            .perform_action(EditAction::Swap { from: a, to: a })
            .expect_err("same area");
        assert_eq!(err.reason, EditFailure::SameArea { area: a });
        assert_eq!(err.touched_areas, vec![a]);
        // Only infeasibility is worth telling the user about.
        assert!(!editor.test_action(&EditAction::Swap { from: a, to: a }));
        assert!(editor.informant().messages.is_empty());
    }

    #[test]
    fn trash_and_undo_round_trip_through_the_roster() {
        let (layout, [_, m, _]) = three_columns();
        let mut editor = recording(layout, EditorConfig::default());
        editor.trash_area(m).expect("trash");
        assert!(editor.layout().area(m).is_none());
        assert!(editor.roster().trash.contains(&ItemId(2)));

        assert_eq!(editor.undo(), Ok(true));
        assert!(editor.layout().area(m).is_some());
        assert_eq!(
            editor.roster().events,
            vec![
                RosterEvent::Trashed(ItemId(2)),
                RosterEvent::Untrashed(ItemId(2))
            ]
        );
    }

    #[test]
    fn rejected_insert_takes_the_item_off_the_shelf_again() {
        let (mut layout, [a, ..]) = three_columns();
        let x30 = layout.area(a).map(|area| area.right).expect("area");
        layout
            .add_constraint(
                vec![Term::new(1.0, x30)],
                Relation::Eq,
                30.0,
                Strength::Required,
                None,
            )
            .expect("pin");
        if let Some(area) = layout.area_mut(a) {
            area.min_size = Size::new(40.0, 0.0);
        }
        let mut editor = recording(layout, EditorConfig::default());
        let err = editor
            .perform_action(EditAction::InsertNewHorizontal {
                item: ItemId(9),
                tab: x30,
                areas: vec![a],
                direction: AreaSide::Left,
                alignment: VerticalAlignment::UseFullHeight,
            })
            .expect_err("infeasible");
        assert_eq!(err.reason, EditFailure::Infeasible);
        assert!(editor.roster().shelf.is_empty());
        assert_eq!(
            editor.roster().events,
            vec![RosterEvent::Shelved(ItemId(9)), RosterEvent::Unshelved(ItemId(9))]
        );
    }

    #[test]
    fn edit_helpers_go_once_anchored() {
        let (mut layout, _) = three_columns();
        let left = layout.left();
        let floating = layout.add_tab_at(Axis::X, 45.0).expect("tab");
        layout
            .add_constraint(
                vec![Term::new(1.0, left)],
                Relation::Eq,
                0.0,
                Strength::Strong,
                Some(EDIT_HELPER_LABEL),
            )
            .expect("helper");
        layout
            .add_constraint(
                vec![Term::new(1.0, floating)],
                Relation::Eq,
                45.0,
                Strength::Strong,
                Some(EDIT_HELPER_LABEL),
            )
            .expect("helper");
        let mut editor = Editor::new(layout, EditorConfig::default()).expect("editor");
        assert_eq!(editor.check_temp_edit_constraints(), 1);
        let remaining: Vec<_> = editor
            .layout()
            .constraints()
            .iter()
            .filter(|c| c.has_label(EDIT_HELPER_LABEL))
            .filter_map(Constraint::first_tab)
            .collect();
        assert_eq!(remaining, vec![floating]);
    }

    #[test]
    fn border_queries_follow_area_chains() {
        let (layout, [a, m, c]) = three_columns();
        let editor = Editor::new(layout, EditorConfig::default()).expect("editor");
        assert!(editor.connected_to_left_border(m));
        assert!(editor.connected_to_right_border(m));
        assert!(editor.connected_to_top_border(a));
        assert!(editor.connected_to_bottom_border(c));
        assert!(editor.connected_to(m, AreaSide::Left));
        assert!(!editor.connected_to(a, AreaSide::Left));
        assert!(editor.group_connected_to_borders(&[a, c], Axis::X));
    }

    #[test]
    fn edge_drags_detach_or_hard_resize() {
        let (layout, [a, m, _]) = three_columns();
        let mut editor = Editor::new(layout, EditorConfig::default()).expect("editor");
        assert_eq!(
            editor.classify_edge_drag(m, AreaSide::Right, Point::new(65.0, 50.0)),
            EdgeDrag::Snap
        );
        assert_eq!(
            editor.classify_edge_drag(m, AreaSide::Right, Point::new(90.0, 50.0)),
            EdgeDrag::Detach
        );
        // Nothing on the left of `a` to hold it while its right edge moves.
        assert_eq!(
            editor.classify_edge_drag(a, AreaSide::Right, Point::new(90.0, 50.0)),
            EdgeDrag::Snap
        );

        editor.set_free_placement(true);
        assert_eq!(
            editor.classify_edge_drag(m, AreaSide::Right, Point::new(90.0, 50.0)),
            EdgeDrag::HardResize { position: 90.0 }
        );
        assert_eq!(
            editor.edge_drag_action(m, AreaSide::Right, Point::new(75.0, 50.0)),
            Some(EditAction::InsertTab {
                area: m,
                side: AreaSide::Right
            })
        );
    }

    #[test]
    fn drop_on_a_tab_inserts_next_to_it() {
        let (layout, [a, ..]) = three_columns();
        let x30 = layout.area(a).map(|area| area.right).expect("area");
        let mut editor = Editor::new(layout, EditorConfig::default()).expect("editor");
        let request = DropRequest {
            source: DragSource::Item { item: ItemId(7) },
            point: Point::new(30.0, 50.0),
            drag_frame: Rect::new(20.0, 0.0, 40.0, 100.0),
            preferred_size: Size::new(20.0, 100.0),
        };
        let planned = editor.plan_drop(&request);
        assert!(
            matches!(planned, Some(EditAction::InsertNewHorizontal { tab, .. }) if tab == x30),
            "{planned:?}"
        );
    }

    fn area_drop(area: AreaId) -> DropRequest {
        DropRequest {
            source: DragSource::Area { area },
            point: Point::new(60.5, 50.0),
            drag_frame: Rect::new(50.0, 0.0, 70.0, 100.0),
            preferred_size: Size::new(20.0, 100.0),
        }
    }

    #[test]
    fn drop_fallbacks_are_tried_quietly() {
        let (mut layout, [a, m, c]) = three_columns();
        if let Some(area) = layout.area_mut(m) {
            area.max_size = Some(Size::new(30.0, 100.0));
        }
        if let Some(area) = layout.area_mut(c) {
            area.max_size = Some(Size::new(40.0, 100.0));
        }
        let mut editor = recording(layout, EditorConfig::default());
        // Inserting `a` at x60 leaves `m` wider than it may be; swapping
        // with `c` still fits.
        let planned = editor.plan_drop(&area_drop(a));
        assert!(planned.is_some());
        assert!(editor.informant().messages.is_empty(), "{planned:?}");
    }

    #[test]
    fn drop_with_no_workable_candidate_is_reported_once() {
        let (mut layout, [_, m, c]) = three_columns();
        let x60 = layout.area(c).map(|area| area.left).expect("area");
        for value in [60.0, 70.0] {
            layout
                .add_constraint(
                    vec![Term::new(1.0, x60)],
                    Relation::Eq,
                    value,
                    Strength::Required,
                    None,
                )
                .expect("pin");
        }
        let mut editor = recording(layout, EditorConfig::default());
        let hash = editor.layout().state_hash();
        assert_eq!(editor.plan_drop(&area_drop(m)), None);
        let messages = &editor.informant().messages;
        assert_eq!(messages.len(), 1, "{messages:?}");
        assert!(messages[0].starts_with("Can't perform "));
        assert_eq!(editor.layout().state_hash(), hash);
    }

    #[test]
    fn journal_rows_serialize_with_a_status_tag() {
        let row = EditJournalResult::Rejected {
            reason: "layout is infeasible".to_owned(),
        };
        let json = serde_json::to_value(&row).expect("serialize");
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["reason"], "layout is infeasible");
        let applied = serde_json::to_value(EditJournalResult::Applied).expect("serialize");
        assert_eq!(applied["status"], "applied");
    }
}
