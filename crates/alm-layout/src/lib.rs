#![forbid(unsafe_code)]

//! Tab connection graph and area topology maintenance for Auckland Layout
//! Model layouts.
//!
//! A layout is a set of rectangular areas whose edges are bound to shared
//! positional variables ("tabs"). This crate keeps that structure sound
//! while a user edits it:
//!
//! - [`TabConnections`] - adjacency index of which areas sit on which tab
//! - [`GroupDetection`] - adjacent-area search for multi-area operations
//! - [`InsertDetection`] - insertion points next to a hovered tab
//! - [`AreaRemoval`] - gap closing after an area or edge leaves
//! - [`OverlapManager`] - synthesized non-overlap constraints
//! - [`Editor`] - transactional edit actions with undo/redo and a journal
//!
//! # Example
//!
//! ```ignore
//! use alm_layout::{Editor, EditorConfig, EditAction, Layout, AreaSide};
//!
//! let mut editor = Editor::new(layout, EditorConfig::default())?;
//! editor.perform_action(EditAction::InsertTab { area, side: AreaSide::Right })?;
//! editor.undo()?;
//! ```

pub mod action;
pub mod area;
pub mod config;
pub mod connections;
pub mod constraint;
pub mod direction;
pub mod editor;
pub mod empty_area;
pub mod error;
pub mod group;
pub mod history;
pub mod insert;
pub mod layout;
pub mod overlap;
pub mod probe;
pub mod removal;
pub mod roster;
pub mod snapshot;
pub mod solver;
pub mod tab;
mod walk;

pub use action::{ActionContext, EditAction, EditActionKind};
pub use alm_core::geometry::{Axis, Point, Rect, Size};
pub use area::{
    Alignment, Area, AreaId, AreaRef, AreaSide, HorizontalAlignment, ItemId, VerticalAlignment,
};
pub use config::EditorConfig;
pub use connections::{TabConnections, TabLinks};
pub use constraint::{
    Constraint, ConstraintId, EDIT_HELPER_LABEL, OVERLAP_LABEL, Relation, Strength, Term,
};
pub use editor::{
    ActionOutcome, DragSource, DropRequest, EdgeDrag, EditJournalEntry, EditJournalResult, Editor,
    check_temp_edit_constraints,
};
pub use empty_area::{EmptyAreaTarget, OptimalArea, find_empty_area, find_optimal_area};
pub use error::{EditError, EditFailure, LayoutError};
pub use group::GroupDetection;
pub use history::{EditHistory, HistoryEntry};
pub use insert::{InsertDetection, InsertionPoint};
pub use layout::Layout;
pub use overlap::{OverlapManager, SimpleOverlapEngine};
pub use removal::{AreaRemoval, fill_empty_space};
pub use roster::{
    Informant, ItemRoster, NullInformant, NullRoster, RecordingInformant, RecordingRoster,
    RosterEvent,
};
pub use snapshot::{LAYOUT_SCHEMA_VERSION, LayoutSnapshot};
pub use solver::Feasibility;
pub use tab::TabId;
