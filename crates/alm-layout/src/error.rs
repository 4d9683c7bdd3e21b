//! Error types for the layout model and the edit pipeline.

use std::fmt;

use alm_core::geometry::Axis;

use crate::action::EditActionKind;
use crate::area::{AreaId, AreaSide};
use crate::constraint::ConstraintId;
use crate::snapshot::LAYOUT_SCHEMA_VERSION;
use crate::tab::TabId;

/// Structural errors of the area/tab model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    ZeroId {
        kind: &'static str,
    },
    IdOverflow {
        kind: &'static str,
        current: u64,
    },
    DuplicateTab {
        tab: TabId,
    },
    DuplicateArea {
        area: AreaId,
    },
    DuplicateConstraint {
        constraint: ConstraintId,
    },
    UnknownTab {
        tab: TabId,
    },
    UnknownArea {
        area: AreaId,
    },
    UnknownConstraint {
        constraint: ConstraintId,
    },
    AxisMismatch {
        tab: TabId,
        expected: Axis,
    },
    BorderTab {
        tab: TabId,
    },
    UnsupportedSchemaVersion {
        version: u16,
    },
    Solver {
        message: String,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroId { kind } => write!(f, "{kind} id 0 is invalid"),
            Self::IdOverflow { kind, current } => {
                write!(f, "{kind} id overflow after {current}")
            }
            Self::DuplicateTab { tab } => write!(f, "duplicate tab {tab}"),
            Self::DuplicateArea { area } => write!(f, "duplicate area {area}"),
            Self::DuplicateConstraint { constraint } => {
                write!(f, "duplicate constraint {constraint}")
            }
            Self::UnknownTab { tab } => write!(f, "tab {tab} not found"),
            Self::UnknownArea { area } => write!(f, "area {area} not found"),
            Self::UnknownConstraint { constraint } => {
                write!(f, "constraint {constraint} not found")
            }
            Self::AxisMismatch { tab, expected } => {
                write!(f, "tab {tab} is not on the {expected:?} axis")
            }
            Self::BorderTab { tab } => write!(f, "tab {tab} is a layout border"),
            Self::UnsupportedSchemaVersion { version } => write!(
                f,
                "unsupported layout schema version {version} (expected {LAYOUT_SCHEMA_VERSION})"
            ),
            Self::Solver { message } => write!(f, "solver error: {message}"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Structured reasons an edit action was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditFailure {
    /// The LP system has no solution after the edit.
    Infeasible,
    /// An action that needs at least one area got none.
    EmptyAreaList,
    MissingArea {
        area: AreaId,
    },
    MissingTab {
        tab: TabId,
    },
    SameArea {
        area: AreaId,
    },
    /// The tab cannot be bound to that side of an area.
    SideMismatch {
        tab: TabId,
        side: AreaSide,
    },
    /// The area has no edge on that tab.
    NotBound {
        area: AreaId,
        tab: TabId,
    },
    /// Neither side of the hovered tab can host the insertion.
    NoInsertionPoint {
        tab: TabId,
    },
    /// The target region is occupied.
    AreaNotEmpty,
    Layout(LayoutError),
}

impl fmt::Display for EditFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infeasible => write!(f, "layout is infeasible"),
            Self::EmptyAreaList => write!(f, "action needs at least one area"),
            Self::MissingArea { area } => write!(f, "area {area} not found"),
            Self::MissingTab { tab } => write!(f, "tab {tab} not found"),
            Self::SameArea { area } => {
                write!(f, "operation requires distinct areas, got {area} twice")
            }
            Self::SideMismatch { tab, side } => {
                write!(f, "tab {tab} cannot be bound to the {side:?} side")
            }
            Self::NotBound { area, tab } => write!(f, "area {area} has no edge on tab {tab}"),
            Self::NoInsertionPoint { tab } => {
                write!(f, "no insertion point next to tab {tab}")
            }
            Self::AreaNotEmpty => write!(f, "target region is not empty"),
            Self::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EditFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Layout(err) = self {
            return Some(err);
        }
        None
    }
}

impl From<LayoutError> for EditFailure {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::UnknownArea { area } => Self::MissingArea { area },
            LayoutError::UnknownTab { tab } => Self::MissingTab { tab },
            other => Self::Layout(other),
        }
    }
}

/// Failure payload of the editor's transactional entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditError {
    pub operation_id: u64,
    pub kind: EditActionKind,
    pub touched_areas: Vec<AreaId>,
    pub before_hash: u64,
    pub after_hash: u64,
    pub reason: EditFailure,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "edit op {} ({:?}) failed: {} [areas={:?}, before_hash={:#x}, after_hash={:#x}]",
            self.operation_id,
            self.kind,
            self.reason,
            self.touched_areas
                .iter()
                .map(|area| area.get())
                .collect::<Vec<_>>(),
            self.before_hash,
            self.after_hash
        )
    }
}

impl std::error::Error for EditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}
