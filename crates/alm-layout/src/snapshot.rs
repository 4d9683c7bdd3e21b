//! Serializable form of a [`Layout`].
//!
//! The engine never touches files. A snapshot exposes the tab/area/constraint
//! topology so an external archive can persist and restore it.

use alm_core::geometry::Axis;
use serde::{Deserialize, Serialize};

use crate::area::{Area, AreaId, AreaRef};
use crate::constraint::{Constraint, ConstraintId};
use crate::error::LayoutError;
use crate::layout::Layout;
use crate::tab::{TabArena, TabId, TabSlot};

/// Current layout snapshot schema version.
pub const LAYOUT_SCHEMA_VERSION: u16 = 1;

fn default_schema_version() -> u16 {
    LAYOUT_SCHEMA_VERSION
}

/// One tab of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabRecord {
    pub id: TabId,
    pub axis: Axis,
    pub value: f64,
}

/// Serial form of a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub borders: AreaRef,
    pub tabs: Vec<TabRecord>,
    pub areas: Vec<Area>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    pub next_tab: TabId,
    pub next_area: AreaId,
    pub next_constraint: ConstraintId,
}

impl LayoutSnapshot {
    /// Order tabs, areas and constraints by ID for deterministic output.
    pub fn canonicalize(&mut self) {
        self.tabs.sort_by_key(|tab| tab.id);
        self.areas.sort_by_key(|area| area.id);
        self.constraints.sort_by_key(|constraint| constraint.id);
    }
}

impl Layout {
    /// Export to canonical snapshot form.
    #[must_use]
    pub fn to_snapshot(&self) -> LayoutSnapshot {
        let mut snapshot = LayoutSnapshot {
            schema_version: LAYOUT_SCHEMA_VERSION,
            borders: self.borders,
            tabs: self
                .tabs
                .iter()
                .map(|(id, slot)| TabRecord {
                    id,
                    axis: slot.axis,
                    value: slot.value,
                })
                .collect(),
            areas: self.areas.clone(),
            constraints: self.constraints.clone(),
            next_tab: self.tabs.next_id(),
            next_area: self.next_area,
            next_constraint: self.next_constraint,
        };
        snapshot.canonicalize();
        snapshot
    }

    /// Construct and validate from a snapshot.
    pub fn from_snapshot(mut snapshot: LayoutSnapshot) -> Result<Self, LayoutError> {
        if snapshot.schema_version != LAYOUT_SCHEMA_VERSION {
            return Err(LayoutError::UnsupportedSchemaVersion {
                version: snapshot.schema_version,
            });
        }
        snapshot.canonicalize();

        let mut tabs = TabArena::default();
        for record in &snapshot.tabs {
            tabs.insert_with_id(
                record.id,
                TabSlot {
                    axis: record.axis,
                    value: record.value,
                },
            )?;
        }
        tabs.reserve_through(snapshot.next_tab);

        let mut next_area = snapshot.next_area;
        if let Some(last) = snapshot.areas.last()
            && last.id >= next_area
        {
            next_area = last.id.checked_next()?;
        }
        let mut next_constraint = snapshot.next_constraint;
        if let Some(last) = snapshot.constraints.last()
            && last.id >= next_constraint
        {
            next_constraint = last.id.checked_next()?;
        }

        let layout = Self {
            tabs,
            areas: snapshot.areas,
            constraints: snapshot.constraints,
            next_area,
            next_constraint,
            borders: snapshot.borders,
        };
        layout.validate()?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::ItemId;
    use crate::constraint::{Relation, Strength, Term};
    use alm_core::geometry::Size;

    fn sample() -> Layout {
        let mut layout = Layout::new(Size::new(200.0, 100.0));
        let mid = layout.add_tab_at(Axis::X, 80.0).expect("tab");
        let b = layout.borders();
        layout
            .add_area(ItemId(10), AreaRef::new(b.left, b.top, mid, b.bottom))
            .expect("area");
        layout
            .add_area(ItemId(11), AreaRef::new(mid, b.top, b.right, b.bottom))
            .expect("area");
        layout
            .add_constraint(
                vec![Term::new(1.0, mid)],
                Relation::Ge,
                20.0,
                Strength::Required,
                Some("user"),
            )
            .expect("constraint");
        layout
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let layout = sample();
        let json = serde_json::to_string(&layout.to_snapshot()).expect("serialize");
        let parsed: LayoutSnapshot = serde_json::from_str(&json).expect("deserialize");
        let restored = Layout::from_snapshot(parsed).expect("valid snapshot");
        assert_eq!(restored, layout);
        assert_eq!(restored.state_hash(), layout.state_hash());
    }

    #[test]
    fn unsupported_schema_version_is_rejected() {
        let mut snapshot = sample().to_snapshot();
        snapshot.schema_version = 99;
        assert_eq!(
            Layout::from_snapshot(snapshot),
            Err(LayoutError::UnsupportedSchemaVersion { version: 99 })
        );
    }

    #[test]
    fn dangling_area_tab_is_rejected() {
        let mut snapshot = sample().to_snapshot();
        let mid = snapshot.areas[0].right;
        snapshot.tabs.retain(|tab| tab.id != mid);
        assert_eq!(
            Layout::from_snapshot(snapshot),
            Err(LayoutError::UnknownTab { tab: mid })
        );
    }

    #[test]
    fn duplicate_tab_ids_are_rejected() {
        let mut snapshot = sample().to_snapshot();
        let first = snapshot.tabs[0];
        snapshot.tabs.push(first);
        assert_eq!(
            Layout::from_snapshot(snapshot),
            Err(LayoutError::DuplicateTab { tab: first.id })
        );
    }
}
