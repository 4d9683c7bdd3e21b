//! Arena-owned tabs addressed by stable handles.
//!
//! A tab is a movable coordinate line. Areas and constraints refer to tabs by
//! [`TabId`]; the arena owns the values. Two tabs with the same value are
//! still distinct graph nodes.

use std::collections::BTreeMap;

use alm_core::geometry::Axis;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Stable identifier for a tab.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(u64);

impl TabId {
    /// Lowest valid tab ID.
    pub const MIN: Self = Self(1);

    /// Create a tab ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, LayoutError> {
        if raw == 0 {
            return Err(LayoutError::ZeroId { kind: "tab" });
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, LayoutError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(LayoutError::IdOverflow {
                kind: "tab",
                current: self.0,
            });
        };
        Self::new(next)
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Storage for one tab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabSlot {
    pub axis: Axis,
    pub value: f64,
}

/// Owner of every tab of a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TabArena {
    slots: BTreeMap<TabId, TabSlot>,
    next_id: TabId,
}

impl Default for TabArena {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
            next_id: TabId::MIN,
        }
    }
}

impl TabArena {
    /// Arena holding only the four border tabs of a `width` x `height`
    /// layout, in left, top, right, bottom order.
    pub(crate) fn with_borders(width: f64, height: f64) -> (Self, [TabId; 4]) {
        let ids = [Self::border_id(1), Self::border_id(2), Self::border_id(3), Self::border_id(4)];
        let slots = BTreeMap::from([
            (ids[0], TabSlot { axis: Axis::X, value: 0.0 }),
            (ids[1], TabSlot { axis: Axis::Y, value: 0.0 }),
            (ids[2], TabSlot { axis: Axis::X, value: width }),
            (ids[3], TabSlot { axis: Axis::Y, value: height }),
        ]);
        (
            Self {
                slots,
                next_id: Self::border_id(5),
            },
            ids,
        )
    }

    const fn border_id(raw: u64) -> TabId {
        TabId(raw)
    }

    /// Allocate a new tab on `axis` with an initial value.
    pub fn alloc(&mut self, axis: Axis, value: f64) -> Result<TabId, LayoutError> {
        let id = self.next_id;
        self.next_id = id.checked_next()?;
        self.slots.insert(id, TabSlot { axis, value });
        Ok(id)
    }

    /// Re-insert a tab under a known ID (snapshot restore).
    pub(crate) fn insert_with_id(&mut self, id: TabId, slot: TabSlot) -> Result<(), LayoutError> {
        if self.slots.contains_key(&id) {
            return Err(LayoutError::DuplicateTab { tab: id });
        }
        self.slots.insert(id, slot);
        if id >= self.next_id {
            self.next_id = id.checked_next()?;
        }
        Ok(())
    }

    /// Never hand out IDs below `next`.
    pub(crate) fn reserve_through(&mut self, next: TabId) {
        if next > self.next_id {
            self.next_id = next;
        }
    }

    #[must_use]
    pub fn contains(&self, id: TabId) -> bool {
        self.slots.contains_key(&id)
    }

    #[must_use]
    pub fn slot(&self, id: TabId) -> Option<TabSlot> {
        self.slots.get(&id).copied()
    }

    #[must_use]
    pub fn value(&self, id: TabId) -> Option<f64> {
        self.slots.get(&id).map(|slot| slot.value)
    }

    #[must_use]
    pub fn axis(&self, id: TabId) -> Option<Axis> {
        self.slots.get(&id).map(|slot| slot.axis)
    }

    /// Set the value of a tab. Returns `false` for unknown tabs.
    pub fn set_value(&mut self, id: TabId, value: f64) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.value = value;
                true
            }
            None => false,
        }
    }

    /// Drop a tab from the arena.
    pub fn remove(&mut self, id: TabId) -> Option<TabSlot> {
        self.slots.remove(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Next ID the arena will hand out.
    #[must_use]
    pub const fn next_id(&self) -> TabId {
        self.next_id
    }

    /// All tabs on `axis` in ascending ID (creation) order.
    pub fn ids(&self, axis: Axis) -> impl Iterator<Item = TabId> + '_ {
        self.slots
            .iter()
            .filter(move |(_, slot)| slot.axis == axis)
            .map(|(id, _)| *id)
    }

    /// All tabs with their slots in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (TabId, TabSlot)> + '_ {
        self.slots.iter().map(|(id, slot)| (*id, *slot))
    }

    /// Tabs on `axis` ordered by value, ties by creation order.
    #[must_use]
    pub fn sorted_by_value(&self, axis: Axis) -> Vec<TabId> {
        let mut tabs: Vec<(f64, TabId)> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.axis == axis)
            .map(|(id, slot)| (slot.value, *id))
            .collect();
        tabs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        tabs.into_iter().map(|(_, id)| id).collect()
    }
}
