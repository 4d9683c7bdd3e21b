//! Collaborators the editor calls out to.
//!
//! The engine does not own the items placed in areas. Whoever hosts them
//! implements [`ItemRoster`] to learn when an item enters or leaves the
//! layout, and [`Informant`] to show short advisory messages.

use std::collections::BTreeSet;

use crate::area::ItemId;

/// Bookkeeping of the items known to the host.
///
/// Items on the shelf are placed in the layout; trashed items were removed
/// from it and may come back through undo.
pub trait ItemRoster {
    fn add_to_shelf(&mut self, item: ItemId);
    fn remove_from_shelf(&mut self, item: ItemId);
    fn trash(&mut self, item: ItemId);
    fn untrash(&mut self, item: ItemId);
}

/// Sink for user-facing advisory messages.
pub trait Informant {
    fn error(&mut self, message: &str);
}

/// Roster that ignores every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRoster;

impl ItemRoster for NullRoster {
    fn add_to_shelf(&mut self, _item: ItemId) {}
    fn remove_from_shelf(&mut self, _item: ItemId) {}
    fn trash(&mut self, _item: ItemId) {}
    fn untrash(&mut self, _item: ItemId) {}
}

/// One call received by a [`RecordingRoster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterEvent {
    Shelved(ItemId),
    Unshelved(ItemId),
    Trashed(ItemId),
    Untrashed(ItemId),
}

/// Roster keeping the shelf and trash contents plus a call log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingRoster {
    pub shelf: BTreeSet<ItemId>,
    pub trash: BTreeSet<ItemId>,
    pub events: Vec<RosterEvent>,
}

impl RecordingRoster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemRoster for RecordingRoster {
    fn add_to_shelf(&mut self, item: ItemId) {
        self.shelf.insert(item);
        self.events.push(RosterEvent::Shelved(item));
    }

    fn remove_from_shelf(&mut self, item: ItemId) {
        self.shelf.remove(&item);
        self.events.push(RosterEvent::Unshelved(item));
    }

    fn trash(&mut self, item: ItemId) {
        self.trash.insert(item);
        self.events.push(RosterEvent::Trashed(item));
    }

    fn untrash(&mut self, item: ItemId) {
        self.trash.remove(&item);
        self.events.push(RosterEvent::Untrashed(item));
    }
}

/// Informant that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInformant;

impl Informant for NullInformant {
    fn error(&mut self, _message: &str) {}
}

/// Informant collecting messages in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingInformant {
    pub messages: Vec<String>,
}

impl Informant for RecordingInformant {
    fn error(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_roster_tracks_shelf_and_trash() {
        let mut roster = RecordingRoster::new();
        roster.add_to_shelf(ItemId(1));
        roster.trash(ItemId(1));
        roster.untrash(ItemId(1));
        roster.remove_from_shelf(ItemId(1));
        assert!(roster.shelf.is_empty());
        assert!(roster.trash.is_empty());
        assert_eq!(
            roster.events,
            vec![
                RosterEvent::Shelved(ItemId(1)),
                RosterEvent::Trashed(ItemId(1)),
                RosterEvent::Untrashed(ItemId(1)),
                RosterEvent::Unshelved(ItemId(1)),
            ]
        );
    }

    #[test]
    fn recording_informant_keeps_order() {
        let mut informant = RecordingInformant::default();
        informant.error("first");
        informant.error("second");
        assert_eq!(informant.messages, ["first", "second"]);
    }
}
