//! Timer list snapshots and the controller that produces them

use std::sync::Arc;

use tracing::{debug, info};

use super::timer_entry::{EntryId, TimerEntry, TimerStatus, PRESET_DURATIONS};

/// Outcome of a list operation. Rejections are silent no-ops, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    Rejected(&'static str),
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied)
    }
}

/// Immutable, cheaply clonable snapshot of the ordered timer entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerList {
    entries: Arc<[TimerEntry]>,
}

impl TimerList {
    fn from_vec(entries: Vec<TimerEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    pub fn entries(&self) -> &[TimerEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TimerEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn replaced(&self, index: usize, entry: TimerEntry) -> Self {
        let mut entries = self.entries.to_vec();
        entries[index] = entry;
        Self::from_vec(entries)
    }

    fn appended(&self, entry: TimerEntry) -> Self {
        let mut entries = self.entries.to_vec();
        entries.push(entry);
        Self::from_vec(entries)
    }

    fn without(&self, index: usize) -> Self {
        let mut entries = self.entries.to_vec();
        entries.remove(index);
        Self::from_vec(entries)
    }
}

/// Owns the current list snapshot and the exclusive edit pointer.
///
/// Every applied mutation swaps in a new snapshot; entries already handed out
/// to readers are never modified.
#[derive(Debug)]
pub struct TimerListController {
    list: TimerList,
    editing: Option<usize>,
    next_id: u64,
}

impl TimerListController {
    /// Create the controller with the three paused preset timers
    pub fn new() -> Self {
        let presets: Vec<TimerEntry> = PRESET_DURATIONS
            .iter()
            .enumerate()
            .map(|(i, &duration)| TimerEntry::preset(EntryId(i as u64), duration))
            .collect();
        let next_id = presets.len() as u64;

        Self {
            list: TimerList::from_vec(presets),
            editing: None,
            next_id,
        }
    }

    pub fn snapshot(&self) -> TimerList {
        self.list.clone()
    }

    /// Index of the entry currently in edit mode, if any
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    fn entry(&self, index: usize) -> Result<&TimerEntry, Mutation> {
        self.list
            .get(index)
            .ok_or(Mutation::Rejected("no timer at this index"))
    }

    fn reject(operation: &str, reason: &'static str) -> Mutation {
        debug!("{} rejected: {}", operation, reason);
        Mutation::Rejected(reason)
    }

    /// Append a paused custom timer of `minutes` minutes
    pub fn add_custom_timer(&mut self, minutes: i32) -> Mutation {
        if minutes <= 0 {
            return Self::reject("add", "duration must be a positive number of minutes");
        }

        let entry = TimerEntry::custom(self.allocate_id(), minutes.unsigned_abs());
        info!("Adding custom timer {:?} of {} min", entry.id, entry.duration);
        self.list = self.list.appended(entry);
        Mutation::Applied
    }

    /// Replace the entry at `index` with the same entry under a new status
    pub fn set_status(&mut self, index: usize, status: TimerStatus) -> Mutation {
        let entry = match self.entry(index) {
            Ok(entry) => entry.with_status(status),
            Err(rejected) => return rejected,
        };

        debug!("Timer {} status -> {:?}", index, status);
        self.list = self.list.replaced(index, entry);
        Mutation::Applied
    }

    /// Set the entry at `index` running; resetting its countdown is up to the engine
    pub fn restart(&mut self, index: usize) -> Mutation {
        let entry = match self.entry(index) {
            Ok(entry) => entry.with_status(TimerStatus::Running),
            Err(rejected) => return rejected,
        };

        info!("Restarting timer {} ({} min)", index, entry.duration);
        self.list = self.list.replaced(index, entry);
        Mutation::Applied
    }

    /// Replace a custom entry with a paused one of `new_minutes` minutes.
    ///
    /// The replacement gets a fresh id, so any countdown bound to the old entry
    /// is discarded. Committing the entry under edit also leaves edit mode.
    pub fn edit(&mut self, index: usize, new_minutes: i32) -> Mutation {
        let is_preset = match self.entry(index) {
            Ok(entry) => entry.is_preset,
            Err(rejected) => return rejected,
        };
        if is_preset {
            return Self::reject("edit", "preset timers cannot be edited");
        }
        if new_minutes <= 0 {
            return Self::reject("edit", "duration must be a positive number of minutes");
        }

        let entry = TimerEntry::custom(self.allocate_id(), new_minutes.unsigned_abs());
        info!("Timer {} edited to {} min", index, entry.duration);
        self.list = self.list.replaced(index, entry);
        if self.editing == Some(index) {
            self.editing = None;
        }
        Mutation::Applied
    }

    /// Remove a custom entry; later entries shift down by one
    pub fn remove(&mut self, index: usize) -> Mutation {
        let is_preset = match self.entry(index) {
            Ok(entry) => entry.is_preset,
            Err(rejected) => return rejected,
        };
        if is_preset {
            return Self::reject("remove", "preset timers cannot be removed");
        }

        info!("Removing timer {}", index);
        self.list = self.list.without(index);
        self.editing = match self.editing {
            Some(editing) if editing == index => None,
            Some(editing) if editing > index => Some(editing - 1),
            other => other,
        };
        Mutation::Applied
    }

    /// Put a custom entry in edit mode, taking the pointer from any other entry.
    /// The entry is parked as paused while its editor is shown.
    pub fn begin_edit(&mut self, index: usize) -> Mutation {
        let entry = match self.entry(index) {
            Ok(entry) => entry.clone(),
            Err(rejected) => return rejected,
        };
        if entry.is_preset {
            return Self::reject("begin edit", "preset timers cannot be edited");
        }

        debug!("Timer {} entering edit mode", index);
        if entry.status != TimerStatus::Paused {
            self.list = self.list.replaced(index, entry.with_status(TimerStatus::Paused));
        }
        self.editing = Some(index);
        Mutation::Applied
    }

    /// Leave edit mode without changing the entry
    pub fn end_edit(&mut self) -> Mutation {
        match self.editing.take() {
            Some(index) => {
                debug!("Timer {} leaving edit mode", index);
                Mutation::Applied
            }
            None => Self::reject("end edit", "no timer is being edited"),
        }
    }
}

impl Default for TimerListController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn durations(controller: &TimerListController) -> Vec<u32> {
        controller
            .snapshot()
            .entries()
            .iter()
            .map(|entry| entry.duration)
            .collect()
    }

    #[test]
    fn starts_with_three_paused_presets() {
        let controller = TimerListController::new();
        let list = controller.snapshot();

        assert_eq!(durations(&controller), vec![3, 6, 9]);
        assert!(list
            .entries()
            .iter()
            .all(|entry| entry.is_preset && entry.status == TimerStatus::Paused));
        assert_eq!(controller.editing(), None);
    }

    #[test]
    fn add_rejects_non_positive_minutes() {
        let mut controller = TimerListController::new();
        let before = controller.snapshot();

        for minutes in [0, -1, -45, i32::MIN] {
            assert!(!controller.add_custom_timer(minutes).is_applied());
        }
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn add_appends_paused_custom_entry_last() {
        let mut controller = TimerListController::new();

        assert_eq!(controller.add_custom_timer(2), Mutation::Applied);

        let list = controller.snapshot();
        assert_eq!(list.len(), 4);
        let added = list.get(3).unwrap();
        assert_eq!(added.duration, 2);
        assert_eq!(added.status, TimerStatus::Paused);
        assert!(!added.is_preset);
    }

    #[test]
    fn edit_replaces_custom_entry_and_leaves_presets() {
        let mut controller = TimerListController::new();
        controller.add_custom_timer(2);
        let before = controller.snapshot();

        assert!(controller.edit(3, 5).is_applied());

        let after = controller.snapshot();
        assert_eq!(&after.entries()[..3], &before.entries()[..3]);
        let edited = after.get(3).unwrap();
        assert_eq!(edited.duration, 5);
        assert_eq!(edited.status, TimerStatus::Paused);
        assert!(!edited.is_preset);
        assert_ne!(edited.id, before.get(3).unwrap().id);
    }

    #[test]
    fn edit_forces_paused_and_rejects_bad_input() {
        let mut controller = TimerListController::new();
        controller.add_custom_timer(4);
        controller.set_status(3, TimerStatus::Running);

        assert!(!controller.edit(3, 0).is_applied());
        assert!(!controller.edit(0, 10).is_applied());
        assert_eq!(durations(&controller), vec![3, 6, 9, 4]);

        controller.edit(3, 8);
        assert_eq!(controller.snapshot().get(3).unwrap().status, TimerStatus::Paused);
    }

    #[test]
    fn presets_are_never_removed() {
        let mut controller = TimerListController::new();
        controller.add_custom_timer(1);

        for index in 0..3 {
            assert!(!controller.remove(index).is_applied());
        }
        assert_eq!(controller.snapshot().len(), 4);
    }

    #[test]
    fn remove_keeps_order_of_remaining_entries() {
        let mut controller = TimerListController::new();
        for minutes in [10, 20, 30] {
            controller.add_custom_timer(minutes);
        }

        assert!(controller.remove(4).is_applied());
        assert_eq!(durations(&controller), vec![3, 6, 9, 10, 30]);
        assert!(!controller.remove(5).is_applied());
    }

    #[test]
    fn set_status_keeps_identity_and_snapshots_are_untouched() {
        let mut controller = TimerListController::new();
        let before = controller.snapshot();

        controller.set_status(1, TimerStatus::Running);

        let after = controller.snapshot();
        assert_eq!(before.get(1).unwrap().status, TimerStatus::Paused);
        assert_eq!(after.get(1).unwrap().status, TimerStatus::Running);
        assert_eq!(after.get(1).unwrap().id, before.get(1).unwrap().id);
        assert!(after.get(1).unwrap().is_preset);
    }

    #[test]
    fn restart_sets_running_from_any_status() {
        let mut controller = TimerListController::new();
        controller.restart(2);
        assert_eq!(controller.snapshot().get(2).unwrap().status, TimerStatus::Running);
        controller.restart(2);
        assert_eq!(controller.snapshot().get(2).unwrap().status, TimerStatus::Running);
        assert!(!controller.restart(3).is_applied());
    }

    #[test]
    fn edit_mode_is_exclusive() {
        let mut controller = TimerListController::new();
        controller.add_custom_timer(5);
        controller.add_custom_timer(7);

        assert!(!controller.begin_edit(0).is_applied());
        controller.begin_edit(3);
        controller.begin_edit(4);
        assert_eq!(controller.editing(), Some(4));

        assert!(controller.edit(4, 12).is_applied());
        assert_eq!(controller.editing(), None);
        assert!(!controller.end_edit().is_applied());
    }

    #[test]
    fn begin_edit_parks_a_running_entry() {
        let mut controller = TimerListController::new();
        controller.add_custom_timer(5);
        controller.restart(3);

        controller.begin_edit(3);
        assert_eq!(controller.snapshot().get(3).unwrap().status, TimerStatus::Paused);
        assert!(controller.end_edit().is_applied());
        assert_eq!(controller.snapshot().get(3).unwrap().duration, 5);
    }

    #[test]
    fn remove_shifts_the_edit_pointer() {
        let mut controller = TimerListController::new();
        controller.add_custom_timer(5);
        controller.add_custom_timer(7);
        controller.begin_edit(4);

        controller.remove(3);
        assert_eq!(controller.editing(), Some(3));

        controller.remove(3);
        assert_eq!(controller.editing(), None);
    }
}
