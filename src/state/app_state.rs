//! Main application state management

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::{
    board_view::{BoardView, EntryView, BOARD_TITLE},
    Countdown, Mutation, TimerEntry, TimerList, TimerListController, TimerStatus, EntryId,
};
use crate::{
    services::SoundPlayer,
    tasks::{Completion, CountdownEngine},
    utils::coerce_minutes,
};

/// Everything guarded by the board lock: the list controller, one engine per
/// shown entry, the shared numeric field and the message line
#[derive(Debug)]
struct Board {
    controller: TimerListController,
    engines: HashMap<EntryId, CountdownEngine>,
    draft: i32,
    message: String,
}

impl Board {
    /// Bring the engines in line with the current snapshot. Entries that left the
    /// list, got a new identity or are being edited lose their engine; new ones
    /// get a fresh engine; status changes since `previous` are forwarded.
    fn sync_engines(&mut self, previous: &TimerList, completions: &broadcast::Sender<Completion>) {
        let list = self.controller.snapshot();
        let editing = self.controller.editing();
        let shown: HashMap<EntryId, &TimerEntry> = list
            .entries()
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != editing)
            .map(|(_, entry)| (entry.id, entry))
            .collect();

        self.engines.retain(|id, _| shown.contains_key(id));

        for (id, entry) in shown {
            match self.engines.get(&id) {
                Some(engine) => {
                    let previous_status = previous
                        .position_of(id)
                        .and_then(|index| previous.get(index))
                        .map(|entry| entry.status);
                    if previous_status != Some(entry.status) {
                        engine.set_running(entry.status.is_running());
                    }
                }
                None => {
                    let engine = CountdownEngine::spawn(entry, completions.clone());
                    self.engines.insert(id, engine);
                }
            }
        }
    }

    fn engine_at(&self, index: usize) -> Option<&CountdownEngine> {
        let entry = self.controller.snapshot().get(index).cloned()?;
        self.engines.get(&entry.id)
    }
}

/// Main application state shared by the HTTP handlers and background tasks
#[derive(Debug)]
pub struct AppState {
    board: Mutex<Board>,
    /// Completion events raised by the countdown engines
    pub completion_tx: broadcast::Sender<Completion>,
    /// Sound collaborator and the resource it plays on completion
    pub sound: Arc<dyn SoundPlayer>,
    pub sound_resource: String,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create the state with the preset timers and their engines.
    /// Must be called inside a tokio runtime.
    pub fn new(
        port: u16,
        host: String,
        sound: Arc<dyn SoundPlayer>,
        sound_resource: String,
    ) -> Self {
        let (completion_tx, _) = broadcast::channel(64);
        let controller = TimerListController::new();
        let initial = controller.snapshot();

        let mut board = Board {
            controller,
            engines: HashMap::new(),
            draft: 0,
            message: String::new(),
        };
        board.sync_engines(&initial, &completion_tx);

        Self {
            board: Mutex::new(board),
            completion_tx,
            sound,
            sound_resource,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    fn lock_board(&self) -> Result<MutexGuard<'_, Board>, String> {
        self.board
            .lock()
            .map_err(|e| format!("Failed to lock timer board: {}", e))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Apply a list operation and, when it went through, re-bind the engines
    fn mutate<F>(&self, action: &str, operation: F) -> Result<Mutation, String>
    where
        F: FnOnce(&mut Board) -> Mutation,
    {
        let mut board = self.lock_board()?;
        let previous = board.controller.snapshot();

        let outcome = operation(&mut *board);
        if let Mutation::Rejected(reason) = outcome {
            debug!("{} was a no-op: {}", action, reason);
            return Ok(outcome);
        }

        board.sync_engines(&previous, &self.completion_tx);
        drop(board);

        self.record_action(action);
        Ok(outcome)
    }

    /// Add a custom timer from the raw input field
    pub fn add_custom_timer(&self, input: &Value) -> Result<Mutation, String> {
        let minutes = coerce_minutes(input);
        self.mutate("add", |board| {
            board.draft = minutes;
            let outcome = board.controller.add_custom_timer(minutes);
            if outcome.is_applied() {
                board.draft = 0;
            }
            outcome
        })
    }

    pub fn set_status(&self, index: usize, status: TimerStatus) -> Result<Mutation, String> {
        self.mutate("set-status", |board| board.controller.set_status(index, status))
    }

    /// Flip the entry between running and paused
    pub fn toggle(&self, index: usize) -> Result<Mutation, String> {
        self.mutate("toggle", |board| {
            match board.controller.snapshot().get(index) {
                Some(entry) => board.controller.set_status(index, entry.status.toggled()),
                None => Mutation::Rejected("no timer at this index"),
            }
        })
    }

    /// Run the entry again from its full duration
    pub fn restart(&self, index: usize) -> Result<Mutation, String> {
        let mut board = self.lock_board()?;
        let previous = board.controller.snapshot();

        let outcome = board.controller.restart(index);
        if outcome.is_applied() {
            board.sync_engines(&previous, &self.completion_tx);
            if let Some(engine) = board.engine_at(index) {
                engine.restart();
            }
            drop(board);
            self.record_action("restart");
        }
        Ok(outcome)
    }

    /// Open the editor on a custom entry, pre-filled with its duration
    pub fn begin_edit(&self, index: usize) -> Result<Mutation, String> {
        self.mutate("begin-edit", |board| {
            let outcome = board.controller.begin_edit(index);
            if outcome.is_applied() {
                if let Some(entry) = board.controller.snapshot().get(index) {
                    board.draft = entry.duration as i32;
                }
            }
            outcome
        })
    }

    /// Commit a new duration for a custom entry from the raw input field
    pub fn edit(&self, index: usize, input: &Value) -> Result<Mutation, String> {
        let minutes = coerce_minutes(input);
        self.mutate("edit", |board| {
            board.draft = minutes;
            board.controller.edit(index, minutes)
        })
    }

    /// Close the editor without changing the entry
    pub fn end_edit(&self) -> Result<Mutation, String> {
        self.mutate("end-edit", |board| board.controller.end_edit())
    }

    pub fn remove(&self, index: usize) -> Result<Mutation, String> {
        self.mutate("remove", |board| board.controller.remove(index))
    }

    /// Fold a finished countdown back into the list and show its message.
    /// Returns false when the entry is gone, in which case nothing is shown.
    pub fn handle_completion(&self, completion: &Completion) -> Result<bool, String> {
        let mut board = self.lock_board()?;

        let previous = board.controller.snapshot();
        let Some(index) = previous.position_of(completion.id) else {
            debug!("Completed timer {:?} is no longer listed", completion.id);
            return Ok(false);
        };
        board.message = completion.message.clone();

        // Engines apply commands synchronously, so a restart that raced the
        // completion already shows up as running here
        let engine_running = board
            .engines
            .get(&completion.id)
            .map(|engine| engine.countdown().is_running())
            .unwrap_or(false);
        let listed_running = previous
            .get(index)
            .map(|entry| entry.status.is_running())
            .unwrap_or(false);

        if listed_running && !engine_running {
            board.controller.set_status(index, TimerStatus::Paused);
            board.sync_engines(&previous, &self.completion_tx);
        }
        info!("Timer {} finished: {}", index, completion.message);
        Ok(true)
    }

    /// Current list snapshot
    pub fn snapshot(&self) -> Result<TimerList, String> {
        self.lock_board().map(|board| board.controller.snapshot())
    }

    /// Render the whole board
    pub fn board(&self) -> Result<BoardView, String> {
        let board = self.lock_board()?;
        let list = board.controller.snapshot();
        let editing = board.controller.editing();

        let entries = list
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                if Some(index) == editing {
                    return EntryView {
                        index,
                        id: entry.id,
                        duration: entry.duration,
                        status: entry.status,
                        is_preset: entry.is_preset,
                        remaining_seconds: None,
                        display: None,
                        toggle_label: None,
                        controls: Vec::new(),
                        editing: true,
                    };
                }

                let countdown = board
                    .engines
                    .get(&entry.id)
                    .map(|engine| engine.countdown())
                    .unwrap_or_else(|| Countdown::new(entry.duration, entry.status));

                EntryView {
                    index,
                    id: entry.id,
                    duration: entry.duration,
                    status: entry.status,
                    is_preset: entry.is_preset,
                    remaining_seconds: Some(countdown.remaining_seconds()),
                    display: Some(countdown.display()),
                    toggle_label: Some(entry.status.toggle_label().to_string()),
                    controls: entry.controls().to_vec(),
                    editing: false,
                }
            })
            .collect();

        Ok(BoardView {
            title: BOARD_TITLE.to_string(),
            entries,
            editing_index: editing,
            draft: board.draft,
            message: board.message.clone(),
        })
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

        match (hours, minutes) {
            (0, 0) => format!("{}s", seconds),
            (0, _) => format!("{}m {}s", minutes, seconds),
            _ => format!("{}h {}m {}s", hours, minutes, seconds),
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::time::sleep;

    use super::*;
    use crate::services::RecordingSoundPlayer;

    fn new_state() -> AppState {
        AppState::new(
            0,
            "127.0.0.1".to_string(),
            Arc::new(RecordingSoundPlayer::new()),
            "timer_finished.ogg".to_string(),
        )
    }

    fn remaining(state: &AppState, index: usize) -> Option<u64> {
        state.board().unwrap().entries[index].remaining_seconds
    }

    #[tokio::test(start_paused = true)]
    async fn presets_get_paused_engines() {
        let state = new_state();
        sleep(Duration::from_secs(5)).await;

        let board = state.board().unwrap();
        let shown: Vec<_> = board
            .entries
            .iter()
            .map(|entry| entry.display.clone().unwrap())
            .collect();
        assert_eq!(shown, vec!["03:00", "06:00", "09:00"]);
        assert_eq!(board.title, "Minuteurs");
        assert!(board.message.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_runs_and_pauses_the_engine() {
        let state = new_state();

        state.toggle(0).unwrap();
        sleep(Duration::from_millis(3_500)).await;
        assert_eq!(remaining(&state, 0), Some(177));
        assert_eq!(state.board().unwrap().entries[0].toggle_label.as_deref(), Some("▐▐"));

        state.toggle(0).unwrap();
        sleep(Duration::from_secs(10)).await;
        assert_eq!(remaining(&state, 0), Some(177));
        assert_eq!(remaining(&state, 1), Some(360));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resets_remaining_time() {
        let state = new_state();

        state.set_status(1, TimerStatus::Running).unwrap();
        sleep(Duration::from_millis(20_500)).await;
        assert_eq!(remaining(&state, 1), Some(340));

        assert!(state.restart(1).unwrap().is_applied());
        sleep(Duration::from_millis(10)).await;
        assert_eq!(remaining(&state, 1), Some(360));
        assert_eq!(state.snapshot().unwrap().get(1).unwrap().status, TimerStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn edit_discards_the_old_countdown() {
        let state = new_state();
        state.add_custom_timer(&json!("2")).unwrap();
        state.toggle(3).unwrap();
        sleep(Duration::from_millis(5_500)).await;
        assert_eq!(remaining(&state, 3), Some(115));

        state.begin_edit(3).unwrap();
        let board = state.board().unwrap();
        assert_eq!(board.editing_index, Some(3));
        assert_eq!(board.draft, 2);
        assert!(board.entries[3].controls.is_empty());

        assert!(state.edit(3, &json!("5")).unwrap().is_applied());
        sleep(Duration::from_secs(3)).await;
        let board = state.board().unwrap();
        assert_eq!(board.editing_index, None);
        assert_eq!(board.entries[3].remaining_seconds, Some(300));
        assert_eq!(board.entries[3].status, TimerStatus::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_input_changes_nothing() {
        let state = new_state();
        let before = state.snapshot().unwrap();

        assert!(!state.add_custom_timer(&json!("abc")).unwrap().is_applied());
        assert!(!state.add_custom_timer(&json!("")).unwrap().is_applied());
        assert!(!state.add_custom_timer(&json!(-3)).unwrap().is_applied());
        assert!(!state.remove(0).unwrap().is_applied());

        assert_eq!(state.snapshot().unwrap(), before);
        assert_eq!(state.get_last_action().0, None);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_pauses_entry_and_sets_message() {
        let state = new_state();
        state.add_custom_timer(&json!(1)).unwrap();
        let id = state.snapshot().unwrap().get(3).unwrap().id;
        state.toggle(3).unwrap();
        sleep(Duration::from_secs(61)).await;

        state
            .handle_completion(&Completion {
                id,
                duration: 1,
                message: "Le minuteur de 1 minute est fini !".to_string(),
            })
            .unwrap();

        let board = state.board().unwrap();
        assert_eq!(board.message, "Le minuteur de 1 minute est fini !");
        assert_eq!(board.entries[3].status, TimerStatus::Paused);
        assert_eq!(board.entries[3].display.as_deref(), Some("00:00"));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_racing_a_completion_keeps_running() {
        let state = new_state();
        state.add_custom_timer(&json!(1)).unwrap();
        let id = state.snapshot().unwrap().get(3).unwrap().id;
        state.toggle(3).unwrap();
        sleep(Duration::from_secs(61)).await;

        // the restart lands before the completion is folded in
        assert!(state.restart(3).unwrap().is_applied());
        let listed = state
            .handle_completion(&Completion {
                id,
                duration: 1,
                message: "Le minuteur de 1 minute est fini !".to_string(),
            })
            .unwrap();
        assert!(listed);

        sleep(Duration::from_millis(5_500)).await;
        let board = state.board().unwrap();
        assert_eq!(board.entries[3].status, TimerStatus::Running);
        assert_eq!(board.entries[3].remaining_seconds, Some(55));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_shows_full_duration_at_once() {
        let state = new_state();
        state.set_status(1, TimerStatus::Running).unwrap();
        sleep(Duration::from_millis(20_500)).await;

        state.restart(1).unwrap();
        let board = state.board().unwrap();
        assert_eq!(board.entries[1].status, TimerStatus::Running);
        assert_eq!(board.entries[1].remaining_seconds, Some(360));
        assert_eq!(board.entries[1].display.as_deref(), Some("06:00"));
    }

    #[tokio::test(start_paused = true)]
    async fn resuming_a_spent_timer_shows_reloaded_time_at_once() {
        let state = new_state();
        state.add_custom_timer(&json!(1)).unwrap();
        let id = state.snapshot().unwrap().get(3).unwrap().id;
        state.toggle(3).unwrap();
        sleep(Duration::from_secs(61)).await;
        state
            .handle_completion(&Completion {
                id,
                duration: 1,
                message: "Le minuteur de 1 minute est fini !".to_string(),
            })
            .unwrap();

        state.toggle(3).unwrap();
        let board = state.board().unwrap();
        assert_eq!(board.entries[3].status, TimerStatus::Running);
        assert_eq!(board.entries[3].display.as_deref(), Some("01:00"));
    }

    #[tokio::test(start_paused = true)]
    async fn completion_of_a_removed_timer_is_ignored() {
        let state = new_state();
        state.add_custom_timer(&json!(1)).unwrap();
        let id = state.snapshot().unwrap().get(3).unwrap().id;
        state.remove(3).unwrap();

        let listed = state
            .handle_completion(&Completion {
                id,
                duration: 1,
                message: "Le minuteur de 1 minute est fini !".to_string(),
            })
            .unwrap();

        assert!(!listed);
        assert!(state.board().unwrap().message.is_empty());
    }

    #[tokio::test]
    async fn uptime_is_short_right_after_start() {
        let state = new_state();
        assert!(state.get_uptime().ends_with('s'));
    }
}
