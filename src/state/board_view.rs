//! Serializable rendering of the timer board

use serde::{Deserialize, Serialize};

use super::timer_entry::{Control, EntryId, TimerStatus};

pub const BOARD_TITLE: &str = "Minuteurs";

/// One rendered row. While `editing` is set the countdown is not shown and the
/// row's only control is the numeric editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryView {
    pub index: usize,
    pub id: EntryId,
    pub duration: u32,
    pub status: TimerStatus,
    pub is_preset: bool,
    pub remaining_seconds: Option<u64>,
    pub display: Option<String>,
    pub toggle_label: Option<String>,
    pub controls: Vec<Control>,
    pub editing: bool,
}

/// Whole screen: list in display order, shared input field and message line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardView {
    pub title: String,
    pub entries: Vec<EntryView>,
    pub editing_index: Option<usize>,
    pub draft: i32,
    pub message: String,
}
