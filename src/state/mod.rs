//! State management module
//!
//! Timer entries, the list controller producing immutable snapshots, the
//! per-entry countdown state and the shared application state.

pub mod app_state;
pub mod board_view;
pub mod countdown;
pub mod timer_entry;
pub mod timer_list;

// Re-export main types
pub use app_state::AppState;
pub use board_view::{BoardView, EntryView};
pub use countdown::{Countdown, Finished};
pub use timer_entry::{
    completion_message, format_remaining, Control, EntryId, TimerEntry, TimerStatus,
    PRESET_DURATIONS,
};
pub use timer_list::{Mutation, TimerList, TimerListController};
