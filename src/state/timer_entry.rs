//! Timer entry structure and per-entry display helpers

use serde::{Deserialize, Serialize};

/// Durations, in minutes, of the preset egg timers present at startup
pub const PRESET_DURATIONS: [u32; 3] = [3, 6, 9];

/// Stable identity of an entry, used to bind it to its countdown engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

/// Run/pause status of a timer entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimerStatus {
    Running,
    Paused,
}

impl TimerStatus {
    pub fn toggled(self) -> Self {
        match self {
            TimerStatus::Running => TimerStatus::Paused,
            TimerStatus::Paused => TimerStatus::Running,
        }
    }

    pub fn is_running(self) -> bool {
        self == TimerStatus::Running
    }

    /// Label shown on the pause/resume button
    pub fn toggle_label(self) -> &'static str {
        match self {
            TimerStatus::Running => "▐▐",
            TimerStatus::Paused => "▶",
        }
    }
}

/// Controls offered on a rendered entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Toggle,
    Edit,
    Restart,
    Remove,
}

/// One timer in the list. Entries are values: every change produces a new entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEntry {
    pub id: EntryId,
    /// Duration in minutes, always positive
    pub duration: u32,
    pub status: TimerStatus,
    pub is_preset: bool,
}

impl TimerEntry {
    pub fn preset(id: EntryId, duration: u32) -> Self {
        Self {
            id,
            duration,
            status: TimerStatus::Paused,
            is_preset: true,
        }
    }

    pub fn custom(id: EntryId, duration: u32) -> Self {
        Self {
            id,
            duration,
            status: TimerStatus::Paused,
            is_preset: false,
        }
    }

    /// Same entry with a different status
    pub fn with_status(&self, status: TimerStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Full countdown length in seconds
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.duration) * 60
    }

    /// Controls gated on the preset flag fixed at creation, not on the duration
    pub fn controls(&self) -> &'static [Control] {
        if self.is_preset {
            &[Control::Toggle, Control::Restart]
        } else {
            &[Control::Toggle, Control::Edit, Control::Restart, Control::Remove]
        }
    }

    pub fn completion_message(&self) -> String {
        completion_message(self.duration)
    }
}

/// Render remaining seconds as `MM:SS`; minutes are not capped at 59
pub fn format_remaining(remaining_seconds: u64) -> String {
    format!("{:02}:{:02}", remaining_seconds / 60, remaining_seconds % 60)
}

/// Message shown when a countdown of `duration` minutes reaches zero
pub fn completion_message(duration: u32) -> String {
    if duration == 1 {
        format!("Le minuteur de {} minute est fini !", duration)
    } else {
        format!("Le minuteur de {} minutes est fini !", duration)
    }
}
