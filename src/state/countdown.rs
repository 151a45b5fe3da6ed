//! Countdown state for a single timer entry

use serde::Serialize;

use super::timer_entry::{completion_message, format_remaining, TimerStatus};

/// Emitted once when a running countdown reaches zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub duration: u32,
}

impl Finished {
    pub fn message(&self) -> String {
        completion_message(self.duration)
    }
}

/// Whole-second countdown of one entry. Not tied to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    duration: u32,
    remaining_seconds: u64,
    running: bool,
}

impl Countdown {
    /// Fresh countdown loaded with the full duration
    pub fn new(duration: u32, status: TimerStatus) -> Self {
        Self {
            duration,
            remaining_seconds: u64::from(duration) * 60,
            running: status.is_running(),
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn status(&self) -> TimerStatus {
        if self.running {
            TimerStatus::Running
        } else {
            TimerStatus::Paused
        }
    }

    /// Whether another tick is due
    pub fn should_tick(&self) -> bool {
        self.running && self.remaining_seconds > 0
    }

    /// Decrement by one second. Reaching zero folds back into paused.
    pub fn tick(&mut self) -> Option<Finished> {
        if !self.should_tick() {
            return None;
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            self.running = false;
            return Some(Finished {
                duration: self.duration,
            });
        }
        None
    }

    /// Pause or resume. Resuming a spent countdown reloads the full duration.
    pub fn set_running(&mut self, running: bool) {
        if running && self.remaining_seconds == 0 {
            self.remaining_seconds = u64::from(self.duration) * 60;
        }
        self.running = running;
    }

    /// Reload the full duration and run, whatever the current state
    pub fn restart(&mut self) {
        self.remaining_seconds = u64::from(self.duration) * 60;
        self.running = true;
    }

    pub fn display(&self) -> String {
        format_remaining(self.remaining_seconds)
    }
}
