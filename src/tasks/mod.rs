//! Background tasks module
//!
//! One countdown loop per shown timer, plus the task reacting to completions.

pub mod completion;
pub mod countdown_engine;

// Re-export main types and functions
pub use completion::completion_task;
pub use countdown_engine::{Completion, CountdownEngine, TICK};
