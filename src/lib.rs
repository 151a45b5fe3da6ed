//! Egg Timer - A countdown timer board served over HTTP
//!
//! Three preset egg timers (3, 6 and 9 minutes) plus any number of custom
//! timers, each counting down on its own and announcing completion with a
//! message and a sound.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
