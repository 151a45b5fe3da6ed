//! Utility functions module
//!
//! Shutdown signal handling and coercion of numeric text input.

pub mod input;
pub mod signals;

pub use input::{coerce_minutes, parse_minutes};
pub use signals::shutdown_signal;
