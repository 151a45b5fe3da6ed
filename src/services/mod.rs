//! External collaborators
//!
//! Currently only the sound played when a countdown finishes.

pub mod sound;

pub use sound::*;
