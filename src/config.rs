//! Configuration and CLI argument handling

use std::sync::Arc;
use clap::Parser;

use crate::services::{CommandSoundPlayer, SilentSoundPlayer, SoundPlayer};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "egg-timer")]
#[command(about = "A countdown timer board with preset egg timers, served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Program used to play the completion sound
    #[arg(long, default_value = "paplay")]
    pub sound_command: String,

    /// Sound resource passed to the player when a timer finishes
    #[arg(long, default_value = "sounds/timer_finished.ogg")]
    pub sound_file: String,

    /// Do not play any sound on completion
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Sound collaborator selected by the flags
    pub fn sound_player(&self) -> Arc<dyn SoundPlayer> {
        if self.mute {
            Arc::new(SilentSoundPlayer)
        } else {
            Arc::new(CommandSoundPlayer::new(self.sound_command.clone()))
        }
    }
}
