//! Completion sound playback

use std::fmt::Debug;
#[cfg(test)]
use std::sync::{Arc, Mutex};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Plays a sound resource once. Fire-and-forget: implementations never report
/// failures back to the caller.
pub trait SoundPlayer: Debug + Send + Sync {
    fn play(&self, resource: &str);
}

/// Plays sounds by running an external player program, e.g. `paplay <file>`
#[derive(Debug, Clone)]
pub struct CommandSoundPlayer {
    program: String,
}

impl CommandSoundPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SoundPlayer for CommandSoundPlayer {
    fn play(&self, resource: &str) {
        let program = self.program.clone();
        let resource = resource.to_string();

        // The child is reaped by the detached task once playback ends
        tokio::spawn(async move {
            debug!("Playing {} with {}", resource, program);
            match Command::new(&program).arg(&resource).output().await {
                Ok(output) if output.status.success() => {
                    debug!("Finished playing {}", resource);
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!("{} failed to play {}: {}", program, resource, stderr.trim());
                }
                Err(e) => warn!("Failed to execute {}: {}", program, e),
            }
        });
    }
}

/// Player used when sound is muted
#[derive(Debug, Clone, Default)]
pub struct SilentSoundPlayer;

impl SoundPlayer for SilentSoundPlayer {
    fn play(&self, resource: &str) {
        debug!("Sound muted, skipping {}", resource);
    }
}

/// Remembers every resource it was asked to play
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingSoundPlayer {
    played: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl RecordingSoundPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<String> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl SoundPlayer for RecordingSoundPlayer {
    fn play(&self, resource: &str) {
        if let Ok(mut played) = self.played.lock() {
            played.push(resource.to_string());
        }
    }
}

/// Check that the player program can be executed at all
pub async fn check_sound_command_available(program: &str) -> Result<(), String> {
    Command::new(program)
        .arg("--version")
        .output()
        .await
        .map_err(|e| format!("{} is not available ({}), completion sounds will fail", program, e))?;

    info!("{} is available for completion sounds", program);
    Ok(())
}
