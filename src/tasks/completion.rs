//! Completion handling background task

use std::sync::Arc;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{error, info, warn};

use super::Completion;
use crate::state::AppState;

/// Show each completion on the board and play the completion sound once.
///
/// Takes a receiver subscribed before spawning so no early completion is missed.
pub async fn completion_task(state: Arc<AppState>, mut completions: Receiver<Completion>) {
    info!("Starting completion task");

    loop {
        match completions.recv().await {
            Ok(completion) => {
                match state.handle_completion(&completion) {
                    Ok(true) => state.sound.play(&state.sound_resource),
                    Ok(false) => {}
                    Err(e) => {
                        error!("Failed to record completion of {:?}: {}", completion.id, e);
                        state.sound.play(&state.sound_resource);
                    }
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Completion task lagged, {} completions dropped", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Completion channel closed, stopping completion task");
                break;
            }
        }
    }
}
