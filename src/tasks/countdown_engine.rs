//! Per-entry countdown background task

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
    time::sleep,
};
use tracing::{debug, info, warn};

use crate::state::{Countdown, EntryId, TimerEntry};

/// Delay armed before every decrement
pub const TICK: Duration = Duration::from_millis(1000);

/// Raised by an engine when its countdown reaches zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: EntryId,
    pub duration: u32,
    pub message: String,
}

/// Countdown plus a counter bumped by every command. A tick only lands if no
/// command arrived since its delay was armed.
#[derive(Debug, Clone, Copy)]
struct EngineState {
    countdown: Countdown,
    generation: u64,
}

/// Handle to the countdown loop bound to one entry.
///
/// Commands are applied here, under the watch lock, so readers see them at
/// once; the loop is only woken to re-arm its delay. Dropping the handle
/// aborts the loop, which is how removed or replaced entries stop ticking.
#[derive(Debug)]
pub struct CountdownEngine {
    id: EntryId,
    state: Arc<watch::Sender<EngineState>>,
    wake: mpsc::UnboundedSender<()>,
    task: JoinHandle<()>,
}

impl CountdownEngine {
    /// Spawn the loop for `entry`, starting in the entry's status
    pub fn spawn(entry: &TimerEntry, completions: broadcast::Sender<Completion>) -> Self {
        let (state, _) = watch::channel(EngineState {
            countdown: Countdown::new(entry.duration, entry.status),
            generation: 0,
        });
        let state = Arc::new(state);
        let (wake, wake_rx) = mpsc::unbounded_channel();

        debug!("Spawning countdown engine for {:?} ({} min)", entry.id, entry.duration);
        let task = tokio::spawn(run_countdown(
            entry.id,
            Arc::clone(&state),
            wake_rx,
            completions,
        ));

        Self {
            id: entry.id,
            state,
            wake,
            task,
        }
    }

    /// Current countdown state, including every command sent so far
    pub fn countdown(&self) -> Countdown {
        self.state.borrow().countdown
    }

    pub fn set_running(&self, running: bool) {
        self.apply(|countdown| countdown.set_running(running));
    }

    pub fn restart(&self) {
        self.apply(Countdown::restart);
    }

    fn apply(&self, command: impl FnOnce(&mut Countdown)) {
        self.state.send_modify(|state| {
            command(&mut state.countdown);
            state.generation += 1;
        });
        if let Err(e) = self.wake.send(()) {
            warn!("Countdown engine {:?} is gone: {}", self.id, e);
        }
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        debug!("Cancelling countdown engine for {:?}", self.id);
        self.task.abort();
    }
}

async fn run_countdown(
    id: EntryId,
    state: Arc<watch::Sender<EngineState>>,
    mut wake: mpsc::UnboundedReceiver<()>,
    completions: broadcast::Sender<Completion>,
) {
    loop {
        let armed = *state.borrow();

        let woken = if armed.countdown.should_tick() {
            // A command arriving mid-wait drops the pending tick and re-arms it
            tokio::select! {
                _ = sleep(TICK) => {
                    let mut finished = None;
                    state.send_if_modified(|current| {
                        if current.generation != armed.generation {
                            return false;
                        }
                        finished = current.countdown.tick();
                        true
                    });

                    if let Some(done) = finished {
                        info!("Countdown {:?} of {} min finished", id, done.duration);
                        let completion = Completion {
                            id,
                            duration: done.duration,
                            message: done.message(),
                        };
                        if let Err(e) = completions.send(completion) {
                            warn!("No listener for completion of {:?}: {}", id, e);
                        }
                    }
                    continue;
                }
                woken = wake.recv() => woken,
            }
        } else {
            wake.recv().await
        };

        if woken.is_none() {
            break;
        }
        debug!("Countdown {:?} re-armed", id);
    }

    debug!("Countdown engine for {:?} stopped", id);
}
