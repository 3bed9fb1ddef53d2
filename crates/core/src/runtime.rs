//! Wall-clock driver
//!
//! Runs [`DiveSimulation::pump`] on a background thread every poll interval,
//! reading "now" from a [`Clock`]. The simulation is shared behind a mutex so
//! commands from other threads interleave with pumps but never overlap them.

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info, trace};

use crate::core_types::time::Clock;
use crate::simulation::DiveSimulation;

/// Handle to the background pump thread; stops it when dropped
#[derive(Debug)]
pub struct RealtimeDriver {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RealtimeDriver {
    /// Start pumping `simulation` every `poll_interval`
    ///
    /// The poll interval should be well below the tick interval; the
    /// scheduler decides when a tick is actually due.
    ///
    /// # Errors
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(
        simulation: Arc<Mutex<DiveSimulation>>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> io::Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("dive-sim-driver".to_owned())
            .spawn(move || {
                info!(poll_ms = poll_interval.as_millis() as u64, "realtime driver started");
                loop {
                    match stop_rx.recv_timeout(poll_interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let now = clock.now();
                            let mut sim = simulation.lock().unwrap_or_else(PoisonError::into_inner);
                            let report = sim.pump(now);
                            trace!(at = %now, ticked = report.tick.is_some(), "pumped");
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("realtime driver stopped");
            })?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Whether the pump thread is still alive
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            // A full or closed channel means the thread is already stopping
            let _ = stop.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("realtime driver thread panicked");
            }
        }
    }
}

impl Drop for RealtimeDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
