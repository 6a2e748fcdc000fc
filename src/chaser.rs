//! Lifecycle handle tying the context, the dispatcher and the step timer together.
//!
//! Provides [`Chaser`], the object front ends talk to: it queues commands,
//! exposes interval control and telemetry, and owns the two worker threads
//! between [`Chaser::start`] and [`Chaser::stop`].

use crate::command::Command;
use crate::config::ChaserConfig;
use crate::context::ChaserCore;
use crate::dispatcher;
use crate::port::OutputPort;
use crate::telemetry::Telemetry;
use crate::time::StepTimer;
use crate::timer::ThreadTimer;
use crate::types::{ChaserError, DEFAULT_QUEUE_CAPACITY, DispatcherState};
use heapless::Vec;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{error, info, warn};

/// A running chaser: command queue, dispatcher worker and step timer.
///
/// # Type Parameters
/// * `P` - Output port implementation, moved into the chaser
/// * `N` - Command queue capacity
pub struct Chaser<P: OutputPort + Send + 'static, const N: usize = DEFAULT_QUEUE_CAPACITY> {
    core: Arc<ChaserCore<P, N>>,
    timer: Arc<ThreadTimer>,
    dispatcher: Option<JoinHandle<()>>,
}

impl<P: OutputPort + Send + 'static, const N: usize> Chaser<P, N> {
    /// Turns every output off and starts the step timer and dispatcher threads.
    ///
    /// # Errors
    /// * `SpawnFailed` - A worker thread could not be created
    pub fn start(config: ChaserConfig, port: P) -> Result<Self, ChaserError> {
        let core = Arc::new(ChaserCore::new(&config, port));

        let step_core = core.clone();
        let timer = ThreadTimer::spawn(config.timer_name(), move || step_core.step())
            .map_err(|err| {
                error!(%err, "failed to spawn step timer");
                ChaserError::SpawnFailed
            })?;
        let timer = Arc::new(timer);

        let handle = dispatcher::spawn(config.dispatcher_name(), core.clone(), timer.clone())
            .map_err(|err| {
                error!(%err, "failed to spawn dispatcher");
                timer.shutdown();
                ChaserError::SpawnFailed
            })?;

        info!(
            width = config.width().get(),
            interval_ms = config.interval_ms(),
            capacity = N,
            "chaser ready"
        );

        Ok(Self {
            core,
            timer,
            dispatcher: Some(handle),
        })
    }

    /// Queues a command for the dispatcher.
    ///
    /// # Errors
    /// * `QueueFull` - `N` commands are already pending
    pub fn enqueue(&self, command: Command) -> Result<(), ChaserError> {
        self.core.enqueue(command).inspect_err(|_| {
            warn!(%command, capacity = N, "command queue full");
        })
    }

    /// Front-end write path: parses a raw write and queues the command.
    ///
    /// Returns the number of bytes consumed.
    ///
    /// # Errors
    /// * `InvalidCommand` - Not `"up"`/`"down"` (optionally newline-terminated)
    /// * `QueueFull` - `N` commands are already pending
    pub fn write(&self, bytes: &[u8]) -> Result<usize, ChaserError> {
        let command = Command::from_bytes(bytes).inspect_err(|_| {
            warn!(input = %String::from_utf8_lossy(bytes).escape_debug(), "invalid command");
        })?;
        self.enqueue(command)?;
        Ok(bytes.len())
    }

    /// Current step interval in milliseconds.
    pub fn interval(&self) -> u32 {
        self.core.interval().get()
    }

    /// Sets the step interval. Applies from the next timer arm on.
    ///
    /// # Errors
    /// * `InvalidInterval` - `millis` is zero
    pub fn set_interval(&self, millis: u32) -> Result<(), ChaserError> {
        self.core.interval().set(millis).inspect_err(|_| {
            warn!(millis, "rejected interval");
        })
    }

    /// Parses and applies a textual interval, as written to an attribute file.
    pub fn store_interval(&self, text: &str) -> Result<u32, ChaserError> {
        self.core.interval().set_from_str(text).inspect_err(|_| {
            warn!(input = %text.escape_debug(), "rejected interval");
        })
    }

    /// Index of the lit output while a sequence runs.
    pub fn current_position(&self) -> Option<u8> {
        self.core.current_position()
    }

    pub fn completed_count(&self) -> u32 {
        self.core.completed_count()
    }

    pub fn queued_count(&self) -> usize {
        self.core.queued_count()
    }

    /// Pending commands, oldest first.
    pub fn queued_preview(&self) -> Vec<Command, N> {
        self.core.queued_preview()
    }

    pub fn dispatcher_state(&self) -> DispatcherState {
        self.core.dispatcher_state()
    }

    pub fn telemetry(&self) -> Telemetry<N> {
        self.core.telemetry()
    }

    /// Shared context, for callers that drive their own front end.
    pub fn core(&self) -> &Arc<ChaserCore<P, N>> {
        &self.core
    }

    /// True once [`stop`](Self::stop) has run.
    pub fn is_stopped(&self) -> bool {
        self.dispatcher.is_none()
    }

    /// Stops the chaser and turns every output off.
    ///
    /// The dispatcher exits without servicing queued commands, a sequence in
    /// flight is abandoned (not counted as completed), the timer is cancelled
    /// synchronously and the output is reset. Calling it again does nothing.
    pub fn stop(&mut self) {
        let Some(handle) = self.dispatcher.take() else {
            return;
        };

        self.core.request_stop();
        if handle.join().is_err() {
            error!("dispatcher thread panicked");
        }

        self.timer.cancel();
        self.timer.shutdown();
        self.core.reset_output();

        info!(
            completed = self.core.completed_count(),
            abandoned_commands = self.core.queued_count(),
            "chaser stopped"
        );
    }
}

impl<P: OutputPort + Send + 'static, const N: usize> Drop for Chaser<P, N> {
    fn drop(&mut self) {
        self.stop();
    }
}
