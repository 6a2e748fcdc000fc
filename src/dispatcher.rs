//! The perpetual worker serializing command consumption.
//!
//! One dispatcher per chaser. Each iteration waits for a command, starts the
//! matching sequence, fires the first step immediately through the timer and
//! then waits for the step function to report completion. Both waits also
//! return when a stop is requested.

use crate::context::{ChaserCore, Wakeup};
use crate::port::OutputPort;
use crate::time::StepTimer;
use crate::types::DispatcherState;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

/// Runs the dispatcher loop on the current thread until a stop is requested.
///
/// A stop abandons the sequence in flight, if any, and leaves the remaining
/// queued commands untouched.
pub fn run<P, T, const N: usize>(core: &ChaserCore<P, N>, timer: &T)
where
    P: OutputPort,
    T: StepTimer + ?Sized,
{
    info!("dispatcher started");

    loop {
        core.set_dispatcher_state(DispatcherState::Idle);

        let command = match core.wait_for_command() {
            Wakeup::Ready(command) => command,
            Wakeup::Stop => break,
            Wakeup::Spurious => {
                trace!("dispatcher woke with an empty queue");
                continue;
            }
        };

        core.set_dispatcher_state(DispatcherState::Dispatching);
        debug!(%command, "dispatching sequence");
        if !core.begin_sequence(command) {
            warn!(%command, "previous sequence still active, not starting");
            continue;
        }
        timer.arm(0);

        core.set_dispatcher_state(DispatcherState::Running);
        if core.wait_for_completion() == Wakeup::Stop {
            debug!(%command, "sequence abandoned by stop request");
            break;
        }
    }

    core.set_dispatcher_state(DispatcherState::Stopped);
    info!("dispatcher stopped");
}

/// Spawns [`run`] on a named thread.
pub fn spawn<P, T, const N: usize>(
    name: &str,
    core: Arc<ChaserCore<P, N>>,
    timer: Arc<T>,
) -> std::io::Result<JoinHandle<()>>
where
    P: OutputPort + Send + 'static,
    T: StepTimer + Send + Sync + ?Sized + 'static,
{
    thread::Builder::new()
        .name(name.to_owned())
        .spawn(move || run(&core, &*timer))
}
