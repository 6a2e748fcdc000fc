//! Step timer backed by a dedicated thread.
//!
//! [`ThreadTimer`] keeps at most one pending deadline. When it expires the
//! timer thread runs the step callback with the timer lock released, then
//! re-arms itself with the delay the callback returned. Firings are totally
//! ordered because a single thread performs them.

use crate::time::StepTimer;
use crate::types::StepOutcome;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace};

#[derive(Debug, Default)]
struct TimerState {
    deadline: Option<Instant>,
    firing: bool,
    /// Bumped by `cancel` so a firing in progress does not re-arm.
    generation: u64,
    shutdown: bool,
}

#[derive(Debug, Default)]
struct TimerShared {
    state: Mutex<TimerState>,
    wake: Condvar,
}

/// One-shot re-armable timer running its callback on its own thread.
pub struct ThreadTimer {
    shared: Arc<TimerShared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ThreadTimer {
    /// Spawns the timer thread. Nothing fires until [`arm`](StepTimer::arm).
    pub fn spawn<F>(name: &str, callback: F) -> std::io::Result<Self>
    where
        F: FnMut() -> StepOutcome + Send + 'static,
    {
        let shared = Arc::new(TimerShared::default());
        let worker_shared = shared.clone();

        let worker = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || timer_loop(&worker_shared, callback))?;

        Ok(Self {
            shared,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// True while a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.shared.state.lock().deadline.is_some()
    }

    /// Cancels any firing and stops the timer thread. Later arms are ignored.
    pub fn shutdown(&self) {
        {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
            state.deadline = None;
            state.generation += 1;
            self.shared.wake.notify_all();
        }

        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                error!("step timer thread panicked");
            }
        }
    }
}

impl StepTimer for ThreadTimer {
    fn arm(&self, delay_ms: u32) {
        let mut state = self.shared.state.lock();
        if state.shutdown {
            return;
        }
        state.deadline = Some(Instant::now() + Duration::from_millis(u64::from(delay_ms)));
        self.shared.wake.notify_all();
    }

    fn cancel(&self) {
        let mut state = self.shared.state.lock();
        state.deadline = None;
        state.generation += 1;
        while state.firing {
            self.shared.wake.wait(&mut state);
        }
    }
}

impl Drop for ThreadTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn timer_loop<F>(shared: &TimerShared, mut callback: F)
where
    F: FnMut() -> StepOutcome,
{
    info!("step timer started");
    let mut state = shared.state.lock();

    loop {
        if state.shutdown {
            break;
        }

        let deadline = state.deadline;
        match deadline {
            None => shared.wake.wait(&mut state),
            Some(deadline) if Instant::now() < deadline => {
                shared.wake.wait_until(&mut state, deadline);
            }
            Some(_) => fire(shared, &mut state, &mut callback),
        }
    }

    info!("step timer stopped");
}

fn fire<F>(shared: &TimerShared, state: &mut MutexGuard<'_, TimerState>, callback: &mut F)
where
    F: FnMut() -> StepOutcome,
{
    state.deadline = None;
    state.firing = true;
    let generation = state.generation;

    let outcome = MutexGuard::unlocked(state, callback);

    state.firing = false;
    if let Some(delay_ms) = outcome.next_delay() {
        // An arm or cancel that raced with this firing takes precedence.
        if state.generation == generation && !state.shutdown && state.deadline.is_none() {
            state.deadline = Some(Instant::now() + Duration::from_millis(u64::from(delay_ms)));
        }
    }
    shared.wake.notify_all();

    match outcome {
        StepOutcome::Rearm(delay_ms) => trace!(delay_ms, "step fired"),
        StepOutcome::Completed => debug!("sequence completed"),
        StepOutcome::Idle => trace!("step fired with no active sequence"),
    }
}
