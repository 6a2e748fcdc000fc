//! Shared state of one chaser instance and the step function.
//!
//! [`ChaserCore`] owns the command queue, the sequence state (together with
//! the output port), the interval and the counters. It is shared by `Arc`
//! between callers, the dispatcher and the step timer. Queue, sequence and
//! interval are guarded independently and no code path holds two of them at
//! once.

use crate::ALL_OFF;
use crate::command::Command;
use crate::config::ChaserConfig;
use crate::interval::IntervalControl;
use crate::port::OutputPort;
use crate::queue::CommandQueue;
use crate::sequence::{ChaseSequence, ChaseWidth, Tick};
use crate::telemetry::Telemetry;
use crate::types::{ChaserError, DispatcherState, StepOutcome};
use heapless::Vec;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

/// Sequence state and the port it drives, locked as one unit.
///
/// The port is written only while this lock is held, so an output always
/// matches a complete sequence triple.
struct SequenceSlot<P> {
    sequence: ChaseSequence,
    port: P,
}

/// Why a dispatcher wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wakeup<T> {
    Ready(T),
    Stop,
    Spurious,
}

/// Explicit context object shared by callers, dispatcher and step timer.
///
/// # Type Parameters
/// * `P` - Output port implementation
/// * `N` - Command queue capacity
pub struct ChaserCore<P, const N: usize> {
    width: ChaseWidth,
    queue: Mutex<CommandQueue<N>>,
    queue_ready: Condvar,
    slot: Mutex<SequenceSlot<P>>,
    sequence_done: Condvar,
    interval: IntervalControl,
    completed: AtomicU32,
    stopping: AtomicBool,
    dispatcher_state: AtomicU8,
}

impl<P: OutputPort, const N: usize> ChaserCore<P, N> {
    /// Creates an idle context and turns every output off.
    pub fn new(config: &ChaserConfig, mut port: P) -> Self {
        port.write_pattern(ALL_OFF);

        Self {
            width: config.width(),
            queue: Mutex::new(CommandQueue::new()),
            queue_ready: Condvar::new(),
            slot: Mutex::new(SequenceSlot {
                sequence: ChaseSequence::idle(),
                port,
            }),
            sequence_done: Condvar::new(),
            interval: IntervalControl::new(config.interval_ms()).unwrap_or_default(),
            completed: AtomicU32::new(0),
            stopping: AtomicBool::new(false),
            dispatcher_state: AtomicU8::new(DispatcherState::Idle as u8),
        }
    }

    #[inline]
    pub fn width(&self) -> ChaseWidth {
        self.width
    }

    /// Queues a command and wakes the dispatcher.
    ///
    /// Never blocks beyond the queue lock. A full queue is rejected with
    /// [`ChaserError::QueueFull`].
    pub fn enqueue(&self, command: Command) -> Result<(), ChaserError> {
        let mut queue = self.queue.lock();
        queue.push(command)?;
        self.queue_ready.notify_one();
        Ok(())
    }

    /// Step function, called by the step timer on every firing.
    ///
    /// Writes the current pattern, then either advances it and asks for a
    /// re-arm with the current interval, or completes the sequence and wakes
    /// the dispatcher. Never blocks beyond the sequence lock and never logs.
    pub fn step(&self) -> StepOutcome {
        let mut slot = self.slot.lock();
        let SequenceSlot { sequence, port } = &mut *slot;

        if !sequence.is_active() {
            return StepOutcome::Idle;
        }

        port.write_pattern(sequence.pattern());

        match sequence.advance(self.width) {
            Tick::Advanced => StepOutcome::Rearm(self.interval.get()),
            Tick::Completed => {
                self.completed.fetch_add(1, Ordering::AcqRel);
                self.sequence_done.notify_all();
                StepOutcome::Completed
            }
        }
    }

    /// Starts a new sequence for `command` at its boundary bit.
    ///
    /// Returns `false` and leaves the running sequence untouched if one is
    /// still active.
    pub(crate) fn begin_sequence(&self, command: Command) -> bool {
        let mut slot = self.slot.lock();
        if slot.sequence.is_active() {
            return false;
        }
        slot.sequence = ChaseSequence::begin(command, self.width);
        true
    }

    /// Suspends until a command is queued or a stop is requested, then pops.
    pub(crate) fn wait_for_command(&self) -> Wakeup<Command> {
        let mut queue = self.queue.lock();
        while queue.is_empty() && !self.is_stopping() {
            self.queue_ready.wait(&mut queue);
        }

        if self.is_stopping() {
            return Wakeup::Stop;
        }

        match queue.pop() {
            Some(command) => Wakeup::Ready(command),
            None => Wakeup::Spurious,
        }
    }

    /// Suspends until the running sequence completes or a stop is requested.
    pub(crate) fn wait_for_completion(&self) -> Wakeup<()> {
        let mut slot = self.slot.lock();
        while slot.sequence.is_active() && !self.is_stopping() {
            self.sequence_done.wait(&mut slot);
        }

        if slot.sequence.is_active() {
            Wakeup::Stop
        } else {
            Wakeup::Ready(())
        }
    }

    /// Sets the stop flag and wakes both dispatcher suspension points.
    ///
    /// Each lock is taken on its own, after the flag is set, so a waiter
    /// either sees the flag before sleeping or receives the notification.
    pub fn request_stop(&self) {
        self.stopping.store(true, Ordering::Release);

        {
            let _queue = self.queue.lock();
            self.queue_ready.notify_all();
        }
        {
            let _slot = self.slot.lock();
            self.sequence_done.notify_all();
        }
    }

    #[inline]
    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    /// Drops any sequence state and turns every output off.
    ///
    /// Used at teardown once the timer can no longer fire.
    pub fn reset_output(&self) {
        let mut slot = self.slot.lock();
        slot.sequence = ChaseSequence::idle();
        slot.port.write_pattern(ALL_OFF);
    }

    pub(crate) fn set_dispatcher_state(&self, state: DispatcherState) {
        self.dispatcher_state.store(state as u8, Ordering::Release);
    }

    pub fn dispatcher_state(&self) -> DispatcherState {
        DispatcherState::from_u8(self.dispatcher_state.load(Ordering::Acquire))
    }

    pub fn interval(&self) -> &IntervalControl {
        &self.interval
    }

    /// Index of the lit output while a sequence is active.
    pub fn current_position(&self) -> Option<u8> {
        self.slot.lock().sequence.position(self.width)
    }

    /// Copy of the sequence triple, read atomically.
    pub fn sequence(&self) -> ChaseSequence {
        self.slot.lock().sequence
    }

    pub fn completed_count(&self) -> u32 {
        self.completed.load(Ordering::Acquire)
    }

    pub fn queued_count(&self) -> usize {
        self.queue.lock().len()
    }

    /// Pending commands, oldest first, without removing them.
    pub fn queued_preview(&self) -> Vec<Command, N> {
        self.queue.lock().snapshot()
    }

    /// Gathers every read-only value. Each one is taken under its own lock.
    pub fn telemetry(&self) -> Telemetry<N> {
        Telemetry {
            interval_ms: self.interval.get(),
            current_position: self.current_position(),
            completed: self.completed_count(),
            queued: self.queued_preview(),
            dispatcher: self.dispatcher_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedPort(Arc<Mutex<std::vec::Vec<u32>>>);

    impl OutputPort for SharedPort {
        fn write_pattern(&mut self, pattern: u32) {
            self.0.lock().push(pattern);
        }
    }

    fn core() -> (ChaserCore<SharedPort, 4>, SharedPort) {
        let port = SharedPort::default();
        let core = ChaserCore::new(&ChaserConfig::default(), port.clone());
        (core, port)
    }

    #[test]
    fn new_core_is_idle_and_dark() {
        let (core, port) = core();
        assert_eq!(*port.0.lock(), vec![0]);
        assert_eq!(core.current_position(), None);
        assert_eq!(core.completed_count(), 0);
        assert_eq!(core.dispatcher_state(), DispatcherState::Idle);
        assert_eq!(core.interval().get(), 1000);
    }

    #[test]
    fn step_without_sequence_does_nothing() {
        let (core, port) = core();
        assert_eq!(core.step(), StepOutcome::Idle);
        assert_eq!(*port.0.lock(), vec![0]);
    }

    #[test]
    fn step_writes_before_advancing() {
        let (core, port) = core();
        core.begin_sequence(Command::Forward);
        assert_eq!(core.current_position(), Some(0));

        assert_eq!(core.step(), StepOutcome::Rearm(1000));
        assert_eq!(port.0.lock().last(), Some(&1));
        assert_eq!(core.current_position(), Some(1));
    }

    #[test]
    fn completion_counts_once() {
        let (core, _port) = core();
        core.begin_sequence(Command::Backward);
        let mut rearms = 0;
        while core.step() != StepOutcome::Completed {
            rearms += 1;
        }
        assert_eq!(rearms, 10);
        assert_eq!(core.completed_count(), 1);
        assert_eq!(core.step(), StepOutcome::Idle);
        assert_eq!(core.completed_count(), 1);
    }

    #[test]
    fn queue_full_is_reported_with_capacity() {
        let (core, _port) = core();
        for _ in 0..4 {
            core.enqueue(Command::Forward).unwrap();
        }
        assert_eq!(
            core.enqueue(Command::Backward),
            Err(ChaserError::QueueFull { capacity: 4 })
        );
        assert_eq!(core.queued_count(), 4);
    }

    #[test]
    fn stop_wakes_waiters_immediately() {
        let (core, _port) = core();
        core.request_stop();
        assert_eq!(core.wait_for_command(), Wakeup::Stop);

        core.begin_sequence(Command::Forward);
        assert_eq!(core.wait_for_completion(), Wakeup::Stop);
    }

    #[test]
    fn begin_refuses_while_sequence_is_active() {
        let (core, _port) = core();
        assert!(core.begin_sequence(Command::Forward));
        core.step();
        core.step();
        assert_eq!(core.current_position(), Some(2));

        assert!(!core.begin_sequence(Command::Backward));
        assert_eq!(core.sequence().direction(), Command::Forward);
        assert_eq!(core.current_position(), Some(2));

        while core.step() != StepOutcome::Completed {}
        assert!(core.begin_sequence(Command::Backward));
        assert_eq!(core.current_position(), Some(9));
    }

    #[test]
    fn reset_output_clears_sequence() {
        let (core, port) = core();
        core.begin_sequence(Command::Forward);
        core.step();
        core.reset_output();

        assert!(!core.sequence().is_active());
        assert_eq!(core.current_position(), None);
        assert_eq!(port.0.lock().last(), Some(&0));
    }
}
