//! Timer abstraction used by the dispatcher to start a sequence.

/// A one-shot, re-armable timer that drives the step function.
///
/// The driver owning the timer invokes the chaser's step function when the
/// deadline expires and re-arms itself with the delay the step returns.
pub trait StepTimer {
    /// Schedules the next firing `delay_ms` milliseconds from now, replacing
    /// any pending deadline. A zero delay fires as soon as possible.
    fn arm(&self, delay_ms: u32);

    /// Cancels any pending firing and waits for a firing in progress to
    /// finish. After this returns nothing is scheduled.
    fn cancel(&self);
}

impl<T: StepTimer + ?Sized> StepTimer for &T {
    fn arm(&self, delay_ms: u32) {
        (**self).arm(delay_ms);
    }

    fn cancel(&self) {
        (**self).cancel();
    }
}
