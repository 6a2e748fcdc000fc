//! Core types shared by the queue, the step function and the dispatcher.

/// Number of outputs driven by a chase when no width is configured.
pub const DEFAULT_WIDTH: u8 = 10;

/// Per-step delay used until an interval is set explicitly.
pub const DEFAULT_INTERVAL_MS: u32 = 1000;

/// Command queue capacity used by [`Chaser`](crate::Chaser) when `N` is not given.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Result of one step timer firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// Pattern was written and advanced. Fire again after this many milliseconds.
    Rearm(u32),

    /// Pattern left the valid range. The sequence is finished and the timer stays disarmed.
    Completed,

    /// No sequence was active, nothing was written.
    Idle,
}

impl StepOutcome {
    /// Delay until the next firing, if the timer has to be re-armed.
    #[inline]
    pub fn next_delay(self) -> Option<u32> {
        match self {
            StepOutcome::Rearm(ms) => Some(ms),
            StepOutcome::Completed | StepOutcome::Idle => None,
        }
    }
}

/// What the dispatcher worker is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DispatcherState {
    /// Waiting for a command.
    Idle = 0,

    /// Popped a command, initializing the sequence and arming the timer.
    Dispatching = 1,

    /// Waiting for the current sequence to complete.
    Running = 2,

    /// Worker has exited.
    Stopped = 3,
}

impl DispatcherState {
    /// Decodes a value stored with `as u8`. Unknown values map to `Stopped`.
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            0 => DispatcherState::Idle,
            1 => DispatcherState::Dispatching,
            2 => DispatcherState::Running,
            _ => DispatcherState::Stopped,
        }
    }
}

/// Errors reported synchronously at the chaser's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChaserError {
    /// The command queue already holds `capacity` commands.
    QueueFull {
        /// Queue capacity
        capacity: usize,
    },

    /// Interval is zero or could not be parsed.
    InvalidInterval,

    /// Input is not one of the recognized command tokens.
    InvalidCommand,

    /// Width must be between 1 and 32 outputs.
    InvalidWidth(u8),

    /// A worker thread could not be spawned.
    SpawnFailed,
}

impl core::fmt::Display for ChaserError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ChaserError::QueueFull { capacity } => {
                write!(f, "command queue is full ({} commands pending)", capacity)
            }
            ChaserError::InvalidInterval => {
                write!(f, "interval must be a positive number of milliseconds")
            }
            ChaserError::InvalidCommand => {
                write!(f, "invalid command (expected \"up\" or \"down\")")
            }
            ChaserError::InvalidWidth(width) => {
                write!(f, "width {} is out of range (1..=32)", width)
            }
            ChaserError::SpawnFailed => {
                write!(f, "failed to spawn worker thread")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChaserError {}
