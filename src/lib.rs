#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Command`**: Direction of one chase (`Forward` = `"up"`, `Backward` = `"down"`)
//! - **`CommandQueue`**: Bounded FIFO of pending commands with a non-destructive snapshot
//! - **`ChaseSequence`**: The `{pattern, direction, active}` triple of the running chase
//! - **`ChaseWidth`**: Number of outputs a chase walks across
//! - **`IntervalControl`**: Per-step delay, sampled each time the step timer re-arms
//! - **`OutputPort`**: Trait to implement for your LED register
//! - **`StepTimer`**: Trait for the re-armable one-shot timer driving steps
//! - **`ChaserCore`**: Shared context owning queue, sequence, interval and counters (`std`)
//! - **`Chaser`**: Lifecycle handle running the dispatcher and step timer threads (`std`)
//!
//! Without the `std` feature only the allocation-free building blocks are
//! available; the threaded runtime requires `std`.

pub mod command;
pub mod config;
pub mod interval;
pub mod port;
pub mod queue;
pub mod sequence;
pub mod telemetry;
pub mod time;
pub mod types;

#[cfg(feature = "std")]
pub mod chaser;
#[cfg(feature = "std")]
pub mod context;
#[cfg(feature = "std")]
pub mod dispatcher;
#[cfg(feature = "std")]
pub mod timer;

pub use command::{Command, MAX_COMMAND_LEN};
pub use config::{ChaserConfig, ChaserConfigBuilder};
pub use interval::{IntervalControl, parse_interval};
pub use port::OutputPort;
pub use queue::CommandQueue;
pub use sequence::{ChaseSequence, ChaseWidth, Tick};
pub use telemetry::Telemetry;
pub use time::StepTimer;
pub use types::{
    ChaserError, DEFAULT_INTERVAL_MS, DEFAULT_QUEUE_CAPACITY, DEFAULT_WIDTH, DispatcherState,
    StepOutcome,
};

#[cfg(feature = "std")]
pub use chaser::Chaser;
#[cfg(feature = "std")]
pub use context::ChaserCore;
#[cfg(feature = "std")]
pub use timer::ThreadTimer;

/// Pattern with every output off.
pub const ALL_OFF: u32 = 0;
