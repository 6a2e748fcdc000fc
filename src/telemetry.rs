//! Read-only snapshot of the chaser state.
//!
//! Each field is read under its own exclusion, so a snapshot is consistent
//! per field but not across fields.

use crate::command::Command;
use crate::types::DispatcherState;
use core::fmt::{self, Write};
use heapless::Vec;

/// Values exposed to monitoring front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telemetry<const N: usize> {
    /// Step interval in milliseconds.
    pub interval_ms: u32,
    /// Index of the lit output while a sequence runs.
    pub current_position: Option<u8>,
    /// Sequences that reached completion since start.
    pub completed: u32,
    /// Pending commands, oldest first.
    pub queued: Vec<Command, N>,
    pub dispatcher: DispatcherState,
}

impl<const N: usize> Telemetry<N> {
    /// Number of pending commands.
    #[inline]
    pub fn queued_count(&self) -> usize {
        self.queued.len()
    }

    /// Writes the current position as an index, or `-1` when nothing runs.
    pub fn write_current_position<W: Write>(&self, out: &mut W) -> fmt::Result {
        match self.current_position {
            Some(index) => writeln!(out, "{}", index),
            None => writeln!(out, "-1"),
        }
    }

    /// Writes the pending commands, one token per line.
    pub fn write_preview<W: Write>(&self, out: &mut W) -> fmt::Result {
        for command in &self.queued {
            writeln!(out, "{}", command)?;
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Display for Telemetry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "interval: {}", self.interval_ms)?;
        write!(f, "current_led: ")?;
        self.write_current_position(f)?;
        writeln!(f, "completed_sequences: {}", self.completed)?;
        writeln!(f, "queued_sequences: {}", self.queued_count())?;
        writeln!(f, "dispatcher: {:?}", self.dispatcher)?;
        writeln!(f, "sequence:")?;
        self.write_preview(f)
    }
}
