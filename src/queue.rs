//! Bounded FIFO of pending commands.
//!
//! [`CommandQueue`] is a fixed-capacity ring buffer. It performs no locking
//! itself; the chaser context wraps it in a mutex so every operation is
//! mutually exclusive with every other.

use crate::command::Command;
use crate::types::ChaserError;
use heapless::{Deque, Vec};

/// Fixed-capacity FIFO of direction commands.
///
/// Push and pop are O(1) and never allocate. A full queue is a normal
/// condition reported as [`ChaserError::QueueFull`].
///
/// # Type Parameters
/// * `N` - Maximum number of pending commands
#[derive(Debug, Clone)]
pub struct CommandQueue<const N: usize> {
    entries: Deque<Command, N>,
}

impl<const N: usize> CommandQueue<N> {
    /// Creates an empty queue.
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
        }
    }

    /// Appends a command at the back.
    pub fn push(&mut self, command: Command) -> Result<(), ChaserError> {
        self.entries
            .push_back(command)
            .map_err(|_| ChaserError::QueueFull { capacity: N })
    }

    /// Removes the oldest command.
    pub fn pop(&mut self) -> Option<Command> {
        self.entries.pop_front()
    }

    /// Copies the pending commands in dequeue order without removing them.
    pub fn snapshot(&self) -> Vec<Command, N> {
        let mut preview = Vec::new();
        for command in self.entries.iter() {
            // Same capacity on both sides, cannot overflow.
            let _ = preview.push(*command);
        }
        preview
    }

    /// Number of pending commands.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    /// Maximum number of pending commands.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drops every pending command.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<const N: usize> Default for CommandQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
