//! Shared test infrastructure for led-chaser integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use led_chaser::{OutputPort, StepTimer};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ============================================================================
// Mock Output Port
// ============================================================================

/// Output port that records every written pattern. Clones share the history.
#[derive(Clone, Default)]
pub struct RecordingPort {
    history: Arc<Mutex<Vec<u32>>>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<u32> {
        self.history.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<u32> {
        self.history.lock().unwrap().last().copied()
    }

    /// Patterns written after the initial all-off write.
    pub fn steps(&self) -> Vec<u32> {
        self.history().into_iter().skip(1).collect()
    }
}

impl OutputPort for RecordingPort {
    fn write_pattern(&mut self, pattern: u32) {
        self.history.lock().unwrap().push(pattern);
    }
}

// ============================================================================
// Mock Step Timer
// ============================================================================

/// Timer that never fires by itself; it records arms for the test to act on.
#[derive(Default)]
pub struct ManualTimer {
    arms: Mutex<Vec<u32>>,
    cancels: Mutex<usize>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arms(&self) -> Vec<u32> {
        self.arms.lock().unwrap().clone()
    }

    pub fn cancels(&self) -> usize {
        *self.cancels.lock().unwrap()
    }
}

impl StepTimer for ManualTimer {
    fn arm(&self, delay_ms: u32) {
        self.arms.lock().unwrap().push(delay_ms);
    }

    fn cancel(&self) {
        *self.cancels.lock().unwrap() += 1;
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Upper bound for anything the tests wait on.
pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// Polls `condition` until it holds or [`WAIT_LIMIT`] passes.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT_LIMIT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}

/// Patterns one full forward chase writes over `width` outputs.
pub fn forward_patterns(width: u8) -> Vec<u32> {
    (0..=u32::from(width)).map(|bit| 1u32.checked_shl(bit).unwrap_or(0)).collect()
}

/// Patterns one full backward chase writes over `width` outputs.
pub fn backward_patterns(width: u8) -> Vec<u32> {
    let mut patterns: Vec<u32> = (0..u32::from(width)).rev().map(|bit| 1 << bit).collect();
    patterns.push(0);
    patterns
}
