//! Single-lit-position chase state and its advance rule.

use crate::command::Command;
use crate::types::{ChaserError, DEFAULT_WIDTH};

/// Number of outputs a chase walks across (1 to 32).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChaseWidth(u8);

impl ChaseWidth {
    /// Largest supported width, one output per bit of a `u32` pattern.
    pub const MAX: u8 = 32;

    /// Validates a width.
    pub const fn new(width: u8) -> Result<Self, ChaserError> {
        if width == 0 || width > Self::MAX {
            return Err(ChaserError::InvalidWidth(width));
        }
        Ok(Self(width))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Pattern with only the highest output lit.
    #[inline]
    pub const fn top_bit(self) -> u32 {
        1 << (self.0 - 1)
    }

    /// True if `pattern` lights exactly one output inside this width.
    ///
    /// Patterns only ever hold a single bit, so the range test is enough.
    #[inline]
    pub const fn contains(self, pattern: u32) -> bool {
        pattern > 0 && pattern <= self.top_bit()
    }

    /// Pattern a sequence starts from for the given direction.
    #[inline]
    pub const fn start_pattern(self, direction: Command) -> u32 {
        match direction {
            Command::Forward => 1,
            Command::Backward => self.top_bit(),
        }
    }
}

impl Default for ChaseWidth {
    fn default() -> Self {
        Self(DEFAULT_WIDTH)
    }
}

/// Whether a step kept the sequence going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// Pattern shifted, another step follows.
    Advanced,
    /// The pattern just written was out of range; the sequence is over.
    Completed,
}

/// The `{pattern, direction, active}` triple of the running animation.
///
/// While active, `pattern` holds exactly one set bit inside the width, or the
/// first out-of-range value right after the last valid step (detected on the
/// next step). Once inactive it keeps that terminal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChaseSequence {
    pattern: u32,
    direction: Command,
    active: bool,
}

impl ChaseSequence {
    /// Inactive state with every output off.
    pub const fn idle() -> Self {
        Self {
            pattern: 0,
            direction: Command::Forward,
            active: false,
        }
    }

    /// Active sequence at the boundary bit for `direction`.
    pub const fn begin(direction: Command, width: ChaseWidth) -> Self {
        Self {
            pattern: width.start_pattern(direction),
            direction,
            active: true,
        }
    }

    /// Pattern to output on the next step.
    #[inline]
    pub fn pattern(&self) -> u32 {
        self.pattern
    }

    #[inline]
    pub fn direction(&self) -> Command {
        self.direction
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Zero-based index of the lit output while active.
    pub fn position(&self, width: ChaseWidth) -> Option<u8> {
        if !self.active || !width.contains(self.pattern) {
            return None;
        }
        Some(self.pattern.trailing_zeros() as u8)
    }

    /// Decides what follows the pattern that was just written.
    ///
    /// In range: shift one bit in the sequence's direction for the next step.
    /// Out of range: mark the sequence inactive.
    pub fn advance(&mut self, width: ChaseWidth) -> Tick {
        if width.contains(self.pattern) {
            self.pattern = match self.direction {
                // 1 << 31 shifts to 0, which is out of range as well
                Command::Forward => self.pattern << 1,
                Command::Backward => self.pattern >> 1,
            };
            Tick::Advanced
        } else {
            self.active = false;
            Tick::Completed
        }
    }
}

impl Default for ChaseSequence {
    fn default() -> Self {
        Self::idle()
    }
}
