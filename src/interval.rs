//! Per-step delay, readable and writable from any context.

use crate::types::{ChaserError, DEFAULT_INTERVAL_MS};
use core::sync::atomic::{AtomicU32, Ordering};

/// Step interval in milliseconds, guarded independently of every other lock.
///
/// The step timer samples it each time it re-arms, so a new value applies to
/// the next arm and never to a firing that is already scheduled.
#[derive(Debug)]
pub struct IntervalControl {
    millis: AtomicU32,
}

impl IntervalControl {
    /// Creates a control holding `millis`, rejecting zero.
    pub const fn new(millis: u32) -> Result<Self, ChaserError> {
        if millis == 0 {
            return Err(ChaserError::InvalidInterval);
        }
        Ok(Self {
            millis: AtomicU32::new(millis),
        })
    }

    /// Current interval in milliseconds.
    #[inline]
    pub fn get(&self) -> u32 {
        self.millis.load(Ordering::Acquire)
    }

    /// Replaces the interval. Zero is rejected and leaves the value unchanged.
    pub fn set(&self, millis: u32) -> Result<(), ChaserError> {
        if millis == 0 {
            return Err(ChaserError::InvalidInterval);
        }
        self.millis.store(millis, Ordering::Release);
        Ok(())
    }

    /// Parses and applies a textual interval (see [`parse_interval`]).
    pub fn set_from_str(&self, text: &str) -> Result<u32, ChaserError> {
        let millis = parse_interval(text)?;
        self.set(millis)?;
        Ok(millis)
    }
}

impl Default for IntervalControl {
    fn default() -> Self {
        Self {
            millis: AtomicU32::new(DEFAULT_INTERVAL_MS),
        }
    }
}

/// Parses milliseconds with C-style base detection: `0x` hexadecimal,
/// leading `0` octal, decimal otherwise.
///
/// Surrounding whitespace (such as the trailing newline of an attribute
/// write) and a single leading `+` are ignored. Zero is rejected.
pub fn parse_interval(text: &str) -> Result<u32, ChaserError> {
    let text = text.trim();
    let text = text.strip_prefix('+').unwrap_or(text);
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    // from_str_radix would accept a sign after the prefix.
    if !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ChaserError::InvalidInterval);
    }

    match u32::from_str_radix(digits, radix) {
        Ok(0) | Err(_) => Err(ChaserError::InvalidInterval),
        Ok(millis) => Ok(millis),
    }
}
