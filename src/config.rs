//! Chaser configuration and its builder.

use crate::sequence::ChaseWidth;
use crate::types::{ChaserError, DEFAULT_INTERVAL_MS};

/// Validated settings for a chaser instance.
///
/// Queue capacity is not part of the configuration; it is the `N` const
/// generic of the chaser types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChaserConfig {
    width: ChaseWidth,
    interval_ms: u32,
    dispatcher_name: &'static str,
    timer_name: &'static str,
}

impl ChaserConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ChaserConfigBuilder {
        ChaserConfigBuilder::new()
    }

    #[inline]
    pub fn width(&self) -> ChaseWidth {
        self.width
    }

    /// Interval in effect right after start.
    #[inline]
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Name given to the dispatcher worker thread.
    #[inline]
    pub fn dispatcher_name(&self) -> &'static str {
        self.dispatcher_name
    }

    /// Name given to the step timer thread.
    #[inline]
    pub fn timer_name(&self) -> &'static str {
        self.timer_name
    }
}

impl Default for ChaserConfig {
    fn default() -> Self {
        Self {
            width: ChaseWidth::default(),
            interval_ms: DEFAULT_INTERVAL_MS,
            dispatcher_name: "chaser-dispatcher",
            timer_name: "chaser-timer",
        }
    }
}

/// Builder for [`ChaserConfig`]. Validation happens in [`build`](Self::build).
#[derive(Debug)]
pub struct ChaserConfigBuilder {
    width: u8,
    interval_ms: u32,
    dispatcher_name: &'static str,
    timer_name: &'static str,
}

impl ChaserConfigBuilder {
    /// Creates a builder holding the defaults (10 outputs, 1000 ms).
    pub fn new() -> Self {
        let defaults = ChaserConfig::default();
        Self {
            width: defaults.width.get(),
            interval_ms: defaults.interval_ms,
            dispatcher_name: defaults.dispatcher_name,
            timer_name: defaults.timer_name,
        }
    }

    /// Sets the number of outputs (1 to 32).
    pub fn width(mut self, width: u8) -> Self {
        self.width = width;
        self
    }

    /// Sets the initial step interval in milliseconds.
    pub fn interval_ms(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    pub fn dispatcher_name(mut self, name: &'static str) -> Self {
        self.dispatcher_name = name;
        self
    }

    pub fn timer_name(mut self, name: &'static str) -> Self {
        self.timer_name = name;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    /// * `InvalidWidth` - Width is 0 or above 32
    /// * `InvalidInterval` - Interval is 0
    pub fn build(self) -> Result<ChaserConfig, ChaserError> {
        let width = ChaseWidth::new(self.width)?;
        if self.interval_ms == 0 {
            return Err(ChaserError::InvalidInterval);
        }

        Ok(ChaserConfig {
            width,
            interval_ms: self.interval_ms,
            dispatcher_name: self.dispatcher_name,
            timer_name: self.timer_name,
        })
    }
}

impl Default for ChaserConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
