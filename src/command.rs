//! Direction commands and the textual front end that produces them.

use crate::types::ChaserError;

/// Longest write the front end accepts, newline included.
pub const MAX_COMMAND_LEN: usize = 15;

/// Direction of one chase sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start at bit 0 and shift left (`"up"`).
    Forward,
    /// Start at the highest bit and shift right (`"down"`).
    Backward,
}

impl Command {
    /// Token accepted and printed for this command.
    pub fn token(self) -> &'static str {
        match self {
            Command::Forward => "up",
            Command::Backward => "down",
        }
    }

    /// Parses a raw write.
    ///
    /// Accepts `"up"` or `"down"`, optionally followed by a single `'\n'`.
    /// Writes longer than [`MAX_COMMAND_LEN`] and non-UTF-8 input are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChaserError> {
        if bytes.len() > MAX_COMMAND_LEN {
            return Err(ChaserError::InvalidCommand);
        }

        let text = core::str::from_utf8(bytes).map_err(|_| ChaserError::InvalidCommand)?;
        text.parse()
    }
}

impl core::str::FromStr for Command {
    type Err = ChaserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix('\n').unwrap_or(s) {
            "up" => Ok(Command::Forward),
            "down" => Ok(Command::Backward),
            _ => Err(ChaserError::InvalidCommand),
        }
    }
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.token())
    }
}
