//! Difficulty-to-bitmask derivation.
//!
//! The device takes a 32-bit report mask in every work frame. Each `0xF`
//! nibble, filled in from the most significant end, tightens which candidate
//! nonces are worth reporting back. Level `n` sets the top `n` nibbles.

use thiserror::Error;

/// Highest difficulty level expressible in the 32-bit mask (8 nibbles).
pub const MAX_DIFFICULTY: u32 = 8;

/// Errors that can occur deriving a difficulty mask.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DifficultyError {
    /// The requested level does not fit in the 32-bit mask.
    #[error("difficulty {actual} exceeds maximum {max}")]
    TooHigh {
        /// Maximum allowed level.
        max: u32,
        /// Actual level requested.
        actual: u32,
    },
}

/// Derives the device report mask for the given difficulty level.
///
/// Level 0 is an all-zero mask, level 2 is `0xFF00_0000`, level 8 saturates
/// at `0xFFFF_FFFF`. Levels above [`MAX_DIFFICULTY`] would shift past the
/// bottom of the mask and are rejected.
///
/// # Errors
///
/// Returns [`DifficultyError::TooHigh`] for levels above [`MAX_DIFFICULTY`].
pub fn difficulty_mask(level: u32) -> Result<u32, DifficultyError> {
    if level > MAX_DIFFICULTY {
        return Err(DifficultyError::TooHigh {
            max: MAX_DIFFICULTY,
            actual: level,
        });
    }
    let mut mask = 0u32;
    for i in 0..level {
        mask |= 0xF << (28 - i * 4);
    }
    Ok(mask)
}
