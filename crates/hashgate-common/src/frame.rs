//! Fixed-size binary frames exchanged with the compute device.
//!
//! The device speaks a stream of fixed-length big-endian frames over one
//! persistent TCP connection: 76 bytes relay → device carrying a work
//! assignment, 72 bytes device → relay carrying a candidate nonce. There is
//! no type byte and no length prefix; the sizes are the contract.

use crate::types::PREHASH_LEN;
use thiserror::Error;

/// Work frame length: `u32 mask | u64 start_nonce | 64-byte prehash`.
pub const WORK_FRAME_LEN: usize = 76;
/// Result frame length: `64-byte prehash | u64 nonce`.
pub const RESULT_FRAME_LEN: usize = 72;

/// Errors that can occur while building or decoding device frames.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The prehash is not exactly [`PREHASH_LEN`] bytes.
    #[error("prehash must be {expected} bytes, got {actual}")]
    PrehashLength {
        /// Required byte count.
        expected: usize,
        /// Actual byte count supplied.
        actual: usize,
    },
    /// Not enough bytes for a full frame.
    #[error("frame too short: expected {expected} bytes, got {actual}")]
    TooShort {
        /// Minimum expected byte count.
        expected: usize,
        /// Actual byte count received.
        actual: usize,
    },
}

/// Safely convert a byte slice to a fixed-size array.
/// Returns `FrameError::TooShort` if the slice is the wrong length.
fn try_into_array<const N: usize>(data: &[u8]) -> Result<[u8; N], FrameError> {
    data.try_into().map_err(|_| FrameError::TooShort {
        expected: N,
        actual: data.len(),
    })
}

fn prehash_bytes(prehash: &str) -> Result<[u8; PREHASH_LEN], FrameError> {
    prehash
        .as_bytes()
        .try_into()
        .map_err(|_| FrameError::PrehashLength {
            expected: PREHASH_LEN,
            actual: prehash.len(),
        })
}

/// A work assignment frame, relay → device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkFrame {
    mask: u32,
    start_nonce: u64,
    prehash: [u8; PREHASH_LEN],
}

impl WorkFrame {
    /// Builds a work frame from a difficulty mask, start nonce and prehash.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::PrehashLength`] unless the prehash is exactly
    /// [`PREHASH_LEN`] bytes.
    pub fn new(mask: u32, start_nonce: u64, prehash: &str) -> Result<Self, FrameError> {
        Ok(Self {
            mask,
            start_nonce,
            prehash: prehash_bytes(prehash)?,
        })
    }

    /// Serializes this frame into its fixed 76-byte wire form.
    #[must_use]
    pub fn encode(&self) -> [u8; WORK_FRAME_LEN] {
        let mut out = [0u8; WORK_FRAME_LEN];
        out[..4].copy_from_slice(&self.mask.to_be_bytes());
        out[4..12].copy_from_slice(&self.start_nonce.to_be_bytes());
        out[12..].copy_from_slice(&self.prehash);
        out
    }

    /// Parses the first [`WORK_FRAME_LEN`] bytes of `data` as a work frame.
    ///
    /// Used on the device side of the wire (tooling and tests); the relay
    /// itself only encodes work frames.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooShort`] if fewer than 76 bytes are supplied.
    pub fn decode(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() < WORK_FRAME_LEN {
            return Err(FrameError::TooShort {
                expected: WORK_FRAME_LEN,
                actual: data.len(),
            });
        }
        Ok(Self {
            mask: u32::from_be_bytes(try_into_array(&data[..4])?),
            start_nonce: u64::from_be_bytes(try_into_array(&data[4..12])?),
            prehash: try_into_array(&data[12..WORK_FRAME_LEN])?,
        })
    }

    /// The difficulty report mask.
    #[must_use]
    pub const fn mask(&self) -> u32 {
        self.mask
    }

    /// The nonce the device starts searching from.
    #[must_use]
    pub const fn start_nonce(&self) -> u64 {
        self.start_nonce
    }

    /// The raw prehash bytes.
    #[must_use]
    pub const fn prehash(&self) -> &[u8; PREHASH_LEN] {
        &self.prehash
    }
}

/// A candidate-nonce frame, device → relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFrame {
    prehash: [u8; PREHASH_LEN],
    nonce: u64,
}

impl ResultFrame {
    /// Builds a result frame from a prehash and nonce.
    ///
    /// Used on the device side of the wire (tooling and tests).
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::PrehashLength`] unless the prehash is exactly
    /// [`PREHASH_LEN`] bytes.
    pub fn new(prehash: &str, nonce: u64) -> Result<Self, FrameError> {
        Ok(Self {
            prehash: prehash_bytes(prehash)?,
            nonce,
        })
    }

    /// Serializes this frame into its fixed 72-byte wire form.
    #[must_use]
    pub fn encode(&self) -> [u8; RESULT_FRAME_LEN] {
        let mut out = [0u8; RESULT_FRAME_LEN];
        out[..PREHASH_LEN].copy_from_slice(&self.prehash);
        out[PREHASH_LEN..].copy_from_slice(&self.nonce.to_be_bytes());
        out
    }

    /// Parses the first [`RESULT_FRAME_LEN`] bytes of `data` as a result frame.
    ///
    /// Callers are responsible for buffering until a full frame is
    /// available; a short read is [`FrameError::TooShort`], not a protocol
    /// violation. Once 72 bytes are present decoding cannot fail — every
    /// field is fixed-width.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooShort`] if fewer than 72 bytes are supplied.
    pub fn decode(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() < RESULT_FRAME_LEN {
            return Err(FrameError::TooShort {
                expected: RESULT_FRAME_LEN,
                actual: data.len(),
            });
        }
        Ok(Self {
            prehash: try_into_array(&data[..PREHASH_LEN])?,
            nonce: u64::from_be_bytes(try_into_array(&data[PREHASH_LEN..RESULT_FRAME_LEN])?),
        })
    }

    /// The raw prehash bytes, compared byte-exact by the staleness filter.
    #[must_use]
    pub const fn prehash(&self) -> &[u8; PREHASH_LEN] {
        &self.prehash
    }

    /// The reported nonce.
    #[must_use]
    pub const fn nonce(&self) -> u64 {
        self.nonce
    }
}
