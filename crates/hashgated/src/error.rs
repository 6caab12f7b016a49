use hashgate_common::frame::FrameError;
use hashgate_common::mask::DifficultyError;
use thiserror::Error;

/// Errors that can occur during relay operation.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The published prehash is not exactly 64 bytes.
    #[error("invalid prehash length: expected {expected} bytes, got {actual}")]
    PrehashLength {
        /// Required byte count.
        expected: usize,
        /// Actual byte count supplied.
        actual: usize,
    },
    /// The published difficulty does not fit the device mask.
    #[error(transparent)]
    Difficulty(#[from] DifficultyError),
    /// Frame encoding or decoding error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
    /// Underlying I/O error on the device connection.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The device closed the connection.
    #[error("device closed the connection")]
    DeviceClosed,
    /// The work channel to the device link is gone.
    #[error("device link shut down")]
    LinkDown,
}
