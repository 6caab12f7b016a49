//! Core value types and protocol constants for hashgate.

/// Byte length of a prehash, both on the wire and over HTTP.
pub const PREHASH_LEN: usize = 64;

/// A unit of work published by the controller and forwarded to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    /// 64-byte identifier of the work's input data.
    pub prehash: String,
    /// Nonce the device starts its search from.
    pub start_nonce: u64,
    /// Difficulty level, converted to a report mask before transmission.
    pub difficulty: u32,
}

/// A candidate nonce reported by the device for the live prehash.
///
/// Produced only by the device link's inbound loop, after the staleness
/// filter has matched the frame against the current prehash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultUnit {
    /// Prehash this nonce was found for.
    pub prehash: String,
    /// The reported nonce.
    pub nonce: u64,
}
