//! Wire protocol layer shared between the hashgate relay and device tooling.
//!
//! This crate provides:
//! - Fixed-size binary frame encoding/decoding ([`frame`])
//! - Difficulty-to-bitmask derivation ([`mask`])
//! - Protocol value types and constants ([`types`])

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod frame;
pub mod mask;
pub mod types;

pub use frame::{ResultFrame, WorkFrame};
pub use types::{ResultUnit, WorkUnit, PREHASH_LEN};
