//! hashgate relay daemon — bridges an HTTP controller to a hashing device.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Jittered exponential backoff for device reconnection.
pub mod backoff;
/// CLI argument parsing and relay configuration.
pub mod config;
/// Device link: TCP connection manager and transfer loops.
pub mod device;
/// Error types for relay operations.
pub mod error;
/// HTTP control surface for publishing work and popping results.
pub mod http;
/// Prometheus metrics collection and health endpoint.
pub mod metrics;
/// Shared relay state: staleness reference, queues, shared secret.
pub mod state;

pub use state::RelayState;
