use clap::Parser;
use std::net::SocketAddr;

/// CLI arguments for the relay daemon.
#[derive(Parser, Debug, Clone)]
#[command(name = "hashgated")]
#[command(about = "HTTP-to-TCP work relay for a hashing accelerator")]
#[command(version)]
pub struct Args {
    /// Socket address of the compute device.
    #[arg(long, env = "HASHGATE_DEVICE")]
    pub device: SocketAddr,
    /// Socket address the HTTP control surface listens on.
    #[arg(long, default_value = "0.0.0.0:8080", env = "HASHGATE_LISTEN")]
    pub listen: SocketAddr,
    /// Socket address for the metrics endpoint.
    #[arg(long, default_value = "127.0.0.1:9090", env = "HASHGATE_METRICS")]
    pub metrics_addr: SocketAddr,
    /// Shared secret required to publish work.
    #[arg(long, env = "HASHGATE_SECRET", hide_env_values = true)]
    pub secret: String,
    /// Initial reconnect delay in milliseconds.
    #[arg(long, default_value = "500", env = "HASHGATE_RECONNECT_INITIAL_MS")]
    pub reconnect_initial_ms: u64,
    /// Maximum reconnect delay in milliseconds.
    #[arg(long, default_value = "30000", env = "HASHGATE_RECONNECT_MAX_MS")]
    pub reconnect_max_ms: u64,
    /// Multiplier applied to the reconnect delay after each failed attempt.
    #[arg(long, default_value = "2.0", env = "HASHGATE_RECONNECT_FACTOR")]
    pub reconnect_factor: f64,
}

/// Runtime configuration derived from [`Args`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address of the compute device.
    pub device: SocketAddr,
    /// Socket address the HTTP control surface listens on.
    pub listen: SocketAddr,
    /// Socket address for the metrics endpoint.
    pub metrics_addr: SocketAddr,
    /// Shared secret required to publish work.
    pub secret: String,
    /// Initial reconnect delay in milliseconds.
    pub reconnect_initial_ms: u64,
    /// Maximum reconnect delay in milliseconds.
    pub reconnect_max_ms: u64,
    /// Multiplier applied to the reconnect delay after each failed attempt.
    pub reconnect_factor: f64,
}

impl RelayConfig {
    /// Validates the configuration values are within acceptable bounds.
    /// Returns Ok(()) if valid, Err with description otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("secret must not be empty".to_string());
        }
        if self.secret.len() > 256 {
            return Err("secret exceeds reasonable length (256 bytes)".to_string());
        }

        if self.reconnect_initial_ms == 0 {
            return Err("reconnect_initial_ms must be greater than 0".to_string());
        }
        if self.reconnect_initial_ms > 60_000 {
            return Err("reconnect_initial_ms exceeds reasonable limit (60000 ms)".to_string());
        }

        if self.reconnect_max_ms < self.reconnect_initial_ms {
            return Err("reconnect_max_ms cannot be less than reconnect_initial_ms".to_string());
        }
        if self.reconnect_max_ms > 3_600_000 {
            return Err("reconnect_max_ms exceeds reasonable limit (1 hour)".to_string());
        }

        if self.reconnect_factor < 1.0 {
            return Err("reconnect_factor must be at least 1.0".to_string());
        }
        if self.reconnect_factor > 10.0 {
            return Err("reconnect_factor exceeds reasonable limit (10.0)".to_string());
        }
        Ok(())
    }
}

impl From<Args> for RelayConfig {
    fn from(args: Args) -> Self {
        Self {
            device: args.device,
            listen: args.listen,
            metrics_addr: args.metrics_addr,
            secret: args.secret,
            reconnect_initial_ms: args.reconnect_initial_ms,
            reconnect_max_ms: args.reconnect_max_ms,
            reconnect_factor: args.reconnect_factor,
        }
    }
}
