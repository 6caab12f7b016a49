#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use hashgated::config::{Args, RelayConfig};
use hashgated::device::{self, LinkStatus};
use hashgated::http;
use hashgated::metrics::{start_metrics_server, HealthState};
use hashgated::RelayState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config: RelayConfig = args.into();

    // Validate configuration before starting
    if let Err(e) = config.validate() {
        anyhow::bail!("configuration error: {}", e);
    }

    let (work_tx, work_rx) = mpsc::unbounded_channel();
    let state = Arc::new(RelayState::new(config.secret.clone(), work_tx));
    let (status_tx, mut status_rx) = watch::channel(LinkStatus::Disconnected);

    let health_state = HealthState::new();

    tokio::spawn({
        let health_state = health_state.clone();
        let metrics_addr = config.metrics_addr;
        async move {
            if let Err(e) = start_metrics_server(metrics_addr, health_state).await {
                warn!("metrics server error: {}", e);
            }
        }
    });

    // Mirror the device link status into the readiness endpoint
    tokio::spawn({
        let health_state = health_state.clone();
        async move {
            loop {
                let connected = *status_rx.borrow_and_update() == LinkStatus::Connected;
                health_state.set_ready(connected);
                if status_rx.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    tokio::spawn(device::run_link(
        config.clone(),
        state.clone(),
        work_rx,
        status_tx,
    ));

    let listener = TcpListener::bind(config.listen).await?;
    info!("control surface listening on {}", config.listen);

    tokio::select! {
        result = axum::serve(listener, http::router(state)) => {
            if let Err(e) = result {
                tracing::error!("http server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal");
        }
    }

    Ok(())
}
