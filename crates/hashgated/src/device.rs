use crate::backoff::ExponentialBackoff;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::metrics::{counters, gauges};
use crate::state::RelayState;
use bytes::{Buf, BytesMut};
use hashgate_common::frame::{ResultFrame, WorkFrame, RESULT_FRAME_LEN};
use hashgate_common::mask::difficulty_mask;
use hashgate_common::types::WorkUnit;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Connection status of the device link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Not connected to the device.
    Disconnected,
    /// TCP connection attempt in progress.
    Connecting,
    /// Connected; both transfer loops running.
    Connected,
}

/// Top-level device link loop with automatic reconnection and backoff.
///
/// Owns the receiving half of the work channel across connection attempts,
/// so work published while the device is unreachable is forwarded once the
/// link comes back. Returns when the work channel closes (all senders
/// dropped at shutdown).
pub async fn run_link(
    config: RelayConfig,
    state: Arc<RelayState>,
    mut work_rx: mpsc::UnboundedReceiver<WorkUnit>,
    status_tx: watch::Sender<LinkStatus>,
) {
    let mut backoff = ExponentialBackoff::from_config(&config);

    loop {
        status_tx.send_replace(LinkStatus::Connecting);

        match connect_and_run(&config, &state, &mut work_rx, &status_tx).await {
            Ok(()) => {
                info!("work channel closed, device link shutting down");
                break;
            }
            Err(e) => {
                let was_connected = *status_tx.borrow() == LinkStatus::Connected;
                warn!(error = %e, "device connection lost");
                status_tx.send_replace(LinkStatus::Disconnected);
                gauges::device_link_up(false);
                if was_connected {
                    backoff.reset();
                }
            }
        }

        counters::reconnects_total();
        let delay = backoff.next_delay();
        info!(
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "reconnecting to device"
        );
        tokio::time::sleep(delay).await;
    }

    status_tx.send_replace(LinkStatus::Disconnected);
    gauges::device_link_up(false);
}

/// One connection attempt: dial the device, then drive both transfer loops
/// until either fails or the work channel closes.
async fn connect_and_run(
    config: &RelayConfig,
    state: &RelayState,
    work_rx: &mut mpsc::UnboundedReceiver<WorkUnit>,
    status_tx: &watch::Sender<LinkStatus>,
) -> Result<(), RelayError> {
    let stream = TcpStream::connect(config.device).await?;
    // Frames are 76 bytes and latency matters more than throughput
    stream.set_nodelay(true)?;
    let (mut rd, mut wr) = stream.into_split();

    status_tx.send_replace(LinkStatus::Connected);
    gauges::device_link_up(true);
    info!("connected to device at {}", config.device);

    tokio::select! {
        res = outbound_loop(&mut wr, work_rx) => res,
        res = inbound_loop(&mut rd, state) => res,
    }
}

/// Drains the work channel, sending one 76-byte frame per unit.
///
/// `write_all` continues through partial writes; a write error is fatal to
/// the connection attempt. Returns `Ok` only when the channel closes.
async fn outbound_loop<W>(
    wr: &mut W,
    work_rx: &mut mpsc::UnboundedReceiver<WorkUnit>,
) -> Result<(), RelayError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(unit) = work_rx.recv().await {
        // Both fall-throughs are unreachable after publish-side validation,
        // but the wire layer still refuses to send a malformed frame.
        let mask = difficulty_mask(unit.difficulty)?;
        let frame = WorkFrame::new(mask, unit.start_nonce, &unit.prehash)?;
        wr.write_all(&frame.encode()).await?;
        wr.flush().await?;
        counters::frames_sent_total();
        debug!(
            start_nonce = unit.start_nonce,
            difficulty = unit.difficulty,
            "work frame sent"
        );
    }
    Ok(())
}

/// Reads the result stream, slicing fixed 72-byte frames out of a byte
/// accumulator and admitting each through the staleness filter.
///
/// A zero-byte read means the device closed the connection; both that and
/// read errors are fatal to the connection attempt.
async fn inbound_loop<R>(rd: &mut R, state: &RelayState) -> Result<(), RelayError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(4 * RESULT_FRAME_LEN);
    loop {
        let n = rd.read_buf(&mut buf).await?;
        if n == 0 {
            return Err(RelayError::DeviceClosed);
        }
        while buf.len() >= RESULT_FRAME_LEN {
            let frame = ResultFrame::decode(&buf[..RESULT_FRAME_LEN])?;
            buf.advance(RESULT_FRAME_LEN);
            if state.admit_result(&frame) {
                debug!(nonce = frame.nonce(), "result accepted");
                counters::results_total("accepted");
            } else {
                debug!(nonce = frame.nonce(), "stale result discarded");
                counters::results_total("stale");
            }
        }
    }
}
