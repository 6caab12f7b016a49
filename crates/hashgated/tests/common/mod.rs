use hashgate_common::frame::{ResultFrame, WorkFrame, WORK_FRAME_LEN};
use hashgate_common::types::{ResultUnit, PREHASH_LEN};
use hashgated::config::RelayConfig;
use hashgated::device::{run_link, LinkStatus};
use hashgated::RelayState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};

pub const SECRET: &str = "test-secret";

pub fn prehash(fill: char) -> String {
    fill.to_string().repeat(PREHASH_LEN)
}

pub fn test_config(device: SocketAddr) -> RelayConfig {
    RelayConfig {
        device,
        listen: "127.0.0.1:0".parse().unwrap(),
        metrics_addr: "127.0.0.1:0".parse().unwrap(),
        secret: SECRET.to_string(),
        reconnect_initial_ms: 10,
        reconnect_max_ms: 100,
        reconnect_factor: 2.0,
    }
}

/// A TcpListener standing in for the hashing accelerator.
pub struct FakeDevice {
    listener: TcpListener,
    pub addr: SocketAddr,
}

impl FakeDevice {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        Self { listener, addr }
    }

    pub async fn accept(&self) -> DeviceConn {
        let (stream, _) = tokio::time::timeout(Duration::from_secs(5), self.listener.accept())
            .await
            .expect("timeout waiting for relay to connect")
            .unwrap();
        DeviceConn { stream }
    }
}

/// One accepted relay connection, driven from the device's side of the wire.
pub struct DeviceConn {
    stream: TcpStream,
}

impl DeviceConn {
    pub async fn recv_work_bytes(&mut self) -> [u8; WORK_FRAME_LEN] {
        let mut bytes = [0u8; WORK_FRAME_LEN];
        tokio::time::timeout(Duration::from_secs(5), self.stream.read_exact(&mut bytes))
            .await
            .expect("timeout waiting for work frame")
            .unwrap();
        bytes
    }

    pub async fn recv_work(&mut self) -> WorkFrame {
        let bytes = self.recv_work_bytes().await;
        WorkFrame::decode(&bytes).unwrap()
    }

    pub async fn send_result(&mut self, prehash: &str, nonce: u64) {
        let frame = ResultFrame::new(prehash, nonce).unwrap();
        self.stream.write_all(&frame.encode()).await.unwrap();
    }
}

pub fn start_relay(config: RelayConfig) -> (Arc<RelayState>, watch::Receiver<LinkStatus>) {
    let (work_tx, work_rx) = mpsc::unbounded_channel();
    let state = Arc::new(RelayState::new(config.secret.clone(), work_tx));
    let (status_tx, status_rx) = watch::channel(LinkStatus::Disconnected);
    tokio::spawn(run_link(config, state.clone(), work_rx, status_tx));
    (state, status_rx)
}

pub async fn wait_connected(status_rx: &mut watch::Receiver<LinkStatus>) {
    tokio::time::timeout(
        Duration::from_secs(5),
        status_rx.wait_for(|s| *s == LinkStatus::Connected),
    )
    .await
    .expect("timeout waiting for device link")
    .unwrap();
}

/// Poll until the inbound loop admits a result.
pub async fn wait_for_result(state: &RelayState) -> ResultUnit {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(unit) = state.pop_result() {
                return unit;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("timeout waiting for result")
}
