//! Adapter runtime integration.
//!
//! Bridges the synchronous game loop with the async TCP server. The server runs
//! on its own tokio runtime; the game loop only ever touches channels and a few
//! atomics, so a frame never blocks on the network.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};

use crate::protocol::{AckMessage, ActionBatch, ErrorMessage, ObservationMessage};
use crate::server::{run_server_with_stats, ServerConfig};

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    /// The client's `seq`, echoed back in the ack.
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone)]
pub enum InboundPayload {
    /// Apply these actions in order, then ack.
    Actions(ActionBatch),
    /// Send the current observation to this client only.
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientAck { client_id: usize, ack: AckMessage },
    ToClientError { client_id: usize, err: ErrorMessage },
    ToClientObservation { client_id: usize, obs: ObservationMessage },
    /// Sent to every client that asked for streamed observations.
    BroadcastObservation { obs: ObservationMessage },
}

/// Connection counters shared between the server and the game loop.
#[derive(Debug, Default)]
pub struct AdapterStats {
    clients: AtomicUsize,
    /// Controller client id, 0 when there is none (ids start at 1).
    controller: AtomicUsize,
}

impl AdapterStats {
    pub(crate) fn publish(&self, clients: usize, controller: Option<usize>) {
        self.clients.store(clients, Ordering::Relaxed);
        self.controller.store(controller.unwrap_or(0), Ordering::Relaxed);
    }

    pub fn status(&self) -> AdapterStatus {
        let controller = self.controller.load(Ordering::Relaxed);
        AdapterStatus {
            client_count: self.clients.load(Ordering::Relaxed),
            controller_id: (controller != 0).then_some(controller),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterStatus {
    pub client_count: usize,
    pub controller_id: Option<usize>,
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    stats: Arc<AdapterStats>,
    local_addr: SocketAddr,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `TUI2048_AI_DISABLED` is set.
    pub fn start_from_env() -> Result<Option<Self>> {
        if ServerConfig::is_disabled() {
            info!("adapter disabled via TUI2048_AI_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    /// Bind the server and wait until it is listening.
    pub fn start(config: ServerConfig) -> Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (ready_tx, ready_rx) = oneshot::channel();
        let stats = Arc::new(AdapterStats::default());

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        {
            let stats = Arc::clone(&stats);
            rt.spawn(async move {
                if let Err(e) =
                    run_server_with_stats(config, stats, cmd_tx, out_rx, Some(ready_tx)).await
                {
                    error!("adapter server stopped: {:#}", e);
                }
            });
        }

        // The sender is dropped without a value if binding fails.
        let local_addr = rt
            .block_on(ready_rx)
            .context("adapter server failed to start")?;

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            stats,
            local_addr,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    pub fn status(&self) -> AdapterStatus {
        self.stats.status()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_round_trip() {
        let stats = AdapterStats::default();
        assert_eq!(stats.status(), AdapterStatus::default());

        stats.publish(3, Some(2));
        assert_eq!(
            stats.status(),
            AdapterStatus {
                client_count: 3,
                controller_id: Some(2)
            }
        );

        stats.publish(1, None);
        assert_eq!(stats.status().controller_id, None);
    }

    #[test]
    fn start_on_ephemeral_port() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        let mut adapter = Adapter::start(config).unwrap();
        assert_ne!(adapter.local_addr().port(), 0);
        assert!(adapter.try_recv().is_none());
        assert_eq!(adapter.status().client_count, 0);
    }
}
