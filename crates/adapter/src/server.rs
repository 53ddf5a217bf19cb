//! TCP server for the control adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::protocol::*;
use crate::runtime::{AdapterStats, InboundCommand, InboundPayload, OutboundMessage};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Capacity of the queue between connections and the game loop.
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
            max_pending_commands: 10,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("TUI2048_AI_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = lookup("TUI2048_AI_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = lookup("TUI2048_AI_MAX_PENDING")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            max_pending_commands,
        }
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("TUI2048_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

/// Shared server state.
///
/// Lock order is `controller` then `clients`.
struct ServerState {
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
    stats: Arc<AdapterStats>,
}

impl ServerState {
    fn new(stats: Arc<AdapterStats>) -> Self {
        Self {
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
            stats,
        }
    }

    fn publish(&self, clients: &[ClientHandle], controller: Option<usize>) {
        let handshaken = clients.iter().filter(|c| c.handshaken).count();
        self.stats.publish(handshaken, controller);
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    /// Record `seq` if it is strictly greater than the last one seen.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let stats = Arc::new(AdapterStats::default());
    run_server_with_stats(config, stats, command_tx, out_rx, ready_tx).await
}

/// Start the TCP server, publishing connection counters into `stats`.
pub async fn run_server_with_stats(
    config: ServerConfig,
    stats: Arc<AdapterStats>,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind adapter on {}", addr))?;
    let bound = listener.local_addr()?;
    info!("adapter listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(stats));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let clients = state.clients.read().await;
                let to = |id: usize, out: ClientOutbound| {
                    if let Some(c) = clients.iter().find(|c| c.id == id) {
                        let _ = c.tx.send(out);
                    }
                };
                match msg {
                    OutboundMessage::ToClientAck { client_id, ack } => {
                        to(client_id, ClientOutbound::Ack(ack))
                    }
                    OutboundMessage::ToClientError { client_id, err } => {
                        to(client_id, ClientOutbound::Error(err))
                    }
                    OutboundMessage::ToClientObservation { client_id, obs } => {
                        to(client_id, ClientOutbound::Observation(obs))
                    }
                    OutboundMessage::BroadcastObservation { obs } => {
                        for c in clients.iter().filter(|c| c.handshaken && c.stream_observations) {
                            let _ = c.tx.send(ClientOutbound::Observation(obs.clone()));
                        }
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!("client {} connected from {}", client_id, addr);

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, &state, command_tx).await {
                warn!("client {} error: {:#}", client_id, e);
            }
            remove_client(&state, client_id).await;
            info!("client {} disconnected", client_id);
        });
    }
}

/// Drop the client and hand control to the lowest remaining handshaken id.
async fn remove_client(state: &ServerState, client_id: usize) {
    let mut controller = state.controller.write().await;
    let mut clients = state.clients.write().await;

    clients.retain(|c| c.id != client_id);

    if *controller == Some(client_id) {
        let next_id = clients
            .iter()
            .filter(|c| c.handshaken)
            .map(|c| c.id)
            .min();
        *controller = next_id;
        match next_id {
            Some(new_id) => info!("client {} promoted to controller", new_id),
            None => info!("controller {} left, no client to promote", client_id),
        }
    }
    state.publish(&clients, *controller);
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: &ServerState,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, rx) = mpsc::unbounded_channel::<ClientOutbound>();
    state.clients.write().await.push(ClientHandle {
        id: client_id,
        addr,
        stream_observations: false,
        handshaken: false,
        last_seq: None,
        tx: tx.clone(),
    });

    // Ends once every sender is gone, i.e. after `remove_client`.
    tokio::spawn(write_loop(writer, rx));

    let send_error = |seq: u64, code: ErrorCode, message: &str| {
        warn!("client {} seq {}: {:?} ({})", client_id, seq, code, message);
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!("client {} <- {}", client_id, trimmed);

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                let already = state.is_handshaken(client_id).await;
                if already && !state.check_and_update_seq(client_id, hello.seq).await {
                    send_error(
                        hello.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }

                if !is_compatible_version(&hello.protocol_version) {
                    send_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!(
                            "protocol version {} not supported (server speaks {})",
                            hello.protocol_version, PROTOCOL_VERSION
                        ),
                    );
                    break;
                }

                // First client to complete hello becomes controller.
                let (role, controller_id) = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    if let Some(c) = clients.iter_mut().find(|c| c.id == client_id) {
                        c.handshaken = true;
                        c.last_seq = Some(hello.seq);
                        c.stream_observations = hello.requested.stream_observations;
                    }
                    if controller.is_none() {
                        *controller = Some(client_id);
                        info!("client {} ({}) is now controller", client_id, hello.client.name);
                    }
                    state.publish(&clients, *controller);
                    let role = if *controller == Some(client_id) {
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    };
                    (role, *controller)
                };

                let welcome = create_welcome(
                    hello.seq,
                    client_id as u64,
                    role,
                    controller_id.map(|id| id as u64),
                );
                let _ = tx.send(ClientOutbound::Welcome(welcome));

                if hello.requested.stream_observations {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    });
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !gate(state, client_id, cmd.seq, &send_error).await {
                    continue;
                }
                if !state.is_controller(client_id).await {
                    send_error(
                        cmd.seq,
                        ErrorCode::NotController,
                        "only the controller may send commands",
                    );
                    continue;
                }

                // Ack is sent by the game loop after the actions are applied.
                match command_tx.try_send(InboundCommand {
                    client_id,
                    seq: cmd.seq,
                    payload: InboundPayload::Actions(cmd.actions.0),
                }) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        send_error(cmd.seq, ErrorCode::Backpressure, "command queue is full");
                    }
                    Err(TrySendError::Closed(_)) => {
                        warn!("game loop is gone, closing client {}", client_id);
                        break;
                    }
                }
            }

            Ok(ParsedMessage::Control(ctrl)) => {
                if !gate(state, client_id, ctrl.seq, &send_error).await {
                    continue;
                }

                let mut controller = state.controller.write().await;
                let outcome = match ctrl.action {
                    ControlAction::Claim => match *controller {
                        None => {
                            *controller = Some(client_id);
                            info!("client {} claimed control", client_id);
                            Ok(())
                        }
                        Some(id) if id == client_id => Ok(()),
                        Some(_) => {
                            Err((ErrorCode::ControllerActive, "controller already assigned"))
                        }
                    },
                    ControlAction::Release => {
                        if *controller == Some(client_id) {
                            *controller = None;
                            info!("client {} released control", client_id);
                            Ok(())
                        } else {
                            Err((ErrorCode::NotController, "only the controller may release"))
                        }
                    }
                };
                {
                    let clients = state.clients.read().await;
                    state.publish(&clients, *controller);
                }
                drop(controller);

                match outcome {
                    Ok(()) => {
                        let _ = tx.send(ClientOutbound::Ack(create_ack(ctrl.seq)));
                    }
                    Err((code, message)) => send_error(ctrl.seq, code, message),
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, unknown.seq).await
                {
                    send_error(
                        unknown.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }
                send_error(unknown.seq, ErrorCode::InvalidCommand, "unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                send_error(seq, ErrorCode::InvalidCommand, &format!("invalid message: {}", e));
            }
        }
    }

    Ok(())
}

/// Handshake and sequence checks shared by `command` and `control`.
async fn gate(
    state: &ServerState,
    client_id: usize,
    seq: u64,
    send_error: &impl Fn(u64, ErrorCode, &str),
) -> bool {
    if !state.is_handshaken(client_id).await {
        send_error(seq, ErrorCode::HandshakeRequired, "send hello first");
        return false;
    }
    if !state.check_and_update_seq(client_id, seq).await {
        send_error(seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
        return false;
    }
    true
}

/// Serialize outbound messages as JSON lines until the channel closes.
async fn write_loop(
    mut writer: tokio::io::WriteHalf<TcpStream>,
    mut rx: mpsc::UnboundedReceiver<ClientOutbound>,
) {
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    while let Some(msg) = rx.recv().await {
        buf.clear();
        let encoded = match &msg {
            ClientOutbound::Welcome(m) => serde_json::to_writer(&mut buf, m),
            ClientOutbound::Ack(m) => serde_json::to_writer(&mut buf, m),
            ClientOutbound::Error(m) => serde_json::to_writer(&mut buf, m),
            ClientOutbound::Observation(m) => serde_json::to_writer(&mut buf, m),
        };
        if encoded.is_err() {
            continue;
        }
        buf.push(b'\n');
        if writer.write_all(&buf).await.is_err() || writer.flush().await.is_err() {
            break;
        }
    }
}
