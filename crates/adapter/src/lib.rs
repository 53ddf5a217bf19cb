//! Adapter module - external control via TCP socket with JSON protocol
//!
//! This module lets external agents (bots, solvers, test harnesses) play the
//! game and watch it through a TCP socket.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7777)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller;
//!    the others observe
//! 4. **Commanding**: The controller sends up to 32 actions per `command`
//! 5. **Observation Streaming**: Clients that asked for it receive an
//!    observation after every state change
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Handshake with client info and requested capabilities
//! - **command**: Actions to apply in order (`up`, `down`, `left`, `right`, `restart`)
//! - **control**: Claim or release controller status
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with the assigned role
//! - **observation**: Grid, score, flags, counters and a stable `state_hash`
//! - **ack**: Sent once a command's actions have been applied
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `TUI2048_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `TUI2048_AI_PORT`: Port number (default: 7777)
//! - `TUI2048_AI_MAX_PENDING`: Command queue capacity (default: 10)
//! - `TUI2048_AI_DISABLED`: Set to "1" or "true" to disable adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":2,"protocol_version":"1.0.0","client_id":1,"role":"controller","controller_id":1,"game_id":"tui-2048"}
//! Server -> Client: {"type":"observation","seq":1,"ts":3,"grid":[[0,2,0,0],...],"score":0,...}
//! Client -> Server: {"type":"command","seq":2,"ts":4,"actions":["left","up"]}
//! Server -> Client: {"type":"observation","seq":2,...}
//! Server -> Client: {"type":"ack","seq":2,"ts":5,"status":"ok"}
//! ```
//!
//! # Implementation
//!
//! - [`server`] runs on tokio and owns the connections
//! - [`runtime`] hosts the server on its own runtime for a synchronous game loop
//! - [`bridge`] applies queued commands to the game and builds the replies

pub mod bridge;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use bridge::{ApplyOutcome, GameBridge};
pub use protocol::*;
pub use runtime::{
    Adapter, AdapterStats, AdapterStatus, InboundCommand, InboundPayload, OutboundMessage,
};
pub use server::{run_server, run_server_with_stats, ClientOutbound, ServerConfig};
