//! Adapter module - remote play via TCP socket with a JSON protocol
//!
//! Lets an external client (a bot, a test harness, a thin UI) drive a board
//! over a line-delimited JSON protocol. The board itself stays on the
//! caller's thread; the server hands commands over a bounded channel and
//! takes finished reply lines back.
//!
//! # Protocol Overview
//!
//! 1. **Connection**: client connects to the TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: first client to hello becomes the controller,
//!    later ones are observers
//! 4. **Commanding**: the controller sends `command` messages
//!
//! ## Client → Server
//!
//! - **hello**: protocol version (must be `1.x`) and whether to stream observations
//! - **command**: `action` is one of `swap` (with `a` and `b`), `auto`, `hint`,
//!   `snapshot`, `restart` (optional `seed`)
//!
//! ## Server → Client
//!
//! - **welcome**: assigned role and board dimensions/palette
//! - **outcome**: result of `swap`/`auto` with every cascade event in order
//! - **hint**: a swap that would match
//! - **observation**: full board state
//! - **error**: code and message; the connection stays open except on
//!   `protocol_mismatch`
//!
//! `seq` must strictly increase per client.
//!
//! # Environment Variables
//!
//! - `MATCH3_AI_HOST`: bind address (default: "127.0.0.1")
//! - `MATCH3_AI_PORT`: port number (default: 7878)
//! - `MATCH3_AI_MAX_PENDING`: command queue depth (default: 10)
//! - `MATCH3_AI_DISABLED`: set to "1" or "true" to disable the adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"role":"controller","board":{...}}
//! Client -> Server: {"type":"command","seq":2,"ts":0,"action":"swap","a":{"x":1,"y":0},"b":{"x":1,"y":1}}
//! Server -> Client: {"type":"outcome","seq":2,"ts":...,"accepted":true,"score_gained":30,"events":[...],...}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use match_three_core as core;
pub use match_three_engine as engine;
pub use match_three_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{handle_command, Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
pub use server::*;
