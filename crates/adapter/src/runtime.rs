//! Adapter runtime integration.
//!
//! Bridges the synchronous board loop with the async TCP server. The board
//! never leaves the loop's thread; the server only moves lines of JSON.

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::core::Board;
use crate::engine::{apply_best_swap, AutoplayError};
use crate::protocol::*;
use crate::server::{run_server, ServerConfig, ServerState};
use crate::types::Position;

/// Command delivered to the board loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone)]
pub enum InboundPayload {
    Command(ClientCommand),
    /// A freshly handshaken client asked for observations
    SnapshotRequest,
}

/// Command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    Swap { a: Position, b: Position },
    Auto,
    Hint,
    Snapshot,
    Restart { seed: Option<u32> },
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    Broadcast { line: String },
}

/// Turn a wire command into a board command
pub fn map_command(cmd: &CommandMessage) -> Result<ClientCommand, (ErrorCode, String)> {
    match cmd.action {
        CommandAction::Swap => match (cmd.a, cmd.b) {
            (Some(a), Some(b)) => Ok(ClientCommand::Swap {
                a: a.into(),
                b: b.into(),
            }),
            _ => Err((
                ErrorCode::InvalidCommand,
                "swap needs both a and b".to_string(),
            )),
        },
        CommandAction::Auto => Ok(ClientCommand::Auto),
        CommandAction::Hint => Ok(ClientCommand::Hint),
        CommandAction::Snapshot => Ok(ClientCommand::Snapshot),
        CommandAction::Restart => Ok(ClientCommand::Restart { seed: cmd.seed }),
    }
}

/// Apply one inbound command to the board and build the replies
///
/// The first message answers the sender; a state change is followed by a
/// broadcast observation for streaming clients.
pub fn handle_command(board: &mut Board, cmd: &InboundCommand) -> anyhow::Result<Vec<OutboundMessage>> {
    let client_id = cmd.client_id;
    let seq = cmd.seq;
    let reply = |line: String| OutboundMessage::ToClient { client_id, line };

    let command = match cmd.payload {
        InboundPayload::SnapshotRequest => ClientCommand::Snapshot,
        InboundPayload::Command(c) => c,
    };
    debug!(client_id, seq, ?command, "board command");

    let mut out = Vec::with_capacity(2);
    let changed = match command {
        ClientCommand::Swap { a, b } => {
            let outcome = board.request_swap(a, b);
            let msg = create_outcome(seq, &outcome, board.score(), &board.snapshot());
            out.push(reply(serde_json::to_string(&msg)?));
            true
        }
        ClientCommand::Auto => match apply_best_swap(board) {
            Ok(outcome) => {
                let msg = create_outcome(seq, &outcome, board.score(), &board.snapshot());
                out.push(reply(serde_json::to_string(&msg)?));
                true
            }
            Err(e) => {
                let code = match e {
                    AutoplayError::NoMoveAvailable => ErrorCode::NoMove,
                    AutoplayError::Rejected(_) => ErrorCode::InvalidCommand,
                };
                out.push(reply(serde_json::to_string(&create_error(seq, code, e.message()))?));
                false
            }
        },
        ClientCommand::Hint => {
            let line = match board.hint() {
                Some((a, b)) => serde_json::to_string(&create_hint(seq, a, b))?,
                None => serde_json::to_string(&create_error(
                    seq,
                    ErrorCode::NoMove,
                    AutoplayError::NoMoveAvailable.message(),
                ))?,
            };
            out.push(reply(line));
            false
        }
        ClientCommand::Snapshot => {
            let obs = create_observation(seq, board.seed(), &board.snapshot());
            out.push(reply(serde_json::to_string(&obs)?));
            false
        }
        ClientCommand::Restart { seed } => {
            let seed = seed.unwrap_or(board.seed());
            board.restart(seed);
            let obs = create_observation(seq, board.seed(), &board.snapshot());
            out.push(reply(serde_json::to_string(&obs)?));
            true
        }
    };

    if changed {
        let obs = create_observation(seq, board.seed(), &board.snapshot());
        out.push(OutboundMessage::Broadcast {
            line: serde_json::to_string(&obs)?,
        });
    }
    Ok(out)
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns None if `MATCH3_AI_DISABLED` is set.
    pub fn start_from_env(board: BoardInfo) -> anyhow::Result<Option<Self>> {
        if ServerState::is_disabled() {
            return Ok(None);
        }
        Self::start(ServerConfig::from_env().with_board(board)).map(Some)
    }

    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None).await {
                error!(error = %e, "adapter server stopped");
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    /// Block until the next command; None once the server is gone
    pub fn recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.blocking_recv()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    /// Serve commands against `board` until the server stops
    pub fn serve(&mut self, board: &mut Board) -> anyhow::Result<()> {
        while let Some(cmd) = self.recv() {
            for msg in handle_command(board, &cmd)? {
                self.send(msg);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BoardConfig;

    fn command(payload: ClientCommand) -> InboundCommand {
        InboundCommand {
            client_id: 1,
            seq: 7,
            payload: InboundPayload::Command(payload),
        }
    }

    fn first_line(out: &[OutboundMessage]) -> serde_json::Value {
        match &out[0] {
            OutboundMessage::ToClient { client_id, line } => {
                assert_eq!(*client_id, 1);
                serde_json::from_str(line).unwrap()
            }
            other => panic!("expected reply, got {other:?}"),
        }
    }

    #[test]
    fn swap_without_positions_is_invalid() {
        let mut msg = create_command(3, CommandAction::Swap);
        msg.a = Some(WirePosition { x: 0, y: 0 });
        let (code, _) = map_command(&msg).unwrap_err();
        assert_eq!(code, ErrorCode::InvalidCommand);
    }

    #[test]
    fn hint_then_swap_round_trip() {
        let mut board = Board::new(BoardConfig::default().with_seed(11)).unwrap();

        let out = handle_command(&mut board, &command(ClientCommand::Hint)).unwrap();
        assert_eq!(out.len(), 1);
        let hint = first_line(&out);
        assert_eq!(hint["type"], "hint");
        assert_eq!(hint["seq"], 7);

        let a = Position::new(hint["a"]["x"].as_i64().unwrap() as i8, hint["a"]["y"].as_i64().unwrap() as i8);
        let b = Position::new(hint["b"]["x"].as_i64().unwrap() as i8, hint["b"]["y"].as_i64().unwrap() as i8);
        let out = handle_command(&mut board, &command(ClientCommand::Swap { a, b })).unwrap();
        assert_eq!(out.len(), 2);
        let outcome = first_line(&out);
        assert_eq!(outcome["type"], "outcome");
        assert_eq!(outcome["accepted"], true);
        assert!(matches!(out[1], OutboundMessage::Broadcast { .. }));
    }

    #[test]
    fn rejected_swap_reports_code() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        let cmd = command(ClientCommand::Swap {
            a: Position::new(0, 0),
            b: Position::new(0, 9),
        });
        let out = handle_command(&mut board, &cmd).unwrap();
        let outcome = first_line(&out);
        assert_eq!(outcome["accepted"], false);
        assert_eq!(outcome["rejection"], "out_of_bounds");
    }

    #[test]
    fn restart_keeps_seed_when_none_given() {
        let mut board = Board::new(BoardConfig::default().with_seed(42)).unwrap();
        let out = handle_command(&mut board, &command(ClientCommand::Restart { seed: None })).unwrap();
        let obs = first_line(&out);
        assert_eq!(obs["type"], "observation");
        assert_eq!(obs["seed"], 42);
        assert_eq!(obs["score"], 0);
    }
}
