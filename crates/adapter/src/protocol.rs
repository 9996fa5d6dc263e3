//! Protocol module - JSON message types for the board adapter
//!
//! Line-delimited JSON. Every message carries `type`, `seq` and `ts`
//! (milliseconds since the epoch). Replies echo the `seq` of the request
//! they answer.

use serde::{Deserialize, Serialize};

use crate::core::gravity::MoveOrigin;
use crate::core::trace::TraceEvent;
use crate::core::{BoardConfig, CascadeTrace, GridSnapshot, Match, SwapOutcome};
use crate::types::{Position, TokenKind};

pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Board Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    Hello,
}

impl Default for HelloType {
    fn default() -> Self {
        Self::Hello
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    Command,
}

impl Default for CommandType {
    fn default() -> Self {
        Self::Command
    }
}

/// Client hello message (first message on a connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    /// Receive an observation after every board change
    #[serde(default)]
    pub stream_observations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandAction {
    Swap,
    Auto,
    Hint,
    Snapshot,
    Restart,
}

impl CommandAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandAction::Swap => "swap",
            CommandAction::Auto => "auto",
            CommandAction::Hint => "hint",
            CommandAction::Snapshot => "snapshot",
            CommandAction::Restart => "restart",
        }
    }
}

impl<'de> Deserialize<'de> for CommandAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("swap") {
            Ok(Self::Swap)
        } else if s.eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else if s.eq_ignore_ascii_case("hint") {
            Ok(Self::Hint)
        } else if s.eq_ignore_ascii_case("snapshot") {
            Ok(Self::Snapshot)
        } else if s.eq_ignore_ascii_case("restart") {
            Ok(Self::Restart)
        } else {
            Err(serde::de::Error::custom("unknown action"))
        }
    }
}

impl Serialize for CommandAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub action: CommandAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<WirePosition>, // For swap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<WirePosition>, // For swap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>, // For restart
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WirePosition {
    pub x: i8,
    pub y: i8,
}

impl From<Position> for WirePosition {
    fn from(p: Position) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<WirePosition> for Position {
    fn from(p: WirePosition) -> Self {
        Position::new(p.x, p.y)
    }
}

// ============== Board -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeType {
    #[serde(rename = "outcome")]
    Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HintType {
    #[serde(rename = "hint")]
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "not_controller")]
    NotController,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "no_move")]
    NoMove,
    #[serde(rename = "backpressure")]
    Backpressure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedRole {
    #[serde(rename = "controller")]
    Controller,
    #[serde(rename = "observer")]
    Observer,
}

/// Board parameters announced in the welcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInfo {
    pub width: u8,
    pub height: u8,
    pub palette: Vec<TokenKindLower>,
}

impl From<&BoardConfig> for BoardInfo {
    fn from(config: &BoardConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            palette: config.palette.kinds().iter().map(|&k| k.into()).collect(),
        }
    }
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    pub board: BoardInfo,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Result of a `swap` or `auto` command, with the full cascade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: OutcomeType,
    pub seq: u64,
    pub ts: u64,
    pub accepted: bool,
    /// Rejection code (`out_of_bounds`, `not_adjacent`, `cell_empty`, `no_match`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
    pub score_gained: u64,
    pub score: u64,
    pub events: Vec<WireEvent>,
    pub state_hash: StateHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintMessage {
    #[serde(rename = "type")]
    pub msg_type: HintType,
    pub seq: u64,
    pub ts: u64,
    pub a: WirePosition,
    pub b: WirePosition,
}

/// Full board state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub seed: u32,
    pub width: u8,
    pub height: u8,
    /// Rows from `y = 0` upward; 0 = empty, otherwise the token code
    pub cells: Vec<Vec<u8>>,
    pub score: u64,
    pub swaps: u32,
    pub moves_available: usize,
    pub state_hash: StateHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKindLower {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl From<TokenKind> for TokenKindLower {
    fn from(k: TokenKind) -> Self {
        match k {
            TokenKind::Red => Self::Red,
            TokenKind::Green => Self::Green,
            TokenKind::Blue => Self::Blue,
            TokenKind::Yellow => Self::Yellow,
            TokenKind::Purple => Self::Purple,
            TokenKind::Orange => Self::Orange,
        }
    }
}

impl From<TokenKindLower> for TokenKind {
    fn from(k: TokenKindLower) -> Self {
        match k {
            TokenKindLower::Red => Self::Red,
            TokenKindLower::Green => Self::Green,
            TokenKindLower::Blue => Self::Blue,
            TokenKindLower::Yellow => Self::Yellow,
            TokenKindLower::Purple => Self::Purple,
            TokenKindLower::Orange => Self::Orange,
        }
    }
}

/// Deterministic board hash serialized as lowercase hex (without heap allocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut buf = [0u8; 16];
        let mut v = self.0;
        for i in 0..16 {
            buf[15 - i] = HEX[(v & 0x0f) as usize];
            v >>= 4;
        }
        let s = std::str::from_utf8(&buf).map_err(<S::Error as serde::ser::Error>::custom)?;
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        let mut v: u64 = 0;
        for b in s.trim().as_bytes() {
            let d = match b {
                b'0'..=b'9' => (b - b'0') as u64,
                b'a'..=b'f' => (b - b'a' + 10) as u64,
                b'A'..=b'F' => (b - b'A' + 10) as u64,
                _ => return Err(serde::de::Error::custom("invalid hex")),
            };
            v = (v << 4) | d;
        }
        Ok(StateHash(v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMatch {
    pub kind: TokenKindLower,
    pub shape: String,
    pub anchor: WirePosition,
    pub positions: Vec<WirePosition>,
}

impl From<&Match> for WireMatch {
    fn from(m: &Match) -> Self {
        Self {
            kind: m.kind().into(),
            shape: m.shape().as_str().to_string(),
            anchor: m.anchor().into(),
            positions: m.positions().iter().map(|&p| p.into()).collect(),
        }
    }
}

/// One movement; `from` is null for a freshly spawned token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMove {
    pub from: Option<WirePosition>,
    pub to: WirePosition,
    pub distance: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSpawn {
    pub position: WirePosition,
    pub kind: TokenKindLower,
    pub drop_distance: u8,
}

/// Trace event as sent to clients, in resolution order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WireEvent {
    SwapRejected { reason: String, reverted: bool },
    SwapCommitted { a: WirePosition, b: WirePosition },
    MatchesFound { matches: Vec<WireMatch> },
    Destroyed { positions: Vec<WirePosition>, cascade_level: u32 },
    Fell { moves: Vec<WireMove> },
    Refilled { tokens: Vec<WireSpawn> },
    Settled,
    CascadeCapped { iterations: u32 },
    Deadlocked,
    Shuffled { attempt: u32, relocated: usize },
}

impl From<&TraceEvent> for WireEvent {
    fn from(event: &TraceEvent) -> Self {
        match event {
            TraceEvent::SwapRejected { reason, reverted } => WireEvent::SwapRejected {
                reason: reason.code().to_string(),
                reverted: *reverted,
            },
            TraceEvent::SwapCommitted { a, b } => WireEvent::SwapCommitted {
                a: (*a).into(),
                b: (*b).into(),
            },
            TraceEvent::MatchesFound(matches) => WireEvent::MatchesFound {
                matches: matches.iter().map(WireMatch::from).collect(),
            },
            TraceEvent::Destroyed {
                positions,
                cascade_level,
            } => WireEvent::Destroyed {
                positions: positions.iter().map(|&p| p.into()).collect(),
                cascade_level: *cascade_level,
            },
            TraceEvent::Fell(steps) => WireEvent::Fell {
                moves: steps
                    .iter()
                    .map(|s| WireMove {
                        from: match s.from {
                            MoveOrigin::Cell(p) => Some(p.into()),
                            MoveOrigin::Spawn => None,
                        },
                        to: s.to.into(),
                        distance: s.distance,
                    })
                    .collect(),
            },
            TraceEvent::Refilled(tokens) => WireEvent::Refilled {
                tokens: tokens
                    .iter()
                    .map(|t| WireSpawn {
                        position: t.position.into(),
                        kind: t.kind.into(),
                        drop_distance: t.drop_distance,
                    })
                    .collect(),
            },
            TraceEvent::Settled => WireEvent::Settled,
            TraceEvent::CascadeCapped { iterations } => WireEvent::CascadeCapped {
                iterations: *iterations,
            },
            TraceEvent::Deadlocked => WireEvent::Deadlocked,
            TraceEvent::Shuffled(summary) => WireEvent::Shuffled {
                attempt: summary.attempt,
                relocated: summary.relocations.len(),
            },
        }
    }
}

pub fn wire_events(trace: &CascadeTrace) -> Vec<WireEvent> {
    trace.events().iter().map(WireEvent::from).collect()
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            // An unknown type is answered with an error, not a dropped connection.
            #[derive(Debug, Deserialize)]
            struct Envelope<'a> {
                #[serde(rename = "type")]
                #[serde(borrow)]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            match envelope.msg_type {
                Some("hello") | Some("command") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: envelope.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        requested: RequestedCapabilities {
            stream_observations: false,
        },
    }
}

pub fn create_command(seq: u64, action: CommandAction) -> CommandMessage {
    CommandMessage {
        msg_type: CommandType::Command,
        seq,
        ts: current_timestamp_ms(),
        action,
        a: None,
        b: None,
        seed: None,
    }
}

pub fn create_swap_command(seq: u64, a: Position, b: Position) -> CommandMessage {
    CommandMessage {
        a: Some(a.into()),
        b: Some(b.into()),
        ..create_command(seq, CommandAction::Swap)
    }
}

/// Create a welcome message
pub fn create_welcome(
    seq: u64,
    protocol_version: &str,
    client_id: u64,
    role: AssignedRole,
    board: BoardInfo,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
        role,
        board,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

pub fn create_outcome(seq: u64, outcome: &SwapOutcome, score: u64, snap: &GridSnapshot) -> OutcomeMessage {
    OutcomeMessage {
        msg_type: OutcomeType::Outcome,
        seq,
        ts: current_timestamp_ms(),
        accepted: outcome.accepted,
        rejection: outcome.rejection.map(|r| r.code().to_string()),
        score_gained: outcome.score_gained,
        score,
        events: wire_events(&outcome.trace),
        state_hash: StateHash(snap.board_hash),
    }
}

pub fn create_hint(seq: u64, a: Position, b: Position) -> HintMessage {
    HintMessage {
        msg_type: HintType::Hint,
        seq,
        ts: current_timestamp_ms(),
        a: a.into(),
        b: b.into(),
    }
}

pub fn create_observation(seq: u64, seed: u32, snap: &GridSnapshot) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        seed,
        width: snap.width,
        height: snap.height,
        cells: snap.rows(),
        score: snap.score,
        swaps: snap.swaps,
        moves_available: snap.moves_available,
        state_hash: StateHash(snap.board_hash),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, BoardConfig};

    #[test]
    fn parses_hello_without_requested_block() {
        let json = r#"{"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Hello(h) => {
                assert_eq!(h.seq, 1);
                assert!(!h.requested.stream_observations);
            }
            other => panic!("expected hello, got {other:?}"),
        }
    }

    #[test]
    fn parses_swap_command() {
        let json = r#"{"type":"command","seq":4,"ts":0,"action":"swap","a":{"x":1,"y":0},"b":{"x":1,"y":1}}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Command(c) => {
                assert_eq!(c.action, CommandAction::Swap);
                assert_eq!(c.a, Some(WirePosition { x: 1, y: 0 }));
                assert_eq!(c.b, Some(WirePosition { x: 1, y: 1 }));
                assert_eq!(c.seed, None);
            }
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_not_a_parse_error() {
        let parsed = parse_message(r#"{"type":"dance","seq":9}"#).unwrap();
        assert!(matches!(parsed, ParsedMessage::Unknown(UnknownMessage { seq: 9 })));
    }

    #[test]
    fn bad_action_is_a_parse_error() {
        assert!(parse_message(r#"{"type":"command","seq":1,"ts":0,"action":"fly"}"#).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn state_hash_is_fixed_width_hex() {
        let json = serde_json::to_string(&StateHash(0xabc)).unwrap();
        assert_eq!(json, "\"0000000000000abc\"");
        let back: StateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StateHash(0xabc));
    }

    #[test]
    fn outcome_serializes_tagged_events() {
        let mut board = Board::new(BoardConfig::default().with_seed(4)).unwrap();
        let (a, b) = board.hint().unwrap();
        let outcome = board.request_swap(a, b);
        let msg = create_outcome(2, &outcome, board.score(), &board.snapshot());
        let v: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(v["type"], "outcome");
        assert_eq!(v["accepted"], true);
        assert!(v.get("rejection").is_none());
        assert_eq!(v["events"][0]["event"], "swap_committed");
        assert_eq!(v["events"][1]["event"], "matches_found");
        let last = v["events"].as_array().unwrap().last().unwrap().clone();
        assert!(last["event"] == "settled" || last["event"] == "deadlocked");
    }

    #[test]
    fn spawned_moves_have_null_origin() {
        let w = WireMove {
            from: None,
            to: WirePosition { x: 0, y: 7 },
            distance: 2,
        };
        let v = serde_json::to_value(w).unwrap();
        assert!(v["from"].is_null());
    }

    #[test]
    fn capped_cascade_has_its_own_tag() {
        let v = serde_json::to_value(WireEvent::from(&TraceEvent::CascadeCapped {
            iterations: 3,
        }))
        .unwrap();
        assert_eq!(v["event"], "cascade_capped");
        assert_eq!(v["iterations"], 3);
    }
}
