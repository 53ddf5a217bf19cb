//! Protocol module - JSON message types for the control adapter
//!
//! Line-delimited JSON. Every message carries `type`, `seq` (sender sequence
//! number) and `ts` (unix milliseconds).

use serde::{Deserialize, Serialize};

use arrayvec::ArrayVec;

use crate::core::GameSnapshot;
use crate::types::{Direction, GameAction, TurnEvent, GRID_SIZE};

/// Protocol version spoken by this server. Clients must match the major part.
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Upper bound on actions in one `command` message.
pub const MAX_ACTIONS_PER_COMMAND: usize = 32;

/// Actions carried by one command, in the order they must be applied.
pub type ActionBatch = ArrayVec<GameAction, MAX_ACTIONS_PER_COMMAND>;

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HelloType {
    #[serde(rename = "hello")]
    #[default]
    Hello,
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

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    #[serde(default)]
    pub stream_observations: bool,
}

/// Role handed out in `welcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedRole {
    #[serde(rename = "controller")]
    Controller,
    #[serde(rename = "observer")]
    Observer,
}

/// Command message (controller only)
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    pub seq: u64,
    pub ts: u64,
    pub actions: ActionList,
}

/// Parsed `actions` array. Unknown names and overlong lists fail to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionList(pub ActionBatch);

impl<'de> Deserialize<'de> for ActionList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = ActionList;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an array of action strings")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = ActionBatch::new();
                while let Some(name) = seq.next_element::<std::borrow::Cow<'de, str>>()? {
                    let action = GameAction::from_str(&name).ok_or_else(|| {
                        <A::Error as serde::de::Error>::custom(format!("unknown action: {}", name))
                    })?;
                    out.try_push(action)
                        .map_err(|_| <A::Error as serde::de::Error>::custom("too many actions"))?;
                }
                Ok(ActionList(out))
            }
        }

        deserializer.deserialize_seq(V)
    }
}

/// Control message (claim/release controller status)
#[derive(Debug, Clone, Deserialize)]
pub struct ControlMessage {
    pub seq: u64,
    pub ts: u64,
    pub action: ControlAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Claim,
    Release,
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    ControllerActive,
    InvalidCommand,
    Backpressure,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<u64>,
    pub game_id: String,
}

/// Acknowledgment, sent after the command has been applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

/// Game state observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub playable: bool,
    /// Row-major tile values, 0 for empty.
    pub grid: [[u32; GRID_SIZE]; GRID_SIZE],
    pub score: u32,
    pub won: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub move_count: u32,
    pub max_tile: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event: Option<LastEvent>,
    pub state_hash: StateHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionLower {
    Up,
    Down,
    Left,
    Right,
}

impl From<Direction> for DirectionLower {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnSnapshot {
    pub row: u8,
    pub col: u8,
    pub value: u32,
}

/// The turn that produced this observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEvent {
    pub direction: DirectionLower,
    pub score_gained: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawned: Option<SpawnSnapshot>,
    pub won_now: bool,
    pub game_over_now: bool,
}

impl From<&TurnEvent> for LastEvent {
    fn from(value: &TurnEvent) -> Self {
        Self {
            direction: value.direction.into(),
            score_gained: value.score_gained,
            spawned: value.spawned.map(|t| SpawnSnapshot {
                row: t.row as u8,
                col: t.col as u8,
                value: t.value,
            }),
            won_now: value.won_now,
            game_over_now: value.game_over_now,
        }
    }
}

/// Deterministic state hash serialized as 16 lowercase hex digits.
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
        for slot in buf.iter_mut().rev() {
            *slot = HEX[(v & 0x0f) as usize];
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
        let s = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

/// Stable 64-bit FNV-1a hasher for `state_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions, and
/// `Hash` impls write integers in native byte order, so values are fed in
/// explicitly as little-endian bytes.
#[derive(Debug, Clone)]
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write(&[v as u8]);
    }

    pub fn finish(&self) -> u64 {
        self.state
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash over grid, score, flags, episode and move count.
pub fn state_hash(snap: &GameSnapshot) -> StateHash {
    let mut h = Fnv1aHasher::new();
    for row in &snap.cells {
        for &v in row {
            h.write_u32(v);
        }
    }
    h.write_u32(snap.score);
    h.write_bool(snap.won);
    h.write_bool(snap.game_over);
    h.write_u32(snap.episode_id);
    h.write_u32(snap.move_count);
    StateHash(h.finish())
}

/// Build an observation from a snapshot.
pub fn build_observation(
    snap: &GameSnapshot,
    seq: u64,
    last_event: Option<&TurnEvent>,
) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        playable: snap.playable(),
        grid: snap.cells,
        score: snap.score,
        won: snap.won,
        game_over: snap.game_over,
        episode_id: snap.episode_id,
        move_count: snap.move_count,
        max_tile: snap.max_tile,
        last_event: last_event.map(LastEvent::from),
        state_hash: state_hash(snap),
    }
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Control(ControlMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Parse one JSON line.
///
/// A well-formed object with an unrecognized `type` is not an error; it comes
/// back as [`ParsedMessage::Unknown`] so the server can answer it.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "control")]
        Control(ControlMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Control(m)) => Ok(ParsedMessage::Control(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let env = serde_json::from_str::<Envelope>(json)?;
            match env.msg_type.as_deref() {
                Some("hello") | Some("command") | Some("control") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: env.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Pull `"seq": <digits>` out of a line that failed to parse.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest
        .as_bytes()
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// True when `version` shares the server's major version.
pub fn is_compatible_version(version: &str) -> bool {
    let major = |v: &str| v.split('.').next().map(str::to_owned);
    major(version).is_some_and(|m| Some(m) == major(PROTOCOL_VERSION))
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
            stream_observations: true,
        },
    }
}

/// Create a welcome message
pub fn create_welcome(
    seq: u64,
    client_id: u64,
    role: AssignedRole,
    controller_id: Option<u64>,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client_id,
        role,
        controller_id,
        game_id: "tui-2048".to_string(),
    }
}

/// Create an ack echoing the command's `seq`.
pub fn create_ack(seq: u64) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
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

/// Current unix time in milliseconds
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
