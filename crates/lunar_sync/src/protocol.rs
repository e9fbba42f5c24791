//! Wire messages exchanged with the game server.

use derive_new::new;
use lunar_core::{Event, GameState, NodeId, PhaseValue, PlayerId};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Body of a `state_updated` push: a full snapshot plus delivery flags.
///
/// On the wire the flags sit next to the snapshot fields in one flat object.
/// Decoding goes through [`serde_json::Value`] rather than `#[serde(flatten)]`
/// so integer-keyed maps such as `scores` keep decoding from string keys.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct PushPayload {
    /// The snapshot.
    pub state: GameState,
    /// Scoring events of the move that produced this snapshot.
    pub events: Vec<Event>,
    /// The snapshot starts a new game.
    pub new_game: bool,
    /// The snapshot is the result of an undo.
    pub is_undo: bool,
    /// The snapshot was produced by a debug board fill.
    pub debug_fill: bool,
}

#[derive(Deserialize)]
struct PushFlags {
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    new_game: bool,
    #[serde(default)]
    is_undo: bool,
    #[serde(default)]
    debug_fill: bool,
}

impl TryFrom<serde_json::Value> for PushPayload {
    type Error = serde_json::Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let flags: PushFlags = serde_json::from_value(value.clone())?;
        let state: GameState = serde_json::from_value(value)?;
        Ok(Self {
            state,
            events: flags.events,
            new_game: flags.new_game,
            is_undo: flags.is_undo,
            debug_fill: flags.debug_fill,
        })
    }
}

impl PushPayload {
    /// A plain snapshot with no events or flags.
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            events: Vec::new(),
            new_game: false,
            is_undo: false,
            debug_fill: false,
        }
    }

    /// Attaches scoring events.
    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    /// Marks the payload as the start of a new game.
    pub fn as_new_game(mut self) -> Self {
        self.new_game = true;
        self
    }

    /// Marks the payload as an undo result.
    pub fn as_undo(mut self) -> Self {
        self.is_undo = true;
        self
    }
}

/// Something delivered by the push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    /// `state_updated` from the server (or the polling fallback).
    StateUpdated(Box<PushPayload>),
    /// The channel came (back) up.
    Connected,
    /// The channel dropped.
    Disconnected,
}

/// Body of `POST /place`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct MoveRequest {
    /// Seat placing the card.
    pub player: PlayerId,
    /// Target node.
    pub node_name: NodeId,
    /// Card value.
    pub value: PhaseValue,
}

/// Response of `POST /place`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Whether the server accepted the move.
    pub success: bool,
    /// Rejection reason.
    #[serde(default)]
    pub error: Option<String>,
    /// Scoring events produced by the move.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Snapshot after the move.
    #[serde(default)]
    pub state: Option<GameState>,
    /// The move ended the game.
    #[serde(default)]
    pub game_over: bool,
}

impl MoveResponse {
    /// An accepted move.
    pub fn accepted(state: GameState, events: Vec<Event>) -> Self {
        Self {
            success: true,
            error: None,
            events,
            state: Some(state),
            game_over: false,
        }
    }

    /// A rejected move.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            events: Vec::new(),
            state: None,
            game_over: false,
        }
    }
}

/// History and lifecycle requests that carry no body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ControlAction {
    /// Start a new game.
    Reset,
    /// Take back the last move.
    Undo,
    /// Replay an undone move.
    Redo,
}

impl ControlAction {
    /// Message shown when the server refuses the request without a reason.
    pub fn failure_message(self) -> &'static str {
        match self {
            ControlAction::Reset => "Unable to reset the game.",
            ControlAction::Undo => "Unable to undo move.",
            ControlAction::Redo => "Unable to redo move.",
        }
    }
}

/// Response of a reset/undo/redo request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlResponse {
    /// Whether the request was honoured.
    pub success: bool,
    /// Snapshot after the request.
    #[serde(default)]
    pub state: Option<GameState>,
    /// Refusal reason.
    #[serde(default)]
    pub error: Option<String>,
}
