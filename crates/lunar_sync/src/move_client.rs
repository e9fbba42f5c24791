//! Submits the viewer's placements.

use crate::api::GameApi;
use crate::error::ApiError;
use crate::gate::Arrival;
use crate::protocol::MoveRequest;
use derive_getters::Getters;
use lunar_core::{Event, GameState, LastMove, NodeId, PhaseValue, PlayerId};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Message shown when a square is clicked with no card selected.
pub const SELECT_CARD_MESSAGE: &str = "Please select a card.";

/// The server's verdict on one placement.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct MoveOutcome {
    /// The move that was submitted.
    submitted: LastMove,
    /// Whether the server accepted it.
    accepted: bool,
    /// Rejection reason.
    error: Option<String>,
    /// Scoring events.
    events: Vec<Event>,
    /// Snapshot after the move.
    new_state: Option<GameState>,
    /// The move ended the game.
    game_over: bool,
}

impl MoveOutcome {
    /// Converts an accepted outcome into a gate arrival.
    ///
    /// Returns `None` for a rejection or when the server sent no snapshot.
    pub fn into_arrival(self) -> Option<Arrival> {
        if !self.accepted {
            return None;
        }
        let mut snapshot = self.new_state?;
        if self.game_over && !*snapshot.game_over() {
            snapshot = snapshot.with_game_over(true);
        }
        Some(Arrival::from_move(self.submitted, snapshot, self.events))
    }

    /// Message to show for a rejection.
    pub fn rejection_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Move rejected.")
    }
}

/// Client for the viewer's own moves. The server decides legality.
#[derive(Clone)]
pub struct MoveClient {
    api: Arc<dyn GameApi>,
    viewer: PlayerId,
}

impl std::fmt::Debug for MoveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveClient").field("viewer", &self.viewer).finish()
    }
}

impl MoveClient {
    /// Creates a move client for one seat.
    pub fn new(api: Arc<dyn GameApi>, viewer: PlayerId) -> Self {
        Self { api, viewer }
    }

    /// Sends one placement.
    #[instrument(skip(self), fields(node = %node, value = %value, player = %self.viewer))]
    pub async fn submit(&self, node: NodeId, value: PhaseValue) -> Result<MoveOutcome, ApiError> {
        let request = MoveRequest::new(self.viewer, node.clone(), value);
        let response = self.api.place(&request).await?;

        if response.success {
            info!(events = response.events.len(), game_over = response.game_over, "Move accepted");
        } else {
            warn!(error = ?response.error, "Move rejected");
        }

        Ok(MoveOutcome {
            submitted: LastMove::new(self.viewer, node, value),
            accepted: response.success,
            error: response.error,
            events: response.events,
            new_state: response.state,
            game_over: response.game_over,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::ArrivalSource;
    use lunar_core::{Board, Node};

    fn outcome(accepted: bool, new_state: Option<GameState>, game_over: bool) -> MoveOutcome {
        MoveOutcome {
            submitted: LastMove::new(PlayerId::ONE, "a", PhaseValue::new(2).unwrap()),
            accepted,
            error: (!accepted).then(|| "Not your turn".to_string()),
            events: Vec::new(),
            new_state,
            game_over,
        }
    }

    fn state() -> GameState {
        GameState::new(Board::new().with_node("a", Node::new(0, 0)), PlayerId::TWO)
    }

    #[test]
    fn test_rejection_yields_no_arrival() {
        let rejected = outcome(false, None, false);
        assert_eq!(rejected.rejection_message(), "Not your turn");
        assert!(rejected.into_arrival().is_none());
    }

    #[test]
    fn test_accepted_move_becomes_move_arrival() {
        let arrival = outcome(true, Some(state()), true).into_arrival().unwrap();
        assert!(*arrival.snapshot.game_over());
        assert!(matches!(arrival.source, ArrivalSource::Move(ref mv) if mv.node().as_str() == "a"));
    }

    #[test]
    fn test_accepted_without_state_needs_resync() {
        assert!(outcome(true, None, false).into_arrival().is_none());
    }
}
