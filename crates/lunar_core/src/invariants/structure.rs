//! Structural invariants of a single snapshot.

use super::Invariant;
use crate::state::GameState;

/// Invariant: the snapshot carries a non-empty board graph.
pub struct BoardPresentInvariant;

impl Invariant<GameState> for BoardPresentInvariant {
    fn holds(state: &GameState) -> bool {
        !state.board().is_empty()
    }

    fn description() -> &'static str {
        "Snapshot carries a board graph"
    }
}

/// Invariant: the seat to move is 1 or 2.
pub struct SeatInvariant;

impl Invariant<GameState> for SeatInvariant {
    fn holds(state: &GameState) -> bool {
        state.current_player().is_seat()
    }

    fn description() -> &'static str {
        "Current player is seat 1 or 2"
    }
}

/// Invariant: every node named by neighbors, connections, claims or the last
/// move exists on the board.
pub struct KnownNodesInvariant;

impl Invariant<GameState> for KnownNodesInvariant {
    fn holds(state: &GameState) -> bool {
        let board = state.board();

        let neighbors_known = board
            .iter()
            .flat_map(|(_, node)| node.neighbors().iter())
            .all(|id| board.contains(id));

        let connections_known = state
            .connections()
            .referenced_nodes()
            .all(|id| board.contains(id));

        let claims_known = state.claimed_cards().keys().all(|id| board.contains(id));

        let last_move_known = state
            .last_move()
            .as_ref()
            .is_none_or(|m| board.contains(m.node()));

        neighbors_known && connections_known && claims_known && last_move_known
    }

    fn description() -> &'static str {
        "Every referenced node exists on the board"
    }
}

/// Invariant: placed values and hand cards are valid phases.
pub struct PhaseRangeInvariant;

impl Invariant<GameState> for PhaseRangeInvariant {
    fn holds(state: &GameState) -> bool {
        let board_ok = state
            .board()
            .iter()
            .filter_map(|(_, node)| *node.value())
            .all(|value| value.is_valid());

        board_ok && state.hand().iter().all(|value| value.is_valid())
    }

    fn description() -> &'static str {
        "Phase values are within 0..=7"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Board, Connections, Node};
    use crate::types::PlayerId;

    fn two_node_board() -> Board {
        Board::new()
            .with_node("a", Node::new(0, 0).with_neighbors(["b"]))
            .with_node("b", Node::new(0, 1).with_neighbors(["a"]))
    }

    #[test]
    fn test_empty_board_fails() {
        let state = GameState::new(Board::new(), PlayerId::ONE);
        assert!(!BoardPresentInvariant::holds(&state));
    }

    #[test]
    fn test_bad_seat_fails() {
        let state = GameState::new(two_node_board(), PlayerId::new(3));
        assert!(!SeatInvariant::holds(&state));
    }

    #[test]
    fn test_unknown_connection_node_fails() {
        let state = GameState::new(two_node_board(), PlayerId::ONE)
            .with_connections(Connections::default().with_phase_pair("a", "zz"));
        assert!(!KnownNodesInvariant::holds(&state));
    }

    #[test]
    fn test_unknown_neighbor_fails() {
        let board = two_node_board().with_node("c", Node::new(1, 0).with_neighbors(["ghost"]));
        let state = GameState::new(board, PlayerId::ONE);
        assert!(!KnownNodesInvariant::holds(&state));
    }

    #[test]
    fn test_valid_snapshot_holds() {
        let state = GameState::new(two_node_board(), PlayerId::TWO)
            .with_connections(Connections::default().with_lunar_cycle(["a", "b"]));
        assert!(BoardPresentInvariant::holds(&state));
        assert!(SeatInvariant::holds(&state));
        assert!(KnownNodesInvariant::holds(&state));
        assert!(PhaseRangeInvariant::holds(&state));
    }
}
