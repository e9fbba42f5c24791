//! Whose turn it is, and when that changes in the viewer's favour.

use lunar_core::{GameState, PlayerId};

/// Turn ownership checks for one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnGate {
    viewer: PlayerId,
}

impl TurnGate {
    /// Creates a gate for the given seat.
    pub fn new(viewer: PlayerId) -> Self {
        Self { viewer }
    }

    /// The viewer's seat.
    pub fn viewer(&self) -> PlayerId {
        self.viewer
    }

    /// Returns true if the viewer is to move.
    pub fn is_my_turn(&self, state: &GameState) -> bool {
        *state.current_player() == self.viewer
    }

    /// Returns true when ownership just passed to the viewer.
    ///
    /// No previous snapshot counts as "not my turn", so the first load fires
    /// when the viewer moves first.
    pub fn turn_started(&self, previous: Option<&GameState>, current: &GameState) -> bool {
        let was_mine = previous.is_some_and(|p| self.is_my_turn(p));
        !was_mine && self.is_my_turn(current)
    }

    /// Banner text for a snapshot.
    pub fn banner(&self, state: &GameState) -> String {
        if *state.game_over() {
            "Game Over".to_string()
        } else if self.is_my_turn(state) {
            "Your turn".to_string()
        } else {
            format!("Player {}'s turn", state.current_player())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunar_core::{Board, Node};

    fn state(player: PlayerId) -> GameState {
        GameState::new(Board::new().with_node("a", Node::new(0, 0)), player)
    }

    #[test]
    fn test_edge_fires_once() {
        let gate = TurnGate::new(PlayerId::ONE);
        let theirs = state(PlayerId::TWO);
        let mine = state(PlayerId::ONE);

        assert!(gate.turn_started(Some(&theirs), &mine));
        assert!(!gate.turn_started(Some(&mine), &mine));
        assert!(!gate.turn_started(Some(&mine), &theirs));
        assert!(!gate.turn_started(Some(&theirs), &theirs));
    }

    #[test]
    fn test_first_load_counts_as_edge() {
        let gate = TurnGate::new(PlayerId::ONE);
        assert!(gate.turn_started(None, &state(PlayerId::ONE)));
        assert!(!gate.turn_started(None, &state(PlayerId::TWO)));
    }

    #[test]
    fn test_banner_text() {
        let gate = TurnGate::new(PlayerId::TWO);
        assert_eq!(gate.banner(&state(PlayerId::TWO)), "Your turn");
        assert_eq!(gate.banner(&state(PlayerId::ONE)), "Player 1's turn");
        assert_eq!(gate.banner(&state(PlayerId::ONE).with_game_over(true)), "Game Over");
    }
}
