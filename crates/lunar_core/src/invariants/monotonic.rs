//! Monotonic invariants: values and scores only grow within a game.

use super::{Invariant, Transition};

/// Invariant: a placed node never reverts to empty.
///
/// Only holds between snapshots of the same game; resets and undos are
/// applied without this check.
pub struct MonotonicBoardInvariant;

impl<'a> Invariant<Transition<'a>> for MonotonicBoardInvariant {
    fn holds(transition: &Transition<'a>) -> bool {
        transition
            .previous
            .board()
            .iter()
            .filter(|(_, node)| node.value().is_some())
            .all(|(id, _)| transition.next.value_at(id).is_some())
    }

    fn description() -> &'static str {
        "Placed nodes never revert to empty"
    }
}

/// Invariant: no player's score decreases.
pub struct MonotonicScoresInvariant;

impl<'a> Invariant<Transition<'a>> for MonotonicScoresInvariant {
    fn holds(transition: &Transition<'a>) -> bool {
        transition
            .previous
            .scores()
            .iter()
            .all(|(player, points)| transition.next.score(*player) >= *points)
    }

    fn description() -> &'static str {
        "Scores never decrease within a game"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Board, GameState, Node};
    use crate::types::{NodeId, PhaseValue, PlayerId};

    fn board() -> Board {
        Board::new()
            .with_node("a", Node::new(0, 0))
            .with_node("b", Node::new(0, 1))
    }

    #[test]
    fn test_placing_holds() {
        let previous = GameState::new(board(), PlayerId::ONE);
        let mut next = previous.clone();
        next.place(&NodeId::from("a"), PhaseValue::new(3).unwrap());
        assert!(MonotonicBoardInvariant::holds(&Transition {
            previous: &previous,
            next: &next,
        }));
    }

    #[test]
    fn test_clearing_fails() {
        let mut previous = GameState::new(board(), PlayerId::ONE);
        previous.place(&NodeId::from("a"), PhaseValue::new(3).unwrap());
        let next = GameState::new(board(), PlayerId::TWO);
        assert!(!MonotonicBoardInvariant::holds(&Transition {
            previous: &previous,
            next: &next,
        }));
    }

    #[test]
    fn test_score_decrease_fails() {
        let previous = GameState::new(board(), PlayerId::ONE).with_score(PlayerId::ONE, 4);
        let next = GameState::new(board(), PlayerId::TWO).with_score(PlayerId::ONE, 3);
        let transition = Transition {
            previous: &previous,
            next: &next,
        };
        assert!(!MonotonicScoresInvariant::holds(&transition));
    }
}
