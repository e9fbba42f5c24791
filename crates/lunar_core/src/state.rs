//! Authoritative game-state snapshots as delivered by the server.

use crate::types::{NodeId, NodePair, PhaseValue, PlayerId};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points per player.
pub type Scores = BTreeMap<PlayerId, u32>;

/// One node of the board graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Node {
    /// Placed phase, `None` while empty.
    #[serde(default)]
    value: Option<PhaseValue>,
    /// Adjacent node names.
    #[serde(default)]
    neighbors: Vec<NodeId>,
    /// Layout position as `[row, col]`.
    #[serde(default)]
    position: [i32; 2],
}

impl Node {
    /// Creates an empty node at the given layout position.
    pub fn new(row: i32, col: i32) -> Self {
        Self {
            value: None,
            neighbors: Vec::new(),
            position: [row, col],
        }
    }

    /// Adds neighbors.
    pub fn with_neighbors<I, N>(mut self, neighbors: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeId>,
    {
        self.neighbors.extend(neighbors.into_iter().map(Into::into));
        self
    }

    /// Sets the placed value.
    pub fn with_value(mut self, value: PhaseValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Returns true if no card has been placed here.
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

/// The board graph, keyed by node name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    nodes: BTreeMap<NodeId, Node>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node (builder style).
    pub fn with_node(mut self, id: impl Into<NodeId>, node: Node) -> Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Looks up a node.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns true if the node exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the board has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true once every node holds a value.
    pub fn is_full(&self) -> bool {
        !self.nodes.is_empty() && self.nodes.values().all(|n| n.value.is_some())
    }

    /// Iterates nodes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Nodes ordered by layout position (row, then column).
    pub fn in_layout_order(&self) -> Vec<(&NodeId, &Node)> {
        let mut nodes: Vec<_> = self.nodes.iter().collect();
        nodes.sort_by_key(|(_, node)| node.position);
        nodes
    }

    /// Places a value on a node. Returns false if the node does not exist.
    pub fn set_value(&mut self, id: &NodeId, value: PhaseValue) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.value = Some(value);
                true
            }
            None => false,
        }
    }
}

/// Scoring structures the server has confirmed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Connections {
    /// Pairs drawn with two marks.
    #[serde(default)]
    phase_pairs: Vec<NodePair>,
    /// Pairs drawn with one mark.
    #[serde(default)]
    full_moon_pairs: Vec<NodePair>,
    /// Completed lunar-cycle chains, each an ordered node list.
    #[serde(default)]
    lunar_cycles: Vec<Vec<NodeId>>,
}

impl Connections {
    /// Adds a phase pair (builder style).
    pub fn with_phase_pair(mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Self {
        self.phase_pairs.push([a.into(), b.into()]);
        self
    }

    /// Adds a full-moon pair (builder style).
    pub fn with_full_moon_pair(mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Self {
        self.full_moon_pairs.push([a.into(), b.into()]);
        self
    }

    /// Adds a lunar-cycle chain (builder style).
    pub fn with_lunar_cycle<I, N>(mut self, chain: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeId>,
    {
        self.lunar_cycles
            .push(chain.into_iter().map(Into::into).collect());
        self
    }

    /// Every node id referenced by any structure.
    pub fn referenced_nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.phase_pairs
            .iter()
            .chain(self.full_moon_pairs.iter())
            .flat_map(|pair| pair.iter())
            .chain(self.lunar_cycles.iter().flatten())
    }
}

/// The most recent placement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct LastMove {
    /// Who placed.
    player: PlayerId,
    /// Where.
    #[serde(alias = "node_name")]
    node: NodeId,
    /// What.
    value: PhaseValue,
}

impl LastMove {
    /// Creates a move record.
    pub fn new(player: PlayerId, node: impl Into<NodeId>, value: PhaseValue) -> Self {
        Self {
            player,
            node: node.into(),
            value,
        }
    }
}

/// End-of-game score breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct FinalScores {
    /// Points earned during play.
    #[serde(default)]
    base_scores: Scores,
    /// One point per claimed card.
    #[serde(default)]
    bonus_scores: Scores,
    /// Base plus bonus.
    #[serde(default)]
    final_scores: Scores,
}

impl FinalScores {
    /// Builds a breakdown, totalling base and bonus per player.
    pub fn new(base_scores: Scores, bonus_scores: Scores) -> Self {
        let mut final_scores = base_scores.clone();
        for (player, bonus) in &bonus_scores {
            *final_scores.entry(*player).or_default() += bonus;
        }
        Self {
            base_scores,
            bonus_scores,
            final_scores,
        }
    }
}

/// A complete authoritative snapshot of one game, from one viewer's side.
///
/// Fields the server may omit default to empty values so that a payload with a
/// missing board still parses and is then rejected by validation rather than
/// by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct GameState {
    /// Board graph.
    #[serde(rename = "graph", default)]
    board: Board,
    /// The viewer's hand.
    #[serde(default)]
    hand: Vec<PhaseValue>,
    /// Number of cards the opponent holds.
    #[serde(default)]
    opponent_hand_size: usize,
    /// Points per player.
    #[serde(default)]
    scores: Scores,
    /// Seat to move.
    #[serde(default)]
    current_player: PlayerId,
    /// Node → owning player.
    #[serde(default)]
    claimed_cards: BTreeMap<NodeId, PlayerId>,
    /// Confirmed scoring structures.
    #[serde(default)]
    connections: Connections,
    /// Most recent placement.
    #[serde(default)]
    #[setters(strip_option)]
    last_move: Option<LastMove>,
    /// True once the game has ended.
    #[serde(default)]
    game_over: bool,
    /// End-of-game breakdown.
    #[serde(default)]
    #[setters(strip_option)]
    final_scores: Option<FinalScores>,
    /// Cards left in the deck.
    #[serde(default)]
    #[setters(strip_option)]
    deck_remaining: Option<u32>,
}

impl GameState {
    /// Creates a fresh snapshot with zeroed scores.
    pub fn new(board: Board, current_player: PlayerId) -> Self {
        Self {
            board,
            current_player,
            scores: [(PlayerId::ONE, 0), (PlayerId::TWO, 0)].into_iter().collect(),
            ..Self::default()
        }
    }

    /// Score for a player, zero if absent.
    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores.get(&player).copied().unwrap_or(0)
    }

    /// Sets one player's score (builder style).
    pub fn with_score(mut self, player: PlayerId, points: u32) -> Self {
        self.scores.insert(player, points);
        self
    }

    /// Places a value on one node in place. Returns false if the node is unknown.
    pub fn place(&mut self, node: &NodeId, value: PhaseValue) -> bool {
        self.board.set_value(node, value)
    }

    /// Value on a node, if placed.
    pub fn value_at(&self, node: &NodeId) -> Option<PhaseValue> {
        self.board.node(node).and_then(|n| n.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_server_payload() {
        let json = r#"{
            "graph": {"nodes": {
                "n1": {"value": null, "neighbors": ["n2"], "position": [0, 0]},
                "n2": {"value": 4, "neighbors": ["n1"], "position": [0, 1]}
            }},
            "hand": [1, 2, 3],
            "scores": {"1": 2, "2": 5},
            "current_player": 2,
            "claimed_cards": {"n2": 1},
            "connections": {"phase_pairs": [["n1", "n2"]], "full_moon_pairs": [], "lunar_cycles": []},
            "last_move": {"player": 1, "node": "n2", "value": 4},
            "game_over": false
        }"#;
        let state: GameState = serde_json::from_str(json).unwrap();
        assert_eq!(state.board().len(), 2);
        assert_eq!(state.score(PlayerId::TWO), 5);
        assert_eq!(*state.current_player(), PlayerId::TWO);
        assert_eq!(state.value_at(&NodeId::from("n2")), PhaseValue::new(4));
        assert_eq!(state.connections().phase_pairs().len(), 1);
        assert!(state.final_scores().is_none());
    }

    #[test]
    fn test_missing_graph_parses_as_empty_board() {
        let state: GameState = serde_json::from_str(r#"{"current_player": 1}"#).unwrap();
        assert!(state.board().is_empty());
    }

    #[test]
    fn test_layout_order_sorts_by_position() {
        let board = Board::new()
            .with_node("b", Node::new(1, 0))
            .with_node("a", Node::new(0, 1))
            .with_node("c", Node::new(0, 0));
        let names: Vec<_> = board
            .in_layout_order()
            .into_iter()
            .map(|(id, _)| id.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_final_scores_total_base_and_bonus() {
        let base: Scores = [(PlayerId::ONE, 4), (PlayerId::TWO, 6)].into_iter().collect();
        let bonus: Scores = [(PlayerId::ONE, 2)].into_iter().collect();
        let totals = FinalScores::new(base, bonus);
        assert_eq!(totals.final_scores().get(&PlayerId::ONE), Some(&6));
        assert_eq!(totals.final_scores().get(&PlayerId::TWO), Some(&6));
    }
}
