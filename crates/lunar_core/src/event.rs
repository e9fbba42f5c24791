//! Scoring events produced by one move.
//!
//! The server attaches an ordered list of these to the snapshot (or move
//! response) that follows a placement. Each is animated exactly once.

use crate::types::{NodeId, NodePair, PlayerId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// Pair payload nested under `structure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStructure {
    /// The two scoring nodes.
    pub pair: NodePair,
}

/// Chain payload nested under `structure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStructure {
    /// Nodes of the cycle in traversal order.
    pub chain: Vec<NodeId>,
}

/// A scored pair (phase pair or full-moon pair).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PairScore {
    /// Scoring player.
    player: PlayerId,
    /// Points awarded.
    points: u32,
    /// The pair itself.
    structure: PairStructure,
    /// Nodes claimed by this score.
    #[serde(default)]
    claimed: Vec<NodeId>,
}

impl PairScore {
    /// Creates a pair score.
    pub fn new(player: PlayerId, points: u32, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Self {
        Self {
            player,
            points,
            structure: PairStructure {
                pair: [a.into(), b.into()],
            },
            claimed: Vec::new(),
        }
    }

    /// The two scoring nodes.
    pub fn pair(&self) -> &NodePair {
        &self.structure.pair
    }
}

/// A completed lunar cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CycleScore {
    /// Scoring player.
    player: PlayerId,
    /// Points as reported by the server (one per chain node).
    #[serde(default)]
    points: u32,
    /// The chain.
    structure: ChainStructure,
    /// Consecutive node pairs the server reports for the chain.
    #[serde(default)]
    connections: Vec<NodePair>,
    /// Nodes claimed by this cycle.
    #[serde(default)]
    claimed: Vec<NodeId>,
}

impl CycleScore {
    /// Creates a cycle score; connections and points are derived from the chain.
    pub fn new<I, N>(player: PlayerId, chain: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeId>,
    {
        let chain: Vec<NodeId> = chain.into_iter().map(Into::into).collect();
        let connections = chain
            .windows(2)
            .map(|w| [w[0].clone(), w[1].clone()])
            .collect();
        Self {
            player,
            points: chain.len() as u32,
            structure: ChainStructure { chain },
            connections,
            claimed: Vec::new(),
        }
    }

    /// Nodes of the cycle in traversal order.
    pub fn chain(&self) -> &[NodeId] {
        &self.structure.chain
    }
}

/// One discrete scoring consequence of a move.
///
/// Unknown `type` tags decode to [`Event::Unrecognized`] so a newer server can
/// introduce event kinds without breaking older clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Event {
    /// Two adjacent nodes in a phase relation; drawn with two marks.
    PhasePair(PairScore),
    /// Two adjacent nodes forming a full moon; drawn with one mark.
    FullMoonPair(PairScore),
    /// A chain of nodes forming a lunar cycle; drawn as bold edges.
    LunarCycle(CycleScore),
    /// Anything this client does not know how to animate.
    #[serde(other)]
    Unrecognized,
}

impl Event {
    /// Shorthand for a phase-pair event.
    pub fn phase_pair(player: PlayerId, points: u32, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Self {
        Event::PhasePair(PairScore::new(player, points, a, b))
    }

    /// Shorthand for a full-moon-pair event.
    pub fn full_moon_pair(
        player: PlayerId,
        points: u32,
        a: impl Into<NodeId>,
        b: impl Into<NodeId>,
    ) -> Self {
        Event::FullMoonPair(PairScore::new(player, points, a, b))
    }

    /// Shorthand for a lunar-cycle event.
    pub fn lunar_cycle<I, N>(player: PlayerId, chain: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeId>,
    {
        Event::LunarCycle(CycleScore::new(player, chain))
    }

    /// Wire name of the event kind.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Scoring player, if the kind is known.
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Event::PhasePair(score) | Event::FullMoonPair(score) => Some(score.player),
            Event::LunarCycle(cycle) => Some(cycle.player),
            Event::Unrecognized => None,
        }
    }
}
