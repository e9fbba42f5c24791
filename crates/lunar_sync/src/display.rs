//! The displayed projection of a snapshot.
//!
//! While a timeline runs, scores and connection marks on screen lag behind the
//! authoritative snapshot and catch up one event at a time. This model holds
//! what the surface currently shows so the sequencer can append to it without
//! touching the store.

use derive_getters::Getters;
use lunar_core::{build_persistent_edges, EdgeSet, GameState, NodeId, PlayerId, Scores, UndirectedEdge};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// What the surface currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct DisplayModel {
    /// Scores as displayed.
    scores: Scores,
    /// Bold edges of completed lunar cycles.
    persistent_edges: EdgeSet,
    /// Pairs drawn with two marks.
    phase_marks: BTreeSet<UndirectedEdge>,
    /// Pairs drawn with one mark.
    full_moon_marks: BTreeSet<UndirectedEdge>,
    /// Whether the end-of-game panel is up.
    final_panel_visible: bool,
}

impl DisplayModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the full projection of a snapshot.
    pub fn from_state(state: &GameState) -> Self {
        let mut model = Self::new();
        model.sync_connections(state);
        model.sync_scores(state);
        model
    }

    /// Rebuilds edges and marks from the snapshot's connections.
    #[instrument(skip_all)]
    pub fn sync_connections(&mut self, state: &GameState) {
        let connections = state.connections();
        self.persistent_edges = build_persistent_edges(connections.lunar_cycles());
        self.phase_marks = connections
            .phase_pairs()
            .iter()
            .map(|[a, b]| UndirectedEdge::new(a.clone(), b.clone()))
            .collect();
        self.full_moon_marks = connections
            .full_moon_pairs()
            .iter()
            .map(|[a, b]| UndirectedEdge::new(a.clone(), b.clone()))
            .collect();
        debug!(
            edges = self.persistent_edges.len(),
            phase_marks = self.phase_marks.len(),
            full_moon_marks = self.full_moon_marks.len(),
            "Connections synced"
        );
    }

    /// Copies the snapshot's scores.
    pub fn sync_scores(&mut self, state: &GameState) {
        self.scores = state.scores().clone();
    }

    /// Registers a two-mark connection.
    pub fn add_phase_mark(&mut self, a: &NodeId, b: &NodeId) -> bool {
        self.phase_marks.insert(UndirectedEdge::new(a.clone(), b.clone()))
    }

    /// Registers a one-mark connection.
    pub fn add_full_moon_mark(&mut self, a: &NodeId, b: &NodeId) -> bool {
        self.full_moon_marks
            .insert(UndirectedEdge::new(a.clone(), b.clone()))
    }

    /// Marks the edges of one lunar cycle persistent. Returns how many were new.
    pub fn add_chain(&mut self, chain: &[NodeId]) -> usize {
        self.persistent_edges.extend_chain(chain)
    }

    /// Adds one point to a player's displayed score.
    pub fn bump_score(&mut self, player: PlayerId) -> u32 {
        let score = self.scores.entry(player).or_default();
        *score += 1;
        *score
    }

    /// Displayed score for a player.
    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores.get(&player).copied().unwrap_or(0)
    }

    /// Drops every persistent edge and mark.
    pub fn clear_connections(&mut self) {
        self.persistent_edges.clear();
        self.phase_marks.clear();
        self.full_moon_marks.clear();
    }

    /// Records the end-of-game panel as shown.
    pub fn show_final_panel(&mut self) {
        self.final_panel_visible = true;
    }

    /// Records the end-of-game panel as hidden.
    pub fn hide_final_panel(&mut self) {
        self.final_panel_visible = false;
    }
}
