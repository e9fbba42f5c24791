//! The presentation boundary.
//!
//! Rendering is someone else's job. The sync core tells a
//! [`PresentationSurface`] what to show and receives clicks back through
//! [`SurfaceInputs`].

use crate::display::DisplayModel;
use crate::driver::ClientInput;
use lunar_core::{FinalScores, GameState, NodeId, NodePair, PhaseValue, PlayerId, Scores, UndirectedEdge};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Where a score token starts its flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOrigin {
    /// A single node (one token per node of a lunar cycle).
    Node(NodeId),
    /// Midway between two nodes (pair scores).
    Midpoint(NodePair),
}

/// Something that can show the game.
///
/// The required methods cover the static view. The animation and panel hooks
/// default to no-ops so a surface without those affordances still works; the
/// timeline keeps its pacing either way.
pub trait PresentationSurface: Send {
    /// Renders every node with its value.
    fn draw_board(&mut self, state: &GameState);

    /// Renders pair marks and persistent edges.
    fn draw_connections(&mut self, display: &DisplayModel);

    /// Renders the viewer's hand with an optional selected index.
    fn show_hand(&mut self, hand: &[PhaseValue], selected: Option<usize>);

    /// Renders displayed scores.
    fn update_scores(&mut self, scores: &Scores);

    /// Shows the turn banner.
    fn show_turn_banner(&mut self, text: &str);

    /// Highlights nodes taking part in a scoring event.
    fn highlight_nodes(&mut self, _nodes: &[NodeId]) {}

    /// Draws one lunar-cycle edge.
    fn draw_edge(&mut self, _edge: &UndirectedEdge) {}

    /// Starts one score token flying toward a player's score.
    fn launch_score_token(&mut self, _origin: &TokenOrigin, _player: PlayerId) {}

    /// Shows the end-of-game panel.
    fn show_final_scores(&mut self, _scores: &FinalScores) {}

    /// Hides the end-of-game panel.
    fn hide_final_scores(&mut self) {}

    /// Shows a user-facing error.
    fn show_error(&mut self, _message: &str) {}
}

impl<S: PresentationSurface + ?Sized> PresentationSurface for Box<S> {
    fn draw_board(&mut self, state: &GameState) {
        (**self).draw_board(state)
    }

    fn draw_connections(&mut self, display: &DisplayModel) {
        (**self).draw_connections(display)
    }

    fn show_hand(&mut self, hand: &[PhaseValue], selected: Option<usize>) {
        (**self).show_hand(hand, selected)
    }

    fn update_scores(&mut self, scores: &Scores) {
        (**self).update_scores(scores)
    }

    fn show_turn_banner(&mut self, text: &str) {
        (**self).show_turn_banner(text)
    }

    fn highlight_nodes(&mut self, nodes: &[NodeId]) {
        (**self).highlight_nodes(nodes)
    }

    fn draw_edge(&mut self, edge: &UndirectedEdge) {
        (**self).draw_edge(edge)
    }

    fn launch_score_token(&mut self, origin: &TokenOrigin, player: PlayerId) {
        (**self).launch_score_token(origin, player)
    }

    fn show_final_scores(&mut self, scores: &FinalScores) {
        (**self).show_final_scores(scores)
    }

    fn hide_final_scores(&mut self) {
        (**self).hide_final_scores()
    }

    fn show_error(&mut self, message: &str) {
        (**self).show_error(message)
    }
}

/// Sender half for surface callbacks.
#[derive(Debug, Clone)]
pub struct SurfaceInputs {
    tx: mpsc::UnboundedSender<ClientInput>,
}

impl SurfaceInputs {
    /// Wraps the driver's input channel.
    pub fn new(tx: mpsc::UnboundedSender<ClientInput>) -> Self {
        Self { tx }
    }

    /// A board square was clicked. Returns false once the driver is gone.
    #[instrument(skip(self), fields(node = %node))]
    pub fn on_square_clicked(&self, node: NodeId) -> bool {
        self.tx.send(ClientInput::SquareClicked(node)).is_ok()
    }

    /// A hand card was clicked. Returns false once the driver is gone.
    #[instrument(skip(self), fields(value = %value))]
    pub fn on_card_selected(&self, value: PhaseValue) -> bool {
        self.tx.send(ClientInput::CardSelected(value)).is_ok()
    }
}

/// Renders into the log. Used by the command-line client.
#[derive(Debug, Default)]
pub struct TracingSurface;

impl TracingSurface {
    /// Creates the surface.
    pub fn new() -> Self {
        Self
    }

    fn glyph(value: Option<PhaseValue>) -> char {
        value
            .and_then(PhaseValue::phase)
            .map(|phase| phase.glyph())
            .unwrap_or('·')
    }

    fn format_scores(scores: &Scores) -> String {
        scores
            .iter()
            .map(|(player, points)| format!("P{}={}", player, points))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PresentationSurface for TracingSurface {
    fn draw_board(&mut self, state: &GameState) {
        let mut rows: Vec<String> = Vec::new();
        let mut current_row = None;
        for (id, node) in state.board().in_layout_order() {
            let row = node.position()[0];
            if current_row != Some(row) {
                rows.push(String::new());
                current_row = Some(row);
            }
            if let Some(line) = rows.last_mut() {
                line.push_str(&format!("{}:{} ", id, Self::glyph(*node.value())));
            }
        }
        for line in rows {
            info!(target: "lunar_sync::board", "{}", line.trim_end());
        }
    }

    fn draw_connections(&mut self, model: &DisplayModel) {
        debug!(
            phase_pairs = model.phase_marks().len(),
            full_moon_pairs = model.full_moon_marks().len(),
            cycle_edges = model.persistent_edges().len(),
            "Connections"
        );
    }

    fn show_hand(&mut self, hand: &[PhaseValue], selected: Option<usize>) {
        let cards = hand
            .iter()
            .enumerate()
            .map(|(i, value)| {
                if selected == Some(i) {
                    format!("[{}]", value)
                } else {
                    value.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        info!(hand = %cards, "Hand");
    }

    fn update_scores(&mut self, scores: &Scores) {
        info!(scores = %Self::format_scores(scores), "Scores");
    }

    fn show_turn_banner(&mut self, text: &str) {
        info!("{}", text);
    }

    fn highlight_nodes(&mut self, nodes: &[NodeId]) {
        let names = nodes.iter().map(NodeId::as_str).collect::<Vec<_>>().join(",");
        debug!(nodes = %names, "Highlight");
    }

    fn draw_edge(&mut self, edge: &UndirectedEdge) {
        debug!(edge = %edge, "Edge");
    }

    fn launch_score_token(&mut self, origin: &TokenOrigin, player: PlayerId) {
        debug!(origin = ?origin, player = %player, "+1");
    }

    fn show_final_scores(&mut self, scores: &FinalScores) {
        info!(
            base = %Self::format_scores(scores.base_scores()),
            bonus = %Self::format_scores(scores.bonus_scores()),
            total = %Self::format_scores(scores.final_scores()),
            "Final scores"
        );
    }

    fn show_error(&mut self, message: &str) {
        warn!("{}", message);
    }
}
