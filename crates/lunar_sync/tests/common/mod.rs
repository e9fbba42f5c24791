//! Shared doubles for the sync integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lunar_core::{
    Board, Event, FinalScores, GameState, Node, NodeId, PhaseValue, PlayerId, Scores, UndirectedEdge,
};
use lunar_sync::{
    ApiError, BusyFlag, ClientConfig, ClientInput, ControlAction, ControlResponse, DisplayModel,
    GameApi, MoveRequest, MoveResponse, PresentationSurface, PushMessage, PushPayload, TokenOrigin,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One call made on the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    DrawBoard(Board),
    DrawConnections { phase: usize, full_moon: usize, edges: usize },
    ShowHand { hand: Vec<PhaseValue>, selected: Option<usize> },
    UpdateScores(Scores),
    Banner(String),
    Highlight(Vec<NodeId>),
    DrawEdge(UndirectedEdge),
    Token { origin: TokenOrigin, player: PlayerId },
    ShowFinal(FinalScores),
    HideFinal,
    Error(String),
}

/// A recorded call plus whether a timeline was running at the time.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub call: SurfaceCall,
    pub busy: bool,
}

/// Surface double that records every call. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<Vec<Recorded>>>,
    busy: Arc<Mutex<Option<BusyFlag>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples this flag on every call.
    pub fn watch_busy(&self, flag: BusyFlag) {
        *self.busy.lock().unwrap() = Some(flag);
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.log.lock().unwrap().iter().map(|r| r.call.clone()).collect()
    }

    pub fn records(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn tokens(&self) -> Vec<(TokenOrigin, PlayerId)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Token { origin, player } => Some((origin, player)),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn boards(&self) -> Vec<Board> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::DrawBoard(board) => Some(board),
                _ => None,
            })
            .collect()
    }

    pub fn hands(&self) -> Vec<(Vec<PhaseValue>, Option<usize>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::ShowHand { hand, selected } => Some((hand, selected)),
                _ => None,
            })
            .collect()
    }

    pub fn last_scores(&self) -> Option<Scores> {
        self.calls().into_iter().rev().find_map(|call| match call {
            SurfaceCall::UpdateScores(scores) => Some(scores),
            _ => None,
        })
    }

    fn push(&mut self, call: SurfaceCall) {
        let busy = self
            .busy
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(BusyFlag::is_set);
        self.log.lock().unwrap().push(Recorded { call, busy });
    }
}

impl PresentationSurface for RecordingSurface {
    fn draw_board(&mut self, state: &GameState) {
        self.push(SurfaceCall::DrawBoard(state.board().clone()));
    }

    fn draw_connections(&mut self, display: &DisplayModel) {
        self.push(SurfaceCall::DrawConnections {
            phase: display.phase_marks().len(),
            full_moon: display.full_moon_marks().len(),
            edges: display.persistent_edges().len(),
        });
    }

    fn show_hand(&mut self, hand: &[PhaseValue], selected: Option<usize>) {
        self.push(SurfaceCall::ShowHand {
            hand: hand.to_vec(),
            selected,
        });
    }

    fn update_scores(&mut self, scores: &Scores) {
        self.push(SurfaceCall::UpdateScores(scores.clone()));
    }

    fn show_turn_banner(&mut self, text: &str) {
        self.push(SurfaceCall::Banner(text.to_string()));
    }

    fn highlight_nodes(&mut self, nodes: &[NodeId]) {
        self.push(SurfaceCall::Highlight(nodes.to_vec()));
    }

    fn draw_edge(&mut self, edge: &UndirectedEdge) {
        self.push(SurfaceCall::DrawEdge(edge.clone()));
    }

    fn launch_score_token(&mut self, origin: &TokenOrigin, player: PlayerId) {
        self.push(SurfaceCall::Token {
            origin: origin.clone(),
            player,
        });
    }

    fn show_final_scores(&mut self, scores: &FinalScores) {
        self.push(SurfaceCall::ShowFinal(scores.clone()));
    }

    fn hide_final_scores(&mut self) {
        self.push(SurfaceCall::HideFinal);
    }

    fn show_error(&mut self, message: &str) {
        self.push(SurfaceCall::Error(message.to_string()));
    }
}

#[derive(Debug, Default)]
struct FakeServer {
    state: GameState,
    moves: VecDeque<MoveResponse>,
    controls: VecDeque<ControlResponse>,
    final_scores: FinalScores,
    placed: Vec<MoveRequest>,
    controls_sent: Vec<ControlAction>,
    fetches: usize,
    final_fetches: usize,
    unreachable: bool,
}

/// In-memory server double. Answers come from queues filled by the test.
#[derive(Debug, Default)]
pub struct FakeApi {
    inner: Mutex<FakeServer>,
}

impl FakeApi {
    pub fn new(state: GameState) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(FakeServer {
                state,
                ..FakeServer::default()
            }),
        })
    }

    pub fn set_state(&self, state: GameState) {
        self.inner.lock().unwrap().state = state;
    }

    pub fn queue_move(&self, response: MoveResponse) {
        self.inner.lock().unwrap().moves.push_back(response);
    }

    pub fn queue_control(&self, response: ControlResponse) {
        self.inner.lock().unwrap().controls.push_back(response);
    }

    pub fn set_final_scores(&self, scores: FinalScores) {
        self.inner.lock().unwrap().final_scores = scores;
    }

    /// Makes `fetch_state` fail until switched back.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.lock().unwrap().unreachable = unreachable;
    }

    pub fn placed(&self) -> Vec<MoveRequest> {
        self.inner.lock().unwrap().placed.clone()
    }

    pub fn controls_sent(&self) -> Vec<ControlAction> {
        self.inner.lock().unwrap().controls_sent.clone()
    }

    pub fn fetches(&self) -> usize {
        self.inner.lock().unwrap().fetches
    }

    pub fn final_fetches(&self) -> usize {
        self.inner.lock().unwrap().final_fetches
    }
}

#[async_trait]
impl GameApi for FakeApi {
    async fn fetch_state(&self) -> Result<GameState, ApiError> {
        let mut server = self.inner.lock().unwrap();
        server.fetches += 1;
        if server.unreachable {
            return Err(ApiError::new("Connection refused"));
        }
        Ok(server.state.clone())
    }

    async fn place(&self, request: &MoveRequest) -> Result<MoveResponse, ApiError> {
        let mut server = self.inner.lock().unwrap();
        server.placed.push(request.clone());
        server
            .moves
            .pop_front()
            .ok_or_else(|| ApiError::new("No move response queued"))
    }

    async fn control(&self, action: ControlAction) -> Result<ControlResponse, ApiError> {
        let mut server = self.inner.lock().unwrap();
        server.controls_sent.push(action);
        server
            .controls
            .pop_front()
            .ok_or_else(|| ApiError::new("No control response queued"))
    }

    async fn fetch_final_scores(&self) -> Result<FinalScores, ApiError> {
        let mut server = self.inner.lock().unwrap();
        server.final_fetches += 1;
        Ok(server.final_scores.clone())
    }
}

pub fn phase(value: u8) -> PhaseValue {
    PhaseValue::new(value).unwrap()
}

/// Board with the nodes every test uses, all empty.
pub fn board() -> Board {
    ["a", "b", "c", "d", "n2", "n5"]
        .into_iter()
        .enumerate()
        .fold(Board::new(), |board, (i, name)| {
            board.with_node(name, Node::new(i as i32 / 3, i as i32 % 3))
        })
}

/// Fresh game: empty board, zero scores, a three-card hand.
pub fn fresh_state(current: PlayerId) -> GameState {
    GameState::new(board(), current).with_hand(vec![phase(1), phase(2), phase(3)])
}

/// Copy of `state` with one node placed.
pub fn placed(state: &GameState, node: &str, value: u8) -> GameState {
    let mut next = state.clone();
    next.place(&NodeId::from(node), phase(value));
    next
}

pub fn push(state: GameState) -> ClientInput {
    ClientInput::Push(PushMessage::StateUpdated(Box::new(PushPayload::new(state))))
}

pub fn push_with_events(state: GameState, events: Vec<Event>) -> ClientInput {
    ClientInput::Push(PushMessage::StateUpdated(Box::new(
        PushPayload::new(state).with_events(events),
    )))
}

pub fn config_for(player: PlayerId) -> ClientConfig {
    ClientConfig::new("http://test.invalid", player)
}
