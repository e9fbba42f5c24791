//! The client's single thread of control.
//!
//! [`SyncDriver`] takes [`ClientInput`]s one at a time. Every snapshot, pushed
//! or answering a local request, goes through the reconciliation gate. While a
//! timeline plays the driver keeps reading its channel: snapshots are parked in
//! the gate, everything else waits until the timeline ends.

use crate::api::GameApi;
use crate::config::ClientConfig;
use crate::error::SyncError;
use crate::gate::{Admission, Arrival, ArrivalSource};
use crate::move_client::{MoveClient, SELECT_CARD_MESSAGE};
use crate::protocol::{ControlAction, PushMessage};
use crate::sequencer::AnimationSequencer;
use crate::session::{HandSelection, SyncSession};
use crate::surface::PresentationSurface;
use lunar_core::{ApplyMode, Event, GameState, LastMove, NodeId, PhaseValue};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Everything the driver reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientInput {
    /// Push channel traffic.
    Push(PushMessage),
    /// A board square was clicked.
    SquareClicked(NodeId),
    /// A hand card was clicked.
    CardSelected(PhaseValue),
    /// Reset, undo or redo was requested.
    Control(ControlAction),
    /// Flip the animation toggle.
    ToggleAnimations,
    /// Stop the driver.
    Shutdown,
}

#[derive(Debug)]
struct InputQueue {
    rx: mpsc::UnboundedReceiver<ClientInput>,
    deferred: VecDeque<ClientInput>,
    closed: bool,
}

impl InputQueue {
    fn new(rx: mpsc::UnboundedReceiver<ClientInput>) -> Self {
        Self {
            rx,
            deferred: VecDeque::new(),
            closed: false,
        }
    }

    async fn next(&mut self) -> Option<ClientInput> {
        if let Some(input) = self.deferred.pop_front() {
            return Some(input);
        }
        if self.closed {
            return None;
        }
        let received = self.rx.recv().await;
        if received.is_none() {
            debug!("Input channel closed");
            self.closed = true;
        }
        received
    }
}

/// Orchestrates store, gate, sequencer and surface for one viewer.
pub struct SyncDriver<S: PresentationSurface> {
    session: SyncSession,
    surface: S,
    sequencer: AnimationSequencer,
    moves: MoveClient,
    api: Arc<dyn GameApi>,
    inputs: InputQueue,
}

impl<S: PresentationSurface> SyncDriver<S> {
    /// Creates a driver reading inputs from `rx`.
    pub fn new(
        config: &ClientConfig,
        surface: S,
        api: Arc<dyn GameApi>,
        rx: mpsc::UnboundedReceiver<ClientInput>,
    ) -> Self {
        let viewer = *config.player();
        Self {
            session: SyncSession::new(viewer, *config.animations_enabled()),
            surface,
            sequencer: AnimationSequencer::new(*config.timings()),
            moves: MoveClient::new(Arc::clone(&api), viewer),
            api,
            inputs: InputQueue::new(rx),
        }
    }

    /// Session state.
    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    /// The surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The sequencer.
    pub fn sequencer(&self) -> &AnimationSequencer {
        &self.sequencer
    }

    /// Initial full load, applied as a reset.
    #[instrument(skip(self), fields(viewer = %self.session.viewer()))]
    pub async fn load(&mut self) -> Result<(), SyncError> {
        info!("Loading initial state");
        let state = self.api.fetch_state().await?;
        self.admit(Arrival::resync(state)).await;
        if self.session.store().current().is_none() {
            return Err(SyncError::new("Initial snapshot was rejected"));
        }
        Ok(())
    }

    /// Processes inputs until the channel closes or `Shutdown` arrives.
    #[instrument(skip(self), fields(viewer = %self.session.viewer()))]
    pub async fn run(&mut self) {
        info!("Sync driver running");
        while let Some(input) = self.inputs.next().await {
            if !self.handle(input).await {
                break;
            }
        }
        info!("Sync driver stopped");
    }

    async fn handle(&mut self, input: ClientInput) -> bool {
        match input {
            ClientInput::Push(message) => self.on_push(message).await,
            ClientInput::SquareClicked(node) => self.on_square_clicked(node).await,
            ClientInput::CardSelected(value) => self.on_card_selected(value),
            ClientInput::Control(action) => self.on_control(action).await,
            ClientInput::ToggleAnimations => {
                let enabled = self.session.toggle_animations();
                info!(enabled, "Animations toggled");
            }
            ClientInput::Shutdown => {
                info!("Shutdown requested");
                return false;
            }
        }
        true
    }

    async fn on_push(&mut self, message: PushMessage) {
        match message {
            PushMessage::StateUpdated(payload) => self.admit(Arrival::from_push(*payload)).await,
            PushMessage::Disconnected => {
                self.session.set_connected(false);
                warn!("Push channel disconnected; moves still go through");
            }
            PushMessage::Connected => {
                if !self.session.set_connected(true) {
                    info!("Push channel reconnected, resyncing");
                    self.resync().await;
                }
            }
        }
    }

    #[instrument(skip(self), fields(node = %node))]
    async fn on_square_clicked(&mut self, node: NodeId) {
        let Some(selection) = *self.session.selection() else {
            self.surface.show_error(SELECT_CARD_MESSAGE);
            return;
        };

        match self.moves.submit(node, selection.value).await {
            Ok(outcome) if *outcome.accepted() => {
                self.session.clear_selection();
                match outcome.into_arrival() {
                    Some(arrival) => self.admit(arrival).await,
                    None => {
                        warn!("Accepted move carried no state, resyncing");
                        self.resync().await;
                    }
                }
            }
            Ok(outcome) => self.surface.show_error(outcome.rejection_message()),
            Err(e) => {
                warn!(error = %e, "Move request failed");
                self.surface.show_error(&e.message);
            }
        }
    }

    fn on_card_selected(&mut self, value: PhaseValue) {
        let Some(current) = self.session.store().current() else {
            self.surface.show_error("No game loaded.");
            return;
        };
        let position = current.hand().iter().position(|card| *card == value);
        match position {
            Some(index) => {
                let hand = current.hand().clone();
                self.session.select(HandSelection::new(index, value));
                self.surface.show_hand(&hand, Some(index));
            }
            None => self
                .surface
                .show_error(&format!("Card {} is not in your hand.", value)),
        }
    }

    #[instrument(skip(self), fields(action = %action))]
    async fn on_control(&mut self, action: ControlAction) {
        match self.api.control(action).await {
            Ok(response) if response.success => match response.state {
                Some(state) => self.admit(Arrival::control(state, action)).await,
                None => self.resync().await,
            },
            Ok(response) => {
                let message = response
                    .error
                    .unwrap_or_else(|| action.failure_message().to_string());
                self.surface.show_error(&message);
            }
            Err(e) => {
                warn!(error = %e, "Control request failed");
                self.surface.show_error(action.failure_message());
            }
        }
    }

    async fn resync(&mut self) {
        match self.api.fetch_state().await {
            Ok(state) => self.admit(Arrival::resync(state)).await,
            Err(e) => warn!(error = %e, "Resync failed"),
        }
    }

    /// Runs an arrival through the gate, then anything it parked meanwhile.
    async fn admit(&mut self, arrival: Arrival) {
        let mut next = Some(arrival);
        while let Some(arrival) = next.take() {
            match self.session.gate_mut().offer(arrival) {
                Admission::Apply(arrival) => next = self.process(*arrival).await,
                Admission::Coalesced => debug!("Arrival parked"),
            }
        }
    }

    /// Applies one arrival and plays its events. Returns the arrival parked
    /// while the timeline ran.
    async fn process(&mut self, mut arrival: Arrival) -> Option<Arrival> {
        if !arrival.events.is_empty() {
            let key = arrival.move_key().cloned();
            if key.is_some() && key.as_ref() == self.session.last_animated_move().as_ref() {
                debug!("Events for this move were already played");
                arrival.events.clear();
            } else {
                self.session.remember_animated_move(key);
            }
        }
        let events = std::mem::take(&mut arrival.events);
        let animate = *self.session.animations_enabled() && !events.is_empty();

        let mut parked = None;
        if let ArrivalSource::Move(mv) = &arrival.source {
            let unpatched = self.show_optimistic(mv);
            if animate {
                parked = self.animate(&events).await;
            }
            if !self.apply_arrival(arrival).await {
                if let Some(unpatched) = unpatched {
                    warn!("Move snapshot rejected, dropping optimistic patch");
                    let patched = self.session.store().current().cloned();
                    self.session.store_mut().revert_patch(unpatched);
                    self.render(patched.as_ref());
                }
            }
        } else {
            if !self.apply_arrival(arrival).await {
                return None;
            }
            if animate {
                parked = self.animate(&events).await;
            }
        }
        self.settle().await;
        parked
    }

    /// Draws the placed card before the server's snapshot lands. Returns the
    /// snapshot the patch was made on.
    fn show_optimistic(&mut self, mv: &LastMove) -> Option<GameState> {
        match self.session.store_mut().patch_node(mv.node(), *mv.value()) {
            Ok(unpatched) => {
                if let Some(state) = self.session.store().current() {
                    self.surface.draw_board(state);
                }
                Some(unpatched)
            }
            Err(e) => {
                warn!(error = %e.message, "Optimistic patch skipped");
                None
            }
        }
    }

    /// Plays a timeline while routing concurrent snapshots into the gate.
    async fn animate(&mut self, events: &[Event]) -> Option<Arrival> {
        let Self {
            session,
            surface,
            sequencer,
            inputs,
            ..
        } = self;
        let (gate, display) = session.animation_parts();
        gate.begin_animation();

        {
            let play = sequencer.play(events, surface, display);
            tokio::pin!(play);

            loop {
                let received = tokio::select! {
                    biased;
                    () = &mut play => break,
                    received = inputs.rx.recv(), if !inputs.closed => received,
                };
                match received {
                    Some(ClientInput::Push(PushMessage::StateUpdated(payload))) => {
                        gate.offer(Arrival::from_push(*payload));
                    }
                    Some(other) => {
                        debug!(input = ?other, "Deferred until the timeline ends");
                        inputs.deferred.push_back(other);
                    }
                    None => inputs.closed = true,
                }
            }
        }

        gate.finish_animation()
    }

    /// Installs the snapshot and renders the static view. Returns false if the
    /// snapshot was rejected.
    async fn apply_arrival(&mut self, arrival: Arrival) -> bool {
        let before = self.session.store().current().cloned();
        let mode = arrival.apply_mode();
        let direct_scores =
            arrival.renders_scores_directly() || !*self.session.animations_enabled();
        let Arrival {
            snapshot,
            new_game,
            history_step,
            source,
            ..
        } = arrival;

        if self.session.store_mut().apply(snapshot, mode).is_err() {
            return false;
        }

        if direct_scores {
            self.session.sync_scores();
            self.surface.update_scores(self.session.display().scores());
        }

        if new_game {
            info!("New game");
            self.session.forget_animated_move();
            self.session.clear_selection();
            self.session.display_mut().clear_connections();
            self.session.display_mut().hide_final_panel();
            self.surface.hide_final_scores();
            self.surface.draw_connections(self.session.display());
            if source == ArrivalSource::Push {
                self.refetch_viewer_state().await;
            }
        } else if history_step {
            debug!("History step");
            self.session.forget_animated_move();
        }

        self.render(before.as_ref());
        true
    }

    /// A broadcast new-game snapshot may not carry this viewer's hand.
    async fn refetch_viewer_state(&mut self) {
        match self.api.fetch_state().await {
            Ok(state) => {
                if let Err(e) = self.session.store_mut().apply(state, ApplyMode::Reset) {
                    warn!(error = %e.message, "Refetched state rejected");
                }
            }
            Err(e) => warn!(error = %e, "Failed to refetch state for new game"),
        }
    }

    fn render(&mut self, before: Option<&GameState>) {
        let Some(current) = self.session.store().current() else {
            return;
        };
        self.surface.draw_board(current);
        self.surface.show_turn_banner(&self.session.turn().banner(current));

        let turn_started = self.session.turn().turn_started(before, current);
        let hand_changed = before.is_none_or(|b| b.hand() != current.hand());
        let hand = current.hand().clone();

        if turn_started && !hand.is_empty() {
            debug!("Turn started, selecting first card");
            self.session.select(HandSelection::new(0, hand[0]));
            self.surface.show_hand(&hand, Some(0));
        } else if hand_changed {
            self.session.clear_selection();
            self.surface.show_hand(&hand, None);
        }
    }

    /// Brings the displayed projection level with the snapshot.
    async fn settle(&mut self) {
        self.session.sync_display();
        self.surface.draw_connections(self.session.display());
        self.surface.update_scores(self.session.display().scores());
        self.sync_final_panel().await;
    }

    async fn sync_final_panel(&mut self) {
        let Some(current) = self.session.store().current() else {
            return;
        };
        let game_over = *current.game_over();
        let embedded = current.final_scores().clone();
        let visible = *self.session.display().final_panel_visible();

        if !game_over {
            if visible {
                self.session.display_mut().hide_final_panel();
                self.surface.hide_final_scores();
            }
            return;
        }
        if visible {
            return;
        }

        let final_scores = match embedded {
            Some(scores) => scores,
            None => match self.api.fetch_final_scores().await {
                Ok(scores) => scores,
                Err(e) => {
                    warn!(error = %e, "Failed to fetch final scores");
                    return;
                }
            },
        };
        info!(totals = ?final_scores.final_scores(), "Game over");
        self.surface.show_final_scores(&final_scores);
        self.session.display_mut().show_final_panel();
    }
}

impl<S: PresentationSurface> std::fmt::Debug for SyncDriver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncDriver")
            .field("session", &self.session)
            .field("moves", &self.moves)
            .finish_non_exhaustive()
    }
}
