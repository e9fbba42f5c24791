//! Admission control for snapshots while a timeline runs.
//!
//! The gate is a two-state machine with a single pending slot. It decides;
//! the driver acts. Keeping it free of I/O lets the coalescing rules be tested
//! without a runtime.

use crate::protocol::{ControlAction, PushPayload};
use lunar_core::{ApplyMode, Event, GameState, LastMove};
use tracing::{debug, instrument};

/// Where an arrival came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrivalSource {
    /// The push channel (or its polling fallback).
    Push,
    /// This client's own accepted move.
    Move(LastMove),
    /// A full reload: startup, reconnect or a history request.
    Resync,
}

/// A snapshot plus the events that produced it, waiting to be admitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    /// The authoritative snapshot.
    pub snapshot: GameState,
    /// Scoring events to animate.
    pub events: Vec<Event>,
    /// Starts a new game.
    pub new_game: bool,
    /// Result of undo or redo.
    pub history_step: bool,
    /// Produced by a debug fill.
    pub debug_fill: bool,
    /// Origin.
    pub source: ArrivalSource,
}

impl Arrival {
    /// Wraps a push payload.
    pub fn from_push(payload: PushPayload) -> Self {
        Self {
            snapshot: payload.state,
            events: payload.events,
            new_game: payload.new_game,
            history_step: payload.is_undo,
            debug_fill: payload.debug_fill,
            source: ArrivalSource::Push,
        }
    }

    /// Wraps the result of an accepted move.
    pub fn from_move(mv: LastMove, snapshot: GameState, events: Vec<Event>) -> Self {
        Self {
            snapshot,
            events,
            new_game: false,
            history_step: false,
            debug_fill: false,
            source: ArrivalSource::Move(mv),
        }
    }

    /// A full reload with nothing to animate.
    pub fn resync(snapshot: GameState) -> Self {
        Self {
            snapshot,
            events: Vec::new(),
            new_game: false,
            history_step: false,
            debug_fill: false,
            source: ArrivalSource::Resync,
        }
    }

    /// The snapshot answering a reset, undo or redo.
    pub fn control(snapshot: GameState, action: ControlAction) -> Self {
        let mut arrival = Self::resync(snapshot);
        match action {
            ControlAction::Reset => arrival.new_game = true,
            ControlAction::Undo | ControlAction::Redo => arrival.history_step = true,
        }
        arrival
    }

    /// Validation mode for applying this arrival.
    pub fn apply_mode(&self) -> ApplyMode {
        if self.new_game || self.history_step || self.source == ArrivalSource::Resync {
            ApplyMode::Reset
        } else {
            ApplyMode::Incremental
        }
    }

    /// Identity of the move this arrival reports, used to animate a move once.
    pub fn move_key(&self) -> Option<&LastMove> {
        match &self.source {
            ArrivalSource::Move(mv) => Some(mv),
            _ => self.snapshot.last_move().as_ref(),
        }
    }

    /// Scores jump straight to the snapshot for this arrival instead of
    /// waiting for the timeline to count them up.
    pub fn renders_scores_directly(&self) -> bool {
        self.new_game || self.history_step || self.debug_fill
    }
}

/// Whether a timeline is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePhase {
    /// Nothing is animating; arrivals apply immediately.
    #[default]
    Idle,
    /// A timeline runs; arrivals wait in the pending slot.
    Animating,
}

/// What the driver should do with an offered arrival.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    /// Apply now.
    Apply(Box<Arrival>),
    /// Parked in the pending slot until the timeline ends.
    Coalesced,
}

/// The reconciliation gate.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationGate {
    phase: GatePhase,
    pending: Option<Arrival>,
}

impl ReconciliationGate {
    /// Creates an idle gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// Returns true while a timeline runs.
    pub fn is_animating(&self) -> bool {
        self.phase == GatePhase::Animating
    }

    /// The parked arrival, if any.
    pub fn pending(&self) -> Option<&Arrival> {
        self.pending.as_ref()
    }

    /// Offers an arrival. While animating it replaces whatever was pending.
    ///
    /// A replaced arrival hands its `new_game` and `history_step` flags to its
    /// replacement, so a reset is never lost to coalescing.
    #[instrument(skip_all, fields(phase = ?self.phase, events = arrival.events.len()))]
    pub fn offer(&mut self, mut arrival: Arrival) -> Admission {
        match self.phase {
            GatePhase::Idle => Admission::Apply(Box::new(arrival)),
            GatePhase::Animating => {
                if let Some(dropped) = self.pending.take() {
                    debug!(
                        dropped_events = dropped.events.len(),
                        new_game = dropped.new_game,
                        "Superseded pending snapshot discarded"
                    );
                    arrival.new_game |= dropped.new_game;
                    arrival.history_step |= dropped.history_step;
                }
                self.pending = Some(arrival);
                Admission::Coalesced
            }
        }
    }

    /// Enters the animating phase.
    pub fn begin_animation(&mut self) {
        debug!("Gate -> Animating");
        self.phase = GatePhase::Animating;
    }

    /// Leaves the animating phase and hands back the parked arrival.
    pub fn finish_animation(&mut self) -> Option<Arrival> {
        self.phase = GatePhase::Idle;
        let next = self.pending.take();
        debug!(has_pending = next.is_some(), "Gate -> Idle");
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunar_core::{Board, Node, NodeId, PhaseValue, PlayerId};

    fn snapshot(player: PlayerId) -> GameState {
        GameState::new(Board::new().with_node("a", Node::new(0, 0)), player)
    }

    #[test]
    fn test_idle_applies_immediately() {
        let mut gate = ReconciliationGate::new();
        let arrival = Arrival::resync(snapshot(PlayerId::ONE));
        assert_eq!(gate.offer(arrival.clone()), Admission::Apply(Box::new(arrival)));
        assert!(gate.pending().is_none());
    }

    #[test]
    fn test_last_write_wins_while_animating() {
        let mut gate = ReconciliationGate::new();
        gate.begin_animation();

        let first = Arrival::from_push(PushPayload::new(snapshot(PlayerId::ONE)));
        let second = Arrival::from_push(PushPayload::new(snapshot(PlayerId::TWO)));
        assert_eq!(gate.offer(first), Admission::Coalesced);
        assert_eq!(gate.offer(second.clone()), Admission::Coalesced);

        assert_eq!(gate.finish_animation(), Some(second));
        assert_eq!(gate.phase(), GatePhase::Idle);
        assert!(gate.finish_animation().is_none());
    }

    #[test]
    fn test_superseded_new_game_carries_forward() {
        let mut gate = ReconciliationGate::new();
        gate.begin_animation();

        let reset = Arrival::from_push(PushPayload::new(snapshot(PlayerId::ONE)).as_new_game());
        let follow_up = Arrival::from_push(PushPayload::new(snapshot(PlayerId::TWO)));
        gate.offer(reset);
        gate.offer(follow_up);

        let drained = gate.finish_animation().unwrap();
        assert_eq!(drained.snapshot.current_player(), &PlayerId::TWO);
        assert!(drained.new_game);
        assert!(!drained.history_step);
        assert_eq!(drained.apply_mode(), ApplyMode::Reset);
    }

    #[test]
    fn test_apply_mode_follows_flags() {
        let push = Arrival::from_push(PushPayload::new(snapshot(PlayerId::ONE)));
        assert_eq!(push.apply_mode(), ApplyMode::Incremental);

        let new_game = Arrival::from_push(PushPayload::new(snapshot(PlayerId::ONE)).as_new_game());
        assert_eq!(new_game.apply_mode(), ApplyMode::Reset);
        assert!(new_game.renders_scores_directly());

        let undo = Arrival::control(snapshot(PlayerId::ONE), ControlAction::Undo);
        assert!(undo.history_step);
        assert_eq!(undo.apply_mode(), ApplyMode::Reset);
    }

    #[test]
    fn test_move_key_prefers_own_move() {
        let value = PhaseValue::new(3).unwrap();
        let mine = LastMove::new(PlayerId::ONE, "a", value);
        let other = LastMove::new(PlayerId::TWO, NodeId::from("a"), value);

        let state = snapshot(PlayerId::TWO).with_last_move(other.clone());
        let from_move = Arrival::from_move(mine.clone(), state.clone(), Vec::new());
        assert_eq!(from_move.move_key(), Some(&mine));

        let from_push = Arrival::from_push(PushPayload::new(state));
        assert_eq!(from_push.move_key(), Some(&other));
    }
}
