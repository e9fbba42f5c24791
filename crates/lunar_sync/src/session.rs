//! Per-client session state owned by the driver.

use crate::display::DisplayModel;
use crate::gate::ReconciliationGate;
use crate::store::StateStore;
use crate::turn::TurnGate;
use derive_getters::Getters;
use derive_new::new;
use lunar_core::{LastMove, PhaseValue, PlayerId};
use tracing::debug;

/// The card the viewer picked from their hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct HandSelection {
    /// Position in the hand.
    pub index: usize,
    /// Card value.
    pub value: PhaseValue,
}

/// Everything one client tracks between inputs.
#[derive(Debug, Getters)]
pub struct SyncSession {
    viewer: PlayerId,
    store: StateStore,
    gate: ReconciliationGate,
    display: DisplayModel,
    turn: TurnGate,
    selection: Option<HandSelection>,
    animations_enabled: bool,
    last_animated_move: Option<LastMove>,
    connected: bool,
}

impl SyncSession {
    /// Creates an empty session for one seat.
    pub fn new(viewer: PlayerId, animations_enabled: bool) -> Self {
        Self {
            viewer,
            store: StateStore::new(),
            gate: ReconciliationGate::new(),
            display: DisplayModel::new(),
            turn: TurnGate::new(viewer),
            selection: None,
            animations_enabled,
            last_animated_move: None,
            connected: true,
        }
    }

    /// Mutable store.
    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    /// Mutable gate.
    pub fn gate_mut(&mut self) -> &mut ReconciliationGate {
        &mut self.gate
    }

    /// Mutable display model.
    pub fn display_mut(&mut self) -> &mut DisplayModel {
        &mut self.display
    }

    /// Gate and display model together, for the length of one timeline.
    pub fn animation_parts(&mut self) -> (&mut ReconciliationGate, &mut DisplayModel) {
        (&mut self.gate, &mut self.display)
    }

    /// Brings displayed scores and connections up to the current snapshot.
    pub fn sync_display(&mut self) {
        if let Some(current) = self.store.current() {
            self.display.sync_connections(current);
            self.display.sync_scores(current);
        }
    }

    /// Sets the displayed scores to the snapshot's, leaving connections alone.
    pub fn sync_scores(&mut self) {
        if let Some(current) = self.store.current() {
            self.display.sync_scores(current);
        }
    }

    /// Selects a card.
    pub fn select(&mut self, selection: HandSelection) {
        debug!(index = selection.index, value = %selection.value, "Card selected");
        self.selection = Some(selection);
    }

    /// Clears the selected card.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Flips the animation toggle and returns the new value.
    pub fn toggle_animations(&mut self) -> bool {
        self.animations_enabled = !self.animations_enabled;
        self.animations_enabled
    }

    /// Records the move whose events were just animated.
    pub fn remember_animated_move(&mut self, mv: Option<LastMove>) {
        self.last_animated_move = mv;
    }

    /// Forgets the last animated move.
    pub fn forget_animated_move(&mut self) {
        self.last_animated_move = None;
    }

    /// Records the push channel state. Returns the previous value.
    pub fn set_connected(&mut self, connected: bool) -> bool {
        std::mem::replace(&mut self.connected, connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_connection_state() {
        let mut session = SyncSession::new(PlayerId::ONE, true);
        assert!(!session.toggle_animations());
        assert!(session.toggle_animations());

        assert!(session.set_connected(false));
        assert!(!session.set_connected(true));
        assert!(*session.connected());
    }
}
