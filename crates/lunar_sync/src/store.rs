//! Holder of the authoritative snapshot.

use lunar_core::{validate_snapshot, validate_transition, ApplyMode, GameState, NodeId, PhaseValue, SnapshotError};
use tracing::{debug, instrument, warn};

/// The current snapshot and the one it replaced.
///
/// Only [`StateStore::apply`] and the patch methods write here. A
/// rejected snapshot leaves both slots untouched.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    current: Option<GameState>,
    previous: Option<GameState>,
}

impl StateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot.
    pub fn current(&self) -> Option<&GameState> {
        self.current.as_ref()
    }

    /// The snapshot replaced by the last apply.
    pub fn previous(&self) -> Option<&GameState> {
        self.previous.as_ref()
    }

    /// Validates and installs a snapshot; the old one becomes `previous`.
    #[instrument(skip(self, snapshot), fields(mode = ?mode, player = %snapshot.current_player()))]
    pub fn apply(&mut self, snapshot: GameState, mode: ApplyMode) -> Result<(), SnapshotError> {
        let checked = match &self.current {
            Some(current) => validate_transition(current, &snapshot, mode),
            None => validate_snapshot(&snapshot),
        };
        if let Err(e) = checked {
            warn!(error = %e.message, "Snapshot rejected, keeping prior state");
            return Err(e);
        }

        self.previous = self.current.replace(snapshot);
        debug!("Snapshot applied");
        Ok(())
    }

    /// Writes one cell of the current snapshot ahead of the server's full state.
    ///
    /// Returns the unpatched snapshot so the caller can hand it to
    /// [`StateStore::revert_patch`] if the server's state never lands.
    #[instrument(skip(self), fields(node = %node, value = %value))]
    pub fn patch_node(&mut self, node: &NodeId, value: PhaseValue) -> Result<GameState, SnapshotError> {
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| SnapshotError::new("No snapshot to patch"))?;
        let unpatched = current.clone();
        if !current.place(node, value) {
            return Err(SnapshotError::new(format!("Unknown node: {}", node)));
        }
        debug!("Node patched");
        Ok(unpatched)
    }

    /// Undoes an optimistic patch by putting back the snapshot it was made on.
    #[instrument(skip_all)]
    pub fn revert_patch(&mut self, unpatched: GameState) {
        debug!("Optimistic patch reverted");
        self.current = Some(unpatched);
    }
}
