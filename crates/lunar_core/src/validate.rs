//! Snapshot validation ahead of an apply.

use crate::invariants::{InvariantSet, SnapshotInvariants, Transition, TransitionInvariants};
use crate::state::GameState;
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// How an incoming snapshot relates to the one it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// A later point of the same game: monotonic checks apply.
    #[default]
    Incremental,
    /// A new game, undo or full resync: only structural checks apply.
    Reset,
}

/// Snapshot rejected by validation.
#[derive(Debug, Clone, Display, Error)]
#[display("Snapshot error: {} at {}:{}", message, file, line)]
pub struct SnapshotError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SnapshotError {
    /// Creates a new snapshot error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Checks a snapshot on its own.
#[instrument(skip(snapshot))]
pub fn validate_snapshot(snapshot: &GameState) -> Result<(), SnapshotError> {
    SnapshotInvariants::check_all(snapshot).map_err(|violations| {
        let joined = violations
            .into_iter()
            .map(|v| v.description)
            .collect::<Vec<_>>()
            .join("; ");
        SnapshotError::new(joined)
    })?;
    debug!(nodes = snapshot.board().len(), "Snapshot structure valid");
    Ok(())
}

/// Checks a snapshot against the one it would replace.
#[instrument(skip(previous, next))]
pub fn validate_transition(
    previous: &GameState,
    next: &GameState,
    mode: ApplyMode,
) -> Result<(), SnapshotError> {
    validate_snapshot(next)?;

    if mode == ApplyMode::Reset {
        return Ok(());
    }

    TransitionInvariants::check_all(&Transition { previous, next }).map_err(|violations| {
        let joined = violations
            .into_iter()
            .map(|v| v.description)
            .collect::<Vec<_>>()
            .join("; ");
        SnapshotError::new(joined)
    })
}
