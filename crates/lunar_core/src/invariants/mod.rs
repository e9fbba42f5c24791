//! Invariants every accepted snapshot must satisfy.
//!
//! Snapshot invariants look at one state; transition invariants compare a
//! candidate with the state it would replace. Both are checked before the
//! store swaps snapshots, so a violation leaves the prior state in place.

mod monotonic;
mod structure;

pub use monotonic::{MonotonicBoardInvariant, MonotonicScoresInvariant};
pub use structure::{BoardPresentInvariant, KnownNodesInvariant, PhaseRangeInvariant, SeatInvariant};

use crate::state::GameState;

/// A logical property that must hold for a given state.
pub trait Invariant<S: ?Sized> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// A candidate snapshot paired with the one it would replace.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    /// Currently applied snapshot.
    pub previous: &'a GameState,
    /// Incoming snapshot.
    pub next: &'a GameState,
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S: ?Sized> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S: ?Sized, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl<S: ?Sized, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if !I4::holds(state) {
            violations.push(InvariantViolation::new(I4::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariants of a single snapshot.
pub type SnapshotInvariants = (
    BoardPresentInvariant,
    SeatInvariant,
    KnownNodesInvariant,
    PhaseRangeInvariant,
);

/// Invariants between consecutive snapshots of the same game.
pub type TransitionInvariants = (MonotonicBoardInvariant, MonotonicScoresInvariant);
