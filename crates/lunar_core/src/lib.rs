//! Lunar core - snapshot, event and geometry types for the lunar board game
//!
//! Everything here is pure data: no I/O, no async. The sync runtime in
//! `lunar_sync` consumes these types.
//!
//! # Example
//!
//! ```
//! use lunar_core::{build_persistent_edges, NodeId};
//!
//! let chain: Vec<NodeId> = ["a", "b", "c"].into_iter().map(NodeId::from).collect();
//! let edges = build_persistent_edges(&[chain]);
//! assert!(edges.contains("b", "a"));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod event;
mod geometry;
pub mod invariants;
mod state;
mod types;
mod validate;

// Crate-level exports - Identifiers
pub use types::{MoonPhase, NodeId, NodePair, PhaseValue, PlayerId};

// Crate-level exports - Snapshots
pub use state::{Board, Connections, FinalScores, GameState, LastMove, Node, Scores};

// Crate-level exports - Events
pub use event::{ChainStructure, CycleScore, Event, PairScore, PairStructure};

// Crate-level exports - Geometry
pub use geometry::{build_persistent_edges, chain_edges, EdgeSet, UndirectedEdge};

// Crate-level exports - Validation
pub use validate::{validate_snapshot, validate_transition, ApplyMode, SnapshotError};
