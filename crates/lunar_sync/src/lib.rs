//! Lunar sync - client runtime for the lunar-phase board game
//!
//! Keeps a client's view of one game in step with the server and plays the
//! scoring animation of every move exactly once, in order.
//!
//! # Architecture
//!
//! - **StateStore**: holds the authoritative snapshot and the one before it
//! - **ReconciliationGate**: parks snapshots that arrive mid-animation (last write wins)
//! - **AnimationSequencer**: plays scoring events on one timeline
//! - **MoveClient** / **GameApi**: the request/response side of the server
//! - **SyncDriver**: the single loop tying them to a [`PresentationSurface`]
//!
//! # Example
//!
//! ```no_run
//! use lunar_sync::{ClientConfig, RestGameApi, SyncDriver, TracingSurface};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let api = Arc::new(RestGameApi::new(config.server_url(), *config.player()));
//! let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
//!
//! let mut driver = SyncDriver::new(&config, TracingSurface::new(), api, rx);
//! driver.load().await?;
//! driver.run().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
pub mod console;
mod display;
mod driver;
mod error;
mod gate;
mod move_client;
mod poller;
mod protocol;
mod sequencer;
mod session;
mod store;
mod surface;
mod turn;

// Crate-level exports - Configuration
pub use config::{AnimationTimings, ClientConfig, ConfigError, PLAYER_ENV, SERVER_URL_ENV};

// Crate-level exports - Errors
pub use error::{ApiError, SyncError};

// Crate-level exports - Wire protocol
pub use protocol::{ControlAction, ControlResponse, MoveRequest, MoveResponse, PushMessage, PushPayload};

// Crate-level exports - Server access
pub use api::{GameApi, RestGameApi, PLAYER_HEADER};
pub use move_client::{MoveClient, MoveOutcome, SELECT_CARD_MESSAGE};
pub use poller::StatePoller;

// Crate-level exports - State and reconciliation
pub use display::DisplayModel;
pub use gate::{Admission, Arrival, ArrivalSource, GatePhase, ReconciliationGate};
pub use session::{HandSelection, SyncSession};
pub use store::StateStore;
pub use turn::TurnGate;

// Crate-level exports - Animation and presentation
pub use sequencer::{AnimationSequencer, BusyFlag};
pub use surface::{PresentationSurface, SurfaceInputs, TokenOrigin, TracingSurface};

// Crate-level exports - Orchestration
pub use driver::{ClientInput, SyncDriver};
