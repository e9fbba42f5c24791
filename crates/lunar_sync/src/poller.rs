//! Polling fallback for the push channel.

use crate::api::GameApi;
use crate::driver::ClientInput;
use crate::protocol::{PushMessage, PushPayload};
use lunar_core::{Board, PlayerId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Fetches `/state` on an interval and pushes the snapshot when it changed.
pub struct StatePoller {
    api: Arc<dyn GameApi>,
    tx: mpsc::UnboundedSender<ClientInput>,
    interval: Duration,
}

impl StatePoller {
    /// Creates a poller feeding the driver's input channel.
    pub fn new(
        api: Arc<dyn GameApi>,
        tx: mpsc::UnboundedSender<ClientInput>,
        interval: Duration,
    ) -> Self {
        Self { api, tx, interval }
    }

    /// Runs until the driver drops its receiver.
    #[instrument(skip(self), fields(interval_ms = self.interval.as_millis() as u64))]
    pub async fn run(self) {
        info!("Starting state polling");

        let mut last_seen: Option<(PlayerId, Board)> = None;
        let mut connected = true;

        loop {
            if self.tx.is_closed() {
                debug!("Driver gone, stopping poller");
                return;
            }

            match self.api.fetch_state().await {
                Ok(state) => {
                    if !connected {
                        info!("Server reachable again");
                        connected = true;
                        if !self.send(PushMessage::Connected) {
                            return;
                        }
                    }

                    let seen = (*state.current_player(), state.board().clone());
                    if last_seen.as_ref() != Some(&seen) {
                        debug!(current_player = %seen.0, "Polled state changed");
                        last_seen = Some(seen);
                        let message = PushMessage::StateUpdated(Box::new(PushPayload::new(state)));
                        if !self.send(message) {
                            return;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to poll server");
                    if connected {
                        connected = false;
                        if !self.send(PushMessage::Disconnected) {
                            return;
                        }
                    }
                }
            }

            sleep(self.interval).await;
        }
    }

    fn send(&self, message: PushMessage) -> bool {
        if self.tx.send(ClientInput::Push(message)).is_err() {
            debug!("Driver gone, stopping poller");
            return false;
        }
        true
    }
}
