//! Request/response surface of the game server.

use crate::error::ApiError;
use crate::protocol::{ControlAction, ControlResponse, MoveRequest, MoveResponse};
use async_trait::async_trait;
use lunar_core::{FinalScores, GameState, PlayerId};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

/// Header carrying the viewer identity.
pub const PLAYER_HEADER: &str = "X-Player-ID";

/// Server operations the client needs.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Full snapshot from the viewer's side.
    async fn fetch_state(&self) -> Result<GameState, ApiError>;

    /// Submits a placement.
    async fn place(&self, request: &MoveRequest) -> Result<MoveResponse, ApiError>;

    /// Sends a reset, undo or redo.
    async fn control(&self, action: ControlAction) -> Result<ControlResponse, ApiError>;

    /// End-of-game breakdown.
    async fn fetch_final_scores(&self) -> Result<FinalScores, ApiError>;

    /// Starts a new game.
    async fn reset(&self) -> Result<ControlResponse, ApiError> {
        self.control(ControlAction::Reset).await
    }

    /// Takes back the last move.
    async fn undo(&self) -> Result<ControlResponse, ApiError> {
        self.control(ControlAction::Undo).await
    }

    /// Replays an undone move.
    async fn redo(&self) -> Result<ControlResponse, ApiError> {
        self.control(ControlAction::Redo).await
    }
}

/// [`GameApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct RestGameApi {
    base_url: String,
    client: reqwest::Client,
    viewer: PlayerId,
}

impl RestGameApi {
    /// Creates a client for one seat.
    #[instrument(skip(base_url), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, viewer: PlayerId) -> Self {
        info!(viewer = %viewer, "Creating REST game client");
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            viewer,
        }
    }

    /// The seat this client speaks for.
    pub fn viewer(&self) -> PlayerId {
        self.viewer
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = %status, body = %body, "Server returned an error status");
            return Err(ApiError::new(format!("HTTP {}: {}", status, body)).with_status(status.as_u16()));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl GameApi for RestGameApi {
    #[instrument(skip(self))]
    async fn fetch_state(&self) -> Result<GameState, ApiError> {
        debug!("Fetching state");
        let response = self
            .client
            .get(self.url("state"))
            .header(PLAYER_HEADER, self.viewer.header_value())
            .send()
            .await?;
        let state: GameState = Self::decode(response).await?;
        debug!(current_player = %state.current_player(), "Got state");
        Ok(state)
    }

    #[instrument(skip(self), fields(node = %request.node_name, value = %request.value))]
    async fn place(&self, request: &MoveRequest) -> Result<MoveResponse, ApiError> {
        info!("Submitting move");
        let response = self
            .client
            .post(self.url("place"))
            .header(PLAYER_HEADER, self.viewer.header_value())
            .json(request)
            .send()
            .await?;

        // Rejected moves come back as 400 with a normal JSON body.
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<MoveResponse>(&body) {
            Ok(parsed) => {
                debug!(success = parsed.success, events = parsed.events.len(), "Move answered");
                Ok(parsed)
            }
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(ApiError::new(format!("HTTP {}: {}", status, body)).with_status(status.as_u16())),
        }
    }

    #[instrument(skip(self), fields(action = %action))]
    async fn control(&self, action: ControlAction) -> Result<ControlResponse, ApiError> {
        info!("Sending control request");
        let response = self
            .client
            .post(self.url(action.as_ref()))
            .header(PLAYER_HEADER, self.viewer.header_value())
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn fetch_final_scores(&self) -> Result<FinalScores, ApiError> {
        let response = self
            .client
            .get(self.url("final_scores"))
            .header(PLAYER_HEADER, self.viewer.header_value())
            .send()
            .await?;
        Self::decode(response).await
    }
}
