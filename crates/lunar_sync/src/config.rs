//! Client configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use lunar_core::PlayerId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Environment variable overriding the server URL.
pub const SERVER_URL_ENV: &str = "LUNAR_SERVER_URL";
/// Environment variable overriding the viewer seat.
pub const PLAYER_ENV: &str = "LUNAR_PLAYER";

/// Fixed delays of the animation timeline, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct AnimationTimings {
    /// Pause after highlighting the nodes of an event.
    #[serde(default = "default_settle_ms")]
    settle_ms: u64,
    /// Pause after each lunar-cycle edge is drawn.
    #[serde(default = "default_edge_ms")]
    edge_ms: u64,
    /// Flight time of one score token.
    #[serde(default = "default_token_ms")]
    token_ms: u64,
    /// Pause standing in for an event kind this client cannot animate.
    #[serde(default = "default_unknown_event_ms")]
    unknown_event_ms: u64,
}

fn default_settle_ms() -> u64 {
    600
}

fn default_edge_ms() -> u64 {
    300
}

fn default_token_ms() -> u64 {
    700
}

fn default_unknown_event_ms() -> u64 {
    200
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            edge_ms: default_edge_ms(),
            token_ms: default_token_ms(),
            unknown_event_ms: default_unknown_event_ms(),
        }
    }
}

impl AnimationTimings {
    /// Creates explicit timings.
    pub fn new(settle_ms: u64, edge_ms: u64, token_ms: u64, unknown_event_ms: u64) -> Self {
        Self {
            settle_ms,
            edge_ms,
            token_ms,
            unknown_event_ms,
        }
    }

    /// All delays zero; the timeline still runs every step in order.
    pub fn instant() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Settle delay.
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Per-edge delay.
    pub fn edge(&self) -> Duration {
        Duration::from_millis(self.edge_ms)
    }

    /// Per-token delay.
    pub fn token(&self) -> Duration {
        Duration::from_millis(self.token_ms)
    }

    /// Unknown-event delay.
    pub fn unknown_event(&self) -> Duration {
        Duration::from_millis(self.unknown_event_ms)
    }
}

/// Configuration for one game client.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the game server.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Seat this client plays (1 or 2).
    #[serde(default = "default_player")]
    player: PlayerId,

    /// Play scoring animations; when off, scores jump straight to the snapshot.
    #[serde(default = "default_animations_enabled")]
    animations_enabled: bool,

    /// Interval of the polling push source.
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,

    /// Animation delays.
    #[serde(default)]
    timings: AnimationTimings,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_player() -> PlayerId {
    PlayerId::ONE
}

fn default_animations_enabled() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(default_server_url(), default_player())
    }
}

impl ClientConfig {
    /// Creates a configuration with default timings.
    #[instrument(skip(server_url), fields(server_url = %server_url.as_ref()))]
    pub fn new(server_url: impl AsRef<str>, player: PlayerId) -> Self {
        Self {
            server_url: server_url.as_ref().trim_end_matches('/').to_string(),
            player,
            animations_enabled: default_animations_enabled(),
            poll_interval_ms: default_poll_interval_ms(),
            timings: AnimationTimings::default(),
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.server_url = config.server_url.trim_end_matches('/').to_string();

        config.validate()?;
        info!(server_url = %config.server_url, player = %config.player, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, otherwise starts from defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies `LUNAR_SERVER_URL` and `LUNAR_PLAYER` from the environment.
    #[instrument(skip(self))]
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let server_url = std::env::var(SERVER_URL_ENV).ok();
        let player = std::env::var(PLAYER_ENV).ok();
        self.with_overrides(server_url, player)
    }

    /// Applies optional overrides (environment or command line).
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        server_url: Option<String>,
        player: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = server_url {
            debug!(server_url = %url, "Overriding server URL");
            self.server_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = player {
            let seat: u8 = raw.trim().parse().map_err(|_| {
                warn!(player = %raw, "Unparseable player override");
                ConfigError::new(format!("Invalid player: {}", raw))
            })?;
            self.player = PlayerId::new(seat);
        }
        self.validate()?;
        Ok(self)
    }

    /// Turns animations on or off.
    pub fn with_animations(mut self, enabled: bool) -> Self {
        self.animations_enabled = enabled;
        self
    }

    /// Replaces the animation timings.
    pub fn with_timings(mut self, timings: AnimationTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.player.is_seat() {
            return Err(ConfigError::new(format!(
                "Player must be 1 or 2, got {}",
                self.player
            )));
        }
        if self.server_url.is_empty() {
            return Err(ConfigError::new("Server URL is empty"));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
