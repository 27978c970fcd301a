//! Game configuration.
//!
//! Everything the scene treats as a constant lives here so it can be tuned from
//! a TOML file without recompiling. Missing fields fall back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

/// Config file looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE: &str = "survive_and_poop.toml";

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Fixed simulation rate (updates per second).
    pub target_ups: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Survive and Poop".into(),
            width: 800,
            height: 600,
            target_ups: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// World gravity in px/s². Top down, so zero on both axes.
    pub gravity: [f32; 2],
    /// Start with body outlines and collision tiles visible.
    pub debug: bool,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self { gravity: [0.0, 0.0], debug: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Length of the player's velocity vector while walking, px/s.
    pub walk_speed: f32,
    /// Per-axis velocity applied before normalisation.
    pub axis_velocity: f32,
    /// Minimum time between two poops while space is held.
    pub poop_cooldown_ms: f64,
    /// Seconds a poop stays on the map. `0` keeps them forever.
    pub poop_lifetime_secs: f32,
    /// Gauge increments applied every update.
    pub fecal_urgency_per_frame: f32,
    pub hunger_per_frame: f32,
    /// Keep the player centred, clamped to the map edges.
    pub camera_follow: bool,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            walk_speed: 175.0,
            axis_velocity: 100.0,
            poop_cooldown_ms: 500.0,
            poop_lifetime_secs: 12.0,
            fecal_urgency_per_frame: 0.25,
            hunger_per_frame: 0.5,
            camera_follow: true,
        }
    }
}

impl GameplaySettings {
    /// Replace values that would break movement or the needs gauges.
    ///
    /// Speeds, timings and gauge rates must be finite and non-negative. Bad
    /// values fall back to their defaults with a warning.
    pub fn validate(&mut self) {
        let defaults = Self::default();
        self.walk_speed = non_negative("walk_speed", self.walk_speed, defaults.walk_speed);
        self.axis_velocity = non_negative("axis_velocity", self.axis_velocity, defaults.axis_velocity);
        self.poop_lifetime_secs =
            non_negative("poop_lifetime_secs", self.poop_lifetime_secs, defaults.poop_lifetime_secs);
        self.fecal_urgency_per_frame = non_negative(
            "fecal_urgency_per_frame",
            self.fecal_urgency_per_frame,
            defaults.fecal_urgency_per_frame,
        );
        self.hunger_per_frame = non_negative("hunger_per_frame", self.hunger_per_frame, defaults.hunger_per_frame);

        if !(self.poop_cooldown_ms.is_finite() && self.poop_cooldown_ms >= 0.0) {
            warn!(
                key = "poop_cooldown_ms",
                value = self.poop_cooldown_ms,
                fallback = defaults.poop_cooldown_ms,
                "invalid gameplay value, using default"
            );
            self.poop_cooldown_ms = defaults.poop_cooldown_ms;
        }
    }
}

fn non_negative(key: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(key, value, fallback, "invalid gameplay value, using default");
        fallback
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory all asset paths are resolved against.
    pub root: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self { root: PathBuf::from(".") }
    }
}

// ── GameConfig ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowSettings,
    pub physics: PhysicsSettings,
    pub gameplay: GameplaySettings,
    pub assets: AssetSettings,
}

impl GameConfig {
    /// Parse a config from TOML text. Absent keys keep their defaults and
    /// out-of-range values are repaired by [`GameConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(text)?;
        config.validate();
        Ok(config)
    }

    /// Clamp window values to something the event loop can run and repair
    /// the gameplay section.
    pub fn validate(&mut self) {
        self.window.width = self.window.width.clamp(1, 7680);
        self.window.height = self.window.height.clamp(1, 4320);
        self.window.target_ups = self.window.target_ups.clamp(1, 1000);
        self.gameplay.validate();
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

// ── Command line ─────────────────────────────────────────────────────────────

/// Flags understood by the binary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub debug: bool,
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Parse `--debug` and `--config <path>`; anything else is ignored.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut out = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" => out.debug = true,
                "--config" => out.config = args.next().map(PathBuf::from),
                _ => {}
            }
        }
        out
    }

    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }
}
