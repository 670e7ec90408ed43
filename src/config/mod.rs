//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::game::physics::PhysicsSystem;
use crate::game::MatchConfig;
use crate::util::time::{tick_delta, MAX_FRAME_DT, RENDER_FPS, SIMULATION_TPS};

/// Highest accepted render rate
const MAX_RENDER_FPS: u32 = 1000;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Simulation ticks per second
    pub tick_hz: u32,
    /// Rendered frames per second (snapshot cadence)
    pub render_fps: u32,
    /// Longest wall-clock frame delta fed to the accumulator
    pub max_frame_dt: Duration,

    /// Pause after a knockout before the round resets
    pub round_reset_delay: Duration,
    /// Downward acceleration in units/s²
    pub gravity: f32,

    /// Frames between snapshot lines on stdout, 0 disables them
    pub snapshot_interval: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any name -> value lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = MatchConfig::default();

        let tick_hz = parse_or(&lookup, "TICK_HZ", SIMULATION_TPS)?;
        if tick_hz == 0 {
            return Err(ConfigError::Invalid("TICK_HZ"));
        }
        let render_fps = parse_or(&lookup, "RENDER_FPS", RENDER_FPS)?;
        if render_fps == 0 || render_fps > MAX_RENDER_FPS {
            return Err(ConfigError::Invalid("RENDER_FPS"));
        }

        let max_frame_dt_ms = parse_or(
            &lookup,
            "MAX_FRAME_DT_MS",
            MAX_FRAME_DT.as_millis() as u64,
        )?;
        let reset_delay_ms = parse_or(
            &lookup,
            "ROUND_RESET_DELAY_MS",
            defaults.round_reset_delay.as_millis() as u64,
        )?;

        let gravity: f32 = parse_or(&lookup, "GRAVITY", defaults.gravity)?;
        if !gravity.is_finite() {
            return Err(ConfigError::Invalid("GRAVITY"));
        }
        // Too coarse a step sinks a standing fighter through the floor
        if !PhysicsSystem::holds_ground(gravity, tick_delta(tick_hz)) {
            return Err(ConfigError::Invalid("TICK_HZ"));
        }

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            tick_hz,
            render_fps,
            max_frame_dt: Duration::from_millis(max_frame_dt_ms),
            round_reset_delay: Duration::from_millis(reset_delay_ms),
            gravity,
            snapshot_interval: parse_or(&lookup, "SNAPSHOT_INTERVAL", 1)?,
        })
    }

    /// Simulation settings for the match
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            gravity: self.gravity,
            round_reset_delay: self.round_reset_delay,
            ..MatchConfig::default()
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.render_fps as u64)
    }
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
