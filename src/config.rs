//! Engine tunables parsed from environment variables.
//!
//! Every knob has a default in [`crate::consts`]; an unset or unparseable
//! variable falls back to it. [`EngineConfig::validate`] catches values that
//! parse but make no sense.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use tracing::warn;

use crate::consts::{ARC_ACCURACY, BEND_SCALE, CAP_DELTA_PCT, CAP_POINT_PCT, POLL_HZ};

/// Rejected configuration values.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("poll rate must be at least 1 Hz")]
    ZeroPollRate,

    #[error("cap window {point}% ± {delta}% does not fit inside the path")]
    CapWindow { point: f64, delta: f64 },

    #[error("bend scale must be finite, got {0}")]
    BendScale(f64),

    #[error("arc length accuracy must be positive and finite, got {0}")]
    ArcAccuracy(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Poll ticks per second while a mode that polls is on.
    pub poll_hz: u32,
    /// Cap position as a percentage of path length.
    pub cap_point_pct: f64,
    /// Half-width of the cap in percent of path length.
    pub cap_delta_pct: f64,
    /// Bend handed to the most vertically spread connector, scaled by rank.
    pub bend_scale: f64,
    /// Arc-length error tolerance, in document units.
    pub arc_accuracy: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_hz: POLL_HZ,
            cap_point_pct: CAP_POINT_PCT,
            cap_delta_pct: CAP_DELTA_PCT,
            bend_scale: BEND_SCALE,
            arc_accuracy: ARC_ACCURACY,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `LINKBOARD_POLL_HZ`: default 60
    /// - `LINKBOARD_CAP_POINT_PCT`: default 50
    /// - `LINKBOARD_CAP_DELTA_PCT`: default 2
    /// - `LINKBOARD_BEND_SCALE`: default 100
    /// - `LINKBOARD_ARC_ACCURACY`: default 0.001
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Build config from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            poll_hz: parse_or(&lookup, "LINKBOARD_POLL_HZ", defaults.poll_hz),
            cap_point_pct: parse_or(&lookup, "LINKBOARD_CAP_POINT_PCT", defaults.cap_point_pct),
            cap_delta_pct: parse_or(&lookup, "LINKBOARD_CAP_DELTA_PCT", defaults.cap_delta_pct),
            bend_scale: parse_or(&lookup, "LINKBOARD_BEND_SCALE", defaults.bend_scale),
            arc_accuracy: parse_or(&lookup, "LINKBOARD_ARC_ACCURACY", defaults.arc_accuracy),
        }
    }

    /// # Errors
    ///
    /// The first field found out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_hz == 0 {
            return Err(ConfigError::ZeroPollRate);
        }
        let (point, delta) = (self.cap_point_pct, self.cap_delta_pct);
        let window_ok = point.is_finite() && delta.is_finite() && delta > 0.0 && point - delta >= 0.0 && point + delta <= 100.0;
        if !window_ok {
            return Err(ConfigError::CapWindow { point, delta });
        }
        if !self.bend_scale.is_finite() {
            return Err(ConfigError::BendScale(self.bend_scale));
        }
        if !(self.arc_accuracy.is_finite() && self.arc_accuracy > 0.0) {
            return Err(ConfigError::ArcAccuracy(self.arc_accuracy));
        }
        Ok(())
    }

    /// Time between poll ticks.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.poll_hz.max(1)))
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    parse_or(&env_lookup, key, default)
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var_os(key).and_then(|v| v.to_str().map(str::to_owned))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "unparseable setting ignored");
            default
        }
    }
}
