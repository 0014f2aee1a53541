//! Smoothed tension scalar and the presentation curves derived from it.
//!
//! Tension is a continuous value in [0, 1] driving the vignette overlay and
//! stinger pacing. The target rises with corridor progress and snaps to a
//! floor while the player is being watched; the displayed value chases the
//! target with an exponential response so cuts between phases read as a
//! swell rather than a pop. Smoothing uses unscaled delta time — tension
//! keeps breathing even when simulation time is paused or scaled.

use serde::{Deserialize, Serialize};

use crate::validation::{Severity, ValidationError};

/// Tension tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TensionConfig {
    /// Resting tension at the corridor entrance.
    pub base: f32,
    /// Extra tension earned by full corridor progress.
    pub progress_bonus: f32,
    /// Minimum target while the player is being watched.
    pub watching_floor: f32,
    /// Exponential response speed, 1/s. Higher chases the target faster.
    pub response_speed: f32,
    /// Stinger pacing at zero tension, seconds.
    pub stinger_interval_max: f32,
    /// Stinger pacing at full tension, seconds.
    pub stinger_interval_min: f32,
}

impl Default for TensionConfig {
    fn default() -> Self {
        Self {
            base: 0.15,
            progress_bonus: 0.45,
            watching_floor: 0.75,
            response_speed: 2.0,
            stinger_interval_max: 25.0,
            stinger_interval_min: 7.0,
        }
    }
}

impl TensionConfig {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut findings = Vec::new();
        if self.response_speed <= 0.0 {
            findings.push(ValidationError {
                category: "tension",
                severity: Severity::Error,
                message: format!(
                    "response_speed must be positive, got {}",
                    self.response_speed
                ),
            });
        }
        if self.stinger_interval_min <= 0.0 || self.stinger_interval_max <= 0.0 {
            findings.push(ValidationError {
                category: "tension",
                severity: Severity::Error,
                message: "stinger intervals must be positive".to_string(),
            });
        }
        if self.stinger_interval_min > self.stinger_interval_max {
            findings.push(ValidationError {
                category: "tension",
                severity: Severity::Error,
                message: format!(
                    "stinger_interval_min {} exceeds max {}",
                    self.stinger_interval_min, self.stinger_interval_max
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.base) || !(0.0..=1.0).contains(&self.watching_floor) {
            findings.push(ValidationError {
                category: "tension",
                severity: Severity::Warning,
                message: "base and watching_floor are normally within [0, 1]".to_string(),
            });
        }
        findings
    }
}

/// Exponentially smoothed tension value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TensionMeter {
    config: TensionConfig,
    value: f32,
}

impl TensionMeter {
    pub fn new(config: TensionConfig) -> Self {
        Self {
            value: config.base.clamp(0.0, 1.0),
            config,
        }
    }

    /// Current smoothed tension in [0, 1].
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Instantaneous target for the given progress and watch state,
    /// clamped to [0, 1] regardless of input extremes.
    pub fn target(&self, progress: f32, watching: bool) -> f32 {
        let mut target = self.config.base + self.config.progress_bonus * progress;
        if watching {
            target = target.max(self.config.watching_floor);
        }
        target.clamp(0.0, 1.0)
    }

    /// Advance the smoothed value by `dt_unscaled` seconds toward the
    /// target. Returns the new value.
    pub fn update(&mut self, dt_unscaled: f32, progress: f32, watching: bool) -> f32 {
        let target = self.target(progress, watching);
        let rate = 1.0 - (-self.config.response_speed * dt_unscaled.max(0.0)).exp();
        self.value = (self.value + (target - self.value) * rate).clamp(0.0, 1.0);
        self.value
    }

    /// Seconds between stingers at the current tension — linear shortening
    /// from the max interval toward the min as tension rises.
    pub fn stinger_interval(&self) -> f32 {
        stinger_interval(&self.config, self.value)
    }
}

/// Stinger pacing for an arbitrary tension value.
pub fn stinger_interval(config: &TensionConfig, tension: f32) -> f32 {
    let t = tension.clamp(0.0, 1.0);
    config.stinger_interval_max + (config.stinger_interval_min - config.stinger_interval_max) * t
}

/// Vignette opacity curve: smoothstep over tension, so low tension stays
/// nearly clear and high tension closes in hard.
pub fn vignette_opacity(tension: f32) -> f32 {
    let t = tension.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
