//! FreeMove/Watching freeze-game state machine.
//!
//! The round alternates between free movement and "watching" windows whose
//! durations are sampled per entry from configured ranges. While watched,
//! the player's average speed over a short sliding window is checked every
//! sampling tick; moving faster than the still-speed threshold ends the
//! round in failure. Surviving a watching window banks one observation
//! sample, and the exit gate only accepts a player who has banked enough.
//!
//! Phase waits are duration-armed timers advanced by the tick's delta time
//! and polled for expiry — there is no suspension. Once the round has
//! ended, `step` is a no-op, so pending callers observe the terminal state
//! before acting.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::validation::{Severity, ValidationError};

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Fail,
}

/// Current round phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Player may move freely.
    FreeMove,
    /// Movement above the still-speed threshold fails the round.
    Watching,
    /// Terminal. No further transitions.
    Ended(Outcome),
}

/// Director tuning. Duration ranges are `(min, max)` seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObservationConfig {
    pub free_move_secs: (f32, f32),
    pub watching_secs: (f32, f32),
    /// Seconds between speed samples while watching.
    pub sample_interval: f32,
    /// Sliding-window size for the speed average.
    pub window_size: usize,
    /// Average speed above this during Watching fails the round, m/s.
    pub still_speed_threshold: f32,
    /// Watching windows that must be survived before the exit accepts.
    pub required_samples: u32,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            free_move_secs: (4.0, 8.0),
            watching_secs: (3.0, 6.0),
            sample_interval: 0.1,
            window_size: 10,
            still_speed_threshold: 0.35,
            required_samples: 3,
        }
    }
}

impl ObservationConfig {
    /// Check duration bounds and sampling parameters.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut findings = Vec::new();
        for (name, (min, max)) in [
            ("free_move_secs", self.free_move_secs),
            ("watching_secs", self.watching_secs),
        ] {
            if min <= 0.0 || max <= 0.0 {
                findings.push(ValidationError {
                    category: "observation",
                    severity: Severity::Error,
                    message: format!("{name} bounds must be positive, got ({min}, {max})"),
                });
            }
            if min > max {
                findings.push(ValidationError {
                    category: "observation",
                    severity: Severity::Error,
                    message: format!("{name} min {min} exceeds max {max}"),
                });
            }
        }
        if self.sample_interval <= 0.0 {
            findings.push(ValidationError {
                category: "observation",
                severity: Severity::Error,
                message: format!(
                    "sample_interval must be positive, got {}",
                    self.sample_interval
                ),
            });
        }
        if self.window_size == 0 {
            findings.push(ValidationError {
                category: "observation",
                severity: Severity::Error,
                message: "window_size must be at least 1".to_string(),
            });
        }
        if self.still_speed_threshold <= 0.0 {
            findings.push(ValidationError {
                category: "observation",
                severity: Severity::Warning,
                message: format!(
                    "still_speed_threshold {} makes any movement a violation",
                    self.still_speed_threshold
                ),
            });
        }
        if self.required_samples == 0 {
            findings.push(ValidationError {
                category: "observation",
                severity: Severity::Warning,
                message: "required_samples of 0 means the exit always accepts".to_string(),
            });
        }
        findings
    }
}

/// Events emitted by a director step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhaseEvent {
    PhaseChanged(Phase),
    /// A watching window was survived; `total` banked so far.
    SampleCollected { total: u32 },
    /// Average speed exceeded the threshold during Watching.
    ViolationDetected { average_speed: f32 },
    RoundEnded(Outcome),
}

/// Result of presenting the player at the exit gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitDecision {
    Accepted,
    Rejected { collected: u32, required: u32 },
}

/// Sliding window over the most recent speed samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedWindow {
    capacity: usize,
    samples: VecDeque<f32>,
}

impl SpeedWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, speed: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(speed);
    }

    /// Mean of the stored samples; 0 when empty.
    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The round director: phase, timers, and the banked-sample counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationDirector {
    config: ObservationConfig,
    phase: Phase,
    /// Seconds remaining in the current phase.
    timer: f32,
    /// Time accumulated toward the next speed sample.
    sample_accum: f32,
    window: SpeedWindow,
    collected: u32,
}

impl ObservationDirector {
    /// Start a round in FreeMove with a freshly sampled duration.
    pub fn new(config: ObservationConfig, rng: &mut impl Rng) -> Self {
        let timer = sample_duration(config.free_move_secs, rng);
        Self {
            window: SpeedWindow::new(config.window_size),
            config,
            phase: Phase::FreeMove,
            timer,
            sample_accum: 0.0,
            collected: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, Phase::Ended(_))
    }

    pub fn is_watching(&self) -> bool {
        self.phase == Phase::Watching
    }

    pub fn collected_samples(&self) -> u32 {
        self.collected
    }

    pub fn time_remaining(&self) -> f32 {
        self.timer.max(0.0)
    }

    pub fn config(&self) -> &ObservationConfig {
        &self.config
    }

    /// Advance the director by `dt` seconds with the player's current speed.
    ///
    /// Violation checks run before timer expiry, so movement during the
    /// final sampling tick of a watching window still fails. Terminal
    /// phases are inert.
    pub fn step(&mut self, dt: f32, player_speed: f32, rng: &mut impl Rng) -> Vec<PhaseEvent> {
        if self.is_ended() {
            return Vec::new();
        }

        let mut events = Vec::new();

        if self.phase == Phase::Watching {
            self.sample_accum += dt;
            while self.sample_accum >= self.config.sample_interval {
                self.sample_accum -= self.config.sample_interval;
                self.window.push(player_speed);
                let average = self.window.average();
                if average > self.config.still_speed_threshold {
                    self.phase = Phase::Ended(Outcome::Fail);
                    events.push(PhaseEvent::ViolationDetected {
                        average_speed: average,
                    });
                    events.push(PhaseEvent::PhaseChanged(self.phase));
                    events.push(PhaseEvent::RoundEnded(Outcome::Fail));
                    return events;
                }
            }
        }

        self.timer -= dt;
        if self.timer <= 0.0 {
            match self.phase {
                Phase::FreeMove => {
                    self.phase = Phase::Watching;
                    self.window.clear();
                    self.sample_accum = 0.0;
                    self.timer = sample_duration(self.config.watching_secs, rng);
                    events.push(PhaseEvent::PhaseChanged(self.phase));
                }
                Phase::Watching => {
                    self.collected += 1;
                    self.phase = Phase::FreeMove;
                    self.timer = sample_duration(self.config.free_move_secs, rng);
                    events.push(PhaseEvent::SampleCollected {
                        total: self.collected,
                    });
                    events.push(PhaseEvent::PhaseChanged(self.phase));
                }
                Phase::Ended(_) => {}
            }
        }

        events
    }

    /// Present the player at the exit gate.
    ///
    /// Accepts (and ends the round in a win) only when enough samples are
    /// banked; otherwise the attempt is rejected and the loop continues.
    /// After a failure the gate always rejects.
    pub fn on_reached_exit(&mut self) -> ExitDecision {
        match self.phase {
            Phase::Ended(Outcome::Win) => ExitDecision::Accepted,
            Phase::Ended(Outcome::Fail) => ExitDecision::Rejected {
                collected: self.collected,
                required: self.config.required_samples,
            },
            _ => {
                if self.collected >= self.config.required_samples {
                    self.phase = Phase::Ended(Outcome::Win);
                    ExitDecision::Accepted
                } else {
                    ExitDecision::Rejected {
                        collected: self.collected,
                        required: self.config.required_samples,
                    }
                }
            }
        }
    }
}

/// Uniform sample from an inclusive `(min, max)` seconds range.
fn sample_duration(range: (f32, f32), rng: &mut impl Rng) -> f32 {
    let (min, max) = range;
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}
