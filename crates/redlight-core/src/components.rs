//! Components for the corridor scene world.
//!
//! Pure data attached to entities. All of these serialize so a round can be
//! snapshotted and restored.

use serde::{Deserialize, Serialize};

use redlight_logic::modules::ModuleKind;
use redlight_logic::pose::Pose;

/// World placement of a scene entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Placement {
    pub pose: Pose,
}

/// A placed corridor module.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Module {
    /// Position in the assembled chain, 0-based.
    pub index: usize,
    pub kind: ModuleKind,
    pub length: f32,
    pub width: f32,
}

/// The player's locomotion state, derived from host-supplied positions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    pub prev_x: f32,
    pub prev_z: f32,
    /// Speed over the last tick, m/s.
    pub speed: f32,
}

/// What a trigger volume does when the player enters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerKind {
    /// The corridor exit gate — presents the player to the director.
    ExitGate,
    /// A scare beat — flicker burst and an early stinger.
    ScareZone,
}

/// Axis-aligned trigger volume on the corridor floor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TriggerVolume {
    pub kind: TriggerKind,
    pub cx: f32,
    pub cz: f32,
    pub half_x: f32,
    pub half_z: f32,
    /// Whether the player is currently inside (edge-triggered entry).
    pub occupied: bool,
}

impl TriggerVolume {
    pub fn new(kind: TriggerKind, cx: f32, cz: f32, half_x: f32, half_z: f32) -> Self {
        Self {
            kind,
            cx,
            cz,
            half_x,
            half_z,
            occupied: false,
        }
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        (x - self.cx).abs() <= self.half_x && (z - self.cz).abs() <= self.half_z
    }
}

/// A corridor light that dips during flicker bursts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlickerLight {
    /// Steady-state intensity.
    pub base_intensity: f32,
    /// Current intensity after flicker.
    pub intensity: f32,
    /// Seconds of burst remaining; 0 when steady.
    pub burst_remaining: f32,
}

impl FlickerLight {
    pub fn new(base_intensity: f32) -> Self {
        Self {
            base_intensity,
            intensity: base_intensity,
            burst_remaining: 0.0,
        }
    }

    /// Start a flicker burst lasting `duration` seconds.
    pub fn burst(&mut self, duration: f32) {
        self.burst_remaining = self.burst_remaining.max(duration);
    }

    /// Advance the burst; intensity dips to 30% while bursting.
    pub fn update(&mut self, dt: f32) {
        if self.burst_remaining > 0.0 {
            self.burst_remaining = (self.burst_remaining - dt).max(0.0);
            self.intensity = self.base_intensity * 0.3;
        } else {
            self.intensity = self.base_intensity;
        }
    }
}
