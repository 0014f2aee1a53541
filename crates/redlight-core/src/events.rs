//! Inbound trigger messages and outbound presentation events.
//!
//! The engine never calls into presentation code. Host callbacks push
//! `TriggerMsg`s onto a queue that is drained at the next tick boundary,
//! and each `update` returns the `RoundEvent`s the overlay/audio layer
//! should react to. This keeps every mutation on the single frame thread.

use serde::{Deserialize, Serialize};

use redlight_logic::observation::{Outcome, Phase};

/// A message from a trigger-volume callback, processed at the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerMsg {
    /// The player reached the corridor exit gate.
    ReachedExit,
    /// The player entered a scare-beat zone.
    EnteredScareZone,
}

/// An event for the presentation layer, emitted by `RoundEngine::update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// The director changed phase.
    PhaseChanged(Phase),
    /// The smoothed tension scalar moved; value is in [0, 1].
    TensionChanged(f32),
    /// A watching window was survived.
    SampleCollected { total: u32 },
    /// The exit gate bounced the player back.
    ExitRejected { collected: u32, required: u32 },
    /// Periodic stinger cue; cadence shortens as tension rises.
    StingerFired,
    /// Corridor lights should flicker.
    FlickerBurst,
    /// The jumpscare rig should play.
    JumpscareStarted,
    /// The host should fade out and reload the given scene.
    SceneReloadRequested { scene: String, delay_secs: f32 },
    /// On-screen status line (only emitted when a HUD is present).
    HudStatus { line: String },
    /// Terminal: the round is over.
    RoundEnded(Outcome),
}
