//! Redlight Core - Corridor Horror Round Engine
//!
//! A single-threaded, tick-driven engine for one round of the freeze game:
//! the corridor is assembled once at round start, then every tick the
//! engine derives the player's speed, steps the observation director,
//! smooths the tension scalar, and emits presentation events for whatever
//! overlay/audio layer the host wires up.
//!
//! # Architecture
//!
//! The scene lives in an ECS world via `hecs`:
//! - **Entities**: placed corridor modules, the player, trigger volumes,
//!   flickering lights
//! - **Components**: pure data (`Placement`, `Module`, `TriggerVolume`, ...)
//! - **Engine**: one `update(dt, input)` call per frame; trigger messages
//!   are queued and processed at tick boundaries, never mid-tick
//!
//! # Example
//!
//! ```rust,no_run
//! use redlight_core::prelude::*;
//! use redlight_core::scene::SceneContext;
//!
//! let mut engine = RoundEngine::new(SceneContext::default()).unwrap();
//!
//! // Run the round
//! loop {
//!     let events = engine.update(1.0 / 60.0, PlayerInput { x: 0.0, z: 0.0 });
//!     for event in events {
//!         // forward to the presentation layer
//!         let _ = event;
//!     }
//! }
//! ```

pub mod components;
pub mod engine;
pub mod events;
pub mod persistence;
pub mod scene;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{PlayerInput, RoundEngine};
    pub use crate::events::{RoundEvent, TriggerMsg};
}
