//! Round snapshots - versioned bincode save/load.
//!
//! A snapshot stores the full scene context plus the round's mutable state
//! (director, tension, chain, clocks). Loading re-runs scene construction
//! from the stored context and then overwrites the derived state, so the
//! world is rebuilt rather than serialized entity-by-entity. Phase duration
//! sampling is re-seeded from the scene seed on load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use redlight_logic::builder::{AssemblyError, CorridorChain};
use redlight_logic::observation::ObservationDirector;
use redlight_logic::tension::TensionMeter;

use crate::engine::{RestoredClocks, RoundEngine};
use crate::scene::SceneContext;

/// Current save format version. Bump on any incompatible change.
pub const SAVE_VERSION: u32 = 1;

/// Everything needed to restore a round.
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub scene: SceneContext,
    pub chain: CorridorChain,
    pub director: ObservationDirector,
    pub tension: TensionMeter,
    pub sim_time: f64,
    pub real_time: f64,
    pub time_scale: f32,
    pub reload_timer: Option<f32>,
    pub reload_fired: bool,
}

/// Errors that can occur during save/load.
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Serialization(String),
    UnsupportedVersion { found: u32, supported: u32 },
    Assembly(AssemblyError),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "io error: {}", e),
            SaveError::Serialization(e) => write!(f, "serialization error: {}", e),
            SaveError::UnsupportedVersion { found, supported } => {
                write!(f, "unsupported save version {} (supported: {})", found, supported)
            }
            SaveError::Assembly(e) => write!(f, "scene rebuild failed: {}", e),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<AssemblyError> for SaveError {
    fn from(e: AssemblyError) -> Self {
        SaveError::Assembly(e)
    }
}

/// Capture a snapshot of a running round.
pub fn snapshot(engine: &RoundEngine) -> SaveData {
    let (scene, chain, director, tension) = engine.snapshot_parts();
    let clocks = engine.clocks();
    SaveData {
        version: SAVE_VERSION,
        scene: scene.clone(),
        chain: chain.clone(),
        director: director.clone(),
        tension: *tension,
        sim_time: clocks.sim_time,
        real_time: clocks.real_time,
        time_scale: clocks.time_scale,
        reload_timer: clocks.reload_timer,
        reload_fired: clocks.reload_fired,
    }
}

/// Rebuild a round engine from a snapshot.
pub fn restore(data: SaveData) -> Result<RoundEngine, SaveError> {
    if data.version != SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion {
            found: data.version,
            supported: SAVE_VERSION,
        });
    }
    let engine = RoundEngine::restore(
        data.scene,
        data.chain,
        data.director,
        data.tension,
        RestoredClocks {
            sim_time: data.sim_time,
            real_time: data.real_time,
            time_scale: data.time_scale,
            reload_timer: data.reload_timer,
            reload_fired: data.reload_fired,
        },
    )?;
    Ok(engine)
}

/// Serialize a snapshot to bytes.
pub fn to_bytes(data: &SaveData) -> Result<Vec<u8>, SaveError> {
    bincode::serialize(data).map_err(|e| SaveError::Serialization(e.to_string()))
}

/// Deserialize a snapshot from bytes, checking the format version.
pub fn from_bytes(bytes: &[u8]) -> Result<SaveData, SaveError> {
    let data: SaveData =
        bincode::deserialize(bytes).map_err(|e| SaveError::Serialization(e.to_string()))?;
    if data.version != SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion {
            found: data.version,
            supported: SAVE_VERSION,
        });
    }
    Ok(data)
}

/// Save a running round to a file.
pub fn save_to_file(engine: &RoundEngine, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let bytes = to_bytes(&snapshot(engine))?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load a round from a file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<RoundEngine, SaveError> {
    let bytes = fs::read(path)?;
    restore(from_bytes(&bytes)?)
}
