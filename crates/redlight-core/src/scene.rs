//! Scene context — everything a round is constructed from.
//!
//! The context is built explicitly by the host and handed to the engine
//! once; there are no singletons and no scene-graph searches. Optional
//! collaborators are plain `Option`s, and a missing one degrades the
//! corresponding feature instead of failing the round.

use serde::{Deserialize, Serialize};

use redlight_logic::builder::AssemblyConfig;
use redlight_logic::catalog::ModuleCatalog;
use redlight_logic::observation::ObservationConfig;
use redlight_logic::tension::TensionConfig;
use redlight_logic::validation::ValidationError;

/// An available jumpscare sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JumpscareRig {
    /// How long the sequence plays before the scene reloads, seconds.
    pub duration_secs: f32,
}

impl Default for JumpscareRig {
    fn default() -> Self {
        Self { duration_secs: 2.0 }
    }
}

/// Full construction recipe for one round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneContext {
    /// Corridor layout commands (`F`,`L`,`R`,`D`,`X`, terminator `E`).
    pub layout: String,
    pub catalog: ModuleCatalog,
    pub assembly: AssemblyConfig,
    pub observation: ObservationConfig,
    pub tension: TensionConfig,
    /// Scene identifier handed back in reload requests.
    pub scene_name: String,
    /// Jumpscare rig, if the scene has one. Without it, failure falls back
    /// to a delayed scene reload.
    pub jumpscare: Option<JumpscareRig>,
    /// Whether an on-screen HUD is present.
    pub hud: bool,
    /// Seed for phase-duration sampling.
    pub seed: u64,
}

impl Default for SceneContext {
    fn default() -> Self {
        Self {
            layout: "FFRFFLFFDFXE".to_string(),
            catalog: ModuleCatalog::standard(),
            assembly: AssemblyConfig::default(),
            observation: ObservationConfig::default(),
            tension: TensionConfig::default(),
            scene_name: "ward_b".to_string(),
            jumpscare: Some(JumpscareRig::default()),
            hud: true,
            seed: 0,
        }
    }
}

impl SceneContext {
    /// Batch-validate every tunable block in the context.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut findings = self.catalog.validate();
        findings.extend(self.observation.validate());
        findings.extend(self.tension.validate());
        findings
    }
}
