//! Socket-aligned corridor assembly.
//!
//! Algorithm: walk the parsed layout keeping `last_exit`, the world pose of
//! the previous module's exit socket (initially the assembly origin). Each
//! new module is placed so its *entry socket* — not its origin — lands on
//! `last_exit`, by composing `last_exit` with the inverse of the module's
//! local entry-socket pose. A small backward nudge along the module's
//! forward axis (join bias) then overlaps the seam so light can't leak
//! between segments. `last_exit` advances to the placed module's exit
//! socket, and assembly stops immediately after a dead end.
//!
//! Configuration errors (unparseable layout, missing prototype) abort the
//! whole build — a corridor is never partially assembled with skipped
//! segments.

use serde::{Deserialize, Serialize};

use crate::catalog::ModuleCatalog;
use crate::layout::{parse_layout, LayoutError};
use crate::modules::ModuleKind;
use crate::pose::Pose;

/// Assembly tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// World pose of the first module's entry socket.
    pub origin: Pose,
    /// Backward overlap applied to every placed module, meters.
    pub join_bias: f32,
    /// Positional/angular tolerance for socket-coincidence checks.
    pub snap_tolerance: f32,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            origin: Pose::default(),
            join_bias: 0.03,
            snap_tolerance: 1e-3,
        }
    }
}

/// A fatal corridor-assembly failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// The layout string failed to parse.
    Layout(LayoutError),
    /// A layout command referenced a kind with no registered prototype.
    MissingPrototype(ModuleKind),
}

impl std::fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblyError::Layout(e) => write!(f, "layout error: {}", e),
            AssemblyError::MissingPrototype(kind) => {
                write!(f, "no module prototype registered for {:?}", kind)
            }
        }
    }
}

impl std::error::Error for AssemblyError {}

impl From<LayoutError> for AssemblyError {
    fn from(e: LayoutError) -> Self {
        AssemblyError::Layout(e)
    }
}

/// One placed module instance in a corridor chain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlacedModule {
    /// Position in the chain, 0-based.
    pub index: usize,
    pub kind: ModuleKind,
    pub length: f32,
    pub width: f32,
    /// World pose of the entry socket before join bias. By construction
    /// this coincides with the previous module's `exit_pose`.
    pub placement_pose: Pose,
    /// Final world pose of the module origin, join bias applied.
    pub pose: Pose,
    /// World pose of the exit socket (of the nudged module).
    pub exit_pose: Pose,
}

/// An assembled, physically contiguous corridor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorridorChain {
    pub modules: Vec<PlacedModule>,
    /// Sum of entry-to-exit segment lengths, meters.
    pub total_length: f32,
}

impl CorridorChain {
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// World pose the chain starts from (first entry socket), if any.
    pub fn start_pose(&self) -> Option<Pose> {
        self.modules.first().map(|m| m.placement_pose)
    }

    /// Exit pose of the last module, if any.
    pub fn end_pose(&self) -> Option<Pose> {
        self.modules.last().map(|m| m.exit_pose)
    }

    /// Fraction of the chain traversed by a world point, in [0, 1].
    ///
    /// The point is projected onto the nearest entry→exit segment; progress
    /// is the arc length up to that projection over the total length. Used
    /// as the tension progress fraction.
    pub fn progress(&self, x: f32, z: f32) -> f32 {
        if self.total_length <= 0.0 {
            return 0.0;
        }
        let mut best_dist = f32::INFINITY;
        let mut best_arc = 0.0;
        let mut arc_before = 0.0;
        for m in &self.modules {
            let (ax, az) = (m.placement_pose.x, m.placement_pose.z);
            let (bx, bz) = (m.exit_pose.x, m.exit_pose.z);
            let (sx, sz) = (bx - ax, bz - az);
            let seg_len_sq = sx * sx + sz * sz;
            let seg_len = seg_len_sq.sqrt();
            let t = if seg_len_sq > 0.0 {
                (((x - ax) * sx + (z - az) * sz) / seg_len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (px, pz) = (ax + sx * t, az + sz * t);
            let (dx, dz) = (x - px, z - pz);
            let dist = dx * dx + dz * dz;
            if dist < best_dist {
                best_dist = dist;
                best_arc = arc_before + seg_len * t;
            }
            arc_before += seg_len;
        }
        (best_arc / self.total_length).clamp(0.0, 1.0)
    }
}

/// Assemble a corridor from pre-parsed module kinds.
///
/// Placed-module count equals `kinds.len()` unless a dead end cuts the
/// chain short. Errors abort the whole build.
pub fn assemble(
    kinds: &[ModuleKind],
    catalog: &ModuleCatalog,
    config: &AssemblyConfig,
) -> Result<CorridorChain, AssemblyError> {
    let mut modules = Vec::with_capacity(kinds.len());
    let mut total_length = 0.0;
    let mut last_exit = config.origin;

    for &kind in kinds {
        let spec = catalog
            .get(kind)
            .copied()
            .ok_or(AssemblyError::MissingPrototype(kind))?;

        // Entry socket onto last_exit, then nudge backward along the
        // module's own forward axis.
        let unbiased = last_exit.compose(&spec.entry_socket().inverse());
        let pose = unbiased.translate_forward(-config.join_bias);
        let exit_pose = pose.compose(&spec.exit_socket());

        let placed = PlacedModule {
            index: modules.len(),
            kind,
            length: spec.length,
            width: spec.width,
            placement_pose: last_exit,
            pose,
            exit_pose,
        };
        total_length += placed.placement_pose.distance_to(&placed.exit_pose);
        modules.push(placed);

        if kind.is_terminal() {
            break;
        }
        last_exit = exit_pose;
    }

    Ok(CorridorChain {
        modules,
        total_length,
    })
}

/// Parse a layout string and assemble it in one step.
pub fn assemble_layout(
    layout: &str,
    catalog: &ModuleCatalog,
    config: &AssemblyConfig,
) -> Result<CorridorChain, AssemblyError> {
    let kinds = parse_layout(layout)?;
    assemble(&kinds, catalog, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::ModuleSpec;
    use std::f32::consts::FRAC_PI_2;

    const TOL: f32 = 1e-3;

    fn zero_bias() -> AssemblyConfig {
        AssemblyConfig {
            join_bias: 0.0,
            ..AssemblyConfig::default()
        }
    }

    #[test]
    fn reference_layout_places_ten_modules() {
        let chain =
            assemble_layout("FFRFFLFFDFE", &ModuleCatalog::standard(), &zero_bias()).unwrap();
        assert_eq!(chain.len(), 10);
    }

    #[test]
    fn adjacent_sockets_coincide_at_zero_bias() {
        let chain =
            assemble_layout("FFRFFLFFDFE", &ModuleCatalog::standard(), &zero_bias()).unwrap();
        for pair in chain.modules.windows(2) {
            assert!(
                pair[0].exit_pose.approx_eq(&pair[1].placement_pose, TOL),
                "seam between module {} and {}: {:?} vs {:?}",
                pair[0].index,
                pair[1].index,
                pair[0].exit_pose,
                pair[1].placement_pose
            );
        }
    }

    #[test]
    fn empty_layout_is_a_noop() {
        let chain = assemble_layout("", &ModuleCatalog::standard(), &zero_bias()).unwrap();
        assert!(chain.is_empty());
        assert_eq!(chain.total_length, 0.0);
        assert_eq!(chain.progress(1.0, 1.0), 0.0);
    }

    #[test]
    fn dead_end_stops_assembly() {
        let chain = assemble_layout("FXFFF", &ModuleCatalog::standard(), &zero_bias()).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.modules[1].kind, ModuleKind::DeadEnd);
    }

    #[test]
    fn missing_prototype_aborts() {
        // Catalog with every prototype except TurnLeft.
        let mut catalog = ModuleCatalog::empty();
        for kind in ModuleKind::all() {
            if kind != ModuleKind::TurnLeft {
                catalog.register(*ModuleCatalog::standard().get(kind).unwrap());
            }
        }
        let err = assemble_layout("FFL", &catalog, &zero_bias()).unwrap_err();
        assert_eq!(err, AssemblyError::MissingPrototype(ModuleKind::TurnLeft));
    }

    #[test]
    fn straight_chain_runs_down_plus_z() {
        let chain = assemble_layout("FFF", &ModuleCatalog::standard(), &zero_bias()).unwrap();
        let end = chain.end_pose().unwrap();
        assert!((end.z - 12.0).abs() < TOL, "z={}", end.z);
        assert!(end.x.abs() < TOL);
        assert!(end.yaw.abs() < TOL);
    }

    #[test]
    fn left_turn_changes_heading() {
        let chain = assemble_layout("FL", &ModuleCatalog::standard(), &zero_bias()).unwrap();
        let end = chain.end_pose().unwrap();
        assert!((end.yaw - FRAC_PI_2).abs() < TOL, "yaw={}", end.yaw);
    }

    #[test]
    fn opposite_turns_cancel() {
        let chain = assemble_layout("FLRF", &ModuleCatalog::standard(), &zero_bias()).unwrap();
        let end = chain.end_pose().unwrap();
        assert!(end.yaw.abs() < TOL, "yaw={}", end.yaw);
    }

    #[test]
    fn join_bias_overlaps_each_seam() {
        let bias = 0.05;
        let config = AssemblyConfig {
            join_bias: bias,
            ..AssemblyConfig::default()
        };
        let chain = assemble_layout("FFF", &ModuleCatalog::standard(), &config).unwrap();
        for m in &chain.modules {
            // The nudged entry socket sits `bias` behind the placement pose.
            let entry = m
                .pose
                .compose(&Pose::at(0.0, 0.0, -m.length / 2.0));
            assert!(
                (entry.distance_to(&m.placement_pose) - bias).abs() < TOL,
                "module {} overlap {}",
                m.index,
                entry.distance_to(&m.placement_pose)
            );
        }
    }

    #[test]
    fn custom_origin_is_respected() {
        let config = AssemblyConfig {
            origin: Pose::new(10.0, 0.0, -5.0, FRAC_PI_2),
            join_bias: 0.0,
            ..AssemblyConfig::default()
        };
        let chain = assemble_layout("F", &ModuleCatalog::standard(), &config).unwrap();
        let first = &chain.modules[0];
        assert!(first.placement_pose.approx_eq(&config.origin, TOL));
        // Facing +X, a 4 m straight exits at x = 14.
        assert!((first.exit_pose.x - 14.0).abs() < TOL);
    }

    #[test]
    fn progress_runs_zero_to_one() {
        let chain = assemble_layout("FFF", &ModuleCatalog::standard(), &zero_bias()).unwrap();
        assert!(chain.progress(0.0, 0.0) < 0.01);
        assert!((chain.progress(0.0, 6.0) - 0.5).abs() < 0.02);
        assert!(chain.progress(0.0, 12.0) > 0.99);
        // Beyond either end stays clamped.
        assert_eq!(chain.progress(0.0, 100.0), 1.0);
        assert_eq!(chain.progress(0.0, -100.0), 0.0);
    }

    #[test]
    fn progress_follows_corners() {
        let chain = assemble_layout("FLF", &ModuleCatalog::standard(), &zero_bias()).unwrap();
        let end = chain.end_pose().unwrap();
        let p = chain.progress(end.x, end.z);
        assert!(p > 0.95, "end of chain should be ~1.0, got {p}");
    }

    #[test]
    fn total_length_matches_straight_chain() {
        let catalog = {
            let mut c = ModuleCatalog::empty();
            c.register(ModuleSpec::new(ModuleKind::Straight, 5.0, 2.0));
            c
        };
        let chain = assemble_layout("FF", &catalog, &zero_bias()).unwrap();
        assert!((chain.total_length - 10.0).abs() < TOL);
    }
}
