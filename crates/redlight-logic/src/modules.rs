//! Corridor module kinds and their derived entry/exit sockets.
//!
//! A module's origin sits at the center of its floor. The entry socket is
//! always at the middle of the near edge facing into the module; the exit
//! socket is fully determined by kind and length — it is never freely
//! settable, which is what keeps assembled chains contiguous.

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::pose::Pose;

/// The five corridor module kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// Straight corridor segment.
    Straight,
    /// 90° corner turning toward +X (left of travel).
    TurnLeft,
    /// 90° corner turning toward -X (right of travel).
    TurnRight,
    /// Straight segment with a door frame — passable, used for pacing beats.
    Doorway,
    /// Terminal cap. Nothing can attach past it.
    DeadEnd,
}

impl ModuleKind {
    /// All kinds, in layout-token order.
    pub fn all() -> [ModuleKind; 5] {
        [
            ModuleKind::Straight,
            ModuleKind::TurnLeft,
            ModuleKind::TurnRight,
            ModuleKind::Doorway,
            ModuleKind::DeadEnd,
        ]
    }

    /// Layout token for this kind.
    pub fn token(&self) -> char {
        match self {
            ModuleKind::Straight => 'F',
            ModuleKind::TurnLeft => 'L',
            ModuleKind::TurnRight => 'R',
            ModuleKind::Doorway => 'D',
            ModuleKind::DeadEnd => 'X',
        }
    }

    /// Resolve a layout token. `E` is the layout terminator, not a kind,
    /// so it is not accepted here.
    pub fn from_token(token: char) -> Option<ModuleKind> {
        match token {
            'F' => Some(ModuleKind::Straight),
            'L' => Some(ModuleKind::TurnLeft),
            'R' => Some(ModuleKind::TurnRight),
            'D' => Some(ModuleKind::Doorway),
            'X' => Some(ModuleKind::DeadEnd),
            _ => None,
        }
    }

    /// Whether assembly must stop after placing this kind.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ModuleKind::DeadEnd)
    }
}

/// Dimensions and derived sockets for one module prototype.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub kind: ModuleKind,
    /// Extent along the direction of travel, meters.
    pub length: f32,
    /// Floor width, meters.
    pub width: f32,
}

impl ModuleSpec {
    pub fn new(kind: ModuleKind, length: f32, width: f32) -> Self {
        Self {
            kind,
            length,
            width,
        }
    }

    /// Local pose of the entry socket: middle of the near edge, facing
    /// into the module.
    pub fn entry_socket(&self) -> Pose {
        Pose::at(0.0, 0.0, -self.length / 2.0)
    }

    /// Local pose of the exit socket, derived from kind and length.
    ///
    /// Straight-through kinds exit at the far edge; corners exit at the
    /// middle of the side edge, heading rotated ±90°. Dead ends report
    /// their far wall but `has_exit()` is false.
    pub fn exit_socket(&self) -> Pose {
        let half = self.length / 2.0;
        match self.kind {
            ModuleKind::Straight | ModuleKind::Doorway | ModuleKind::DeadEnd => {
                Pose::at(0.0, 0.0, half)
            }
            ModuleKind::TurnLeft => Pose::new(half, 0.0, 0.0, FRAC_PI_2),
            ModuleKind::TurnRight => Pose::new(-half, 0.0, 0.0, -FRAC_PI_2),
        }
    }

    /// Whether another module may attach to the exit socket.
    pub fn has_exit(&self) -> bool {
        !self.kind.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose;

    const TOL: f32 = 1e-5;

    #[test]
    fn tokens_round_trip() {
        for kind in ModuleKind::all() {
            assert_eq!(ModuleKind::from_token(kind.token()), Some(kind));
        }
    }

    #[test]
    fn terminator_is_not_a_kind() {
        assert_eq!(ModuleKind::from_token('E'), None);
    }

    #[test]
    fn unknown_token_rejected() {
        assert_eq!(ModuleKind::from_token('Q'), None);
        assert_eq!(ModuleKind::from_token('f'), None);
    }

    #[test]
    fn straight_exit_is_length_past_entry() {
        let spec = ModuleSpec::new(ModuleKind::Straight, 4.0, 2.0);
        let entry = spec.entry_socket();
        let exit = spec.exit_socket();
        assert!((exit.z - entry.z - 4.0).abs() < TOL);
        assert!(exit.yaw.abs() < TOL);
    }

    #[test]
    fn left_turn_exits_on_plus_x_side() {
        let spec = ModuleSpec::new(ModuleKind::TurnLeft, 4.0, 2.0);
        let exit = spec.exit_socket();
        assert!((exit.x - 2.0).abs() < TOL);
        assert!(exit.z.abs() < TOL);
        assert!((exit.yaw - std::f32::consts::FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn right_turn_mirrors_left() {
        let left = ModuleSpec::new(ModuleKind::TurnLeft, 4.0, 2.0).exit_socket();
        let right = ModuleSpec::new(ModuleKind::TurnRight, 4.0, 2.0).exit_socket();
        assert!((left.x + right.x).abs() < TOL);
        assert!((pose::yaw_difference(left.yaw, -right.yaw)).abs() < TOL);
    }

    #[test]
    fn dead_end_has_no_exit() {
        let spec = ModuleSpec::new(ModuleKind::DeadEnd, 2.0, 2.0);
        assert!(!spec.has_exit());
        assert!(spec.kind.is_terminal());
    }

    #[test]
    fn doorway_passes_through() {
        let spec = ModuleSpec::new(ModuleKind::Doorway, 3.0, 2.0);
        assert!(spec.has_exit());
        assert!((spec.exit_socket().z - 1.5).abs() < TOL);
    }
}
