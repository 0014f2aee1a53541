//! Ground-plane pose algebra — position plus yaw around the vertical axis.
//!
//! Corridor modules live on a flat floor, so a full 3D rotation is never
//! needed: a pose is a world position and a heading. Composition follows the
//! usual rigid-transform rules (rotate the local offset into the parent
//! frame, then translate), which is all the corridor assembler requires to
//! snap sockets together.
//!
//! Conventions: right-handed, Y up. At yaw 0 the forward axis is +Z;
//! positive yaw turns the heading toward +X (a left turn).

use serde::{Deserialize, Serialize};

/// A world or local pose: position and heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Heading in radians, normalized to (-π, π].
    pub yaw: f32,
}

/// The identity pose — world origin, facing +Z.
pub const IDENTITY: Pose = Pose {
    x: 0.0,
    y: 0.0,
    z: 0.0,
    yaw: 0.0,
};

impl Default for Pose {
    fn default() -> Self {
        IDENTITY
    }
}

impl Pose {
    pub fn new(x: f32, y: f32, z: f32, yaw: f32) -> Self {
        Self {
            x,
            y,
            z,
            yaw: normalize_yaw(yaw),
        }
    }

    /// A pose at the given position facing +Z.
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 0.0)
    }

    /// Unit forward vector (x, z components; y is always 0).
    pub fn forward(&self) -> (f32, f32) {
        (self.yaw.sin(), self.yaw.cos())
    }

    /// Rotate a local (x, z) offset into this pose's frame.
    fn rotate(&self, lx: f32, lz: f32) -> (f32, f32) {
        let (s, c) = (self.yaw.sin(), self.yaw.cos());
        (lx * c + lz * s, -lx * s + lz * c)
    }

    /// Transform a local point into world space.
    pub fn transform_point(&self, lx: f32, ly: f32, lz: f32) -> (f32, f32, f32) {
        let (wx, wz) = self.rotate(lx, lz);
        (self.x + wx, self.y + ly, self.z + wz)
    }

    /// Compose: apply `local` in this pose's frame, yielding a world pose.
    ///
    /// `a.compose(b)` places `b` as if `a` were its parent transform.
    pub fn compose(&self, local: &Pose) -> Pose {
        let (px, py, pz) = self.transform_point(local.x, local.y, local.z);
        Pose::new(px, py, pz, self.yaw + local.yaw)
    }

    /// The inverse pose: `p.compose(&p.inverse())` is the identity.
    pub fn inverse(&self) -> Pose {
        let inv = Pose::new(0.0, 0.0, 0.0, -self.yaw);
        let (ix, iz) = inv.rotate(self.x, self.z);
        Pose::new(-ix, -self.y, -iz, -self.yaw)
    }

    /// Move along the forward axis by `distance` (negative moves backward).
    pub fn translate_forward(&self, distance: f32) -> Pose {
        let (fx, fz) = self.forward();
        Pose::new(
            self.x + fx * distance,
            self.y,
            self.z + fz * distance,
            self.yaw,
        )
    }

    /// Euclidean distance between two pose positions.
    pub fn distance_to(&self, other: &Pose) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Approximate equality within a positional and angular tolerance.
    pub fn approx_eq(&self, other: &Pose, tolerance: f32) -> bool {
        self.distance_to(other) <= tolerance
            && yaw_difference(self.yaw, other.yaw).abs() <= tolerance
    }
}

/// Normalize a yaw angle to (-π, π].
pub fn normalize_yaw(yaw: f32) -> f32 {
    let two_pi = 2.0 * std::f32::consts::PI;
    let mut y = yaw % two_pi;
    if y <= -std::f32::consts::PI {
        y += two_pi;
    } else if y > std::f32::consts::PI {
        y -= two_pi;
    }
    y
}

/// Smallest signed difference between two yaw angles.
pub fn yaw_difference(a: f32, b: f32) -> f32 {
    normalize_yaw(a - b)
}
