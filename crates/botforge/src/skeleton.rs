//! Fixed attachment points shared by every part variant.
//!
//! Variants are authored so that their own origin lines up with the anchor
//! they are mounted on. Placement never depends on which style is active.

use botforge_ir::Transform;

/// Root group offset: lifts the robot so its soles rest on y = 0.
pub const ROOT: Transform = Transform::at(0.0, 2.2, 0.0);

/// Body origin, relative to the root (center of the torso).
pub const BODY: Transform = Transform::at(0.0, -0.2, 0.0);

/// Neck origin, relative to the root (neck spans y 0.55 to 0.73).
pub const NECK: Transform = Transform::at(0.0, 0.64, 0.0);

/// Head origin, relative to the root: the top of the neck.
pub const HEAD: Transform = Transform::at(0.0, 0.73, 0.0);

/// Left shoulder, relative to the root. The right shoulder is its mirror.
pub const SHOULDER_LEFT: Transform = Transform::at(-0.6, -0.2, 0.0);

/// Left hip, relative to the root. The right hip is its mirror.
pub const HIP_LEFT: Transform = Transform::at(-0.3, -1.5, 0.0);

/// Forward offset shared by every face accessory.
pub const FACE_OFFSET: f64 = 0.01;
