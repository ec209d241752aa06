//! Eyes and mouths shared by the head variants.
//!
//! Every head exposes groups named `eye_left` and `eye_right` and a box
//! named `mouth`; the idle layer finds them by name.

use botforge_ir::SceneNode;

use super::shape::{ball, cuboid, disc};
use super::Kit;
use crate::palette::Finish;

/// Height of the resting mouth slot.
pub const MOUTH_THICKNESS: f64 = 0.04;

/// Names of the two eye groups, left first.
pub const EYES: [&str; 2] = ["eye_left", "eye_right"];

/// Pair of painted-white eyes with dark pupils, `dx` either side of center.
pub fn eyes(kit: &Kit<'_>, dx: f64, y: f64, z: f64, radius: f64) -> [SceneNode; 2] {
    let eye = |name: &str, x: f64| {
        SceneNode::group(name)
            .at(x, y, z)
            .with_child(SceneNode::mesh("sclera", ball(radius), kit.fixed(Finish::EyeWhite)))
            .with_child(
                SceneNode::mesh("pupil", ball(radius * 0.45), kit.fixed(Finish::Pupil))
                    .at(0.0, 0.0, radius * 0.7),
            )
    };
    [eye(EYES[0], -dx), eye(EYES[1], dx)]
}

/// Pair of glowing lens eyes set into a visor.
pub fn lenses(kit: &Kit<'_>, dx: f64, y: f64, z: f64, radius: f64) -> [SceneNode; 2] {
    let lens = |name: &str, x: f64| {
        SceneNode::group(name)
            .at(x, y, z)
            .with_child(SceneNode::mesh("lens", disc(radius), kit.fixed(Finish::Glow)))
            .with_child(
                SceneNode::mesh("pupil", ball(radius * 0.35), kit.fixed(Finish::Pupil))
                    .at(0.0, 0.0, 0.01),
            )
    };
    [lens(EYES[0], -dx), lens(EYES[1], dx)]
}

/// Flat mouth slot of the given width, centered at `(0, y, z)`.
pub fn mouth(kit: &Kit<'_>, y: f64, z: f64, width: f64) -> SceneNode {
    SceneNode::mesh("mouth", cuboid(width, MOUTH_THICKNESS, 0.02), kit.fixed(Finish::Mouth)).at(0.0, y, z)
}
