//! The single neck connector shared by every style combination.

use std::f64::consts::FRAC_PI_2;

use botforge_ir::SceneNode;

use super::shape::{ring, taper};
use super::Kit;
use crate::palette::Finish;

/// Height of the neck column; the head anchor sits at its top.
pub const HEIGHT: f64 = 0.18;

/// Neck subtree, origin at the column center.
pub fn build(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("neck")
        .tagged("neck", None)
        .with_child(SceneNode::mesh("column", taper(0.11, 0.13, HEIGHT), kit.paint(Finish::Joint)))
        .with_child(
            SceneNode::mesh("collar", ring(0.13, 0.02), kit.fixed(Finish::Trim))
                .at(0.0, -0.07, 0.0)
                .rotated(FRAC_PI_2, 0.0, 0.0),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::palette::Palette;

    #[test]
    fn neck_takes_the_robot_color() {
        let lime = Rgb::new(0, 255, 0);
        let neck = build(&Kit::new(Palette::standard(), lime));
        let column = neck.find("column").and_then(|n| n.mesh.as_ref()).unwrap();
        assert_eq!(column.material.color, lime.to_unit());
        assert_eq!(column.material.clearcoat, 0.7);
        assert_eq!(neck.tag.as_ref().unwrap().role, "neck");
    }
}
