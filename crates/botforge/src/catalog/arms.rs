//! Arm variants, authored for the left side only. Origin is the shoulder;
//! +X points in towards the torso. The assembler mirrors the right arm.

use std::f64::consts::{FRAC_PI_2, PI};

use botforge_ir::SceneNode;

use super::shape::{ball, capsule, cone, cuboid, ring, rod};
use super::{Kit, PartVariant};
use crate::palette::Finish;

pub static VARIANTS: [PartVariant; 5] = [
    PartVariant {
        name: "Rod",
        build: rod_arm,
        blink_period: None,
    },
    PartVariant {
        name: "Piston",
        build: piston,
        blink_period: None,
    },
    PartVariant {
        name: "Heavy",
        build: heavy,
        blink_period: None,
    },
    PartVariant {
        name: "Slim",
        build: slim,
        blink_period: None,
    },
    PartVariant {
        name: "Claw",
        build: claw,
        blink_period: None,
    },
];

fn rod_arm(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("arm")
        .with_child(SceneNode::mesh("shoulder", ball(0.12), kit.fixed(Finish::Trim)).at(0.04, 0.55, 0.0))
        .with_child(SceneNode::mesh("limb", rod(0.1, 1.2), kit.paint(Finish::Chassis)))
        .with_child(
            SceneNode::mesh("hand", ball(0.15), kit.paint(Finish::Joint))
                .at(0.02, -0.65, 0.0)
                .rotated(0.0, 0.0, 0.2),
        )
}

fn piston(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("arm")
        .with_child(SceneNode::mesh("limb", cuboid(0.2, 1.2, 0.2), kit.paint(Finish::Chassis)))
        .with_child(SceneNode::mesh("piston", rod(0.05, 0.5), kit.fixed(Finish::Trim)).at(0.12, 0.0, 0.0))
        .with_child(
            SceneNode::mesh("hand", cuboid(0.3, 0.3, 0.3), kit.paint(Finish::Joint))
                .at(0.0, -0.65, 0.0)
                .rotated(0.0, 0.2, 0.1),
        )
}

fn heavy(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("arm")
        .with_child(SceneNode::mesh("limb", rod(0.15, 1.2), kit.paint(Finish::ChassisPolished)))
        .with_child(
            SceneNode::mesh("elbow", ring(0.16, 0.03), kit.fixed(Finish::Trim)).rotated(FRAC_PI_2, 0.0, 0.0),
        )
        .with_child(SceneNode::mesh("hand", ball(0.2), kit.paint(Finish::Joint)).at(0.03, -0.65, 0.0))
}

fn slim(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("arm")
        .with_child(SceneNode::mesh("limb", capsule(0.08, 1.0), kit.paint(Finish::ChassisSatin)))
        .with_child(
            SceneNode::mesh("wrist", ring(0.09, 0.02), kit.fixed(Finish::Trim))
                .at(0.0, -0.45, 0.0)
                .rotated(FRAC_PI_2, 0.0, 0.0),
        )
        .with_child(SceneNode::mesh("hand", ball(0.12), kit.paint(Finish::Joint)).at(0.01, -0.62, 0.0))
}

fn claw(kit: &Kit<'_>) -> SceneNode {
    let finger = |name: &str, x: f64, tilt: f64| {
        SceneNode::mesh(name, cone(0.05, 0.2), kit.fixed(Finish::Trim))
            .at(x, -0.65, 0.0)
            .rotated(0.0, 0.0, PI + tilt)
    };
    SceneNode::group("arm")
        .with_child(SceneNode::mesh("limb", rod(0.1, 1.1), kit.paint(Finish::Chassis)).at(0.0, 0.05, 0.0))
        .with_child(SceneNode::mesh("palm", ball(0.1), kit.paint(Finish::Joint)).at(0.0, -0.52, 0.0))
        .with_child(finger("finger_inner", 0.06, -0.3))
        .with_child(finger("finger_outer", -0.06, 0.35))
}
