//! Leg variants, authored for the left side only. Origin is the hip and
//! the sole sits 0.7 below it.

use std::f64::consts::FRAC_PI_2;

use botforge_ir::SceneNode;

use super::shape::{ball, capsule, cuboid, ring, rod};
use super::{Kit, PartVariant};
use crate::palette::Finish;

pub static VARIANTS: [PartVariant; 5] = [
    PartVariant {
        name: "Stilt",
        build: stilt,
        blink_period: None,
    },
    PartVariant {
        name: "Strut",
        build: strut,
        blink_period: None,
    },
    PartVariant {
        name: "Bulwark",
        build: bulwark,
        blink_period: None,
    },
    PartVariant {
        name: "Walker",
        build: walker,
        blink_period: None,
    },
    PartVariant {
        name: "Tread",
        build: tread,
        blink_period: None,
    },
];

fn foot(kit: &Kit<'_>, x: f64, z: f64, depth: f64) -> SceneNode {
    SceneNode::mesh("foot", cuboid(0.4, 0.2, depth), kit.paint(Finish::Joint)).at(x, -0.6, z)
}

fn stilt(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("leg")
        .with_child(SceneNode::mesh("limb", rod(0.15, 1.2), kit.paint(Finish::Chassis)))
        .with_child(foot(kit, 0.0, 0.05, 0.4))
}

fn strut(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("leg")
        .with_child(SceneNode::mesh("limb", cuboid(0.2, 1.2, 0.2), kit.paint(Finish::Chassis)))
        .with_child(SceneNode::mesh("brace", rod(0.04, 0.6), kit.fixed(Finish::Trim)).at(0.12, 0.1, 0.0))
        .with_child(foot(kit, 0.0, 0.05, 0.4))
}

fn bulwark(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("leg")
        .with_child(SceneNode::mesh("limb", rod(0.2, 1.2), kit.paint(Finish::ChassisPolished)))
        .with_child(
            SceneNode::mesh("knee", ring(0.21, 0.03), kit.fixed(Finish::Trim)).rotated(FRAC_PI_2, 0.0, 0.0),
        )
        .with_child(
            SceneNode::mesh("foot", ball(0.3), kit.paint(Finish::Joint))
                .at(0.0, -0.55, 0.05)
                .scaled(1.0, 0.5, 1.0),
        )
}

fn walker(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("leg")
        .with_child(SceneNode::mesh("limb", rod(0.15, 1.2), kit.paint(Finish::ChassisSatin)))
        .with_child(SceneNode::mesh("knee", ball(0.17), kit.fixed(Finish::Trim)))
        .with_child(foot(kit, 0.02, 0.08, 0.5).rotated(0.0, 0.15, 0.0))
}

fn tread(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("leg")
        .with_child(SceneNode::mesh("limb", rod(0.15, 1.0), kit.paint(Finish::Chassis)).at(0.0, 0.1, 0.0))
        .with_child(
            SceneNode::mesh("track", capsule(0.12, 0.3), kit.fixed(Finish::Trim))
                .at(0.0, -0.58, 0.02)
                .rotated(FRAC_PI_2, 0.0, 0.0),
        )
        .with_child(
            SceneNode::mesh("hub", rod(0.05, 0.08), kit.fixed(Finish::Glow))
                .at(0.13, -0.58, 0.02)
                .rotated(0.0, 0.0, FRAC_PI_2),
        )
}
