//! Torso variants. Origin is the torso center; the top edge meets the
//! neck 0.75 above it and the hips hang 1.3 below.

use std::f64::consts::FRAC_PI_2;

use botforge_ir::SceneNode;

use super::shape::{ball, cuboid, disc, dome, ring, rod};
use super::{Kit, PartVariant};
use crate::palette::Finish;

pub static VARIANTS: [PartVariant; 5] = [
    PartVariant {
        name: "Block",
        build: block,
        blink_period: None,
    },
    PartVariant {
        name: "Barrel",
        build: barrel,
        blink_period: None,
    },
    PartVariant {
        name: "Dome",
        build: domed,
        blink_period: None,
    },
    PartVariant {
        name: "Mint",
        build: mint,
        blink_period: None,
    },
    PartVariant {
        name: "Reactor",
        build: reactor,
        blink_period: None,
    },
];

fn block(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("body")
        .with_child(SceneNode::mesh("torso", cuboid(1.0, 1.5, 0.5), kit.paint(Finish::Chassis)))
        .with_child(SceneNode::mesh("panel", cuboid(0.8, 0.6, 0.06), kit.fixed(Finish::Panel)).at(0.0, 0.25, 0.27))
        .with_child(SceneNode::mesh("light", disc(0.06), kit.fixed(Finish::Glow)).at(0.0, 0.25, 0.305))
}

fn barrel(kit: &Kit<'_>) -> SceneNode {
    let hoop = |name: &str, y: f64| {
        SceneNode::mesh(name, ring(0.5, 0.03), kit.fixed(Finish::Trim))
            .at(0.0, y, 0.0)
            .rotated(FRAC_PI_2, 0.0, 0.0)
    };
    SceneNode::group("body")
        .with_child(SceneNode::mesh("torso", rod(0.5, 1.5), kit.paint(Finish::Chassis)))
        .with_child(SceneNode::mesh("panel", disc(0.3), kit.fixed(Finish::Panel)).at(0.0, 0.25, 0.505))
        .with_child(hoop("hoop_upper", 0.6))
        .with_child(hoop("hoop_lower", -0.6))
}

fn domed(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("body")
        .with_child(SceneNode::mesh("base", rod(0.55, 0.8), kit.paint(Finish::ChassisSatin)).at(0.0, -0.35, 0.0))
        .with_child(
            SceneNode::mesh("crown", dome(0.55), kit.paint(Finish::ChassisSatin))
                .at(0.0, 0.05, 0.0)
                .scaled(1.0, 1.27, 1.0),
        )
        .with_child(SceneNode::mesh("core", disc(0.2), kit.fixed(Finish::Glow)).at(0.0, 0.15, 0.55))
}

fn mint(kit: &Kit<'_>) -> SceneNode {
    let button = |name: &str, x: f64| {
        SceneNode::mesh(name, ball(0.04), kit.fixed(Finish::Trim)).at(x, -0.2, 0.26)
    };
    SceneNode::group("body")
        .with_child(SceneNode::mesh("torso", cuboid(1.0, 1.5, 0.5), kit.paint(Finish::ChassisSatin)))
        .with_child(SceneNode::mesh("panel", cuboid(0.6, 0.6, 0.06), kit.fixed(Finish::MintPanel)).at(0.0, 0.25, 0.27))
        .with_child(button("button_left", -0.12))
        .with_child(button("button_right", 0.12))
}

fn reactor(kit: &Kit<'_>) -> SceneNode {
    let mut body = SceneNode::group("body")
        .with_child(SceneNode::mesh("torso", cuboid(1.0, 1.5, 0.5), kit.paint(Finish::ChassisPolished)))
        .with_child(SceneNode::mesh("core", disc(0.24), kit.fixed(Finish::Glow)).at(0.0, 0.2, 0.255))
        .with_child(SceneNode::mesh("frame", ring(0.28, 0.04), kit.fixed(Finish::Trim)).at(0.0, 0.2, 0.27));
    for (i, y) in [-0.35, -0.45, -0.55].into_iter().enumerate() {
        body.push(SceneNode::mesh(format!("vent_{i}"), cuboid(0.6, 0.04, 0.02), kit.fixed(Finish::Trim)).at(0.0, y, 0.26));
    }
    body
}
