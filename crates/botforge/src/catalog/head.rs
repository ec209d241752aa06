//! Head variants. Origin is the top of the neck; each shell rests on it.

use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

use botforge_ir::SceneNode;

use super::face::{eyes, lenses, mouth};
use super::shape::{ball, cuboid, plane, ring, rod};
use super::{Kit, PartVariant};
use crate::palette::Finish;

pub static VARIANTS: [PartVariant; 5] = [
    PartVariant {
        name: "Cube",
        build: cube,
        blink_period: Some(Duration::from_millis(2000)),
    },
    PartVariant {
        name: "Orb",
        build: orb,
        blink_period: Some(Duration::from_millis(2500)),
    },
    PartVariant {
        name: "Canister",
        build: canister,
        blink_period: Some(Duration::from_millis(3000)),
    },
    PartVariant {
        name: "Compact",
        build: compact,
        blink_period: Some(Duration::from_millis(1500)),
    },
    PartVariant {
        name: "Sentinel",
        build: sentinel,
        blink_period: Some(Duration::from_millis(2200)),
    },
];

fn cube(kit: &Kit<'_>) -> SceneNode {
    let bolt = |name: &str, x: f64| {
        SceneNode::mesh(name, rod(0.06, 0.06), kit.fixed(Finish::Trim))
            .at(x, 0.3, 0.0)
            .rotated(0.0, 0.0, FRAC_PI_2)
    };
    SceneNode::group("head")
        .with_child(SceneNode::mesh("shell", cuboid(0.6, 0.6, 0.6), kit.paint(Finish::Chassis)).at(0.0, 0.3, 0.0))
        .with_children(eyes(kit, 0.13, 0.36, 0.3, 0.07))
        .with_child(mouth(kit, 0.16, 0.305, 0.2))
        .with_child(bolt("bolt_left", -0.32))
        .with_child(bolt("bolt_right", 0.32))
}

fn orb(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("head")
        .with_child(SceneNode::mesh("shell", ball(0.4), kit.paint(Finish::Chassis)).at(0.0, 0.4, 0.0))
        .with_child(
            SceneNode::mesh("equator", ring(0.4, 0.025), kit.fixed(Finish::Trim))
                .at(0.0, 0.4, 0.0)
                .rotated(FRAC_PI_2, 0.0, 0.0),
        )
        .with_children(eyes(kit, 0.14, 0.48, 0.366, 0.065))
        .with_child(mouth(kit, 0.26, 0.375, 0.18))
}

fn canister(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("head")
        .with_child(SceneNode::mesh("shell", rod(0.3, 0.6), kit.paint(Finish::Chassis)).at(0.0, 0.3, 0.0))
        .with_child(SceneNode::mesh("cap", rod(0.31, 0.04), kit.fixed(Finish::Trim)).at(0.0, 0.62, 0.0))
        .with_children(eyes(kit, 0.11, 0.38, 0.279, 0.06))
        .with_child(mouth(kit, 0.18, 0.3, 0.16))
}

fn compact(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("head")
        .with_child(
            SceneNode::mesh("shell", cuboid(0.5, 0.5, 0.5), kit.paint(Finish::ChassisSatin)).at(0.0, 0.25, 0.0),
        )
        .with_children(eyes(kit, 0.11, 0.3, 0.25, 0.06))
        .with_child(mouth(kit, 0.13, 0.255, 0.16))
}

fn sentinel(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("head")
        .with_child(
            SceneNode::mesh("shell", cuboid(0.55, 0.55, 0.55), kit.paint(Finish::ChassisPolished))
                .at(0.0, 0.275, 0.0),
        )
        .with_child(SceneNode::mesh("visor", plane(0.46, 0.16), kit.fixed(Finish::Panel)).at(0.0, 0.335, 0.28))
        .with_children(lenses(kit, 0.11, 0.335, 0.285, 0.05))
        .with_child(mouth(kit, 0.145, 0.285, 0.18))
        .with_child(SceneNode::mesh("crest", cuboid(0.04, 0.12, 0.3), kit.fixed(Finish::Trim)).at(0.0, 0.61, 0.0))
}
