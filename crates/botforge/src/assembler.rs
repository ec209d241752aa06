//! Skeleton assembler: composes the regions into one robot.

use botforge_ir::{Axis, Document, SceneNode, Transform};

use crate::catalog::{neck, Catalog, Kit, Region};
use crate::config::Configuration;
use crate::idle::{self, IdleAnimationState};
use crate::palette::Palette;
use crate::skeleton;

/// Builds scene trees from configurations.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    catalog: Catalog,
    palette: Palette,
}

impl Assembler {
    /// Assembler over `catalog`, painting with `palette`.
    pub fn new(catalog: Catalog, palette: Palette) -> Self {
        Self { catalog, palette }
    }

    /// The variant catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The static robot for `config`.
    ///
    /// Children of the `robot` root, in order: `head`, `neck`, `body`,
    /// `arm_left`, `arm_right`, `leg_left`, `leg_right`. Right-hand limbs are
    /// reflections of the left across the X axis. Head accessories ride on
    /// the head and body accessories on the body.
    pub fn assemble(&self, config: &Configuration) -> SceneNode {
        let color = config.color();
        let accessories = config.accessories();
        let part = |region: Region, anchor: Transform| {
            let set = matches!(region, Region::Head | Region::Body).then_some(&accessories);
            self.catalog
                .build(&self.palette, region, config.style(region) as i64, color, set)
                .with_transform(anchor)
        };

        let head = part(Region::Head, skeleton::HEAD);
        let neck = neck::build(&Kit::new(&self.palette, color)).with_transform(skeleton::NECK);
        let body = part(Region::Body, skeleton::BODY);
        let (arm_left, arm_right) = pair(part(Region::Arms, skeleton::SHOULDER_LEFT), "arm");
        let (leg_left, leg_right) = pair(part(Region::Legs, skeleton::HIP_LEFT), "leg");

        let root = SceneNode::group("robot")
            .with_transform(skeleton::ROOT)
            .with_children([head, neck, body, arm_left, arm_right, leg_left, leg_right]);
        tracing::debug!(%config, meshes = root.mesh_count(), "assembled robot");
        root
    }

    /// [`assemble`](Self::assemble) with the head showing `state`.
    pub fn assemble_animated(&self, config: &Configuration, state: &IdleAnimationState) -> SceneNode {
        let mut root = self.assemble(config);
        if let Some(head) = root.children.first_mut() {
            idle::apply(state, head);
        }
        root
    }

    /// The static robot wrapped in an exportable document.
    pub fn document(&self, config: &Configuration) -> Document {
        Document::new(self.assemble(config))
    }
}

fn pair(left: SceneNode, role: &str) -> (SceneNode, SceneNode) {
    let mut right = left.mirrored(Axis::X);
    right.name = format!("{role}_right");
    let mut left = left;
    left.name = format!("{role}_left");
    (left, right)
}
