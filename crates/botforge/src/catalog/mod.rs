//! Part variant catalog.
//!
//! One ordered list of [`PartVariant`]s per [`Region`], plus the single neck
//! connector. Every lookup goes through [`normalize_index`], so any integer
//! style resolves to a variant.

mod arms;
mod body;
mod face;
mod head;
mod legs;
pub mod neck;
pub mod shape;

use std::fmt;
use std::time::Duration;

use botforge_ir::{MaterialDef, SceneNode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accessories::{self, AccessorySet};
use crate::color::Rgb;
use crate::palette::{Finish, Palette};

/// An independently styleable body segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// The head, which also carries the face and accessories.
    Head,
    /// The torso.
    Body,
    /// The arm pair.
    Arms,
    /// The leg pair.
    Legs,
}

impl Region {
    /// All regions in assembly order.
    pub const ALL: [Region; 4] = [Region::Head, Region::Body, Region::Arms, Region::Legs];

    /// Lowercase region name.
    pub fn name(self) -> &'static str {
        match self {
            Region::Head => "head",
            Region::Body => "body",
            Region::Arms => "arms",
            Region::Legs => "legs",
        }
    }

    /// Role recorded on the [`botforge_ir::PartTag`] of a built subtree.
    pub fn role(self) -> &'static str {
        match self {
            Region::Head => "head",
            Region::Body => "body",
            Region::Arms => "arm",
            Region::Legs => "leg",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised when building a custom catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A region was given no variants.
    #[error("catalog region {0} has no variants")]
    EmptyRegion(Region),
}

/// Materials available to a variant builder.
///
/// `paint` recolors a finish with the robot's color; `fixed` keeps the
/// finish's own color.
#[derive(Debug, Clone, Copy)]
pub struct Kit<'a> {
    palette: &'a Palette,
    color: Rgb,
}

impl<'a> Kit<'a> {
    /// Kit painting with `color` from `palette`.
    pub fn new(palette: &'a Palette, color: Rgb) -> Self {
        Self { palette, color }
    }

    /// The robot color.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// `finish` recolored with the robot color.
    pub fn paint(&self, finish: Finish) -> MaterialDef {
        self.palette.resolve(finish, Some(self.color))
    }

    /// `finish` in its own color.
    pub fn fixed(&self, finish: Finish) -> MaterialDef {
        self.palette.resolve(finish, None)
    }
}

/// An immutable variant template.
pub struct PartVariant {
    /// Display name, e.g. "Orb".
    pub name: &'static str,
    /// Builds the variant's subtree, origin at its skeleton anchor.
    pub build: fn(&Kit<'_>) -> SceneNode,
    /// Blink period for heads that blink.
    pub blink_period: Option<Duration>,
}

impl fmt::Debug for PartVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartVariant")
            .field("name", &self.name)
            .field("blink_period", &self.blink_period)
            .finish_non_exhaustive()
    }
}

/// Normalize a raw style index into `0..count`.
///
/// `((raw - origin) mod count + count) mod count`: any integer wraps,
/// whatever its sign or magnitude. A zero `count` yields 0.
pub fn normalize_index(raw: i64, origin: i64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let shifted = i128::from(raw) - i128::from(origin);
    // count fits in i128 and the remainder is below count, so both casts are lossless
    shifted.rem_euclid(count as i128) as usize
}

/// The variant registry: one ordered list per region.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    heads: &'static [PartVariant],
    bodies: &'static [PartVariant],
    arms: &'static [PartVariant],
    legs: &'static [PartVariant],
}

impl Catalog {
    /// Catalog from explicit variant lists. Every region needs at least one.
    pub fn new(
        heads: &'static [PartVariant],
        bodies: &'static [PartVariant],
        arms: &'static [PartVariant],
        legs: &'static [PartVariant],
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            heads,
            bodies,
            arms,
            legs,
        };
        for region in Region::ALL {
            if catalog.variants(region).is_empty() {
                return Err(CatalogError::EmptyRegion(region));
            }
        }
        Ok(catalog)
    }

    /// The built-in five-per-region catalog.
    pub fn standard() -> Self {
        Self {
            heads: &head::VARIANTS,
            bodies: &body::VARIANTS,
            arms: &arms::VARIANTS,
            legs: &legs::VARIANTS,
        }
    }

    /// Variant list for `region`.
    pub fn variants(&self, region: Region) -> &'static [PartVariant] {
        match region {
            Region::Head => self.heads,
            Region::Body => self.bodies,
            Region::Arms => self.arms,
            Region::Legs => self.legs,
        }
    }

    /// Number of variants for `region`.
    pub fn count(&self, region: Region) -> usize {
        self.variants(region).len()
    }

    /// Wrapped 0-based index for a raw style.
    pub fn effective_index(&self, region: Region, raw: i64) -> usize {
        normalize_index(raw, 0, self.count(region))
    }

    /// Variant for a raw style, after wrapping.
    pub fn variant(&self, region: Region, raw: i64) -> &'static PartVariant {
        &self.variants(region)[self.effective_index(region, raw)]
    }

    /// Display name of the variant a raw style selects.
    pub fn style_name(&self, region: Region, raw: i64) -> &'static str {
        self.variant(region, raw).name
    }

    /// Build the subtree for `region` at `style`.
    ///
    /// The returned node is named and tagged with the region's role and the
    /// effective style. For the head and the body, accessories worn on that
    /// part add an `accessories` child.
    pub fn build(
        &self,
        palette: &Palette,
        region: Region,
        style: i64,
        color: Rgb,
        accessories: Option<&AccessorySet>,
    ) -> SceneNode {
        let index = self.effective_index(region, style);
        let kit = Kit::new(palette, color);
        let mut node = (self.variants(region)[index].build)(&kit).tagged(region.role(), Some(index));
        node.name = region.role().to_string();

        if let Some(set) = accessories {
            let worn = match region {
                Region::Head => accessories::render(index, set, &kit),
                Region::Body => accessories::render_body(index, set, &kit),
                Region::Arms | Region::Legs => Vec::new(),
            };
            if !worn.is_empty() {
                node.push(SceneNode::group("accessories").with_children(worn));
            }
        }

        tracing::debug!(%region, style, index, meshes = node.mesh_count(), "built part");
        node
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessories::{BodyAccessory, HatStyle};
    use proptest::prelude::*;

    fn well_formed(node: &SceneNode) -> bool {
        node.walk().all(|n| {
            n.transform.is_finite() && n.mesh.as_ref().map_or(true, |m| m.primitive.is_well_formed())
        })
    }

    #[test]
    fn standard_catalog_has_five_per_region() {
        let catalog = Catalog::standard();
        for region in Region::ALL {
            assert_eq!(catalog.count(region), 5, "{region}");
        }
    }

    #[test]
    fn every_variant_is_well_formed() {
        let catalog = Catalog::standard();
        let palette = Palette::standard();
        for region in Region::ALL {
            for style in 0..catalog.count(region) as i64 {
                let node = catalog.build(palette, region, style, Rgb::SKY, None);
                assert!(node.mesh_count() > 0, "{region} {style} is empty");
                assert!(well_formed(&node), "{region} {style} is malformed");
            }
        }
    }

    #[test]
    fn variant_names_are_unique_within_a_region() {
        let catalog = Catalog::standard();
        for region in Region::ALL {
            let mut names: Vec<_> = catalog.variants(region).iter().map(|v| v.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), catalog.count(region));
        }
    }

    #[test]
    fn heads_expose_face_nodes_and_blink() {
        let catalog = Catalog::standard();
        let palette = Palette::standard();
        for (i, variant) in catalog.variants(Region::Head).iter().enumerate() {
            let head = catalog.build(palette, Region::Head, i as i64, Rgb::SKY, None);
            for name in ["eye_left", "eye_right", "mouth"] {
                assert!(head.find(name).is_some(), "{} lacks {name}", variant.name);
            }
            let period = variant.blink_period.expect("heads blink");
            assert!(period >= Duration::from_millis(1500) && period <= Duration::from_secs(3));
        }
    }

    #[test]
    fn head_gets_accessories_only_when_set_is_non_empty() {
        let catalog = Catalog::standard();
        let palette = Palette::standard();
        let empty = AccessorySet::default();
        let bare = catalog.build(palette, Region::Head, 0, Rgb::SKY, Some(&empty));
        assert!(bare.child("accessories").is_none());

        let set = AccessorySet {
            hat: Some(HatStyle::Cowboy),
            ..AccessorySet::default()
        };
        let hatted = catalog.build(palette, Region::Head, 0, Rgb::SKY, Some(&set));
        assert!(hatted.child("accessories").is_some());

        // head accessories never leak onto other regions
        for region in [Region::Body, Region::Arms, Region::Legs] {
            let part = catalog.build(palette, region, 0, Rgb::SKY, Some(&set));
            assert!(part.find("accessories").is_none(), "{region}");
        }
    }

    #[test]
    fn body_gets_only_body_accessories() {
        let catalog = Catalog::standard();
        let palette = Palette::standard();
        let set = AccessorySet::new(Some(HatStyle::Cowboy), true, true).with_body(BodyAccessory::Tutu, true);
        let body = catalog.build(palette, Region::Body, 2, Rgb::SKY, Some(&set));
        let worn = body.child("accessories").unwrap();
        let names: Vec<_> = worn.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["tutu"]);

        let head = catalog.build(palette, Region::Head, 2, Rgb::SKY, Some(&set));
        assert!(head.find("tutu").is_none());
        let arms = catalog.build(palette, Region::Arms, 0, Rgb::SKY, Some(&set));
        assert!(arms.find("accessories").is_none());
    }

    #[test]
    fn recolor_reaches_painted_finishes_only() {
        let catalog = Catalog::standard();
        let red = Rgb::new(255, 0, 0);
        let body = catalog.build(Palette::standard(), Region::Body, 0, red, None);
        let mut painted = 0;
        for node in body.walk() {
            if let Some(mesh) = &node.mesh {
                if mesh.material.name.starts_with("chassis") {
                    assert_eq!(mesh.material.color, red.to_unit());
                    painted += 1;
                }
                if mesh.material.name == "panel" {
                    assert_ne!(mesh.material.color, red.to_unit());
                }
            }
        }
        assert!(painted > 0);
    }

    #[test]
    fn empty_region_is_rejected() {
        let err = Catalog::new(&head::VARIANTS, &[], &arms::VARIANTS, &legs::VARIANTS).unwrap_err();
        assert_eq!(err, CatalogError::EmptyRegion(Region::Body));
    }

    #[test]
    fn wraps_from_last_style_to_first() {
        let catalog = Catalog::standard();
        let last = catalog.count(Region::Head) as i64 - 1;
        assert_eq!(catalog.effective_index(Region::Head, last + 1), 0);
        assert_eq!(catalog.effective_index(Region::Head, -1), last as usize);
    }

    #[test]
    fn normalize_honors_origin() {
        assert_eq!(normalize_index(1, 1, 5), 0);
        assert_eq!(normalize_index(5, 1, 5), 4);
        assert_eq!(normalize_index(6, 1, 5), 0);
        assert_eq!(normalize_index(0, 1, 5), 4);
        assert_eq!(normalize_index(i64::MIN, 0, 5), normalize_index(i64::MIN % 5, 0, 5));
        assert_eq!(normalize_index(7, 0, 0), 0);
    }

    proptest! {
        #[test]
        fn lookup_is_total_and_periodic(raw in any::<i64>(), k in -1000i64..1000, region_idx in 0usize..4) {
            let catalog = Catalog::standard();
            let region = Region::ALL[region_idx];
            let count = catalog.count(region) as i64;
            let index = catalog.effective_index(region, raw);
            prop_assert!(index < catalog.count(region));
            if let Some(shifted) = raw.checked_add(k * count) {
                prop_assert_eq!(catalog.effective_index(region, shifted), index);
            }
        }

        #[test]
        fn build_is_tagged_with_effective_style(raw in -10_000i64..10_000, region_idx in 0usize..4) {
            let catalog = Catalog::standard();
            let region = Region::ALL[region_idx];
            let node = catalog.build(Palette::standard(), region, raw, Rgb::SKY, None);
            let tag = node.tag.clone().expect("tagged");
            prop_assert_eq!(tag.role, region.role());
            prop_assert_eq!(tag.style, Some(catalog.effective_index(region, raw)));
        }
    }
}
