//! Accessory overlay: hats and face decorations placed per head style, and
//! clothing and props placed per body style.
//!
//! Each accessory kind has an anchor table with a style-0 default and sparse
//! per-style overrides. A style without its own entry uses the default, so
//! every kind resolves for every head and every body.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};
use std::fmt;

use botforge_ir::{SceneNode, Transform};
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::shape::{ball, cuboid, dome, half_ring, ring, rod, taper};
use crate::catalog::{Kit, Region};
use crate::palette::Finish;
use crate::skeleton::FACE_OFFSET;

/// Hat shapes. At most one hat is worn at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HatStyle {
    /// Leather cowboy hat.
    Cowboy,
    /// Frilly pink bonnet.
    Bonnet,
    /// Brass top hat.
    Topper,
    /// Single antenna with a beacon.
    Antenna,
}

impl HatStyle {
    /// Every hat, in cycling order.
    pub const ALL: [HatStyle; 4] = [HatStyle::Cowboy, HatStyle::Bonnet, HatStyle::Topper, HatStyle::Antenna];

    /// Upper-case label used in accessory descriptions.
    pub fn label(self) -> &'static str {
        match self {
            HatStyle::Cowboy => "HAT",
            HatStyle::Bonnet => "BONNET",
            HatStyle::Topper => "TOP HAT",
            HatStyle::Antenna => "ANTENNA",
        }
    }

    /// Next hat in the cycle `none -> cowboy -> bonnet -> topper -> antenna -> none`.
    pub fn cycle(current: Option<HatStyle>) -> Option<HatStyle> {
        match current {
            None => Some(HatStyle::Cowboy),
            Some(HatStyle::Cowboy) => Some(HatStyle::Bonnet),
            Some(HatStyle::Bonnet) => Some(HatStyle::Topper),
            Some(HatStyle::Topper) => Some(HatStyle::Antenna),
            Some(HatStyle::Antenna) => None,
        }
    }
}

/// Body-mounted accessories. Any combination can be worn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyAccessory {
    /// Red bowtie at the collar.
    Bowtie,
    /// Three-tier tutu around the waist.
    Tutu,
    /// Gold beer mug held in front of the chest.
    BeerMug,
}

impl BodyAccessory {
    /// Every body accessory, in render order.
    pub const ALL: [BodyAccessory; 3] = [BodyAccessory::Bowtie, BodyAccessory::Tutu, BodyAccessory::BeerMug];

    /// Upper-case label used in accessory descriptions.
    pub fn label(self) -> &'static str {
        match self {
            BodyAccessory::Bowtie => "BOWTIE",
            BodyAccessory::Tutu => "TUTU",
            BodyAccessory::BeerMug => "BEER",
        }
    }
}

/// The accessories a robot wears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorySet {
    /// The hat, if any. Older payloads store a plain `true` for the cowboy hat.
    #[serde(deserialize_with = "hat_or_flag")]
    pub hat: Option<HatStyle>,
    /// Mustache on or off.
    pub mustache: bool,
    /// Lipstick on or off.
    pub lipstick: bool,
    /// Bowtie on or off.
    pub bowtie: bool,
    /// Tutu on or off.
    pub tutu: bool,
    /// Beer mug on or off.
    pub beer: bool,
}

impl AccessorySet {
    /// No accessories.
    pub const NONE: AccessorySet = AccessorySet::new(None, false, false);

    /// The preset cycle: every combination of cowboy hat, mustache and lipstick.
    pub const PRESETS: [AccessorySet; 8] = [
        AccessorySet::NONE,
        AccessorySet::new(Some(HatStyle::Cowboy), false, false),
        AccessorySet::new(Some(HatStyle::Cowboy), true, false),
        AccessorySet::new(None, true, false),
        AccessorySet::new(None, false, true),
        AccessorySet::new(Some(HatStyle::Cowboy), false, true),
        AccessorySet::new(None, true, true),
        AccessorySet::new(Some(HatStyle::Cowboy), true, true),
    ];

    /// Head accessories from their parts, nothing on the body.
    pub const fn new(hat: Option<HatStyle>, mustache: bool, lipstick: bool) -> Self {
        Self {
            hat,
            mustache,
            lipstick,
            bowtie: false,
            tutu: false,
            beer: false,
        }
    }

    /// Whether `item` is worn.
    pub fn wears(&self, item: BodyAccessory) -> bool {
        match item {
            BodyAccessory::Bowtie => self.bowtie,
            BodyAccessory::Tutu => self.tutu,
            BodyAccessory::BeerMug => self.beer,
        }
    }

    /// Copy with `item` put on or taken off.
    pub fn with_body(mut self, item: BodyAccessory, on: bool) -> Self {
        match item {
            BodyAccessory::Bowtie => self.bowtie = on,
            BodyAccessory::Tutu => self.tutu = on,
            BodyAccessory::BeerMug => self.beer = on,
        }
        self
    }

    /// Whether nothing is worn.
    pub fn is_empty(&self) -> bool {
        self.head_part() == Self::NONE && !self.dresses_body()
    }

    /// Whether anything is worn on the body.
    pub fn dresses_body(&self) -> bool {
        BodyAccessory::ALL.into_iter().any(|item| self.wears(item))
    }

    fn head_part(&self) -> AccessorySet {
        AccessorySet::new(self.hat, self.mustache, self.lipstick)
    }

    /// Position of the head accessories in [`AccessorySet::PRESETS`], if
    /// they form one.
    pub fn preset_index(&self) -> Option<usize> {
        let head = self.head_part();
        Self::PRESETS.iter().position(|p| *p == head)
    }

    /// The head preset after this one, keeping body accessories. Head
    /// accessories outside the cycle go to preset 0.
    pub fn next_preset(&self) -> AccessorySet {
        let next = match self.preset_index() {
            Some(i) => Self::PRESETS[(i + 1) % Self::PRESETS.len()],
            None => Self::PRESETS[0],
        };
        AccessorySet {
            bowtie: self.bowtie,
            tutu: self.tutu,
            beer: self.beer,
            ..next
        }
    }

    /// Human-readable summary, e.g. `HAT + MUSTACHE` or `NO ACCESSORIES`.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "NO ACCESSORIES".to_string();
        }
        let mut active = Vec::with_capacity(6);
        if let Some(hat) = self.hat {
            active.push(hat.label());
        }
        if self.mustache {
            active.push("MUSTACHE");
        }
        if self.lipstick {
            active.push("LIPSTICK");
        }
        active.extend(BodyAccessory::ALL.into_iter().filter(|&i| self.wears(i)).map(BodyAccessory::label));
        active.join(" + ")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HatField {
    Flag(bool),
    Style(HatStyle),
}

fn hat_or_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<HatStyle>, D::Error> {
    Ok(match Option::<HatField>::deserialize(deserializer)? {
        None | Some(HatField::Flag(false)) => None,
        Some(HatField::Flag(true)) => Some(HatStyle::Cowboy),
        Some(HatField::Style(style)) => Some(style),
    })
}

impl fmt::Display for AccessorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Anything with an anchor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessoryKind {
    /// A hat of the given style.
    Hat(HatStyle),
    /// The mustache.
    Mustache,
    /// The lipstick.
    Lipstick,
    /// Something worn on the body.
    Body(BodyAccessory),
}

impl AccessoryKind {
    /// Every kind.
    pub const ALL: [AccessoryKind; 9] = [
        AccessoryKind::Hat(HatStyle::Cowboy),
        AccessoryKind::Hat(HatStyle::Bonnet),
        AccessoryKind::Hat(HatStyle::Topper),
        AccessoryKind::Hat(HatStyle::Antenna),
        AccessoryKind::Mustache,
        AccessoryKind::Lipstick,
        AccessoryKind::Body(BodyAccessory::Bowtie),
        AccessoryKind::Body(BodyAccessory::Tutu),
        AccessoryKind::Body(BodyAccessory::BeerMug),
    ];

    /// The region whose style picks this kind's anchor.
    pub fn region(self) -> Region {
        match self {
            AccessoryKind::Body(_) => Region::Body,
            _ => Region::Head,
        }
    }

    fn anchors(self) -> &'static AnchorTable {
        match self {
            AccessoryKind::Hat(HatStyle::Cowboy) => &COWBOY,
            AccessoryKind::Hat(HatStyle::Bonnet) => &BONNET,
            AccessoryKind::Hat(HatStyle::Topper) => &TOPPER,
            AccessoryKind::Hat(HatStyle::Antenna) => &ANTENNA,
            AccessoryKind::Mustache => &MUSTACHE,
            AccessoryKind::Lipstick => &LIPSTICK,
            AccessoryKind::Body(BodyAccessory::Bowtie) => &BOWTIE,
            AccessoryKind::Body(BodyAccessory::Tutu) => &TUTU,
            AccessoryKind::Body(BodyAccessory::BeerMug) => &BEER_MUG,
        }
    }
}

/// Part-relative anchors for one accessory kind.
struct AnchorTable {
    default: Transform,
    overrides: &'static [(usize, Transform)],
}

const fn at(x: f64, y: f64, z: f64) -> Transform {
    Transform::at(x, y, z)
}

static COWBOY: AnchorTable = AnchorTable {
    default: at(0.0, 0.6, 0.0),
    overrides: &[(1, at(0.0, 0.76, 0.0)), (2, at(0.0, 0.64, 0.0)), (3, at(0.0, 0.5, 0.0))],
};

static BONNET: AnchorTable = AnchorTable {
    default: at(0.0, 0.55, 0.0),
    overrides: &[(1, at(0.0, 0.7, 0.0)), (2, at(0.0, 0.58, 0.0))],
};

static TOPPER: AnchorTable = AnchorTable {
    default: at(0.0, 0.6, 0.0),
    overrides: &[(1, at(0.0, 0.78, 0.0)), (4, at(0.0, 0.55, 0.0))],
};

static ANTENNA: AnchorTable = AnchorTable {
    default: at(0.0, 0.6, 0.0),
    overrides: &[
        (1, at(0.0, 0.8, 0.0)),
        (2, at(0.0, 0.64, 0.0)),
        (3, at(0.0, 0.5, 0.0)),
        (4, at(0.12, 0.55, 0.0)),
    ],
};

static MUSTACHE: AnchorTable = AnchorTable {
    default: at(0.0, 0.24, 0.3),
    overrides: &[
        (1, at(0.0, 0.34, 0.39)),
        (2, at(0.0, 0.24, 0.3)),
        (3, at(0.0, 0.19, 0.25)),
        (4, at(0.0, 0.2, 0.275)),
    ],
};

static LIPSTICK: AnchorTable = AnchorTable {
    default: at(0.0, 0.16, 0.3),
    overrides: &[(1, at(0.0, 0.26, 0.38)), (2, at(0.0, 0.18, 0.3)), (3, at(0.0, 0.13, 0.25))],
};

// Body anchors are relative to the torso center; the collar sits 0.75 up.
static BOWTIE: AnchorTable = AnchorTable {
    default: at(0.0, 0.62, 0.3),
    overrides: &[(1, at(0.0, 0.62, 0.52)), (2, at(0.0, 0.6, 0.38))],
};

static TUTU: AnchorTable = AnchorTable {
    default: at(0.0, -0.7, 0.0),
    overrides: &[(2, at(0.0, -0.68, 0.0))],
};

static BEER_MUG: AnchorTable = AnchorTable {
    default: at(0.32, -0.05, 0.45),
    overrides: &[(1, at(0.32, -0.05, 0.6)), (2, at(0.32, -0.1, 0.6))],
};

impl AnchorTable {
    fn explicit(&self, style: usize) -> Option<Transform> {
        if style == 0 {
            return Some(self.default);
        }
        self.overrides
            .iter()
            .find(|(s, _)| *s == style)
            .map(|(_, t)| *t)
    }
}

/// Whether `kind` has its own anchor for `style` of its region (style 0
/// always does).
pub fn has_explicit_anchor(kind: AccessoryKind, style: usize) -> bool {
    kind.anchors().explicit(style).is_some()
}

/// Anchor for `kind` on `style` of [`AccessoryKind::region`], falling back
/// to style 0.
pub fn resolve_anchor(kind: AccessoryKind, style: usize) -> Transform {
    let table = kind.anchors();
    table.explicit(style).unwrap_or(table.default)
}

/// Accessory subtrees for a head of style `head_style`.
///
/// The hat (if any) comes first. Face accessories share one `face` group
/// pushed forward by [`FACE_OFFSET`].
pub fn render(head_style: usize, set: &AccessorySet, kit: &Kit<'_>) -> Vec<SceneNode> {
    let mut out = Vec::with_capacity(2);

    if let Some(hat) = set.hat {
        let kind = AccessoryKind::Hat(hat);
        if !has_explicit_anchor(kind, head_style) {
            tracing::debug!(?hat, head_style, "no hat anchor for head style, using default");
        }
        out.push(build_hat(hat, kit).with_transform(resolve_anchor(kind, head_style)));
    }

    if set.mustache || set.lipstick {
        let mut face = SceneNode::group("face").at(0.0, 0.0, FACE_OFFSET);
        if set.mustache {
            face.push(mustache(kit).with_transform(resolve_anchor(AccessoryKind::Mustache, head_style)));
        }
        if set.lipstick {
            face.push(lipstick(kit).with_transform(resolve_anchor(AccessoryKind::Lipstick, head_style)));
        }
        out.push(face);
    }

    out
}

/// Accessory subtrees for a body of style `body_style`, in
/// [`BodyAccessory::ALL`] order. Head accessories in `set` are ignored.
pub fn render_body(body_style: usize, set: &AccessorySet, kit: &Kit<'_>) -> Vec<SceneNode> {
    BodyAccessory::ALL
        .into_iter()
        .filter(|&item| set.wears(item))
        .map(|item| {
            let kind = AccessoryKind::Body(item);
            if !has_explicit_anchor(kind, body_style) {
                tracing::debug!(?item, body_style, "no anchor for body style, using default");
            }
            build_body_accessory(item, kit).with_transform(resolve_anchor(kind, body_style))
        })
        .collect()
}

fn build_hat(hat: HatStyle, kit: &Kit<'_>) -> SceneNode {
    let node = match hat {
        HatStyle::Cowboy => cowboy(kit),
        HatStyle::Bonnet => bonnet(kit),
        HatStyle::Topper => topper(kit),
        HatStyle::Antenna => antenna(kit),
    };
    node.tagged("hat", None)
}

fn cowboy(kit: &Kit<'_>) -> SceneNode {
    let dent = |name: &str, x: f64, tilt: f64| {
        SceneNode::mesh(name, ball(0.1), kit.fixed(Finish::Leather))
            .at(x, 0.25, 0.0)
            .rotated(0.0, 0.0, tilt)
    };
    SceneNode::group("cowboy_hat")
        .with_child(SceneNode::mesh("crown", taper(0.3, 0.35, 0.3), kit.fixed(Finish::Leather)).at(0.0, 0.15, 0.0))
        .with_child(SceneNode::mesh("brim", rod(0.6, 0.05), kit.fixed(Finish::Leather)))
        .with_child(
            SceneNode::mesh("band", ring(0.33, 0.03), kit.fixed(Finish::HatBand))
                .at(0.0, 0.1, 0.0)
                .rotated(FRAC_PI_2, 0.0, 0.0),
        )
        .with_child(dent("dent_left", -0.2, FRAC_PI_6))
        .with_child(dent("dent_right", 0.2, -FRAC_PI_6))
}

fn bonnet(kit: &Kit<'_>) -> SceneNode {
    let mut bow = SceneNode::group("bow").at(0.25, 0.1, 0.3).rotated(FRAC_PI_3, 0.0, 0.0);
    for (name, tilt) in [("loop_left", FRAC_PI_4), ("loop_right", -FRAC_PI_4)] {
        bow.push(SceneNode::mesh(name, cuboid(0.2, 0.05, 0.02), kit.fixed(Finish::Ribbon)).rotated(0.0, 0.0, tilt));
    }

    let mut hat = SceneNode::group("bonnet")
        .with_child(SceneNode::mesh("cap", dome(0.4), kit.fixed(Finish::Bonnet)).rotated(FRAC_PI_6, 0.0, 0.0))
        .with_child(
            SceneNode::mesh("brim", half_ring(0.4, 0.05), kit.fixed(Finish::Bonnet))
                .at(0.0, 0.0, 0.2)
                .rotated(FRAC_PI_3, 0.0, 0.0),
        )
        .with_child(
            SceneNode::mesh("ribbon", cuboid(0.6, 0.08, 0.02), kit.fixed(Finish::Ribbon))
                .at(0.0, 0.1, 0.3)
                .rotated(FRAC_PI_3, 0.0, 0.0),
        )
        .with_child(bow);

    for i in 0..8 {
        let angle = f64::from(i) * FRAC_PI_4;
        hat.push(
            SceneNode::mesh(format!("ruffle_{i}"), cuboid(0.1, 0.05, 0.02), kit.fixed(Finish::Bonnet))
                .at(angle.cos() * 0.35, -0.1, angle.sin() * 0.35)
                .rotated(0.0, angle, 0.0),
        );
    }
    hat
}

fn topper(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("top_hat")
        .with_child(SceneNode::mesh("brim", rod(0.4, 0.04), kit.fixed(Finish::Brass)))
        .with_child(SceneNode::mesh("crown", rod(0.25, 0.4), kit.fixed(Finish::Brass)).at(0.0, 0.22, 0.0))
        .with_child(SceneNode::mesh("band", rod(0.255, 0.06), kit.fixed(Finish::Copper)).at(0.0, 0.08, 0.0))
}

fn antenna(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("antenna")
        .with_child(SceneNode::mesh("stalk", rod(0.02, 0.3), kit.paint(Finish::Chassis)).at(0.0, 0.15, 0.0))
        .with_child(SceneNode::mesh("beacon", ball(0.05), kit.fixed(Finish::Beacon)).at(0.0, 0.33, 0.0))
}

fn mustache(kit: &Kit<'_>) -> SceneNode {
    let tip = |name: &str, x: f64| SceneNode::mesh(name, ball(0.03), kit.fixed(Finish::Whisker)).at(x, 0.0, 0.0);
    SceneNode::group("mustache")
        .tagged("mustache", None)
        .with_child(SceneNode::mesh("whiskers", half_ring(0.15, 0.03), kit.fixed(Finish::Whisker)))
        .with_child(tip("tip_left", -0.15))
        .with_child(tip("tip_right", 0.15))
}

fn lipstick(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("lipstick")
        .tagged("lipstick", None)
        .with_child(SceneNode::mesh("lips", half_ring(0.1, 0.02), kit.fixed(Finish::Lipstick)))
}

fn build_body_accessory(item: BodyAccessory, kit: &Kit<'_>) -> SceneNode {
    match item {
        BodyAccessory::Bowtie => bowtie(kit).tagged("bowtie", None),
        BodyAccessory::Tutu => tutu(kit).tagged("tutu", None),
        BodyAccessory::BeerMug => beer_mug(kit).tagged("beer", None),
    }
}

fn bowtie(kit: &Kit<'_>) -> SceneNode {
    let wing = |name: &str, tilt: f64| {
        SceneNode::mesh(name, cuboid(0.15, 0.1, 0.05), kit.fixed(Finish::Bowtie)).rotated(0.0, 0.0, tilt)
    };
    SceneNode::group("bowtie")
        .with_child(wing("wing_left", FRAC_PI_4))
        .with_child(wing("wing_right", -FRAC_PI_4))
        .with_child(SceneNode::mesh("knot", cuboid(0.05, 0.05, 0.05), kit.fixed(Finish::Bowtie)))
}

fn tutu(kit: &Kit<'_>) -> SceneNode {
    let mut skirt = SceneNode::group("tutu");
    for (i, (top, bottom, y)) in [(0.6, 0.8, 0.0), (0.5, 0.7, -0.1), (0.4, 0.6, -0.2)].into_iter().enumerate() {
        skirt.push(SceneNode::mesh(format!("tier_{i}"), taper(top, bottom, 0.2), kit.fixed(Finish::Tulle)).at(0.0, y, 0.0));
    }
    skirt
}

fn beer_mug(kit: &Kit<'_>) -> SceneNode {
    SceneNode::group("beer_mug")
        .with_child(SceneNode::mesh("mug", rod(0.08, 0.25), kit.fixed(Finish::Mug)))
        .with_child(SceneNode::mesh("rim", rod(0.1, 0.05), kit.fixed(Finish::Mug)).at(0.0, 0.15, 0.0))
        .with_child(SceneNode::mesh("base", rod(0.12, 0.05), kit.fixed(Finish::Mug)).at(0.0, -0.15, 0.0))
}
