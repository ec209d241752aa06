//! Material palette: a closed set of named finishes.
//!
//! Every shape in the catalog is painted with a [`Finish`]. Resolving a finish
//! yields a [`MaterialDef`]; the caller may substitute the user's color for
//! the base color, in which case every other physical parameter is kept.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use botforge_ir::MaterialDef;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Named finishes available to part builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    /// Glossy painted metal; the default body finish.
    Chassis,
    /// Slightly rougher paint used by the satin part family.
    ChassisSatin,
    /// Mirror-bright paint used by the polished part family.
    ChassisPolished,
    /// Painted connector (neck, shoulder caps).
    Joint,
    /// Dark graphite bands and rings.
    Trim,
    /// Dark chest panel.
    Panel,
    /// Mint chest panel.
    MintPanel,
    /// Emissive cyan for lights and cores.
    Glow,
    /// Eye whites.
    EyeWhite,
    /// Pupils.
    Pupil,
    /// Mouth slot.
    Mouth,
    /// Hat leather.
    Leather,
    /// Dark leather hat band.
    HatBand,
    /// Soft pink bonnet fabric.
    Bonnet,
    /// Hot pink ribbon.
    Ribbon,
    /// Mustache hair.
    Whisker,
    /// Lipstick.
    Lipstick,
    /// Brushed brass.
    Brass,
    /// Brushed copper.
    Copper,
    /// Red emissive beacon.
    Beacon,
    /// Red satin bowtie.
    Bowtie,
    /// Pink tutu netting.
    Tulle,
    /// Gold beer mug.
    Mug,
    /// Loud magenta used when a lookup goes wrong.
    Fallback,
}

impl Finish {
    /// Every finish, in declaration order.
    pub const ALL: [Finish; 24] = [
        Finish::Chassis,
        Finish::ChassisSatin,
        Finish::ChassisPolished,
        Finish::Joint,
        Finish::Trim,
        Finish::Panel,
        Finish::MintPanel,
        Finish::Glow,
        Finish::EyeWhite,
        Finish::Pupil,
        Finish::Mouth,
        Finish::Leather,
        Finish::HatBand,
        Finish::Bonnet,
        Finish::Ribbon,
        Finish::Whisker,
        Finish::Lipstick,
        Finish::Brass,
        Finish::Copper,
        Finish::Beacon,
        Finish::Bowtie,
        Finish::Tulle,
        Finish::Mug,
        Finish::Fallback,
    ];

    /// Stable snake_case name (also the key in settings files).
    pub fn name(self) -> &'static str {
        spec(self).name
    }

    /// Finish with the given snake_case name.
    pub fn from_name(name: &str) -> Option<Finish> {
        Finish::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Static description of a finish.
struct FinishSpec {
    name: &'static str,
    color: Rgb,
    metallic: f64,
    roughness: f64,
    clearcoat: f64,
    clearcoat_roughness: f64,
    emissive: Option<(Rgb, f64)>,
    double_sided: bool,
}

const fn paint(name: &'static str, color: Rgb, metallic: f64, roughness: f64) -> FinishSpec {
    FinishSpec {
        name,
        color,
        metallic,
        roughness,
        clearcoat: 1.0,
        clearcoat_roughness: 0.1,
        emissive: None,
        double_sided: false,
    }
}

const fn matte(name: &'static str, color: Rgb, metallic: f64, roughness: f64) -> FinishSpec {
    FinishSpec {
        clearcoat: 0.0,
        clearcoat_roughness: 0.0,
        ..paint(name, color, metallic, roughness)
    }
}

const fn glowing(name: &'static str, color: Rgb, intensity: f64) -> FinishSpec {
    FinishSpec {
        emissive: Some((color, intensity)),
        ..paint(name, color, 0.3, 0.4)
    }
}

static CHASSIS: FinishSpec = paint("chassis", Rgb::SKY, 0.7, 0.1);
static CHASSIS_SATIN: FinishSpec = paint("chassis_satin", Rgb::SKY, 0.6, 0.15);
static CHASSIS_POLISHED: FinishSpec = paint("chassis_polished", Rgb::SKY, 0.8, 0.1);
static JOINT: FinishSpec = FinishSpec {
    clearcoat: 0.7,
    clearcoat_roughness: 0.2,
    ..paint("joint", Rgb::SKY, 0.6, 0.2)
};
static TRIM: FinishSpec = paint("trim", Rgb::from_u24(0x3a3e45), 0.8, 0.3);
static PANEL: FinishSpec = FinishSpec {
    clearcoat: 0.8,
    ..paint("panel", Rgb::from_u24(0x1a1b35), 0.8, 0.15)
};
static MINT_PANEL: FinishSpec = paint("mint_panel", Rgb::from_u24(0x7fe6d4), 0.6, 0.15);
static GLOW: FinishSpec = FinishSpec {
    metallic: 0.9,
    roughness: 0.1,
    clearcoat_roughness: 0.05,
    ..glowing("glow", Rgb::from_u24(0x40f7ff), 0.5)
};
static EYE_WHITE: FinishSpec = paint("eye_white", Rgb::from_u24(0xf4f6fa), 0.0, 0.2);
static PUPIL: FinishSpec = paint("pupil", Rgb::from_u24(0x14141f), 0.0, 0.3);
static MOUTH: FinishSpec = matte("mouth", Rgb::from_u24(0x101018), 0.2, 0.6);
static LEATHER: FinishSpec = paint("leather", Rgb::from_u24(0x8b4513), 0.5, 0.3);
static HAT_BAND: FinishSpec = paint("hat_band", Rgb::from_u24(0x4a2803), 0.6, 0.2);
static BONNET: FinishSpec = FinishSpec {
    double_sided: true,
    ..matte("bonnet", Rgb::from_u24(0xffb6c1), 0.0, 0.8)
};
static RIBBON: FinishSpec = matte("ribbon", Rgb::from_u24(0xff69b4), 0.0, 0.7);
static WHISKER: FinishSpec = matte("whisker", Rgb::from_u24(0x222222), 0.3, 0.7);
static LIPSTICK: FinishSpec = paint("lipstick", Rgb::from_u24(0xff1493), 0.3, 0.25);
static BRASS: FinishSpec = matte("brass", Rgb::from_u24(0xb5a642), 1.0, 0.3);
static COPPER: FinishSpec = matte("copper", Rgb::from_u24(0xb87333), 1.0, 0.4);
static BEACON: FinishSpec = glowing("beacon", Rgb::from_u24(0xff0000), 0.5);
static BOWTIE: FinishSpec = matte("bowtie", Rgb::from_u24(0xff0000), 0.3, 0.7);
static TULLE: FinishSpec = FinishSpec {
    double_sided: true,
    ..matte("tulle", Rgb::from_u24(0xff69b4), 0.2, 0.8)
};
static MUG: FinishSpec = matte("mug", Rgb::from_u24(0xffd700), 0.3, 0.7);
static FALLBACK: FinishSpec = FinishSpec {
    double_sided: true,
    ..glowing("fallback", Rgb::from_u24(0xff00ff), 1.0)
};

fn spec(finish: Finish) -> &'static FinishSpec {
    match finish {
        Finish::Chassis => &CHASSIS,
        Finish::ChassisSatin => &CHASSIS_SATIN,
        Finish::ChassisPolished => &CHASSIS_POLISHED,
        Finish::Joint => &JOINT,
        Finish::Trim => &TRIM,
        Finish::Panel => &PANEL,
        Finish::MintPanel => &MINT_PANEL,
        Finish::Glow => &GLOW,
        Finish::EyeWhite => &EYE_WHITE,
        Finish::Pupil => &PUPIL,
        Finish::Mouth => &MOUTH,
        Finish::Leather => &LEATHER,
        Finish::HatBand => &HAT_BAND,
        Finish::Bonnet => &BONNET,
        Finish::Ribbon => &RIBBON,
        Finish::Whisker => &WHISKER,
        Finish::Lipstick => &LIPSTICK,
        Finish::Brass => &BRASS,
        Finish::Copper => &COPPER,
        Finish::Beacon => &BEACON,
        Finish::Bowtie => &BOWTIE,
        Finish::Tulle => &TULLE,
        Finish::Mug => &MUG,
        Finish::Fallback => &FALLBACK,
    }
}

impl FinishSpec {
    fn to_material(&self) -> MaterialDef {
        let (emissive, emissive_intensity) = match self.emissive {
            Some((c, i)) => (Some(c.to_unit()), i),
            None => (None, 0.0),
        };
        MaterialDef {
            name: self.name.to_string(),
            color: self.color.to_unit(),
            metallic: self.metallic,
            roughness: self.roughness,
            clearcoat: self.clearcoat,
            clearcoat_roughness: self.clearcoat_roughness,
            emissive,
            emissive_intensity,
            opacity: 1.0,
            double_sided: self.double_sided,
        }
    }
}

/// Per-finish override loaded from settings (`[materials.<finish>]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialOverride {
    /// Base color as `[r, g, b]` in 0.0..1.0.
    pub color: Option<[f64; 3]>,
    /// Metallic factor.
    pub metallic: Option<f64>,
    /// Roughness factor.
    pub roughness: Option<f64>,
    /// Emissive intensity (only meaningful for glowing finishes).
    pub emissive_intensity: Option<f64>,
}

/// Resolved material table, one descriptor per [`Finish`].
///
/// The standard palette is built once per process and never mutated;
/// palettes with overrides are separate owned values.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    materials: Vec<MaterialDef>,
}

impl Palette {
    /// The built-in palette, shared process-wide.
    pub fn standard() -> &'static Palette {
        static STANDARD: OnceLock<Palette> = OnceLock::new();
        STANDARD.get_or_init(|| Palette {
            materials: Finish::ALL.iter().map(|&f| spec(f).to_material()).collect(),
        })
    }

    /// The standard palette with `overrides` applied, keyed by finish.
    pub fn with_overrides(overrides: &BTreeMap<Finish, MaterialOverride>) -> Palette {
        let mut palette = Palette::standard().clone();
        for (&finish, o) in overrides {
            let m = &mut palette.materials[finish as usize];
            if let Some(color) = o.color {
                m.color = color;
            }
            if let Some(metallic) = o.metallic {
                m.metallic = metallic.clamp(0.0, 1.0);
            }
            if let Some(roughness) = o.roughness {
                m.roughness = roughness.clamp(0.0, 1.0);
            }
            if let Some(intensity) = o.emissive_intensity {
                m.emissive_intensity = intensity.max(0.0);
            }
        }
        palette
    }

    /// Material for `finish`, optionally recolored with `color`.
    ///
    /// Recoloring replaces the base color only; metalness, roughness,
    /// clearcoat, emission and transparency are preserved.
    pub fn resolve(&self, finish: Finish, color: Option<Rgb>) -> MaterialDef {
        let mut material = self.materials[finish as usize].clone();
        if let Some(c) = color {
            material.color = c.to_unit();
        }
        material
    }

    /// Material for a finish given by name.
    ///
    /// Names come from code, so an unknown name is a bug: debug builds
    /// assert, release builds log and return the magenta fallback.
    pub fn resolve_named(&self, name: &str, color: Option<Rgb>) -> MaterialDef {
        match Finish::from_name(name) {
            Some(finish) => self.resolve(finish, color),
            None => {
                debug_assert!(false, "unknown palette finish {name:?}");
                tracing::warn!(finish = name, "unknown palette finish, using fallback");
                self.resolve(Finish::Fallback, None)
            }
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::standard().clone()
    }
}
