//! Workbench settings (`botforge.toml`).
//!
//! ```toml
//! [idle]
//! blink_dwell_ms = 150
//! expression_period_ms = 5000
//!
//! [defaults]
//! color = "#4fc3f7"
//!
//! [materials.chassis]
//! metallic = 0.5
//! roughness = 0.3
//! ```
//!
//! Every section is optional. Material keys are finish names.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;
use crate::idle::{clamp_dwell, IdleTimings};
use crate::palette::{Finish, MaterialOverride, Palette};

/// Errors loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Could not read the file.
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Not valid TOML, or fields of the wrong type.
    #[error("failed to parse settings: {0}")]
    Toml(#[from] toml::de::Error),

    /// `[materials.<name>]` names no finish.
    #[error("unknown finish {0:?} in [materials]")]
    UnknownFinish(String),
}

/// Result type for settings.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// `[idle]` timings in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleSettings {
    /// Blink period for every head. Unset means each head variant's own.
    #[serde(default)]
    pub blink_period_ms: Option<u64>,
    /// Eyes-closed time (default: 150, clamped to 120-200).
    #[serde(default = "default_dwell")]
    pub blink_dwell_ms: u64,
    /// Time between expression changes (default: 5000).
    #[serde(default = "default_expression_period")]
    pub expression_period_ms: u64,
}

fn default_dwell() -> u64 {
    150
}

fn default_expression_period() -> u64 {
    5000
}

impl Default for IdleSettings {
    fn default() -> Self {
        Self {
            blink_period_ms: None,
            blink_dwell_ms: default_dwell(),
            expression_period_ms: default_expression_period(),
        }
    }
}

/// `[defaults]` applied to fresh configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsSettings {
    /// Starting color.
    #[serde(default)]
    pub color: Option<Rgb>,
}

/// Parsed settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Idle animation timings.
    #[serde(default)]
    pub idle: IdleSettings,
    /// Configuration defaults.
    #[serde(default)]
    pub defaults: DefaultsSettings,
    /// Material overrides by finish name.
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialOverride>,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut settings: Settings = toml::from_str(text)?;
        if let Some(name) = settings.materials.keys().find(|k| Finish::from_name(k).is_none()) {
            return Err(SettingsError::UnknownFinish(name.clone()));
        }
        let dwell = settings.idle.blink_dwell_ms;
        let clamped = clamp_dwell(Duration::from_millis(dwell)).as_millis() as u64;
        if clamped != dwell {
            tracing::warn!(requested = dwell, used = clamped, "blink dwell out of range, clamping");
            settings.idle.blink_dwell_ms = clamped;
        }
        Ok(settings)
    }

    /// Read and parse a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::parse(&text)?;
        tracing::info!(path = %path.display(), overrides = settings.materials.len(), "settings loaded");
        Ok(settings)
    }

    /// Standard palette with the `[materials]` overrides applied.
    pub fn palette(&self) -> Palette {
        if self.materials.is_empty() {
            return Palette::default();
        }
        let overrides: BTreeMap<Finish, MaterialOverride> = self
            .materials
            .iter()
            .filter_map(|(name, o)| Finish::from_name(name).map(|f| (f, o.clone())))
            .collect();
        Palette::with_overrides(&overrides)
    }

    /// Idle timings for a head whose own blink period is `variant_period`.
    pub fn idle_timings(&self, variant_period: Option<Duration>) -> IdleTimings {
        let defaults = IdleTimings::default();
        let blink_period = self
            .idle
            .blink_period_ms
            .map(Duration::from_millis)
            .or(variant_period)
            .unwrap_or(defaults.blink_period);
        IdleTimings::new(
            blink_period,
            Duration::from_millis(self.idle.blink_dwell_ms),
            Duration::from_millis(self.idle.expression_period_ms),
        )
    }

    /// Starting color for fresh configurations.
    pub fn default_color(&self) -> Rgb {
        self.defaults.color.unwrap_or(Rgb::SKY)
    }
}
