//! One-way change notifications for an embedding host.

use serde::Serialize;

use crate::catalog::{Catalog, Region};
use crate::config::Configuration;

/// Human-readable snapshot of a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    /// Head variant name.
    pub head: &'static str,
    /// Body variant name.
    pub body: &'static str,
    /// Arms variant name.
    pub arms: &'static str,
    /// Legs variant name.
    pub legs: &'static str,
    /// Color as `#rrggbb`.
    pub color: String,
    /// Accessory description, e.g. `HAT + MUSTACHE`.
    pub accessories: String,
}

impl ConfigSummary {
    /// Summarize `config` using `catalog`'s variant names.
    pub fn new(catalog: &Catalog, config: &Configuration) -> Self {
        let name = |region| catalog.style_name(region, config.style(region) as i64);
        Self {
            head: name(Region::Head),
            body: name(Region::Body),
            arms: name(Region::Arms),
            legs: name(Region::Legs),
            color: config.color().to_hex(),
            accessories: config.accessories().describe(),
        }
    }

    /// JSON message suitable for posting to a parent context.
    pub fn to_message(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Receiver of configuration change summaries.
pub trait HostListener {
    /// Called once per effective configuration change.
    fn config_changed(&self, summary: &ConfigSummary);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessories::{AccessorySet, HatStyle};
    use crate::color::Rgb;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_summary() {
        let summary = ConfigSummary::new(&Catalog::standard(), &Configuration::default());
        assert_eq!(
            summary,
            ConfigSummary {
                head: "Cube",
                body: "Block",
                arms: "Rod",
                legs: "Stilt",
                color: "#4fc3f7".into(),
                accessories: "NO ACCESSORIES".into(),
            }
        );
    }

    #[test]
    fn message_uses_names_not_indices() {
        let catalog = Catalog::standard();
        let config = Configuration::default()
            .with_style(&catalog, Region::Head, 1)
            .with_color(Rgb::new(255, 0, 0))
            .with_accessories(AccessorySet::new(Some(HatStyle::Cowboy), true, false));
        let json = ConfigSummary::new(&catalog, &config).to_message().unwrap();
        assert_eq!(
            json,
            r##"{"head":"Orb","body":"Block","arms":"Rod","legs":"Stilt","color":"#ff0000","accessories":"HAT + MUSTACHE"}"##
        );
    }
}
