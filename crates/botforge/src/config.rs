//! Robot configuration and the state layer that replaces it.
//!
//! A [`Configuration`] is a flat value whose style indices are always in
//! range for the catalog it was built against. Untrusted input arrives as a
//! [`RawConfiguration`] and is normalized on the way in. [`ConfigState`]
//! owns the live configuration, applies user actions as whole-value
//! replacements and tells host listeners about every effective change.

use std::fmt;
use std::rc::Rc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::accessories::{AccessorySet, BodyAccessory, HatStyle};
use crate::catalog::{normalize_index, Catalog, Region};
use crate::color::{ColorError, Rgb};
use crate::host::{ConfigSummary, HostListener};

/// A complete, valid robot configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawConfiguration")]
pub struct Configuration {
    head_style: usize,
    body_style: usize,
    arms_style: usize,
    legs_style: usize,
    color: Rgb,
    accessories: AccessorySet,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            head_style: 0,
            body_style: 0,
            arms_style: 0,
            legs_style: 0,
            color: Rgb::SKY,
            accessories: AccessorySet::NONE,
        }
    }
}

impl Configuration {
    /// Normalize untrusted input against `catalog`.
    pub fn from_raw(raw: &RawConfiguration, catalog: &Catalog) -> Self {
        let norm = |region, value| normalize_index(value, raw.index_origin, catalog.count(region));
        Self {
            head_style: norm(Region::Head, raw.head_style),
            body_style: norm(Region::Body, raw.body_style),
            arms_style: norm(Region::Arms, raw.arms_style),
            legs_style: norm(Region::Legs, raw.legs_style),
            color: raw.color,
            accessories: raw.accessories,
        }
    }

    /// Uniformly random configuration, accessories drawn from the preset cycle.
    pub fn random<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Self {
        let mut pick = |region| rng.gen_range(0..catalog.count(region));
        let head_style = pick(Region::Head);
        let body_style = pick(Region::Body);
        let arms_style = pick(Region::Arms);
        let legs_style = pick(Region::Legs);
        let color = Rgb::from_u24(rng.gen_range(0..=0xff_ffff));
        let preset = rng.gen_range(0..AccessorySet::PRESETS.len());
        Self {
            head_style,
            body_style,
            arms_style,
            legs_style,
            color,
            accessories: AccessorySet::PRESETS[preset],
        }
    }

    /// Effective style index of `region`.
    pub fn style(&self, region: Region) -> usize {
        match region {
            Region::Head => self.head_style,
            Region::Body => self.body_style,
            Region::Arms => self.arms_style,
            Region::Legs => self.legs_style,
        }
    }

    /// Robot color.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Worn accessories.
    pub fn accessories(&self) -> AccessorySet {
        self.accessories
    }

    /// Copy with `region` set to the wrapped value of `raw`.
    pub fn with_style(mut self, catalog: &Catalog, region: Region, raw: i64) -> Self {
        let index = catalog.effective_index(region, raw);
        match region {
            Region::Head => self.head_style = index,
            Region::Body => self.body_style = index,
            Region::Arms => self.arms_style = index,
            Region::Legs => self.legs_style = index,
        }
        self
    }

    /// Copy with `region` moved `step` variants along, wrapping.
    ///
    /// Periodic in `step` for every `i64`, including values near the ends
    /// of the range.
    pub fn cycled(self, catalog: &Catalog, region: Region, step: i64) -> Self {
        let count = catalog.count(region).max(1) as i64;
        let current = self.style(region) as i64;
        self.with_style(catalog, region, current + step.rem_euclid(count))
    }

    /// Copy with a different color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Copy with different accessories.
    pub fn with_accessories(mut self, accessories: AccessorySet) -> Self {
        self.accessories = accessories;
        self
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse JSON and normalize against `catalog`.
    pub fn from_json(json: &str, catalog: &Catalog) -> Result<Self, serde_json::Error> {
        let raw: RawConfiguration = serde_json::from_str(json)?;
        Ok(Self::from_raw(&raw, catalog))
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "head {} body {} arms {} legs {} color {} ({})",
            self.head_style, self.body_style, self.arms_style, self.legs_style, self.color, self.accessories
        )
    }
}

/// Configuration as found in storage or share links, before normalization.
///
/// `indexOrigin` defaults to 0; older payloads that counted styles from 1
/// set it to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfiguration {
    /// Index of the first style in this payload.
    #[serde(default)]
    pub index_origin: i64,
    /// Raw head style.
    pub head_style: i64,
    /// Raw body style.
    pub body_style: i64,
    /// Raw arms style.
    pub arms_style: i64,
    /// Raw legs style.
    pub legs_style: i64,
    /// Robot color.
    pub color: Rgb,
    /// Worn accessories.
    #[serde(default)]
    pub accessories: AccessorySet,
}

impl From<RawConfiguration> for Configuration {
    fn from(raw: RawConfiguration) -> Self {
        Configuration::from_raw(&raw, &Catalog::standard())
    }
}

/// Owner of the live configuration.
pub struct ConfigState {
    catalog: Catalog,
    current: Configuration,
    listeners: Vec<Rc<dyn HostListener>>,
}

impl fmt::Debug for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigState")
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl ConfigState {
    /// State holding the default configuration.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_initial(catalog, Configuration::default())
    }

    /// State holding `initial`.
    pub fn with_initial(catalog: Catalog, initial: Configuration) -> Self {
        Self {
            catalog,
            current: initial,
            listeners: Vec::new(),
        }
    }

    /// The live configuration.
    pub fn current(&self) -> Configuration {
        self.current
    }

    /// The catalog styles are normalized against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Register a host listener.
    pub fn subscribe(&mut self, listener: Rc<dyn HostListener>) {
        self.listeners.push(listener);
    }

    /// Summary of the live configuration.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary::new(&self.catalog, &self.current)
    }

    /// Step `region` to its next variant, wrapping after the last.
    pub fn cycle_style(&mut self, region: Region) -> bool {
        let next = self.current.cycled(&self.catalog, region, 1);
        self.replace(next, "cycle-style")
    }

    /// Set `region` to a raw style, wrapping out-of-range values.
    pub fn set_style(&mut self, region: Region, raw: i64) -> bool {
        let next = self.current.with_style(&self.catalog, region, raw);
        self.replace(next, "set-style")
    }

    /// Parse and apply a color. On error the previous color is kept.
    pub fn set_color(&mut self, color: &str) -> Result<bool, ColorError> {
        let color: Rgb = color.parse()?;
        Ok(self.set_color_rgb(color))
    }

    /// Apply a color.
    pub fn set_color_rgb(&mut self, color: Rgb) -> bool {
        let next = self.current.with_color(color);
        self.replace(next, "set-color")
    }

    /// Turn the mustache on or off.
    pub fn toggle_mustache(&mut self) -> bool {
        let mut accessories = self.current.accessories;
        accessories.mustache = !accessories.mustache;
        self.replace(self.current.with_accessories(accessories), "toggle-mustache")
    }

    /// Turn the lipstick on or off.
    pub fn toggle_lipstick(&mut self) -> bool {
        let mut accessories = self.current.accessories;
        accessories.lipstick = !accessories.lipstick;
        self.replace(self.current.with_accessories(accessories), "toggle-lipstick")
    }

    /// Put `item` on, or take it off if already worn.
    pub fn toggle_body_accessory(&mut self, item: BodyAccessory) -> bool {
        let accessories = self.current.accessories;
        let next = accessories.with_body(item, !accessories.wears(item));
        self.replace(self.current.with_accessories(next), "toggle-body-accessory")
    }

    /// Wear `hat`, replacing any other hat.
    pub fn set_hat(&mut self, hat: Option<HatStyle>) -> bool {
        let mut accessories = self.current.accessories;
        accessories.hat = hat;
        self.replace(self.current.with_accessories(accessories), "set-hat")
    }

    /// Move to the next hat, or to none after the last.
    pub fn cycle_hat(&mut self) -> bool {
        self.set_hat(HatStyle::cycle(self.current.accessories.hat))
    }

    /// Step through the accessory presets.
    pub fn cycle_accessory_preset(&mut self) -> bool {
        let next = self.current.accessories.next_preset();
        self.replace(self.current.with_accessories(next), "cycle-accessories")
    }

    /// Replace everything with a random configuration.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let next = Configuration::random(&self.catalog, rng);
        self.replace(next, "randomize")
    }

    /// Replace everything with a saved configuration.
    pub fn load(&mut self, config: Configuration) -> bool {
        // re-normalize in case it was built against a larger catalog
        let next = Region::ALL
            .into_iter()
            .fold(config, |c, region| c.with_style(&self.catalog, region, config.style(region) as i64));
        self.replace(next, "load")
    }

    /// Back to defaults.
    pub fn reset(&mut self) -> bool {
        self.replace(Configuration::default(), "reset")
    }

    fn replace(&mut self, next: Configuration, action: &'static str) -> bool {
        if next == self.current {
            tracing::debug!(action, "configuration unchanged");
            return false;
        }
        self.current = next;
        tracing::info!(action, config = %self.current, "configuration changed");
        if !self.listeners.is_empty() {
            let summary = self.summary();
            for listener in &self.listeners {
                listener.config_changed(&summary);
            }
        }
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Host {
        seen: RefCell<Vec<ConfigSummary>>,
    }

    impl HostListener for Host {
        fn config_changed(&self, summary: &ConfigSummary) {
            self.seen.borrow_mut().push(summary.clone());
        }
    }

    fn state() -> (ConfigState, Rc<Host>) {
        let mut state = ConfigState::new(Catalog::standard());
        let host = Rc::new(Host::default());
        state.subscribe(host.clone());
        (state, host)
    }

    #[test]
    fn defaults() {
        let c = Configuration::default();
        for region in Region::ALL {
            assert_eq!(c.style(region), 0);
        }
        assert_eq!(c.color().to_hex(), "#4fc3f7");
        assert!(c.accessories().is_empty());
    }

    #[test]
    fn cycling_from_last_style_wraps_to_zero() {
        let (mut state, _) = state();
        let last = state.catalog().count(Region::Head) as i64 - 1;
        state.set_style(Region::Head, last);
        assert_eq!(state.current().style(Region::Head), last as usize);
        state.cycle_style(Region::Head);
        assert_eq!(state.current().style(Region::Head), 0);
    }

    #[test]
    fn huge_steps_wrap_like_small_ones() {
        let catalog = Catalog::standard();
        let count = catalog.count(Region::Head) as i64;
        let one = Configuration::default().with_style(&catalog, Region::Head, 1);
        // i64::MAX = 5 * k + 2 for five variants, so 1 + i64::MAX lands on 3
        assert_eq!(count, 5);
        assert_eq!(one.cycled(&catalog, Region::Head, i64::MAX).style(Region::Head), 3);
        assert_eq!(one.cycled(&catalog, Region::Head, i64::MIN).style(Region::Head), 3);
        for step in [-7i64, -1, 0, 4, 12] {
            let expected = (1 + step).rem_euclid(count) as usize;
            assert_eq!(one.cycled(&catalog, Region::Head, step).style(Region::Head), expected);
        }
    }

    #[test]
    fn bad_color_keeps_previous_value() {
        let (mut state, host) = state();
        assert!(state.set_color("#ff0000").unwrap());
        assert!(state.set_color("red").is_err());
        assert_eq!(state.current().color(), Rgb::new(255, 0, 0));
        assert_eq!(host.seen.borrow().len(), 1);
    }

    #[test]
    fn listeners_hear_only_effective_changes() {
        let (mut state, host) = state();
        assert!(!state.reset());
        assert!(state.cycle_accessory_preset());
        assert!(state.toggle_mustache());
        assert!(!state.set_color_rgb(Rgb::SKY));
        let seen = host.seen.borrow();
        let labels: Vec<_> = seen.iter().map(|s| s.accessories.as_str()).collect();
        assert_eq!(labels, ["HAT", "HAT + MUSTACHE"]);
    }

    #[test]
    fn one_hat_at_a_time() {
        let (mut state, _) = state();
        state.set_hat(Some(HatStyle::Cowboy));
        state.set_hat(Some(HatStyle::Bonnet));
        assert_eq!(state.current().accessories().hat, Some(HatStyle::Bonnet));
        state.cycle_hat();
        assert_eq!(state.current().accessories().hat, Some(HatStyle::Topper));
    }

    #[test]
    fn toggles_flip_independently() {
        let (mut state, _) = state();
        state.toggle_lipstick();
        state.toggle_mustache();
        state.toggle_lipstick();
        assert_eq!(state.current().accessories(), AccessorySet::new(None, true, false));
    }

    #[test]
    fn body_accessories_toggle_and_survive_preset_cycling() {
        let (mut state, host) = state();
        assert!(state.toggle_body_accessory(BodyAccessory::Tutu));
        assert!(state.toggle_body_accessory(BodyAccessory::BeerMug));
        assert!(state.cycle_accessory_preset());
        let worn = state.current().accessories();
        assert_eq!(worn.preset_index(), Some(1));
        assert!(worn.wears(BodyAccessory::Tutu) && worn.wears(BodyAccessory::BeerMug));
        assert!(state.toggle_body_accessory(BodyAccessory::Tutu));
        assert!(!state.current().accessories().wears(BodyAccessory::Tutu));
        let seen = host.seen.borrow();
        assert_eq!(seen.last().map(|s| s.accessories.as_str()), Some("HAT + BEER"));
    }

    #[test]
    fn randomize_is_reproducible_with_a_seed() {
        let catalog = Catalog::standard();
        let a = Configuration::random(&catalog, &mut Pcg32::seed_from_u64(7));
        let b = Configuration::random(&catalog, &mut Pcg32::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.accessories().preset_index().is_some());
    }

    #[test]
    fn json_uses_camel_case_fields() {
        let json = Configuration::default().to_json().unwrap();
        assert_eq!(
            json,
            r##"{"headStyle":0,"bodyStyle":0,"armsStyle":0,"legsStyle":0,"color":"#4fc3f7","accessories":{"hat":null,"mustache":false,"lipstick":false,"bowtie":false,"tutu":false,"beer":false}}"##
        );
    }

    #[test]
    fn one_based_payload_normalizes_with_origin() {
        let catalog = Catalog::standard();
        let json = r##"{"indexOrigin":1,"headStyle":5,"bodyStyle":1,"armsStyle":6,"legsStyle":0,"color":"#00ff00","accessories":{"hat":true}}"##;
        let c = Configuration::from_json(json, &catalog).unwrap();
        assert_eq!(c.style(Region::Head), 4);
        assert_eq!(c.style(Region::Body), 0);
        assert_eq!(c.style(Region::Arms), 0);
        assert_eq!(c.style(Region::Legs), 4);
        assert_eq!(c.accessories().hat, Some(HatStyle::Cowboy));
    }

    #[test]
    fn missing_field_is_an_error() {
        let json = r##"{"headStyle":0,"bodyStyle":0,"armsStyle":0,"color":"#00ff00"}"##;
        assert!(Configuration::from_json(json, &Catalog::standard()).is_err());
    }

    #[test]
    fn out_of_range_deserialize_is_normalized() {
        let json = r##"{"headStyle":-1,"bodyStyle":12,"armsStyle":0,"legsStyle":0,"color":"#000"}"##;
        let c: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(c.style(Region::Head), 4);
        assert_eq!(c.style(Region::Body), 2);
        assert_eq!(c.color(), Rgb::new(0, 0, 0));
    }

    pub(crate) fn any_configuration() -> impl Strategy<Value = Configuration> {
        (
            any::<i64>(),
            any::<i64>(),
            any::<i64>(),
            any::<i64>(),
            any::<u32>(),
            0usize..8,
            any::<bool>(),
            0usize..4,
            any::<[bool; 3]>(),
        )
            .prop_map(|(h, b, a, l, rgb, preset, hatted, hat, body)| {
                let catalog = Catalog::standard();
                let mut accessories = AccessorySet::PRESETS[preset];
                if hatted {
                    accessories.hat = Some(HatStyle::ALL[hat]);
                }
                for (item, on) in BodyAccessory::ALL.into_iter().zip(body) {
                    accessories = accessories.with_body(item, on);
                }
                Configuration::default()
                    .with_style(&catalog, Region::Head, h)
                    .with_style(&catalog, Region::Body, b)
                    .with_style(&catalog, Region::Arms, a)
                    .with_style(&catalog, Region::Legs, l)
                    .with_color(Rgb::from_u24(rgb & 0xff_ffff))
                    .with_accessories(accessories)
            })
    }

    proptest! {
        #[test]
        fn json_roundtrip(c in any_configuration()) {
            let json = c.to_json().unwrap();
            prop_assert_eq!(Configuration::from_json(&json, &Catalog::standard()).unwrap(), c);
        }

        #[test]
        fn cycling_is_periodic(c in any_configuration(), step in any::<i64>()) {
            let catalog = Catalog::standard();
            for region in Region::ALL {
                let count = catalog.count(region) as i64;
                let expected = (c.style(region) as i64 + step.rem_euclid(count)) % count;
                prop_assert_eq!(c.cycled(&catalog, region, step).style(region) as i64, expected);
            }
        }

        #[test]
        fn styles_always_in_range(c in any_configuration(), step in any::<i64>()) {
            let catalog = Catalog::standard();
            for region in Region::ALL {
                let cycled = c.cycled(&catalog, region, step);
                prop_assert!(cycled.style(region) < catalog.count(region));
            }
        }
    }
}
