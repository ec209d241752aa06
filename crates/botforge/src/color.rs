//! User-selectable RGB colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned when parsing a color string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The string is not `#rgb` or `#rrggbb`.
    #[error("expected #rgb or #rrggbb, got {0:?}")]
    Malformed(String),
}

/// An 8-bit sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// The default robot color, a light sky blue.
    pub const SKY: Rgb = Rgb::new(0x4f, 0xc3, 0xf7);

    /// Create a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color from the low 24 bits of `v` (`0xRRGGBB`).
    pub const fn from_u24(v: u32) -> Self {
        Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Channels scaled to 0.0..1.0, the form material descriptors use.
    pub fn to_unit(self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::SKY
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ColorError::Malformed(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(malformed)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        match hex.len() {
            6 => {
                let v = u32::from_str_radix(hex, 16).map_err(|_| malformed())?;
                Ok(Self::from_u24(v))
            }
            3 => {
                // #abc is shorthand for #aabbcc
                let mut digits = [0u8; 3];
                for (slot, c) in digits.iter_mut().zip(hex.chars()) {
                    let d = c.to_digit(16).ok_or_else(malformed)? as u8;
                    *slot = d * 16 + d;
                }
                Ok(Self::new(digits[0], digits[1], digits[2]))
            }
            _ => Err(malformed()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!("#4fc3f7".parse::<Rgb>().unwrap(), Rgb::SKY);
        assert_eq!("#4FC3F7".parse::<Rgb>().unwrap(), Rgb::SKY);
        assert_eq!("#fa0".parse::<Rgb>().unwrap(), Rgb::new(0xff, 0xaa, 0x00));
        assert_eq!(" #000000 ".parse::<Rgb>().unwrap(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["4fc3f7", "#4fc3f", "#ggg", "#", "", "#12345678", "#+12345"] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn hex_is_canonical_lowercase() {
        let c: Rgb = "#ABCDEF".parse().unwrap();
        assert_eq!(c.to_hex(), "#abcdef");
        assert_eq!(c.to_string(), "#abcdef");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb::SKY).unwrap();
        assert_eq!(json, r##""#4fc3f7""##);
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::SKY);
        assert!(serde_json::from_str::<Rgb>(r#""blue""#).is_err());
    }

    #[test]
    fn unit_channels() {
        assert_eq!(Rgb::new(0, 255, 51).to_unit(), [0.0, 1.0, 0.2]);
    }
}
