//! Color blocks as they appear in game files (`color = rgb { 10 20 30 }`)
//! and the color math used when generating new palettes.

use crate::error::{DataError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Pattern for a `<key> = <mode> { a b c }` color block.
///
/// Capture groups: 1 = mode keyword (may be empty), 2..=4 = components.
pub(crate) const COLOR_BLOCK: &str =
    r"=\s*(\w*?)\s*\{\s*([\d.]+)\s+([\d.]+)\s+([\d.]+)\s*\}";

/// Maximum draws before [`random_distinct`] gives up.
pub const MAX_COLOR_ATTEMPTS: usize = 51;

/// An 8-bit RGB color. Serializes as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Builds a color from the keyword preceding a color block and its three
    /// components.
    ///
    /// `rgb` (or no keyword) takes the components as 0-255 channel values.
    /// `hsv` takes all three as fractions of 1, the way game files write them.
    pub fn from_mode(mode: &str, v1: f64, v2: f64, v3: f64) -> Result<Rgb> {
        match mode.to_lowercase().as_str() {
            "rgb" | "" => Ok(Rgb::new(v1 as u8, v2 as u8, v3 as u8)),
            "hsv" => Ok(hsv_to_rgb(v1.clamp(0.0, 1.0) * 360.0, v2, v3)),
            other => Err(DataError::UnknownColorMode(other.to_string())),
        }
    }

    /// Same as [`Rgb::from_mode`] but with the components still as text,
    /// straight out of a regex capture.
    pub(crate) fn from_captures(mode: &str, values: [&str; 3]) -> Result<Rgb> {
        let mut parsed = [0.0; 3];
        for (slot, raw) in parsed.iter_mut().zip(values) {
            *slot = raw.parse::<f64>().map_err(|_| DataError::InvalidValue {
                field: "color component",
                value: raw.to_string(),
            })?;
        }
        Rgb::from_mode(mode, parsed[0], parsed[1], parsed[2])
    }

    /// Mixes `over` into `self`: `self * (1 - alpha) + over * alpha` per channel.
    pub fn blend(self, over: Rgb, alpha: f32) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |base: u8, top: u8| -> u8 {
            (base as f32 * (1.0 - alpha) + top as f32 * alpha).round() as u8
        };
        Rgb::new(mix(self.r, over.r), mix(self.g, over.g), mix(self.b, over.b))
    }

    /// Renders the block body, e.g. `rgb { 10 20 30 }`.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb {{ {} {} {} }}", self.r, self.g, self.b)
    }
}

/// Converts HSV to RGB. Hue is in degrees (`0..=360`), saturation and value
/// in `0..=1`. Channels are truncated, not rounded.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb::new(
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

/// Draws a random, reasonably bright color that is not in `used`, and
/// records it there.
///
/// Hue spans the whole wheel, saturation stays at or below 70 % and value
/// at or above 50 % so generated map colors never come out black.
pub fn random_distinct<R: Rng + ?Sized>(rng: &mut R, used: &mut HashSet<Rgb>) -> Result<Rgb> {
    for _ in 0..MAX_COLOR_ATTEMPTS {
        let color = hsv_to_rgb(
            rng.random_range(0..=360) as f64,
            rng.random_range(0..=70) as f64 / 100.0,
            rng.random_range(50..=100) as f64 / 100.0,
        );
        if used.insert(color) {
            return Ok(color);
        }
    }
    Err(DataError::ColorSpaceExhausted(MAX_COLOR_ATTEMPTS))
}
