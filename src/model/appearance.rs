use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// Linear RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const CYAN: Rgb = Rgb::new(0.0, 1.0, 1.0);
    pub const YELLOW: Rgb = Rgb::new(1.0, 0.92, 0.016);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Mul<f32> for Rgb {
    type Output = Rgb;

    fn mul(self, k: f32) -> Rgb {
        Rgb::new(self.r * k, self.g * k, self.b * k)
    }
}

impl Add for Rgb {
    type Output = Rgb;

    fn add(self, other: Rgb) -> Rgb {
        Rgb::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

/// The visual state of a render surface as far as emphasis is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub base: Rgb,
    #[serde(default)]
    pub emission: Option<Rgb>,
}

impl Signature {
    pub const fn plain(base: Rgb) -> Self {
        Self {
            base,
            emission: None,
        }
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::plain(Rgb::WHITE)
    }
}

/// Hue and strength of the synthetic emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmphasisStyle {
    pub color: Rgb,
    pub intensity: f32,
}

impl Default for EmphasisStyle {
    fn default() -> Self {
        Self {
            color: Rgb::CYAN,
            intensity: 1.5,
        }
    }
}

impl EmphasisStyle {
    /// Emphasized variant of `original`: base kept, emission raised by the
    /// style's glow on top of whatever the surface already emits.
    pub fn emphasize(&self, original: Signature) -> Signature {
        let glow = self.color * self.intensity;
        Signature {
            base: original.base,
            emission: Some(original.emission.unwrap_or(Rgb::BLACK) + glow),
        }
    }
}
