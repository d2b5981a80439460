//! RGB color in the canonical [0, 1] float range
//!
//! Byte-range data is converted exactly once at the boundaries: incoming
//! texture pixels through [`ColorRgb::from_rgb8`], the finished frame
//! through [`ColorRgb::to_packed`].

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ColorRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorRgb {
    pub const BLACK: ColorRgb = ColorRgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: ColorRgb = ColorRgb { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Rescale an over-bright color so its maximum channel becomes 1,
    /// preserving hue. Colors already inside [0, 1] are left unchanged.
    pub fn max_to_one(self) -> Self {
        let max = self.r.max(self.g).max(self.b);
        if max > 1.0 {
            Self {
                r: self.r / max,
                g: self.g / max,
                b: self.b / max,
            }
        } else {
            self
        }
    }

    /// Pack into 32-bit 0x00RRGGBB for the display sink
    pub fn to_packed(self) -> u32 {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as u32;
        (r << 16) | (g << 8) | b
    }
}

impl Add for ColorRgb {
    type Output = ColorRgb;
    fn add(self, other: ColorRgb) -> ColorRgb {
        ColorRgb {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl Mul<f32> for ColorRgb {
    type Output = ColorRgb;
    fn mul(self, s: f32) -> ColorRgb {
        ColorRgb {
            r: self.r * s,
            g: self.g * s,
            b: self.b * s,
        }
    }
}
