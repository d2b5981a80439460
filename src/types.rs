//! Core types for the rasterizer pipeline

use crate::color::ColorRgb;
use crate::error::{RenderError, Result};
use crate::math::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// A model-space vertex as supplied by the mesh data source
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3, tangent: Vec3) -> Self {
        Self {
            position,
            uv,
            normal,
            tangent,
        }
    }

    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Self::default()
        }
    }
}

/// A vertex after the transform stage.
///
/// `position` holds screen-space x/y in pixels, normalized depth in z, and
/// the original clip-space w for perspective-correct interpolation. The
/// remaining attributes are in world orientation.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexOut {
    pub position: Vec4,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub view_direction: Vec3,
}

/// An assembled screen-space triangle, consumed immediately by the rasterizer
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [VertexOut; 3],
}

/// Index buffer interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
}

/// Which pipeline draws the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMethod {
    Hardware,
    Software,
}

/// Which triangle orientation is discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CullMode {
    Back,
    Front,
    None,
}

/// Which lighting terms reach the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingMode {
    Combined,
    Observed,
    Diffuse,
    Specular,
}

/// Capability tag telling a pipeline how a mesh's material behaves.
///
/// The software rasterizer draws opaque meshes only; transparent meshes are
/// left to a hardware backend with blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Opaque,
    Transparent,
}

impl EffectKind {
    pub fn is_transparent(self) -> bool {
        self == EffectKind::Transparent
    }
}

/// Owned sampled texture data.
///
/// Pixel data arrives already decoded; file formats are the data source's
/// concern. Sampling clamps UVs into [0, 1] rather than wrapping.
#[derive(Debug, Clone)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<ColorRgb>,
}

impl Texture {
    pub fn new(width: usize, height: usize, pixels: Vec<ColorRgb>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyTexture { width, height });
        }
        if pixels.len() != width * height {
            return Err(RenderError::TextureSizeMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from tightly packed 8-bit RGB triples
    pub fn from_rgb8(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        if data.len() != width * height * 3 {
            return Err(RenderError::TextureSizeMismatch {
                expected: width * height * 3,
                actual: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(3)
            .map(|p| ColorRgb::from_rgb8(p[0], p[1], p[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Single-texel texture of one color
    pub fn solid(color: ColorRgb) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
        }
    }

    /// Checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: ColorRgb, color2: ColorRgb) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample the texel under `uv`, clamping coordinates into [0, 1]
    pub fn sample(&self, uv: Vec2) -> ColorRgb {
        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        self.pixels[y * self.width + x]
    }
}
