//! Mesh: geometry buffers, world transform, and texture set

use crate::error::{RenderError, Result};
use crate::math::Mat4;
use crate::types::{EffectKind, PrimitiveTopology, Texture, Vertex};

/// The up-to-four maps a mesh can carry. Only the diffuse map is mandatory;
/// shading terms whose map is absent are skipped.
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    pub diffuse: Option<Texture>,
    pub normal: Option<Texture>,
    pub specular: Option<Texture>,
    pub glossiness: Option<Texture>,
}

impl TextureSet {
    pub fn with_diffuse(diffuse: Texture) -> Self {
        Self {
            diffuse: Some(diffuse),
            ..Self::default()
        }
    }
}

/// A renderable mesh.
///
/// Vertex and index buffers are immutable after creation; the world
/// transform and effect tag stay mutable for per-frame animation.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    topology: PrimitiveTopology,
    diffuse_map: Texture,
    normal_map: Option<Texture>,
    specular_map: Option<Texture>,
    glossiness_map: Option<Texture>,
    pub world: Mat4,
    pub effect: EffectKind,
}

impl Mesh {
    /// Validates the geometry invariants up front so the render loop never
    /// has to: a mandatory diffuse map, at least one triangle's worth of
    /// indices, a list length divisible by 3, and in-range indices.
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        topology: PrimitiveTopology,
        textures: TextureSet,
    ) -> Result<Self> {
        let diffuse_map = textures.diffuse.ok_or(RenderError::MissingDiffuseMap)?;

        if indices.len() < 3 {
            return Err(RenderError::TooFewIndices {
                count: indices.len(),
            });
        }
        if topology == PrimitiveTopology::TriangleList && indices.len() % 3 != 0 {
            return Err(RenderError::IndexCountNotMultipleOfThree {
                count: indices.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RenderError::IndexOutOfBounds {
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self {
            vertices,
            indices,
            topology,
            diffuse_map,
            normal_map: textures.normal,
            specular_map: textures.specular,
            glossiness_map: textures.glossiness,
            world: Mat4::IDENTITY,
            effect: EffectKind::Opaque,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn diffuse_map(&self) -> &Texture {
        &self.diffuse_map
    }

    pub fn normal_map(&self) -> Option<&Texture> {
        self.normal_map.as_ref()
    }

    pub fn specular_map(&self) -> Option<&Texture> {
        self.specular_map.as_ref()
    }

    pub fn glossiness_map(&self) -> Option<&Texture> {
        self.glossiness_map.as_ref()
    }

    /// Spin the mesh around the world Y axis
    pub fn rotate_y(&mut self, angle: f32) {
        self.world = self.world * Mat4::rotation_y(angle);
    }
}
