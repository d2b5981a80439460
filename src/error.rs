//! Error types for the rasterizer

use thiserror::Error;

/// Configuration and mesh-construction failures.
///
/// Per-pixel and per-triangle conditions (degenerate geometry, points
/// outside the frustum) are expected-frequency branches, not errors, and
/// never surface here.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("mesh has no diffuse map; a diffuse texture is mandatory")]
    MissingDiffuseMap,

    #[error("index buffer holds {count} indices; at least 3 are required")]
    TooFewIndices { count: usize },

    #[error("triangle list index count {count} is not a multiple of 3")]
    IndexCountNotMultipleOfThree { count: usize },

    #[error("index {index} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },

    #[error("texture holds {actual} pixels, expected {expected} for its dimensions")]
    TextureSizeMismatch { expected: usize, actual: usize },

    #[error("texture dimensions {width}x{height} must both be non-zero")]
    EmptyTexture { width: usize, height: usize },

    #[error("failed to parse render config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("failed to serialize render config: {0}")]
    ConfigSerialize(#[from] ron::Error),
}

/// Result type alias for rasterizer operations
pub type Result<T> = std::result::Result<T, RenderError>;
