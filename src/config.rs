//! Per-frame render configuration
//!
//! One immutable value drives a whole frame. Toggle and cycle operations
//! consume a config and return the next one instead of mutating shared
//! state; the embedding app decides when the new value takes effect.

use crate::error::Result;
use crate::math::Vec3;
use crate::types::{CullMode, RenderMethod, ShadingMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub render_method: RenderMethod,
    pub cull_mode: CullMode,
    pub shading_mode: ShadingMode,
    pub use_normal_map: bool,
    pub show_depth_buffer: bool,
    pub show_bounding_box: bool,
    pub uniform_clear_color: bool,
    pub rotate_meshes: bool,
    /// Direction light travels, world space
    pub light_direction: Vec3,
    pub light_intensity: f32,
    pub shininess: f32,
    pub specular_reflectance: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            render_method: RenderMethod::Software,
            cull_mode: CullMode::Back,
            shading_mode: ShadingMode::Combined,
            use_normal_map: true,
            show_depth_buffer: false,
            show_bounding_box: false,
            uniform_clear_color: false,
            rotate_meshes: true,
            light_direction: Vec3::new(0.577, -0.577, 0.577),
            light_intensity: 7.0,
            shininess: 25.0,
            specular_reflectance: 0.5,
        }
    }
}

impl RenderConfig {
    pub fn toggle_render_method(self) -> Self {
        let render_method = match self.render_method {
            RenderMethod::Hardware => RenderMethod::Software,
            RenderMethod::Software => RenderMethod::Hardware,
        };
        info!(?render_method, "rasterizer toggled");
        Self {
            render_method,
            ..self
        }
    }

    pub fn cycle_cull_mode(self) -> Self {
        let cull_mode = match self.cull_mode {
            CullMode::Back => CullMode::Front,
            CullMode::Front => CullMode::None,
            CullMode::None => CullMode::Back,
        };
        info!(?cull_mode, "cull mode cycled");
        Self { cull_mode, ..self }
    }

    /// Software-only toggle, ignored while the hardware pipeline is active
    pub fn cycle_shading_mode(self) -> Self {
        if self.render_method != RenderMethod::Software {
            debug!("shading mode cycle ignored outside the software rasterizer");
            return self;
        }
        let shading_mode = match self.shading_mode {
            ShadingMode::Combined => ShadingMode::Observed,
            ShadingMode::Observed => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
        };
        info!(?shading_mode, "shading mode cycled");
        Self {
            shading_mode,
            ..self
        }
    }

    /// Software-only toggle, ignored while the hardware pipeline is active
    pub fn toggle_normal_map(self) -> Self {
        if self.render_method != RenderMethod::Software {
            debug!("normal map toggle ignored outside the software rasterizer");
            return self;
        }
        let use_normal_map = !self.use_normal_map;
        info!(use_normal_map, "normal map toggled");
        Self {
            use_normal_map,
            ..self
        }
    }

    /// Software-only toggle, ignored while the hardware pipeline is active
    pub fn toggle_depth_visualization(self) -> Self {
        if self.render_method != RenderMethod::Software {
            debug!("depth visualization toggle ignored outside the software rasterizer");
            return self;
        }
        let show_depth_buffer = !self.show_depth_buffer;
        info!(show_depth_buffer, "depth buffer visualization toggled");
        Self {
            show_depth_buffer,
            ..self
        }
    }

    /// Software-only toggle, ignored while the hardware pipeline is active
    pub fn toggle_bounding_box(self) -> Self {
        if self.render_method != RenderMethod::Software {
            debug!("bounding box toggle ignored outside the software rasterizer");
            return self;
        }
        let show_bounding_box = !self.show_bounding_box;
        info!(show_bounding_box, "bounding box visualization toggled");
        Self {
            show_bounding_box,
            ..self
        }
    }

    pub fn toggle_uniform_clear_color(self) -> Self {
        let uniform_clear_color = !self.uniform_clear_color;
        info!(uniform_clear_color, "uniform clear color toggled");
        Self {
            uniform_clear_color,
            ..self
        }
    }

    pub fn toggle_mesh_rotation(self) -> Self {
        let rotate_meshes = !self.rotate_meshes;
        info!(rotate_meshes, "mesh rotation toggled");
        Self {
            rotate_meshes,
            ..self
        }
    }

    /// Parse a configuration delivered as a RON document
    pub fn from_ron(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }

    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}
