//! Per-pixel shading
//!
//! Takes the attributes interpolated by the rasterizer plus the sampled
//! diffuse color and produces the final pixel color under the active
//! shading mode. All math happens in [0, 1] color space.

use crate::color::ColorRgb;
use crate::config::RenderConfig;
use crate::math::{Vec2, Vec3};
use crate::mesh::Mesh;
use crate::types::ShadingMode;

/// Interpolated per-pixel attributes handed over by the rasterizer
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub view_direction: Vec3,
}

/// Compute the pixel color for `fragment` under the configured shading
/// mode. Lighting terms whose optional texture is missing contribute
/// nothing.
pub fn shade_pixel(
    fragment: &Fragment,
    sampled_diffuse: ColorRgb,
    mesh: &Mesh,
    config: &RenderConfig,
) -> ColorRgb {
    let normal = perturbed_normal(fragment, mesh, config);

    let inv_light_direction = -config.light_direction;
    let observed_area = normal.dot(inv_light_direction).max(0.0);

    match config.shading_mode {
        ShadingMode::Combined => {
            diffuse_term(sampled_diffuse, config) * observed_area
                + specular_term(fragment, normal, mesh, config)
        }
        ShadingMode::Observed => ColorRgb::WHITE * observed_area,
        ShadingMode::Diffuse => diffuse_term(sampled_diffuse, config),
        ShadingMode::Specular => specular_term(fragment, normal, mesh, config),
    }
}

/// The shading normal: either the interpolated one, or the normal-map
/// sample decoded through the tangent-space basis into world orientation.
fn perturbed_normal(fragment: &Fragment, mesh: &Mesh, config: &RenderConfig) -> Vec3 {
    let normal_map = match (config.use_normal_map, mesh.normal_map()) {
        (true, Some(map)) => map,
        _ => return fragment.normal,
    };

    let sample = normal_map.sample(fragment.uv);
    // decode each channel from [0, 1] into [-1, 1]
    let decoded = Vec3::new(
        2.0 * sample.r - 1.0,
        2.0 * sample.g - 1.0,
        2.0 * sample.b - 1.0,
    );

    let binormal = fragment.normal.cross(fragment.tangent);
    let world = fragment.tangent * decoded.x + binormal * decoded.y + fragment.normal * decoded.z;
    world.normalize()
}

/// Lambertian diffuse: intensity-scaled albedo over pi
fn diffuse_term(sampled_diffuse: ColorRgb, config: &RenderConfig) -> ColorRgb {
    sampled_diffuse * (config.light_intensity / std::f32::consts::PI)
}

/// Phong specular from the specular and glossiness maps. Either map being
/// absent drops the whole term.
fn specular_term(fragment: &Fragment, normal: Vec3, mesh: &Mesh, config: &RenderConfig) -> ColorRgb {
    let (specular_map, glossiness_map) = match (mesh.specular_map(), mesh.glossiness_map()) {
        (Some(specular), Some(gloss)) => (specular, gloss),
        _ => return ColorRgb::BLACK,
    };

    let glossiness = glossiness_map.sample(fragment.uv).r * config.shininess;
    let specular_sample = specular_map.sample(fragment.uv);

    let inv_light_direction = -config.light_direction;
    let reflected = inv_light_direction - normal * (2.0 * normal.dot(inv_light_direction));
    let angle = reflected.dot(fragment.view_direction).max(0.0);

    specular_sample * (config.specular_reflectance * angle.powf(glossiness))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TextureSet;
    use crate::types::{PrimitiveTopology, ShadingMode, Texture, Vertex};
    use approx::assert_relative_eq;

    // surface at z = 10 facing a camera at the origin
    fn facing_fragment() -> Fragment {
        Fragment {
            uv: Vec2::ZERO,
            normal: Vec3::new(0.0, 0.0, -1.0),
            tangent: Vec3::UNIT_X,
            view_direction: Vec3::UNIT_Z,
        }
    }

    fn mesh_with(textures: TextureSet) -> Mesh {
        let vertices = vec![
            Vertex::from_position(0.0, 0.0, 10.0),
            Vertex::from_position(1.0, 0.0, 10.0),
            Vertex::from_position(0.0, 1.0, 10.0),
        ];
        Mesh::new(vertices, vec![0, 1, 2], PrimitiveTopology::TriangleList, textures).unwrap()
    }

    fn head_on_config() -> RenderConfig {
        RenderConfig {
            // light shining straight at the surface
            light_direction: Vec3::UNIT_Z,
            light_intensity: 1.0,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn observed_mode_is_cosine_weighted_white() {
        let mesh = mesh_with(TextureSet::with_diffuse(Texture::solid(ColorRgb::WHITE)));
        let config = RenderConfig {
            shading_mode: ShadingMode::Observed,
            ..head_on_config()
        };
        let color = shade_pixel(&facing_fragment(), ColorRgb::WHITE, &mesh, &config);
        assert_relative_eq!(color.r, 1.0, epsilon = 1e-5);

        // grazing light contributes nothing
        let grazing = RenderConfig {
            light_direction: Vec3::UNIT_Y,
            ..config
        };
        let dark = shade_pixel(&facing_fragment(), ColorRgb::WHITE, &mesh, &grazing);
        assert_relative_eq!(dark.r, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn diffuse_mode_is_lambert_over_pi() {
        let mesh = mesh_with(TextureSet::with_diffuse(Texture::solid(ColorRgb::WHITE)));
        let config = RenderConfig {
            shading_mode: ShadingMode::Diffuse,
            ..head_on_config()
        };
        let color = shade_pixel(&facing_fragment(), ColorRgb::WHITE, &mesh, &config);
        assert_relative_eq!(color.g, 1.0 / std::f32::consts::PI, epsilon = 1e-5);
    }

    #[test]
    fn specular_mode_peaks_along_mirror_reflection() {
        let textures = TextureSet {
            diffuse: Some(Texture::solid(ColorRgb::WHITE)),
            specular: Some(Texture::solid(ColorRgb::WHITE)),
            glossiness: Some(Texture::solid(ColorRgb::WHITE)),
            normal: None,
        };
        let mesh = mesh_with(textures);
        let config = RenderConfig {
            shading_mode: ShadingMode::Specular,
            ..head_on_config()
        };
        // head-on: reflected light comes straight back at the viewer, so
        // the term reduces to the reflectance constant
        let color = shade_pixel(&facing_fragment(), ColorRgb::WHITE, &mesh, &config);
        assert_relative_eq!(color.r, config.specular_reflectance, epsilon = 1e-4);
    }

    #[test]
    fn missing_specular_maps_drop_the_term() {
        let mesh = mesh_with(TextureSet::with_diffuse(Texture::solid(ColorRgb::WHITE)));
        let config = RenderConfig {
            shading_mode: ShadingMode::Specular,
            ..head_on_config()
        };
        let color = shade_pixel(&facing_fragment(), ColorRgb::WHITE, &mesh, &config);
        assert_relative_eq!(color.r, 0.0);
        assert_relative_eq!(color.g, 0.0);
        assert_relative_eq!(color.b, 0.0);
    }

    #[test]
    fn flat_normal_map_reproduces_the_surface_normal() {
        // (0.5, 0.5, 1.0) decodes to the unperturbed +Z tangent normal
        let flat = Texture::solid(ColorRgb::new(0.5, 0.5, 1.0));
        let textures = TextureSet {
            diffuse: Some(Texture::solid(ColorRgb::WHITE)),
            normal: Some(flat),
            specular: None,
            glossiness: None,
        };
        let mesh = mesh_with(textures);
        let config = RenderConfig {
            shading_mode: ShadingMode::Observed,
            ..head_on_config()
        };
        let with_map = shade_pixel(&facing_fragment(), ColorRgb::WHITE, &mesh, &config);
        let without = shade_pixel(
            &facing_fragment(),
            ColorRgb::WHITE,
            &mesh,
            &RenderConfig {
                use_normal_map: false,
                ..config
            },
        );
        assert_relative_eq!(with_map.r, without.r, epsilon = 1e-5);
    }
}
