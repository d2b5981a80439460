//! The software pipeline and frame orchestrator
//!
//! Per frame: camera matrices feed a per-mesh world-view-projection
//! transform, the index buffer is walked into screen-space triangles, and
//! the triangles are rasterized in parallel across row bands of the
//! framebuffer with per-pixel depth testing and shading.

use crate::camera::{Camera, CameraInput};
use crate::color::ColorRgb;
use crate::config::RenderConfig;
use crate::framebuffer::{Band, DepthRange, Framebuffer};
use crate::frustum::Frustum;
use crate::math::{Mat4, Vec2, Vec3, Vec4};
use crate::mesh::Mesh;
use crate::shading::{shade_pixel, Fragment};
use crate::types::{CullMode, PrimitiveTopology, RenderMethod, Triangle, Vertex, VertexOut};
use rayon::prelude::*;
use tracing::{trace, warn};

/// Perspective-division floor for vertices at or behind the camera
const MIN_CLIP_W: f32 = 1e-4;
/// Twice-the-area threshold below which a screen triangle is degenerate
const MIN_TRIANGLE_AREA: f32 = 1e-6;
/// Tolerance on the signed edge-weight sum check
const WEIGHT_SUM_EPSILON: f32 = 1e-4;
/// Rows per rasterizer band
const BAND_HEIGHT: usize = 16;
/// Mesh self-rotation, radians per second
const MESH_SPIN_SPEED: f32 = 1.0;

const SOFTWARE_CLEAR: ColorRgb = ColorRgb { r: 0.25, g: 0.25, b: 0.25 };
const UNIFORM_CLEAR: ColorRgb = ColorRgb { r: 0.1, g: 0.1, b: 0.1 };

/// Display sink: receives the finished packed-RGB frame once per frame
pub trait PresentTarget {
    fn present(&mut self, width: usize, height: usize, pixels: &[u32]);
}

/// Seam for an externally constructed hardware pipeline. The orchestrator
/// hands it the same scene and configuration the software path consumes;
/// everything else (devices, swapchains, presentation) is its own business.
pub trait HardwareBackend {
    fn render(&mut self, meshes: &[Mesh], camera: &Camera, config: &RenderConfig);
}

/// Frame orchestrator: owns the framebuffer and drives one full frame at a
/// time through whichever pipeline the configuration selects.
pub struct Renderer {
    framebuffer: Framebuffer,
    hardware: Option<Box<dyn HardwareBackend>>,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            framebuffer: Framebuffer::new(width, height),
            hardware: None,
        }
    }

    pub fn with_hardware_backend(mut self, backend: Box<dyn HardwareBackend>) -> Self {
        self.hardware = Some(backend);
        self
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Render one frame. The software path resolves into the internal
    /// framebuffer and presents it; the hardware path delegates wholesale.
    pub fn render(
        &mut self,
        meshes: &[Mesh],
        camera: &Camera,
        config: &RenderConfig,
        target: &mut dyn PresentTarget,
    ) {
        match config.render_method {
            RenderMethod::Hardware => match &mut self.hardware {
                Some(backend) => backend.render(meshes, camera, config),
                None => warn!("hardware rendering selected but no backend is installed"),
            },
            RenderMethod::Software => {
                self.render_software(meshes, camera, config);
                target.present(
                    self.framebuffer.width(),
                    self.framebuffer.height(),
                    self.framebuffer.pixels(),
                );
            }
        }
    }

    fn render_software(&mut self, meshes: &[Mesh], camera: &Camera, config: &RenderConfig) {
        let clear = if config.uniform_clear_color {
            UNIFORM_CLEAR
        } else {
            SOFTWARE_CLEAR
        };
        self.framebuffer.clear(clear);

        let mut frame_range = DepthRange::empty();
        for mesh in meshes {
            if mesh.effect.is_transparent() {
                continue;
            }
            let triangles = assemble_triangles(
                mesh,
                camera,
                self.framebuffer.width() as f32,
                self.framebuffer.height() as f32,
            );
            trace!(triangles = triangles.len(), "mesh assembled");
            if triangles.is_empty() {
                continue;
            }

            // each band owns its rows exclusively, so triangle traversal
            // inside a band is free of any cross-task sharing
            let range = self
                .framebuffer
                .par_bands(BAND_HEIGHT)
                .map(|mut band| {
                    let mut band_range = DepthRange::empty();
                    for triangle in &triangles {
                        rasterize_triangle(&mut band, triangle, mesh, config, &mut band_range);
                    }
                    band_range
                })
                .reduce(DepthRange::empty, DepthRange::merged);
            frame_range = frame_range.merged(range);
        }

        if config.show_depth_buffer {
            self.framebuffer.apply_depth_overlay(frame_range);
        }
    }
}

/// Advance per-frame animation: the camera from its input deltas, and the
/// meshes' self-rotation when enabled.
pub fn update_scene(
    meshes: &mut [Mesh],
    camera: &mut Camera,
    delta_time: f32,
    input: &CameraInput,
    config: &RenderConfig,
) {
    camera.update(delta_time, input);
    if config.rotate_meshes {
        for mesh in meshes.iter_mut() {
            mesh.rotate_y(MESH_SPIN_SPEED * delta_time);
        }
    }
}

/// Map one model-space vertex to screen space and flag whether it landed
/// inside the view frustum.
fn transform_vertex(
    vertex: &Vertex,
    world: &Mat4,
    world_view_projection: &Mat4,
    frustum: &Frustum,
    camera_origin: Vec3,
    width: f32,
    height: f32,
) -> (VertexOut, bool) {
    let clip = world_view_projection.transform_point4(Vec4::from_point(vertex.position));

    // vertices at or behind the camera must not divide by zero
    let divisor = clip.w.max(MIN_CLIP_W);
    let ndc = Vec3::new(clip.x / divisor, clip.y / divisor, clip.z / divisor);
    let inside = frustum.contains(ndc, vertex.position);

    // pixel coordinates with a top-left origin; z keeps normalized depth
    // and w the clip-space depth for perspective correction
    let position = Vec4::new(
        (ndc.x + 1.0) * 0.5 * width,
        (1.0 - ndc.y) * 0.5 * height,
        ndc.z,
        clip.w,
    );

    let out = VertexOut {
        position,
        uv: vertex.uv,
        normal: world.transform_vector(vertex.normal).normalize(),
        tangent: world.transform_vector(vertex.tangent).normalize(),
        view_direction: (world.transform_point(vertex.position) - camera_origin).normalize(),
    };
    (out, inside)
}

/// Walk the mesh's index buffer into screen-space triangles, skipping
/// degenerate triples and triangles with no vertex inside the frustum.
fn assemble_triangles(mesh: &Mesh, camera: &Camera, width: f32, height: f32) -> Vec<Triangle> {
    let world_view_projection = mesh.world * camera.view_matrix * camera.projection_matrix;
    let frustum = Frustum::from_matrix(&world_view_projection);

    let indices = mesh.indices();
    let vertices = mesh.vertices();
    let strip = mesh.topology() == PrimitiveTopology::TriangleStrip;
    let step = if strip { 1 } else { 3 };

    let mut triangles = Vec::with_capacity(indices.len() / 3);
    let mut cursor = 0;
    while cursor + 2 < indices.len() {
        // strips alternate winding on odd triangles
        let odd = strip && cursor % 2 == 1;
        let (i0, i1, i2) = if odd {
            (indices[cursor], indices[cursor + 2], indices[cursor + 1])
        } else {
            (indices[cursor], indices[cursor + 1], indices[cursor + 2])
        };
        cursor += step;

        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }

        let mut outside = 0;
        let transformed = [i0, i1, i2].map(|index| {
            let (vertex, inside) = transform_vertex(
                &vertices[index as usize],
                &mesh.world,
                &world_view_projection,
                &frustum,
                camera.origin,
                width,
                height,
            );
            if !inside {
                outside += 1;
            }
            vertex
        });

        // partially visible triangles still rasterize; the screen bounding
        // box and per-pixel test clip them naturally
        if outside == 3 {
            continue;
        }

        triangles.push(Triangle {
            vertices: transformed,
        });
    }
    triangles
}

/// Normalized signed edge functions of `point` against the triangle's
/// three directed edges. For any point in the plane they sum to +1 or -1
/// (the triangle's winding sign); a point is covered exactly when all
/// three share that sign. Each value is the barycentric weight of the
/// vertex opposite its edge, up to sign.
fn edge_weights(point: Vec2, v0: Vec2, v1: Vec2, v2: Vec2, doubled_area: f32) -> [f32; 3] {
    [
        (v1 - v0).cross(point - v0) / doubled_area,
        (v2 - v1).cross(point - v1) / doubled_area,
        (v0 - v2).cross(point - v2) / doubled_area,
    ]
}

/// Rasterize one triangle into the rows a band owns.
fn rasterize_triangle(
    band: &mut Band<'_>,
    triangle: &Triangle,
    mesh: &Mesh,
    config: &RenderConfig,
    depth_range: &mut DepthRange,
) {
    let [v0, v1, v2] = &triangle.vertices;
    let p0 = Vec2::new(v0.position.x, v0.position.y);
    let p1 = Vec2::new(v1.position.x, v1.position.y);
    let p2 = Vec2::new(v2.position.x, v2.position.y);

    let width = band.width();
    let min_x = p0.x.min(p1.x).min(p2.x).max(0.0).floor() as usize;
    let max_x = p0.x.max(p1.x).max(p2.x).min(width as f32).ceil() as usize;
    let min_y = p0.y.min(p1.y).min(p2.y).max(0.0).floor() as usize;
    let max_y = p0.y.max(p1.y).max(p2.y).ceil() as usize;

    // clip the bounding box to this band's rows
    let rows = band.rows();
    let y_start = min_y.max(rows.start);
    let y_end = max_y.min(rows.end);
    if y_start >= y_end || min_x >= max_x {
        return;
    }

    if config.show_bounding_box {
        let white = ColorRgb::WHITE.to_packed();
        for y in y_start..y_end {
            for x in min_x..max_x {
                band.set_pixel(x, y, white);
            }
        }
        return;
    }

    let doubled_area = (p1 - p0).cross(p2 - p0).abs();
    if doubled_area < MIN_TRIANGLE_AREA {
        return;
    }

    for y in y_start..y_end {
        for x in min_x..max_x {
            let point = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let edges = edge_weights(point, p0, p1, p2, doubled_area);

            let sum = edges[0] + edges[1] + edges[2];
            if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON && (sum + 1.0).abs() > WEIGHT_SUM_EPSILON {
                continue;
            }

            let all_non_negative = edges.iter().all(|&e| e >= 0.0);
            let all_negative = edges.iter().all(|&e| e < 0.0);
            let covered = match config.cull_mode {
                CullMode::Back => all_non_negative,
                CullMode::Front => all_negative,
                CullMode::None => all_non_negative || all_negative,
            };
            if !covered {
                continue;
            }

            // each vertex's barycentric weight is the edge function
            // opposite it
            let weights = [edges[1].abs(), edges[2].abs(), edges[0].abs()];

            let depth = 1.0
                / (weights[0] / v0.position.z
                    + weights[1] / v1.position.z
                    + weights[2] / v2.position.z);
            if !depth.is_finite() || !(0.0..=1.0).contains(&depth) {
                continue;
            }
            if !band.depth_test_set(x, y, depth) {
                continue;
            }
            depth_range.observe(depth);

            if config.show_depth_buffer {
                // the overlay pass reads the depth buffer after the frame
                continue;
            }

            // perspective-correct interpolation: weight by 1/w, normalize
            // by the accumulated sum
            let inv_w = [
                weights[0] / v0.position.w,
                weights[1] / v1.position.w,
                weights[2] / v2.position.w,
            ];
            let interpolated_w = 1.0 / (inv_w[0] + inv_w[1] + inv_w[2]);
            if !interpolated_w.is_finite() {
                continue;
            }

            let uv = (v0.uv * inv_w[0] + v1.uv * inv_w[1] + v2.uv * inv_w[2]) * interpolated_w;
            let normal =
                (v0.normal * inv_w[0] + v1.normal * inv_w[1] + v2.normal * inv_w[2]) * interpolated_w;
            let tangent = (v0.tangent * inv_w[0] + v1.tangent * inv_w[1] + v2.tangent * inv_w[2])
                * interpolated_w;
            let view_direction = (v0.view_direction * inv_w[0]
                + v1.view_direction * inv_w[1]
                + v2.view_direction * inv_w[2])
                * interpolated_w;

            let fragment = Fragment {
                uv,
                normal: normal.normalize(),
                tangent: tangent.normalize(),
                view_direction: view_direction.normalize(),
            };
            let sampled = mesh.diffuse_map().sample(uv);
            let color = shade_pixel(&fragment, sampled, mesh, config).max_to_one();
            band.set_pixel(x, y, color.to_packed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TextureSet;
    use crate::types::{EffectKind, ShadingMode, Texture};
    use approx::assert_relative_eq;

    const SIZE: usize = 64;

    struct CaptureTarget {
        pixels: Vec<u32>,
        presents: usize,
    }

    impl CaptureTarget {
        fn new() -> Self {
            Self {
                pixels: Vec::new(),
                presents: 0,
            }
        }
    }

    impl PresentTarget for CaptureTarget {
        fn present(&mut self, _width: usize, _height: usize, pixels: &[u32]) {
            self.pixels = pixels.to_vec();
            self.presents += 1;
        }
    }

    fn test_camera() -> Camera {
        Camera::new(90.0, Vec3::ZERO, 1.0)
    }

    fn facing_vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(
            Vec3::new(x, y, z),
            Vec2::new((x + 2.0) / 4.0, (y + 2.0) / 4.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::UNIT_X,
        )
    }

    fn quad_with_indices(z: f32, diffuse: ColorRgb, indices: Vec<u32>) -> Mesh {
        let vertices = vec![
            facing_vertex(-2.0, -2.0, z),
            facing_vertex(2.0, -2.0, z),
            facing_vertex(2.0, 2.0, z),
            facing_vertex(-2.0, 2.0, z),
        ];
        Mesh::new(
            vertices,
            indices,
            PrimitiveTopology::TriangleList,
            TextureSet::with_diffuse(Texture::solid(diffuse)),
        )
        .unwrap()
    }

    /// A quad at depth `z` facing the camera, wound so Back culling keeps it
    fn facing_quad(z: f32, diffuse: ColorRgb) -> Mesh {
        quad_with_indices(z, diffuse, vec![0, 2, 1, 0, 3, 2])
    }

    fn software_config() -> RenderConfig {
        RenderConfig {
            rotate_meshes: false,
            light_intensity: 1.0,
            ..RenderConfig::default()
        }
    }

    fn rendered_pixels(meshes: &[Mesh], config: &RenderConfig) -> (Renderer, Vec<u32>) {
        let mut renderer = Renderer::new(SIZE, SIZE);
        let mut target = CaptureTarget::new();
        renderer.render(meshes, &test_camera(), config, &mut target);
        (renderer, target.pixels)
    }

    fn covered_count(pixels: &[u32]) -> usize {
        let clear = SOFTWARE_CLEAR.to_packed();
        pixels.iter().filter(|&&p| p != clear).count()
    }

    #[test]
    fn vertex_round_trips_to_screen_center() {
        let camera = test_camera();
        let wvp = Mat4::IDENTITY * camera.view_matrix * camera.projection_matrix;
        let frustum = Frustum::from_matrix(&wvp);
        let vertex = Vertex::from_position(0.0, 0.0, 10.0);
        let (out, inside) = transform_vertex(
            &vertex,
            &Mat4::IDENTITY,
            &wvp,
            &frustum,
            camera.origin,
            SIZE as f32,
            SIZE as f32,
        );
        assert!(inside);
        assert_relative_eq!(out.position.x, SIZE as f32 / 2.0, epsilon = 1e-3);
        assert_relative_eq!(out.position.y, SIZE as f32 / 2.0, epsilon = 1e-3);
        // near=1, far=100: z=10 lands at (10 - 1) * 100 / 99 / 10
        assert_relative_eq!(out.position.z, 900.0 / 990.0, epsilon = 1e-4);
        assert_relative_eq!(out.position.w, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn perspective_division_is_guarded_behind_the_camera() {
        let camera = test_camera();
        let wvp = Mat4::IDENTITY * camera.view_matrix * camera.projection_matrix;
        let frustum = Frustum::from_matrix(&wvp);
        let vertex = Vertex::from_position(0.0, 0.0, -5.0);
        let (out, inside) = transform_vertex(
            &vertex,
            &Mat4::IDENTITY,
            &wvp,
            &frustum,
            camera.origin,
            SIZE as f32,
            SIZE as f32,
        );
        assert!(!inside);
        assert!(out.position.x.is_finite());
        assert!(out.position.y.is_finite());
        assert!(out.position.z.is_finite());
    }

    #[test]
    fn edge_weights_sum_to_winding_sign() {
        let v0 = Vec2::new(10.0, 10.0);
        let v1 = Vec2::new(50.0, 10.0);
        let v2 = Vec2::new(30.0, 50.0);
        let area = (v1 - v0).cross(v2 - v0).abs();

        let inside = edge_weights(Vec2::new(30.0, 20.0), v0, v1, v2, area);
        let sum: f32 = inside.iter().sum();
        assert_relative_eq!(sum.abs(), 1.0, epsilon = 1e-4);
        assert!(inside.iter().all(|&e| e >= 0.0) || inside.iter().all(|&e| e < 0.0));

        // reversing the winding flips every sign
        let reversed = edge_weights(Vec2::new(30.0, 20.0), v0, v2, v1, area);
        let reversed_sum: f32 = reversed.iter().sum();
        assert_relative_eq!(sum + reversed_sum, 0.0, epsilon = 1e-4);

        let outside = edge_weights(Vec2::new(5.0, 5.0), v0, v1, v2, area);
        assert!(!outside.iter().all(|&e| e >= 0.0) && !outside.iter().all(|&e| e < 0.0));
    }

    #[test]
    fn triangle_list_skips_degenerate_triples() {
        let mesh = Mesh::new(
            vec![
                facing_vertex(-2.0, -2.0, 10.0),
                facing_vertex(2.0, -2.0, 10.0),
                facing_vertex(2.0, 2.0, 10.0),
            ],
            vec![0, 0, 1, 0, 2, 1],
            PrimitiveTopology::TriangleList,
            TextureSet::with_diffuse(Texture::solid(ColorRgb::WHITE)),
        )
        .unwrap();
        let triangles = assemble_triangles(&mesh, &test_camera(), SIZE as f32, SIZE as f32);
        assert_eq!(triangles.len(), 1);
    }

    #[test]
    fn triangle_strip_alternates_winding() {
        let mesh = Mesh::new(
            vec![
                facing_vertex(-2.0, -2.0, 10.0),
                facing_vertex(-2.0, 2.0, 10.0),
                facing_vertex(0.0, -2.0, 10.0),
                facing_vertex(0.0, 2.0, 10.0),
                facing_vertex(2.0, -2.0, 10.0),
            ],
            vec![0, 1, 2, 3, 4],
            PrimitiveTopology::TriangleStrip,
            TextureSet::with_diffuse(Texture::solid(ColorRgb::WHITE)),
        )
        .unwrap();
        let triangles = assemble_triangles(&mesh, &test_camera(), SIZE as f32, SIZE as f32);
        assert_eq!(triangles.len(), 3);

        // consistent orientation: every strip triangle must present the
        // same facing, so the signed area sign matches across all three
        let signs: Vec<bool> = triangles
            .iter()
            .map(|t| {
                let p: Vec<Vec2> = t
                    .vertices
                    .iter()
                    .map(|v| Vec2::new(v.position.x, v.position.y))
                    .collect();
                (p[1] - p[0]).cross(p[2] - p[0]) > 0.0
            })
            .collect();
        assert!(signs.iter().all(|&s| s == signs[0]));
    }

    #[test]
    fn fully_outside_triangles_are_dropped() {
        let mesh = facing_quad(-20.0, ColorRgb::WHITE);
        let triangles = assemble_triangles(&mesh, &test_camera(), SIZE as f32, SIZE as f32);
        assert!(triangles.is_empty());
    }

    #[test]
    fn cull_modes_select_exactly_one_winding() {
        let front_facing = facing_quad(10.0, ColorRgb::WHITE);
        // the same geometry presented with the opposite winding
        let back_facing = quad_with_indices(10.0, ColorRgb::WHITE, vec![0, 1, 2, 0, 2, 3]);

        let count = |mesh: &Mesh, cull_mode: CullMode| {
            let config = RenderConfig {
                cull_mode,
                ..software_config()
            };
            let (_, pixels) = rendered_pixels(std::slice::from_ref(mesh), &config);
            covered_count(&pixels)
        };

        assert!(count(&front_facing, CullMode::Back) > 0);
        assert_eq!(count(&back_facing, CullMode::Back), 0);

        assert_eq!(count(&front_facing, CullMode::Front), 0);
        assert!(count(&back_facing, CullMode::Front) > 0);

        assert!(count(&front_facing, CullMode::None) > 0);
        assert!(count(&back_facing, CullMode::None) > 0);
    }

    #[test]
    fn depth_test_keeps_the_nearest_fragment() {
        let near = facing_quad(10.0, ColorRgb::new(1.0, 0.0, 0.0));
        let far = facing_quad(20.0, ColorRgb::new(0.0, 1.0, 0.0));
        let config = RenderConfig {
            shading_mode: ShadingMode::Diffuse,
            light_intensity: std::f32::consts::PI,
            ..software_config()
        };

        // far drawn after near must still lose the depth test
        let (renderer, pixels) = rendered_pixels(&[near, far], &config);
        let center = pixels[SIZE / 2 * SIZE + SIZE / 2];
        assert_eq!(center, ColorRgb::new(1.0, 0.0, 0.0).to_packed());

        let expected_depth = (10.0 - 1.0) * (100.0 / 99.0) / 10.0;
        let depth = renderer.framebuffer().depth_at(SIZE / 2, SIZE / 2).unwrap();
        assert_relative_eq!(depth, expected_depth, epsilon = 1e-4);
        assert!((0.0..=1.0).contains(&depth));
    }

    #[test]
    fn end_to_end_quad_matches_analytic_shading() {
        let mesh = facing_quad(10.0, ColorRgb::WHITE);
        let config = software_config();
        let (renderer, pixels) = rendered_pixels(std::slice::from_ref(&mesh), &config);

        // diffuse + (absent) specular for a white albedo facing the camera
        let observed_area = Vec3::new(0.0, 0.0, -1.0).dot(-config.light_direction);
        let expected = (ColorRgb::WHITE * (config.light_intensity / std::f32::consts::PI)
            * observed_area)
            .max_to_one()
            .to_packed();

        let clear = SOFTWARE_CLEAR.to_packed();
        let covered: Vec<usize> = pixels
            .iter()
            .enumerate()
            .filter(|(_, &p)| p != clear)
            .map(|(i, _)| i)
            .collect();
        assert!(!covered.is_empty());
        assert!(covered.iter().all(|&i| pixels[i] == expected));

        // the quad is perpendicular to the view axis: one depth everywhere
        let expected_depth = (10.0 - 1.0) * (100.0 / 99.0) / 10.0;
        for &i in &covered {
            let depth = renderer
                .framebuffer()
                .depth_at(i % SIZE, i / SIZE)
                .unwrap();
            assert_relative_eq!(depth, expected_depth, epsilon = 1e-4);
        }
    }

    #[test]
    fn uv_interpolation_samples_across_the_texture() {
        let vertices = vec![
            facing_vertex(-2.0, -2.0, 10.0),
            facing_vertex(2.0, -2.0, 10.0),
            facing_vertex(2.0, 2.0, 10.0),
            facing_vertex(-2.0, 2.0, 10.0),
        ];
        let mesh = Mesh::new(
            vertices,
            vec![0, 2, 1, 0, 3, 2],
            PrimitiveTopology::TriangleList,
            TextureSet::with_diffuse(Texture::checkerboard(8, 8, ColorRgb::WHITE, ColorRgb::BLACK)),
        )
        .unwrap();
        // diffuse mode with intensity pi passes the sampled color through
        let config = RenderConfig {
            shading_mode: ShadingMode::Diffuse,
            light_intensity: std::f32::consts::PI,
            ..software_config()
        };
        let (_, pixels) = rendered_pixels(std::slice::from_ref(&mesh), &config);
        let white = pixels.iter().filter(|&&p| p == ColorRgb::WHITE.to_packed()).count();
        let black = pixels.iter().filter(|&&p| p == ColorRgb::BLACK.to_packed()).count();
        assert!(white > 0, "expected some pixels from the light checker cells");
        assert!(black > 0, "expected some pixels from the dark checker cells");
    }

    #[test]
    fn depth_visualization_overlays_grayscale() {
        let mesh = facing_quad(10.0, ColorRgb::WHITE);
        let config = RenderConfig {
            show_depth_buffer: true,
            ..software_config()
        };
        let (_, pixels) = rendered_pixels(std::slice::from_ref(&mesh), &config);
        // a planar quad has zero depth spread, which remaps to mid-gray
        let center = pixels[SIZE / 2 * SIZE + SIZE / 2];
        assert_eq!(center, ColorRgb::new(0.5, 0.5, 0.5).to_packed());
    }

    #[test]
    fn bounding_box_visualization_fills_the_box() {
        let mesh = facing_quad(10.0, ColorRgb::new(1.0, 0.0, 0.0));
        let config = RenderConfig {
            show_bounding_box: true,
            ..software_config()
        };
        let (_, pixels) = rendered_pixels(std::slice::from_ref(&mesh), &config);
        let white = ColorRgb::WHITE.to_packed();
        // the quad spans ndc [-0.2, 0.2]: its box covers the screen center
        assert_eq!(pixels[SIZE / 2 * SIZE + SIZE / 2], white);
    }

    #[test]
    fn uniform_clear_color_replaces_the_default_background() {
        let config = RenderConfig {
            uniform_clear_color: true,
            ..software_config()
        };
        let (_, pixels) = rendered_pixels(&[], &config);
        assert!(pixels.iter().all(|&p| p == UNIFORM_CLEAR.to_packed()));
    }

    #[test]
    fn transparent_meshes_are_skipped_by_the_software_path() {
        let mut mesh = facing_quad(10.0, ColorRgb::WHITE);
        mesh.effect = EffectKind::Transparent;
        let (_, pixels) = rendered_pixels(std::slice::from_ref(&mesh), &software_config());
        assert_eq!(covered_count(&pixels), 0);
    }

    #[test]
    fn hardware_method_without_backend_presents_nothing() {
        let mesh = facing_quad(10.0, ColorRgb::WHITE);
        let config = RenderConfig {
            render_method: RenderMethod::Hardware,
            ..software_config()
        };
        let mut renderer = Renderer::new(SIZE, SIZE);
        let mut target = CaptureTarget::new();
        renderer.render(std::slice::from_ref(&mesh), &test_camera(), &config, &mut target);
        assert_eq!(target.presents, 0);
    }

    #[test]
    fn hardware_method_delegates_to_the_backend() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct CountingBackend(Rc<Cell<usize>>);
        impl HardwareBackend for CountingBackend {
            fn render(&mut self, _meshes: &[Mesh], _camera: &Camera, _config: &RenderConfig) {
                self.0.set(self.0.get() + 1);
            }
        }

        let calls = Rc::new(Cell::new(0));
        let mut renderer =
            Renderer::new(SIZE, SIZE).with_hardware_backend(Box::new(CountingBackend(calls.clone())));
        let config = RenderConfig {
            render_method: RenderMethod::Hardware,
            ..software_config()
        };
        let mut target = CaptureTarget::new();
        renderer.render(&[], &test_camera(), &config, &mut target);
        assert_eq!(calls.get(), 1);
        assert_eq!(target.presents, 0);
    }

    #[test]
    fn update_scene_advances_camera_and_meshes() {
        let mut meshes = vec![facing_quad(10.0, ColorRgb::WHITE)];
        let mut camera = test_camera();
        let config = RenderConfig {
            rotate_meshes: true,
            ..RenderConfig::default()
        };
        let input = CameraInput {
            forward: 1.0,
            ..CameraInput::default()
        };
        update_scene(&mut meshes, &mut camera, 0.5, &input, &config);
        assert_relative_eq!(camera.origin.z, 2.5, epsilon = 1e-4);
        // half a second of spin shows up in the world matrix
        let rotated = meshes[0].world.transform_vector(Vec3::UNIT_X);
        assert_relative_eq!(rotated.x, 0.5f32.cos(), epsilon = 1e-4);
    }
}
