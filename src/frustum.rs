//! Frustum plane extraction and point containment

use crate::math::{Mat4, Vec3, Vec4};

/// A plane in constant-normal form: `dot(normal, p) + distance == 0`
#[derive(Debug, Clone, Copy, Default)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Signed distance of a point from the plane; non-negative on the
    /// inside half-space.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// The six clip planes of a view volume, in the space the extraction
/// matrix transforms *from* (model space for a composed
/// world-view-projection matrix).
#[derive(Debug, Clone, Copy, Default)]
pub struct Frustum {
    pub near: Plane,
    pub far: Plane,
    pub left: Plane,
    pub right: Plane,
    pub top: Plane,
    pub bottom: Plane,
}

impl Frustum {
    /// Extract planes from a composed (view-)projection matrix by the
    /// Gribb-Hartmann combinations. Under the row-vector convention each
    /// clip component of `v * M` is the dot of `v` with a matrix column,
    /// so the plane coefficients are column sums and differences; the
    /// variant for a [0, 1] depth range takes the z column alone as the
    /// near plane. Each plane is normalized so its normal has unit length.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let [col_x, col_y, col_z, col_w] = matrix.columns();
        Self {
            near: Self::normalized_plane(col_z),
            far: Self::normalized_plane(col_w - col_z),
            left: Self::normalized_plane(col_w + col_x),
            right: Self::normalized_plane(col_w - col_x),
            bottom: Self::normalized_plane(col_w + col_y),
            top: Self::normalized_plane(col_w - col_y),
        }
    }

    fn normalized_plane(coefficients: Vec4) -> Plane {
        let normal = coefficients.xyz();
        // a degenerate row would otherwise divide to NaN
        let magnitude = normal.len().max(1e-6);
        Plane {
            normal: normal.scale(1.0 / magnitude),
            distance: coefficients.w / magnitude,
        }
    }

    /// Visibility test for a transformed vertex: a fast box reject on its
    /// perspective-divided position, then validation of the pre-transform
    /// position against all six planes. Any single plane violation rejects
    /// the point.
    pub fn contains(&self, ndc: Vec3, point: Vec3) -> bool {
        if ndc.x < -1.0
            || ndc.x > 1.0
            || ndc.y < -1.0
            || ndc.y > 1.0
            || ndc.z < 0.0
            || ndc.z > 1.0
        {
            return false;
        }

        self.planes()
            .iter()
            .all(|plane| plane.signed_distance(point) >= 0.0)
    }

    pub fn planes(&self) -> [Plane; 6] {
        [self.near, self.far, self.left, self.right, self.top, self.bottom]
    }
}
