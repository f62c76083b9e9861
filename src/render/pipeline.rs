use super::{Canvas, REFERENCE_HEIGHT, REFERENCE_WIDTH};
use crate::math::Vec3;
use crate::rotation::{Rotation, RotationBasis};
use crate::torus::{SurfaceSample, Torus};

// --- Projection ---

/// Distance from the viewer to the torus center. Larger than the torus'
/// bounding radius, so inverse depth stays positive for every sample.
pub const VIEWER_DISTANCE: f32 = 5.0;

// Placement on the 80x22 reference canvas; other sizes scale proportionally.
const REFERENCE_CENTER_X: f32 = 40.0;
const REFERENCE_CENTER_Y: f32 = 12.0;
const REFERENCE_SCALE_X: f32 = 30.0;
const REFERENCE_SCALE_Y: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub center_x: f32,
    pub center_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub viewer_distance: f32,
}

impl Projection {
    pub fn for_canvas(canvas: Canvas) -> Self {
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        Self {
            center_x: w * REFERENCE_CENTER_X / REFERENCE_WIDTH as f32,
            center_y: h * REFERENCE_CENTER_Y / REFERENCE_HEIGHT as f32,
            scale_x: w * REFERENCE_SCALE_X / REFERENCE_WIDTH as f32,
            scale_y: h * REFERENCE_SCALE_Y / REFERENCE_HEIGHT as f32,
            viewer_distance: VIEWER_DISTANCE,
        }
    }

    pub fn inverse_depth(&self, view: Vec3) -> f32 {
        1.0 / (self.viewer_distance + view.z)
    }

    /// Perspective-projects a view-space point to a screen cell, floored.
    /// The cell may lie off the canvas; bounds are the resolver's concern.
    pub fn project(&self, view: Vec3) -> (i32, i32, f32) {
        let inv_depth = self.inverse_depth(view);
        let x = (self.center_x + self.scale_x * inv_depth * view.x).floor() as i32;
        let y = (self.center_y + self.scale_y * inv_depth * view.y).floor() as i32;
        (x, y, inv_depth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedSample {
    pub x: i32,
    pub y: i32,
    pub inv_depth: f32,
    /// Normal after rotation, input to shading.
    pub normal: Vec3,
}

pub fn project_sample(
    sample: &SurfaceSample,
    basis: &RotationBasis,
    projection: &Projection,
) -> ProjectedSample {
    let view = basis.apply(sample.point);
    let (x, y, inv_depth) = projection.project(view);
    ProjectedSample {
        x,
        y,
        inv_depth,
        normal: basis.apply(sample.normal),
    }
}

/// Every surface sample of the torus, rotated and projected, in sampling order.
pub fn project_samples<'a>(
    torus: &'a Torus,
    rotation: Rotation,
    projection: &'a Projection,
) -> impl Iterator<Item = ProjectedSample> + 'a {
    let basis = rotation.basis();
    torus
        .samples()
        .map(move |sample| project_sample(&sample, &basis, projection))
}
