use crate::math::Vec3;
use std::f32::consts::TAU;

// --- Torus surface sampler ---

pub const RING_RADIUS: f32 = 2.0;
pub const TUBE_RADIUS: f32 = 1.0;
/// Sweep around the ring axis. Finer, since the ring is the long way round.
pub const THETA_STEP: f32 = 0.02;
/// Sweep around the tube cross-section.
pub const PHI_STEP: f32 = 0.07;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub theta: f32,
    pub phi: f32,
    /// Rest-frame position on the surface.
    pub point: Vec3,
    /// Rest-frame unit normal.
    pub normal: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    pub ring_radius: f32,
    pub tube_radius: f32,
    pub theta_step: f32,
    pub phi_step: f32,
}

impl Default for Torus {
    fn default() -> Self {
        Self {
            ring_radius: RING_RADIUS,
            tube_radius: TUBE_RADIUS,
            theta_step: THETA_STEP,
            phi_step: PHI_STEP,
        }
    }
}

fn steps_per_turn(step: f32) -> usize {
    (TAU / step).ceil().max(1.0) as usize
}

impl Torus {
    pub fn theta_count(&self) -> usize {
        steps_per_turn(self.theta_step)
    }

    pub fn phi_count(&self) -> usize {
        steps_per_turn(self.phi_step)
    }

    pub fn sample_count(&self) -> usize {
        self.theta_count() * self.phi_count()
    }

    /// Largest distance of any surface point from the torus center.
    #[cfg(test)]
    pub fn bounding_radius(&self) -> f32 {
        self.ring_radius + self.tube_radius
    }

    pub fn sample_at(&self, theta: f32, phi: f32) -> SurfaceSample {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();

        // Distance from the ring axis for this point of the tube circle.
        let reach = self.ring_radius + self.tube_radius * cos_phi;

        SurfaceSample {
            theta,
            phi,
            point: Vec3::new(
                reach * cos_theta,
                reach * sin_theta,
                self.tube_radius * sin_phi,
            ),
            normal: Vec3::new(cos_phi * cos_theta, cos_phi * sin_theta, sin_phi),
        }
    }

    /// Enumerates the full parametric grid, tube angle outermost.
    ///
    /// Angles are derived from integer indices so every frame visits exactly
    /// the same samples in exactly the same order.
    pub fn samples(&self) -> impl Iterator<Item = SurfaceSample> + '_ {
        let theta_count = self.theta_count();
        (0..self.phi_count()).flat_map(move |pi| {
            let phi = pi as f32 * self.phi_step;
            (0..theta_count).map(move |ti| self.sample_at(ti as f32 * self.theta_step, phi))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_grid_covers_one_full_turn() {
        let torus = Torus::default();
        assert_eq!(torus.theta_count(), 315);
        assert_eq!(torus.phi_count(), 90);
        assert_eq!(torus.samples().count(), torus.sample_count());

        let last = torus.samples().last().expect("grid is non-empty");
        assert!(last.theta < TAU);
        assert!(last.phi < TAU);
        assert!(last.theta + torus.theta_step >= TAU);
        assert!(last.phi + torus.phi_step >= TAU);
    }

    #[test]
    fn samples_lie_on_the_surface() {
        let torus = Torus::default();
        for sample in torus.samples().step_by(97) {
            let p = sample.point;
            let axis_distance = (p.x * p.x + p.y * p.y).sqrt();
            let tube_distance = ((axis_distance - torus.ring_radius).powi(2) + p.z * p.z).sqrt();
            assert!((tube_distance - torus.tube_radius).abs() < 1e-4, "{sample:?}");
            assert!(p.length() <= torus.bounding_radius() + 1e-4);
        }
    }

    #[test]
    fn normals_are_unit_and_point_outward_from_tube_center() {
        let torus = Torus::default();
        for sample in torus.samples().step_by(131) {
            assert!((sample.normal.length() - 1.0).abs() < 1e-5);
            let (sin_theta, cos_theta) = sample.theta.sin_cos();
            let tube_center = Vec3::new(
                torus.ring_radius * cos_theta,
                torus.ring_radius * sin_theta,
                0.0,
            );
            let outward = sample.point - tube_center;
            assert!(outward.dot(sample.normal) > 0.0);
        }
    }

    #[test]
    fn enumeration_is_restartable() {
        let torus = Torus::default();
        let first: Vec<SurfaceSample> = torus.samples().take(500).collect();
        let second: Vec<SurfaceSample> = torus.samples().take(500).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn tube_angle_is_the_outer_loop() {
        let torus = Torus::default();
        let mut iter = torus.samples();
        let a = iter.next().expect("first sample");
        let b = iter.next().expect("second sample");
        assert_eq!(a.phi, b.phi);
        assert!(b.theta > a.theta);
    }
}
