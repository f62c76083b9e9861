use crate::math::Vec3;
use std::f32::consts::TAU;

/// Per-tick increments of the two rotation angles.
pub const DELTA_A: f32 = 0.07;
pub const DELTA_B: f32 = 0.03;

/// Orientation of the torus for one frame: `a` about the X axis, then `b`
/// about the Z axis. Angles are kept within one turn, `[0, 2π)`, so f32
/// precision holds up however long the animation runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub a: f32,
    pub b: f32,
}

impl Rotation {
    pub fn new(a: f32, b: f32) -> Self {
        Self { a, b }
    }

    pub fn advanced(self, delta_a: f32, delta_b: f32) -> Self {
        Self::new(
            (self.a + delta_a).rem_euclid(TAU),
            (self.b + delta_b).rem_euclid(TAU),
        )
    }

    /// Trig terms shared by every sample of a frame.
    pub fn basis(&self) -> RotationBasis {
        RotationBasis {
            a: self.a.sin_cos(),
            b: self.b.sin_cos(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationBasis {
    a: (f32, f32),
    b: (f32, f32),
}

impl RotationBasis {
    pub fn apply(&self, v: Vec3) -> Vec3 {
        v.rotate_x(self.a).rotate_z(self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rotation_is_identity() {
        let v = Vec3::new(1.5, -0.25, 0.75);
        assert_eq!(Rotation::default().basis().apply(v), v);
    }

    #[test]
    fn ten_reference_ticks_accumulate() {
        let mut rotation = Rotation::default();
        for _ in 0..10 {
            rotation = rotation.advanced(DELTA_A, DELTA_B);
        }
        assert!((rotation.a - 0.7).abs() < 1e-5);
        assert!((rotation.b - 0.3).abs() < 1e-5);
    }

    #[test]
    fn angles_keep_advancing_after_long_uptime() {
        // Roughly ten days of 50 ms ticks.
        let ticks = 17.5e6_f32;
        let start = Rotation::new(DELTA_A * ticks, DELTA_B * ticks).advanced(DELTA_A, DELTA_B);
        assert!((0.0..TAU).contains(&start.a), "{start:?}");
        assert!((0.0..TAU).contains(&start.b), "{start:?}");

        let mut rotation = start;
        for _ in 0..100 {
            let next = rotation.advanced(DELTA_A, DELTA_B);
            let step_a = (next.a - rotation.a).rem_euclid(TAU);
            let step_b = (next.b - rotation.b).rem_euclid(TAU);
            assert!((step_a - DELTA_A).abs() < 1e-5, "A stepped by {step_a}");
            assert!((step_b - DELTA_B).abs() < 1e-5, "B stepped by {step_b}");
            rotation = next;
        }
    }

    #[test]
    fn negative_increments_wrap_into_one_turn() {
        let rotation = Rotation::default().advanced(-DELTA_A, -DELTA_B);
        assert!((rotation.a - (TAU - DELTA_A)).abs() < 1e-5);
        assert!((rotation.b - (TAU - DELTA_B)).abs() < 1e-5);
        let (sin, cos) = rotation.a.sin_cos();
        assert!((sin + DELTA_A.sin()).abs() < 1e-5 && (cos - DELTA_A.cos()).abs() < 1e-5);
    }

    #[test]
    fn x_rotation_happens_before_z_rotation() {
        let quarter = std::f32::consts::FRAC_PI_2;
        let basis = Rotation::new(quarter, quarter).basis();
        // +Z tips to -Y about X, then -Y turns to +X about Z.
        let rotated = basis.apply(Vec3::new(0.0, 0.0, 1.0));
        assert!((rotated - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5, "{rotated:?}");
    }
}
