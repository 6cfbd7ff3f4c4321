//! Derives the tracked object's rotation from three hand landmarks.
//!
//! Three scene-space landmarks (the seating segment's `root` and `pivot` joints plus the next
//! joint up, `tip`) span a local frame of the finger. The solver computes the unit rotation that
//! carries the object's rest axes onto that frame.

use std::f32::consts::PI;

use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::landmark::Handedness;

/// Cross products and normalizations below this length are treated as degenerate.
const EPS: f32 = 1e-6;

/// Computes the rotation aligning the object's rest axes to the hand's local frame.
///
/// The rest frame is X = (1, 0, 0), Y = (0, 1, 0). The rotation is built in two steps: first the
/// rest Y axis is rotated onto `handY`, then the rotated X axis is rotated onto `handX`. Both
/// steps clamp their dot products and handle parallel/anti-parallel axes explicitly, so the
/// result is a finite unit quaternion for *any* input, including collinear or coincident
/// landmarks.
pub fn solve(
    root: Vector3<f32>,
    pivot: Vector3<f32>,
    tip: Vector3<f32>,
    handedness: Handedness,
) -> UnitQuaternion<f32> {
    let (hand_x, hand_y) = hand_frame(root, pivot, tip, handedness);

    let model_x = Vector3::x_axis();
    let model_y = Vector3::y_axis();

    let qy = align(&model_y, &hand_y);
    let rotated_x = Unit::new_normalize(qy * model_x.into_inner());
    let qx = align(&rotated_x, &hand_x);

    qx * qy
}

/// Builds the hand-local frame from the landmark triple.
///
/// `handX` points from the pivot towards the root joint. `handY` is the normalized cross product
/// of the two edge vectors; the operand order is swapped based on chirality so the frame's
/// handedness is the same for a left and a right hand.
pub fn hand_frame(
    root: Vector3<f32>,
    pivot: Vector3<f32>,
    tip: Vector3<f32>,
    handedness: Handedness,
) -> (Unit<Vector3<f32>>, Unit<Vector3<f32>>) {
    let to_root = root - pivot;
    let to_tip = tip - pivot;

    let hand_x = Unit::try_new(to_root, EPS).unwrap_or(Vector3::x_axis());
    let raw_y = match handedness {
        Handedness::Left => normalize_or_zero(to_tip).cross(&to_root),
        Handedness::Right => normalize_or_zero(to_root).cross(&to_tip),
    };
    // Collinear or coincident landmarks leave the palm normal undefined.
    let hand_y = Unit::try_new(raw_y, EPS).unwrap_or(Vector3::y_axis());

    (hand_x, hand_y)
}

/// Computes the rotation that carries `from` onto `to`.
///
/// The rotation axis is `from x to` and the angle is `acos(from . to)` with the dot product
/// clamped to [-1, 1]. When the cross product vanishes the vectors are parallel (angle 0) or
/// anti-parallel (angle pi about an arbitrary orthogonal axis).
fn align(from: &Unit<Vector3<f32>>, to: &Unit<Vector3<f32>>) -> UnitQuaternion<f32> {
    let dot = from.dot(to).clamp(-1.0, 1.0);
    match Unit::try_new(from.cross(to), EPS) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, dot.acos()),
        None if dot >= 0.0 => UnitQuaternion::identity(),
        None => UnitQuaternion::from_axis_angle(&orthogonal_to(from), PI),
    }
}

/// Returns an arbitrary unit vector orthogonal to `v`.
fn orthogonal_to(v: &Unit<Vector3<f32>>) -> Unit<Vector3<f32>> {
    let candidate = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    Unit::new_normalize(v.cross(&candidate))
}

fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(EPS).unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    // `acos` amplifies float error near parallel axes, so comparisons are looser than the usual
    // unit-norm tolerance.
    const TOLERANCE: f32 = 2e-3;

    fn random_rotation(rng: &mut fastrand::Rng) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(
            (rng.f32() - 0.5) * 2.0 * PI,
            (rng.f32() - 0.5) * 2.0 * PI,
            (rng.f32() - 0.5) * 2.0 * PI,
        )
    }

    fn random_point(rng: &mut fastrand::Rng) -> Vector3<f32> {
        Vector3::new(rng.f32() - 0.5, rng.f32() - 0.5, rng.f32() - 0.5) * 20.0
    }

    #[test]
    fn aligned_frame_yields_identity() {
        // handX = +X and handY = +Y: a right hand with the root along +X and the tip along -Z.
        let q = solve(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, -1.0),
            Handedness::Right,
        );
        assert_relative_eq!(q, UnitQuaternion::identity(), epsilon = TOLERANCE);
    }

    #[test]
    fn recovers_known_rotation() {
        let mut rng = fastrand::Rng::with_seed(0x5eed_0001);
        for _ in 0..200 {
            let expected = random_rotation(&mut rng);
            let pivot = random_point(&mut rng);
            // Rotate the canonical frame: root along the rotated X axis, tip along the rotated
            // -Z axis, which makes handY the rotated Y axis for a right hand.
            let root = pivot + expected * Vector3::x();
            let tip = pivot + expected * Vector3::new(0.0, 0.0, -1.0);

            let solved = solve(root, pivot, tip, Handedness::Right);
            assert!(
                solved.angle_to(&expected) < TOLERANCE,
                "expected {expected}, got {solved}"
            );
        }
    }

    #[test]
    fn output_is_always_a_unit_quaternion() {
        let mut rng = fastrand::Rng::with_seed(0x5eed_0002);
        for _ in 0..500 {
            let (root, pivot, tip) = (
                random_point(&mut rng),
                random_point(&mut rng),
                random_point(&mut rng),
            );
            for handedness in [Handedness::Left, Handedness::Right] {
                let q = solve(root, pivot, tip, handedness);
                assert!(q.coords.iter().all(|c| c.is_finite()), "NaN in {q}");
                assert_relative_eq!(q.coords.norm(), 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn collinear_edges_are_finite() {
        // pivot->root and pivot->tip point the same way; the palm normal is undefined.
        let q = solve(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::zeros(),
            Vector3::new(2.0, 0.0, 0.0),
            Handedness::Right,
        );
        assert!(q.coords.iter().all(|c| c.is_finite()));
        assert_relative_eq!(q.coords.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn coincident_landmarks_are_finite() {
        let p = Vector3::new(3.0, -2.0, 1.0);
        let q = solve(p, p, p, Handedness::Left);
        assert!(q.coords.iter().all(|c| c.is_finite()));
        assert_relative_eq!(q, UnitQuaternion::identity(), epsilon = TOLERANCE);
    }

    #[test]
    fn anti_parallel_axes_are_finite() {
        // handY comes out as -Y for this triple, putting `align` on its anti-parallel path.
        let q = solve(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 1.0),
            Handedness::Right,
        );
        assert!(q.coords.iter().all(|c| c.is_finite()));
        assert_relative_eq!(q.coords.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn chirality_flips_the_palm_normal() {
        let mut rng = fastrand::Rng::with_seed(0x5eed_0003);
        for _ in 0..100 {
            let (root, pivot, tip) = (
                random_point(&mut rng),
                random_point(&mut rng),
                random_point(&mut rng),
            );
            let (x_l, y_l) = hand_frame(root, pivot, tip, Handedness::Left);
            let (x_r, y_r) = hand_frame(root, pivot, tip, Handedness::Right);

            // handX only depends on the landmarks, handY mirrors with the chirality label.
            assert_relative_eq!(x_l.into_inner(), x_r.into_inner(), epsilon = TOLERANCE);
            assert_relative_eq!(y_l.dot(&y_r), -1.0, epsilon = TOLERANCE);
        }
    }
}
