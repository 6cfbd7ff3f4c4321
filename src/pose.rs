//! Per-frame pose estimation for the tracked object.
//!
//! Each frame with a usable hand detection is reduced to a [`RigidPose`] in three steps:
//! [`orientation`] derives a rotation from three 3D landmarks, [`placement`] derives translation
//! and scale from the corresponding 2D landmarks, and [`stabilizer`] blends both into the pose
//! carried over from the previous frame.

pub mod orientation;
pub mod placement;
pub mod stabilizer;

use nalgebra::{UnitQuaternion, Vector3};

use crate::landmark::LandmarkIdx;

/// The rigid transform applied to the virtual object.
///
/// This is the only state that persists across frames. It starts out at the rest pose and is
/// mutated in place by the [`stabilizer`]; on frames without a detection it is left entirely
/// unchanged, so the object visibly freezes at its last known pose instead of snapping back.
///
/// Invariants: `rotation` is a unit quaternion, `scale` is positive, no component is ever NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidPose {
    pub rotation: UnitQuaternion<f32>,
    pub translation: Vector3<f32>,
    pub scale: f32,
}

impl Default for RigidPose {
    fn default() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
            scale: 1.0,
        }
    }
}

/// The landmark triple the pose is derived from.
///
/// `root` and `pivot` span the finger segment the object seats on; `tip` is the next joint up and
/// only contributes to the orientation. Defaults to the ring finger's MCP/PIP/DIP joints, which
/// places a ring on the lower segment of the ring finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerAnchors {
    pub root: LandmarkIdx,
    pub pivot: LandmarkIdx,
    pub tip: LandmarkIdx,
}

impl Default for FingerAnchors {
    fn default() -> Self {
        Self {
            root: LandmarkIdx::RingFingerMcp,
            pivot: LandmarkIdx::RingFingerPip,
            tip: LandmarkIdx::RingFingerDip,
        }
    }
}
