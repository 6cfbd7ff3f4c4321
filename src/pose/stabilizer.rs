//! Temporal smoothing of the per-frame pose targets.
//!
//! The stabilizer blends the previous frame's [`RigidPose`] with this frame's instantaneous
//! targets. Each channel has its own blend factor: a factor of 1.0 replaces the channel outright,
//! smaller factors apply a first-order low-pass filter (the same exponential blend as
//! [`filter::ema`](crate::filter::ema), with the pose itself as the filter state).
//!
//! By default only translation is smoothed; rotation and scale are replaced every frame. Whether
//! that asymmetry is a responsiveness feature or an oversight is an open product question, so it
//! is kept as-is and each factor is configurable instead.
//!
//! On frames without a detection the stabilizer is simply not invoked, leaving the pose
//! untouched (stale-hold).

use nalgebra::{UnitQuaternion, Vector3};

use crate::num::lerp;
use crate::pose::RigidPose;

/// Per-channel blend factors, each in [0, 1].
///
/// A factor of 0.0 freezes the channel, 1.0 replaces it with the target each frame. With a factor
/// `a`, convergence of a channel to within `eps` of a constant target takes on the order of
/// `log(delta / eps) / log(1 / (1 - a))` frames.
#[derive(Debug, Clone, Copy)]
pub struct SmoothingConfig {
    rotation: f32,
    translation: f32,
    scale: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            rotation: 1.0,
            translation: 0.5,
            scale: 1.0,
        }
    }
}

impl SmoothingConfig {
    /// Sets the rotation blend factor.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is not in between 0.0 and 1.0.
    #[inline]
    pub fn rotation(mut self, factor: f32) -> Self {
        assert!((0.0..=1.0).contains(&factor));
        self.rotation = factor;
        self
    }

    /// Sets the translation blend factor.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is not in between 0.0 and 1.0.
    #[inline]
    pub fn translation(mut self, factor: f32) -> Self {
        assert!((0.0..=1.0).contains(&factor));
        self.translation = factor;
        self
    }

    /// Sets the scale blend factor.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is not in between 0.0 and 1.0.
    #[inline]
    pub fn scale(mut self, factor: f32) -> Self {
        assert!((0.0..=1.0).contains(&factor));
        self.scale = factor;
        self
    }
}

/// This frame's raw pose targets, as produced by the orientation solver and placement mapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseTarget {
    pub rotation: UnitQuaternion<f32>,
    pub translation: Vector3<f32>,
    pub scale: f32,
}

/// Blends raw pose targets into the persistent pose.
#[derive(Debug, Default, Clone, Copy)]
pub struct PoseStabilizer {
    config: SmoothingConfig,
}

impl PoseStabilizer {
    pub fn new(config: SmoothingConfig) -> Self {
        Self { config }
    }

    /// Advances `pose` towards `target`, blending each channel by its configured factor.
    pub fn apply(&self, pose: &mut RigidPose, target: &PoseTarget) {
        pose.rotation = if self.config.rotation >= 1.0 {
            target.rotation
        } else {
            // Antipodal rotations have no unique blend path; snapping to the target keeps the
            // unit invariant.
            pose.rotation
                .try_slerp(&target.rotation, self.config.rotation, 1e-6)
                .unwrap_or(target.rotation)
        };
        pose.translation = pose
            .translation
            .lerp(&target.translation, self.config.translation);
        pose.scale = lerp(pose.scale, target.scale, self.config.scale);
    }
}
