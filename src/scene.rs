//! Renderer boundary and the tracked virtual object.
//!
//! The actual scene graph, camera and light rig live behind [`SceneRenderer`]; the pose pipeline
//! only writes one world transform per frame and requests a render plus a composite. The light
//! rig is camera-relative and set up once by the renderer at construction.

use nalgebra::{Matrix4, UnitQuaternion, Vector3};

use crate::pose::RigidPose;
use crate::video::Frame;

/// Which sub-mesh of the object asset a draw call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshRole {
    /// The visible asset.
    Jewel,
    /// A sub-mesh that masks pixels during compositing. It renders ahead of the jewel and writes
    /// only depth, never color, so captured video content drawn over it (the hand itself) shows
    /// through where the hand occludes the object.
    Occluder,
}

/// Draw-call parameters for a sub-mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawParams {
    /// Whether the mesh contributes color. Depth is always written.
    pub color_write: bool,
    /// Draw order within the object; lower orders render first.
    pub order: u8,
}

impl MeshRole {
    /// Returns the draw parameters producing correct occlusion for this sub-mesh.
    pub fn draw_params(self) -> DrawParams {
        match self {
            MeshRole::Occluder => DrawParams {
                color_write: false,
                order: 1,
            },
            MeshRole::Jewel => DrawParams {
                color_write: true,
                order: 2,
            },
        }
    }
}

/// The object's rest transform, applied inside the tracked pose.
///
/// These are the six calibration controls exposed by the debug parameter panel (plus the fixed
/// rest scale): they overwrite how the asset sits relative to its tracked container, outside the
/// normal pose pipeline. Rotations are in degrees and applied X, then Y, then Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestTransform {
    pub position: Vector3<f32>,
    pub rotation_degrees: Vector3<f32>,
    pub scale: f32,
}

impl Default for RestTransform {
    /// The calibrated rest transform for the bundled ring asset.
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation_degrees: Vector3::new(97.83, 0.0, 86.09),
            scale: 0.3,
        }
    }
}

impl RestTransform {
    /// Returns the rest transform as a homogeneous matrix (translation, then rotation, then
    /// scale, innermost first).
    pub fn matrix(&self) -> Matrix4<f32> {
        let rotation = UnitQuaternion::from_euler_angles(
            self.rotation_degrees.x.to_radians(),
            self.rotation_degrees.y.to_radians(),
            self.rotation_degrees.z.to_radians(),
        );
        Matrix4::new_translation(&self.position) * rotation.to_homogeneous()
            * Matrix4::new_scaling(self.scale)
    }
}

/// The virtual asset whose transform is driven by the current [`RigidPose`].
///
/// The object has no tracking state of its own; it only combines the pose with its rest
/// transform, mirroring a scene graph where the asset is nested inside a tracked container node.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackedObject {
    rest: RestTransform,
}

impl TrackedObject {
    pub fn new(rest: RestTransform) -> Self {
        Self { rest }
    }

    #[inline]
    pub fn rest(&self) -> &RestTransform {
        &self.rest
    }

    /// Mutable access for the calibration panel.
    #[inline]
    pub fn rest_mut(&mut self) -> &mut RestTransform {
        &mut self.rest
    }

    /// Computes the object's world transform for the given pose.
    pub fn world_transform(&self, pose: &RigidPose) -> Matrix4<f32> {
        let container = Matrix4::new_translation(&pose.translation)
            * pose.rotation.to_homogeneous()
            * Matrix4::new_scaling(pose.scale);
        container * self.rest.matrix()
    }
}

/// The 3D renderer collaborator.
///
/// Implementations own the scene, the camera and the light rig. They never mutate the pose; the
/// frame loop writes the object transform exactly once per cycle, renders the scene off-screen,
/// and composites the result on top of the captured video frame.
pub trait SceneRenderer {
    /// Writes the tracked object's world transform into the scene graph.
    fn set_object_transform(&mut self, transform: &Matrix4<f32>);

    /// Renders the 3D scene off-screen.
    fn render(&mut self) -> anyhow::Result<()>;

    /// Composites the most recent off-screen render on top of `frame` into the visible output.
    fn composite(&mut self, frame: &Frame) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use super::*;

    #[test]
    fn occluder_renders_depth_only_and_first() {
        let occluder = MeshRole::Occluder.draw_params();
        let jewel = MeshRole::Jewel.draw_params();

        assert!(!occluder.color_write);
        assert!(jewel.color_write);
        assert!(occluder.order < jewel.order);
    }

    #[test]
    fn world_transform_nests_rest_inside_pose() {
        let object = TrackedObject::new(RestTransform {
            position: Vector3::new(0.5, 0.0, 0.0),
            rotation_degrees: Vector3::zeros(),
            scale: 0.3,
        });
        let pose = RigidPose {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::new(1.0, 2.0, 3.0),
            scale: 2.0,
        };

        // The asset's origin sits at rest position (scaled by the pose) plus the pose translation.
        let origin = object
            .world_transform(&pose)
            .transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(2.0, 2.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn rest_rotation_is_applied_in_degrees() {
        let rest = RestTransform {
            position: Vector3::zeros(),
            rotation_degrees: Vector3::new(0.0, 0.0, 90.0),
            scale: 1.0,
        };
        let rotated = rest.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(rotated, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn panel_overwrites_rest_transform() {
        let mut object = TrackedObject::default();
        object.rest_mut().position.y = -1.5;
        object.rest_mut().rotation_degrees.x = 45.0;

        assert_eq!(object.rest().position.y, -1.5);
        assert_eq!(object.rest().rotation_degrees.x, 45.0);
    }
}
