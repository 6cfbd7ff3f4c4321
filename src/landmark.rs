//! Hand landmark data as reported by the detector, and conversion into math-friendly vectors.

use nalgebra::{Vector2, Vector3};

/// Number of landmarks reported per hand.
pub const NUM_LANDMARKS: usize = 21;

/// A single detected keypoint.
///
/// `x` and `y` are image-plane pixel coordinates (Y pointing down). `z`, when present, is depth in
/// the detector's local space, growing *away* from the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
}

impl Keypoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Converts the keypoint into a scene-space vector.
    ///
    /// The detector's screen-down, camera-forward convention is converted to the right-handed,
    /// screen-up convention used by all geometry code: the vertical axis is negated, and depth is
    /// negated when present (absent depth is treated as zero).
    pub fn to_scene_vec3(&self) -> Vector3<f32> {
        Vector3::new(self.x, -self.y, self.z.map(|z| -z).unwrap_or(0.0))
    }

    /// Returns the keypoint's image-plane position, in pixels.
    pub fn to_image_vec2(&self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }
}

/// Whether a detected hand is a left or a right hand.
///
/// The derived local frame swaps its cross-product operand order based on this label, so that the
/// frame's handedness is consistent for either hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// Names for the hand landmarks, in detector output order.
///
/// # Terminology
///
/// - **CMC**: Carpometacarpal joint, the lowest joint of the thumb, located near the wrist.
/// - **MCP**: Metacarpophalangeal joint, the lower joint forming the knuckles near the palm.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: placed on the tip of the finger, above the DIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// One hand detection result for a single frame.
///
/// Holds an ordered sequence of image-plane keypoints, an optional parallel sequence of 3D
/// keypoints in the detector's local space, and the hand's chirality label. Samples are immutable
/// and discarded once the frame's pose has been computed.
#[derive(Debug, Clone)]
pub struct HandSample {
    keypoints: Vec<Keypoint>,
    keypoints_3d: Option<Vec<Keypoint>>,
    handedness: Handedness,
}

impl HandSample {
    /// Creates a sample from raw detector output.
    ///
    /// # Panics
    ///
    /// Panics if `keypoints` or a present `keypoints_3d` does not contain exactly
    /// [`NUM_LANDMARKS`] entries.
    pub fn new(
        keypoints: Vec<Keypoint>,
        keypoints_3d: Option<Vec<Keypoint>>,
        handedness: Handedness,
    ) -> Self {
        assert_eq!(keypoints.len(), NUM_LANDMARKS);
        if let Some(kp3d) = &keypoints_3d {
            assert_eq!(kp3d.len(), NUM_LANDMARKS);
        }
        Self {
            keypoints,
            keypoints_3d,
            handedness,
        }
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Returns a landmark's scene-space 3D position.
    ///
    /// Uses the detector-local 3D keypoints when the detector reported them, and falls back to
    /// the image-plane keypoint (with zero depth) otherwise. Orientation math only consumes
    /// normalized edge directions, so the fallback degrades gracefully.
    pub fn point3(&self, idx: LandmarkIdx) -> Vector3<f32> {
        match &self.keypoints_3d {
            Some(kp3d) => kp3d[idx as usize].to_scene_vec3(),
            None => self.keypoints[idx as usize].to_scene_vec3(),
        }
    }

    /// Returns a landmark's image-plane position, in pixels.
    pub fn point2(&self, idx: LandmarkIdx) -> Vector2<f32> {
        self.keypoints[idx as usize].to_image_vec2()
    }
}
