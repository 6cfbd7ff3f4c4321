//! Maps 2D landmark positions to scene-space translation and scale.
//!
//! Placement is independent of orientation: it only looks at the image-plane positions of the
//! root and pivot landmarks. No smoothing happens here; the mapper returns instantaneous targets
//! for every frame and leaves temporal filtering to the stabilizer.

use nalgebra::{Vector2, Vector3};

use crate::video::Resolution;

/// Scale floor keeping the pose's `scale > 0` invariant intact when the root and pivot landmarks
/// coincide in the image.
const MIN_SCALE: f32 = 1e-4;

/// Instantaneous placement targets for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub translation: Vector3<f32>,
    pub scale: f32,
}

/// Placement calibration options.
///
/// The defaults are calibrated for a 90-degree-FOV scene camera at distance 2 from the object
/// plane and a ring asset modeled at unit size.
#[derive(Debug, Clone, Copy)]
pub struct PlacementConfig {
    seat_offset: f32,
    view_scale: f32,
    shape_divisor: f32,
    calibration: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            seat_offset: 0.8,
            view_scale: 4.0,
            shape_divisor: 4.0,
            calibration: 60.0,
        }
    }
}

impl PlacementConfig {
    /// Sets how far from the root landmark towards the pivot landmark the object seats,
    /// as a fraction in [0, 1].
    #[inline]
    pub fn seat_offset(mut self, offset: f32) -> Self {
        self.seat_offset = offset;
        self
    }

    /// Sets the image-pixel to scene-unit conversion factor, applied over the frame height.
    ///
    /// This matches the scene camera's field of view and distance so that projected scene units
    /// correspond visually to image pixels.
    #[inline]
    pub fn view_scale(mut self, scale: f32) -> Self {
        self.view_scale = scale;
        self
    }

    /// Sets the divisor converting the root-pivot pixel distance into the object's apparent size.
    #[inline]
    pub fn shape_divisor(mut self, divisor: f32) -> Self {
        self.shape_divisor = divisor;
        self
    }

    /// Sets the calibration constant dividing the apparent size into a uniform scale factor.
    #[inline]
    pub fn calibration(mut self, calibration: f32) -> Self {
        self.calibration = calibration;
        self
    }
}

/// Derives scene-space translation and uniform scale from 2D landmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlacementMapper {
    config: PlacementConfig,
}

impl PlacementMapper {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Maps the root and pivot landmark positions (in image pixels) to placement targets.
    ///
    /// The seating point is interpolated from root towards pivot, centered on the frame,
    /// converted to scene units over the frame height, and flipped vertically (image Y points
    /// down, scene Y points up). The object tracks on the Z = 0 plane facing the camera. Scale is
    /// proportional to the apparent root-pivot distance, so a hand closer to the camera yields a
    /// larger object.
    pub fn map(
        &self,
        root: Vector2<f32>,
        pivot: Vector2<f32>,
        resolution: Resolution,
    ) -> Placement {
        let cfg = &self.config;
        let width = resolution.width() as f32;
        let height = resolution.height() as f32;

        let seat = root.lerp(&pivot, cfg.seat_offset);
        let translation = Vector3::new(
            (seat.x - width / 2.0) * cfg.view_scale / height,
            -(seat.y - height / 2.0) * cfg.view_scale / height,
            0.0,
        );

        let apparent_size = (root - pivot).norm() / cfg.shape_divisor;
        let scale = (apparent_size / cfg.calibration).max(MIN_SCALE);

        Placement { translation, scale }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn maps_seat_point_to_scene_units() {
        let mapper = PlacementMapper::default();
        let placement = mapper.map(
            Vector2::new(300.0, 200.0),
            Vector2::new(340.0, 220.0),
            Resolution::new(640, 480),
        );

        // Seating point is (332, 216); centered and scaled by 4/480, with Y flipped.
        assert_relative_eq!(
            placement.translation,
            Vector3::new(0.1, 0.2, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn scale_tracks_apparent_hand_size() {
        let mapper = PlacementMapper::default();
        let placement = mapper.map(
            Vector2::new(100.0, 100.0),
            Vector2::new(180.0, 100.0),
            Resolution::new(640, 480),
        );

        // Pixel distance 80, divided by the shape and calibration constants.
        assert_relative_eq!(placement.scale, 80.0 / 4.0 / 60.0, epsilon = 1e-6);
    }

    #[test]
    fn coincident_landmarks_keep_scale_positive() {
        let mapper = PlacementMapper::default();
        let placement = mapper.map(
            Vector2::new(320.0, 240.0),
            Vector2::new(320.0, 240.0),
            Resolution::new(640, 480),
        );
        assert!(placement.scale > 0.0);
    }

    #[test]
    fn config_overrides_apply() {
        let mapper = PlacementMapper::new(
            PlacementConfig::default()
                .seat_offset(0.0)
                .view_scale(2.0)
                .shape_divisor(1.0)
                .calibration(10.0),
        );
        let placement = mapper.map(
            Vector2::new(340.0, 260.0),
            Vector2::new(1000.0, 1000.0),
            Resolution::new(640, 480),
        );

        // seat_offset 0 pins the seat to the root landmark.
        assert_relative_eq!(
            placement.translation,
            Vector3::new(20.0 * 2.0 / 480.0, -(20.0 * 2.0 / 480.0), 0.0),
            epsilon = 1e-5
        );
        let dist = (Vector2::new(340.0f32, 260.0) - Vector2::new(1000.0, 1000.0)).norm();
        assert_relative_eq!(placement.scale, dist / 10.0, epsilon = 1e-3);
    }
}
