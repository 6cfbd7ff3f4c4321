//! Hand-tracked augmented-reality jewelry try-on.
//!
//! This library overlays a rigid 3D object (a ring, a watch) onto a live camera feed so that the
//! object's position, orientation and scale follow a detected hand. It contains the per-frame pose
//! estimation and temporal smoothing pipeline; camera capture, GPU rendering and the landmark
//! detection network itself are collaborators behind the traits in [`video`], [`scene`] and
//! [`detector`].
//!
//! # Coordinate Systems
//!
//! Two coordinate systems are in play:
//!
//! - *Image space*: pixel coordinates of the captured video frame, X pointing right, Y pointing
//!   **down**, origin in the top-left corner. Landmark detectors report keypoints in this space.
//! - *Scene space*: right-handed, X pointing right, Y pointing **up**, Z pointing from the scene
//!   towards the camera. The virtual object tracks on the Z = 0 plane facing the camera.
//!
//! [`landmark::Keypoint`] converts between the two; everything downstream of it works in scene
//! space.

use log::LevelFilter;

pub mod detector;
pub mod filter;
pub mod landmark;
pub mod num;
pub mod pipeline;
pub mod pose;
pub mod scene;
pub mod timer;
pub mod tracking;
pub mod video;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and this library will log at *trace*
/// level. Otherwise, they will log at *debug* level.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
