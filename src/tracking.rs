//! The per-frame tracking loop.
//!
//! [`TryOnLoop`] orchestrates one cycle per display refresh: snapshot the capture source, run
//! landmark inference on the worker thread (the only suspension point), derive and stabilize the
//! pose, write the object transform, render, and composite the render over the video frame.
//!
//! Only one cycle is ever in flight, so the pose and the tracked object are touched from a single
//! logical thread of control and need no synchronization. There is no timeout on inference; a
//! stalled detector stalls the loop, and frame cadence is bounded by inference latency rather
//! than a fixed timer.

use crate::detector::{EstimationOptions, HandDetector, InferenceOutcome, InferenceWorker};
use crate::pose::{
    orientation,
    placement::{PlacementConfig, PlacementMapper},
    stabilizer::{PoseStabilizer, PoseTarget, SmoothingConfig},
    FingerAnchors, RigidPose,
};
use crate::scene::{RestTransform, SceneRenderer, TrackedObject};
use crate::timer::{FpsCounter, Timer};
use crate::video::FrameSource;

/// Where the loop currently is within a frame cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Before the first cycle. The scene has been rendered once at the rest pose so the first
    /// composite is never blank.
    Idle,
    /// Ready to snapshot the next video frame.
    CaptureReady,
    /// A landmark inference request is in flight.
    AwaitingInference,
    /// The cycle's render has been composited over the video frame.
    Composited,
}

/// Tracking quality of the most recent cycle.
///
/// `Lost` and `Degraded` both hold the last pose; they are distinguished so the application can
/// show a degraded-tracking indicator when the detector itself is failing rather than simply not
/// seeing a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingStatus {
    /// A hand was detected and the pose was updated.
    Tracking,
    /// No hand was detected; the pose is frozen at its last value.
    Lost,
    /// The detector reported an error or died; the pose is frozen at its last value.
    Degraded,
}

/// Configuration for a [`TryOnLoop`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TryOnConfig {
    estimation: EstimationOptions,
    placement: PlacementConfig,
    smoothing: SmoothingConfig,
    anchors: FingerAnchors,
    rest: RestTransform,
}

impl TryOnConfig {
    /// Sets the per-call detector options.
    #[inline]
    pub fn estimation(mut self, options: EstimationOptions) -> Self {
        self.estimation = options;
        self
    }

    /// Sets the placement calibration.
    #[inline]
    pub fn placement(mut self, config: PlacementConfig) -> Self {
        self.placement = config;
        self
    }

    /// Sets the per-channel pose smoothing factors.
    #[inline]
    pub fn smoothing(mut self, config: SmoothingConfig) -> Self {
        self.smoothing = config;
        self
    }

    /// Sets the landmark triple the object tracks.
    #[inline]
    pub fn anchors(mut self, anchors: FingerAnchors) -> Self {
        self.anchors = anchors;
        self
    }

    /// Sets the object's rest transform.
    #[inline]
    pub fn rest(mut self, rest: RestTransform) -> Self {
        self.rest = rest;
        self
    }
}

/// Drives capture, inference, pose estimation and compositing, once per display refresh.
///
/// Owns the [`RigidPose`], the only state that persists across cycles.
pub struct TryOnLoop<C: FrameSource, R: SceneRenderer> {
    capture: C,
    renderer: R,
    inference: InferenceWorker,
    anchors: FingerAnchors,
    mapper: PlacementMapper,
    stabilizer: PoseStabilizer,
    object: TrackedObject,
    pose: RigidPose,
    state: CycleState,
    status: TrackingStatus,
    fps: FpsCounter,
    t_infer: Timer,
    t_render: Timer,
}

impl<C: FrameSource, R: SceneRenderer> TryOnLoop<C, R> {
    /// Creates the loop and renders the scene once at the rest pose.
    ///
    /// The initial render happens before the detector is engaged so the very first composited
    /// frame already shows the object. Fails if the initial render fails or the inference worker
    /// cannot be spawned; an unusable capture source is expected to have failed before this
    /// point, when it was opened.
    pub fn new<D: HandDetector>(
        capture: C,
        mut renderer: R,
        detector: D,
        config: TryOnConfig,
    ) -> anyhow::Result<Self> {
        let object = TrackedObject::new(config.rest);
        let pose = RigidPose::default();

        renderer.set_object_transform(&object.world_transform(&pose));
        renderer.render()?;

        let inference = InferenceWorker::spawn(detector, config.estimation)?;
        log::debug!("try-on loop ready, capture at {}", capture.resolution());

        Ok(Self {
            capture,
            renderer,
            inference,
            anchors: config.anchors,
            mapper: PlacementMapper::new(config.placement),
            stabilizer: PoseStabilizer::new(config.smoothing),
            object,
            pose,
            state: CycleState::Idle,
            status: TrackingStatus::Lost,
            fps: FpsCounter::new("try-on"),
            t_infer: Timer::new("infer"),
            t_render: Timer::new("render"),
        })
    }

    /// Runs one frame cycle. Call once per display refresh.
    ///
    /// Capture and render errors abort the cycle and are propagated; inference errors do not
    /// (see [`TrackingStatus::Degraded`]).
    pub fn advance(&mut self) -> anyhow::Result<()> {
        self.state = CycleState::CaptureReady;
        let frame = self.capture.snapshot()?;

        self.inference.request(frame.clone());
        self.state = CycleState::AwaitingInference;
        let outcome = self.t_infer.time(|| self.inference.wait());

        match outcome {
            InferenceOutcome::Detected(sample) => {
                let rotation = orientation::solve(
                    sample.point3(self.anchors.root),
                    sample.point3(self.anchors.pivot),
                    sample.point3(self.anchors.tip),
                    sample.handedness(),
                );
                let placement = self.mapper.map(
                    sample.point2(self.anchors.root),
                    sample.point2(self.anchors.pivot),
                    frame.resolution(),
                );
                let target = PoseTarget {
                    rotation,
                    translation: placement.translation,
                    scale: placement.scale,
                };
                self.stabilizer.apply(&mut self.pose, &target);
                self.status = TrackingStatus::Tracking;
            }
            InferenceOutcome::NotDetected => {
                // Stale-hold: the pose stays exactly as it was.
                log::trace!("no hand detected, holding last pose");
                self.status = TrackingStatus::Lost;
            }
            InferenceOutcome::Failed => {
                self.status = TrackingStatus::Degraded;
            }
        }

        // The transform is written every cycle, even when the pose is held, so calibration panel
        // edits to the rest transform show up immediately.
        self.renderer
            .set_object_transform(&self.object.world_transform(&self.pose));
        self.t_render.time(|| -> anyhow::Result<()> {
            self.renderer.render()?;
            self.renderer.composite(&frame)
        })?;

        self.state = CycleState::Composited;
        self.fps.tick_with([&self.t_infer, &self.t_render]);
        Ok(())
    }

    /// Returns the current object pose.
    #[inline]
    pub fn pose(&self) -> &RigidPose {
        &self.pose
    }

    /// Returns the tracking quality of the most recent cycle.
    #[inline]
    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    #[inline]
    pub fn state(&self) -> CycleState {
        self.state
    }

    #[inline]
    pub fn object(&self) -> &TrackedObject {
        &self.object
    }

    /// Mutable access to the tracked object, for the calibration panel.
    #[inline]
    pub fn object_mut(&mut self) -> &mut TrackedObject {
        &mut self.object
    }
}
