//! Hand landmark detector boundary.
//!
//! The detection network itself is a collaborator: anything that can turn a pixel buffer into at
//! most one ranked [`HandSample`] can implement [`HandDetector`]. The frame loop runs the
//! detector on a dedicated worker thread through [`InferenceWorker`] and suspends on the result,
//! so at most one inference is ever in flight.

use std::io;

use crate::landmark::HandSample;
use crate::pipeline::{promise, Promise, PromiseHandle, Worker};
use crate::video::Frame;

/// Per-call detector options.
#[derive(Debug, Default, Clone, Copy)]
pub struct EstimationOptions {
    flip_horizontal: bool,
    static_image_mode: bool,
}

impl EstimationOptions {
    /// Requests that the detector mirror the input horizontally before inference.
    #[inline]
    pub fn flip_horizontal(mut self, flip: bool) -> Self {
        self.flip_horizontal = flip;
        self
    }

    /// Hints that inputs are unrelated still images rather than a video stream.
    ///
    /// Streaming mode (the default) lets detectors reuse tracking state between frames.
    #[inline]
    pub fn static_image_mode(mut self, static_mode: bool) -> Self {
        self.static_image_mode = static_mode;
        self
    }

    #[inline]
    pub fn is_flip_horizontal(&self) -> bool {
        self.flip_horizontal
    }

    #[inline]
    pub fn is_static_image_mode(&self) -> bool {
        self.static_image_mode
    }
}

/// A hand landmark detector.
///
/// Returns the highest-ranked hand in the frame, or `None` when no hand was found. Errors are
/// reported to the caller, which treats them like an absent hand for posing purposes (the pose
/// freezes either way) but surfaces them as a degraded status.
pub trait HandDetector: Send + 'static {
    fn estimate(
        &mut self,
        frame: &Frame,
        options: &EstimationOptions,
    ) -> anyhow::Result<Option<HandSample>>;
}

/// Outcome of one inference request.
#[derive(Debug)]
pub enum InferenceOutcome {
    /// The detector returned a hand.
    Detected(HandSample),
    /// The detector ran but found no hand.
    NotDetected,
    /// The detector reported an error or died; treated like an absent hand, but distinguishable
    /// so the application can display a degraded-tracking indicator.
    Failed,
}

/// Runs a [`HandDetector`] on a worker thread, one request at a time.
pub struct InferenceWorker {
    worker: Worker<(Frame, Promise<anyhow::Result<Option<HandSample>>>)>,
    pending: Option<PromiseHandle<anyhow::Result<Option<HandSample>>>>,
}

impl InferenceWorker {
    /// Spawns the inference worker thread.
    pub fn spawn<D: HandDetector>(
        mut detector: D,
        options: EstimationOptions,
    ) -> io::Result<Self> {
        let worker = Worker::spawn(
            "hand inference",
            move |(frame, promise): (Frame, Promise<_>)| {
                promise.fulfill(detector.estimate(&frame, &options));
            },
        )?;
        Ok(Self {
            worker,
            pending: None,
        })
    }

    /// Issues an inference request for `frame`.
    ///
    /// # Panics
    ///
    /// Panics if a previous request has not been collected with [`InferenceWorker::wait`] yet;
    /// the frame loop never issues overlapping requests.
    pub fn request(&mut self, frame: Frame) {
        assert!(
            self.pending.is_none(),
            "inference request issued while one is already in flight"
        );
        let (promise, handle) = promise();
        self.worker.send((frame, promise));
        self.pending = Some(handle);
    }

    /// Blocks until the outstanding inference request completes.
    ///
    /// # Panics
    ///
    /// Panics if no request is in flight.
    pub fn wait(&mut self) -> InferenceOutcome {
        let handle = self
            .pending
            .take()
            .expect("`wait` called without an inference in flight");
        match handle.block() {
            Ok(Ok(Some(sample))) => InferenceOutcome::Detected(sample),
            Ok(Ok(None)) => InferenceOutcome::NotDetected,
            Ok(Err(e)) => {
                log::warn!("hand inference failed: {e}");
                InferenceOutcome::Failed
            }
            Err(_) => {
                log::warn!("hand inference worker dropped its promise");
                InferenceOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Handedness, Keypoint, NUM_LANDMARKS};
    use crate::video::Resolution;

    struct ScriptedDetector {
        results: Vec<anyhow::Result<Option<HandSample>>>,
    }

    impl HandDetector for ScriptedDetector {
        fn estimate(
            &mut self,
            _frame: &Frame,
            _options: &EstimationOptions,
        ) -> anyhow::Result<Option<HandSample>> {
            self.results.remove(0)
        }
    }

    fn frame() -> Frame {
        Frame::new(vec![0u8; 4], Resolution::new(2, 2))
    }

    fn sample() -> HandSample {
        HandSample::new(
            vec![Keypoint::new(0.0, 0.0); NUM_LANDMARKS],
            None,
            Handedness::Right,
        )
    }

    #[test]
    fn maps_detector_results_to_outcomes() {
        let detector = ScriptedDetector {
            results: vec![
                Ok(Some(sample())),
                Ok(None),
                Err(anyhow::anyhow!("inference backend crashed")),
            ],
        };
        let mut worker = InferenceWorker::spawn(detector, EstimationOptions::default()).unwrap();

        worker.request(frame());
        assert!(matches!(worker.wait(), InferenceOutcome::Detected(_)));
        worker.request(frame());
        assert!(matches!(worker.wait(), InferenceOutcome::NotDetected));
        worker.request(frame());
        assert!(matches!(worker.wait(), InferenceOutcome::Failed));
    }

    #[test]
    #[should_panic]
    fn overlapping_requests_are_rejected() {
        let detector = ScriptedDetector {
            results: vec![Ok(None), Ok(None)],
        };
        let mut worker = InferenceWorker::spawn(detector, EstimationOptions::default()).unwrap();
        worker.request(frame());
        worker.request(frame());
    }
}
