//! Runs the try-on loop against synthetic collaborators: a flat-color frame source, a detector
//! that sweeps a fake hand across the frame, and a renderer that only logs what it is asked to
//! draw. Useful for eyeballing smoothing behavior without a camera or GPU.

use anyhow::Result;
use nalgebra::Matrix4;

use handring::detector::{EstimationOptions, HandDetector};
use handring::landmark::{HandSample, Handedness, Keypoint, LandmarkIdx, NUM_LANDMARKS};
use handring::scene::SceneRenderer;
use handring::tracking::{TryOnConfig, TryOnLoop};
use handring::video::{Frame, FrameSource, Resolution};

const RESOLUTION: Resolution = Resolution::new(640, 480);
const FRAMES: u32 = 120;

struct FlatSource;

impl FrameSource for FlatSource {
    fn resolution(&self) -> Resolution {
        RESOLUTION
    }

    fn snapshot(&mut self) -> Result<Frame> {
        Ok(Frame::new(vec![0x80u8; 16], RESOLUTION))
    }
}

/// Sweeps a synthetic right hand from left to right, disappearing for a stretch in the middle to
/// demonstrate the stale-hold behavior.
struct SweepingHand {
    frame: u32,
}

impl HandDetector for SweepingHand {
    fn estimate(
        &mut self,
        _frame: &Frame,
        _options: &EstimationOptions,
    ) -> Result<Option<HandSample>> {
        let t = self.frame;
        self.frame += 1;

        if (50..70).contains(&t) {
            return Ok(None);
        }

        let x = 100.0 + 3.0 * t as f32;
        let mut keypoints = vec![Keypoint::new(0.0, 0.0); NUM_LANDMARKS];
        keypoints[LandmarkIdx::RingFingerMcp as usize] = Keypoint::new(x, 240.0);
        keypoints[LandmarkIdx::RingFingerPip as usize] = Keypoint::new(x + 40.0, 250.0);
        keypoints[LandmarkIdx::RingFingerDip as usize] = Keypoint::new(x + 70.0, 265.0);
        Ok(Some(HandSample::new(keypoints, None, Handedness::Right)))
    }
}

struct LoggingRenderer;

impl SceneRenderer for LoggingRenderer {
    fn set_object_transform(&mut self, transform: &Matrix4<f32>) {
        log::trace!(
            "object at ({:.3}, {:.3}, {:.3})",
            transform[(0, 3)],
            transform[(1, 3)],
            transform[(2, 3)]
        );
    }

    fn render(&mut self) -> Result<()> {
        Ok(())
    }

    fn composite(&mut self, _frame: &Frame) -> Result<()> {
        Ok(())
    }
}

fn main() -> Result<()> {
    handring::init_logger!();

    let mut tracker = TryOnLoop::new(
        FlatSource,
        LoggingRenderer,
        SweepingHand { frame: 0 },
        TryOnConfig::default(),
    )?;

    for frame in 0..FRAMES {
        tracker.advance()?;
        let pose = tracker.pose();
        log::info!(
            "frame {frame:3}: {:?}, translation ({:.3}, {:.3}), scale {:.3}",
            tracker.status(),
            pose.translation.x,
            pose.translation.y,
            pose.scale,
        );
    }

    Ok(())
}
