//! Video capture boundary.
//!
//! The pose pipeline only consumes per-frame pixel snapshots and their dimensions; device access
//! and format negotiation happen behind [`FrameSource`].

use std::{fmt, sync::Arc};

/// Pixel dimensions of a video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A snapshot of one captured video frame.
///
/// The pixel buffer is reference-counted, so frames are cheap to clone and hand to the inference
/// worker. The pixel format is opaque to the pose pipeline; producer and consumer of the buffer
/// have to agree on it.
#[derive(Clone)]
pub struct Frame {
    data: Arc<[u8]>,
    resolution: Resolution,
}

impl Frame {
    pub fn new(data: impl Into<Arc<[u8]>>, resolution: Resolution) -> Self {
        Self {
            data: data.into(),
            resolution,
        }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("resolution", &self.resolution)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// A continuous source of video frames (a webcam, a video element, a test pattern).
///
/// An unavailable capture device is a startup error: implementations are expected to fail when
/// they are opened, not to return dummy frames. A `snapshot` error mid-stream aborts the frame
/// loop.
pub trait FrameSource {
    /// Returns the pixel dimensions of the frames this source produces.
    fn resolution(&self) -> Resolution;

    /// Captures a snapshot of the current frame.
    fn snapshot(&mut self) -> anyhow::Result<Frame>;
}
