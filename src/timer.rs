//! Performance measurement tools.

use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::filter::{
    ema::{Ema, EmaState},
    Filter,
};

const EMA_ALPHA: f32 = 0.3;

/// Measures the time an operation takes, averaged over recent invocations.
pub struct Timer {
    name: &'static str,
    ema: Ema,
    state: EmaState,
    avg_secs: f32,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ema: Ema::new(EMA_ALPHA),
            state: EmaState::default(),
            avg_secs: 0.0,
        }
    }

    /// Invokes a closure, measuring and recording the time it takes.
    pub fn time<T>(&mut self, timee: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = timee();
        let duration = start.elapsed();
        self.avg_secs = self.ema.filter(&mut self.state, duration.as_secs_f32());
        result
    }
}

/// Displays the average recorded time.
impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.1}ms", self.name, self.avg_secs * 1000.0)
    }
}

/// Logs frames per second with optional extra data.
pub struct FpsCounter {
    name: String,
    frames: u32,
    start: Instant,
}

impl FpsCounter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            frames: 0,
            start: Instant::now(),
        }
    }

    /// Advances the frame counter by 1 and logs FPS if one second has passed.
    pub fn tick(&mut self) {
        self.tick_with(std::iter::empty());
    }

    /// Advances the frame counter by 1 and logs FPS and stage timers if one second has passed.
    pub fn tick_with<'a, I>(&mut self, timers: I)
    where
        I: IntoIterator<Item = &'a Timer>,
    {
        self.frames += 1;
        if self.start.elapsed() > Duration::from_secs(1) {
            let stages = timers
                .into_iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>();
            if stages.is_empty() {
                log::debug!("{}: {} FPS", self.name, self.frames);
            } else {
                log::debug!("{}: {} FPS ({})", self.name, self.frames, stages.join(", "));
            }

            self.frames = 0;
            self.start = Instant::now();
        }
    }
}
