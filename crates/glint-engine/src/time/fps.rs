use std::time::{Duration, Instant};

/// Frame rate measured over one reporting window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FpsSample {
    /// Frames per second over the window.
    pub fps: f32,
    /// Length of the window in seconds; the fixed-update step.
    pub dt: f32,
}

/// Counts frames and reports a rate once per interval (one second by default).
///
/// The runtime uses each sample for the window title and the fixed update.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    interval: Duration,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now(), Duration::from_secs(1))
    }

    pub fn starting_at(start: Instant, interval: Duration) -> Self {
        Self { window_start: start, frames: 0, interval }
    }

    /// Records one frame at `now`. Returns a sample when the interval has passed.
    pub fn frame(&mut self, now: Instant) -> Option<FpsSample> {
        self.frames += 1;
        let span = now.saturating_duration_since(self.window_start);
        if span < self.interval {
            return None;
        }

        let dt = span.as_secs_f32();
        let sample = FpsSample { fps: self.frames as f32 / dt, dt };
        self.window_start = now;
        self.frames = 0;
        Some(sample)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
