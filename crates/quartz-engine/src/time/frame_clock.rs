use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, capped at [`FrameClock::MAX_DT`].
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,

    /// Frames per second averaged over the last reporting window.
    pub fps: f32,
}

/// Per-window frame clock.
///
/// Besides per-frame deltas it keeps a rolling frame rate that the host can
/// log without measuring anything itself.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    window_start: Instant,
    window_frames: u32,
    fps: f32,
}

impl FrameClock {
    /// Upper bound on reported delta time (debugger pauses, minimized windows).
    pub const MAX_DT: Duration = Duration::from_millis(250);

    /// Span over which `fps` is averaged.
    pub const FPS_WINDOW: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        let now = Instant::now();
        Self { last: now, frame_index: 0, window_start: now, window_frames: 0, fps: 0.0 }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last).min(Self::MAX_DT);
        self.last = now;

        self.window_frames += 1;
        let span = now.saturating_duration_since(self.window_start);
        if span >= Self::FPS_WINDOW {
            self.fps = self.window_frames as f32 / span.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
        }

        let ft = FrameTime { dt: dt.as_secs_f32(), now, frame_index: self.frame_index, fps: self.fps };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
