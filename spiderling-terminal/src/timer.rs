//! Fixed-rate frame scheduling
use std::time::{Duration, Instant};

/// Paces redraws to a target rate and measures the rate actually achieved.
///
/// The delay before the next frame is the target interval minus the time the
/// last frame took, clamped at zero. Slow frames are not caught up.
pub struct FrameTimer {
    target: Duration,
    frame_start: Instant,
    last_report: Instant,
    frame_count: u32,
    fps: f32,
}

impl FrameTimer {
    pub fn new(fps: u32) -> Self {
        let now = Instant::now();
        Self {
            target: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            frame_start: now,
            last_report: now,
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    /// Measured frames per second over the last full second
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Mark the start of a frame, returning the time since the previous start
    pub fn begin_frame(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.frame_start;
        self.frame_start = now;
        delta
    }

    /// Mark the end of a frame, returning how long to wait before the next one
    pub fn end_frame(&mut self) -> Duration {
        let now = Instant::now();
        self.frame_count += 1;

        let since_report = now - self.last_report;
        if since_report >= Duration::from_secs(1) {
            self.fps = self.frame_count as f32 / since_report.as_secs_f32();
            self.frame_count = 0;
            self.last_report = now;
        }

        self.next_delay(now - self.frame_start)
    }

    pub fn next_delay(&self, frame_time: Duration) -> Duration {
        self.target.saturating_sub(frame_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_fills_remaining_budget() {
        let timer = FrameTimer::new(50);
        assert_eq!(timer.target(), Duration::from_millis(20));
        assert_eq!(timer.next_delay(Duration::from_millis(5)), Duration::from_millis(15));
    }

    #[test]
    fn test_slow_frame_has_no_delay() {
        let timer = FrameTimer::new(60);
        assert_eq!(timer.next_delay(Duration::from_millis(40)), Duration::ZERO);
    }

    #[test]
    fn test_zero_fps_is_clamped() {
        let timer = FrameTimer::new(0);
        assert_eq!(timer.target(), Duration::from_secs(1));
    }

    #[test]
    fn test_end_frame_never_exceeds_target() {
        let mut timer = FrameTimer::new(30);
        timer.begin_frame();
        assert!(timer.end_frame() <= timer.target());
    }
}
