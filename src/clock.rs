//! Frame clock: elapsed time per frame and the frame-rate cap.

use std::time::{Duration, Instant};

/// Target frames per second when none is given.
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame: Duration,
}

impl FrameClock {
    pub fn new(frame_rate: f64) -> Self {
        Self::starting_at(Instant::now(), frame_rate)
    }

    fn starting_at(now: Instant, frame_rate: f64) -> Self {
        Self {
            last: now,
            frame: Duration::from_secs_f64(1.0 / frame_rate),
        }
    }

    #[inline]
    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Milliseconds since the previous call (or since construction).
    pub fn tick(&mut self) -> u64 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed.as_millis().min(u64::MAX as u128) as u64
    }

    /// Time left in the current frame; the loop may block this long waiting for input.
    pub fn until_next_frame(&self) -> Duration {
        self.frame.saturating_sub(self.last.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_reports_elapsed_millis() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 60.0);
        assert_eq!(clock.tick_at(start + Duration::from_millis(16)), 16);
        assert_eq!(clock.tick_at(start + Duration::from_millis(50)), 34);
    }

    #[test]
    fn test_tick_never_goes_backwards() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::starting_at(start, 60.0);
        assert_eq!(clock.tick_at(start - Duration::from_millis(5)), 0);
    }

    #[test]
    fn test_frame_duration_from_rate() {
        let clock = FrameClock::new(50.0);
        assert_eq!(clock.frame_duration(), Duration::from_millis(20));
        assert!(clock.until_next_frame() <= Duration::from_millis(20));
    }
}
