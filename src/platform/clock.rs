//! Frame pacing

use std::thread;
use std::time::{Duration, Instant};

use crate::consts::MAX_FRAME_DT;

/// Paces the loop to a target frame rate and reports the frame delta
#[derive(Debug)]
pub struct FrameClock {
    frame_time: Duration,
    last: Instant,
    frames: u64,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_time: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            last: Instant::now(),
            frames: 0,
        }
    }

    /// Nominal seconds per frame
    pub fn frame_dt(&self) -> f32 {
        self.frame_time.as_secs_f32()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Sleep out the rest of the frame, then return seconds since the last call.
    ///
    /// The result is capped so a stall (debugger, window drag) doesn't become
    /// one huge simulation step.
    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.frame_time {
            thread::sleep(self.frame_time - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.frames += 1;
        dt.min(MAX_FRAME_DT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_paces_to_frame_time() {
        let mut clock = FrameClock::new(200);
        let start = Instant::now();
        for _ in 0..4 {
            let dt = clock.tick();
            assert!(dt > 0.0);
            assert!(dt <= MAX_FRAME_DT);
        }
        assert!(start.elapsed() >= Duration::from_millis(15));
        assert_eq!(clock.frames(), 4);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut clock = FrameClock::new(1000);
        thread::sleep(Duration::from_millis(150));
        assert_eq!(clock.tick(), MAX_FRAME_DT);
    }

    #[test]
    fn test_zero_fps_does_not_divide_by_zero() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.frame_dt(), 1.0);
    }
}
