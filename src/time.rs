//! Frame clock for the render loop.
//!
//! Supplies the `(elapsed, delta)` pair every field update needs. Pausing
//! freezes `elapsed` and reports a zero `delta`, which the fields treat as a
//! no-op, so resuming continues exactly where the animation stopped.
//!
//! # Example
//!
//! ```ignore
//! use arix::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // In the render loop:
//! let frame = clock.tick();
//! scene.tick(state, frame);
//! ```

use std::time::{Duration, Instant};

/// Largest delta handed to the fields, in seconds.
///
/// Keeps a stalled window (drag, breakpoint, minimise) from turning into one
/// giant step.
pub const MAX_DELTA: f32 = 0.1;

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the clock started, excluding paused time.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}

impl FrameTime {
    pub fn new(elapsed: f32, delta: f32) -> Self {
        Self { elapsed, delta }
    }
}

/// Wall-clock driven frame timer.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    /// Total time spent paused.
    paused_total: Duration,
    paused_at: Option<Instant>,
    current: FrameTime,
    max_delta: f32,
    frame_count: u64,
    fps: f32,
    fps_frames: u64,
    fps_since: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            paused_total: Duration::ZERO,
            paused_at: None,
            current: FrameTime::default(),
            max_delta: MAX_DELTA,
            frame_count: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_since: now,
        }
    }

    /// Override the delta clamp. Non-positive values disable clamping.
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Advance to the current instant. Call once per frame.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advance to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        if self.paused_at.is_some() {
            self.current.delta = 0.0;
            return self.current;
        }

        let mut delta = now.saturating_duration_since(self.last_frame).as_secs_f32();
        if self.max_delta > 0.0 {
            delta = delta.min(self.max_delta);
        }
        self.last_frame = now;

        let elapsed = now.saturating_duration_since(self.start).saturating_sub(self.paused_total);
        self.current = FrameTime::new(elapsed.as_secs_f32(), delta);
        self.frame_count += 1;

        self.fps_frames += 1;
        let window = now.saturating_duration_since(self.fps_since);
        if window >= Duration::from_millis(500) {
            self.fps = self.fps_frames as f32 / window.as_secs_f32();
            self.fps_frames = 0;
            self.fps_since = now;
        }

        self.current
    }

    /// Timing of the most recent frame.
    #[inline]
    pub fn current(&self) -> FrameTime {
        self.current
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    pub fn resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            let now = Instant::now();
            self.paused_total += now.saturating_duration_since(at);
            self.last_frame = now;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.current(), FrameTime::default());
    }

    #[test]
    fn test_tick_advances() {
        let mut clock = FrameClock::new().with_max_delta(0.0);
        let start = clock.start;
        let frame = clock.tick_at(start + Duration::from_millis(16));
        assert!((frame.delta - 0.016).abs() < 1e-4);
        assert!((frame.elapsed - 0.016).abs() < 1e-4);

        let frame = clock.tick_at(start + Duration::from_millis(48));
        assert!((frame.delta - 0.032).abs() < 1e-4);
        assert!((frame.elapsed - 0.048).abs() < 1e-4);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        let frame = clock.tick_at(start + Duration::from_secs(5));
        assert_eq!(frame.delta, MAX_DELTA);
        assert!((frame.elapsed - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        clock.tick_at(start + Duration::from_millis(10));
        let before = clock.current().elapsed;

        clock.pause();
        let frame = clock.tick_at(start + Duration::from_millis(500));
        assert!(clock.is_paused());
        assert_eq!(frame.delta, 0.0);
        assert_eq!(frame.elapsed, before);

        clock.toggle_pause();
        assert!(!clock.is_paused());
    }
}
