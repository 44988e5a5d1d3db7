//! Damped progress accumulator.
//!
//! Every field owns one [`Progress`]. Each frame it moves a fraction of the
//! remaining distance towards the target (`rate * dt`), and snaps once the
//! distance is below [`SNAP_EPSILON`] so it never creeps asymptotically.

use crate::easing::ease_in_out_cubic;

/// Distance to target below which progress snaps onto the target.
pub const SNAP_EPSILON: f32 = 0.001;

/// Fraction-formed scalar in `[0, 1]` with exponential approach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    value: f32,
    rate: f32,
}

impl Progress {
    /// Start fully scattered (`0.0`) with the given damping rate per second.
    pub fn new(rate: f32) -> Self {
        Self {
            value: 0.0,
            rate: rate.max(0.0),
        }
    }

    /// Start at a specific value (clamped to `[0, 1]`).
    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value.clamp(0.0, 1.0);
        self
    }

    /// Raw (linear) progress.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Progress after the cubic ease-in-out.
    #[inline]
    pub fn eased(&self) -> f32 {
        ease_in_out_cubic(self.value)
    }

    /// Damping rate per second.
    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Whether progress sits exactly on `target`.
    #[inline]
    pub fn is_settled(&self, target: f32) -> bool {
        self.value == target
    }

    /// Advance one frame towards `target`. Returns the new value.
    ///
    /// A zero, negative or non-finite `delta` leaves the value untouched. The
    /// per-frame fraction is capped at 1 so a long stall cannot overshoot.
    pub fn step(&mut self, target: f32, delta: f32) -> f32 {
        if !(delta > 0.0) || !delta.is_finite() {
            return self.value;
        }

        let target = target.clamp(0.0, 1.0);
        let diff = target - self.value;
        if diff.abs() < SNAP_EPSILON {
            self.value = target;
        } else {
            let fraction = (self.rate * delta).min(1.0);
            self.value = (self.value + diff * fraction).clamp(0.0, 1.0);
        }
        self.value
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(crate::config::TRANSITION_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_converges_to_formed_without_overshoot() {
        let mut p = Progress::new(2.5);
        let mut prev = p.value();
        let mut steps = 0;
        while !p.is_settled(1.0) {
            let v = p.step(1.0, DT);
            assert!(v >= prev, "progress went backwards");
            assert!(v <= 1.0, "progress overshot");
            prev = v;
            steps += 1;
            assert!(steps < 1000, "progress never settled");
        }
        assert_eq!(p.value(), 1.0);
        // ln(0.001) / ln(1 - 2.5/60) is about 163, plus the snap frame
        assert!(steps <= 170, "took {} steps", steps);
    }

    #[test]
    fn test_converges_to_scattered() {
        let mut p = Progress::new(2.5).with_value(1.0);
        let mut prev = p.value();
        for _ in 0..1000 {
            let v = p.step(0.0, DT);
            assert!(v <= prev);
            assert!(v >= 0.0);
            prev = v;
        }
        assert_eq!(p.value(), 0.0);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut p = Progress::new(2.5).with_value(0.9995);
        assert_eq!(p.step(1.0, 0.0), 0.9995);
        assert_eq!(p.step(0.0, 0.0), 0.9995);
        assert_eq!(p.step(1.0, f32::NAN), 0.9995);
    }

    #[test]
    fn test_snap_within_epsilon() {
        let mut p = Progress::new(2.5).with_value(0.9995);
        assert_eq!(p.step(1.0, DT), 1.0);
    }

    #[test]
    fn test_large_delta_does_not_overshoot() {
        let mut p = Progress::new(2.5);
        assert_eq!(p.step(1.0, 10.0), 1.0);
        let mut p = Progress::new(2.5).with_value(1.0);
        assert_eq!(p.step(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_reversal_continues_from_current_value() {
        let mut p = Progress::new(2.5);
        for _ in 0..30 {
            p.step(1.0, DT);
        }
        let midway = p.value();
        assert!(midway > 0.0 && midway < 1.0);

        let after_flip = p.step(0.0, DT);
        assert!(after_flip < midway);
        // One damped step, not a jump
        assert!(midway - after_flip <= midway * 2.5 * DT + 1e-6);
    }

    #[test]
    fn test_eased_value() {
        let p = Progress::new(2.5).with_value(0.5);
        assert_eq!(p.eased(), 0.5);
        assert_eq!(Progress::new(2.5).eased(), 0.0);
    }
}
