//! Easing and interpolation helpers shared by every field.
//!
//! Both the foliage shader and the ornament transforms run their progress
//! value through [`ease_in_out_cubic`] before blending, which is what makes the
//! independently animated fields read as one coordinated transformation.

use glam::Vec3;

/// Cubic ease-in-out.
///
/// `4t³` on the first half, `1 - (-2t + 2)³ / 2` on the second. Input is
/// clamped to `[0, 1]`.
///
/// ```
/// use arix::easing::ease_in_out_cubic;
///
/// assert_eq!(ease_in_out_cubic(0.0), 0.0);
/// assert_eq!(ease_in_out_cubic(0.5), 0.5);
/// assert_eq!(ease_in_out_cubic(1.0), 1.0);
/// ```
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let k = -2.0 * t + 2.0;
        1.0 - k * k * k / 2.0
    }
}

/// Scalar linear interpolation, exact at both endpoints.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Component-wise linear interpolation, exact at both endpoints.
///
/// `glam`'s `Vec3::lerp` computes `a + (b - a) * t`, which can miss `b` by an
/// ulp at `t = 1`. Fully formed ornaments must land on their tree position
/// exactly, so the weighted form is used instead.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_boundaries() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(ease_in_out_cubic(-3.0), 0.0);
        assert_eq!(ease_in_out_cubic(7.0), 1.0);
    }

    #[test]
    fn test_ease_monotonic() {
        let mut prev = ease_in_out_cubic(0.0);
        for i in 1..=1000 {
            let v = ease_in_out_cubic(i as f32 / 1000.0);
            assert!(v >= prev, "ease decreased at step {}", i);
            prev = v;
        }
    }

    #[test]
    fn test_ease_slow_at_ends() {
        // Slower than linear near 0, faster through the middle
        assert!(ease_in_out_cubic(0.1) < 0.1);
        assert!(ease_in_out_cubic(0.9) > 0.9);
        assert!((ease_in_out_cubic(0.25) - 0.0625).abs() < 1e-6);
        assert!((ease_in_out_cubic(0.75) - 0.9375).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_endpoints_exact() {
        let a = Vec3::new(12.345, -7.1, 0.3);
        let b = Vec3::new(-3.3, 4.9, 6.02);
        assert_eq!(lerp_vec3(a, b, 0.0), a);
        assert_eq!(lerp_vec3(a, b, 1.0), b);
        assert_eq!(lerp(0.5, 0.05, 1.0), 0.05);
        assert_eq!(lerp(0.5, 0.05, 0.0), 0.5);
    }
}
