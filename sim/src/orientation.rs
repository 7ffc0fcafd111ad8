//! Shortest-path yaw easing.

use std::f32::consts::{PI, TAU};

/// Signed shortest angular step from `current` to `target`, in `(-π, π]`.
///
/// `current + delta` is congruent to `target` modulo 2π. A plain
/// `target - current` goes the long way round across the ±π seam.
#[inline]
pub fn shortest_yaw_delta(current: f32, target: f32) -> f32 {
    let delta = (target - current + PI).rem_euclid(TAU) - PI;
    if delta <= -PI { delta + TAU } else { delta }
}

/// Wrap any angle into `(-π, π]`.
#[inline]
pub fn wrap_yaw(yaw: f32) -> f32 {
    shortest_yaw_delta(0.0, yaw)
}

/// Ease `current` toward `target` by `blend` of the shortest delta.
///
/// One call per tick; the result is wrapped into `(-π, π]`.
#[inline]
pub fn smooth_yaw(current: f32, target: f32, blend: f32) -> f32 {
    let delta = shortest_yaw_delta(current, target);
    let end = current + delta;
    wrap_yaw(current + (end - current) * blend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn congruent(a: f32, b: f32) -> bool {
        let d = (a - b).rem_euclid(TAU);
        d < 1.0e-4 || (TAU - d) < 1.0e-4
    }

    #[test]
    fn delta_is_in_half_open_range_and_lands_on_target() {
        let steps = 97;
        for i in 0..steps {
            for j in 0..steps {
                let current = TAU * i as f32 / steps as f32;
                let target = TAU * j as f32 / steps as f32;
                let delta = shortest_yaw_delta(current, target);

                assert!(delta > -PI && delta <= PI, "delta {delta} for {current} -> {target}");
                assert!(congruent(current + delta, target));
            }
        }
    }

    #[rstest]
    #[case(3.0, -3.0, TAU - 6.0)]
    #[case(-3.0, 3.0, 6.0 - TAU)]
    #[case(0.0, PI, PI)]
    #[case(PI, 0.0, PI)]
    #[case(0.5, 0.25, -0.25)]
    fn delta_takes_the_short_way(#[case] current: f32, #[case] target: f32, #[case] expected: f32) {
        assert!((shortest_yaw_delta(current, target) - expected).abs() < 1.0e-5);
    }

    #[test]
    fn smoothing_crosses_the_seam_instead_of_spinning() {
        // From just below +π toward just above -π: the short way is +0.2 rad.
        let current = PI - 0.05;
        let target = -PI + 0.15;

        let next = smooth_yaw(current, target, 0.4);

        // 0.4 * 0.2 = 0.08 forward, which wraps past +π.
        assert!(congruent(next, current + 0.08));
        assert!(next < 0.0 && next > -PI);
    }

    #[test]
    fn smoothing_converges_to_target() {
        let mut yaw = 0.0;
        for _ in 0..60 {
            yaw = smooth_yaw(yaw, -std::f32::consts::FRAC_PI_2, 0.4);
        }
        assert!((yaw + std::f32::consts::FRAC_PI_2).abs() < 1.0e-4);
    }
}
