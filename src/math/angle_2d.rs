use std::f64::consts::PI;

/// Signed angle between vectors `(x1, y1)` and `(x2, y2)`, in `(-π, π]`.
///
/// The sign is flipped relative to `atan2(cross, dot)`, so a counter-clockwise
/// turn from the first vector to the second yields a negative angle.
#[must_use]
pub fn angle(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dot = x1 * x2 + y1 * y2;
    let det = x1 * y2 - y1 * x2;
    -det.atan2(dot)
}

/// Same as [`angle`], shifted into `[0, 2π)`.
#[must_use]
pub fn angle_2pi(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let theta = angle(x1, y1, x2, y2);
    if theta < 0.0 {
        theta + 2.0 * PI
    } else {
        theta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn quarter_turns_have_opposite_signs() {
        // +x to +y is a CCW quarter turn.
        assert_abs_diff_eq!(angle(1.0, 0.0, 0.0, 1.0), -PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angle(0.0, 1.0, 1.0, 0.0), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn opposite_vectors_give_pi() {
        assert_abs_diff_eq!(angle(-1.0, 0.0, 1.0, 0.0).abs(), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(angle_2pi(-100.0, 0.0, 100.0, 0.0), PI, epsilon = 1e-12);
    }

    #[test]
    fn angle_2pi_wraps_negative_angles() {
        assert_abs_diff_eq!(angle_2pi(1.0, 0.0, 0.0, 1.0), 1.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(angle_2pi(0.0, 1.0, 1.0, 0.0), 0.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn angle_2pi_stays_in_range() {
        for i in 0..16 {
            let a = f64::from(i) * PI / 8.0;
            let theta = angle_2pi(1.0, 0.0, a.cos(), a.sin());
            assert!((0.0..2.0 * PI).contains(&theta), "theta={theta}");
        }
    }
}
