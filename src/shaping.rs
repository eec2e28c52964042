//! Mapping of decoded physical values onto controller ranges.

/// Linearly maps `x` from `[in_min, in_max]` to `[out_min, out_max]`. Inputs outside the range saturate to the
/// corresponding end of the output range.
pub fn range_map(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if x < in_min.min(in_max) {
        return out_min;
    }
    if x > in_min.max(in_max) {
        return out_max;
    }
    if in_max == in_min {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Steering response of a vehicle profile.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteeringCurve {
    /// Decoded angle that maps to full lock.
    pub max: f64,
    /// Normalized magnitude at or below which the output is zero.
    pub deadzone: f64,
    /// 1.0 is linear, larger values soften the center.
    pub exponent: f64,
}

impl SteeringCurve {
    pub fn new(max: f64, deadzone: f64, exponent: f64) -> Self {
        Self { max, deadzone, exponent }
    }

    /// Shapes a decoded angle into a stick position in `-1.0..=1.0`.
    pub fn shape(&self, angle: f64) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }

        // Same as range_map over [-max, max], but exactly odd
        let value = (angle / self.max).clamp(-1.0, 1.0);
        if value.abs() <= self.deadzone {
            return 0.0;
        }
        value * value.abs().powf(self.exponent - 1.0)
    }
}

/// Pedal position in percent to `0.0..=1.0`.
pub fn pedal(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_map_saturates() {
        assert_eq!(range_map(-5.0, 0.0, 10.0, -1.0, 1.0), -1.0);
        assert_eq!(range_map(15.0, 0.0, 10.0, -1.0, 1.0), 1.0);
        assert_eq!(range_map(5.0, 0.0, 10.0, -1.0, 1.0), 0.0);
    }

    #[test]
    fn range_map_inverted_output() {
        assert_eq!(range_map(0.0, 0.0, 10.0, 1.0, -1.0), 1.0);
        assert_eq!(range_map(10.0, 0.0, 10.0, 1.0, -1.0), -1.0);
        assert_eq!(range_map(20.0, 0.0, 10.0, 1.0, -1.0), -1.0);
    }

    #[test]
    fn range_map_empty_input_range() {
        assert_eq!(range_map(3.0, 3.0, 3.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn linear_curve_beyond_deadzone() {
        let curve = SteeringCurve::new(0.15, 0.1, 1.0);
        assert!((curve.shape(0.075) - 0.5).abs() < 1e-9);
        assert_eq!(curve.shape(0.01), 0.0);
        assert_eq!(curve.shape(0.3), 1.0);
    }

    #[test]
    fn exponent_softens_center() {
        let curve = SteeringCurve::new(1.0, 0.0, 2.0);
        assert!((curve.shape(0.5) - 0.25).abs() < 1e-9);
        assert!((curve.shape(-0.5) + 0.25).abs() < 1e-9);
    }

    #[test]
    fn pedal_is_clamped() {
        assert_eq!(pedal(50.0), 0.5);
        assert_eq!(pedal(250.0), 1.0);
        assert_eq!(pedal(-20.0), 0.0);
    }
}
