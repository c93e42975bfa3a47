//! Easing curves for tween interpolation.
//!
//! All curves map `0.0..=1.0` onto a progress value that starts at 0 and
//! ends at 1; elastic curves overshoot in between.

use std::f32::consts::PI;

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    #[default]
    Linear,
    /// Elastic ease-in: oscillates with growing amplitude, then snaps to
    /// the end value. Used to fan card surfaces.
    ElasticIn,
}

impl EasingFunction {
    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0]. The output is exactly 0 at t = 0
    /// and exactly 1 at t = 1.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Self::Linear => t,
            Self::ElasticIn => {
                if t == 0.0 {
                    return 0.0;
                }
                if t == 1.0 {
                    return 1.0;
                }
                -(2.0_f32.powf(10.0 * (t - 1.0))) * ((t - 1.1) * 5.0 * PI).sin()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(0.0), 0.0);
        assert_eq!(linear.evaluate(0.5), 0.5);
        assert_eq!(linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn input_clamping() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(-0.5), 0.0);
        assert_eq!(linear.evaluate(1.5), 1.0);
        assert_eq!(EasingFunction::ElasticIn.evaluate(2.0), 1.0);
    }

    #[test]
    fn elastic_in_snaps_to_endpoints_and_overshoots_below_zero() {
        let elastic = EasingFunction::ElasticIn;
        assert_eq!(elastic.evaluate(0.0), 0.0);
        assert_eq!(elastic.evaluate(1.0), 1.0);
        // Small wiggle near the start.
        assert!(elastic.evaluate(0.1).abs() < 0.01);
        // Pulls back below zero just before the end.
        assert!(elastic.evaluate(0.85) < -0.2);
        let dips = (1..100).any(|i| elastic.evaluate(i as f32 / 100.0) < -0.1);
        assert!(dips);
    }

    #[test]
    fn default_is_linear() {
        assert_eq!(EasingFunction::default(), EasingFunction::Linear);
    }
}
