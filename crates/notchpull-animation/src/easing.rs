//! Easing curves.

/// Shapes a linear animation fraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    /// No shaping.
    Linear,
    /// Cubic acceleration from rest.
    EaseIn,
    /// Cubic deceleration to rest.
    EaseOut,
    /// Cubic acceleration then deceleration; the curve the reset animations
    /// use.
    EaseInOut,
}

impl Easing {
    /// Maps a linear fraction in `[0, 1]` through the curve.
    ///
    /// Inputs outside the range are clamped, and both endpoints map exactly
    /// to themselves so a finished animation lands on its target.
    pub fn transform(self, fraction: f32) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 - 2.0 * t;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    #[test]
    fn endpoints_are_exact() {
        for curve in CURVES {
            assert_eq!(curve.transform(0.0), 0.0, "{curve:?}");
            assert_eq!(curve.transform(1.0), 1.0, "{curve:?}");
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        for curve in CURVES {
            assert_eq!(curve.transform(-2.5), 0.0, "{curve:?}");
            assert_eq!(curve.transform(7.0), 1.0, "{curve:?}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in CURVES {
            let mut previous = 0.0;
            for step in 0..=100 {
                let value = curve.transform(step as f32 / 100.0);
                assert!(
                    value >= previous - f32::EPSILON,
                    "{curve:?} decreased at step {step}"
                );
                previous = value;
            }
        }
    }

    #[test]
    fn ease_in_out_is_symmetric_about_midpoint() {
        for step in 0..=50 {
            let t = step as f32 / 100.0;
            let lower = Easing::EaseInOut.transform(t);
            let upper = Easing::EaseInOut.transform(1.0 - t);
            assert!((lower + upper - 1.0).abs() < 1e-5, "asymmetry at t={t}");
        }
    }

    #[test]
    fn ease_in_starts_slow_ease_out_starts_fast() {
        assert!(Easing::EaseIn.transform(0.25) < 0.25);
        assert!(Easing::EaseOut.transform(0.25) > 0.25);
    }
}
