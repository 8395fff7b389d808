//! Easing functions
//!
//! Standard easing curves based on Robert Penner's equations. Every curve
//! maps normalized time `t` in `[0, 1]` to an eased value with `f(0) = 0` and
//! `f(1) = 1` (elastic and back overshoot in between by design).
//!
//! Curves can be resolved dynamically by name via [`Easing::from_name`];
//! unknown names fall back to [`Easing::Linear`] rather than failing, so a
//! typo'd curve name in host data can never break an animation.

use std::f32::consts::PI;

/// An easing curve, applied to normalized progress via [`Easing::apply`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// No acceleration
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
    BackIn,
    BackOut,
    BackInOut,
}

impl Easing {
    /// Apply the curve to normalized progress `t`
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,

            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }

            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 1.0 - t;
                    1.0 - 4.0 * u * u * u
                }
            }

            Easing::QuartIn => t * t * t * t,
            Easing::QuartOut => {
                let u = 1.0 - t;
                1.0 - u * u * u * u
            }
            Easing::QuartInOut => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let u = 1.0 - t;
                    1.0 - 8.0 * u * u * u * u
                }
            }

            Easing::QuintIn => t * t * t * t * t,
            Easing::QuintOut => {
                let u = 1.0 - t;
                1.0 - u * u * u * u * u
            }
            Easing::QuintInOut => {
                if t < 0.5 {
                    16.0 * t * t * t * t * t
                } else {
                    let u = 1.0 - t;
                    1.0 - 16.0 * u * u * u * u * u
                }
            }

            // Exponential curves special-case the exact endpoints to avoid
            // the pow() asymptote never quite reaching 0/1.
            Easing::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    (2.0f32).powf(10.0 * (t - 1.0))
                }
            }
            Easing::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - (2.0f32).powf(-10.0 * t)
                }
            }
            Easing::ExpoInOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    0.5 * (2.0f32).powf(20.0 * t - 10.0)
                } else {
                    1.0 - 0.5 * (2.0f32).powf(-20.0 * t + 10.0)
                }
            }

            Easing::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircOut => (1.0 - (1.0 - t) * (1.0 - t)).sqrt(),
            Easing::CircInOut => {
                if t < 0.5 {
                    0.5 * (1.0 - (1.0 - 4.0 * t * t).sqrt())
                } else {
                    0.5 * ((1.0 - 4.0 * (1.0 - t) * (1.0 - t)).sqrt() + 1.0)
                }
            }

            Easing::ElasticIn => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    let c4 = (2.0 * PI) / 3.0;
                    -(2.0f32).powf(10.0 * t - 10.0) * ((t * 10.0 - 10.75) * c4).sin()
                }
            }
            Easing::ElasticOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    let c4 = (2.0 * PI) / 3.0;
                    (2.0f32).powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
                }
            }
            Easing::ElasticInOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    let c5 = (2.0 * PI) / 4.5;
                    if t < 0.5 {
                        -((2.0f32).powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                    } else {
                        ((2.0f32).powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                            + 1.0
                    }
                }
            }

            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::BounceOut => bounce_out(t),
            Easing::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }

            Easing::BackIn => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                C3 * t * t * t - C1 * t * t
            }
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                let u = t - 1.0;
                1.0 + C3 * u * u * u + C1 * u * u
            }
            Easing::BackInOut => {
                const C1: f32 = 1.70158;
                const C2: f32 = C1 * 1.525;
                if t < 0.5 {
                    ((2.0 * t) * (2.0 * t) * ((C2 + 1.0) * 2.0 * t - C2)) / 2.0
                } else {
                    let u = 2.0 * t - 2.0;
                    (u * u * ((C2 + 1.0) * u + C2) + 2.0) / 2.0
                }
            }
        }
    }

    /// Resolve an easing curve by name
    ///
    /// Lookup is case-insensitive and ignores `-`/`_` separators, so
    /// `"easeOutCubic"`, `"ease-out-cubic"`, and `"EASEOUTCUBIC"` all resolve
    /// to [`Easing::CubicOut`]. Unknown names resolve to [`Easing::Linear`];
    /// this is a deliberate fallback, not an error.
    pub fn from_name(name: &str) -> Easing {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "linear" => Easing::Linear,

            "easeinquad" => Easing::QuadIn,
            "easeoutquad" => Easing::QuadOut,
            "easeinoutquad" => Easing::QuadInOut,

            "easeincubic" => Easing::CubicIn,
            "easeoutcubic" => Easing::CubicOut,
            "easeinoutcubic" => Easing::CubicInOut,

            "easeinquart" => Easing::QuartIn,
            "easeoutquart" => Easing::QuartOut,
            "easeinoutquart" => Easing::QuartInOut,

            "easeinquint" => Easing::QuintIn,
            "easeoutquint" => Easing::QuintOut,
            "easeinoutquint" => Easing::QuintInOut,

            "easeinexpo" => Easing::ExpoIn,
            "easeoutexpo" => Easing::ExpoOut,
            "easeinoutexpo" => Easing::ExpoInOut,

            "easeincirc" => Easing::CircIn,
            "easeoutcirc" => Easing::CircOut,
            "easeinoutcirc" => Easing::CircInOut,

            "easeinelastic" => Easing::ElasticIn,
            "easeoutelastic" => Easing::ElasticOut,
            "easeinoutelastic" => Easing::ElasticInOut,

            "easeinbounce" => Easing::BounceIn,
            "easeoutbounce" => Easing::BounceOut,
            "easeinoutbounce" => Easing::BounceInOut,

            "easeinback" => Easing::BackIn,
            "easeoutback" => Easing::BackOut,
            "easeinoutback" => Easing::BackInOut,

            _ => Easing::Linear,
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let u = t - 1.5 / D1;
        N1 * u * u + 0.75
    } else if t < 2.5 / D1 {
        let u = t - 2.25 / D1;
        N1 * u * u + 0.9375
    } else {
        let u = t - 2.625 / D1;
        N1 * u * u + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 28] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::QuintIn,
        Easing::QuintOut,
        Easing::QuintInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::CircIn,
        Easing::CircOut,
        Easing::CircInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert!(
                easing.apply(0.0).abs() < 1e-4,
                "{easing:?} f(0) = {}",
                easing.apply(0.0)
            );
            assert!(
                (easing.apply(1.0) - 1.0).abs() < 1e-4,
                "{easing:?} f(1) = {}",
                easing.apply(1.0)
            );
        }
    }

    #[test]
    fn linear_is_identity() {
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
        assert_eq!(Easing::Linear.apply(0.75), 0.75);
    }

    #[test]
    fn cubic_out_midpoint() {
        // 1 - (1 - 0.5)^3 = 0.875
        assert!((Easing::CubicOut.apply(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(Easing::from_name("easeOutCubic"), Easing::CubicOut);
        assert_eq!(Easing::from_name("EASEINQUAD"), Easing::QuadIn);
        assert_eq!(Easing::from_name("ease-in-out-expo"), Easing::ExpoInOut);
        assert_eq!(Easing::from_name("ease_out_bounce"), Easing::BounceOut);
    }

    #[test]
    fn unknown_name_falls_back_to_linear() {
        assert_eq!(Easing::from_name("not-a-real-curve"), Easing::Linear);
        assert_eq!(Easing::from_name(""), Easing::Linear);
    }

    #[test]
    fn expo_endpoints_are_guarded() {
        // Without the endpoint guards these would be 2^-10 and 1 - 2^-10.
        assert_eq!(Easing::ExpoIn.apply(0.0), 0.0);
        assert_eq!(Easing::ExpoOut.apply(1.0), 1.0);
        assert_eq!(Easing::ElasticIn.apply(0.0), 0.0);
        assert_eq!(Easing::ElasticOut.apply(1.0), 1.0);
    }
}
