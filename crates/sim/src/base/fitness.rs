use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper clamp for fitness values.
///
/// The quadratic-form fitness can blow up when the precision matrix is
/// near-singular or indefinite; anything above this cap is treated as the
/// cap rather than as an error.
pub const MAX_FITNESS: f64 = 1e5;

/// A fitness value constrained to the range [0.0, 1e5].
///
/// Non-finite inputs clamp instead of propagating: NaN becomes 0.0
/// (lethal), positive infinity becomes the cap.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Fitness(f64);

impl Fitness {
    /// Zero fitness: the individual contributes no resampling weight.
    pub const LETHAL: Fitness = Fitness(0.0);
    /// Neutral fitness of a perfectly adapted individual with no selection.
    pub const NEUTRAL: Fitness = Fitness(1.0);

    /// Creates a new fitness value, clamping the input to [0.0, 1e5].
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, MAX_FITNESS))
    }

    /// Returns the inner f64 value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for Fitness {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Fitness> for f64 {
    fn from(fitness: Fitness) -> Self {
        fitness.0
    }
}

impl Default for Fitness {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for Fitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_negative_to_zero() {
        assert_eq!(Fitness::new(-1.0).get(), 0.0);
    }

    #[test]
    fn test_new_preserves_midrange() {
        assert_eq!(Fitness::new(0.5).get(), 0.5);
        assert_eq!(Fitness::new(1.0).get(), 1.0);
        assert_eq!(Fitness::new(42.0).get(), 42.0);
    }

    #[test]
    fn test_new_clamps_above_cap() {
        assert_eq!(Fitness::new(1e6).get(), MAX_FITNESS);
        assert_eq!(Fitness::new(f64::INFINITY).get(), MAX_FITNESS);
    }

    #[test]
    fn test_nan_clamps_to_lethal() {
        assert_eq!(Fitness::new(f64::NAN), Fitness::LETHAL);
    }

    #[test]
    fn test_neg_infinity_clamps_to_lethal() {
        assert_eq!(Fitness::new(f64::NEG_INFINITY), Fitness::LETHAL);
    }

    #[test]
    fn test_from_f64_roundtrip() {
        let f: Fitness = 0.75.into();
        let back: f64 = f.into();
        assert_eq!(back, 0.75);
    }

    #[test]
    fn test_default_is_neutral() {
        assert_eq!(Fitness::default(), Fitness::NEUTRAL);
    }

    #[test]
    fn test_display_parsable() {
        let disp = Fitness::new(0.25).to_string();
        let parsed: f64 = disp.parse().unwrap();
        assert_eq!(parsed, 0.25);
    }
}
