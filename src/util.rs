//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A closed interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd> Interval<T> {
    /// Returns true if this interval contains the value.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    /// Returns true if `min <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

impl<T: std::ops::Sub<T, Output = T> + Copy> Interval<T> {
    /// Gets the magnitude of the interval.
    pub fn length(&self) -> T {
        self.max - self.min
    }
}

impl Interval<f64> {
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t * (self.max - self.min)
    }

    /// Draws a value uniformly from `[min, max)`.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        self.lerp(rng.gen::<f64>())
    }
}

impl Interval<usize> {
    /// Draws an integer uniformly from `[min, max]`.
    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        rng.gen_range(self.min..=self.max)
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

/// Rounds a value to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn lerp() {
        let range = Interval::new(82.0, 98.0);
        assert_approx_eq!(range.lerp(0.0), 82.0);
        assert_approx_eq!(range.lerp(0.25), 86.0);
        assert_approx_eq!(range.lerp(0.5), 90.0);
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let floats = Interval::new(1.2, 2.8);
        let ints = Interval::new(3usize, 6);
        for _ in 0..500 {
            let f = floats.sample(&mut rng);
            assert!(f >= 1.2 && f < 2.8);
            assert!(ints.contains(ints.sample(&mut rng)));
        }
    }

    #[test]
    fn rounding() {
        assert_approx_eq!(round1(91.26), 91.3);
        assert_approx_eq!(round1(82.04), 82.0);
    }
}
