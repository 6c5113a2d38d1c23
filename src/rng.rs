//! Seeded uniform-variate source.
//!
//! Every component that needs randomness takes a `&mut Rng`; nothing in the
//! crate builds its own generator. Seeding is explicit:
//!
//! - `Rng::with_seed(s)` is fully deterministic for a given call sequence.
//! - `Rng::from_time()` seeds from the wall clock and is meant for default runs.
//!
//! ```rust
//! use neural_run::Rng;
//!
//! # fn main() -> neural_run::Result<()> {
//! let mut a = Rng::with_seed(7);
//! let mut b = Rng::with_seed(7);
//! assert_eq!(a.get_int(0, 100)?, b.get_int(0, 100)?);
//! # Ok(())
//! # }
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng as _, RngCore, SeedableRng};

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Rng {
    inner: StdRng,
}

impl Rng {
    /// `Some(seed)` is deterministic; `None` seeds from the wall clock.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::from_time(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_time() -> Self {
        // A clock before the epoch only happens on badly configured hosts; any seed will do.
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(nanos)
    }

    /// Derive an independent child stream by drawing its seed from `self`.
    pub fn fork(&mut self) -> Rng {
        Self::with_seed(self.inner.next_u64())
    }

    /// A uniformly distributed integer in the closed interval `[min, max]`.
    pub fn get_int(&mut self, min: i64, max: i64) -> Result<i64> {
        if min > max {
            return Err(Error::InvalidRange {
                min: min as f64,
                max: max as f64,
            });
        }
        Ok(self.inner.gen_range(min..=max))
    }

    /// A uniformly distributed real in the half-open interval `[min, max)`.
    ///
    /// Returns `min` when `min == max`.
    pub fn get_real(&mut self, min: f64, max: f64) -> Result<f64> {
        check_range(min, max)?;
        if min == max {
            return Ok(min);
        }
        let t = self.inner.gen_range(0.0..1.0);
        let v = lerp(min, max, t).clamp(min, max);
        Ok(if v < max { v } else { max.next_down() })
    }

    /// A uniformly distributed real in the closed interval `[min, max]`.
    pub fn get_double(&mut self, min: f64, max: f64) -> Result<f64> {
        check_range(min, max)?;
        if min == max {
            return Ok(min);
        }
        let t = self.inner.gen_range(0.0..=1.0);
        Ok(lerp(min, max, t).clamp(min, max))
    }

    /// Shuffle `values` in place.
    pub fn shuffle<T>(&mut self, values: &mut [T]) {
        values.shuffle(&mut self.inner);
    }

    /// Draw from `[0, 1)` and report whether it fell below `probability`.
    ///
    /// Consumes exactly one draw regardless of `probability`.
    #[inline]
    pub fn chance(&mut self, probability: f64) -> bool {
        self.inner.gen_range(0.0..1.0) < probability
    }
}

// Interpolates without forming `max - min`, which overflows for spans wider than `f64::MAX`.
#[inline]
fn lerp(min: f64, max: f64, t: f64) -> f64 {
    min * (1.0 - t) + max * t
}

#[inline]
fn check_range(min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(Error::InvalidRange { min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Rng::with_seed(42);
        let mut b = Rng::with_seed(42);
        for _ in 0..200 {
            assert_eq!(a.get_int(-10, 10).unwrap(), b.get_int(-10, 10).unwrap());
            assert_eq!(
                a.get_real(0.0, 1.0).unwrap().to_bits(),
                b.get_real(0.0, 1.0).unwrap().to_bits()
            );
            assert_eq!(
                a.get_double(-6.0, 6.0).unwrap().to_bits(),
                b.get_double(-6.0, 6.0).unwrap().to_bits()
            );
            assert_eq!(a.chance(0.5), b.chance(0.5));
        }
    }

    #[test]
    fn explicit_seed_via_new_matches_with_seed() {
        let mut a = Rng::new(Some(9));
        let mut b = Rng::with_seed(9);
        assert_eq!(
            a.get_int(0, 1_000_000).unwrap(),
            b.get_int(0, 1_000_000).unwrap()
        );
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Rng::with_seed(1);
        let mut b = Rng::with_seed(2);
        let xs: Vec<i64> = (0..16).map(|_| a.get_int(0, i64::MAX).unwrap()).collect();
        let ys: Vec<i64> = (0..16).map(|_| b.get_int(0, i64::MAX).unwrap()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn forks_are_deterministic_and_independent() {
        let mut parent_a = Rng::with_seed(5);
        let mut parent_b = Rng::with_seed(5);
        let mut child_a1 = parent_a.fork();
        let mut child_a2 = parent_a.fork();
        let mut child_b1 = parent_b.fork();

        let x1 = child_a1.get_double(0.0, 1.0).unwrap();
        let x2 = child_a2.get_double(0.0, 1.0).unwrap();
        assert_eq!(x1, child_b1.get_double(0.0, 1.0).unwrap());
        assert_ne!(x1, x2);
    }

    #[test]
    fn outputs_respect_bounds() {
        let mut rng = Rng::with_seed(3);
        for _ in 0..10_000 {
            let i = rng.get_int(-3, 4).unwrap();
            assert!((-3..=4).contains(&i));

            let r = rng.get_real(-1.5, 2.5).unwrap();
            assert!((-1.5..2.5).contains(&r));

            let d = rng.get_double(0.0, 1.0).unwrap();
            assert!((0.0..=1.0).contains(&d));
        }
    }

    #[test]
    fn get_int_covers_closed_interval() {
        let mut rng = Rng::with_seed(11);
        let mut seen = [false; 3];
        for _ in 0..1_000 {
            seen[rng.get_int(0, 2).unwrap() as usize] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn degenerate_intervals() {
        let mut rng = Rng::with_seed(0);
        assert_eq!(rng.get_int(4, 4).unwrap(), 4);
        assert_eq!(rng.get_real(2.0, 2.0).unwrap(), 2.0);
        assert_eq!(rng.get_double(2.0, 2.0).unwrap(), 2.0);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut rng = Rng::with_seed(0);
        assert!(matches!(rng.get_int(5, 4), Err(Error::InvalidRange { .. })));
        assert!(matches!(
            rng.get_real(1.0, 0.0),
            Err(Error::InvalidRange { .. })
        ));
        assert!(matches!(
            rng.get_double(1.0, -1.0),
            Err(Error::InvalidRange { .. })
        ));
        assert!(rng.get_double(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn spans_wider_than_f64_max_do_not_overflow() {
        let mut rng = Rng::with_seed(0);
        for _ in 0..1_000 {
            let d = rng.get_double(-f64::MAX, f64::MAX).unwrap();
            assert!(d.is_finite());

            let r = rng.get_real(-1e308, 1e308).unwrap();
            assert!((-1e308..1e308).contains(&r));
        }
        assert!(rng.get_real(0.0, f64::MAX).unwrap() < f64::MAX);
    }

    #[test]
    fn shuffle_is_a_seeded_permutation() {
        let mut a: Vec<usize> = (0..50).collect();
        let mut b = a.clone();
        Rng::with_seed(4).shuffle(&mut a);
        Rng::with_seed(4).shuffle(&mut b);
        assert_eq!(a, b);
        assert_ne!(a, (0..50).collect::<Vec<_>>());

        a.sort_unstable();
        assert_eq!(a, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn chance_extremes() {
        let mut rng = Rng::with_seed(8);
        assert!((0..1_000).all(|_| !rng.chance(0.0)));
        assert!((0..1_000).all(|_| rng.chance(1.0)));
    }
}
