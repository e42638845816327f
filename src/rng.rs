use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the uniform draws the simulation consumes.
pub(crate) trait RandomSource {
    /// Uniform value in [0, 1).
    fn fraction(&mut self) -> f64;
    /// Uniform integer in [0, n). `n` must be non-zero.
    fn below(&mut self, n: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn fraction(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn below(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }
}

/// Seeds from the wall clock unless the caller pinned one.
pub(crate) fn seeded(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_secs()
    });
    (StdRng::seed_from_u64(seed), seed)
}

/// Replays fixed draws in order; panics when a queue runs dry.
#[cfg(test)]
pub(crate) struct Scripted {
    fractions: std::collections::VecDeque<f64>,
    ints: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl Scripted {
    pub(crate) fn new(fractions: &[f64], ints: &[usize]) -> Self {
        Self {
            fractions: fractions.iter().copied().collect(),
            ints: ints.iter().copied().collect(),
        }
    }

    pub(crate) fn is_drained(&self) -> bool {
        self.fractions.is_empty() && self.ints.is_empty()
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn fraction(&mut self) -> f64 {
        self.fractions.pop_front().expect("scripted fraction exhausted")
    }

    fn below(&mut self, n: usize) -> usize {
        let v = self.ints.pop_front().expect("scripted integer exhausted");
        assert!(v < n, "scripted draw {v} out of range 0..{n}");
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_rng_draws_stay_in_range() {
        let (mut rng, _) = seeded(Some(7));
        for _ in 0..1000 {
            let f = rng.fraction();
            assert!((0.0..1.0).contains(&f));
            assert!(rng.below(13) < 13);
        }
    }

    #[test]
    fn pinned_seed_is_reproducible() {
        let (mut a, sa) = seeded(Some(42));
        let (mut b, sb) = seeded(Some(42));
        assert_eq!(sa, sb);
        let xs: Vec<usize> = (0..32).map(|_| a.below(100)).collect();
        let ys: Vec<usize> = (0..32).map(|_| b.below(100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn scripted_replays_in_order() {
        let mut s = Scripted::new(&[0.5, 0.25], &[3, 1]);
        assert_eq!(s.fraction(), 0.5);
        assert_eq!(s.below(10), 3);
        assert_eq!(s.below(2), 1);
        assert_eq!(s.fraction(), 0.25);
        assert!(s.is_drained());
    }
}
