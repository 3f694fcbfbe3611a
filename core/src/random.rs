use rand::prelude::*;

/// Source of the randomness used for mine placement and picking the opening.
///
/// Uniformity is all that matters here, nothing needs to be cryptographically secure.
pub trait RandomSource {
    /// Returns a uniformly distributed index in `0..upper`. `upper` is never zero.
    fn below(&mut self, upper: usize) -> usize;
}

impl RandomSource for SmallRng {
    fn below(&mut self, upper: usize) -> usize {
        self.random_range(0..upper)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn below(&mut self, upper: usize) -> usize {
        (**self).below(upper)
    }
}

/// Seeded generator so callers only need to carry a `u64` around.
pub fn seeded(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
