//! Random number source for accuracy and damage rolls

/// Source of die rolls consumed by the resolver.
///
/// Implementations must be deterministic for a given seed so that a run can
/// be replayed exactly.
pub trait Dice {
    /// Roll one die with `sides` faces, returning a value in `1..=sides`.
    fn roll(&mut self, sides: u32) -> u32;

    /// Roll `count` dice with `sides` faces and sum them.
    fn roll_sum(&mut self, count: u32, sides: u32) -> u32 {
        (0..count).map(|_| self.roll(sides)).sum()
    }

    /// Natural d20 used for accuracy checks.
    fn d20(&mut self) -> u32 {
        self.roll(20)
    }
}

/// Fast RNG wrapper for better performance
#[derive(Debug, Clone)]
pub struct FastRng {
    inner: fastrand::Rng,
}

impl FastRng {
    #[inline(always)]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: fastrand::Rng::with_seed(seed),
        }
    }

    /// Seed from the thread-local entropy source
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    #[inline(always)]
    fn gen_range(&mut self, low: u32, high: u32) -> u32 {
        self.inner.u32(low..high)
    }
}

impl Dice for FastRng {
    #[inline(always)]
    fn roll(&mut self, sides: u32) -> u32 {
        if sides <= 1 {
            return 1;
        }
        self.gen_range(1, sides + 1)
    }
}
