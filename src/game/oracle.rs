use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of every random draw the story makes.
pub trait Oracle {
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool;
}

/// Oracle backed by a real random number generator.
pub struct RngOracle<R> {
    rng: R,
}

impl<R: Rng> RngOracle<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngOracle<StdRng> {
    /// Reproducible oracle when a seed is given, OS-seeded otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(StdRng::seed_from_u64(seed)),
            None => Self::new(StdRng::from_os_rng()),
        }
    }
}

impl<R: Rng> Oracle for RngOracle<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }
}

/// Oracle that replays queued answers, then falls back to index 0 / success.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    picks: std::collections::VecDeque<usize>,
    chances: std::collections::VecDeque<bool>,
}

#[cfg(test)]
impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_picks(mut self, picks: &[usize]) -> Self {
        self.picks.extend(picks);
        self
    }

    pub fn with_chances(mut self, chances: &[bool]) -> Self {
        self.chances.extend(chances);
        self
    }
}

#[cfg(test)]
impl Oracle for ScriptedOracle {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len - 1)
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.chances.pop_front().unwrap_or(true)
    }
}
