//! RNG module - injectable randomness for tile spawning
//!
//! The spawner never reaches for a global generator. It takes any
//! [`RandomSource`], so play can use an entropy-seeded `SmallRng` while tests
//! and replays use the deterministic [`SimpleRng`] or a scripted source.

use rand::rngs::SmallRng;
use rand::Rng;

/// Source of the two draws a spawn needs.
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. `bound` is never 0.
    fn next_below(&mut self, bound: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_below(&mut self, bound: usize) -> usize {
        (**self).next_below(bound)
    }

    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (restarting from it replays the same sequence).
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomSource for SimpleRng {
    fn next_below(&mut self, bound: usize) -> usize {
        self.next_range(bound as u32) as usize
    }

    fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Replays fixed draws, cycling when a list runs out.
///
/// Index draws are reduced modulo the requested bound. An empty list yields 0.
#[derive(Debug, Clone, Default)]
pub struct SequenceRng {
    indices: Vec<usize>,
    units: Vec<f64>,
    index_pos: usize,
    unit_pos: usize,
}

impl SequenceRng {
    pub fn new(indices: Vec<usize>, units: Vec<f64>) -> Self {
        Self {
            indices,
            units,
            index_pos: 0,
            unit_pos: 0,
        }
    }

    /// Always picks the first empty cell and always spawns a 2.
    pub fn first_cell_twos() -> Self {
        Self::new(vec![0], vec![0.0])
    }
}

impl RandomSource for SequenceRng {
    fn next_below(&mut self, bound: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let v = self.indices[self.index_pos % self.indices.len()];
        self.index_pos += 1;
        v % bound
    }

    fn next_unit(&mut self) -> f64 {
        if self.units.is_empty() {
            return 0.0;
        }
        let v = self.units[self.unit_pos % self.units.len()];
        self.unit_pos += 1;
        v
    }
}

impl RandomSource for SmallRng {
    fn next_below(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }

    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}
