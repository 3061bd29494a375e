//! Randomness sources for mutation decisions
//!
//! The engine draws in a fixed order while walking annotation sites, so two
//! sources that answer the same way produce byte-identical mutations.
//! [`SeededRandom`] is the production source; [`ScriptedRandom`] feeds tests a
//! predetermined script and can count how many flip draws a pass consumed.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Source of the random draws a mutation strategy consumes
pub trait RandomSource {
    /// Uniform draw from [0, 1)
    fn next_f64(&mut self) -> f64;
    /// Uniform index in `0..len`; callers guarantee `len > 0`
    fn next_index(&mut self, len: usize) -> usize;
    /// Fair coin
    fn next_bool(&mut self) -> bool;
}

/// Deterministic source derived from a session seed
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a source whose whole stream is fixed by `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn next_bool(&mut self) -> bool {
        self.rng.random()
    }
}

/// Test double that answers from fixed queues.
///
/// Each draw kind has its own queue, so a test can script flip outcomes
/// without also predicting how many candidate picks or coin tosses the pass
/// will need. Running a queue dry panics: an exhausted script means the test's
/// expectations about draw consumption are wrong, which is exactly what the
/// panic message reports.
#[derive(Default)]
pub struct ScriptedRandom {
    flips: VecDeque<f64>,
    picks: VecDeque<usize>,
    coins: VecDeque<bool>,
    flip_count: Option<Rc<Cell<usize>>>,
}

impl ScriptedRandom {
    /// Empty script; fill with the builder methods
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue uniform-draw answers, consumed by `flip` decisions in order
    pub fn with_flips(mut self, flips: impl IntoIterator<Item = f64>) -> Self {
        self.flips.extend(flips);
        self
    }

    /// Queue candidate-pick indices
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Queue coin answers
    pub fn with_coins(mut self, coins: impl IntoIterator<Item = bool>) -> Self {
        self.coins.extend(coins);
        self
    }

    /// Share a counter that is bumped on every flip draw
    pub fn with_flip_counter(mut self, counter: Rc<Cell<usize>>) -> Self {
        self.flip_count = Some(counter);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if let Some(counter) = &self.flip_count {
            counter.set(counter.get() + 1);
        }
        match self.flips.pop_front() {
            Some(value) => value,
            None => panic!("scripted random ran out of flip draws"),
        }
    }

    fn next_index(&mut self, len: usize) -> usize {
        match self.picks.pop_front() {
            Some(index) if index < len => index,
            Some(index) => panic!("scripted pick {index} out of range for {len} candidates"),
            None => panic!("scripted random ran out of candidate picks"),
        }
    }

    fn next_bool(&mut self) -> bool {
        match self.coins.pop_front() {
            Some(value) => value,
            None => panic!("scripted random ran out of coin draws"),
        }
    }
}
