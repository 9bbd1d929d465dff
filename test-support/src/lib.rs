// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Helpers shared by the tests, benchmarks, and demo programs.

#[macro_use] extern crate slog;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slog::Drain;

/// Create a simple `slog` logger for use in test programs.
///
/// It logs to the terminal using default parameters, as per the `slog` basic
/// example.
pub fn default_log() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain)
        .overflow_strategy(slog_async::OverflowStrategy::Block)
        .build().fuse();
    slog::Logger::root(drain, o!())
}


/// Samples numbers from a uniform or log-uniform distribution.
///
/// The generator is seeded so that a failing property check can be
/// reproduced.
pub struct Sampler {
    is_log: bool,
    low: f64,
    range: f64,
    rng: StdRng,
}

impl Sampler {
    /// Create a new Sampler drawing from `[low, high)`.
    pub fn new(is_log: bool, mut low: f64, mut high: f64, seed: u64) -> Self {
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }

        if is_log {
            low = low.ln();
            high = high.ln();
        }

        Sampler { is_log, low, range: high - low, rng: StdRng::seed_from_u64(seed) }
    }

    /// Sample a number from the distribution.
    pub fn get(&mut self) -> f64 {
        let n = self.low + self.rng.gen::<f64>() * self.range;

        if self.is_log {
            n.exp()
        } else {
            n
        }
    }
}


/// `n` evenly spaced photon energies, in eV, from `low` to `high` inclusive.
/// A single point sits at `low`.
pub fn linear_grid(low: f64, high: f64, n: usize) -> Vec<f64> {
    match n {
        0 => return Vec::new(),
        1 => return vec![low],
        _ => {},
    }

    let step = (high - low) / (n - 1) as f64;
    (0..n).map(|i| low + step * i as f64).collect()
}


/// Logarithmically spaced photon energies, in eV, from `low` to `high`
/// inclusive. Both must be positive.
pub fn log_grid(low: f64, high: f64, n: usize) -> Vec<f64> {
    linear_grid(low.ln(), high.ln(), n).into_iter().map(f64::exp).collect()
}


#[cfg(test)]
mod tests {
    use super::{linear_grid, log_grid};

    #[test]
    fn grid_sizes() {
        assert!(linear_grid(1., 2., 0).is_empty());
        assert!(log_grid(1., 2., 0).is_empty());
        assert_eq!(linear_grid(1., 2., 1), vec![1.]);
        assert_eq!(linear_grid(1., 2., 3), vec![1., 1.5, 2.]);
        assert_eq!(log_grid(10., 1000., 3).len(), 3);
    }
}
