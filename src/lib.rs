#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;
#[macro_use]
extern crate log;
extern crate rand;
extern crate rand_xorshift;
extern crate rayon;
extern crate chrono;
extern crate csv;
extern crate thiserror;

mod error;
mod union_find;
mod percolation;
mod stats;

pub use error::{Error, Result};

pub use union_find::UnionFind;

pub use percolation::{Percolation, Reach};

pub use stats::{PercolationStats, PermutationSource, RandomPermutation, run_trial};
