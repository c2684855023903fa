use std::path::Path;

use chrono::Local;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::percolation::Percolation;

const CONFIDENCE_95: f64 = 1.96;

/// Supplies the order in which sites get opened.
pub trait PermutationSource {
    /// A bijection on `0..n`.
    fn permutation(&mut self, n: usize) -> Vec<usize>;
}

/// Uniformly random permutations drawn from `R`.
pub struct RandomPermutation<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomPermutation<R> {
    pub fn new(rng: R) -> RandomPermutation<R> {
        RandomPermutation { rng }
    }
}

impl RandomPermutation<XorShiftRng> {
    pub fn from_seed(seed: u64) -> RandomPermutation<XorShiftRng> {
        RandomPermutation::new(XorShiftRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PermutationSource for RandomPermutation<R> {
    fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut perm = (0..n).collect::<Vec<_>>();
        perm.shuffle(&mut self.rng);
        perm
    }
}

/// Opens sites of a fresh n-by-n grid in the order given by `source` until it
/// percolates. Returns the fraction of sites that had to be opened.
pub fn run_trial<P: PermutationSource + ?Sized>(n: usize, source: &mut P) -> Result<f64> {
    let mut perc = Percolation::new(n)?;
    let sites = perc.size() * perc.size();
    let perm = source.permutation(sites);
    if perm.len() != sites {
        return Err(Error::PermutationLength { len: perm.len(), sites });
    }
    for index in perm {
        if perc.percolates() {
            break;
        }
        let (row, col) = perc.site_of(index)?;
        perc.open(row, col)?;
    }
    trace!("final grid\n{}", perc);
    if !perc.percolates() {
        return Err(Error::NotPercolated { opened: perc.number_of_open_sites(), sites });
    }
    Ok(perc.number_of_open_sites() as f64 / sites as f64)
}

/// Percolation thresholds sampled over independent trials.
#[derive(Clone, Debug)]
pub struct PercolationStats {
    n: usize,
    samples: Vec<f64>,
}

impl PercolationStats {
    /// Runs `trials` trials in parallel with a random seed.
    pub fn new(n: usize, trials: usize) -> Result<PercolationStats> {
        let seed = rand::thread_rng().gen::<u64>();
        PercolationStats::with_seed(n, trials, seed)
    }

    /// Runs `trials` trials in parallel. Each trial gets its own generator, seeded
    /// up front from `seed`, so the samples do not depend on scheduling.
    pub fn with_seed(n: usize, trials: usize, seed: u64) -> Result<PercolationStats> {
        check_arguments(n, trials)?;
        info!("running {} trials on a {}x{} grid, seed {}", trials, n, n, seed);
        let started = Local::now();

        let mut master = XorShiftRng::seed_from_u64(seed);
        let seeds = (0..trials).map(|_| master.gen::<u64>()).collect::<Vec<_>>();
        let samples = seeds
            .par_iter()
            .enumerate()
            .map(|(i, &trial_seed)| {
                let sample = run_trial(n, &mut RandomPermutation::from_seed(trial_seed))?;
                debug!("trial {} threshold {}", i, sample);
                Ok(sample)
            })
            .collect::<Result<Vec<f64>>>()?;

        info!("{} trials done in {} ms", trials, (Local::now() - started).num_milliseconds());
        Ok(PercolationStats { n, samples })
    }

    /// Runs `trials` trials one after another, all drawing from `source`.
    pub fn with_source<P: PermutationSource + ?Sized>(n: usize, trials: usize, source: &mut P) -> Result<PercolationStats> {
        check_arguments(n, trials)?;
        let mut samples = Vec::with_capacity(trials);
        for i in 0..trials {
            let sample = run_trial(n, source)?;
            debug!("trial {} threshold {}", i, sample);
            samples.push(sample);
        }
        Ok(PercolationStats { n, samples })
    }

    pub fn grid_size(&self) -> usize {
        self.n
    }

    pub fn trials(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn mean(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Sample standard deviation. NaN for a single trial.
    pub fn stddev(&self) -> f64 {
        let mean = self.mean();
        let squares = self.samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>();
        (squares / (self.samples.len() as f64 - 1.0)).sqrt()
    }

    pub fn confidence_lo(&self) -> f64 {
        self.mean() - self.half_width()
    }

    pub fn confidence_hi(&self) -> f64 {
        self.mean() + self.half_width()
    }

    /// Writes `trial,threshold` rows.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut output = csv::Writer::from_path(path)?;
        output.write_record(&["trial", "threshold"])?;
        for (i, x) in self.samples.iter().enumerate() {
            output.write_record(&[i.to_string(), x.to_string()])?;
        }
        output.flush()?;
        Ok(())
    }

    fn half_width(&self) -> f64 {
        CONFIDENCE_95 * self.stddev() / (self.samples.len() as f64).sqrt()
    }
}

fn check_arguments(n: usize, trials: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::InvalidArgument { name: "grid size", value: n });
    }
    if trials == 0 {
        return Err(Error::InvalidArgument { name: "trials", value: trials });
    }
    Ok(())
}
