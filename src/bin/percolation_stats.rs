extern crate percolation;
extern crate structopt;
#[macro_use]
extern crate log;
extern crate simplelog;
extern crate rayon;

use percolation::*;
use simplelog::*;
use std::fs::File;
use std::io::stderr;
use std::process;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "percolation_stats")]
struct Config {
    /// Grid size n of the n-by-n lattice
    n: usize,

    /// Number of independent trials
    trials: usize,

    #[structopt(short = "s", long = "seed")]
    seed: Option<u64>,

    #[structopt(short = "j", long = "threads")]
    threads: Option<usize>,

    #[structopt(short = "o", long = "samples-out")]
    samples_out: Option<String>,

    #[structopt(short = "l", long = "log-file")]
    log_file: Option<String>,

    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u8,
}

/// Levels for the stderr logger and the log file. The file gets at least debug.
fn log_levels(verbose: u8) -> (LevelFilter, LevelFilter) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    (level, level.max(LevelFilter::Debug))
}

fn init_logging(opt: &Config) -> Result<()> {
    let (level, file_level) = log_levels(opt.verbose);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![WriteLogger::new(level, simplelog::Config::default(), stderr())];
    if let Some(path) = &opt.log_file {
        loggers.push(WriteLogger::new(file_level, simplelog::Config::default(), File::create(path)?));
    }
    let _ = CombinedLogger::init(loggers);
    Ok(())
}

fn run(opt: &Config) -> Result<PercolationStats> {
    if let Some(threads) = opt.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
            warn!("keeping default thread pool: {}", e);
        }
    }

    let stats = match opt.seed {
        Some(seed) => PercolationStats::with_seed(opt.n, opt.trials, seed)?,
        None => PercolationStats::new(opt.n, opt.trials)?,
    };
    info!("{} samples on a {}x{} grid", stats.trials(), stats.grid_size(), stats.grid_size());

    if let Some(path) = &opt.samples_out {
        stats.save(path)?;
        info!("samples saved to {}", path);
    }
    Ok(stats)
}

fn main() {
    let opt = Config::from_args();
    if let Err(e) = init_logging(&opt) {
        eprintln!("cannot open log file: {}", e);
        process::exit(1);
    }

    match run(&opt) {
        Ok(stats) => {
            println!("mean = {:?}", stats.mean());
            println!("stddev = {:?}", stats.stddev());
            println!("95% confidence interval = [{:?}, {:?}]", stats.confidence_lo(), stats.confidence_hi());
        }
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
