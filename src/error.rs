use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{name} must be positive, got {value}")]
    InvalidArgument { name: &'static str, value: usize },

    #[error("index {index} out of range 0..{len}")]
    IndexError { index: usize, len: usize },

    #[error("site ({row}, {col}) outside of 1..={n}")]
    SiteIndexError { row: usize, col: usize, n: usize },

    #[error("permutation has {len} entries, grid has {sites} sites")]
    PermutationLength { len: usize, sites: usize },

    #[error("grid still blocked after opening {opened} of {sites} sites")]
    NotPercolated { opened: usize, sites: usize },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// True for both flavours of out-of-range index.
    pub fn is_index_error(&self) -> bool {
        match self {
            Error::IndexError { .. } | Error::SiteIndexError { .. } => true,
            _ => false,
        }
    }
}
