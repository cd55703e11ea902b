use thiserror::Error;

/// Input validation failures of the GC analysis core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcError {
    #[error("Sequence is empty")]
    EmptySequence,
    #[error("Window length must be at least 1")]
    ZeroWindow,
    #[error("Invalid window length {window_len} for a sequence of length {seq_len}")]
    InvalidWindow { window_len: usize, seq_len: usize },
    #[error("GC threshold must be a percentage between 0 and 100, got {0}")]
    InvalidThreshold(f64),
    #[error("Cannot cluster an empty list of regions")]
    EmptyRegionList,
}
