//! Error type shared by the mapping constructors and landmark sources.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected by [`RangeMapping::new`](crate::RangeMapping::new).
    #[error(
        "invalid range mapping [{input_low}, {input_high}] -> [{output_low}, {output_high}]: \
         bounds must be finite and input_low must be below input_high"
    )]
    InvalidMapping {
        input_low:   f64,
        input_high:  f64,
        output_low:  f64,
        output_high: f64,
    },

    /// A landmark line that isn't a valid `HandFrame`.
    #[error("malformed landmark frame: {0}")]
    Landmark(#[from] serde_json::Error),

    #[error("landmark source I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Source could not be started (bad command line, missing hardware, …).
    #[error("landmark source: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, Error>;
