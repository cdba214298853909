use std::io;

use thiserror::Error;

/// Errors produced while building or writing charts.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Moving average windows must span at least one point.
    #[error("window must be 1 or larger (got {0})")]
    InvalidWindow(usize),
    /// Not enough points to fit a line.
    #[error("insufficient data: {needed} points needed, {got} available")]
    InsufficientData { needed: usize, got: usize },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("could not encode image: {0}")]
    Image(#[from] image::ImageError),
    /// The drawing surface refused an operation.  Backend error types are
    /// generic, so only their message is kept.
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("bad input: {0}")]
    Input(String),
}

impl ChartError {
    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        ChartError::Io {
            path: path.into(),
            source,
        }
    }
}
