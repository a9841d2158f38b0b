//! Error types for the chunky string and its collaborators.
//!
//! All fallible container operations return [`Result<T>`]:
//!
//! - **EndPosition** - dereference or erase at `end()`
//! - **PastEnd** / **BeforeBegin** - stepping off either end of the sequence
//! - **StalePosition** - the position was issued before the latest mutation
//! - **ForeignPosition** - the position belongs to another string, or names a
//!   chunk or offset that does not exist
//!
//! A rejected call never mutates the string.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChunkyError>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChunkyError {
    #[error("position is end(), which does not name a character")]
    EndPosition,
    #[error("cannot advance past end()")]
    PastEnd,
    #[error("cannot step back from begin()")]
    BeforeBegin,
    #[error("position was issued at generation {issued} but the string is at generation {current}")]
    StalePosition { issued: u64, current: u64 },
    #[error("position does not belong to this string")]
    ForeignPosition,
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TransmissionError {
    #[error("error rate {0} is outside 0.0..=0.5")]
    InvalidErrorRate(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("noise level {0} is outside 0.0..=0.5")]
    InvalidNoise(f64),
}
