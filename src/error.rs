//! Crate-level error type.

use thiserror::Error;

/// Errors reported by configuration, tensor layout detection and tensor sources.
///
/// None of these cross the per-cycle decode/stabilize boundary: the decoder
/// turns layout errors into an empty detection set, and the stabilizer only
/// fails at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A configuration value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The output tensor shape matches none of the supported layouts.
    #[error("unsupported tensor shape {shape:?}: expected rank 2 or 3 with one axis of size {channels}")]
    UnsupportedShape { shape: Vec<usize>, channels: usize },

    /// The producer side of a tensor channel has gone away.
    #[error("tensor source disconnected")]
    SourceDisconnected,
}

pub type Result<T> = std::result::Result<T, Error>;
