use thiserror::Error;
use ts_source::SourceError;

/// Sampling itself is pure compute and infallible given non-degenerate
/// config (`spec.md` §4.C: "Cancellation: none"); the only failure mode is
/// preloading weighted-mode weights from the source.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("failed to preload event weights: {0}")]
    WeightPreload(#[from] SourceError),
}
