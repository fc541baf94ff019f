use thiserror::Error;

/// I/O-layer failures: open/read/write against the container. Per `spec.md`
/// §7 these are fatal and raised immediately — the merger never retries,
/// trusting the container library to have already retried at its level.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to open container at `{path}`: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read entry {entry} from `{path}`: {source}")]
    Read {
        path: String,
        entry: u64,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write entry to `{path}`: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("container `{path}` is corrupt: {reason}")]
    Corrupt { path: String, reason: String },
}
