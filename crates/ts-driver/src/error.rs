use thiserror::Error;
use ts_config::ConfigError;
use ts_container::IoError;
use ts_merge::MergeError;
use ts_sampler::SamplerError;
use ts_schema::SchemaError;
use ts_sink::SinkError;
use ts_source::SourceError;

/// Top-level run failure, mapped to the §6.3 exit code table by `ts-bin`.
/// `Halted` is not an error — it short-circuits the driver loop cleanly and
/// must never produce a nonzero exit code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error("source `{0}` exhausted mid-run; halted cleanly after the last complete timeslice")]
    Halted(String),
}

impl AppError {
    /// `spec.md` §6.3: 0 success, 1 config, 2 I/O, 3 schema, 4 arithmetic.
    /// `Halted` is not an error outcome and maps to 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 1,
            AppError::Io(_) => 2,
            AppError::Schema(_) => 3,
            AppError::Merge(_) => 4,
            AppError::Halted(_) => 0,
        }
    }
}

impl From<SourceError> for AppError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::Io(io) => AppError::Io(io),
            SourceError::Schema(s) => AppError::Schema(s),
            SourceError::NoInputFiles(name) => {
                AppError::Config(ConfigError::MissingSourceField {
                    name,
                    key: "input_files",
                })
            }
        }
    }
}

impl From<SamplerError> for AppError {
    fn from(e: SamplerError) -> Self {
        match e {
            SamplerError::WeightPreload(src) => src.into(),
        }
    }
}

impl From<SinkError> for AppError {
    fn from(e: SinkError) -> Self {
        match e {
            SinkError::Io(io) => AppError::Io(io),
        }
    }
}
