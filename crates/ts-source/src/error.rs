use thiserror::Error;
use ts_container::IoError;
use ts_schema::SchemaError;

/// Open/read failures for a `Source` (`spec.md` §4.B: "Open failure, schema
/// mismatch vs first source, or failed read is fatal").
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("source `{0}` declares no input files")]
    NoInputFiles(String),
}
