use thiserror::Error;

/// Failure modes of the Merger engine (`spec.md` §4.D.6). Schema drift and
/// source-exhaustion are detected one layer up (`ts-schema`/`ts-source`
/// respectively) before the engine is ever invoked for the offending event;
/// this enum covers the failures that can only occur while merging.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("index arithmetic overflowed the on-disk 32-bit width on branch `{branch}`: shifted value {value}")]
    IndexOverflow { branch: String, value: i64 },

    #[error("branch `{branch}`: source did not supply data for this branch (move-from-empty)")]
    MoveFromEmpty { branch: String },
}
