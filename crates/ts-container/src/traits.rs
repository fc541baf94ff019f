use ts_model::TimesliceBuffer;

use crate::error::IoError;
use crate::schema_info::RawBranchInfo;

/// Read-side contract over one input container (`spec.md` §4.B / §6.1).
///
/// Implementations must not copy when a zero-copy read is available — the
/// merger receives mutable references into the slots `read_entry` populates
/// and moves out of them, so repeated reads should reuse the same
/// allocations.
pub trait ContainerReader {
    /// The branch list discovered from this container's metadata tree, in
    /// on-disk order.
    fn branch_schema(&self) -> &[RawBranchInfo];

    /// Total number of entries in the tree.
    fn entry_count(&self) -> u64;

    /// Populate `into` with entry `index`'s data. `into` must already have
    /// one slot per branch in [`ContainerReader::branch_schema`] order,
    /// cleared by the caller beforehand.
    fn read_entry(&mut self, index: u64, into: &mut TimesliceBuffer) -> Result<(), IoError>;
}

/// Write-side contract over one output container (`spec.md` §4.E / §6.2).
pub trait ContainerWriter {
    /// Write one entry containing the buffer's current contents. Does not
    /// clear `buffer` — the sink owns that lifecycle.
    fn write_entry(&mut self, buffer: &TimesliceBuffer) -> Result<(), IoError>;

    /// Clone the given schema/metadata tree into the output container. Called
    /// once, after the first flush's buffer has been sized against it.
    fn clone_metadata(&mut self, schema: &[RawBranchInfo]) -> Result<(), IoError>;
}

/// Compression level for the output container (`spec.md` §4.E / §6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    None,
    #[default]
    Fast,
    Best,
}
