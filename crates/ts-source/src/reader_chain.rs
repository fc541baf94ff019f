use ts_container::{ContainerReader, IoError, RawBranchInfo};
use ts_model::TimesliceBuffer;

/// Streams over the concatenation of several readers in listed order
/// (`spec.md` §9, open question: "this spec models a source as a *stream*
/// over the concatenation of its files in listed order"). The cursor that
/// drives it wraps around the whole chain, not per file.
pub struct ConcatReader {
    readers: Vec<Box<dyn ContainerReader>>,
    file_offsets: Vec<u64>,
    total_entries: u64,
    schema: Vec<RawBranchInfo>,
}

impl ConcatReader {
    pub fn new(readers: Vec<Box<dyn ContainerReader>>) -> Self {
        let schema = readers[0].branch_schema().to_vec();
        let mut file_offsets = Vec::with_capacity(readers.len());
        let mut total_entries = 0u64;
        for reader in &readers {
            file_offsets.push(total_entries);
            total_entries += reader.entry_count();
        }
        Self {
            readers,
            file_offsets,
            total_entries,
            schema,
        }
    }

    fn locate(&self, index: u64) -> (usize, u64) {
        let file_index = match self.file_offsets.binary_search(&index) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (file_index, index - self.file_offsets[file_index])
    }
}

impl ContainerReader for ConcatReader {
    fn branch_schema(&self) -> &[RawBranchInfo] {
        &self.schema
    }

    fn entry_count(&self) -> u64 {
        self.total_entries
    }

    fn read_entry(&mut self, index: u64, into: &mut TimesliceBuffer) -> Result<(), IoError> {
        let (file_index, local_index) = self.locate(index);
        self.readers[file_index].read_entry(local_index, into)
    }
}
