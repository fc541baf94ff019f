use ts_container::{ContainerReader, RawBranchInfo};
use ts_model::TimesliceBuffer;
use ts_schema::Schema;

use crate::cursor::SourceCursor;
use crate::error::SourceError;
use crate::reader_chain::ConcatReader;

/// One input stream (`spec.md` §4.B): wraps a single container, or the
/// virtual concatenation of several sharing one tree name, and exposes
/// sequential per-entry reads against a branch layout fixed at `open` time.
///
/// Each branch slot in the source's own local buffer is mapped once, at
/// open time, to the canonical branch index in the run-wide [`Schema`] —
/// `branch_map()[raw_index]` is `None` for branches this source's container
/// declares but the schema dropped (e.g. a dangling reference only this
/// source happens to carry).
pub struct Source {
    name: String,
    reader: Box<dyn ContainerReader>,
    branch_map: Vec<Option<usize>>,
    local_buffer: TimesliceBuffer,
    cursor: SourceCursor,
    already_merged: bool,
    status_offset: i32,
    has_emitted_event: bool,
}

impl Source {
    /// Open one or more files sharing a tree name as a single virtual
    /// stream, validating their combined branch schema against `schema`
    /// (`spec.md` §4.B: "schema mismatch vs first source is fatal").
    pub fn open(
        name: String,
        readers: Vec<Box<dyn ContainerReader>>,
        schema: &Schema,
        repeat_on_eof: bool,
        already_merged: bool,
        status_offset: i32,
    ) -> Result<Self, SourceError> {
        if readers.is_empty() {
            return Err(SourceError::NoInputFiles(name));
        }
        let reader: Box<dyn ContainerReader> = if readers.len() == 1 {
            readers.into_iter().next().unwrap()
        } else {
            Box::new(ConcatReader::new(readers))
        };

        let raw = reader.branch_schema().to_vec();
        schema.validate_against(&raw)?;

        let branch_map = raw.iter().map(|b| schema.index_of(&b.name)).collect();
        let local_buffer =
            TimesliceBuffer::new(raw.iter().map(RawBranchInfo::empty).collect());
        let total_entries = reader.entry_count();

        Ok(Self {
            name,
            reader,
            branch_map,
            local_buffer,
            cursor: SourceCursor::new(total_entries, repeat_on_eof),
            already_merged,
            status_offset,
            has_emitted_event: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn already_merged(&self) -> bool {
        self.already_merged
    }

    pub fn status_offset(&self) -> i32 {
        self.status_offset
    }

    /// Whether this source has ever emitted an event, for the
    /// first-event-only already-merged reference-shift rule (`spec.md` §9,
    /// resolved in `SPEC_FULL.md` as a run-lifetime flag, not per-timeslice).
    pub fn has_emitted_event(&self) -> bool {
        self.has_emitted_event
    }

    pub fn mark_event_emitted(&mut self) {
        self.has_emitted_event = true;
    }

    /// Whether this source can supply `n` more events without wrapping
    /// (`spec.md` §4.D.5: "if not source s can provide N_s more events:
    /// halt run"). A `repeat_on_eof` source can always provide more, since
    /// its cursor never truly exhausts.
    pub fn can_provide(&self, n: u64) -> bool {
        self.cursor.total_entries() > 0 && (self.cursor.repeat_on_eof() || self.cursor.remaining() >= n)
    }

    /// Read the entry at the cursor's current position into this source's
    /// local buffer. Does not advance the cursor.
    pub fn read(&mut self) -> Result<(), SourceError> {
        let index = self.cursor.current();
        self.reader
            .read_entry(index, &mut self.local_buffer)
            .map_err(SourceError::from)
    }

    pub fn advance(&mut self) {
        self.cursor.advance();
    }

    /// Read an arbitrary entry into the local buffer without disturbing the
    /// cursor, used by weighted-resampling admission to preload weights and
    /// to fetch the specific indices it draws (`spec.md` §4.C).
    pub fn read_at(&mut self, index: u64) -> Result<(), SourceError> {
        self.reader
            .read_entry(index, &mut self.local_buffer)
            .map_err(SourceError::from)
    }

    pub fn total_entries(&self) -> u64 {
        self.cursor.total_entries()
    }

    pub fn cursor(&self) -> &SourceCursor {
        &self.cursor
    }

    pub fn local_buffer(&self) -> &TimesliceBuffer {
        &self.local_buffer
    }

    pub fn local_buffer_mut(&mut self) -> &mut TimesliceBuffer {
        &mut self.local_buffer
    }

    pub fn branch_map(&self) -> &[Option<usize>] {
        &self.branch_map
    }
}
