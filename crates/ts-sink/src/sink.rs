use ts_container::{Compression, ContainerWriter, RawBranchInfo, RawElementKind};
use ts_model::TimesliceBuffer;
use ts_schema::Schema;

use crate::error::SinkError;

/// Output side of the pipeline (`spec.md` §4.E): writes one entry per
/// flushed timeslice, cloning the metadata tree into the output container
/// exactly once, before the first write.
pub struct Sink {
    writer: Box<dyn ContainerWriter>,
    compression: Compression,
    metadata_written: bool,
    flushed_timeslices: u64,
}

impl Sink {
    pub fn new(writer: Box<dyn ContainerWriter>, compression: Compression) -> Self {
        Self {
            writer,
            compression,
            metadata_written: false,
            flushed_timeslices: 0,
        }
    }

    /// Write `buffer`'s current contents as one entry, copying the metadata
    /// tree first if this is the sink's first flush. The synthesized
    /// `SubEventHeaders` branch is appended to the cloned schema so a later
    /// run can reopen this container as an already-merged source
    /// (`spec.md` §9: "already-merged" sources carry their own headers
    /// through).
    pub fn flush(&mut self, schema: &Schema, buffer: &TimesliceBuffer) -> Result<(), SinkError> {
        if !self.metadata_written {
            let mut branches = schema.raw_branches().to_vec();
            branches.push(RawBranchInfo {
                name: "SubEventHeaders".to_string(),
                kind: RawElementKind::HeaderVec,
            });
            self.writer.clone_metadata(&branches)?;
            self.metadata_written = true;
            tracing::debug!(target: "sink", branches = branches.len(), "metadata tree cloned");
        }

        self.writer.write_entry(buffer)?;
        self.flushed_timeslices += 1;
        tracing::debug!(
            target: "sink",
            timeslice = self.flushed_timeslices,
            compression = ?self.compression,
            "flushed timeslice"
        );
        Ok(())
    }

    pub fn flushed_timeslices(&self) -> u64 {
        self.flushed_timeslices
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_container::{BincodeContainerReader, BincodeContainerWriter, ContainerReader};
    use ts_model::{CollectionData, PrimaryRecord};

    fn mc_schema() -> Schema {
        let raw = vec![RawBranchInfo {
            name: "MCParticles".into(),
            kind: RawElementKind::Primary {
                float_fields: vec!["time".into()],
                int_fields: vec![],
                range_fields: vec![],
            },
        }];
        Schema::discover(&raw).unwrap()
    }

    #[test]
    fn clones_metadata_once_then_writes_each_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let writer = BincodeContainerWriter::create(&path).unwrap();
        let mut sink = Sink::new(Box::new(writer), Compression::Fast);
        let schema = mc_schema();

        let buffer = schema.empty_buffer();
        sink.flush(&schema, &buffer).unwrap();
        sink.flush(&schema, &buffer).unwrap();
        assert_eq!(sink.flushed_timeslices(), 2);
        drop(sink);

        let reader = BincodeContainerReader::open(&path).unwrap();
        assert_eq!(reader.entry_count(), 2);
        let header_branch = reader
            .branch_schema()
            .iter()
            .find(|b| b.name == "SubEventHeaders");
        assert!(header_branch.is_some(), "output schema must carry the header branch");
    }

    #[test]
    fn written_entry_round_trips_primary_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let writer = BincodeContainerWriter::create(&path).unwrap();
        let mut sink = Sink::new(Box::new(writer), Compression::None);
        let schema = mc_schema();

        let mut buffer = schema.empty_buffer();
        let mc_idx = schema.index_of("MCParticles").unwrap();
        buffer
            .get_mut(mc_idx)
            .as_primary_mut()
            .unwrap()
            .push(PrimaryRecord::new(vec![1.0], vec![], vec![]));
        sink.flush(&schema, &buffer).unwrap();
        drop(sink);

        let mut reader = BincodeContainerReader::open(&path).unwrap();
        let mut into = schema.empty_buffer();
        reader.read_entry(0, &mut into).unwrap();
        let CollectionData::Primary(records) = into.get(mc_idx) else {
            panic!("expected primary records");
        };
        assert_eq!(records[0].floats[0], 1.0);
    }
}
