use ts_model::{TimesliceBuffer, TimesliceHeader};
use ts_schema::{Category, Schema};
use ts_source::Source;

use crate::concat;
use crate::error::MergeError;
use crate::offsets;
use crate::rules;
use crate::subevent;

/// Owns the output buffer under construction for one timeslice and drives
/// the per-event field-update/concatenate/account sequence (`spec.md`
/// §4.D.1–§4.D.4).
pub struct MergeEngine {
    buffer: TimesliceBuffer,
    mc_particles_branch: Option<usize>,
    header_branch: usize,
}

impl MergeEngine {
    pub fn new(schema: &Schema) -> Self {
        Self {
            buffer: schema.empty_buffer(),
            mc_particles_branch: schema.index_of("MCParticles"),
            header_branch: schema.header_index(),
        }
    }

    pub fn buffer(&self) -> &TimesliceBuffer {
        &self.buffer
    }

    /// `spec.md` §4.D.5: cleared once per timeslice, capacity retained.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Merge one admitted event, already loaded into `source`'s local
    /// buffer, into the output buffer (`spec.md` §4.D.2–§4.D.4).
    #[allow(clippy::too_many_arguments)]
    pub fn merge_event(
        &mut self,
        schema: &Schema,
        source: &mut Source,
        event_number: u32,
        source_index: u32,
        t: f64,
        weight: f32,
    ) -> Result<(), MergeError> {
        let snapshot = offsets::snapshot(&self.buffer);
        let already_merged = source.already_merged();
        let status_offset = source.status_offset();
        let is_seed_event = already_merged && !source.has_emitted_event();

        for (raw_idx, branch_idx) in source.branch_map().to_vec().into_iter().enumerate() {
            let Some(branch_idx) = branch_idx else {
                continue;
            };
            let descriptor = schema.branch(branch_idx);
            match descriptor.category {
                Category::Primary => {
                    if let Some(records) = source.local_buffer_mut().get_mut(raw_idx).as_primary_mut() {
                        for record in records.iter_mut() {
                            rules::apply_time(record, descriptor, t, already_merged);
                            rules::apply_status(record, descriptor, status_offset, already_merged);
                            rules::apply_ranges(record, descriptor, &snapshot)?;
                        }
                    }
                }
                Category::Reference => {
                    let target = descriptor
                        .target
                        .expect("reference branches always carry a target");
                    if let Some(refs) = source.local_buffer_mut().get_mut(raw_idx).as_reference_mut() {
                        rules::apply_reference_shift(&descriptor.name, refs, snapshot[target], is_seed_event)?;
                    }
                }
                Category::Key | Category::Value | Category::Header => {}
            }
        }

        for (raw_idx, branch_idx) in source.branch_map().to_vec().into_iter().enumerate() {
            let Some(branch_idx) = branch_idx else {
                continue;
            };
            if branch_idx == self.header_branch {
                // Headers never concatenate here: a fresh source gets a
                // synthesized header below, an already-merged source's
                // incoming headers need `passthrough_shift` first.
                continue;
            }
            let name = schema.branch(branch_idx).name.clone();
            let out_slot = self.buffer.get_mut(branch_idx);
            let src_slot = source.local_buffer_mut().get_mut(raw_idx);
            concat::append(&name, out_slot, src_slot)?;
        }

        let mc_snapshot = self.mc_particles_branch.map(|b| snapshot[b]).unwrap_or(0);
        if !already_merged {
            let header = subevent::new_header(event_number, source_index, mc_snapshot, t, weight)?;
            if let Some(headers) = self.buffer.get_mut(self.header_branch).as_header_mut() {
                headers.push(header);
            }
        } else if let Some(headers_raw_idx) = source
            .branch_map()
            .iter()
            .position(|b| *b == Some(self.header_branch))
        {
            if let Some(incoming) = source.local_buffer_mut().get_mut(headers_raw_idx).as_header_mut() {
                let mut incoming = std::mem::take(incoming);
                for header in incoming.iter_mut() {
                    subevent::passthrough_shift(header, mc_snapshot, t)?;
                }
                if let Some(out) = self.buffer.get_mut(self.header_branch).as_header_mut() {
                    out.append(&mut incoming);
                }
            }
        }

        source.mark_event_emitted();
        Ok(())
    }

    /// `spec.md` §4.D.4/§5: one record per flushed timeslice, returned to
    /// the Driver for progress logging, not stored in the branch set (the
    /// container schema has no slot for it).
    pub fn finish_timeslice(&self, index: u64, n_sources: u32) -> TimesliceHeader {
        TimesliceHeader { index, n_sources }
    }
}
