use ts_model::CollectionData;
use ts_schema::Schema;
use ts_source::Source;

/// `generatorStatus` value identifying a generator-primary particle
/// (edm4hep/HepMC convention). Used only to pick the vertex beam attachment
/// refines against (`spec.md` §4.C).
const PRIMARY_STATUS: i32 = 1;

/// Vertex `(x, y, z)` of the first primary-status particle in `source`'s
/// currently loaded `MCParticles` collection, for beam attachment. `None` if
/// the collection carries no vertex fields, no status field, or no particle
/// with the primary status.
///
/// Must be called after `Source::read`/`Source::read_at` and before
/// `MergeEngine::merge_event`, which drains the source's local buffer.
pub fn first_primary_vertex(schema: &Schema, source: &Source) -> Option<(f32, f32, f32)> {
    let mc_idx = schema.index_of("MCParticles")?;
    let descriptor = schema.branch(mc_idx);
    let (vx, vy, vz) = descriptor.vertex_fields?;
    let status_field = descriptor.status_field?;
    let raw_idx = source
        .branch_map()
        .iter()
        .position(|b| *b == Some(mc_idx))?;
    let CollectionData::Primary(records) = source.local_buffer().get(raw_idx) else {
        return None;
    };
    records
        .iter()
        .find(|r| r.ints.get(status_field).copied() == Some(PRIMARY_STATUS))
        .map(|r| (r.floats[vx], r.floats[vy], r.floats[vz]))
}
