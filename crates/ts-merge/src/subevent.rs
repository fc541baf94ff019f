use ts_model::HeaderRecord;

use crate::error::MergeError;

/// Build one `SubEventHeader` for a freshly admitted event from a
/// non-already-merged source (`spec.md` §4.D.4).
pub fn new_header(
    event_number: u32,
    source_index: u32,
    mc_particles_snapshot: i64,
    t: f64,
    weight: f32,
) -> Result<HeaderRecord, MergeError> {
    let mc_particles_offset =
        i32::try_from(mc_particles_snapshot).map_err(|_| MergeError::IndexOverflow {
            branch: "SubEventHeaders".to_string(),
            value: mc_particles_snapshot,
        })?;
    Ok(HeaderRecord {
        event_number,
        source_index,
        mc_particles_offset,
        time_stamp: t as f32,
        weight,
    })
}

/// Shift one of an already-merged source's own `SubEventHeader`s as it is
/// copied through (`spec.md` §4.D.4): `mc_particles_offset` must move with
/// the rebased `MCParticles` collection, while `time_stamp` only gains
/// `T[i]`, which is always `0` for an already-merged event — a no-op on the
/// time axis, but the offset shift is mandatory to keep ranges valid.
pub fn passthrough_shift(header: &mut HeaderRecord, mc_particles_snapshot: i64, t: f64) -> Result<(), MergeError> {
    let shifted = i64::from(header.mc_particles_offset) + mc_particles_snapshot;
    header.mc_particles_offset = i32::try_from(shifted).map_err(|_| MergeError::IndexOverflow {
        branch: "SubEventHeaders".to_string(),
        value: shifted,
    })?;
    header.time_stamp += t as f32;
    Ok(())
}
