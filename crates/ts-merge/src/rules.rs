use ts_model::{ObjectId, PrimaryRecord};
use ts_schema::BranchDescriptor;

use crate::error::MergeError;

fn checked_shift(branch: &str, value: i32, offset: i64) -> Result<i32, MergeError> {
    let shifted = i64::from(value) + offset;
    i32::try_from(shifted).map_err(|_| MergeError::IndexOverflow {
        branch: branch.to_string(),
        value: shifted,
    })
}

/// time-add rule (`spec.md` §4.D.2): `element.time += T[i]`, suppressed on
/// already-merged sources.
pub fn apply_time(record: &mut PrimaryRecord, descriptor: &BranchDescriptor, t: f64, already_merged: bool) {
    if already_merged {
        return;
    }
    if let Some(slot) = descriptor.time_field {
        record.floats[slot] += t as f32;
    }
}

/// status-add rule: `element.generatorStatus += statusOffset(source)`,
/// suppressed on already-merged sources.
pub fn apply_status(
    record: &mut PrimaryRecord,
    descriptor: &BranchDescriptor,
    status_offset: i32,
    already_merged: bool,
) {
    if already_merged {
        return;
    }
    if let Some(slot) = descriptor.status_field {
        record.ints[slot] += status_offset;
    }
}

/// range-add rule: `begin/end += snapshot[companion]`. Applies regardless of
/// already-merged — concatenation always shifts the companion reference
/// vector's indices.
pub fn apply_ranges(
    record: &mut PrimaryRecord,
    descriptor: &BranchDescriptor,
    snapshot: &[i64],
) -> Result<(), MergeError> {
    for rule in &descriptor.range_rules {
        let offset = snapshot[rule.reference_branch];
        let (begin, end) = record.ranges[rule.range_slot];
        record.ranges[rule.range_slot] = (
            checked_shift(&descriptor.name, begin, offset)?,
            checked_shift(&descriptor.name, end, offset)?,
        );
    }
    Ok(())
}

/// reference-shift rule: every non-null `ObjectID` in a reference branch
/// gains `snapshot[target]`, except on the very first event ever emitted by
/// an already-merged source — that event is the seed and its indices are
/// already absolute in the target buffer (`spec.md` §4.D.2 tie-break rule,
/// resolved per `SPEC_FULL.md` as the sole first-event exception).
pub fn apply_reference_shift(
    branch_name: &str,
    refs: &mut [ObjectId],
    offset: i64,
    skip: bool,
) -> Result<(), MergeError> {
    if skip {
        return Ok(());
    }
    for obj in refs.iter_mut() {
        *obj = obj.shifted(offset).map_err(|_| MergeError::IndexOverflow {
            branch: branch_name.to_string(),
            value: i64::from(obj.index) + offset,
        })?;
    }
    Ok(())
}
