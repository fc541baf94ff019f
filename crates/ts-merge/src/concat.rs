use ts_model::CollectionData;

use crate::error::MergeError;

/// Append `src`'s elements onto `dest` by move (`spec.md` §4.D.3). `src` is
/// left empty, ready for the Source to refill on its next read. A variant
/// mismatch means the source never actually populated this branch for the
/// event — the move-from-empty failure in §4.D.6.
pub fn append(branch_name: &str, dest: &mut CollectionData, src: &mut CollectionData) -> Result<(), MergeError> {
    match (dest, src) {
        (CollectionData::Primary(d), CollectionData::Primary(s)) => d.append(s),
        (CollectionData::Reference(d), CollectionData::Reference(s)) => d.append(s),
        (CollectionData::Key(d), CollectionData::Key(s)) => d.append(s),
        (CollectionData::Value(d), CollectionData::Value(s)) => {
            d.keys.append(&mut s.keys);
            d.values.append(&mut s.values);
        }
        (CollectionData::Header(d), CollectionData::Header(s)) => d.append(s),
        _ => {
            return Err(MergeError::MoveFromEmpty {
                branch: branch_name.to_string(),
            });
        }
    }
    Ok(())
}
