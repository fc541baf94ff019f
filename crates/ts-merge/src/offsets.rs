use ts_model::TimesliceBuffer;

/// Snapshot the current size of every branch before loading event *e*
/// (`spec.md` §4.D.1). These offsets are fixed for the whole event — reading
/// buffer sizes again mid-event would contaminate the arithmetic.
///
/// Sizes are widened to `i64` immediately: the on-disk index width is `i32`,
/// but a merge of enough events can overflow it, and the overflow must be
/// caught at the serialization boundary rather than silently wrapping here
/// (`spec.md` §9, index-field-width resolution).
pub fn snapshot(buffer: &TimesliceBuffer) -> Vec<i64> {
    buffer
        .snapshot_sizes()
        .into_iter()
        .map(|n| n as i64)
        .collect()
}
