/// Result of one source's per-timeslice admission draw (`spec.md` §4.C):
/// a count and one timestamp per admitted event.
///
/// `event_indices` is `Some` only under `AdmissionMode::WeightedResampling`,
/// where events are drawn with replacement rather than read sequentially;
/// the Merger must use `Source::read_at` with these indices instead of the
/// normal `read`/`advance` pair.
#[derive(Debug, Clone, Default)]
pub struct Admission {
    pub timestamps: Vec<f64>,
    pub event_indices: Option<Vec<u64>>,
}

impl Admission {
    pub fn count(&self) -> u64 {
        self.timestamps.len() as u64
    }
}
