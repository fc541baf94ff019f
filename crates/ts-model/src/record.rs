use serde::{Deserialize, Serialize};

/// A flat primary-collection element.
///
/// The merger never interprets the meaning of a field beyond the three roles
/// `Schema` assigns to them (time, status, range); everything else is opaque
/// payload carried through untouched. Keeping records flat (rather than one
/// Rust struct per collection type) is what lets the schema be discovered at
/// load time instead of hardcoded — see `spec.md` design note on tagged
/// dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryRecord {
    pub floats: Vec<f32>,
    pub ints: Vec<i32>,
    /// One `(begin, end)` pair per range field this collection's schema
    /// declares, in declaration order.
    pub ranges: Vec<(i32, i32)>,
}

impl PrimaryRecord {
    pub fn new(floats: Vec<f32>, ints: Vec<i32>, ranges: Vec<(i32, i32)>) -> Self {
        Self {
            floats,
            ints,
            ranges,
        }
    }
}

/// Per-admitted-event provenance record (§4.D.4).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub event_number: u32,
    pub source_index: u32,
    /// Snapshot of the primary-particle collection's size at the moment this
    /// event's elements were appended.
    pub mc_particles_offset: i32,
    pub time_stamp: f32,
    pub weight: f32,
}

/// One record per flushed timeslice, recording how many sources contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesliceHeader {
    pub index: u64,
    pub n_sources: u32,
}
