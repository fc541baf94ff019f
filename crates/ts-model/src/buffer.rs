use serde::{Deserialize, Serialize};

use crate::object_id::ObjectId;
use crate::params::ParamVector;
use crate::record::{HeaderRecord, PrimaryRecord};

/// The closed set of element kinds a branch can hold (`spec.md` §9: "the five
/// kinds are closed; new kinds require a schema extension, which is
/// appropriate"). Replaces the teacher-domain's type-erased `Box<dyn Any>`
/// handler registry pattern with a plain sum type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollectionData {
    Primary(Vec<PrimaryRecord>),
    Reference(Vec<ObjectId>),
    Key(Vec<String>),
    Value(ParamVector),
    Header(Vec<HeaderRecord>),
}

impl CollectionData {
    /// Number of elements in this branch, used for offset snapshots and the
    /// index-closure / range-monotonicity checks.
    pub fn len(&self) -> usize {
        match self {
            CollectionData::Primary(v) => v.len(),
            CollectionData::Reference(v) => v.len(),
            CollectionData::Key(v) => v.len(),
            CollectionData::Value(v) => v.len(),
            CollectionData::Header(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match self {
            CollectionData::Primary(v) => v.clear(),
            CollectionData::Reference(v) => v.clear(),
            CollectionData::Key(v) => v.clear(),
            CollectionData::Value(v) => {
                v.keys.clear();
                v.values.clear();
            }
            CollectionData::Header(v) => v.clear(),
        }
    }

    pub fn as_primary_mut(&mut self) -> Option<&mut Vec<PrimaryRecord>> {
        match self {
            CollectionData::Primary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_reference_mut(&mut self) -> Option<&mut Vec<ObjectId>> {
        match self {
            CollectionData::Reference(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_header_mut(&mut self) -> Option<&mut Vec<HeaderRecord>> {
        match self {
            CollectionData::Header(v) => Some(v),
            _ => None,
        }
    }
}

/// The merged output under construction for one timeslice.
///
/// Backed by a `Vec` indexed by branch index rather than a `HashMap` keyed by
/// name: iteration order must equal discovery order so that output ordering
/// (source × event × element, `spec.md` §5) is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimesliceBuffer {
    slots: Vec<CollectionData>,
}

impl TimesliceBuffer {
    pub fn new(slots: Vec<CollectionData>) -> Self {
        Self { slots }
    }

    pub fn get(&self, branch_index: usize) -> &CollectionData {
        &self.slots[branch_index]
    }

    pub fn get_mut(&mut self, branch_index: usize) -> &mut CollectionData {
        &mut self.slots[branch_index]
    }

    pub fn len_of(&self, branch_index: usize) -> usize {
        self.slots[branch_index].len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionData> {
        self.slots.iter()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Snapshot the current size of every branch. Must be taken once per
    /// event, before that event's data is loaded (`spec.md` §4.D.1): reading
    /// buffer sizes mid-event would contaminate offset arithmetic.
    pub fn snapshot_sizes(&self) -> Vec<usize> {
        self.slots.iter().map(CollectionData::len).collect()
    }

    /// Clear all branches, retaining allocated capacity, ready for the next
    /// timeslice.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }
}
