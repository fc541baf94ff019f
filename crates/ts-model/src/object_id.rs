use serde::{Deserialize, Serialize};

/// A reference to an element of another collection: `(collection, index)`.
///
/// `collection` is resolved against the owning [`crate::buffer::TimesliceBuffer`]'s
/// branch index, not against a process-wide registry — there is no global
/// collection-id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    pub collection: i32,
    pub index: i32,
}

impl ObjectId {
    /// The "unavailable" sentinel. Never offset, never dereferenced.
    pub const NULL: ObjectId = ObjectId {
        collection: -1,
        index: -1,
    };

    pub fn new(collection: i32, index: i32) -> Self {
        Self { collection, index }
    }

    pub fn is_null(&self) -> bool {
        self.collection < 0 || self.index < 0
    }

    /// Returns a copy with `index` shifted by `offset`, unless this is [`ObjectId::NULL`].
    ///
    /// `offset` is carried as `i64` so a run merging billions of elements cannot
    /// silently wrap before the final range check at the container boundary.
    pub fn shifted(&self, offset: i64) -> Result<ObjectId, ObjectIdOverflow> {
        if self.is_null() {
            return Ok(*self);
        }
        let shifted = i64::from(self.index)
            .checked_add(offset)
            .ok_or(ObjectIdOverflow)?;
        let index = i32::try_from(shifted).map_err(|_| ObjectIdOverflow)?;
        Ok(ObjectId {
            collection: self.collection,
            index,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectIdOverflow;

impl std::fmt::Display for ObjectIdOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "object id index overflowed i32 range during offset shift")
    }
}

impl std::error::Error for ObjectIdOverflow {}
