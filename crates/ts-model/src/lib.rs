//! Value types shared across the timeslice-merging pipeline.
//!
//! Everything here is data, not behaviour: the schema registry, source,
//! sampler, merger and sink crates all build on these types but own their
//! own logic. Keeping the data model in its own crate keeps `ts-merge` free
//! to depend only on the shapes it rewrites, not on how they were read or
//! how they'll be written.

mod buffer;
mod object_id;
mod params;
mod record;

pub use buffer::{CollectionData, TimesliceBuffer};
pub use object_id::{ObjectId, ObjectIdOverflow};
pub use params::{ParamValue, ParamVector};
pub use record::{HeaderRecord, PrimaryRecord, TimesliceHeader};
