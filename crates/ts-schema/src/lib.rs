//! Schema registry (`spec.md` §4.A): classifies a container's raw branch
//! list into primary/reference/key/value/header roles and computes every
//! field-update rule the merger needs, once at startup.

mod descriptor;
mod error;
mod schema;

pub use descriptor::{BranchDescriptor, Category, RangeRule};
pub use error::SchemaError;
pub use schema::Schema;
