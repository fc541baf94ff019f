//! Trait surface over the binary container `spec.md` treats as an opaque
//! external library, plus [`BincodeContainerReader`]/[`BincodeContainerWriter`],
//! a self-contained reference implementation used by tests and the CLI
//! default backend.

mod bincode_container;
mod error;
mod schema_info;
mod traits;

pub use bincode_container::{BincodeContainerReader, BincodeContainerWriter};
pub use error::IoError;
pub use schema_info::{ParamScalarKind, RawBranchInfo, RawElementKind};
pub use traits::{Compression, ContainerReader, ContainerWriter};
