//! Adapter over one input container (`spec.md` §4.B): sequential per-entry
//! reads, cursor tracking with optional wraparound, and virtual
//! concatenation of multiple files sharing one tree name.

mod cursor;
mod error;
mod reader_chain;
mod source;

pub use cursor::SourceCursor;
pub use error::SourceError;
pub use source::Source;
