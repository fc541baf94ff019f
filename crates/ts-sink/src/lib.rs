//! Output sink (`spec.md` §4.E): writes one entry per flushed timeslice,
//! cloning the metadata tree into the output container on first flush.

mod error;
mod sink;

pub use error::SinkError;
pub use sink::Sink;
