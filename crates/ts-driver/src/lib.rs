//! The Driver (`spec.md` §4.D.5/§5): owns every source, sampler, the merge
//! engine and the output sink, and runs the per-timeslice loop from startup
//! to either completion or a clean mid-run halt.

mod driver;
mod error;

pub use driver::Driver;
pub use error::AppError;
