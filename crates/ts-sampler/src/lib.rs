//! Admission sampling (`spec.md` §4.C): per-timeslice, per-source event
//! counts and timestamps, in static/frequency-Poisson/weighted-resampling
//! modes, plus bunch-crossing and beam-attachment refinement.

mod config;
mod draw;
mod error;
mod refine;
mod sampler;
mod weighted;

pub use config::{AdmissionMode, BeamParams, Placement, SourceAdmissionConfig};
pub use draw::Admission;
pub use error::SamplerError;
pub use refine::{attach_to_beam, discretize_bunch_crossing};
pub use sampler::SourceSampler;
pub use weighted::WeightedPool;
