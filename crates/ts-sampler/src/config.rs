/// How a source's per-timeslice event count and raw timestamps are drawn
/// (`spec.md` §4.C, three modes).
#[derive(Debug, Clone)]
pub enum AdmissionMode {
    /// N is a configured constant; T uniform in `[0, D]`.
    Static { events_per_slice: u32 },
    /// λ = `frequency × D`.
    FrequencyPoisson {
        frequency: f64,
        placement: Placement,
    },
    /// Preloaded per-event weights, resampled with replacement.
    WeightedResampling {
        /// Key under which each event's weight is stored in its `GPDoubleKeys`/
        /// `GPDoubleValues` pair (`spec.md` glossary: "Global parameters").
        weight_key: String,
    },
}

/// How timestamps are generated under `AdmissionMode::FrequencyPoisson`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// N ~ Poisson(λ); T uniform in `[0, D]`.
    Uniform,
    /// Emit arrivals via successive Exp(λ) waits until exceeding D.
    ExponentialTimeline,
}

/// Beam-frame timestamp refinement parameters (`spec.md` §4.C).
#[derive(Debug, Clone, Copy)]
pub struct BeamParams {
    /// Beam speed, same units as the vertex coordinates per nanosecond
    /// (`spec.md` S6: `beam_speed = 299.792458` mm/ns for a vertex in mm).
    pub speed: f64,
    pub angle: f64,
    /// Gaussian jitter standard deviation; `0.0` disables jitter.
    pub spread: f64,
}

/// Full per-source admission configuration.
#[derive(Debug, Clone)]
pub struct SourceAdmissionConfig {
    pub mode: AdmissionMode,
    /// Bunch period, `P`, if bunch-crossing discretization is enabled.
    pub bunch_period: Option<f64>,
    pub beam: Option<BeamParams>,
    /// Suppresses timestamp generation: passed-through events get `T = 0`
    /// and skip bunch-crossing/beam refinement (`spec.md` §4.C,
    /// "already-merged" flag).
    pub already_merged: bool,
}
