use rand::Rng;
use rand_distr::{Distribution, Exp, Poisson};

use ts_source::Source;

use crate::config::{AdmissionMode, Placement, SourceAdmissionConfig};
use crate::draw::Admission;
use crate::error::SamplerError;
use crate::weighted::WeightedPool;

/// Per-source admission state (`spec.md` §4.C). Stateless except for
/// `WeightedResampling`, which preloads its weight pool once at construction.
pub struct SourceSampler {
    config: SourceAdmissionConfig,
    weighted_pool: Option<WeightedPool>,
}

impl SourceSampler {
    pub fn new(config: SourceAdmissionConfig) -> Self {
        Self {
            config,
            weighted_pool: None,
        }
    }

    /// Preload the weighted-resampling pool. Required before the first
    /// `draw` call if `config.mode` is `WeightedResampling`; a no-op
    /// otherwise.
    pub fn preload_weights(
        &mut self,
        source: &mut Source,
        gp_double_values_branch: usize,
    ) -> Result<(), SamplerError> {
        if let AdmissionMode::WeightedResampling { weight_key } = &self.config.mode {
            self.weighted_pool = Some(WeightedPool::preload(
                source,
                gp_double_values_branch,
                weight_key,
            )?);
        }
        Ok(())
    }

    pub fn already_merged(&self) -> bool {
        self.config.already_merged
    }

    /// Draw this source's admission for one timeslice of duration
    /// `duration_ns` (`spec.md` §4.C). Timestamps already carry
    /// bunch-crossing discretization if configured; beam attachment is
    /// applied separately per event once the Merger has loaded its vertex
    /// (`refine::attach_to_beam`), since it depends on data the sampler
    /// does not have at draw time.
    pub fn draw<R: Rng + ?Sized>(&self, duration_ns: f64, rng: &mut R) -> Admission {
        let mut admission = match &self.config.mode {
            AdmissionMode::Static { events_per_slice } => {
                let timestamps = (0..*events_per_slice)
                    .map(|_| rng.gen_range(0.0..=duration_ns))
                    .collect();
                Admission {
                    timestamps,
                    event_indices: None,
                }
            }
            AdmissionMode::FrequencyPoisson {
                frequency,
                placement,
            } => self.draw_frequency_poisson(*frequency, *placement, duration_ns, rng),
            AdmissionMode::WeightedResampling { .. } => {
                let pool = self
                    .weighted_pool
                    .as_ref()
                    .expect("preload_weights must run before draw in weighted mode");
                let indices = pool.draw(duration_ns, rng);
                let timestamps = indices.iter().map(|_| rng.gen_range(0.0..=duration_ns)).collect();
                Admission {
                    timestamps,
                    event_indices: Some(indices),
                }
            }
        };

        if self.config.already_merged {
            for t in &mut admission.timestamps {
                *t = 0.0;
            }
            return admission;
        }

        if let Some(period) = self.config.bunch_period {
            for t in &mut admission.timestamps {
                *t = crate::refine::discretize_bunch_crossing(*t, period);
            }
        }

        admission
    }

    fn draw_frequency_poisson<R: Rng + ?Sized>(
        &self,
        frequency: f64,
        placement: Placement,
        duration_ns: f64,
        rng: &mut R,
    ) -> Admission {
        let lambda = frequency * duration_ns;
        match placement {
            Placement::Uniform => {
                let poisson = Poisson::new(lambda.max(f64::MIN_POSITIVE))
                    .expect("lambda must be positive and finite");
                let n = poisson.sample(rng) as usize;
                let timestamps = (0..n).map(|_| rng.gen_range(0.0..=duration_ns)).collect();
                Admission {
                    timestamps,
                    event_indices: None,
                }
            }
            Placement::ExponentialTimeline => {
                let exp = Exp::new(lambda.max(f64::MIN_POSITIVE))
                    .expect("lambda must be positive and finite");
                let mut timestamps = Vec::new();
                let mut t = 0.0;
                loop {
                    t += exp.sample(rng);
                    if t > duration_ns {
                        break;
                    }
                    timestamps.push(t);
                }
                Admission {
                    timestamps,
                    event_indices: None,
                }
            }
        }
    }

    pub fn beam_params(&self) -> Option<&crate::config::BeamParams> {
        self.config.beam.as_ref()
    }

    /// The preloaded weight for a weighted-resampling draw's source index,
    /// carried into the event's `SubEventHeader.weight` (`spec.md` §4.D.4).
    /// `1.0` outside weighted-resampling mode.
    pub fn weight_at(&self, index: u64) -> f64 {
        self.weighted_pool
            .as_ref()
            .map(|pool| pool.weight_at(index))
            .unwrap_or(1.0)
    }
}
