use rand::Rng;
use rand_distr::{Distribution, Poisson, WeightedIndex};

use ts_model::{CollectionData, ParamValue};
use ts_source::Source;

use crate::error::SamplerError;

const MAX_RETRIES: u32 = 8;

/// Preloaded per-event weights for `AdmissionMode::WeightedResampling`
/// (`spec.md` §4.C: "preload all events and weights").
pub struct WeightedPool {
    weights: Vec<f64>,
    mean_weight: f64,
    index: WeightedIndex<f64>,
}

fn weight_of(buffer: &ts_model::TimesliceBuffer, key_branch: usize, weight_key: &str) -> f64 {
    let CollectionData::Value(params) = buffer.get(key_branch) else {
        return 1.0;
    };
    let Some(key_slot) = params.keys.iter().position(|k| k == weight_key) else {
        return 1.0;
    };
    match params.values.get(key_slot).and_then(|row| row.first()) {
        Some(ParamValue::Double(w)) => *w,
        Some(ParamValue::Float(w)) => *w as f64,
        Some(ParamValue::Int(w)) => *w as f64,
        _ => 1.0,
    }
}

impl WeightedPool {
    /// Preload every entry's weight from its `GPDoubleKeys`/`GPDoubleValues`
    /// pair, defaulting to `1.0` when the key is absent (uniform weights).
    pub fn preload(
        source: &mut Source,
        gp_double_values_branch: usize,
        weight_key: &str,
    ) -> Result<Self, SamplerError> {
        let total = source.total_entries();
        let mut weights = Vec::with_capacity(total as usize);
        for i in 0..total {
            source.read_at(i)?;
            weights.push(weight_of(source.local_buffer(), gp_double_values_branch, weight_key));
        }
        let mean_weight = if weights.is_empty() {
            0.0
        } else {
            weights.iter().sum::<f64>() / weights.len() as f64
        };
        let index = WeightedIndex::new(if weights.is_empty() { vec![1.0] } else { weights.clone() })
            .expect("non-empty, non-negative weights");
        Ok(Self {
            weights,
            mean_weight,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// The preloaded weight for entry `index`, `1.0` if out of range.
    pub fn weight_at(&self, index: u64) -> f64 {
        self.weights.get(index as usize).copied().unwrap_or(1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Draw `N ~ Poisson(meanRate · D)` then `N` indices by weight with
    /// replacement, retrying if `N` exceeds the pool size before clamping
    /// (`spec.md` §4.C).
    pub fn draw<R: Rng + ?Sized>(&self, duration_ns: f64, rng: &mut R) -> Vec<u64> {
        if self.is_empty() {
            return Vec::new();
        }
        let mean_rate = self.mean_weight * 1e-9;
        let lambda = (mean_rate * duration_ns).max(f64::MIN_POSITIVE);
        let poisson = Poisson::new(lambda).expect("lambda must be positive and finite");

        let mut n = poisson.sample(rng) as usize;
        let mut retries = 0;
        while n > self.len() && retries < MAX_RETRIES {
            n = poisson.sample(rng) as usize;
            retries += 1;
        }
        if n > self.len() {
            tracing::warn!(
                drawn = n,
                pool_size = self.len(),
                "weighted resampling draw exceeds file size after retries, clamping"
            );
            n = self.len();
        }

        (0..n)
            .map(|_| self.index.sample(rng) as u64)
            .collect()
    }
}
