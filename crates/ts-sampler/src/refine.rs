use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::BeamParams;

/// `T ← ⌊T/P⌋·P` (`spec.md` §4.C).
pub fn discretize_bunch_crossing(t: f64, period: f64) -> f64 {
    (t / period).floor() * period
}

/// `d = z·cosθ + x·sinθ`; add `d / c_beam` and optional Gaussian jitter
/// (`spec.md` §4.C). `vertex` is `(x, y, z)` of the first primary-status
/// particle in the admitted event.
pub fn attach_to_beam<R: Rng + ?Sized>(
    t: f64,
    vertex: (f32, f32, f32),
    params: &BeamParams,
    rng: &mut R,
) -> f64 {
    let (x, y, z) = vertex;
    let _ = y;
    let d = z as f64 * params.angle.cos() + x as f64 * params.angle.sin();
    let mut refined = t + d / params.speed;
    if params.spread > 0.0 {
        let jitter = Normal::new(0.0, params.spread).expect("finite, non-negative spread");
        refined += jitter.sample(rng);
    }
    refined
}
