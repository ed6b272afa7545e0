//! The sampler kernel (§4.4): three Metropolis-family proposal/acceptance
//! loops sharing one trait, each driving a `Chain` and accumulating the
//! statistics the estimator and simulator both consume.

mod basic;
mod edge_set;
mod ifd;
mod proposals;
mod tnt;

pub use basic::Basic;
pub use ifd::Ifd;
pub use tnt::Tnt;

use eenet_graph::{Chain, Result};

/// Per-sweep structural knobs common to every sampler: the
/// `forbidReciprocity` flag (§6) that every sampler honours the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct SamplerConfig {
    pub forbid_reciprocity: bool,
}

/// `Σ Δz` and acceptance counters accumulated over one sweep (§3 "trace
/// records", §4.4's `SweepOutcome`). The estimator averages `sum_delta_z`
/// by `proposed` (Algorithm S/EE) or by elapsed steps (simulator); the
/// acceptance rate is `accepted as f64 / proposed as f64`.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub sum_delta_z: Vec<f64>,
    pub accepted: u64,
    pub proposed: u64,
}

impl SweepOutcome {
    pub fn empty(number_of_effects: usize) -> Self {
        Self {
            sum_delta_z: vec![0.0; number_of_effects],
            accepted: 0,
            proposed: 0,
        }
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}

/// The shared loop skeleton (§4.4): "propose a move, compute Σₖ θₖ·Δzₖ,
/// accept with Metropolis criterion, mutate graph (and caches), accumulate
/// statistics." `Basic`, `Tnt` and `Ifd` differ only in how they propose a
/// move and correct the acceptance ratio for that proposal's asymmetry.
pub trait Sampler {
    /// Runs `steps` proposal/accept/reject iterations against `chain`,
    /// reading `theta` read-only throughout, and returns the accumulated
    /// outcome. Reproducible given `chain`'s and the sampler's RNG state
    /// (§4.4's ordering guarantee).
    fn sweep(&mut self, chain: &mut Chain, theta: &[f64], steps: u64, rng: &mut crate::rng::ChainRng) -> Result<SweepOutcome>;
}

/// `exp(x)` clamped so a pathological θ·Δz never produces `inf` or `NaN`
/// (§4.5 "numerical overflow in exponentials is clamped"). `709` is just
/// under `f64::MAX`'s exponent; beyond it the Metropolis ratio is already
/// indistinguishable from "always accept" or "always reject".
pub(crate) const EXP_CLAMP: f64 = 700.0;

pub(crate) fn clamped_exp(log_ratio: f64) -> f64 {
    log_ratio.clamp(-EXP_CLAMP, EXP_CLAMP).exp()
}

pub(crate) fn dot(theta: &[f64], deltas: &[f64]) -> f64 {
    theta.iter().zip(deltas).map(|(t, d)| t * d).sum()
}

pub(crate) fn accumulate(sum: &mut [f64], deltas: &[f64]) {
    for (s, d) in sum.iter_mut().zip(deltas) {
        *s += d;
    }
}
