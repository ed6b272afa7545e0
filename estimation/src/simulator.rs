//! The simulator (§4.6): draws samples from a fixed θ by alternating
//! burn-in and inter-sample sweeps, emitting one row of observed
//! z-statistics (and, via the caller's callback, an optional graph
//! snapshot) per sample. θ is read-only throughout; the simulator never
//! updates it.

use eenet_graph::{Chain, Result};

use crate::rng::ChainRng;
use crate::sampler::Sampler;

#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub burnin: u64,
    pub interval: u64,
    pub sample_size: u64,
}

/// Runs the simulator to completion, invoking `on_sample(chain, index)`
/// once per emitted sample with the chain positioned at that sample's
/// state; `chain.statistics()` gives the observed zₖ(G) row and
/// `chain.graph()` is available for an optional snapshot write.
pub fn simulate(
    chain: &mut Chain,
    sampler: &mut dyn Sampler,
    theta: &[f64],
    rng: &mut ChainRng,
    config: &SimulationConfig,
    mut on_sample: impl FnMut(&Chain, u64) -> Result<()>,
) -> Result<()> {
    sampler.sweep(chain, theta, config.burnin, rng)?;
    for index in 0..config.sample_size {
        sampler.sweep(chain, theta, config.interval, rng)?;
        on_sample(chain, index)?;
    }
    Ok(())
}
