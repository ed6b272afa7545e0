//! The basic sampler (§4.4): a uniformly random dyad toggle per step, plain
//! Metropolis acceptance, no proposal-asymmetry correction (the proposal
//! distribution is already symmetric in the dyad itself).

use rand::Rng;

use eenet_graph::{Chain, Result};

use super::proposals::random_pair;
use super::{accumulate, clamped_exp, dot, Sampler, SamplerConfig, SweepOutcome};
use crate::rng::ChainRng;

#[derive(Debug, Clone)]
pub struct Basic {
    config: SamplerConfig,
}

impl Basic {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }
}

impl Sampler for Basic {
    fn sweep(&mut self, chain: &mut Chain, theta: &[f64], steps: u64, rng: &mut ChainRng) -> Result<SweepOutcome> {
        let mut outcome = SweepOutcome::empty(chain.registry().len());
        for _ in 0..steps {
            let shape = chain.graph().shape();
            let (i, j) = random_pair(&shape, rng);
            outcome.proposed += 1;

            let inserting = !chain.graph().has_edge(i, j);
            if self.config.forbid_reciprocity
                && chain.graph().is_directed()
                && inserting
                && chain.graph().has_edge(j, i)
            {
                continue;
            }

            let deltas = chain.delta_for(i, j);
            let log_ratio = dot(theta, &deltas);
            let accept_prob = clamped_exp(log_ratio).min(1.0);
            if rng.gen::<f64>() < accept_prob {
                chain.commit_toggle(i, j, &deltas)?;
                outcome.accepted += 1;
                accumulate(&mut outcome.sum_delta_z, &deltas);
            }
        }
        Ok(outcome)
    }
}
