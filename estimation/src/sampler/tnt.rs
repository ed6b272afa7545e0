//! Tie-No-Tie sampler (§4.4): half the time propose deleting a uniformly
//! random existing edge, half the time propose adding a uniformly random
//! non-edge, correcting the Metropolis ratio for the resulting proposal
//! asymmetry by the edge/non-edge count ratio named in the spec.

use rand::Rng;

use eenet_graph::{Chain, Result};

use super::edge_set::EdgeSet;
use super::proposals::{random_existing_edge, random_non_edge};
use super::{accumulate, clamped_exp, dot, Sampler, SamplerConfig, SweepOutcome};
use crate::rng::ChainRng;

#[derive(Debug, Clone)]
pub struct Tnt {
    config: SamplerConfig,
    edges: EdgeSet,
}

impl Tnt {
    pub fn new(chain: &Chain, config: SamplerConfig) -> Self {
        let symmetric = !chain.graph().is_directed();
        let edges = EdgeSet::from_edges(symmetric, chain.graph().iter_edges());
        Self { config, edges }
    }
}

impl Sampler for Tnt {
    fn sweep(&mut self, chain: &mut Chain, theta: &[f64], steps: u64, rng: &mut ChainRng) -> Result<SweepOutcome> {
        let mut outcome = SweepOutcome::empty(chain.registry().len());
        for _ in 0..steps {
            let e = chain.graph().number_of_edges();
            let d = chain.graph().max_possible_edges();
            let non_edges = d - e;

            // Propose deletion unless there are no edges to delete; propose
            // addition unless the graph is already complete. At either
            // density extreme the proposal direction is forced rather than
            // a fair coin flip, so the asymmetry correction collapses to 1
            // (the deterministic-proposal Metropolis ratio) instead of the
            // general e/non_edges ratio, which would divide by zero.
            let forced = e == 0 || non_edges == 0;
            let propose_deletion = if e == 0 {
                false
            } else if non_edges == 0 {
                true
            } else {
                rng.gen_bool(0.5)
            };

            outcome.proposed += 1;

            let proposal = if propose_deletion {
                let correction = if forced { 1.0 } else { e as f64 / non_edges as f64 };
                random_existing_edge(&self.edges, rng).map(|(i, j)| (i, j, correction))
            } else {
                let correction = if forced { 1.0 } else { non_edges as f64 / e as f64 };
                random_non_edge(chain.graph(), rng).map(|(i, j)| (i, j, correction))
            };
            let (i, j, correction) = match proposal {
                Some(p) => p,
                None => continue,
            };

            let inserting = !chain.graph().has_edge(i, j);
            if self.config.forbid_reciprocity
                && chain.graph().is_directed()
                && inserting
                && chain.graph().has_edge(j, i)
            {
                continue;
            }

            let deltas = chain.delta_for(i, j);
            let log_ratio = dot(theta, &deltas) + correction.ln();
            let accept_prob = clamped_exp(log_ratio).min(1.0);
            if rng.gen::<f64>() < accept_prob {
                let inserted = chain.commit_toggle(i, j, &deltas)?;
                if inserted {
                    self.edges.insert(i, j);
                } else {
                    self.edges.remove(i, j);
                }
                outcome.accepted += 1;
                accumulate(&mut outcome.sum_delta_z, &deltas);
            }
        }
        Ok(outcome)
    }
}
