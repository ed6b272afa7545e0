//! Exercises `Tnt` at the two density extremes where the proposal
//! direction is forced rather than a fair coin flip (empty graph: only
//! addition is proposable; complete graph: only deletion is proposable).
//! The asymmetry correction must collapse to 1 at a forced move instead of
//! dividing by the zero count of the unavailable move, which would push
//! `accept_prob` to 1.0 on every sweep regardless of `theta`.

use eenet_estimation::sampler::{Sampler, SamplerConfig, Tnt};
use eenet_estimation::seeded;
use eenet_graph::attributes::AttributeStore;
use eenet_graph::effects::{EffectRegistry, EffectSpec};
use eenet_graph::graph::{Graph, GraphShape};
use eenet_graph::two_path_cache::TwoPathStorage;
use eenet_graph::{Chain, Result};

fn undirected_shape(n: u32) -> GraphShape {
    GraphShape {
        number_of_nodes: n,
        directed: false,
        bipartite: false,
        mode_a_count: 0,
        allow_loops: false,
    }
}

#[test]
fn tnt_sweeps_from_an_empty_graph_without_forcing_acceptance() -> Result<()> {
    let n = 8u32;
    let graph = Graph::new(undirected_shape(n), "tnt-empty")?;
    let attributes = AttributeStore::new();
    let registry = EffectRegistry::build(&[EffectSpec::structural("Arc")], 2.0, false, &attributes)?;
    let mut chain = Chain::new(graph, TwoPathStorage::Dense, attributes, registry);

    let mut sampler = Tnt::new(&chain, SamplerConfig::default());
    let mut rng = seeded(7);
    // A strongly negative theta on Arc should make additions unattractive;
    // if the forced-addition correction were +inf the accept probability
    // would be clamped to 1.0 regardless, so almost every sweep would add
    // an edge. With the fix, acceptance should track the Metropolis ratio
    // and not every proposal is accepted.
    let theta = vec![-10.0];

    let outcome = sampler.sweep(&mut chain, &theta, 500, &mut rng)?;
    assert!(outcome.proposed > 0);
    assert!(
        outcome.accepted < outcome.proposed,
        "a -10 theta on Arc should reject most proposals from an empty graph, not force accept"
    );
    Ok(())
}

#[test]
fn tnt_sweeps_from_a_complete_graph_without_forcing_acceptance() -> Result<()> {
    let n = 5u32;
    let mut graph = Graph::new(undirected_shape(n), "tnt-complete")?;
    for i in 0..n {
        for j in (i + 1)..n {
            graph.insert_edge(i, j)?;
        }
    }
    let max_edges = graph.max_possible_edges();
    assert_eq!(graph.number_of_edges(), max_edges);

    let attributes = AttributeStore::new();
    let registry = EffectRegistry::build(&[EffectSpec::structural("Arc")], 2.0, false, &attributes)?;
    let mut chain = Chain::new(graph, TwoPathStorage::Dense, attributes, registry);

    let mut sampler = Tnt::new(&chain, SamplerConfig::default());
    let mut rng = seeded(11);
    // A strongly positive theta on Arc should make deletions unattractive;
    // the forced-deletion proposal must not be rubber-stamped by an +inf
    // correction collapsing accept_prob to 1.0.
    let theta = vec![10.0];

    let outcome = sampler.sweep(&mut chain, &theta, 500, &mut rng)?;
    assert!(outcome.proposed > 0);
    assert!(
        outcome.accepted < outcome.proposed,
        "a +10 theta on Arc should reject most deletion proposals from a complete graph, not force accept"
    );
    Ok(())
}
