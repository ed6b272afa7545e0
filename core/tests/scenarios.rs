use eenet_graph::attributes::AttributeStore;
use eenet_graph::decay::DecayTable;
use eenet_graph::effects::{
    ArcEffect, BipartiteAltKCyclesEffect, BipartiteCycleMode, Effect, EffectContext, FourCyclesEffect,
    MatchingEffect, MatchingReciprocityEffect, ReciprocityEffect, SenderEffect, StarKind,
};
use eenet_graph::effects::AltKStarsEffect;
use eenet_graph::graph::{Graph, GraphShape};
use eenet_graph::two_path_cache::{TwoPathCache, TwoPathStorage};
use eenet_graph::Result;

fn directed_shape(n: u32) -> GraphShape {
    GraphShape {
        number_of_nodes: n,
        directed: true,
        bipartite: false,
        mode_a_count: 0,
        allow_loops: false,
    }
}

fn undirected_shape(n: u32) -> GraphShape {
    GraphShape {
        number_of_nodes: n,
        directed: false,
        bipartite: false,
        mode_a_count: 0,
        allow_loops: false,
    }
}

fn bipartite_shape(n: u32, mode_a: u32) -> GraphShape {
    GraphShape {
        number_of_nodes: n,
        directed: false,
        bipartite: true,
        mode_a_count: mode_a,
        allow_loops: false,
    }
}

/// S1: a complete bipartite K_{2,2} has exactly one four-cycle; deleting and
/// re-adding an edge moves the statistic by ±1 as the cycle is broken and
/// re-formed.
#[test]
fn four_cycles_complete_bipartite_toggle() -> Result<()> {
    let mut graph = Graph::new(bipartite_shape(4, 2), "k22")?;
    for &(a, b) in &[(0, 2), (0, 3), (1, 2), (1, 3)] {
        graph.insert_edge(a, b)?;
    }
    let mut cache = TwoPathCache::from_graph(&graph, TwoPathStorage::Dense);
    let attributes = AttributeStore::new();
    let effect = FourCyclesEffect;

    let ctx = EffectContext {
        graph: &graph,
        cache: &cache,
        attributes: &attributes,
    };
    assert_eq!(effect.direct(&ctx), 1.0);
    let delta_remove = effect.delta(&ctx, 1, 3);
    assert_eq!(delta_remove, -1.0);
    drop(ctx);

    graph.remove_edge(1, 3)?;
    cache.update_after_edge_change(&graph, 1, 3, -1);
    let ctx = EffectContext {
        graph: &graph,
        cache: &cache,
        attributes: &attributes,
    };
    assert_eq!(effect.direct(&ctx), 0.0);
    let delta_add = effect.delta(&ctx, 1, 3);
    assert_eq!(delta_add, 1.0);

    Ok(())
}

/// S2: an undirected star with 5 leaves; adding the 6th leaf moves the
/// alternating-k-star statistic by λ·((1-1/λ)^5 - (1-1/λ)^6).
#[test]
fn alt_stars_undirected_star_growth() -> Result<()> {
    let mut graph = Graph::new(undirected_shape(7), "star")?;
    for leaf in 1..=5u32 {
        graph.insert_edge(0, leaf)?;
    }
    let cache = TwoPathCache::from_graph(&graph, TwoPathStorage::Dense);
    let attributes = AttributeStore::new();
    let decay = DecayTable::new(2.0, 16);
    let effect = AltKStarsEffect::new("AltStars", StarKind::Undirected, decay.clone());

    let ctx = EffectContext {
        graph: &graph,
        cache: &cache,
        attributes: &attributes,
    };
    let delta = effect.delta(&ctx, 0, 6);
    // Central node's own contribution, isolated from the new leaf's 0->1
    // jump (which the leaf-side term in `delta` also includes).
    let central_only = decay.lambda() * (decay.power(5) - decay.power(6));
    let leaf_only = decay.lambda() * (decay.power(0) - decay.power(1));
    assert!((delta - (central_only + leaf_only)).abs() < 1e-9);
    assert!((central_only - 0.03125).abs() < 1e-9);

    Ok(())
}

/// S3: a single directed arc 1->2; toggling the reverse arc 2->1 moves
/// Reciprocity by +1 (creating a mutual pair), and moves it back by -1 once
/// toggled again.
#[test]
fn reciprocity_toggle_symmetry() -> Result<()> {
    let mut graph = Graph::new(directed_shape(3), "dyad")?;
    graph.insert_edge(1, 2)?;
    let mut cache = TwoPathCache::from_graph(&graph, TwoPathStorage::Dense);
    let attributes = AttributeStore::new();
    let effect = ReciprocityEffect;

    let ctx = EffectContext {
        graph: &graph,
        cache: &cache,
        attributes: &attributes,
    };
    assert_eq!(effect.delta(&ctx, 2, 1), 1.0);
    drop(ctx);

    graph.insert_edge(2, 1)?;
    cache.update_after_edge_change(&graph, 2, 1, 1);
    let ctx = EffectContext {
        graph: &graph,
        cache: &cache,
        attributes: &attributes,
    };
    assert_eq!(effect.delta(&ctx, 2, 1), -1.0);

    Ok(())
}

/// Testable Property 4: Δz(G, i, j) = -Δz(G ⊕ (i,j), i, j) for every effect,
/// checked here for Arc and Matching over a small graph.
#[test]
fn toggle_delta_is_involutive() -> Result<()> {
    let mut graph = Graph::new(undirected_shape(4), "involution")?;
    graph.insert_edge(0, 1)?;
    graph.insert_edge(1, 2)?;
    let mut attributes = AttributeStore::new();
    attributes.add_categorical("group", vec![Some(0), Some(0), Some(1), Some(1)], 4)?;
    let mut cache = TwoPathCache::from_graph(&graph, TwoPathStorage::Dense);

    for effect in [Box::new(ArcEffect) as Box<dyn Effect>, Box::new(MatchingEffect::new("group"))] {
        let ctx = EffectContext {
            graph: &graph,
            cache: &cache,
            attributes: &attributes,
        };
        let before = effect.delta(&ctx, 2, 3);
        drop(ctx);

        graph.toggle_edge(2, 3)?;
        cache.update_after_edge_change(&graph, 2, 3, 1);
        let ctx = EffectContext {
            graph: &graph,
            cache: &cache,
            attributes: &attributes,
        };
        let after = effect.delta(&ctx, 2, 3);
        assert!((before + after).abs() < 1e-9);
        drop(ctx);

        graph.toggle_edge(2, 3)?;
        cache.update_after_edge_change(&graph, 2, 3, -1);
    }

    Ok(())
}

/// Testable Property 1: the two-path cache stays consistent with direct
/// recomputation across a sequence of edge toggles, for both storage
/// strategies.
#[test]
fn two_path_cache_matches_recomputation_across_toggles() -> Result<()> {
    for storage in [TwoPathStorage::Dense, TwoPathStorage::Hash] {
        let mut graph = Graph::new(directed_shape(6), "cache-check")?;
        let mut cache = TwoPathCache::from_graph(&graph, storage);
        let toggles = [(0, 1), (1, 2), (2, 0), (3, 1), (0, 1), (4, 5), (5, 4)];
        for &(i, j) in &toggles {
            let inserted = graph.toggle_edge(i, j)?;
            cache.update_after_edge_change(&graph, i, j, if inserted { 1 } else { -1 });
            #[cfg(debug_assertions)]
            cache.assert_consistent(&graph)?;
        }
    }
    Ok(())
}

/// Correctness identity (§4.3): summing Δz over a walk of toggles starting
/// from the empty graph reproduces the direct statistic at every step, for
/// a representative structural and a representative attribute effect.
#[test]
fn correctness_identity_over_a_walk() -> Result<()> {
    let mut graph = Graph::new(bipartite_shape(6, 3), "walk")?;
    let mut attributes = AttributeStore::new();
    attributes.add_binary("active", vec![Some(true), Some(false), Some(true), Some(true), Some(false), Some(true)], 6)?;
    let mut cache = TwoPathCache::from_graph(&graph, TwoPathStorage::Dense);

    let structural = BipartiteAltKCyclesEffect::new("BipartiteAltKCyclesA", BipartiteCycleMode::A, DecayTable::new(1.5, 32));
    let attribute = SenderEffect::new("active");

    let toggles = [(0, 3), (0, 4), (1, 3), (1, 4), (2, 3), (2, 5), (0, 5)];
    let mut tracked_structural = 0.0;
    let mut tracked_attribute = 0.0;

    for &(a, b) in &toggles {
        let ctx = EffectContext {
            graph: &graph,
            cache: &cache,
            attributes: &attributes,
        };
        tracked_structural += structural.delta(&ctx, a, b);
        tracked_attribute += attribute.delta(&ctx, a, b);
        drop(ctx);

        let inserted = graph.toggle_edge(a, b)?;
        cache.update_after_edge_change(&graph, a, b, if inserted { 1 } else { -1 });

        let ctx = EffectContext {
            graph: &graph,
            cache: &cache,
            attributes: &attributes,
        };
        assert!((structural.direct(&ctx) - tracked_structural).abs() < 1e-6);
        assert!((attribute.direct(&ctx) - tracked_attribute).abs() < 1e-6);
    }

    Ok(())
}

/// Correctness identity (§4.3) over a directed walk that builds and breaks
/// several mutual dyads, covering `Reciprocity` and an attribute-reciprocity
/// effect: `direct` must equal the summed `delta` at every step, not 2x it.
#[test]
fn correctness_identity_over_a_directed_walk_with_reciprocity() -> Result<()> {
    let mut graph = Graph::new(directed_shape(4), "directed-walk")?;
    let mut attributes = AttributeStore::new();
    attributes.add_categorical("group", vec![Some(0), Some(0), Some(1), Some(0)], 4)?;
    let mut cache = TwoPathCache::from_graph(&graph, TwoPathStorage::Dense);

    let reciprocity = ReciprocityEffect;
    let matching_reciprocity = MatchingReciprocityEffect::new("group");

    let toggles = [
        (0, 1),
        (1, 0),
        (1, 2),
        (2, 1),
        (0, 3),
        (3, 0),
        (1, 0),
        (2, 3),
        (3, 2),
    ];
    let mut tracked_reciprocity = 0.0;
    let mut tracked_matching = 0.0;

    for &(a, b) in &toggles {
        let ctx = EffectContext {
            graph: &graph,
            cache: &cache,
            attributes: &attributes,
        };
        tracked_reciprocity += reciprocity.delta(&ctx, a, b);
        tracked_matching += matching_reciprocity.delta(&ctx, a, b);
        drop(ctx);

        let inserted = graph.toggle_edge(a, b)?;
        cache.update_after_edge_change(&graph, a, b, if inserted { 1 } else { -1 });

        let ctx = EffectContext {
            graph: &graph,
            cache: &cache,
            attributes: &attributes,
        };
        assert!((reciprocity.direct(&ctx) - tracked_reciprocity).abs() < 1e-6);
        assert!((matching_reciprocity.direct(&ctx) - tracked_matching).abs() < 1e-6);
    }

    Ok(())
}
