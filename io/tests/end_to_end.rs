//! Exercises the full load path a real `eenet estimate` invocation takes:
//! a config file pointing at a Pajek arc list and a binary attribute file,
//! parsed into a `Chain` ready for a sampler to run against.

use std::io::Write;

use eenet_graph::effects::EffectRegistry;
use eenet_graph::{AttributeStore, Chain, Result, TwoPathStorage};
use eenet_io::{attributes as attr_io, pajek, Config};

fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("eenet-io-e2e-{}-{name}", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn config_pajek_and_attributes_build_a_runnable_chain() -> Result<()> {
    let net_path = write_temp(
        "net.net",
        "*vertices 5\n*arcs\n1 2\n2 3\n3 4\n4 5\n5 1\n",
    );
    let binattr_path = write_temp("bin.txt", "node sex\n1 0\n2 1\n3 0\n4 1\n5 NA\n");

    let config_text = format!(
        "isDirected = true\n\
         numNodes = 5\n\
         arclistFile = {}\n\
         binattrFile = {}\n\
         structParams = {{ Arc, Reciprocity }}\n\
         attrParams = {{ Sender(sex) }}\n",
        net_path.display(),
        binattr_path.display(),
    );
    let config_path = write_temp("config.txt", &config_text);

    let config = Config::from_file(&config_path)?;
    let shape = config.graph_shape();
    let graph = pajek::read_graph(config.arclist_file.as_ref().unwrap(), shape)?;
    assert_eq!(graph.number_of_edges(), 5);

    let mut attributes = AttributeStore::new();
    attr_io::read_binary_attributes(
        config.binattr_file.as_ref().unwrap(),
        &mut attributes,
        shape.number_of_nodes as usize,
    )?;

    let registry = EffectRegistry::build(&config.effect_specs(), 2.0, false, &attributes)?;
    assert_eq!(registry.len(), 3);

    let chain = Chain::new(graph, TwoPathStorage::Hash, attributes, registry);
    assert_eq!(chain.statistics().len(), 3);
    assert_eq!(chain.graph().number_of_nodes(), 5);

    std::fs::remove_file(&net_path).ok();
    std::fs::remove_file(&binattr_path).ok();
    std::fs::remove_file(&config_path).ok();
    Ok(())
}

#[test]
fn bipartite_config_with_mode_a_split_round_trips_through_pajek() -> Result<()> {
    let net_path = write_temp(
        "bipartite.net",
        "*vertices 6 3\n*edges\n1 4\n1 5\n2 5\n2 6\n3 6\n",
    );
    let config_text = format!(
        "isDirected = false\n\
         isBipartite = true\n\
         numNodes = 6/3\n\
         arclistFile = {}\n\
         structParams = {{ FourCycles }}\n",
        net_path.display(),
    );
    let config_path = write_temp("bipartite-config.txt", &config_text);

    let config = Config::from_file(&config_path)?;
    let shape = config.graph_shape();
    assert!(shape.bipartite);
    assert_eq!(shape.mode_a_count, 3);

    let graph = pajek::read_graph(config.arclist_file.as_ref().unwrap(), shape)?;
    assert_eq!(graph.number_of_edges(), 5);

    std::fs::remove_file(&net_path).ok();
    std::fs::remove_file(&config_path).ok();
    Ok(())
}
