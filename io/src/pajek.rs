//! Pajek-compatible graph I/O (§6): `*vertices N [N_A]`, optional vertex
//! name lines, then `*arcs` (directed) or `*edges` (undirected/bipartite)
//! followed by `i j` endpoint pairs, 1-based in the file and 0-based
//! internally.

use std::io::Write;
use std::path::Path;

use eenet_graph::graph::{Graph, GraphShape};
use eenet_graph::{EeError, Result};

/// Reads a Pajek `.net` file into a fresh `Graph` of the given shape.
/// `shape.number_of_nodes` (and, for bipartite graphs, `shape.mode_a_count`)
/// must already match the `*vertices` header; a mismatch is a config error
/// since the caller's `numNodes` config key is the source of truth the
/// rest of the chain (attribute arrays, θ vector length) is built against.
pub fn read_graph(path: impl AsRef<Path>, shape: GraphShape) -> Result<Graph> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| EeError::Config(format!("could not read graph file '{}': {e}", path.display())))?;
    parse_graph(&text, shape, &path.display().to_string())
}

fn parse_graph(text: &str, shape: GraphShape, source: &str) -> Result<Graph> {
    let mut lines = text.lines().enumerate();
    let mut header_n: Option<u32> = None;

    // `*vertices N [N_A]`
    for (idx, line) in &mut lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let keyword = parts.next().unwrap_or_default();
        if !keyword.eq_ignore_ascii_case("*vertices") {
            return Err(EeError::Config(format!(
                "{source}:{}: expected '*vertices N', got '{line}'",
                idx + 1
            )));
        }
        let n: u32 = parts
            .next()
            .ok_or_else(|| EeError::Config(format!("{source}:{}: '*vertices' missing node count", idx + 1)))?
            .parse()
            .map_err(|e| EeError::Config(format!("{source}:{}: bad vertex count: {e}", idx + 1)))?;
        header_n = Some(n);
        break;
    }

    let header_n = header_n
        .ok_or_else(|| EeError::Config(format!("{source}: missing '*vertices' header")))?;
    if header_n != shape.number_of_nodes {
        return Err(EeError::Config(format!(
            "{source}: '*vertices' declares {header_n} nodes but the configuration's numNodes is {}",
            shape.number_of_nodes
        )));
    }

    let mut graph = Graph::new(shape, source)?;
    let mut in_edge_section = false;
    let mut directed_section = shape.directed;

    for (idx, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(keyword) = line.strip_prefix('*') {
            let keyword = keyword.split_whitespace().next().unwrap_or_default();
            if keyword.eq_ignore_ascii_case("arcs") {
                in_edge_section = true;
                directed_section = true;
            } else if keyword.eq_ignore_ascii_case("edges") {
                in_edge_section = true;
                directed_section = false;
            } else {
                // A vertex-label block (`*vertices` entries with names) or
                // another Pajek section this reader does not need; skip it.
                in_edge_section = false;
            }
            continue;
        }
        if !in_edge_section {
            // Vertex name/coordinate line; node attributes are carried
            // separately by the attribute files (§6), so this is ignored.
            continue;
        }

        let mut parts = line.split_whitespace();
        let i: u32 = parts
            .next()
            .ok_or_else(|| EeError::Config(format!("{source}:{}: empty edge line", idx + 1)))?
            .parse()
            .map_err(|e| EeError::Config(format!("{source}:{}: bad endpoint: {e}", idx + 1)))?;
        let j: u32 = parts
            .next()
            .ok_or_else(|| EeError::Config(format!("{source}:{}: edge line missing second endpoint", idx + 1)))?
            .parse()
            .map_err(|e| EeError::Config(format!("{source}:{}: bad endpoint: {e}", idx + 1)))?;
        if i == 0 || j == 0 {
            return Err(EeError::Config(format!(
                "{source}:{}: Pajek endpoints are 1-based, got {i} {j}",
                idx + 1
            )));
        }
        let (i, j) = (i - 1, j - 1);

        if directed_section != graph.is_directed() && !graph.is_bipartite() {
            return Err(EeError::Config(format!(
                "{source}:{}: '*{}' section does not match the configured directedness",
                idx + 1,
                if directed_section { "arcs" } else { "edges" }
            )));
        }

        graph.insert_edge(i, j).map_err(|e| {
            EeError::Config(format!("{source}:{}: could not insert edge ({i}, {j}): {e}", idx + 1))
        })?;
    }

    Ok(graph)
}

/// Writes `graph` back out in the same Pajek form, 0-based internal indices
/// converted to Pajek's 1-based convention. Used both to round-trip a
/// loaded graph and to emit simulator snapshots (`<prefix>_<i>.net`).
pub fn write_graph(path: impl AsRef<Path>, graph: &Graph) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .map_err(|e| EeError::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display()))))?;
    let mut writer = std::io::BufWriter::new(file);

    if graph.is_bipartite() {
        let shape = graph.shape();
        writeln!(writer, "*vertices {} {}", shape.number_of_nodes, shape.mode_a_count)?;
    } else {
        writeln!(writer, "*vertices {}", graph.number_of_nodes())?;
    }

    if graph.is_directed() {
        writeln!(writer, "*arcs")?;
    } else {
        writeln!(writer, "*edges")?;
    }
    for (i, j) in graph.iter_edges() {
        writeln!(writer, "{} {}", i + 1, j + 1)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eenet_graph::types::Direction;

    fn directed_shape(n: u32) -> GraphShape {
        GraphShape {
            number_of_nodes: n,
            directed: true,
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

    #[test]
    fn parses_directed_arcs() {
        let text = "*vertices 3\n*arcs\n1 2\n2 3\n";
        let graph = parse_graph(text, directed_shape(3), "test").unwrap();
        assert_eq!(graph.number_of_edges(), 2);
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(1, 2));
        assert!(!graph.has_edge(0, 2));
    }

    #[test]
    fn parses_bipartite_header_and_edges() {
        let text = "*vertices 4 2\n*edges\n1 3\n1 4\n2 3\n";
        let graph = parse_graph(text, bipartite_shape(4, 2), "test").unwrap();
        assert_eq!(graph.number_of_edges(), 3);
        assert!(graph.has_edge(0, 2));
        assert!(graph.has_edge(1, 2));
    }

    #[test]
    fn rejects_vertex_count_mismatch() {
        let text = "*vertices 5\n*arcs\n1 2\n";
        assert!(parse_graph(text, directed_shape(3), "test").is_err());
    }

    #[test]
    fn round_trips_through_write_and_read() {
        let text = "*vertices 4\n*arcs\n1 2\n2 3\n3 4\n4 1\n";
        let graph = parse_graph(text, directed_shape(4), "test").unwrap();

        let dir = std::env::temp_dir().join(format!("eenet-pajek-test-{}", std::process::id()));
        write_graph(&dir, &graph).unwrap();
        let reread = read_graph(&dir, directed_shape(4)).unwrap();
        std::fs::remove_file(&dir).ok();

        assert_eq!(reread.number_of_edges(), graph.number_of_edges());
        for i in 0..4 {
            let a: Vec<_> = graph.neighbours(i, Direction::Out).collect();
            let b: Vec<_> = reread.neighbours(i, Direction::Out).collect();
            assert_eq!(a, b);
        }
    }
}
