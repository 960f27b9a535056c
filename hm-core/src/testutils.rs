//! Graph fixtures shared by the preprocessing crates' tests.

use rstest::fixture;

use crate::{
    EdgeLabel,
    Location,
    Node,
    NodeId,
    WeightedGraph,
};

/// Add a two-way road of fixed `weight` between `a` and `b`.
pub fn add_road(graph: &mut WeightedGraph, a: NodeId, b: NodeId, weight: f64) {
    graph.add_edge(a, b, weight, EdgeLabel::Road { name: None });
    graph.add_edge(b, a, weight, EdgeLabel::Road { name: None });
}

/// Add a two-way road weighted by great-circle distance between `a` and `b`.
pub fn add_geo_road(graph: &mut WeightedGraph, a: NodeId, b: NodeId) {
    graph.add_edge_by_distance(a, b, None);
    graph.add_edge_by_distance(b, a, None);
}

/// A path `1 - 2 - ... - n` with unit weights.
///
/// All nodes share one location so the great-circle estimate is zero and never overestimates the
/// unit edge weights.
pub fn path_graph(n: u64) -> WeightedGraph {
    let mut graph = WeightedGraph::new();
    for id in 1..=n {
        graph.add_node(Node::new(id, Location::new(47.65, -122.30)));
    }
    for id in 1..n {
        add_road(&mut graph, id, id + 1, 1.0);
    }
    graph
}

/// The five-node path `A - B - C - D - E` as ids 1..=5.
#[fixture]
pub fn five_path() -> WeightedGraph {
    path_graph(5)
}

/// A `rows x cols` street grid near Seattle with slightly jittered intersections and
/// great-circle weights, plus a few diagonal streets.
///
/// Node ids are `row * cols + col + 1`. The jitter is deterministic so that edge weights are
/// pairwise distinct and tests are reproducible.
pub fn grid_graph(rows: u64, cols: u64) -> WeightedGraph {
    let mut graph = WeightedGraph::new();
    let id = |r: u64, c: u64| r * cols + c + 1;
    for r in 0..rows {
        for c in 0..cols {
            #[allow(clippy::cast_precision_loss)]
            let (jr, jc) = (((r * 31 + c * 17) % 11) as f64, ((r * 13 + c * 29) % 7) as f64);
            #[allow(clippy::cast_precision_loss)]
            let loc = Location::new(
                47.60 + 0.001 * r as f64 + 0.00003 * jr,
                -122.33 + 0.0013 * c as f64 + 0.00004 * jc,
            );
            graph.add_node(Node::new(id(r, c), loc));
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                add_geo_road(&mut graph, id(r, c), id(r, c + 1));
            }
            if r + 1 < rows {
                add_geo_road(&mut graph, id(r, c), id(r + 1, c));
            }
            if r + 1 < rows && c + 1 < cols && (r + c) % 3 == 0 {
                add_geo_road(&mut graph, id(r, c), id(r + 1, c + 1));
            }
        }
    }
    graph
}

#[fixture]
pub fn small_grid() -> WeightedGraph {
    grid_graph(4, 5)
}

/// A grid with an extra unconnected, named place marker (id `0`).
#[fixture]
pub fn grid_with_landmark() -> WeightedGraph {
    let mut graph = grid_graph(3, 3);
    graph.add_node(Node::new(0, Location::new(47.601, -122.331)).with_name("Pike Place Market"));
    graph
}
