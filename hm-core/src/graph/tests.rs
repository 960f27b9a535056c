use assertables::*;
use rstest::*;

use super::*;

#[fixture]
fn triangle() -> WeightedGraph {
    let mut g = WeightedGraph::new();
    g.add_node(Node::new(1, Location::new(47.650, -122.300)));
    g.add_node(Node::new(2, Location::new(47.651, -122.300)));
    g.add_node(Node::new(3, Location::new(47.651, -122.301)).with_name("Red Square"));
    g.add_edge_by_distance(1, 2, Some("15th Ave NE".into()));
    g.add_edge_by_distance(2, 1, Some("15th Ave NE".into()));
    g.add_edge(2, 3, 80.0, EdgeLabel::Road { name: None });
    g
}

#[rstest]
fn test_add_node_is_idempotent(mut triangle: WeightedGraph) {
    triangle.add_node(Node::new(1, Location::new(0.0, 0.0)));

    assert_eq!(triangle.node_count(), 3);
    assert_eq!(triangle.location(1).unwrap(), Location::new(47.650, -122.300));
}

#[rstest]
fn test_add_edge_missing_endpoint_is_ignored(mut triangle: WeightedGraph) {
    let before = triangle.edge_count();
    triangle.add_edge(1, 99, 1.0, EdgeLabel::Road { name: None });
    triangle.add_edge(99, 1, 1.0, EdgeLabel::Road { name: None });
    triangle.add_edge_by_distance(42, 43, None);

    assert_eq!(triangle.edge_count(), before);
}

#[rstest]
fn test_parallel_edges_are_kept(mut triangle: WeightedGraph) {
    triangle.add_edge(2, 3, 80.0, EdgeLabel::Road { name: None });
    triangle.add_edge(2, 3, 50.0, EdgeLabel::Shortcut { via: 1 });

    let to_three: Vec<_> = triangle.neighbors(2).unwrap().into_iter().filter(|e| e.to == 3).collect();
    assert_eq!(to_three.len(), 3);
    assert_eq!(to_three.iter().filter(|e| e.label.is_shortcut()).count(), 1);
}

#[rstest]
fn test_neighbors_is_a_snapshot(mut triangle: WeightedGraph) {
    let snapshot = triangle.neighbors(2).unwrap();
    triangle.add_edge(2, 3, 10.0, EdgeLabel::Road { name: None });

    assert_eq!(snapshot.len(), 2);
    assert_eq!(triangle.neighbors(2).unwrap().len(), 3);
}

#[rstest]
fn test_edge_by_distance_uses_great_circle(triangle: WeightedGraph) {
    let edge = triangle.neighbors(1).unwrap().pop().unwrap();
    let expected = triangle.estimated_distance(1, 2).unwrap();

    assert_eq!(edge.to, 2);
    assert_eq!(edge.weight, expected);
    assert_eq!(edge.label, EdgeLabel::Road { name: Some("15th Ave NE".into()) });
    // 0.001 degrees of latitude is a little over 100 metres
    assert_gt!(edge.weight, 100.0);
    assert_lt!(edge.weight, 120.0);
}

#[rstest]
fn test_adjacent_matches_neighbors(triangle: WeightedGraph) {
    let mut adjacent: Vec<_> = triangle.adjacent(2).unwrap().collect();
    let mut neighbors: Vec<_> = triangle.neighbors(2).unwrap().into_iter().map(|e| (e.to, e.weight)).collect();
    adjacent.sort_by(|a, b| a.0.cmp(&b.0));
    neighbors.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(adjacent, neighbors);
}

#[rstest]
fn test_is_navigable(triangle: WeightedGraph) {
    assert!(triangle.is_navigable(1).unwrap());
    assert!(triangle.is_navigable(2).unwrap());
    assert!(!triangle.is_navigable(3).unwrap());
}

#[rstest]
fn test_unknown_node_is_not_found(triangle: WeightedGraph) {
    assert_eq!(triangle.neighbors(7).unwrap_err(), GraphError::NotFound(7));
    assert_eq!(triangle.location(7).unwrap_err(), GraphError::NotFound(7));
    assert_eq!(triangle.estimated_distance(1, 7).unwrap_err(), GraphError::NotFound(7));
    assert!(triangle.is_navigable(7).is_err());
    assert!(triangle.adjacent(7).is_err());
}

#[rstest]
fn test_flip_swaps_endpoints() {
    let edge = WeightedEdge::new(1, 2, 3.5, EdgeLabel::Shortcut { via: 9 });
    let flipped = edge.flip();

    assert_eq!((flipped.from, flipped.to, flipped.weight), (2, 1, 3.5));
    assert_eq!(flipped.label, edge.label);
    assert_eq!(flipped.flip(), edge);
}

#[rstest]
fn test_vertices_and_names(triangle: WeightedGraph) {
    let mut ids = triangle.vertices();
    ids.sort_unstable();

    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(triangle.node(3).unwrap().name.as_deref(), Some("Red Square"));
    assert_eq!(triangle.edges().count(), 3);
}

#[rstest]
fn test_one_way_edge_is_not_symmetric(mut triangle: WeightedGraph) {
    // 2 -> 3 has no way back
    assert!(!triangle.is_symmetric());

    triangle.add_edge(3, 2, 80.0, EdgeLabel::Road { name: None });
    assert!(triangle.is_symmetric());
}

#[rstest]
fn test_symmetry_matches_weights_and_multiplicity(mut triangle: WeightedGraph) {
    triangle.add_edge(3, 2, 80.0, EdgeLabel::Road { name: None });
    triangle.add_edge(1, 1, 5.0, EdgeLabel::Road { name: None });
    assert!(triangle.is_symmetric());

    triangle.add_edge(2, 3, 50.0, EdgeLabel::Shortcut { via: 1 });
    triangle.add_edge(3, 2, 55.0, EdgeLabel::Shortcut { via: 1 });
    assert!(!triangle.is_symmetric());

    triangle.add_edge(2, 3, 55.0, EdgeLabel::Shortcut { via: 1 });
    triangle.add_edge(3, 2, 50.0, EdgeLabel::Shortcut { via: 1 });
    assert!(triangle.is_symmetric());
}
