//! Serialized road network input.
//!
//! A graph file lists nodes with coordinates and ways as ordered node sequences, in the spirit of
//! an OpenStreetMap extract that has already been filtered down to roads and named places:
//!
//! ```json
//! {
//!   "nodes": [{ "id": 1, "lat": 47.65, "lon": -122.30 },
//!             { "id": 2, "lat": 47.66, "lon": -122.30, "name": "U District Station" }],
//!   "ways":  [{ "nodes": [1, 2], "name": "Brooklyn Ave NE" }]
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{
    Context,
    Result,
};
use hm_core::{
    Location,
    Node,
    NodeId,
    WeightedGraph,
};
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    instrument,
    warn,
};

/// One node of the input file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Stable node identifier.
    pub id: NodeId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Display name for named places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One road of the input file: consecutive node pairs are connected in both directions.
///
/// Unknown fields are rejected, so one-way markup cannot silently turn into a two-way road.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WayRecord {
    /// Node ids along the road, in order.
    pub nodes: Vec<NodeId>,
    /// Street name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The whole input file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphFile {
    /// All nodes, navigable or not.
    pub nodes: Vec<NodeRecord>,
    /// All roads.
    #[serde(default)]
    pub ways: Vec<WayRecord>,
}

impl GraphFile {
    /// Build the road graph: a pair of opposite great-circle weighted edges per consecutive node
    /// pair of each way.
    ///
    /// Ways referring to unknown nodes keep their other segments; the dangling ones are dropped.
    pub fn into_graph(self) -> WeightedGraph {
        let mut graph = WeightedGraph::new();
        for record in self.nodes {
            let mut node = Node::new(record.id, Location::new(record.lat, record.lon));
            node.name = record.name;
            graph.add_node(node);
        }

        for way in self.ways {
            if let Some(&missing) = way.nodes.iter().find(|&&id| !graph.contains(id)) {
                warn!(missing, name = ?way.name, "way refers to an unknown node");
            }
            for pair in way.nodes.windows(2) {
                graph.add_edge_by_distance(pair[0], pair[1], way.name.clone());
                graph.add_edge_by_distance(pair[1], pair[0], way.name.clone());
            }
        }
        graph
    }
}

/// Load a JSON graph file from `path`.
#[instrument]
pub fn load_graph(path: &Path) -> Result<WeightedGraph> {
    let file = File::open(path).with_context(|| format!("could not open graph file {}", path.display()))?;
    let graph_file: GraphFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("could not parse graph file {}", path.display()))?;
    Ok(graph_file.into_graph())
}

#[cfg(test)]
mod tests {
    use hm_core::EdgeLabel;
    use rstest::*;

    use super::*;

    #[fixture]
    fn graph_file() -> GraphFile {
        serde_json::from_str(
            r#"{
                "nodes": [
                    { "id": 1, "lat": 47.650, "lon": -122.300 },
                    { "id": 2, "lat": 47.651, "lon": -122.300 },
                    { "id": 3, "lat": 47.652, "lon": -122.300, "name": "Cafe" },
                    { "id": 4, "lat": 47.653, "lon": -122.300 }
                ],
                "ways": [
                    { "nodes": [1, 2, 3], "name": "University Way NE" },
                    { "nodes": [3, 4] },
                    { "nodes": [4, 99] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[rstest]
    fn test_two_way_roads(graph_file: GraphFile) {
        let graph = graph_file.into_graph();

        let from_two: Vec<_> = graph.neighbors(2).unwrap().into_iter().map(|e| e.to).collect();
        assert_eq!(from_two.len(), 2);
        assert!(from_two.contains(&1) && from_two.contains(&3));
        assert_eq!(
            graph.neighbors(1).unwrap()[0].label,
            EdgeLabel::Road { name: Some("University Way NE".into()) }
        );
    }

    #[rstest]
    fn test_dangling_segment_is_dropped(graph_file: GraphFile) {
        let graph = graph_file.into_graph();

        let from_four: Vec<_> = graph.neighbors(4).unwrap().into_iter().map(|e| e.to).collect();
        assert_eq!(from_four, vec![3]);
        // 1-2, 2-3, 3-4 both ways
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.is_symmetric());
    }

    #[rstest]
    fn test_oneway_markup_is_rejected() {
        let res = serde_json::from_str::<GraphFile>(
            r#"{ "nodes": [], "ways": [{ "nodes": [1, 2], "oneway": true }] }"#,
        );
        assert!(format!("{}", res.unwrap_err()).contains("unknown field `oneway`"));
    }

    #[rstest]
    fn test_names_and_weights(graph_file: GraphFile) {
        let graph = graph_file.into_graph();

        assert_eq!(graph.node(3).unwrap().name.as_deref(), Some("Cafe"));
        let edge = &graph.neighbors(1).unwrap()[0];
        assert_eq!(edge.weight, graph.estimated_distance(1, 2).unwrap());
    }

    #[rstest]
    fn test_load_missing_file() {
        let err = load_graph(Path::new("/nonexistent/graph.json")).unwrap_err();
        assert!(format!("{err:#}").contains("could not open graph file"));
    }
}
