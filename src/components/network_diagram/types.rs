use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	/// Outgoing edges, in authoring order. Ids may point anywhere, including nowhere.
	#[serde(default)]
	pub targets: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GraphLayer {
	pub id: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
}

#[derive(Deserialize)]
struct GraphFile {
	layers: Vec<GraphLayer>,
}

/// Layered graph as authored. Columns render left-to-right in `layers` order.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	layers: Vec<GraphLayer>,
	// id -> (layer, position within layer)
	id_to_idx: HashMap<String, (usize, usize)>,
}

#[derive(Debug, Error)]
pub enum GraphDataError {
	#[error("invalid graph data: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
}

impl GraphData {
	/// Index the layers. Dangling target ids are accepted; duplicate node ids are not.
	pub fn new(layers: Vec<GraphLayer>) -> Result<Self, GraphDataError> {
		let mut id_to_idx = HashMap::new();
		for (l, layer) in layers.iter().enumerate() {
			for (n, node) in layer.nodes.iter().enumerate() {
				if id_to_idx.insert(node.id.clone(), (l, n)).is_some() {
					return Err(GraphDataError::DuplicateNode(node.id.clone()));
				}
			}
		}
		Ok(Self { layers, id_to_idx })
	}

	pub fn from_json(json: &str) -> Result<Self, GraphDataError> {
		let file: GraphFile = serde_json::from_str(json)?;
		Self::new(file.layers)
	}

	pub fn layers(&self) -> &[GraphLayer] {
		&self.layers
	}

	pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
		self.layers.iter().flat_map(|layer| layer.nodes.iter())
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		let &(l, n) = self.id_to_idx.get(id)?;
		self.layers.get(l)?.nodes.get(n)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.id_to_idx.contains_key(id)
	}

	/// Target ids of `id`; empty for unknown ids and for sinks alike.
	pub fn targets(&self, id: &str) -> &[String] {
		self.node(id).map(|node| node.targets.as_slice()).unwrap_or(&[])
	}

	/// Every declared edge in (layer, node, target) order, duplicates included.
	pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
		self.nodes().flat_map(move |node| {
			self.targets(&node.id)
				.iter()
				.map(move |target| (node.id.as_str(), target.as_str()))
		})
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::components::network_diagram::geometry::Point;

	pub(crate) fn node(id: &str, targets: &[&str]) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_uppercase(),
			targets: targets.iter().map(|t| t.to_string()).collect(),
		}
	}

	pub(crate) fn layer(id: &str, nodes: Vec<GraphNode>) -> GraphLayer {
		GraphLayer {
			id: id.into(),
			label: None,
			nodes,
		}
	}

	pub(crate) fn graph(layers: Vec<GraphLayer>) -> GraphData {
		GraphData::new(layers).unwrap()
	}

	/// A→[B,C], B→[D], C→[], D→[]
	pub(crate) fn scenario_graph() -> GraphData {
		graph(vec![
			layer("in", vec![node("a", &["b", "c"])]),
			layer("mid", vec![node("b", &["d"]), node("c", &[])]),
			layer("out", vec![node("d", &[])]),
		])
	}

	/// Places single-letter ids on a row, 100px apart: a=0, b=100, ...
	pub(crate) fn grid(id: &str) -> Option<Point> {
		let x = (id.as_bytes()[0] - b'a') as f64 * 100.0;
		Some(Point::new(x, 50.0))
	}

	#[test]
	fn targets_of_unknown_id_is_empty() {
		let graph = scenario_graph();
		assert!(graph.targets("nope").is_empty());
		assert!(graph.targets("c").is_empty());
		assert_eq!(graph.targets("a"), ["b".to_string(), "c".to_string()]);
	}

	#[test]
	fn lookup_finds_nodes_in_any_layer() {
		let graph = scenario_graph();
		assert_eq!(graph.node("d").map(|n| n.label.as_str()), Some("D"));
		assert_eq!(graph.node("c").map(|n| n.label.as_str()), Some("C"));
		assert!(graph.contains("b"));
		assert!(!graph.contains("B"));
		for node in graph.nodes() {
			assert_eq!(graph.node(&node.id), Some(node));
		}
	}

	#[test]
	fn edges_follow_authoring_order() {
		let graph = scenario_graph();
		let edges: Vec<_> = graph.edges().collect();
		assert_eq!(edges, vec![("a", "b"), ("a", "c"), ("b", "d")]);
	}

	#[test]
	fn edges_are_not_deduplicated() {
		let graph = graph(vec![layer("l", vec![node("a", &["b", "b"]), node("b", &[])])]);
		assert_eq!(graph.edges().count(), 2);
	}

	#[test]
	fn parses_json_with_defaults() {
		let graph = GraphData::from_json(
			r#"{"layers":[
				{"id":"in","label":"Input","nodes":[{"id":"x","label":"X","targets":["y","ghost"]}]},
				{"id":"out","nodes":[{"id":"y","label":"Y"}]}
			]}"#,
		)
		.unwrap();
		assert_eq!(graph.layers().len(), 2);
		assert_eq!(graph.layers()[0].label.as_deref(), Some("Input"));
		assert_eq!(graph.layers()[1].label, None);
		assert!(graph.targets("y").is_empty());
		assert!(!graph.contains("ghost"));
	}

	#[test]
	fn rejects_duplicate_ids_across_layers() {
		let err = GraphData::from_json(
			r#"{"layers":[
				{"id":"l1","nodes":[{"id":"x","label":"X"}]},
				{"id":"l2","nodes":[{"id":"x","label":"X again"}]}
			]}"#,
		)
		.unwrap_err();
		assert!(matches!(err, GraphDataError::DuplicateNode(id) if id == "x"));
	}

	#[test]
	fn rejects_duplicate_ids_within_a_layer() {
		let err = GraphData::new(vec![layer("l", vec![node("a", &[]), node("a", &[])])]).unwrap_err();
		assert!(matches!(err, GraphDataError::DuplicateNode(id) if id == "a"));
	}

	#[test]
	fn rejects_malformed_json() {
		assert!(matches!(
			GraphData::from_json("{\"layers\": 3}"),
			Err(GraphDataError::Parse(_))
		));
	}
}
