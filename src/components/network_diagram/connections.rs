use log::trace;

use super::geometry::{GeometryResolver, Point};
use super::types::GraphData;

/// One drawn edge. The id pair is kept for lookup only.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	pub source: String,
	pub target: String,
	pub from: Point,
	pub to: Point,
	pub hover: bool,
	pub active: bool,
}

impl Connection {
	pub fn touches(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}

	/// Direction-agnostic.
	pub fn joins(&self, a: &str, b: &str) -> bool {
		(self.source == a && self.target == b) || (self.source == b && self.target == a)
	}

	#[cfg(test)]
	pub fn is_highlighted(&self) -> bool {
		self.hover || self.active
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
	pub drawn: usize,
	pub skipped: usize,
}

/// The current primitive set. Only ever replaced wholesale by [`Connections::rebuild`].
#[derive(Clone, Debug, Default)]
pub struct Connections {
	lines: Vec<Connection>,
}

impl Connections {
	/// Discard every primitive and draw one per edge whose endpoints both resolve.
	pub fn rebuild(&mut self, graph: &GraphData, geometry: &impl GeometryResolver) -> RenderStats {
		self.lines.clear();
		let mut stats = RenderStats::default();
		let resolve = |id: &str| {
			if graph.contains(id) {
				geometry.midpoint(id)
			} else {
				None
			}
		};

		for (source, target) in graph.edges() {
			let (Some(from), Some(to)) = (resolve(source), resolve(target)) else {
				trace!("skipping unresolved edge {source} -> {target}");
				stats.skipped += 1;
				continue;
			};
			self.lines.push(Connection {
				source: source.to_owned(),
				target: target.to_owned(),
				from,
				to,
				hover: false,
				active: false,
			});
			stats.drawn += 1;
		}
		stats
	}

	/// True iff some drawn primitive joins the two nodes, in either direction.
	pub fn connected(&self, a: &str, b: &str) -> bool {
		self.lines.iter().any(|line| line.joins(a, b))
	}

	pub fn iter(&self) -> impl Iterator<Item = &Connection> {
		self.lines.iter()
	}

	pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Connection> {
		self.lines.iter_mut()
	}

	#[cfg(test)]
	pub fn find(&self, source: &str, target: &str) -> Option<&Connection> {
		self.lines
			.iter()
			.find(|line| line.source == source && line.target == target)
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;
	use crate::components::network_diagram::types::tests::{
		graph, grid, layer, node, scenario_graph,
	};

	fn pairs(connections: &Connections) -> Vec<(String, String)> {
		connections
			.iter()
			.map(|c| (c.source.clone(), c.target.clone()))
			.collect()
	}

	#[test]
	fn draws_one_primitive_per_edge_in_order() {
		let mut connections = Connections::default();
		let stats = connections.rebuild(&scenario_graph(), &grid);
		assert_eq!(stats, RenderStats { drawn: 3, skipped: 0 });
		assert_eq!(
			pairs(&connections),
			vec![
				("a".into(), "b".into()),
				("a".into(), "c".into()),
				("b".into(), "d".into())
			]
		);
		let ab = connections.find("a", "b").unwrap();
		assert_eq!(ab.from, Point::new(0.0, 50.0));
		assert_eq!(ab.to, Point::new(100.0, 50.0));
	}

	#[test]
	fn dangling_targets_are_skipped() {
		let graph = graph(vec![layer("l", vec![node("a", &["ghost", "b"]), node("b", &[])])]);
		// Resolver would happily place the ghost; the model still refuses it.
		let everywhere = |_: &str| Some(Point::new(1.0, 1.0));
		let mut connections = Connections::default();
		let stats = connections.rebuild(&graph, &everywhere);
		assert_eq!(stats, RenderStats { drawn: 1, skipped: 1 });
		assert!(connections.find("a", "ghost").is_none());
	}

	#[test]
	fn missing_elements_are_skipped() {
		let without_c = |id: &str| if id == "c" { None } else { grid(id) };
		let mut connections = Connections::default();
		let stats = connections.rebuild(&scenario_graph(), &without_c);
		assert_eq!(stats, RenderStats { drawn: 2, skipped: 1 });
		assert!(!connections.connected("a", "c"));
	}

	#[test]
	fn rebuild_is_idempotent() {
		let graph = scenario_graph();
		let mut connections = Connections::default();
		connections.rebuild(&graph, &grid);
		let once = pairs(&connections);
		connections.rebuild(&graph, &grid);
		assert_eq!(pairs(&connections), once);
		assert_eq!(connections.iter().count(), 3);
	}

	#[test]
	fn geometry_is_queried_on_every_pass() {
		let calls = Cell::new(0);
		let counting = |id: &str| {
			calls.set(calls.get() + 1);
			grid(id)
		};
		let graph = scenario_graph();
		let mut connections = Connections::default();
		connections.rebuild(&graph, &counting);
		let first = calls.get();
		connections.rebuild(&graph, &counting);
		assert_eq!(calls.get(), first * 2);
	}

	#[test]
	fn connected_is_symmetric_and_limited_to_drawn_edges() {
		let mut connections = Connections::default();
		connections.rebuild(&scenario_graph(), &grid);
		assert!(connections.connected("a", "b"));
		assert!(connections.connected("b", "a"));
		assert!(!connections.connected("a", "d"));
		assert!(!connections.connected("c", "d"));
	}

	#[test]
	fn self_loops_and_back_edges_are_drawn() {
		let graph = graph(vec![
			layer("l1", vec![node("a", &["a", "b"])]),
			layer("l2", vec![node("b", &["a"])]),
		]);
		let mut connections = Connections::default();
		let stats = connections.rebuild(&graph, &grid);
		assert_eq!(stats.drawn, 3);
		assert!(connections.connected("a", "a"));
	}
}
