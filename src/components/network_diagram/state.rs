use log::{debug, trace};

use super::connections::{Connections, RenderStats};
use super::geometry::GeometryResolver;
use super::highlight::{self, DiagramEvent, HighlightState, NodeHighlight};
use super::types::GraphData;

/// Everything one diagram session owns: the fixed graph, the drawn primitives, and
/// the highlight inputs. Highlight state only changes through the four `on_*` entry
/// points, which [`DiagramState::dispatch`] routes events to.
pub struct DiagramState {
	graph: GraphData,
	connections: Connections,
	highlight: HighlightState,
	nodes: NodeHighlight,
}

impl DiagramState {
	pub fn new(graph: GraphData) -> Self {
		Self {
			graph,
			connections: Connections::default(),
			highlight: HighlightState::default(),
			nodes: NodeHighlight::default(),
		}
	}

	pub fn graph(&self) -> &GraphData {
		&self.graph
	}

	pub fn connections(&self) -> &Connections {
		&self.connections
	}

	#[cfg(test)]
	pub fn highlight(&self) -> &HighlightState {
		&self.highlight
	}

	pub fn nodes(&self) -> &NodeHighlight {
		&self.nodes
	}

	/// Redraw every primitive from fresh geometry, then restore the current highlight.
	pub fn relayout(&mut self, geometry: &impl GeometryResolver) -> RenderStats {
		let stats = self.connections.rebuild(&self.graph, geometry);
		self.refresh();
		debug!(
			"layout pass: {} connections drawn, {} skipped",
			stats.drawn, stats.skipped
		);
		stats
	}

	/// Route one interaction event to its entry point. Returns whether the highlight
	/// inputs changed; every flag is recomputed either way.
	pub fn dispatch(&mut self, event: DiagramEvent) -> bool {
		trace!("diagram event: {event:?}");
		match event {
			DiagramEvent::PointerEnter(id) => self.on_hover(&id),
			DiagramEvent::PointerLeave(_) => self.on_hover_end(),
			DiagramEvent::Toggle(id) => self.on_toggle(&id),
			DiagramEvent::ClickOutside => self.on_click_outside(),
		}
	}

	pub fn on_hover(&mut self, node_id: &str) -> bool {
		let changed = self.highlight.set_hover(node_id);
		self.refresh();
		changed
	}

	/// Hover is an overlay: dropping it leaves toggled highlighting in place.
	pub fn on_hover_end(&mut self) -> bool {
		let changed = self.highlight.clear_hover();
		self.refresh();
		changed
	}

	pub fn on_toggle(&mut self, node_id: &str) -> bool {
		let changed = self.highlight.toggle(node_id);
		self.refresh();
		changed
	}

	pub fn on_click_outside(&mut self) -> bool {
		let changed = self.highlight.clear_active();
		self.refresh();
		changed
	}

	fn refresh(&mut self) {
		self.nodes = highlight::recompute(&self.highlight, &self.graph, &mut self.connections);
	}
}
