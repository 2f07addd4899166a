use std::collections::BTreeSet;

use super::connections::Connections;
use super::types::GraphData;

/// One interaction callback, as delivered to [`DiagramState::dispatch`].
///
/// Resizes are not highlight input; they go to the layout trigger.
///
/// [`DiagramState::dispatch`]: super::state::DiagramState::dispatch
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagramEvent {
	PointerEnter(String),
	PointerLeave(String),
	Toggle(String),
	ClickOutside,
}

/// The two highlight inputs. Everything visual is derived from these.
/// Each transition reports whether the inputs changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightState {
	hover: Option<String>,
	active: BTreeSet<String>,
}

impl HighlightState {
	pub fn hover_id(&self) -> Option<&str> {
		self.hover.as_deref()
	}

	#[cfg(test)]
	pub fn active_ids(&self) -> &BTreeSet<String> {
		&self.active
	}

	#[cfg(test)]
	pub fn is_active(&self, node_id: &str) -> bool {
		self.active.contains(node_id)
	}

	pub fn set_hover(&mut self, node_id: &str) -> bool {
		if self.hover.as_deref() == Some(node_id) {
			return false;
		}
		self.hover = Some(node_id.to_owned());
		true
	}

	pub fn clear_hover(&mut self) -> bool {
		self.hover.take().is_some()
	}

	/// Add if absent, remove if present.
	pub fn toggle(&mut self, node_id: &str) -> bool {
		if !self.active.remove(node_id) {
			self.active.insert(node_id.to_owned());
		}
		true
	}

	pub fn clear_active(&mut self) -> bool {
		let changed = !self.active.is_empty();
		self.active.clear();
		changed
	}
}

/// Visual classes a node element should carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeClasses {
	pub hovered: bool,
	pub active: bool,
	pub adjacent: bool,
}

/// Node-level highlight derived from [`HighlightState`] and the drawn primitives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeHighlight {
	pub hovered: Option<String>,
	pub active: BTreeSet<String>,
	pub adjacent: BTreeSet<String>,
}

impl NodeHighlight {
	pub fn classes(&self, node_id: &str) -> NodeClasses {
		NodeClasses {
			hovered: self.hovered.as_deref() == Some(node_id),
			active: self.active.contains(node_id),
			adjacent: self.adjacent.contains(node_id),
		}
	}
}

/// Recompute every primitive flag and the node highlight from scratch.
///
/// Hover and active combine additively: a primitive touching the hovered node is
/// hover-highlighted, one touching any active node is active-highlighted, and
/// neither suppresses the other. Adjacency is read from the drawn primitives, so an
/// edge that failed to resolve never highlights its far end.
pub fn recompute(
	state: &HighlightState,
	graph: &GraphData,
	connections: &mut Connections,
) -> NodeHighlight {
	let hover = state.hover_id();
	for line in connections.iter_mut() {
		line.hover = hover.is_some_and(|id| line.touches(id));
		line.active = state.active.iter().any(|id| line.touches(id));
	}

	let adjacent = match hover {
		Some(hovered) => graph
			.nodes()
			.filter(|node| connections.connected(&node.id, hovered))
			.map(|node| node.id.clone())
			.collect(),
		None => BTreeSet::new(),
	};

	NodeHighlight {
		hovered: state.hover.clone(),
		active: state.active.clone(),
		adjacent,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn enter_and_leave_track_a_single_hover() {
		let mut state = HighlightState::default();
		assert!(state.set_hover("a"));
		assert!(!state.set_hover("a"));
		assert!(state.set_hover("b"));
		assert_eq!(state.hover_id(), Some("b"));
		assert!(state.clear_hover());
		assert_eq!(state.hover_id(), None);
		assert!(!state.clear_hover());
	}

	#[test]
	fn toggle_flips_membership() {
		let mut state = HighlightState::default();
		state.toggle("x");
		assert!(state.is_active("x"));
		state.toggle("y");
		state.toggle("x");
		assert!(!state.is_active("x"));
		assert!(state.is_active("y"));
	}

	#[test]
	fn clearing_active_empties_the_set() {
		let mut state = HighlightState::default();
		for id in ["a", "b", "c"] {
			state.toggle(id);
		}
		assert!(state.clear_active());
		assert!(state.active_ids().is_empty());
		assert!(!state.clear_active());
	}

	#[test]
	fn hover_does_not_touch_active_set() {
		let mut state = HighlightState::default();
		state.toggle("a");
		state.set_hover("a");
		state.clear_hover();
		assert!(state.is_active("a"));
	}

	#[test]
	fn node_classes_read_each_set() {
		let highlight = NodeHighlight {
			hovered: Some("a".into()),
			active: ["b".to_string()].into(),
			adjacent: ["b".to_string(), "c".to_string()].into(),
		};
		assert_eq!(
			highlight.classes("a"),
			NodeClasses {
				hovered: true,
				active: false,
				adjacent: false
			}
		);
		assert_eq!(
			highlight.classes("b"),
			NodeClasses {
				hovered: false,
				active: true,
				adjacent: true
			}
		);
		assert_eq!(highlight.classes("z"), NodeClasses::default());
	}
}
