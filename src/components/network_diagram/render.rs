use thiserror::Error;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::connections::{Connection, Connections};
use super::geometry::node_dom_id;
use super::state::DiagramState;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

pub const CONNECTION_CLASS: &str = "connection";
pub const HOVER_CLASS: &str = "hover-highlighted";
pub const ACTIVE_CLASS: &str = "active";
pub const ADJACENT_CLASS: &str = "adjacent-highlighted";

#[derive(Debug, Error)]
pub enum SurfaceError {
	#[error("drawing surface is not attached to a document")]
	Detached,
	#[error("DOM call failed: {0}")]
	Dom(String),
}

impl From<JsValue> for SurfaceError {
	fn from(value: JsValue) -> Self {
		SurfaceError::Dom(format!("{value:?}"))
	}
}

/// The `<svg>` overlay holding one `<line>` per drawn connection.
pub struct SvgSurface {
	element: Element,
	document: Document,
	lines: Vec<Element>,
}

impl SvgSurface {
	pub fn new(element: Element) -> Result<Self, SurfaceError> {
		let document = element.owner_document().ok_or(SurfaceError::Detached)?;
		Ok(Self {
			element,
			document,
			lines: Vec::new(),
		})
	}

	pub fn element(&self) -> &Element {
		&self.element
	}

	/// Drop every existing line and append the current primitive set.
	pub fn draw(&mut self, connections: &Connections) -> Result<(), SurfaceError> {
		self.element.set_inner_html("");
		self.lines.clear();
		for connection in connections.iter() {
			let line = self.line(connection)?;
			self.element.append_child(&line)?;
			self.lines.push(line);
		}
		Ok(())
	}

	fn line(&self, connection: &Connection) -> Result<Element, SurfaceError> {
		let line = self.document.create_element_ns(Some(SVG_NS), "line")?;
		line.set_attribute("x1", &connection.from.x.to_string())?;
		line.set_attribute("y1", &connection.from.y.to_string())?;
		line.set_attribute("x2", &connection.to.x.to_string())?;
		line.set_attribute("y2", &connection.to.y.to_string())?;
		line.set_attribute("data-source", &connection.source)?;
		line.set_attribute("data-target", &connection.target)?;
		line.set_attribute("class", CONNECTION_CLASS)?;
		Ok(line)
	}

	/// Push the derived highlight onto lines and node boxes.
	pub fn paint_highlights(&self, state: &DiagramState) -> Result<(), SurfaceError> {
		for (line, connection) in self.lines.iter().zip(state.connections().iter()) {
			let classes = line.class_list();
			classes.toggle_with_force(HOVER_CLASS, connection.hover)?;
			classes.toggle_with_force(ACTIVE_CLASS, connection.active)?;
		}

		let highlight = state.nodes();
		for node in state.graph().nodes() {
			let Some(element) = self.document.get_element_by_id(&node_dom_id(&node.id)) else {
				continue;
			};
			let flags = highlight.classes(&node.id);
			let classes = element.class_list();
			classes.toggle_with_force(HOVER_CLASS, flags.hovered)?;
			classes.toggle_with_force(ACTIVE_CLASS, flags.active)?;
			classes.toggle_with_force(ADJACENT_CLASS, flags.adjacent)?;
		}
		Ok(())
	}
}
