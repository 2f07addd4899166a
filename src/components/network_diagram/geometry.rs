use std::fmt::Write;

use web_sys::{DomRect, Element};

/// Position in drawing-surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Axis-aligned box in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn from_dom(rect: &DomRect) -> Self {
		Self {
			left: rect.left(),
			top: rect.top(),
			width: rect.width(),
			height: rect.height(),
		}
	}

	pub fn origin(&self) -> Point {
		Point::new(self.left, self.top)
	}

	/// Detached or `display: none` elements measure as empty.
	pub fn is_measurable(&self) -> bool {
		[self.left, self.top, self.width, self.height]
			.iter()
			.all(|v| v.is_finite())
			&& self.width > 0.0
			&& self.height > 0.0
	}

	/// Centre of the box, translated into the space whose origin is `origin`.
	pub fn midpoint_in(&self, origin: Point) -> Option<Point> {
		if !self.is_measurable() || !origin.x.is_finite() || !origin.y.is_finite() {
			return None;
		}
		Some(Point::new(
			self.left + self.width / 2.0 - origin.x,
			self.top + self.height / 2.0 - origin.y,
		))
	}
}

/// Source of node midpoints for a layout pass. `None` means the edge is skipped.
pub trait GeometryResolver {
	fn midpoint(&self, node_id: &str) -> Option<Point>;
}

impl<F> GeometryResolver for F
where
	F: Fn(&str) -> Option<Point>,
{
	fn midpoint(&self, node_id: &str) -> Option<Point> {
		self(node_id)
	}
}

/// Element id for a node. Injective, and safe for `getElementById` and CSS selectors.
pub fn node_dom_id(node_id: &str) -> String {
	let mut out = String::with_capacity(node_id.len() + 5);
	out.push_str("node-");
	for c in node_id.chars() {
		if c.is_ascii_alphanumeric() || c == '-' {
			out.push(c);
		} else {
			let _ = write!(out, "_{:x}_", c as u32);
		}
	}
	out
}

/// Reads live element boxes relative to the SVG overlay. Nothing is cached.
pub struct DomGeometry<'a> {
	surface: &'a Element,
}

impl<'a> DomGeometry<'a> {
	pub fn new(surface: &'a Element) -> Self {
		Self { surface }
	}
}

impl GeometryResolver for DomGeometry<'_> {
	fn midpoint(&self, node_id: &str) -> Option<Point> {
		let document = self.surface.owner_document()?;
		let element = document.get_element_by_id(&node_dom_id(node_id))?;
		let origin = Rect::from_dom(&self.surface.get_bounding_client_rect()).origin();
		Rect::from_dom(&element.get_bounding_client_rect()).midpoint_in(origin)
	}
}
