//! Layered graph diagram with hover and toggle highlighting.

mod component;
mod connections;
mod geometry;
mod highlight;
mod layout;
mod render;
mod state;
mod types;

pub use component::NetworkDiagram;
pub use types::GraphData;
