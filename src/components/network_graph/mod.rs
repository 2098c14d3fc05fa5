//! Force-directed Lightning Network topology view.

mod canvas;
mod component;
mod error;
pub mod layout;
pub mod projection;
pub mod render;
pub mod scale;
mod session;
pub mod state;
pub mod surface;
#[cfg(test)]
mod testing;
mod types;

pub use canvas::CanvasSurface;
pub use component::NetworkGraphCanvas;
pub use error::{GraphError, Result};
pub use layout::{LayoutOptions, layout, layout_with_rng};
pub use projection::hit_test;
pub use render::{draw, export_image};
pub use scale::{ColorBy, StyleOptions};
pub use state::{InteractionState, PointerEvent, ViewState};
pub use surface::{PixmapSurface, Surface};
pub use types::{EdgeStatus, Graph, GraphEdge, GraphNode, NetworkMetrics, Point, Size};
