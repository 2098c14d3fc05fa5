//! Graph-space to screen-space mapping, shared by drawing and hit-testing.

use super::scale::{StyleOptions, node_radius};
use super::state::ViewState;
use super::types::{Graph, GraphNode, Point, Size};

/// Extent used on an axis where the graph has no spread.
pub const DEFAULT_EXTENT: f64 = 1000.0;
/// Fraction of the canvas left empty on each side.
pub const MARGIN: f64 = 0.05;
const SPAN: f64 = 1.0 - 2.0 * MARGIN;

/// Axis-aligned bounding box of the positioned nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Top-left corner.
	pub min: Point,
	/// Width and height, never zero.
	pub extent: Size,
}

impl Bounds {
	/// Bounds of every node with a position; falls back to a 1000×1000 box per degenerate axis.
	pub fn of(graph: &Graph) -> Self {
		let mut positions = graph.nodes.iter().filter_map(|n| n.position);
		let Some(first) = positions.next() else {
			return Self {
				min: Point::ZERO,
				extent: Size::new(DEFAULT_EXTENT, DEFAULT_EXTENT),
			};
		};
		let (min, max) = positions.fold((first, first), |(lo, hi), p| {
			(
				Point::new(lo.x.min(p.x), lo.y.min(p.y)),
				Point::new(hi.x.max(p.x), hi.y.max(p.y)),
			)
		});
		let axis = |span: f64| {
			if span > 0.0 && span.is_finite() {
				span
			} else {
				DEFAULT_EXTENT
			}
		};
		Self {
			min,
			extent: Size::new(axis(max.x - min.x), axis(max.y - min.y)),
		}
	}
}

/// Affine map from graph-space to screen-space for one canvas and view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
	bounds: Bounds,
	size: Size,
	zoom: f64,
	pan: Point,
}

impl Projection {
	/// Build the mapping for `graph` drawn at `size` under `view`.
	pub fn new(graph: &Graph, view: &ViewState, size: Size) -> Self {
		Self {
			bounds: Bounds::of(graph),
			size,
			zoom: view.zoom,
			pan: view.pan_offset,
		}
	}

	/// Screen position of a graph-space point.
	pub fn to_screen(&self, p: Point) -> Point {
		let fx = (p.x - self.bounds.min.x) / self.bounds.extent.width * SPAN + MARGIN;
		let fy = (p.y - self.bounds.min.y) / self.bounds.extent.height * SPAN + MARGIN;
		Point::new(
			fx * self.size.width * self.zoom + self.pan.x,
			fy * self.size.height * self.zoom + self.pan.y,
		)
	}
}

/// The node under `point`, if any.
///
/// A node is hit when `point` lies within its drawn circle. When circles overlap the
/// node whose centre is nearest wins; an exact tie goes to the node drawn last.
pub fn hit_test<'g>(
	graph: &'g Graph,
	view: &ViewState,
	style: &StyleOptions,
	size: Size,
	point: Point,
) -> Option<&'g GraphNode> {
	let projection = Projection::new(graph, view, size);
	let mut best: Option<(&GraphNode, f64)> = None;
	for node in &graph.nodes {
		let Some(position) = node.position else {
			continue;
		};
		let distance = projection.to_screen(position).distance(point);
		if distance > node_radius(node, style) {
			continue;
		}
		if best.is_none_or(|(_, d)| distance <= d) {
			best = Some((node, distance));
		}
	}
	best.map(|(node, _)| node)
}
