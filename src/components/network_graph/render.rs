use log::trace;

use super::error::Result;
use super::projection::Projection;
use super::scale::{Rgba, StyleOptions, edge_color, edge_width, node_color, node_radius};
use super::state::ViewState;
use super::surface::{Surface, SurfacePass};
use super::types::Graph;

/// Canvas background.
pub const BACKGROUND: Rgba = Rgba::rgb(0x1a, 0x1a, 0x2e);

const GLOW_SCALE: f64 = 2.2;
const GLOW_ALPHA: f32 = 0.45;

/// Draw `graph` onto `surface`: background, then channels, then nodes.
///
/// Channels with an unknown endpoint and nodes without a position are skipped.
pub fn draw<S: Surface + ?Sized>(
	surface: &mut S,
	graph: &Graph,
	view: &ViewState,
	style: &StyleOptions,
) {
	let mut pass = SurfacePass::acquire(surface);
	pass.clear(BACKGROUND);

	let projection = Projection::new(graph, view, pass.size());
	let highlight = style
		.highlight_node
		.as_deref()
		.or(view.highlighted_node_id.as_deref());
	let index = graph.index_by_id();

	let mut edges = 0;
	for edge in &graph.edges {
		let endpoints = index
			.get(edge.source.as_str())
			.zip(index.get(edge.target.as_str()))
			.and_then(|(&s, &t)| graph.nodes[s].position.zip(graph.nodes[t].position));
		let Some((from, to)) = endpoints else {
			continue;
		};
		pass.stroke_line(
			projection.to_screen(from),
			projection.to_screen(to),
			edge_color(edge.status),
			edge_width(edge, style),
		);
		edges += 1;
	}

	let mut nodes = 0;
	for node in &graph.nodes {
		let Some(position) = node.position else {
			continue;
		};
		let center = projection.to_screen(position);
		let radius = node_radius(node, style);
		let color = node_color(node, style.color_by);
		if highlight == Some(node.id.as_str()) {
			pass.fill_glow(center, radius, radius * GLOW_SCALE, color.with_alpha(GLOW_ALPHA));
		}
		pass.fill_circle(center, radius, color);
		nodes += 1;
	}

	trace!(
		"draw: {}/{} channels, {}/{} nodes, zoom {:.2}",
		edges,
		graph.edges.len(),
		nodes,
		graph.nodes.len(),
		view.zoom
	);
}

/// Current surface contents as PNG. Does not touch the view.
pub fn export_image<S: Surface + ?Sized>(surface: &S) -> Result<Vec<u8>> {
	surface.export_png()
}
