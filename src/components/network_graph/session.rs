use log::debug;

use super::error::Result;
use super::render;
use super::scale::StyleOptions;
use super::state::{InteractionState, PointerEvent};
use super::surface::Surface;
use super::types::{Graph, GraphNode};

/// One visual session: the laid-out graph, the view over it and the surface it is drawn on.
pub(crate) struct Session<S: Surface> {
	graph: Graph,
	style: StyleOptions,
	interaction: InteractionState,
	surface: S,
	dirty: bool,
}

impl<S: Surface> Session<S> {
	pub(crate) fn new(graph: Graph, style: StyleOptions, surface: S) -> Self {
		Self {
			graph,
			style,
			interaction: InteractionState::new(surface.size()),
			surface,
			dirty: true,
		}
	}

	pub(crate) fn redraw(&mut self) {
		render::draw(&mut self.surface, &self.graph, &self.interaction.view, &self.style);
		self.dirty = false;
	}

	pub(crate) fn redraw_if_dirty(&mut self) {
		if self.dirty {
			self.redraw();
		}
	}

	/// Follow a container width change. Redraws at once, without a new layout.
	pub(crate) fn resize(&mut self, width: f64) -> Result<()> {
		if self.interaction.size.width == width {
			return Ok(());
		}
		self.interaction.resize(width);
		let size = self.interaction.size;
		self.surface.resize(size.width as u32, size.height as u32)?;
		debug!("network graph: resized to {}x{}", size.width, size.height);
		self.redraw();
		Ok(())
	}

	/// Swap in a freshly laid-out graph, keeping zoom and pan.
	///
	/// Returns the new selection when it differs from the old one: dropped because its
	/// node is gone, or refreshed because the node's data changed.
	pub(crate) fn replace_graph(&mut self, graph: Graph) -> Option<Option<GraphNode>> {
		self.graph = graph;
		let before = self.interaction.view.selected_node.take();
		let selected = self
			.interaction
			.view
			.highlighted_node_id
			.as_deref()
			.and_then(|id| self.graph.node(id))
			.cloned();
		self.interaction.view.select(selected.as_ref());
		self.interaction.hover = None;
		self.dirty = true;
		(before != selected).then_some(selected)
	}

	pub(crate) fn set_style(&mut self, style: StyleOptions) {
		if self.style != style {
			self.style = style;
			self.dirty = true;
		}
	}

	/// Feed `event` to the controller. Returns the new selection when it changed.
	pub(crate) fn handle(&mut self, event: PointerEvent) -> Option<Option<GraphNode>> {
		let before = self.interaction.view.highlighted_node_id.clone();
		if self.interaction.handle(&self.graph, &self.style, event) {
			self.dirty = true;
		}
		let view = &self.interaction.view;
		(view.highlighted_node_id != before).then(|| view.selected_node.clone())
	}

	/// Restore the default view. Returns `Some(None)` when a selection was cleared.
	pub(crate) fn reset(&mut self) -> Option<Option<GraphNode>> {
		let had_selection = self.interaction.view.selected_node.is_some();
		self.interaction.reset();
		self.dirty = true;
		had_selection.then_some(None)
	}

	pub(crate) fn export(&self) -> Result<Vec<u8>> {
		render::export_image(&self.surface)
	}

	pub(crate) fn cursor(&self) -> &'static str {
		if self.interaction.is_dragging() {
			"grabbing"
		} else if self.interaction.hover.is_some() {
			"pointer"
		} else {
			"grab"
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::projection::Projection;
	use crate::components::network_graph::testing::{Op, Recording};
	use crate::components::network_graph::types::{NetworkMetrics, Point, Size};

	fn node(id: &str, x: f64, y: f64, capacity: f64) -> GraphNode {
		GraphNode {
			id: id.into(),
			public_key_prefix: format!("03{id}"),
			capacity,
			channel_count: 3,
			position: Some(Point::new(x, y)),
			group_id: 0,
		}
	}

	fn graph(nodes: Vec<GraphNode>) -> Graph {
		Graph {
			nodes,
			edges: vec![],
			metrics: NetworkMetrics::default(),
		}
	}

	fn session() -> Session<Recording> {
		let g = graph(vec![node("a", 0.0, 0.0, 1e6), node("b", 300.0, 200.0, 2e6)]);
		let mut s = Session::new(g, StyleOptions::default(), Recording::new());
		s.redraw();
		s
	}

	fn click_node(s: &mut Session<Recording>, id: &str) -> Option<Option<GraphNode>> {
		let at = s.graph.node(id).and_then(|n| n.position).unwrap();
		let screen = Projection::new(&s.graph, &s.interaction.view, s.interaction.size).to_screen(at);
		s.handle(PointerEvent::Click(screen))
	}

	#[test]
	fn resize_changes_size_and_draws_once() {
		let mut s = session();
		let positions: Vec<_> = s.graph.nodes.iter().map(|n| n.position).collect();

		s.resize(1200.0).unwrap();

		assert_eq!(s.surface.size, Size::new(1200.0, 500.0));
		assert_eq!(s.interaction.size, Size::new(1200.0, 500.0));
		assert_eq!(s.surface.ops.first(), Some(&Op::Begin));
		assert_eq!(s.surface.ops.get(1), Some(&Op::Clear));
		assert_eq!(s.surface.ops.last(), Some(&Op::End));
		assert_eq!(s.surface.passes(), 1);
		assert!(!s.dirty);
		let after: Vec<_> = s.graph.nodes.iter().map(|n| n.position).collect();
		assert_eq!(after, positions);
	}

	#[test]
	fn resize_to_same_width_does_nothing() {
		let mut s = session();
		let drawn = s.surface.passes();
		s.resize(800.0).unwrap();
		assert_eq!(s.surface.passes(), drawn);
	}

	#[test]
	fn replace_graph_keeps_view_and_drops_missing_selection() {
		let mut s = session();
		assert_eq!(click_node(&mut s, "b").flatten().map(|n| n.id), Some("b".into()));
		s.handle(PointerEvent::Wheel { delta_y: -500.0 });
		s.interaction.view.pan_offset = Point::new(40.0, -25.0);
		let zoom = s.interaction.view.zoom;
		s.redraw();

		let changed = s.replace_graph(graph(vec![node("a", 10.0, 10.0, 1e6), node("c", 50.0, 80.0, 1e6)]));

		assert_eq!(changed, Some(None));
		assert_eq!(s.interaction.view.zoom, zoom);
		assert_eq!(s.interaction.view.pan_offset, Point::new(40.0, -25.0));
		assert_eq!(s.interaction.view.highlighted_node_id, None);
		assert!(s.dirty);
	}

	#[test]
	fn replace_graph_refreshes_surviving_selection() {
		let mut s = session();
		click_node(&mut s, "b");

		let changed = s.replace_graph(graph(vec![node("b", 1.0, 1.0, 9e6), node("a", 0.0, 0.0, 1e6)]));
		let refreshed = changed.flatten().unwrap();
		assert_eq!(refreshed.capacity, 9e6);
		assert_eq!(s.interaction.view.highlighted_node_id.as_deref(), Some("b"));

		let same = s.graph.clone();
		assert_eq!(s.replace_graph(same), None);
	}

	#[test]
	fn reset_reports_cleared_selection() {
		let mut s = session();
		assert_eq!(s.reset(), None);
		click_node(&mut s, "a");
		assert_eq!(s.reset(), Some(None));
		assert_eq!(s.interaction.view.zoom, 1.0);
	}

	#[test]
	fn redraws_only_when_dirty() {
		let mut s = session();
		s.redraw_if_dirty();
		assert_eq!(s.surface.passes(), 1);

		s.set_style(StyleOptions::default());
		s.redraw_if_dirty();
		assert_eq!(s.surface.passes(), 1);

		s.set_style(StyleOptions {
			node_size: 9.0,
			..Default::default()
		});
		s.redraw_if_dirty();
		assert_eq!(s.surface.passes(), 2);
	}

	#[test]
	fn cursor_follows_drag_and_hover() {
		let mut s = session();
		assert_eq!(s.cursor(), "grab");
		s.handle(PointerEvent::Down(Point::new(400.0, 10.0)));
		assert_eq!(s.cursor(), "grabbing");
		s.handle(PointerEvent::Up(Point::new(400.0, 10.0)));
		let at = Projection::new(&s.graph, &s.interaction.view, s.interaction.size).to_screen(Point::ZERO);
		s.handle(PointerEvent::Move(at));
		assert_eq!(s.cursor(), "pointer");
	}
}
