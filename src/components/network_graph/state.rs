use serde::{Deserialize, Serialize};

use super::projection::hit_test;
use super::scale::StyleOptions;
use super::types::{Graph, GraphNode, Point, Size};

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom change per unit of wheel delta.
pub const WHEEL_ZOOM_RATE: f64 = 0.001;
/// Canvas height; the width follows the container.
pub const CANVAS_HEIGHT: f64 = 500.0;
/// A press that travels further than this is a pan, not a click.
pub const CLICK_SLOP: f64 = 3.0;

/// What the user is looking at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
	/// Scale factor, within `[MIN_ZOOM, MAX_ZOOM]`.
	pub zoom: f64,
	/// Screen-space translation, unbounded.
	pub pan_offset: Point,
	/// Node drawn with a glow.
	pub highlighted_node_id: Option<String>,
	/// Copy of the node shown in the detail panel.
	pub selected_node: Option<GraphNode>,
}

impl Default for ViewState {
	fn default() -> Self {
		Self {
			zoom: 1.0,
			pan_offset: Point::ZERO,
			highlighted_node_id: None,
			selected_node: None,
		}
	}
}

impl ViewState {
	/// Set the zoom, clamped to the allowed range.
	pub fn set_zoom(&mut self, zoom: f64) {
		if zoom.is_nan() {
			return;
		}
		self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
	}

	/// Apply a wheel delta; scrolling down zooms out.
	pub fn zoom_by_wheel(&mut self, delta_y: f64) {
		self.set_zoom(self.zoom - delta_y * WHEEL_ZOOM_RATE);
	}

	/// Highlight and select `node`, or clear both.
	pub fn select(&mut self, node: Option<&GraphNode>) {
		self.highlighted_node_id = node.map(|n| n.id.clone());
		self.selected_node = node.cloned();
	}

	/// Back to unit zoom, no pan and no selection.
	pub fn reset(&mut self) {
		*self = Self::default();
	}
}

/// Pointer input, in canvas-relative screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
	Down(Point),
	Move(Point),
	Up(Point),
	/// Press and release without a drag in between.
	Click(Point),
	/// Scroll wheel.
	Wheel {
		/// Vertical scroll amount; positive is down.
		delta_y: f64,
	},
	/// Pointer left the canvas.
	Leave,
}

/// Transient state of an in-progress pan.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	/// Pointer position minus pan offset at press time.
	pub start: Point,
	pub press: Point,
	/// Pointer travelled further than [`CLICK_SLOP`] since the press.
	pub moved: bool,
}

/// Interaction controller: owns the [`ViewState`] and turns pointer events into view changes.
#[derive(Clone, Debug)]
pub struct InteractionState {
	/// The view being manipulated.
	pub view: ViewState,
	/// Pan in progress.
	pub drag: DragState,
	/// Node under the pointer while idle.
	pub hover: Option<String>,
	/// Canvas size in pixels.
	pub size: Size,
	suppress_click: bool,
}

impl InteractionState {
	/// Fresh controller for a canvas of `size`.
	pub fn new(size: Size) -> Self {
		Self {
			view: ViewState::default(),
			drag: DragState::default(),
			hover: None,
			size,
			suppress_click: false,
		}
	}

	/// Whether a pan is in progress.
	pub fn is_dragging(&self) -> bool {
		self.drag.active
	}

	/// Feed one event through the state machine. Returns whether the view needs a redraw.
	pub fn handle(&mut self, graph: &Graph, style: &StyleOptions, event: PointerEvent) -> bool {
		match event {
			PointerEvent::Down(p) => {
				self.drag = DragState {
					active: true,
					start: p - self.view.pan_offset,
					press: p,
					moved: false,
				};
				self.suppress_click = false;
				false
			}
			PointerEvent::Move(p) if self.drag.active => {
				if p.distance(self.drag.press) > CLICK_SLOP {
					self.drag.moved = true;
				}
				self.view.pan_offset = p - self.drag.start;
				true
			}
			PointerEvent::Move(p) => {
				let hovered = hit_test(graph, &self.view, style, self.size, p).map(|n| n.id.clone());
				self.hover = hovered;
				false
			}
			PointerEvent::Up(_) => {
				self.suppress_click = self.drag.active && self.drag.moved;
				self.drag = DragState::default();
				false
			}
			PointerEvent::Click(p) => {
				if std::mem::take(&mut self.suppress_click) {
					return false;
				}
				let hit = hit_test(graph, &self.view, style, self.size, p);
				self.view.select(hit);
				true
			}
			PointerEvent::Wheel { delta_y } => {
				let before = self.view.zoom;
				self.view.zoom_by_wheel(delta_y);
				self.view.zoom != before
			}
			PointerEvent::Leave => {
				self.drag = DragState::default();
				self.hover = None;
				false
			}
		}
	}

	/// Restore the default view.
	pub fn reset(&mut self) {
		self.view.reset();
		self.drag = DragState::default();
		self.hover = None;
	}

	/// Track a container width change; the height stays fixed.
	pub fn resize(&mut self, width: f64) {
		self.size = Size::new(width.max(0.0), CANVAS_HEIGHT);
	}
}
