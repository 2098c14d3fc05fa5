use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	Blob, BlobPropertyBag, HtmlAnchorElement, HtmlCanvasElement, MouseEvent, Url, WheelEvent,
	Window,
};

use super::canvas::CanvasSurface;
use super::layout::{LayoutOptions, layout};
use super::scale::StyleOptions;
use super::session::Session;
use super::state::{CANVAS_HEIGHT, PointerEvent};
use super::surface::Surface;
use super::types::{Graph, GraphNode, Point};

const FALLBACK_WIDTH: f64 = 800.0;
const EXPORT_FILENAME: &str = "lightning-network.png";
const REVOKE_DELAY_MS: i32 = 1000;

type SharedSession = Rc<RefCell<Option<Session<CanvasSurface>>>>;

fn container_width(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(FALLBACK_WIDTH)
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn dispatch(session: &SharedSession, event: PointerEvent) -> Option<Option<GraphNode>> {
	session.borrow_mut().as_mut()?.handle(event)
}

fn notify(on_select: &Option<Callback<Option<GraphNode>>>, selected: Option<Option<GraphNode>>) {
	if let (Some(cb), Some(selected)) = (on_select, selected) {
		cb.run(selected);
	}
}

fn update_cursor(session: &SharedSession, canvas_ref: NodeRef<leptos::html::Canvas>) {
	let (Some(cursor), Some(canvas)) = (session.borrow().as_ref().map(Session::cursor), canvas_ref.get())
	else {
		return;
	};
	let canvas: HtmlCanvasElement = canvas.into();
	set_cursor(&canvas, cursor);
}

fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
	let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", cursor);
}

fn download_png(bytes: &[u8], filename: &str) -> Result<(), JsValue> {
	let array = js_sys::Uint8Array::from(bytes);
	let parts = js_sys::Array::of1(&array);
	let options = BlobPropertyBag::new();
	options.set_type("image/png");
	let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(filename);
	anchor.click();
	// The download must start before the object URL goes away.
	let revoke = Closure::once_into_js(move || {
		let _ = Url::revoke_object_url(&url);
	});
	web_sys::window()
		.ok_or_else(|| JsValue::from_str("no window"))?
		.set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), REVOKE_DELAY_MS)?;
	Ok(())
}

/// Lightning Network topology view.
///
/// Lays out `data` on every refresh, then draws it on a canvas that follows the
/// container's width. Drag pans, the wheel zooms and a click selects a node.
#[component]
pub fn NetworkGraphCanvas(
	/// Topology to show; every change triggers a fresh layout.
	#[prop(into)]
	data: Signal<Graph>,
	/// Node size, channel width and colour mode.
	#[prop(into, default = Signal::stored(StyleOptions::default()))]
	style: Signal<StyleOptions>,
	/// Force simulation parameters.
	#[prop(default = LayoutOptions::default())]
	layout_options: LayoutOptions,
	/// Called with the selected node whenever the selection changes.
	#[prop(optional, into)]
	on_select: Option<Callback<Option<GraphNode>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session: SharedSession = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let on_select = Rc::new(on_select);
	let (session_init, animate_init, resize_cb_init, on_select_init) =
		(session.clone(), animate.clone(), resize_cb.clone(), on_select.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let mut graph = data.get();
		layout(&mut graph, &layout_options);
		info!(
			"network graph: laid out {} nodes / {} channels",
			graph.nodes.len(),
			graph.edges.len()
		);

		if session_init.borrow().is_some() {
			let selected = session_init.borrow_mut().as_mut().and_then(|s| s.replace_graph(graph));
			notify(&on_select_init, selected);
			return;
		}

		let Some(window): Option<Window> = web_sys::window() else {
			return;
		};
		let mut surface = match CanvasSurface::new(canvas.clone()) {
			Ok(surface) => surface,
			Err(e) => {
				error!("network graph: {e}");
				return;
			}
		};
		let width = container_width(&canvas);
		if let Err(e) = surface.resize(width as u32, CANVAS_HEIGHT as u32) {
			error!("network graph: {e}");
			return;
		}
		let mut s = Session::new(graph, style.get_untracked(), surface);
		s.redraw();
		*session_init.borrow_mut() = Some(s);

		let (session_resize, canvas_resize) = (session_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let width = container_width(&canvas_resize);
			if let Some(ref mut s) = *session_resize.borrow_mut() {
				if let Err(e) = s.resize(width) {
					error!("network graph: {e}");
				}
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		// Redraws are coalesced to at most one per animation frame.
		let (session_anim, animate_inner) = (session_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *session_anim.borrow_mut() {
				s.redraw_if_dirty();
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let session_style = session.clone();
	Effect::new(move |_| {
		let style = style.get();
		if let Some(ref mut s) = *session_style.borrow_mut() {
			s.set_style(style);
		}
	});

	let session_md = session.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(p) = pointer(canvas_ref, &ev) {
			dispatch(&session_md, PointerEvent::Down(p));
			update_cursor(&session_md, canvas_ref);
		}
	};

	let session_mm = session.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(p) = pointer(canvas_ref, &ev) {
			dispatch(&session_mm, PointerEvent::Move(p));
			update_cursor(&session_mm, canvas_ref);
		}
	};

	let session_mu = session.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some(p) = pointer(canvas_ref, &ev) {
			dispatch(&session_mu, PointerEvent::Up(p));
			update_cursor(&session_mu, canvas_ref);
		}
	};

	let (session_cl, on_select_cl) = (session.clone(), on_select.clone());
	let on_click = move |ev: MouseEvent| {
		let Some(p) = pointer(canvas_ref, &ev) else {
			return;
		};
		let selected = dispatch(&session_cl, PointerEvent::Click(p));
		notify(&on_select_cl, selected);
	};

	let session_ml = session.clone();
	let on_mouseleave = move |_: MouseEvent| {
		dispatch(&session_ml, PointerEvent::Leave);
		update_cursor(&session_ml, canvas_ref);
	};

	let session_wh = session.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		dispatch(&session_wh, PointerEvent::Wheel { delta_y: ev.delta_y() });
	};

	let (session_rs, on_select_rs) = (session.clone(), on_select.clone());
	let on_reset = move |_: MouseEvent| {
		let cleared = session_rs.borrow_mut().as_mut().and_then(Session::reset);
		notify(&on_select_rs, cleared);
	};

	let session_ex = session.clone();
	let on_export = move |_: MouseEvent| {
		let png = match *session_ex.borrow() {
			Some(ref s) => s.export(),
			None => return,
		};
		match png {
			Ok(bytes) => {
				info!("network graph: exporting {} byte PNG", bytes.len());
				if let Err(e) = download_png(&bytes, EXPORT_FILENAME) {
					error!("network graph: download failed: {e:?}");
				}
			}
			Err(e) => error!("network graph: export failed: {e}"),
		}
	};

	view! {
		<div class="network-graph" style="position: relative; width: 100%;">
			<canvas
				node_ref=canvas_ref
				class="network-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:click=on_click
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-controls">
				<button on:click=on_reset>"Reset view"</button>
				<button on:click=on_export>"Export PNG"</button>
			</div>
		</div>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use super::*;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn canvas() -> HtmlCanvasElement {
		let document = web_sys::window().unwrap().document().unwrap();
		document.create_element("canvas").unwrap().dyn_into().unwrap()
	}

	#[wasm_bindgen_test]
	fn cursor_lands_in_inline_style() {
		let canvas = canvas();
		set_cursor(&canvas, "grabbing");
		let style = web_sys::HtmlElement::style(&canvas);
		assert_eq!(style.get_property_value("cursor").unwrap(), "grabbing");
		set_cursor(&canvas, "pointer");
		assert_eq!(style.get_property_value("cursor").unwrap(), "pointer");
	}

	#[wasm_bindgen_test]
	fn download_schedules_url_revocation() {
		download_png(b"\x89PNG\r\n\x1a\n", "graph.png").unwrap();
	}
}
