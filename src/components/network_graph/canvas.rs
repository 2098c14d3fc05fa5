use std::f64::consts::PI;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::error::{GraphError, Result};
use super::scale::Rgba;
use super::surface::Surface;
use super::types::{Point, Size};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// An HTML `<canvas>` and its 2D context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// Wrap `canvas`, acquiring its 2D context.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
		let ctx = canvas
			.get_context("2d")
			.map_err(|e| GraphError::CanvasContext(js_error(&e)))?
			.ok_or_else(|| GraphError::CanvasContext("no 2d context".into()))?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|e| GraphError::CanvasContext(js_error(&e)))?;
		Ok(Self { canvas, ctx })
	}

	/// The wrapped element.
	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.canvas
	}

	/// `toDataURL("image/png")`.
	pub fn to_data_url(&self) -> Result<String> {
		self.canvas
			.to_data_url_with_type("image/png")
			.map_err(|e| GraphError::CanvasExport(js_error(&e)))
	}
}

fn js_error(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Decode a `data:image/png;base64,...` URL into PNG bytes.
pub(crate) fn decode_png_data_url(url: &str) -> Result<Vec<u8>> {
	let payload = url.strip_prefix(PNG_DATA_URL_PREFIX).ok_or(GraphError::DataUrl)?;
	Ok(STANDARD.decode(payload)?)
}

impl Surface for CanvasSurface {
	fn size(&self) -> Size {
		Size::new(self.canvas.width() as f64, self.canvas.height() as f64)
	}

	fn resize(&mut self, width: u32, height: u32) -> Result<()> {
		self.canvas.set_width(width);
		self.canvas.set_height(height);
		Ok(())
	}

	fn begin(&mut self) {
		self.ctx.save();
	}

	fn end(&mut self) {
		self.ctx.restore();
	}

	fn clear(&mut self, color: Rgba) {
		let size = self.size();
		self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill_rect(0.0, 0.0, size.width, size.height);
	}

	fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
		self.ctx.set_stroke_style_str(&color.to_css());
		self.ctx.set_line_width(width);
		self.ctx.set_line_cap("round");
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
	}

	fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill();
	}

	fn fill_glow(&mut self, center: Point, inner: f64, outer: f64, color: Rgba) {
		let Ok(gradient) = self
			.ctx
			.create_radial_gradient(center.x, center.y, inner, center.x, center.y, outer)
		else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, &color.to_css());
		let _ = gradient.add_color_stop(1.0, &color.with_alpha(0.0).to_css());
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, outer, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill();
	}

	fn export_png(&self) -> Result<Vec<u8>> {
		decode_png_data_url(&self.to_data_url()?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_png_data_url() {
		let bytes = decode_png_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
		assert_eq!(bytes, b"\x89PNG\r\n\x1a\n");
	}

	#[test]
	fn rejects_other_data_urls() {
		assert!(matches!(
			decode_png_data_url("data:image/jpeg;base64,AAAA"),
			Err(GraphError::DataUrl)
		));
		assert!(matches!(
			decode_png_data_url("data:image/png;base64,@@@"),
			Err(GraphError::Base64(_))
		));
	}
}
