//! Raster targets for the renderer.

use std::ops::{Deref, DerefMut};

use tiny_skia::{
	Color, FillRule, GradientStop, LineCap, Paint, PathBuilder, Pixmap, RadialGradient,
	SpreadMode, Stroke, Transform,
};

use super::error::{GraphError, Result};
use super::scale::Rgba;
use super::types::{Point, Size};

/// Something the graph can be drawn onto.
///
/// Coordinates are screen pixels. `begin` and `end` bracket one draw pass; use
/// [`SurfacePass`] rather than calling them directly.
pub trait Surface {
	/// Pixel dimensions.
	fn size(&self) -> Size;

	/// Change the pixel dimensions. Contents are discarded.
	fn resize(&mut self, width: u32, height: u32) -> Result<()>;

	/// Acquire whatever drawing state the backend needs.
	fn begin(&mut self) {}

	/// Release what `begin` acquired.
	fn end(&mut self) {}

	/// Fill the whole surface.
	fn clear(&mut self, color: Rgba);

	/// Straight line with round caps.
	fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64);

	/// Solid disc.
	fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);

	/// Radial glow fading from `color` at `inner` to transparent at `outer`.
	fn fill_glow(&mut self, center: Point, inner: f64, outer: f64, color: Rgba);

	/// Current contents as PNG.
	fn export_png(&self) -> Result<Vec<u8>>;
}

/// Scoped draw pass: `begin` on acquisition, `end` on drop.
pub struct SurfacePass<'a, S: Surface + ?Sized> {
	surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> SurfacePass<'a, S> {
	/// Start a pass on `surface`.
	pub fn acquire(surface: &'a mut S) -> Self {
		surface.begin();
		Self { surface }
	}
}

impl<S: Surface + ?Sized> Deref for SurfacePass<'_, S> {
	type Target = S;

	fn deref(&self) -> &S {
		self.surface
	}
}

impl<S: Surface + ?Sized> DerefMut for SurfacePass<'_, S> {
	fn deref_mut(&mut self) -> &mut S {
		self.surface
	}
}

impl<S: Surface + ?Sized> Drop for SurfacePass<'_, S> {
	fn drop(&mut self) {
		self.surface.end();
	}
}

/// In-memory RGBA raster backed by tiny-skia.
pub struct PixmapSurface {
	pixmap: Pixmap,
}

impl PixmapSurface {
	/// Allocate a transparent surface.
	pub fn new(width: u32, height: u32) -> Result<Self> {
		let pixmap = Pixmap::new(width, height).ok_or(GraphError::SurfaceAlloc { width, height })?;
		Ok(Self { pixmap })
	}

	/// Colour of one pixel, un-premultiplied.
	pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
		if x >= self.pixmap.width() || y >= self.pixmap.height() {
			return None;
		}
		let c = self.pixmap.pixel(x, y)?.demultiply();
		Some(Rgba::rgba(c.red(), c.green(), c.blue(), c.alpha() as f32 / 255.0))
	}

	fn paint(color: Rgba) -> Paint<'static> {
		let mut paint = Paint::default();
		paint.set_color(color.to_skia());
		paint.anti_alias = true;
		paint
	}
}

impl Surface for PixmapSurface {
	fn size(&self) -> Size {
		Size::new(self.pixmap.width() as f64, self.pixmap.height() as f64)
	}

	fn resize(&mut self, width: u32, height: u32) -> Result<()> {
		*self = Self::new(width, height)?;
		Ok(())
	}

	fn clear(&mut self, color: Rgba) {
		self.pixmap.fill(color.to_skia());
	}

	fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
		let mut pb = PathBuilder::new();
		pb.move_to(from.x as f32, from.y as f32);
		pb.line_to(to.x as f32, to.y as f32);
		let Some(path) = pb.finish() else {
			return;
		};
		let stroke = Stroke {
			width: width as f32,
			line_cap: LineCap::Round,
			..Stroke::default()
		};
		self.pixmap
			.stroke_path(&path, &Self::paint(color), &stroke, Transform::identity(), None);
	}

	fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
		let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
		else {
			return;
		};
		self.pixmap.fill_path(
			&path,
			&Self::paint(color),
			FillRule::Winding,
			Transform::identity(),
			None,
		);
	}

	fn fill_glow(&mut self, center: Point, inner: f64, outer: f64, color: Rgba) {
		let (cx, cy, outer) = (center.x as f32, center.y as f32, outer as f32);
		let Some(path) = PathBuilder::from_circle(cx, cy, outer) else {
			return;
		};
		let start = (inner as f32 / outer).clamp(0.0, 1.0);
		let Some(shader) = RadialGradient::new(
			tiny_skia::Point::from_xy(cx, cy),
			tiny_skia::Point::from_xy(cx, cy),
			outer,
			vec![
				GradientStop::new(0.0, color.to_skia()),
				GradientStop::new(start, color.to_skia()),
				GradientStop::new(1.0, Color::TRANSPARENT),
			],
			SpreadMode::Pad,
			Transform::identity(),
		) else {
			return;
		};
		let paint = Paint {
			shader,
			anti_alias: true,
			..Paint::default()
		};
		self.pixmap
			.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
	}

	fn export_png(&self) -> Result<Vec<u8>> {
		self.pixmap.encode_png().map_err(|_| GraphError::PngEncode)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Default)]
	struct Counting {
		begun: usize,
		ended: usize,
	}

	impl Surface for Counting {
		fn size(&self) -> Size {
			Size::new(1.0, 1.0)
		}
		fn resize(&mut self, _: u32, _: u32) -> Result<()> {
			Ok(())
		}
		fn begin(&mut self) {
			self.begun += 1;
		}
		fn end(&mut self) {
			self.ended += 1;
		}
		fn clear(&mut self, _: Rgba) {}
		fn stroke_line(&mut self, _: Point, _: Point, _: Rgba, _: f64) {}
		fn fill_circle(&mut self, _: Point, _: f64, _: Rgba) {}
		fn fill_glow(&mut self, _: Point, _: f64, _: f64, _: Rgba) {}
		fn export_png(&self) -> Result<Vec<u8>> {
			Ok(vec![])
		}
	}

	#[test]
	fn pass_releases_on_drop() {
		let mut surface = Counting::default();
		{
			let mut pass = SurfacePass::acquire(&mut surface);
			pass.clear(Rgba::rgb(0, 0, 0));
		}
		assert_eq!((surface.begun, surface.ended), (1, 1));
	}

	#[test]
	fn zero_sized_pixmap_is_an_error() {
		assert!(matches!(
			PixmapSurface::new(0, 10),
			Err(GraphError::SurfaceAlloc { width: 0, height: 10 })
		));
	}

	#[test]
	fn circle_and_line_land_on_pixels() {
		let mut s = PixmapSurface::new(40, 40).unwrap();
		s.clear(Rgba::rgb(0, 0, 0));
		s.fill_circle(Point::new(10.0, 10.0), 4.0, Rgba::rgb(255, 0, 0));
		s.stroke_line(Point::new(0.0, 30.5), Point::new(40.0, 30.5), Rgba::rgb(0, 0, 255), 3.0);

		assert_eq!(s.pixel(10, 10), Some(Rgba::rgb(255, 0, 0)));
		assert_eq!(s.pixel(20, 30), Some(Rgba::rgb(0, 0, 255)));
		assert_eq!(s.pixel(30, 10), Some(Rgba::rgb(0, 0, 0)));
		assert_eq!(s.pixel(40, 0), None);
	}

	#[test]
	fn pixel_outside_either_axis_is_none() {
		let mut s = PixmapSurface::new(4, 3).unwrap();
		s.clear(Rgba::rgb(9, 9, 9));
		assert_eq!(s.pixel(3, 2), Some(Rgba::rgb(9, 9, 9)));
		assert_eq!(s.pixel(4, 0), None);
		assert_eq!(s.pixel(4, 1), None);
		assert_eq!(s.pixel(0, 3), None);
	}

	#[test]
	fn resize_reallocates_or_keeps_old_pixmap() {
		let mut s = PixmapSurface::new(10, 10).unwrap();
		s.resize(30, 20).unwrap();
		assert_eq!(s.size(), Size::new(30.0, 20.0));
		assert!(matches!(s.resize(0, 20), Err(GraphError::SurfaceAlloc { width: 0, height: 20 })));
		assert_eq!(s.size(), Size::new(30.0, 20.0));
	}

	#[test]
	fn glow_fades_outward() {
		let mut s = PixmapSurface::new(60, 60).unwrap();
		s.fill_glow(Point::new(30.0, 30.0), 4.0, 20.0, Rgba::rgb(255, 255, 255));
		let near = s.pixel(30, 30).unwrap().a;
		let mid = s.pixel(42, 30).unwrap().a;
		let outside = s.pixel(55, 30).unwrap().a;
		assert!(near > mid && mid > outside, "{near} {mid} {outside}");
		assert_eq!(outside, 0.0);
	}

	#[test]
	fn exports_png() {
		let s = PixmapSurface::new(8, 8).unwrap();
		let bytes = s.export_png().unwrap();
		assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
	}
}
