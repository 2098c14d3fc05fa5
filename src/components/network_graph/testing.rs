//! Test double that records draw calls instead of rasterising them.

use super::error::Result;
use super::scale::Rgba;
use super::surface::Surface;
use super::types::{Point, Size};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
	Begin,
	End,
	Clear,
	Line(Point, Point, Rgba),
	Circle(Point, f64, Rgba),
	Glow(Point),
}

pub(crate) struct Recording {
	pub(crate) size: Size,
	pub(crate) ops: Vec<Op>,
}

impl Recording {
	pub(crate) fn new() -> Self {
		Self {
			size: Size::new(800.0, 500.0),
			ops: vec![],
		}
	}

	pub(crate) fn lines(&self) -> usize {
		self.ops.iter().filter(|op| matches!(op, Op::Line(..))).count()
	}

	pub(crate) fn circles(&self) -> Vec<(Point, f64, Rgba)> {
		self.ops
			.iter()
			.filter_map(|op| match op {
				Op::Circle(c, r, color) => Some((*c, *r, *color)),
				_ => None,
			})
			.collect()
	}

	/// Number of completed draw passes.
	pub(crate) fn passes(&self) -> usize {
		self.ops.iter().filter(|op| **op == Op::End).count()
	}
}

impl Surface for Recording {
	fn size(&self) -> Size {
		self.size
	}
	fn resize(&mut self, width: u32, height: u32) -> Result<()> {
		self.size = Size::new(width as f64, height as f64);
		self.ops.clear();
		Ok(())
	}
	fn begin(&mut self) {
		self.ops.push(Op::Begin);
	}
	fn end(&mut self) {
		self.ops.push(Op::End);
	}
	fn clear(&mut self, _: Rgba) {
		self.ops.push(Op::Clear);
	}
	fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, _: f64) {
		self.ops.push(Op::Line(from, to, color));
	}
	fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
		self.ops.push(Op::Circle(center, radius, color));
	}
	fn fill_glow(&mut self, center: Point, _: f64, _: f64, _: Rgba) {
		self.ops.push(Op::Glow(center));
	}
	fn export_png(&self) -> Result<Vec<u8>> {
		Ok(vec![])
	}
}
