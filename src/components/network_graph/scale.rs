//! Visual scales: how node and channel attributes map to colours and sizes.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::{EdgeStatus, GraphEdge, GraphNode};

/// Capacities at or above `10^CAPACITY_DECADES` saturate the capacity scales.
pub const CAPACITY_DECADES: f64 = 7.0;
/// Channel counts at or above this saturate the channel colour scale.
pub const CHANNEL_CEILING: u32 = 50;

/// An sRGB colour with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f32,
}

impl Rgba {
	/// Opaque colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Colour with opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
		Self { r, g, b, a }
	}

	/// Same colour with a different opacity.
	pub const fn with_alpha(self, a: f32) -> Self {
		Self { a, ..self }
	}

	/// Linear interpolation in sRGB; `t` is clamped to `[0, 1]`.
	pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
		Rgba {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a + (other.a - self.a) * t as f32,
		}
	}

	/// CSS `rgba()` notation for canvas style strings.
	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}

	/// Convert for the software rasteriser.
	pub fn to_skia(self) -> tiny_skia::Color {
		let alpha = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
		tiny_skia::Color::from_rgba8(self.r, self.g, self.b, alpha)
	}
}

/// Categorical palette for [`ColorBy::Group`].
pub const PALETTE: [Rgba; 10] = [
	Rgba::rgb(0x1f, 0x77, 0xb4),
	Rgba::rgb(0xff, 0x7f, 0x0e),
	Rgba::rgb(0x2c, 0xa0, 0x2c),
	Rgba::rgb(0xd6, 0x27, 0x28),
	Rgba::rgb(0x94, 0x67, 0xbd),
	Rgba::rgb(0x8c, 0x56, 0x4b),
	Rgba::rgb(0xe3, 0x77, 0xc2),
	Rgba::rgb(0x7f, 0x7f, 0x7f),
	Rgba::rgb(0xbc, 0xbd, 0x22),
	Rgba::rgb(0x17, 0xbe, 0xcf),
];

const CAPACITY_LOW: Rgba = Rgba::rgb(59, 130, 246);
const CAPACITY_HIGH: Rgba = Rgba::rgb(239, 68, 68);
const CHANNELS_LOW: Rgba = Rgba::rgb(34, 197, 94);
const CHANNELS_HIGH: Rgba = Rgba::rgb(168, 85, 247);

/// Which node attribute drives the fill colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBy {
	/// Blue to red by log capacity.
	Capacity,
	/// Green to purple by channel count.
	Channels,
	/// Categorical palette by `group_id`; also what unrecognised names deserialize to.
	#[default]
	#[serde(other)]
	Group,
}

impl ColorBy {
	/// Name as accepted by [`FromStr`].
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Group => "group",
			Self::Capacity => "capacity",
			Self::Channels => "channels",
		}
	}
}

impl FromStr for ColorBy {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.trim().to_ascii_lowercase().as_str() {
			"capacity" => Self::Capacity,
			"channels" => Self::Channels,
			_ => Self::Group,
		})
	}
}

/// Styling for a draw pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOptions {
	/// Base node radius in pixels.
	pub node_size: f64,
	/// Base channel line width in pixels.
	pub edge_width: f64,
	/// Fill colour mode.
	pub color_by: ColorBy,
	/// Node to glow, overriding the view's own highlight.
	pub highlight_node: Option<String>,
}

impl Default for StyleOptions {
	fn default() -> Self {
		Self {
			node_size: 5.0,
			edge_width: 1.0,
			color_by: ColorBy::Group,
			highlight_node: None,
		}
	}
}

fn capacity_fraction(capacity: f64) -> f64 {
	(capacity.max(1.0).log10() / CAPACITY_DECADES).clamp(0.0, 1.0)
}

/// Screen radius of a node: grows with the log of its channel count.
pub fn node_radius(node: &GraphNode, style: &StyleOptions) -> f64 {
	let channels = node.channel_count.max(1) as f64;
	style.node_size * (1.0 + channels.log10() / 2.0)
}

/// Fill colour of a node under `color_by`.
pub fn node_color(node: &GraphNode, color_by: ColorBy) -> Rgba {
	match color_by {
		ColorBy::Group => PALETTE[node.group_id as usize % PALETTE.len()],
		ColorBy::Capacity => CAPACITY_LOW.lerp(CAPACITY_HIGH, capacity_fraction(node.capacity)),
		ColorBy::Channels => {
			let t = node.channel_count.min(CHANNEL_CEILING) as f64 / CHANNEL_CEILING as f64;
			CHANNELS_LOW.lerp(CHANNELS_HIGH, t)
		}
	}
}

/// Stroke colour of a channel.
pub fn edge_color(status: EdgeStatus) -> Rgba {
	match status {
		EdgeStatus::Active => Rgba::rgba(34, 197, 94, 0.6),
		EdgeStatus::Inactive => Rgba::rgba(239, 68, 68, 0.4),
		EdgeStatus::Pending => Rgba::rgba(234, 179, 8, 0.6),
		EdgeStatus::Unknown => Rgba::rgba(148, 163, 184, 0.3),
	}
}

/// Stroke width of a channel: `0.5×` to `2×` the base width across the capacity scale.
pub fn edge_width(edge: &GraphEdge, style: &StyleOptions) -> f64 {
	style.edge_width * (0.5 + 1.5 * capacity_fraction(edge.capacity))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(capacity: f64, channel_count: u32, group_id: u32) -> GraphNode {
		GraphNode {
			id: "n".into(),
			public_key_prefix: "03ff".into(),
			capacity,
			channel_count,
			position: None,
			group_id,
		}
	}

	#[test]
	fn unknown_color_mode_falls_back_to_group() {
		assert_eq!("capacity".parse::<ColorBy>(), Ok(ColorBy::Capacity));
		assert_eq!(" Channels ".parse::<ColorBy>(), Ok(ColorBy::Channels));
		assert_eq!("rainbow".parse::<ColorBy>(), Ok(ColorBy::Group));

		let style: StyleOptions = serde_json::from_str(r#"{"colorBy": "rainbow", "nodeSize": 8}"#).unwrap();
		assert_eq!(style.color_by, ColorBy::Group);
		assert_eq!(style.node_size, 8.0);
		assert_eq!(style.edge_width, 1.0);
	}

	#[test]
	fn color_mode_json_round_trips_by_name() {
		for mode in [ColorBy::Group, ColorBy::Capacity, ColorBy::Channels] {
			let json = serde_json::to_string(&mode).unwrap();
			assert_eq!(json, format!("\"{}\"", mode.as_str()));
			assert_eq!(serde_json::from_str::<ColorBy>(&json).unwrap(), mode);
		}
		assert_eq!(serde_json::from_str::<ColorBy>("\"heatmap\"").unwrap(), ColorBy::Group);
	}

	#[test]
	fn radius_treats_zero_channels_as_one() {
		let style = StyleOptions::default();
		assert_eq!(node_radius(&node(0.0, 0, 0), &style), 5.0);
		assert_eq!(node_radius(&node(0.0, 1, 0), &style), 5.0);
		assert!((node_radius(&node(0.0, 100, 0), &style) - 10.0).abs() < 1e-12);
	}

	#[test]
	fn capacity_gradient_saturates() {
		assert_eq!(node_color(&node(1.0, 1, 0), ColorBy::Capacity), CAPACITY_LOW);
		assert_eq!(node_color(&node(2e7, 1, 0), ColorBy::Capacity), CAPACITY_HIGH);
		assert_eq!(node_color(&node(1e12, 1, 0), ColorBy::Capacity), CAPACITY_HIGH);
	}

	#[test]
	fn channel_gradient_caps_at_fifty() {
		assert_eq!(node_color(&node(0.0, 0, 0), ColorBy::Channels), CHANNELS_LOW);
		assert_eq!(node_color(&node(0.0, 50, 0), ColorBy::Channels), CHANNELS_HIGH);
		assert_eq!(node_color(&node(0.0, 500, 0), ColorBy::Channels), CHANNELS_HIGH);
	}

	#[test]
	fn group_palette_wraps() {
		assert_eq!(node_color(&node(0.0, 1, 12), ColorBy::Group), PALETTE[2]);
	}

	#[test]
	fn edge_width_grows_with_capacity() {
		let style = StyleOptions {
			edge_width: 2.0,
			..Default::default()
		};
		let edge = |capacity| GraphEdge {
			id: "e".into(),
			source: "a".into(),
			target: "b".into(),
			capacity,
			status: EdgeStatus::Active,
		};
		assert_eq!(edge_width(&edge(0.0), &style), 1.0);
		assert!((edge_width(&edge(1e7), &style) - 4.0).abs() < 1e-9);
		assert!(edge_width(&edge(1e4), &style) > edge_width(&edge(1e2), &style));
	}

	#[test]
	fn css_notation() {
		assert_eq!(edge_color(EdgeStatus::Active).to_css(), "rgba(34, 197, 94, 0.6)");
	}
}
