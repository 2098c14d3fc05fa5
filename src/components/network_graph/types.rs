use std::collections::HashMap;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::error::Result;

/// A 2D coordinate, in graph-space or screen-space depending on context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	/// The origin.
	pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean length of the vector from the origin.
	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		(self - other).length()
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Point {
	fn add_assign(&mut self, rhs: Point) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl SubAssign for Point {
	fn sub_assign(&mut self, rhs: Point) {
		self.x -= rhs.x;
		self.y -= rhs.y;
	}
}

impl Mul<f64> for Point {
	type Output = Point;

	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

impl Neg for Point {
	type Output = Point;

	fn neg(self) -> Point {
		Point::new(-self.x, -self.y)
	}
}

/// Pixel dimensions of a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// A Lightning node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Unique identifier.
	pub id: String,
	/// Display identifier, not necessarily unique.
	#[serde(default)]
	pub public_key_prefix: String,
	/// Total channel capacity.
	#[serde(default)]
	pub capacity: f64,
	/// Number of open channels.
	#[serde(default)]
	pub channel_count: u32,
	/// Graph-space position, assigned by the layout engine when absent.
	#[serde(default)]
	pub position: Option<Point>,
	/// Categorical colour group.
	#[serde(default)]
	pub group_id: u32,
}

/// Channel state; only affects the colour an edge is drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
	Active,
	Inactive,
	/// Funding not yet confirmed.
	Pending,
	/// Anything the data source reports that we do not recognise.
	#[default]
	#[serde(other)]
	Unknown,
}

/// A channel between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub capacity: f64,
	#[serde(default)]
	pub status: EdgeStatus,
}

/// Aggregate network statistics, supplied by the data source and only displayed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkMetrics {
	/// Ratio of existing to possible channels.
	pub density: f64,
	/// Longest shortest path.
	pub diameter: f64,
	/// Mean shortest path length.
	pub average_path_length: f64,
	/// Global clustering coefficient.
	pub clustering_coefficient: f64,
}

/// A snapshot of the network topology.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
	/// Nodes, in draw order.
	pub nodes: Vec<GraphNode>,
	/// Channels, in draw order.
	pub edges: Vec<GraphEdge>,
	/// Externally computed statistics.
	#[serde(default)]
	pub metrics: NetworkMetrics,
}

impl Graph {
	/// Parse a graph from the JSON shape served by the network-info API.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Map node ids to their index in `nodes`. Later duplicates win.
	pub fn index_by_id(&self) -> HashMap<&str, usize> {
		self.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect()
	}

	/// Edges as index pairs, dropping those with an unknown endpoint.
	pub fn resolved_edges(&self) -> Vec<(usize, usize)> {
		let index = self.index_by_id();
		self.edges
			.iter()
			.filter_map(|e| {
				Some((
					*index.get(e.source.as_str())?,
					*index.get(e.target.as_str())?,
				))
			})
			.collect()
	}
}
