//! Force-directed placement of graph nodes.
//!
//! Nodes repel each other pairwise and channels pull their endpoints together.
//! Every iteration is O(n²) in the node count because repulsion is computed over
//! all pairs without spatial partitioning, so this is meant for graphs of tens to
//! low hundreds of nodes.

use std::f64::consts::TAU;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::types::{Graph, Point};

/// Tuning knobs for [`layout`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
	/// Number of simulation steps.
	pub iterations: usize,
	/// Pairwise repulsion strength; force is `repulsion_force / distance`.
	pub repulsion_force: f64,
	/// Spring strength along channels; force is `distance * attraction_force`.
	pub attraction_force: f64,
	/// Upper bound on how far a node moves in a single step.
	pub max_displacement: f64,
	/// Unpositioned nodes are seeded uniformly in `[-extent, extent]²`.
	pub initial_extent: f64,
}

impl Default for LayoutOptions {
	fn default() -> Self {
		Self {
			iterations: 50,
			repulsion_force: 200.0,
			attraction_force: 0.1,
			max_displacement: 10.0,
			initial_extent: 500.0,
		}
	}
}

/// Lay out `graph` in place, seeding missing positions from the thread RNG.
pub fn layout(graph: &mut Graph, options: &LayoutOptions) {
	layout_with_rng(graph, options, &mut rand::thread_rng());
}

/// Lay out `graph` in place using `rng` for seeding and for separating coincident nodes.
///
/// Channels whose endpoints are missing from the graph contribute no force.
/// With `iterations == 0` nodes that already had a position are left untouched.
pub fn layout_with_rng<R: Rng + ?Sized>(graph: &mut Graph, options: &LayoutOptions, rng: &mut R) {
	let extent = options.initial_extent.abs();
	let mut seeded = 0;
	for node in graph.nodes.iter_mut().filter(|n| n.position.is_none()) {
		node.position = Some(Point::new(
			rng.gen_range(-extent..=extent),
			rng.gen_range(-extent..=extent),
		));
		seeded += 1;
	}

	let edges = graph.resolved_edges();
	let dangling = graph.edges.len() - edges.len();
	if dangling > 0 {
		debug!("layout: ignoring {} channel(s) with unknown endpoints", dangling);
	}

	let mut positions: Vec<Point> = graph
		.nodes
		.iter()
		.map(|n| n.position.unwrap_or_default())
		.collect();

	for _ in 0..options.iterations {
		let forces = compute_forces(&positions, &edges, options, rng);
		for (position, force) in positions.iter_mut().zip(forces) {
			*position += clamp_displacement(force, options.max_displacement);
		}
	}

	for (node, position) in graph.nodes.iter_mut().zip(positions) {
		node.position = Some(position);
	}

	debug!(
		"layout: {} nodes ({} seeded), {} channels, {} iterations",
		graph.nodes.len(),
		seeded,
		edges.len(),
		options.iterations
	);
}

/// Net force on every node for a single step, before clamping.
///
/// `edges` are index pairs into `positions`.
pub fn compute_forces<R: Rng + ?Sized>(
	positions: &[Point],
	edges: &[(usize, usize)],
	options: &LayoutOptions,
	rng: &mut R,
) -> Vec<Point> {
	let mut forces = vec![Point::ZERO; positions.len()];

	for a in 0..positions.len() {
		for b in (a + 1)..positions.len() {
			let mut delta = positions[a] - positions[b];
			if delta == Point::ZERO {
				// Coincident nodes would otherwise never separate.
				let angle = rng.gen_range(0.0..TAU);
				delta = Point::new(angle.cos(), angle.sin());
			}
			let distance = delta.length().max(1.0);
			let magnitude = options.repulsion_force / distance;
			let push = delta * (magnitude / distance);
			forces[a] += push;
			forces[b] -= push;
		}
	}

	for &(source, target) in edges {
		if source == target {
			continue;
		}
		let delta = positions[target] - positions[source];
		let distance = delta.length().max(1.0);
		let magnitude = distance * options.attraction_force;
		let pull = delta * (magnitude / distance);
		forces[source] += pull;
		forces[target] -= pull;
	}

	forces
}

/// Scale `force` down to `max` length, preserving direction.
pub fn clamp_displacement(force: Point, max: f64) -> Point {
	let length = force.length();
	if length > max { force * (max / length) } else { force }
}
