use leptos::prelude::*;

use crate::components::network_graph::{
	ColorBy, EdgeStatus, Graph, GraphEdge, GraphNode, NetworkGraphCanvas, NetworkMetrics,
	StyleOptions,
};

const SAMPLE_NODES: usize = 60;

/// Generate a sample Lightning network (random tree of channels), standing in for the network-info API.
fn generate_sample_network(n: usize, refresh: usize) -> Graph {
	let salt = refresh * 7919;
	let nodes: Vec<GraphNode> = (0..n)
		.map(|i| {
			let r = rand_simple(i + salt);
			GraphNode {
				id: format!("node-{i}"),
				public_key_prefix: format!("02{:08x}", (r * u32::MAX as f64) as u32),
				capacity: 10f64.powf(4.0 + r * 4.0).round(),
				channel_count: 1 + (rand_simple(i + n + salt) * 60.0) as u32,
				position: None,
				group_id: (i % 10) as u32,
			}
		})
		.collect();

	let edges: Vec<GraphEdge> = (1..n)
		.map(|i| {
			let target = (rand_simple(i + salt) * (i as f64)) as usize;
			let status = match i % 10 {
				0 => EdgeStatus::Inactive,
				7 => EdgeStatus::Pending,
				_ => EdgeStatus::Active,
			};
			GraphEdge {
				id: format!("chan-{i}"),
				source: format!("node-{i}"),
				target: format!("node-{target}"),
				capacity: 10f64.powf(4.0 + rand_simple(i * 3 + salt) * 3.0).round(),
				status,
			}
		})
		.collect();

	let possible = (n * n.saturating_sub(1) / 2).max(1);
	Graph {
		metrics: NetworkMetrics {
			density: edges.len() as f64 / possible as f64,
			diameter: 9.0,
			average_path_length: 3.6,
			clustering_coefficient: 0.0,
		},
		nodes,
		edges,
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn format_sats(amount: f64) -> String {
	if amount >= 1e8 {
		format!("{:.2} BTC", amount / 1e8)
	} else {
		format!("{amount:.0} sats")
	}
}

/// Network statistics supplied with the topology.
#[component]
fn MetricsPanel(#[prop(into)] metrics: Signal<NetworkMetrics>) -> impl IntoView {
	view! {
		<dl class="network-metrics">
			<dt>"Density"</dt>
			<dd>{move || format!("{:.4}", metrics.get().density)}</dd>
			<dt>"Diameter"</dt>
			<dd>{move || format!("{:.0}", metrics.get().diameter)}</dd>
			<dt>"Avg. path length"</dt>
			<dd>{move || format!("{:.2}", metrics.get().average_path_length)}</dd>
			<dt>"Clustering"</dt>
			<dd>{move || format!("{:.3}", metrics.get().clustering_coefficient)}</dd>
		</dl>
	}
}

/// Network map page
#[component]
pub fn Home() -> impl IntoView {
	let (refresh, set_refresh) = signal(0usize);
	let graph_data = Signal::derive(move || generate_sample_network(SAMPLE_NODES, refresh.get()));
	let metrics = Signal::derive(move || graph_data.get().metrics);

	let (color_by, set_color_by) = signal(ColorBy::Group);
	let style = Signal::derive(move || StyleOptions {
		color_by: color_by.get(),
		..Default::default()
	});

	let (selected, set_selected) = signal(None::<GraphNode>);
	let on_select = Callback::new(move |node: Option<GraphNode>| set_selected.set(node));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="network-page">
				<div class="graph-overlay">
					<h1>"Lightning Network"</h1>
					<p class="subtitle">"Drag to pan. Scroll to zoom. Click a node for details."</p>
				</div>

				<div class="graph-toolbar">
					<label>
						"Colour by "
						<select
							prop:value=move || color_by.get().as_str()
							on:change=move |ev| {
								set_color_by.set(event_target_value(&ev).parse().unwrap_or_default())
							}
						>
							<option value="group">"Group"</option>
							<option value="capacity">"Capacity"</option>
							<option value="channels">"Channels"</option>
						</select>
					</label>
					<button on:click=move |_| set_refresh.update(|r| *r += 1)>"Refresh data"</button>
				</div>

				<NetworkGraphCanvas data=graph_data style=style on_select=on_select />

				<MetricsPanel metrics=metrics />

				{move || {
					selected
						.get()
						.map(|node| {
							view! {
								<aside class="node-detail">
									<h2>{node.public_key_prefix.clone()}</h2>
									<dl>
										<dt>"Capacity"</dt>
										<dd>{format_sats(node.capacity)}</dd>
										<dt>"Channels"</dt>
										<dd>{node.channel_count}</dd>
										<dt>"Group"</dt>
										<dd>{node.group_id}</dd>
									</dl>
								</aside>
							}
						})
				}}
			</div>
		</ErrorBoundary>
	}
}
