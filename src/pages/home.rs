use leptos::prelude::*;

use crate::components::network_diagram::{GraphData, NetworkDiagram};

/// Authored layout of the demo network. Columns and rows are fixed here, not computed.
const SAMPLE_NETWORK: &str = include_str!("network.json");

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
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

			<div class="diagram-page">
				<h1>"Network Diagram"</h1>
				<p class="subtitle">
					"Hover a node to trace its connections. Click to pin it; click elsewhere to clear."
				</p>
				{GraphData::from_json(SAMPLE_NETWORK)
					.map(|data| view! { <NetworkDiagram data=data /> })}
			</div>
		</ErrorBoundary>
	}
}
