use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, MouseEvent, Window};

use super::geometry::{DomGeometry, node_dom_id};
use super::highlight::DiagramEvent;
use super::layout::{BrowserScheduler, LayoutTrigger, RESIZE_QUIET_MS};
use super::render::SvgSurface;
use super::state::DiagramState;
use super::types::GraphData;

struct MountedDiagram {
	state: DiagramState,
	surface: SvgSurface,
}

type Shared = Rc<RefCell<Option<MountedDiagram>>>;
type Listener = Closure<dyn FnMut(Event)>;

/// Window-level listeners and the layout trigger of one mounted diagram.
#[derive(Default)]
struct WindowHooks {
	window: Option<Window>,
	resize: Option<Listener>,
	click: Option<Listener>,
	trigger: Option<Rc<LayoutTrigger<BrowserScheduler>>>,
}

impl WindowHooks {
	fn attach(&mut self, window: Window, trigger: Rc<LayoutTrigger<BrowserScheduler>>, click: Listener) {
		self.detach();
		let trigger_resize = trigger.clone();
		let resize: Listener = Closure::new(move |_: Event| trigger_resize.on_resize());
		for (event, cb) in [("resize", &resize), ("click", &click)] {
			if let Err(err) = window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
				warn!("failed to listen for {event}: {err:?}");
			}
		}
		*self = Self {
			window: Some(window),
			resize: Some(resize),
			click: Some(click),
			trigger: Some(trigger),
		};
	}

	/// Remove both listeners and cancel any armed resize pass.
	fn detach(&mut self) {
		if let Some(trigger) = self.trigger.take() {
			trigger.cancel_pending();
		}
		let Some(window) = self.window.take() else {
			return;
		};
		for (event, cb) in [("resize", self.resize.take()), ("click", self.click.take())] {
			let Some(cb) = cb else {
				continue;
			};
			if let Err(err) =
				window.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
			{
				warn!("failed to stop listening for {event}: {err:?}");
			}
		}
	}
}

/// Dropped with the component's owner: releases window hooks and the mounted state,
/// so late timers and frames find nothing to draw.
struct Unmount {
	hooks: Rc<RefCell<WindowHooks>>,
	mounted: Shared,
}

impl Drop for Unmount {
	fn drop(&mut self) {
		if let Ok(mut hooks) = self.hooks.try_borrow_mut() {
			hooks.detach();
		}
		if let Ok(mut mounted) = self.mounted.try_borrow_mut() {
			mounted.take();
		}
	}
}

fn dispatch(mounted: &Shared, event: DiagramEvent) {
	if let Some(ref mut m) = *mounted.borrow_mut() {
		m.state.dispatch(event);
		if let Err(err) = m.surface.paint_highlights(&m.state) {
			warn!("failed to paint highlight: {err}");
		}
	}
}

fn redraw(mounted: &Shared) {
	if let Some(ref mut m) = *mounted.borrow_mut() {
		let surface = m.surface.element().clone();
		m.state.relayout(&DomGeometry::new(&surface));
		let painted = m
			.surface
			.draw(m.state.connections())
			.and_then(|_| m.surface.paint_highlights(&m.state));
		if let Err(err) = painted {
			warn!("failed to draw connections: {err}");
		}
	}
}

/// Whether a click landed on (or inside) one of the node boxes.
fn is_node_click(ev: &Event) -> bool {
	ev.target()
		.and_then(|target| target.dyn_into::<Element>().ok())
		.and_then(|element| element.closest(".diagram-node").ok().flatten())
		.is_some()
}

/// Columns of node boxes with an SVG overlay of connecting lines.
///
/// Hovering a node lights its edges and neighbours. Clicking a node toggles a sticky
/// highlight; clicking anywhere else clears all of them.
#[component]
pub fn NetworkDiagram(
	data: GraphData,
	#[prop(default = RESIZE_QUIET_MS)] resize_debounce_ms: u64,
) -> impl IntoView {
	let surface_ref = NodeRef::<leptos::svg::Svg>::new();
	let mounted: Shared = Rc::new(RefCell::new(None));
	let hooks = Rc::new(RefCell::new(WindowHooks::default()));
	let _unmount = StoredValue::new_local(Unmount {
		hooks: hooks.clone(),
		mounted: mounted.clone(),
	});

	let layers = data
		.layers()
		.iter()
		.map(|layer| {
			let nodes = layer
				.nodes
				.iter()
				.map(|node| {
					let (m_enter, m_leave, m_click) =
						(mounted.clone(), mounted.clone(), mounted.clone());
					let (id_enter, id_leave, id_click) =
						(node.id.clone(), node.id.clone(), node.id.clone());
					view! {
						<div
							class="diagram-node"
							id=node_dom_id(&node.id)
							on:mouseenter=move |_: MouseEvent| {
								dispatch(&m_enter, DiagramEvent::PointerEnter(id_enter.clone()))
							}
							on:mouseleave=move |_: MouseEvent| {
								dispatch(&m_leave, DiagramEvent::PointerLeave(id_leave.clone()))
							}
							on:click=move |_: MouseEvent| {
								dispatch(&m_click, DiagramEvent::Toggle(id_click.clone()))
							}
						>
							{node.label.clone()}
						</div>
					}
				})
				.collect_view();
			view! {
				<section class="diagram-layer" data-layer=layer.id.clone()>
					{layer.label.clone().map(|label| view! { <h2 class="diagram-layer-title">{label}</h2> })}
					{nodes}
				</section>
			}
		})
		.collect_view();

	let (mounted_init, hooks_init) = (mounted.clone(), hooks);
	Effect::new(move |_| {
		let Some(svg) = surface_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let surface = match SvgSurface::new(Element::from(svg)) {
			Ok(surface) => surface,
			Err(err) => {
				warn!("network diagram not mounted: {err}");
				return;
			}
		};
		*mounted_init.borrow_mut() = Some(MountedDiagram {
			state: DiagramState::new(data.clone()),
			surface,
		});

		let mounted_redraw = mounted_init.clone();
		let trigger = Rc::new(LayoutTrigger::new(
			BrowserScheduler::new(window.clone()),
			Duration::from_millis(resize_debounce_ms),
			Rc::new(move || redraw(&mounted_redraw)),
		));
		trigger.schedule_initial();

		let mounted_click = mounted_init.clone();
		let click: Listener = Closure::new(move |ev: Event| {
			if !is_node_click(&ev) {
				dispatch(&mounted_click, DiagramEvent::ClickOutside);
			}
		});
		hooks_init.borrow_mut().attach(window, trigger, click);
	});

	view! {
		<div class="network-diagram">
			<svg node_ref=surface_ref class="network-diagram-connections"></svg>
			<div class="network-diagram-layers">{layers}</div>
		</div>
	}
}
