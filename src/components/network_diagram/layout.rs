use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::Window;

/// Quiet window before a resize triggers a redraw.
pub const RESIZE_QUIET_MS: u64 = 120;

pub type Task = Box<dyn FnOnce()>;

/// Deferred execution on the single UI thread.
pub trait Scheduler {
	type Handle;

	/// Run `task` once the document has been laid out for the next frame.
	fn next_frame(&self, task: Task);
	/// Run `task` after `delay`. `None` if the timer could not be armed.
	fn after(&self, delay: Duration, task: Task) -> Option<Self::Handle>;
	fn cancel(&self, handle: Self::Handle);
}

/// Drives connection redraws: one pass on the first frame, and a trailing-edge
/// debounced pass after resizes.
pub struct LayoutTrigger<S: Scheduler> {
	scheduler: S,
	quiet: Duration,
	pending: Rc<RefCell<Option<S::Handle>>>,
	recompute: Rc<dyn Fn()>,
}

impl<S> LayoutTrigger<S>
where
	S: Scheduler,
	S::Handle: 'static,
{
	pub fn new(scheduler: S, quiet: Duration, recompute: Rc<dyn Fn()>) -> Self {
		Self {
			scheduler,
			quiet,
			pending: Rc::new(RefCell::new(None)),
			recompute,
		}
	}

	pub fn schedule_initial(&self) {
		let recompute = self.recompute.clone();
		self.scheduler.next_frame(Box::new(move || recompute()));
	}

	/// Cancel whatever is pending and wait a full quiet window again.
	pub fn on_resize(&self) {
		self.cancel_pending();

		let (pending, recompute) = (self.pending.clone(), self.recompute.clone());
		let handle = self.scheduler.after(
			self.quiet,
			Box::new(move || {
				pending.borrow_mut().take();
				recompute();
			}),
		);
		*self.pending.borrow_mut() = handle;
	}

	/// Drop an armed resize pass without running it.
	pub fn cancel_pending(&self) {
		let previous = self.pending.borrow_mut().take();
		if let Some(handle) = previous {
			self.scheduler.cancel(handle);
		}
	}

	#[cfg(test)]
	pub fn is_pending(&self) -> bool {
		self.pending.borrow().is_some()
	}
}

/// `requestAnimationFrame` / `setTimeout` on the browser window.
pub struct BrowserScheduler {
	window: Window,
}

impl BrowserScheduler {
	pub fn new(window: Window) -> Self {
		Self { window }
	}
}

impl Scheduler for BrowserScheduler {
	type Handle = i32;

	fn next_frame(&self, task: Task) {
		let cb = Closure::once_into_js(move || task());
		if let Err(err) = self.window.request_animation_frame(cb.unchecked_ref()) {
			warn!("requestAnimationFrame failed: {err:?}");
		}
	}

	fn after(&self, delay: Duration, task: Task) -> Option<i32> {
		let cb = Closure::once_into_js(move || task());
		let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
		self.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), millis)
			.map_err(|err| warn!("setTimeout failed: {err:?}"))
			.ok()
	}

	fn cancel(&self, handle: i32) {
		self.window.clear_timeout_with_handle(handle);
	}
}
