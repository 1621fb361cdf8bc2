#![forbid(unsafe_code)]

//! Scroll position signal wired to the render window.
//!
//! [`ScrollBinding`] keeps three observables in step:
//!
//! ```text
//!   spec ──┐
//!          ├──► window ──► range
//! offset ──┘
//! ```
//!
//! A change to the list geometry (`spec`) re-clamps the stored offset. Any
//! change to `spec` or `offset` recomputes the window. The `range` signal
//! only moves when `[render_start, render_end]` differs, so listeners
//! registered with [`ScrollBinding::on_range_change`] see scroll jitter
//! within a row as silence.

use tracing::trace;
use vlist_core::{RenderRange, Window, WindowError, WindowSpec};

use crate::reactive::{Observable, Subscription};

/// Reactive scroll state for one list.
#[derive(Debug)]
pub struct ScrollBinding {
    spec: Observable<WindowSpec>,
    offset: Observable<f64>,
    window: Observable<Window>,
    range: Observable<RenderRange>,
    _links: [Subscription; 3],
}

impl ScrollBinding {
    /// Bind a list at scroll offset 0.
    pub fn new(spec: WindowSpec) -> Self {
        let initial = spec.window(0.0);
        let spec_obs = Observable::new(spec);
        let offset = Observable::new(initial.effective_offset);
        let window = Observable::new(initial);
        let range = Observable::new(initial.range);

        let on_spec = {
            let offset = offset.clone();
            let window = window.clone();
            spec_obs.subscribe(move |spec: &WindowSpec| {
                let clamped = spec.clamp_offset(offset.get());
                // Recompute even when the clamp leaves the offset unchanged.
                offset.set(clamped);
                window.set(spec.window(clamped));
            })
        };
        let on_offset = {
            let spec = spec_obs.clone();
            let window = window.clone();
            offset.subscribe(move |offset: &f64| {
                window.set(spec.with(|s| s.window(*offset)));
            })
        };
        let on_window = {
            let range = range.clone();
            window.subscribe(move |window: &Window| {
                if range.set(window.range) {
                    trace!(
                        start = window.range.start,
                        end = window.range.end,
                        "render range changed"
                    );
                }
            })
        };

        Self {
            spec: spec_obs,
            offset,
            window,
            range,
            _links: [on_spec, on_offset, on_window],
        }
    }

    /// Move to an absolute content offset (clamped). Returns the new range
    /// when it changed.
    pub fn scroll_to(&self, offset: f64) -> Option<RenderRange> {
        let before = self.range.get();
        let clamped = self.spec.with(|s| s.clamp_offset(offset));
        self.offset.set(clamped);
        self.changed_since(before)
    }

    /// Move by a relative delta.
    pub fn scroll_by(&self, delta: f64) -> Option<RenderRange> {
        self.scroll_to(self.offset.get() + delta)
    }

    /// Apply a new viewport height.
    pub fn resize(&self, viewport_height: f64) -> Result<Option<RenderRange>, WindowError> {
        let next = self.spec.get().with_viewport_height(viewport_height)?;
        Ok(self.replace_spec(next))
    }

    /// The item list was replaced; the offset is re-clamped to the new length.
    pub fn replace_items(&self, item_count: usize) -> Option<RenderRange> {
        let next = self.spec.get().with_item_count(item_count);
        self.replace_spec(next)
    }

    pub fn set_item_height(&self, item_height: f64) -> Result<Option<RenderRange>, WindowError> {
        let next = self.spec.get().with_item_height(item_height)?;
        Ok(self.replace_spec(next))
    }

    pub fn set_overscan(&self, overscan: usize) -> Option<RenderRange> {
        let next = self.spec.get().with_overscan(overscan);
        self.replace_spec(next)
    }

    fn replace_spec(&self, spec: WindowSpec) -> Option<RenderRange> {
        let before = self.range.get();
        self.spec.set(spec);
        self.changed_since(before)
    }

    fn changed_since(&self, before: RenderRange) -> Option<RenderRange> {
        let after = self.range.get();
        (after != before).then_some(after)
    }

    /// Call `callback` whenever the render range changes.
    pub fn on_range_change(&self, callback: impl Fn(&RenderRange) + 'static) -> Subscription {
        self.range.subscribe(callback)
    }

    /// Call `callback` on every window recomputation that changed any field,
    /// including the effective offset.
    pub fn on_window_change(&self, callback: impl Fn(&Window) + 'static) -> Subscription {
        self.window.subscribe(callback)
    }

    #[must_use]
    pub fn spec(&self) -> WindowSpec {
        self.spec.get()
    }

    #[must_use]
    pub fn window(&self) -> Window {
        self.window.get()
    }

    #[must_use]
    pub fn range(&self) -> RenderRange {
        self.range.get()
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.offset.get()
    }

    /// Number of render range changes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.range.version()
    }
}
