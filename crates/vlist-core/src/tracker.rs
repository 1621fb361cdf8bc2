#![forbid(unsafe_code)]

//! Range-change tracking across scroll and resize events.
//!
//! [`ScrollWindow`] keeps the latest [`WindowSpec`], the clamped scroll offset
//! and the last computed [`Window`]. Every mutator recomputes the window
//! synchronously and returns `Some(range)` only when the materialized range
//! moved, which is the signal a host uses to decide whether rows have to be
//! re-rendered. Scroll deltas smaller than a row usually return `None`.

use crate::error::WindowError;
use crate::window::{RenderRange, Window, WindowSpec};

/// Window state that reports only range changes.
#[derive(Debug, Clone)]
pub struct ScrollWindow {
    spec: WindowSpec,
    offset: f64,
    window: Window,
    range_changes: u64,
}

impl ScrollWindow {
    /// Start at offset 0.
    pub fn new(spec: WindowSpec) -> Self {
        Self {
            spec,
            offset: 0.0,
            window: spec.window(0.0),
            range_changes: 0,
        }
    }

    /// Current inputs.
    #[inline]
    pub fn spec(&self) -> &WindowSpec {
        &self.spec
    }

    /// Last computed window.
    #[inline]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Last computed render range.
    #[inline]
    pub fn range(&self) -> RenderRange {
        self.window.range
    }

    /// Current scroll offset (always within `[0, max_scroll_offset]`).
    #[inline]
    pub fn scroll_offset(&self) -> f64 {
        self.offset
    }

    /// How many times the range has changed since construction.
    #[inline]
    pub fn range_changes(&self) -> u64 {
        self.range_changes
    }

    /// Scroll to an absolute offset.
    pub fn on_scroll(&mut self, offset: f64) -> Option<RenderRange> {
        self.offset = offset;
        self.refresh()
    }

    /// Scroll by a relative amount.
    pub fn scroll_by(&mut self, delta: f64) -> Option<RenderRange> {
        self.on_scroll(self.offset + delta)
    }

    /// The viewport was resized.
    pub fn on_resize(&mut self, viewport_height: f64) -> Result<Option<RenderRange>, WindowError> {
        self.spec = self.spec.with_viewport_height(viewport_height)?;
        Ok(self.refresh())
    }

    /// The item sequence was replaced; the stored offset is re-clamped.
    pub fn set_item_count(&mut self, item_count: usize) -> Option<RenderRange> {
        self.spec = self.spec.with_item_count(item_count);
        self.refresh()
    }

    /// The row height changed.
    pub fn set_item_height(&mut self, item_height: f64) -> Result<Option<RenderRange>, WindowError> {
        self.spec = self.spec.with_item_height(item_height)?;
        Ok(self.refresh())
    }

    pub fn set_overscan(&mut self, overscan: usize) -> Option<RenderRange> {
        self.spec = self.spec.with_overscan(overscan);
        self.refresh()
    }

    fn refresh(&mut self) -> Option<RenderRange> {
        self.offset = self.spec.clamp_offset(self.offset);
        let next = self.spec.window(self.offset);
        let changed = next.range != self.window.range;
        self.window = next;
        if changed {
            self.range_changes += 1;
            Some(next.range)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ScrollWindow {
        let spec = WindowSpec::new(100, 140.0, 600.0)
            .expect("valid spec")
            .with_overscan(10);
        ScrollWindow::new(spec)
    }

    #[test]
    fn sub_row_jitter_does_not_report() {
        let mut t = tracker();
        assert_eq!(t.on_scroll(0.5), None);
        assert_eq!(t.on_scroll(139.0), None);
        assert_eq!(t.range_changes(), 0);
        assert_eq!(t.scroll_offset(), 139.0);
    }

    #[test]
    fn crossing_a_row_reports_new_range() {
        let mut t = tracker();
        let range = t.on_scroll(140.0).expect("range moved");
        assert_eq!(range.as_inclusive(), Some(0..=16));
        assert_eq!(t.range_changes(), 1);
        assert_eq!(t.window().first_visible, 1);
    }

    #[test]
    fn scroll_by_accumulates() {
        let mut t = tracker();
        t.scroll_by(700.0);
        t.scroll_by(700.0);
        assert_eq!(t.scroll_offset(), 1400.0);
        assert_eq!(t.range().as_inclusive(), Some(0..=25));
    }

    #[test]
    fn offset_is_clamped_on_store() {
        let mut t = tracker();
        t.on_scroll(1e9);
        assert_eq!(t.scroll_offset(), 13_400.0);
        assert_eq!(t.range().end_inclusive(), Some(99));
        t.on_scroll(-50.0);
        assert_eq!(t.scroll_offset(), 0.0);
    }

    #[test]
    fn replacing_items_reclamps_offset() {
        let mut t = tracker();
        t.on_scroll(10_000.0);
        let range = t.set_item_count(8).expect("range moved");
        assert_eq!(range.as_inclusive(), Some(0..=7));
        assert_eq!(t.scroll_offset(), 520.0);

        let range = t.set_item_count(0).expect("range emptied");
        assert!(range.is_empty());
        assert_eq!(t.scroll_offset(), 0.0);
    }

    #[test]
    fn resize_grows_visible_count() {
        let mut t = tracker();
        let range = t
            .on_resize(1400.0)
            .expect("valid height")
            .expect("range moved");
        assert_eq!(t.window().visible_count, 10);
        assert_eq!(range.end_inclusive(), Some(20));
        assert!(t.on_resize(0.0).is_err());
        // Failed resize leaves the previous spec in place.
        assert_eq!(t.spec().viewport_height(), 1400.0);
    }

    #[test]
    fn item_height_change_recomputes() {
        let mut t = tracker();
        let range = t
            .set_item_height(60.0)
            .expect("valid height")
            .expect("range moved");
        assert_eq!(t.window().visible_count, 10);
        assert_eq!(range.end_inclusive(), Some(20));
        assert!(t.set_item_height(0.0).is_err());
    }

    #[test]
    fn overscan_change_recomputes() {
        let mut t = tracker();
        let range = t.set_overscan(0).expect("range moved");
        assert_eq!(range.as_inclusive(), Some(0..=5));
        assert_eq!(t.set_overscan(0), None);
    }
}
