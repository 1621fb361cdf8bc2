#![forbid(unsafe_code)]

//! Fixed-row window computation.
//!
//! Given a list of `item_count` rows that all share `item_height`, a viewport
//! of `viewport_height` and a scroll offset, decide which rows must be
//! materialized. Everything outside the returned range is represented only by
//! the total content height (the scroll extent), never by real rows.
//!
//! # Model
//!
//! ```text
//! total         = item_count * item_height
//! max_offset    = max(0, total - viewport_height)
//! offset'       = clamp(offset, 0, max_offset)
//! first         = floor(offset' / item_height)
//! visible       = ceil(viewport_height / item_height)
//! render_start  = max(0, first - overscan)
//! render_end    = min(item_count - 1, first + visible + overscan)   (inclusive)
//! ```
//!
//! `render_end` reaches one row past `first + visible - 1` so a viewport that
//! is scrolled mid-row (top and bottom rows both partially shown) is always
//! covered, even with zero overscan.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `item_count == 0` | Empty range, zero content height |
//! | offset past `max_offset` | Clamped to `max_offset` |
//! | offset negative or `NaN` | Treated as 0 |
//! | `item_height <= 0` or non-finite | [`WindowError`] at construction |
//! | `viewport_height <= 0` or non-finite | [`WindowError`] at construction |

use std::ops::{Range, RangeInclusive};

use crate::error::{WindowError, check_item_height, check_viewport_height};

/// Overscan used when the caller does not pick one.
pub const DEFAULT_OVERSCAN: usize = 5;

/// A half-open range of row indexes: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderRange {
    pub start: usize,
    pub end: usize, // exclusive
}

impl RenderRange {
    /// The empty range.
    pub const EMPTY: RenderRange = RenderRange { start: 0, end: 0 };

    /// Create a range. `end` is clamped up to `start`.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// Returns `true` if the range contains no rows.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of rows in the range.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Last index in the range, or `None` when empty.
    #[inline]
    pub fn end_inclusive(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    /// The range as `start..=end_inclusive`, or `None` when empty.
    pub fn as_inclusive(&self) -> Option<RangeInclusive<usize>> {
        Some(self.start..=self.end_inclusive()?)
    }

    /// Whether `index` falls inside the range.
    #[inline]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Iterate the indexes in display order.
    #[inline]
    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<RenderRange> for Range<usize> {
    fn from(range: RenderRange) -> Self {
        range.start..range.end
    }
}

/// Result of one window computation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    /// Rows to materialize (visible rows plus overscan).
    pub range: RenderRange,
    /// Index of the row under the top edge of the viewport (0 when empty).
    pub first_visible: usize,
    /// `ceil(viewport_height / item_height)`.
    pub visible_count: usize,
    /// Scroll offset actually used after clamping.
    pub effective_offset: f64,
    /// `item_count * item_height`; the height of the scroll spacer.
    pub total_content_height: f64,
}

impl Window {
    /// Number of rows that will be materialized.
    #[inline]
    pub fn rendered_count(&self) -> usize {
        self.range.len()
    }
}

/// Inputs of the window computation.
///
/// Heights are plain numbers in whatever unit the host scrolls in (pixels,
/// terminal rows). Only the ratio between them matters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "WindowSpecFields"))]
pub struct WindowSpec {
    item_count: usize,
    item_height: f64,
    viewport_height: f64,
    overscan: usize,
}

/// Unchecked wire form of [`WindowSpec`]; deserialization goes through
/// [`WindowSpec::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct WindowSpecFields {
    item_count: usize,
    item_height: f64,
    viewport_height: f64,
    #[serde(default = "default_overscan")]
    overscan: usize,
}

#[cfg(feature = "serde")]
fn default_overscan() -> usize {
    DEFAULT_OVERSCAN
}

#[cfg(feature = "serde")]
impl TryFrom<WindowSpecFields> for WindowSpec {
    type Error = WindowError;

    fn try_from(fields: WindowSpecFields) -> Result<Self, WindowError> {
        Ok(WindowSpec::new(fields.item_count, fields.item_height, fields.viewport_height)?
            .with_overscan(fields.overscan))
    }
}

impl WindowSpec {
    /// Create a spec with [`DEFAULT_OVERSCAN`].
    ///
    /// Fails if either height is not a positive finite number.
    pub fn new(
        item_count: usize,
        item_height: f64,
        viewport_height: f64,
    ) -> Result<Self, WindowError> {
        Ok(Self {
            item_count,
            item_height: check_item_height(item_height)?,
            viewport_height: check_viewport_height(viewport_height)?,
            overscan: DEFAULT_OVERSCAN,
        })
    }

    /// Set the overscan count.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Set the overscan count from a signed value, rejecting negatives.
    pub fn try_with_overscan(self, overscan: i64) -> Result<Self, WindowError> {
        if overscan < 0 {
            return Err(WindowError::NegativeOverscan(overscan));
        }
        Ok(self.with_overscan(usize::try_from(overscan).unwrap_or(usize::MAX)))
    }

    /// Replace the item count (e.g. after the list was filtered).
    #[must_use]
    pub fn with_item_count(mut self, item_count: usize) -> Self {
        self.item_count = item_count;
        self
    }

    /// Replace the row height.
    pub fn with_item_height(mut self, item_height: f64) -> Result<Self, WindowError> {
        self.item_height = check_item_height(item_height)?;
        Ok(self)
    }

    /// Replace the viewport height (resize).
    pub fn with_viewport_height(mut self, viewport_height: f64) -> Result<Self, WindowError> {
        self.viewport_height = check_viewport_height(viewport_height)?;
        Ok(self)
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    #[inline]
    pub fn item_height(&self) -> f64 {
        self.item_height
    }

    #[inline]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    #[inline]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Height of the whole virtual content.
    #[inline]
    pub fn total_content_height(&self) -> f64 {
        self.item_count as f64 * self.item_height
    }

    /// Largest offset that still fills the viewport (0 when the content fits).
    #[inline]
    pub fn max_scroll_offset(&self) -> f64 {
        (self.total_content_height() - self.viewport_height).max(0.0)
    }

    /// Rows needed to cover the viewport.
    #[inline]
    pub fn visible_count(&self) -> usize {
        (self.viewport_height / self.item_height).ceil() as usize
    }

    /// Clamp an offset into `[0, max_scroll_offset]`. `NaN` maps to 0.
    pub fn clamp_offset(&self, offset: f64) -> f64 {
        if offset.is_nan() {
            return 0.0;
        }
        offset.clamp(0.0, self.max_scroll_offset())
    }

    /// Top edge of row `index` in content coordinates.
    #[inline]
    pub fn item_top(&self, index: usize) -> f64 {
        index as f64 * self.item_height
    }

    /// Row under a content offset, or `None` past either end.
    pub fn index_at(&self, offset: f64) -> Option<usize> {
        if offset.is_nan() || offset < 0.0 || offset >= self.total_content_height() {
            return None;
        }
        let index = (offset / self.item_height).floor() as usize;
        Some(index.min(self.item_count.saturating_sub(1)))
    }

    /// Compute the window for a scroll offset.
    pub fn window(&self, scroll_offset: f64) -> Window {
        let visible_count = self.visible_count();
        let total_content_height = self.total_content_height();

        if self.item_count == 0 {
            return Window {
                range: RenderRange::EMPTY,
                first_visible: 0,
                visible_count,
                effective_offset: 0.0,
                total_content_height,
            };
        }

        let last_index = self.item_count - 1;
        let effective_offset = self.clamp_offset(scroll_offset);
        let first_visible = ((effective_offset / self.item_height).floor() as usize).min(last_index);

        let start = first_visible.saturating_sub(self.overscan);
        let end_inclusive = first_visible
            .saturating_add(visible_count)
            .saturating_add(self.overscan)
            .min(last_index);

        Window {
            range: RenderRange::new(start, end_inclusive + 1),
            first_visible,
            visible_count,
            effective_offset,
            total_content_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(count: usize, item: f64, viewport: f64, overscan: usize) -> WindowSpec {
        WindowSpec::new(count, item, viewport)
            .expect("valid spec")
            .with_overscan(overscan)
    }

    #[test]
    fn top_of_hundred_cards() {
        let w = spec(100, 140.0, 600.0, 10).window(0.0);
        assert_eq!(w.visible_count, 5);
        assert_eq!(w.first_visible, 0);
        assert_eq!(w.range.start, 0);
        assert_eq!(w.range.end_inclusive(), Some(15));
        assert_eq!(w.total_content_height, 14_000.0);
    }

    #[test]
    fn ten_cards_scrolled() {
        let w = spec(100, 140.0, 600.0, 10).window(1400.0);
        assert_eq!(w.first_visible, 10);
        assert_eq!(w.range.start, 0);
        assert_eq!(w.range.end_inclusive(), Some(25));
    }

    #[test]
    fn short_list_fits_viewport() {
        for overscan in [0, 1, 10, 1_000] {
            let s = spec(3, 140.0, 600.0, overscan);
            let w = s.window(0.0);
            assert_eq!(w.range.as_inclusive(), Some(0..=2));
            assert_eq!(w.total_content_height, 420.0);
            assert!(w.total_content_height < s.viewport_height());
            assert_eq!(s.max_scroll_offset(), 0.0);
        }
    }

    #[test]
    fn empty_list_has_empty_range() {
        let w = spec(0, 20.0, 600.0, 5).window(300.0);
        assert!(w.range.is_empty());
        assert_eq!(w.range.end_inclusive(), None);
        assert_eq!(w.rendered_count(), 0);
        assert_eq!(w.total_content_height, 0.0);
        assert_eq!(w.effective_offset, 0.0);
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let s = spec(100, 10.0, 95.0, 2);
        let w = s.window(1_000_000.0);
        assert_eq!(w.effective_offset, 905.0);
        assert_eq!(w.first_visible, 90);
        assert_eq!(w.range.end_inclusive(), Some(99));
        assert_eq!(w.range.start, 88);
    }

    #[test]
    fn negative_and_nan_offsets_read_as_zero() {
        let s = spec(50, 10.0, 40.0, 0);
        assert_eq!(s.window(-25.0), s.window(0.0));
        assert_eq!(s.window(f64::NAN), s.window(0.0));
        assert_eq!(s.window(f64::NEG_INFINITY).effective_offset, 0.0);
        assert_eq!(s.window(f64::INFINITY).effective_offset, 460.0);
    }

    #[test]
    fn zero_overscan_covers_partial_rows() {
        // Offset 15 shows half of row 1 at the top and half of row 5 at the bottom.
        let w = spec(20, 10.0, 40.0, 0).window(15.0);
        assert_eq!(w.first_visible, 1);
        assert_eq!(w.range.as_inclusive(), Some(1..=5));
    }

    #[test]
    fn shrinking_list_reclamps() {
        let before = spec(1_000, 10.0, 100.0, 3);
        let w = before.window(9_000.0);
        assert_eq!(w.first_visible, 900);

        let after = before.with_item_count(12);
        let w = after.window(9_000.0);
        assert_eq!(w.effective_offset, 20.0);
        assert_eq!(w.first_visible, 2);
        assert_eq!(w.range.as_inclusive(), Some(0..=11));
    }

    #[test]
    fn non_positive_heights_fail_fast() {
        assert_eq!(
            WindowSpec::new(10, 0.0, 100.0),
            Err(WindowError::NonPositiveItemHeight(0.0))
        );
        assert_eq!(
            WindowSpec::new(10, 10.0, -1.0),
            Err(WindowError::NonPositiveViewportHeight(-1.0))
        );
        assert!(WindowSpec::new(10, f64::NAN, 100.0).is_err());
        assert!(spec(1, 1.0, 1.0, 0).with_item_height(-2.0).is_err());
        assert!(spec(1, 1.0, 1.0, 0).with_viewport_height(0.0).is_err());
    }

    #[test]
    fn negative_overscan_fails_fast() {
        let s = spec(10, 1.0, 5.0, 0);
        assert_eq!(
            s.try_with_overscan(-1),
            Err(WindowError::NegativeOverscan(-1))
        );
        assert_eq!(s.try_with_overscan(4).map(|s| s.overscan()), Ok(4));
    }

    #[test]
    fn default_overscan_applies() {
        let s = WindowSpec::new(10, 1.0, 5.0).expect("valid spec");
        assert_eq!(s.overscan(), DEFAULT_OVERSCAN);
    }

    #[test]
    fn index_at_maps_offsets_to_rows() {
        let s = spec(4, 3.0, 5.0, 0);
        assert_eq!(s.index_at(0.0), Some(0));
        assert_eq!(s.index_at(2.9), Some(0));
        assert_eq!(s.index_at(3.0), Some(1));
        assert_eq!(s.index_at(11.9), Some(3));
        assert_eq!(s.index_at(12.0), None);
        assert_eq!(s.index_at(-0.1), None);
        assert_eq!(s.item_top(3), 9.0);
    }

    #[test]
    fn fractional_heights() {
        let w = spec(10, 1.5, 4.0, 0).window(2.0);
        // ceil(4 / 1.5) = 3, floor(2 / 1.5) = 1
        assert_eq!(w.visible_count, 3);
        assert_eq!(w.first_visible, 1);
        assert_eq!(w.range.as_inclusive(), Some(1..=4));
    }

    #[test]
    fn render_range_helpers() {
        let r = RenderRange::new(3, 7);
        assert_eq!(r.len(), 4);
        assert!(r.contains(3));
        assert!(!r.contains(7));
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![3, 4, 5, 6]);
        assert_eq!(Range::from(r), 3..7);
        assert_eq!(RenderRange::new(5, 2), RenderRange::new(5, 5));
        assert!(RenderRange::new(5, 2).is_empty());
        assert_eq!(RenderRange::EMPTY.as_inclusive(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_validates_heights() {
        let err = serde_json::from_str::<WindowSpec>(
            r#"{"item_count":10,"item_height":0.0,"viewport_height":5.0,"overscan":0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("item height must be a positive finite number"));

        let err = serde_json::from_str::<WindowSpec>(
            r#"{"item_count":10,"item_height":1.0,"viewport_height":-2.0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("viewport height"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_accepts_valid_spec() {
        let original = spec(40, 2.0, 10.0, 3);
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(serde_json::from_str::<WindowSpec>(&json).unwrap(), original);

        let defaulted: WindowSpec =
            serde_json::from_str(r#"{"item_count":4,"item_height":1.0,"viewport_height":2.0}"#)
                .unwrap();
        assert_eq!(defaulted.overscan(), DEFAULT_OVERSCAN);
    }
}
