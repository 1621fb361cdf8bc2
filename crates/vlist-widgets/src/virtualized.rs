#![forbid(unsafe_code)]

//! Fixed-row virtualized list.
//!
//! Only items inside the render window (visible rows plus overscan on each
//! side) are materialized. Every item is `row_height` rows tall, so the
//! window comes straight from [`vlist_core::WindowSpec`] with rows as the
//! unit: item `i` sits at content row `i * row_height`, and the list draws it
//! at `i * row_height - scroll_offset` relative to the viewport top.
//!
//! # Materialization
//!
//! Each materialized item is rendered once into an off-screen buffer of
//! `content_width x row_height` cells and kept in a per-state cache keyed by
//! index. A render pass:
//!
//! 1. computes the window for the current offset,
//! 2. evicts cached rows that left the render range,
//! 3. invokes [`RenderItem::render`] only for indices that entered it,
//! 4. blits the visible slice of each cached row into the frame, clipping
//!    partially visible items at the top and bottom edges.
//!
//! Scrolling inside a row therefore redraws the frame without calling the
//! item renderer at all. The cache is dropped wholesale when the content
//! width, row height, item count, styles, source revision or the source
//! itself changes, and per index when the selection moves onto or off an
//! item. Sources edited in place must bump [`ItemSource::revision`] or
//! call [`VirtualizedListState::invalidate`].
//!
//! # Failure modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `row_height == 0` | [`VirtualizedList::new`] returns `WindowError::NonPositiveItemHeight` |
//! | empty area | nothing drawn, state untouched |
//! | empty source | base style only, state reset to offset 0 |
//! | selection past the end | clamped to the last item |

use std::time::Duration;

use ahash::AHashMap;
use vlist_core::{RenderRange, Rect, Window, WindowError, WindowSpec, DEFAULT_OVERSCAN};
use vlist_render::{Buffer, Frame, HitId, HitRegion, Style};
use web_time::Instant;

use crate::scrollbar::{Scrollbar, ScrollbarState};
use crate::source::ItemSource;
use crate::{StatefulWidget, draw_text};

/// An item that can draw itself into a row area.
pub trait RenderItem {
    /// Draw into `area`. The area is always exactly one item tall and the
    /// frame is an off-screen scratch target, so drawing may fill the whole
    /// area without clipping concerns.
    fn render(&self, area: Rect, frame: &mut Frame, selected: bool);
}

impl RenderItem for String {
    fn render(&self, area: Rect, frame: &mut Frame, selected: bool) {
        self.as_str().render(area, frame, selected);
    }
}

impl RenderItem for &str {
    fn render(&self, area: Rect, frame: &mut Frame, _selected: bool) {
        for (row, line) in self.lines().enumerate() {
            let Some(line_area) = u16::try_from(row).ok().and_then(|r| area.row(r)) else {
                break;
            };
            draw_text(frame, line_area, line, Style::default());
        }
    }
}

/// Where [`VirtualizedListState::scroll_to_index`] places the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Item top at the viewport top.
    Start,
    /// Item centered in the viewport.
    Center,
    /// Item bottom at the viewport bottom.
    End,
    /// Move as little as possible to make the item fully visible.
    #[default]
    Auto,
}

/// Counters from render passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Render passes over a non-empty source.
    pub passes: u64,
    /// Item renderer invocations over the lifetime of the state.
    pub items_rendered: u64,
    /// Item renderer invocations in the last pass.
    pub last_items_rendered: usize,
    /// Rows reused from the cache in the last pass.
    pub last_cache_hits: usize,
    /// Times the render range differed from the previous pass.
    pub range_changes: u64,
    /// Wall time of the last pass.
    pub last_duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    width: u16,
    row_height: u16,
    item_count: usize,
    revision: u64,
    source: SourceId,
    style: Style,
    highlight_style: Style,
}

/// Addresses of the source and of its first item. A replaced `Vec` moves
/// at least one of them, even at the same length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceId {
    source: usize,
    first_item: usize,
}

impl SourceId {
    fn of<S: ItemSource + ?Sized>(source: &S) -> Self {
        Self {
            source: std::ptr::from_ref(source).cast::<()>() as usize,
            first_item: source
                .get(0)
                .map_or(0, |item| std::ptr::from_ref(item) as usize),
        }
    }
}

#[derive(Debug, Default)]
struct RowCache {
    key: Option<CacheKey>,
    rows: AHashMap<usize, Buffer>,
}

impl RowCache {
    fn sync(&mut self, key: CacheKey) {
        if self.key != Some(key) {
            self.rows.clear();
            self.key = Some(key);
        }
    }

    fn retain_range(&mut self, range: RenderRange) {
        self.rows.retain(|index, _| range.contains(*index));
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.key = None;
    }
}

/// Scroll position, selection and render cache for a [`VirtualizedList`].
///
/// Scroll operations work in rows. Before the first render the list
/// geometry is unknown, so offsets are stored as given and clamped by the
/// next render. Afterwards they clamp immediately against the geometry of
/// the most recent pass.
#[derive(Debug)]
pub struct VirtualizedListState {
    selected: Option<usize>,
    scroll_offset: usize,
    overscan: usize,
    follow: bool,
    reveal: Option<(usize, Align)>,
    spec: Option<WindowSpec>,
    window: Option<Window>,
    cache: RowCache,
    stats: RenderStats,
    dirty: bool,
    persistence_id: Option<String>,
}

impl Default for VirtualizedListState {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualizedListState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            overscan: DEFAULT_OVERSCAN,
            follow: false,
            reveal: None,
            spec: None,
            window: None,
            cache: RowCache::default(),
            stats: RenderStats::default(),
            dirty: true,
            persistence_id: None,
        }
    }

    /// Items materialized beyond each viewport edge.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    #[must_use]
    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    #[must_use]
    pub fn with_persistence_id(mut self, id: impl Into<String>) -> Self {
        self.persistence_id = Some(id.into());
        self
    }

    pub fn persistence_id(&self) -> Option<&str> {
        self.persistence_id.as_deref()
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.overscan != overscan {
            self.overscan = overscan;
            self.dirty = true;
        }
    }

    /// First content row at the viewport top.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn follow_mode(&self) -> bool {
        self.follow
    }

    /// Window computed by the last render.
    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    /// Indices materialized by the last render.
    pub fn materialized(&self) -> RenderRange {
        self.window.map(|w| w.range).unwrap_or_default()
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Whether anything changed since the last render.
    pub fn needs_render(&self) -> bool {
        self.dirty
    }

    /// Drop every cached row so the next pass re-renders all materialized
    /// items.
    pub fn invalidate(&mut self) {
        self.cache.clear();
        self.dirty = true;
    }

    /// Drop the cached row for one item.
    pub fn invalidate_index(&mut self, index: usize) {
        if self.cache.rows.remove(&index).is_some() {
            self.dirty = true;
        }
    }

    fn max_offset(&self) -> Option<usize> {
        self.spec.map(|s| s.max_scroll_offset() as usize)
    }

    fn viewport_rows(&self) -> usize {
        self.spec.map_or(1, |s| s.viewport_height() as usize).max(1)
    }

    fn set_offset(&mut self, offset: usize) -> bool {
        let clamped = self.max_offset().map_or(offset, |max| offset.min(max));
        if clamped == self.scroll_offset {
            return false;
        }
        self.scroll_offset = clamped;
        self.dirty = true;
        true
    }

    /// Scroll by `delta` rows (positive is down). Leaves follow mode.
    pub fn scroll_by(&mut self, delta: i64) -> bool {
        if delta == 0 {
            return false;
        }
        self.follow = false;
        self.reveal = None;
        let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
        let target = if delta < 0 {
            self.scroll_offset.saturating_sub(magnitude)
        } else {
            self.scroll_offset.saturating_add(magnitude)
        };
        self.set_offset(target)
    }

    /// Jump to an absolute row offset. Leaves follow mode.
    pub fn scroll_to_offset(&mut self, offset: usize) -> bool {
        self.follow = false;
        self.reveal = None;
        self.set_offset(offset)
    }

    /// Bring item `index` into view with the given alignment.
    ///
    /// Resolved immediately when the geometry is known, otherwise on the
    /// next render.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> bool {
        self.follow = false;
        match self.spec {
            Some(spec) => {
                self.reveal = None;
                let target = aligned_offset(&spec, self.scroll_offset, index, align);
                self.set_offset(target)
            }
            None => {
                self.reveal = Some((index, align));
                self.dirty = true;
                true
            }
        }
    }

    pub fn scroll_to_top(&mut self) -> bool {
        self.scroll_to_offset(0)
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        self.reveal = None;
        self.set_offset(self.max_offset().unwrap_or(usize::MAX))
    }

    pub fn page_up(&mut self) -> bool {
        self.scroll_by(-(self.viewport_rows() as i64))
    }

    pub fn page_down(&mut self) -> bool {
        self.scroll_by(self.viewport_rows() as i64)
    }

    /// Whether the viewport shows the last row of content.
    pub fn is_at_bottom(&self) -> bool {
        self.max_offset()
            .is_none_or(|max| self.scroll_offset >= max)
    }

    /// Follow mode pins the viewport to the bottom on every render.
    pub fn set_follow(&mut self, follow: bool) {
        self.follow = follow;
        if follow {
            self.scroll_to_bottom();
        }
        self.dirty = true;
    }

    /// Select an item without scrolling.
    pub fn select(&mut self, index: Option<usize>) -> bool {
        if self.selected == index {
            return false;
        }
        self.flip_selection(index);
        true
    }

    /// Select the next item and scroll it into view.
    pub fn select_next(&mut self) -> bool {
        let count = self.spec.map(|s| s.item_count());
        if count == Some(0) {
            return self.select(None);
        }
        let next = match self.selected {
            None => 0,
            Some(i) => count.map_or(i + 1, |n| (i + 1).min(n - 1)),
        };
        self.select_and_reveal(next)
    }

    /// Select the previous item and scroll it into view.
    pub fn select_previous(&mut self) -> bool {
        if self.spec.is_some_and(|s| s.item_count() == 0) {
            return self.select(None);
        }
        let prev = self.selected.map_or(0, |i| i.saturating_sub(1));
        self.select_and_reveal(prev)
    }

    fn select_and_reveal(&mut self, index: usize) -> bool {
        let changed = self.select(Some(index));
        let scrolled = self.scroll_to_index(index, Align::Auto);
        changed || scrolled
    }

    fn flip_selection(&mut self, index: Option<usize>) {
        for old in self.selected.into_iter().chain(index) {
            self.cache.rows.remove(&old);
        }
        self.selected = index;
        self.dirty = true;
    }

    /// Item under viewport row `row` (0 = top of the list area) as of the
    /// last render.
    pub fn index_at_row(&self, row: u16) -> Option<usize> {
        let spec = self.spec?;
        if f64::from(row) >= spec.viewport_height() {
            return None;
        }
        spec.index_at(self.scroll_offset as f64 + f64::from(row))
    }

    /// Snapshot of the user-facing state.
    pub fn save_state(&self) -> VirtualizedListPersistState {
        VirtualizedListPersistState {
            selected: self.selected,
            scroll_offset: self.scroll_offset,
            follow_mode: self.follow,
        }
    }

    /// Restore a snapshot. Values are clamped by the next render.
    pub fn restore_state(&mut self, state: VirtualizedListPersistState) {
        self.selected = state.selected;
        self.scroll_offset = state.scroll_offset;
        self.follow = state.follow_mode;
        self.reveal = None;
        self.invalidate();
    }
}

/// Offset that places item `index` according to `align`.
fn aligned_offset(spec: &WindowSpec, current: usize, index: usize, align: Align) -> usize {
    let h = spec.item_height() as usize;
    let viewport = spec.viewport_height() as usize;
    let index = index.min(spec.item_count().saturating_sub(1));
    let top = index.saturating_mul(h);
    let bottom = top.saturating_add(h);
    let start = top;
    let end = bottom.saturating_sub(viewport);
    match align {
        Align::Start => start,
        Align::End => end,
        Align::Center => (top + h / 2).saturating_sub(viewport / 2),
        Align::Auto => {
            if top < current || h > viewport {
                start
            } else if bottom > current + viewport {
                end
            } else {
                current
            }
        }
    }
}

/// Persistable part of [`VirtualizedListState`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct VirtualizedListPersistState {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub follow_mode: bool,
}

/// A list over an [`ItemSource`] whose items all occupy `row_height` rows.
#[derive(Debug)]
pub struct VirtualizedList<'a, S: ?Sized> {
    source: &'a S,
    row_height: u16,
    style: Style,
    highlight_style: Style,
    show_scrollbar: bool,
    scrollbar: Scrollbar,
    hit_id: Option<HitId>,
}

impl<'a, S: ItemSource + ?Sized> VirtualizedList<'a, S> {
    /// Fails when `row_height` is zero.
    pub fn new(source: &'a S, row_height: u16) -> Result<Self, WindowError> {
        if row_height == 0 {
            return Err(WindowError::NonPositiveItemHeight(0.0));
        }
        Ok(Self {
            source,
            row_height,
            style: Style::default(),
            highlight_style: Style::default(),
            show_scrollbar: true,
            scrollbar: Scrollbar::new(),
            hit_id: None,
        })
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Style layered over the selected item before it renders itself.
    #[must_use]
    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    /// Reserve the rightmost column for a scrollbar when content overflows.
    #[must_use]
    pub fn show_scrollbar(mut self, show: bool) -> Self {
        self.show_scrollbar = show;
        self
    }

    #[must_use]
    pub fn scrollbar(mut self, scrollbar: Scrollbar) -> Self {
        self.scrollbar = scrollbar;
        self
    }

    /// Register each visible item row as [`HitRegion::Content`] with the item
    /// index as hit data, and the scrollbar (when shown) as
    /// [`HitRegion::Scrollbar`].
    #[must_use]
    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = Some(id);
        self.scrollbar = self.scrollbar.hit_id(id);
        self
    }

    pub fn row_height(&self) -> u16 {
        self.row_height
    }
}

impl<S> StatefulWidget for VirtualizedList<'_, S>
where
    S: ItemSource + ?Sized,
    S::Item: RenderItem,
{
    type State = VirtualizedListState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut VirtualizedListState) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "VirtualizedList",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height,
            items = self.source.len()
        )
        .entered();

        if area.is_empty() {
            return;
        }
        let started = Instant::now();
        frame.buffer.set_style_area(area, self.style);

        let item_count = self.source.len();
        let Ok(spec) = WindowSpec::new(
            item_count,
            f64::from(self.row_height),
            f64::from(area.height),
        ) else {
            return;
        };
        let spec = spec.with_overscan(state.overscan);
        state.spec = Some(spec);

        if item_count == 0 {
            state.selected = None;
            state.scroll_offset = 0;
            state.window = Some(spec.window(0.0));
            state.cache.clear();
            state.dirty = false;
            return;
        }

        if let Some(selected) = state.selected
            && selected >= item_count
        {
            state.flip_selection(Some(item_count - 1));
        }

        let max_offset = spec.max_scroll_offset() as usize;
        if state.follow {
            state.scroll_offset = max_offset;
        } else if let Some((index, align)) = state.reveal.take() {
            state.scroll_offset = aligned_offset(&spec, state.scroll_offset, index, align);
        }
        state.scroll_offset = state.scroll_offset.min(max_offset);

        let window = spec.window(state.scroll_offset as f64);
        let range = window.range;
        if state.window.is_some_and(|w| w.range != range) {
            state.stats.range_changes += 1;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                start = range.start,
                end = range.end,
                "virtualized list render range changed"
            );
        }
        state.window = Some(window);

        let needs_scrollbar = self.show_scrollbar && spec.total_content_height() > f64::from(area.height);
        let (content, bar) = if needs_scrollbar {
            area.split_right(1)
        } else {
            (area, Rect::default())
        };

        state.cache.sync(CacheKey {
            width: content.width,
            row_height: self.row_height,
            item_count,
            revision: self.source.revision(),
            source: SourceId::of(self.source),
            style: self.style,
            highlight_style: self.highlight_style,
        });
        state.cache.retain_range(range);

        let mut rendered = 0;
        let mut hits = 0;
        let row_height = i64::from(self.row_height);
        let offset = state.scroll_offset as i64;
        for index in range.iter() {
            if state.cache.rows.contains_key(&index) {
                hits += 1;
            } else {
                let Some(item) = self.source.get(index) else {
                    continue;
                };
                let selected = state.selected == Some(index);
                let buffer = self.materialize(item, content.width, selected);
                state.cache.rows.insert(index, buffer);
                rendered += 1;
            }
            let Some(row) = state.cache.rows.get(&index) else {
                continue;
            };

            // Clip to the viewport.
            let top = index as i64 * row_height - offset;
            let bottom = top + row_height;
            let visible_top = top.max(0);
            let visible_bottom = bottom.min(i64::from(content.height));
            if visible_top >= visible_bottom {
                continue;
            }
            let dst = Rect::new(
                content.x,
                content.y + visible_top as u16,
                content.width,
                (visible_bottom - visible_top) as u16,
            );
            frame.buffer.copy_rows_from(row, (visible_top - top) as u16, dst);
            if let Some(id) = self.hit_id {
                frame.register_hit(dst, id, HitRegion::Content, index as u64);
            }
        }

        if needs_scrollbar {
            let mut bar_state = ScrollbarState::new(
                spec.total_content_height() as usize,
                state.scroll_offset,
                usize::from(area.height),
            );
            self.scrollbar.render(bar, frame, &mut bar_state);
        }

        state.stats.passes += 1;
        state.stats.items_rendered += rendered as u64;
        state.stats.last_items_rendered = rendered;
        state.stats.last_cache_hits = hits;
        state.stats.last_duration = started.elapsed();
        state.dirty = false;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            materialized = range.len(),
            rendered,
            cache_hits = hits,
            "virtualized list rendered"
        );
    }
}

impl<S: ItemSource + ?Sized> VirtualizedList<'_, S>
where
    S::Item: RenderItem,
{
    fn materialize(&self, item: &S::Item, width: u16, selected: bool) -> Buffer {
        let mut scratch = Frame::new(width, self.row_height);
        let area = scratch.area();
        scratch.buffer.set_style_area(area, self.style);
        if selected {
            scratch.buffer.set_style_area(area, self.highlight_style);
        }
        item.render(area, &mut scratch, selected);
        scratch.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;
    use vlist_render::{Color, StyleFlags};

    /// Draws `#<index>` on its first row and counts renderer calls.
    struct Counted<'a> {
        index: usize,
        calls: &'a StdCell<usize>,
    }

    impl RenderItem for Counted<'_> {
        fn render(&self, area: Rect, frame: &mut Frame, selected: bool) {
            self.calls.set(self.calls.get() + 1);
            let marker = if selected { '>' } else { '#' };
            let text = format!("{marker}{}", self.index);
            frame.buffer.set_string(area.x, area.y, &text, area.width, Style::default());
            for row in 1..area.height {
                frame
                    .buffer
                    .set_string(area.x, area.y + row, &format!("r{row}"), area.width, Style::default());
            }
        }
    }

    fn counted(n: usize, calls: &StdCell<usize>) -> Vec<Counted<'_>> {
        (0..n).map(|index| Counted { index, calls }).collect()
    }

    fn render<S>(list: &VirtualizedList<'_, S>, frame: &mut Frame, state: &mut VirtualizedListState)
    where
        S: ItemSource + ?Sized,
        S::Item: RenderItem,
    {
        frame.clear();
        let area = frame.area();
        list.render(area, frame, state);
    }

    #[test]
    fn zero_row_height_is_rejected() {
        let items = vec!["a"];
        assert_eq!(
            VirtualizedList::new(&items, 0).err(),
            Some(WindowError::NonPositiveItemHeight(0.0))
        );
    }

    #[test]
    fn materializes_only_the_window() {
        let calls = StdCell::new(0);
        let items = counted(10_000, &calls);
        let list = VirtualizedList::new(&items, 1).unwrap().show_scrollbar(false);
        let mut state = VirtualizedListState::new().with_overscan(2);
        let mut frame = Frame::new(10, 5);
        render(&list, &mut frame, &mut state);

        // visible 5 plus overscan 2 below, clamped at the top
        assert_eq!(state.materialized(), RenderRange::new(0, 8));
        assert_eq!(calls.get(), 8);
        assert_eq!(frame.buffer.row_text(0).trim_end(), "#0");
        assert_eq!(frame.buffer.row_text(4).trim_end(), "#4");
    }

    #[test]
    fn scrolling_within_range_reuses_cache() {
        let calls = StdCell::new(0);
        let items = counted(1_000, &calls);
        let list = VirtualizedList::new(&items, 1).unwrap().show_scrollbar(false);
        let mut state = VirtualizedListState::new().with_overscan(3);
        let mut frame = Frame::new(10, 4);
        render(&list, &mut frame, &mut state);
        let first = calls.get();

        assert!(state.scroll_by(20));
        render(&list, &mut frame, &mut state);
        let after_jump = calls.get();
        assert!(after_jump > first);

        // one row down: one new item enters, one leaves
        assert!(state.scroll_by(1));
        render(&list, &mut frame, &mut state);
        assert_eq!(calls.get(), after_jump + 1);
        assert_eq!(state.stats().last_items_rendered, 1);
        assert_eq!(frame.buffer.row_text(0).trim_end(), "#21");
    }

    #[test]
    fn tall_rows_clip_at_both_edges() {
        let calls = StdCell::new(0);
        let items = counted(50, &calls);
        let list = VirtualizedList::new(&items, 3).unwrap().show_scrollbar(false);
        let mut state = VirtualizedListState::new().with_overscan(0);
        let mut frame = Frame::new(8, 5);
        state.scroll_to_offset(4);
        render(&list, &mut frame, &mut state);

        // offset 4: item 1 shows its rows 1..3, item 2 fully, nothing of item 3
        assert_eq!(
            frame.buffer.to_lines(),
            vec!["r1", "r2", "#2", "r1", "r2"]
        );
        assert_eq!(state.window().map(|w| w.first_visible), Some(1));
        assert_eq!(state.materialized(), RenderRange::new(1, 4));
    }

    #[test]
    fn offset_clamps_to_last_page() {
        let items: Vec<String> = (0..10).map(|i| format!("item {i}")).collect();
        let list = VirtualizedList::new(&items, 1).unwrap().show_scrollbar(false);
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(10, 4);
        state.scroll_to_offset(1_000);
        render(&list, &mut frame, &mut state);
        assert_eq!(state.scroll_offset(), 6);
        assert!(state.is_at_bottom());
        assert_eq!(frame.buffer.row_text(3).trim_end(), "item 9");

        // clamps immediately once geometry is known
        assert!(!state.scroll_by(5));
        assert!(state.scroll_by(-2));
        assert_eq!(state.scroll_offset(), 4);
    }

    #[test]
    fn fewer_items_than_viewport() {
        let items = vec!["a", "b", "c"];
        let list = VirtualizedList::new(&items, 1).unwrap();
        let mut state = VirtualizedListState::new().with_overscan(10);
        let mut frame = Frame::new(6, 6);
        render(&list, &mut frame, &mut state);
        assert_eq!(state.materialized(), RenderRange::new(0, 3));
        assert_eq!(frame.buffer.to_lines(), vec!["a", "b", "c", "", "", ""]);
        assert_eq!(state.window().map(|w| w.total_content_height), Some(3.0));
    }

    #[test]
    fn empty_source_resets_state() {
        let items: Vec<&str> = Vec::new();
        let list = VirtualizedList::new(&items, 2).unwrap();
        let mut state = VirtualizedListState::new();
        state.select(Some(3));
        state.scroll_to_offset(9);
        let mut frame = Frame::new(5, 5);
        render(&list, &mut frame, &mut state);
        assert!(state.materialized().is_empty());
        assert_eq!(state.selected(), None);
        assert_eq!(state.scroll_offset(), 0);
        assert!(!state.select_next());
    }

    #[test]
    fn scrollbar_reserves_a_column_on_overflow() {
        let items: Vec<String> = (0..100).map(|i| format!("{i:>5}")).collect();
        let list = VirtualizedList::new(&items, 1).unwrap();
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(6, 4);
        render(&list, &mut frame, &mut state);
        // content width 5, last column is the bar
        assert_eq!(frame.buffer.row_text(0), "    0█");
        assert_eq!(frame.buffer.row_text(3), "    3│");
    }

    #[test]
    fn no_scrollbar_without_overflow() {
        let items = vec!["x"; 3];
        let list = VirtualizedList::new(&items, 1).unwrap();
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(4, 4);
        render(&list, &mut frame, &mut state);
        assert!(frame.buffer.get(3, 0).is_some_and(|c| c.is_empty()));
    }

    #[test]
    fn selection_rerenders_only_affected_rows() {
        let calls = StdCell::new(0);
        let items = counted(100, &calls);
        let list = VirtualizedList::new(&items, 1)
            .unwrap()
            .show_scrollbar(false)
            .highlight_style(Style::new().bg(Color::Blue).reverse());
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(6, 5);
        render(&list, &mut frame, &mut state);
        let base = calls.get();

        assert!(state.select_next());
        render(&list, &mut frame, &mut state);
        assert_eq!(calls.get(), base + 1);
        assert_eq!(frame.buffer.row_text(0).trim_end(), ">0");
        let cell = frame.buffer.get(5, 0).copied().unwrap_or_default();
        assert_eq!(cell.bg, Color::Blue);
        assert!(cell.flags.contains(StyleFlags::REVERSE));

        assert!(state.select_next());
        render(&list, &mut frame, &mut state);
        assert_eq!(calls.get(), base + 3);
        assert_eq!(frame.buffer.row_text(0).trim_end(), "#0");
        assert_eq!(frame.buffer.row_text(1).trim_end(), ">1");
    }

    #[test]
    fn select_next_scrolls_into_view() {
        let items: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let list = VirtualizedList::new(&items, 2).unwrap().show_scrollbar(false);
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(4, 6);
        render(&list, &mut frame, &mut state);
        for _ in 0..4 {
            state.select_next();
        }
        // item 3 spans rows 6..8; bottom-aligned in a 6-row viewport
        assert_eq!(state.selected(), Some(3));
        assert_eq!(state.scroll_offset(), 2);
        state.select(Some(49));
        state.select_next();
        assert_eq!(state.selected(), Some(49));
        assert!(state.is_at_bottom());
        assert!(state.select_previous());
        assert_eq!(state.selected(), Some(48));
    }

    #[test]
    fn scroll_to_index_alignments() {
        let items = vec!["x"; 100];
        let list = VirtualizedList::new(&items, 2).unwrap().show_scrollbar(false);
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(4, 10);
        render(&list, &mut frame, &mut state);

        state.scroll_to_index(20, Align::Start);
        assert_eq!(state.scroll_offset(), 40);
        state.scroll_to_index(20, Align::End);
        assert_eq!(state.scroll_offset(), 32);
        state.scroll_to_index(20, Align::Center);
        assert_eq!(state.scroll_offset(), 36);
        // already visible: Auto leaves the offset alone
        assert!(!state.scroll_to_index(19, Align::Auto));
        state.scroll_to_index(99, Align::Start);
        assert_eq!(state.scroll_offset(), 190);
    }

    #[test]
    fn reveal_before_first_render_is_deferred() {
        let items = vec!["x"; 100];
        let list = VirtualizedList::new(&items, 1).unwrap().show_scrollbar(false);
        let mut state = VirtualizedListState::new();
        assert!(state.scroll_to_index(50, Align::Start));
        let mut frame = Frame::new(4, 10);
        render(&list, &mut frame, &mut state);
        assert_eq!(state.scroll_offset(), 50);
    }

    #[test]
    fn follow_mode_tracks_appends() {
        let mut items: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let mut state = VirtualizedListState::new().with_follow(true);
        let mut frame = Frame::new(4, 3);
        {
            let list = VirtualizedList::new(&items, 1).unwrap().show_scrollbar(false);
            render(&list, &mut frame, &mut state);
        }
        assert_eq!(state.scroll_offset(), 7);
        items.push("10".into());
        {
            let list = VirtualizedList::new(&items, 1).unwrap().show_scrollbar(false);
            render(&list, &mut frame, &mut state);
        }
        assert_eq!(state.scroll_offset(), 8);
        assert_eq!(frame.buffer.row_text(2).trim_end(), "10");

        state.scroll_by(-1);
        assert!(!state.follow_mode());
    }

    #[test]
    fn page_moves_by_viewport() {
        let items = vec!["x"; 100];
        let list = VirtualizedList::new(&items, 1).unwrap();
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(4, 7);
        render(&list, &mut frame, &mut state);
        assert!(state.page_down());
        assert_eq!(state.scroll_offset(), 7);
        assert!(state.page_up());
        assert!(!state.page_up());
        assert!(state.scroll_to_bottom());
        assert_eq!(state.scroll_offset(), 93);
        assert!(state.scroll_to_top());
    }

    #[test]
    fn hit_regions_map_rows_to_items() {
        let items = vec!["x"; 40];
        let list = VirtualizedList::new(&items, 2)
            .unwrap()
            .hit_id(HitId::new(9));
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::with_hit_grid(5, 6);
        state.scroll_to_offset(3);
        render(&list, &mut frame, &mut state);

        let hit = frame.hit_test(0, 0).map(|h| (h.id, h.region, h.data));
        assert_eq!(hit, Some((HitId::new(9), HitRegion::Content, 1)));
        assert_eq!(frame.hit_test(0, 1).map(|h| h.data), Some(2));
        assert_eq!(frame.hit_test(4, 1).map(|h| h.region), Some(HitRegion::Scrollbar));
        assert_eq!(state.index_at_row(0), Some(1));
        assert_eq!(state.index_at_row(5), Some(4));
        assert_eq!(state.index_at_row(6), None);
    }

    #[test]
    fn width_change_invalidates_cache() {
        let calls = StdCell::new(0);
        let items = counted(20, &calls);
        let list = VirtualizedList::new(&items, 1).unwrap().show_scrollbar(false);
        let mut state = VirtualizedListState::new().with_overscan(0);
        let mut frame = Frame::new(6, 3);
        render(&list, &mut frame, &mut state);
        render(&list, &mut frame, &mut state);
        // three visible rows plus the partial-row slot below them
        assert_eq!(calls.get(), 4);

        let mut wider = Frame::new(8, 3);
        render(&list, &mut wider, &mut state);
        assert_eq!(calls.get(), 8);

        state.invalidate();
        assert!(state.needs_render());
        render(&list, &mut wider, &mut state);
        assert_eq!(calls.get(), 12);
        assert!(!state.needs_render());
    }

    #[test]
    fn revision_change_invalidates_cache() {
        struct Versioned<'a> {
            items: Vec<Counted<'a>>,
            revision: u64,
        }
        impl<'a> ItemSource for Versioned<'a> {
            type Item = Counted<'a>;
            fn len(&self) -> usize {
                self.items.len()
            }
            fn get(&self, index: usize) -> Option<&Counted<'a>> {
                self.items.get(index)
            }
            fn revision(&self) -> u64 {
                self.revision
            }
        }

        let calls = StdCell::new(0);
        let mut source = Versioned {
            items: counted(10, &calls),
            revision: 0,
        };
        let mut state = VirtualizedListState::new().with_overscan(0);
        let mut frame = Frame::new(6, 2);
        render(
            &VirtualizedList::new(&source, 1).unwrap(),
            &mut frame,
            &mut state,
        );
        source.revision = 1;
        render(
            &VirtualizedList::new(&source, 1).unwrap(),
            &mut frame,
            &mut state,
        );
        assert_eq!(calls.get(), 6);
    }

    #[test]
    fn same_length_replacement_shows_new_items() {
        let before = vec!["alpha", "beta"];
        let after = vec!["gamma", "delta"];
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(8, 3);
        render(
            &VirtualizedList::new(&before, 1).unwrap(),
            &mut frame,
            &mut state,
        );
        assert_eq!(frame.buffer.row_text(0).trim_end(), "alpha");

        render(
            &VirtualizedList::new(&after, 1).unwrap(),
            &mut frame,
            &mut state,
        );
        assert_eq!(frame.buffer.row_text(0).trim_end(), "gamma");
        assert_eq!(frame.buffer.row_text(1).trim_end(), "delta");
        assert_eq!(state.stats().last_items_rendered, 2);
    }

    #[test]
    fn reassigned_vec_shows_new_items() {
        let mut items = vec![String::from("old one"), String::from("old two")];
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(8, 3);
        render(
            &VirtualizedList::new(&items, 1).unwrap(),
            &mut frame,
            &mut state,
        );
        items = vec![String::from("new one"), String::from("new two")];
        render(
            &VirtualizedList::new(&items, 1).unwrap(),
            &mut frame,
            &mut state,
        );
        assert_eq!(frame.buffer.row_text(0).trim_end(), "new one");
        assert_eq!(frame.buffer.row_text(1).trim_end(), "new two");
    }

    #[test]
    fn style_change_invalidates_cache() {
        let items = vec!["a", "b"];
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(4, 2);
        render(
            &VirtualizedList::new(&items, 1).unwrap(),
            &mut frame,
            &mut state,
        );
        render(
            &VirtualizedList::new(&items, 1)
                .unwrap()
                .style(Style::new().bg(Color::Blue)),
            &mut frame,
            &mut state,
        );
        assert_eq!(state.stats().last_items_rendered, 2);
        assert_eq!(frame.buffer.get(3, 1).map(|c| c.bg), Some(Color::Blue));
    }

    #[test]
    fn selection_past_end_is_clamped() {
        let items = vec!["a", "b"];
        let list = VirtualizedList::new(&items, 1).unwrap();
        let mut state = VirtualizedListState::new();
        state.select(Some(10));
        let mut frame = Frame::new(4, 4);
        render(&list, &mut frame, &mut state);
        assert_eq!(state.selected(), Some(1));
    }

    #[test]
    fn range_changes_are_counted() {
        let items = vec!["x"; 100];
        let list = VirtualizedList::new(&items, 3).unwrap().show_scrollbar(false);
        let mut state = VirtualizedListState::new().with_overscan(1);
        let mut frame = Frame::new(4, 6);
        render(&list, &mut frame, &mut state);
        state.scroll_by(1);
        render(&list, &mut frame, &mut state);
        state.scroll_by(1);
        render(&list, &mut frame, &mut state);
        assert_eq!(state.stats().range_changes, 0);
        state.scroll_by(1);
        render(&list, &mut frame, &mut state);
        assert_eq!(state.stats().range_changes, 1);
        assert_eq!(state.stats().passes, 4);
    }

    #[test]
    fn persist_round_trip() {
        let mut state = VirtualizedListState::new().with_persistence_id("inbox");
        state.select(Some(4));
        state.scroll_to_offset(12);
        state.set_follow(true);
        let saved = state.save_state();
        let mut restored = VirtualizedListState::new();
        restored.restore_state(saved.clone());
        assert_eq!(restored.save_state(), saved);
        assert_eq!(state.persistence_id(), Some("inbox"));
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn persist_state_serializes() {
        let saved = VirtualizedListPersistState {
            selected: Some(2),
            scroll_offset: 30,
            follow_mode: false,
        };
        let json = serde_json::to_string(&saved).unwrap();
        let back: VirtualizedListPersistState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, saved);
    }

    #[test]
    fn string_items_render_lines() {
        let items = vec![String::from("from\nsubject"), String::from("x\ny")];
        let list = VirtualizedList::new(&items, 2).unwrap().show_scrollbar(false);
        let mut state = VirtualizedListState::new();
        let mut frame = Frame::new(8, 4);
        render(&list, &mut frame, &mut state);
        assert_eq!(frame.buffer.to_lines(), vec!["from", "subject", "x", "y"]);
    }
}
