#![forbid(unsafe_code)]

//! Vertical scrollbar.
//!
//! The thumb length is proportional to `viewport / content` and its position
//! to `position / (content - viewport)`, so the bar conveys the full content
//! height the way a sized scroll spacer would.

use vlist_core::Rect;
use vlist_render::{Cell, Frame, HitId, HitRegion, Style};

use crate::StatefulWidget;

/// Scroll extent in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollbarState {
    /// Total content height.
    pub content_length: usize,
    /// Current scroll offset.
    pub position: usize,
    /// Visible height.
    pub viewport_length: usize,
}

impl ScrollbarState {
    pub fn new(content_length: usize, position: usize, viewport_length: usize) -> Self {
        Self {
            content_length,
            position,
            viewport_length,
        }
    }

    /// Whether the content is taller than the viewport.
    pub fn is_scrollable(&self) -> bool {
        self.content_length > self.viewport_length
    }

    fn max_position(&self) -> usize {
        self.content_length.saturating_sub(self.viewport_length)
    }

    /// Thumb `(start, length)` within a track of `track` cells.
    ///
    /// A non-scrollable state fills the whole track. The thumb is at least
    /// one cell and touches the end of the track exactly at the maximum
    /// position.
    pub fn thumb(&self, track: u16) -> (u16, u16) {
        if track == 0 {
            return (0, 0);
        }
        if !self.is_scrollable() {
            return (0, track);
        }
        let track_len = track as usize;
        let len = (track_len * self.viewport_length)
            .div_ceil(self.content_length)
            .clamp(1, track_len);
        let travel = track_len - len;
        let max = self.max_position();
        let pos = self.position.min(max);
        // Round to nearest so both ends are reachable.
        let start = (travel * pos + max / 2) / max;
        (start as u16, len as u16)
    }

    /// Scroll position that puts the thumb's top at `row` of the track.
    pub fn position_for_row(&self, row: u16, track: u16) -> usize {
        let (_, len) = self.thumb(track);
        let travel = usize::from(track.saturating_sub(len));
        if travel == 0 {
            return 0;
        }
        let row = usize::from(row).min(travel);
        (row * self.max_position() + travel / 2) / travel
    }
}

/// Track and thumb glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarSymbols {
    pub track: char,
    pub thumb: char,
}

impl Default for ScrollbarSymbols {
    fn default() -> Self {
        Self {
            track: '│',
            thumb: '█',
        }
    }
}

/// One-column vertical scrollbar drawn at the left edge of its area.
#[derive(Debug, Clone, Default)]
pub struct Scrollbar {
    symbols: ScrollbarSymbols,
    track_style: Style,
    thumb_style: Style,
    hit_id: Option<HitId>,
}

impl Scrollbar {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn symbols(mut self, symbols: ScrollbarSymbols) -> Self {
        self.symbols = symbols;
        self
    }

    #[must_use]
    pub fn track_style(mut self, style: Style) -> Self {
        self.track_style = style;
        self
    }

    #[must_use]
    pub fn thumb_style(mut self, style: Style) -> Self {
        self.thumb_style = style;
        self
    }

    /// Register the track as a [`HitRegion::Scrollbar`]; the hit data is the
    /// track row.
    #[must_use]
    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = Some(id);
        self
    }
}

impl StatefulWidget for Scrollbar {
    type State = ScrollbarState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut ScrollbarState) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Scrollbar",
            x = area.x,
            y = area.y,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        let (start, len) = state.thumb(area.height);
        for row in 0..area.height {
            let on_thumb = row >= start && row < start + len;
            let (ch, style) = if on_thumb {
                (self.symbols.thumb, self.thumb_style)
            } else {
                (self.symbols.track, self.track_style)
            };
            frame
                .buffer
                .set(area.x, area.y + row, Cell::from_char(ch).with_style(style));
            if let Some(id) = self.hit_id {
                frame.register_hit(
                    Rect::new(area.x, area.y + row, 1, 1),
                    id,
                    HitRegion::Scrollbar,
                    u64::from(row),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscrollable_fills_track() {
        let state = ScrollbarState::new(5, 0, 10);
        assert!(!state.is_scrollable());
        assert_eq!(state.thumb(8), (0, 8));
    }

    #[test]
    fn thumb_is_proportional() {
        let state = ScrollbarState::new(100, 0, 10);
        assert_eq!(state.thumb(10), (0, 1));
        let state = ScrollbarState::new(40, 0, 20);
        assert_eq!(state.thumb(20), (0, 10));
    }

    #[test]
    fn thumb_reaches_track_end_at_max() {
        let state = ScrollbarState::new(300, 280, 20);
        let (start, len) = state.thumb(20);
        assert_eq!(start + len, 20);
    }

    #[test]
    fn thumb_position_is_monotonic() {
        let mut last = 0;
        for pos in 0..=280 {
            let (start, _) = ScrollbarState::new(300, pos, 20).thumb(20);
            assert!(start >= last);
            last = start;
        }
    }

    #[test]
    fn position_for_row_inverts_thumb() {
        let state = ScrollbarState::new(300, 0, 20);
        let (_, len) = state.thumb(20);
        assert_eq!(state.position_for_row(0, 20), 0);
        assert_eq!(state.position_for_row(20 - len, 20), 280);
        assert_eq!(state.position_for_row(99, 20), 280);
    }

    #[test]
    fn renders_thumb_and_registers_hits() {
        let mut frame = Frame::with_hit_grid(1, 4);
        let mut state = ScrollbarState::new(8, 4, 4);
        Scrollbar::new()
            .hit_id(HitId::new(5))
            .render(frame.area(), &mut frame, &mut state);
        let column: Vec<String> = frame.buffer.to_lines();
        assert_eq!(column, vec!["│", "│", "█", "█"]);
        let hit = frame.hit_test(0, 3);
        assert_eq!(hit.map(|h| (h.region, h.data)), Some((HitRegion::Scrollbar, 3)));
    }
}
