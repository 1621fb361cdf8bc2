#![forbid(unsafe_code)]

//! Widgets for vlist.
//!
//! The centerpiece is [`virtualized::VirtualizedList`], which materializes
//! only the items inside the render window and blits them into the frame.
//! [`scrollbar::Scrollbar`] stands in for the full-height scroll spacer and
//! [`label::Label`] draws headers and status lines.

pub mod label;
pub mod scrollbar;
pub mod source;
pub mod virtualized;

pub use label::{Alignment, Label};
pub use scrollbar::{Scrollbar, ScrollbarState};
pub use source::ItemSource;
pub use virtualized::{
    Align, RenderItem, RenderStats, VirtualizedList, VirtualizedListPersistState,
    VirtualizedListState,
};

use unicode_width::UnicodeWidthStr;
use vlist_core::Rect;
use vlist_render::{Frame, Style};

/// A renderable component.
pub trait Widget {
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// A component that renders from, and updates, external state.
pub trait StatefulWidget {
    type State;
    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State);
}

/// Draw one line of text at the top-left of `area`, ending with `…` when it
/// does not fit. Returns the columns written.
pub fn draw_text(frame: &mut Frame, area: Rect, text: &str, style: Style) -> u16 {
    if area.is_empty() {
        return 0;
    }
    if text.width() <= usize::from(area.width) {
        return frame
            .buffer
            .set_string(area.x, area.y, text, area.width, style);
    }
    let room = area.width - 1;
    let used = frame.buffer.set_string(area.x, area.y, text, room, style);
    used + frame
        .buffer
        .set_string(area.x + used, area.y, "…", 1, style)
}
