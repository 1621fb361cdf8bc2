#![forbid(unsafe_code)]

//! vlist public facade.
//!
//! # Role
//! Stable entry point for applications. Re-exports the window math, the cell
//! buffer and frame, the widgets and (with the `runtime` feature) the
//! reactive scroll binding, plus a [`prelude`] for the common imports.
//!
//! # How it fits
//! `vlist-core` computes which rows exist, `vlist-widgets` materializes and
//! draws them into a `vlist-render` frame, and `vlist-runtime` keeps the
//! range observable for hosts that react to it. Application crates depend on
//! this crate only.
//!
//! ```
//! use vlist::prelude::*;
//!
//! let items: Vec<String> = (0..10_000).map(|i| format!("row {i}")).collect();
//! let list = VirtualizedList::new(&items, 1)?;
//! let mut state = VirtualizedListState::new().with_overscan(2);
//! let mut frame = Frame::new(20, 5);
//! list.show_scrollbar(false).render(frame.area(), &mut frame, &mut state);
//!
//! assert_eq!(state.materialized(), RenderRange::new(0, 8));
//! assert_eq!(frame.buffer.row_text(4).trim_end(), "row 4");
//! # Ok::<(), vlist::Error>(())
//! ```

pub mod error;

// --- Core re-exports ---------------------------------------------------------

pub use vlist_core::{
    DEFAULT_OVERSCAN, Rect, RenderRange, ScrollWindow, Window, WindowError, WindowSpec,
};

// --- Render re-exports -------------------------------------------------------

#[cfg(feature = "crossterm")]
pub use vlist_render::presenter::Presenter;
pub use vlist_render::{Buffer, Cell, Color, Frame, Hit, HitGrid, HitId, HitRegion, Style, StyleFlags};

// --- Widget re-exports -------------------------------------------------------

pub use vlist_widgets::{
    Align, Alignment, ItemSource, Label, RenderItem, RenderStats, Scrollbar, ScrollbarState,
    StatefulWidget, VirtualizedList, VirtualizedListPersistState, VirtualizedListState, Widget,
    draw_text,
};

// --- Runtime re-exports ------------------------------------------------------

#[cfg(feature = "config")]
pub use vlist_runtime::{ListConfig, ListConfigError};
#[cfg(feature = "runtime")]
pub use vlist_runtime::{Observable, ScrollBinding, Subscription};

pub use error::{Error, Result};

/// Member crates, for APIs the facade does not re-export.
pub mod core {
    pub use vlist_core::*;
}

pub mod render {
    pub use vlist_render::*;
}

pub mod widgets {
    pub use vlist_widgets::*;
}

#[cfg(feature = "runtime")]
pub mod runtime {
    pub use vlist_runtime::*;
}

/// Common imports.
pub mod prelude {
    pub use crate::{
        Align, Error, Frame, ItemSource, Rect, RenderItem, RenderRange, Result, StatefulWidget,
        Style, VirtualizedList, VirtualizedListState, Widget, WindowSpec,
    };

    #[cfg(feature = "runtime")]
    pub use crate::ScrollBinding;
}
