#![forbid(unsafe_code)]

//! Reactive plumbing between a scroll position and the rendered window.
//!
//! # Role in vlist
//! `vlist-runtime` turns the pure window math in `vlist-core` into signals an
//! application can subscribe to. [`ScrollBinding`] owns the scroll position
//! and list geometry as [`Observable`] values and republishes the render
//! range only when it actually changes.
//!
//! # Primary responsibilities
//! - **Observable**: shared, version-tracked values with RAII subscriptions.
//! - **ScrollBinding**: recompute the window on every scroll, resize or item
//!   replacement; notify range listeners on change only.
//! - **Config** (feature `config`): load list tuning from TOML or JSON.

#[cfg(feature = "config")]
pub mod config;
pub mod reactive;
pub mod scroll_binding;

#[cfg(feature = "config")]
pub use config::{ListConfig, ListConfigError};
pub use reactive::{Observable, Subscription};
pub use scroll_binding::ScrollBinding;
