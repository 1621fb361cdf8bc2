#![forbid(unsafe_code)]

//! Change-notifying values.

mod observable;

pub use observable::{Observable, Subscription};
