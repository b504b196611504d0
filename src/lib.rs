//! A terminal view of how much of the year is left.

pub mod calendar;
pub mod config;
pub mod logging;
pub mod store;
pub mod tui;
