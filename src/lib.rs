// File: src/lib.rs
pub mod client;
pub mod config;
pub mod flow;
pub mod model;
pub mod selection;
pub mod session;
pub mod store;

#[cfg(feature = "tui")]
pub mod tui;
