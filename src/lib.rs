//! Terminal client for the Deep-Report AI news feed.
//!
//! The binary in `main.rs` wires these modules together; integration tests
//! drive them directly against mock servers.

pub mod api;
pub mod app;
pub mod config;
pub mod feed;
pub mod keybindings;
pub mod notify;
pub mod question;
pub mod theme;
pub mod ui;
pub mod util;
