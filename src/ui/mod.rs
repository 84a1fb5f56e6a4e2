//! Terminal user interface.
//!
//! - `loop_runner` - event loop and terminal setup/teardown
//! - `input` - keyboard and mouse dispatch
//! - `events` - results from background tasks
//! - `render` - frame layout and overlay stacking
//! - `feed` - article cards and the load-more trailer
//! - `markdown` - answer rendering
//! - `dialog`, `notifications`, `help` - overlays
//! - `status` - bottom status bar

mod dialog;
mod events;
mod feed;
mod help;
mod input;
mod loop_runner;
mod markdown;
mod notifications;
mod render;
mod status;

pub use events::handle_app_event;
pub use feed::{layout_feed, FeedLayout};
pub use loop_runner::{run, Action};
pub use markdown::render_markdown;

use ratatui::layout::Rect;

/// A rectangle of the given percentage size centered in `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
