//! Shared helpers.
//!
//! - **Text**: control-sequence stripping, width-aware truncation and wrapping
//! - **URL validation**: screening article links before opening them
//! - **Tasks**: panic capture for spawned background work

mod task;
mod text;
mod url_validator;

pub use task::catch_task_panic;
pub use text::{
    display_width, sanitize_inline, single_line, strip_control_chars, truncate_to_width,
    wrap_to_width, ELLIPSIS,
};
pub use url_validator::{validate_article_url, UrlValidationError};
