//! Client-side state of the article feed.
//!
//! - [`store`] - ordered, id-unique article list
//! - [`pagination`] - page cursor with sequence-tokened requests
//! - [`expansion`] - which cards show their full body
//! - [`scroll`] - viewport offset and the load-more trigger
//!
//! Nothing here performs I/O. The app spawns fetches and feeds their
//! results back through [`Pagination::complete`].

mod expansion;
mod pagination;
mod scroll;
pub(crate) mod store;

pub use expansion::ExpansionSet;
pub use pagination::{PageOutcome, PageRequest, Pagination};
pub use scroll::{ScrollMonitor, DEFAULT_LOAD_MORE_THRESHOLD};
pub use store::{AppendSummary, ArticleStore};
