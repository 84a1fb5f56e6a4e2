use super::store::ArticleStore;
use crate::api::{ApiError, Article};

/// Identifies one issued page fetch.
///
/// `seq` increases with every request. Only the most recently issued request
/// is current; results carrying any other `seq` are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub seq: u64,
}

impl PageRequest {
    pub fn is_refresh(&self) -> bool {
        self.page == 0
    }
}

/// What applying a page result did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Replaced { count: usize },
    Appended { added: usize, duplicates: usize },
    Failed { message: String },
    /// Superseded by a newer request; nothing was applied.
    Stale,
}

/// Page cursor, in-flight guard and last error for the article listing.
#[derive(Debug, Default)]
pub struct Pagination {
    current_page: usize,
    last_seq: u64,
    in_flight: Option<PageRequest>,
    error: Option<String>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<PageRequest> {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Issue a request for `page` unconditionally, superseding any request
    /// still in flight. Used for refreshes (page zero).
    pub fn begin(&mut self, page: usize) -> PageRequest {
        self.last_seq = self.last_seq.wrapping_add(1);
        let request = PageRequest {
            page,
            seq: self.last_seq,
        };
        if let Some(previous) = self.in_flight.replace(request) {
            tracing::debug!(
                previous_page = previous.page,
                previous_seq = previous.seq,
                page,
                "Superseding in-flight page request"
            );
        }
        self.error = None;
        request
    }

    /// Issue a request for the page after the current one, unless a fetch is
    /// already in flight.
    pub fn begin_next(&mut self) -> Option<PageRequest> {
        if self.is_loading() {
            return None;
        }
        Some(self.begin(self.current_page + 1))
    }

    /// Apply the result of `request` to `store`.
    ///
    /// Page zero replaces the store, later pages append. Failures leave the
    /// store untouched and record a message. Stale results change nothing.
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: Result<Vec<Article>, ApiError>,
        store: &mut ArticleStore,
    ) -> PageOutcome {
        if self.in_flight != Some(request) {
            tracing::debug!(
                page = request.page,
                seq = request.seq,
                current = ?self.in_flight.map(|r| r.seq),
                "Ignoring stale page result"
            );
            return PageOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(articles) => {
                self.current_page = request.page;
                self.error = None;
                if request.is_refresh() {
                    let count = store.replace(articles);
                    PageOutcome::Replaced { count }
                } else {
                    let summary = store.append(articles);
                    PageOutcome::Appended {
                        added: summary.added,
                        duplicates: summary.duplicates,
                    }
                }
            }
            Err(e) => {
                tracing::warn!(page = request.page, error = %e, "Failed to load article page");
                let message = e.to_string();
                self.error = Some(message.clone());
                PageOutcome::Failed { message }
            }
        }
    }

    /// Drop the in-flight marker without applying anything (task aborted).
    pub fn cancel(&mut self) {
        self.in_flight = None;
    }
}
