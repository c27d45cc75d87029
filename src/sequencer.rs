// src/sequencer.rs
//! Latest-request-wins state for a paging display.
//!
//! Every page change takes a ticket from a monotonically increasing counter.
//! A result is applied only if its ticket is still the newest one issued, so
//! a slow response for an old page can never overwrite a newer page.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::aggregator::Aggregator;
use crate::article::PageResult;
use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    page: u32,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
    pub fn page(&self) -> u32 {
        self.page
    }
}

#[derive(Debug, Default)]
struct Inner {
    current_page: u32,
    latest: Option<PageResult>,
}

/// Caller-visible paging state guarded by a generation counter.
#[derive(Debug)]
pub struct FeedView {
    issued: AtomicU64,
    page_size: u32,
    inner: Mutex<Inner>,
}

impl FeedView {
    pub fn new(page_size: u32) -> Self {
        Self {
            issued: AtomicU64::new(0),
            page_size,
            inner: Mutex::new(Inner {
                current_page: 1,
                latest: None,
            }),
        }
    }

    /// Record a page change and issue its ticket.
    pub fn begin(&self, page: u32) -> Ticket {
        let mut inner = self.inner.lock().expect("feed view mutex poisoned");
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        inner.current_page = page;
        Ticket { seq, page }
    }

    /// Apply `result` if `ticket` is the latest issued. Returns whether it was applied.
    pub fn apply(&self, ticket: Ticket, result: PageResult) -> bool {
        let mut inner = self.inner.lock().expect("feed view mutex poisoned");
        // Checked under the lock so a concurrent begin() cannot interleave.
        if ticket.seq != self.issued.load(Ordering::SeqCst) {
            tracing::debug!(
                seq = ticket.seq,
                page = ticket.page,
                "discarding stale page result"
            );
            return false;
        }
        // A corrective retry may have landed on an earlier page.
        inner.current_page = result.pagination.current_page;
        inner.latest = Some(result);
        true
    }

    /// Begin, fetch through `aggregator`, and apply if still current.
    pub async fn load_page(&self, aggregator: &Aggregator, page: u32) -> Result<bool, FetchError> {
        let ticket = self.begin(page);
        let result = aggregator.fetch_page(page, self.page_size).await?;
        Ok(self.apply(ticket, result))
    }

    pub fn current_page(&self) -> u32 {
        self.inner
            .lock()
            .expect("feed view mutex poisoned")
            .current_page
    }

    pub fn snapshot(&self) -> Option<PageResult> {
        self.inner
            .lock()
            .expect("feed view mutex poisoned")
            .latest
            .clone()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}
