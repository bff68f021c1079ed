//! Simulated backend for the terminal demo.
//!
//! Each request sleeps on the tokio timer and then sends its result over
//! an unbounded channel, which the UI loop drains between frames.

use std::time::Duration;

use chrono::{DateTime, Utc};
use refreshkit_core::{DataSource, LoadCompletion, LoadKind, LoadRequest};
use tokio::sync::mpsc;
use tracing::debug;

use crate::event::LoadResult;

/// One row of the demo feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Higher is newer
    pub id: i64,
    pub title: String,
    pub published: DateTime<Utc>,
}

impl FeedItem {
    pub fn new(id: i64, published: DateTime<Utc>) -> Self {
        Self {
            id,
            title: format!("Story #{}", id),
            published,
        }
    }
}

/// Spacing between the publish times of consecutive demo items
const ITEM_SPACING_MINUTES: i64 = 7;

/// Data source producing numbered items after a fixed latency
pub struct DemoDataSource {
    tx: mpsc::UnboundedSender<LoadResult>,
    latency: Duration,
    page_size: usize,
    newest: i64,
    oldest: i64,
    /// Publish time of the oldest item produced so far
    oldest_published: DateTime<Utc>,
    /// Fail every n-th request (0 = never)
    fail_every: u32,
    issued: u32,
}

impl DemoDataSource {
    pub fn new(tx: mpsc::UnboundedSender<LoadResult>, latency: Duration, page_size: usize) -> Self {
        Self {
            tx,
            latency,
            page_size,
            newest: 0,
            oldest: 1,
            oldest_published: Utc::now(),
            fail_every: 0,
            issued: 0,
        }
    }

    pub fn failing_every(mut self, n: u32) -> Self {
        self.fail_every = n;
        self
    }

    /// First page, available synchronously
    pub fn initial_page(&mut self) -> Vec<FeedItem> {
        self.next_newer()
    }

    /// Ids above everything produced so far, newest first, published now
    fn next_newer(&mut self) -> Vec<FeedItem> {
        let from = self.newest + 1;
        self.newest += self.page_size as i64;
        let now = Utc::now();
        let items: Vec<FeedItem> = (from..=self.newest)
            .rev()
            .enumerate()
            .map(|(age, id)| FeedItem::new(id, now - spacing(age as i64)))
            .collect();
        if from == 1 {
            if let Some(last) = items.last() {
                self.oldest_published = last.published;
            }
        }
        items
    }

    /// Ids below everything produced so far, newest first
    fn next_older(&mut self) -> Vec<FeedItem> {
        let to = self.oldest - 1;
        self.oldest -= self.page_size as i64;
        let anchor = self.oldest_published;
        let items: Vec<FeedItem> = (self.oldest..=to)
            .rev()
            .enumerate()
            .map(|(age, id)| FeedItem::new(id, anchor - spacing(age as i64 + 1)))
            .collect();
        if let Some(last) = items.last() {
            self.oldest_published = last.published;
        }
        items
    }

    fn should_fail(&mut self) -> bool {
        self.issued += 1;
        self.fail_every > 0 && self.issued % self.fail_every == 0
    }

    fn spawn(&mut self, request: LoadRequest, items: Vec<FeedItem>) {
        let failed = self.should_fail();
        let tx = self.tx.clone();
        let latency = self.latency;
        debug!(request = %request.id, kind = %request.kind, failed, "Demo load started");

        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let result = if failed {
                LoadResult {
                    kind: request.kind,
                    completion: LoadCompletion::failed(request.id, "simulated network error"),
                    items: Vec::new(),
                }
            } else {
                LoadResult {
                    kind: request.kind,
                    completion: LoadCompletion::loaded(request.id, items.len()),
                    items,
                }
            };
            // Receiver is gone once the UI has quit
            let _ = tx.send(result);
        });
    }
}

fn spacing(steps: i64) -> chrono::Duration {
    chrono::Duration::minutes(steps * ITEM_SPACING_MINUTES)
}

impl DataSource for DemoDataSource {
    fn load_newer(&mut self, request: LoadRequest) {
        debug_assert_eq!(request.kind, LoadKind::Newer);
        let items = self.next_newer();
        self.spawn(request, items);
    }

    fn load_older(&mut self, request: LoadRequest) {
        debug_assert_eq!(request.kind, LoadKind::Older);
        let items = self.next_older();
        self.spawn(request, items);
    }
}
