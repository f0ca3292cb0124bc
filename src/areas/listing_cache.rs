//! Time-bounded tree listing cache
//!
//! Listing a branch costs three round trips (ref, commit, recursive tree), and
//! pickers ask for it on every interaction. Snapshots are memoized per branch
//! for a fixed window counted from the fetch; any successful mutation must call
//! [`ListingCache::invalidate`] so the next listing reflects it.
//!
//! The cache is owned by one editor session and mutated through `&mut self`.
//! A server sharing it across sessions would need to wrap it in a lock.

use crate::artifacts::errors::RemoteResult;
use crate::artifacts::objects::tree_entry::TreeEntry;
use crate::remote::RemoteRepository;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedListing {
    entries: Arc<[TreeEntry]>,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct ListingCache {
    ttl: Duration,
    listings: HashMap<String, CachedListing>,
}

impl ListingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            listings: HashMap::new(),
        }
    }

    /// Snapshot of `branch`, fetched through `remote` when absent or expired
    pub async fn get<R: RemoteRepository>(
        &mut self,
        remote: &R,
        branch: &str,
    ) -> RemoteResult<Arc<[TreeEntry]>> {
        if let Some(cached) = self.listings.get(branch)
            && cached.fetched_at.elapsed() < self.ttl
        {
            debug!(branch, "listing cache hit");
            return Ok(cached.entries.clone());
        }

        debug!(branch, "listing cache miss");
        let entries: Arc<[TreeEntry]> = remote.list_tree(branch).await?.into();
        self.listings.insert(
            branch.to_string(),
            CachedListing {
                entries: entries.clone(),
                fetched_at: Instant::now(),
            },
        );

        Ok(entries)
    }

    /// Drop every memoized snapshot
    pub fn invalidate(&mut self) {
        debug!(count = self.listings.len(), "invalidating listing cache");
        self.listings.clear();
    }

    pub fn is_cached(&self, branch: &str) -> bool {
        self.listings.contains_key(branch)
    }
}
