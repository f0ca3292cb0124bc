use crate::areas::config::Config;
use crate::areas::listing_cache::ListingCache;
use crate::remote::RemoteRepository;
use std::cell::{RefCell, RefMut};

/// One editing session against a remote repository
///
/// Owns the immutable configuration, the remote client and the listing cache.
/// Commands are implemented as `impl Editor` blocks under `commands`.
pub struct Editor<R: RemoteRepository> {
    config: Config,
    remote: R,
    cache: ListingCache,
    writer: RefCell<Box<dyn std::io::Write>>,
}

impl<R: RemoteRepository> Editor<R> {
    pub fn new(config: Config, remote: R, writer: Box<dyn std::io::Write>) -> Self {
        let cache = ListingCache::new(config.cache_ttl);

        Editor {
            config,
            remote,
            cache,
            writer: RefCell::new(writer),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    pub(crate) fn invalidate_listings(&mut self) {
        self.cache.invalidate();
    }

    /// Split borrow for commands that fetch through the cache
    pub(crate) fn cache_and_remote(&mut self) -> (&mut ListingCache, &R) {
        (&mut self.cache, &self.remote)
    }
}
