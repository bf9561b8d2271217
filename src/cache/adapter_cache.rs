use std::sync::Arc;

use moka::sync::Cache;

/// `AdapterCache` keyed by `(language, options-hash)` (spec §5): a shared,
/// read-mostly cache with double-checked creation via per-key locks, so two
/// concurrent callers asking for the same `(language, options)` adapter get
/// the same `Arc` instead of racing to build two.
#[derive(Clone)]
pub struct AdapterCache<T: Send + Sync + 'static> {
    inner: Cache<String, Arc<T>>,
}

impl<T: Send + Sync + 'static> AdapterCache<T> {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn key(language: &str, options_hash: &str) -> String {
        format!("{language}:{options_hash}")
    }

    pub fn get_or_build(&self, key: String, build: impl FnOnce() -> T) -> Arc<T> {
        self.inner.get_with(key, || Arc::new(build()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Adapter(u32);

    #[test]
    fn same_key_builds_once() {
        let cache: AdapterCache<Adapter> = AdapterCache::new(10);
        let builds = AtomicUsize::new(0);
        let key = AdapterCache::<Adapter>::key("rust", "default");

        let a = cache.get_or_build(key.clone(), || {
            builds.fetch_add(1, Ordering::SeqCst);
            Adapter(1)
        });
        let b = cache.get_or_build(key, || {
            builds.fetch_add(1, Ordering::SeqCst);
            Adapter(2)
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(a.0, b.0);
    }
}
