use moka::sync::Cache;
use tree_sitter::Tree;

use super::hash::ast_cache_key;

/// Content-addressed AST cache: `key = "ast:{path}:{content_hash}"` maps to
/// the parsed tree (spec §4.4.5). Capacity-bounded; concurrent callers
/// requesting the same key coalesce into a single parse via
/// [`AstCache::get_with`].
#[derive(Clone)]
pub struct AstCache {
    inner: Cache<String, Tree>,
}

impl AstCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn key(path: &str, content: &[u8]) -> String {
        ast_cache_key(path, content)
    }

    /// Returns the cached tree for `key`, or runs `parse` to produce one and
    /// stores it. Concurrent misses on the same key block on each other
    /// rather than each doing the parse (moka's `get_with` contract).
    pub fn get_with(&self, key: String, parse: impl FnOnce() -> Tree) -> Tree {
        self.inner.get_with(key, parse)
    }

    pub fn get(&self, key: &str) -> Option<Tree> {
        self.inner.get(key)
    }

    pub fn invalidate(&self, key: &str) {
        self.inner.invalidate(key);
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tree_sitter::Parser;

    #[test]
    fn coalesces_concurrent_misses_on_same_key() {
        let cache = AstCache::new(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = AstCache::key("a.rs", b"fn a() {}");

        let make = || {
            calls.fetch_add(1, Ordering::SeqCst);
            let mut parser = Parser::new();
            parser.set_language(&tree_sitter_rust::language()).unwrap();
            parser.parse("fn a() {}", None).unwrap()
        };

        let t1 = cache.get_with(key.clone(), make);
        let t2 = cache.get_with(key, make);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            t1.root_node().to_sexp(),
            t2.root_node().to_sexp()
        );
    }
}
