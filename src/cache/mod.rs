//! Content-addressed caches shared across worker threads (spec §5, §4.4.5).
//!
//! Backed by `moka`, which gives us exactly the two properties the spec
//! asks for without hand-rolling them: a fixed-capacity LRU-like eviction
//! policy, and `get_with`-style coalescing so concurrent misses on the same
//! key collapse into a single computation instead of racing (spec §9's
//! "duplicate-adapter race in the source").

pub mod adapter_cache;
pub mod ast_cache;
pub mod hash;

pub use adapter_cache::AdapterCache;
pub use ast_cache::AstCache;
pub use hash::{content_hash, sha256_hex};
