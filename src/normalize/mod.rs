//! Layer 4 — AST query normalization (spec §4.4): turns a parsed file into
//! a language-agnostic [`entity::Graph`] via the per-language tables in
//! [`adapters`].

pub mod adapters;
pub mod entity;
pub mod text_converter;

pub use entity::{Entity, EntityType, Graph, Relationship, RelationshipType};

use crate::cache::AstCache;
use crate::config::Config;
use crate::error::{CoreError, FallbackReason};
use crate::lang::Language;
use crate::parser_pool::ParserPool;

use adapters::AdapterRegistry;

/// Ties parsing (via the shared [`ParserPool`] and [`AstCache`]) to
/// normalization (via [`AdapterRegistry`]). One instance is shared across
/// worker threads — both its dependencies are internally synchronized.
pub struct Normalizer {
    registry: AdapterRegistry,
    ast_cache: AstCache,
}

impl Normalizer {
    pub fn new(ast_cache_capacity: u64) -> Self {
        Self {
            registry: AdapterRegistry::new(),
            ast_cache: AstCache::new(ast_cache_capacity),
        }
    }

    /// Parses (or fetches from cache) and normalizes one file. Returns
    /// `Err(CoreError::Normalization)` only when the language has no
    /// grammar at all — anything tree-sitter itself chokes on still
    /// yields a best-effort (possibly partial) graph, since tree-sitter's
    /// incremental parser never hard-fails on malformed input.
    pub fn normalize_file(
        &self,
        path: &str,
        content: &str,
        language: Language,
        pool: &ParserPool,
        config: &Config,
    ) -> Result<(Graph, Vec<String>), CoreError> {
        let mut pooled = pool.acquire(language).ok_or_else(|| CoreError::Normalization {
            reason: format!("no grammar registered for {language}"),
        })?;

        let key = AstCache::key(path, content.as_bytes());
        let tree = if config.performance.enable_cache {
            self.ast_cache
                .get_with(key, || pooled.get_mut().parse(content, None).unwrap())
        } else {
            pooled
                .get_mut()
                .parse(content, None)
                .ok_or_else(|| CoreError::Normalization {
                    reason: "tree-sitter returned no tree".to_string(),
                })?
        };

        let graph = self
            .registry
            .normalize(language, tree.root_node(), content, path);

        let descriptions = if config.post_processing.compute_text_descriptions {
            text_converter::describe_all(&graph.entities)
        } else {
            Vec::new()
        };

        Ok((graph, descriptions))
    }
}

/// Signals a caller that normalization degraded rather than ran clean
/// (spec §7: `FallbackReason` instead of raising).
pub fn degrade_reason_for(language: Language) -> Option<FallbackReason> {
    if language.has_grammar() {
        None
    } else {
        Some(FallbackReason::NoGrammar)
    }
}
