//! Shared tree-sitter parser pool (spec §5: "one parser instance per
//! language per worker, reused across files").
//!
//! `tree_sitter::Parser` is `Send` but not `Sync`, so a single shared
//! instance per language can't be handed to multiple rayon workers at once.
//! Grounded on the teacher's `LanguageParser` (one `Parser` per extension,
//! built once at startup) but reworked into a checkout pool so concurrent
//! file workers each get their own parser instead of contending on one.

use std::collections::HashMap;
use std::sync::Mutex;

use dashmap::DashMap;
use tree_sitter::{Language as TsLanguage, Parser};

use crate::lang::Language;

fn grammar_for(language: Language) -> Option<TsLanguage> {
    match language {
        Language::Rust => Some(tree_sitter_rust::language()),
        Language::Python => Some(tree_sitter_python::language()),
        Language::JavaScript => Some(tree_sitter_javascript::language()),
        Language::TypeScript => Some(tree_sitter_typescript::language_typescript()),
        Language::Tsx => Some(tree_sitter_typescript::language_tsx()),
        Language::Go => Some(tree_sitter_go::language()),
        Language::Java => Some(tree_sitter_java::language()),
        Language::C | Language::Cpp => Some(tree_sitter_cpp::language()),
        Language::CSharp => Some(tree_sitter_c_sharp::language()),
        Language::Kotlin => Some(tree_sitter_kotlin_ng::language()),
        Language::Css => Some(tree_sitter_css::language()),
        Language::Html | Language::Vue => Some(tree_sitter_html::language()),
        Language::Markdown => Some(tree_sitter_md::language()),
        Language::Xml => Some(tree_sitter_xml::language_xml()),
        Language::Json | Language::Yaml | Language::Toml | Language::Text => None,
    }
}

/// Per-language checkout pool of warm `Parser` instances.
pub struct ParserPool {
    idle: DashMap<Language, Mutex<Vec<Parser>>>,
}

impl ParserPool {
    pub fn new() -> Self {
        Self {
            idle: DashMap::new(),
        }
    }

    /// Checks out a parser already configured for `language`, or builds one.
    /// Returns `None` if no grammar is registered for the language (spec
    /// §4.1: languages without a grammar never reach the AST strategy).
    pub fn acquire(&self, language: Language) -> Option<PooledParser<'_>> {
        let ts_lang = grammar_for(language)?;
        let slot = self
            .idle
            .entry(language)
            .or_insert_with(|| Mutex::new(Vec::new()));
        let mut guard = slot.lock().unwrap();
        let parser = match guard.pop() {
            Some(p) => p,
            None => {
                let mut p = Parser::new();
                p.set_language(&ts_lang)
                    .expect("grammar crate version mismatch for a registered language");
                p
            }
        };
        drop(guard);
        Some(PooledParser {
            parser: Some(parser),
            language,
            pool: self,
        })
    }

    pub fn supported_languages(&self) -> HashMap<Language, bool> {
        let langs = [
            Language::Rust,
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Tsx,
            Language::Go,
            Language::Java,
            Language::C,
            Language::Cpp,
            Language::CSharp,
            Language::Kotlin,
            Language::Css,
            Language::Html,
            Language::Vue,
            Language::Markdown,
            Language::Xml,
        ];
        langs
            .into_iter()
            .map(|l| (l, grammar_for(l).is_some()))
            .collect()
    }
}

impl Default for ParserPool {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII checkout: returns the parser to its pool on drop instead of
/// dropping it, so the next file in the same language reuses it.
pub struct PooledParser<'a> {
    parser: Option<Parser>,
    language: Language,
    pool: &'a ParserPool,
}

impl<'a> PooledParser<'a> {
    pub fn get_mut(&mut self) -> &mut Parser {
        self.parser.as_mut().expect("parser taken before drop")
    }
}

impl<'a> Drop for PooledParser<'a> {
    fn drop(&mut self) {
        if let Some(parser) = self.parser.take() {
            if let Some(slot) = self.pool.idle.get(&self.language) {
                slot.lock().unwrap().push(parser);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquires_and_reuses_parser_for_known_language() {
        let pool = ParserPool::new();
        {
            let mut checked_out = pool.acquire(Language::Rust).expect("rust has a grammar");
            let tree = checked_out.get_mut().parse("fn main() {}", None);
            assert!(tree.is_some());
        }
        // second acquire should reuse the returned parser rather than panic
        let mut again = pool.acquire(Language::Rust).expect("still registered");
        assert!(again.get_mut().parse("fn main() {}", None).is_some());
    }

    #[test]
    fn languages_without_grammar_return_none() {
        let pool = ParserPool::new();
        assert!(pool.acquire(Language::Json).is_none());
        assert!(pool.acquire(Language::Yaml).is_none());
    }
}
