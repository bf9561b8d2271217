//! AST strategy (spec §4.2, rung 1): queries top-level declarations with a
//! tree-sitter `Query` per language and turns each match into a chunk with
//! a few lines of surrounding context. Grounded on the teacher's
//! `LanguageParser::parse_with_tree_sitter`/`create_query_for_language`.

use anyhow::{Context, Result};
use tree_sitter::{Query, QueryCursor};

use crate::lang::Language;

use super::chunk::{ChunkType, CodeChunk};
use super::{ChunkContext, Strategy, StrategyKind};

pub struct AstStrategy;

fn query_source(language: Language) -> Option<&'static str> {
    match language {
        Language::Rust => Some(
            r#"
            (function_item) @function
            (impl_item) @impl
            (struct_item) @struct
            (enum_item) @enum
            (trait_item) @trait
            (mod_item) @module
            "#,
        ),
        Language::Python => Some(
            r#"
            (function_definition) @function
            (class_definition) @class
            (decorated_definition) @decorated
            "#,
        ),
        Language::JavaScript | Language::TypeScript | Language::Tsx => Some(
            r#"
            (function_declaration) @function
            (arrow_function) @arrow_function
            (class_declaration) @class
            (method_definition) @method
            "#,
        ),
        Language::Go => Some(
            r#"
            (function_declaration) @function
            (method_declaration) @method
            (type_declaration) @type
            "#,
        ),
        Language::Java | Language::Kotlin | Language::CSharp => Some(
            r#"
            (method_declaration) @method
            (class_declaration) @class
            (interface_declaration) @interface
            "#,
        ),
        Language::C | Language::Cpp => Some(
            r#"
            (function_definition) @function
            (struct_specifier) @struct
            (class_specifier) @class
            "#,
        ),
        _ => None,
    }
}

fn node_to_chunk_type(kind: &str) -> ChunkType {
    match kind {
        "function_item" | "function_declaration" | "function_definition" | "arrow_function" => {
            ChunkType::Function
        }
        "class_declaration" | "class_definition" | "class_specifier" => ChunkType::Class,
        "struct_item" | "struct_specifier" | "enum_item" => ChunkType::Struct,
        "interface_declaration" => ChunkType::Interface,
        "method_declaration" | "method_definition" => ChunkType::Method,
        "impl_item" | "mod_item" | "type_declaration" => ChunkType::CodeBlock,
        _ => ChunkType::CodeBlock,
    }
}

/// Pads a match's line span with up to 3 lines of surrounding context, as
/// the teacher's `create_chunk_context` does, clamped to the file bounds.
fn with_context(start_line: usize, end_line: usize, total_lines: usize) -> (usize, usize) {
    const CONTEXT: usize = 3;
    let start = start_line.saturating_sub(CONTEXT).max(1);
    let end = (end_line + CONTEXT).min(total_lines);
    (start, end)
}

impl Strategy for AstStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ast
    }

    fn can_handle(&self, ctx: &ChunkContext) -> bool {
        query_source(ctx.language).is_some()
    }

    fn split(&self, ctx: &ChunkContext) -> Result<Vec<CodeChunk>> {
        let query_src = query_source(ctx.language).context("no query defined for language")?;
        let mut pooled = ctx
            .parser_pool
            .acquire(ctx.language)
            .context("no grammar registered for language")?;
        let parser = pooled.get_mut();
        let tree = parser
            .parse(ctx.content, None)
            .context("tree-sitter failed to parse file")?;

        let ts_language = tree.language();
        let query = Query::new(&ts_language, query_src).context("invalid tree-sitter query")?;
        let mut cursor = QueryCursor::new();
        let bytes = ctx.content.as_bytes();
        let lines: Vec<&str> = ctx.content.lines().collect();
        let total_lines = lines.len().max(1);

        let mut raw_matches: Vec<(usize, usize, ChunkType)> = Vec::new();
        for m in cursor.matches(&query, tree.root_node(), bytes) {
            for capture in m.captures {
                let node = capture.node;
                let start_line = node.start_position().row + 1;
                let end_line = node.end_position().row + 1;
                raw_matches.push((start_line, end_line, node_to_chunk_type(node.kind())));
            }
        }

        if raw_matches.is_empty() {
            anyhow::bail!("AST query matched no declarations");
        }

        raw_matches.sort_by_key(|(s, _, _)| *s);

        let mut chunks = Vec::with_capacity(raw_matches.len());
        for (start_line, end_line, chunk_type) in raw_matches {
            let (padded_start, padded_end) = with_context(start_line, end_line, total_lines);
            let content = lines[padded_start - 1..padded_end].join("\n");
            chunks.push(CodeChunk::new(
                content,
                padded_start,
                padded_end,
                ctx.language,
                ctx.path,
                StrategyKind::Ast.as_str(),
                chunk_type,
            ));
        }

        Ok(chunks)
    }
}
