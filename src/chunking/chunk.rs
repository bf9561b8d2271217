use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::content_hash;
use crate::lang::Language;

/// Canonical chunk-type tags (spec §3: `chunk_type` tag
/// `import|class|function|method|merged|text|...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkType {
    Import,
    Class,
    Function,
    Method,
    Struct,
    Interface,
    Variable,
    Preprocessor,
    Heading,
    CodeBlock,
    Table,
    List,
    Element,
    Glue,
    Merged,
    Text,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::Import => "import",
            ChunkType::Class => "class",
            ChunkType::Function => "function",
            ChunkType::Method => "method",
            ChunkType::Struct => "struct",
            ChunkType::Interface => "interface",
            ChunkType::Variable => "variable",
            ChunkType::Preprocessor => "preprocessor",
            ChunkType::Heading => "heading",
            ChunkType::CodeBlock => "code-block",
            ChunkType::Table => "table",
            ChunkType::List => "list",
            ChunkType::Element => "element",
            ChunkType::Glue => "glue",
            ChunkType::Merged => "merged",
            ChunkType::Text => "text",
        }
    }
}

/// The unit of embedding and retrieval (spec §3). A value object: every
/// mutation in L3 produces a new `CodeChunk` rather than mutating one in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChunk {
    pub content: String,
    /// 1-based, inclusive.
    pub start_line: usize,
    /// 1-based, inclusive.
    pub end_line: usize,
    pub language: Language,
    pub file_path: String,
    pub strategy_name: String,
    pub chunk_type: ChunkType,
    pub complexity: u32,
    pub hash: String,
    #[serde(default)]
    pub extras: HashMap<String, Value>,
}

impl CodeChunk {
    pub fn new(
        content: String,
        start_line: usize,
        end_line: usize,
        language: Language,
        file_path: impl Into<String>,
        strategy_name: impl Into<String>,
        chunk_type: ChunkType,
    ) -> Self {
        let hash = content_hash(&content);
        let complexity = crate::astutil::complexity::byte_level_complexity(content.as_bytes());
        Self {
            content,
            start_line,
            end_line,
            language,
            file_path: file_path.into(),
            strategy_name: strategy_name.into(),
            chunk_type,
            complexity,
            hash,
            extras: HashMap::new(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Recomputes `hash`/`complexity` after `content` changes — chunks are
    /// value objects, so every producer must call this rather than patch
    /// the fields directly (spec §3 I5/I6).
    pub fn with_content(mut self, content: String) -> Self {
        self.complexity = crate::astutil::complexity::byte_level_complexity(content.as_bytes());
        self.hash = content_hash(&content);
        self.content = content;
        self
    }

    /// Whether this chunk's span strictly contains `other`'s (spec §4.2.1
    /// containment rule).
    pub fn strictly_contains(&self, other: &CodeChunk) -> bool {
        self.start_line <= other.start_line
            && self.end_line >= other.end_line
            && (self.start_line, self.end_line) != (other.start_line, other.end_line)
    }
}
