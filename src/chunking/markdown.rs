//! Markdown-specialized strategy: splits on ATX headings (`#` through
//! `######`), each section running from one heading up to (not including)
//! the next heading at the same or shallower level. A leading preamble
//! before the first heading becomes its own chunk.

use anyhow::Result;

use super::chunk::{ChunkType, CodeChunk};
use super::{ChunkContext, Strategy, StrategyKind};

fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if rest.is_empty() || rest.starts_with(' ') {
        Some(hashes)
    } else {
        None
    }
}

pub struct MarkdownStrategy;

impl Strategy for MarkdownStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MarkdownSpecialized
    }

    fn can_handle(&self, ctx: &ChunkContext) -> bool {
        matches!(ctx.language, crate::lang::Language::Markdown)
    }

    fn split(&self, ctx: &ChunkContext) -> Result<Vec<CodeChunk>> {
        let lines: Vec<&str> = ctx.content.lines().collect();
        if lines.is_empty() {
            anyhow::bail!("empty file");
        }

        let headings: Vec<(usize, usize)> = lines
            .iter()
            .enumerate()
            .filter_map(|(i, l)| heading_level(l).map(|lvl| (i, lvl)))
            .collect();

        if headings.is_empty() {
            anyhow::bail!("no headings found");
        }

        let mut chunks = Vec::new();
        if headings[0].0 > 0 {
            let content = lines[0..headings[0].0].join("\n");
            chunks.push(CodeChunk::new(
                content,
                1,
                headings[0].0,
                ctx.language,
                ctx.path,
                StrategyKind::MarkdownSpecialized.as_str(),
                ChunkType::Text,
            ));
        }

        for (idx, &(start, _level)) in headings.iter().enumerate() {
            let end = headings
                .get(idx + 1)
                .map(|(next_start, _)| *next_start)
                .unwrap_or(lines.len());
            let content = lines[start..end].join("\n");
            chunks.push(CodeChunk::new(
                content,
                start + 1,
                end,
                ctx.language,
                ctx.path,
                StrategyKind::MarkdownSpecialized.as_str(),
                ChunkType::Heading,
            ));
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::symbol_balance::SymbolBalanceTracker;
    use crate::config::Config;
    use crate::lang::Language;
    use crate::parser_pool::ParserPool;

    #[test]
    fn splits_on_headings() {
        let cfg = Config::default();
        let pool = ParserPool::new();
        let tracker = SymbolBalanceTracker::default();
        let content = "# Title\nintro\n\n## Section\nbody\n";
        let ctx = ChunkContext::new("f.md", content, Language::Markdown, &cfg, &pool, &tracker);
        let chunks = MarkdownStrategy.split(&ctx).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_type, ChunkType::Heading);
    }
}
