//! Universal line-window strategy (spec §4.2, rung 5): the last strategy
//! before the emergency wrapper. Makes no assumption about syntax at all,
//! so it always succeeds. Grounded on the teacher's `fallback_parse`
//! (fixed window with overlap).

use anyhow::Result;

use super::chunk::{ChunkType, CodeChunk};
use super::{ChunkContext, Strategy, StrategyKind};

pub struct UniversalLineStrategy;

impl Strategy for UniversalLineStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::UniversalLine
    }

    fn can_handle(&self, _ctx: &ChunkContext) -> bool {
        true
    }

    fn split(&self, ctx: &ChunkContext) -> Result<Vec<CodeChunk>> {
        let lines: Vec<&str> = ctx.content.lines().collect();
        if lines.is_empty() {
            return Ok(vec![CodeChunk::new(
                String::new(),
                1,
                1,
                ctx.language,
                ctx.path,
                StrategyKind::UniversalLine.as_str(),
                ChunkType::Text,
            )]);
        }

        let window = ctx.config.chunking.max_lines_per_chunk.max(1);
        let overlap = if ctx.config.features.enable_overlap {
            ctx.config.chunking.overlap_lines.min(window.saturating_sub(1))
        } else {
            0
        };
        let stride = window.saturating_sub(overlap).max(1);

        let mut chunks = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let end = (i + window).min(lines.len());
            let content = lines[i..end].join("\n");
            chunks.push(CodeChunk::new(
                content,
                i + 1,
                end,
                ctx.language,
                ctx.path,
                StrategyKind::UniversalLine.as_str(),
                ChunkType::Text,
            ));
            if end == lines.len() {
                break;
            }
            i += stride;
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
    fn covers_whole_file_without_overlap() {
        let mut cfg = Config::default();
        cfg.chunking.max_lines_per_chunk = 2;
        let pool = ParserPool::new();
        let tracker = SymbolBalanceTracker::default();
        let content = "a\nb\nc\nd\ne\n";
        let ctx = ChunkContext::new("f.txt", content, Language::Text, &cfg, &pool, &tracker);
        let chunks = UniversalLineStrategy.split(&ctx).unwrap();
        assert_eq!(chunks.first().unwrap().start_line, 1);
        assert_eq!(chunks.last().unwrap().end_line, 5);
    }
}
