//! Semantic strategy (spec §4.2, rung 3): groups lines into paragraphs
//! separated by blank lines, merging short paragraphs together up to
//! `max_chunk_size`/`max_lines_per_chunk`. Less strict than syntax-aware —
//! it only requires the running symbol stack to be balanced, not a
//! confident boundary score — so it's a plausible rung between
//! syntax-aware and bracket-balance.

use anyhow::Result;

use super::chunk::{ChunkType, CodeChunk};
use super::symbol_balance::{ScanMode, SymbolStack};
use super::{ChunkContext, Strategy, StrategyKind};

pub struct SemanticStrategy;

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

impl Strategy for SemanticStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Semantic
    }

    fn can_handle(&self, _ctx: &ChunkContext) -> bool {
        true
    }

    fn split(&self, ctx: &ChunkContext) -> Result<Vec<CodeChunk>> {
        let lines: Vec<&str> = ctx.content.lines().collect();
        if lines.is_empty() {
            anyhow::bail!("empty file");
        }

        let max_chars = ctx.config.chunking.max_chunk_size;
        let max_lines = ctx.config.chunking.max_lines_per_chunk;

        let mut chunks = Vec::new();
        let mut mode = ScanMode::Code;
        let mut running = SymbolStack::default();
        let mut start = 0usize;
        let mut found_paragraph_break = false;

        for i in 0..lines.len() {
            let (delta, next_mode) = ctx.symbol_tracker.scan(lines[i], ctx.language, mode);
            running.add(delta);
            mode = next_mode;

            let balanced = running.is_balanced() && matches!(mode, ScanMode::Code);
            let next_is_blank = lines.get(i + 1).map(|l| is_blank(l)).unwrap_or(true);
            let chunk_len = i - start + 1;
            let current_chars: usize = lines[start..=i].iter().map(|l| l.len() + 1).sum();
            let is_last = i == lines.len() - 1;

            let paragraph_boundary = balanced && next_is_blank && !is_blank(lines[i]);
            let oversized = current_chars >= max_chars || chunk_len >= max_lines;

            if is_last || (paragraph_boundary && chunk_len >= 2) || oversized {
                if paragraph_boundary {
                    found_paragraph_break = true;
                }
                let content = lines[start..=i].join("\n");
                chunks.push(CodeChunk::new(
                    content,
                    start + 1,
                    i + 1,
                    ctx.language,
                    ctx.path,
                    StrategyKind::Semantic.as_str(),
                    ChunkType::CodeBlock,
                ));
                start = i + 1;
                running = SymbolStack::default();
            }
        }

        if !found_paragraph_break {
            anyhow::bail!("no paragraph boundaries found");
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
    fn splits_on_blank_line_paragraphs() {
        let cfg = Config::default();
        let pool = ParserPool::new();
        let tracker = SymbolBalanceTracker::default();
        let content = "para one line a\npara one line b\n\npara two line a\npara two line b\n";
        let ctx = ChunkContext::new("f.md", content, Language::Markdown, &cfg, &pool, &tracker);
        let chunks = SemanticStrategy.split(&ctx).unwrap();
        assert_eq!(chunks.len(), 2);
    }
}
