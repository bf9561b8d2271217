//! Bracket-balance strategy (spec §4.2, rung 4): accumulates lines until
//! the running `SymbolStack` returns to zero and a minimum size is met,
//! with no awareness of language grammar beyond lexical scanning. Grounded
//! on the symbol-balance scanner in [`super::symbol_balance`].

use anyhow::Result;

use super::chunk::{ChunkType, CodeChunk};
use super::symbol_balance::ScanMode;
use super::{ChunkContext, Strategy, StrategyKind};

pub struct BracketBalanceStrategy;

impl Strategy for BracketBalanceStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BracketBalance
    }

    fn can_handle(&self, _ctx: &ChunkContext) -> bool {
        true
    }

    fn split(&self, ctx: &ChunkContext) -> Result<Vec<CodeChunk>> {
        let lines: Vec<&str> = ctx.content.lines().collect();
        if lines.is_empty() {
            anyhow::bail!("empty file");
        }

        let min_lines = (ctx.config.chunking.min_chunk_size / 40).max(3);
        let max_lines = ctx.config.chunking.max_lines_per_chunk.max(min_lines);

        let mut chunks = Vec::new();
        let mut mode = ScanMode::Code;
        let mut running = super::symbol_balance::SymbolStack::default();
        let mut start = 0usize;

        for (i, line) in lines.iter().enumerate() {
            let (delta, next_mode) = ctx.symbol_tracker.scan(line, ctx.language, mode);
            running.add(delta);
            mode = next_mode;

            let at_balance = running.is_balanced() && matches!(mode, ScanMode::Code);
            let chunk_len = i - start + 1;
            let is_last = i == lines.len() - 1;

            if is_last || (at_balance && chunk_len >= min_lines) || chunk_len >= max_lines {
                let content = lines[start..=i].join("\n");
                chunks.push(CodeChunk::new(
                    content,
                    start + 1,
                    i + 1,
                    ctx.language,
                    ctx.path,
                    StrategyKind::BracketBalance.as_str(),
                    ChunkType::CodeBlock,
                ));
                start = i + 1;
                running = super::symbol_balance::SymbolStack::default();
            }
        }

        if chunks.is_empty() {
            anyhow::bail!("no balanced split points found");
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
    fn splits_at_balanced_points() {
        let cfg = Config::default();
        let pool = ParserPool::new();
        let tracker = SymbolBalanceTracker::default();
        let content = "fn a() {\n    1;\n}\nfn b() {\n    2;\n}\n";
        let ctx = ChunkContext::new("f.rs", content, Language::Rust, &cfg, &pool, &tracker);
        let chunks = BracketBalanceStrategy.split(&ctx).unwrap();
        assert!(!chunks.is_empty());
        assert_eq!(chunks.last().unwrap().end_line, 6);
    }
}
