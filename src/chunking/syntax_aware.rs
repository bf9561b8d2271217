//! Syntax-aware strategy (spec §4.2, rung 2): scores every candidate split
//! point with [`boundary_score`] and cuts at the best-scoring line within
//! each size window, requiring the running symbol stack to be balanced at
//! the cut. Falls back to rung 3 (semantic) if no confident cut is found.

use anyhow::Result;

use super::boundary_score::{boundary_score, weights_for, BoundaryContext};
use super::chunk::{ChunkType, CodeChunk};
use super::symbol_balance::{ScanMode, SymbolStack};
use super::{ChunkContext, Strategy, StrategyKind};

const SCORE_THRESHOLD: f64 = 0.45;

pub struct SyntaxAwareStrategy;

impl Strategy for SyntaxAwareStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SyntaxAware
    }

    fn can_handle(&self, _ctx: &ChunkContext) -> bool {
        true
    }

    fn split(&self, ctx: &ChunkContext) -> Result<Vec<CodeChunk>> {
        let lines: Vec<&str> = ctx.content.lines().collect();
        if lines.is_empty() {
            anyhow::bail!("empty file");
        }

        let weights = weights_for(ctx.language);
        let min_lines = (ctx.config.chunking.min_chunk_size / 40).max(3);
        let max_lines = ctx.config.chunking.max_lines_per_chunk.max(min_lines);

        let mut chunks = Vec::new();
        let mut mode = ScanMode::Code;
        let mut running = SymbolStack::default();
        let mut start = 0usize;
        let mut any_confident_cut = false;

        let mut i = 0;
        while i < lines.len() {
            let (delta, next_mode) = ctx.symbol_tracker.scan(lines[i], ctx.language, mode);
            running.add(delta);
            mode = next_mode;

            let chunk_len = i - start + 1;
            let is_last = i == lines.len() - 1;
            let balanced = running.is_balanced() && matches!(mode, ScanMode::Code);

            let bctx = BoundaryContext {
                lines: &lines,
                index: i,
                language: ctx.language,
            };
            let score = boundary_score(&bctx, &weights, ctx.symbol_tracker);
            let confident_cut = balanced && score >= SCORE_THRESHOLD && chunk_len >= min_lines;

            if is_last || confident_cut || chunk_len >= max_lines {
                if confident_cut {
                    any_confident_cut = true;
                }
                let content = lines[start..=i].join("\n");
                let chunk_type = if score >= SCORE_THRESHOLD {
                    ChunkType::CodeBlock
                } else {
                    ChunkType::Glue
                };
                chunks.push(CodeChunk::new(
                    content,
                    start + 1,
                    i + 1,
                    ctx.language,
                    ctx.path,
                    StrategyKind::SyntaxAware.as_str(),
                    chunk_type,
                ));
                start = i + 1;
                running = SymbolStack::default();
            }
            i += 1;
        }

        if !any_confident_cut {
            anyhow::bail!("no confident syntax boundary found");
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
    fn cuts_after_closing_braces() {
        let mut cfg = Config::default();
        cfg.chunking.min_chunk_size = 1;
        let pool = ParserPool::new();
        let tracker = SymbolBalanceTracker::default();
        let content = "fn a() {\n    1;\n}\n\nfn b() {\n    2;\n}\n";
        let ctx = ChunkContext::new("f.rs", content, Language::Rust, &cfg, &pool, &tracker);
        let chunks = SyntaxAwareStrategy.split(&ctx).unwrap();
        assert!(chunks.len() >= 2);
    }
}
