//! Stage 3: rebalance tail (spec §4.3.3). `filter_and_merge` only merges
//! forward, so a final undersized chunk with no successor survives it —
//! this stage folds a too-small last chunk backward into its predecessor.

use crate::chunking::chunk::ChunkType;

use super::{PostProcessContext, Processor};

pub struct RebalanceTail;

impl Processor for RebalanceTail {
    fn name(&self) -> &'static str {
        "rebalance_tail"
    }

    fn process(
        &self,
        mut chunks: Vec<crate::chunking::chunk::CodeChunk>,
        ctx: &PostProcessContext,
    ) -> Vec<crate::chunking::chunk::CodeChunk> {
        if chunks.len() < 2 {
            return chunks;
        }
        let min_chars = ctx.config.chunking.min_chunk_size;
        let tail = chunks.last().unwrap();
        if tail.content.len() >= min_chars {
            return chunks;
        }

        let tail = chunks.pop().unwrap();
        let prev = chunks.last_mut().unwrap();
        let new_content = format!("{}\n{}", prev.content, tail.content);
        let new_end = tail.end_line;
        *prev = prev.clone().with_content(new_content);
        prev.end_line = new_end;
        prev.chunk_type = ChunkType::Merged;

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::chunk::CodeChunk;
    use crate::chunking::symbol_balance::SymbolBalanceTracker;
    use crate::config::Config;
    use crate::lang::Language;

    #[test]
    fn folds_small_tail_into_previous() {
        let mut config = Config::default();
        config.chunking.min_chunk_size = 10;
        let tracker = SymbolBalanceTracker::default();
        let lines: Vec<&str> = vec![];
        let ctx = PostProcessContext {
            lines: &lines,
            language: Language::Rust,
            config: &config,
            tracker: &tracker,
        };
        let chunks = vec![
            CodeChunk::new("a long enough first chunk".into(), 1, 1, Language::Rust, "f.rs", "t", ChunkType::CodeBlock),
            CodeChunk::new("x".into(), 2, 2, Language::Rust, "f.rs", "t", ChunkType::Glue),
        ];
        let result = RebalanceTail.process(chunks, &ctx);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].end_line, 2);
    }
}
