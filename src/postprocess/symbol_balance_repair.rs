//! Stage 1: symbol-balance repair (spec §4.3.1). A chunk whose content
//! isn't symbol-balanced on its own is merged forward with its immediate
//! successor, repeatedly, until balance is restored or chunks run out.
//! Grounded on [`crate::chunking::symbol_balance`].

use crate::chunking::chunk::CodeChunk;

use super::{PostProcessContext, Processor};

pub struct SymbolBalanceRepair;

impl Processor for SymbolBalanceRepair {
    fn name(&self) -> &'static str {
        "symbol_balance_repair"
    }

    fn process(&self, chunks: Vec<CodeChunk>, ctx: &PostProcessContext) -> Vec<CodeChunk> {
        let mut out: Vec<CodeChunk> = Vec::with_capacity(chunks.len());
        let mut iter = chunks.into_iter().peekable();

        while let Some(mut current) = iter.next() {
            while !ctx
                .tracker
                .scan_chunk(&current.content, ctx.language)
                .is_balanced()
            {
                match iter.next() {
                    Some(next) => {
                        let merged_content = format!("{}\n{}", current.content, next.content);
                        let merged_end = next.end_line;
                        current = current.with_content(merged_content);
                        current.end_line = merged_end;
                        current.chunk_type = crate::chunking::chunk::ChunkType::Merged;
                    }
                    None => break,
                }
            }
            out.push(current);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::chunk::ChunkType;
    use crate::chunking::symbol_balance::SymbolBalanceTracker;
    use crate::config::Config;
    use crate::lang::Language;

    #[test]
    fn merges_forward_until_balanced() {
        let config = Config::default();
        let tracker = SymbolBalanceTracker::default();
        let lines: Vec<&str> = vec![];
        let ctx = PostProcessContext {
            lines: &lines,
            language: Language::Rust,
            config: &config,
            tracker: &tracker,
        };
        let chunks = vec![
            CodeChunk::new("fn a() {".into(), 1, 1, Language::Rust, "f.rs", "t", ChunkType::Function),
            CodeChunk::new("    1;".into(), 2, 2, Language::Rust, "f.rs", "t", ChunkType::Glue),
            CodeChunk::new("}".into(), 3, 3, Language::Rust, "f.rs", "t", ChunkType::Glue),
        ];
        let repaired = SymbolBalanceRepair.process(chunks, &ctx);
        assert_eq!(repaired.len(), 1);
        assert_eq!(repaired[0].end_line, 3);
    }
}
