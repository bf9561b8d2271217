//! Stage 5: overlap injection (spec §4.3.5). When
//! `features.enable_overlap` is on, prefixes each chunk (after the first)
//! with up to `overlap_lines` trailing lines from its predecessor's
//! source span, capped so the added prefix never exceeds
//! `max_overlap_ratio` of the chunk's own length. Line bounds
//! (`start_line`/`end_line`) are left untouched — only `content` grows —
//! so this stage never needs to run before `boundary_optimization`.

use crate::chunking::chunk::{ChunkType, CodeChunk};

use super::{PostProcessContext, Processor};

pub struct OverlapInjection;

impl Processor for OverlapInjection {
    fn name(&self) -> &'static str {
        "overlap_injection"
    }

    fn process(&self, mut chunks: Vec<CodeChunk>, ctx: &PostProcessContext) -> Vec<CodeChunk> {
        if !ctx.config.features.enable_overlap || chunks.len() < 2 || ctx.lines.is_empty() {
            return chunks;
        }

        let overlap_lines = ctx.config.chunking.overlap_lines;
        let max_ratio = ctx.config.chunking.max_overlap_ratio;
        if overlap_lines == 0 {
            return chunks;
        }

        for i in 1..chunks.len() {
            if chunks[i].chunk_type == ChunkType::Heading {
                continue;
            }
            let prev_end = chunks[i - 1].end_line;
            let prev_start = chunks[i - 1].start_line;
            let available = prev_end.saturating_sub(prev_start) + 1;
            let take = overlap_lines.min(available);
            if take == 0 {
                continue;
            }

            let prefix_start = prev_end.saturating_sub(take) + 1;
            if prefix_start < 1 || prefix_start > ctx.lines.len() || prev_end > ctx.lines.len() {
                continue;
            }
            let prefix = ctx.lines[prefix_start - 1..prev_end].join("\n");

            let current_len = chunks[i].content.len();
            if current_len > 0 && (prefix.len() as f64) > max_ratio * current_len as f64 {
                continue;
            }

            let new_content = format!("{}\n{}", prefix, chunks[i].content);
            chunks[i] = chunks[i].clone().with_content(new_content);
        }

        chunks
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
    fn prefixes_trailing_lines_from_predecessor() {
        let mut config = Config::default();
        config.features.enable_overlap = true;
        config.chunking.overlap_lines = 2;
        config.chunking.max_overlap_ratio = 0.9;
        let tracker = SymbolBalanceTracker::default();
        let lines = vec!["one", "two", "three", "four"];
        let ctx = PostProcessContext {
            lines: &lines,
            language: Language::Text,
            config: &config,
            tracker: &tracker,
        };
        let chunks = vec![
            CodeChunk::new("one\ntwo".into(), 1, 2, Language::Text, "f.txt", "t", ChunkType::Text),
            CodeChunk::new("three\nfour".into(), 3, 4, Language::Text, "f.txt", "t", ChunkType::Text),
        ];
        let result = OverlapInjection.process(chunks, &ctx);
        assert!(result[1].content.starts_with("one\ntwo"));
    }

    #[test]
    fn disabled_by_default_leaves_chunks_untouched() {
        let config = Config::default();
        let tracker = SymbolBalanceTracker::default();
        let lines = vec!["one", "two"];
        let ctx = PostProcessContext {
            lines: &lines,
            language: Language::Text,
            config: &config,
            tracker: &tracker,
        };
        let chunks = vec![
            CodeChunk::new("one".into(), 1, 1, Language::Text, "f.txt", "t", ChunkType::Text),
            CodeChunk::new("two".into(), 2, 2, Language::Text, "f.txt", "t", ChunkType::Text),
        ];
        let result = OverlapInjection.process(chunks, &ctx);
        assert_eq!(result[1].content, "two");
    }

    #[test]
    fn never_prefixes_a_heading_chunk() {
        let mut config = Config::default();
        config.features.enable_overlap = true;
        config.chunking.overlap_lines = 2;
        config.chunking.max_overlap_ratio = 0.9;
        let tracker = SymbolBalanceTracker::default();
        let lines = vec!["one", "two", "# Heading", "body"];
        let ctx = PostProcessContext {
            lines: &lines,
            language: Language::Markdown,
            config: &config,
            tracker: &tracker,
        };
        let chunks = vec![
            CodeChunk::new("one\ntwo".into(), 1, 2, Language::Markdown, "f.md", "t", ChunkType::Text),
            CodeChunk::new("# Heading\nbody".into(), 3, 4, Language::Markdown, "f.md", "t", ChunkType::Heading),
        ];
        let result = OverlapInjection.process(chunks, &ctx);
        assert_eq!(result[1].content, "# Heading\nbody");
    }
}
