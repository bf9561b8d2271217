//! Stage 4: boundary optimization (spec §4.3.4). For each adjacent pair of
//! chunks, searches a `boundary_window`-line neighborhood around the
//! existing cut for a higher-scoring split point (via
//! [`crate::chunking::boundary_score`]) and moves the cut there if one is
//! found. Never lets either side become empty.

use crate::chunking::boundary_score::{boundary_score, weights_for, BoundaryContext};
use crate::chunking::chunk::CodeChunk;

use super::{PostProcessContext, Processor};

pub struct BoundaryOptimization;

impl Processor for BoundaryOptimization {
    fn name(&self) -> &'static str {
        "boundary_optimization"
    }

    fn process(&self, mut chunks: Vec<CodeChunk>, ctx: &PostProcessContext) -> Vec<CodeChunk> {
        if chunks.len() < 2 || ctx.lines.is_empty() {
            return chunks;
        }

        let weights = weights_for(ctx.language);
        let window = ctx.config.chunking.boundary_window;

        for i in 0..chunks.len() - 1 {
            let lower_bound = chunks[i].start_line;
            let upper_bound = chunks[i + 1].end_line.saturating_sub(1);
            if lower_bound >= upper_bound {
                continue;
            }

            let current_cut = chunks[i].end_line;
            let search_start = current_cut.saturating_sub(window).max(lower_bound);
            let search_end = (current_cut + window).min(upper_bound);

            let score_at = |cut_line: usize| -> f64 {
                let idx = cut_line.saturating_sub(1).min(ctx.lines.len().saturating_sub(1));
                let bctx = BoundaryContext {
                    lines: ctx.lines,
                    index: idx,
                    language: ctx.language,
                };
                boundary_score(&bctx, &weights, ctx.tracker)
            };

            let mut best_cut = current_cut;
            let mut best_score = score_at(current_cut);
            for candidate in search_start..=search_end {
                let s = score_at(candidate);
                if s > best_score {
                    best_score = s;
                    best_cut = candidate;
                }
            }

            if best_cut != current_cut {
                let total_start = chunks[i].start_line;
                let total_end = chunks[i + 1].end_line;
                let file_path = chunks[i].file_path.clone();

                let left_lines = &ctx.lines[total_start - 1..best_cut];
                let right_lines = &ctx.lines[best_cut..total_end];

                chunks[i] = chunks[i].clone().with_content(left_lines.join("\n"));
                chunks[i].end_line = best_cut;

                chunks[i + 1] = chunks[i + 1].clone().with_content(right_lines.join("\n"));
                chunks[i + 1].start_line = best_cut + 1;
                let _ = file_path;
            }
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
    fn shifts_cut_toward_closing_brace() {
        let config = Config::default();
        let tracker = SymbolBalanceTracker::default();
        let lines = vec!["fn a() {", "    1;", "}", "fn b() {", "    2;", "}"];
        let ctx = PostProcessContext {
            lines: &lines,
            language: Language::Rust,
            config: &config,
            tracker: &tracker,
        };
        let chunks = vec![
            CodeChunk::new("fn a() {\n    1;".into(), 1, 2, Language::Rust, "f.rs", "t", ChunkType::CodeBlock),
            CodeChunk::new("}\nfn b() {\n    2;\n}".into(), 3, 6, Language::Rust, "f.rs", "t", ChunkType::CodeBlock),
        ];
        let result = BoundaryOptimization.process(chunks, &ctx);
        assert_eq!(result[0].end_line, 3);
        assert_eq!(result[1].start_line, 4);
    }
}
