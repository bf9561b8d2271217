//! Layer 3 — the post-processing pipeline (spec §4.3): five pure stages
//! run in a fixed, config-selectable order over the chunks one strategy
//! produced. Each stage takes the previous stage's output and the
//! original file lines (never the original strategy internals) and
//! returns a brand-new `Vec<CodeChunk>` — consistent with `CodeChunk`
//! being a value object (spec §3 I5/I6).

pub mod boundary_optimization;
pub mod filter_and_merge;
pub mod overlap_injection;
pub mod rebalance_tail;
pub mod symbol_balance_repair;

use crate::chunking::chunk::CodeChunk;
use crate::chunking::symbol_balance::SymbolBalanceTracker;
use crate::config::Config;
use crate::lang::Language;

/// Shared read-only context every processor gets: the original file,
/// split into lines once, plus the config knobs and symbol tracker they
/// need. Processors never see the strategy that produced the chunks.
pub struct PostProcessContext<'a> {
    pub lines: &'a [&'a str],
    pub language: Language,
    pub config: &'a Config,
    pub tracker: &'a SymbolBalanceTracker,
}

/// One stage of the pipeline (spec §4.3: "each processor: pure function,
/// total ordering preserved, idempotent on an already-clean input").
pub trait Processor {
    fn name(&self) -> &'static str;
    fn process(&self, chunks: Vec<CodeChunk>, ctx: &PostProcessContext) -> Vec<CodeChunk>;
}

fn processor_by_name(name: &str) -> Option<Box<dyn Processor>> {
    match name {
        "symbol_balance_repair" => Some(Box::new(symbol_balance_repair::SymbolBalanceRepair)),
        "filter_and_merge" => Some(Box::new(filter_and_merge::FilterAndMerge)),
        "rebalance_tail" => Some(Box::new(rebalance_tail::RebalanceTail)),
        "boundary_optimization" => Some(Box::new(boundary_optimization::BoundaryOptimization)),
        "overlap_injection" => Some(Box::new(overlap_injection::OverlapInjection)),
        _ => None,
    }
}

/// Runs `config.post_processing.enabled_processors` in order over `chunks`,
/// skipping unrecognized names (new/removed stages shouldn't hard-fail a
/// run — spec §7: post-processing defects recover locally).
pub fn run_pipeline(chunks: Vec<CodeChunk>, ctx: &PostProcessContext) -> Vec<CodeChunk> {
    let mut current = chunks;
    for name in &ctx.config.post_processing.enabled_processors {
        if let Some(processor) = processor_by_name(name) {
            current = processor.process(current, ctx);
            if current.is_empty() {
                break;
            }
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::chunk::ChunkType;
    use crate::lang::Language;

    #[test]
    fn pipeline_runs_all_default_stages_without_panicking() {
        let config = Config::default();
        let tracker = SymbolBalanceTracker::default();
        let lines = vec!["fn a() {", "    1;", "}", "", "fn b() {", "    2;", "}"];
        let ctx = PostProcessContext {
            lines: &lines,
            language: Language::Rust,
            config: &config,
            tracker: &tracker,
        };
        let chunks = vec![
            CodeChunk::new("fn a() {\n    1;\n}".into(), 1, 3, Language::Rust, "f.rs", "test", ChunkType::Function),
            CodeChunk::new("".into(), 4, 4, Language::Rust, "f.rs", "test", ChunkType::Glue),
            CodeChunk::new("fn b() {\n    2;\n}".into(), 5, 7, Language::Rust, "f.rs", "test", ChunkType::Function),
        ];
        let result = run_pipeline(chunks, &ctx);
        assert!(!result.is_empty());
    }
}
