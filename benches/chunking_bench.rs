use criterion::{black_box, criterion_group, criterion_main, Criterion};

use codegraph_core::chunking::symbol_balance::SymbolBalanceTracker;
use codegraph_core::chunking::{chunk_file, ChunkContext, StrategyKind};
use codegraph_core::config::Config;
use codegraph_core::lang::Language;
use codegraph_core::parser_pool::ParserPool;

const RUST_FILE: &str = include_str!("fixtures/sample.rs");

fn bench_ast_strategy(c: &mut Criterion) {
    let config = Config::default();
    let pool = ParserPool::new();
    let tracker = SymbolBalanceTracker::default();

    c.bench_function("chunk_file/ast/rust_sample", |b| {
        b.iter(|| {
            let ctx = ChunkContext::new(
                "sample.rs",
                black_box(RUST_FILE),
                Language::Rust,
                &config,
                &pool,
                &tracker,
            );
            black_box(chunk_file(StrategyKind::Ast, &ctx))
        });
    });
}

fn bench_universal_line_fallback(c: &mut Criterion) {
    let mut config = Config::default();
    config.features.enable_ast = false;
    config.features.enable_semantic = false;
    config.features.enable_bracket_balance = false;
    let pool = ParserPool::new();
    let tracker = SymbolBalanceTracker::default();

    c.bench_function("chunk_file/universal_line/rust_sample", |b| {
        b.iter(|| {
            let ctx = ChunkContext::new(
                "sample.rs",
                black_box(RUST_FILE),
                Language::Rust,
                &config,
                &pool,
                &tracker,
            );
            black_box(chunk_file(StrategyKind::Ast, &ctx))
        });
    });
}

fn bench_bracket_balance(c: &mut Criterion) {
    let config = Config::default();
    let pool = ParserPool::new();
    let tracker = SymbolBalanceTracker::default();

    c.bench_function("chunk_file/bracket_balance/rust_sample", |b| {
        b.iter(|| {
            let ctx = ChunkContext::new(
                "sample.rs",
                black_box(RUST_FILE),
                Language::Rust,
                &config,
                &pool,
                &tracker,
            );
            black_box(chunk_file(StrategyKind::BracketBalance, &ctx))
        });
    });
}

criterion_group!(benches, bench_ast_strategy, bench_universal_line_fallback, bench_bracket_balance);
criterion_main!(benches);
