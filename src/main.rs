use anyhow::{Context, Result};
use codegraph_core::chunking::symbol_balance::SymbolBalanceTracker;
use codegraph_core::chunking::{chunk_file, ChunkContext};
use codegraph_core::cli::{Cli, Commands};
use codegraph_core::config::ConfigManager;
use codegraph_core::detection::LanguageDetector;
use codegraph_core::normalize::Normalizer;
use codegraph_core::parser_pool::ParserPool;
use codegraph_core::postprocess::{run_pipeline, PostProcessContext};
use codegraph_core::querymerge::{merge_results, ScoredChunk};
use codegraph_core::utils::{print_error, print_info, print_success, print_warning};
use codegraph_core::walker::FileWalker;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config_manager = ConfigManager::new()?;

    match cli.command {
        Commands::Detect { path, json } => handle_detect(path, json).await?,
        Commands::Chunk { path, strategy, json } => {
            handle_chunk(config_manager, path, strategy, json).await?
        }
        Commands::Normalize { path, json } => handle_normalize(config_manager, path, json).await?,
        Commands::Pipeline { paths, json } => handle_pipeline(config_manager, paths, json).await?,
        Commands::Merge { input, strategy } => handle_merge(config_manager, input, strategy).await?,
        Commands::Config { set, print } => handle_config(config_manager, set, print).await?,
    }

    Ok(())
}

async fn handle_detect(path: PathBuf, json: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(&path).await.ok();
    let detector = LanguageDetector::new();
    let path_str = path.to_string_lossy();
    let (result, fallback) = detector.detect_or_text(&path_str, content.as_deref());

    if json {
        println!(
            "{}",
            serde_json::json!({
                "language": result.language.tag(),
                "file_type": result.file_type.as_str(),
                "recommended_strategy": result.recommended_strategy.as_str(),
                "confidence": result.confidence,
                "fallback_reason": fallback.map(|r| r.as_str()),
            })
        );
    } else {
        print_info(&format!(
            "{} -> language={} file_type={} strategy={} confidence={:.2}",
            path.display(),
            result.language.tag(),
            result.file_type.as_str(),
            result.recommended_strategy,
            result.confidence
        ));
        if let Some(reason) = fallback {
            print_warning(&format!("detection degraded: {reason:?}"));
        }
    }
    Ok(())
}

async fn handle_chunk(
    config_manager: ConfigManager,
    path: PathBuf,
    strategy: Option<String>,
    json: bool,
) -> Result<()> {
    let config = config_manager.load().await?;
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    let path_str = path.to_string_lossy().to_string();
    let detector = LanguageDetector::new();
    let (detection, _) = detector.detect_or_text(&path_str, Some(&content));
    let recommended = strategy
        .as_deref()
        .and_then(strategy_kind_from_str)
        .unwrap_or(detection.recommended_strategy);

    let pool = ParserPool::new();
    let tracker = SymbolBalanceTracker::default();
    let ctx = ChunkContext::new(&path_str, &content, detection.language, &config, &pool, &tracker);
    let result = chunk_file(recommended, &ctx);

    let lines: Vec<&str> = content.lines().collect();
    let post_ctx = PostProcessContext {
        lines: &lines,
        language: detection.language,
        config: &config,
        tracker: &tracker,
    };
    let chunks = run_pipeline(result.chunks, &post_ctx);

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
    } else {
        print_info(&format!(
            "{} chunks via {} ({}ms){}",
            chunks.len(),
            result.strategy_used,
            result.execution_ms,
            result
                .fallback_reason
                .map(|r| format!(", fallback={r:?}"))
                .unwrap_or_default()
        ));
        for chunk in &chunks {
            println!(
                "  {:>5}-{:<5} {:<10} {}",
                chunk.start_line,
                chunk.end_line,
                chunk.chunk_type.as_str(),
                chunk.strategy_name
            );
        }
    }
    Ok(())
}

async fn handle_normalize(config_manager: ConfigManager, path: PathBuf, json: bool) -> Result<()> {
    let config = config_manager.load().await?;
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let path_str = path.to_string_lossy().to_string();

    let detector = LanguageDetector::new();
    let (detection, _) = detector.detect_or_text(&path_str, Some(&content));

    let pool = ParserPool::new();
    let normalizer = Normalizer::new(config.performance.ast_cache_capacity);
    let (graph, descriptions) =
        normalizer.normalize_file(&path_str, &content, detection.language, &pool, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
    } else {
        print_info(&format!(
            "{} entities, {} relationships",
            graph.entities.len(),
            graph.relationships.len()
        ));
        for description in &descriptions {
            println!("  {description}");
        }
    }
    Ok(())
}

async fn handle_pipeline(config_manager: ConfigManager, paths: Vec<PathBuf>, json: bool) -> Result<()> {
    let config = config_manager.load().await?;
    let files = FileWalker::new().collect(&paths)?;
    print_info(&format!("processing {} files", files.len()));

    let detector = LanguageDetector::new();
    let pool = ParserPool::new();
    let normalizer = Normalizer::new(config.performance.ast_cache_capacity);

    let mut failed = 0usize;
    let mut total_chunks = 0usize;
    let mut total_entities = 0usize;

    for path in &files {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(c) => c,
            Err(_) => {
                failed += 1;
                continue;
            }
        };
        let path_str = path.to_string_lossy().to_string();
        let tracker = SymbolBalanceTracker::default();
        let (detection, _) = detector.detect_or_text(&path_str, Some(&content));

        let ctx = ChunkContext::new(&path_str, &content, detection.language, &config, &pool, &tracker);
        let chunk_result = chunk_file(detection.recommended_strategy, &ctx);

        let lines: Vec<&str> = content.lines().collect();
        let post_ctx = PostProcessContext {
            lines: &lines,
            language: detection.language,
            config: &config,
            tracker: &tracker,
        };
        let chunks = run_pipeline(chunk_result.chunks, &post_ctx);
        total_chunks += chunks.len();

        match normalizer.normalize_file(&path_str, &content, detection.language, &pool, &config) {
            Ok((graph, _)) => total_entities += graph.entities.len(),
            Err(_) => failed += 1,
        }

        if json {
            println!(
                "{}",
                serde_json::json!({
                    "path": path_str,
                    "language": detection.language.tag(),
                    "chunks": chunks.len(),
                    "strategy": chunk_result.strategy_used.as_str(),
                })
            );
        }
    }

    print_success(&format!(
        "{} files, {} chunks, {} entities",
        files.len(),
        total_chunks,
        total_entities
    ));
    if failed > 0 {
        print_warning(&format!("{failed} files failed to process"));
    }
    Ok(())
}

async fn handle_merge(
    config_manager: ConfigManager,
    input: PathBuf,
    strategy: Option<String>,
) -> Result<()> {
    let mut config = config_manager.load().await?;
    if let Some(strategy) = strategy {
        config.query_merge.strategy = strategy;
    }

    let content = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;
    let chunks: Vec<ScoredChunk> = serde_json::from_str(&content)
        .context("expected a JSON array of {chunk, score} objects")?;

    let merged = merge_results(chunks, &config.query_merge);
    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}

async fn handle_config(config_manager: ConfigManager, set: Option<String>, print: bool) -> Result<()> {
    if let Some(key_value) = set {
        let parts: Vec<&str> = key_value.splitn(2, '=').collect();
        if parts.len() != 2 {
            print_error("Invalid format. Use: --set key=value");
            return Ok(());
        }

        config_manager.set_value(parts[0], parts[1]).await?;
        print_success(&format!("Set {} = {}", parts[0], parts[1]));
    }

    if print {
        let config = config_manager.load().await?;
        let config_str = toml::to_string_pretty(&config)?;
        println!("{}", config_str);
        println!(
            "\nConfig file location: {}",
            config_manager.config_path().display()
        );
    }

    Ok(())
}

fn strategy_kind_from_str(s: &str) -> Option<codegraph_core::chunking::StrategyKind> {
    use codegraph_core::chunking::StrategyKind;
    match s {
        "ast" => Some(StrategyKind::Ast),
        "syntax-aware" => Some(StrategyKind::SyntaxAware),
        "semantic" => Some(StrategyKind::Semantic),
        "bracket-balance" => Some(StrategyKind::BracketBalance),
        "universal-line" => Some(StrategyKind::UniversalLine),
        "markdown-specialized" => Some(StrategyKind::MarkdownSpecialized),
        "xml-specialized" => Some(StrategyKind::XmlSpecialized),
        "emergency-single-chunk" => Some(StrategyKind::EmergencySingleChunk),
        _ => None,
    }
}
