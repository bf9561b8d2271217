//! Layer 5 — query-time adjacent-chunk merge (spec §4.5). Runs after
//! retrieval, over whatever chunks a search returned, to paste together
//! neighbors that would otherwise force the caller to re-request context.
//! Three strategies trade off how eagerly they merge.

pub mod aggressive;
pub mod conservative;
pub mod semantic;

use serde::{Deserialize, Serialize};

use crate::chunking::chunk::CodeChunk;
use crate::config::QueryMergeConfig;

/// A retrieved chunk carrying its retrieval score, the unit every merge
/// strategy operates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: CodeChunk,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategyKind {
    Conservative,
    Aggressive,
    Semantic,
}

impl MergeStrategyKind {
    pub fn from_config(config: &QueryMergeConfig) -> Self {
        match config.strategy.as_str() {
            "conservative" => MergeStrategyKind::Conservative,
            "aggressive" => MergeStrategyKind::Aggressive,
            _ => MergeStrategyKind::Semantic,
        }
    }
}

pub trait MergeStrategy {
    fn merge(&self, chunks: Vec<ScoredChunk>, config: &QueryMergeConfig) -> Vec<ScoredChunk>;
}

/// Dispatches to the configured strategy and caps the result at
/// `max_chunk_count` (spec §4.5: "never return more than the configured
/// context budget").
pub fn merge_results(chunks: Vec<ScoredChunk>, config: &QueryMergeConfig) -> Vec<ScoredChunk> {
    if chunks.is_empty() {
        return chunks;
    }
    let merged = match MergeStrategyKind::from_config(config) {
        MergeStrategyKind::Conservative => conservative::ConservativeMerge.merge(chunks, config),
        MergeStrategyKind::Aggressive => aggressive::AggressiveMerge.merge(chunks, config),
        MergeStrategyKind::Semantic => semantic::SemanticMerge.merge(chunks, config),
    };

    let mut ranked = merged;
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(config.max_chunk_count.max(1));
    ranked.sort_by(|a, b| {
        (a.chunk.file_path.as_str(), a.chunk.start_line)
            .cmp(&(b.chunk.file_path.as_str(), b.chunk.start_line))
    });
    ranked
}

/// Groups `chunks` into per-file runs, sorted by `start_line`, the common
/// first step every merge strategy needs before deciding what's adjacent.
pub(crate) fn group_sorted_by_file(mut chunks: Vec<ScoredChunk>) -> Vec<Vec<ScoredChunk>> {
    chunks.sort_by(|a, b| {
        (a.chunk.file_path.as_str(), a.chunk.start_line)
            .cmp(&(b.chunk.file_path.as_str(), b.chunk.start_line))
    });

    let mut groups: Vec<Vec<ScoredChunk>> = Vec::new();
    for chunk in chunks {
        match groups.last_mut() {
            Some(group) if group[0].chunk.file_path == chunk.chunk.file_path => {
                group.push(chunk)
            }
            _ => groups.push(vec![chunk]),
        }
    }
    groups
}

/// Merges two adjacent/overlapping chunks from the same file into one,
/// keeping the higher score and the union of their line spans.
pub(crate) fn combine(a: ScoredChunk, b: ScoredChunk) -> ScoredChunk {
    let start_line = a.chunk.start_line.min(b.chunk.start_line);
    let end_line = a.chunk.end_line.max(b.chunk.end_line);
    let content = if a.chunk.start_line <= b.chunk.start_line {
        format!("{}\n{}", a.chunk.content, b.chunk.content)
    } else {
        format!("{}\n{}", b.chunk.content, a.chunk.content)
    };
    let mut merged_chunk = a.chunk.clone().with_content(content);
    merged_chunk.start_line = start_line;
    merged_chunk.end_line = end_line;
    merged_chunk.chunk_type = crate::chunking::chunk::ChunkType::Merged;
    if a.chunk.file_path != b.chunk.file_path {
        merged_chunk.extras.insert(
            "merged_files".to_string(),
            serde_json::json!([a.chunk.file_path, b.chunk.file_path]),
        );
    }

    ScoredChunk {
        chunk: merged_chunk,
        score: a.score.max(b.score),
    }
}
