//! Aggressive merge (spec §4.5.1): widens the conservative gap tolerance
//! and, when `cross_file` is enabled, also merges chunks from different
//! files into one combined context window as long as the combined size
//! stays under `max_context_size`.

use crate::config::QueryMergeConfig;

use super::{combine, group_sorted_by_file, MergeStrategy, ScoredChunk};

const GAP_MULTIPLIER: usize = 3;

impl ScoredChunk {
    fn char_len(&self) -> usize {
        self.chunk.content.len()
    }
}

pub struct AggressiveMerge;

impl MergeStrategy for AggressiveMerge {
    fn merge(&self, chunks: Vec<ScoredChunk>, config: &QueryMergeConfig) -> Vec<ScoredChunk> {
        let gap_limit = config.conservative_gap_lines * GAP_MULTIPLIER;
        let groups = group_sorted_by_file(chunks);

        let mut per_file: Vec<ScoredChunk> = Vec::new();
        for group in groups {
            let mut iter = group.into_iter();
            let Some(mut current) = iter.next() else {
                continue;
            };
            for next in iter {
                let gap = next.chunk.start_line.saturating_sub(current.chunk.end_line);
                let combined_size = current.char_len() + next.char_len();
                if gap <= gap_limit && combined_size <= config.max_context_size {
                    current = combine(current, next);
                } else {
                    per_file.push(current);
                    current = next;
                }
            }
            per_file.push(current);
        }

        if !config.cross_file {
            return per_file;
        }

        per_file.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        let mut result: Vec<ScoredChunk> = Vec::new();
        for chunk in per_file {
            match result.last_mut() {
                Some(last) if last.char_len() + chunk.char_len() <= config.max_context_size => {
                    let combined = combine(result.pop().unwrap(), chunk);
                    result.push(combined);
                }
                _ => result.push(chunk),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::chunk::{ChunkType, CodeChunk};
    use crate::config::Config;
    use crate::lang::Language;

    fn chunk(path: &str, start: usize, end: usize) -> ScoredChunk {
        ScoredChunk {
            chunk: CodeChunk::new("x".into(), start, end, Language::Rust, path, "t", ChunkType::CodeBlock),
            score: 1.0,
        }
    }

    #[test]
    fn merges_across_wider_gap_within_one_file() {
        let mut config = Config::default().query_merge;
        config.conservative_gap_lines = 3;
        let chunks = vec![chunk("f.rs", 1, 5), chunk("f.rs", 10, 12)];
        let result = AggressiveMerge.merge(chunks, &config);
        assert_eq!(result.len(), 1);
    }
}
