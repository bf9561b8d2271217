//! Conservative merge (spec §4.5.1): only merges chunks from the same
//! file whose line gap is within `conservative_gap_lines`. Never crosses
//! files, regardless of `cross_file`.

use crate::config::QueryMergeConfig;

use super::{combine, group_sorted_by_file, MergeStrategy, ScoredChunk};

pub struct ConservativeMerge;

impl MergeStrategy for ConservativeMerge {
    fn merge(&self, chunks: Vec<ScoredChunk>, config: &QueryMergeConfig) -> Vec<ScoredChunk> {
        let groups = group_sorted_by_file(chunks);
        let mut result = Vec::new();

        for group in groups {
            let mut iter = group.into_iter();
            let Some(mut current) = iter.next() else {
                continue;
            };
            for next in iter {
                let gap = next
                    .chunk
                    .start_line
                    .saturating_sub(current.chunk.end_line);
                if gap <= config.conservative_gap_lines {
                    current = combine(current, next);
                } else {
                    result.push(current);
                    current = next;
                }
            }
            result.push(current);
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

    fn chunk(start: usize, end: usize) -> ScoredChunk {
        ScoredChunk {
            chunk: CodeChunk::new("x".into(), start, end, Language::Rust, "f.rs", "t", ChunkType::CodeBlock),
            score: 1.0,
        }
    }

    #[test]
    fn merges_within_gap_and_keeps_far_apart_separate() {
        let config = Config::default().query_merge;
        let chunks = vec![chunk(1, 5), chunk(7, 10), chunk(100, 110)];
        let result = ConservativeMerge.merge(chunks, &config);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].chunk.end_line, 10);
    }
}
