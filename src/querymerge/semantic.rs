//! Semantic merge (spec §4.5.1): merges same-file chunks whose content
//! similarity clears `similarity_threshold`, regardless of line gap. No
//! embedding model is wired into this core (spec Non-goals), so
//! similarity is a token-overlap (Jaccard) estimate over lowercased
//! word-ish tokens — a cheap stand-in a caller can override by
//! re-ranking before merge.

use std::collections::HashSet;

use crate::config::QueryMergeConfig;

use super::{combine, group_sorted_by_file, MergeStrategy, ScoredChunk};

fn tokenize(content: &str) -> HashSet<String> {
    content
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.len() > 1)
        .map(|t| t.to_ascii_lowercase())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

pub struct SemanticMerge;

impl MergeStrategy for SemanticMerge {
    fn merge(&self, chunks: Vec<ScoredChunk>, config: &QueryMergeConfig) -> Vec<ScoredChunk> {
        let groups = group_sorted_by_file(chunks);
        let mut result = Vec::new();

        for group in groups {
            let mut iter = group.into_iter();
            let Some(mut current) = iter.next() else {
                continue;
            };
            let mut current_tokens = tokenize(&current.chunk.content);

            for next in iter {
                let next_tokens = tokenize(&next.chunk.content);
                let similarity = jaccard(&current_tokens, &next_tokens);
                if similarity >= config.similarity_threshold {
                    let next_content_tokens = next_tokens.clone();
                    current = combine(current, next);
                    current_tokens.extend(next_content_tokens);
                } else {
                    result.push(current);
                    current = next;
                    current_tokens = next_tokens;
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

    fn chunk(start: usize, end: usize, content: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: CodeChunk::new(content.into(), start, end, Language::Rust, "f.rs", "t", ChunkType::CodeBlock),
            score: 1.0,
        }
    }

    #[test]
    fn merges_similar_content_regardless_of_gap() {
        let mut config = Config::default().query_merge;
        config.similarity_threshold = 0.3;
        let chunks = vec![
            chunk(1, 2, "fn parse_token stream lexer"),
            chunk(50, 51, "fn parse_token stream parser"),
        ];
        let result = SemanticMerge.merge(chunks, &config);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn keeps_dissimilar_content_separate() {
        let config = Config::default().query_merge;
        let chunks = vec![chunk(1, 2, "alpha beta gamma"), chunk(3, 4, "completely unrelated words here")];
        let result = SemanticMerge.merge(chunks, &config);
        assert_eq!(result.len(), 2);
    }
}
