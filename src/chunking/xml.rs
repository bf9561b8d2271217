//! XML-specialized strategy: splits on top-level elements by tracking tag
//! open/close depth with a small lexical scanner (no general bracket
//! counting applies to angle brackets, so this doesn't reuse
//! [`super::symbol_balance`]).

use anyhow::Result;

use super::chunk::{ChunkType, CodeChunk};
use super::{ChunkContext, Strategy, StrategyKind};

#[derive(Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    SelfClosing,
    Other,
}

fn classify_tags_on_line(line: &str) -> Vec<TagKind> {
    let mut kinds = Vec::new();
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some(end) = line[i..].find('>') {
                let tag = &line[i..i + end + 1];
                if tag.starts_with("<?") || tag.starts_with("<!--") || tag.starts_with("<!") {
                    kinds.push(TagKind::Other);
                } else if tag.ends_with("/>") {
                    kinds.push(TagKind::SelfClosing);
                } else if tag.starts_with("</") {
                    kinds.push(TagKind::Close);
                } else {
                    kinds.push(TagKind::Open);
                }
                i += end + 1;
                continue;
            }
        }
        i += 1;
    }
    kinds
}

pub struct XmlStrategy;

impl Strategy for XmlStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::XmlSpecialized
    }

    fn can_handle(&self, ctx: &ChunkContext) -> bool {
        matches!(ctx.language, crate::lang::Language::Xml | crate::lang::Language::Html)
    }

    fn split(&self, ctx: &ChunkContext) -> Result<Vec<CodeChunk>> {
        let lines: Vec<&str> = ctx.content.lines().collect();
        if lines.is_empty() {
            anyhow::bail!("empty file");
        }

        let mut chunks = Vec::new();
        let mut depth: i32 = 0;
        let mut start = 0usize;
        let mut seen_element_at_depth0 = false;

        for (i, line) in lines.iter().enumerate() {
            for kind in classify_tags_on_line(line) {
                match kind {
                    TagKind::Open => depth += 1,
                    TagKind::Close => depth -= 1,
                    TagKind::SelfClosing | TagKind::Other => {}
                }
            }
            let is_last = i == lines.len() - 1;
            if (depth <= 0 && i > start) || is_last {
                seen_element_at_depth0 = true;
                let content = lines[start..=i].join("\n");
                chunks.push(CodeChunk::new(
                    content,
                    start + 1,
                    i + 1,
                    ctx.language,
                    ctx.path,
                    StrategyKind::XmlSpecialized.as_str(),
                    ChunkType::Element,
                ));
                start = i + 1;
                depth = 0;
            }
        }

        if !seen_element_at_depth0 {
            anyhow::bail!("no top-level elements found");
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::symbol_balance::SymbolBalanceTracker;
    use crate::config::Config;
    use crate::lang::Language;
    use crate::parser_pool::ParserPool;

    #[test]
    fn splits_top_level_elements() {
        let cfg = Config::default();
        let pool = ParserPool::new();
        let tracker = SymbolBalanceTracker::default();
        let content = "<a>\n  <b/>\n</a>\n<c>\n</c>\n";
        let ctx = ChunkContext::new("f.xml", content, Language::Xml, &cfg, &pool, &tracker);
        let chunks = XmlStrategy.split(&ctx).unwrap();
        assert_eq!(chunks.len(), 2);
    }
}
