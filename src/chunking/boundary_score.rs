use crate::lang::Language;

use super::symbol_balance::{ScanMode, SymbolBalanceTracker};

/// Per-language weight vector for the boundary-score formula (spec §4.2.5).
/// Callers may override; these are the fixed-table defaults.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryWeights {
    pub syntactic: f64,
    pub function: f64,
    pub class: f64,
    pub method: f64,
    pub import: f64,
    pub logical: f64,
    pub comment: f64,
}

impl Default for BoundaryWeights {
    fn default() -> Self {
        Self {
            syntactic: 1.0,
            function: 1.0,
            class: 1.0,
            method: 1.0,
            import: 1.0,
            logical: 1.0,
            comment: 1.0,
        }
    }
}

pub fn weights_for(language: Language) -> BoundaryWeights {
    match language {
        Language::Python | Language::Rust | Language::Go => BoundaryWeights::default(),
        Language::JavaScript | Language::TypeScript | Language::Tsx => BoundaryWeights {
            import: 1.2,
            ..BoundaryWeights::default()
        },
        Language::Markdown => BoundaryWeights {
            logical: 1.3,
            comment: 0.2,
            ..BoundaryWeights::default()
        },
        _ => BoundaryWeights::default(),
    }
}

fn trimmed(line: &str) -> &str {
    line.trim()
}

fn is_function_end(line: &str, language: Language) -> bool {
    let t = trimmed(line);
    match language {
        Language::Python => t == "}" || (t.is_empty()),
        _ => t == "}" || t.ends_with("};"),
    }
}

fn is_class_end(line: &str, _language: Language) -> bool {
    trimmed(line) == "}"
}

fn is_method_end(line: &str, language: Language) -> bool {
    is_function_end(line, language)
}

fn is_import_end(line: &str, next: Option<&str>) -> bool {
    let t = trimmed(line);
    let is_import_line = t.starts_with("import ")
        || t.starts_with("from ")
        || t.starts_with("use ")
        || t.starts_with("require(")
        || t.starts_with("#include");
    let next_is_import = next
        .map(|n| {
            let n = trimmed(n);
            n.starts_with("import ")
                || n.starts_with("from ")
                || n.starts_with("use ")
                || n.starts_with("#include")
        })
        .unwrap_or(false);
    is_import_line && !next_is_import
}

fn is_comment_block_end(line: &str) -> bool {
    let t = trimmed(line);
    t.ends_with("*/") || t.starts_with("///") || t.starts_with("//!") || t.starts_with('#')
}

fn is_empty(line: &str) -> bool {
    trimmed(line).is_empty()
}

/// "Logical separation" heuristic: an empty line preceded by non-empty
/// content and followed by non-empty content at the same or shallower
/// indentation, i.e. a genuine paragraph break rather than incidental
/// whitespace inside a block.
fn has_logical_separation(before: Option<&str>, after: Option<&str>) -> bool {
    match (before, after) {
        (Some(b), Some(a)) => !trimmed(b).is_empty() && !trimmed(a).is_empty(),
        _ => false,
    }
}

/// Context window of up to 3 lines before/after the candidate split at
/// line `index` (0-based) within `lines`.
pub struct BoundaryContext<'a> {
    pub lines: &'a [&'a str],
    pub index: usize,
    pub language: Language,
}

impl<'a> BoundaryContext<'a> {
    fn line(&self, offset: isize) -> Option<&'a str> {
        let target = self.index as isize + offset;
        if target < 0 {
            return None;
        }
        self.lines.get(target as usize).copied()
    }
}

/// Computes the [0,1] boundary score for splitting after line `index`,
/// per the weighted formula in spec §4.2.5.
pub fn boundary_score(
    ctx: &BoundaryContext,
    weights: &BoundaryWeights,
    tracker: &SymbolBalanceTracker,
) -> f64 {
    let line = ctx.line(0).unwrap_or("");
    let next = ctx.line(1);
    let before = ctx.line(-1);

    let syntactic_safe = {
        let (delta, _) = tracker.scan(line, ctx.language, ScanMode::Code);
        delta.is_balanced()
    };

    let mut score = 0.0;
    score += weights.syntactic * 0.3 * bool_to_f64(syntactic_safe);
    score += weights.function * 0.40 * bool_to_f64(is_function_end(line, ctx.language));
    score += weights.class * 0.40 * bool_to_f64(is_class_end(line, ctx.language));
    score += weights.method * 0.35 * bool_to_f64(is_method_end(line, ctx.language));
    score += weights.import * 0.20 * bool_to_f64(is_import_end(line, next));
    score += weights.logical
        * 0.50
        * bool_to_f64(is_empty(line) && has_logical_separation(before, next));
    score += weights.comment * 0.10 * bool_to_f64(is_comment_block_end(line));

    score.clamp(0.0, 1.0)
}

fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_brace_scores_above_zero() {
        let lines = ["fn f() {", "    1", "}", ""];
        let tracker = SymbolBalanceTracker::default();
        let ctx = BoundaryContext {
            lines: &lines,
            index: 2,
            language: Language::Rust,
        };
        let score = boundary_score(&ctx, &weights_for(Language::Rust), &tracker);
        assert!(score > 0.5, "expected high score, got {score}");
    }

    #[test]
    fn mid_statement_scores_low() {
        let lines = ["let x = compute(", "    1, 2, 3", ");"];
        let tracker = SymbolBalanceTracker::default();
        let ctx = BoundaryContext {
            lines: &lines,
            index: 1,
            language: Language::Rust,
        };
        let score = boundary_score(&ctx, &weights_for(Language::Rust), &tracker);
        assert!(score < 0.5, "expected low score, got {score}");
    }
}
