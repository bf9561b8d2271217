use tree_sitter::Node;

use crate::lang::Language;

/// Nesting-node kinds per language, used both for nesting-depth and for
/// cyclomatic-style complexity. Grounded in `mcb-ast-utils::complexity`,
/// extended to this crate's language set.
fn is_nesting_kind(kind: &str, language: Language) -> bool {
    if matches!(kind, "block" | "compound_statement" | "suite" | "statement_block") {
        return true;
    }
    is_decision_kind(kind, language) || is_loop_kind(kind, language)
}

fn is_decision_kind(kind: &str, language: Language) -> bool {
    match language {
        Language::Rust => matches!(
            kind,
            "if_expression" | "else_clause" | "match_arm" | "binary_expression"
        ),
        Language::Python => matches!(
            kind,
            "if_statement" | "elif_clause" | "else_clause" | "conditional_expression" | "boolean_operator"
        ),
        Language::JavaScript | Language::TypeScript | Language::Tsx => matches!(
            kind,
            "if_statement" | "else_clause" | "switch_case" | "ternary_expression" | "binary_expression"
        ),
        Language::Java | Language::Kotlin | Language::CSharp => matches!(
            kind,
            "if_statement" | "else_clause" | "switch_expression" | "switch_section" | "ternary_expression" | "binary_expression"
        ),
        Language::Go => matches!(kind, "if_statement" | "expression_case" | "binary_expression"),
        Language::C | Language::Cpp => matches!(
            kind,
            "if_statement" | "else_clause" | "case_statement" | "conditional_expression" | "binary_expression"
        ),
        _ => false,
    }
}

fn is_loop_kind(kind: &str, language: Language) -> bool {
    match language {
        Language::Rust => matches!(kind, "for_expression" | "while_expression" | "loop_expression"),
        Language::Python => matches!(kind, "for_statement" | "while_statement"),
        Language::JavaScript | Language::TypeScript | Language::Tsx => matches!(
            kind,
            "for_statement" | "for_in_statement" | "while_statement" | "do_statement"
        ),
        Language::Java | Language::Kotlin | Language::CSharp => {
            matches!(kind, "for_statement" | "while_statement" | "do_statement" | "for_each_statement")
        }
        Language::Go => matches!(kind, "for_statement"),
        Language::C | Language::Cpp => {
            matches!(kind, "for_statement" | "while_statement" | "do_statement" | "for_range_loop")
        }
        _ => false,
    }
}

/// Iterative (explicit-stack) nesting-depth computation, bounded at 5 per
/// spec §4.4.3 ("nesting_depth (bounded at 5, computed iteratively)").
///
/// Recursion is deliberately avoided: a deeply nested generated file would
/// otherwise risk blowing the call stack, and the spec calls out iterative
/// computation explicitly.
pub fn nesting_depth_iterative(root: Node, language: Language) -> usize {
    const MAX_DEPTH: usize = 5;
    let mut stack: Vec<(Node, usize)> = vec![(root, 0)];
    let mut max_depth = 0;

    while let Some((node, depth)) = stack.pop() {
        let depth_here = if is_nesting_kind(node.kind(), language) {
            (depth + 1).min(MAX_DEPTH)
        } else {
            depth
        };
        if depth_here > max_depth {
            max_depth = depth_here;
        }
        if max_depth >= MAX_DEPTH {
            continue;
        }

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                stack.push((cursor.node(), depth_here));
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
    }

    max_depth
}

/// `complexity = 1 + floor(lines/10) [bounded at 10] + nesting_depth [bounded at 5]`
/// per spec §4.4.3.
pub fn entity_complexity(node: Node, language: Language) -> u32 {
    let start = node.start_position().row;
    let end = node.end_position().row;
    let lines = (end - start + 1) as u32;
    let line_term = (lines / 10).min(10);
    let nesting = nesting_depth_iterative(node, language) as u32;
    1 + line_term + nesting
}

/// Iterative decision/loop count used by the L1 "simple cyclomatic-style
/// complexity" feature (spec §4.1): counts control-flow keywords plus
/// bracket nesting depth over raw bytes, independent of any grammar.
pub fn byte_level_complexity(bytes: &[u8]) -> u32 {
    let text = String::from_utf8_lossy(bytes);
    let mut score = 0u32;
    let mut depth: i32 = 0;
    let mut max_depth: i32 = 0;
    for ch in text.chars() {
        match ch {
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth = (depth - 1).max(0),
            _ => {}
        }
        if depth > max_depth {
            max_depth = depth;
        }
    }
    for kw in [
        "if ", "else", "for ", "while ", "match ", "switch", "case ", "catch", "elif", "&&", "||",
    ] {
        score += text.matches(kw).count() as u32;
    }
    score + max_depth.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    #[test]
    fn nesting_depth_bounds_at_five() {
        let src = "fn f() { if a { if b { if c { if d { if e { if f { 1; } } } } } } }";
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_rust::language()).unwrap();
        let tree = parser.parse(src, None).unwrap();
        let depth = nesting_depth_iterative(tree.root_node(), Language::Rust);
        assert_eq!(depth, 5);
    }

    #[test]
    fn byte_level_complexity_counts_keywords_and_depth() {
        let score = byte_level_complexity(b"if (a) { if (b) { return 1; } }");
        assert!(score >= 2);
    }
}
