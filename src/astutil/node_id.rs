use tree_sitter::Node;

/// The single source of node identity across the system (spec §4.4.1):
///
/// ```text
/// node_id(n) = "{n.node_type}:{n.start_row}:{n.start_col}"
/// ```
///
/// Every adapter, cache key and relationship extractor must call this
/// function rather than rolling its own — that is what makes P4/P5/P6
/// (spec §8) testable at all.
pub fn node_id(node: &Node) -> String {
    let start = node.start_position();
    format!("{}:{}:{}", node.kind(), start.row, start.column)
}

/// Resolves the invariant-I4 tie-break: when two captured nodes share
/// `(type, row, col)`, keep the one with the greater end position.
pub fn prefer_wider<'a>(a: Node<'a>, b: Node<'a>) -> Node<'a> {
    if b.end_position() > a.end_position() {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(src: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_rust::language()).unwrap();
        parser.parse(src, None).unwrap()
    }

    #[test]
    fn node_id_is_deterministic_and_positional() {
        let tree = parse("fn a() {}\nfn b() {}\n");
        let root = tree.root_node();
        let mut cursor = root.walk();
        let children: Vec<_> = root.named_children(&mut cursor).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(node_id(&children[0]), "function_item:0:0");
        assert_eq!(node_id(&children[1]), "function_item:1:0");
    }

    #[test]
    fn same_source_yields_same_ids_on_reparse() {
        let src = "fn a() { let x = 1; }\n";
        let ids_a: Vec<String> = {
            let tree = parse(src);
            let mut cursor = tree.root_node().walk();
            tree.root_node()
                .named_children(&mut cursor)
                .map(|n| node_id(&n))
                .collect()
        };
        let ids_b: Vec<String> = {
            let tree = parse(src);
            let mut cursor = tree.root_node().walk();
            tree.root_node()
                .named_children(&mut cursor)
                .map(|n| node_id(&n))
                .collect()
        };
        assert_eq!(ids_a, ids_b);
    }
}
