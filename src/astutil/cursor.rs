use tree_sitter::Node;

/// Tree-sitter navigation helpers, grounded in `mcb-ast-utils::cursor`.
pub struct CursorUtils;

impl CursorUtils {
    pub fn named_children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor).collect()
    }

    pub fn children_of_kind<'a>(node: Node<'a>, kind: &str) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|child| child.kind() == kind)
            .collect()
    }

    pub fn child_by_field<'a>(node: Node<'a>, field: &str) -> Option<Node<'a>> {
        node.child_by_field_name(field)
    }

    /// Whether `outer` strictly contains `inner` (used by the AST
    /// strategy's containment rule, spec §4.2.1).
    pub fn strictly_contains(outer: Node, inner: Node) -> bool {
        outer.id() != inner.id()
            && outer.start_byte() <= inner.start_byte()
            && outer.end_byte() >= inner.end_byte()
    }

    /// Depth-first search for every node of a given kind rooted at `node`.
    pub fn find_by_kind<'a>(node: Node<'a>, kind: &str) -> Vec<Node<'a>> {
        let mut results = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if n.kind() == kind {
                results.push(n);
            }
            let mut cursor = n.walk();
            if cursor.goto_first_child() {
                loop {
                    stack.push(cursor.node());
                    if !cursor.goto_next_sibling() {
                        break;
                    }
                }
            }
        }
        results
    }

    /// Byte-slice source text for a node, verbatim (spec §4.4.3: "slice
    /// content from the source by byte offsets of the node").
    pub fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
        std::str::from_utf8(&source[node.start_byte()..node.end_byte()]).unwrap_or("")
    }
}
