//! Per-language adapters (spec §4.4.3): each language's declaration and
//! call-site node kinds, driving one shared traversal rather than one
//! bespoke adapter struct per language (eight adapters that only differ
//! in a lookup table aren't eight different algorithms). Grounded on
//! `mcb-ast-utils`'s kind-matching style (`is_decision_point`/`is_loop`
//! in `complexity.rs`) and its iterative walker in `walker.rs`.

mod profile;

use std::collections::HashMap;
use std::sync::Arc;

use tree_sitter::Node;

use crate::astutil::cursor::CursorUtils;
use crate::astutil::node_id::node_id;
use crate::cache::AdapterCache;
use crate::lang::Language;

use super::entity::{Entity, EntityType, Graph, Relationship, RelationshipType};

pub use profile::LanguageProfile;

/// Registry of per-language profiles, backed by an [`AdapterCache`] so a
/// profile is only built once per `(language, options-hash)` key (spec
/// §5: "AdapterCache: per language+options, coalesced").
pub struct AdapterRegistry {
    cache: AdapterCache<LanguageProfile>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            cache: AdapterCache::new(64),
        }
    }

    pub fn profile_for(&self, language: Language) -> Option<Arc<LanguageProfile>> {
        let built = profile::profile_for(language)?;
        let key = AdapterCache::<LanguageProfile>::key(language.tag(), "default");
        Some(self.cache.get_or_build(key, || built))
    }

    /// Normalizes one parsed file into entities + relationships.
    pub fn normalize(
        &self,
        language: Language,
        root: Node,
        source: &str,
        file_path: &str,
    ) -> Graph {
        let Some(profile) = self.profile_for(language) else {
            return Graph::default();
        };
        walk_and_normalize(&profile, language, root, source, file_path)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn entity_name(node: Node, source: &str, name_field: &str) -> String {
    node.child_by_field_name(name_field)
        .map(|n| CursorUtils::node_text(&n, source.as_bytes()).to_string())
        .unwrap_or_else(|| "<anonymous>".to_string())
}

/// Explicit-stack DFS (no recursion, matching [`crate::astutil::complexity`]'s
/// convention) that builds entities for declaration kinds and attaches
/// `call` relationships to the nearest enclosing entity.
fn walk_and_normalize(
    profile: &LanguageProfile,
    language: Language,
    root: Node,
    source: &str,
    file_path: &str,
) -> Graph {
    let mut graph = Graph::default();
    // (node, enclosing entity id at the time we entered this node's subtree)
    let mut stack: Vec<(Node, Option<String>)> = vec![(root, None)];

    while let Some((node, enclosing)) = stack.pop() {
        let kind = node.kind();
        let mut next_enclosing = enclosing.clone();

        if let Some(entity_type) = profile.entity_type_for(kind) {
            let id = node_id(&node);
            let name = entity_name(node, source, profile.name_field);
            graph.entities.push(Entity {
                id: id.clone(),
                entity_type,
                name,
                file_path: file_path.to_string(),
                language,
                start_line: node.start_position().row + 1,
                end_line: node.end_position().row + 1,
                metadata: HashMap::new(),
            });
            next_enclosing = Some(id);
        } else if profile.call_kinds.contains(&kind) {
            if let Some(from) = &enclosing {
                let callee = node
                    .child_by_field_name(profile.call_function_field)
                    .map(|n| CursorUtils::node_text(&n, source.as_bytes()).to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let mut metadata = HashMap::new();
                metadata.insert(
                    "callee_name".to_string(),
                    serde_json::Value::String(callee.clone()),
                );
                graph.relationships.push(Relationship {
                    from: from.clone(),
                    to: format!("unresolved:{callee}"),
                    relationship_type: RelationshipType::Call,
                    file_path: file_path.to_string(),
                    metadata,
                });
            }
        } else if let Some(rel_type) = profile.relationship_for(kind) {
            if let Some(from) = &enclosing {
                graph.relationships.push(Relationship {
                    from: from.clone(),
                    to: format!("unresolved:{}", entity_name(node, source, profile.name_field)),
                    relationship_type: rel_type,
                    file_path: file_path.to_string(),
                    metadata: HashMap::new(),
                });
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            stack.push((child, next_enclosing.clone()));
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_rust::language()).unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn extracts_function_entity_and_call_relationship() {
        let source = "fn helper() {}\nfn main() { helper(); }";
        let tree = parse(source);
        let registry = AdapterRegistry::new();
        let graph = registry.normalize(Language::Rust, tree.root_node(), source, "f.rs");
        assert!(graph.entities.iter().any(|e| e.name == "helper"));
        assert!(graph.entities.iter().any(|e| e.name == "main"));
        assert!(graph
            .relationships
            .iter()
            .any(|r| r.relationship_type == RelationshipType::Call));
    }
}
