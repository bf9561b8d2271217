//! Code-to-text conversion (spec §4.4.6): turns an [`Entity`] into a short
//! natural-language description for downstream embedding models. Purely
//! additive — it never feeds back into graph construction.

use crate::normalize::entity::{Entity, EntityType};

fn type_phrase(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Function => "function",
        EntityType::Class => "class",
        EntityType::Method => "method",
        EntityType::Variable => "variable",
        EntityType::Interface => "interface",
        EntityType::Type => "type",
        EntityType::Enum => "enum",
        EntityType::Union => "union",
        EntityType::Import => "import",
        EntityType::Expression => "expression",
    }
}

/// Renders `entity` as one descriptive sentence, e.g. `"function
/// parse_file in src/indexer/parser.rs, lines 42-88"`.
pub fn describe(entity: &Entity) -> String {
    format!(
        "{} {} in {}, lines {}-{}",
        type_phrase(entity.entity_type),
        entity.name,
        entity.file_path,
        entity.start_line,
        entity.end_line,
    )
}

/// Renders every entity in a graph, preserving order (spec §4.4.6: "text
/// descriptions computed only when `compute_text_descriptions` is set").
pub fn describe_all(entities: &[Entity]) -> Vec<String> {
    entities.iter().map(describe).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Language;
    use std::collections::HashMap;

    #[test]
    fn describes_a_function_entity() {
        let entity = Entity {
            id: "function_item:0:0".into(),
            entity_type: EntityType::Function,
            name: "parse_file".into(),
            file_path: "src/lib.rs".into(),
            language: Language::Rust,
            start_line: 1,
            end_line: 10,
            metadata: HashMap::new(),
        };
        assert_eq!(
            describe(&entity),
            "function parse_file in src/lib.rs, lines 1-10"
        );
    }
}
