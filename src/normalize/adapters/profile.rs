//! Per-language node-kind tables consumed by the shared adapter walk in
//! [`super`]. Extracted from the teacher's
//! `create_query_for_language`/`node_to_chunk_type` tables, widened to
//! cover the closed entity/relationship vocabulary (spec §4.4.2).

use crate::lang::Language;
use crate::normalize::entity::{EntityType, RelationshipType};

#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub language: Language,
    entity_kinds: &'static [(&'static str, EntityType)],
    relationship_kinds: &'static [(&'static str, RelationshipType)],
    pub call_kinds: &'static [&'static str],
    pub call_function_field: &'static str,
    pub name_field: &'static str,
}

impl LanguageProfile {
    pub fn entity_type_for(&self, kind: &str) -> Option<EntityType> {
        self.entity_kinds
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, t)| *t)
    }

    pub fn relationship_for(&self, kind: &str) -> Option<RelationshipType> {
        self.relationship_kinds
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, t)| *t)
    }
}

const RUST_ENTITIES: &[(&str, EntityType)] = &[
    ("function_item", EntityType::Function),
    ("struct_item", EntityType::Class),
    ("enum_item", EntityType::Enum),
    ("trait_item", EntityType::Interface),
    ("impl_item", EntityType::Class),
    ("let_declaration", EntityType::Variable),
    ("use_declaration", EntityType::Import),
];
const RUST_RELATIONSHIPS: &[(&str, RelationshipType)] = &[
    ("use_declaration", RelationshipType::Dependency),
    ("trait_bound", RelationshipType::Implements),
];

const PYTHON_ENTITIES: &[(&str, EntityType)] = &[
    ("function_definition", EntityType::Function),
    ("class_definition", EntityType::Class),
    ("import_statement", EntityType::Import),
    ("import_from_statement", EntityType::Import),
];
const PYTHON_RELATIONSHIPS: &[(&str, RelationshipType)] = &[
    ("import_statement", RelationshipType::Dependency),
    ("import_from_statement", RelationshipType::Dependency),
];

const JS_ENTITIES: &[(&str, EntityType)] = &[
    ("function_declaration", EntityType::Function),
    ("arrow_function", EntityType::Function),
    ("class_declaration", EntityType::Class),
    ("method_definition", EntityType::Method),
    ("interface_declaration", EntityType::Interface),
    ("import_statement", EntityType::Import),
    ("variable_declarator", EntityType::Variable),
];
const JS_RELATIONSHIPS: &[(&str, RelationshipType)] = &[
    ("import_statement", RelationshipType::Dependency),
    ("class_heritage", RelationshipType::Inheritance),
];

const GO_ENTITIES: &[(&str, EntityType)] = &[
    ("function_declaration", EntityType::Function),
    ("method_declaration", EntityType::Method),
    ("type_declaration", EntityType::Type),
    ("import_declaration", EntityType::Import),
];
const GO_RELATIONSHIPS: &[(&str, RelationshipType)] =
    &[("import_declaration", RelationshipType::Dependency)];

const JVM_ENTITIES: &[(&str, EntityType)] = &[
    ("method_declaration", EntityType::Method),
    ("class_declaration", EntityType::Class),
    ("interface_declaration", EntityType::Interface),
    ("enum_declaration", EntityType::Enum),
    ("import_declaration", EntityType::Import),
];
const JVM_RELATIONSHIPS: &[(&str, RelationshipType)] = &[
    ("import_declaration", RelationshipType::Dependency),
    ("superclass", RelationshipType::Inheritance),
    ("super_interfaces", RelationshipType::Implements),
];

const C_FAMILY_ENTITIES: &[(&str, EntityType)] = &[
    ("function_definition", EntityType::Function),
    ("struct_specifier", EntityType::Class),
    ("enum_specifier", EntityType::Enum),
    ("class_specifier", EntityType::Class),
    ("preproc_include", EntityType::Import),
];
const C_FAMILY_RELATIONSHIPS: &[(&str, RelationshipType)] =
    &[("preproc_include", RelationshipType::Dependency)];

pub fn profile_for(language: Language) -> Option<LanguageProfile> {
    let (entity_kinds, relationship_kinds, call_kinds, call_function_field, name_field) =
        match language {
            Language::Rust => (
                RUST_ENTITIES,
                RUST_RELATIONSHIPS,
                &["call_expression"][..],
                "function",
                "name",
            ),
            Language::Python => (
                PYTHON_ENTITIES,
                PYTHON_RELATIONSHIPS,
                &["call"][..],
                "function",
                "name",
            ),
            Language::JavaScript | Language::TypeScript | Language::Tsx => (
                JS_ENTITIES,
                JS_RELATIONSHIPS,
                &["call_expression"][..],
                "function",
                "name",
            ),
            Language::Go => (
                GO_ENTITIES,
                GO_RELATIONSHIPS,
                &["call_expression"][..],
                "function",
                "name",
            ),
            Language::Java | Language::Kotlin | Language::CSharp => (
                JVM_ENTITIES,
                JVM_RELATIONSHIPS,
                &["method_invocation", "invocation_expression"][..],
                "name",
                "name",
            ),
            Language::C | Language::Cpp => (
                C_FAMILY_ENTITIES,
                C_FAMILY_RELATIONSHIPS,
                &["call_expression"][..],
                "function",
                "declarator",
            ),
            _ => return None,
        };

    Some(LanguageProfile {
        language,
        entity_kinds,
        relationship_kinds,
        call_kinds,
        call_function_field,
        name_field,
    })
}
