//! Entity/relationship graph types (spec §4.4): the closed vocabulary L4
//! normalizes every language's AST into, keyed by the deterministic
//! `node_id` from [`crate::astutil::node_id`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lang::Language;

/// Closed entity-type vocabulary (spec §4.4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Function,
    Class,
    Method,
    Variable,
    Interface,
    Type,
    Enum,
    Union,
    Import,
    Expression,
}

/// Closed relationship-type vocabulary (spec §4.4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    Call,
    DataFlow,
    Inheritance,
    Implements,
    Annotation,
    Creation,
    Dependency,
    Reference,
    Concurrency,
    Lifecycle,
    Semantic,
    ControlFlow,
}

/// A normalized AST node (spec §4.4: "one entity per significant
/// declaration"). `id` is `node_id(node)` — deterministic, positional,
/// stable across reparses of unchanged source (spec I4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub entity_type: EntityType,
    pub name: String,
    pub file_path: String,
    pub language: Language,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// A directed edge between two entity ids (spec §4.4.4). `to` may
/// reference an id outside the current file for cross-file relationships
/// (e.g. `import`/`dependency`), in which case it carries a synthetic
/// unresolved marker rather than a real node id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub relationship_type: RelationshipType,
    pub file_path: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// One file's worth of normalized structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl Graph {
    pub fn merge(&mut self, other: Graph) {
        self.entities.extend(other.entities);
        self.relationships.extend(other.relationships);
    }

    pub fn entity_by_id(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }
}
