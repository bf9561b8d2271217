//! Shared tree-sitter navigation helpers used by both the chunking
//! strategies (L2) and the normalization adapters (L4).
//!
//! Grounded in `mcb-ast-utils`'s `cursor`/`walker`/`complexity` modules,
//! adapted to this crate's language set and rewritten to compute nesting
//! depth iteratively per spec §4.4.3.

pub mod complexity;
pub mod cursor;
pub mod node_id;

pub use complexity::nesting_depth_iterative;
pub use node_id::node_id;
