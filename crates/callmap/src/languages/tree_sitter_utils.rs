//! Shared tree-sitter utilities for the extraction walkers.
//!
//! Provides text and position helpers over raw tree-sitter nodes.

// Tree-sitter returns usize for positions, but we store u32 for compactness.
// This is safe for practical source files (no file has 4 billion lines).
#![allow(clippy::cast_possible_truncation)]

use crate::types::Location;

/// Get the source text covered by a node.
///
/// Invalid UTF-8 is replaced rather than rejected, and a byte range outside
/// `content` yields an empty string.
pub fn node_text(node: &tree_sitter::Node, content: &[u8]) -> String {
    let Some(bytes) = content.get(node.byte_range()) else {
        tracing::trace!(
            byte_range = ?node.byte_range(),
            content_len = content.len(),
            node_kind = %node.kind(),
            "Node byte range outside source"
        );
        return String::new();
    };
    String::from_utf8_lossy(bytes).into_owned()
}

/// Text of a named field child, if the field is present.
pub fn field_text(node: &tree_sitter::Node, field: &str, content: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| node_text(&child, content))
}

/// Zero-based start position of a node.
pub fn node_location(node: &tree_sitter::Node) -> Location {
    let start = node.start_position();
    Location::new(start.row as u32, start.column as u32)
}
