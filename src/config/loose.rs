//! The loosely-typed intermediate: file content read through a schema, with every
//! leaf held as its raw string.

use super::schema::{FieldKind, Schema};

/// A leaf value or a nested group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LooseNode {
    Leaf(String),
    Group(LooseShape),
}

/// One field of a loose shape, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseEntry {
    pub name: String,
    pub key: String,
    pub node: LooseNode,
}

/// All-string mirror of a schema, filled from a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LooseShape {
    pub schema: String,
    pub entries: Vec<LooseEntry>,
}

impl LooseShape {
    /// Shape of `schema` with every leaf empty.
    pub fn empty(schema: &Schema) -> Self {
        Self::assemble(schema, vec![None; schema.fields().len()])
    }

    /// Build a shape from the nodes found for each field, in schema order.
    /// Fields without a node read as empty.
    pub(crate) fn assemble(schema: &Schema, nodes: Vec<Option<LooseNode>>) -> Self {
        let entries = schema
            .fields()
            .iter()
            .zip(nodes)
            .map(|(field, node)| LooseEntry {
                name: field.name.clone(),
                key: field.key.clone(),
                node: node.unwrap_or_else(|| match &field.kind {
                    FieldKind::Nested(inner) => LooseNode::Group(LooseShape::empty(inner)),
                    _ => LooseNode::Leaf(String::new()),
                }),
            })
            .collect();
        LooseShape {
            schema: schema.name().to_string(),
            entries,
        }
    }
}
