//! Field reconciliation.
//!
//! Walks a [`LooseShape`] and an output [`Schema`] in lockstep. Every leaf is resolved
//! through the [`EnvironmentLoader`] and coerced to the output type. Leaf failures
//! are collected in traversal order and never stop the walk; schema mismatches do.

use super::loose::{LooseNode, LooseShape};
use super::schema::{FieldKind, IntWidth, Schema, SchemaError};
use crate::env::EnvironmentLoader;
use crate::error::{EMPTY_FIELD_MESSAGE, FieldError};
use serde_json::{Map, Value};
use tracing::debug;

/// Output of a reconciliation walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// Typed document keyed by output field keys. Failed leaves hold `""` or `0`.
    pub value: Value,
    /// Field errors in pre-order.
    pub errors: Vec<FieldError>,
}

impl Reconciled {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Reconciler<'a, E: ?Sized> {
    loader: &'a E,
}

impl<'a, E: EnvironmentLoader + ?Sized> Reconciler<'a, E> {
    pub fn new(loader: &'a E) -> Self {
        Self { loader }
    }

    /// Fill `output` from `input`.
    pub fn reconcile(
        &self,
        input: &LooseShape,
        output: &Schema,
    ) -> Result<Reconciled, SchemaError> {
        let mut errors = Vec::new();
        let value = self.walk(input, output, &mut errors)?;
        Ok(Reconciled { value, errors })
    }

    fn walk(
        &self,
        input: &LooseShape,
        output: &Schema,
        errors: &mut Vec<FieldError>,
    ) -> Result<Value, SchemaError> {
        if input.entries.len() != output.fields().len() {
            return Err(SchemaError::FieldCountMismatch {
                input: input.schema.clone(),
                output: output.name().to_string(),
                input_count: input.entries.len(),
                output_count: output.fields().len(),
            });
        }

        let mut map = Map::with_capacity(output.fields().len());
        for (entry, field) in input.entries.iter().zip(output.fields()) {
            let resolved = match (&entry.node, &field.kind) {
                (LooseNode::Group(inner), FieldKind::Nested(schema)) => {
                    self.walk(inner, schema, errors)?
                }
                (LooseNode::Leaf(raw), FieldKind::String) => self
                    .resolve_string(raw)
                    .unwrap_or_else(|message| {
                        errors.push(field_error(&entry.name, raw, message));
                        Value::String(String::new())
                    }),
                (LooseNode::Leaf(raw), FieldKind::Int(width)) => self
                    .resolve_int(raw, *width)
                    .unwrap_or_else(|message| {
                        errors.push(field_error(&entry.name, raw, message));
                        Value::from(0)
                    }),
                (
                    LooseNode::Leaf(_),
                    kind @ (FieldKind::Float | FieldKind::Bool | FieldKind::List),
                ) => {
                    return Err(SchemaError::UnsupportedLeaf {
                        schema: output.name().to_string(),
                        field: field.name.clone(),
                        kind: kind.describe(),
                    });
                }
                (LooseNode::Leaf(_), FieldKind::Nested(_)) | (LooseNode::Group(_), _) => {
                    return Err(SchemaError::NestingMismatch {
                        input: input.schema.clone(),
                        output: output.name().to_string(),
                        field: entry.name.clone(),
                    });
                }
            };
            map.insert(field.key.clone(), resolved);
        }
        Ok(Value::Object(map))
    }

    fn resolve_string(&self, raw: &str) -> Result<Value, String> {
        self.loader
            .load_string(raw)
            .map(Value::String)
            .map_err(|e| e.to_string())
    }

    fn resolve_int(&self, raw: &str, width: IntWidth) -> Result<Value, String> {
        let value = self.loader.load_int(raw).map_err(|e| e.to_string())?;
        if !width.contains(value) {
            return Err(format!("value {} is out of range for {}", value, width.as_str()));
        }
        Ok(Value::from(value))
    }
}

fn field_error(name: &str, raw: &str, message: String) -> FieldError {
    let message = if raw.trim().is_empty() {
        EMPTY_FIELD_MESSAGE.to_string()
    } else {
        message
    };
    debug!("Field '{}' failed to resolve: {}", name, message);
    FieldError::new(format!("{}: {}", name, raw), message)
}
