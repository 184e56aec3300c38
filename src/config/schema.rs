//! Declared shapes of configuration records.
//!
//! A [`Schema`] lists the fields of a record in order. Each field is either a leaf
//! (string, integer, or one of the kinds that cannot be bound) or a nested schema.
//! Record types describe themselves through [`ConfigSchema`].

use thiserror::Error;

/// Integer widths a leaf can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl IntWidth {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntWidth::I8 => "i8",
            IntWidth::I16 => "i16",
            IntWidth::I32 => "i32",
            IntWidth::I64 => "i64",
            IntWidth::Isize => "isize",
            IntWidth::U8 => "u8",
            IntWidth::U16 => "u16",
            IntWidth::U32 => "u32",
            IntWidth::U64 => "u64",
            IntWidth::Usize => "usize",
        }
    }

    fn bounds(&self) -> (i128, i128) {
        match self {
            IntWidth::I8 => (i8::MIN.into(), i8::MAX.into()),
            IntWidth::I16 => (i16::MIN.into(), i16::MAX.into()),
            IntWidth::I32 => (i32::MIN.into(), i32::MAX.into()),
            IntWidth::I64 => (i64::MIN.into(), i64::MAX.into()),
            IntWidth::Isize => (isize::MIN as i128, isize::MAX as i128),
            IntWidth::U8 => (0, u8::MAX.into()),
            IntWidth::U16 => (0, u16::MAX.into()),
            IntWidth::U32 => (0, u32::MAX.into()),
            IntWidth::U64 => (0, u64::MAX.into()),
            IntWidth::Usize => (0, usize::MAX as i128),
        }
    }

    /// Whether `value` fits this width.
    pub fn contains(&self, value: i64) -> bool {
        let (min, max) = self.bounds();
        (min..=max).contains(&i128::from(value))
    }
}

/// Kind of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int(IntWidth),
    /// Declarable, but never bindable.
    Float,
    /// Declarable, but never bindable.
    Bool,
    /// Declarable, but never bindable.
    List,
    Nested(Schema),
}

impl FieldKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int(width) => width.as_str(),
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::List => "list",
            FieldKind::Nested(_) => "nested",
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, FieldKind::Nested(_))
    }
}

/// One named field of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Identifier used in field error reports.
    pub name: String,
    /// Key in the configuration file and in the record's serde representation.
    pub key: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            kind,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// A 64-bit signed integer leaf.
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Int(IntWidth::I64))
    }

    pub fn int_width(name: impl Into<String>, width: IntWidth) -> Self {
        Self::new(name, FieldKind::Int(width))
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::List)
    }

    pub fn nested(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, FieldKind::Nested(schema))
    }

    /// Use a file key that differs from the field name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

/// Ordered field list describing one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of leaves across all nesting levels.
    pub fn leaf_count(&self) -> usize {
        self.fields
            .iter()
            .map(|f| match &f.kind {
                FieldKind::Nested(inner) => inner.leaf_count(),
                _ => 1,
            })
            .sum()
    }

    /// Same names, keys and nesting, with every leaf turned into a string.
    pub fn loosened(&self) -> Schema {
        Schema {
            name: self.name.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| Field {
                    name: f.name.clone(),
                    key: f.key.clone(),
                    kind: match &f.kind {
                        FieldKind::Nested(inner) => FieldKind::Nested(inner.loosened()),
                        _ => FieldKind::String,
                    },
                })
                .collect(),
        }
    }

    /// Every leaf must be a string.
    pub fn check_loose(&self) -> Result<(), SchemaError> {
        for field in &self.fields {
            match &field.kind {
                FieldKind::String => {}
                FieldKind::Nested(inner) => inner.check_loose()?,
                other => {
                    return Err(SchemaError::NonStringLeaf {
                        schema: self.name.clone(),
                        field: field.name.clone(),
                        kind: other.describe(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Every leaf must be a string or an integer.
    pub fn check_bindable(&self) -> Result<(), SchemaError> {
        for field in &self.fields {
            match &field.kind {
                FieldKind::String | FieldKind::Int(_) => {}
                FieldKind::Nested(inner) => inner.check_bindable()?,
                other => {
                    return Err(SchemaError::UnsupportedLeaf {
                        schema: self.name.clone(),
                        field: field.name.clone(),
                        kind: other.describe(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Positional correspondence with `output`: same field count and the same
    /// nested positions at every level.
    pub fn check_matches(&self, output: &Schema) -> Result<(), SchemaError> {
        if self.fields.len() != output.fields.len() {
            return Err(SchemaError::FieldCountMismatch {
                input: self.name.clone(),
                output: output.name.clone(),
                input_count: self.fields.len(),
                output_count: output.fields.len(),
            });
        }
        for (input_field, output_field) in self.fields.iter().zip(&output.fields) {
            match (&input_field.kind, &output_field.kind) {
                (FieldKind::Nested(i), FieldKind::Nested(o)) => i.check_matches(o)?,
                (i, o) if i.is_nested() != o.is_nested() => {
                    return Err(SchemaError::NestingMismatch {
                        input: self.name.clone(),
                        output: output.name.clone(),
                        field: input_field.name.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// A record type that can describe its own shape.
pub trait ConfigSchema {
    fn schema() -> Schema;
}

/// Contract violations between declared schemas.
///
/// These depend only on the schemas, never on file contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error(
        "input and output configuration schemas are not compatible: '{input}' has {input_count} field(s), '{output}' has {output_count}"
    )]
    FieldCountMismatch {
        input: String,
        output: String,
        input_count: usize,
        output_count: usize,
    },

    #[error(
        "input and output configuration schemas are not compatible: field '{field}' is nested in only one of '{input}' and '{output}'"
    )]
    NestingMismatch {
        input: String,
        output: String,
        field: String,
    },

    #[error("unsupported type '{kind}' for field '{field}' in '{schema}'")]
    UnsupportedLeaf {
        schema: String,
        field: String,
        kind: &'static str,
    },

    #[error("field '{field}' in '{schema}' needs to be a string or nested schema, found '{kind}'")]
    NonStringLeaf {
        schema: String,
        field: String,
        kind: &'static str,
    },
}
