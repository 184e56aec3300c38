//! Reading file content through a schema.
//!
//! Content is deserialized straight into a [`LooseShape`], so every leaf keeps the
//! text written in the file: `1.10` stays `1.10` and `0x1F` stays `0x1F`. Files
//! without a declared schema are outlined into an all-string [`Schema`] first.

use super::loose::{LooseNode, LooseShape};
use super::schema::{Field, FieldKind, Schema};
use serde::Deserialize;
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// TOML datetimes reach visitors as a one-entry map under this key.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Project YAML content onto `schema`.
pub(crate) fn project_yaml(
    content: &str,
    schema: &Schema,
) -> Result<LooseShape, serde_yaml::Error> {
    ShapeSeed::root(schema, YamlLeaves).deserialize(serde_yaml::Deserializer::from_str(content))
}

/// Project TOML content onto `schema`.
pub(crate) fn project_toml(content: &str, schema: &Schema) -> Result<LooseShape, toml::de::Error> {
    ShapeSeed::root(schema, TomlLeaves { source: content })
        .deserialize(toml::Deserializer::new(content))
}

/// All-string schema mirroring the tables of YAML content.
pub(crate) fn outline_yaml(name: &str, content: &str) -> Result<Schema, serde_yaml::Error> {
    let outline =
        OutlineSeed::new(name).deserialize(serde_yaml::Deserializer::from_str(content))?;
    Ok(outline.into_schema(name))
}

/// All-string schema mirroring the tables of TOML content.
pub(crate) fn outline_toml(name: &str, content: &str) -> Result<Schema, toml::de::Error> {
    let outline = OutlineSeed::new(name).deserialize(toml::Deserializer::new(content))?;
    Ok(outline.into_schema(name))
}

/// How a format hands over the text of one leaf.
trait LeafReader: Copy {
    fn read<'de, D: Deserializer<'de>>(
        self,
        deserializer: D,
        path: &str,
    ) -> Result<String, D::Error>;
}

/// YAML scalars are requested as strings, which yields their source text.
#[derive(Clone, Copy)]
struct YamlLeaves;

impl LeafReader for YamlLeaves {
    fn read<'de, D: Deserializer<'de>>(
        self,
        deserializer: D,
        path: &str,
    ) -> Result<String, D::Error> {
        deserializer.deserialize_option(ScalarText { path })
    }
}

struct ScalarText<'p> {
    path: &'p str,
}

impl<'de> Visitor<'de> for ScalarText<'_> {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a scalar value at '{}'", self.path)
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_str(self)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

/// TOML scalars are typed by the parser; non-string leaves are cut from the
/// source by their span instead.
#[derive(Clone, Copy)]
struct TomlLeaves<'s> {
    source: &'s str,
}

impl LeafReader for TomlLeaves<'_> {
    fn read<'de, D: Deserializer<'de>>(
        self,
        deserializer: D,
        path: &str,
    ) -> Result<String, D::Error> {
        let spanned = toml::Spanned::<TomlScalar>::deserialize(deserializer)?;
        let span = spanned.span();
        match spanned.into_inner() {
            TomlScalar::Text(text) => Ok(text),
            TomlScalar::Literal => match self.source.get(span) {
                Some(text) => Ok(text.trim().to_string()),
                None => Err(de::Error::custom(format!(
                    "no source text for value at '{}'",
                    path
                ))),
            },
        }
    }
}

enum TomlScalar {
    Text(String),
    Literal,
}

impl<'de> Deserialize<'de> for TomlScalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TomlScalarVisitor)
    }
}

struct TomlScalarVisitor;

impl<'de> Visitor<'de> for TomlScalarVisitor {
    type Value = TomlScalar;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scalar value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<TomlScalar, E> {
        Ok(TomlScalar::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<TomlScalar, E> {
        Ok(TomlScalar::Text(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<TomlScalar, E> {
        Ok(TomlScalar::Literal)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<TomlScalar, E> {
        Ok(TomlScalar::Literal)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<TomlScalar, E> {
        Ok(TomlScalar::Literal)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<TomlScalar, E> {
        Ok(TomlScalar::Literal)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TomlScalar, A::Error> {
        match map.next_key::<String>()? {
            Some(key) if key == TOML_DATETIME_KEY => {
                map.next_value::<IgnoredAny>()?;
                Ok(TomlScalar::Literal)
            }
            _ => Err(de::Error::invalid_type(de::Unexpected::Map, &self)),
        }
    }
}

/// Reads one table level of a schema.
struct ShapeSeed<'a, R> {
    schema: &'a Schema,
    path: String,
    reader: R,
}

impl<'a, R: LeafReader> ShapeSeed<'a, R> {
    fn root(schema: &'a Schema, reader: R) -> Self {
        Self {
            schema,
            path: String::new(),
            reader,
        }
    }
}

impl<'de, R: LeafReader> DeserializeSeed<'de> for ShapeSeed<'_, R> {
    type Value = LooseShape;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<LooseShape, D::Error> {
        deserializer.deserialize_option(self)
    }
}

impl<'de, R: LeafReader> Visitor<'de> for ShapeSeed<'_, R> {
    type Value = LooseShape;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str("a table at '<root>'")
        } else {
            write!(f, "a table at '{}'", self.path)
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<LooseShape, E> {
        Ok(LooseShape::empty(self.schema))
    }

    fn visit_unit<E: de::Error>(self) -> Result<LooseShape, E> {
        Ok(LooseShape::empty(self.schema))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<LooseShape, D::Error> {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LooseShape, A::Error> {
        let fields = self.schema.fields();
        let mut nodes: Vec<Option<LooseNode>> = vec![None; fields.len()];

        while let Some(key) = map.next_key::<String>()? {
            let Some(index) = fields.iter().position(|f| f.key == key) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            let field = &fields[index];
            let path = join_path(&self.path, &field.key);
            let node = match &field.kind {
                FieldKind::Nested(inner) => LooseNode::Group(map.next_value_seed(ShapeSeed {
                    schema: inner,
                    path,
                    reader: self.reader,
                })?),
                _ => LooseNode::Leaf(map.next_value_seed(LeafSeed {
                    path: &path,
                    reader: self.reader,
                })?),
            };
            nodes[index] = Some(node);
        }

        Ok(LooseShape::assemble(self.schema, nodes))
    }
}

struct LeafSeed<'p, R> {
    path: &'p str,
    reader: R,
}

impl<'de, R: LeafReader> DeserializeSeed<'de> for LeafSeed<'_, R> {
    type Value = String;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
        self.reader.read(deserializer, self.path)
    }
}

/// Structure of one value, as far as schema inference cares.
enum Outline {
    Leaf,
    Sequence,
    Table(Schema),
}

impl Outline {
    fn into_schema(self, name: &str) -> Schema {
        match self {
            Outline::Table(schema) => schema,
            Outline::Leaf | Outline::Sequence => Schema::new(name),
        }
    }
}

struct OutlineSeed {
    name: String,
}

impl OutlineSeed {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl<'de> DeserializeSeed<'de> for OutlineSeed {
    type Value = Outline;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Outline, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for OutlineSeed {
    type Value = Outline;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a configuration value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Outline, E> {
        Ok(Outline::Leaf)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Outline, E> {
        Ok(Outline::Leaf)
    }

    fn visit_i128<E: de::Error>(self, _: i128) -> Result<Outline, E> {
        Ok(Outline::Leaf)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Outline, E> {
        Ok(Outline::Leaf)
    }

    fn visit_u128<E: de::Error>(self, _: u128) -> Result<Outline, E> {
        Ok(Outline::Leaf)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Outline, E> {
        Ok(Outline::Leaf)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Outline, E> {
        Ok(Outline::Leaf)
    }

    fn visit_none<E: de::Error>(self) -> Result<Outline, E> {
        Ok(Outline::Leaf)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Outline, E> {
        Ok(Outline::Leaf)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Outline, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Outline, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Outline::Sequence)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Outline, A::Error> {
        let mut schema = Schema::new(self.name);
        while let Some(key) = map.next_key::<String>()? {
            if key == TOML_DATETIME_KEY {
                map.next_value::<IgnoredAny>()?;
                return Ok(Outline::Leaf);
            }
            let field = match map.next_value_seed(OutlineSeed::new(&key))? {
                Outline::Leaf => Field::string(key),
                Outline::Sequence => Field::list(key),
                Outline::Table(inner) => Field::nested(key, inner),
            };
            schema = schema.field(field);
        }
        Ok(Outline::Table(schema))
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}
