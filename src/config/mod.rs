//! Binding configuration files onto typed records.
//!
//! A parse runs in four steps:
//! 1. **Read** - the file's content is loaded ([`FileConfiguration`])
//! 2. **Project** - the content is deserialized through an all-string schema, keeping
//!    each leaf's source text ([`LooseShape`])
//! 3. **Reconcile** - every leaf is resolved through the environment loader and
//!    coerced to its declared type, collecting field errors ([`Reconciler`])
//! 4. **Bind** - the typed document is deserialized into the record
//!
//! [`ConfigFileParser`] runs all four; the pieces are public for callers that need
//! only part of the pipeline.

mod file;
mod loose;
mod parser;
mod reconcile;
mod schema;
mod source;

pub(crate) use file::ensure_exists;
pub use file::FileConfiguration;
pub use loose::{LooseEntry, LooseNode, LooseShape};
pub use parser::{ConfigFileParser, ShapePlan};
pub use reconcile::{Reconciled, Reconciler};
pub use schema::{ConfigSchema, Field, FieldKind, IntWidth, Schema, SchemaError};
