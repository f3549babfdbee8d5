use serde::{Deserialize, Serialize};

/// Description of one data model extracted from a model module.
///
/// The engine never interprets the fields; they are carried to the schema
/// backend installed by the ORM extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model name (e.g. `User`).
    pub name: String,
    /// Field names in declaration order.
    pub fields: Vec<String>,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { name: name.into(), fields: fields.into_iter().map(Into::into).collect() }
    }
}
