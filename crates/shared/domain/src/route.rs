use crate::method::MethodSet;
use std::fmt;

/// Which aggregation pass produced a route record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSource {
    /// The application's own URL manifest.
    Direct,
    /// A named route group, by group name.
    Blueprint(String),
    /// The shared API resource container.
    Api,
}

impl fmt::Display for RouteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("urls"),
            Self::Blueprint(name) => write!(f, "blueprint:{name}"),
            Self::Api => f.write_str("api"),
        }
    }
}

/// Documentation metadata attached to a route at aggregation time.
///
/// Group-level tags combine with the per-route summary; a record without
/// metadata is documented undecorated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDoc {
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl RouteDoc {
    #[must_use]
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self { tags: vec![tag.into()], ..Self::default() }
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.summary.is_none() && self.description.is_none()
    }
}

/// One committed entry of the application route table.
///
/// `id` is the generated identifier that must be unique across every
/// aggregation pass; `path` is absolute (group prefixes already applied).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub id: String,
    pub path: String,
    pub methods: MethodSet,
    pub source: RouteSource,
    pub doc: Option<RouteDoc>,
}

impl fmt::Display for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<28} {:<24} {} [{}]", self.id, self.methods, self.path, self.source)
    }
}
