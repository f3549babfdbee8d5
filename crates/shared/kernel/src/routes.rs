//! Route aggregation: merging independently-authored route sources into one
//! collision-free table and one axum router.
//!
//! Identifier scheme: direct routes use the handler name, blueprint routes
//! use `<group>.<handler>`, API resource routes use
//! `api.<endpoint>_<handler>`. The table rejects any duplicate identifier.

use crate::component::{ApiResource, Blueprint};
use crate::error::ComposeError;
use axum::Router;
use axum::routing::MethodRouter;
use fxhash::FxHashMap;
use manifold_domain::constants::{API_ENDPOINT_NS, API_PREFIX};
use manifold_domain::method::MethodSet;
use manifold_domain::route::{RouteDoc, RouteRecord, RouteSource};
use std::fmt;
use tracing::debug;

/// One route as declared by its source: relative path, handler name, allowed
/// methods, and the owned handler.
#[derive(Clone)]
pub struct RouteDef {
    path: String,
    name: String,
    methods: MethodSet,
    summary: Option<String>,
    handler: MethodRouter,
}

impl RouteDef {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        methods: MethodSet,
        handler: MethodRouter,
    ) -> Self {
        Self { path: path.into(), name: name.into(), methods, summary: None, handler }
    }

    /// Attaches a one-line documentation summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn methods(&self) -> MethodSet {
        self.methods
    }
}

impl fmt::Debug for RouteDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDef")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

/// The application route table: every committed record, insertion-ordered,
/// with unique generated identifiers.
#[derive(Debug, Default)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    ids: FxHashMap<String, usize>,
}

impl RouteTable {
    /// # Errors
    /// [`ComposeError::DuplicateRoute`] when the identifier is already taken.
    pub(crate) fn insert(&mut self, record: RouteRecord) -> Result<(), ComposeError> {
        if let Some(&index) = self.ids.get(&record.id) {
            return Err(ComposeError::DuplicateRoute {
                id: record.id,
                existing: self.records[index].source.to_string(),
                incoming: record.source.to_string(),
            });
        }

        debug!(id = %record.id, path = %record.path, source = %record.source, "route committed");
        self.ids.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    #[must_use]
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RouteRecord> {
        self.ids.get(id).map(|&index| &self.records[index])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Merges group metadata with a route's own summary. `None` when neither
/// carries anything: such a route is documented undecorated.
fn merge_doc(group: Option<&RouteDoc>, def: &RouteDef) -> Option<RouteDoc> {
    let mut doc = group.cloned().unwrap_or_default();
    if let Some(summary) = &def.summary {
        doc.summary = Some(summary.clone());
    }
    (!doc.is_empty()).then_some(doc)
}

fn check_path(source: &RouteSource, def: &RouteDef) -> Result<(), ComposeError> {
    if def.path.starts_with('/') {
        Ok(())
    } else {
        Err(ComposeError::InvalidPath { origin: source.to_string(), path: def.path.clone() })
    }
}

/// Joins a prefix and a relative path without doubling the separator.
fn join_paths(prefix: &str, path: &str) -> String {
    if path == "/" { prefix.to_owned() } else { format!("{prefix}{path}") }
}

/// Pass 1: the application's own URL manifest. Identifiers are the handler
/// names (the host framework's native naming).
pub(crate) fn collect_direct(
    table: &mut RouteTable,
    defs: Vec<RouteDef>,
    docs: Option<&RouteDoc>,
) -> Result<Router, ComposeError> {
    let mut router = Router::new();
    for def in defs {
        check_path(&RouteSource::Direct, &def)?;
        table.insert(RouteRecord {
            id: def.name.clone(),
            path: def.path.clone(),
            methods: def.methods,
            source: RouteSource::Direct,
            doc: merge_doc(docs, &def),
        })?;
        router = router.route(&def.path, def.handler);
    }
    Ok(router)
}

/// Pass 2: one named group. Routes register against the group's own
/// sub-router (paths relative to the group); the caller nests the result at
/// the group prefix. Table records carry the absolute path.
pub(crate) fn collect_blueprint(
    table: &mut RouteTable,
    bp: &dyn Blueprint,
) -> Result<Router, ComposeError> {
    let prefix = bp.prefix();
    if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
        return Err(ComposeError::InvalidPrefix {
            kind: "blueprint",
            name: bp.name().to_owned(),
            prefix,
        });
    }

    let source = RouteSource::Blueprint(bp.name().to_owned());
    let docs = bp.docs();
    let mut router = Router::new();
    for def in bp.routes() {
        check_path(&source, &def)?;
        table.insert(RouteRecord {
            id: format!("{}.{}", bp.name(), def.name),
            path: join_paths(&prefix, &def.path),
            methods: def.methods,
            source: source.clone(),
            doc: merge_doc(docs.as_ref(), &def),
        })?;
        router = router.route(&def.path, def.handler);
    }
    Ok(router)
}

/// Pass 3: one API resource group merged into the shared container router.
/// Absolute paths gain the shared container prefix; identifiers are
/// `api.<endpoint>_<handler>`, so groups sharing an endpoint never collide
/// unless a handler name repeats too.
pub(crate) fn collect_api(
    table: &mut RouteTable,
    resource: &dyn ApiResource,
    mut container: Router,
) -> Result<Router, ComposeError> {
    let url_prefix = resource.url_prefix();
    if !url_prefix.is_empty() && (!url_prefix.starts_with('/') || url_prefix.ends_with('/')) {
        return Err(ComposeError::InvalidPrefix {
            kind: "api resource",
            name: resource.endpoint().to_owned(),
            prefix: url_prefix,
        });
    }

    let docs = resource.docs();
    for def in resource.routes() {
        check_path(&RouteSource::Api, &def)?;
        let mut relative = join_paths(&url_prefix, &def.path);
        if relative.is_empty() {
            relative.push('/');
        }
        table.insert(RouteRecord {
            id: format!("{}.{}_{}", API_ENDPOINT_NS, resource.endpoint(), def.name),
            path: join_paths(API_PREFIX, &relative),
            methods: def.methods,
            source: RouteSource::Api,
            doc: merge_doc(docs.as_ref(), &def),
        })?;
        container = container.route(&relative, def.handler);
    }
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    async fn handler() -> &'static str {
        "ok"
    }

    fn def(path: &str, name: &str) -> RouteDef {
        RouteDef::new(path, name, MethodSet::GET, get(handler))
    }

    #[test]
    fn join_paths_collapses_bare_root() {
        assert_eq!(join_paths("/auth", "/login"), "/auth/login");
        assert_eq!(join_paths("/auth", "/"), "/auth");
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let mut table = RouteTable::default();
        collect_direct(&mut table, vec![def("/a", "index")], None).expect("first insert");
        let err = collect_direct(&mut table, vec![def("/b", "index")], None)
            .expect_err("same handler name");
        assert!(matches!(err, ComposeError::DuplicateRoute { id, .. } if id == "index"));
    }

    #[test]
    fn relative_path_is_invalid() {
        let mut table = RouteTable::default();
        let err = collect_direct(&mut table, vec![def("a", "index")], None)
            .expect_err("missing leading slash");
        assert!(matches!(err, ComposeError::InvalidPath { .. }));
    }
}
