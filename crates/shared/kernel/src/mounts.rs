//! Sub-application mounting: the mount table and the path-prefix dispatcher
//! wrapping the main request-handling entry point.
//!
//! Matching is against the exact registered prefix at a `/` boundary — there
//! is no longest-prefix search, and overlapping prefixes are rejected when
//! the table is built. A delegated request reaches the sub-application with
//! the prefix stripped (`/billing/invoices` arrives as `/invoices`).

use crate::error::ComposeError;
use axum::Router;
use axum::extract::Request;
use axum::http::Uri;
use axum::http::uri::PathAndQuery;
use axum::response::Response;
use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::util::ServiceExt;
use tracing::trace;

/// One committed mount: prefix, sub-application name, CLI help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    pub prefix: String,
    pub name: String,
    pub help: Option<String>,
}

/// The application mount table. Prefixes are disjoint by construction.
#[derive(Debug, Clone, Default)]
pub struct MountTable {
    points: Vec<MountPoint>,
}

impl MountTable {
    /// # Errors
    /// [`ComposeError::OverlappingMounts`] when the prefix equals or nests
    /// inside an already-registered one (or vice versa).
    pub(crate) fn insert(&mut self, point: MountPoint) -> Result<(), ComposeError> {
        if let Some(existing) = self.points.iter().find(|p| overlaps(&p.prefix, &point.prefix)) {
            return Err(ComposeError::OverlappingMounts {
                existing: existing.prefix.clone(),
                incoming: point.prefix,
            });
        }
        self.points.push(point);
        Ok(())
    }

    #[must_use]
    pub fn points(&self) -> &[MountPoint] {
        &self.points
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn overlaps(a: &str, b: &str) -> bool {
    a == b || a.starts_with(&format!("{b}/")) || b.starts_with(&format!("{a}/"))
}

/// Returns the request path with `prefix` removed, when the path matches the
/// prefix exactly or continues it at a `/` boundary.
fn strip_prefix<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let rest = path.strip_prefix(prefix)?;
    match rest.as_bytes().first() {
        None => Some("/"),
        Some(b'/') => Some(rest),
        Some(_) => None,
    }
}

/// The composed request entry point: delegates prefix matches entirely to
/// the owning sub-application, everything else to the main application.
#[derive(Clone)]
pub struct MountDispatcher {
    main: Router,
    mounts: Arc<[(String, Router)]>,
}

impl MountDispatcher {
    pub(crate) fn new(main: Router, mounts: Vec<(String, Router)>) -> Self {
        Self { main, mounts: mounts.into() }
    }

    fn rewrite(req: &mut Request, new_path: &str) {
        let raw = match req.uri().query() {
            Some(query) => format!("{new_path}?{query}"),
            None => new_path.to_owned(),
        };
        // The rewritten form is a substring of an already-valid URI.
        if let Ok(path_and_query) = PathAndQuery::try_from(raw) {
            let mut parts = req.uri().clone().into_parts();
            parts.path_and_query = Some(path_and_query);
            if let Ok(uri) = Uri::from_parts(parts) {
                *req.uri_mut() = uri;
            }
        }
    }
}

impl fmt::Debug for MountDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefixes: Vec<&str> = self.mounts.iter().map(|(p, _)| p.as_str()).collect();
        f.debug_struct("MountDispatcher").field("mounts", &prefixes).finish_non_exhaustive()
    }
}

impl tower::Service<Request> for MountDispatcher {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let path = req.uri().path().to_owned();
        for (prefix, app) in self.mounts.iter() {
            if let Some(stripped) = strip_prefix(&path, prefix) {
                trace!(%prefix, %stripped, "delegating to mounted application");
                Self::rewrite(&mut req, stripped);
                let app = app.clone();
                return Box::pin(async move { app.oneshot(req).await });
            }
        }

        let main = self.main.clone();
        Box::pin(async move { main.oneshot(req).await })
    }
}
