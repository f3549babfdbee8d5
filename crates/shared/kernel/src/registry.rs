//! The registration surface: everything the application declares at compile
//! time for the composer to resolve at startup.
//!
//! Two scopes back the two-phase name resolution: `local` registrations are
//! qualified with the application namespace, `global` registrations use
//! absolute names (the standalone-package convention). The registry also
//! carries the application's direct URL manifest and the plugin command list
//! that is always attached to the command surface.

use crate::component::{Command, ComponentCategory, Unit};
use crate::error::ResolveError;
use crate::resolve::{self, Scope};
use crate::routes::RouteDef;
use manifold_domain::route::RouteDoc;
use std::fmt;
use std::sync::Arc;

#[must_use = "a registry does nothing until handed to a Composer"]
pub struct Registry {
    namespace: String,
    local: Scope,
    global: Scope,
    urls: Vec<RouteDef>,
    url_docs: Option<RouteDoc>,
    plugins: Vec<Arc<dyn Command>>,
}

impl Registry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: Scope::default(),
            global: Scope::default(),
            urls: Vec::new(),
            url_docs: None,
            plugins: Vec::new(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registers a unit inside the application's own namespace. The key is
    /// qualified: `local("auth", …)` resolves as `<ns>.auth`.
    pub fn local(mut self, name: &str, unit: Unit) -> Self {
        let key = format!("{}.{name}", self.namespace);
        self.local.insert(key, unit);
        self
    }

    /// Registers a standalone unit under its absolute name.
    pub fn global(mut self, name: &str, unit: Unit) -> Self {
        self.global.insert(name.to_owned(), unit);
        self
    }

    /// Appends routes to the application's direct URL manifest.
    pub fn urls(mut self, defs: impl IntoIterator<Item = RouteDef>) -> Self {
        self.urls.extend(defs);
        self
    }

    /// Documentation metadata applied to every direct route.
    pub fn url_docs(mut self, doc: RouteDoc) -> Self {
        self.url_docs = Some(doc);
        self
    }

    /// Adds a command that is always registered, independent of the
    /// `commands` setting — the analogue of entry-point discovered plugins.
    pub fn plugin_command(mut self, cmd: impl Command + 'static) -> Self {
        self.plugins.push(Arc::new(cmd));
        self
    }

    /// Two-phase resolution of a configured name.
    ///
    /// # Errors
    /// [`ResolveError`] carrying both attempted identifiers.
    pub fn resolve(&self, category: ComponentCategory, name: &str) -> Result<Unit, ResolveError> {
        resolve::resolve(&self.namespace, &self.local, &self.global, category, name)
    }

    pub(crate) fn take_urls(&mut self) -> (Vec<RouteDef>, Option<RouteDoc>) {
        (std::mem::take(&mut self.urls), self.url_docs.take())
    }

    pub(crate) fn plugins(&self) -> &[Arc<dyn Command>] {
        &self.plugins
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("namespace", &self.namespace)
            .field("local", &self.local)
            .field("global", &self.global)
            .field("urls", &self.urls.len())
            .field("plugins", &self.plugins.len())
            .finish_non_exhaustive()
    }
}
