//! The application context: the one mutable owner of everything composition
//! produces.
//!
//! Created at process start, mutated exclusively by the orchestrator's
//! stages (plus the install hooks extensions call during their own stage),
//! and immutable to every other collaborator once composition completes.

use crate::component::{SchemaBackend, SchemaHook};
use crate::models::ModelRegistry;
use crate::mounts::MountTable;
use crate::routes::RouteTable;
use manifold_domain::config::Settings;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct AppContext {
    namespace: String,
    root: PathBuf,
    environment: String,
    settings: Settings,
    models: ModelRegistry,
    routes: RouteTable,
    mounts: MountTable,
    schema: Option<Arc<dyn SchemaBackend>>,
    hooks: Vec<Arc<dyn SchemaHook>>,
}

impl AppContext {
    pub(crate) fn new(
        namespace: impl Into<String>,
        root: impl Into<PathBuf>,
        environment: impl Into<String>,
        settings: Settings,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            root: root.into(),
            environment: environment.into(),
            settings,
            models: ModelRegistry::default(),
            routes: RouteTable::default(),
            mounts: MountTable::default(),
            schema: None,
            hooks: Vec::new(),
        }
    }

    /// The application's own import root; local-scope names qualify under it.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Filesystem root the model scan runs under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the selected configuration profile (e.g. `Development`).
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn mounts(&self) -> &MountTable {
        &self.mounts
    }

    /// Installs the schema materialization backend. Called by the ORM
    /// extension during its `init_app`; the last installed backend wins.
    pub fn install_schema_backend(&mut self, backend: Arc<dyn SchemaBackend>) {
        self.schema = Some(backend);
    }

    /// Registers a hook that runs over the complete model registry after the
    /// service stage.
    pub fn install_schema_hook(&mut self, hook: Arc<dyn SchemaHook>) {
        self.hooks.push(hook);
    }

    pub(crate) fn schema_backend(&self) -> Option<Arc<dyn SchemaBackend>> {
        self.schema.clone()
    }

    pub(crate) fn schema_hooks(&self) -> &[Arc<dyn SchemaHook>] {
        &self.hooks
    }

    pub(crate) fn models_mut(&mut self) -> &mut ModelRegistry {
        &mut self.models
    }

    pub(crate) fn routes_mut(&mut self) -> &mut RouteTable {
        &mut self.routes
    }

    pub(crate) fn mounts_mut(&mut self) -> &mut MountTable {
        &mut self.mounts
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("namespace", &self.namespace)
            .field("environment", &self.environment)
            .field("routes", &self.routes.len())
            .field("models", &self.models.len())
            .field("mounts", &self.mounts.points().len())
            .field("schema_backend", &self.schema.is_some())
            .finish_non_exhaustive()
    }
}
