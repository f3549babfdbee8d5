//! The orchestrator: a fixed, single-threaded sequence of loader stages
//! turning a registry plus a configuration profile into one composed
//! application.
//!
//! Stage order: configuration → extensions → models (+ schema
//! materialization) → commands → direct routes → blueprints → middlewares →
//! API resources → services → schema hooks → documentation → mounts. Later
//! stages observe the fully-committed state of every earlier stage, and any
//! stage error aborts the whole composition.

use crate::commands::{CliAction, CommandSurface};
use crate::component::{ComponentCategory, Middleware};
use crate::config::{self, LoadOptions};
use crate::context::AppContext;
use crate::docs;
use crate::error::{ActivationError, ComposeError};
use crate::models;
use crate::mounts::{MountDispatcher, MountPoint};
use crate::registry::Registry;
use crate::routes;
use axum::{Json, Router};
use manifold_domain::config::Settings;
use manifold_domain::constants::{CONFIG_FILE, DOCS_URL, ENV_FILE, OPENAPI_URL};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use utoipa::openapi::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// A fluent builder for the [`Composer`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct ComposerBuilder {
    registry: Option<Registry>,
    root: PathBuf,
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    environment: Option<String>,
}

impl Default for ComposerBuilder {
    fn default() -> Self {
        Self {
            registry: None,
            root: PathBuf::from("."),
            config_path: None,
            env_file: None,
            environment: None,
        }
    }
}

impl ComposerBuilder {
    /// The registration surface to compose from.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Filesystem root: model scan base and default location of the profile
    /// and environment files.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Profile file path without extension. Defaults to `<root>/manifold`.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Per-environment variable file. Defaults to `<root>/.env`.
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Explicit environment discriminator. When unset, the process
    /// environment decides (after the variable file is loaded).
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn build(self) -> Composer {
        let config_path = self.config_path.unwrap_or_else(|| self.root.join(CONFIG_FILE));
        let env_file = self.env_file.unwrap_or_else(|| self.root.join(ENV_FILE));
        Composer {
            registry: self.registry.unwrap_or_else(|| Registry::new("app")),
            root: self.root,
            config_path,
            env_file,
            environment: self.environment,
        }
    }
}

/// The configured orchestrator. [`Composer::compose`] runs the load sequence
/// exactly once and consumes it.
#[must_use = "call .compose() to run the load sequence"]
#[derive(Debug)]
pub struct Composer {
    registry: Registry,
    root: PathBuf,
    config_path: PathBuf,
    env_file: PathBuf,
    environment: Option<String>,
}

impl Composer {
    pub fn builder() -> ComposerBuilder {
        ComposerBuilder::default()
    }

    /// Runs the full load sequence.
    ///
    /// # Errors
    /// The first failing stage aborts the composition; nothing is rolled
    /// back and no partially-wired application is returned.
    pub fn compose(self) -> Result<App, ComposeError> {
        let Self { mut registry, root, config_path, env_file, environment } = self;

        let (profile, settings) =
            config::load_settings(&LoadOptions { config_path, env_file, environment })?;
        let mut ctx = AppContext::new(registry.namespace(), root, profile, settings);

        load_extensions(&registry, &mut ctx)?;
        load_models(&registry, &mut ctx)?;
        let mut surface = load_commands(&registry, &ctx)?;
        let mut router = load_urls(&mut registry, &mut ctx)?;
        router = load_blueprints(&registry, &mut ctx, router)?;
        let middlewares = resolve_middlewares(&registry, &ctx)?;
        router = load_apis(&registry, &mut ctx, router)?;
        load_services(&registry, &ctx)?;
        run_schema_hooks(&ctx)?;
        let openapi = load_docs(&ctx);
        let mounts = load_apps(&registry, &mut ctx, &mut surface)?;

        // Finalization: the main entry point gains the documentation routes,
        // then the middleware onion, then the mount dispatcher around it all.
        if let Some(openapi) = openapi {
            let doc = openapi.clone();
            router = router.merge(Scalar::with_url(DOCS_URL, openapi)).route(
                OPENAPI_URL,
                axum::routing::get(move || {
                    let doc = doc.clone();
                    async move { Json(doc) }
                }),
            );
        }
        for mw in &middlewares {
            router = mw.wrap(router);
        }
        router = router.layer(TraceLayer::new_for_http());

        let dispatcher = MountDispatcher::new(router, mounts);
        info!(
            environment = %ctx.environment(),
            routes = ctx.routes().len(),
            mounts = ctx.mounts().points().len(),
            "composition complete"
        );

        Ok(App { context: Arc::new(ctx), dispatcher, surface })
    }
}

fn load_extensions(registry: &Registry, ctx: &mut AppContext) -> Result<(), ComposeError> {
    let names = ctx.settings().extensions.clone();
    for name in &names {
        let ext = registry.resolve(ComponentCategory::Extension, name)?.expect_extension(name)?;
        ext.init_app(ctx)?;
        debug!(extension = %name, "extension initialized");
    }
    info!(count = names.len(), "extensions loaded");
    Ok(())
}

fn load_models(registry: &Registry, ctx: &mut AppContext) -> Result<(), ComposeError> {
    if !ctx.settings().create_db {
        debug!("create_db unset; skipping model scan");
        return Ok(());
    }

    let ids = models::scan_model_sources(ctx.root())?;
    for id in &ids {
        let module = registry.resolve(ComponentCategory::Model, id)?.expect_model(id)?;
        ctx.models_mut().merge(id.clone(), module.models());
    }

    // The registry is complete; materialize the schema exactly once.
    let backend = ctx.schema_backend().ok_or(ActivationError::MissingSchemaBackend)?;
    backend.create_all(ctx.models())?;
    info!(modules = ctx.models().len(), "models loaded, schema materialized");
    Ok(())
}

fn load_commands(registry: &Registry, ctx: &AppContext) -> Result<CommandSurface, ComposeError> {
    let mut surface = CommandSurface::new(ctx.namespace());
    for name in &ctx.settings().commands {
        let cmd = registry.resolve(ComponentCategory::Command, name)?.expect_command(name)?;
        surface.register(cmd)?;
    }
    for plugin in registry.plugins() {
        surface.register(plugin.clone())?;
    }
    info!(commands = surface.names().len(), "command surface assembled");
    Ok(surface)
}

fn load_urls(registry: &mut Registry, ctx: &mut AppContext) -> Result<Router, ComposeError> {
    let (defs, docs) = registry.take_urls();
    let count = defs.len();
    let router = routes::collect_direct(ctx.routes_mut(), defs, docs.as_ref())?;
    info!(count, "direct routes loaded");
    Ok(router)
}

fn load_blueprints(
    registry: &Registry,
    ctx: &mut AppContext,
    mut router: Router,
) -> Result<Router, ComposeError> {
    let names = ctx.settings().blueprints.clone();
    for name in &names {
        let bp = registry.resolve(ComponentCategory::Blueprint, name)?.expect_blueprint(name)?;
        let group = routes::collect_blueprint(ctx.routes_mut(), bp.as_ref())?;
        router = router.nest(&bp.prefix(), group);
        debug!(blueprint = %name, prefix = %bp.prefix(), "blueprint registered");
    }
    info!(count = names.len(), "blueprints loaded");
    Ok(router)
}

fn resolve_middlewares(
    registry: &Registry,
    ctx: &AppContext,
) -> Result<Vec<Arc<dyn Middleware>>, ComposeError> {
    let names = ctx.settings().middlewares.clone();
    let mut resolved = Vec::with_capacity(names.len());
    for name in &names {
        resolved
            .push(registry.resolve(ComponentCategory::Middleware, name)?.expect_middleware(name)?);
    }
    info!(count = resolved.len(), "middlewares resolved");
    Ok(resolved)
}

fn load_apis(
    registry: &Registry,
    ctx: &mut AppContext,
    router: Router,
) -> Result<Router, ComposeError> {
    let names = ctx.settings().apis.clone();
    if names.is_empty() {
        return Ok(router);
    }

    let mut container = Router::new();
    for name in &names {
        let resource = registry.resolve(ComponentCategory::Api, name)?.expect_api(name)?;
        container = routes::collect_api(ctx.routes_mut(), resource.as_ref(), container)?;
    }
    info!(count = names.len(), "api resources loaded");
    Ok(router.nest(manifold_domain::constants::API_PREFIX, container))
}

fn load_services(registry: &Registry, ctx: &AppContext) -> Result<(), ComposeError> {
    let names = ctx.settings().services.clone();
    for name in &names {
        let service = registry.resolve(ComponentCategory::Service, name)?.expect_service(name)?;
        service.register(ctx)?;
        debug!(service = %name, "service registered");
    }
    Ok(())
}

fn run_schema_hooks(ctx: &AppContext) -> Result<(), ComposeError> {
    for hook in ctx.schema_hooks() {
        hook.generate(ctx.models())?;
    }
    Ok(())
}

fn load_docs(ctx: &AppContext) -> Option<OpenApi> {
    if !ctx.settings().api_docs {
        debug!("api_docs unset; skipping documentation");
        return None;
    }
    let openapi =
        docs::build_openapi(ctx.namespace(), env!("CARGO_PKG_VERSION"), ctx.routes());
    info!(paths = ctx.routes().len(), "api documentation built");
    Some(openapi)
}

fn load_apps(
    registry: &Registry,
    ctx: &mut AppContext,
    surface: &mut CommandSurface,
) -> Result<Vec<(String, Router)>, ComposeError> {
    let specs = ctx.settings().apps.clone();
    let mut mounts = Vec::with_capacity(specs.len());
    for spec in &specs {
        let app = registry.resolve(ComponentCategory::App, &spec.name)?.expect_app(&spec.name)?;
        let prefix = spec.mount_path();
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            return Err(ComposeError::InvalidPrefix {
                kind: "mount",
                name: spec.name.clone(),
                prefix,
            });
        }

        ctx.mounts_mut().insert(MountPoint {
            prefix: prefix.clone(),
            name: app.name().to_owned(),
            help: spec.help.clone(),
        })?;
        surface.mount(app.name(), spec.help.as_deref(), app.commands())?;
        mounts.push((prefix.clone(), app.router()));
        debug!(app = %spec.name, %prefix, "sub-application mounted");
    }
    Ok(mounts)
}

/// A fully-composed application: immutable context, the request entry point,
/// and the command surface.
pub struct App {
    context: Arc<AppContext>,
    dispatcher: MountDispatcher,
    surface: CommandSurface,
}

impl App {
    #[must_use]
    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        self.context.settings()
    }

    /// The single request entry point: the mount dispatcher wrapping the
    /// main application.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new().fallback_service(self.dispatcher.clone())
    }

    #[must_use]
    pub fn surface(&self) -> &CommandSurface {
        &self.surface
    }

    /// Routes a parsed CLI invocation.
    ///
    /// # Errors
    /// Unknown commands and handler failures surface to the entry point.
    pub fn dispatch(&self, matches: &clap::ArgMatches) -> anyhow::Result<CliAction> {
        self.surface.dispatch(&self.context, matches)
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("context", &self.context)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
