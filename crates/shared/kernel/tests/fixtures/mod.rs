#![allow(dead_code)]

//! Shared stub components for the composition tests.

use axum::http::HeaderValue;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use manifold_kernel::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Profile file used by most composition tests.
pub const PROFILES: &str = r#"
[profile.Development]
debug = true
blueprints = ["auth"]

[profile.Development.vars]
secret_key = "dev"

[profile.Production]
extends = "Development"
debug = false

[profile.Testing]
extends = "Development"
"#;

/// Writes a profile file into `root` and returns its extension-less path.
pub fn write_profiles(root: &Path, contents: &str) -> std::path::PathBuf {
    let path = root.join("manifold.toml");
    std::fs::write(&path, contents).expect("profile file written");
    root.join("manifold")
}

/// An extension that records whether `init_app` ran.
#[derive(Clone, Default)]
pub struct ProbeExtension {
    pub initialized: Arc<AtomicBool>,
}

impl Extension for ProbeExtension {
    fn name(&self) -> &str {
        "probe"
    }

    fn init_app(&self, _ctx: &mut AppContext) -> Result<(), ActivationError> {
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A schema backend recording the module identifiers it observed.
#[derive(Clone, Default)]
pub struct RecordingSchema {
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl SchemaBackend for RecordingSchema {
    fn create_all(&self, models: &ModelRegistry) -> Result<(), ActivationError> {
        let mut seen = self.seen.lock().expect("schema lock");
        *seen = models.modules().map(|(id, _)| id.to_owned()).collect();
        Ok(())
    }
}

/// A schema hook recording how many modules it observed.
#[derive(Clone, Default)]
pub struct RecordingHook {
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl SchemaHook for RecordingHook {
    fn generate(&self, models: &ModelRegistry) -> Result<(), ActivationError> {
        let mut seen = self.seen.lock().expect("hook lock");
        *seen = models.modules().map(|(id, _)| id.to_owned()).collect();
        Ok(())
    }
}

/// An extension installing [`RecordingSchema`] and a hook, standing in for
/// the ORM plus a serialization-schema generator.
#[derive(Clone, Default)]
pub struct OrmExtension {
    pub schema: RecordingSchema,
    pub hook: RecordingHook,
}

impl Extension for OrmExtension {
    fn name(&self) -> &str {
        "orm"
    }

    fn init_app(&self, ctx: &mut AppContext) -> Result<(), ActivationError> {
        ctx.install_schema_backend(Arc::new(self.schema.clone()));
        ctx.install_schema_hook(Arc::new(self.hook.clone()));
        Ok(())
    }
}

/// A service recording that it was registered.
#[derive(Clone, Default)]
pub struct FlagService {
    pub registered: Arc<AtomicBool>,
}

impl Service for FlagService {
    fn register(&self, _ctx: &AppContext) -> Result<(), ActivationError> {
        self.registered.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A model module with a fixed descriptor set.
pub struct StubModels {
    pub descriptors: Vec<ModelDescriptor>,
}

impl StubModels {
    pub fn new(names: &[&str]) -> Self {
        Self {
            descriptors: names.iter().map(|n| ModelDescriptor::new(*n, ["id"])).collect(),
        }
    }
}

impl ModelModule for StubModels {
    fn models(&self) -> Vec<ModelDescriptor> {
        self.descriptors.clone()
    }
}

async fn ok() -> &'static str {
    "ok"
}

async fn created() -> Json<&'static str> {
    Json("created")
}

/// The canonical named group used across tests.
pub struct AuthBlueprint;

impl Blueprint for AuthBlueprint {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Vec<RouteDef> {
        vec![
            RouteDef::new("/login", "login", MethodSet::POST, post(ok)),
            RouteDef::new("/register", "register", MethodSet::POST, post(created)),
            RouteDef::new("/status", "status", MethodSet::GET, get(ok)),
        ]
    }

    fn docs(&self) -> Option<RouteDoc> {
        Some(RouteDoc::tagged("auth"))
    }
}

/// An API resource with a configurable endpoint and handler names.
pub struct StubApi {
    pub endpoint: String,
    pub prefix: String,
    pub handlers: Vec<(&'static str, &'static str)>,
}

impl StubApi {
    pub fn new(endpoint: &str, prefix: &str, handlers: &[(&'static str, &'static str)]) -> Self {
        Self { endpoint: endpoint.to_owned(), prefix: prefix.to_owned(), handlers: handlers.to_vec() }
    }
}

impl ApiResource for StubApi {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url_prefix(&self) -> String {
        self.prefix.clone()
    }

    fn routes(&self) -> Vec<RouteDef> {
        self.handlers
            .iter()
            .map(|(path, name)| RouteDef::new(*path, *name, MethodSet::GET, get(ok)))
            .collect()
    }
}

/// A middleware appending its label to the `x-order` response header.
pub struct LabelMiddleware {
    pub label: &'static str,
}

impl Middleware for LabelMiddleware {
    fn wrap(&self, router: Router) -> Router {
        let label = self.label;
        router.layer(axum::middleware::map_response(move |mut res: Response| async move {
            res.headers_mut().append("x-order", HeaderValue::from_static(label));
            res
        }))
    }
}

/// A command flipping a flag when run.
#[derive(Clone, Default)]
pub struct FlagCommand {
    pub name: &'static str,
    pub ran: Arc<AtomicBool>,
}

impl FlagCommand {
    pub fn named(name: &'static str) -> Self {
        Self { name, ran: Arc::default() }
    }
}

impl Command for FlagCommand {
    fn name(&self) -> &str {
        self.name
    }

    fn clap(&self) -> clap::Command {
        clap::Command::new(self.name).about("test command")
    }

    fn run(&self, _ctx: &AppContext, _matches: &clap::ArgMatches) -> anyhow::Result<()> {
        self.ran.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// An independently runnable sub-application with one route and one command.
pub struct BillingApp {
    pub command: FlagCommand,
}

impl Default for BillingApp {
    fn default() -> Self {
        Self { command: FlagCommand::named("report") }
    }
}

impl SubApp for BillingApp {
    fn name(&self) -> &str {
        "billing"
    }

    fn router(&self) -> Router {
        // The dispatcher strips the mount prefix: this app only ever sees
        // its own root.
        Router::new().route("/invoices", get(ok))
    }

    fn commands(&self) -> Vec<Arc<dyn Command>> {
        vec![Arc::new(self.command.clone())]
    }
}

