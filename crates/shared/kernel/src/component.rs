//! Capability contracts for loadable components and the resolved [`Unit`].
//!
//! Every category of component is an explicit trait; a registered unit carries
//! exactly one capability. Asking a unit for a capability it does not carry is
//! an [`ActivationError`] at load time, never a failure at dispatch time.

use crate::context::AppContext;
use crate::error::ActivationError;
use crate::models::ModelRegistry;
use crate::routes::RouteDef;
use axum::Router;
use manifold_domain::model::ModelDescriptor;
use manifold_domain::route::RouteDoc;
use std::fmt;
use std::sync::Arc;

/// Component categories, as implied by the configuration key a name is
/// listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ComponentCategory {
    Extension,
    Model,
    Command,
    Middleware,
    Service,
    Blueprint,
    Api,
    App,
}

/// An extension initializes once against the application context.
///
/// Extensions are where external collaborators (ORM, mail, job queue, …) hook
/// themselves in; an ORM extension installs the [`SchemaBackend`] here.
pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    /// # Errors
    /// Any error aborts the whole composition.
    fn init_app(&self, ctx: &mut AppContext) -> Result<(), ActivationError>;
}

/// A model module contributes model descriptors to the registry.
///
/// The module identifier is the name the module was registered (and
/// discovered) under; the module itself only knows its models.
pub trait ModelModule: Send + Sync {
    fn models(&self) -> Vec<ModelDescriptor>;
}

/// A CLI command: its clap declaration plus the run function.
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn clap(&self) -> clap::Command;

    /// # Errors
    /// Command failures surface at the process entry point.
    fn run(&self, ctx: &AppContext, matches: &clap::ArgMatches) -> anyhow::Result<()>;
}

/// A middleware wraps the application's request-handling entry point.
///
/// Middlewares compose in configuration order: each subsequent middleware
/// wraps the result of the previous, so the first-listed one ends up
/// innermost and the last-listed one outermost.
pub trait Middleware: Send + Sync {
    fn wrap(&self, router: Router) -> Router;
}

/// A service registers side effects only (background workers and the like);
/// the loader takes no further action.
pub trait Service: Send + Sync {
    /// # Errors
    /// Any error aborts the whole composition.
    fn register(&self, ctx: &AppContext) -> Result<(), ActivationError>;
}

/// A named route group with its own URL sub-root and documentation metadata.
pub trait Blueprint: Send + Sync {
    fn name(&self) -> &str;

    /// URL sub-root the group's routes live under. Must start with `/`.
    fn prefix(&self) -> String {
        format!("/{}", self.name())
    }

    /// Routes relative to the group prefix. The group owns them exclusively.
    fn routes(&self) -> Vec<RouteDef>;

    fn docs(&self) -> Option<RouteDoc> {
        None
    }
}

/// An API resource group registered into the shared `/api` container.
pub trait ApiResource: Send + Sync {
    /// Documentation-endpoint discriminator; part of every generated
    /// identifier (`api.<endpoint>_<handler>`).
    fn endpoint(&self) -> &str;

    /// Additional prefix below the shared container root.
    fn url_prefix(&self) -> String {
        String::new()
    }

    fn routes(&self) -> Vec<RouteDef>;

    fn docs(&self) -> Option<RouteDoc> {
        None
    }
}

/// An independently runnable application mounted under a path prefix.
pub trait SubApp: Send + Sync {
    fn name(&self) -> &str;

    /// The sub-application's own request entry point. It receives paths with
    /// the mount prefix already stripped.
    fn router(&self) -> Router;

    /// The sub-application's own command surface, attached to the main CLI
    /// namespaced by [`SubApp::name`].
    fn commands(&self) -> Vec<Arc<dyn Command>> {
        Vec::new()
    }
}

/// Schema materialization contract of the ORM collaborator.
pub trait SchemaBackend: Send + Sync {
    /// # Errors
    /// Any error aborts the whole composition.
    fn create_all(&self, models: &ModelRegistry) -> Result<(), ActivationError>;
}

/// Post-load hook observing the complete model registry (e.g. serialization
/// schema generation).
pub trait SchemaHook: Send + Sync {
    /// # Errors
    /// Any error aborts the whole composition.
    fn generate(&self, models: &ModelRegistry) -> Result<(), ActivationError>;
}

/// A resolved loadable unit: one capability, matching its category.
#[derive(Clone)]
pub enum Unit {
    Extension(Arc<dyn Extension>),
    Model(Arc<dyn ModelModule>),
    Command(Arc<dyn Command>),
    Middleware(Arc<dyn Middleware>),
    Service(Arc<dyn Service>),
    Blueprint(Arc<dyn Blueprint>),
    Api(Arc<dyn ApiResource>),
    App(Arc<dyn SubApp>),
}

impl Unit {
    pub fn extension(ext: impl Extension + 'static) -> Self {
        Self::Extension(Arc::new(ext))
    }

    pub fn model(module: impl ModelModule + 'static) -> Self {
        Self::Model(Arc::new(module))
    }

    pub fn command(cmd: impl Command + 'static) -> Self {
        Self::Command(Arc::new(cmd))
    }

    pub fn middleware(mw: impl Middleware + 'static) -> Self {
        Self::Middleware(Arc::new(mw))
    }

    pub fn service(service: impl Service + 'static) -> Self {
        Self::Service(Arc::new(service))
    }

    pub fn blueprint(bp: impl Blueprint + 'static) -> Self {
        Self::Blueprint(Arc::new(bp))
    }

    pub fn api(resource: impl ApiResource + 'static) -> Self {
        Self::Api(Arc::new(resource))
    }

    pub fn app(app: impl SubApp + 'static) -> Self {
        Self::App(Arc::new(app))
    }

    #[must_use]
    pub fn category(&self) -> ComponentCategory {
        match self {
            Self::Extension(_) => ComponentCategory::Extension,
            Self::Model(_) => ComponentCategory::Model,
            Self::Command(_) => ComponentCategory::Command,
            Self::Middleware(_) => ComponentCategory::Middleware,
            Self::Service(_) => ComponentCategory::Service,
            Self::Blueprint(_) => ComponentCategory::Blueprint,
            Self::Api(_) => ComponentCategory::Api,
            Self::App(_) => ComponentCategory::App,
        }
    }

    /// # Errors
    /// [`ActivationError::Contract`] when the unit is not an extension.
    pub fn expect_extension(&self, name: &str) -> Result<Arc<dyn Extension>, ActivationError> {
        match self {
            Self::Extension(ext) => Ok(ext.clone()),
            other => Err(contract(name, ComponentCategory::Extension, other)),
        }
    }

    /// # Errors
    /// [`ActivationError::Contract`] when the unit is not a model module.
    pub fn expect_model(&self, name: &str) -> Result<Arc<dyn ModelModule>, ActivationError> {
        match self {
            Self::Model(module) => Ok(module.clone()),
            other => Err(contract(name, ComponentCategory::Model, other)),
        }
    }

    /// # Errors
    /// [`ActivationError::Contract`] when the unit is not a command.
    pub fn expect_command(&self, name: &str) -> Result<Arc<dyn Command>, ActivationError> {
        match self {
            Self::Command(cmd) => Ok(cmd.clone()),
            other => Err(contract(name, ComponentCategory::Command, other)),
        }
    }

    /// # Errors
    /// [`ActivationError::Contract`] when the unit is not a middleware.
    pub fn expect_middleware(&self, name: &str) -> Result<Arc<dyn Middleware>, ActivationError> {
        match self {
            Self::Middleware(mw) => Ok(mw.clone()),
            other => Err(contract(name, ComponentCategory::Middleware, other)),
        }
    }

    /// # Errors
    /// [`ActivationError::Contract`] when the unit is not a service.
    pub fn expect_service(&self, name: &str) -> Result<Arc<dyn Service>, ActivationError> {
        match self {
            Self::Service(service) => Ok(service.clone()),
            other => Err(contract(name, ComponentCategory::Service, other)),
        }
    }

    /// # Errors
    /// [`ActivationError::Contract`] when the unit is not a blueprint.
    pub fn expect_blueprint(&self, name: &str) -> Result<Arc<dyn Blueprint>, ActivationError> {
        match self {
            Self::Blueprint(bp) => Ok(bp.clone()),
            other => Err(contract(name, ComponentCategory::Blueprint, other)),
        }
    }

    /// # Errors
    /// [`ActivationError::Contract`] when the unit is not an API resource.
    pub fn expect_api(&self, name: &str) -> Result<Arc<dyn ApiResource>, ActivationError> {
        match self {
            Self::Api(resource) => Ok(resource.clone()),
            other => Err(contract(name, ComponentCategory::Api, other)),
        }
    }

    /// # Errors
    /// [`ActivationError::Contract`] when the unit is not a sub-application.
    pub fn expect_app(&self, name: &str) -> Result<Arc<dyn SubApp>, ActivationError> {
        match self {
            Self::App(app) => Ok(app.clone()),
            other => Err(contract(name, ComponentCategory::App, other)),
        }
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit({})", self.category())
    }
}

fn contract(name: &str, required: ComponentCategory, found: &Unit) -> ActivationError {
    ActivationError::Contract { name: name.to_owned(), required, found: found.category() }
}
