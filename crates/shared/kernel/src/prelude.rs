//! Ergonomic re-exports for application and component authors.

pub use crate::commands::{CliAction, CommandSurface};
pub use crate::component::{
    ApiResource, Blueprint, Command, ComponentCategory, Extension, Middleware, ModelModule,
    SchemaBackend, SchemaHook, Service, SubApp, Unit,
};
pub use crate::compose::{App, Composer, ComposerBuilder};
pub use crate::context::AppContext;
pub use crate::error::{ActivationError, ComposeError, ConfigError, ResolveError};
pub use crate::models::ModelRegistry;
pub use crate::registry::Registry;
pub use crate::routes::RouteDef;

pub use manifold_domain::config::Settings;
pub use manifold_domain::method::MethodSet;
pub use manifold_domain::model::ModelDescriptor;
pub use manifold_domain::mount::MountSpec;
pub use manifold_domain::route::RouteDoc;
