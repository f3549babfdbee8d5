use crate::component::ComponentCategory;
use std::path::PathBuf;
use thiserror::Error;

/// Errors selecting and loading the configuration profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment discriminator was supplied neither as a startup
    /// parameter nor through the process environment. Fatal; no default.
    #[error("environment not found")]
    EnvironmentNotFound,

    /// The discriminator capitalized to a profile name that the profile file
    /// does not declare.
    #[error("unknown configuration profile `{name}`")]
    UnknownProfile { name: String },

    /// Profile inheritance is single-level: a parent must not extend further.
    #[error("profile `{name}` extends `{parent}`, which itself extends another profile")]
    DeepInheritance { name: String, parent: String },

    /// The profile file is missing or malformed, or an environment override
    /// does not deserialize.
    #[error("failed to load profile file: {source}")]
    Source {
        #[from]
        source: config::ConfigError,
    },

    /// The per-environment variable file exists but could not be read.
    #[error("failed to load environment file {}: {message}", .path.display())]
    EnvFile { path: PathBuf, message: String },
}

/// A configured name failed to resolve in both scopes.
///
/// Carries both attempted identifiers for diagnostics: the local form
/// (qualified with the application namespace) and the global form.
#[derive(Debug, Error)]
#[error("cannot resolve {category} `{name}`: tried `{local}` and `{global}`")]
pub struct ResolveError {
    pub category: ComponentCategory,
    pub name: String,
    pub local: String,
    pub global: String,
}

/// A resolved unit could not be activated for its category.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// The unit exists but does not carry the capability the category needs.
    #[error("component `{name}` does not provide the {required} contract (registered as {found})")]
    Contract { name: String, required: ComponentCategory, found: ComponentCategory },

    /// The unit carries the capability but its activation failed.
    #[error("component `{name}` failed to activate: {message}")]
    Failed { name: String, message: String },

    /// `create_db` is set but no extension installed a schema backend.
    #[error("create_db is set but no schema backend is installed; load an ORM extension first")]
    MissingSchemaBackend,
}

impl ActivationError {
    pub fn failed(name: impl Into<String>, message: impl ToString) -> Self {
        Self::Failed { name: name.into(), message: message.to_string() }
    }
}

/// Umbrella error of the composition sequence. Any variant aborts startup.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    /// Two aggregation passes produced the same generated identifier.
    #[error("duplicate route identifier `{id}` ({existing} vs {incoming})")]
    DuplicateRoute { id: String, existing: String, incoming: String },

    /// Mount prefixes must be disjoint; overlap is never resolved by search.
    #[error("mount prefix `{incoming}` overlaps already-registered `{existing}`")]
    OverlappingMounts { existing: String, incoming: String },

    /// The command surface already carries a command with this name.
    #[error("duplicate command `{name}`")]
    DuplicateCommand { name: String },

    #[error("route path `{path}` from {origin} must start with '/'")]
    InvalidPath { origin: String, path: String },

    #[error("{kind} `{name}` prefix `{prefix}` must start with '/' and must not end with '/'")]
    InvalidPrefix { kind: &'static str, name: String, prefix: String },

    /// Enumerating the models subtree failed.
    #[error("model scan failed under {}: {source}", .path.display())]
    ModelScan { path: PathBuf, source: std::io::Error },
}
