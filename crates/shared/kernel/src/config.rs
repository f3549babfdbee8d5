//! Configuration loading: the environment discriminator, the per-environment
//! variable file, and profile selection with single-level inheritance.
//!
//! The discriminator is preferably an explicit startup parameter; the
//! `MANIFOLD_ENV` process variable is the fallback, and the `.env` file is
//! loaded first so it may supply the discriminator itself. Absence of the
//! discriminator is fatal — there is no default environment.

use crate::error::ConfigError;
use config::{Config, Environment, File};
use manifold_domain::config::{Profiles, Settings};
use manifold_domain::constants::{ENV_OVERRIDE_PREFIX, ENV_VAR};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Inputs of the configuration stage.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Profile file path, without extension (resolved by the config source).
    pub config_path: PathBuf,
    /// Per-environment variable file; silently skipped when absent.
    pub env_file: PathBuf,
    /// Explicit discriminator. When `None`, the process environment decides.
    pub environment: Option<String>,
}

/// Runs the configuration stage: env file, discriminator, profile lookup,
/// inheritance overlay. Returns the selected profile name and its settings.
///
/// # Errors
/// * [`ConfigError::EnvironmentNotFound`] — no discriminator anywhere.
/// * [`ConfigError::UnknownProfile`] — discriminator names no profile.
/// * [`ConfigError::DeepInheritance`] — `extends` chains deeper than one.
/// * [`ConfigError::Source`] / [`ConfigError::EnvFile`] — unreadable inputs.
pub fn load_settings(opts: &LoadOptions) -> Result<(String, Settings), ConfigError> {
    load_env_file(&opts.env_file)?;

    let environment = opts
        .environment
        .clone()
        .or_else(|| std::env::var(ENV_VAR).ok().filter(|v| !v.is_empty()))
        .ok_or(ConfigError::EnvironmentNotFound)?;
    let profile_name = capitalize(&environment);

    info!(config = %opts.config_path.display(), profile = %profile_name, "loading configuration");

    let profiles: Profiles = Config::builder()
        .add_source(File::from(opts.config_path.as_path()).required(true))
        .add_source(
            // `MANIFOLD__PROFILE__<NAME>__DEBUG` → `profile.<name>.debug`.
            // The bare `MANIFOLD_ENV` discriminator stays out of this source.
            Environment::with_prefix(ENV_OVERRIDE_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()?
        .try_deserialize()?;

    let spec = profiles
        .get(&profile_name)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownProfile { name: profile_name.clone() })?;

    let spec = if let Some(parent_name) = spec.extends.clone() {
        let parent = profiles
            .get(&parent_name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: parent_name.clone() })?;
        if parent.extends.is_some() {
            return Err(ConfigError::DeepInheritance { name: profile_name, parent: parent_name });
        }
        spec.overlay(parent)
    } else {
        spec
    };

    Ok((profile_name, spec.into_settings()))
}

/// Loads the variable file into the process environment. Variables already
/// present win; a missing file is not an error.
fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    if !path.is_file() {
        return Ok(());
    }
    dotenv::from_path(path).map_err(|e| ConfigError::EnvFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), "environment file loaded");
    Ok(())
}

/// `development` → `Development`, matching the profile naming convention.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
    })
}
