//! Shared names and fixed paths used across the composition engine.

/// Process variable holding the environment discriminator.
pub const ENV_VAR: &str = "MANIFOLD_ENV";

/// Per-environment variable file, read before the discriminator is consulted.
pub const ENV_FILE: &str = ".env";

/// Default profile file name (without extension, resolved by the config loader).
pub const CONFIG_FILE: &str = "manifold";

/// Prefix for environment overrides of profile settings.
pub const ENV_OVERRIDE_PREFIX: &str = "MANIFOLD";

/// URL sub-root shared by every API resource group.
pub const API_PREFIX: &str = "/api";

/// Identifier prefix for routes owned by the shared API container.
pub const API_ENDPOINT_NS: &str = "api";

/// Where the interactive API documentation UI is served.
pub const DOCS_URL: &str = "/docs";

/// Where the raw OpenAPI document is served.
pub const OPENAPI_URL: &str = "/api-docs/openapi.json";

/// Subtree scanned for data-model source files.
pub const MODELS_DIR: &str = "models";
