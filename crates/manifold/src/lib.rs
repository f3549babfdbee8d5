//! Facade crate for Manifold features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature registration.
//! Keep this crate thin: it should compose other crates, not implement
//! composition logic.
//!
//! ## Usage
//! - Build a registry with [`default_registry`] (built-in slices included)
//!   or assemble your own from [`kernel::registry::Registry`].
//! - Hand it to a `Composer`; extend the registry as new slices appear.

pub use manifold_auth as auth;
pub use manifold_domain as domain;
pub use manifold_kernel as kernel;

use manifold_kernel::registry::Registry;

/// Feature registry for runtime introspection.
pub mod features {
    /// Built-in feature slices registered by [`crate::default_registry`].
    pub const ENABLED: &[&str] = &["auth"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Builds the default registry for an application namespace: every built-in
/// feature slice registered under the local scope.
#[must_use]
pub fn default_registry(namespace: &str) -> Registry {
    auth::register(Registry::new(namespace))
}
