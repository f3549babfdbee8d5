//! Two-phase name resolution over explicit registration scopes.
//!
//! A configured dotted name may live inside the application's own namespace
//! (the local scope, keys qualified with the namespace at registration time)
//! or ship as a standalone package (the global scope, absolute keys). The
//! resolver tries the local form first and falls back to the global form;
//! only both failing is an error, and that error carries both attempted
//! identifiers.

use crate::component::{ComponentCategory, Unit};
use crate::error::ResolveError;
use fxhash::FxHashMap;
use std::fmt;

/// One named registration scope.
#[derive(Default)]
pub struct Scope {
    units: FxHashMap<String, Unit>,
}

impl Scope {
    /// Registers a unit under `key`. Re-registration replaces the previous
    /// unit (latest wins).
    pub(crate) fn insert(&mut self, key: String, unit: Unit) {
        self.units.insert(key, unit);
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Unit> {
        self.units.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.units.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Scope").field("units", &keys).finish()
    }
}

/// Resolves `rel` against the local scope (qualified with `namespace`), then
/// against the global scope.
///
/// # Errors
/// [`ResolveError`] with both attempted identifiers when neither scope
/// carries the name.
pub(crate) fn resolve(
    namespace: &str,
    local: &Scope,
    global: &Scope,
    category: ComponentCategory,
    rel: &str,
) -> Result<Unit, ResolveError> {
    let qualified = format!("{namespace}.{rel}");
    if let Some(unit) = local.get(&qualified) {
        return Ok(unit.clone());
    }

    // Local attempt failed; retry once in the global scope.
    if let Some(unit) = global.get(rel) {
        return Ok(unit.clone());
    }

    Err(ResolveError { category, name: rel.to_owned(), local: qualified, global: rel.to_owned() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Middleware;
    use axum::Router;

    struct Nop;

    impl Middleware for Nop {
        fn wrap(&self, router: Router) -> Router {
            router
        }
    }

    #[test]
    fn local_scope_wins_over_global() {
        let mut local = Scope::default();
        let mut global = Scope::default();
        local.insert("app.middlewares.nop".to_owned(), Unit::middleware(Nop));
        global.insert("middlewares.nop".to_owned(), Unit::middleware(Nop));

        let unit = resolve(
            "app",
            &local,
            &global,
            ComponentCategory::Middleware,
            "middlewares.nop",
        )
        .expect("resolves locally");
        assert_eq!(unit.category(), ComponentCategory::Middleware);
    }

    #[test]
    fn error_carries_both_attempts() {
        let err = resolve(
            "app",
            &Scope::default(),
            &Scope::default(),
            ComponentCategory::Extension,
            "extensions.orm",
        )
        .expect_err("nothing registered");

        assert_eq!(err.local, "app.extensions.orm");
        assert_eq!(err.global, "extensions.orm");
        assert_eq!(err.category, ComponentCategory::Extension);
    }
}
