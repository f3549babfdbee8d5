//! # Kernel
//!
//! The composition engine: explicit registration scopes with two-phase name
//! resolution, the fixed loader-stage sequence, collision-free route and
//! documentation aggregation, and path-prefix mounting of sub-applications.
//!
//! ## Usage
//! ```rust,ignore
//! use manifold_kernel::prelude::*;
//!
//! let registry = Registry::new("app").local("auth", Unit::blueprint(Auth));
//! let app = Composer::builder()
//!     .registry(registry)
//!     .environment("development")
//!     .build()
//!     .compose()?;
//! ```

pub mod commands;
pub mod component;
pub mod compose;
pub mod config;
pub mod context;
pub mod docs;
pub mod error;
pub mod models;
pub mod mounts;
pub mod prelude;
pub mod registry;
pub mod resolve;
pub mod routes;

pub use manifold_domain as domain;
