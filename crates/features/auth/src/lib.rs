//! Built-in authentication feature slice.
//!
//! One [`AuthSlice`] owns the account store and hands out the components the
//! composition engine loads by name: the `auth` blueprint, the `models.user`
//! model module, and the `create-user` command.

mod commands;
mod models;
mod store;
mod views;

pub use crate::commands::CreateUser;
pub use crate::models::UserModels;
pub use crate::store::{Account, TokenKind, UserStore};
pub use crate::views::{
    DefaultResponse, LoginRequest, LoginSuccess, PasswordReset, PasswordResetRequest,
    RegisterRequest,
};

use axum::Json;
use axum::extract::Path;
use axum::routing::{get, post};
use manifold_kernel::prelude::{Blueprint, MethodSet, Registry, RouteDef, RouteDoc, Unit};
use std::sync::Arc;

/// Shared state of the auth feature.
#[derive(Debug, Clone, Default)]
pub struct AuthSlice {
    store: Arc<UserStore>,
}

impl AuthSlice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn store(&self) -> Arc<UserStore> {
        self.store.clone()
    }

    #[must_use]
    pub fn blueprint(&self) -> Auth {
        Auth { store: self.store.clone() }
    }

    #[must_use]
    pub fn models(&self) -> UserModels {
        UserModels
    }

    #[must_use]
    pub fn create_user(&self) -> CreateUser {
        CreateUser::new(self.store.clone())
    }
}

/// Registers a fresh slice's components under the application's local scope:
/// `auth`, `models.user`, and `commands.create_user`.
#[must_use]
pub fn register(registry: Registry) -> Registry {
    register_slice(registry, &AuthSlice::new())
}

/// Registers an existing slice, keeping the caller a handle on the store.
#[must_use]
pub fn register_slice(registry: Registry, slice: &AuthSlice) -> Registry {
    registry
        .local("auth", Unit::blueprint(slice.blueprint()))
        .local("models.user", Unit::model(slice.models()))
        .local("commands.create_user", Unit::command(slice.create_user()))
}

/// The `auth` named group: account lifecycle routes under `/auth`.
#[derive(Debug, Clone)]
pub struct Auth {
    store: Arc<UserStore>,
}

impl Blueprint for Auth {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Vec<RouteDef> {
        let store = &self.store;
        vec![
            RouteDef::new("/login", "login", MethodSet::POST, {
                let store = store.clone();
                post(move |Json(req): Json<LoginRequest>| views::login(store.clone(), req))
            })
            .summary("Obtain an access token"),
            RouteDef::new("/register", "register", MethodSet::POST, {
                let store = store.clone();
                post(move |Json(req): Json<RegisterRequest>| views::register(store.clone(), req))
            })
            .summary("Create an unconfirmed account"),
            RouteDef::new("/confirm/{token}", "confirm_account", MethodSet::GET, {
                let store = store.clone();
                get(move |Path(token): Path<String>| views::confirm_account(store.clone(), token))
            })
            .summary("Confirm a pending registration"),
            RouteDef::new("/password/reset-request", "request_password_reset", MethodSet::POST, {
                let store = store.clone();
                post(move |Json(req): Json<PasswordResetRequest>| {
                    views::request_password_reset(store.clone(), req)
                })
            })
            .summary("Request a password reset token"),
            RouteDef::new("/password/reset/{token}", "password_reset", MethodSet::POST, {
                let store = store.clone();
                post(move |Path(token): Path<String>, Json(req): Json<PasswordReset>| {
                    views::password_reset(store.clone(), token, req)
                })
            })
            .summary("Redeem a password reset token"),
        ]
    }

    fn docs(&self) -> Option<RouteDoc> {
        Some(RouteDoc::tagged("auth").description("Account registration and credentials"))
    }
}
