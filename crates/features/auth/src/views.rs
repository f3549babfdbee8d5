//! Request handlers of the auth blueprint.
//!
//! Mail delivery and signed access tokens belong to external collaborators;
//! here a successful registration logs its confirmation token and a login
//! returns an opaque store-issued token.

use crate::store::{TokenKind, UserStore};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginSuccess {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordReset {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct DefaultResponse {
    pub reason: String,
}

fn reply(status: StatusCode, reason: &str) -> Response {
    (status, Json(DefaultResponse { reason: reason.to_owned() })).into_response()
}

pub(crate) async fn login(store: Arc<UserStore>, req: LoginRequest) -> Response {
    if store.verify(&req.email, &req.password) {
        let access_token = store.issue_token(TokenKind::Access, &req.email);
        info!(email = %req.email, "login succeeded");
        return (StatusCode::OK, Json(LoginSuccess { access_token })).into_response();
    }
    reply(StatusCode::UNAUTHORIZED, "Incorrect email or password.")
}

pub(crate) async fn register(store: Arc<UserStore>, req: RegisterRequest) -> Response {
    if req.email.is_empty() {
        return reply(StatusCode::UNAUTHORIZED, "Email required.");
    }
    if req.username.is_empty() || req.password.is_empty() {
        return reply(StatusCode::FORBIDDEN, "Username and password are required.");
    }
    if !store.insert(&req.username, &req.email, &req.password) {
        return reply(StatusCode::FORBIDDEN, "Email already exists.");
    }

    let token = store.issue_token(TokenKind::Confirm, &req.email);
    info!(email = %req.email, %token, "registration pending confirmation");
    reply(StatusCode::OK, "Successful registration.")
}

pub(crate) async fn confirm_account(store: Arc<UserStore>, token: String) -> Response {
    match store.consume_token(TokenKind::Confirm, &token) {
        Some(email) if store.confirm(&email) => reply(StatusCode::OK, "Confirmed."),
        _ => reply(StatusCode::FORBIDDEN, "Invalid token."),
    }
}

pub(crate) async fn request_password_reset(store: Arc<UserStore>, req: PasswordResetRequest) -> Response {
    if store.get(&req.email).is_none() {
        return reply(StatusCode::NOT_FOUND, "User not found.");
    }
    let token = store.issue_token(TokenKind::PasswordReset, &req.email);
    info!(email = %req.email, %token, "password reset requested");
    reply(StatusCode::OK, "A password reset request has been sent.")
}

pub(crate) async fn password_reset(store: Arc<UserStore>, token: String, req: PasswordReset) -> Response {
    match store.consume_token(TokenKind::PasswordReset, &token) {
        Some(email) if store.set_password(&email, &req.password) => {
            reply(StatusCode::OK, "Successfully changed password.")
        },
        _ => reply(StatusCode::UNAUTHORIZED, "Invalid token."),
    }
}
