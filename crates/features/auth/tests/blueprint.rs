use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use manifold_auth::{AuthSlice, TokenKind, register_slice};
use manifold_kernel::prelude::*;
use serde_json::json;
use tower::util::ServiceExt;

fn compose(slice: &AuthSlice) -> App {
    let root = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        root.path().join("manifold.toml"),
        r#"
        [profile.Testing]
        blueprints = ["auth"]
        "#,
    )
    .expect("profile file");

    Composer::builder()
        .registry(register_slice(Registry::new("app"), slice))
        .root(root.path())
        .config_path(root.path().join("manifold"))
        .environment("testing")
        .build()
        .compose()
        .expect("composition succeeds")
}

fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[test]
fn every_account_route_is_committed_under_the_group_prefix() {
    let slice = AuthSlice::new();
    let app = compose(&slice);
    let table = app.context().routes();

    for (id, path) in [
        ("auth.login", "/auth/login"),
        ("auth.register", "/auth/register"),
        ("auth.confirm_account", "/auth/confirm/{token}"),
        ("auth.request_password_reset", "/auth/password/reset-request"),
        ("auth.password_reset", "/auth/password/reset/{token}"),
    ] {
        let record = table.get(id).expect("route committed");
        assert_eq!(record.path, path);
    }
}

#[tokio::test]
async fn register_then_confirm_then_login() {
    let slice = AuthSlice::new();
    let app = compose(&slice);

    let response = app
        .router()
        .oneshot(post(
            "/auth/register",
            json!({ "username": "ada", "email": "ada@example.com", "password": "s3cret" }),
        ))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    // Unconfirmed accounts cannot log in yet.
    let response = app
        .router()
        .oneshot(post("/auth/login", json!({ "email": "ada@example.com", "password": "s3cret" })))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Confirmation tokens travel by mail in production; fetch one directly.
    let token = slice.store().issue_token(TokenKind::Confirm, "ada@example.com");
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .uri(format!("/auth/confirm/{token}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router()
        .oneshot(post("/auth/login", json!({ "email": "ada@example.com", "password": "s3cret" })))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_registration_is_forbidden() {
    let slice = AuthSlice::new();
    slice.store().insert("ada", "ada@example.com", "s3cret");
    let app = compose(&slice);

    let response = app
        .router()
        .oneshot(post(
            "/auth/register",
            json!({ "username": "other", "email": "ada@example.com", "password": "x" }),
        ))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn password_reset_roundtrip() {
    let slice = AuthSlice::new();
    slice.store().insert("ada", "ada@example.com", "old");
    slice.store().confirm("ada@example.com");
    let app = compose(&slice);

    let response = app
        .router()
        .oneshot(post("/auth/password/reset-request", json!({ "email": "ada@example.com" })))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let token = slice.store().issue_token(TokenKind::PasswordReset, "ada@example.com");
    let response = app
        .router()
        .oneshot(post(&format!("/auth/password/reset/{token}"), json!({ "password": "new" })))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    assert!(slice.store().verify("ada@example.com", "new"));
    assert!(!slice.store().verify("ada@example.com", "old"));
}
