mod fixtures;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use fixtures::{BillingApp, write_profiles};
use manifold_kernel::prelude::*;
use std::sync::atomic::Ordering;
use tower::util::ServiceExt;

fn billing_registry() -> (Registry, BillingApp) {
    let billing = BillingApp::default();
    let registry = Registry::new("app")
        .urls(vec![RouteDef::new("/other", "other", MethodSet::GET, get(|| async { "main" }))])
        .global("billing", Unit::app(BillingApp { command: billing.command.clone() }));
    (registry, billing)
}

fn compose(profile: &str, registry: Registry) -> Result<App, ComposeError> {
    let root = tempfile::tempdir().expect("tempdir");
    let config_path = write_profiles(root.path(), profile);
    Composer::builder()
        .registry(registry)
        .root(root.path())
        .config_path(config_path)
        .environment("development")
        .build()
        .compose()
}

#[tokio::test]
async fn prefix_match_delegates_with_prefix_stripped() {
    let (registry, _billing) = billing_registry();
    let app = compose(
        r#"
        [profile.Development]
        apps = [{ name = "billing", path = "/billing", help = "Billing commands" }]
        "#,
        registry,
    )
    .expect("composition succeeds");

    // The billing sub-application serves `/invoices` at its own root; a
    // request to `/billing/invoices` must reach it with `/invoices`.
    let response = app
        .router()
        .oneshot(Request::builder().uri("/billing/invoices").body(Body::empty()).expect("request"))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    // The sub-application owns everything below the prefix, including misses.
    let response = app
        .router()
        .oneshot(Request::builder().uri("/billing/nope").body(Body::empty()).expect("request"))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Anything else falls through to the main application.
    let response = app
        .router()
        .oneshot(Request::builder().uri("/other").body(Body::empty()).expect("request"))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    // The mount prefix is matched at a `/` boundary, not as a string prefix.
    let response = app
        .router()
        .oneshot(Request::builder().uri("/billingX/invoices").body(Body::empty()).expect("request"))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mount_path_defaults_to_the_app_name() {
    let (registry, _billing) = billing_registry();
    let app = compose(
        r#"
        [profile.Development]
        apps = ["billing"]
        "#,
        registry,
    )
    .expect("composition succeeds");

    assert_eq!(app.context().mounts().points()[0].prefix, "/billing");

    let response = app
        .router()
        .oneshot(Request::builder().uri("/billing/invoices").body(Body::empty()).expect("request"))
        .await
        .expect("dispatch");
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn overlapping_mount_prefixes_are_a_configuration_error() {
    let (registry, _billing) = billing_registry();
    let registry = registry.global("billing_api", Unit::app(BillingApp::default()));

    let err = compose(
        r#"
        [profile.Development]
        apps = [
            { name = "billing", path = "/billing" },
            { name = "billing_api", path = "/billing/api" },
        ]
        "#,
        registry,
    )
    .expect_err("nested prefixes");

    assert!(matches!(err, ComposeError::OverlappingMounts { .. }));
}

#[test]
fn sub_application_commands_are_namespaced_with_help_text() {
    let (registry, billing) = billing_registry();
    let app = compose(
        r#"
        [profile.Development]
        apps = [{ name = "billing", path = "/billing", help = "Billing commands" }]
        "#,
        registry,
    )
    .expect("composition succeeds");

    assert!(app.surface().contains("billing"));

    let matches = app
        .surface()
        .clap()
        .try_get_matches_from(["app", "billing", "report"])
        .expect("namespaced command parses");
    let action = app.dispatch(&matches).expect("dispatch");
    assert_eq!(action, CliAction::Handled);
    assert!(billing.command.ran.load(Ordering::SeqCst), "sub-app command must run");
}
