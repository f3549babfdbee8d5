mod fixtures;

use fixtures::{StubApi, write_profiles};
use manifold_kernel::prelude::*;

fn compose_with_apis(apis: &str, registry: Registry) -> Result<App, ComposeError> {
    let root = tempfile::tempdir().expect("tempdir");
    let config_path = write_profiles(
        root.path(),
        &format!(
            r#"
            [profile.Development]
            apis = {apis}
            "#
        ),
    );

    Composer::builder()
        .registry(registry)
        .root(root.path())
        .config_path(config_path)
        .environment("development")
        .build()
        .compose()
}

#[test]
fn shared_endpoint_with_distinct_handlers_never_collides() {
    let registry = Registry::new("app")
        .local(
            "api.books",
            Unit::api(StubApi::new("books", "/books", &[("/", "list")])),
        )
        .local(
            "api.books_admin",
            Unit::api(StubApi::new("books", "/admin/books", &[("/", "create")])),
        );

    let app = compose_with_apis(r#"["api.books", "api.books_admin"]"#, registry)
        .expect("distinct handler names under one endpoint");

    let table = app.context().routes();
    let list = table.get("api.books_list").expect("list route");
    let create = table.get("api.books_create").expect("create route");
    assert_eq!(list.path, "/api/books");
    assert_eq!(create.path, "/api/admin/books");
    assert_ne!(list.id, create.id);
}

#[test]
fn identical_endpoint_and_handler_pair_is_rejected() {
    let registry = Registry::new("app")
        .local("api.books", Unit::api(StubApi::new("books", "/books", &[("/", "list")])))
        .local(
            "api.books_copy",
            Unit::api(StubApi::new("books", "/other", &[("/", "list")])),
        );

    let err = compose_with_apis(r#"["api.books", "api.books_copy"]"#, registry)
        .expect_err("same endpoint, same handler name");

    assert!(matches!(
        err,
        ComposeError::DuplicateRoute { id, .. } if id == "api.books_list"
    ));
}

#[test]
fn identifiers_are_equal_iff_endpoint_and_handler_match() {
    // Different endpoints sharing handler names stay distinct too.
    let registry = Registry::new("app")
        .local("api.books", Unit::api(StubApi::new("books", "/books", &[("/", "list")])))
        .local("api.authors", Unit::api(StubApi::new("authors", "/authors", &[("/", "list")])));

    let app = compose_with_apis(r#"["api.books", "api.authors"]"#, registry)
        .expect("distinct endpoints");

    let table = app.context().routes();
    assert!(table.contains("api.books_list"));
    assert!(table.contains("api.authors_list"));
    assert_eq!(table.len(), 2);
}
