//! Documentation aggregation: one OpenAPI document assembled from the
//! committed route table.
//!
//! Runs strictly after route aggregation, so every documented operation maps
//! to exactly the route that serves it: the `operation_id` is the route's
//! generated identifier and the walk preserves table insertion order
//! (direct → blueprints → API resources).

use crate::routes::RouteTable;
use manifold_domain::method::MethodSet;
use manifold_domain::route::RouteRecord;
use utoipa::openapi::path::{HttpMethod, OperationBuilder, PathItemBuilder, PathsBuilder};
use utoipa::openapi::response::{ResponseBuilder, ResponsesBuilder};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

const METHODS: &[(MethodSet, HttpMethod)] = &[
    (MethodSet::GET, HttpMethod::Get),
    (MethodSet::POST, HttpMethod::Post),
    (MethodSet::PUT, HttpMethod::Put),
    (MethodSet::PATCH, HttpMethod::Patch),
    (MethodSet::DELETE, HttpMethod::Delete),
    (MethodSet::HEAD, HttpMethod::Head),
    (MethodSet::OPTIONS, HttpMethod::Options),
];

/// Builds the OpenAPI document for every record in the table.
#[must_use]
pub fn build_openapi(title: &str, version: &str, table: &RouteTable) -> OpenApi {
    // Group records by path, preserving first-appearance order.
    let mut order: Vec<&str> = Vec::new();
    for record in table.records() {
        if !order.contains(&record.path.as_str()) {
            order.push(&record.path);
        }
    }

    let mut paths = PathsBuilder::new();
    for path in order {
        let mut item = PathItemBuilder::new();
        for record in table.records().iter().filter(|r| r.path == path) {
            for (set, method) in METHODS {
                if record.methods.contains(*set) {
                    item = item.operation(method.clone(), operation(record));
                }
            }
        }
        paths = paths.path(path, item.build());
    }

    OpenApiBuilder::new()
        .info(InfoBuilder::new().title(title).version(version).build())
        .paths(paths.build())
        .build()
}

fn operation(record: &RouteRecord) -> utoipa::openapi::path::Operation {
    let doc = record.doc.clone().unwrap_or_default();
    OperationBuilder::new()
        .operation_id(Some(record.id.clone()))
        .tags((!doc.tags.is_empty()).then_some(doc.tags))
        .summary(doc.summary)
        .description(doc.description)
        .responses(
            ResponsesBuilder::new()
                .response("200", ResponseBuilder::new().description("Successful response").build())
                .build(),
        )
        .build()
}
