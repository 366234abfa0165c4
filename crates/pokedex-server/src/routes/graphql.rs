//! GraphQL endpoint and schema routes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use crate::graphql::{GraphQLError, GraphQLRequest, GraphQLResponse, SCHEMA_SDL};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/graphql", get(get_graphql).post(post_graphql))
        .route("/graphql/schema", get(get_schema))
}

/// POST /graphql: execute a JSON-encoded request.
///
/// Errors are reported in the body; the status is always 200 once the body
/// decodes.
async fn post_graphql(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GraphQLRequest>,
) -> impl IntoResponse {
    respond(state.execute(request))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQLParams {
    query: Option<String>,
    variables: Option<String>,
    operation_name: Option<String>,
}

/// GET /graphql?query=...&variables=...&operationName=...
async fn get_graphql(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GraphQLParams>,
) -> impl IntoResponse {
    let Some(query) = params.query else {
        return respond(GraphQLResponse::error(GraphQLError::new(
            "Missing 'query' parameter",
        )));
    };

    let mut request = GraphQLRequest::new(query);
    request.operation_name = params.operation_name;

    if let Some(raw) = params.variables.filter(|v| !v.trim().is_empty()) {
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Object(map)) => request.variables = Some(map),
            Ok(serde_json::Value::Null) => {}
            Ok(_) | Err(_) => {
                return respond(GraphQLResponse::error(GraphQLError::new(
                    "Parameter 'variables' must be a JSON object",
                )));
            }
        }
    }

    respond(state.execute(request))
}

/// GET /graphql/schema: the schema in SDL form.
async fn get_schema() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        SCHEMA_SDL,
    )
}

fn respond(response: GraphQLResponse) -> (StatusCode, Json<GraphQLResponse>) {
    if response.data.is_none() {
        if let Some(err) = response.errors.first() {
            warn!("GraphQL request rejected: {}", err);
        }
    }
    (StatusCode::OK, Json(response))
}
