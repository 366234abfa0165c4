//! Request, response and error shapes of the GraphQL endpoint.

use serde::{Deserialize, Serialize};

/// A GraphQL request as posted by clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(default)]
    pub variables: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub operation_name: Option<String>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn variables(mut self, variables: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = variables {
            self.variables = Some(map);
        }
        self
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// A GraphQL response. `data` is absent when the request failed before
/// execution; `errors` is omitted when empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphQLResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResponse {
    /// A request-level failure: no data, one error.
    pub fn error(err: GraphQLError) -> Self {
        Self {
            data: None,
            errors: vec![err],
        }
    }
}

/// Position of a token in the query text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    /// Response keys (strings) and list indexes (numbers) leading to the field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.locations = vec![location];
        self
    }

    pub fn with_path(mut self, path: Vec<serde_json::Value>) -> Self {
        self.path = path;
        self
    }
}
