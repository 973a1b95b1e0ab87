// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::Pos;
use serde::Serialize;
use serde_json::{Map, Value};

/// An entry of the `errors` member of a GraphQL response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<Pos> for Location {
    fn from(pos: Pos) -> Self {
        Location {
            line: pos.line,
            column: pos.column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl GraphQLError {
    pub fn new(message: impl Into<String>, locations: Vec<Pos>) -> Self {
        Self {
            message: message.into(),
            // Errors without a source position carry `Pos::default()` (line 0)
            locations: locations
                .into_iter()
                .filter(|pos| pos.line > 0)
                .map(Location::from)
                .collect(),
            path: vec![],
        }
    }

    pub fn with_path(self, path: Vec<PathSegment>) -> Self {
        Self { path, ..self }
    }
}

/// The outcome of an operation. `data` is absent when the request failed before execution
/// started (for example, validation), and `null` when an error propagated up to the root.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub data: Option<Value>,
    pub errors: Vec<GraphQLError>,
}

impl QueryResponse {
    pub fn from_errors(errors: Vec<GraphQLError>) -> Self {
        Self { data: None, errors }
    }

    pub fn to_json(&self) -> Value {
        let mut response = Map::new();

        if let Some(data) = &self.data {
            response.insert("data".to_string(), data.clone());
        }

        if !self.errors.is_empty() {
            response.insert(
                "errors".to_string(),
                Value::Array(
                    self.errors
                        .iter()
                        .map(|error| {
                            // Serializing plain structs into a `Value` cannot fail
                            serde_json::to_value(error).unwrap_or(Value::Null)
                        })
                        .collect(),
                ),
            );
        }

        Value::Object(response)
    }
}
