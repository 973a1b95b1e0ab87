// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_graphql_parser::{
    Pos,
    types::{ExecutableDocument, OperationType},
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, instrument};

use common::operation_payload::OperationsPayload;

use crate::{
    FieldResolver, QueryResponse,
    execution::Executor,
    query_response::GraphQLError,
    schema::Schema,
    validation::{
        document_validator::DocumentValidator, operation::ValidatedOperation,
        validation_error::ValidationError,
    },
};

/// The top-level resolver.
///
/// Validates an operation against the schema and executes it, starting from the query or the
/// mutation root resolver. `C` is the per-request data handed to every field resolver.
pub struct GraphQLSystemResolver<C> {
    pub schema: Arc<Schema>,
    query_root: Arc<dyn FieldResolver<C>>,
    mutation_root: Arc<dyn FieldResolver<C>>,
    normal_query_depth_limit: usize,
    introspection_query_depth_limit: usize,
    introspection_enabled: bool,
}

impl<C> GraphQLSystemResolver<C>
where
    C: Send + Sync + 'static,
{
    pub fn new(
        schema: Arc<Schema>,
        query_root: Arc<dyn FieldResolver<C>>,
        mutation_root: Arc<dyn FieldResolver<C>>,
        normal_query_depth_limit: usize,
        introspection_query_depth_limit: usize,
        introspection_enabled: bool,
    ) -> Self {
        Self {
            schema,
            query_root,
            mutation_root,
            normal_query_depth_limit,
            introspection_query_depth_limit,
            introspection_enabled,
        }
    }

    /// Resolve the operation selected by the payload.
    ///
    /// Validation failures (including syntax errors) are returned as
    /// [`SystemResolutionError::Validation`], since no part of the operation was executed. Errors
    /// while resolving individual fields are part of the returned response.
    #[instrument(
        name = "SystemResolver::resolve_operations"
        skip_all
        )]
    pub async fn resolve_operations(
        &self,
        operations_payload: OperationsPayload,
        data: &C,
    ) -> Result<QueryResponse, SystemResolutionError> {
        let query = operations_payload
            .query
            .ok_or(RequestError::MissingQuery)?;

        let operation = self.validate_operation(
            &query,
            operations_payload.operation_name,
            operations_payload.variables,
        )?;

        let (root, serial) = match operation.typ {
            OperationType::Query => (&self.query_root, false),
            OperationType::Mutation => (&self.mutation_root, true),
            OperationType::Subscription => {
                return Err(ValidationError::UnsupportedOperationType(
                    "subscription".to_string(),
                    Pos::default(),
                )
                .into());
            }
        };

        let response = Executor::new(&self.schema, data)
            .execute(root.as_ref(), &operation.fields, serial)
            .await;

        if !response.errors.is_empty() {
            debug!(errors = ?response.errors, "Operation completed with errors");
        }

        Ok(response)
    }

    #[instrument(skip_all)]
    fn validate_operation(
        &self,
        query: &str,
        operation_name: Option<String>,
        variables: Option<Map<String, Value>>,
    ) -> Result<ValidatedOperation, ValidationError> {
        let document = parse_query(query)?;

        let document_validator = DocumentValidator::new(
            &self.schema,
            operation_name,
            variables,
            self.normal_query_depth_limit,
            self.introspection_query_depth_limit,
            self.introspection_enabled,
        );

        document_validator.validate(document)
    }
}

#[instrument(name = "system_resolver::parse_query")]
fn parse_query(query: &str) -> Result<ExecutableDocument, ValidationError> {
    async_graphql_parser::parse_query(query).map_err(|error| {
        error!(%error, "Failed to parse query");
        let (message, pos1, pos2) = match error {
            async_graphql_parser::Error::Syntax {
                message,
                start,
                end,
            } => (format!("Syntax error: {}", message.trim_end()), start, end),
            async_graphql_parser::Error::MultipleOperations {
                anonymous,
                operation,
            } => (
                "Multiple operations".to_string(),
                anonymous,
                Some(operation),
            ),
            async_graphql_parser::Error::OperationDuplicated {
                operation,
                first,
                second,
            } => (
                format!("Operation {operation} duplicated"),
                first,
                Some(second),
            ),
            async_graphql_parser::Error::FragmentDuplicated {
                fragment,
                first,
                second,
            } => (
                format!("Fragment {fragment} duplicated"),
                first,
                Some(second),
            ),
            async_graphql_parser::Error::MissingOperation => {
                ("Missing operation".to_string(), Pos::default(), None)
            }
            _ => ("Unknown error".to_string(), Pos::default(), None),
        };

        ValidationError::QueryParsingFailed(message, pos1, pos2)
    })
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid body JSON {0}")]
    InvalidBodyJson(serde_json::Error),

    #[error("Missing query")]
    MissingQuery,
}

#[derive(Error, Debug)]
pub enum SystemResolutionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid request {0}")]
    RequestError(#[from] RequestError),
}

impl SystemResolutionError {
    // Message that should be emitted when the error is returned to the user.
    pub fn user_error_message(&self) -> String {
        match self {
            SystemResolutionError::Validation(error) => error.to_string(),
            SystemResolutionError::RequestError(RequestError::MissingQuery) => {
                "Missing query".to_string()
            }
            SystemResolutionError::RequestError(RequestError::InvalidBodyJson(_)) => {
                "Invalid request body".to_string()
            }
        }
    }

    /// The response body reporting this error
    pub fn to_response(&self) -> QueryResponse {
        let positions = match self {
            SystemResolutionError::Validation(error) => error.positions(),
            SystemResolutionError::RequestError(_) => vec![],
        };

        QueryResponse::from_errors(vec![GraphQLError::new(
            self.user_error_message(),
            positions,
        )])
    }
}
