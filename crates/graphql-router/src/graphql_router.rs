// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use blog_env::Environment;
use blog_resolver::BlogContext;
use common::env_const::get_graphql_http_path;
use common::http::{Headers, RequestHead, RequestPayload, ResponseBody, ResponsePayload};
use common::router::Router;
use core_resolver::QueryResponse;
use core_resolver::system_resolver::{GraphQLSystemResolver, RequestError, SystemResolutionError};
use http::StatusCode;
use tracing::{instrument, warn};

pub use core_resolver::OperationsPayload;

use crate::system_loader::{SystemLoader, SystemLoadingError};

/// Serves `POST` requests to the GraphQL path.
///
/// Every request that could be decoded gets a `200` response whose body carries `data` and/or
/// `errors`; a body that is not a GraphQL payload gets a `400`.
pub struct GraphQLRouter<C> {
    system_resolver: GraphQLSystemResolver<C>,
    context: C,
    graphql_path: String,
}

impl<C> GraphQLRouter<C>
where
    C: Send + Sync + 'static,
{
    pub fn new(system_resolver: GraphQLSystemResolver<C>, context: C, graphql_path: String) -> Self {
        Self {
            system_resolver,
            context,
            graphql_path,
        }
    }

    fn suitable(&self, request_head: &(dyn RequestHead + Send + Sync)) -> bool {
        let path = request_head.get_path();
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path.as_str(),
        };

        path == self.graphql_path && request_head.get_method() == http::Method::POST
    }

    #[instrument(
        name = "GraphQLRouter::resolve"
        skip_all
    )]
    async fn resolve(
        &self,
        request: &(dyn RequestPayload + Send + Sync),
    ) -> Result<QueryResponse, SystemResolutionError> {
        let operations_payload = OperationsPayload::from_json(request.take_body())
            .map_err(RequestError::InvalidBodyJson)?;

        self.system_resolver
            .resolve_operations(operations_payload, &self.context)
            .await
    }
}

impl GraphQLRouter<BlogContext> {
    pub fn from_env(context: BlogContext, env: &dyn Environment) -> Result<Self, SystemLoadingError> {
        Ok(Self::new(
            SystemLoader::create_system_resolver(env)?,
            context,
            get_graphql_http_path(env),
        ))
    }
}

#[async_trait]
impl<C> Router for GraphQLRouter<C>
where
    C: Send + Sync + 'static,
{
    #[instrument(
        name = "GraphQLRouter::route"
        skip(self, request)
    )]
    async fn route(
        &self,
        request: &(dyn RequestPayload + Send + Sync),
    ) -> Option<ResponsePayload> {
        if !self.suitable(request.get_head()) {
            return None;
        }

        let (status_code, body) = match self.resolve(request).await {
            Ok(response) => (StatusCode::OK, response.to_json()),
            Err(error @ SystemResolutionError::RequestError(_)) => {
                warn!(%error, "Rejecting request");
                (StatusCode::BAD_REQUEST, error.to_response().to_json())
            }
            // Validation failures are regular GraphQL responses
            Err(error) => (StatusCode::OK, error.to_response().to_json()),
        };

        let mut headers = Headers::new();
        headers.insert("content-type".into(), "application/json".into());

        Some(ResponsePayload {
            body: ResponseBody::Bytes(body.to_string().into_bytes()),
            headers,
            status_code,
        })
    }
}
