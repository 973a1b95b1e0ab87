// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The blog GraphQL API: schema, scalar codecs, and resolvers backed by a [`blog_sql::Store`].

use std::sync::Arc;

use core_resolver::{
    Schema,
    schema::SchemaError,
    system_resolver::GraphQLSystemResolver,
};

mod blog_context;
mod blog_execution_error;
mod entity_resolver;
mod mutation_resolver;
mod query_resolver;
mod uuid_scalar;

pub use blog_context::BlogContext;
pub use blog_execution_error::BlogExecutionError;
pub use mutation_resolver::MutationRoot;
pub use query_resolver::QueryRoot;
pub use uuid_scalar::UuidScalar;

/// The SDL of the API (without the built-in scalars and introspection types)
pub const BLOG_SCHEMA_SDL: &str = include_str!("schema.graphql");

pub fn create_schema() -> Result<Schema, SchemaError> {
    Schema::new(BLOG_SCHEMA_SDL, vec![Arc::new(UuidScalar)])
}

pub fn create_system_resolver(
    normal_query_depth_limit: usize,
    introspection_query_depth_limit: usize,
    introspection_enabled: bool,
) -> Result<GraphQLSystemResolver<BlogContext>, SchemaError> {
    Ok(GraphQLSystemResolver::new(
        Arc::new(create_schema()?),
        Arc::new(QueryRoot),
        Arc::new(MutationRoot),
        normal_query_depth_limit,
        introspection_query_depth_limit,
        introspection_enabled,
    ))
}
