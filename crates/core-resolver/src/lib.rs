// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A GraphQL engine: schema loading, document validation, and execution against user-supplied
//! field resolvers (with built-in introspection).

mod execution;
mod field_resolver;
mod introspection;
mod query_response;

pub mod scalar;
pub mod schema;
pub mod system_resolver;
pub mod validation;

pub use common::operation_payload::OperationsPayload;
pub use field_resolver::{ExecutionContext, FieldError, FieldResolver, Resolved};
pub use query_response::{GraphQLError, Location, PathSegment, QueryResponse};
pub use scalar::ScalarCodec;
pub use schema::Schema;
