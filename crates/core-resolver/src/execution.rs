// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Execution of a validated operation.
//!
//! Resolvers produce [`Resolved`] values, which are completed against the declared field types:
//! leaf values go through the scalar codecs, objects are resolved field by field, and lists
//! element by element. A field error nulls the field and is recorded with its response path. A
//! null in a non-null position nulls the nearest nullable ancestor instead.

use std::sync::{Mutex, PoisonError};

use async_graphql_parser::types::{BaseType, Type, TypeKind};
use futures::{
    FutureExt,
    future::{BoxFuture, join_all},
};
use serde_json::{Map, Value};
use tracing::error;

use crate::{
    ExecutionContext, FieldResolver, Resolved,
    introspection,
    query_response::{GraphQLError, PathSegment, QueryResponse},
    schema::Schema,
    validation::field::ValidatedField,
};

/// A null reached a non-null position; the enclosing value must become null. The error that
/// caused it has already been recorded.
#[derive(Debug)]
struct NullPropagation;

type Completion = Result<Value, NullPropagation>;

pub(crate) struct Executor<'a, C> {
    ctx: ExecutionContext<'a, C>,
    errors: Mutex<Vec<GraphQLError>>,
}

impl<'a, C> Executor<'a, C>
where
    C: Send + Sync + 'static,
{
    pub(crate) fn new(schema: &'a Schema, data: &'a C) -> Self {
        Self {
            ctx: ExecutionContext { schema, data },
            errors: Mutex::new(vec![]),
        }
    }

    /// Execute the top-level fields. Mutation fields must be executed serially, in document
    /// order; everything else is resolved concurrently.
    pub(crate) async fn execute(
        self,
        root: &dyn FieldResolver<C>,
        fields: &[ValidatedField],
        serial: bool,
    ) -> QueryResponse {
        let data = match self
            .execute_selection_set(root, fields, vec![], serial)
            .await
        {
            Ok(data) => Value::Object(data),
            Err(NullPropagation) => Value::Null,
        };

        QueryResponse {
            data: Some(data),
            errors: self
                .errors
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    fn execute_selection_set<'b>(
        &'b self,
        resolver: &'b dyn FieldResolver<C>,
        fields: &'b [ValidatedField],
        path: Vec<PathSegment>,
        serial: bool,
    ) -> BoxFuture<'b, Result<Map<String, Value>, NullPropagation>> {
        async move {
            let results = if serial {
                let mut results = Vec::with_capacity(fields.len());
                for field in fields {
                    results.push(
                        self.execute_field(resolver, field, child_path(&path, field))
                            .await,
                    );
                }
                results
            } else {
                join_all(
                    fields
                        .iter()
                        .map(|field| self.execute_field(resolver, field, child_path(&path, field))),
                )
                .await
            };

            fields
                .iter()
                .zip(results)
                .map(|(field, result)| result.map(|value| (field.output_name(), value)))
                .collect()
        }
        .boxed()
    }

    fn execute_field<'b>(
        &'b self,
        resolver: &'b dyn FieldResolver<C>,
        field: &'b ValidatedField,
        path: Vec<PathSegment>,
    ) -> BoxFuture<'b, Completion> {
        async move {
            let resolved = if field.name.as_str() == "__typename" {
                Ok(Resolved::value(resolver.typename()))
            } else if let Some(resolved) = introspection::resolve_root_field(field, self.ctx.schema)
            {
                resolved
            } else {
                resolver.resolve_field(field, &self.ctx).await
            };

            match resolved {
                Ok(resolved) => self.complete_value(&field.ty, field, resolved, path).await,
                Err(error) => {
                    self.record_error(error.user_error_message(), field, path);

                    if field.ty.nullable {
                        Ok(Value::Null)
                    } else {
                        Err(NullPropagation)
                    }
                }
            }
        }
        .boxed()
    }

    fn complete_value<'b>(
        &'b self,
        ty: &'b Type,
        field: &'b ValidatedField,
        resolved: Resolved<C>,
        path: Vec<PathSegment>,
    ) -> BoxFuture<'b, Completion> {
        async move {
            let completed = self
                .complete_base(&ty.base, field, resolved, path.clone())
                .await;

            match completed {
                Ok(Value::Null) if !ty.nullable => {
                    self.record_error(
                        format!(
                            "Cannot return null for non-nullable field {}.{}",
                            field.parent_type, field.name
                        ),
                        field,
                        path,
                    );
                    Err(NullPropagation)
                }
                Err(NullPropagation) if ty.nullable => Ok(Value::Null),
                completed => completed,
            }
        }
        .boxed()
    }

    async fn complete_base(
        &self,
        base: &BaseType,
        field: &ValidatedField,
        resolved: Resolved<C>,
        path: Vec<PathSegment>,
    ) -> Completion {
        let resolved = match resolved {
            Resolved::Value(Value::Null) => Resolved::Null,
            // Lists of leaf values may come back as a single JSON array
            Resolved::Value(Value::Array(items)) if matches!(base, BaseType::List(_)) => {
                Resolved::List(items.into_iter().map(Resolved::Value).collect())
            }
            resolved => resolved,
        };

        match (base, resolved) {
            (_, Resolved::Null) => Ok(Value::Null),
            (BaseType::List(elem_type), Resolved::List(items)) => {
                let completed = join_all(items.into_iter().enumerate().map(|(index, item)| {
                    let mut item_path = path.clone();
                    item_path.push(PathSegment::Index(index));
                    self.complete_value(elem_type, field, item, item_path)
                }))
                .await;

                completed
                    .into_iter()
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            (BaseType::Named(type_name), resolved) => {
                self.complete_named(type_name.as_str(), field, resolved, path)
                    .await
            }
            (BaseType::List(_), _) => Err(self.unexpected_value(field, path)),
        }
    }

    async fn complete_named(
        &self,
        type_name: &str,
        field: &ValidatedField,
        resolved: Resolved<C>,
        path: Vec<PathSegment>,
    ) -> Completion {
        let Some(td) = self.ctx.schema.get_type_definition(type_name) else {
            return Err(self.unexpected_value(field, path));
        };

        match (&td.kind, resolved) {
            (TypeKind::Scalar, Resolved::Value(value)) => {
                let Some(codec) = self.ctx.schema.scalar_codec(type_name) else {
                    return Err(self.unexpected_value(field, path));
                };

                codec.serialize(&value).map_err(|message| {
                    self.record_error(message, field, path);
                    NullPropagation
                })
            }
            (TypeKind::Enum(enum_type), Resolved::Value(value)) => {
                let is_member = value.as_str().is_some_and(|member| {
                    enum_type
                        .values
                        .iter()
                        .any(|enum_value| enum_value.node.value.node == member)
                });

                if is_member {
                    Ok(value)
                } else {
                    self.record_error(
                        format!("Enum '{type_name}' cannot represent value: {value}"),
                        field,
                        path,
                    );
                    Err(NullPropagation)
                }
            }
            (
                TypeKind::Object(_) | TypeKind::Interface(_) | TypeKind::Union(_),
                Resolved::Object(object),
            ) => self
                .execute_selection_set(object.as_ref(), &field.subfields, path, false)
                .await
                .map(Value::Object),
            _ => Err(self.unexpected_value(field, path)),
        }
    }

    /// A resolver returned something that does not fit the declared type (a programming error)
    fn unexpected_value(&self, field: &ValidatedField, path: Vec<PathSegment>) -> NullPropagation {
        error!(
            "Resolver for {}.{} returned a value that does not match its type {}",
            field.parent_type, field.name, field.ty
        );
        self.record_error("Internal server error".to_string(), field, path);
        NullPropagation
    }

    fn record_error(&self, message: String, field: &ValidatedField, path: Vec<PathSegment>) {
        let error = GraphQLError::new(message, vec![field.pos]).with_path(path);

        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }
}

fn child_path(path: &[PathSegment], field: &ValidatedField) -> Vec<PathSegment> {
    let mut child_path = path.to_vec();
    child_path.push(PathSegment::Field(field.output_name()));
    child_path
}
