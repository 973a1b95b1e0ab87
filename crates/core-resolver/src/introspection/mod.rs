// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolvers for the `__schema` and `__type` root fields and the introspection types they expose.
//!
//! Introspection nodes own what they describe (cloned out of the schema), so they can be returned
//! as regular [`Resolved`] objects and completed by the executor like any other field.

use async_graphql_parser::Positioned;
use async_graphql_value::Name;

use crate::{
    FieldError, Resolved,
    schema::{QUERY_ROOT_TYPENAME, Schema},
    validation::field::ValidatedField,
};

mod directive_resolver;
mod enum_value_resolver;
mod field_definition_resolver;
mod input_value_resolver;
mod schema_resolver;
mod type_resolver;

use schema_resolver::SchemaNode;
use type_resolver::TypeNode;

/// Resolve `__schema` and `__type` on the query root. Returns `None` for any other field.
pub(crate) fn resolve_root_field<C>(
    field: &ValidatedField,
    schema: &Schema,
) -> Option<Result<Resolved<C>, FieldError>>
where
    C: Send + Sync,
{
    if field.parent_type.as_str() != QUERY_ROOT_TYPENAME {
        return None;
    }

    match field.name.as_str() {
        "__schema" => Some(Ok(Resolved::object(SchemaNode))),
        "__type" => Some(field.argument::<String>("name").map(|type_name| {
            match schema.get_type_definition(&type_name) {
                Some(_) => Resolved::object(TypeNode::Named(Name::new(type_name))),
                None => Resolved::Null,
            }
        })),
        _ => None,
    }
}

fn optional_string<C>(value: Option<String>) -> Resolved<C> {
    match value {
        Some(value) => Resolved::Value(value.into()),
        None => Resolved::Null,
    }
}

fn description<C>(description: &Option<Positioned<String>>) -> Resolved<C> {
    optional_string(description.as_ref().map(|d| d.node.clone()))
}

fn include_deprecated(field: &ValidatedField) -> Result<bool, FieldError> {
    Ok(field
        .argument::<Option<bool>>("includeDeprecated")?
        .unwrap_or(false))
}
