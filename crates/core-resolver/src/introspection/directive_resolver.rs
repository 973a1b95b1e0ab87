// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::types::DirectiveDefinition;
use async_trait::async_trait;
use serde_json::Value;

use crate::{
    ExecutionContext, FieldError, FieldResolver, Resolved, schema::deprecation_reason,
    validation::field::ValidatedField,
};

use super::{description, include_deprecated, input_value_resolver::InputValueNode};

#[derive(Debug)]
pub(super) struct DirectiveNode(pub(super) DirectiveDefinition);

#[async_trait]
impl<C> FieldResolver<C> for DirectiveNode
where
    C: Send + Sync,
{
    fn typename(&self) -> &str {
        "__Directive"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        _ctx: &'e ExecutionContext<'e, C>,
    ) -> Result<Resolved<C>, FieldError> {
        let definition = &self.0;

        match field.name.as_str() {
            "name" => Ok(Resolved::value(definition.name.node.as_str())),
            "description" => Ok(description(&definition.description)),
            "locations" => Ok(Resolved::Value(Value::Array(
                definition
                    .locations
                    .iter()
                    .map(|location| Value::String(location_name(&format!("{:?}", location.node))))
                    .collect(),
            ))),
            "args" => {
                let include_deprecated = include_deprecated(field)?;

                Ok(Resolved::objects(
                    definition
                        .arguments
                        .iter()
                        .filter(|arg| {
                            include_deprecated || deprecation_reason(&arg.node.directives).is_none()
                        })
                        .map(|arg| InputValueNode(arg.node.clone())),
                ))
            }
            "isRepeatable" => Ok(Resolved::value(definition.is_repeatable)),
            _ => Err(FieldError::invalid_field(field, "__Directive")),
        }
    }
}

/// `FragmentSpread` -> `FRAGMENT_SPREAD`
fn location_name(variant: &str) -> String {
    let mut name = String::with_capacity(variant.len() + 4);

    for (index, c) in variant.chars().enumerate() {
        if c.is_ascii_uppercase() && index > 0 {
            name.push('_');
        }
        name.push(c.to_ascii_uppercase());
    }

    name
}
