// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::types::InputValueDefinition;
use async_trait::async_trait;

use crate::{
    ExecutionContext, FieldError, FieldResolver, Resolved, schema::deprecation_reason,
    validation::field::ValidatedField,
};

use super::{description, optional_string, type_resolver::TypeNode};

#[derive(Debug)]
pub(super) struct InputValueNode(pub(super) InputValueDefinition);

#[async_trait]
impl<C> FieldResolver<C> for InputValueNode
where
    C: Send + Sync,
{
    fn typename(&self) -> &str {
        "__InputValue"
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
            "type" => Ok(Resolved::object(TypeNode::of(&definition.ty.node))),
            // Rendered in GraphQL syntax, for example `"No longer supported"` or `[1, 2]`
            "defaultValue" => Ok(optional_string(
                definition
                    .default_value
                    .as_ref()
                    .map(|value| value.node.to_string()),
            )),
            "isDeprecated" => Ok(Resolved::value(
                deprecation_reason(&definition.directives).is_some(),
            )),
            "deprecationReason" => Ok(optional_string(deprecation_reason(&definition.directives))),
            _ => Err(FieldError::invalid_field(field, "__InputValue")),
        }
    }
}
