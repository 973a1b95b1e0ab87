// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use async_graphql_value::Name;

use crate::{
    ExecutionContext, FieldError, FieldResolver, Resolved,
    schema::{MUTATION_ROOT_TYPENAME, QUERY_ROOT_TYPENAME},
    validation::field::ValidatedField,
};

use super::{directive_resolver::DirectiveNode, type_resolver::TypeNode};

#[derive(Debug)]
pub(super) struct SchemaNode;

#[async_trait]
impl<C> FieldResolver<C> for SchemaNode
where
    C: Send + Sync,
{
    fn typename(&self) -> &str {
        "__Schema"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        ctx: &'e ExecutionContext<'e, C>,
    ) -> Result<Resolved<C>, FieldError> {
        let schema = ctx.schema;

        match field.name.as_str() {
            "description" => Ok(Resolved::Null),
            "types" => Ok(Resolved::objects(
                schema
                    .type_definitions
                    .iter()
                    .map(|td| TypeNode::Named(td.name.node.clone())),
            )),
            "queryType" => Ok(Resolved::object(TypeNode::Named(Name::new(
                QUERY_ROOT_TYPENAME,
            )))),
            "mutationType" => Ok(if schema.has_mutation_root() {
                Resolved::object(TypeNode::Named(Name::new(MUTATION_ROOT_TYPENAME)))
            } else {
                Resolved::Null
            }),
            "subscriptionType" => Ok(Resolved::Null),
            "directives" => Ok(Resolved::objects(
                schema
                    .directive_definitions
                    .iter()
                    .map(|directive| DirectiveNode(directive.clone())),
            )),
            _ => Err(FieldError::invalid_field(field, "__Schema")),
        }
    }
}
