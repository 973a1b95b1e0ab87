// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::types::{BaseType, Type, TypeKind};
use async_graphql_value::Name;
use async_trait::async_trait;

use crate::{
    ExecutionContext, FieldError, FieldResolver, Resolved,
    schema::{TypeDefinitionIntrospection, deprecation_reason},
    validation::field::ValidatedField,
};

use super::{
    enum_value_resolver::EnumValueNode, field_definition_resolver::FieldNode, include_deprecated,
    input_value_resolver::InputValueNode, optional_string,
};

/// A `__Type`: either a named type from the schema or a list/non-null wrapper around another type
#[derive(Debug)]
pub(super) enum TypeNode {
    Named(Name),
    Wrapped { kind: &'static str, of_type: Type },
}

impl TypeNode {
    pub(super) fn of(ty: &Type) -> Self {
        if !ty.nullable {
            TypeNode::Wrapped {
                kind: "NON_NULL",
                of_type: Type {
                    base: ty.base.clone(),
                    nullable: true,
                },
            }
        } else {
            match &ty.base {
                BaseType::Named(name) => TypeNode::Named(name.clone()),
                BaseType::List(elem_type) => TypeNode::Wrapped {
                    kind: "LIST",
                    of_type: elem_type.as_ref().clone(),
                },
            }
        }
    }
}

#[async_trait]
impl<C> FieldResolver<C> for TypeNode
where
    C: Send + Sync,
{
    fn typename(&self) -> &str {
        "__Type"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        ctx: &'e ExecutionContext<'e, C>,
    ) -> Result<Resolved<C>, FieldError> {
        match self {
            TypeNode::Named(type_name) => resolve_named(type_name, field, ctx),
            TypeNode::Wrapped { kind, of_type } => match field.name.as_str() {
                "kind" => Ok(Resolved::value(*kind)),
                "ofType" => Ok(Resolved::object(TypeNode::of(of_type))),
                "name" | "description" | "specifiedByURL" | "fields" | "interfaces"
                | "possibleTypes" | "enumValues" | "inputFields" => Ok(Resolved::Null),
                _ => Err(FieldError::invalid_field(field, "__Type")),
            },
        }
    }
}

fn resolve_named<C>(
    type_name: &Name,
    field: &ValidatedField,
    ctx: &ExecutionContext<'_, C>,
) -> Result<Resolved<C>, FieldError>
where
    C: Send + Sync,
{
    let schema = ctx.schema;
    let td = schema
        .get_type_definition(type_name.as_str())
        .ok_or_else(|| FieldError::UserDisplayError(format!("Unknown type '{type_name}'")))?;

    match field.name.as_str() {
        "kind" => Ok(Resolved::value(td.kind())),
        "name" => Ok(Resolved::value(td.name())),
        "description" => Ok(optional_string(td.description())),
        "specifiedByURL" => Ok(optional_string(td.specified_by_url())),
        "fields" => {
            let include_deprecated = include_deprecated(field)?;

            Ok(match td.fields() {
                Some(fields) => Resolved::objects(
                    fields
                        .iter()
                        .filter(|f| {
                            include_deprecated || deprecation_reason(&f.node.directives).is_none()
                        })
                        .map(|f| FieldNode(f.node.clone())),
                ),
                None => Resolved::Null,
            })
        }
        "interfaces" => Ok(match td.interfaces() {
            Some(interfaces) => Resolved::objects(
                interfaces
                    .iter()
                    .map(|interface| TypeNode::Named(interface.node.clone())),
            ),
            None => Resolved::Null,
        }),
        "possibleTypes" => Ok(match &td.kind {
            TypeKind::Union(_) => Resolved::objects(
                td.possible_types()
                    .into_iter()
                    .flatten()
                    .map(|member| TypeNode::Named(member.node.clone())),
            ),
            TypeKind::Interface(_) => Resolved::objects(
                schema
                    .type_definitions
                    .iter()
                    .filter(|candidate| {
                        candidate.interfaces().is_some_and(|interfaces| {
                            interfaces.iter().any(|i| i.node == td.name.node)
                        })
                    })
                    .map(|candidate| TypeNode::Named(candidate.name.node.clone())),
            ),
            _ => Resolved::Null,
        }),
        "enumValues" => {
            let include_deprecated = include_deprecated(field)?;

            Ok(match td.enum_values() {
                Some(values) => Resolved::objects(
                    values
                        .iter()
                        .filter(|v| {
                            include_deprecated || deprecation_reason(&v.node.directives).is_none()
                        })
                        .map(|v| EnumValueNode(v.node.clone())),
                ),
                None => Resolved::Null,
            })
        }
        "inputFields" => {
            let include_deprecated = include_deprecated(field)?;

            Ok(match td.input_fields() {
                Some(input_fields) => Resolved::objects(
                    input_fields
                        .iter()
                        .filter(|f| {
                            include_deprecated || deprecation_reason(&f.node.directives).is_none()
                        })
                        .map(|f| InputValueNode(f.node.clone())),
                ),
                None => Resolved::Null,
            })
        }
        "ofType" => Ok(Resolved::Null),
        _ => Err(FieldError::invalid_field(field, "__Type")),
    }
}
