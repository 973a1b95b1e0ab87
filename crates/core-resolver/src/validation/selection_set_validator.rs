// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use async_graphql_parser::{
    Pos, Positioned,
    types::{Directive, Field, FragmentDefinition, Selection, SelectionSet, TypeDefinition, TypeKind},
};
use async_graphql_value::{
    Name,
    indexmap::{IndexMap, map::Entry},
};
use serde_json::Value as JsonValue;

use crate::{
    schema::{QUERY_ROOT_TYPENAME, Schema, TypeDefinitionIntrospection, named_type},
    validation::{underlying_type, validation_error::ValidationError},
};

use super::{
    arguments_validator::{ArgumentValidator, Variables},
    field::ValidatedField,
};

pub(super) type SelectionDepthCheck<'c> =
    dyn Fn(usize, Option<bool>, Pos) -> Result<bool, ValidationError> + 'c;

/// Context for validating a selection set.
#[derive(Debug)]
pub struct SelectionSetValidator<'a> {
    schema: &'a Schema,
    /// The type containing the field
    container_type: &'a TypeDefinition,
    variables: &'a Variables,
    fragment_definitions: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    introspection_enabled: bool,
}

impl<'a> SelectionSetValidator<'a> {
    #[must_use]
    pub fn new(
        schema: &'a Schema,
        container_type: &'a TypeDefinition,
        variables: &'a Variables,
        fragment_definitions: &'a HashMap<Name, Positioned<FragmentDefinition>>,
        introspection_enabled: bool,
    ) -> Self {
        Self {
            schema,
            container_type,
            variables,
            fragment_definitions,
            introspection_enabled,
        }
    }

    /// Validate selection set.
    ///
    /// Validations performed:
    /// - Each field is defined by the container type (see [`validate_field`])
    /// - Fragment spreads refer to existing fragments, applicable to the container type, and do
    ///   not form cycles
    /// - `@skip`/`@include` are evaluated (other directives are rejected)
    /// - Fields with the same response key are merged, which requires them to select the same
    ///   field with the same arguments
    ///
    /// `fragment_trail` holds the fragments being expanded (outermost first).
    pub(super) fn validate(
        &self,
        selection_set: &Positioned<SelectionSet>,
        depth: usize,
        is_introspection: Option<bool>,
        selection_depth_check: &SelectionDepthCheck,
        fragment_trail: &mut Vec<Name>,
    ) -> Result<Vec<ValidatedField>, ValidationError> {
        let mut fields = vec![];

        self.collect_fields(
            selection_set,
            depth,
            is_introspection,
            selection_depth_check,
            fragment_trail,
            &mut fields,
        )?;

        merge_fields(fields)
    }

    fn collect_fields(
        &self,
        selection_set: &Positioned<SelectionSet>,
        depth: usize,
        is_introspection: Option<bool>,
        selection_depth_check: &SelectionDepthCheck,
        fragment_trail: &mut Vec<Name>,
        fields: &mut Vec<ValidatedField>,
    ) -> Result<(), ValidationError> {
        for selection in &selection_set.node.items {
            match &selection.node {
                Selection::Field(field) => {
                    if self.is_skipped(&field.node.directives)? {
                        continue;
                    }

                    fields.push(self.validate_field(
                        field,
                        depth,
                        is_introspection,
                        selection_depth_check,
                        fragment_trail,
                    )?);
                }
                Selection::FragmentSpread(fragment_spread) => {
                    if self.is_skipped(&fragment_spread.node.directives)? {
                        continue;
                    }

                    let fragment_name = &fragment_spread.node.fragment_name.node;
                    let fragment_definition = self
                        .fragment_definitions
                        .get(fragment_name)
                        .ok_or_else(|| {
                            ValidationError::FragmentDefinitionNotFound(
                                fragment_name.to_string(),
                                fragment_spread.pos,
                            )
                        })?;

                    if fragment_trail.contains(fragment_name) {
                        return Err(ValidationError::FragmentCycle(
                            fragment_name.to_string(),
                            fragment_spread.pos,
                        ));
                    }

                    self.check_type_condition(
                        fragment_name.as_str(),
                        &fragment_definition.node.type_condition.node.on.node,
                        fragment_spread.pos,
                    )?;

                    fragment_trail.push(fragment_name.clone());
                    self.collect_fields(
                        &fragment_definition.node.selection_set,
                        depth,
                        is_introspection,
                        selection_depth_check,
                        fragment_trail,
                        fields,
                    )?;
                    fragment_trail.pop();
                }
                Selection::InlineFragment(inline_fragment) => {
                    if self.is_skipped(&inline_fragment.node.directives)? {
                        continue;
                    }

                    if let Some(type_condition) = &inline_fragment.node.type_condition {
                        self.check_type_condition(
                            "inline fragment",
                            &type_condition.node.on.node,
                            inline_fragment.pos,
                        )?;
                    }

                    self.collect_fields(
                        &inline_fragment.node.selection_set,
                        depth,
                        is_introspection,
                        selection_depth_check,
                        fragment_trail,
                        fields,
                    )?;
                }
            }
        }

        Ok(())
    }

    /// Validate a field.
    ///
    /// Validations performed:
    /// - The field is defined by the container type (`__typename` is always available, and
    ///   `__schema`/`__type` on the query root when introspection is enabled)
    /// - The field is within the depth limit
    /// - The arguments are valid (see [ArgumentValidator])
    /// - Leaf fields have no selection, and other fields have a valid one
    fn validate_field(
        &self,
        field: &Positioned<Field>,
        depth: usize,
        is_introspection: Option<bool>,
        selection_depth_check: &SelectionDepthCheck,
        fragment_trail: &mut Vec<Name>,
    ) -> Result<ValidatedField, ValidationError> {
        let field_name = &field.node.name.node;
        let container_name = &self.container_type.name.node;
        let alias = field.node.alias.as_ref().map(|alias| alias.node.clone());
        let has_selection = !field.node.selection_set.node.items.is_empty();

        if field_name == "__typename" {
            selection_depth_check(depth, is_introspection, field.pos)?;

            if has_selection {
                return Err(ValidationError::ScalarWithField(
                    field_name.to_string(),
                    field.pos,
                ));
            }
            if !field.node.arguments.is_empty() {
                return Err(ValidationError::StrayArguments(
                    field
                        .node
                        .arguments
                        .iter()
                        .map(|(name, _)| name.node.to_string())
                        .collect(),
                    field_name.to_string(),
                    field.pos,
                ));
            }

            return Ok(ValidatedField {
                alias,
                name: field_name.clone(),
                ty: named_type("String", false),
                parent_type: container_name.clone(),
                arguments: IndexMap::new(),
                subfields: vec![],
                pos: field.pos,
            });
        }

        let field_definition = if container_name == QUERY_ROOT_TYPENAME
            && (field_name == "__schema" || field_name == "__type")
        {
            if !self.introspection_enabled {
                return Err(ValidationError::IntrospectionDisabled(field.pos));
            }

            if field_name == "__schema" {
                &self.schema.schema_field_definition
            } else {
                &self.schema.type_field_definition
            }
        } else {
            self.container_type.field(field_name.as_str()).ok_or_else(|| {
                ValidationError::InvalidField(
                    field_name.to_string(),
                    container_name.to_string(),
                    field.pos,
                )
            })?
        };

        selection_depth_check(depth, is_introspection, field.pos)?;

        let arguments = ArgumentValidator::new(self.schema, self.variables).validate(
            &field_definition.arguments,
            &field.node.arguments,
            field_name.as_str(),
            field.pos,
        )?;

        let field_type_name = underlying_type(&field_definition.ty.node);
        let field_type = self
            .schema
            .get_type_definition(field_type_name.as_str())
            .ok_or_else(|| ValidationError::InvalidFieldType(field_type_name.to_string(), field.pos))?;

        let subfields = if field_type.is_leaf_type() {
            if has_selection {
                return Err(ValidationError::ScalarWithField(
                    field_name.to_string(),
                    field.pos,
                ));
            }
            vec![]
        } else {
            if !has_selection {
                return Err(ValidationError::MissingSubselection(
                    field_name.to_string(),
                    field_definition.ty.node.to_string(),
                    field.pos,
                ));
            }

            let subfield_validator = SelectionSetValidator::new(
                self.schema,
                field_type,
                self.variables,
                self.fragment_definitions,
                self.introspection_enabled,
            );

            subfield_validator.validate(
                &field.node.selection_set,
                depth + 1,
                is_introspection.or_else(|| Some(field_name.as_str().starts_with("__"))),
                selection_depth_check,
                fragment_trail,
            )?
        };

        Ok(ValidatedField {
            alias,
            name: field_name.clone(),
            ty: field_definition.ty.node.clone(),
            parent_type: container_name.clone(),
            arguments,
            subfields,
            pos: field.pos,
        })
    }

    /// Evaluate `@skip` and `@include`
    fn is_skipped(&self, directives: &[Positioned<Directive>]) -> Result<bool, ValidationError> {
        for directive in directives {
            let directive_name = directive.node.name.node.as_str();

            let definition = match directive_name {
                "skip" | "include" => self.schema.get_directive_definition(directive_name),
                _ => None,
            }
            .ok_or_else(|| {
                ValidationError::InvalidDirective(directive_name.to_string(), directive.pos)
            })?;

            let arguments = ArgumentValidator::new(self.schema, self.variables).validate(
                &definition.arguments,
                &directive.node.arguments,
                directive_name,
                directive.pos,
            )?;
            let condition = matches!(arguments.get("if"), Some(JsonValue::Bool(true)));

            let skipped = match directive_name {
                "skip" => condition,
                _ => !condition,
            };
            if skipped {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// A fragment applies if its type is the container type, or an abstract type the container
    /// type belongs to.
    fn check_type_condition(
        &self,
        fragment_name: &str,
        type_condition: &Name,
        pos: Pos,
    ) -> Result<(), ValidationError> {
        let container_name = &self.container_type.name.node;

        let applicable = self
            .schema
            .get_type_definition(type_condition.as_str())
            .map(|td| {
                td.name.node == *container_name
                    || match &td.kind {
                        TypeKind::Union(union_type) => union_type
                            .members
                            .iter()
                            .any(|member| member.node == *container_name),
                        TypeKind::Interface(_) => self
                            .container_type
                            .interfaces()
                            .is_some_and(|interfaces| {
                                interfaces.iter().any(|i| i.node == *type_condition)
                            }),
                        _ => false,
                    }
            })
            .unwrap_or(false);

        if applicable {
            Ok(())
        } else {
            Err(ValidationError::InvalidFragmentType(
                fragment_name.to_string(),
                container_name.to_string(),
                type_condition.to_string(),
                pos,
            ))
        }
    }
}

/// Merge fields that share a response key (recursively merging their subfields). Merging
/// requires the same field name and arguments.
fn merge_fields(fields: Vec<ValidatedField>) -> Result<Vec<ValidatedField>, ValidationError> {
    let mut merged: IndexMap<String, ValidatedField> = IndexMap::new();

    for field in fields {
        match merged.entry(field.output_name()) {
            Entry::Vacant(entry) => {
                entry.insert(field);
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();

                if existing.name != field.name || existing.arguments != field.arguments {
                    return Err(ValidationError::MergeFailure(
                        field.output_name(),
                        existing.pos,
                        field.pos,
                    ));
                }

                if !field.subfields.is_empty() {
                    let mut subfields = std::mem::take(&mut existing.subfields);
                    subfields.extend(field.subfields);
                    existing.subfields = merge_fields(subfields)?;
                }
            }
        }
    }

    Ok(merged.into_values().collect())
}
