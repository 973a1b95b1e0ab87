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
    types::{FragmentDefinition, OperationDefinition, OperationType, VariableDefinition},
};
use async_graphql_value::{ConstValue, Name};
use serde_json::{Map, Value};

use crate::{
    schema::{MUTATION_ROOT_TYPENAME, QUERY_ROOT_TYPENAME, Schema, TypeDefinitionIntrospection},
    validation::{underlying_type, validation_error::ValidationError},
};

use super::{
    arguments_validator::{ArgumentValidator, ResolvedVariable, Variables},
    operation::ValidatedOperation,
    selection_set_validator::SelectionSetValidator,
};

/// Context for validating an operation.
pub struct OperationValidator<'a> {
    schema: &'a Schema,
    operation_name: Option<String>,
    variables: Option<Map<String, Value>>,
    fragment_definitions: HashMap<Name, Positioned<FragmentDefinition>>,
    normal_query_depth_limit: usize,
    introspection_query_depth_limit: usize,
    introspection_enabled: bool,
}

impl<'a> OperationValidator<'a> {
    #[must_use]
    pub fn new(
        schema: &'a Schema,
        operation_name: Option<String>,
        variables: Option<Map<String, Value>>,
        fragment_definitions: HashMap<Name, Positioned<FragmentDefinition>>,
        normal_query_depth_limit: usize,
        introspection_query_depth_limit: usize,
        introspection_enabled: bool,
    ) -> Self {
        Self {
            schema,
            operation_name,
            variables,
            fragment_definitions,
            normal_query_depth_limit,
            introspection_query_depth_limit,
            introspection_enabled,
        }
    }

    /// Check if the query depth is within the allowed limits
    /// Note that is_introspection is optional, since until we go one level deeper that the
    /// top-level selection set, we don't know if it's an introspection query or not.
    fn selection_depth_check(
        &self,
    ) -> impl Fn(usize, Option<bool>, Pos) -> Result<bool, ValidationError> + '_ {
        move |depth: usize,
              is_introspection: Option<bool>,
              pos: Pos|
              -> Result<bool, ValidationError> {
            if let Some(is_introspection) = is_introspection {
                let max_depth = if is_introspection {
                    self.introspection_query_depth_limit
                } else {
                    self.normal_query_depth_limit
                };
                if depth > max_depth {
                    Err(ValidationError::SelectionSetTooDeep(pos))
                } else {
                    Ok(true)
                }
            } else {
                Ok(true)
            }
        }
    }

    /// Validate operation. Operation defines a GraphQL top-level operation such
    /// as
    /// ```graphql
    ///    mutation create($name: String!) {
    ///       createUser(dto: { name: $name, balance: 0 }) {
    ///          id
    ///       }
    ///    }
    /// ```
    ///
    /// Validations performed:
    /// - The operation type is supported by the schema
    /// - Each variables in [OperationDefinition.variable_definitions] is
    ///   available (see [`validate_variables`] for details)
    /// - The selected fields are valid (see [SelectionSetValidator] for details)
    ///
    /// # Returns
    ///   A validated operation with all variables and fields resolved and normalized.
    pub(super) fn validate(
        self,
        operation: Positioned<OperationDefinition>,
    ) -> Result<ValidatedOperation, ValidationError> {
        let operation_type_name = match operation.node.ty {
            OperationType::Query => QUERY_ROOT_TYPENAME,
            OperationType::Mutation => MUTATION_ROOT_TYPENAME,
            OperationType::Subscription => {
                return Err(ValidationError::UnsupportedOperationType(
                    "subscription".to_string(),
                    operation.pos,
                ));
            }
        };

        let container_type = match self.schema.get_type_definition(operation_type_name) {
            Some(td) => td,
            None => {
                return Err(ValidationError::OperationNotFound(
                    operation_type_name.to_string(),
                    operation.pos,
                ));
            }
        };

        if let Some(directive) = operation.node.directives.first() {
            return Err(ValidationError::InvalidDirective(
                directive.node.name.node.to_string(),
                directive.pos,
            ));
        }

        let variables = self.validate_variables(operation.node.variable_definitions)?;
        let selection_set_validator = SelectionSetValidator::new(
            self.schema,
            container_type,
            &variables,
            &self.fragment_definitions,
            self.introspection_enabled,
        );

        let fields = selection_set_validator.validate(
            &operation.node.selection_set,
            0,
            None,
            &self.selection_depth_check(),
            &mut vec![],
        )?;

        Ok(ValidatedOperation {
            name: self.operation_name,
            typ: operation.node.ty,
            fields,
        })
    }

    /// Validate variables.
    ///
    /// Validations performed:
    /// - Each variable is declared with an input type
    /// - Each non-null variable is supplied (or has a default value) and is not null
    /// - Each supplied value and each default value can be coerced to the declared type
    ///
    /// Where a variable may be used is checked later, against each argument it fills.
    ///
    /// # Returns
    ///   Resolved variables. A variable that is neither supplied nor defaulted has no value, so
    ///   arguments using it are treated as absent.
    fn validate_variables(
        &'a self,
        variable_definitions: Vec<Positioned<VariableDefinition>>,
    ) -> Result<Variables, ValidationError> {
        let no_variables = Variables::new();
        let argument_validator = ArgumentValidator::new(self.schema, &no_variables);

        variable_definitions
            .into_iter()
            .map(|variable_definition| {
                let VariableDefinition {
                    name,
                    var_type,
                    default_value,
                    ..
                } = variable_definition.node;

                let type_name = underlying_type(&var_type.node);
                match self.schema.get_type_definition(type_name.as_str()) {
                    Some(td) if td.is_input_type() => {}
                    _ => {
                        return Err(ValidationError::InvalidVariableType(
                            name.node.to_string(),
                            var_type.node.to_string(),
                            var_type.pos,
                        ));
                    }
                }

                let non_null_default = default_value
                    .as_ref()
                    .filter(|default_value| default_value.node != ConstValue::Null);
                let has_default = non_null_default.is_some();

                if let Some(default_value) = non_null_default {
                    argument_validator.validate_variable_value(
                        &name.node,
                        &default_value.node,
                        &var_type.node,
                        false,
                        default_value.pos,
                    )?;
                }

                let value = match self.var_value(&name)? {
                    Some(value) => {
                        if value != ConstValue::Null {
                            argument_validator.validate_variable_value(
                                &name.node,
                                &value,
                                &var_type.node,
                                true,
                                name.pos,
                            )?;
                        }
                        Some(value)
                    }
                    None => default_value.map(|default_value| default_value.node),
                };

                match value {
                    Some(ConstValue::Null) if !var_type.node.nullable => Err(
                        ValidationError::NullVariable(name.node.to_string(), name.pos),
                    ),
                    None if !var_type.node.nullable => Err(ValidationError::VariableNotFound(
                        name.node.to_string(),
                        name.pos,
                    )),
                    value => Ok((
                        name.node,
                        ResolvedVariable {
                            ty: var_type.node,
                            has_default,
                            value,
                        },
                    )),
                }
            })
            .collect()
    }

    fn var_value(&self, name: &Positioned<Name>) -> Result<Option<ConstValue>, ValidationError> {
        let resolved = self
            .variables
            .as_ref()
            .and_then(|variables| variables.get(name.node.as_str()));

        resolved
            .map(|resolved| {
                ConstValue::from_json(resolved.to_owned()).map_err(|e| {
                    ValidationError::MalformedVariable(name.node.as_str().to_string(), name.pos, e)
                })
            })
            .transpose()
    }
}
