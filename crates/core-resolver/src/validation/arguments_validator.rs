// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{borrow::Cow, collections::HashMap};

use async_graphql_parser::{
    Pos, Positioned,
    types::{BaseType, InputObjectType, InputValueDefinition, Type, TypeKind},
};
use async_graphql_value::{ConstValue, Name, Value, indexmap::IndexMap};
use serde_json::Value as JsonValue;

use crate::{schema::Schema, scalar::value_kind, validation::validation_error::ValidationError};

/// A declared operation variable.
#[derive(Debug)]
pub struct ResolvedVariable {
    pub ty: Type,
    /// Whether the declaration carries a non-null default value
    pub has_default: bool,
    /// The supplied (or default) value, already coerced to `ty`. `None` if the variable is
    /// neither supplied nor defaulted.
    pub value: Option<ConstValue>,
}

pub type Variables = HashMap<Name, ResolvedVariable>;

/// Coerces argument values (literals or variables) against their declared input types.
pub struct ArgumentValidator<'a> {
    schema: &'a Schema,
    variables: &'a Variables,
}

impl<'a> ArgumentValidator<'a> {
    #[must_use]
    pub fn new(schema: &'a Schema, variables: &'a Variables) -> Self {
        Self { schema, variables }
    }

    /// Check that the value of a variable can be coerced to the variable's declared type.
    pub(super) fn validate_variable_value(
        &self,
        variable_name: &Name,
        value: &ConstValue,
        ty: &Type,
        from_variable: bool,
        pos: Pos,
    ) -> Result<(), ValidationError> {
        self.coerce(
            &value.clone().into_value(),
            ty,
            variable_name.as_str(),
            pos,
            from_variable,
        )
        .map(|_| ())
        .map_err(|error| {
            let message = match error {
                ValidationError::InvalidArgumentValue { message, .. } => message,
                ValidationError::InvalidArgumentType { actual_type, .. } => {
                    format!("got '{actual_type}'")
                }
                error => error.to_string(),
            };

            ValidationError::InvalidVariableValue {
                variable_name: variable_name.to_string(),
                expected_type: ty.to_string(),
                message,
                pos,
            }
        })
    }

    /// Validations performed:
    /// - Ensure that all required arguments are provided
    /// - Ensure that there are no stray arguments (arguments that are not defined in the field)
    /// - Ensure that every value can be coerced to its declared type (recursively for lists and
    ///   input objects)
    ///
    /// Absent optional arguments take their default value, if declared, and are otherwise left out.
    pub(super) fn validate(
        &self,
        argument_definitions: &[Positioned<InputValueDefinition>],
        arguments: &[(Positioned<Name>, Positioned<Value>)],
        owner: &str,
        pos: Pos,
    ) -> Result<IndexMap<String, JsonValue>, ValidationError> {
        let mut supplied = IndexMap::new();
        for (name, value) in arguments {
            if supplied
                .insert(&name.node, (&value.node, value.pos))
                .is_some()
            {
                return Err(ValidationError::DuplicateArgument(
                    name.node.to_string(),
                    name.pos,
                ));
            }
        }

        self.validate_inputs(
            argument_definitions.iter().map(|d| &d.node),
            supplied,
            owner,
            pos,
            false,
        )
    }

    fn validate_inputs<'d>(
        &self,
        definitions: impl Iterator<Item = &'d InputValueDefinition>,
        supplied: IndexMap<&Name, (&Value, Pos)>,
        owner: &str,
        pos: Pos,
        from_variable: bool,
    ) -> Result<IndexMap<String, JsonValue>, ValidationError> {
        // Stray arguments tracking: 1. Maintain a map of all the supplied values
        let mut supplied: IndexMap<_, _> = supplied
            .into_iter()
            // Clients such as Apollo send back objects that carry `__typename` from an earlier
            // query, so we do not treat it as a stray value
            .filter(|(name, _)| name.as_str() != "__typename")
            .collect();

        let mut validated = IndexMap::new();

        for definition in definitions {
            // Stray arguments tracking: 2. Remove the value being processed
            let value = supplied.shift_remove(&definition.name.node);
            let value_pos = value.map(|(_, pos)| pos).unwrap_or(pos);

            if let Some(coerced) = self.validate_input_value(
                definition,
                value.map(|(value, _)| value),
                value_pos,
                from_variable,
            )? {
                validated.insert(definition.name.node.to_string(), coerced);
            }
        }

        // Stray arguments tracking: 3. Anything left is not defined by the owner
        if !supplied.is_empty() {
            let stray_arguments = supplied.keys().map(|name| name.to_string()).collect();

            Err(ValidationError::StrayArguments(
                stray_arguments,
                owner.to_string(),
                pos,
            ))
        } else {
            Ok(validated)
        }
    }

    /// Validate a single argument or input field.
    ///
    /// A variable that the request did not supply counts as an absent value.
    fn validate_input_value(
        &self,
        definition: &InputValueDefinition,
        value: Option<&Value>,
        pos: Pos,
        from_variable: bool,
    ) -> Result<Option<JsonValue>, ValidationError> {
        let name = definition.name.node.as_str();
        let ty = &definition.ty.node;

        let supplied = match value {
            Some(Value::Variable(variable_name)) => {
                let variable = self.variable(variable_name, pos)?;
                check_variable_position(
                    variable_name,
                    variable,
                    ty,
                    definition.default_value.is_some(),
                    pos,
                )?;

                variable
                    .value
                    .clone()
                    .map(|value| (Cow::Owned(value.into_value()), true))
            }
            Some(value) => Some((Cow::Borrowed(value), from_variable)),
            None => None,
        };

        match supplied {
            Some((value, from_variable)) => self
                .coerce(&value, ty, name, pos, from_variable)
                .map(Some),
            None => match &definition.default_value {
                Some(default_value) => self
                    .coerce(&default_value.node.clone().into_value(), ty, name, pos, false)
                    .map(Some),
                None if ty.nullable => Ok(None),
                None => Err(ValidationError::RequiredArgumentNotFound(
                    name.to_string(),
                    pos,
                )),
            },
        }
    }

    fn variable(&self, name: &Name, pos: Pos) -> Result<&'a ResolvedVariable, ValidationError> {
        self.variables
            .get(name)
            .ok_or_else(|| ValidationError::VariableNotFound(name.to_string(), pos))
    }

    fn coerce(
        &self,
        value: &Value,
        ty: &Type,
        argument_name: &str,
        pos: Pos,
        from_variable: bool,
    ) -> Result<JsonValue, ValidationError> {
        match value {
            // A variable nested in a list literal (an absent one is a null element)
            Value::Variable(name) => {
                let variable = self.variable(name, pos)?;
                check_variable_position(name, variable, ty, false, pos)?;

                let resolved = variable
                    .value
                    .clone()
                    .map(ConstValue::into_value)
                    .unwrap_or(Value::Null);
                self.coerce(&resolved, ty, argument_name, pos, true)
            }
            Value::Null => {
                if ty.nullable {
                    Ok(JsonValue::Null)
                } else {
                    Err(ValidationError::NullArgument(argument_name.to_string(), pos))
                }
            }
            _ => match &ty.base {
                BaseType::List(elem_type) => match value {
                    Value::List(elems) => elems
                        .iter()
                        .map(|elem| self.coerce(elem, elem_type, argument_name, pos, from_variable))
                        .collect::<Result<Vec<_>, _>>()
                        .map(JsonValue::Array),
                    // A single value is coerced to a one-element list
                    _ => Ok(JsonValue::Array(vec![self.coerce(
                        value,
                        elem_type,
                        argument_name,
                        pos,
                        from_variable,
                    )?])),
                },
                BaseType::Named(type_name) => {
                    self.coerce_named(value, type_name, argument_name, pos, from_variable)
                }
            },
        }
    }

    fn coerce_named(
        &self,
        value: &Value,
        type_name: &Name,
        argument_name: &str,
        pos: Pos,
        from_variable: bool,
    ) -> Result<JsonValue, ValidationError> {
        let invalid_type = || ValidationError::InvalidArgumentType {
            argument_name: argument_name.to_string(),
            expected_type: type_name.to_string(),
            actual_type: kind_of(value).to_string(),
            pos,
        };

        let td = self
            .schema
            .get_type_definition(type_name.as_str())
            .ok_or_else(|| ValidationError::InvalidFieldType(type_name.to_string(), pos))?;

        match &td.kind {
            TypeKind::Scalar => {
                let codec = self
                    .schema
                    .scalar_codec(type_name.as_str())
                    .ok_or_else(|| ValidationError::InvalidFieldType(type_name.to_string(), pos))?;
                let value = value.clone().into_const().ok_or_else(invalid_type)?;

                codec
                    .parse_input(&value)
                    .map_err(|message| ValidationError::InvalidArgumentValue {
                        argument_name: argument_name.to_string(),
                        expected_type: type_name.to_string(),
                        message,
                        pos,
                    })
            }
            TypeKind::Enum(enum_type) => {
                // Variables carry enum values as JSON strings
                let member = match value {
                    Value::Enum(name) => name.as_str(),
                    Value::String(string) if from_variable => string.as_str(),
                    _ => return Err(invalid_type()),
                };

                if enum_type
                    .values
                    .iter()
                    .any(|enum_value| enum_value.node.value.node == member)
                {
                    Ok(JsonValue::String(member.to_string()))
                } else {
                    Err(ValidationError::InvalidArgumentValue {
                        argument_name: argument_name.to_string(),
                        expected_type: type_name.to_string(),
                        message: format!("'{member}' is not a member of the enum"),
                        pos,
                    })
                }
            }
            TypeKind::InputObject(input_object_type) => match value {
                Value::Object(entries) => {
                    self.coerce_object(input_object_type, type_name, entries, pos, from_variable)
                }
                _ => Err(invalid_type()),
            },
            _ => Err(invalid_type()),
        }
    }

    /// Recursively validate an input object
    fn coerce_object(
        &self,
        input_object_type: &InputObjectType,
        type_name: &Name,
        entries: &IndexMap<Name, Value>,
        pos: Pos,
        from_variable: bool,
    ) -> Result<JsonValue, ValidationError> {
        let supplied = entries
            .iter()
            .map(|(name, value)| (name, (value, pos)))
            .collect();

        let fields = self.validate_inputs(
            input_object_type.fields.iter().map(|d| &d.node),
            supplied,
            type_name.as_str(),
            pos,
            from_variable,
        )?;

        Ok(JsonValue::Object(fields.into_iter().collect()))
    }
}

/// A variable may be used only where its type fits. A nullable variable may fill a non-null
/// position only if it or the position has a default value.
fn check_variable_position(
    name: &Name,
    variable: &ResolvedVariable,
    location_type: &Type,
    location_has_default: bool,
    pos: Pos,
) -> Result<(), ValidationError> {
    let compatible = if !location_type.nullable
        && variable.ty.nullable
        && (variable.has_default || location_has_default)
    {
        is_base_type_compatible(&variable.ty.base, &location_type.base)
    } else {
        is_type_compatible(&variable.ty, location_type)
    };

    if compatible {
        Ok(())
    } else {
        Err(ValidationError::VariableTypeMismatch(
            name.to_string(),
            variable.ty.to_string(),
            location_type.to_string(),
            pos,
        ))
    }
}

fn is_type_compatible(variable_type: &Type, location_type: &Type) -> bool {
    if !location_type.nullable && variable_type.nullable {
        false
    } else {
        is_base_type_compatible(&variable_type.base, &location_type.base)
    }
}

fn is_base_type_compatible(variable_type: &BaseType, location_type: &BaseType) -> bool {
    match (variable_type, location_type) {
        (BaseType::List(variable_type), BaseType::List(location_type)) => {
            is_type_compatible(variable_type, location_type)
        }
        (BaseType::Named(variable_type), BaseType::Named(location_type)) => {
            variable_type == location_type
        }
        _ => false,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Variable(_) => "Variable",
        other => other
            .clone()
            .into_const()
            .as_ref()
            .map(value_kind)
            .unwrap_or("Object"),
    }
}
