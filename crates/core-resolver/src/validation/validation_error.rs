// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::Pos;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0}")]
    QueryParsingFailed(String, Pos, Option<Pos>),

    #[error("Variable '{0}' not found")]
    VariableNotFound(String, Pos),

    #[error("Variable '{0}' could not be deserialized: {2}")]
    MalformedVariable(String, Pos, serde_json::Error),

    #[error("Variable '{0}' must not be null")]
    NullVariable(String, Pos),

    #[error("Variable '{0}' is of type '{1}', which is not an input type")]
    InvalidVariableType(String, String, Pos),

    #[error(
        "Variable '{variable_name}' is not of a valid type. Expected '{expected_type}': {message}"
    )]
    InvalidVariableValue {
        variable_name: String,
        expected_type: String,
        message: String,
        pos: Pos,
    },

    #[error("Variable '{0}' of type '{1}' used in position expecting type '{2}'")]
    VariableTypeMismatch(String, String, String, Pos),

    #[error("Fragment definition '{0}' not found")]
    FragmentDefinitionNotFound(String, Pos),

    #[error("Fragment '{0}' cannot be spread here as objects of type '{1}' can never be of type '{2}'")]
    InvalidFragmentType(String, String, String, Pos),

    #[error("Fragment '{0}' forms a cycle")]
    FragmentCycle(String, Pos),

    #[error("No such operation '{0}'")]
    OperationNotFound(String, Pos),

    #[error("Operation type '{0}' is not supported")]
    UnsupportedOperationType(String, Pos),

    #[error("Field '{0}' is not valid for type '{1}'")]
    InvalidField(String, String, Pos),

    #[error("Field '{0}' is of a scalar type, which should not specify fields")]
    ScalarWithField(String, Pos),

    #[error("Field '{0}' of type '{1}' must have a selection of subfields")]
    MissingSubselection(String, String, Pos),

    #[error("Field type '{0}' is not valid")]
    InvalidFieldType(String, Pos),

    #[error("Fields '{0}' conflict because they have differing names or arguments")]
    MergeFailure(String, Pos, Pos),

    #[error("Directive '@{0}' is not supported here")]
    InvalidDirective(String, Pos),

    #[error("Required argument '{0}' not found")]
    RequiredArgumentNotFound(String, Pos),

    #[error("Argument '{0}' must not be null")]
    NullArgument(String, Pos),

    #[error("There can be only one argument named '{0}'")]
    DuplicateArgument(String, Pos),

    #[error("Argument(s) '{0:?}' invalid for '{1}'")]
    StrayArguments(Vec<String>, String, Pos),

    #[error(
        "Argument '{argument_name}' is not of a valid type. Expected '{expected_type}', got '{actual_type}'"
    )]
    InvalidArgumentType {
        argument_name: String,
        expected_type: String,
        actual_type: String,
        pos: Pos,
    },

    #[error(
        "Argument '{argument_name}' is not of a valid type. Expected '{expected_type}': {message}"
    )]
    InvalidArgumentValue {
        argument_name: String,
        expected_type: String,
        message: String,
        pos: Pos,
    },

    #[error("Selection set too deep")]
    SelectionSetTooDeep(Pos),

    #[error("Introspection is not enabled")]
    IntrospectionDisabled(Pos),

    #[error("No operation found")]
    NoOperationFound,

    #[error("Must provide operation name if query contains multiple operations")]
    MultipleOperationsNoOperationName,

    #[error("operationName '{0}' doesn't match any operation")]
    MultipleOperationsUnmatchedOperationName(String),
}

impl ValidationError {
    pub fn positions(&self) -> Vec<Pos> {
        match self {
            ValidationError::QueryParsingFailed(_, pos1, pos2) => {
                let mut positions = vec![*pos1];
                positions.extend(pos2);
                positions
            }
            ValidationError::MergeFailure(_, pos1, pos2) => vec![*pos1, *pos2],
            ValidationError::VariableNotFound(_, pos)
            | ValidationError::MalformedVariable(_, pos, _)
            | ValidationError::NullVariable(_, pos)
            | ValidationError::InvalidVariableType(_, _, pos)
            | ValidationError::InvalidVariableValue { pos, .. }
            | ValidationError::VariableTypeMismatch(_, _, _, pos)
            | ValidationError::FragmentDefinitionNotFound(_, pos)
            | ValidationError::InvalidFragmentType(_, _, _, pos)
            | ValidationError::FragmentCycle(_, pos)
            | ValidationError::OperationNotFound(_, pos)
            | ValidationError::UnsupportedOperationType(_, pos)
            | ValidationError::InvalidField(_, _, pos)
            | ValidationError::ScalarWithField(_, pos)
            | ValidationError::MissingSubselection(_, _, pos)
            | ValidationError::InvalidFieldType(_, pos)
            | ValidationError::InvalidDirective(_, pos)
            | ValidationError::RequiredArgumentNotFound(_, pos)
            | ValidationError::NullArgument(_, pos)
            | ValidationError::DuplicateArgument(_, pos)
            | ValidationError::StrayArguments(_, _, pos)
            | ValidationError::InvalidArgumentType { pos, .. }
            | ValidationError::InvalidArgumentValue { pos, .. }
            | ValidationError::SelectionSetTooDeep(pos)
            | ValidationError::IntrospectionDisabled(pos) => vec![*pos],
            ValidationError::NoOperationFound
            | ValidationError::MultipleOperationsNoOperationName
            | ValidationError::MultipleOperationsUnmatchedOperationName(_) => vec![],
        }
    }
}
