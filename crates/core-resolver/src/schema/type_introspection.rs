// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::{
    Positioned,
    types::{
        ConstDirective, EnumValueDefinition, FieldDefinition, InputValueDefinition, TypeDefinition,
        TypeKind,
    },
};
use async_graphql_value::{ConstValue, Name};

pub trait TypeDefinitionIntrospection {
    fn name(&self) -> String;
    fn kind(&self) -> String;
    fn description(&self) -> Option<String>;
    fn fields(&self) -> Option<&Vec<Positioned<FieldDefinition>>>;
    fn interfaces(&self) -> Option<&Vec<Positioned<Name>>>;
    fn possible_types(&self) -> Option<&Vec<Positioned<Name>>>;
    fn enum_values(&self) -> Option<&Vec<Positioned<EnumValueDefinition>>>;
    fn input_fields(&self) -> Option<&Vec<Positioned<InputValueDefinition>>>;
    fn specified_by_url(&self) -> Option<String>;

    fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields()?
            .iter()
            .map(|field| &field.node)
            .find(|field| field.name.node == name)
    }

    fn is_input_type(&self) -> bool;
    fn is_leaf_type(&self) -> bool;
}

impl TypeDefinitionIntrospection for TypeDefinition {
    fn name(&self) -> String {
        self.name.node.to_string()
    }

    fn kind(&self) -> String {
        match self.kind {
            TypeKind::Scalar => "SCALAR".to_owned(),
            TypeKind::Object(_) => "OBJECT".to_owned(),
            TypeKind::Interface(_) => "INTERFACE".to_owned(),
            TypeKind::Union(_) => "UNION".to_owned(),
            TypeKind::Enum(_) => "ENUM".to_owned(),
            TypeKind::InputObject(_) => "INPUT_OBJECT".to_owned(),
        }
    }

    fn description(&self) -> Option<String> {
        self.description.as_ref().map(|d| d.node.to_owned())
    }

    fn fields(&self) -> Option<&Vec<Positioned<FieldDefinition>>> {
        // Only object and interface types have fields (null otherwise)
        match &self.kind {
            TypeKind::Object(value) => Some(&value.fields),
            TypeKind::Interface(value) => Some(&value.fields),
            _ => None,
        }
    }

    fn interfaces(&self) -> Option<&Vec<Positioned<Name>>> {
        match &self.kind {
            TypeKind::Object(value) => Some(&value.implements),
            TypeKind::Interface(value) => Some(&value.implements),
            _ => None,
        }
    }

    fn possible_types(&self) -> Option<&Vec<Positioned<Name>>> {
        match &self.kind {
            TypeKind::Union(value) => Some(&value.members),
            _ => None,
        }
    }

    fn enum_values(&self) -> Option<&Vec<Positioned<EnumValueDefinition>>> {
        match &self.kind {
            TypeKind::Enum(value) => Some(&value.values),
            _ => None,
        }
    }

    fn input_fields(&self) -> Option<&Vec<Positioned<InputValueDefinition>>> {
        match &self.kind {
            TypeKind::InputObject(value) => Some(&value.fields),
            _ => None,
        }
    }

    fn specified_by_url(&self) -> Option<String> {
        directive_string_argument(&self.directives, "specifiedBy", "url")
    }

    fn is_input_type(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Scalar | TypeKind::Enum(_) | TypeKind::InputObject(_)
        )
    }

    fn is_leaf_type(&self) -> bool {
        matches!(self.kind, TypeKind::Scalar | TypeKind::Enum(_))
    }
}

/// The reason given by a `@deprecated` directive, if the element carries one.
pub fn deprecation_reason(directives: &[Positioned<ConstDirective>]) -> Option<String> {
    directives
        .iter()
        .find(|directive| directive.node.name.node == "deprecated")
        .map(|directive| {
            directive_argument(directive, "reason")
                .and_then(|reason| match reason {
                    ConstValue::String(reason) => Some(reason.clone()),
                    _ => None,
                })
                .unwrap_or_else(|| "No longer supported".to_string())
        })
}

fn directive_string_argument(
    directives: &[Positioned<ConstDirective>],
    directive_name: &str,
    argument_name: &str,
) -> Option<String> {
    directives
        .iter()
        .find(|directive| directive.node.name.node == directive_name)
        .and_then(|directive| directive_argument(directive, argument_name))
        .and_then(|value| match value {
            ConstValue::String(value) => Some(value.clone()),
            _ => None,
        })
}

fn directive_argument<'a>(
    directive: &'a Positioned<ConstDirective>,
    argument_name: &str,
) -> Option<&'a ConstValue> {
    directive
        .node
        .arguments
        .iter()
        .find(|(name, _)| name.node == argument_name)
        .map(|(_, value)| &value.node)
}
