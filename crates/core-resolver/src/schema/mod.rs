// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{collections::HashMap, fmt, sync::Arc};

use async_graphql_parser::{
    parse_schema,
    types::{
        BaseType, DirectiveDefinition, FieldDefinition, Type, TypeDefinition, TypeKind,
        TypeSystemDefinition,
    },
};
use thiserror::Error;

use crate::{
    scalar::{ScalarCodec, builtin_codecs},
    validation::underlying_type,
};

mod type_introspection;

pub use type_introspection::{TypeDefinitionIntrospection, deprecation_reason};

pub const QUERY_ROOT_TYPENAME: &str = "Query";
pub const MUTATION_ROOT_TYPENAME: &str = "Mutation";

const PRELUDE_SDL: &str = include_str!("prelude.graphql");
const INTROSPECTION_ROOT_TYPENAME: &str = "__IntrospectionRoot";

/// The type system a document is validated and executed against.
///
/// Built once from SDL (plus the built-in scalars, directives and introspection types) and shared
/// read-only afterwards.
#[derive(Clone)]
pub struct Schema {
    pub type_definitions: Vec<TypeDefinition>,
    pub directive_definitions: Vec<DirectiveDefinition>,
    pub(crate) schema_field_definition: FieldDefinition,
    pub(crate) type_field_definition: FieldDefinition,
    scalar_codecs: HashMap<String, Arc<dyn ScalarCodec>>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field(
                "types",
                &self
                    .type_definitions
                    .iter()
                    .map(|td| td.name.node.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Schema {
    pub fn new(sdl: &str, custom_scalars: Vec<Arc<dyn ScalarCodec>>) -> Result<Schema, SchemaError> {
        let mut type_definitions = vec![];
        let mut directive_definitions = vec![];

        // User types come first so that introspection lists them ahead of the built-in ones
        for source in [sdl, PRELUDE_SDL] {
            let document = parse_schema(source).map_err(|e| SchemaError::Parse(e.to_string()))?;

            for definition in document.definitions {
                match definition {
                    TypeSystemDefinition::Type(td) => {
                        if td.node.extend {
                            return Err(SchemaError::UnsupportedExtension(
                                td.node.name.node.to_string(),
                            ));
                        }
                        type_definitions.push(td.node)
                    }
                    TypeSystemDefinition::Directive(directive) => {
                        directive_definitions.push(directive.node)
                    }
                    // Root operation types are always `Query` and `Mutation`
                    TypeSystemDefinition::Schema(_) => {}
                }
            }
        }

        let introspection_root_index = type_definitions
            .iter()
            .position(|td| td.name.node == INTROSPECTION_ROOT_TYPENAME)
            .ok_or_else(|| SchemaError::UnknownType {
                type_name: INTROSPECTION_ROOT_TYPENAME.to_string(),
                referenced_by: "prelude".to_string(),
            })?;
        let introspection_root = type_definitions.remove(introspection_root_index);

        let introspection_field = |name: &str| {
            introspection_root
                .field(name)
                .cloned()
                .ok_or_else(|| SchemaError::UnknownType {
                    type_name: name.to_string(),
                    referenced_by: INTROSPECTION_ROOT_TYPENAME.to_string(),
                })
        };
        let schema_field_definition = introspection_field("__schema")?;
        let type_field_definition = introspection_field("__type")?;

        let mut seen = std::collections::HashSet::new();
        for td in &type_definitions {
            if !seen.insert(td.name.node.as_str()) {
                return Err(SchemaError::DuplicateType(td.name.node.to_string()));
            }
        }

        let scalar_codecs: HashMap<String, Arc<dyn ScalarCodec>> = builtin_codecs()
            .into_iter()
            .chain(custom_scalars)
            .map(|codec| (codec.name().to_string(), codec))
            .collect();

        let schema = Schema {
            type_definitions,
            directive_definitions,
            schema_field_definition,
            type_field_definition,
            scalar_codecs,
        };

        schema.check()?;

        Ok(schema)
    }

    /// Check that the root query type exists, that every scalar has a codec, and that every
    /// referenced type exists and may be used in its position.
    fn check(&self) -> Result<(), SchemaError> {
        match self.get_type_definition(QUERY_ROOT_TYPENAME) {
            Some(TypeDefinition {
                kind: TypeKind::Object(_),
                ..
            }) => {}
            _ => return Err(SchemaError::MissingQueryRoot),
        }

        for td in &self.type_definitions {
            let type_name = td.name.node.as_str();

            match &td.kind {
                TypeKind::Scalar => {
                    if !self.scalar_codecs.contains_key(type_name) {
                        return Err(SchemaError::MissingScalarCodec(type_name.to_string()));
                    }
                }
                TypeKind::Object(_) | TypeKind::Interface(_) => {
                    for field in td.fields().into_iter().flatten() {
                        let referenced_by = format!("{type_name}.{}", field.node.name.node);
                        self.check_reference(&field.node.ty.node, false, &referenced_by)?;

                        for argument in &field.node.arguments {
                            self.check_reference(
                                &argument.node.ty.node,
                                true,
                                &format!("{referenced_by}({})", argument.node.name.node),
                            )?;
                        }
                    }
                }
                TypeKind::InputObject(input_object) => {
                    for field in &input_object.fields {
                        self.check_reference(
                            &field.node.ty.node,
                            true,
                            &format!("{type_name}.{}", field.node.name.node),
                        )?;
                    }
                }
                TypeKind::Union(_) | TypeKind::Enum(_) => {}
            }
        }

        Ok(())
    }

    fn check_reference(
        &self,
        ty: &Type,
        input_position: bool,
        referenced_by: &str,
    ) -> Result<(), SchemaError> {
        let type_name = underlying_type(ty).as_str();

        match self.get_type_definition(type_name) {
            None => Err(SchemaError::UnknownType {
                type_name: type_name.to_string(),
                referenced_by: referenced_by.to_string(),
            }),
            Some(td) => {
                let valid = if input_position {
                    td.is_input_type()
                } else {
                    !matches!(td.kind, TypeKind::InputObject(_))
                };

                if valid {
                    Ok(())
                } else {
                    Err(SchemaError::InvalidTypePosition {
                        type_name: type_name.to_string(),
                        referenced_by: referenced_by.to_string(),
                    })
                }
            }
        }
    }

    pub fn get_type_definition(&self, type_name: &str) -> Option<&TypeDefinition> {
        self.type_definitions
            .iter()
            .find(|td| td.name.node.as_str() == type_name)
    }

    pub fn get_directive_definition(&self, directive_name: &str) -> Option<&DirectiveDefinition> {
        self.directive_definitions
            .iter()
            .find(|directive| directive.name.node.as_str() == directive_name)
    }

    pub fn scalar_codec(&self, scalar_name: &str) -> Option<&dyn ScalarCodec> {
        self.scalar_codecs.get(scalar_name).map(|codec| codec.as_ref())
    }

    pub fn has_mutation_root(&self) -> bool {
        self.get_type_definition(MUTATION_ROOT_TYPENAME).is_some()
    }
}

/// Shorthand for a nullable or non-null named type
pub(crate) fn named_type(name: &str, nullable: bool) -> Type {
    Type {
        base: BaseType::Named(async_graphql_value::Name::new(name)),
        nullable,
    }
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to parse schema: {0}")]
    Parse(String),

    #[error("Schema must define an object type named '{QUERY_ROOT_TYPENAME}'")]
    MissingQueryRoot,

    #[error("Type '{0}' is defined more than once")]
    DuplicateType(String),

    #[error("Type extension of '{0}' is not supported")]
    UnsupportedExtension(String),

    #[error("Unknown type '{type_name}' referenced by '{referenced_by}'")]
    UnknownType {
        type_name: String,
        referenced_by: String,
    },

    #[error("Type '{type_name}' cannot be used by '{referenced_by}'")]
    InvalidTypePosition {
        type_name: String,
        referenced_by: String,
    },

    #[error("No codec provided for scalar '{0}'")]
    MissingScalarCodec(String),
}
