// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::{schema::Schema, validation::field::ValidatedField};

/// What a resolver works with while resolving a field: the schema and the application context
/// (typically a handle to the data store).
pub struct ExecutionContext<'a, C> {
    pub schema: &'a Schema,
    pub data: &'a C,
}

/// Resolves the fields of one object.
///
/// Leaf values are returned as JSON and serialized by the executor through the scalar codec of
/// the declared type; objects are returned as further resolvers.
#[async_trait]
pub trait FieldResolver<C>
where
    Self: std::fmt::Debug + Send + Sync,
{
    /// The name of the object type this resolver stands for (the value of `__typename`)
    fn typename(&self) -> &str;

    // {
    //   name: ???
    // }
    // `field` is `name` and ??? is the return value
    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        ctx: &'e ExecutionContext<'e, C>,
    ) -> Result<Resolved<C>, FieldError>;
}

pub enum Resolved<C> {
    Null,
    Value(Value),
    Object(Box<dyn FieldResolver<C>>),
    List(Vec<Resolved<C>>),
}

impl<C> Resolved<C> {
    pub fn value(value: impl Into<Value>) -> Self {
        Resolved::Value(value.into())
    }

    pub fn object(object: impl FieldResolver<C> + 'static) -> Self {
        Resolved::Object(Box::new(object))
    }

    pub fn optional_object(object: Option<impl FieldResolver<C> + 'static>) -> Self {
        match object {
            Some(object) => Resolved::object(object),
            None => Resolved::Null,
        }
    }

    pub fn objects<T: FieldResolver<C> + 'static>(objects: impl IntoIterator<Item = T>) -> Self {
        Resolved::List(objects.into_iter().map(Resolved::object).collect())
    }
}

impl<C> std::fmt::Debug for Resolved<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolved::Null => write!(f, "Null"),
            Resolved::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Resolved::Object(object) => f.debug_tuple("Object").field(object).finish(),
            Resolved::List(list) => f.debug_list().entries(list).finish(),
        }
    }
}

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("{0}")]
    UserDisplayError(String), // Error message to be displayed to the user (resolvers should hide internal errors through this)

    #[error("Invalid field {0} for {1}")]
    InvalidField(String, String), // (field name, container type)

    #[error("Invalid argument '{0}': {1}")]
    InvalidArgument(String, String),

    #[error("{0}")]
    Delegate(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl FieldError {
    pub fn invalid_field(field: &ValidatedField, container_type: &str) -> Self {
        FieldError::InvalidField(field.name.to_string(), container_type.to_string())
    }

    // Message that should be emitted when the error is returned to the user.
    // This should hide any internal details of the error.
    pub fn user_error_message(&self) -> String {
        match self {
            FieldError::UserDisplayError(message) => message.clone(),
            FieldError::InvalidField(..) | FieldError::InvalidArgument(..) => self.to_string(),
            FieldError::Delegate(error) => {
                error!(%error, "Error while resolving field");
                "Internal server error".to_string()
            }
        }
    }
}
