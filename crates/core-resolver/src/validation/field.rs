// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::{Pos, types::Type};
use async_graphql_value::{Name, indexmap::IndexMap};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::field_resolver::FieldError;

#[derive(Debug, Clone, Serialize)]
pub struct ValidatedField {
    pub alias: Option<Name>,
    /// The name of the field.
    pub name: Name,
    /// The declared type of the field.
    #[serde(skip)]
    pub ty: Type,
    /// The type this field was selected on.
    pub parent_type: Name,
    /// The coerced arguments to the field. Optional arguments that were neither supplied nor
    /// defaulted are absent.
    pub arguments: IndexMap<String, Value>,

    /// The subfields being selected in this field, if it is an object. Empty if no fields are
    /// being selected.
    pub subfields: Vec<ValidatedField>,

    #[serde(skip)]
    pub pos: Pos,
}

impl ValidatedField {
    pub fn output_name(&self) -> String {
        self.alias.as_ref().unwrap_or(&self.name).to_string()
    }

    /// Deserialize an argument. An absent argument deserializes from `null`, so `Option<T>` can
    /// be used for optional arguments.
    pub fn argument<T: DeserializeOwned>(&self, name: &str) -> Result<T, FieldError> {
        let value = self.arguments.get(name).cloned().unwrap_or(Value::Null);

        serde_json::from_value(value)
            .map_err(|e| FieldError::InvalidArgument(name.to_string(), e.to_string()))
    }
}
