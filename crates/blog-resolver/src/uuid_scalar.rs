// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_value::ConstValue;
use core_resolver::ScalarCodec;
use serde_json::Value;
use uuid::Uuid;

/// The `UUID` scalar: a UUID in its hyphenated form (`6a4e0e5c-9f7a-4a5e-8d6b-0f1b1e4b7c11`)
pub struct UuidScalar;

impl ScalarCodec for UuidScalar {
    fn name(&self) -> &str {
        "UUID"
    }

    fn parse_input(&self, value: &ConstValue) -> Result<Value, String> {
        match value {
            ConstValue::String(value) => parse_hyphenated(value)
                .map(|uuid| Value::String(uuid.hyphenated().to_string())),
            other => Err(format!("UUID cannot represent a non-string value: {other}")),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(value) => parse_hyphenated(value).map(|_| Value::String(value.clone())),
            other => Err(format!("UUID cannot represent value: {other}")),
        }
    }
}

fn parse_hyphenated(value: &str) -> Result<Uuid, String> {
    // `Uuid::parse_str` also accepts the simple, braced and URN forms
    const HYPHENATED_LEN: usize = 36;

    match Uuid::parse_str(value) {
        Ok(uuid) if value.len() == HYPHENATED_LEN => Ok(uuid),
        _ => Err(format!("Invalid UUID: '{value}'")),
    }
}
