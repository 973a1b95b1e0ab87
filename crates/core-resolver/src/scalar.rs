// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Input coercion and output serialization of scalar types.
//!
//! Every `scalar` declared in a schema must be backed by a [`ScalarCodec`]. The built-in GraphQL
//! scalars (`Int`, `Float`, `String`, `Boolean` and `ID`) are always available; schemas declaring
//! custom scalars supply their codecs when building the [`crate::Schema`].

use std::sync::Arc;

use async_graphql_value::ConstValue;
use serde_json::Value;

pub trait ScalarCodec: Send + Sync {
    /// The scalar name as it appears in the schema
    fn name(&self) -> &str;

    /// Coerce a literal (or variable) input into its JSON form, as seen by resolvers.
    fn parse_input(&self, value: &ConstValue) -> Result<Value, String>;

    /// Check (and possibly normalize) a resolved value before it is sent to the client.
    fn serialize(&self, value: &Value) -> Result<Value, String>;
}

pub(crate) fn builtin_codecs() -> Vec<Arc<dyn ScalarCodec>> {
    vec![
        Arc::new(IntScalar),
        Arc::new(FloatScalar),
        Arc::new(StringScalar),
        Arc::new(BooleanScalar),
        Arc::new(IdScalar),
    ]
}

/// A short description of an input value's kind, used in error messages
pub(crate) fn value_kind(value: &ConstValue) -> &'static str {
    match value {
        ConstValue::Null => "Null",
        ConstValue::Number(_) => "Number",
        ConstValue::String(_) => "String",
        ConstValue::Boolean(_) => "Boolean",
        ConstValue::Binary(_) => "Binary",
        ConstValue::Enum(_) => "Enum",
        ConstValue::List(_) => "List",
        ConstValue::Object(_) => "Object",
    }
}

/// Output coercion, which also accepts integral floats
fn as_i32(number: &serde_json::Number) -> Option<i32> {
    match number.as_i64() {
        Some(value) => i32::try_from(value).ok(),
        None => number
            .as_f64()
            .filter(|value| value.fract() == 0.0)
            .filter(|value| *value >= f64::from(i32::MIN) && *value <= f64::from(i32::MAX))
            .map(|value| value as i32),
    }
}

struct IntScalar;

impl ScalarCodec for IntScalar {
    fn name(&self) -> &str {
        "Int"
    }

    fn parse_input(&self, value: &ConstValue) -> Result<Value, String> {
        match value {
            ConstValue::Number(number) => number
                .as_i64()
                .and_then(|value| i32::try_from(value).ok())
                .map(Value::from)
                .ok_or_else(|| format!("Int cannot represent non 32-bit signed integer value: {number}")),
            other => Err(format!("Int cannot represent a {} value", value_kind(other))),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Number(number) => as_i32(number)
                .map(Value::from)
                .ok_or_else(|| format!("Int cannot represent value: {number}")),
            other => Err(format!("Int cannot represent value: {other}")),
        }
    }
}

struct FloatScalar;

impl ScalarCodec for FloatScalar {
    fn name(&self) -> &str {
        "Float"
    }

    fn parse_input(&self, value: &ConstValue) -> Result<Value, String> {
        match value {
            ConstValue::Number(number) => Ok(Value::Number(number.clone())),
            other => Err(format!("Float cannot represent a {} value", value_kind(other))),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Number(_) => Ok(value.clone()),
            other => Err(format!("Float cannot represent value: {other}")),
        }
    }
}

struct StringScalar;

impl ScalarCodec for StringScalar {
    fn name(&self) -> &str {
        "String"
    }

    fn parse_input(&self, value: &ConstValue) -> Result<Value, String> {
        match value {
            ConstValue::String(string) => Ok(Value::String(string.clone())),
            other => Err(format!("String cannot represent a {} value", value_kind(other))),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(_) => Ok(value.clone()),
            other => Err(format!("String cannot represent value: {other}")),
        }
    }
}

struct BooleanScalar;

impl ScalarCodec for BooleanScalar {
    fn name(&self) -> &str {
        "Boolean"
    }

    fn parse_input(&self, value: &ConstValue) -> Result<Value, String> {
        match value {
            ConstValue::Boolean(boolean) => Ok(Value::Bool(*boolean)),
            other => Err(format!("Boolean cannot represent a {} value", value_kind(other))),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::Bool(_) => Ok(value.clone()),
            other => Err(format!("Boolean cannot represent value: {other}")),
        }
    }
}

struct IdScalar;

impl ScalarCodec for IdScalar {
    fn name(&self) -> &str {
        "ID"
    }

    fn parse_input(&self, value: &ConstValue) -> Result<Value, String> {
        match value {
            ConstValue::String(string) => Ok(Value::String(string.clone())),
            ConstValue::Number(number) if number.is_i64() || number.is_u64() => {
                Ok(Value::String(number.to_string()))
            }
            other => Err(format!("ID cannot represent a {} value", value_kind(other))),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, String> {
        match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(number) if number.is_i64() || number.is_u64() => {
                Ok(Value::String(number.to_string()))
            }
            other => Err(format!("ID cannot represent value: {other}")),
        }
    }
}
