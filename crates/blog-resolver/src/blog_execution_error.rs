// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use blog_sql::DatabaseError;
use core_resolver::FieldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogExecutionError {
    #[error("{0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Field(#[from] FieldError),
}

impl From<BlogExecutionError> for FieldError {
    fn from(error: BlogExecutionError) -> Self {
        match error {
            BlogExecutionError::Field(error) => error,
            // Constraint violations and missing rows are caused by the request and are reported
            // as is. Anything else is an infrastructure failure and stays hidden.
            BlogExecutionError::Database(error) => match error.user_error_message() {
                Some(message) => FieldError::UserDisplayError(message),
                None => FieldError::Delegate(Box::new(error)),
            },
        }
    }
}
