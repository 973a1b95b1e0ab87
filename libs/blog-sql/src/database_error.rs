// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use thiserror::Error;
use tokio_postgres::error::SqlState;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UniqueViolation(String),

    #[error("{0}")]
    ForeignKeyViolation(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Delegate: {0}")]
    Delegate(#[from] tokio_postgres::Error),

    #[error("Pool: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("{0} {1}")]
    WithContext(String, #[source] Box<DatabaseError>),
}

impl DatabaseError {
    pub fn with_context(self, context: String) -> DatabaseError {
        DatabaseError::WithContext(context, Box::new(self))
    }

    /// Message safe to show to an API client, if the error was caused by the request itself
    /// (as opposed to an infrastructure failure).
    pub fn user_error_message(&self) -> Option<String> {
        match self {
            DatabaseError::NotFound(message)
            | DatabaseError::UniqueViolation(message)
            | DatabaseError::ForeignKeyViolation(message) => Some(message.clone()),
            DatabaseError::WithContext(_, source) => source.user_error_message(),
            _ => None,
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl Display) -> Self {
        DatabaseError::NotFound(format!("{entity} with id '{id}' not found"))
    }

    pub(crate) fn duplicate_profile(user_id: impl Display) -> Self {
        DatabaseError::UniqueViolation(format!("Profile for user '{user_id}' already exists"))
    }

    pub(crate) fn duplicate_subscription(subscriber_id: impl Display, author_id: impl Display) -> Self {
        DatabaseError::UniqueViolation(format!(
            "User '{subscriber_id}' is already subscribed to '{author_id}'"
        ))
    }

    pub(crate) fn subscription_not_found(
        subscriber_id: impl Display,
        author_id: impl Display,
    ) -> Self {
        DatabaseError::NotFound(format!(
            "User '{subscriber_id}' is not subscribed to '{author_id}'"
        ))
    }

    pub(crate) fn missing_profile_reference(
        user_id: impl Display,
        member_type_id: impl Display,
    ) -> Self {
        DatabaseError::ForeignKeyViolation(format!(
            "User '{user_id}' or member type '{member_type_id}' does not exist"
        ))
    }

    pub(crate) fn missing_member_type(member_type_id: impl Display) -> Self {
        DatabaseError::ForeignKeyViolation(format!(
            "Member type '{member_type_id}' does not exist"
        ))
    }

    pub(crate) fn missing_author(author_id: impl Display) -> Self {
        DatabaseError::ForeignKeyViolation(format!("Author '{author_id}' does not exist"))
    }

    pub(crate) fn missing_subscription_user(
        subscriber_id: impl Display,
        author_id: impl Display,
    ) -> Self {
        DatabaseError::ForeignKeyViolation(format!(
            "User '{subscriber_id}' or author '{author_id}' does not exist"
        ))
    }

    /// Translate constraint violations reported by PostgreSQL into the variants the in-memory
    /// store produces, so both stores surface identical messages.
    pub(crate) fn from_postgres(
        error: tokio_postgres::Error,
        on_unique: impl FnOnce() -> DatabaseError,
        on_foreign_key: impl FnOnce() -> DatabaseError,
    ) -> Self {
        match error.code() {
            Some(code) if *code == SqlState::UNIQUE_VIOLATION => on_unique(),
            Some(code) if *code == SqlState::FOREIGN_KEY_VIOLATION => on_foreign_key(),
            _ => DatabaseError::Delegate(error),
        }
    }
}

pub trait WithContext {
    fn with_context(self, context: String) -> Self;
}

impl<T> WithContext for Result<T, DatabaseError> {
    fn with_context(self, context: String) -> Result<T, DatabaseError> {
        self.map_err(|e| e.with_context(context))
    }
}
