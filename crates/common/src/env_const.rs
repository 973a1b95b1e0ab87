// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use blog_env::{EnvError, Environment};

pub const BLOG_SERVER_HOST: &str = "BLOG_SERVER_HOST";
pub const BLOG_SERVER_PORT: &str = "BLOG_SERVER_PORT";
pub const BLOG_GRAPHQL_HTTP_PATH: &str = "BLOG_GRAPHQL_HTTP_PATH";

pub const BLOG_STORE: &str = "BLOG_STORE"; // "postgres" (default) or "memory"

pub const BLOG_POSTGRES_URL: &str = "BLOG_POSTGRES_URL";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const BLOG_POSTGRES_USER: &str = "BLOG_POSTGRES_USER";
pub const BLOG_POSTGRES_PASSWORD: &str = "BLOG_POSTGRES_PASSWORD";
pub const BLOG_CONNECTION_POOL_SIZE: &str = "BLOG_CONNECTION_POOL_SIZE";
pub const BLOG_CHECK_CONNECTION_ON_STARTUP: &str = "BLOG_CHECK_CONNECTION_ON_STARTUP";
pub const BLOG_APPLY_MIGRATIONS: &str = "BLOG_APPLY_MIGRATIONS";

pub const BLOG_MAX_SELECTION_DEPTH: &str = "BLOG_MAX_SELECTION_DEPTH";
pub const BLOG_INTROSPECTION: &str = "BLOG_INTROSPECTION";

const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_CONNECTION_POOL_SIZE: usize = 10;
const DEFAULT_MAX_SELECTION_DEPTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

pub fn get_store_kind(env: &dyn Environment) -> Result<StoreKind, EnvError> {
    match env.get(BLOG_STORE).as_deref().map(str::trim) {
        Some("postgres") | None => Ok(StoreKind::Postgres),
        Some("memory") => Ok(StoreKind::Memory),
        Some(other) => Err(EnvError::InvalidEnum {
            env_key: BLOG_STORE,
            env_value: other.to_string(),
            message: "Must be one of 'postgres' or 'memory'".to_string(),
        }),
    }
}

pub fn get_server_host(env: &dyn Environment) -> String {
    env.get_or_else(BLOG_SERVER_HOST, "0.0.0.0")
}

pub fn get_server_port(env: &dyn Environment) -> Result<u16, EnvError> {
    env.get_parsed(BLOG_SERVER_PORT, DEFAULT_SERVER_PORT)
}

pub fn get_graphql_http_path(env: &dyn Environment) -> String {
    env.get(BLOG_GRAPHQL_HTTP_PATH)
        .unwrap_or_else(|| "/graphql".to_string())
}

/// `BLOG_POSTGRES_URL`, falling back to the conventional `DATABASE_URL`.
pub fn get_postgres_url(env: &dyn Environment) -> Option<String> {
    env.get(BLOG_POSTGRES_URL).or_else(|| env.get(DATABASE_URL))
}

pub fn get_connection_pool_size(env: &dyn Environment) -> Result<usize, EnvError> {
    env.get_parsed(BLOG_CONNECTION_POOL_SIZE, DEFAULT_CONNECTION_POOL_SIZE)
}

/// Maximum nesting of selections below a top-level field.
pub fn get_max_selection_depth(env: &dyn Environment) -> Result<usize, EnvError> {
    env.get_parsed(BLOG_MAX_SELECTION_DEPTH, DEFAULT_MAX_SELECTION_DEPTH)
}

pub fn is_introspection_enabled(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(BLOG_INTROSPECTION, true)
}

pub fn should_check_connection_on_startup(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(BLOG_CHECK_CONNECTION_ON_STARTUP, true)
}

pub fn should_apply_migrations(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(BLOG_APPLY_MIGRATIONS, false)
}
