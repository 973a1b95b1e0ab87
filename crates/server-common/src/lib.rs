// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use blog_env::{EnvError, Environment};
use blog_resolver::BlogContext;
use blog_sql::{DatabaseError, DatabasePool, InMemoryStore, PostgresConfig, PostgresStore, Store};
use common::env_const::{
    BLOG_POSTGRES_PASSWORD, BLOG_POSTGRES_USER, StoreKind, get_connection_pool_size,
    get_postgres_url, get_store_kind, should_apply_migrations, should_check_connection_on_startup,
};
use common::logging_tracing;
use graphql_router::{GraphQLRouter, SystemLoadingError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::util::TryInitError;

#[derive(Error, Debug)]
pub enum ServerInitError {
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] TryInitError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    SystemLoading(#[from] SystemLoadingError),

    #[error("Set BLOG_POSTGRES_URL (or DATABASE_URL) or use BLOG_STORE=memory")]
    MissingDatabaseUrl,
}

/// Initialize the server by:
/// - Initializing tracing
/// - Connecting to the configured store (applying migrations if asked to)
/// - Creating the GraphQL router (and return it)
pub async fn init(env: &dyn Environment) -> Result<GraphQLRouter<BlogContext>, ServerInitError> {
    logging_tracing::init()?;

    create_router(env).await
}

/// Same as [`init`], minus the global tracing subscriber.
pub async fn create_router(
    env: &dyn Environment,
) -> Result<GraphQLRouter<BlogContext>, ServerInitError> {
    let store = create_store(env).await?;

    Ok(GraphQLRouter::from_env(BlogContext::new(store), env)?)
}

pub async fn create_store(env: &dyn Environment) -> Result<Arc<dyn Store>, ServerInitError> {
    match get_store_kind(env)? {
        StoreKind::Memory => {
            info!("Using the in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreKind::Postgres => {
            let url = get_postgres_url(env).ok_or(ServerInitError::MissingDatabaseUrl)?;

            let config = PostgresConfig {
                url,
                user: env.get(BLOG_POSTGRES_USER),
                password: env.get(BLOG_POSTGRES_PASSWORD),
                pool_size: get_connection_pool_size(env)?,
            };
            let store = PostgresStore::new(DatabasePool::create(&config)?);

            if should_check_connection_on_startup(env)? {
                store.check_connection().await?;
            }
            if should_apply_migrations(env)? {
                info!("Applying database migrations");
                store.migrate().await?;
            }

            Ok(Arc::new(store))
        }
    }
}
