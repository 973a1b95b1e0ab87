// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use deadpool_postgres::{Client, Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::{Config, NoTls};

use crate::DatabaseError;

/// Connection settings for [`DatabasePool`].
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub pool_size: usize,
}

impl PostgresConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: None,
            password: None,
            pool_size: 1,
        }
    }
}

pub struct DatabasePool {
    pool: Pool,
}

impl DatabasePool {
    pub fn create(config: &PostgresConfig) -> Result<Self, DatabaseError> {
        let mut pg_config = Config::from_str(&config.url).map_err(|e| {
            DatabaseError::Delegate(e)
                .with_context("Failed to parse PostgreSQL connection string".into())
        })?;

        if let Some(user) = &config.user {
            pg_config.user(user);
        }
        if let Some(password) = &config.password {
            pg_config.password(password);
        }

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let manager = Manager::from_config(pg_config, NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.pool_size)
            .build()
            .map_err(|e| DatabaseError::Config(format!("Failed to create DB pool: {e}")))?;

        Ok(Self { pool })
    }

    pub async fn get_client(&self) -> Result<Client, DatabaseError> {
        Ok(self.pool.get().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        let result = DatabasePool::create(&PostgresConfig::from_url("this is not a connection string"));

        assert!(matches!(result, Err(DatabaseError::WithContext(..))));
    }

    #[tokio::test]
    async fn creating_pool_does_not_connect() {
        let config = PostgresConfig {
            pool_size: 4,
            ..PostgresConfig::from_url("postgres://nobody@localhost:1/blog")
        };

        assert!(DatabasePool::create(&config).is_ok());
    }
}
