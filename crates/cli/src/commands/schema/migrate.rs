// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.


use anyhow::{Result, anyhow};
use async_trait::async_trait;
use blog_env::Environment;
use blog_sql::{DatabasePool, PostgresConfig, PostgresStore};
use clap::Command;
use colored::Colorize;
use common::env_const::{BLOG_POSTGRES_PASSWORD, BLOG_POSTGRES_USER, get_postgres_url};

use crate::commands::command::{CommandDefinition, database_arg, get};

pub(super) struct MigrateCommandDefinition {}

#[async_trait]
impl CommandDefinition for MigrateCommandDefinition {
    fn command(&self) -> clap::Command {
        Command::new("migrate")
            .about("Apply the blog schema to a database (tables that already exist are left alone)")
            .arg(database_arg())
    }

    async fn execute(&self, matches: &clap::ArgMatches, env: &dyn Environment) -> Result<()> {
        let config = database_config(get(matches, "database"), env)?;

        let store = PostgresStore::new(DatabasePool::create(&config)?);
        store.migrate().await?;

        println!("{}", "Database schema is up to date".green());

        Ok(())
    }
}

fn database_config(database_url: Option<String>, env: &dyn Environment) -> Result<PostgresConfig> {
    let url = database_url.or_else(|| get_postgres_url(env)).ok_or_else(|| {
        anyhow!("No database specified. Use --database or set BLOG_POSTGRES_URL")
    })?;

    Ok(PostgresConfig {
        user: env.get(BLOG_POSTGRES_USER),
        password: env.get(BLOG_POSTGRES_PASSWORD),
        ..PostgresConfig::from_url(url)
    })
}
