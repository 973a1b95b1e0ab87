// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.


use std::{io::Write, path::PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use blog_env::Environment;
use blog_resolver::BLOG_SCHEMA_SDL;
use clap::Command;

use crate::commands::command::{CommandDefinition, get, output_arg, yes_arg};
use crate::util::open_file_for_output;

pub(super) struct SchemaCommandDefinition {}

#[async_trait]
impl CommandDefinition for SchemaCommandDefinition {
    fn command(&self) -> clap::Command {
        Command::new("schema")
            .about("Obtain the GraphQL schema (SDL) served by the blog server")
            .arg(output_arg())
            .arg(yes_arg())
    }

    async fn execute(&self, matches: &clap::ArgMatches, _env: &dyn Environment) -> Result<()> {
        let output: Option<PathBuf> = get(matches, "output");
        let yes: bool = matches.get_flag("yes");

        let mut buffer = open_file_for_output(output.as_deref(), yes)?;
        buffer.write_all(BLOG_SCHEMA_SDL.as_bytes())?;

        Ok(())
    }
}
