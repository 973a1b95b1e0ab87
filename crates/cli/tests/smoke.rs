// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.


use std::{fs, path::Path, process::Command};

use blog_resolver::BLOG_SCHEMA_SDL;
use blog_sql::SCHEMA_SQL;

fn blog<I>(cwd: impl AsRef<Path>, args: I) -> Command
where
    I: IntoIterator<Item = &'static str>,
{
    let bin = env!("CARGO_BIN_EXE_blog");

    let mut cmd = Command::new(bin);
    cmd.current_dir(cwd).args(args);
    cmd
}

#[test]
fn prints_graphql_schema() {
    let tmp_dir = tempfile::tempdir().expect("Failed to create tempdir");

    let output = blog(tmp_dir.path(), ["graphql", "schema"]).output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), BLOG_SCHEMA_SDL);
}

#[test]
fn writes_database_schema() {
    let tmp_dir = tempfile::tempdir().expect("Failed to create tempdir");

    let status = blog(tmp_dir.path(), ["schema", "create", "-o", "blog.sql"])
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(
        fs::read_to_string(tmp_dir.path().join("blog.sql")).unwrap(),
        SCHEMA_SQL
    );
}

#[test]
fn migrate_requires_database() {
    let tmp_dir = tempfile::tempdir().expect("Failed to create tempdir");

    let output = blog(tmp_dir.path(), ["schema", "migrate"])
        .env_remove("BLOG_POSTGRES_URL")
        .env_remove("DATABASE_URL")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(
        String::from_utf8(output.stderr)
            .unwrap()
            .contains("No database specified")
    );
}
