// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Tables and seed rows. Every statement is idempotent, so applying it to an already migrated
/// database is a no-op.
pub const SCHEMA_SQL: &str = r#"CREATE TABLE IF NOT EXISTS "member_types" (
    "id" TEXT PRIMARY KEY,
    "discount" DOUBLE PRECISION NOT NULL,
    "posts_limit_per_month" INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS "users" (
    "id" UUID PRIMARY KEY,
    "name" TEXT NOT NULL,
    "balance" DOUBLE PRECISION NOT NULL
);

CREATE TABLE IF NOT EXISTS "profiles" (
    "id" UUID PRIMARY KEY,
    "is_male" BOOLEAN NOT NULL,
    "year_of_birth" INTEGER NOT NULL,
    "user_id" UUID NOT NULL UNIQUE REFERENCES "users" ("id") ON DELETE CASCADE,
    "member_type_id" TEXT NOT NULL REFERENCES "member_types" ("id") ON DELETE RESTRICT
);

CREATE TABLE IF NOT EXISTS "posts" (
    "id" UUID PRIMARY KEY,
    "title" TEXT NOT NULL,
    "content" TEXT NOT NULL,
    "author_id" UUID NOT NULL REFERENCES "users" ("id") ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS "posts_author_id_idx" ON "posts" ("author_id");

CREATE TABLE IF NOT EXISTS "subscribers_on_authors" (
    "subscriber_id" UUID NOT NULL REFERENCES "users" ("id") ON DELETE CASCADE,
    "author_id" UUID NOT NULL REFERENCES "users" ("id") ON DELETE CASCADE,
    PRIMARY KEY ("subscriber_id", "author_id")
);

CREATE INDEX IF NOT EXISTS "subscribers_on_authors_author_id_idx" ON "subscribers_on_authors" ("author_id");

INSERT INTO "member_types" ("id", "discount", "posts_limit_per_month") VALUES
    ('BASIC', 2.3, 20),
    ('BUSINESS', 7.7, 100)
ON CONFLICT ("id") DO NOTHING;
"#;
