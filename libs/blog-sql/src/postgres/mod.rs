// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod pool;
mod rows;
mod schema;

use async_trait::async_trait;
use tokio_postgres::{Row, types::ToSql};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    DatabaseError, MemberType, MemberTypeId, NewPost, NewProfile, NewUser, Post, PostChanges,
    Profile, ProfileChanges, Store, User, UserChanges,
};

pub use pool::{DatabasePool, PostgresConfig};
pub use schema::SCHEMA_SQL;

const USER_COLUMNS: &str = r#""id", "name", "balance""#;
const PROFILE_COLUMNS: &str =
    r#""id", "is_male", "year_of_birth", "user_id", "member_type_id""#;
const POST_COLUMNS: &str = r#""id", "title", "content", "author_id""#;
const MEMBER_TYPE_COLUMNS: &str = r#""id", "discount", "posts_limit_per_month""#;

/// A [`Store`] backed by PostgreSQL.
pub struct PostgresStore {
    pool: DatabasePool,
}

impl PostgresStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create the tables (if missing) and seed the member types.
    #[instrument(name = "PostgresStore::migrate", skip(self))]
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        let client = self.pool.get_client().await?;
        client.batch_execute(SCHEMA_SQL).await?;
        Ok(())
    }

    /// Fail early if the database cannot be reached.
    pub async fn check_connection(&self) -> Result<(), DatabaseError> {
        let client = self.pool.get_client().await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }

    async fn query(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, DatabaseError> {
        let client = self.pool.get_client().await?;
        let statement = client.prepare_cached(statement).await?;
        Ok(client.query(&statement, params).await?)
    }

    async fn query_opt(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, DatabaseError> {
        let client = self.pool.get_client().await?;
        let statement = client.prepare_cached(statement).await?;
        Ok(client.query_opt(&statement, params).await?)
    }

    /// Like [`Self::query_opt`], but maps constraint violations through the supplied handlers.
    async fn write_opt(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
        on_unique: impl FnOnce() -> DatabaseError,
        on_foreign_key: impl FnOnce() -> DatabaseError,
    ) -> Result<Option<Row>, DatabaseError> {
        let client = self.pool.get_client().await?;
        let statement = client.prepare_cached(statement).await?;
        client
            .query_opt(&statement, params)
            .await
            .map_err(|e| DatabaseError::from_postgres(e, on_unique, on_foreign_key))
    }
}

fn map_rows<T>(rows: Vec<Row>) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> TryFrom<&'r Row, Error = DatabaseError>,
{
    rows.iter().map(T::try_from).collect()
}

fn map_row<T>(row: Option<Row>) -> Result<Option<T>, DatabaseError>
where
    T: for<'r> TryFrom<&'r Row, Error = DatabaseError>,
{
    row.as_ref().map(T::try_from).transpose()
}

fn no_unique_constraint() -> DatabaseError {
    DatabaseError::Validation("Unexpected unique constraint violation".into())
}

fn no_foreign_key() -> DatabaseError {
    DatabaseError::Validation("Unexpected foreign key violation".into())
}

#[async_trait]
impl Store for PostgresStore {
    async fn member_types(&self) -> Result<Vec<MemberType>, DatabaseError> {
        let rows = self
            .query(
                &format!(r#"SELECT {MEMBER_TYPE_COLUMNS} FROM "member_types""#),
                &[],
            )
            .await?;
        map_rows(rows)
    }

    async fn member_type(&self, id: MemberTypeId) -> Result<Option<MemberType>, DatabaseError> {
        let row = self
            .query_opt(
                &format!(r#"SELECT {MEMBER_TYPE_COLUMNS} FROM "member_types" WHERE "id" = $1"#),
                &[&id.as_str()],
            )
            .await?;
        map_row(row)
    }

    async fn member_type_by_profile_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MemberType>, DatabaseError> {
        let row = self
            .query_opt(
                r#"SELECT m."id", m."discount", m."posts_limit_per_month"
                   FROM "member_types" m JOIN "profiles" p ON p."member_type_id" = m."id"
                   WHERE p."user_id" = $1"#,
                &[&user_id],
            )
            .await?;
        map_row(row)
    }

    async fn users(&self) -> Result<Vec<User>, DatabaseError> {
        let rows = self
            .query(&format!(r#"SELECT {USER_COLUMNS} FROM "users""#), &[])
            .await?;
        map_rows(rows)
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let row = self
            .query_opt(
                &format!(r#"SELECT {USER_COLUMNS} FROM "users" WHERE "id" = $1"#),
                &[&id],
            )
            .await?;
        map_row(row)
    }

    #[instrument(skip(self))]
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let row = self
            .write_opt(
                &format!(
                    r#"INSERT INTO "users" ("id", "name", "balance") VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"#
                ),
                &[&Uuid::new_v4(), &user.name, &user.balance],
                no_unique_constraint,
                no_foreign_key,
            )
            .await?;
        map_row(row)?.ok_or_else(|| DatabaseError::Validation("Insert returned no row".into()))
    }

    #[instrument(skip(self))]
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        let row = self
            .query_opt(
                &format!(
                    r#"UPDATE "users" SET "name" = COALESCE($2, "name"), "balance" = COALESCE($3, "balance")
                       WHERE "id" = $1 RETURNING {USER_COLUMNS}"#
                ),
                &[&id, &changes.name, &changes.balance],
            )
            .await?;
        map_row(row)?.ok_or_else(|| DatabaseError::not_found("User", id))
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: Uuid) -> Result<User, DatabaseError> {
        let row = self
            .query_opt(
                &format!(r#"DELETE FROM "users" WHERE "id" = $1 RETURNING {USER_COLUMNS}"#),
                &[&id],
            )
            .await?;
        map_row(row)?.ok_or_else(|| DatabaseError::not_found("User", id))
    }

    async fn profiles(&self) -> Result<Vec<Profile>, DatabaseError> {
        let rows = self
            .query(&format!(r#"SELECT {PROFILE_COLUMNS} FROM "profiles""#), &[])
            .await?;
        map_rows(rows)
    }

    async fn profile(&self, id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let row = self
            .query_opt(
                &format!(r#"SELECT {PROFILE_COLUMNS} FROM "profiles" WHERE "id" = $1"#),
                &[&id],
            )
            .await?;
        map_row(row)
    }

    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let row = self
            .query_opt(
                &format!(r#"SELECT {PROFILE_COLUMNS} FROM "profiles" WHERE "user_id" = $1"#),
                &[&user_id],
            )
            .await?;
        map_row(row)
    }

    #[instrument(skip(self))]
    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, DatabaseError> {
        let NewProfile {
            is_male,
            year_of_birth,
            user_id,
            member_type_id,
        } = profile;

        let row = self
            .write_opt(
                &format!(
                    r#"INSERT INTO "profiles" ("id", "is_male", "year_of_birth", "user_id", "member_type_id")
                       VALUES ($1, $2, $3, $4, $5) RETURNING {PROFILE_COLUMNS}"#
                ),
                &[
                    &Uuid::new_v4(),
                    &is_male,
                    &year_of_birth,
                    &user_id,
                    &member_type_id.as_str(),
                ],
                || DatabaseError::duplicate_profile(user_id),
                || DatabaseError::missing_profile_reference(user_id, member_type_id),
            )
            .await?;
        map_row(row)?.ok_or_else(|| DatabaseError::Validation("Insert returned no row".into()))
    }

    #[instrument(skip(self))]
    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Profile, DatabaseError> {
        let member_type_id = changes.member_type_id.map(|id| id.as_str());

        let row = self
            .write_opt(
                &format!(
                    r#"UPDATE "profiles" SET
                         "is_male" = COALESCE($2, "is_male"),
                         "year_of_birth" = COALESCE($3, "year_of_birth"),
                         "member_type_id" = COALESCE($4, "member_type_id")
                       WHERE "id" = $1 RETURNING {PROFILE_COLUMNS}"#
                ),
                &[&id, &changes.is_male, &changes.year_of_birth, &member_type_id],
                no_unique_constraint,
                || DatabaseError::missing_member_type(member_type_id.unwrap_or_default()),
            )
            .await?;
        map_row(row)?.ok_or_else(|| DatabaseError::not_found("Profile", id))
    }

    #[instrument(skip(self))]
    async fn delete_profile(&self, id: Uuid) -> Result<Profile, DatabaseError> {
        let row = self
            .query_opt(
                &format!(r#"DELETE FROM "profiles" WHERE "id" = $1 RETURNING {PROFILE_COLUMNS}"#),
                &[&id],
            )
            .await?;
        map_row(row)?.ok_or_else(|| DatabaseError::not_found("Profile", id))
    }

    async fn posts(&self) -> Result<Vec<Post>, DatabaseError> {
        let rows = self
            .query(&format!(r#"SELECT {POST_COLUMNS} FROM "posts""#), &[])
            .await?;
        map_rows(rows)
    }

    async fn post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let row = self
            .query_opt(
                &format!(r#"SELECT {POST_COLUMNS} FROM "posts" WHERE "id" = $1"#),
                &[&id],
            )
            .await?;
        map_row(row)
    }

    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError> {
        let rows = self
            .query(
                &format!(r#"SELECT {POST_COLUMNS} FROM "posts" WHERE "author_id" = $1"#),
                &[&author_id],
            )
            .await?;
        map_rows(rows)
    }

    #[instrument(skip(self))]
    async fn create_post(&self, post: NewPost) -> Result<Post, DatabaseError> {
        let author_id = post.author_id;
        let row = self
            .write_opt(
                &format!(
                    r#"INSERT INTO "posts" ("id", "title", "content", "author_id")
                       VALUES ($1, $2, $3, $4) RETURNING {POST_COLUMNS}"#
                ),
                &[&Uuid::new_v4(), &post.title, &post.content, &author_id],
                no_unique_constraint,
                || DatabaseError::missing_author(author_id),
            )
            .await?;
        map_row(row)?.ok_or_else(|| DatabaseError::Validation("Insert returned no row".into()))
    }

    #[instrument(skip(self))]
    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post, DatabaseError> {
        let row = self
            .query_opt(
                &format!(
                    r#"UPDATE "posts" SET "title" = COALESCE($2, "title"), "content" = COALESCE($3, "content")
                       WHERE "id" = $1 RETURNING {POST_COLUMNS}"#
                ),
                &[&id, &changes.title, &changes.content],
            )
            .await?;
        map_row(row)?.ok_or_else(|| DatabaseError::not_found("Post", id))
    }

    #[instrument(skip(self))]
    async fn delete_post(&self, id: Uuid) -> Result<Post, DatabaseError> {
        let row = self
            .query_opt(
                &format!(r#"DELETE FROM "posts" WHERE "id" = $1 RETURNING {POST_COLUMNS}"#),
                &[&id],
            )
            .await?;
        map_row(row)?.ok_or_else(|| DatabaseError::not_found("Post", id))
    }

    async fn subscribed_authors(&self, subscriber_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let rows = self
            .query(
                r#"SELECT u."id", u."name", u."balance"
                   FROM "users" u JOIN "subscribers_on_authors" s ON s."author_id" = u."id"
                   WHERE s."subscriber_id" = $1"#,
                &[&subscriber_id],
            )
            .await?;
        map_rows(rows)
    }

    async fn subscribers(&self, author_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let rows = self
            .query(
                r#"SELECT u."id", u."name", u."balance"
                   FROM "users" u JOIN "subscribers_on_authors" s ON s."subscriber_id" = u."id"
                   WHERE s."author_id" = $1"#,
                &[&author_id],
            )
            .await?;
        map_rows(rows)
    }

    #[instrument(skip(self))]
    async fn subscribe(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
    ) -> Result<User, DatabaseError> {
        let row = self
            .write_opt(
                r#"WITH "edge" AS (
                       INSERT INTO "subscribers_on_authors" ("subscriber_id", "author_id")
                       VALUES ($1, $2) RETURNING "subscriber_id"
                   )
                   SELECT u."id", u."name", u."balance"
                   FROM "users" u JOIN "edge" ON "edge"."subscriber_id" = u."id""#,
                &[&subscriber_id, &author_id],
                || DatabaseError::duplicate_subscription(subscriber_id, author_id),
                || DatabaseError::missing_subscription_user(subscriber_id, author_id),
            )
            .await?;
        map_row(row)?.ok_or_else(|| DatabaseError::not_found("User", subscriber_id))
    }

    #[instrument(skip(self))]
    async fn unsubscribe(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
    ) -> Result<User, DatabaseError> {
        let row = self
            .query_opt(
                r#"WITH "edge" AS (
                       DELETE FROM "subscribers_on_authors"
                       WHERE "subscriber_id" = $1 AND "author_id" = $2 RETURNING "subscriber_id"
                   )
                   SELECT u."id", u."name", u."balance"
                   FROM "users" u JOIN "edge" ON "edge"."subscriber_id" = u."id""#,
                &[&subscriber_id, &author_id],
            )
            .await?;
        map_row(row)?
            .ok_or_else(|| DatabaseError::subscription_not_found(subscriber_id, author_id))
    }
}
