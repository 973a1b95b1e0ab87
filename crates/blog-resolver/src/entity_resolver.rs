// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolvers for the object types. Scalar fields come from the row itself; relation fields are
//! fetched lazily with one store call per parent row.

use async_trait::async_trait;
use blog_sql::{MemberType, Post, Profile, Store, User};
use core_resolver::{
    ExecutionContext, FieldError, FieldResolver, Resolved, validation::field::ValidatedField,
};

use crate::{BlogContext, BlogExecutionError};

#[async_trait]
impl FieldResolver<BlogContext> for User {
    fn typename(&self) -> &str {
        "User"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        ctx: &'e ExecutionContext<'e, BlogContext>,
    ) -> Result<Resolved<BlogContext>, FieldError> {
        Ok(resolve_user_field(self, field, ctx.data.store.as_ref()).await?)
    }
}

async fn resolve_user_field(
    user: &User,
    field: &ValidatedField,
    store: &dyn Store,
) -> Result<Resolved<BlogContext>, BlogExecutionError> {
    Ok(match field.name.as_str() {
        "id" => Resolved::value(user.id.to_string()),
        "name" => Resolved::value(user.name.as_str()),
        "balance" => Resolved::value(user.balance),
        "profile" => Resolved::optional_object(store.profile_by_user(user.id).await?),
        "posts" => Resolved::objects(store.posts_by_author(user.id).await?),
        "userSubscribedTo" => Resolved::objects(store.subscribed_authors(user.id).await?),
        "subscribedToUser" => Resolved::objects(store.subscribers(user.id).await?),
        _ => return Err(FieldError::invalid_field(field, "User").into()),
    })
}

#[async_trait]
impl FieldResolver<BlogContext> for Profile {
    fn typename(&self) -> &str {
        "Profile"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        ctx: &'e ExecutionContext<'e, BlogContext>,
    ) -> Result<Resolved<BlogContext>, FieldError> {
        let resolved = match field.name.as_str() {
            "id" => Resolved::value(self.id.to_string()),
            "isMale" => Resolved::value(self.is_male),
            "yearOfBirth" => Resolved::value(self.year_of_birth),
            // Looked up through the profile's user, not through `member_type_id`
            "memberType" => Resolved::optional_object(
                ctx.data
                    .store
                    .member_type_by_profile_user(self.user_id)
                    .await
                    .map_err(BlogExecutionError::from)?,
            ),
            _ => return Err(FieldError::invalid_field(field, "Profile")),
        };

        Ok(resolved)
    }
}

#[async_trait]
impl FieldResolver<BlogContext> for Post {
    fn typename(&self) -> &str {
        "Post"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        _ctx: &'e ExecutionContext<'e, BlogContext>,
    ) -> Result<Resolved<BlogContext>, FieldError> {
        match field.name.as_str() {
            "id" => Ok(Resolved::value(self.id.to_string())),
            "title" => Ok(Resolved::value(self.title.as_str())),
            "content" => Ok(Resolved::value(self.content.as_str())),
            _ => Err(FieldError::invalid_field(field, "Post")),
        }
    }
}

#[async_trait]
impl FieldResolver<BlogContext> for MemberType {
    fn typename(&self) -> &str {
        "MemberType"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        _ctx: &'e ExecutionContext<'e, BlogContext>,
    ) -> Result<Resolved<BlogContext>, FieldError> {
        match field.name.as_str() {
            "id" => Ok(Resolved::value(self.id.as_str())),
            "discount" => Ok(Resolved::value(self.discount)),
            "postsLimitPerMonth" => Ok(Resolved::value(self.posts_limit_per_month)),
            _ => Err(FieldError::invalid_field(field, "MemberType")),
        }
    }
}
