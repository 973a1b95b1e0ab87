// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use blog_sql::{
    NewPost, NewProfile, NewUser, PostChanges, ProfileChanges, Store, UserChanges,
};
use core_resolver::{
    ExecutionContext, FieldError, FieldResolver, Resolved, validation::field::ValidatedField,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{BlogContext, BlogExecutionError};

/// Resolver for the `Mutation` root.
///
/// Every mutation is exactly one store call. Create, change and delete return the affected row;
/// change and delete of a missing id fail.
#[derive(Debug)]
pub struct MutationRoot;

#[async_trait]
impl FieldResolver<BlogContext> for MutationRoot {
    fn typename(&self) -> &str {
        "Mutation"
    }

    #[instrument(name = "MutationRoot::resolve_field", skip_all, fields(field = %field.name))]
    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        ctx: &'e ExecutionContext<'e, BlogContext>,
    ) -> Result<Resolved<BlogContext>, FieldError> {
        Ok(resolve_mutation(field, ctx.data.store.as_ref()).await?)
    }
}

async fn resolve_mutation(
    field: &ValidatedField,
    store: &dyn Store,
) -> Result<Resolved<BlogContext>, BlogExecutionError> {
    let id = || field.argument::<Uuid>("id");

    Ok(match field.name.as_str() {
        "createUser" => {
            let dto: NewUser = field.argument("dto")?;
            Resolved::object(store.create_user(dto).await?)
        }
        "createProfile" => {
            let dto: NewProfile = field.argument("dto")?;
            Resolved::object(store.create_profile(dto).await?)
        }
        "createPost" => {
            let dto: NewPost = field.argument("dto")?;
            Resolved::object(store.create_post(dto).await?)
        }
        "changeUser" => {
            let dto: UserChanges = field.argument("dto")?;
            Resolved::object(store.update_user(id()?, dto).await?)
        }
        "changeProfile" => {
            let dto: ProfileChanges = field.argument("dto")?;
            Resolved::object(store.update_profile(id()?, dto).await?)
        }
        "changePost" => {
            let dto: PostChanges = field.argument("dto")?;
            Resolved::object(store.update_post(id()?, dto).await?)
        }
        "deleteUser" => Resolved::object(store.delete_user(id()?).await?),
        "deleteProfile" => Resolved::object(store.delete_profile(id()?).await?),
        "deletePost" => Resolved::object(store.delete_post(id()?).await?),
        "subscribeTo" => {
            let (user_id, author_id) = subscription_arguments(field)?;
            Resolved::object(store.subscribe(user_id, author_id).await?)
        }
        "unsubscribeFrom" => {
            let (user_id, author_id) = subscription_arguments(field)?;
            Resolved::object(store.unsubscribe(user_id, author_id).await?)
        }
        _ => return Err(FieldError::invalid_field(field, "Mutation").into()),
    })
}

fn subscription_arguments(field: &ValidatedField) -> Result<(Uuid, Uuid), FieldError> {
    Ok((field.argument("userId")?, field.argument("authorId")?))
}
