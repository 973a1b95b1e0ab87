// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use blog_sql::Store;
use core_resolver::{
    ExecutionContext, FieldError, FieldResolver, Resolved, validation::field::ValidatedField,
};
use tracing::instrument;

use crate::{BlogContext, BlogExecutionError};

/// Resolver for the `Query` root. Each field is a single store call.
#[derive(Debug)]
pub struct QueryRoot;

#[async_trait]
impl FieldResolver<BlogContext> for QueryRoot {
    fn typename(&self) -> &str {
        "Query"
    }

    #[instrument(name = "QueryRoot::resolve_field", skip_all, fields(field = %field.name))]
    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        ctx: &'e ExecutionContext<'e, BlogContext>,
    ) -> Result<Resolved<BlogContext>, FieldError> {
        Ok(resolve_query(field, ctx.data.store.as_ref()).await?)
    }
}

async fn resolve_query(
    field: &ValidatedField,
    store: &dyn Store,
) -> Result<Resolved<BlogContext>, BlogExecutionError> {
    Ok(match field.name.as_str() {
        "memberTypes" => Resolved::objects(store.member_types().await?),
        "memberType" => Resolved::optional_object(store.member_type(field.argument("id")?).await?),
        "users" => Resolved::objects(store.users().await?),
        "user" => Resolved::optional_object(store.user(field.argument("id")?).await?),
        "posts" => Resolved::objects(store.posts().await?),
        "post" => Resolved::optional_object(store.post(field.argument("id")?).await?),
        "profiles" => Resolved::objects(store.profiles().await?),
        "profile" => Resolved::optional_object(store.profile(field.argument("id")?).await?),
        _ => return Err(FieldError::invalid_field(field, "Query").into()),
    })
}
