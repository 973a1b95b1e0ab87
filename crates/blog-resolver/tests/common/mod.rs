// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blog_resolver::{BlogContext, create_system_resolver};
use blog_sql::{
    DatabaseError, InMemoryStore, MemberType, MemberTypeId, NewPost, NewProfile, NewUser, Post,
    PostChanges, Profile, ProfileChanges, Store, User, UserChanges,
};
use core_resolver::{OperationsPayload, system_resolver::GraphQLSystemResolver};
use serde_json::Value;
use uuid::Uuid;

/// An in-memory store that records the name of every call and can be told to fail one of them
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryStore,
    calls: Mutex<Vec<&'static str>>,
    failing_call: Mutex<Option<&'static str>>,
}

impl CountingStore {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|call| **call == name).count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn fail(&self, name: &'static str) {
        *self.failing_call.lock().unwrap() = Some(name);
    }

    fn record(&self, name: &'static str) -> Result<(), DatabaseError> {
        self.calls.lock().unwrap().push(name);

        if *self.failing_call.lock().unwrap() == Some(name) {
            Err(DatabaseError::Config(format!("{name} is unavailable")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for CountingStore {
    async fn member_types(&self) -> Result<Vec<MemberType>, DatabaseError> {
        self.record("member_types")?;
        self.inner.member_types().await
    }

    async fn member_type(&self, id: MemberTypeId) -> Result<Option<MemberType>, DatabaseError> {
        self.record("member_type")?;
        self.inner.member_type(id).await
    }

    async fn member_type_by_profile_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MemberType>, DatabaseError> {
        self.record("member_type_by_profile_user")?;
        self.inner.member_type_by_profile_user(user_id).await
    }

    async fn users(&self) -> Result<Vec<User>, DatabaseError> {
        self.record("users")?;
        self.inner.users().await
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        self.record("user")?;
        self.inner.user(id).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        self.record("create_user")?;
        self.inner.create_user(user).await
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        self.record("update_user")?;
        self.inner.update_user(id, changes).await
    }

    async fn delete_user(&self, id: Uuid) -> Result<User, DatabaseError> {
        self.record("delete_user")?;
        self.inner.delete_user(id).await
    }

    async fn profiles(&self) -> Result<Vec<Profile>, DatabaseError> {
        self.record("profiles")?;
        self.inner.profiles().await
    }

    async fn profile(&self, id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        self.record("profile")?;
        self.inner.profile(id).await
    }

    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        self.record("profile_by_user")?;
        self.inner.profile_by_user(user_id).await
    }

    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, DatabaseError> {
        self.record("create_profile")?;
        self.inner.create_profile(profile).await
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Profile, DatabaseError> {
        self.record("update_profile")?;
        self.inner.update_profile(id, changes).await
    }

    async fn delete_profile(&self, id: Uuid) -> Result<Profile, DatabaseError> {
        self.record("delete_profile")?;
        self.inner.delete_profile(id).await
    }

    async fn posts(&self) -> Result<Vec<Post>, DatabaseError> {
        self.record("posts")?;
        self.inner.posts().await
    }

    async fn post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        self.record("post")?;
        self.inner.post(id).await
    }

    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError> {
        self.record("posts_by_author")?;
        self.inner.posts_by_author(author_id).await
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, DatabaseError> {
        self.record("create_post")?;
        self.inner.create_post(post).await
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post, DatabaseError> {
        self.record("update_post")?;
        self.inner.update_post(id, changes).await
    }

    async fn delete_post(&self, id: Uuid) -> Result<Post, DatabaseError> {
        self.record("delete_post")?;
        self.inner.delete_post(id).await
    }

    async fn subscribed_authors(&self, subscriber_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        self.record("subscribed_authors")?;
        self.inner.subscribed_authors(subscriber_id).await
    }

    async fn subscribers(&self, author_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        self.record("subscribers")?;
        self.inner.subscribers(author_id).await
    }

    async fn subscribe(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<User, DatabaseError> {
        self.record("subscribe")?;
        self.inner.subscribe(subscriber_id, author_id).await
    }

    async fn unsubscribe(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
    ) -> Result<User, DatabaseError> {
        self.record("unsubscribe")?;
        self.inner.unsubscribe(subscriber_id, author_id).await
    }
}

pub struct TestApi {
    resolver: GraphQLSystemResolver<BlogContext>,
    context: BlogContext,
    pub store: Arc<CountingStore>,
}

impl TestApi {
    pub fn new() -> Self {
        let store = Arc::new(CountingStore::default());

        Self {
            resolver: create_system_resolver(5, 15, true).unwrap(),
            context: BlogContext::new(store.clone()),
            store,
        }
    }

    /// The response body as a client would see it
    pub async fn execute(&self, query: &str) -> Value {
        self.execute_with_variables(query, None).await
    }

    pub async fn execute_with_variables(&self, query: &str, variables: Option<Value>) -> Value {
        let payload = OperationsPayload {
            operation_name: None,
            query: Some(query.to_string()),
            variables: variables.and_then(|variables| variables.as_object().cloned()),
        };

        match self.resolver.resolve_operations(payload, &self.context).await {
            Ok(response) => response.to_json(),
            Err(error) => error.to_response().to_json(),
        }
    }

    pub async fn create_user(&self, name: &str) -> String {
        let response = self
            .execute(&format!(
                r#"mutation {{ createUser(dto: {{ name: "{name}", balance: 10.5 }}) {{ id }} }}"#
            ))
            .await;

        response["data"]["createUser"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn create_post(&self, author_id: &str, title: &str) -> String {
        let response = self
            .execute(&format!(
                r#"mutation {{
                    createPost(dto: {{ title: "{title}", content: "About {title}", authorId: "{author_id}" }}) {{ id }}
                }}"#
            ))
            .await;

        response["data"]["createPost"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}
