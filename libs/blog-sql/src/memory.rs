// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use indexmap::{IndexMap, IndexSet};
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    DatabaseError, MemberType, MemberTypeId, NewPost, NewProfile, NewUser, Post, PostChanges,
    Profile, ProfileChanges, Store, User, UserChanges,
};

#[derive(Debug)]
struct Tables {
    member_types: IndexMap<MemberTypeId, MemberType>,
    users: IndexMap<Uuid, User>,
    profiles: IndexMap<Uuid, Profile>,
    posts: IndexMap<Uuid, Post>,
    /// (subscriber_id, author_id)
    subscriptions: IndexSet<(Uuid, Uuid)>,
}

/// A store kept in process memory, seeded with the member types.
///
/// Rows are listed in insertion order.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        let member_types = MemberType::seeds()
            .into_iter()
            .map(|member_type| (member_type.id, member_type))
            .collect();

        Self {
            tables: RwLock::new(Tables {
                member_types,
                users: IndexMap::new(),
                profiles: IndexMap::new(),
                posts: IndexMap::new(),
                subscriptions: IndexSet::new(),
            }),
        }
    }
}

impl Tables {
    fn users_by_ids(&self, ids: impl Iterator<Item = Uuid>) -> Vec<User> {
        ids.filter_map(|id| self.users.get(&id).cloned()).collect()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn member_types(&self) -> Result<Vec<MemberType>, DatabaseError> {
        Ok(self.tables.read().await.member_types.values().cloned().collect())
    }

    async fn member_type(&self, id: MemberTypeId) -> Result<Option<MemberType>, DatabaseError> {
        Ok(self.tables.read().await.member_types.get(&id).cloned())
    }

    async fn member_type_by_profile_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MemberType>, DatabaseError> {
        let tables = self.tables.read().await;

        Ok(tables
            .profiles
            .values()
            .find(|profile| profile.user_id == user_id)
            .and_then(|profile| tables.member_types.get(&profile.member_type_id))
            .cloned())
    }

    async fn users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            balance: user.balance,
        };
        self.tables
            .write()
            .await
            .users
            .insert(user.id, user.clone());
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::not_found("User", id))?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(balance) = changes.balance {
            user.balance = balance;
        }
        Ok(user.clone())
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: Uuid) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .shift_remove(&id)
            .ok_or_else(|| DatabaseError::not_found("User", id))?;

        tables.profiles.retain(|_, profile| profile.user_id != id);
        tables.posts.retain(|_, post| post.author_id != id);
        tables
            .subscriptions
            .retain(|(subscriber_id, author_id)| *subscriber_id != id && *author_id != id);

        Ok(user)
    }

    async fn profiles(&self) -> Result<Vec<Profile>, DatabaseError> {
        Ok(self.tables.read().await.profiles.values().cloned().collect())
    }

    async fn profile(&self, id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .profiles
            .values()
            .find(|profile| profile.user_id == user_id)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, DatabaseError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&profile.user_id)
            || !tables.member_types.contains_key(&profile.member_type_id)
        {
            return Err(DatabaseError::missing_profile_reference(
                profile.user_id,
                profile.member_type_id,
            ));
        }
        if tables
            .profiles
            .values()
            .any(|existing| existing.user_id == profile.user_id)
        {
            return Err(DatabaseError::duplicate_profile(profile.user_id));
        }

        let profile = Profile {
            id: Uuid::new_v4(),
            is_male: profile.is_male,
            year_of_birth: profile.year_of_birth,
            user_id: profile.user_id,
            member_type_id: profile.member_type_id,
        };
        tables.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    #[instrument(skip(self))]
    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Profile, DatabaseError> {
        let mut tables = self.tables.write().await;

        if let Some(member_type_id) = changes.member_type_id
            && !tables.member_types.contains_key(&member_type_id)
        {
            return Err(DatabaseError::missing_member_type(member_type_id));
        }

        let profile = tables
            .profiles
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::not_found("Profile", id))?;

        if let Some(is_male) = changes.is_male {
            profile.is_male = is_male;
        }
        if let Some(year_of_birth) = changes.year_of_birth {
            profile.year_of_birth = year_of_birth;
        }
        if let Some(member_type_id) = changes.member_type_id {
            profile.member_type_id = member_type_id;
        }
        Ok(profile.clone())
    }

    #[instrument(skip(self))]
    async fn delete_profile(&self, id: Uuid) -> Result<Profile, DatabaseError> {
        self.tables
            .write()
            .await
            .profiles
            .shift_remove(&id)
            .ok_or_else(|| DatabaseError::not_found("Profile", id))
    }

    async fn posts(&self) -> Result<Vec<Post>, DatabaseError> {
        Ok(self.tables.read().await.posts.values().cloned().collect())
    }

    async fn post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .posts
            .values()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn create_post(&self, post: NewPost) -> Result<Post, DatabaseError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&post.author_id) {
            return Err(DatabaseError::missing_author(post.author_id));
        }

        let post = Post {
            id: Uuid::new_v4(),
            title: post.title,
            content: post.content,
            author_id: post.author_id,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    #[instrument(skip(self))]
    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post, DatabaseError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::not_found("Post", id))?;

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        Ok(post.clone())
    }

    #[instrument(skip(self))]
    async fn delete_post(&self, id: Uuid) -> Result<Post, DatabaseError> {
        self.tables
            .write()
            .await
            .posts
            .shift_remove(&id)
            .ok_or_else(|| DatabaseError::not_found("Post", id))
    }

    async fn subscribed_authors(&self, subscriber_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let tables = self.tables.read().await;
        let author_ids = tables
            .subscriptions
            .iter()
            .filter(|(subscriber, _)| *subscriber == subscriber_id)
            .map(|(_, author)| *author);

        Ok(tables.users_by_ids(author_ids))
    }

    async fn subscribers(&self, author_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let tables = self.tables.read().await;
        let subscriber_ids = tables
            .subscriptions
            .iter()
            .filter(|(_, author)| *author == author_id)
            .map(|(subscriber, _)| *subscriber);

        Ok(tables.users_by_ids(subscriber_ids))
    }

    #[instrument(skip(self))]
    async fn subscribe(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
    ) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;

        let subscriber = match (
            tables.users.get(&subscriber_id),
            tables.users.contains_key(&author_id),
        ) {
            (Some(subscriber), true) => subscriber.clone(),
            _ => return Err(DatabaseError::missing_subscription_user(subscriber_id, author_id)),
        };

        if !tables.subscriptions.insert((subscriber_id, author_id)) {
            return Err(DatabaseError::duplicate_subscription(
                subscriber_id,
                author_id,
            ));
        }
        Ok(subscriber)
    }

    #[instrument(skip(self))]
    async fn unsubscribe(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
    ) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;

        if !tables.subscriptions.shift_remove(&(subscriber_id, author_id)) {
            return Err(DatabaseError::subscription_not_found(
                subscriber_id,
                author_id,
            ));
        }
        tables
            .users
            .get(&subscriber_id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("User", subscriber_id))
    }
}
