// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    DatabaseError, MemberType, MemberTypeId, NewPost, NewProfile, NewUser, Post, PostChanges,
    Profile, ProfileChanges, User, UserChanges,
};

/// Access to the relational data behind the API.
///
/// Every method is a single round trip. Lookups return `None` for a missing key, while updates
/// and deletes of a missing key fail with [`DatabaseError::NotFound`]. List order is whatever
/// the implementation produces.
#[async_trait]
pub trait Store: Send + Sync {
    async fn member_types(&self) -> Result<Vec<MemberType>, DatabaseError>;
    async fn member_type(&self, id: MemberTypeId) -> Result<Option<MemberType>, DatabaseError>;
    /// The member type of the profile owned by `user_id`.
    async fn member_type_by_profile_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MemberType>, DatabaseError>;

    async fn users(&self) -> Result<Vec<User>, DatabaseError>;
    async fn user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError>;
    /// Deletes the user together with its profile, posts and subscription edges.
    async fn delete_user(&self, id: Uuid) -> Result<User, DatabaseError>;

    async fn profiles(&self) -> Result<Vec<Profile>, DatabaseError>;
    async fn profile(&self, id: Uuid) -> Result<Option<Profile>, DatabaseError>;
    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError>;
    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, DatabaseError>;
    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Profile, DatabaseError>;
    async fn delete_profile(&self, id: Uuid) -> Result<Profile, DatabaseError>;

    async fn posts(&self) -> Result<Vec<Post>, DatabaseError>;
    async fn post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError>;
    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError>;
    async fn create_post(&self, post: NewPost) -> Result<Post, DatabaseError>;
    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post, DatabaseError>;
    async fn delete_post(&self, id: Uuid) -> Result<Post, DatabaseError>;

    /// Authors `subscriber_id` is subscribed to.
    async fn subscribed_authors(&self, subscriber_id: Uuid) -> Result<Vec<User>, DatabaseError>;
    /// Users subscribed to `author_id`.
    async fn subscribers(&self, author_id: Uuid) -> Result<Vec<User>, DatabaseError>;
    /// Records the edge and returns the subscriber.
    async fn subscribe(&self, subscriber_id: Uuid, author_id: Uuid)
    -> Result<User, DatabaseError>;
    /// Removes the edge and returns the subscriber.
    async fn unsubscribe(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
    ) -> Result<User, DatabaseError>;
}
