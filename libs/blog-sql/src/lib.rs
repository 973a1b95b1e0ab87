// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Relational storage for the blog data model.
//!
//! [`Store`] is the only seam the resolvers see. [`PostgresStore`] backs it with a pooled
//! PostgreSQL connection and [`InMemoryStore`] keeps the same integrity rules (unique profile per
//! user, foreign keys, cascading user deletion) in process memory.

mod database_error;
mod memory;
mod model;
mod postgres;
mod store;

pub use database_error::{DatabaseError, WithContext};
pub use memory::InMemoryStore;
pub use model::{
    MemberType, MemberTypeId, NewPost, NewProfile, NewUser, Post, PostChanges, Profile,
    ProfileChanges, User, UserChanges,
};
pub use postgres::{DatabasePool, PostgresConfig, PostgresStore, SCHEMA_SQL};
pub use store::Store;
