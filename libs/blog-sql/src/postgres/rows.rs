// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tokio_postgres::Row;

use crate::{DatabaseError, MemberType, MemberTypeId, Post, Profile, User};

fn member_type_id(row: &Row, column: &str) -> Result<MemberTypeId, DatabaseError> {
    let value: String = row.try_get(column)?;
    value.parse().map_err(DatabaseError::Validation)
}

impl TryFrom<&Row> for MemberType {
    type Error = DatabaseError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(MemberType {
            id: member_type_id(row, "id")?,
            discount: row.try_get("discount")?,
            posts_limit_per_month: row.try_get("posts_limit_per_month")?,
        })
    }
}

impl TryFrom<&Row> for User {
    type Error = DatabaseError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            balance: row.try_get("balance")?,
        })
    }
}

impl TryFrom<&Row> for Profile {
    type Error = DatabaseError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: row.try_get("id")?,
            is_male: row.try_get("is_male")?,
            year_of_birth: row.try_get("year_of_birth")?,
            user_id: row.try_get("user_id")?,
            member_type_id: member_type_id(row, "member_type_id")?,
        })
    }
}

impl TryFrom<&Row> for Post {
    type Error = DatabaseError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Post {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            author_id: row.try_get("author_id")?,
        })
    }
}
