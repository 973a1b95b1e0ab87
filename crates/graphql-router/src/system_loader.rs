// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use blog_env::{EnvError, Environment};
use blog_resolver::BlogContext;
use common::env_const::{get_max_selection_depth, is_introspection_enabled};
use core_resolver::{schema::SchemaError, system_resolver::GraphQLSystemResolver};
use thiserror::Error;

pub struct SystemLoader;

impl SystemLoader {
    pub fn create_system_resolver(
        env: &dyn Environment,
    ) -> Result<GraphQLSystemResolver<BlogContext>, SystemLoadingError> {
        let (normal_query_depth_limit, introspection_query_depth_limit) = query_depth_limits(env)?;

        Ok(blog_resolver::create_system_resolver(
            normal_query_depth_limit,
            introspection_query_depth_limit,
            is_introspection_enabled(env)?,
        )?)
    }
}

/// Returns the maximum depth of a selection set for normal queries and introspection queries. We
/// hard-code the introspection query depth to 15 to accommodate the query invoked by GraphQL
/// tools such as GraphiQL
pub fn query_depth_limits(env: &dyn Environment) -> Result<(usize, usize), SystemLoadingError> {
    const DEFAULT_INTROSPECTION_QUERY_DEPTH: usize = 15;

    Ok((
        get_max_selection_depth(env)?,
        DEFAULT_INTROSPECTION_QUERY_DEPTH,
    ))
}

#[derive(Error, Debug)]
pub enum SystemLoadingError {
    #[error("{0}")]
    Config(#[from] EnvError),

    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),
}

#[cfg(test)]
mod tests {
    use blog_env::MapEnvironment;
    use common::env_const::BLOG_MAX_SELECTION_DEPTH;

    use super::*;

    #[test]
    fn default_depth_limits() {
        let env = MapEnvironment::new();
        assert_eq!(query_depth_limits(&env).unwrap(), (5, 15));
    }

    #[test]
    fn depth_limit_from_env() {
        let env = MapEnvironment::from([(BLOG_MAX_SELECTION_DEPTH, "8")]);
        assert_eq!(query_depth_limits(&env).unwrap(), (8, 15));

        let env = MapEnvironment::from([(BLOG_MAX_SELECTION_DEPTH, "deep")]);
        assert!(matches!(
            query_depth_limits(&env),
            Err(SystemLoadingError::Config(_))
        ));
    }

    #[test]
    fn blog_system_resolver_loads() {
        let env = MapEnvironment::new();
        assert!(SystemLoader::create_system_resolver(&env).is_ok());
    }
}
