//! Top level subcommands

pub(crate) mod command;
pub(crate) mod graphql;
pub(crate) mod schema;
