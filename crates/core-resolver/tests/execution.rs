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
use serde_json::{Value, json};
use test_log::test;

use core_resolver::{
    ExecutionContext, FieldError, FieldResolver, OperationsPayload, QueryResponse, Resolved,
    Schema, system_resolver::GraphQLSystemResolver,
    system_resolver::SystemResolutionError, validation::field::ValidatedField,
};

const SDL: &str = r#"
type Query {
  artist(id: Int!): Artist
  artists: [Artist!]!
  failing: String
  strictFailing: String!
  echo(text: String!, times: Int = 1): [String!]!
}

type Mutation {
  append(value: String!): [String!]!
}

"A performer"
type Artist {
  id: Int!
  name: String!
  albums: [Album!]!
  broken: String!
  legacyName: String @deprecated(reason: "Use `name`")
}

type Album {
  title: String!
}
"#;

#[derive(Default)]
struct Catalog {
    log: Mutex<Vec<String>>,
}

#[derive(Debug)]
struct QueryRoot;

#[derive(Debug)]
struct MutationRoot;

#[derive(Debug)]
struct Artist {
    id: i64,
    name: &'static str,
}

#[derive(Debug)]
struct Album(String);

fn artist(id: i64) -> Option<Artist> {
    match id {
        1 => Some(Artist { id, name: "Nina" }),
        2 => Some(Artist { id, name: "Ella" }),
        // An id that cannot be represented as a 32-bit Int
        3 => Some(Artist {
            id: 1 << 40,
            name: "Overflow",
        }),
        _ => None,
    }
}

#[async_trait]
impl FieldResolver<Catalog> for QueryRoot {
    fn typename(&self) -> &str {
        "Query"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        _ctx: &'e ExecutionContext<'e, Catalog>,
    ) -> Result<Resolved<Catalog>, FieldError> {
        match field.name.as_str() {
            "artist" => Ok(Resolved::optional_object(artist(field.argument("id")?))),
            "artists" => Ok(Resolved::objects([1, 2].into_iter().filter_map(artist))),
            "failing" | "strictFailing" => {
                Err(FieldError::UserDisplayError("Not today".to_string()))
            }
            "echo" => {
                let text: String = field.argument("text")?;
                let times: usize = field.argument("times")?;
                Ok(Resolved::value(vec![text; times]))
            }
            _ => Err(FieldError::invalid_field(field, "Query")),
        }
    }
}

#[async_trait]
impl FieldResolver<Catalog> for MutationRoot {
    fn typename(&self) -> &str {
        "Mutation"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        ctx: &'e ExecutionContext<'e, Catalog>,
    ) -> Result<Resolved<Catalog>, FieldError> {
        match field.name.as_str() {
            "append" => {
                let value: String = field.argument("value")?;
                // Give later fields a chance to overtake this one if they were run concurrently
                tokio::task::yield_now().await;
                let mut log = ctx.data.log.lock().unwrap();
                log.push(value);
                Ok(Resolved::value(log.clone()))
            }
            _ => Err(FieldError::invalid_field(field, "Mutation")),
        }
    }
}

#[async_trait]
impl FieldResolver<Catalog> for Artist {
    fn typename(&self) -> &str {
        "Artist"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        _ctx: &'e ExecutionContext<'e, Catalog>,
    ) -> Result<Resolved<Catalog>, FieldError> {
        match field.name.as_str() {
            "id" => Ok(Resolved::value(self.id)),
            "name" => Ok(Resolved::value(self.name)),
            "legacyName" => Ok(Resolved::value(self.name.to_uppercase())),
            "albums" => Ok(Resolved::objects(
                (1..=2).map(|n| Album(format!("{} vol. {n}", self.name))),
            )),
            "broken" => Ok(Resolved::Null),
            _ => Err(FieldError::invalid_field(field, "Artist")),
        }
    }
}

#[async_trait]
impl FieldResolver<Catalog> for Album {
    fn typename(&self) -> &str {
        "Album"
    }

    async fn resolve_field<'e>(
        &'e self,
        field: &'e ValidatedField,
        _ctx: &'e ExecutionContext<'e, Catalog>,
    ) -> Result<Resolved<Catalog>, FieldError> {
        match field.name.as_str() {
            "title" => Ok(Resolved::value(self.0.clone())),
            _ => Err(FieldError::invalid_field(field, "Album")),
        }
    }
}

fn system_resolver(depth_limit: usize, introspection_enabled: bool) -> GraphQLSystemResolver<Catalog> {
    let schema = Schema::new(SDL, vec![]).unwrap();

    GraphQLSystemResolver::new(
        Arc::new(schema),
        Arc::new(QueryRoot),
        Arc::new(MutationRoot),
        depth_limit,
        15,
        introspection_enabled,
    )
}

async fn run(
    resolver: &GraphQLSystemResolver<Catalog>,
    catalog: &Catalog,
    query: &str,
    variables: Option<Value>,
) -> Result<QueryResponse, SystemResolutionError> {
    let payload = OperationsPayload {
        operation_name: None,
        query: Some(query.to_string()),
        variables: variables.and_then(|v| v.as_object().cloned()),
    };

    resolver.resolve_operations(payload, catalog).await
}

async fn execute(query: &str) -> Value {
    let resolver = system_resolver(5, true);
    run(&resolver, &Catalog::default(), query, None)
        .await
        .unwrap()
        .to_json()
}

#[test(tokio::test)]
async fn aliases_typename_and_fragments() {
    let response = execute(
        r#"
        query {
          first: artist(id: 1) { __typename ...details }
          second: artist(id: 2) { ... on Artist { name } }
          missing: artist(id: 42) { name }
        }

        fragment details on Artist {
          id
          name
          albums { title }
        }
        "#,
    )
    .await;

    assert_eq!(
        response,
        json!({
            "data": {
                "first": {
                    "__typename": "Artist",
                    "id": 1,
                    "name": "Nina",
                    "albums": [{ "title": "Nina vol. 1" }, { "title": "Nina vol. 2" }]
                },
                "second": { "name": "Ella" },
                "missing": null
            }
        })
    );
}

#[test(tokio::test)]
async fn argument_defaults_and_variables() {
    let resolver = system_resolver(5, true);
    let response = run(
        &resolver,
        &Catalog::default(),
        r#"query($text: String!) { once: echo(text: $text) twice: echo(text: $text, times: 2) }"#,
        Some(json!({ "text": "hi" })),
    )
    .await
    .unwrap();

    assert_eq!(
        response.to_json(),
        json!({ "data": { "once": ["hi"], "twice": ["hi", "hi"] } })
    );
}

#[test(tokio::test)]
async fn failing_nullable_field_becomes_null() {
    let response = execute("{ failing artist(id: 1) { name } }").await;

    assert_eq!(
        response,
        json!({
            "data": { "failing": null, "artist": { "name": "Nina" } },
            "errors": [{
                "message": "Not today",
                "locations": [{ "line": 1, "column": 3 }],
                "path": ["failing"]
            }]
        })
    );
}

#[test(tokio::test)]
async fn failing_non_null_root_field_nulls_data() {
    let response = execute("{ strictFailing artist(id: 1) { name } }").await;

    assert_eq!(response["data"], Value::Null);
    assert_eq!(response["errors"].as_array().unwrap().len(), 1);
    assert_eq!(response["errors"][0]["path"], json!(["strictFailing"]));
}

#[test(tokio::test)]
async fn null_propagates_to_nearest_nullable_ancestor() {
    let response = execute("{ artist(id: 1) { name broken } }").await;

    assert_eq!(
        response,
        json!({
            "data": { "artist": null },
            "errors": [{
                "message": "Cannot return null for non-nullable field Artist.broken",
                "locations": [{ "line": 1, "column": 24 }],
                "path": ["artist", "broken"]
            }]
        })
    );
}

#[test(tokio::test)]
async fn null_propagates_through_non_null_lists() {
    // `artists: [Artist!]!` has no nullable position between `broken` and the root
    let response = execute("{ artists { broken } }").await;

    assert_eq!(response["data"], Value::Null);

    let mut paths = response["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["path"].clone())
        .collect::<Vec<_>>();
    paths.sort_by_key(|path| path.to_string());

    assert_eq!(
        paths,
        vec![json!(["artists", 0, "broken"]), json!(["artists", 1, "broken"])]
    );
}

#[test(tokio::test)]
async fn scalar_serialization_failure_is_a_field_error() {
    let response = execute("{ artist(id: 3) { name id } }").await;

    assert_eq!(response["data"], json!({ "artist": null }));
    insta::assert_snapshot!(
        response["errors"][0]["message"].as_str().unwrap(),
        @"Int cannot represent value: 1099511627776"
    );
    assert_eq!(response["errors"][0]["path"], json!(["artist", "id"]));
}

#[test(tokio::test)]
async fn mutations_run_serially_in_document_order() {
    let resolver = system_resolver(5, true);
    let catalog = Catalog::default();

    let response = run(
        &resolver,
        &catalog,
        r#"mutation { a: append(value: "a") b: append(value: "b") c: append(value: "c") }"#,
        None,
    )
    .await
    .unwrap();

    assert_eq!(
        response.to_json(),
        json!({
            "data": {
                "a": ["a"],
                "b": ["a", "b"],
                "c": ["a", "b", "c"]
            }
        })
    );
}

#[test(tokio::test)]
async fn validation_failure_runs_no_resolver() {
    let resolver = system_resolver(5, true);
    let catalog = Catalog::default();

    let error = run(
        &resolver,
        &catalog,
        r#"mutation { append(value: "a") append(value: "b") }"#,
        None,
    )
    .await
    .unwrap_err();

    insta::assert_snapshot!(
        error.user_error_message(),
        @"Fields 'append' conflict because they have differing names or arguments"
    );
    assert!(catalog.log.lock().unwrap().is_empty());

    assert_eq!(
        error.to_response().to_json(),
        json!({
            "errors": [{
                "message": "Fields 'append' conflict because they have differing names or arguments",
                "locations": [{ "line": 1, "column": 12 }, { "line": 1, "column": 31 }]
            }]
        })
    );
}

#[test(tokio::test)]
async fn depth_limit() {
    let resolver = system_resolver(1, true);
    let catalog = Catalog::default();

    let missing_selection = run(&resolver, &catalog, "{ artists { albums } }", None).await;
    // `albums` requires a selection, so this fails for a different reason
    assert!(missing_selection.is_err());

    let ok = run(&resolver, &catalog, "{ artists { name } }", None)
        .await
        .unwrap();
    assert!(ok.errors.is_empty());

    let too_deep = run(&resolver, &catalog, "{ artists { albums { title } } }", None)
        .await
        .unwrap_err();
    insta::assert_snapshot!(too_deep.user_error_message(), @"Selection set too deep");
}

#[test(tokio::test)]
async fn missing_query() {
    let resolver = system_resolver(5, true);
    let payload = OperationsPayload {
        operation_name: None,
        query: None,
        variables: None,
    };

    let error = resolver
        .resolve_operations(payload, &Catalog::default())
        .await
        .unwrap_err();

    assert_eq!(error.user_error_message(), "Missing query");
}

#[test(tokio::test)]
async fn syntax_error() {
    let resolver = system_resolver(5, true);
    let error = run(&resolver, &Catalog::default(), "{ artists { name }", None)
        .await
        .unwrap_err();

    assert!(error.user_error_message().starts_with("Syntax error"));
    assert!(!error.to_response().errors[0].locations.is_empty());
}

#[test(tokio::test)]
async fn type_introspection() {
    let response = execute(
        r#"
        {
          __type(name: "Artist") {
            kind
            name
            description
            fields {
              name
              type { kind name ofType { kind name ofType { name } } }
            }
          }
          unknown: __type(name: "Nope") { name }
        }
        "#,
    )
    .await;

    assert_eq!(
        response,
        json!({
            "data": {
                "__type": {
                    "kind": "OBJECT",
                    "name": "Artist",
                    "description": "A performer",
                    "fields": [
                        {
                            "name": "id",
                            "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "Int", "ofType": null } }
                        },
                        {
                            "name": "name",
                            "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "String", "ofType": null } }
                        },
                        {
                            "name": "albums",
                            "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "LIST", "name": null, "ofType": { "name": null } } }
                        },
                        {
                            "name": "broken",
                            "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "String", "ofType": null } }
                        }
                    ]
                },
                "unknown": null
            }
        })
    );
}

#[test(tokio::test)]
async fn deprecated_fields_on_request() {
    let response = execute(
        r#"
        {
          __type(name: "Artist") {
            fields(includeDeprecated: true) { name isDeprecated deprecationReason }
          }
        }
        "#,
    )
    .await;

    let fields = response["data"]["__type"]["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 5);
    assert_eq!(
        fields[4],
        json!({ "name": "legacyName", "isDeprecated": true, "deprecationReason": "Use `name`" })
    );
}

#[test(tokio::test)]
async fn schema_introspection() {
    let response = execute(
        r#"
        {
          __schema {
            queryType { name }
            mutationType { name }
            subscriptionType { name }
            types { name }
            directives { name locations args { name defaultValue } }
          }
        }
        "#,
    )
    .await;

    let schema = &response["data"]["__schema"];
    assert_eq!(schema["queryType"], json!({ "name": "Query" }));
    assert_eq!(schema["mutationType"], json!({ "name": "Mutation" }));
    assert_eq!(schema["subscriptionType"], Value::Null);

    let type_names = schema["types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    for expected in ["Query", "Mutation", "Artist", "Album", "Int", "String", "__Schema", "__Type"] {
        assert!(type_names.contains(&expected), "missing type {expected}");
    }

    let deprecated = schema["directives"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["name"] == "deprecated")
        .unwrap();
    assert_eq!(
        deprecated["args"],
        json!([{ "name": "reason", "defaultValue": "\"No longer supported\"" }])
    );
    assert_eq!(
        deprecated["locations"],
        json!(["FIELD_DEFINITION", "ARGUMENT_DEFINITION", "INPUT_FIELD_DEFINITION", "ENUM_VALUE"])
    );
}

#[test(tokio::test)]
async fn introspection_can_be_disabled() {
    let resolver = system_resolver(5, false);
    let error = run(&resolver, &Catalog::default(), "{ __schema { types { name } } }", None)
        .await
        .unwrap_err();

    insta::assert_snapshot!(error.user_error_message(), @"Introspection is not enabled");

    // `__typename` is not introspection
    let response = run(&resolver, &Catalog::default(), "{ __typename }", None)
        .await
        .unwrap();
    assert_eq!(response.to_json(), json!({ "data": { "__typename": "Query" } }));
}

#[test(tokio::test)]
async fn introspection_has_its_own_depth_limit() {
    // The normal limit would reject this query
    let resolver = system_resolver(2, true);
    let response = run(
        &resolver,
        &Catalog::default(),
        "{ __type(name: \"Artist\") { fields { type { ofType { name } } } } }",
        None,
    )
    .await
    .unwrap();

    assert!(response.errors.is_empty());
}
