// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::validation::validation_error::ValidationError;
use async_graphql_parser::types::{DocumentOperations, ExecutableDocument};
use async_graphql_value::Name;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::schema::Schema;

use super::{operation::ValidatedOperation, operation_validator::OperationValidator};

/// Context for validating a document.
pub struct DocumentValidator<'a> {
    schema: &'a Schema,
    operation_name: Option<String>,
    variables: Option<Map<String, Value>>,
    normal_query_depth_limit: usize,
    introspection_query_depth_limit: usize,
    introspection_enabled: bool,
}

impl<'a> DocumentValidator<'a> {
    pub fn new(
        schema: &'a Schema,
        operation_name: Option<String>,
        variables: Option<Map<String, Value>>,
        normal_query_depth_limit: usize,
        introspection_query_depth_limit: usize,
        introspection_enabled: bool,
    ) -> Self {
        Self {
            schema,
            operation_name,
            variables,
            normal_query_depth_limit,
            introspection_query_depth_limit,
            introspection_enabled,
        }
    }

    /// Validate the query payload.
    ///
    /// Validations performed:
    /// - Validate that either there is only one operation or the operation name specified matches one of the operations in the document
    /// - Validate that there is at least one operation
    /// - Other validations are delegated to the operation validator
    #[instrument(
        name = "DocumentValidator::validate"
        skip(self, document)
        )]
    pub fn validate(
        self,
        document: ExecutableDocument,
    ) -> Result<ValidatedOperation, ValidationError> {
        let (operation_name, raw_operation) = match document.operations {
            // A single operation is anonymous (see below), so no `operationName` can match it
            DocumentOperations::Single(operation) => match self.operation_name {
                Some(operation_name) => Err(
                    ValidationError::MultipleOperationsUnmatchedOperationName(operation_name),
                ),
                None => Ok((None, operation)),
            },
            DocumentOperations::Multiple(mut operations) => {
                match self.operation_name {
                    None if operations.len() == 1 => {
                        // `operationName` is required only for multiple operations, but
                        // async-graphql parses a named operation (`query Foo { ... }`) to
                        // `DocumentOperations::Multiple` even if there is only one operation.
                        match operations.drain().next() {
                            Some((operation_name, operation)) => {
                                Ok((Some(operation_name.to_string()), operation))
                            }
                            None => Err(ValidationError::NoOperationFound),
                        }
                    }
                    None if operations.is_empty() => Err(ValidationError::NoOperationFound),
                    None => Err(ValidationError::MultipleOperationsNoOperationName),
                    Some(operation_name) => {
                        let operation = operations.remove(&Name::new(&operation_name));

                        match operation {
                            None => Err(ValidationError::MultipleOperationsUnmatchedOperationName(
                                operation_name,
                            )),
                            Some(operation) => Ok((Some(operation_name), operation)),
                        }
                    }
                }
            }
        }?;

        let operation_validator = OperationValidator::new(
            self.schema,
            operation_name,
            self.variables,
            document.fragments,
            self.normal_query_depth_limit,
            self.introspection_query_depth_limit,
            self.introspection_enabled,
        );

        operation_validator.validate(raw_operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_graphql_parser::parse_query;
    use serde_json::json;

    use crate::validation::field::ValidatedField;

    #[test]
    fn argument_valid() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
                concert(id: 1) {
                    id
                    title
                    venue {
                        id
                        name
                    }
                }
            }
        "#;

        let operation = validator.validate(create_query_document(query)).unwrap();
        assert_eq!(operation.name, None);
        insta::assert_snapshot!(selection_tree(&operation.fields), @"concert(id: 1) { id title venue { id name } }");
    }

    #[test]
    fn with_operation_name_valid() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query ConcertById {
                concert(id: 1) {
                    id
                }
            }
        "#;

        let operation = validator.validate(create_query_document(query)).unwrap();
        assert_eq!(operation.name.as_deref(), Some("ConcertById"));
    }

    #[test]
    fn stray_argument_invalid() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
                concert(id: 1, foo: "bar") { # foo is not a valid argument
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @r#"Argument(s) '["foo"]' invalid for 'concert'"#);
    }

    #[test]
    fn unspecified_required_argument_invalid() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
                concert { # id argument is required here
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Required argument 'id' not found");
    }

    #[test]
    fn variable_resolution_valid() {
        let schema = create_test_schema();

        let variables = create_variables(json!({ "concert_id": 1, "venue_id": 2 }));

        let validator = DocumentValidator::new(&schema, None, Some(variables), 10, 10, true);

        let query = r#"
            query($concert_id: Int!, $venue_id: Int!) {
                concert(id: $concert_id) {
                    id
                    title
                }
                venue(id: $venue_id) {
                    id
                    name
                }
            }
        "#;

        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @"concert(id: 1) { id title } venue(id: 2) { id name }");
    }

    #[test]
    fn variable_resolution_invalid() {
        let schema = create_test_schema();

        let variables = create_variables(json!({ "concert_id": 2 }));
        let validator = DocumentValidator::new(&schema, None, Some(variables), 10, 10, true);

        let query = r#"
            query($concert_id: Int!, $venue_id: Int!) { # venue_id is not a specified in variables
                concert(id: $concert_id) {
                    id
                }
                venue(id: $venue_id) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Variable 'venue_id' not found");
    }

    #[test]
    fn variable_value_must_match_declared_type() {
        let schema = create_test_schema();

        let variables = create_variables(json!({ "concert_id": "one" }));
        let validator = DocumentValidator::new(&schema, None, Some(variables), 10, 10, true);

        let query = r#"
            query($concert_id: Int!) {
                concert(id: $concert_id) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Variable 'concert_id' is not of a valid type. Expected 'Int!': Int cannot represent a String value");

        // Checked even if the variable is never used
        let variables = create_variables(json!({ "concert_id": 1, "unused": [1] }));
        let validator = DocumentValidator::new(&schema, None, Some(variables), 10, 10, true);

        let query = r#"
            query($concert_id: Int!, $unused: Boolean) {
                concert(id: $concert_id) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Variable 'unused' is not of a valid type. Expected 'Boolean': Boolean cannot represent a List value");

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query($limit: Int = "ten") {
                concerts(limit: $limit) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Variable 'limit' is not of a valid type. Expected 'Int': Int cannot represent a String value");
    }

    #[test]
    fn variable_type_must_fit_argument() {
        let schema = create_test_schema();

        let variables = create_variables(json!({ "id": true }));
        let validator = DocumentValidator::new(&schema, None, Some(variables), 10, 10, true);

        let query = r#"
            query($id: Boolean) {
                concert(id: $id) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Variable 'id' of type 'Boolean' used in position expecting type 'Int!'");

        let variables = create_variables(json!({ "id": "1" }));
        let validator = DocumentValidator::new(&schema, None, Some(variables), 10, 10, true);

        let query = r#"
            query($id: String!) {
                concert(id: $id) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Variable 'id' of type 'String!' used in position expecting type 'Int!'");

        // A nullable variable without a default may not fill a non-null argument, even if supplied
        let variables = create_variables(json!({ "limit": 1 }));
        let validator = DocumentValidator::new(&schema, None, Some(variables), 10, 10, true);

        let query = r#"
            query($limit: Int) {
                concert(id: $limit) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Variable 'limit' of type 'Int' used in position expecting type 'Int!'");

        let variables = create_variables(json!({ "tags": ["loud"] }));
        let validator = DocumentValidator::new(&schema, None, Some(variables), 10, 10, true);

        let query = r#"
            mutation($tags: [String]) {
                createVenue(data: { name: "Hall", kind: CLUB, tags: $tags }) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Variable 'tags' of type '[String]' used in position expecting type '[String!]'");
    }

    #[test]
    fn nullable_variable_with_default_fills_non_null_argument() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query($id: Int = 3) {
                concert(id: $id) {
                    id
                }
            }
        "#;

        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @"concert(id: 3) { id }");
    }

    #[test]
    fn duplicate_argument() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
                concert(id: 1, id: 2) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"There can be only one argument named 'id'");
    }

    #[test]
    fn optional_variables_and_defaults() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query($limit: Int, $title: String = "Encore") {
                concerts(limit: $limit, title: $title) {
                    id
                }
            }
        "#;

        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @r#"concerts(title: "Encore") { id }"#);
    }

    #[test]
    fn null_for_non_null_argument() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
                concert(id: null) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Argument 'id' must not be null");
    }

    #[test]
    fn invalid_scalar_argument() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
                concert(id: "one") {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Argument 'id' is not of a valid type. Expected 'Int': Int cannot represent a String value");
    }

    #[test]
    fn input_objects_and_enums() {
        let schema = create_test_schema();

        let variables = create_variables(json!({ "kind": "ARENA" }));
        let validator = DocumentValidator::new(&schema, None, Some(variables), 10, 10, true);

        let query = r#"
            mutation($kind: VenueKind!) {
                createVenue(data: { name: "Hall", kind: $kind, tags: "loud" }) {
                    id
                }
                other: createVenue(data: { name: "Club", kind: CLUB, published: null }) {
                    id
                }
            }
        "#;

        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @r#"createVenue(data: {"name":"Hall","kind":"ARENA","tags":["loud"]}) { id } other: createVenue(data: {"name":"Club","kind":"CLUB","published":null}) { id }"#);
    }

    #[test]
    fn enum_literal_required() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            mutation {
                createVenue(data: { name: "Hall", kind: "ARENA" }) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Argument 'kind' is not of a valid type. Expected 'VenueKind', got 'String'");
    }

    #[test]
    fn stray_input_field() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            mutation {
                createVenue(data: { name: "Hall", kind: ARENA, capacity: 10 }) {
                    id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @r#"Argument(s) '["capacity"]' invalid for 'VenueInput'"#);
    }

    #[test]
    fn invalid_subfield() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
                concert(id: 1) {
                    id
                    title
                    foobar
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Field 'foobar' is not valid for type 'Concert'");
    }

    #[test]
    fn selections_on_leaf_and_object_fields() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);
        let query = "{ concert(id: 1) { title { length } } }";
        insta::assert_snapshot!(validation_error(validator, query), @"Field 'title' is of a scalar type, which should not specify fields");

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);
        let query = "{ concert(id: 1) { venue } }";
        insta::assert_snapshot!(validation_error(validator, query), @"Field 'venue' of type 'Venue' must have a selection of subfields");
    }

    #[test]
    fn aliases_valid() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
                firstConcert: concert(id: 1) {
                    id
                    headLine: title
                }
            }
        "#;

        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @"firstConcert: concert(id: 1) { id headLine: title }");
    }

    #[test]
    fn mergeable_leaf_fields() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
               concerts {
                    title
                    id
                    title
                    title
                    t: title # This should not be merged with the previous other title fields
                }
            }
        "#;

        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @"concerts { title id t: title }");
    }

    #[test]
    fn unmergeable_leaf_fields_all_aliases() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
               concerts {
                    t: title # The `t` alias points to a different field than the other `t` aliases
                    id
                    t: id
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Fields 't' conflict because they have differing names or arguments");
    }

    #[test]
    fn mergeable_non_leaf_fields() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
               concerts {
                    id
                    venue {
                        id
                        name
                    }
                    venue {
                        name
                        published
                    }
                    v: venue {
                        name
                    }
                }
            }
        "#;

        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @"concerts { id venue { id name published } v: venue { name } }");
    }

    #[test]
    fn unmergeable_non_leaf_fields() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        let query = r#"
            query {
               concerts {
                    venue {
                        n: name
                    }
                    venue {
                        n: published
                    }
                }
            }
        "#;

        insta::assert_snapshot!(validation_error(validator, query), @"Fields 'n' conflict because they have differing names or arguments");
    }

    #[test]
    fn multi_operations_valid() {
        let schema = create_test_schema();

        let query = r#"
            query concert1 {
                concert(id: 1) {
                    id
                }
            }

            query concert2 {
                concert(id: 2) {
                    id
                }
            }
        "#;

        let validator =
            DocumentValidator::new(&schema, Some("concert1".to_string()), None, 10, 10, true);
        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @"concert(id: 1) { id }");

        let validator =
            DocumentValidator::new(&schema, Some("concert2".to_string()), None, 10, 10, true);
        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @"concert(id: 2) { id }");
    }

    #[test]
    fn multi_operations_no_operation_name_invalid() {
        let schema = create_test_schema();

        let query = r#"
            query concert1 { concert(id: 1) { id } }
            query concert2 { concert(id: 2) { id } }
        "#;

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        insta::assert_snapshot!(validation_error(validator, query), @"Must provide operation name if query contains multiple operations");
    }

    #[test]
    fn multi_operations_mismatched_operation_name_invalid() {
        let schema = create_test_schema();

        let query = r#"
            query concert1 { concert(id: 1) { id } }
            query concert2 { concert(id: 2) { id } }
        "#;

        let validator =
            DocumentValidator::new(&schema, Some("foo".to_string()), None, 10, 10, true);

        insta::assert_snapshot!(validation_error(validator, query), @"operationName 'foo' doesn't match any operation");
    }

    #[test]
    fn fragments_and_inline_fragments() {
        let schema = create_test_schema();

        let query = r#"
            query {
                concerts {
                    ...concertFields
                    ... on Concert {
                        venue { name }
                    }
                    ... {
                        title
                    }
                }
            }

            fragment concertFields on Concert {
                id
                title
            }
        "#;

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);
        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @"concerts { id title venue { name } }");
    }

    #[test]
    fn fragment_on_wrong_type() {
        let schema = create_test_schema();

        let query = r#"
            query {
                concerts {
                    ...venueFields
                }
            }

            fragment venueFields on Venue {
                name
            }
        "#;

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        insta::assert_snapshot!(validation_error(validator, query), @"Fragment 'venueFields' cannot be spread here as objects of type 'Concert' can never be of type 'Venue'");
    }

    #[test]
    fn fragment_recursion_direct() {
        let schema = create_test_schema();

        let query = r#"
            query {
                concerts {
                    ...concertFields
                }
            }

            fragment concertFields on Concert {
                ...concertFields
            }
        "#;

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        insta::assert_snapshot!(validation_error(validator, query), @"Fragment 'concertFields' forms a cycle");
    }

    #[test]
    fn fragment_recursion_indirect() {
        let schema = create_test_schema();

        let query = r#"
            query {
                concerts {
                    ...concertInfo
                }
            }

            fragment concertInfo on Concert {
                venue { ...venueInfo }
            }

            fragment venueInfo on Venue {
                concerts { ...concertInfo }
            }
        "#;

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);

        insta::assert_snapshot!(validation_error(validator, query), @"Fragment 'concertInfo' forms a cycle");
    }

    #[test]
    fn skip_and_include() {
        let schema = create_test_schema();

        let variables = create_variables(json!({ "withVenue": false }));
        let query = r#"
            query($withVenue: Boolean!) {
                concerts {
                    id @skip(if: true)
                    title @include(if: true)
                    venue @include(if: $withVenue) { name }
                    ... @skip(if: false) { published: id }
                }
            }
        "#;

        let validator = DocumentValidator::new(&schema, None, Some(variables), 10, 10, true);
        let operation = validator.validate(create_query_document(query)).unwrap();
        insta::assert_snapshot!(selection_tree(&operation.fields), @"concerts { title published: id }");
    }

    #[test]
    fn operation_name_must_match() {
        let schema = create_test_schema();

        let validator =
            DocumentValidator::new(&schema, Some("Concerts".to_string()), None, 10, 10, true);
        insta::assert_snapshot!(validation_error(validator, "{ concerts { id } }"), @"operationName 'Concerts' doesn't match any operation");

        let validator =
            DocumentValidator::new(&schema, Some("Venues".to_string()), None, 10, 10, true);
        insta::assert_snapshot!(validation_error(validator, "query Concerts { concerts { id } }"), @"operationName 'Venues' doesn't match any operation");

        let validator =
            DocumentValidator::new(&schema, Some("Concerts".to_string()), None, 10, 10, true);
        let operation = validator
            .validate(create_query_document("query Concerts { concerts { id } }"))
            .unwrap();
        assert_eq!(operation.name.as_deref(), Some("Concerts"));
    }

    #[test]
    fn unknown_directive() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);
        let query = "{ concerts { id @deprecated } }";

        insta::assert_snapshot!(validation_error(validator, query), @"Directive '@deprecated' is not supported here");
    }

    #[test]
    fn subscriptions_unsupported() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, true);
        let query = "subscription { concerts { id } }";

        insta::assert_snapshot!(validation_error(validator, query), @"Operation type 'subscription' is not supported");
    }

    #[test]
    fn query_depth_limit_direct() {
        let schema = create_test_schema();

        let query = r#"
            query {
                concerts { # 0
                    venue { # 1
                        concerts { # 2
                            venue { # 3
                                concerts { # 4
                                    id # 5
                                }
                            }
                        }
                    }
                }
            }

        "#;

        // valid
        let validator = DocumentValidator::new(&schema, None, None, 5, usize::MAX, true);
        assert!(validator.validate(create_query_document(query)).is_ok());

        // invalid: one level too deep
        let validator = DocumentValidator::new(&schema, None, None, 4, usize::MAX, true);
        insta::assert_snapshot!(validation_error(validator, query), @"Selection set too deep");
    }

    #[test]
    fn query_depth_limit_through_fragment() {
        let schema = create_test_schema();

        let query = r#"
            query {
                concerts { # 0
                    venue { # 1
                        concerts { # 2
                            ...concertInfo
                        }
                    }
                }
            }
            fragment concertInfo on Concert {
                venue { # 3
                    concerts { # 4
                        id # 5
                    }
                }
            }
        "#;

        // valid
        let validator = DocumentValidator::new(&schema, None, None, 5, usize::MAX, true);
        assert!(validator.validate(create_query_document(query)).is_ok());

        // invalid: one level too deep
        let validator = DocumentValidator::new(&schema, None, None, 4, usize::MAX, true);
        insta::assert_snapshot!(validation_error(validator, query), @"Selection set too deep");
    }

    #[test]
    fn introspection_query_depth_limit_direct() {
        let schema = create_test_schema();

        let query = r#"
            query {
                __schema { # 0
                    types { # 1
                        name # 2
                    }
                }
            }

        "#;

        // valid
        let validator = DocumentValidator::new(&schema, None, None, 0, 2, true);
        assert!(validator.validate(create_query_document(query)).is_ok());

        // invalid: one level too deep
        let validator = DocumentValidator::new(&schema, None, None, usize::MAX, 1, true);
        insta::assert_snapshot!(validation_error(validator, query), @"Selection set too deep");
    }

    #[test]
    fn introspection_disabled() {
        let schema = create_test_schema();

        let validator = DocumentValidator::new(&schema, None, None, 10, 10, false);
        let query = "{ __type(name: \"Concert\") { name } }";

        insta::assert_snapshot!(validation_error(validator, query), @"Introspection is not enabled");

        // `__typename` is not introspection in this sense
        let validator = DocumentValidator::new(&schema, None, None, 10, 10, false);
        assert!(validator.validate(create_query_document("{ __typename }")).is_ok());
    }

    fn create_variables(variables: Value) -> Map<String, Value> {
        match variables {
            Value::Object(variables) => variables,
            _ => panic!("variables must be an object"),
        }
    }

    fn create_test_schema() -> Schema {
        let sdl = r#"
            enum VenueKind { ARENA CLUB }

            type Concert {
                id: Int!
                title: String
                venue: Venue
            }

            type Venue {
                id: Int!
                name: String
                published: Boolean
                concerts: [Concert!]!
            }

            input VenueInput {
                name: String!
                kind: VenueKind!
                published: Boolean
                tags: [String!]
            }

            type Query {
                concert(id: Int!): Concert
                concerts(limit: Int, title: String): [Concert!]!
                venue(id: Int!): Venue
            }

            type Mutation {
                createVenue(data: VenueInput!): Venue
            }
        "#;

        Schema::new(sdl, vec![]).unwrap()
    }

    fn create_query_document(query_str: &str) -> ExecutableDocument {
        parse_query(query_str).unwrap()
    }

    fn validation_error(validator: DocumentValidator, query: &str) -> String {
        validator
            .validate(create_query_document(query))
            .unwrap_err()
            .to_string()
    }

    /// A compact rendering of validated fields: aliases, coerced arguments, and subfields
    fn selection_tree(fields: &[ValidatedField]) -> String {
        fields
            .iter()
            .map(|field| {
                let mut rendered = match &field.alias {
                    Some(alias) => format!("{alias}: {}", field.name),
                    None => field.name.to_string(),
                };
                if !field.arguments.is_empty() {
                    let arguments = field
                        .arguments
                        .iter()
                        .map(|(name, value)| format!("{name}: {value}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    rendered.push_str(&format!("({arguments})"));
                }
                if !field.subfields.is_empty() {
                    rendered.push_str(&format!(" {{ {} }}", selection_tree(&field.subfields)));
                }
                rendered
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
