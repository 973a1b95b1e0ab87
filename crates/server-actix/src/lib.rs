// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod request;

use std::sync::{Mutex, PoisonError};

use actix_web::{
    HttpRequest, HttpResponse,
    web::{self, ServiceConfig},
};
use blog_resolver::BlogContext;
use common::http::{RequestHead, RequestPayload, ResponseBody, ResponsePayload};
use common::router::Router;
use graphql_router::GraphQLRouter;
use http::StatusCode;
use request::ActixRequestHead;
use serde_json::Value;
use tracing::{debug, error};

macro_rules! error_msg {
    ($msg:literal) => {
        concat!("{\"errors\": [{\"message\":\"", $msg, "\"}]}").as_bytes()
    };
}

pub fn configure_router(
    graphql_router: web::Data<GraphQLRouter<BlogContext>>,
) -> impl FnOnce(&mut ServiceConfig) {
    move |app| {
        app.app_data(graphql_router)
            .default_service(web::to(resolve));
    }
}

struct ActixRequestPayload {
    head: ActixRequestHead,
    body: Mutex<Value>,
}

impl RequestPayload for ActixRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        &self.head
    }

    fn take_body(&self) -> Value {
        self.body
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Resolve a GraphQL request
///
/// A body that isn't JSON is passed on as `null` (the router rejects it with a `400`).
async fn resolve(
    http_request: HttpRequest,
    body: web::Bytes,
    graphql_router: web::Data<GraphQLRouter<BlogContext>>,
) -> HttpResponse {
    let head = match ActixRequestHead::from_request(&http_request) {
        Ok(head) => head,
        Err(err) => {
            debug!("Unsupported method: {}", err);
            return HttpResponse::MethodNotAllowed().body(error_msg!("Unsupported method"));
        }
    };

    let body = serde_json::from_slice(&body).unwrap_or_else(|err| {
        debug!("Request body is not valid JSON: {}", err);
        Value::Null
    });

    let request = ActixRequestPayload {
        head,
        body: Mutex::new(body),
    };

    match graphql_router.route(&request).await {
        Some(ResponsePayload {
            body,
            headers,
            status_code,
        }) => {
            let actix_status_code = match to_actix_status_code(status_code) {
                Ok(status_code) => status_code,
                Err(err) => {
                    error!("Invalid status code: {}", err);
                    return HttpResponse::InternalServerError()
                        .body(error_msg!("Invalid status code"));
                }
            };

            let mut builder = HttpResponse::build(actix_status_code);

            for header in headers.into_iter() {
                builder.append_header(header);
            }

            match body {
                ResponseBody::Bytes(bytes) => builder.body(bytes),
                ResponseBody::None => builder.finish(),
            }
        }
        None => HttpResponse::NotFound().finish(),
    }
}

fn to_actix_status_code(status_code: StatusCode) -> Result<actix_web::http::StatusCode, String> {
    actix_web::http::StatusCode::from_u16(status_code.as_u16())
        .map_err(|_| "Invalid status code".to_string())
}
