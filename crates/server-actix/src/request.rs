// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{HttpRequest, http::header::HeaderMap};
use common::http::RequestHead;

pub struct ActixRequestHead {
    // we cannot refer to HttpRequest directly, as it holds an Rc (and therefore does
    // not impl Send or Sync)
    headers: HeaderMap,
    method: http::Method,
    path: String,
}

impl ActixRequestHead {
    // Actix uses http-0.2, while the rest of the system uses http-1.x, so the method is
    // converted through its textual form.
    pub fn from_request(req: &HttpRequest) -> Result<ActixRequestHead, http::method::InvalidMethod> {
        Ok(ActixRequestHead {
            headers: req.headers().clone(),
            method: http::Method::from_bytes(req.method().as_str().as_bytes())?,
            path: req.path().to_string(),
        })
    }
}

impl RequestHead for ActixRequestHead {
    fn get_headers(&self, key: &str) -> Vec<String> {
        self.headers
            .get_all(key.to_lowercase())
            .filter_map(|h| h.to_str().ok())
            .map(|h| h.to_string())
            .collect()
    }

    fn get_path(&self) -> String {
        self.path.clone()
    }

    fn get_method(&self) -> http::Method {
        self.method.clone()
    }
}
