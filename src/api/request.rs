//
//  bitbucket-ops
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Prepared HTTP requests.
//!
//! A [`PreparedRequest`] is the fully resolved description of one outbound
//! call: method, unencoded path segments relative to the API base, query
//! pairs and body. Operations build them without touching the network, and
//! [`BitbucketClient`](super::BitbucketClient) turns them into real requests.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::common::RequestError;

/// Body of a prepared request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// `application/json` body.
    Json(Value),
    /// `application/x-www-form-urlencoded` body, fields in order.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Serializes a payload into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidParameter`] if the payload cannot be
    /// represented as JSON.
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, RequestError> {
        serde_json::to_value(payload)
            .map(Self::Json)
            .map_err(|e| RequestError::invalid_parameter(format!("could not encode body: {}", e)))
    }

    /// Returns the JSON body, if this is one.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the form fields, if this is a form body.
    pub fn as_form(&self) -> Option<&[(String, String)]> {
        match self {
            Self::Form(fields) => Some(fields),
            _ => None,
        }
    }
}

/// A single outbound call, ready to be sent.
///
/// # Fields
///
/// * `method` - HTTP method
/// * `segments` - Unencoded path segments appended to the API base URL
/// * `query` - Query pairs; none means no `?` at all
/// * `body` - Request body
///
/// # Example
///
/// ```rust
/// use bitbucket_ops::api::PreparedRequest;
///
/// let request = PreparedRequest::get(["repositories", "acme", "app", "pullrequests"])
///     .with_query("state", "MERGED");
/// assert_eq!(request.path(), "/repositories/acme/app/pullrequests?state=MERGED");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: Method,
    /// Path segments relative to the API base URL, unencoded.
    pub segments: Vec<String>,
    /// Query pairs in order.
    pub query: Vec<(String, String)>,
    /// Request body.
    pub body: RequestBody,
}

impl PreparedRequest {
    /// Creates a request with no query and no body.
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Creates a `GET` request.
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    /// Creates a `POST` request with the given body.
    pub fn post<I, S>(segments: I, body: RequestBody) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            body,
            ..Self::new(Method::POST, segments)
        }
    }

    /// Appends a query pair.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Returns the unencoded path and query, for logging and tests.
    pub fn path(&self) -> String {
        let mut path = format!("/{}", self.segments.join("/"));
        if !self.query.is_empty() {
            let query: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            path.push('?');
            path.push_str(&query.join("&"));
        }
        path
    }

    /// Returns `true` if the request can change remote state.
    pub fn is_mutation(&self) -> bool {
        self.method != Method::GET && self.method != Method::HEAD
    }
}
