//
//  bitbucket-ops
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for Bitbucket Cloud
//!
//! This module provides the HTTP client every operation goes through.
//!
//! ## Features
//!
//! - Per-segment percent-encoding of URL paths
//! - HTTP Basic authentication on every call
//! - JSON, form-encoded and empty request bodies
//! - JSON or raw-text responses
//! - Uniform [`RequestError`] for transport failures and non-2xx statuses
//! - Per-request timeout and custom User-Agent header

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::common::{format_api_error, RequestError};
use super::request::{PreparedRequest, RequestBody};
use crate::auth::BasicAuth;
use crate::config::ApiConfig;

/// Base URL of the Bitbucket Cloud REST API.
pub const CLOUD_API_BASE: &str = "https://api.bitbucket.org/2.0";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The HTTP client for Bitbucket Cloud.
///
/// The client is stateless apart from its connection pool: credentials are
/// passed on every call, so one client can serve many credential tuples.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use bitbucket_ops::api::BitbucketClient;
///
/// // Against api.bitbucket.org
/// let client = BitbucketClient::cloud()?;
/// assert_eq!(client.base_url().as_str(), "https://api.bitbucket.org/2.0");
///
/// // Against a proxy or a test server
/// let client = BitbucketClient::with_base_url("http://127.0.0.1:8080/2.0")?;
/// # Ok::<(), bitbucket_ops::api::RequestError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BitbucketClient {
    /// The underlying HTTP client
    http: Client,
    /// API base URL, e.g. `https://api.bitbucket.org/2.0`
    base_url: Url,
}

impl BitbucketClient {
    /// Creates a client for Bitbucket Cloud with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client could not be created.
    pub fn cloud() -> Result<Self, RequestError> {
        Self::new(CLOUD_API_BASE, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client for a custom base URL with the default timeout.
    pub fn with_base_url(base_url: &str) -> Result<Self, RequestError> {
        Self::new(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client from the `[api]` section of the configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, RequestError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Creates a client for `base_url` whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidParameter`] if `base_url` is not an
    /// absolute http(s) URL, or a transport error if the HTTP client could
    /// not be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RequestError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            RequestError::invalid_parameter(format!("invalid base URL `{}`: {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(RequestError::invalid_parameter(format!(
                "invalid base URL `{}`: expected an http(s) URL",
                base_url
            )));
        }

        let http = Client::builder()
            .user_agent(format!("bbops/{}", crate::VERSION))
            .timeout(timeout)
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a prepared request to its absolute URL.
    ///
    /// Every segment is percent-encoded on its own, so a `/` inside a branch
    /// name becomes `%2F` while separate file path segments stay separated.
    /// No `?` is added when the request has no query pairs.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bitbucket_ops::api::{BitbucketClient, PreparedRequest};
    ///
    /// let client = BitbucketClient::cloud()?;
    /// let request = PreparedRequest::get(["repositories", "acme", "app", "refs", "branches", "feat/x"]);
    /// assert_eq!(
    ///     client.url_for(&request)?.as_str(),
    ///     "https://api.bitbucket.org/2.0/repositories/acme/app/refs/branches/feat%2Fx"
    /// );
    /// # Ok::<(), bitbucket_ops::api::RequestError>(())
    /// ```
    pub fn url_for(&self, request: &PreparedRequest) -> Result<Url, RequestError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                RequestError::invalid_parameter(format!(
                    "base URL `{}` cannot carry a path",
                    self.base_url
                ))
            })?;
            segments
                .pop_if_empty()
                .extend(request.segments.iter().map(String::as_str));
        }
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Sends a prepared request and checks its status.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Transport`] if the request could not be sent,
    /// or [`RequestError::Api`] for any non-2xx status.
    async fn send(
        &self,
        request: &PreparedRequest,
        auth: &BasicAuth,
    ) -> Result<Response, RequestError> {
        let url = self.url_for(request)?;
        tracing::debug!(method = %request.method, url = %url, "sending request");

        let builder = self
            .http
            .request(request.method.clone(), url)
            .basic_auth(&auth.username, Some(&auth.password));

        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "received response");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format_api_error(status, &text));
        }

        Ok(response)
    }

    /// Sends a prepared request and decodes the JSON response.
    ///
    /// An empty 2xx body decodes as `{}`; Bitbucket's `/src` commit endpoint
    /// answers `201 Created` with no body at all.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UnexpectedResponse`] if the body is not valid
    /// JSON for `T`, in addition to the errors of the underlying send.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: &PreparedRequest,
        auth: &BasicAuth,
    ) -> Result<T, RequestError> {
        let text = self.send(request, auth).await?.text().await?;
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| {
            RequestError::unexpected_response(format!(
                "unexpected response from {} {}: {}",
                request.method,
                request.path(),
                e
            ))
        })
    }

    /// Sends a prepared request and returns the response body as text.
    ///
    /// The body must be valid UTF-8; binary content is never replaced lossily.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UnexpectedResponse`] if the body is not UTF-8,
    /// in addition to the errors of the underlying send.
    pub async fn execute_text(
        &self,
        request: &PreparedRequest,
        auth: &BasicAuth,
    ) -> Result<String, RequestError> {
        let bytes = self.send(request, auth).await?.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            RequestError::unexpected_response(format!(
                "response from {} {} is not UTF-8 text",
                request.method,
                request.path()
            ))
        })
    }
}
