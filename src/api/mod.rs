//
//  bitbucket-ops
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP plumbing for Bitbucket Cloud's REST API v2.0
//! at `api.bitbucket.org`.
//!
//! ## Architecture
//!
//! - [`client`]: HTTP client with Basic authentication and status handling
//! - [`request`]: Prepared requests built by operations without network access
//! - [`cloud`]: Typed request payloads for the Cloud endpoints
//! - [`common`]: The uniform [`RequestError`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_ops::api::{BitbucketClient, PreparedRequest};
//! use bitbucket_ops::auth::Credentials;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = BitbucketClient::cloud()?;
//! let auth = Credentials::new("acme", "jdoe", "s3cret").auth_header();
//! let request = PreparedRequest::get(["repositories", "acme", "app", "pullrequests", "1"]);
//! let pr: serde_json::Value = client.execute_json(&request, &auth).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Transport failures, non-2xx statuses, invalid parameters and malformed
//! responses all surface as a single [`RequestError`]. There is no retry and
//! no status-specific handling.

/// Core HTTP client wrapper for Bitbucket Cloud.
pub mod client;

/// Bitbucket Cloud API v2.0 payload types.
pub mod cloud;

/// Shared error type.
pub mod common;

/// Prepared requests.
pub mod request;

pub use client::{BitbucketClient, CLOUD_API_BASE, DEFAULT_TIMEOUT_SECS};
pub use common::RequestError;
pub use request::{PreparedRequest, RequestBody};
