//
//  bitbucket-ops
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for Bitbucket Cloud
//!
//! This module provides the error type shared by every layer that talks to
//! Bitbucket: the HTTP client, the operation dispatcher and the batch runner.
//!
//! # Overview
//!
//! Every failure an operation can hit surfaces as a single [`RequestError`]:
//!
//! - the request could not be sent or the connection dropped
//! - Bitbucket answered with a non-2xx status
//! - a required parameter was missing or invalid before the request was built
//! - a 2xx response did not have the expected shape
//!
//! There is no kind-specific recovery. Callers read [`RequestError::message`]
//! and report it.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_ops::api::common::RequestError;
//!
//! let err = RequestError::invalid_parameter("missing required parameter `repository`");
//! assert_eq!(err.message(), "missing required parameter `repository`");
//! assert!(err.status().is_none());
//! ```

use reqwest::StatusCode;
use thiserror::Error;

/// Uniform error for every Bitbucket operation.
///
/// All variants render as the bare underlying message so the text placed in
/// an error-shaped result is exactly what Bitbucket (or the transport, or the
/// validator) reported.
///
/// # Variants
///
/// | Variant | Raised when |
/// |---------|-------------|
/// | `Transport` | Network failure, timeout, TLS error |
/// | `Api` | Bitbucket answered with a non-2xx status |
/// | `InvalidParameter` | Validation failed before the request was built |
/// | `UnexpectedResponse` | A 2xx body could not be decoded |
#[derive(Error, Debug)]
pub enum RequestError {
    /// A transport-level error occurred during the request.
    ///
    /// Covers connection failures, timeouts, DNS resolution errors
    /// and other transport-layer issues.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Bitbucket returned a non-success status code.
    #[error("{message}")]
    Api {
        /// The HTTP status code of the response
        status: u16,
        /// The message extracted from the error body
        message: String,
    },

    /// A required parameter was missing or invalid.
    ///
    /// Raised before any request is built, so no network traffic happens.
    #[error("{0}")]
    InvalidParameter(String),

    /// A successful response did not have the expected shape.
    #[error("{0}")]
    UnexpectedResponse(String),
}

impl RequestError {
    /// Creates an [`RequestError::InvalidParameter`] from any message.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Creates an [`RequestError::UnexpectedResponse`] from any message.
    pub fn unexpected_response(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse(message.into())
    }

    /// Returns the uniform error message.
    ///
    /// This is the text placed into `{"error": ...}` results when a batch
    /// continues past failures.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns the HTTP status code for errors that came from Bitbucket.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Parses a Bitbucket API error response and extracts a user-friendly message.
///
/// Bitbucket Cloud returns errors in the format:
/// ```json
/// {"type": "error", "error": {"message": "Human readable message"}}
/// ```
///
/// Some endpoints only fill `error.detail`, and a few proxies in front of the
/// API answer with a bare `{"message": "..."}`. If none of these shapes match,
/// the status code and raw body are reported.
///
/// # Parameters
///
/// * `status` - The HTTP status code
/// * `body` - The raw error response body
///
/// # Returns
///
/// Returns a [`RequestError::Api`] carrying the status and extracted message.
pub fn format_api_error(status: StatusCode, body: &str) -> RequestError {
    let message = extract_error_message(body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            format!("API error ({})", status)
        } else {
            format!("API error ({}): {}", status, body.trim())
        }
    });

    RequestError::Api {
        status: status.as_u16(),
        message,
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;

    // Cloud format: {"type": "error", "error": {"message": "..."}}
    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }

    // Alternative Cloud format: {"error": {"detail": "..."}}
    if let Some(detail) = json
        .get("error")
        .and_then(|e| e.get("detail"))
        .and_then(|m| m.as_str())
    {
        return Some(detail.to_string());
    }

    json.get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
