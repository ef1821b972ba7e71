//
//  bitbucket-ops
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! This module holds the credential tuple every Bitbucket operation runs with
//! and turns it into HTTP Basic authentication.
//!
//! ## Credential Shape
//!
//! Bitbucket Cloud accepts two kinds of Basic-auth secret: an API key and the
//! older app password. Both become the Basic-auth password on the wire, so
//! they are modelled as one [`Credentials`] type with a single `secret` field.
//! When deserializing, `apiKey` and `appPassword` are accepted as aliases.
//!
//! ## Module Structure
//!
//! - [`keyring`]: Secure secret storage using the system keyring
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_ops::auth::Credentials;
//!
//! let credentials = Credentials::new("acme", "jdoe", "s3cret");
//! let auth = credentials.auth_header();
//! assert_eq!(auth.username, "jdoe");
//! assert_eq!(auth.password, "s3cret");
//! ```

mod keyring;

pub use keyring::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::common::RequestError;
use crate::api::{BitbucketClient, PreparedRequest};
use crate::util::is_valid_slug;

/// Where to create a Bitbucket API key, shown by `bbops auth login`.
pub const API_KEY_SETTINGS_URL: &str = "https://bitbucket.org/account/settings/api-keys/";

/// Permissions the API key needs for every operation to succeed.
pub const REQUIRED_PERMISSIONS: &str =
    "Repositories (Read, Write), Pull requests (Read, Write)";

/// The credential tuple shared by every record of a run.
///
/// Credentials are immutable once built. The dispatcher only ever reads them:
/// the workspace goes into every URL, and the username and secret become the
/// Basic-auth header.
///
/// # Fields
///
/// * `workspace` - Bitbucket workspace slug (appears in repository URLs)
/// * `username` - Bitbucket username or Atlassian account email
/// * `secret` - API key or app password
///
/// # Notes
///
/// - The `Debug` implementation redacts the secret.
/// - Deserialization accepts `apiKey` and `appPassword` for `secret`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// The workspace slug.
    pub workspace: String,

    /// The username used for Basic authentication.
    pub username: String,

    /// The API key or app password.
    #[serde(alias = "apiKey", alias = "appPassword")]
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("workspace", &self.workspace)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Creates a new credential tuple.
    pub fn new(
        workspace: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Returns the Basic-auth pair used on every outbound call.
    pub fn auth_header(&self) -> BasicAuth {
        BasicAuth {
            username: self.username.clone(),
            password: self.secret.clone(),
        }
    }

    /// Checks that every field is present and that the workspace is a valid slug.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.workspace.trim().is_empty() {
            return Err(RequestError::invalid_parameter(
                "missing required credential `workspace`",
            ));
        }
        if !is_valid_slug(&self.workspace) {
            return Err(RequestError::invalid_parameter(format!(
                "invalid workspace `{}`",
                self.workspace
            )));
        }
        if self.username.trim().is_empty() {
            return Err(RequestError::invalid_parameter(
                "missing required credential `username`",
            ));
        }
        if self.secret.is_empty() {
            return Err(RequestError::invalid_parameter(
                "missing required credential `secret`",
            ));
        }
        Ok(())
    }
}

/// HTTP Basic authentication pair.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// The Basic-auth username.
    pub username: String,
    /// The Basic-auth password (API key or app password).
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reads a secret from the first line of stdin, trimmed.
///
/// Used by `bbops auth login --with-secret` so secrets can be piped in
/// without appearing in shell history.
pub fn read_secret_from_stdin() -> anyhow::Result<String> {
    use std::io::BufRead;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Outcome of a credential probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The probe succeeded.
    Ok {
        /// Display name reported by `/user`, when present
        display_name: Option<String>,
    },
    /// The probe failed; carries the underlying message.
    Failed {
        /// Why the probe failed
        message: String,
    },
}

impl ConnectionStatus {
    /// Returns `true` when the probe succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Validates credentials against `GET /user`.
///
/// Any non-2xx response or transport failure is reported as
/// [`ConnectionStatus::Failed`]. A 2xx answer counts as success even when its
/// body carries no readable `display_name`. This function never returns an error.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_ops::api::BitbucketClient;
/// use bitbucket_ops::auth::{test_connection, Credentials};
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = BitbucketClient::cloud()?;
/// let credentials = Credentials::new("acme", "jdoe", "s3cret");
/// if test_connection(&client, &credentials).await.is_ok() {
///     println!("Credentials are valid");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn test_connection(client: &BitbucketClient, credentials: &Credentials) -> ConnectionStatus {
    let auth = credentials.auth_header();
    let request = PreparedRequest::get(["user"]);
    match client.execute_text(&request, &auth).await {
        Ok(body) => ConnectionStatus::Ok {
            display_name: serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|user| user.get("display_name")?.as_str().map(str::to_string)),
        },
        Err(RequestError::UnexpectedResponse(_)) => ConnectionStatus::Ok { display_name: None },
        Err(e) => {
            tracing::debug!(error = %e, "credential probe failed");
            ConnectionStatus::Failed {
                message: e.message(),
            }
        }
    }
}
