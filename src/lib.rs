//
//  bitbucket-ops
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Operations Library
//!
//! A small, strongly typed dispatcher for Bitbucket Cloud repository and
//! pull request operations, plus the `bbops` command line host around it.
//!
//! ## Overview
//!
//! An [`Operation`](operations::Operation) and a
//! [`Credentials`](auth::Credentials) tuple go in; one normalized JSON result
//! (or a uniform [`RequestError`](api::RequestError)) comes out. A
//! [`BatchRunner`](batch::BatchRunner) applies this to a list of records
//! under an explicit failure policy.
//!
//! ## Operations
//!
//! - Commit files to a branch
//! - Create a branch from another branch's head
//! - Create, get, comment on, merge and search pull requests
//! - Read a file from a branch
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client and request payloads for the Cloud REST API v2.0
//! - [`auth`]: Credential tuple, Basic auth and keyring storage
//! - [`operations`]: Operation schema, validation, request plans and dispatch
//! - [`batch`]: Sequential batch runner and record file loading
//! - [`config`]: Configuration file management
//! - [`output`]: Output formatting (Table, JSON)
//! - [`interactive`]: Interactive prompts
//! - [`cli`]: Command-line interface definitions using clap
//! - [`util`]: Utility functions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_ops::api::BitbucketClient;
//! use bitbucket_ops::auth::Credentials;
//! use bitbucket_ops::operations::{Dispatch, Dispatcher, Operation, SearchPullRequests};
//! use bitbucket_ops::api::cloud::PullRequestState;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let dispatcher = Dispatcher::new(BitbucketClient::cloud()?);
//! let credentials = Credentials::new("acme", "jdoe", "s3cret");
//! let open = Operation::SearchPullRequests(SearchPullRequests {
//!     repository: "app".to_string(),
//!     state: PullRequestState::Open,
//! });
//! let page = dispatcher.execute(&open, &credentials).await?;
//! println!("{}", page["values"]);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Contains the `bbops` commands, arguments and subcommands defined using the
/// clap derive API.
pub mod cli;

/// API client for Bitbucket Cloud.
///
/// The client handles URL building, Basic authentication, request bodies and
/// status handling.
pub mod api;

/// Credentials and secret storage.
pub mod auth;

/// Sequential batch execution with a failure policy.
pub mod batch;

/// Configuration file management.
///
/// Manages the configuration stored in platform-specific locations:
/// - Linux: `~/.config/bbops/config.toml`
/// - macOS: `~/Library/Application Support/bbops/config.toml`
/// - Windows: `%APPDATA%\bbops\config\config.toml`
pub mod config;

/// Interactive terminal prompts.
pub mod interactive;

/// The operation set and its dispatcher.
pub mod operations;

/// Output formatting for table and JSON modes.
pub mod output;

/// Utility functions and helpers.
pub mod util;

pub use cli::Cli;
pub use config::Config;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "bbops";

/// Application version constant.
///
/// Derived from Cargo.toml at compile time.
///
/// ```rust
/// use bitbucket_ops::VERSION;
///
/// println!("bbops version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `16-31`: Operation-related issues
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_ops::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::AUTH_ERROR);
/// ```
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments; clap exits with this on parse errors.
    pub const USAGE: i32 = 2;

    /// Credentials are missing or were rejected.
    ///
    /// Run `bbops auth login` to store credentials.
    pub const AUTH_ERROR: i32 = 4;

    /// Some records failed in a `--continue-on-fail` batch.
    ///
    /// The results, including the error-shaped ones, were still printed.
    pub const PARTIAL_FAILURE: i32 = 16;
}
