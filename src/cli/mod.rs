//
//  bitbucket-ops
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod auth;
mod config;
mod operations;
mod ops;
mod run;

pub use auth::AuthCommand;
pub use config::ConfigCommand;
pub use operations::OperationsCommand;
pub use ops::OpCommand;
pub use run::RunCommand;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::api::{BitbucketClient, RequestError};
use crate::auth::{Credentials, KeyringStore};
use crate::config::Config;
use crate::exit_codes;
use crate::operations::Dispatcher;
use crate::output::{OutputFormat, OutputWriter};

/// bbops - Run Bitbucket Cloud operations from the command line
#[derive(Parser, Debug)]
#[command(
    name = "bbops",
    version,
    about = "Run Bitbucket Cloud operations from the command line",
    long_about = "bbops runs repository and pull request operations against Bitbucket Cloud.\n\n\
                  Run one operation with its subcommand, or a batch of operation records \
                  from a JSON or YAML file with 'bbops run'.",
    propagate_version = true,
    after_help = "Use 'bbops <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Bitbucket workspace slug
    #[arg(long, short = 'w', global = true, env = "BBOPS_WORKSPACE")]
    pub workspace: Option<String>,

    /// Bitbucket username or Atlassian account email
    #[arg(long, short = 'u', global = true, env = "BBOPS_USERNAME")]
    pub username: Option<String>,

    /// API key or app password (prefer the keyring or the environment)
    #[arg(long, global = true, env = "BBOPS_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Override the API base URL (proxies and tests)
    #[arg(long, global = true, env = "BBOPS_BASE_URL")]
    pub base_url: Option<String>,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Returns an output writer for the selected format.
    pub fn writer(&self) -> OutputWriter {
        OutputWriter::new(OutputFormat::from_json_flag(self.json))
    }

    /// Resolves the workspace from flags, environment, then the config file.
    pub fn resolve_workspace(&self, config: &Config) -> Result<String> {
        match self
            .workspace
            .clone()
            .or_else(|| config.credentials.workspace.clone())
        {
            Some(workspace) if !workspace.trim().is_empty() => Ok(workspace),
            _ => Err(CommandError::auth(
                "No workspace configured. Pass --workspace, set BBOPS_WORKSPACE or run 'bbops auth login'",
            )
            .into()),
        }
    }

    /// Resolves the username from flags, environment, then the config file.
    pub fn resolve_username(&self, config: &Config) -> Result<String> {
        match self
            .username
            .clone()
            .or_else(|| config.credentials.username.clone())
        {
            Some(username) if !username.trim().is_empty() => Ok(username),
            _ => Err(CommandError::auth(
                "No username configured. Pass --username, set BBOPS_USERNAME or run 'bbops auth login'",
            )
            .into()),
        }
    }

    /// Resolves the full credential tuple.
    ///
    /// The secret comes from `--secret` / `BBOPS_SECRET` when given, otherwise
    /// from the system keyring entry for the workspace and username.
    pub fn resolve_credentials(&self, config: &Config) -> Result<Credentials> {
        let workspace = self.resolve_workspace(config)?;
        let username = self.resolve_username(config)?;

        let secret = match &self.secret {
            Some(secret) => Some(secret.clone()),
            None => match KeyringStore::new().get(&workspace, &username) {
                Ok(secret) => secret,
                Err(e) => {
                    tracing::debug!(error = %e, "keyring lookup failed");
                    None
                }
            },
        };

        let Some(secret) = secret.filter(|s| !s.is_empty()) else {
            return Err(CommandError::auth(format!(
                "No secret found for {}/{}. Set BBOPS_SECRET or run 'bbops auth login'",
                workspace, username
            ))
            .into());
        };

        Ok(Credentials::new(workspace, username, secret))
    }

    /// Builds the API client from the config file and the `--base-url` override.
    pub fn client(&self, config: &Config) -> Result<BitbucketClient> {
        let mut api = config.api.clone();
        if let Some(base_url) = &self.base_url {
            api.base_url = base_url.clone();
        }
        Ok(BitbucketClient::from_config(&api)?)
    }

    /// Builds a dispatcher on top of [`GlobalOptions::client`].
    pub fn dispatcher(&self, config: &Config) -> Result<Dispatcher> {
        Ok(Dispatcher::new(self.client(config)?))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage stored credentials
    Auth(AuthCommand),

    /// Manage configuration
    Config(ConfigCommand),

    /// Run a batch of operation records from a JSON or YAML file
    Run(RunCommand),

    /// List the available operations and their parameters
    #[command(visible_alias = "ops")]
    Operations(OperationsCommand),

    #[command(flatten)]
    Op(OpCommand),
}

impl Commands {
    /// Executes the selected command.
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match self {
            Commands::Auth(cmd) => cmd.run(global).await,
            Commands::Config(cmd) => cmd.run(global).await,
            Commands::Run(cmd) => cmd.run(global).await,
            Commands::Operations(cmd) => cmd.run(global),
            Commands::Op(cmd) => cmd.run(global).await,
        }
    }
}

/// An error that ends the process with a specific exit code.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CommandError {
    /// Process exit code, see [`exit_codes`].
    pub code: i32,
    /// Message shown to the user.
    pub message: String,
}

impl CommandError {
    /// Missing or rejected credentials.
    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            code: exit_codes::AUTH_ERROR,
            message: message.into(),
        }
    }

    /// Some records of a continue-on-fail batch failed.
    pub fn partial_failure(failed: usize, total: usize) -> Self {
        Self {
            code: exit_codes::PARTIAL_FAILURE,
            message: format!("{} of {} records failed", failed, total),
        }
    }

    /// Maps an operation failure, treating 401 and 403 as credential problems.
    pub fn from_request(error: RequestError) -> anyhow::Error {
        match error.status() {
            Some(401) | Some(403) => Self::auth(error.message()).into(),
            _ => error.into(),
        }
    }
}

/// Returns the exit code for an error returned by [`Commands::run`].
pub fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<CommandError>()
        .map(|e| e.code)
        .unwrap_or(exit_codes::ERROR)
}

/// Fails with a usage error unless `value` is a valid slug.
pub(crate) fn require_slug(name: &str, value: &str) -> Result<()> {
    if !crate::util::is_valid_slug(value) {
        bail!("Invalid {} '{}'", name, value);
    }
    Ok(())
}
