//
//  bitbucket-ops
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands.
//!
//! The workspace and username live in the config file; the secret lives in
//! the system keyring under `{workspace}/{username}`.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::auth::{
    read_secret_from_stdin, test_connection, ConnectionStatus, Credentials, KeyringStore,
    API_KEY_SETTINGS_URL, REQUIRED_PERMISSIONS,
};
use crate::config::Config;
use crate::interactive::{prompt_confirm_with_default, prompt_input_or_default, prompt_password};
use crate::output::{print_field, write_json};

use super::{require_slug, CommandError, GlobalOptions};

/// Manage stored credentials
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store credentials for a workspace
    #[command(after_help = "Create an API key at https://bitbucket.org/account/settings/api-keys/\n\
                            Required permissions: Repositories (Read, Write), Pull requests (Read, Write)")]
    Login(LoginArgs),

    /// Remove the stored secret
    Logout(LogoutArgs),

    /// Show the configured identity and where the secret comes from
    Status,

    /// Check the credentials against Bitbucket
    Test,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Read the secret from stdin instead of prompting
    #[arg(long)]
    pub with_secret: bool,

    /// Store the credentials without checking them first
    #[arg(long)]
    pub skip_test: bool,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {
    /// Also remove the workspace and username from the config file
    #[arg(long)]
    pub forget: bool,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global).await,
            AuthSubcommand::Logout(args) => logout(args, global),
            AuthSubcommand::Status => status(global),
            AuthSubcommand::Test => test(global).await,
        }
    }
}

async fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;

    let workspace = match &global.workspace {
        Some(workspace) => workspace.clone(),
        None => prompt_input_or_default("Workspace", config.credentials.workspace.as_deref())?,
    };
    require_slug("workspace", &workspace)?;

    let username = match &global.username {
        Some(username) => username.clone(),
        None => prompt_input_or_default("Username", config.credentials.username.as_deref())?,
    };

    let secret = if args.with_secret {
        read_secret_from_stdin()?
    } else if let Some(secret) = &global.secret {
        secret.clone()
    } else {
        println!();
        println!("Create an API key at {}", API_KEY_SETTINGS_URL);
        println!("Required permissions: {}", REQUIRED_PERMISSIONS);
        println!();
        prompt_password("API key or app password")?
    };

    let credentials = Credentials::new(workspace, username, secret);
    credentials.validate()?;

    if !args.skip_test {
        let client = global.client(&config)?;
        if let ConnectionStatus::Failed { message } = test_connection(&client, &credentials).await
        {
            return Err(CommandError::auth(format!("Credentials rejected: {}", message)).into());
        }
    }

    KeyringStore::new().store(&credentials.workspace, &credentials.username, &credentials.secret)?;
    config.credentials.workspace = Some(credentials.workspace.clone());
    config.credentials.username = Some(credentials.username.clone());
    config.save()?;

    if global.json {
        write_json(&serde_json::json!({
            "success": true,
            "workspace": credentials.workspace,
            "username": credentials.username,
        }))
    } else {
        println!(
            "{} Logged in to {} as {}",
            style("✓").green(),
            style(&credentials.workspace).cyan(),
            credentials.username
        );
        Ok(())
    }
}

fn logout(args: &LogoutArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let workspace = global.resolve_workspace(&config)?;
    let username = global.resolve_username(&config)?;

    if !args.yes
        && !global.json
        && !prompt_confirm_with_default(
            &format!("Remove the stored secret for {}/{}?", workspace, username),
            true,
        )?
    {
        bail!("Cancelled");
    }

    KeyringStore::new().delete(&workspace, &username)?;
    if args.forget {
        config.credentials = Default::default();
        config.save()?;
    }

    if global.json {
        write_json(&serde_json::json!({
            "success": true,
            "workspace": workspace,
            "username": username,
        }))
    } else {
        println!(
            "{} Logged out of {} ({})",
            style("✓").green(),
            style(&workspace).cyan(),
            username
        );
        Ok(())
    }
}

/// Where the secret would come from on the next run.
fn secret_source(global: &GlobalOptions, workspace: &str, username: &str) -> &'static str {
    if global.secret.is_some() {
        return "flag or BBOPS_SECRET";
    }
    match KeyringStore::new().get(workspace, username) {
        Ok(Some(_)) => "keyring",
        Ok(None) => "missing",
        Err(e) => {
            tracing::debug!(error = %e, "keyring lookup failed");
            "keyring unavailable"
        }
    }
}

fn status(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let workspace = global
        .workspace
        .clone()
        .or_else(|| config.credentials.workspace.clone());
    let username = global
        .username
        .clone()
        .or_else(|| config.credentials.username.clone());
    let base_url = global
        .base_url
        .clone()
        .unwrap_or_else(|| config.api.base_url.clone());

    let secret = match (&workspace, &username) {
        (Some(w), Some(u)) => secret_source(global, w, u),
        _ => "missing",
    };

    if global.json {
        return write_json(&serde_json::json!({
            "workspace": workspace,
            "username": username,
            "secret": secret,
            "base_url": base_url,
            "config_path": Config::config_path()?.display().to_string(),
        }));
    }

    let color = console::colors_enabled();
    let unset = "(not set)".to_string();
    print_field("Workspace", workspace.as_ref().unwrap_or(&unset), color);
    print_field("Username", username.as_ref().unwrap_or(&unset), color);
    print_field("Secret", secret, color);
    print_field("API", &base_url, color);
    print_field("Config", &Config::config_path()?.display().to_string(), color);

    if workspace.is_none() || username.is_none() || secret == "missing" {
        println!();
        println!("Run 'bbops auth login' to store credentials");
    }
    Ok(())
}

async fn test(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let credentials = global.resolve_credentials(&config)?;
    let client = global.client(&config)?;

    let status = test_connection(&client, &credentials).await;

    if global.json {
        let body = match &status {
            ConnectionStatus::Ok { display_name } => serde_json::json!({
                "ok": true,
                "workspace": credentials.workspace,
                "username": credentials.username,
                "display_name": display_name,
            }),
            ConnectionStatus::Failed { message } => serde_json::json!({
                "ok": false,
                "error": message,
            }),
        };
        write_json(&body)?;
    }

    match status {
        ConnectionStatus::Ok { display_name } => {
            if !global.json {
                println!(
                    "{} Authenticated as {}",
                    style("✓").green(),
                    display_name.unwrap_or(credentials.username)
                );
            }
            Ok(())
        }
        ConnectionStatus::Failed { message } => {
            Err(CommandError::auth(format!("Authentication failed: {}", message)).into())
        }
    }
}
