//
//  bitbucket-ops
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Keys are dotted section paths such as `credentials.workspace` or
//! `api.timeout_secs`. Secrets are never stored in the config file.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::config::Config;
use crate::output::{print_field, write_json};

use super::GlobalOptions;

/// Manage configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Show every configuration value
    #[command(visible_alias = "ls")]
    Show,

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key, e.g. credentials.workspace
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key, e.g. api.timeout_secs
    pub key: String,

    /// New value
    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => get(args, global),
            ConfigSubcommand::Set(args) => set(args, global),
            ConfigSubcommand::Show => show(global),
            ConfigSubcommand::Path => path(global),
        }
    }
}

fn get(args: &GetArgs, global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    if !Config::KEYS.contains(&args.key.as_str()) {
        anyhow::bail!(
            "Unknown config key '{}'. Valid keys: {}",
            args.key,
            Config::KEYS.join(", ")
        );
    }
    let value = config.get(&args.key);

    if global.json {
        write_json(&serde_json::json!({ "key": args.key, "value": value }))
    } else {
        if let Some(v) = value {
            println!("{}", v);
        }
        Ok(())
    }
}

fn set(args: &SetArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(&args.key, &args.value)?;
    config.save()?;

    if global.json {
        write_json(&serde_json::json!({
            "success": true,
            "key": args.key,
            "value": args.value,
        }))
    } else {
        println!(
            "{} Set {} = {}",
            style("✓").green(),
            style(&args.key).cyan(),
            args.value
        );
        Ok(())
    }
}

fn show(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;

    if global.json {
        return write_json(&config);
    }

    let color = console::colors_enabled();
    for key in Config::KEYS {
        let value = config.get(key).unwrap_or_else(|| "(not set)".to_string());
        print_field(key, &value, color);
    }
    Ok(())
}

fn path(global: &GlobalOptions) -> Result<()> {
    let path = Config::config_path()?;
    if global.json {
        write_json(&serde_json::json!({ "path": path.display().to_string() }))
    } else {
        println!("{}", path.display());
        Ok(())
    }
}
