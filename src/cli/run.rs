//
//  bitbucket-ops
//  cli/run.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Batch runs
//!
//! `bbops run records.json` executes every record in order. With
//! `--continue-on-fail` (or `batch.continue_on_fail = true` in the config),
//! failing records become `{"error": ...}` results and the run exits with
//! the partial failure code.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{load_records, BatchRunner, FailurePolicy};
use crate::config::Config;
use crate::output::{print_header, write_json};

use super::ops::preview_operation;
use super::{CommandError, GlobalOptions};

#[derive(Args, Debug)]
pub struct RunCommand {
    /// Records file (JSON array or YAML sequence), or '-' for JSON on stdin
    pub file: PathBuf,

    /// Keep going past failing records, reporting them in place
    #[arg(long)]
    pub continue_on_fail: bool,

    /// Validate the records and print the requests without sending them
    #[arg(long)]
    pub dry_run: bool,
}

impl RunCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let records = load_records(&self.file)?;
        let writer = global.writer();

        if self.dry_run {
            let workspace = global.resolve_workspace(&config)?;
            let client = global.client(&config)?;
            let mut previews = Vec::with_capacity(records.len());
            for (index, operation) in records.iter().enumerate() {
                let requests = preview_operation(&client, operation, &workspace)
                    .with_context(|| format!("record {} ({})", index, operation.kind()))?;
                previews.push(serde_json::json!({
                    "pairedItem": index,
                    "operation": operation.kind(),
                    "requests": requests,
                }));
            }

            if writer.is_json() {
                return write_json(&previews);
            }
            for preview in &previews {
                print_header(&format!(
                    "#{} {}",
                    preview["pairedItem"],
                    preview["operation"].as_str().unwrap_or_default()
                ));
                for request in preview["requests"].as_array().into_iter().flatten() {
                    println!(
                        "{} {}",
                        request["method"].as_str().unwrap_or_default(),
                        request["url"].as_str().unwrap_or_default()
                    );
                }
            }
            writer.write_success(&format!("{} records are valid", previews.len()));
            return Ok(());
        }

        let credentials = global.resolve_credentials(&config)?;
        let policy =
            FailurePolicy::from_continue_on_fail(self.continue_on_fail || config.batch.continue_on_fail);
        let runner = BatchRunner::new(global.dispatcher(&config)?).with_policy(policy);

        let total = records.len();
        let spinner = if writer.is_json() {
            ProgressBar::hidden()
        } else {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")?,
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        };
        spinner.set_message(format!("Running {} records", total));

        let result = runner
            .run_with(&records, &credentials, |outcome| {
                spinner.set_message(format!(
                    "{}/{} {}",
                    outcome.index + 1,
                    total,
                    outcome.operation
                ));
            })
            .await;
        spinner.finish_and_clear();

        let report = result.map_err(|e| {
            tracing::debug!(index = e.index, "batch aborted");
            anyhow::Error::from(e)
        })?;

        writer.write_report(&report)?;

        let failed = report.failed();
        if failed > 0 {
            return Err(CommandError::partial_failure(failed, report.len()).into());
        }
        Ok(())
    }
}
