//
//  bitbucket-ops
//  cli/ops.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! One subcommand per operation.
//!
//! Each subcommand builds a single [`Operation`] from its flags and runs it
//! with the resolved credentials, or with `--dry-run` prints the requests it
//! would send.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::cloud::{FileEntry, MergeStrategy, PullRequestState};
use crate::api::{BitbucketClient, PreparedRequest, RequestBody};
use crate::auth::Credentials;
use crate::config::Config;
use crate::operations::{
    AddComment, CommitFiles, CreateBranch, CreatePullRequest, Dispatch, GetFileContent,
    GetPullRequest, MergePullRequest, Operation, SearchPullRequests,
};
use crate::output::{print_header, OutputWriter};

use super::{CommandError, GlobalOptions};

#[derive(Subcommand, Debug)]
pub enum OpCommand {
    /// Commit one or more files to a branch
    CommitFiles(CommitFilesArgs),

    /// Create a branch from another branch's head commit
    CreateBranch(CreateBranchArgs),

    /// Open a pull request
    #[command(name = "create-pr")]
    CreatePr(CreatePrArgs),

    /// Add a comment to a pull request
    AddComment(AddCommentArgs),

    /// Get a pull request
    #[command(name = "get-pr")]
    GetPr(PrArgs),

    /// Merge a pull request
    #[command(name = "merge-pr")]
    MergePr(MergePrArgs),

    /// List pull requests, optionally filtered by state
    #[command(name = "search-prs")]
    SearchPrs(SearchPrsArgs),

    /// Read a file from a branch
    #[command(name = "get-file")]
    GetFile(GetFileArgs),
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Print the requests that would be sent without sending them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct CommitFilesArgs {
    /// Repository slug
    #[arg(long, short = 'r')]
    pub repo: String,

    /// Branch to commit to
    #[arg(long, short = 'b')]
    pub branch: String,

    /// Commit message
    #[arg(long, short = 'm')]
    pub message: String,

    /// File to commit from disk, as REPO_PATH=LOCAL_PATH (repeatable)
    #[arg(long = "file", short = 'f', value_name = "REPO_PATH=LOCAL_PATH")]
    pub files: Vec<String>,

    /// File to commit with inline content, as REPO_PATH=TEXT (repeatable)
    #[arg(long = "inline", value_name = "REPO_PATH=TEXT")]
    pub inline: Vec<String>,

    #[command(flatten)]
    pub exec: ExecArgs,
}

#[derive(Args, Debug)]
pub struct CreateBranchArgs {
    /// Repository slug
    #[arg(long, short = 'r')]
    pub repo: String,

    /// Name of the new branch
    #[arg(long, short = 'n')]
    pub name: String,

    /// Branch to start from
    #[arg(long = "from", short = 's')]
    pub source: String,

    #[command(flatten)]
    pub exec: ExecArgs,
}

#[derive(Args, Debug)]
pub struct CreatePrArgs {
    /// Repository slug
    #[arg(long, short = 'r')]
    pub repo: String,

    /// Branch containing the changes
    #[arg(long, short = 's')]
    pub source: String,

    /// Branch to merge into
    #[arg(long, short = 'd')]
    pub destination: String,

    /// Pull request title
    #[arg(long, short = 't')]
    pub title: String,

    /// Pull request description
    #[arg(long, short = 'b', default_value = "")]
    pub description: String,

    #[command(flatten)]
    pub exec: ExecArgs,
}

#[derive(Args, Debug)]
pub struct AddCommentArgs {
    /// Repository slug
    #[arg(long, short = 'r')]
    pub repo: String,

    /// Pull request number
    pub id: i64,

    /// Comment text (Markdown)
    #[arg(long, short = 'b')]
    pub body: String,

    #[command(flatten)]
    pub exec: ExecArgs,
}

#[derive(Args, Debug)]
pub struct PrArgs {
    /// Repository slug
    #[arg(long, short = 'r')]
    pub repo: String,

    /// Pull request number
    pub id: i64,

    #[command(flatten)]
    pub exec: ExecArgs,
}

#[derive(Args, Debug)]
pub struct MergePrArgs {
    /// Repository slug
    #[arg(long, short = 'r')]
    pub repo: String,

    /// Pull request number
    pub id: i64,

    /// Merge strategy: merge_commit, squash or fast_forward
    #[arg(long, short = 's', default_value = "merge_commit")]
    pub strategy: MergeStrategy,

    /// Delete the source branch after merging
    #[arg(long)]
    pub close_source_branch: bool,

    #[command(flatten)]
    pub exec: ExecArgs,
}

#[derive(Args, Debug)]
pub struct SearchPrsArgs {
    /// Repository slug
    #[arg(long, short = 'r')]
    pub repo: String,

    /// State filter: OPEN, MERGED, DECLINED, SUPERSEDED or ALL
    #[arg(long, short = 's', default_value = "ALL")]
    pub state: PullRequestState,

    #[command(flatten)]
    pub exec: ExecArgs,
}

#[derive(Args, Debug)]
pub struct GetFileArgs {
    /// Repository slug
    #[arg(long, short = 'r')]
    pub repo: String,

    /// Branch to read from
    #[arg(long, short = 'b')]
    pub branch: String,

    /// Path of the file inside the repository
    pub path: String,

    #[command(flatten)]
    pub exec: ExecArgs,
}

impl OpCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let operation = self.to_operation()?;
        let writer = global.writer();

        if self.exec().dry_run {
            let workspace = global.resolve_workspace(&config)?;
            return print_dry_run(&writer, &global.client(&config)?, &operation, &workspace);
        }

        let credentials = global.resolve_credentials(&config)?;
        let dispatcher = global.dispatcher(&config)?;
        let result = dispatcher
            .execute(&operation, &credentials)
            .await
            .map_err(CommandError::from_request)?;

        writer.write_result(&result)?;
        if !writer.is_json() {
            writer.write_success(&format!(
                "{} on {}/{}",
                operation.kind(),
                credentials.workspace,
                operation.repository()
            ));
        }
        Ok(())
    }

    fn exec(&self) -> &ExecArgs {
        match self {
            Self::CommitFiles(args) => &args.exec,
            Self::CreateBranch(args) => &args.exec,
            Self::CreatePr(args) => &args.exec,
            Self::AddComment(args) => &args.exec,
            Self::GetPr(args) => &args.exec,
            Self::MergePr(args) => &args.exec,
            Self::SearchPrs(args) => &args.exec,
            Self::GetFile(args) => &args.exec,
        }
    }

    /// Builds the operation described by the flags.
    pub fn to_operation(&self) -> Result<Operation> {
        let operation = match self {
            Self::CommitFiles(args) => Operation::CommitFiles(CommitFiles {
                repository: args.repo.clone(),
                branch: args.branch.clone(),
                message: args.message.clone(),
                files: collect_files(&args.files, &args.inline)?,
            }),
            Self::CreateBranch(args) => Operation::CreateBranch(CreateBranch {
                repository: args.repo.clone(),
                branch_name: args.name.clone(),
                source_branch: args.source.clone(),
            }),
            Self::CreatePr(args) => Operation::CreatePullRequest(CreatePullRequest {
                repository: args.repo.clone(),
                source_branch: args.source.clone(),
                destination_branch: args.destination.clone(),
                title: args.title.clone(),
                description: args.description.clone(),
            }),
            Self::AddComment(args) => Operation::AddComment(AddComment {
                repository: args.repo.clone(),
                pull_request_id: args.id,
                comment: args.body.clone(),
            }),
            Self::GetPr(args) => Operation::GetPullRequest(GetPullRequest {
                repository: args.repo.clone(),
                pull_request_id: args.id,
            }),
            Self::MergePr(args) => Operation::MergePullRequest(MergePullRequest {
                repository: args.repo.clone(),
                pull_request_id: args.id,
                strategy: args.strategy,
                close_source_branch: args.close_source_branch,
            }),
            Self::SearchPrs(args) => Operation::SearchPullRequests(SearchPullRequests {
                repository: args.repo.clone(),
                state: args.state,
            }),
            Self::GetFile(args) => Operation::GetFileContent(GetFileContent {
                repository: args.repo.clone(),
                branch: args.branch.clone(),
                file_path: args.path.clone(),
            }),
        };
        Ok(operation)
    }
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((path, value)) if !path.is_empty() => Ok((path, value)),
        _ => bail!("Expected REPO_PATH=VALUE, got '{}'", pair),
    }
}

/// Reads `--file` entries from disk and appends `--inline` entries as given.
fn collect_files(files: &[String], inline: &[String]) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::with_capacity(files.len() + inline.len());

    for pair in files {
        let (path, local) = split_pair(pair)?;
        let local = PathBuf::from(local);
        let content = std::fs::read_to_string(&local)
            .with_context(|| format!("Failed to read {}", local.display()))?;
        entries.push(FileEntry::new(path, content));
    }

    for pair in inline {
        let (path, content) = split_pair(pair)?;
        entries.push(FileEntry::new(path, content));
    }

    Ok(entries)
}

/// Describes one prepared request for `--dry-run` output.
pub(crate) fn describe_request(
    client: &BitbucketClient,
    request: &PreparedRequest,
) -> Result<serde_json::Value> {
    let url = client.url_for(request)?;
    let body = match &request.body {
        RequestBody::Empty => serde_json::Value::Null,
        RequestBody::Json(value) => value.clone(),
        RequestBody::Form(fields) => {
            let map: serde_json::Map<String, serde_json::Value> = fields
                .iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect();
            json!({ "form": map })
        }
    };
    Ok(json!({
        "method": request.method.as_str(),
        "url": url.as_str(),
        "body": body,
    }))
}

/// Validates and prepares an operation, returning the requests it would send.
pub(crate) fn preview_operation(
    client: &BitbucketClient,
    operation: &Operation,
    workspace: &str,
) -> Result<Vec<serde_json::Value>> {
    // Same checks the dispatcher runs, with a placeholder secret.
    Credentials::new(workspace, "-", "-").validate()?;
    operation.validate()?;
    operation
        .prepare(workspace)?
        .preview()?
        .iter()
        .map(|request| describe_request(client, request))
        .collect()
}

fn print_dry_run(
    writer: &OutputWriter,
    client: &BitbucketClient,
    operation: &Operation,
    workspace: &str,
) -> Result<()> {
    let requests = preview_operation(client, operation, workspace)?;

    if writer.is_json() {
        return crate::output::write_json(&requests);
    }

    print_header(&format!("{} (dry run)", operation.kind()));
    for request in &requests {
        println!(
            "{} {}",
            request["method"].as_str().unwrap_or_default(),
            request["url"].as_str().unwrap_or_default()
        );
        if !request["body"].is_null() {
            println!("{}", serde_json::to_string_pretty(&request["body"])?);
        }
    }
    Ok(())
}
