//
//  bitbucket-ops
//  operations/params.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Per-operation parameter sets.
//!
//! Field names are snake_case; the camelCase names used by workflow
//! automation records (`pullRequestId`, `sourceBranch`, ...) are accepted as
//! aliases. Text fields default to empty so a missing field is reported by
//! [`Operation::validate`](super::Operation::validate) for that record
//! rather than failing the whole input file.

use serde::{Deserialize, Deserializer, Serialize};

use crate::api::cloud::{FileEntry, MergeStrategy, PullRequestState};

/// Commit one or more files to a branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitFiles {
    /// Repository slug.
    #[serde(default)]
    pub repository: String,

    /// Branch to commit to.
    #[serde(default)]
    pub branch: String,

    /// Commit message.
    #[serde(default, alias = "commitMessage")]
    pub message: String,

    /// Files to write, keyed by repository path.
    ///
    /// Accepts a plain list or the `{"fileData": [...]}` collection shape.
    #[serde(default, deserialize_with = "deserialize_files")]
    pub files: Vec<FileEntry>,
}

fn deserialize_files<'de, D>(deserializer: D) -> Result<Vec<FileEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Files {
        List(Vec<FileEntry>),
        Collection {
            #[serde(default, rename = "fileData")]
            file_data: Vec<FileEntry>,
        },
    }

    Ok(match Files::deserialize(deserializer)? {
        Files::List(files) => files,
        Files::Collection { file_data } => file_data,
    })
}

/// Create a branch from the head of another branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateBranch {
    /// Repository slug.
    #[serde(default)]
    pub repository: String,

    /// Name of the branch to create.
    #[serde(default, alias = "branchName")]
    pub branch_name: String,

    /// Branch whose head commit the new branch starts from.
    #[serde(default, alias = "sourceBranch", alias = "sourceBranchForNew")]
    pub source_branch: String,
}

/// Open a pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatePullRequest {
    /// Repository slug.
    #[serde(default)]
    pub repository: String,

    /// Branch containing the changes.
    #[serde(default, alias = "sourceBranch")]
    pub source_branch: String,

    /// Branch to merge into.
    #[serde(default, alias = "destinationBranch")]
    pub destination_branch: String,

    /// Pull request title.
    #[serde(default)]
    pub title: String,

    /// Pull request description; empty when omitted.
    #[serde(default)]
    pub description: String,
}

/// Comment on a pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddComment {
    /// Repository slug.
    #[serde(default)]
    pub repository: String,

    /// Pull request number.
    #[serde(default, alias = "pullRequestId")]
    pub pull_request_id: i64,

    /// Comment text (Markdown).
    #[serde(default)]
    pub comment: String,
}

/// Fetch a single pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetPullRequest {
    /// Repository slug.
    #[serde(default)]
    pub repository: String,

    /// Pull request number.
    #[serde(default, alias = "pullRequestId")]
    pub pull_request_id: i64,
}

/// Merge a pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergePullRequest {
    /// Repository slug.
    #[serde(default)]
    pub repository: String,

    /// Pull request number.
    #[serde(default, alias = "pullRequestId")]
    pub pull_request_id: i64,

    /// Merge strategy, `merge_commit` when omitted.
    #[serde(default, alias = "mergeStrategy")]
    pub strategy: MergeStrategy,

    /// Delete the source branch after merging, `false` when omitted.
    #[serde(default, alias = "closeSourceBranch")]
    pub close_source_branch: bool,
}

/// List a repository's pull requests, optionally filtered by state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPullRequests {
    /// Repository slug.
    #[serde(default)]
    pub repository: String,

    /// State filter; empty means all states.
    #[serde(default)]
    pub state: PullRequestState,
}

/// Read a file from a branch.
///
/// The file must be UTF-8 text; a binary file fails the record with an
/// unexpected-response error rather than being decoded lossily.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetFileContent {
    /// Repository slug.
    #[serde(default)]
    pub repository: String,

    /// Branch to read from.
    #[serde(default)]
    pub branch: String,

    /// Path of the file inside the repository.
    #[serde(default, alias = "filePath")]
    pub file_path: String,
}
