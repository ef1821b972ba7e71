//
//  bitbucket-ops
//  api/cloud/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud pull request API types and data structures.
//!
//! This module provides the request payloads for creating, commenting on and
//! merging pull requests in Bitbucket Cloud, plus the two small vocabularies
//! the operations expose: [`PullRequestState`] and [`MergeStrategy`].
//!
//! # Pull Request Lifecycle
//!
//! 1. **OPEN** - Initial state when created
//! 2. **MERGED** - Successfully merged into the destination branch
//! 3. **DECLINED** - Rejected and closed without merging
//! 4. **SUPERSEDED** - Replaced by another pull request
//!
//! # Example
//!
//! ```rust
//! use bitbucket_ops::api::cloud::pullrequests::CreatePullRequestRequest;
//!
//! let request = CreatePullRequestRequest::new("Add X", "", "feat/x", "main");
//! let body = serde_json::to_value(&request).unwrap();
//! assert_eq!(body["source"]["branch"]["name"], "feat/x");
//! assert_eq!(body["close_source_branch"], false);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Request payload for creating a new pull request.
///
/// # Fields
///
/// * `title` - Title of the pull request
/// * `description` - Description (Markdown supported), empty when not given
/// * `source` - The branch containing changes
/// * `destination` - The target branch for merging
/// * `close_source_branch` - Always `false` on creation
///
/// # Notes
///
/// - `close_source_branch` is fixed to `false` by [`CreatePullRequestRequest::new`];
///   the merge operation carries its own flag.
/// - The source and destination branches must exist.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatePullRequestRequest {
    /// The title of the pull request.
    pub title: String,

    /// Detailed description. Sent even when empty.
    pub description: String,

    /// The source branch containing the proposed changes.
    pub source: BranchSpec,

    /// The destination branch that changes will be merged into.
    pub destination: BranchSpec,

    /// Whether to delete the source branch after a successful merge.
    pub close_source_branch: bool,
}

impl CreatePullRequestRequest {
    /// Builds a creation payload with `close_source_branch` set to `false`.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        source_branch: impl Into<String>,
        destination_branch: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            source: BranchSpec::named(source_branch),
            destination: BranchSpec::named(destination_branch),
            close_source_branch: false,
        }
    }
}

/// Branch specification for pull request creation.
///
/// Serializes as `{"branch": {"name": "..."}}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BranchSpec {
    /// The branch name specification.
    pub branch: BranchName,
}

impl BranchSpec {
    /// Creates a branch spec from a branch name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            branch: BranchName { name: name.into() },
        }
    }
}

/// Branch name wrapper for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BranchName {
    /// The name of the branch.
    pub name: String,
}

/// Request payload for adding a comment to a pull request.
///
/// Serializes as `{"content": {"raw": "..."}}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentRequest {
    /// The comment body.
    pub content: CommentContent,
}

impl CommentRequest {
    /// Creates a comment payload from raw Markdown text.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            content: CommentContent { raw: text.into() },
        }
    }
}

/// Raw comment content.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentContent {
    /// Comment text in Bitbucket Markdown.
    pub raw: String,
}

/// Request payload for merging a pull request.
///
/// Serializes as `{"type": "<strategy>", "close_source_branch": <bool>}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MergePullRequestRequest {
    /// The merge strategy to use.
    #[serde(rename = "type")]
    pub strategy: MergeStrategy,

    /// Whether to delete the source branch after a successful merge.
    pub close_source_branch: bool,
}

/// How a pull request's commits are integrated into the destination branch.
///
/// # Variants
///
/// * `MergeCommit` - Creates a merge commit (default)
/// * `Squash` - Squashes all commits into a single commit
/// * `FastForward` - Fast-forward merge if possible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Create a merge commit.
    #[default]
    MergeCommit,
    /// Squash all commits into one.
    Squash,
    /// Fast-forward the destination branch.
    FastForward,
}

impl MergeStrategy {
    /// Returns the wire name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MergeCommit => "merge_commit",
            Self::Squash => "squash",
            Self::FastForward => "fast_forward",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "merge_commit" | "merge" => Ok(Self::MergeCommit),
            "squash" => Ok(Self::Squash),
            "fast_forward" | "ff" => Ok(Self::FastForward),
            other => Err(format!(
                "unknown merge strategy `{}` (expected merge_commit, squash or fast_forward)",
                other
            )),
        }
    }
}

/// Pull request state filter for searches.
///
/// `All` is the empty sentinel: it serializes as `""` and adds no `state`
/// query parameter at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullRequestState {
    /// No state filter.
    #[default]
    #[serde(rename = "", alias = "all", alias = "ALL")]
    All,
    /// Open pull requests.
    #[serde(rename = "OPEN", alias = "open")]
    Open,
    /// Merged pull requests.
    #[serde(rename = "MERGED", alias = "merged")]
    Merged,
    /// Declined pull requests.
    #[serde(rename = "DECLINED", alias = "declined")]
    Declined,
    /// Superseded pull requests.
    #[serde(rename = "SUPERSEDED", alias = "superseded")]
    Superseded,
}

impl PullRequestState {
    /// Returns the `state` query value, or `None` for [`PullRequestState::All`].
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Open => Some("OPEN"),
            Self::Merged => Some("MERGED"),
            Self::Declined => Some("DECLINED"),
            Self::Superseded => Some("SUPERSEDED"),
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query().unwrap_or("ALL"))
    }
}

impl FromStr for PullRequestState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "ALL" => Ok(Self::All),
            "OPEN" => Ok(Self::Open),
            "MERGED" => Ok(Self::Merged),
            "DECLINED" => Ok(Self::Declined),
            "SUPERSEDED" => Ok(Self::Superseded),
            other => Err(format!(
                "unknown pull request state `{}` (expected all, open, merged, declined or superseded)",
                other
            )),
        }
    }
}
