//
//  bitbucket-ops
//  operations/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Operations
//!
//! The eight Bitbucket Cloud operations, their parameter schema, and the pure
//! translation from `(operation, workspace)` to outbound requests.
//!
//! ## Overview
//!
//! | Operation | Method | Path (under `/2.0/repositories/{ws}/{repo}`) |
//! |-----------|--------|-----------------------------------------------|
//! | `commit_files` | POST | `/src` (form-encoded) |
//! | `create_branch` | GET, then POST | `/refs/branches/{source}`, then `/refs/branches` |
//! | `create_pull_request` | POST | `/pullrequests` |
//! | `add_comment` | POST | `/pullrequests/{id}/comments` |
//! | `get_pull_request` | GET | `/pullrequests/{id}` |
//! | `merge_pull_request` | POST | `/pullrequests/{id}/merge` |
//! | `search_pull_requests` | GET | `/pullrequests[?state=STATE]` |
//! | `get_file_content` | GET | `/src/{branch}/{path}` (raw text) |
//!
//! ## Records
//!
//! Operations deserialize from records tagged by an `operation` field. The
//! camelCase identifiers used by existing workflow records (`createPR`, `getPR`, ...) are
//! accepted as aliases.
//!
//! ```rust
//! use bitbucket_ops::operations::{Operation, OperationKind};
//!
//! let record = r#"{"operation": "getPR", "repository": "app", "pullRequestId": 42}"#;
//! let operation: Operation = serde_json::from_str(record).unwrap();
//! assert_eq!(operation.kind(), OperationKind::GetPullRequest);
//! assert!(operation.validate().is_ok());
//! ```
//!
//! ## Submodules
//!
//! - [`params`]: Per-operation parameter structs
//! - [`dispatcher`]: Sends prepared requests and normalizes responses

pub mod dispatcher;
pub mod params;

pub use dispatcher::*;
pub use params::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::cloud::{
    CommentRequest, CommitFilesForm, CreateBranchRequest, CreatePullRequestRequest,
    MergePullRequestRequest,
};
use crate::api::{PreparedRequest, RequestBody, RequestError};
use crate::util::{is_dot_segment, is_valid_slug};

/// One Bitbucket operation with its parameters.
///
/// Every variant carries a repository slug; variants that address an
/// existing pull request carry a positive `pull_request_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation")]
pub enum Operation {
    /// Commit files to a branch.
    #[serde(rename = "commit_files", alias = "commitFiles")]
    CommitFiles(CommitFiles),

    /// Create a branch from another branch's head.
    #[serde(rename = "create_branch", alias = "createBranch")]
    CreateBranch(CreateBranch),

    /// Open a pull request.
    #[serde(rename = "create_pull_request", alias = "createPR")]
    CreatePullRequest(CreatePullRequest),

    /// Comment on a pull request.
    #[serde(rename = "add_comment", alias = "addPRComment")]
    AddComment(AddComment),

    /// Fetch a pull request.
    #[serde(rename = "get_pull_request", alias = "getPR")]
    GetPullRequest(GetPullRequest),

    /// Merge a pull request.
    #[serde(rename = "merge_pull_request", alias = "mergePR")]
    MergePullRequest(MergePullRequest),

    /// List pull requests.
    #[serde(rename = "search_pull_requests", alias = "searchPRs")]
    SearchPullRequests(SearchPullRequests),

    /// Read a file from a branch.
    #[serde(rename = "get_file_content", alias = "getFileContent")]
    GetFileContent(GetFileContent),
}

/// The operation selector, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// See [`Operation::CommitFiles`].
    CommitFiles,
    /// See [`Operation::CreateBranch`].
    CreateBranch,
    /// See [`Operation::CreatePullRequest`].
    CreatePullRequest,
    /// See [`Operation::AddComment`].
    AddComment,
    /// See [`Operation::GetPullRequest`].
    GetPullRequest,
    /// See [`Operation::MergePullRequest`].
    MergePullRequest,
    /// See [`Operation::SearchPullRequests`].
    SearchPullRequests,
    /// See [`Operation::GetFileContent`].
    GetFileContent,
}

/// One parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Parameter name as used in records.
    pub name: &'static str,
    /// Whether the parameter must be present and non-empty.
    pub required: bool,
    /// Short human description.
    pub description: &'static str,
}

const fn required(name: &'static str, description: &'static str) -> ParameterSpec {
    ParameterSpec {
        name,
        required: true,
        description,
    }
}

const fn optional(name: &'static str, description: &'static str) -> ParameterSpec {
    ParameterSpec {
        name,
        required: false,
        description,
    }
}

const REPOSITORY: ParameterSpec = required("repository", "Repository slug");
const PULL_REQUEST_ID: ParameterSpec = required("pull_request_id", "Pull request number");

impl OperationKind {
    /// Every operation, in display order.
    pub const ALL: [OperationKind; 8] = [
        Self::CommitFiles,
        Self::CreateBranch,
        Self::CreatePullRequest,
        Self::AddComment,
        Self::GetPullRequest,
        Self::MergePullRequest,
        Self::SearchPullRequests,
        Self::GetFileContent,
    ];

    /// Returns the record identifier of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CommitFiles => "commit_files",
            Self::CreateBranch => "create_branch",
            Self::CreatePullRequest => "create_pull_request",
            Self::AddComment => "add_comment",
            Self::GetPullRequest => "get_pull_request",
            Self::MergePullRequest => "merge_pull_request",
            Self::SearchPullRequests => "search_pull_requests",
            Self::GetFileContent => "get_file_content",
        }
    }

    /// Returns a one-line description of the operation.
    pub fn description(&self) -> &'static str {
        match self {
            Self::CommitFiles => "Commit one or more files to a branch",
            Self::CreateBranch => "Create a branch from another branch's head commit",
            Self::CreatePullRequest => "Open a pull request",
            Self::AddComment => "Add a comment to a pull request",
            Self::GetPullRequest => "Get a pull request",
            Self::MergePullRequest => "Merge a pull request",
            Self::SearchPullRequests => "List pull requests, optionally by state",
            Self::GetFileContent => "Read a file from a branch",
        }
    }

    /// Returns the parameters the operation accepts.
    pub fn parameters(&self) -> &'static [ParameterSpec] {
        const COMMIT_FILES: &[ParameterSpec] = &[
            REPOSITORY,
            required("branch", "Branch to commit to"),
            required("message", "Commit message"),
            required("files", "Files as {path, content} pairs"),
        ];
        const CREATE_BRANCH: &[ParameterSpec] = &[
            REPOSITORY,
            required("branch_name", "Name of the new branch"),
            required("source_branch", "Branch to start from"),
        ];
        const CREATE_PULL_REQUEST: &[ParameterSpec] = &[
            REPOSITORY,
            required("source_branch", "Branch containing the changes"),
            required("destination_branch", "Branch to merge into"),
            required("title", "Pull request title"),
            optional("description", "Pull request description"),
        ];
        const ADD_COMMENT: &[ParameterSpec] = &[
            REPOSITORY,
            PULL_REQUEST_ID,
            required("comment", "Comment text"),
        ];
        const GET_PULL_REQUEST: &[ParameterSpec] = &[REPOSITORY, PULL_REQUEST_ID];
        const MERGE_PULL_REQUEST: &[ParameterSpec] = &[
            REPOSITORY,
            PULL_REQUEST_ID,
            optional("strategy", "merge_commit (default), squash or fast_forward"),
            optional("close_source_branch", "Delete the source branch (default false)"),
        ];
        const SEARCH_PULL_REQUESTS: &[ParameterSpec] = &[
            REPOSITORY,
            optional("state", "OPEN, MERGED, DECLINED or SUPERSEDED (default all)"),
        ];
        const GET_FILE_CONTENT: &[ParameterSpec] = &[
            REPOSITORY,
            required("branch", "Branch to read from"),
            required("file_path", "Path of the file"),
        ];

        match self {
            Self::CommitFiles => COMMIT_FILES,
            Self::CreateBranch => CREATE_BRANCH,
            Self::CreatePullRequest => CREATE_PULL_REQUEST,
            Self::AddComment => ADD_COMMENT,
            Self::GetPullRequest => GET_PULL_REQUEST,
            Self::MergePullRequest => MERGE_PULL_REQUEST,
            Self::SearchPullRequests => SEARCH_PULL_REQUESTS,
            Self::GetFileContent => GET_FILE_CONTENT,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a successful response is turned into a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind {
    /// The JSON body is the result.
    Json,
    /// The raw text body is wrapped as `{content, path, branch}`.
    FileContent {
        /// Requested file path
        path: String,
        /// Requested branch
        branch: String,
    },
}

/// Second step of branch creation, waiting for the source branch's head hash.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchCreation {
    segments: Vec<String>,
    branch_name: String,
    source_branch: String,
}

impl BranchCreation {
    /// Name of the branch to create.
    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    /// Name of the branch whose head is being resolved.
    pub fn source_branch(&self) -> &str {
        &self.source_branch
    }

    /// Builds the creation request for the resolved head commit.
    pub fn request(&self, hash: &str) -> Result<PreparedRequest, RequestError> {
        let body = RequestBody::json(&CreateBranchRequest::new(&self.branch_name, hash))?;
        Ok(PreparedRequest::post(self.segments.clone(), body))
    }
}

/// The outbound calls an operation needs.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPlan {
    /// One round trip.
    Single {
        /// The request to send
        request: PreparedRequest,
        /// How to normalize the response
        response: ResponseKind,
    },
    /// Resolve the source branch head, then create the branch from it.
    CreateBranch {
        /// `GET .../refs/branches/{source}`
        lookup: PreparedRequest,
        /// `POST .../refs/branches`, built once the hash is known
        create: BranchCreation,
    },
}

impl RequestPlan {
    /// Lists the requests the plan will send, in order.
    ///
    /// The branch creation body holds a `<head of SOURCE>` placeholder since
    /// the real hash is only known after the lookup.
    pub fn preview(&self) -> Result<Vec<PreparedRequest>, RequestError> {
        match self {
            Self::Single { request, .. } => Ok(vec![request.clone()]),
            Self::CreateBranch { lookup, create } => {
                let placeholder = format!("<head of {}>", create.source_branch);
                Ok(vec![lookup.clone(), create.request(&placeholder)?])
            }
        }
    }
}

fn repo_path(workspace: &str, repository: &str, tail: &[&str]) -> Vec<String> {
    ["repositories", workspace, repository]
        .iter()
        .chain(tail)
        .map(|s| s.to_string())
        .collect()
}

fn missing(name: &str) -> RequestError {
    RequestError::invalid_parameter(format!("missing required parameter `{}`", name))
}

fn reject_dot_segment(name: &str, value: &str) -> Result<(), RequestError> {
    if is_dot_segment(value) {
        return Err(RequestError::invalid_parameter(format!(
            "`{}` must not contain a `{}` path segment",
            name, value
        )));
    }
    Ok(())
}

impl Operation {
    /// Returns the operation selector.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CommitFiles(_) => OperationKind::CommitFiles,
            Self::CreateBranch(_) => OperationKind::CreateBranch,
            Self::CreatePullRequest(_) => OperationKind::CreatePullRequest,
            Self::AddComment(_) => OperationKind::AddComment,
            Self::GetPullRequest(_) => OperationKind::GetPullRequest,
            Self::MergePullRequest(_) => OperationKind::MergePullRequest,
            Self::SearchPullRequests(_) => OperationKind::SearchPullRequests,
            Self::GetFileContent(_) => OperationKind::GetFileContent,
        }
    }

    /// Returns the repository slug.
    pub fn repository(&self) -> &str {
        match self {
            Self::CommitFiles(p) => &p.repository,
            Self::CreateBranch(p) => &p.repository,
            Self::CreatePullRequest(p) => &p.repository,
            Self::AddComment(p) => &p.repository,
            Self::GetPullRequest(p) => &p.repository,
            Self::MergePullRequest(p) => &p.repository,
            Self::SearchPullRequests(p) => &p.repository,
            Self::GetFileContent(p) => &p.repository,
        }
    }

    /// Returns the pull request number for operations on an existing PR.
    pub fn pull_request_id(&self) -> Option<i64> {
        match self {
            Self::AddComment(p) => Some(p.pull_request_id),
            Self::GetPullRequest(p) => Some(p.pull_request_id),
            Self::MergePullRequest(p) => Some(p.pull_request_id),
            _ => None,
        }
    }

    /// Required text parameters other than `repository`, by name.
    fn required_text(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::CommitFiles(p) => vec![("branch", &p.branch), ("message", &p.message)],
            Self::CreateBranch(p) => vec![
                ("branch_name", &p.branch_name),
                ("source_branch", &p.source_branch),
            ],
            Self::CreatePullRequest(p) => vec![
                ("source_branch", &p.source_branch),
                ("destination_branch", &p.destination_branch),
                ("title", &p.title),
            ],
            Self::AddComment(p) => vec![("comment", &p.comment)],
            Self::GetFileContent(p) => vec![("branch", &p.branch), ("file_path", &p.file_path)],
            Self::GetPullRequest(_) | Self::MergePullRequest(_) | Self::SearchPullRequests(_) => {
                Vec::new()
            }
        }
    }

    /// Checks the parameters before any request is built.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidParameter`] when:
    /// - `repository` is empty or not a valid slug
    /// - `pull_request_id` is not a positive integer
    /// - a required text parameter is empty
    /// - a branch or file path that lands in the URL is a `.` or `..` segment
    /// - `commit_files` has no files, or a file has an empty path
    pub fn validate(&self) -> Result<(), RequestError> {
        let repository = self.repository();
        if repository.trim().is_empty() {
            return Err(missing("repository"));
        }
        if !is_valid_slug(repository) {
            return Err(RequestError::invalid_parameter(format!(
                "invalid repository slug `{}`",
                repository
            )));
        }

        if let Some(id) = self.pull_request_id() {
            if id <= 0 {
                return Err(RequestError::invalid_parameter(format!(
                    "`pull_request_id` must be a positive integer, got {}",
                    id
                )));
            }
        }

        for (name, value) in self.required_text() {
            if value.trim().is_empty() {
                return Err(missing(name));
            }
        }

        match self {
            Self::CreateBranch(p) => reject_dot_segment("source_branch", &p.source_branch)?,
            Self::GetFileContent(p) => {
                reject_dot_segment("branch", &p.branch)?;
                for segment in p.file_path.split('/') {
                    reject_dot_segment("file_path", segment)?;
                }
            }
            _ => {}
        }

        if let Self::CommitFiles(p) = self {
            if p.files.is_empty() {
                return Err(missing("files"));
            }
            if p.files.iter().any(|f| f.path.trim_matches('/').trim().is_empty()) {
                return Err(RequestError::invalid_parameter("file path must not be empty"));
            }
        }

        Ok(())
    }

    /// Translates the operation into the requests it needs.
    ///
    /// This is a pure function of the operation and the workspace; it does
    /// not validate. Call [`Operation::validate`] first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitbucket_ops::operations::{Operation, RequestPlan, SearchPullRequests};
    /// use bitbucket_ops::api::cloud::PullRequestState;
    ///
    /// let operation = Operation::SearchPullRequests(SearchPullRequests {
    ///     repository: "app".to_string(),
    ///     state: PullRequestState::Merged,
    /// });
    /// match operation.prepare("acme").unwrap() {
    ///     RequestPlan::Single { request, .. } => {
    ///         assert_eq!(request.path(), "/repositories/acme/app/pullrequests?state=MERGED");
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn prepare(&self, workspace: &str) -> Result<RequestPlan, RequestError> {
        let single = |request: PreparedRequest| RequestPlan::Single {
            request,
            response: ResponseKind::Json,
        };

        let plan = match self {
            Self::CommitFiles(p) => {
                let form = CommitFilesForm::new(&p.files, &p.message, &p.branch);
                single(PreparedRequest::post(
                    repo_path(workspace, &p.repository, &["src"]),
                    RequestBody::Form(form.into_fields()),
                ))
            }
            Self::CreateBranch(p) => RequestPlan::CreateBranch {
                lookup: PreparedRequest::get(repo_path(
                    workspace,
                    &p.repository,
                    &["refs", "branches", p.source_branch.as_str()],
                )),
                create: BranchCreation {
                    segments: repo_path(workspace, &p.repository, &["refs", "branches"]),
                    branch_name: p.branch_name.clone(),
                    source_branch: p.source_branch.clone(),
                },
            },
            Self::CreatePullRequest(p) => {
                let body = CreatePullRequestRequest::new(
                    &p.title,
                    &p.description,
                    &p.source_branch,
                    &p.destination_branch,
                );
                single(PreparedRequest::post(
                    repo_path(workspace, &p.repository, &["pullrequests"]),
                    RequestBody::json(&body)?,
                ))
            }
            Self::AddComment(p) => {
                let id = p.pull_request_id.to_string();
                single(PreparedRequest::post(
                    repo_path(workspace, &p.repository, &["pullrequests", id.as_str(), "comments"]),
                    RequestBody::json(&CommentRequest::raw(&p.comment))?,
                ))
            }
            Self::GetPullRequest(p) => {
                let id = p.pull_request_id.to_string();
                single(PreparedRequest::get(repo_path(
                    workspace,
                    &p.repository,
                    &["pullrequests", id.as_str()],
                )))
            }
            Self::MergePullRequest(p) => {
                let id = p.pull_request_id.to_string();
                let body = MergePullRequestRequest {
                    strategy: p.strategy,
                    close_source_branch: p.close_source_branch,
                };
                single(PreparedRequest::post(
                    repo_path(workspace, &p.repository, &["pullrequests", id.as_str(), "merge"]),
                    RequestBody::json(&body)?,
                ))
            }
            Self::SearchPullRequests(p) => {
                let mut request =
                    PreparedRequest::get(repo_path(workspace, &p.repository, &["pullrequests"]));
                if let Some(state) = p.state.as_query() {
                    request = request.with_query("state", state);
                }
                single(request)
            }
            Self::GetFileContent(p) => {
                let mut segments = repo_path(workspace, &p.repository, &["src", p.branch.as_str()]);
                segments.extend(
                    p.file_path
                        .split('/')
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                );
                RequestPlan::Single {
                    request: PreparedRequest::get(segments),
                    response: ResponseKind::FileContent {
                        path: p.file_path.clone(),
                        branch: p.branch.clone(),
                    },
                }
            }
        };

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cloud::{FileEntry, MergeStrategy, PullRequestState};
    use reqwest::Method;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn single(operation: &Operation) -> (PreparedRequest, ResponseKind) {
        match operation.prepare("acme").unwrap() {
            RequestPlan::Single { request, response } => (request, response),
            other => panic!("expected a single request, got {:?}", other),
        }
    }

    fn sample(kind: OperationKind) -> Operation {
        match kind {
            OperationKind::CommitFiles => Operation::CommitFiles(CommitFiles {
                repository: "app".into(),
                branch: "main".into(),
                message: "m".into(),
                files: vec![FileEntry::new("a.txt", "hi")],
            }),
            OperationKind::CreateBranch => Operation::CreateBranch(CreateBranch {
                repository: "app".into(),
                branch_name: "feature/y".into(),
                source_branch: "main".into(),
            }),
            OperationKind::CreatePullRequest => Operation::CreatePullRequest(CreatePullRequest {
                repository: "app".into(),
                source_branch: "feat/x".into(),
                destination_branch: "main".into(),
                title: "Add X".into(),
                description: String::new(),
            }),
            OperationKind::AddComment => Operation::AddComment(AddComment {
                repository: "app".into(),
                pull_request_id: 7,
                comment: "LGTM".into(),
            }),
            OperationKind::GetPullRequest => Operation::GetPullRequest(GetPullRequest {
                repository: "app".into(),
                pull_request_id: 7,
            }),
            OperationKind::MergePullRequest => Operation::MergePullRequest(MergePullRequest {
                repository: "app".into(),
                pull_request_id: 7,
                ..Default::default()
            }),
            OperationKind::SearchPullRequests => {
                Operation::SearchPullRequests(SearchPullRequests {
                    repository: "app".into(),
                    state: PullRequestState::All,
                })
            }
            OperationKind::GetFileContent => Operation::GetFileContent(GetFileContent {
                repository: "app".into(),
                branch: "main".into(),
                file_path: "docs/readme.md".into(),
            }),
        }
    }

    #[test]
    fn test_methods_and_paths() {
        let expected = [
            (OperationKind::CommitFiles, Method::POST, "/repositories/acme/app/src"),
            (
                OperationKind::CreatePullRequest,
                Method::POST,
                "/repositories/acme/app/pullrequests",
            ),
            (
                OperationKind::AddComment,
                Method::POST,
                "/repositories/acme/app/pullrequests/7/comments",
            ),
            (
                OperationKind::GetPullRequest,
                Method::GET,
                "/repositories/acme/app/pullrequests/7",
            ),
            (
                OperationKind::MergePullRequest,
                Method::POST,
                "/repositories/acme/app/pullrequests/7/merge",
            ),
            (
                OperationKind::SearchPullRequests,
                Method::GET,
                "/repositories/acme/app/pullrequests",
            ),
            (
                OperationKind::GetFileContent,
                Method::GET,
                "/repositories/acme/app/src/main/docs/readme.md",
            ),
        ];

        for (kind, method, path) in expected {
            let (request, _) = single(&sample(kind));
            assert_eq!(request.method, method, "{}", kind);
            assert_eq!(request.path(), path, "{}", kind);
        }
    }

    #[test]
    fn test_create_pull_request_body() {
        let (request, _) = single(&sample(OperationKind::CreatePullRequest));
        assert_eq!(
            request.body.as_json().unwrap(),
            &json!({
                "title": "Add X",
                "description": "",
                "source": {"branch": {"name": "feat/x"}},
                "destination": {"branch": {"name": "main"}},
                "close_source_branch": false
            })
        );
    }

    #[test]
    fn test_commit_files_form() {
        let (request, _) = single(&sample(OperationKind::CommitFiles));
        assert_eq!(
            request.body.as_form().unwrap(),
            &[
                ("a.txt".to_string(), "hi".to_string()),
                ("message".to_string(), "m".to_string()),
                ("branch".to_string(), "main".to_string()),
            ]
        );
    }

    #[test]
    fn test_comment_and_merge_bodies() {
        let (request, _) = single(&sample(OperationKind::AddComment));
        assert_eq!(request.body.as_json().unwrap(), &json!({"content": {"raw": "LGTM"}}));

        let (request, _) = single(&sample(OperationKind::MergePullRequest));
        assert_eq!(
            request.body.as_json().unwrap(),
            &json!({"type": "merge_commit", "close_source_branch": false})
        );

        let squash = Operation::MergePullRequest(MergePullRequest {
            repository: "app".into(),
            pull_request_id: 7,
            strategy: MergeStrategy::Squash,
            close_source_branch: true,
        });
        let (request, _) = single(&squash);
        assert_eq!(
            request.body.as_json().unwrap(),
            &json!({"type": "squash", "close_source_branch": true})
        );
    }

    #[test]
    fn test_search_state_query() {
        let (request, _) = single(&sample(OperationKind::SearchPullRequests));
        assert!(request.query.is_empty());

        let merged = Operation::SearchPullRequests(SearchPullRequests {
            repository: "app".into(),
            state: PullRequestState::Merged,
        });
        let (request, _) = single(&merged);
        assert_eq!(request.query, vec![("state".to_string(), "MERGED".to_string())]);
    }

    #[test]
    fn test_file_content_response_kind() {
        let (request, response) = single(&sample(OperationKind::GetFileContent));
        assert_eq!(request.body, RequestBody::Empty);
        assert_eq!(
            response,
            ResponseKind::FileContent {
                path: "docs/readme.md".into(),
                branch: "main".into()
            }
        );
    }

    #[test]
    fn test_create_branch_plan() {
        let plan = sample(OperationKind::CreateBranch).prepare("acme").unwrap();
        let RequestPlan::CreateBranch { lookup, create } = plan else {
            panic!("expected a two-step plan");
        };
        assert_eq!(lookup.method, Method::GET);
        assert_eq!(lookup.segments.last().unwrap(), "main");
        assert_eq!(lookup.path(), "/repositories/acme/app/refs/branches/main");

        let request = create.request("abc123").unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path(), "/repositories/acme/app/refs/branches");
        assert_eq!(
            request.body.as_json().unwrap(),
            &json!({"name": "feature/y", "target": {"hash": "abc123"}})
        );
    }

    #[test]
    fn test_read_operations_do_not_mutate() {
        for kind in [
            OperationKind::GetPullRequest,
            OperationKind::GetFileContent,
            OperationKind::SearchPullRequests,
        ] {
            let (request, _) = single(&sample(kind));
            assert!(!request.is_mutation(), "{}", kind);
        }
    }

    #[test]
    fn test_record_aliases() {
        let operation: Operation = serde_json::from_value(json!({
            "operation": "createPR",
            "repository": "app",
            "sourceBranch": "feat/x",
            "destinationBranch": "main",
            "title": "Add X"
        }))
        .unwrap();
        assert_eq!(operation, sample(OperationKind::CreatePullRequest));

        let operation: Operation = serde_json::from_value(json!({
            "operation": "createBranch",
            "repository": "app",
            "branchName": "feature/y",
            "sourceBranchForNew": "main"
        }))
        .unwrap();
        assert_eq!(operation, sample(OperationKind::CreateBranch));

        let operation: Operation = serde_json::from_value(json!({
            "operation": "merge_pull_request",
            "repository": "app",
            "pull_request_id": 7,
            "mergeStrategy": "fast_forward",
            "closeSourceBranch": true
        }))
        .unwrap();
        assert_eq!(operation.kind(), OperationKind::MergePullRequest);
    }

    #[test]
    fn test_commit_files_collection_shape() {
        let wrapped: Operation = serde_json::from_value(json!({
            "operation": "commitFiles",
            "repository": "app",
            "branch": "main",
            "commitMessage": "m",
            "files": {"fileData": [{"path": "a.txt", "content": "hi"}]}
        }))
        .unwrap();
        assert_eq!(wrapped, sample(OperationKind::CommitFiles));

        let listed: Operation = serde_json::from_value(json!({
            "operation": "commit_files",
            "repository": "app",
            "branch": "main",
            "message": "m",
            "files": [{"path": "a.txt", "content": "hi"}]
        }))
        .unwrap();
        assert_eq!(listed, wrapped);

        let empty: Operation = serde_json::from_value(json!({
            "operation": "commitFiles",
            "repository": "app",
            "branch": "main",
            "message": "m",
            "files": {}
        }))
        .unwrap();
        assert_eq!(
            empty.validate().unwrap_err().message(),
            "missing required parameter `files`"
        );
    }

    #[test]
    fn test_unknown_operation_is_rejected() {
        let result: Result<Operation, _> =
            serde_json::from_value(json!({"operation": "deleteRepo", "repository": "app"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        for kind in OperationKind::ALL {
            assert!(sample(kind).validate().is_ok(), "{}", kind);
        }

        let missing_repo: Operation =
            serde_json::from_value(json!({"operation": "getPR", "pullRequestId": 1})).unwrap();
        assert_eq!(
            missing_repo.validate().unwrap_err().message(),
            "missing required parameter `repository`"
        );

        let zero_id: Operation =
            serde_json::from_value(json!({"operation": "getPR", "repository": "app"})).unwrap();
        assert!(zero_id.validate().is_err());

        let negative_id = Operation::AddComment(AddComment {
            repository: "app".into(),
            pull_request_id: -3,
            comment: "x".into(),
        });
        assert!(negative_id.validate().is_err());

        let no_files = Operation::CommitFiles(CommitFiles {
            files: Vec::new(),
            ..match sample(OperationKind::CommitFiles) {
                Operation::CommitFiles(p) => p,
                _ => unreachable!(),
            }
        });
        assert_eq!(
            no_files.validate().unwrap_err().message(),
            "missing required parameter `files`"
        );

        let bad_slug = Operation::SearchPullRequests(SearchPullRequests {
            repository: "../etc".into(),
            state: PullRequestState::All,
        });
        assert!(bad_slug.validate().is_err());
    }

    #[test]
    fn test_dot_segments_rejected() {
        let parent_repo = Operation::GetPullRequest(GetPullRequest {
            repository: "..".into(),
            pull_request_id: 1,
        });
        assert_eq!(
            parent_repo.validate().unwrap_err().message(),
            "invalid repository slug `..`"
        );

        let climbing_path = Operation::GetFileContent(GetFileContent {
            repository: "app".into(),
            branch: "main".into(),
            file_path: "../../../../user".into(),
        });
        assert_eq!(
            climbing_path.validate().unwrap_err().message(),
            "`file_path` must not contain a `..` path segment"
        );

        let current_dir = Operation::GetFileContent(GetFileContent {
            repository: "app".into(),
            branch: "main".into(),
            file_path: "docs/./readme.md".into(),
        });
        assert!(current_dir.validate().is_err());

        let dot_branch = Operation::GetFileContent(GetFileContent {
            repository: "app".into(),
            branch: "..".into(),
            file_path: "readme.md".into(),
        });
        assert!(dot_branch.validate().is_err());

        let dot_source = Operation::CreateBranch(CreateBranch {
            repository: "app".into(),
            branch_name: "feature/z".into(),
            source_branch: ".".into(),
        });
        assert!(dot_source.validate().is_err());

        let dotted_name = Operation::GetFileContent(GetFileContent {
            repository: "app".into(),
            branch: "release..1".into(),
            file_path: ".github/x..y".into(),
        });
        assert!(dotted_name.validate().is_ok());
    }

    #[test]
    fn test_parameter_schema_matches_validation() {
        for kind in OperationKind::ALL {
            let schema: BTreeSet<&str> = kind
                .parameters()
                .iter()
                .filter(|p| p.required)
                .map(|p| p.name)
                .collect();

            let operation = sample(kind);
            let mut validated: BTreeSet<&str> =
                operation.required_text().into_iter().map(|(n, _)| n).collect();
            validated.insert("repository");
            if operation.pull_request_id().is_some() {
                validated.insert("pull_request_id");
            }
            if kind == OperationKind::CommitFiles {
                validated.insert("files");
            }

            assert_eq!(schema, validated, "{}", kind);
        }
    }
}
