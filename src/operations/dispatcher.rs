//
//  bitbucket-ops
//  operations/dispatcher.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Operation dispatch.
//!
//! The [`Dispatcher`] validates a record, prepares its [`RequestPlan`], sends
//! it through the [`BitbucketClient`] and normalizes the response into a
//! JSON value:
//!
//! - JSON operations return the decoded body (`{}` for an empty body)
//! - `get_file_content` returns `{content, path, branch}`
//! - `create_branch` returns the body of the creation call

use async_trait::async_trait;
use serde_json::Value;

use super::{BranchCreation, Operation, RequestPlan, ResponseKind};
use crate::api::cloud::{BranchRef, FileContent};
use crate::api::{BitbucketClient, PreparedRequest, RequestError};
use crate::auth::{BasicAuth, Credentials};

/// Something that can execute one operation with a credential tuple.
///
/// [`Dispatcher`] is the real implementation; batch tests substitute their
/// own.
#[async_trait]
pub trait Dispatch: Send + Sync {
    /// Executes one operation and returns its normalized result.
    async fn execute(
        &self,
        operation: &Operation,
        credentials: &Credentials,
    ) -> Result<Value, RequestError>;
}

/// Executes operations against Bitbucket Cloud.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_ops::api::BitbucketClient;
/// use bitbucket_ops::auth::Credentials;
/// use bitbucket_ops::operations::{Dispatch, Dispatcher, GetPullRequest, Operation};
///
/// # async fn example() -> anyhow::Result<()> {
/// let dispatcher = Dispatcher::new(BitbucketClient::cloud()?);
/// let credentials = Credentials::new("acme", "jdoe", "s3cret");
/// let operation = Operation::GetPullRequest(GetPullRequest {
///     repository: "app".to_string(),
///     pull_request_id: 42,
/// });
/// let pr = dispatcher.execute(&operation, &credentials).await?;
/// println!("{}", pr["title"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: BitbucketClient,
}

impl Dispatcher {
    /// Creates a dispatcher on top of a client.
    pub fn new(client: BitbucketClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &BitbucketClient {
        &self.client
    }

    async fn send_json(
        &self,
        request: &PreparedRequest,
        auth: &BasicAuth,
    ) -> Result<Value, RequestError> {
        self.client.execute_json(request, auth).await
    }

    async fn create_branch(
        &self,
        lookup: &PreparedRequest,
        create: &BranchCreation,
        auth: &BasicAuth,
    ) -> Result<Value, RequestError> {
        let source = self.send_json(lookup, auth).await?;
        let branch: BranchRef = serde_json::from_value(source).map_err(|e| {
            RequestError::unexpected_response(format!(
                "branch `{}` has no head commit: {}",
                create.source_branch(),
                e
            ))
        })?;
        if branch.target.hash.is_empty() {
            return Err(RequestError::unexpected_response(format!(
                "branch `{}` has no head commit",
                create.source_branch()
            )));
        }

        tracing::debug!(
            source = create.source_branch(),
            hash = %branch.target.hash,
            branch = create.branch_name(),
            "creating branch"
        );
        let request = create.request(&branch.target.hash)?;
        self.send_json(&request, auth).await
    }
}

#[async_trait]
impl Dispatch for Dispatcher {
    async fn execute(
        &self,
        operation: &Operation,
        credentials: &Credentials,
    ) -> Result<Value, RequestError> {
        credentials.validate()?;
        operation.validate()?;

        let plan = operation.prepare(&credentials.workspace)?;
        let auth = credentials.auth_header();
        tracing::debug!(operation = %operation.kind(), repository = operation.repository(), "dispatching");

        match plan {
            RequestPlan::Single {
                request,
                response: ResponseKind::Json,
            } => self.send_json(&request, &auth).await,
            RequestPlan::Single {
                request,
                response: ResponseKind::FileContent { path, branch },
            } => {
                let content = self.client.execute_text(&request, &auth).await?;
                let file = FileContent {
                    content,
                    path,
                    branch,
                };
                serde_json::to_value(file)
                    .map_err(|e| RequestError::unexpected_response(e.to_string()))
            }
            RequestPlan::CreateBranch { lookup, create } => {
                self.create_branch(&lookup, &create, &auth).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cloud::{FileEntry, MergeStrategy, PullRequestState};
    use crate::operations::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    const AUTH: &str = "Basic amRvZTpzM2NyZXQ=";

    fn credentials() -> Credentials {
        Credentials::new("acme", "jdoe", "s3cret")
    }

    fn dispatcher(server: &ServerGuard) -> Dispatcher {
        Dispatcher::new(
            BitbucketClient::with_base_url(&format!("{}/2.0", server.url())).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_commit_files() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/2.0/repositories/acme/app/src")
            .match_header("authorization", AUTH)
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::Exact("a.txt=hi&message=m&branch=main".to_string()))
            .with_status(201)
            .create_async()
            .await;

        let operation = Operation::CommitFiles(CommitFiles {
            repository: "app".into(),
            branch: "main".into(),
            message: "m".into(),
            files: vec![FileEntry::new("a.txt", "hi")],
        });
        let result = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, json!({}));
    }

    #[tokio::test]
    async fn test_create_branch_resolves_source_head() {
        let mut server = Server::new_async().await;
        let lookup = server
            .mock("GET", "/2.0/repositories/acme/app/refs/branches/main")
            .match_header("authorization", AUTH)
            .with_status(200)
            .with_body(r#"{"name": "main", "target": {"hash": "abc123"}}"#)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/2.0/repositories/acme/app/refs/branches")
            .match_header("authorization", AUTH)
            .match_body(Matcher::Json(
                json!({"name": "feature/y", "target": {"hash": "abc123"}}),
            ))
            .with_status(201)
            .with_body(r#"{"name": "feature/y", "target": {"hash": "abc123"}}"#)
            .create_async()
            .await;

        let operation = Operation::CreateBranch(CreateBranch {
            repository: "app".into(),
            branch_name: "feature/y".into(),
            source_branch: "main".into(),
        });
        let result = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap();

        lookup.assert_async().await;
        create.assert_async().await;
        assert_eq!(result["name"], "feature/y");
    }

    #[tokio::test]
    async fn test_create_branch_stops_when_lookup_fails() {
        let mut server = Server::new_async().await;
        let _lookup = server
            .mock("GET", "/2.0/repositories/acme/app/refs/branches/nope")
            .with_status(404)
            .with_body(r#"{"type": "error", "error": {"message": "Branch not found"}}"#)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/2.0/repositories/acme/app/refs/branches")
            .expect(0)
            .create_async()
            .await;

        let operation = Operation::CreateBranch(CreateBranch {
            repository: "app".into(),
            branch_name: "feature/y".into(),
            source_branch: "nope".into(),
        });
        let err = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap_err();

        create.assert_async().await;
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "Branch not found");
    }

    #[tokio::test]
    async fn test_create_branch_without_hash_is_unexpected() {
        let mut server = Server::new_async().await;
        let _lookup = server
            .mock("GET", "/2.0/repositories/acme/app/refs/branches/main")
            .with_status(200)
            .with_body(r#"{"name": "main"}"#)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/2.0/repositories/acme/app/refs/branches")
            .expect(0)
            .create_async()
            .await;

        let operation = Operation::CreateBranch(CreateBranch {
            repository: "app".into(),
            branch_name: "feature/y".into(),
            source_branch: "main".into(),
        });
        let err = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap_err();

        create.assert_async().await;
        assert!(matches!(err, RequestError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_create_pull_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/2.0/repositories/acme/app/pullrequests")
            .match_header("authorization", AUTH)
            .match_body(Matcher::Json(json!({
                "title": "Add X",
                "description": "",
                "source": {"branch": {"name": "feat/x"}},
                "destination": {"branch": {"name": "main"}},
                "close_source_branch": false
            })))
            .with_status(201)
            .with_body(r#"{"id": 12, "title": "Add X", "state": "OPEN"}"#)
            .create_async()
            .await;

        let operation = Operation::CreatePullRequest(CreatePullRequest {
            repository: "app".into(),
            source_branch: "feat/x".into(),
            destination_branch: "main".into(),
            title: "Add X".into(),
            description: String::new(),
        });
        let result = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result["id"], 12);
    }

    #[tokio::test]
    async fn test_add_comment() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/2.0/repositories/acme/app/pullrequests/7/comments")
            .match_body(Matcher::Json(json!({"content": {"raw": "LGTM"}})))
            .with_status(201)
            .with_body(r#"{"id": 99, "content": {"raw": "LGTM"}}"#)
            .create_async()
            .await;

        let operation = Operation::AddComment(AddComment {
            repository: "app".into(),
            pull_request_id: 7,
            comment: "LGTM".into(),
        });
        let result = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result["content"]["raw"], "LGTM");
    }

    #[tokio::test]
    async fn test_get_pull_request_passes_body_through() {
        let mut server = Server::new_async().await;
        let body = json!({"id": 7, "title": "Fix", "state": "OPEN", "author": {"display_name": "Jane"}});
        let mock = server
            .mock("GET", "/2.0/repositories/acme/app/pullrequests/7")
            .match_header("authorization", AUTH)
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let operation = Operation::GetPullRequest(GetPullRequest {
            repository: "app".into(),
            pull_request_id: 7,
        });
        let result = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, body);
    }

    #[tokio::test]
    async fn test_merge_pull_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/2.0/repositories/acme/app/pullrequests/7/merge")
            .match_body(Matcher::Json(
                json!({"type": "squash", "close_source_branch": true}),
            ))
            .with_status(200)
            .with_body(r#"{"id": 7, "state": "MERGED"}"#)
            .create_async()
            .await;

        let operation = Operation::MergePullRequest(MergePullRequest {
            repository: "app".into(),
            pull_request_id: 7,
            strategy: MergeStrategy::Squash,
            close_source_branch: true,
        });
        let result = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result["state"], "MERGED");
    }

    #[tokio::test]
    async fn test_search_pull_requests_with_state() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/2.0/repositories/acme/app/pullrequests")
            .match_query(Matcher::UrlEncoded("state".into(), "MERGED".into()))
            .with_status(200)
            .with_body(r#"{"values": [{"id": 3}], "pagelen": 10, "size": 1}"#)
            .create_async()
            .await;

        let operation = Operation::SearchPullRequests(SearchPullRequests {
            repository: "app".into(),
            state: PullRequestState::Merged,
        });
        let result = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result["values"][0]["id"], 3);
    }

    #[tokio::test]
    async fn test_search_pull_requests_without_state() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/2.0/repositories/acme/app/pullrequests")
            .with_status(200)
            .with_body(r#"{"values": []}"#)
            .create_async()
            .await;

        let operation = Operation::SearchPullRequests(SearchPullRequests {
            repository: "app".into(),
            state: PullRequestState::All,
        });
        dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_file_content_wraps_raw_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/2.0/repositories/acme/app/src/main/docs/readme.md")
            .match_header("authorization", AUTH)
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("# Hello\n")
            .create_async()
            .await;

        let operation = Operation::GetFileContent(GetFileContent {
            repository: "app".into(),
            branch: "main".into(),
            file_path: "docs/readme.md".into(),
        });
        let result = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            json!({"content": "# Hello\n", "path": "docs/readme.md", "branch": "main"})
        );
    }

    #[tokio::test]
    async fn test_invalid_operation_sends_nothing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let operation = Operation::GetPullRequest(GetPullRequest {
            repository: "app".into(),
            pull_request_id: 0,
        });
        let err = dispatcher(&server)
            .execute(&operation, &credentials())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, RequestError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_missing_secret_sends_nothing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let operation = Operation::GetPullRequest(GetPullRequest {
            repository: "app".into(),
            pull_request_id: 1,
        });
        let err = dispatcher(&server)
            .execute(&operation, &Credentials::new("acme", "jdoe", ""))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.message(), "missing required credential `secret`");
    }
}
