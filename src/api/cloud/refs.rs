//
//  bitbucket-ops
//  api/cloud/refs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud branch reference types.
//!
//! Bitbucket creates branches from a commit hash, not from a branch name, so
//! branch creation reads the source branch first ([`BranchRef`]) and then
//! posts a [`CreateBranchRequest`] pointing at its head commit.

use serde::{Deserialize, Serialize};

/// A branch as returned by `GET /repositories/{ws}/{repo}/refs/branches/{name}`.
///
/// Only the fields branch creation needs are modelled; everything else in
/// the response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    /// The commit at the head of the branch.
    pub target: CommitTarget,
}

/// A commit addressed by hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitTarget {
    /// The full SHA-1 hash of the commit.
    pub hash: String,
}

/// Request payload for creating a branch.
///
/// Serializes as `{"name": "...", "target": {"hash": "..."}}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateBranchRequest {
    /// Name of the new branch.
    pub name: String,

    /// Commit the new branch points at.
    pub target: CommitTarget,
}

impl CreateBranchRequest {
    /// Creates a payload for a branch named `name` at commit `hash`.
    pub fn new(name: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: CommitTarget { hash: hash.into() },
        }
    }
}
