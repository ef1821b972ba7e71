//
//  bitbucket-ops
//  batch/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Batch Runner
//!
//! Runs a sequence of operation records, in order, with one shared credential
//! tuple and an explicit [`FailurePolicy`].
//!
//! ## Failure Policies
//!
//! | Policy | On a failing record |
//! |--------|---------------------|
//! | [`FailurePolicy::Abort`] | Stop and return a [`BatchError`] naming the record |
//! | [`FailurePolicy::ContinueOnFail`] | Record `{"error": message}` in place and go on |
//!
//! Results keep the position of their input record, so the `n`th result
//! always belongs to the `n`th record.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_ops::api::BitbucketClient;
//! use bitbucket_ops::auth::Credentials;
//! use bitbucket_ops::batch::{load_records, BatchRunner, FailurePolicy};
//! use bitbucket_ops::operations::Dispatcher;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let records = load_records("records.json")?;
//! let runner = BatchRunner::new(Dispatcher::new(BitbucketClient::cloud()?))
//!     .with_policy(FailurePolicy::ContinueOnFail);
//! let report = runner.run(&records, &Credentials::new("acme", "jdoe", "s3cret")).await?;
//! println!("{} of {} records failed", report.failed(), report.len());
//! # Ok(())
//! # }
//! ```

mod loader;

pub use loader::*;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::api::RequestError;
use crate::auth::Credentials;
use crate::operations::{Dispatch, Operation, OperationKind};

/// What to do when a record fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure.
    #[default]
    Abort,
    /// Record the failure in place and continue.
    ContinueOnFail,
}

impl FailurePolicy {
    /// Maps a `continue_on_fail` flag to a policy.
    pub fn from_continue_on_fail(continue_on_fail: bool) -> Self {
        if continue_on_fail {
            Self::ContinueOnFail
        } else {
            Self::Abort
        }
    }
}

/// Result of one record.
///
/// Serializes as the success data itself, or as `{"error": message}`.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    /// Normalized response data.
    Success(Value),
    /// Failure message, only produced under [`FailurePolicy::ContinueOnFail`].
    Failure {
        /// The error message
        error: String,
    },
}

impl OperationResult {
    /// Returns `true` for a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts the result into its JSON form.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Success(data) => data.clone(),
            Self::Failure { error } => serde_json::json!({ "error": error }),
        }
    }
}

impl Serialize for OperationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(data) => data.serialize(serializer),
            Self::Failure { error } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", error)?;
                map.end()
            }
        }
    }
}

/// The outcome of one record, paired with its input position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordOutcome {
    /// Zero-based position of the input record.
    #[serde(rename = "pairedItem")]
    pub index: usize,

    /// Which operation the record ran.
    pub operation: OperationKind,

    /// What happened.
    pub result: OperationResult,
}

/// All outcomes of a completed run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BatchReport {
    outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    /// Returns the outcomes in input order.
    pub fn outcomes(&self) -> &[RecordOutcome] {
        &self.outcomes
    }

    /// Number of records run.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of failed records.
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| !o.result.is_success())
            .count()
    }

    /// Returns the per-record results as JSON values, one per input record.
    pub fn results(&self) -> Vec<Value> {
        self.outcomes.iter().map(|o| o.result.to_value()).collect()
    }
}

/// A record failed under [`FailurePolicy::Abort`].
#[derive(Debug, Error)]
#[error("record {index} ({operation}) failed")]
pub struct BatchError {
    /// Zero-based position of the failing record.
    pub index: usize,

    /// The failing record's operation.
    pub operation: OperationKind,

    /// The underlying error.
    #[source]
    pub source: RequestError,
}

/// Runs records one after another through a [`Dispatch`] implementation.
#[derive(Debug, Clone)]
pub struct BatchRunner<D> {
    dispatcher: D,
    policy: FailurePolicy,
}

impl<D: Dispatch> BatchRunner<D> {
    /// Creates a runner with the [`FailurePolicy::Abort`] policy.
    pub fn new(dispatcher: D) -> Self {
        Self {
            dispatcher,
            policy: FailurePolicy::default(),
        }
    }

    /// Sets the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the failure policy.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Runs every record in order.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns a [`BatchError`] for the first
    /// failing record; later records are not run.
    pub async fn run(
        &self,
        records: &[Operation],
        credentials: &Credentials,
    ) -> Result<BatchReport, BatchError> {
        self.run_with(records, credentials, |_| {}).await
    }

    /// Runs every record in order, calling `on_record` after each one.
    pub async fn run_with<F>(
        &self,
        records: &[Operation],
        credentials: &Credentials,
        mut on_record: F,
    ) -> Result<BatchReport, BatchError>
    where
        F: FnMut(&RecordOutcome),
    {
        let mut outcomes = Vec::with_capacity(records.len());

        for (index, operation) in records.iter().enumerate() {
            let kind = operation.kind();
            let result = match self.dispatcher.execute(operation, credentials).await {
                Ok(data) => {
                    tracing::info!(index, operation = %kind, "record completed");
                    OperationResult::Success(data)
                }
                Err(source) => match self.policy {
                    FailurePolicy::Abort => {
                        return Err(BatchError {
                            index,
                            operation: kind,
                            source,
                        })
                    }
                    FailurePolicy::ContinueOnFail => {
                        tracing::warn!(index, operation = %kind, error = %source, "record failed");
                        OperationResult::Failure {
                            error: source.message(),
                        }
                    }
                },
            };

            let outcome = RecordOutcome {
                index,
                operation: kind,
                result,
            };
            on_record(&outcome);
            outcomes.push(outcome);
        }

        Ok(BatchReport { outcomes })
    }
}
