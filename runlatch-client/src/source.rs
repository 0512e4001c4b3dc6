//! The run source seam
//!
//! The gate only needs three read operations from the platform. Keeping them
//! behind a trait lets the waiter run against an in-memory fake in tests.

use async_trait::async_trait;
use runlatch_core::domain::{Job, Run, Step};

use crate::ActionsClient;
use crate::error::Result;

/// Read access to the execution history of a workflow
#[async_trait]
pub trait RunSource: Send + Sync {
    /// Lists all runs of the workflow that are in progress, queued or waiting
    ///
    /// # Arguments
    /// * `workflow_id` - Numeric workflow id or workflow file name
    /// * `branch` - Restrict to runs of this branch
    async fn list_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: &str,
        branch: Option<&str>,
    ) -> Result<Vec<Run>>;

    /// Lists every job of a run
    async fn list_jobs(&self, owner: &str, repo: &str, run_id: u64) -> Result<Vec<Job>>;

    /// Lists the steps of a job in platform order
    async fn list_steps(&self, owner: &str, repo: &str, job_id: u64) -> Result<Vec<Step>>;
}

#[async_trait]
impl RunSource for ActionsClient {
    async fn list_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: &str,
        branch: Option<&str>,
    ) -> Result<Vec<Run>> {
        ActionsClient::list_runs(self, owner, repo, workflow_id, branch).await
    }

    async fn list_jobs(&self, owner: &str, repo: &str, run_id: u64) -> Result<Vec<Job>> {
        ActionsClient::list_jobs(self, owner, repo, run_id).await
    }

    async fn list_steps(&self, owner: &str, repo: &str, job_id: u64) -> Result<Vec<Step>> {
        ActionsClient::list_steps(self, owner, repo, job_id).await
    }
}
