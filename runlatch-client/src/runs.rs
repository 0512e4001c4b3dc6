//! Workflow run endpoints

use runlatch_core::domain::{Run, RunStatus};
use runlatch_core::dto::run::WorkflowRunsPage;

use crate::ActionsClient;
use crate::error::Result;

impl ActionsClient {
    // =============================================================================
    // Workflow Runs
    // =============================================================================

    /// List every run of a workflow that may still hold the queue
    ///
    /// Fetches the `in_progress`, `queued` and `waiting` subsets concurrently,
    /// each fully paginated, and returns them concatenated in that order. All
    /// three must succeed; a failure in one discards the others.
    ///
    /// # Arguments
    /// * `workflow_id` - Numeric workflow id or workflow file name
    /// * `branch` - Restrict to runs of this branch
    pub async fn list_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: &str,
        branch: Option<&str>,
    ) -> Result<Vec<Run>> {
        let [first, second, third] = RunStatus::ACTIVE;

        let (mut runs, queued, waiting) = tokio::try_join!(
            self.list_runs_with_status(owner, repo, workflow_id, branch, first),
            self.list_runs_with_status(owner, repo, workflow_id, branch, second),
            self.list_runs_with_status(owner, repo, workflow_id, branch, third),
        )?;

        runs.extend(queued);
        runs.extend(waiting);
        Ok(runs)
    }

    /// List the runs of a workflow in one status
    pub async fn list_runs_with_status(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: &str,
        branch: Option<&str>,
        status: RunStatus,
    ) -> Result<Vec<Run>> {
        let url = format!("{}/workflows/{}/runs", self.repo_url(owner, repo), workflow_id);

        let mut query = vec![("status", status.as_str().to_string())];
        if let Some(branch) = branch {
            query.push(("branch", branch.to_string()));
        }

        self.paginate::<WorkflowRunsPage>(&url, &query).await
    }
}
