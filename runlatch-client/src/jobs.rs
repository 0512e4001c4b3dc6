//! Job and step endpoints

use runlatch_core::domain::{Job, Step};
use runlatch_core::dto::job::JobsPage;

use crate::ActionsClient;
use crate::error::Result;

impl ActionsClient {
    // =============================================================================
    // Jobs
    // =============================================================================

    /// List every job of a run
    ///
    /// # Arguments
    /// * `run_id` - The workflow run id
    pub async fn list_jobs(&self, owner: &str, repo: &str, run_id: u64) -> Result<Vec<Job>> {
        let url = format!("{}/runs/{}/jobs", self.repo_url(owner, repo), run_id);
        self.paginate::<JobsPage>(&url, &[]).await
    }

    /// Get a single job by id
    pub async fn get_job(&self, owner: &str, repo: &str, job_id: u64) -> Result<Job> {
        let url = format!("{}/jobs/{}", self.repo_url(owner, repo), job_id);
        self.get_json(&url, &[]).await
    }

    // =============================================================================
    // Steps
    // =============================================================================

    /// List the steps of a job in the order the platform reports them
    ///
    /// Each step is tagged with the id of the job it belongs to.
    pub async fn list_steps(&self, owner: &str, repo: &str, job_id: u64) -> Result<Vec<Step>> {
        let job = self.get_job(owner, repo, job_id).await?;

        Ok(job
            .steps
            .into_iter()
            .map(|step| Step { job_id, ..step })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{ActionsClient, ClientError};
    use mockito::{Matcher, Server};
    use runlatch_core::domain::RunStatus;
    use serde_json::json;

    fn job_json(id: u64, name: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "run_id": 7,
            "name": name,
            "status": status,
            "conclusion": null,
            "html_url": format!("https://github.com/o/r/runs/{id}"),
            "steps": [
                {"name": "Checkout", "status": "completed", "conclusion": "success", "number": 1},
                {"name": "Deploy", "status": "in_progress", "conclusion": null, "number": 2}
            ]
        })
    }

    #[tokio::test]
    async fn test_list_jobs() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/o/r/actions/runs/7/jobs")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(
                json!({
                    "total_count": 2,
                    "jobs": [job_json(70, "build", "completed"), job_json(71, "deploy", "queued")]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ActionsClient::new(server.url(), "secret");
        let jobs = client.list_jobs("o", "r", 7).await.unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].name, "build");
        assert!(jobs[0].is_completed());
        assert_eq!(jobs[1].status, RunStatus::Queued);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_steps_keeps_order_and_tags_parent() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/repos/o/r/actions/jobs/71")
            .with_status(200)
            .with_body(job_json(71, "deploy", "in_progress").to_string())
            .create_async()
            .await;

        let client = ActionsClient::new(server.url(), "secret");
        let steps = client.list_steps("o", "r", 71).await.unwrap();

        let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Checkout", "Deploy"]);
        assert!(steps.iter().all(|s| s.job_id == 71));
    }

    #[tokio::test]
    async fn test_missing_job_is_an_api_error() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/repos/o/r/actions/jobs/99")
            .with_status(404)
            .with_body(r#"{"message":"Not Found"}"#)
            .create_async()
            .await;

        let client = ActionsClient::new(server.url(), "secret");
        let err = client.list_steps("o", "r", 99).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(matches!(err, ClientError::ApiError { status: 404, .. }));
    }
}
