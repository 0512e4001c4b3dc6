//! Gate configuration
//!
//! Every option can be given as a flag or picked up from the environment the
//! CI platform provides: its runtime variables (`GITHUB_*`) and action inputs
//! (`INPUT_*`). Inputs arrive as strings and unset ones are often present but
//! empty, so they are parsed here rather than by clap.

use anyhow::{Context, Result, bail};
use clap::Parser;
use runlatch_client::{DEFAULT_API_URL, WorkflowRef};
use std::path::PathBuf;

/// Default seconds between polls
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Command line and environment surface
#[derive(Debug, Parser)]
#[command(name = "runlatch")]
#[command(about = "Wait until earlier runs of this workflow have finished", long_about = None)]
#[command(args_override_self = true)]
pub struct Args {
    /// API token with read access to the repository's Actions
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Id of the run this invocation belongs to
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: u64,

    /// Workflow id, file name or display name
    #[arg(long, env = "GITHUB_WORKFLOW")]
    pub workflow: String,

    /// Branch of the current run
    #[arg(long, env = "GITHUB_HEAD_REF")]
    pub branch: Option<String>,

    /// Fully qualified ref, used when no branch is given
    #[arg(long = "ref", env = "GITHUB_REF", hide = true)]
    pub git_ref: Option<String>,

    /// Only wait for runs on the same branch (true/false)
    #[arg(long, env = "INPUT_SAME-BRANCH-ONLY")]
    pub same_branch_only: Option<String>,

    /// Only wait for runs whose title or name contains this text
    #[arg(long, env = "INPUT_QUEUE-NAME")]
    pub queue_name: Option<String>,

    /// Wait for this job of the previous run rather than the whole run
    #[arg(long, env = "INPUT_JOB-TO-WAIT-FOR")]
    pub job_to_wait_for: Option<String>,

    /// Wait for this step of the job rather than the whole job
    #[arg(long, env = "INPUT_STEP-TO-WAIT-FOR")]
    pub step_to_wait_for: Option<String>,

    /// Seconds between polls
    #[arg(long, env = "INPUT_POLL-INTERVAL-SECONDS")]
    pub poll_interval_seconds: Option<String>,

    /// Re-check once after this many seconds when nothing is queued yet
    #[arg(long, env = "INPUT_INITIAL-WAIT-SECONDS")]
    pub initial_wait_seconds: Option<String>,

    /// Stop waiting and continue after this many seconds
    #[arg(long, env = "INPUT_CONTINUE-AFTER-SECONDS")]
    pub continue_after_seconds: Option<String>,

    /// Stop waiting and fail after this many seconds
    #[arg(long, env = "INPUT_ABORT-AFTER-SECONDS")]
    pub abort_after_seconds: Option<String>,

    /// Grow the poll interval with each poll that finds work (true/false)
    #[arg(long, env = "INPUT_EXPONENTIAL-BACKOFF-RETRIES")]
    pub exponential_backoff_retries: Option<String>,

    /// File that step outputs are appended to
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,
}

/// Validated, immutable parameters for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    pub owner: String,
    pub repo: String,

    /// Run this invocation belongs to. Only runs with a smaller id are waited on.
    pub run_id: u64,

    pub workflow: WorkflowRef,

    /// Branch filter applied to the run listing
    pub branch: Option<String>,

    /// Substring a run's title or name must contain to share our queue
    pub queue_name: Option<String>,

    pub job_to_wait_for: Option<String>,
    pub step_to_wait_for: Option<String>,

    pub poll_interval_secs: u64,
    pub initial_wait_secs: Option<u64>,
    pub continue_after_secs: Option<u64>,
    pub abort_after_secs: Option<u64>,

    pub exponential_backoff: bool,
}

impl Config {
    /// Creates a configuration with defaults for everything optional
    pub fn new(owner: &str, repo: &str, run_id: u64, workflow: WorkflowRef) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            run_id,
            workflow,
            branch: None,
            queue_name: None,
            job_to_wait_for: None,
            step_to_wait_for: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            initial_wait_secs: None,
            continue_after_secs: None,
            abort_after_secs: None,
            exponential_backoff: false,
        }
    }

    /// Builds and validates a configuration from parsed arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let (owner, repo) = args
            .repository
            .split_once('/')
            .with_context(|| format!("repository '{}' is not owner/repo", args.repository))?;

        let mut config = Self::new(owner, repo, args.run_id, WorkflowRef::parse(&args.workflow));

        let same_branch_only = parse_bool("same-branch-only", args.same_branch_only.as_deref())?
            .unwrap_or(true);
        if same_branch_only {
            config.branch = non_empty(args.branch.as_deref())
                .or_else(|| non_empty(args.git_ref.as_deref()).map(branch_from_ref));
        }

        config.queue_name = non_empty(args.queue_name.as_deref());
        config.job_to_wait_for = non_empty(args.job_to_wait_for.as_deref());
        config.step_to_wait_for = non_empty(args.step_to_wait_for.as_deref());

        if let Some(secs) =
            parse_seconds("poll-interval-seconds", args.poll_interval_seconds.as_deref())?
        {
            config.poll_interval_secs = secs;
        }
        config.initial_wait_secs =
            parse_threshold("initial-wait-seconds", args.initial_wait_seconds.as_deref())?;
        config.continue_after_secs =
            parse_threshold("continue-after-seconds", args.continue_after_seconds.as_deref())?;
        config.abort_after_secs =
            parse_threshold("abort-after-seconds", args.abort_after_seconds.as_deref())?;
        config.exponential_backoff = parse_bool(
            "exponential-backoff-retries",
            args.exponential_backoff_retries.as_deref(),
        )?
        .unwrap_or(false);

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_empty() || self.repo.is_empty() {
            bail!("repository owner and name cannot be empty");
        }

        if self.repo.contains('/') {
            bail!("repository '{}/{}' is not owner/repo", self.owner, self.repo);
        }

        if self.run_id == 0 {
            bail!("run_id must be greater than 0");
        }

        if self.workflow.to_string().is_empty() {
            bail!("workflow cannot be empty");
        }

        if self.poll_interval_secs == 0 {
            bail!("poll-interval-seconds must be greater than 0");
        }

        if self.step_to_wait_for.is_some() && self.job_to_wait_for.is_none() {
            bail!("step-to-wait-for requires job-to-wait-for");
        }

        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Strips `refs/heads/` or `refs/tags/` from a ref
fn branch_from_ref(git_ref: String) -> String {
    git_ref
        .strip_prefix("refs/heads/")
        .or_else(|| git_ref.strip_prefix("refs/tags/"))
        .map(str::to_string)
        .unwrap_or(git_ref)
}

fn parse_seconds(name: &str, value: Option<&str>) -> Result<Option<u64>> {
    non_empty(value)
        .map(|v| {
            v.parse::<u64>()
                .with_context(|| format!("{} must be a whole number of seconds, got '{}'", name, v))
        })
        .transpose()
}

/// Like [`parse_seconds`], but zero means "not set"
fn parse_threshold(name: &str, value: Option<&str>) -> Result<Option<u64>> {
    Ok(parse_seconds(name, value)?.filter(|secs| *secs > 0))
}

fn parse_bool(name: &str, value: Option<&str>) -> Result<Option<bool>> {
    let Some(v) = non_empty(value) else {
        return Ok(None);
    };
    match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(Some(true)),
        "false" | "0" | "no" => Ok(Some(false)),
        _ => bail!("{} must be true or false, got '{}'", name, v),
    }
}
