//! Waiter
//!
//! Polls the run source and holds this invocation until every earlier run in
//! its queue has finished, or a timeout threshold overrides the wait.
//!
//! Each poll is a pure decision ([`Waiter::decide`]) over the current
//! [`WaitState`]; [`Waiter::wait`] applies the decision, sleeps and loops.

use runlatch_client::{ClientError, RunSource};
use runlatch_core::domain::{Job, Run, Step};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::scheduler::filter::relevant_previous_runs;
use crate::service::{FORCE_CONTINUED, OutputSink, WAITED_SECONDS};

/// Errors that end a wait
#[derive(Debug, Error)]
pub enum WaitError {
    /// The abort-after threshold was reached
    #[error("Aborted after waiting {elapsed} seconds")]
    Aborted { elapsed: u64 },

    /// The run source failed
    #[error(transparent)]
    Source(#[from] ClientError),

    /// An output could not be written
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl WaitError {
    /// Whether the run source gave up because of the API's rate limits
    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::Source(e) if e.is_throttled())
    }
}

/// Progress of one wait sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitState {
    /// Seconds waited so far
    pub elapsed: u64,

    /// Polls that found something to wait for. Drives the backoff.
    pub attempt: u32,
}

impl WaitState {
    /// Interval before the next poll after finding something to wait for
    ///
    /// Saturates at `u64::MAX` instead of overflowing on very long waits.
    pub fn next_interval(&self, base: u64, exponential_backoff: bool) -> u64 {
        if exponential_backoff {
            base.saturating_mul(u64::from(self.attempt.saturating_mul(2).max(1)))
        } else {
            base
        }
    }

    /// State after waiting out a poll interval
    fn waited(self, interval: u64) -> Self {
        Self {
            elapsed: self.elapsed.saturating_add(interval),
            attempt: self.attempt.saturating_add(1),
        }
    }

    /// State after the initial delay. The attempt counter is left alone.
    fn delayed(self, seconds: u64) -> Self {
        Self {
            elapsed: self.elapsed.saturating_add(seconds),
            ..self
        }
    }
}

/// Outcome of a single poll
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Continue-after threshold reached; proceed without waiting further
    Continued,

    /// Abort-after threshold reached
    Aborted,

    /// Nothing left to wait for
    Proceeded,

    /// No earlier runs yet; look again after the initial wait
    InitialDelay { seconds: u64 },

    /// An earlier run holds the queue
    WaitingFullRun { run: Run },

    /// The target job of an earlier run has not completed
    WaitingJob { run: Run, job: Job },

    /// The target step of an earlier run has not completed
    WaitingStep { run: Run, job: Job, step: Step },
}

/// Polling state machine for one invocation
pub struct Waiter {
    config: Config,
    workflow_id: String,
    source: Arc<dyn RunSource>,
    outputs: Arc<dyn OutputSink>,
}

impl Waiter {
    /// Creates a new waiter
    ///
    /// # Arguments
    /// * `config` - Validated configuration
    /// * `workflow_id` - Resolved workflow id or file name
    /// * `source` - Where runs, jobs and steps come from
    /// * `outputs` - Where the outcome is reported
    pub fn new(
        config: Config,
        workflow_id: String,
        source: Arc<dyn RunSource>,
        outputs: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            config,
            workflow_id,
            source,
            outputs,
        }
    }

    /// Waits until this invocation may proceed
    ///
    /// Returns the seconds waited. Fails with [`WaitError::Aborted`] when the
    /// abort-after threshold is reached first.
    pub async fn wait(&self) -> Result<u64, WaitError> {
        let mut state = WaitState::default();

        loop {
            let decision = self.decide(&state).await?;

            let interval = match &decision {
                Decision::Continued => {
                    info!(
                        "Exceeded continue-after threshold after {}s, continuing",
                        state.elapsed
                    );
                    self.outputs.set_output(FORCE_CONTINUED, "true")?;
                    self.outputs
                        .set_output(WAITED_SECONDS, &state.elapsed.to_string())?;
                    return Ok(state.elapsed);
                }
                Decision::Aborted => {
                    warn!(
                        "Exceeded abort-after threshold after {}s, aborting",
                        state.elapsed
                    );
                    return Err(WaitError::Aborted {
                        elapsed: state.elapsed,
                    });
                }
                Decision::Proceeded => {
                    info!("No earlier runs to wait for after {}s", state.elapsed);
                    self.outputs.set_output(FORCE_CONTINUED, "")?;
                    self.outputs
                        .set_output(WAITED_SECONDS, &state.elapsed.to_string())?;
                    return Ok(state.elapsed);
                }
                Decision::InitialDelay { seconds } => {
                    info!("No earlier runs yet, checking again in {}s", seconds);
                    time::sleep(Duration::from_secs(*seconds)).await;
                    state = state.delayed(*seconds);
                    continue;
                }
                Decision::WaitingFullRun { run } => {
                    info!(
                        "Waiting for run {} ({}) {}",
                        run.id,
                        run.status_label(),
                        run.html_url
                    );
                    self.next_interval(&state)
                }
                Decision::WaitingJob { run, job } => {
                    info!(
                        "Waiting for job '{}' of run {} ({}) {}",
                        job.name,
                        run.id,
                        job.status,
                        job.html_url.as_deref().unwrap_or(&run.html_url)
                    );
                    self.next_interval(&state)
                }
                Decision::WaitingStep { run, job, step } => {
                    info!(
                        "Waiting for step '{}' of job '{}' in run {} ({}) {}",
                        step.name,
                        job.name,
                        run.id,
                        step.status,
                        job.html_url.as_deref().unwrap_or(&run.html_url)
                    );
                    self.next_interval(&state)
                }
            };

            debug!("Sleeping {}s (attempt {})", interval, state.attempt);
            time::sleep(Duration::from_secs(interval)).await;
            state = state.waited(interval);
        }
    }

    fn next_interval(&self, state: &WaitState) -> u64 {
        state.next_interval(self.config.poll_interval_secs, self.config.exponential_backoff)
    }

    /// Decides what to do on one poll, given the progress so far
    ///
    /// Thresholds are checked before any request is made: continue-after
    /// first, then abort-after.
    pub async fn decide(&self, state: &WaitState) -> Result<Decision, WaitError> {
        let elapsed = state.elapsed;

        if self.config.continue_after_secs.is_some_and(|c| elapsed >= c) {
            return Ok(Decision::Continued);
        }

        if self.config.abort_after_secs.is_some_and(|a| elapsed >= a) {
            return Ok(Decision::Aborted);
        }

        let runs = self
            .source
            .list_runs(
                &self.config.owner,
                &self.config.repo,
                &self.workflow_id,
                self.config.branch.as_deref(),
            )
            .await?;

        let previous = relevant_previous_runs(
            runs,
            self.config.run_id,
            self.config.queue_name.as_deref(),
        );

        let Some(run) = previous.into_iter().next() else {
            return Ok(match self.config.initial_wait_secs {
                Some(initial) if elapsed < initial => Decision::InitialDelay { seconds: initial },
                _ => Decision::Proceeded,
            });
        };

        let Some(job_name) = self.config.job_to_wait_for.as_deref() else {
            return Ok(Decision::WaitingFullRun { run });
        };

        self.decide_for_job(run, job_name).await
    }

    /// Job and step granularity, falling back to coarser waits on a miss
    async fn decide_for_job(&self, run: Run, job_name: &str) -> Result<Decision, WaitError> {
        let jobs = self
            .source
            .list_jobs(&self.config.owner, &self.config.repo, run.id)
            .await?;

        let Some(job) = jobs.into_iter().find(|job| job.name == job_name) else {
            warn!(
                "Job '{}' not found in run {}, waiting for the whole run",
                job_name, run.id
            );
            return Ok(Decision::WaitingFullRun { run });
        };

        if let Some(step_name) = self.config.step_to_wait_for.as_deref() {
            let steps = self
                .source
                .list_steps(&self.config.owner, &self.config.repo, job.id)
                .await?;

            match steps.into_iter().find(|step| step.name == step_name) {
                Some(step) if step.is_completed() => return Ok(Decision::Proceeded),
                Some(step) => return Ok(Decision::WaitingStep { run, job, step }),
                None => warn!(
                    "Step '{}' not found in job '{}' of run {}, waiting for the whole job",
                    step_name, job.name, run.id
                ),
            }
        }

        if job.is_completed() {
            Ok(Decision::Proceeded)
        } else {
            Ok(Decision::WaitingJob { run, job })
        }
    }
}
