//! Job facade: start a job run and optionally wait for its outcome.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, info};

use crate::client::{
    ClientError, GlueClient, JobInfo, JobRun, JobRunState, StartJobRun, collect_pages,
};
use crate::error::{GlueError, Result};
use crate::poller::{Clock, PollConfig, Poller};

pub const DEFAULT_JOB_DELAY: Duration = Duration::from_secs(10);

/// Option names the CLI keeps for itself; they never reach the job.
pub const RESERVED_ARGUMENTS: &[&str] = &["async", "timeout"];

/// Ordered job parameters, keys without the `--` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobArguments(BTreeMap<String, String>);

impl JobArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, rejecting reserved or malformed names.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        if key.is_empty() || key.starts_with('-') {
            return Err(GlueError::invalid_option(format!(
                "invalid job parameter name '{key}'"
            )));
        }
        if RESERVED_ARGUMENTS.contains(&key.as_str()) {
            return Err(GlueError::invalid_option(format!(
                "'{key}' is reserved and cannot be passed as a job parameter"
            )));
        }
        self.0.insert(key, value.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arguments as sent to the service, each key prefixed with `--`.
    pub fn to_remote(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (format!("--{k}"), v.clone()))
            .collect()
    }
}

/// A named remote job.
pub struct Job<'a> {
    client: &'a dyn GlueClient,
    clock: &'a dyn Clock,
    info: JobInfo,
    config: PollConfig,
}

impl<'a> Job<'a> {
    /// Fetch the job. A missing timeout in `config` defaults to the job's own.
    pub fn new(
        client: &'a dyn GlueClient,
        clock: &'a dyn Clock,
        name: &str,
        mut config: PollConfig,
    ) -> Result<Self> {
        let info = client
            .get_job(name)
            .map_err(|e| translate(name, e))?;
        if config.timeout.is_none() {
            config.timeout = Some(Duration::from_secs(info.timeout_minutes.saturating_mul(60)));
        }
        Ok(Self {
            client,
            clock,
            info,
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.config.timeout
    }

    /// Runs of this job, newest first.
    pub fn runs(&self) -> Result<Vec<JobRun>> {
        collect_pages(|token| self.client.list_job_runs(self.name(), token))
            .map_err(|e| translate(self.name(), e))
    }

    pub fn run_state(&self, run_id: &str) -> Result<JobRunState> {
        self.client
            .get_job_run(self.name(), run_id)
            .map(|run| run.state)
            .map_err(|e| translate(self.name(), e))
    }

    /// Start a run. Returns `true` iff the run SUCCEEDED, or immediately
    /// `true` when async.
    pub fn run(&self, arguments: &JobArguments) -> Result<bool> {
        let request = StartJobRun {
            job_name: self.info.name.clone(),
            timeout_minutes: self.config.timeout.map(|t| t.as_secs().div_ceil(60)),
            arguments: arguments.to_remote(),
        };
        let run_id = self
            .client
            .start_job_run(&request)
            .map_err(|e| translate(self.name(), e))?;
        info!(job = %self.info.name, run_id = %run_id, "job run started");
        if self.config.run_async {
            debug!(job = %self.info.name, "async run, not waiting");
            return Ok(true);
        }

        let poller = Poller::new(self.clock, &self.config);
        let state = poller.poll(
            || self.run_state(&run_id),
            |state| state.is_final(),
            |waited| GlueError::JobTimeout {
                name: self.info.name.clone(),
                run_id: run_id.clone(),
                waited,
            },
        )?;
        info!(job = %self.info.name, run_id = %run_id, %state, "job run finished");
        Ok(state == JobRunState::Succeeded)
    }
}

fn translate(name: &str, err: ClientError) -> GlueError {
    match err {
        ClientError::EntityNotFound(_) => GlueError::JobNotFound(name.to_string()),
        ClientError::ConcurrentRunsExceeded(_) => {
            GlueError::JobConcurrentRunsExceeded(name.to_string())
        }
        other => GlueError::Client(other),
    }
}

/// Every job known to the service.
pub fn list_jobs(client: &dyn GlueClient) -> Result<Vec<JobInfo>> {
    Ok(collect_pages(|token| client.list_jobs(token))?)
}

/// Run a job with the given poll policy.
pub fn run_job(
    client: &dyn GlueClient,
    clock: &dyn Clock,
    name: &str,
    arguments: &JobArguments,
    config: PollConfig,
) -> Result<bool> {
    Job::new(client, clock, name, config)?.run(arguments)
}
