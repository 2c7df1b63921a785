//! Capability boundary towards the Glue control plane.
//!
//! Everything the CLI knows about the remote service goes through
//! [`GlueClient`]. The facades in [`crate::crawler`], [`crate::job`] and
//! [`crate::partition`] translate [`ClientError`] into the domain errors of
//! [`crate::error::GlueError`].
//!
//! - [`local`] - in-process control plane backed by a JSON catalog

pub mod local;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use local::LocalGlue;

/// Failures reported by a [`GlueClient`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("concurrent runs exceeded: {0}")]
    ConcurrentRunsExceeded(String),

    #[error("crawler is running: {0}")]
    CrawlerRunning(String),

    #[error("service error: {0}")]
    Service(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

/// Crawler lifecycle state as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CrawlerState {
    #[default]
    Ready,
    Running,
    Stopping,
}

impl fmt::Display for CrawlerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CrawlerState::Ready => "READY",
            CrawlerState::Running => "RUNNING",
            CrawlerState::Stopping => "STOPPING",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlerInfo {
    pub name: String,
    pub state: CrawlerState,
    pub database: Option<String>,
    /// Status of the last completed crawl (`SUCCEEDED`, `FAILED`, ...).
    pub last_crawl_status: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    pub name: String,
    /// Job timeout in minutes.
    pub timeout_minutes: u64,
    pub max_concurrent_runs: u32,
}

/// State of a single job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobRunState {
    Starting,
    Running,
    Stopping,
    Stopped,
    Succeeded,
    Failed,
    Timeout,
}

impl JobRunState {
    /// States a job poll waits for.
    pub fn is_final(self) -> bool {
        matches!(self, JobRunState::Succeeded | JobRunState::Failed)
    }

    /// True while the run counts against the job's concurrency limit.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            JobRunState::Starting | JobRunState::Running | JobRunState::Stopping
        )
    }
}

impl fmt::Display for JobRunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobRunState::Starting => "STARTING",
            JobRunState::Running => "RUNNING",
            JobRunState::Stopping => "STOPPING",
            JobRunState::Stopped => "STOPPED",
            JobRunState::Succeeded => "SUCCEEDED",
            JobRunState::Failed => "FAILED",
            JobRunState::Timeout => "TIMEOUT",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRun {
    pub id: String,
    pub job_name: String,
    pub state: JobRunState,
    pub arguments: BTreeMap<String, String>,
    /// Service-side run timeout requested at start.
    #[serde(default)]
    pub timeout_minutes: Option<u64>,
    pub started_on: Option<DateTime<Utc>>,
    pub completed_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub database: String,
    pub name: String,
    pub location: Option<String>,
    pub partition_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionInfo {
    /// Values in the table's partition key order.
    pub values: Vec<String>,
    pub location: Option<String>,
}

/// Request to start a job run.
#[derive(Debug, Clone, Default)]
pub struct StartJobRun {
    pub job_name: String,
    pub timeout_minutes: Option<u64>,
    /// Arguments already carrying their `--` prefix.
    pub arguments: BTreeMap<String, String>,
}

/// Remote capabilities used by gluettalax.
///
/// All calls are blocking. Implementations may cache sessions or credentials
/// internally, but never entity state.
pub trait GlueClient {
    fn list_crawlers(&self, next_token: Option<&str>) -> ClientResult<Page<CrawlerInfo>>;
    fn get_crawler(&self, name: &str) -> ClientResult<CrawlerInfo>;
    fn start_crawler(&self, name: &str) -> ClientResult<()>;

    fn list_jobs(&self, next_token: Option<&str>) -> ClientResult<Page<JobInfo>>;
    fn get_job(&self, name: &str) -> ClientResult<JobInfo>;
    fn start_job_run(&self, request: &StartJobRun) -> ClientResult<String>;
    fn get_job_run(&self, job_name: &str, run_id: &str) -> ClientResult<JobRun>;
    fn list_job_runs(&self, job_name: &str, next_token: Option<&str>)
    -> ClientResult<Page<JobRun>>;

    fn list_tables(&self, next_token: Option<&str>) -> ClientResult<Page<TableInfo>>;
    fn get_table(&self, database: &str, table: &str) -> ClientResult<TableInfo>;

    fn list_partitions(
        &self,
        database: &str,
        table: &str,
        next_token: Option<&str>,
    ) -> ClientResult<Page<PartitionInfo>>;
    fn create_partition(
        &self,
        database: &str,
        table: &str,
        partition: &PartitionInfo,
    ) -> ClientResult<()>;
    fn delete_partition(&self, database: &str, table: &str, values: &[String])
    -> ClientResult<()>;

    /// Immediate child prefixes of a storage location, each ending in `/`.
    fn list_prefixes(&self, location: &str) -> ClientResult<Vec<String>>;
}

/// Drain every page of a paginated listing.
pub fn collect_pages<T, F>(mut fetch: F) -> ClientResult<Vec<T>>
where
    F: FnMut(Option<&str>) -> ClientResult<Page<T>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = fetch(token.as_deref())?;
        items.extend(page.items);
        match page.next_token {
            Some(next) => token = Some(next),
            None => return Ok(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_pages_follows_tokens() {
        let pages = [
            (None, vec![1, 2], Some("a")),
            (Some("a"), vec![3], Some("b")),
            (Some("b"), vec![4, 5], None),
        ];
        let mut calls = 0;
        let items = collect_pages(|token| {
            let (expected, items, next) = &pages[calls];
            assert_eq!(token, *expected);
            calls += 1;
            Ok(Page {
                items: items.clone(),
                next_token: next.map(String::from),
            })
        })
        .unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_collect_pages_propagates_errors() {
        let result: ClientResult<Vec<u8>> =
            collect_pages(|_| Err(ClientError::Service("throttled".into())));
        assert_eq!(result, Err(ClientError::Service("throttled".into())));
    }

    #[test]
    fn test_job_run_state_classes() {
        assert!(JobRunState::Succeeded.is_final());
        assert!(JobRunState::Failed.is_final());
        assert!(!JobRunState::Running.is_final());
        assert!(!JobRunState::Stopped.is_final());
        assert!(JobRunState::Starting.is_active());
        assert!(!JobRunState::Failed.is_active());
    }
}
