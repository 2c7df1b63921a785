//! In-process Glue control plane backed by a JSON catalog.
//!
//! The catalog describes crawlers, jobs, tables, partitions and storage
//! objects. Remote progress is simulated per observation: a started crawler
//! stays busy for `crawl_polls` reads of its status, a job run stays active
//! for `run_polls` reads before reaching its configured `outcome`.
//!
//! ```json
//! {
//!   "crawlers": [{ "name": "sales", "database": "analytics", "crawl_polls": 2 }],
//!   "jobs": [{ "name": "load", "outcome": "FAILED", "max_concurrent_runs": 1 }],
//!   "tables": [{ "database": "analytics", "name": "sales",
//!                "location": "s3://bucket/sales", "partition_keys": ["year"] }],
//!   "storage": ["s3://bucket/sales/year=2020/part-0000.parquet"]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    ClientError, ClientResult, CrawlerInfo, CrawlerState, GlueClient, JobInfo, JobRun,
    JobRunState, Page, PartitionInfo, StartJobRun, TableInfo,
};

const DEFAULT_PAGE_SIZE: usize = 100;

fn default_polls() -> u32 {
    2
}

fn default_job_timeout() -> u64 {
    2880
}

fn default_max_concurrent_runs() -> u32 {
    1
}

fn default_crawl_outcome() -> String {
    "SUCCEEDED".to_string()
}

fn default_job_outcome() -> JobRunState {
    JobRunState::Succeeded
}

/// Root of the catalog file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub crawlers: Vec<CatalogCrawler>,
    pub jobs: Vec<CatalogJob>,
    pub tables: Vec<CatalogTable>,
    /// Object keys, e.g. `s3://bucket/sales/year=2020/part-0000.parquet`.
    pub storage: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCrawler {
    pub name: String,
    #[serde(default)]
    pub state: CrawlerState,
    #[serde(default)]
    pub database: Option<String>,
    /// Status reads a crawl stays busy for.
    #[serde(default = "default_polls")]
    pub crawl_polls: u32,
    /// Status recorded when a crawl completes.
    #[serde(default = "default_crawl_outcome")]
    pub crawl_outcome: String,
    #[serde(default)]
    pub last_crawl_status: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip)]
    pending: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogJob {
    pub name: String,
    #[serde(default = "default_job_timeout")]
    pub timeout_minutes: u64,
    #[serde(default = "default_max_concurrent_runs")]
    pub max_concurrent_runs: u32,
    /// Final state every new run reaches.
    #[serde(default = "default_job_outcome")]
    pub outcome: JobRunState,
    /// Status reads a run stays active for.
    #[serde(default = "default_polls")]
    pub run_polls: u32,
    #[serde(default)]
    pub runs: Vec<JobRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTable {
    pub database: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub partition_keys: Vec<String>,
    #[serde(default)]
    pub partitions: Vec<PartitionInfo>,
}

impl CatalogTable {
    fn info(&self) -> TableInfo {
        TableInfo {
            database: self.database.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            partition_keys: self.partition_keys.clone(),
        }
    }
}

struct State {
    catalog: Catalog,
    /// Remaining status reads per active run id.
    run_pending: BTreeMap<String, u32>,
}

/// [`GlueClient`] that keeps the whole control plane in memory.
pub struct LocalGlue {
    state: Mutex<State>,
    page_size: usize,
}

impl LocalGlue {
    pub fn new(mut catalog: Catalog) -> Self {
        // Crawlers already busy in the catalog finish like freshly started ones.
        for crawler in &mut catalog.crawlers {
            if crawler.state != CrawlerState::Ready {
                crawler.pending = crawler.crawl_polls;
            }
        }
        let mut run_pending = BTreeMap::new();
        for job in &catalog.jobs {
            for run in job.runs.iter().filter(|r| r.state.is_active()) {
                run_pending.insert(run.id.clone(), job.run_polls);
            }
        }
        Self {
            state: Mutex::new(State {
                catalog,
                run_pending,
            }),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// An empty control plane.
    pub fn empty() -> Self {
        Self::new(Catalog::default())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("failed to parse catalog {}", path.display()))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn paginate<T: Clone>(&self, items: &[T], token: Option<&str>) -> ClientResult<Page<T>> {
        let start = match token {
            None => 0,
            Some(t) => t
                .parse::<usize>()
                .map_err(|_| ClientError::Service(format!("invalid pagination token '{t}'")))?,
        };
        let end = (start + self.page_size).min(items.len());
        let page = items.get(start..end).unwrap_or_default().to_vec();
        let next_token = (end < items.len()).then(|| end.to_string());
        Ok(Page {
            items: page,
            next_token,
        })
    }
}

impl State {
    fn crawler_mut(&mut self, name: &str) -> ClientResult<&mut CatalogCrawler> {
        self.catalog
            .crawlers
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| ClientError::EntityNotFound(format!("crawler {name}")))
    }

    fn job_mut(&mut self, name: &str) -> ClientResult<&mut CatalogJob> {
        self.catalog
            .jobs
            .iter_mut()
            .find(|j| j.name == name)
            .ok_or_else(|| ClientError::EntityNotFound(format!("job {name}")))
    }

    fn table(&self, database: &str, table: &str) -> ClientResult<&CatalogTable> {
        self.catalog
            .tables
            .iter()
            .find(|t| t.database == database && t.name == table)
            .ok_or_else(|| ClientError::EntityNotFound(format!("table {database}.{table}")))
    }

    fn table_mut(&mut self, database: &str, table: &str) -> ClientResult<&mut CatalogTable> {
        self.catalog
            .tables
            .iter_mut()
            .find(|t| t.database == database && t.name == table)
            .ok_or_else(|| ClientError::EntityNotFound(format!("table {database}.{table}")))
    }
}

fn crawler_info(crawler: &CatalogCrawler) -> CrawlerInfo {
    CrawlerInfo {
        name: crawler.name.clone(),
        state: crawler.state,
        database: crawler.database.clone(),
        last_crawl_status: crawler.last_crawl_status.clone(),
        last_updated: crawler.last_updated,
    }
}

fn job_info(job: &CatalogJob) -> JobInfo {
    JobInfo {
        name: job.name.clone(),
        timeout_minutes: job.timeout_minutes,
        max_concurrent_runs: job.max_concurrent_runs,
    }
}

fn partition_label(values: &[String]) -> String {
    values.join("/")
}

impl GlueClient for LocalGlue {
    fn list_crawlers(&self, next_token: Option<&str>) -> ClientResult<Page<CrawlerInfo>> {
        let state = self.lock();
        let items: Vec<CrawlerInfo> = state.catalog.crawlers.iter().map(crawler_info).collect();
        self.paginate(&items, next_token)
    }

    fn get_crawler(&self, name: &str) -> ClientResult<CrawlerInfo> {
        let mut state = self.lock();
        let crawler = state.crawler_mut(name)?;
        let info = crawler_info(crawler);
        // Each observation moves a busy crawler one step towards READY.
        if crawler.state != CrawlerState::Ready {
            if crawler.pending > 0 {
                crawler.pending -= 1;
                if crawler.pending == 0 {
                    crawler.state = CrawlerState::Stopping;
                }
            } else {
                crawler.state = CrawlerState::Ready;
                crawler.last_crawl_status = Some(crawler.crawl_outcome.clone());
                crawler.last_updated = Some(Utc::now());
            }
        }
        Ok(info)
    }

    fn start_crawler(&self, name: &str) -> ClientResult<()> {
        let mut state = self.lock();
        let crawler = state.crawler_mut(name)?;
        if crawler.state != CrawlerState::Ready {
            return Err(ClientError::CrawlerRunning(name.to_string()));
        }
        crawler.state = CrawlerState::Running;
        crawler.pending = crawler.crawl_polls;
        crawler.last_updated = Some(Utc::now());
        Ok(())
    }

    fn list_jobs(&self, next_token: Option<&str>) -> ClientResult<Page<JobInfo>> {
        let state = self.lock();
        let items: Vec<JobInfo> = state.catalog.jobs.iter().map(job_info).collect();
        self.paginate(&items, next_token)
    }

    fn get_job(&self, name: &str) -> ClientResult<JobInfo> {
        let mut state = self.lock();
        state.job_mut(name).map(|job| job_info(job))
    }

    fn start_job_run(&self, request: &StartJobRun) -> ClientResult<String> {
        let mut state = self.lock();
        let job = state.job_mut(&request.job_name)?;
        let active = job.runs.iter().filter(|r| r.state.is_active()).count();
        if active >= job.max_concurrent_runs as usize {
            return Err(ClientError::ConcurrentRunsExceeded(format!(
                "job {} already has {} active run(s)",
                job.name, active
            )));
        }
        let id = format!("jr_{}", uuid::Uuid::new_v4().simple());
        let polls = job.run_polls;
        job.runs.insert(
            0,
            JobRun {
                id: id.clone(),
                job_name: job.name.clone(),
                state: JobRunState::Running,
                arguments: request.arguments.clone(),
                timeout_minutes: request.timeout_minutes,
                started_on: Some(Utc::now()),
                completed_on: None,
            },
        );
        state.run_pending.insert(id.clone(), polls);
        Ok(id)
    }

    fn get_job_run(&self, job_name: &str, run_id: &str) -> ClientResult<JobRun> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let job = state
            .catalog
            .jobs
            .iter_mut()
            .find(|j| j.name == job_name)
            .ok_or_else(|| ClientError::EntityNotFound(format!("job {job_name}")))?;
        let outcome = job.outcome;
        let run = job
            .runs
            .iter_mut()
            .find(|r| r.id == run_id)
            .ok_or_else(|| ClientError::EntityNotFound(format!("job run {run_id}")))?;
        if run.state.is_active() {
            let pending = state.run_pending.entry(run_id.to_string()).or_insert(0);
            if *pending > 0 {
                *pending -= 1;
            } else {
                run.state = outcome;
                run.completed_on = Some(Utc::now());
                state.run_pending.remove(run_id);
            }
        }
        Ok(run.clone())
    }

    fn list_job_runs(&self, job_name: &str, next_token: Option<&str>) -> ClientResult<Page<JobRun>> {
        let mut state = self.lock();
        let runs = state.job_mut(job_name)?.runs.clone();
        self.paginate(&runs, next_token)
    }

    fn list_tables(&self, next_token: Option<&str>) -> ClientResult<Page<TableInfo>> {
        let state = self.lock();
        let items: Vec<TableInfo> = state.catalog.tables.iter().map(CatalogTable::info).collect();
        self.paginate(&items, next_token)
    }

    fn get_table(&self, database: &str, table: &str) -> ClientResult<TableInfo> {
        let state = self.lock();
        state.table(database, table).map(CatalogTable::info)
    }

    fn list_partitions(
        &self,
        database: &str,
        table: &str,
        next_token: Option<&str>,
    ) -> ClientResult<Page<PartitionInfo>> {
        let state = self.lock();
        let partitions = state.table(database, table)?.partitions.clone();
        self.paginate(&partitions, next_token)
    }

    fn create_partition(
        &self,
        database: &str,
        table: &str,
        partition: &PartitionInfo,
    ) -> ClientResult<()> {
        let mut state = self.lock();
        let table = state.table_mut(database, table)?;
        if partition.values.len() != table.partition_keys.len() {
            return Err(ClientError::Service(format!(
                "expected {} partition values, got {}",
                table.partition_keys.len(),
                partition.values.len()
            )));
        }
        if table.partitions.iter().any(|p| p.values == partition.values) {
            return Err(ClientError::AlreadyExists(format!(
                "partition {}",
                partition_label(&partition.values)
            )));
        }
        table.partitions.push(partition.clone());
        Ok(())
    }

    fn delete_partition(&self, database: &str, table: &str, values: &[String]) -> ClientResult<()> {
        let mut state = self.lock();
        let table = state.table_mut(database, table)?;
        let before = table.partitions.len();
        table.partitions.retain(|p| p.values != values);
        if table.partitions.len() == before {
            return Err(ClientError::EntityNotFound(format!(
                "partition {}",
                partition_label(values)
            )));
        }
        Ok(())
    }

    fn list_prefixes(&self, location: &str) -> ClientResult<Vec<String>> {
        let state = self.lock();
        let base = if location.ends_with('/') {
            location.to_string()
        } else {
            format!("{location}/")
        };
        let prefixes: BTreeSet<String> = state
            .catalog
            .storage
            .iter()
            .filter_map(|key| key.strip_prefix(&base))
            .filter_map(|rest| rest.find('/').map(|idx| format!("{base}{}", &rest[..=idx])))
            .collect();
        Ok(prefixes.into_iter().collect())
    }
}
