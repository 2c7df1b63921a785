//! # gluettalax
//!
//! Drive a managed ETL control plane (AWS Glue style) from the command line
//! or from Rust: run crawlers and jobs to completion, list metadata and
//! manage table partitions.
//!
//! Remote calls go through the [`GlueClient`] capability trait. Waiting on
//! asynchronous operations is done by the [`poller`], a bounded
//! check-sleep loop over an injectable [`Clock`](poller::Clock).
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use gluettalax::client::LocalGlue;
//! use gluettalax::poller::{PollConfig, SystemClock};
//! use std::time::Duration;
//!
//! let glue = LocalGlue::from_path("catalog.json".as_ref()).unwrap();
//! let config = PollConfig::new(Duration::from_secs(10), Some(Duration::from_secs(600)));
//! gluettalax::run_crawler(&glue, &SystemClock, "sales", false, config).unwrap();
//! ```
//!
//! ## CLI usage
//!
//! ```bash
//! gluettalax list_crawlers
//! gluettalax run_crawler sales --timeout=900
//! gluettalax run_job load_sales --day=2020-01-01
//! gluettalax add_partition analytics sales --year=2020
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Remote capability trait, service data types and the local emulation.
pub mod client;

/// Crawler facade.
pub mod crawler;

/// Error taxonomy and exit-code severity.
pub mod error;

/// Job facade and job arguments.
pub mod job;

/// Table and partition helpers.
pub mod partition;

/// Timeout-bounded polling.
pub mod poller;

// ============================================================================
// CLI and Support
// ============================================================================

pub mod cli;

/// Settings file support.
pub mod config;

/// Listing filters and column output.
pub mod output;

/// Spinners and status lines on stderr.
pub mod progress;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::{ClientError, GlueClient};
pub use crawler::{Crawler, list_crawlers, run_crawler};
pub use error::{GlueError, Result, Severity};
pub use job::{Job, JobArguments, list_jobs, run_job};
