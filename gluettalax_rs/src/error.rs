//! Error taxonomy for gluettalax.
//!
//! Every failure bubbles up unmodified to the dispatcher, which is the only
//! place that turns a [`GlueError`] into a printed message and an exit code.

use std::time::Duration;

use thiserror::Error;

use crate::client::ClientError;

/// How a failure is reported at the process boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Printed, but the command still exits with 0.
    Warning,
    /// Printed, the command exits with 1.
    Failure,
}

/// Errors raised by the parser, the registry and the remote facades.
#[derive(Debug, Error)]
pub enum GlueError {
    /// A usage string could not be parsed. Programming error, caught at registration.
    #[error("invalid usage spec '{usage}': {reason}")]
    InvalidUsageSpec { usage: String, reason: String },

    /// Two commands share a name or alias.
    #[error("duplicate command name or alias '{0}'")]
    DuplicateCommand(String),

    /// Malformed or missing command-line argument.
    #[error("{0}")]
    InvalidOption(String),

    #[error("unknown command '{name}'{}", did_you_mean(.suggestion))]
    CommandNotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("crawler not found: {0}")]
    CrawlerNotFound(String),

    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("table not found: {database}.{table}")]
    TableNotFound { database: String, table: String },

    #[error("partition not found: {database}.{table} ({values})")]
    PartitionNotFound {
        database: String,
        table: String,
        values: String,
    },

    /// The crawler did not return to READY in time. The crawl may still be running.
    #[error("timeout waiting for crawler {name} after {}s", .waited.as_secs())]
    CrawlerTimeout { name: String, waited: Duration },

    /// The job run did not reach a final state in time. The run may still be in flight.
    #[error("timeout waiting for job {name} (run {run_id}) after {}s", .waited.as_secs())]
    JobTimeout {
        name: String,
        run_id: String,
        waited: Duration,
    },

    #[error("concurrent runs exceeded for job {0}")]
    JobConcurrentRunsExceeded(String),

    #[error("partition already exists: {database}.{table} ({values})")]
    PartitionAlreadyExists {
        database: String,
        table: String,
        values: String,
    },

    /// Any other failure reported by the service client.
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GlueError {
    /// Create an invalid option error.
    pub fn invalid_option(msg: impl Into<String>) -> Self {
        Self::InvalidOption(msg.into())
    }

    /// Warnings are surfaced but do not fail the command.
    pub fn severity(&self) -> Severity {
        match self {
            GlueError::PartitionAlreadyExists { .. } => Severity::Warning,
            _ => Severity::Failure,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            Severity::Warning => 0,
            Severity::Failure => 1,
        }
    }
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(", did you mean '{s}'?"))
        .unwrap_or_default()
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, GlueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_is_a_warning() {
        let err = GlueError::PartitionAlreadyExists {
            database: "db".into(),
            table: "tbl".into(),
            values: "year=2020".into(),
        };
        assert_eq!(err.severity(), Severity::Warning);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_hard_failures_exit_one() {
        let errors = [
            GlueError::invalid_option("missing value for timeout"),
            GlueError::CrawlerNotFound("c".into()),
            GlueError::JobNotFound("j".into()),
            GlueError::JobConcurrentRunsExceeded("j".into()),
            GlueError::CrawlerTimeout {
                name: "c".into(),
                waited: Duration::from_secs(1),
            },
        ];
        for err in errors {
            assert_eq!(err.severity(), Severity::Failure, "{err}");
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn test_command_not_found_message() {
        let err = GlueError::CommandNotFound {
            name: "run_crawlr".into(),
            suggestion: Some("run_crawler".into()),
        };
        assert_eq!(
            err.to_string(),
            "unknown command 'run_crawlr', did you mean 'run_crawler'?"
        );

        let err = GlueError::CommandNotFound {
            name: "zzz".into(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "unknown command 'zzz'");
    }
}
