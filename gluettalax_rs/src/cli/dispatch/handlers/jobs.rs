//! list_jobs, list_runs, run_job

use super::super::super::parser::ParsedArguments;
use super::super::Session;
use super::{print_table, required, timestamp};
use crate::client::JobRun;
use crate::error::{GlueError, Result};
use crate::job::{self, Job, JobArguments};
use crate::output::{NameFilter, Table};
use crate::poller::PollConfig;
use crate::progress::{self, format_duration};

pub fn list(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    let filter = NameFilter::new(args.positional(0))?;
    let mut table = Table::new(&["NAME", "TIMEOUT", "MAX RUNS"]);
    for info in job::list_jobs(session.client)? {
        if filter.matches(&info.name) {
            table.push(vec![
                info.name,
                format!("{}m", info.timeout_minutes),
                info.max_concurrent_runs.to_string(),
            ]);
        }
    }
    print_table(session, &table, args)
}

pub fn list_runs(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    let lines = match args.options.text("lines") {
        Some(raw) => Some(raw.trim().parse::<usize>().map_err(|_| {
            GlueError::invalid_option(format!("--lines expects a number, got '{raw}'"))
        })?),
        None => None,
    };

    let names = match args.positional(0) {
        Some(name) => vec![name.to_string()],
        None => job::list_jobs(session.client)?
            .into_iter()
            .map(|info| info.name)
            .collect(),
    };
    let config = PollConfig::new(session.settings.job_delay(), None);
    let mut runs: Vec<JobRun> = Vec::new();
    for name in &names {
        runs.extend(Job::new(session.client, session.clock, name, config)?.runs()?);
    }
    runs.sort_by(|a, b| b.started_on.cmp(&a.started_on));
    if let Some(lines) = lines {
        runs.truncate(lines);
    }

    let mut table = Table::new(&["JOB", "RUN ID", "STATE", "STARTED", "COMPLETED"]);
    for run in runs {
        table.push(vec![
            run.job_name,
            run.id,
            run.state.to_string(),
            timestamp(run.started_on),
            timestamp(run.completed_on),
        ]);
    }
    print_table(session, &table, args)
}

/// Exit 0 if the run SUCCEEDED (or was started async), 1 if it FAILED.
pub fn run(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    let name = required(args, 0, "job_name")?;
    let config = session.job_poll(&args.options)?;

    // Every string option except the poll timeout goes to the job.
    let mut arguments = JobArguments::new();
    for (key, value) in args.options.texts().filter(|(key, _)| *key != "timeout") {
        arguments.insert(key, value)?;
    }

    let run_async = config.run_async;
    let job = Job::new(session.client, session.clock, name, config)?;
    let spinner = if run_async {
        None
    } else {
        Some(session.spinner(&format!("Waiting for job {name}")))
    };
    let started = session.clock.now();
    let result = job.run(&arguments);
    if let Some(spinner) = spinner {
        match &result {
            Ok(true) => {
                let waited = session.clock.now().saturating_duration_since(started);
                spinner.finish_success(&format!(
                    "Job {name} succeeded ({})",
                    format_duration(waited)
                ));
            }
            _ => spinner.finish_clear(),
        }
    }
    let succeeded = result?;
    if !succeeded {
        progress::error(&format!("job {name} run FAILED"));
    }
    Ok(if succeeded { 0 } else { 1 })
}
