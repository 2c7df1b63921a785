//! Usage strings for the built-in commands.
//!
//! The first line of each constant is the argument grammar parsed by
//! [`UsageSpec`](crate::cli::usage::UsageSpec); the rest is shown by
//! `gluettalax help <command>`.

pub(super) const LIST_CRAWLERS_USAGE: &str = "[pattern] [--noheaders]

List crawlers with their state, target database and last crawl status.
PATTERN is a glob matched against the crawler name.

EXAMPLES:
    gluettalax list_crawlers
    gluettalax lsc 'sales_*' --noheaders";

pub(super) const RUN_CRAWLER_USAGE: &str = "<crawler_name> [--async] [--rerun] [--timeout=seconds]

Start a crawler and wait until it is READY again.

OPTIONS:
    --async              Return right after starting the crawler
    --rerun              If the crawler is busy, wait for it and start it again
    --timeout=seconds    Give up waiting after this many seconds

A crawler that is already running is not restarted without --rerun;
the command waits for the current crawl instead.";

pub(super) const LIST_JOBS_USAGE: &str = "[pattern] [--noheaders]

List jobs with their timeout and maximum concurrent runs.
PATTERN is a glob matched against the job name.";

pub(super) const LIST_RUNS_USAGE: &str = "[<job_name>] [--lines=num] [--noheaders]

List job runs, newest first. Without JOB_NAME the runs of every job are listed.

OPTIONS:
    --lines=num          Show only the newest NUM runs
    --noheaders          Omit the header line";

pub(super) const RUN_JOB_USAGE: &str = "<job_name> [--async] [--timeout=seconds] [--param=value...]

Start a job run and wait for it to SUCCEED or FAIL.

Any other --name=value (or --name value) pair is passed to the job as the
argument --name. The names async and timeout are reserved.

OPTIONS:
    --async              Return right after starting the run
    --timeout=seconds    Give up waiting after this many seconds
                         (default: the job's own timeout)

EXIT STATUS:
    0 if the run SUCCEEDED, 1 if it FAILED, timed out or the job is unknown.";

pub(super) const LIST_TABLES_USAGE: &str = "[pattern] [--noheaders]

List tables. PATTERN is a glob matched against TABLE and DATABASE.TABLE.";

pub(super) const LIST_PARTITIONS_USAGE: &str = "<db> <table> [pattern] [--noheaders]

List the partitions of a table. PATTERN is a glob matched against the
partition path, e.g. 'year=2020/*'.";

pub(super) const ADD_PARTITION_USAGE: &str = "<db> <table> [--key=value...] [--location=path]

Add a partition. Every partition key of the table must be given as
--key=value. The location defaults to the table location followed by the
key=value path. Adding an existing partition prints a warning and exits 0.
A partition key named `location` cannot be set this way.

EXAMPLES:
    gluettalax addp db sales --year=2020 --month=01";

pub(super) const ADD_PARTITIONS_USAGE: &str = "<db> <table> [s3_path]

Discover key=value prefixes under S3_PATH (default: the table location)
and add every partition found. Existing partitions are skipped.";

pub(super) const DEL_PARTITION_USAGE: &str = "<db> <table> [--key=value...]

Delete a partition. Every partition key of the table must be given.
--location is rejected, so a partition key named `location` cannot be
addressed.";

pub(super) const HELP_USAGE: &str = "[command]

Show the command list, or the usage of COMMAND.";
