//! Dispatcher: resolves the command token, parses the rest of argv against
//! the command's usage and runs its handler.
//!
//! This is the only place where a [`GlueError`] becomes a printed message and
//! an exit code.

pub(crate) mod handlers;

use std::io::Write;
use std::time::Duration;

use tracing::debug;

use super::command::CommandRegistry;
use super::parser::{Options, parse_args};
use crate::client::GlueClient;
use crate::config::Settings;
use crate::error::{GlueError, Result, Severity};
use crate::output;
use crate::poller::{Clock, PollConfig};
use crate::progress::{self, Spinner};

/// Exit code when no command is given at all.
pub const EXIT_USAGE: i32 = 2;

/// Everything a handler needs for one invocation.
pub struct Session<'a> {
    pub registry: &'a CommandRegistry,
    pub client: &'a dyn GlueClient,
    pub clock: &'a dyn Clock,
    pub settings: &'a Settings,
    /// Listings and help go here.
    pub out: &'a mut dyn Write,
    /// Draw spinners while waiting.
    pub show_progress: bool,
}

impl Session<'_> {
    pub fn write(&mut self, text: &str) -> Result<()> {
        output::write_quiet(self.out, text)
    }

    pub fn spinner(&self, message: &str) -> Spinner {
        Spinner::new(message, self.show_progress)
    }

    /// Crawler poll policy: settings, overridden by `--timeout` and `--async`.
    pub fn crawler_poll(&self, options: &Options) -> Result<PollConfig> {
        let timeout = timeout_option(options)?.unwrap_or(self.settings.crawler_timeout());
        Ok(PollConfig::new(self.settings.crawler_delay(), Some(timeout))
            .with_async(options.flag("async")))
    }

    /// Job poll policy. Without `--timeout` or a configured one the job's
    /// own timeout applies.
    pub fn job_poll(&self, options: &Options) -> Result<PollConfig> {
        let timeout = timeout_option(options)?.or(self.settings.job_timeout());
        Ok(PollConfig::new(self.settings.job_delay(), timeout).with_async(options.flag("async")))
    }
}

fn timeout_option(options: &Options) -> Result<Option<Duration>> {
    options
        .text("timeout")
        .map(|raw| {
            raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                GlueError::invalid_option(format!("--timeout expects seconds, got '{raw}'"))
            })
        })
        .transpose()
}

/// Run `args` (command token first) and return the process exit code.
pub fn dispatch(session: &mut Session<'_>, args: &[String]) -> i32 {
    if args.is_empty() {
        let usage = session.registry.format_help();
        if let Err(e) = session.write(&usage) {
            return report(&e);
        }
        return EXIT_USAGE;
    }
    match run_command(session, args) {
        Ok(code) => code,
        Err(e) => report(&e),
    }
}

fn run_command(session: &mut Session<'_>, args: &[String]) -> Result<i32> {
    let registry = session.registry;
    let command = registry.lookup(&args[0])?;
    let parsed = parse_args(Some(args), command.usage(), command.default_options())?;
    debug!(command = command.name(), ?parsed, "dispatching");
    (command.handler())(session, &parsed)
}

/// Print `err` as one line on stderr and map it to an exit code.
pub fn report(err: &GlueError) -> i32 {
    match err.severity() {
        Severity::Warning => progress::warning(&err.to_string()),
        Severity::Failure => progress::error(&err.to_string()),
    }
    err.exit_code()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::client::LocalGlue;
    use crate::poller::ManualClock;

    /// Runs commands against an in-memory catalog and captures stdout.
    pub struct Harness {
        pub registry: CommandRegistry,
        pub glue: LocalGlue,
        pub clock: ManualClock,
        pub settings: Settings,
    }

    impl Harness {
        pub fn new(catalog: &str) -> Self {
            Self {
                registry: CommandRegistry::builtin().unwrap(),
                glue: LocalGlue::from_json(catalog).unwrap(),
                clock: ManualClock::new(),
                settings: Settings::default(),
            }
        }

        /// Exit code and captured stdout.
        pub fn run(&self, args: &[&str]) -> (i32, String) {
            let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
            let mut out = Vec::new();
            let code = {
                let mut session = Session {
                    registry: &self.registry,
                    client: &self.glue,
                    clock: &self.clock,
                    settings: &self.settings,
                    out: &mut out,
                    show_progress: false,
                };
                dispatch(&mut session, &args)
            };
            (code, String::from_utf8(out).unwrap())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Harness;

    #[test]
    fn test_no_arguments_prints_usage() {
        let (code, out) = Harness::new("{}").run(&[]);
        assert_eq!(code, 2);
        assert!(out.contains("usage: gluettalax <command> [parameters]"));
    }

    #[test]
    fn test_unknown_command() {
        let (code, out) = Harness::new("{}").run(&["list_crawler"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_arguments() {
        let harness = Harness::new(r#"{ "crawlers": [{ "name": "c" }] }"#);
        assert_eq!(harness.run(&["run_crawler"]).0, 1);
        assert_eq!(harness.run(&["run_crawler", "c", "extra"]).0, 1);
        assert_eq!(harness.run(&["run_crawler", "c", "--timeout=soon"]).0, 1);
        assert_eq!(harness.run(&["list_jobs", "--lines"]).0, 1);
    }
}
