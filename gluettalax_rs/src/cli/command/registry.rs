//! Command registry: name and alias lookup.

use super::super::dispatch::handlers;
use super::super::parser::{Options, suggest_similar_command};
use super::help_texts::*;
use super::types::Command;
use crate::error::{GlueError, Result};

/// Registered commands, in registration order.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Its name and aliases must not collide with any name or
    /// alias already registered.
    pub fn register(&mut self, command: Command) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        for name in command.names() {
            if seen.contains(&name) || self.find(name).is_some() {
                return Err(GlueError::DuplicateCommand(name.to_string()));
            }
            seen.push(name);
        }
        self.commands.push(command);
        Ok(())
    }

    fn find(&self, token: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|cmd| cmd.names().any(|name| name == token))
    }

    /// Exact name or alias match.
    pub fn lookup(&self, token: &str) -> Result<&Command> {
        self.find(token).ok_or_else(|| GlueError::CommandNotFound {
            name: token.to_string(),
            suggestion: suggest_similar_command(
                token,
                self.commands.iter().flat_map(|cmd| cmd.names()),
            )
            .map(str::to_string),
        })
    }

    /// Commands sorted by name.
    pub fn list(&self) -> Vec<&Command> {
        let mut commands: Vec<&Command> = self.commands.iter().collect();
        commands.sort_by_key(|cmd| cmd.name());
        commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The gluettalax command set.
    pub fn builtin() -> Result<Self> {
        let listing = || Options::new().with_flag("noheaders", false);
        let mut registry = Self::new();

        registry.register(
            Command::new("list_crawlers", LIST_CRAWLERS_USAGE, handlers::crawlers::list)?
                .alias("lsc")
                .help("List crawlers")
                .defaults(listing()),
        )?;
        registry.register(
            Command::new("run_crawler", RUN_CRAWLER_USAGE, handlers::crawlers::run)?
                .alias("runc")
                .help("Run a crawler and wait for it to finish")
                .defaults(
                    Options::new()
                        .with_flag("async", false)
                        .with_flag("rerun", false),
                ),
        )?;
        registry.register(
            Command::new("list_jobs", LIST_JOBS_USAGE, handlers::jobs::list)?
                .alias("lsj")
                .help("List jobs")
                .defaults(listing()),
        )?;
        registry.register(
            Command::new("list_runs", LIST_RUNS_USAGE, handlers::jobs::list_runs)?
                .alias("lsr")
                .help("List job runs")
                .defaults(listing()),
        )?;
        registry.register(
            Command::new("run_job", RUN_JOB_USAGE, handlers::jobs::run)?
                .alias("runj")
                .help("Run a job and wait for it to finish")
                .defaults(Options::new().with_flag("async", false)),
        )?;
        registry.register(
            Command::new("list_tables", LIST_TABLES_USAGE, handlers::tables::list)?
                .alias("lst")
                .help("List tables")
                .defaults(listing()),
        )?;
        registry.register(
            Command::new(
                "list_partitions",
                LIST_PARTITIONS_USAGE,
                handlers::partitions::list,
            )?
            .alias("lsp")
            .help("List the partitions of a table")
            .defaults(listing()),
        )?;
        registry.register(
            Command::new("add_partition", ADD_PARTITION_USAGE, handlers::partitions::add)?
                .alias("addp")
                .help("Add a partition"),
        )?;
        registry.register(
            Command::new(
                "add_partitions",
                ADD_PARTITIONS_USAGE,
                handlers::partitions::add_from_location,
            )?
            .help("Add the partitions found under a storage location"),
        )?;
        registry.register(
            Command::new("del_partition", DEL_PARTITION_USAGE, handlers::partitions::delete)?
                .alias("rmp")
                .help("Delete a partition"),
        )?;
        registry.register(
            Command::new("help", HELP_USAGE, handlers::help::help)?
                .alias("-h")
                .alias("--help")
                .help("Show help"),
        )?;

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::dispatch::Session;
    use crate::cli::parser::ParsedArguments;

    fn noop(_: &mut Session<'_>, _: &ParsedArguments) -> Result<i32> {
        Ok(0)
    }

    #[test]
    fn test_builtin_registers() {
        let registry = CommandRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 11);
        assert_eq!(registry.lookup("lsc").unwrap().name(), "list_crawlers");
        assert_eq!(registry.lookup("--help").unwrap().name(), "help");
        assert_eq!(registry.lookup("add_partitions").unwrap().name(), "add_partitions");
    }

    #[test]
    fn test_list_sorted_by_name() {
        let registry = CommandRegistry::builtin().unwrap();
        let names: Vec<_> = registry.list().iter().map(|c| c.name()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_duplicate_name_or_alias() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("one", "", noop).unwrap().alias("o"))
            .unwrap();

        let err = registry
            .register(Command::new("o", "", noop).unwrap())
            .unwrap_err();
        assert!(matches!(err, GlueError::DuplicateCommand(ref n) if n == "o"));

        let err = registry
            .register(Command::new("two", "", noop).unwrap().alias("one"))
            .unwrap_err();
        assert!(matches!(err, GlueError::DuplicateCommand(ref n) if n == "one"));

        let err = registry
            .register(Command::new("three", "", noop).unwrap().alias("three"))
            .unwrap_err();
        assert!(matches!(err, GlueError::DuplicateCommand(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_suggests() {
        let registry = CommandRegistry::builtin().unwrap();
        let err = registry.lookup("list_job").unwrap_err();
        assert!(matches!(
            err,
            GlueError::CommandNotFound { ref suggestion, .. } if suggestion.as_deref() == Some("list_jobs")
        ));
        assert!(err.to_string().contains("list_jobs"));

        let err = registry.lookup("completely_unknown").unwrap_err();
        assert!(matches!(err, GlueError::CommandNotFound { suggestion: None, .. }));
    }

    #[test]
    fn test_malformed_usage_fails_at_registration() {
        assert!(matches!(
            Command::new("bad", "<name", noop),
            Err(GlueError::InvalidUsageSpec { .. })
        ));
    }
}
