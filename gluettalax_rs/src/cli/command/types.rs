//! Command definition: name, aliases, usage grammar, defaults and handler.

use std::fmt;

use super::super::dispatch::Session;
use super::super::parser::{Options, ParsedArguments};
use super::super::usage::UsageSpec;
use crate::error::Result;

/// Handler invoked with the parsed arguments. Returns the exit code.
pub type Handler = fn(&mut Session<'_>, &ParsedArguments) -> Result<i32>;

/// One registered command.
#[derive(Clone)]
pub struct Command {
    name: &'static str,
    aliases: Vec<&'static str>,
    usage: UsageSpec,
    /// Full usage text, grammar line first then the long description.
    usage_text: &'static str,
    help: Option<&'static str>,
    defaults: Options,
    handler: Handler,
}

impl Command {
    /// Build a command. A malformed usage string fails here, at registration.
    pub fn new(name: &'static str, usage: &'static str, handler: Handler) -> Result<Self> {
        Ok(Self {
            name,
            aliases: Vec::new(),
            usage: UsageSpec::parse(usage)?,
            usage_text: usage,
            help: None,
            defaults: Options::new(),
            handler,
        })
    }

    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// One-line summary shown in the command listing.
    pub fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn defaults(mut self, defaults: Options) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn aliases(&self) -> &[&'static str] {
        &self.aliases
    }

    /// Name followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }

    pub fn usage(&self) -> &UsageSpec {
        &self.usage
    }

    pub fn usage_text(&self) -> &'static str {
        self.usage_text
    }

    pub fn summary(&self) -> Option<&'static str> {
        self.help
    }

    pub fn default_options(&self) -> &Options {
        &self.defaults
    }

    pub fn handler(&self) -> Handler {
        self.handler
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("usage", &self.usage.usage())
            .finish_non_exhaustive()
    }
}
