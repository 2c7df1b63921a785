//! Command-line interface: `gluettalax <command> [parameters]`.
//!
//! ```text
//! argv ─▶ dispatch ─▶ CommandRegistry::lookup ─▶ parse_args(UsageSpec, defaults)
//!                                                      │
//!                                                      ▼
//!                      handler ─▶ crawler / job / partition ─▶ Poller ─▶ GlueClient
//! ```
//!
//! - [`usage`] - usage-string grammar
//! - [`parser`] - argv parsing against a usage
//! - [`command`] - command definitions, registry and help
//! - [`dispatch`] - command execution and exit codes
//! - [`entrypoint`] - process bootstrap used by the binary

pub mod command;
pub mod dispatch;
pub mod entrypoint;
pub mod parser;
pub mod usage;

pub use command::{Command, CommandRegistry};
pub use dispatch::{Session, dispatch};
pub use parser::{OptionValue, Options, ParsedArguments, parse_args};
pub use usage::{OptionKind, UsageSpec};
