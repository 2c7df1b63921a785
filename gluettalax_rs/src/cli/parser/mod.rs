//! Argument parsing for `gluettalax <command> [args]` invocations.
//!
//! - [`core`] - `parse_args`, the token consumer
//! - [`options`] - option map and parse result types
//! - [`helpers`] - command suggestions

mod core;
mod helpers;
mod options;

pub use core::parse_args;
pub use helpers::suggest_similar_command;
pub use options::{FLAG_PREFIX, OptionValue, Options, ParsedArguments};
