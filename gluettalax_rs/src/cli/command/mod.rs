//! Command definitions, registry and help text.
//!
//! - `types`: the `Command` struct and handler signature
//! - `registry`: `CommandRegistry`, including the built-in command set
//! - `help`: help text generation
//! - `help_texts`: usage string constants

mod help;
mod help_texts;
mod registry;
mod types;

pub use registry::CommandRegistry;
pub use types::{Command, Handler};
