//! Argument parsing against a [`UsageSpec`].
//!
//! Tokens are consumed left to right. At each step, in order:
//!
//! 1. a pending `--key` takes the token verbatim as its value;
//! 2. while required positionals remain, the token fills the next one,
//!    unless it is a `--key=value` assignment;
//! 3. while optional positionals remain, a token not starting with `-`
//!    fills the next one;
//! 4. `--key=value` is split, the value goes back to the front of the stream
//!    and becomes the pending value of `key`;
//! 5. `--name` sets flag `op_<name>` when the usage declares it boolean,
//!    otherwise it waits for a value;
//! 6. anything else is rejected.

use std::collections::VecDeque;

use tracing::trace;

use super::super::usage::UsageSpec;
use super::options::{OptionValue, Options, ParsedArguments};
use crate::error::{GlueError, Result};

/// Parse `args` (command token first) against `spec`, starting from `defaults`.
///
/// `None` and an empty slice both mean "no arguments".
pub fn parse_args(
    args: Option<&[String]>,
    spec: &UsageSpec,
    defaults: &Options,
) -> Result<ParsedArguments> {
    let mut tokens: VecDeque<String> = args
        .unwrap_or_default()
        .iter()
        .skip(1)
        .cloned()
        .collect();
    let required = spec.required().len();
    let slots = spec.positional_count();

    let mut options = defaults.clone();
    let mut positionals: Vec<Option<String>> = Vec::with_capacity(slots);
    let mut pending: Option<String> = None;

    while let Some(token) = tokens.pop_front() {
        if let Some(key) = pending.take() {
            trace!(%key, value = %token, "option value");
            options.insert_raw(key, OptionValue::Text(token));
            continue;
        }

        let is_assignment = token.starts_with("--") && token.contains('=');
        if positionals.len() < required && !is_assignment {
            positionals.push(Some(token));
            continue;
        }
        if positionals.len() < slots && !token.starts_with('-') {
            positionals.push(Some(token));
            continue;
        }

        if let Some((key, value)) = token.split_once('=') {
            let name = key
                .strip_prefix("--")
                .filter(|name| !name.is_empty())
                .ok_or_else(|| GlueError::invalid_option(format!("invalid option '{token}'")))?;
            pending = Some(name.to_string());
            tokens.push_front(value.to_string());
            continue;
        }

        match token.strip_prefix("--") {
            Some(name) if !name.is_empty() => {
                if spec.is_flag(name) {
                    options.set_flag(name, true);
                } else {
                    pending = Some(name.to_string());
                }
            }
            _ => {
                return Err(GlueError::invalid_option(format!(
                    "invalid option '{token}'"
                )));
            }
        }
    }

    if let Some(key) = pending {
        return Err(GlueError::invalid_option(format!(
            "missing value for --{key}"
        )));
    }
    if let Some(missing) = spec.required().get(positionals.len()) {
        return Err(GlueError::invalid_option(format!(
            "missing argument <{missing}>"
        )));
    }
    positionals.resize(slots, None);

    Ok(ParsedArguments {
        positionals,
        options,
    })
}

// ============================================================================
// Tests
// ============================================================================
