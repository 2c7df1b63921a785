//! Command handlers split by domain.

pub mod crawlers;
pub mod help;
pub mod jobs;
pub mod partitions;
pub mod tables;

use chrono::{DateTime, Utc};

use super::super::parser::ParsedArguments;
use super::Session;
use crate::error::{GlueError, Result};
use crate::output::Table;

/// Positional `index`, which the usage declares as required.
fn required<'a>(args: &'a ParsedArguments, index: usize, name: &str) -> Result<&'a str> {
    args.positional(index)
        .ok_or_else(|| GlueError::invalid_option(format!("missing argument <{name}>")))
}

fn timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Print a listing, honouring `--noheaders`.
fn print_table(session: &mut Session<'_>, table: &Table, args: &ParsedArguments) -> Result<i32> {
    table.write_to(session.out, !args.options.flag("noheaders"))?;
    Ok(0)
}
