//! list_partitions, add_partition, add_partitions, del_partition

use std::collections::BTreeMap;

use super::super::super::parser::ParsedArguments;
use super::super::Session;
use super::{print_table, required};
use crate::client::TableInfo;
use crate::error::{GlueError, Result};
use crate::output::{NameFilter, Table};
use crate::partition;
use crate::progress::format_count;

/// Option naming the storage location of a new partition.
const LOCATION_OPTION: &str = "location";

fn target_table(session: &Session<'_>, args: &ParsedArguments) -> Result<TableInfo> {
    let database = required(args, 0, "db")?;
    let table = required(args, 1, "table")?;
    partition::get_table(session.client, database, table)
}

/// `--key=value` options as partition values, in the table's key order.
fn values_from_options(table: &TableInfo, args: &ParsedArguments) -> Result<Vec<String>> {
    let pairs: BTreeMap<String, String> = args
        .options
        .texts()
        .filter(|(key, _)| *key != LOCATION_OPTION)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    partition::partition_values(table, &pairs)
}

pub fn list(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    let table = target_table(session, args)?;
    let filter = NameFilter::new(args.positional(2))?;
    let mut listing = Table::new(&["PARTITION", "LOCATION"]);
    for info in partition::list_partitions(session.client, &table.database, &table.name)? {
        let path = partition::partition_path(&table.partition_keys, &info.values);
        if filter.matches(&path) {
            listing.push(vec![path, info.location.unwrap_or_else(|| "-".to_string())]);
        }
    }
    print_table(session, &listing, args)
}

pub fn add(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    let table = target_table(session, args)?;
    let values = values_from_options(&table, args)?;
    let location = args.options.text(LOCATION_OPTION).map(str::to_string);
    partition::add_partition(session.client, &table, values, location)?;
    Ok(0)
}

pub fn add_from_location(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    let table = target_table(session, args)?;
    let summary = partition::add_partitions_from_location(session.client, &table, args.positional(2))?;
    let line = format!(
        "{}.{}: added {}, {} already present\n",
        table.database,
        table.name,
        format_count(summary.added.len(), "partition", "partitions"),
        summary.existing
    );
    session.write(&line)?;
    Ok(0)
}

pub fn delete(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    if args.options.text(LOCATION_OPTION).is_some() {
        return Err(GlueError::invalid_option(
            "--location is not accepted by del_partition",
        ));
    }
    let table = target_table(session, args)?;
    let values = values_from_options(&table, args)?;
    partition::delete_partition(session.client, &table, &values)?;
    Ok(0)
}
