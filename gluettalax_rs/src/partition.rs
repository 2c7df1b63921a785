//! Table and partition helpers. Single-shot client calls, no polling.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::client::{ClientError, GlueClient, PartitionInfo, TableInfo, collect_pages};
use crate::error::{GlueError, Result};

/// Every table known to the catalog.
pub fn list_tables(client: &dyn GlueClient) -> Result<Vec<TableInfo>> {
    Ok(collect_pages(|token| client.list_tables(token))?)
}

pub fn get_table(client: &dyn GlueClient, database: &str, table: &str) -> Result<TableInfo> {
    client
        .get_table(database, table)
        .map_err(|e| table_error(database, table, e))
}

/// Partitions of a table. A missing table is a hard error.
pub fn list_partitions(
    client: &dyn GlueClient,
    database: &str,
    table: &str,
) -> Result<Vec<PartitionInfo>> {
    collect_pages(|token| client.list_partitions(database, table, token))
        .map_err(|e| table_error(database, table, e))
}

/// Order `key=value` pairs by the table's partition keys.
///
/// Every partition key must be given and no unknown key is accepted.
pub fn partition_values(table: &TableInfo, pairs: &BTreeMap<String, String>) -> Result<Vec<String>> {
    if let Some(unknown) = pairs.keys().find(|k| !table.partition_keys.contains(*k)) {
        return Err(GlueError::invalid_option(format!(
            "'{unknown}' is not a partition key of {}.{} (keys: {})",
            table.database,
            table.name,
            table.partition_keys.join(", ")
        )));
    }
    table
        .partition_keys
        .iter()
        .map(|key| {
            pairs.get(key).cloned().ok_or_else(|| {
                GlueError::invalid_option(format!("missing value for partition key --{key}"))
            })
        })
        .collect()
}

/// `year=2020/month=01` style label of a partition.
pub fn partition_path(keys: &[String], values: &[String]) -> String {
    keys.iter()
        .zip(values)
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("/")
}

/// Default storage location of a partition: the table location plus the
/// Hive-style key path.
pub fn default_location(table: &TableInfo, values: &[String]) -> Option<String> {
    table.location.as_ref().map(|base| {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            partition_path(&table.partition_keys, values)
        )
    })
}

/// Create one partition. "Already exists" is reported as the
/// [`GlueError::PartitionAlreadyExists`] warning.
pub fn add_partition(
    client: &dyn GlueClient,
    table: &TableInfo,
    values: Vec<String>,
    location: Option<String>,
) -> Result<PartitionInfo> {
    let location = location.or_else(|| default_location(table, &values));
    let partition = PartitionInfo { values, location };
    match client.create_partition(&table.database, &table.name, &partition) {
        Ok(()) => {
            info!(
                table = %format!("{}.{}", table.database, table.name),
                partition = %partition_path(&table.partition_keys, &partition.values),
                "partition added"
            );
            Ok(partition)
        }
        Err(ClientError::AlreadyExists(_)) => Err(GlueError::PartitionAlreadyExists {
            database: table.database.clone(),
            table: table.name.clone(),
            values: partition_path(&table.partition_keys, &partition.values),
        }),
        Err(e) => Err(table_error(&table.database, &table.name, e)),
    }
}

/// Delete one partition. A missing partition is a hard error.
pub fn delete_partition(client: &dyn GlueClient, table: &TableInfo, values: &[String]) -> Result<()> {
    let label = partition_path(&table.partition_keys, values);
    client
        .delete_partition(&table.database, &table.name, values)
        .map_err(|e| match e {
            ClientError::EntityNotFound(_) => GlueError::PartitionNotFound {
                database: table.database.clone(),
                table: table.name.clone(),
                values: label.clone(),
            },
            other => GlueError::Client(other),
        })?;
    info!(table = %format!("{}.{}", table.database, table.name), partition = %label, "partition deleted");
    Ok(())
}

/// Outcome of [`add_partitions_from_location`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    pub added: Vec<PartitionInfo>,
    pub existing: usize,
}

/// Discover `key=value` prefixes under `location` (default: the table
/// location) following the table's partition keys, and create every
/// partition found. Existing partitions are skipped.
pub fn add_partitions_from_location(
    client: &dyn GlueClient,
    table: &TableInfo,
    location: Option<&str>,
) -> Result<DiscoverySummary> {
    if table.partition_keys.is_empty() {
        return Err(GlueError::invalid_option(format!(
            "table {}.{} is not partitioned",
            table.database, table.name
        )));
    }
    let root = match location.or(table.location.as_deref()) {
        Some(root) => root.trim_end_matches('/').to_string(),
        None => {
            return Err(GlueError::invalid_option(format!(
                "table {}.{} has no location, pass one explicitly",
                table.database, table.name
            )));
        }
    };

    // Breadth-first walk, one level per partition key.
    let mut frontier: Vec<(String, Vec<String>)> = vec![(root, Vec::new())];
    for key in &table.partition_keys {
        let mut next = Vec::new();
        for (prefix, values) in &frontier {
            let children = client
                .list_prefixes(prefix)
                .map_err(|e| table_error(&table.database, &table.name, e))?;
            for child in children {
                let segment = child
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or_default();
                if let Some(value) = segment.strip_prefix(key.as_str()).and_then(|r| r.strip_prefix('=')) {
                    let mut values = values.clone();
                    values.push(value.to_string());
                    next.push((child.trim_end_matches('/').to_string(), values));
                }
            }
        }
        frontier = next;
    }
    debug!(found = frontier.len(), "partition prefixes discovered");

    let mut summary = DiscoverySummary::default();
    for (prefix, values) in frontier {
        match add_partition(client, table, values, Some(prefix)) {
            Ok(partition) => summary.added.push(partition),
            Err(GlueError::PartitionAlreadyExists { .. }) => summary.existing += 1,
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}

fn table_error(database: &str, table: &str, err: ClientError) -> GlueError {
    match err {
        ClientError::EntityNotFound(_) => GlueError::TableNotFound {
            database: database.to_string(),
            table: table.to_string(),
        },
        other => GlueError::Client(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LocalGlue;

    fn glue() -> LocalGlue {
        LocalGlue::from_json(
            r#"{
                "tables": [
                    { "database": "db", "name": "tbl", "location": "s3://b/tbl/",
                      "partition_keys": ["year", "month"],
                      "partitions": [{ "values": ["2020", "01"] }] },
                    { "database": "db", "name": "flat" }
                ],
                "storage": [
                    "s3://b/tbl/year=2020/month=01/a.parquet",
                    "s3://b/tbl/year=2020/month=02/b.parquet",
                    "s3://b/tbl/year=2021/month=03/c.parquet",
                    "s3://b/tbl/tmp/x.parquet"
                ]
            }"#,
        )
        .unwrap()
    }

    fn pairs(items: &[(&str, &str)]) -> BTreeMap<String, String> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_partition_values_follow_key_order() {
        let table = get_table(&glue(), "db", "tbl").unwrap();
        let values = partition_values(&table, &pairs(&[("month", "02"), ("year", "2020")])).unwrap();
        assert_eq!(values, vec!["2020", "02"]);
        assert!(partition_values(&table, &pairs(&[("year", "2020")])).is_err());
        assert!(
            partition_values(&table, &pairs(&[("year", "2020"), ("month", "1"), ("day", "1")]))
                .is_err()
        );
    }

    #[test]
    fn test_add_existing_partition_is_warning() {
        let glue = glue();
        let table = get_table(&glue, "db", "tbl").unwrap();
        let err = add_partition(&glue, &table, vec!["2020".into(), "01".into()], None).unwrap_err();
        assert!(matches!(err, GlueError::PartitionAlreadyExists { .. }));
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_add_partition_uses_default_location() {
        let glue = glue();
        let table = get_table(&glue, "db", "tbl").unwrap();
        let partition = add_partition(&glue, &table, vec!["2022".into(), "12".into()], None).unwrap();
        assert_eq!(
            partition.location.as_deref(),
            Some("s3://b/tbl/year=2022/month=12")
        );
        assert_eq!(list_partitions(&glue, "db", "tbl").unwrap().len(), 2);
    }

    #[test]
    fn test_delete_missing_partition() {
        let glue = glue();
        let table = get_table(&glue, "db", "tbl").unwrap();
        let err = delete_partition(&glue, &table, &["9999".into(), "01".into()]).unwrap_err();
        assert!(matches!(err, GlueError::PartitionNotFound { ref values, .. } if values == "year=9999/month=01"));
        assert_eq!(err.exit_code(), 1);
        delete_partition(&glue, &table, &["2020".into(), "01".into()]).unwrap();
    }

    #[test]
    fn test_missing_table() {
        let glue = glue();
        assert!(matches!(
            list_partitions(&glue, "db", "nope"),
            Err(GlueError::TableNotFound { .. })
        ));
        assert!(matches!(
            get_table(&glue, "nope", "tbl"),
            Err(GlueError::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_add_partitions_from_location() {
        let glue = glue();
        let table = get_table(&glue, "db", "tbl").unwrap();
        let summary = add_partitions_from_location(&glue, &table, None).unwrap();
        assert_eq!(summary.existing, 1);
        let added: Vec<_> = summary.added.iter().map(|p| p.values.join("/")).collect();
        assert_eq!(added, vec!["2020/02", "2021/03"]);
        assert_eq!(list_partitions(&glue, "db", "tbl").unwrap().len(), 3);
    }

    #[test]
    fn test_add_partitions_requires_location() {
        let glue = glue();
        let table = get_table(&glue, "db", "flat").unwrap();
        assert!(matches!(
            add_partitions_from_location(&glue, &table, None),
            Err(GlueError::InvalidOption(_))
        ));
    }
}
