//! list_tables

use super::super::super::parser::ParsedArguments;
use super::super::Session;
use super::print_table;
use crate::error::Result;
use crate::output::{NameFilter, Table};
use crate::partition;

pub fn list(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    let filter = NameFilter::new(args.positional(0))?;
    let mut table = Table::new(&["DATABASE", "TABLE", "PARTITION KEYS", "LOCATION"]);
    for info in partition::list_tables(session.client)? {
        let qualified = format!("{}.{}", info.database, info.name);
        if !filter.matches_any([info.name.as_str(), qualified.as_str()]) {
            continue;
        }
        let keys = if info.partition_keys.is_empty() {
            "-".to_string()
        } else {
            info.partition_keys.join(",")
        };
        table.push(vec![
            info.database,
            info.name,
            keys,
            info.location.unwrap_or_else(|| "-".to_string()),
        ]);
    }
    print_table(session, &table, args)
}

#[cfg(test)]
mod tests {
    use super::super::super::testing::Harness;

    #[test]
    fn test_list_tables_matches_qualified_names() {
        let harness = Harness::new(
            r#"{ "tables": [
                { "database": "sales", "name": "orders", "partition_keys": ["year"] },
                { "database": "hr", "name": "people" }
            ] }"#,
        );
        let (code, out) = harness.run(&["lst", "sales.*", "--noheaders"]);
        assert_eq!(code, 0);
        assert_eq!(out.trim_end(), "sales  orders  year  -");

        let (_, out) = harness.run(&["list_tables", "people"]);
        assert_eq!(out.lines().count(), 2);
    }
}
