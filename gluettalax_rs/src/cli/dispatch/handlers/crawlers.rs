//! list_crawlers, run_crawler

use super::super::super::parser::ParsedArguments;
use super::super::Session;
use super::{print_table, required, timestamp};
use crate::crawler;
use crate::error::Result;
use crate::output::{NameFilter, Table};
use crate::progress::format_duration;

pub fn list(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    let filter = NameFilter::new(args.positional(0))?;
    let mut table = Table::new(&["NAME", "STATE", "DATABASE", "LAST CRAWL", "UPDATED"]);
    for info in crawler::list_crawlers(session.client)? {
        if !filter.matches(&info.name) {
            continue;
        }
        table.push(vec![
            info.name,
            info.state.to_string(),
            info.database.unwrap_or_else(|| "-".to_string()),
            info.last_crawl_status.unwrap_or_else(|| "-".to_string()),
            timestamp(info.last_updated),
        ]);
    }
    print_table(session, &table, args)
}

pub fn run(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    let name = required(args, 0, "crawler_name")?;
    let config = session.crawler_poll(&args.options)?;
    let spinner = if config.run_async {
        None
    } else {
        Some(session.spinner(&format!("Waiting for crawler {name}")))
    };

    let started = session.clock.now();
    let result = crawler::run_crawler(
        session.client,
        session.clock,
        name,
        args.options.flag("rerun"),
        config,
    );
    if let Some(spinner) = spinner {
        match &result {
            Ok(()) => {
                let waited = session.clock.now().saturating_duration_since(started);
                spinner.finish_success(&format!(
                    "Crawler {name} is ready ({})",
                    format_duration(waited)
                ));
            }
            Err(_) => spinner.finish_clear(),
        }
    }
    result.map(|()| 0)
}

#[cfg(test)]
mod tests {
    use super::super::super::testing::Harness;

    const CATALOG: &str = r#"{ "crawlers": [
        { "name": "sales_daily", "database": "sales", "crawl_polls": 2 },
        { "name": "orders", "state": "RUNNING", "crawl_polls": 1 },
        { "name": "endless", "crawl_polls": 1000 }
    ] }"#;

    #[test]
    fn test_list_with_pattern() {
        let harness = Harness::new(CATALOG);
        let (code, out) = harness.run(&["lsc", "sales_*"]);
        assert_eq!(code, 0);
        assert!(out.starts_with("NAME"));
        assert!(out.contains("sales_daily"));
        assert!(!out.contains("orders"));

        let (_, out) = harness.run(&["list_crawlers", "--noheaders"]);
        assert_eq!(out.lines().count(), 3);
        assert!(!out.contains("NAME"));
    }

    #[test]
    fn test_run_async_does_not_poll() {
        let harness = Harness::new(CATALOG);
        let (code, _) = harness.run(&["runc", "sales_daily", "--async"]);
        assert_eq!(code, 0);
        assert_eq!(harness.clock.sleeps(), 0);
    }

    #[test]
    fn test_run_waits_until_ready() {
        let harness = Harness::new(CATALOG);
        let (code, _) = harness.run(&["run_crawler", "sales_daily"]);
        assert_eq!(code, 0);
        assert!(harness.clock.sleeps() > 0);
    }

    #[test]
    fn test_run_timeout_and_missing() {
        let harness = Harness::new(CATALOG);
        assert_eq!(harness.run(&["runc", "endless", "--timeout=30"]).0, 1);
        assert_eq!(harness.run(&["runc", "nope"]).0, 1);
    }
}
