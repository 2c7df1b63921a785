//! Listing output: name filters and aligned columns.

use std::io::{self, Write};

use globset::{Glob, GlobMatcher};

use crate::error::{GlueError, Result};

/// Optional glob filter for list commands. No pattern matches everything.
#[derive(Debug, Clone, Default)]
pub struct NameFilter(Option<GlobMatcher>);

impl NameFilter {
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let pattern = match pattern.map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => return Ok(Self(None)),
        };
        let glob = Glob::new(pattern).map_err(|e| {
            GlueError::invalid_option(format!("invalid glob '{pattern}': {e}"))
        })?;
        Ok(Self(Some(glob.compile_matcher())))
    }

    /// True when any of `names` matches.
    pub fn matches_any<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> bool {
        match &self.0 {
            None => true,
            Some(matcher) => names.into_iter().any(|name| matcher.is_match(name)),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matches_any([name])
    }
}

/// A table of text cells rendered with left-aligned, space-padded columns.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self, headers: bool) -> Vec<usize> {
        let mut widths = vec![0; self.headers.len()];
        if headers {
            for (w, h) in widths.iter_mut().zip(&self.headers) {
                *w = h.len();
            }
        }
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }
        widths
    }

    /// Render the table. The last column is never padded.
    pub fn render(&self, headers: bool) -> String {
        let widths = self.widths(headers);
        let mut out = String::new();
        if headers {
            render_line(&mut out, &widths, &self.headers);
        }
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            render_line(&mut out, &widths, &cells);
        }
        out
    }

    /// Write the rendered table to `out`; a closed pipe ends output quietly.
    pub fn write_to(&self, out: &mut dyn Write, headers: bool) -> Result<()> {
        write_quiet(out, &self.render(headers))
    }
}

fn render_line(out: &mut String, widths: &[usize], cells: &[&str]) {
    let last = cells.len().saturating_sub(1);
    for (i, cell) in cells.iter().enumerate() {
        out.push_str(cell);
        if i < last {
            let pad = widths.get(i).copied().unwrap_or(0);
            let pad = pad.saturating_sub(cell.chars().count());
            out.push_str(&" ".repeat(pad + 2));
        }
    }
    out.push('\n');
}

/// Write `text` and flush, treating a closed reader as success.
pub fn write_quiet(out: &mut dyn Write, text: &str) -> Result<()> {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_filter() {
        let all = NameFilter::new(None).unwrap();
        assert!(all.matches("anything"));
        let blank = NameFilter::new(Some("  ")).unwrap();
        assert!(blank.matches("anything"));

        let filter = NameFilter::new(Some("sales_*")).unwrap();
        assert!(filter.matches("sales_daily"));
        assert!(!filter.matches("orders"));
        assert!(filter.matches_any(["db.orders", "sales_x"]));
    }

    #[test]
    fn test_invalid_glob() {
        assert!(matches!(
            NameFilter::new(Some("a[")),
            Err(GlueError::InvalidOption(_))
        ));
    }

    #[test]
    fn test_render_aligned() {
        let mut table = Table::new(&["NAME", "STATE"]);
        table.push(vec!["a".into(), "READY".into()]);
        table.push(vec!["longer_name".into(), "RUNNING".into()]);
        assert_eq!(
            table.render(true),
            "NAME         STATE\na            READY\nlonger_name  RUNNING\n"
        );
        assert_eq!(table.render(false), "a            READY\nlonger_name  RUNNING\n");
    }

    #[test]
    fn test_broken_pipe_is_silent() {
        let mut table = Table::new(&["NAME"]);
        table.push(vec!["x".into()]);
        assert!(table.write_to(&mut ClosedPipe, true).is_ok());
    }
}
