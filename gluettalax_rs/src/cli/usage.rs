//! Usage-string grammar.
//!
//! A usage string such as
//!
//! ```text
//! <db> <table> [pattern] [--noheaders] [--location=path]
//! ```
//!
//! declares, left to right, required positionals (bare tokens), optional
//! positionals (`[name]`) and options (`[--flag]` booleans, `[--name=value]`
//! string-valued). Only the first line is parsed, anything after it is
//! free-form description.

use std::collections::BTreeMap;

use crate::error::{GlueError, Result};

/// Kind of a declared option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// `--name=value` or `--name value`
    Value,
    /// `--name`
    Flag,
}

/// Parsed usage string. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsageSpec {
    usage: String,
    required: Vec<String>,
    optional: Vec<String>,
    options: BTreeMap<String, OptionKind>,
}

impl UsageSpec {
    /// Parse the first line of `usage`.
    pub fn parse(usage: &str) -> Result<Self> {
        let line = usage.lines().next().unwrap_or_default().trim();
        let mut spec = UsageSpec {
            usage: line.to_string(),
            ..Default::default()
        };
        for token in line.split_whitespace() {
            spec.push_token(token)?;
        }
        Ok(spec)
    }

    fn push_token(&mut self, token: &str) -> Result<()> {
        let opens = token.starts_with('[');
        let closes = token.ends_with(']');
        if opens != closes {
            return Err(self.malformed(token, "unbalanced brackets"));
        }
        if !opens {
            if token.contains(['[', ']']) {
                return Err(self.malformed(token, "unbalanced brackets"));
            }
            if token.starts_with('-') {
                return Err(self.malformed(token, "options must be wrapped in [...]"));
            }
            let name = self.strip_angles(token)?;
            self.required.push(name);
            return Ok(());
        }

        let inner = &token[1..token.len() - 1];
        if inner.contains(['[', ']']) {
            return Err(self.malformed(token, "nested brackets"));
        }
        if let Some(option) = inner.strip_prefix('-') {
            let option = option.trim_start_matches('-');
            let (name, kind) = match option.split_once('=') {
                Some((name, _)) => (name, OptionKind::Value),
                None => (option, OptionKind::Flag),
            };
            let name = name.trim_end_matches("...");
            if name.is_empty() {
                return Err(self.malformed(token, "empty option name"));
            }
            self.options.insert(name.to_string(), kind);
        } else {
            let name = self.strip_angles(inner.trim_end_matches("..."))?;
            self.optional.push(name);
        }
        Ok(())
    }

    fn strip_angles(&self, token: &str) -> Result<String> {
        let opens = token.starts_with('<');
        let closes = token.ends_with('>');
        if opens != closes {
            return Err(self.malformed(token, "unbalanced angle brackets"));
        }
        let name = if opens {
            &token[1..token.len() - 1]
        } else {
            token
        };
        if name.is_empty() || name.contains(['<', '>']) {
            return Err(self.malformed(token, "empty or malformed name"));
        }
        Ok(name.to_string())
    }

    fn malformed(&self, token: &str, reason: &str) -> GlueError {
        GlueError::InvalidUsageSpec {
            usage: self.usage.clone(),
            reason: format!("{reason} in '{token}'"),
        }
    }

    /// The parsed usage line.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    /// Required plus optional positional slots.
    pub fn positional_count(&self) -> usize {
        self.required.len() + self.optional.len()
    }

    pub fn option_kind(&self, name: &str) -> Option<OptionKind> {
        self.options.get(name).copied()
    }

    pub fn is_flag(&self, name: &str) -> bool {
        self.option_kind(name) == Some(OptionKind::Flag)
    }

    pub fn options(&self) -> impl Iterator<Item = (&str, OptionKind)> {
        self.options.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_crawler_usage() {
        let spec = UsageSpec::parse("<crawler_name> [--async] [--timeout=seconds]").unwrap();
        assert_eq!(spec.required(), ["crawler_name"]);
        assert!(spec.optional().is_empty());
        assert_eq!(spec.option_kind("async"), Some(OptionKind::Flag));
        assert_eq!(spec.option_kind("timeout"), Some(OptionKind::Value));
        assert_eq!(spec.option_kind("other"), None);
    }

    #[test]
    fn test_parse_optional_positionals() {
        let spec = UsageSpec::parse("[<job_name>] [--lines=num] [--noheaders]").unwrap();
        assert!(spec.required().is_empty());
        assert_eq!(spec.optional(), ["job_name"]);
        assert!(spec.is_flag("noheaders"));
        assert!(!spec.is_flag("lines"));
        assert_eq!(spec.positional_count(), 1);
    }

    #[test]
    fn test_parse_repeated_value_option() {
        let spec = UsageSpec::parse("<job_name> [--async] [--param=value...]").unwrap();
        assert_eq!(spec.option_kind("param"), Some(OptionKind::Value));
    }

    #[test]
    fn test_mixed_positionals_keep_order() {
        let spec = UsageSpec::parse("<db> <table> [pattern] [s3_path] [--noheaders]").unwrap();
        assert_eq!(spec.required(), ["db", "table"]);
        assert_eq!(spec.optional(), ["pattern", "s3_path"]);
        assert_eq!(spec.positional_count(), 4);
    }

    #[test]
    fn test_only_first_line_is_parsed() {
        let spec = UsageSpec::parse("<name> [--async]\n\nStart the [crawler and <wait>").unwrap();
        assert_eq!(spec.required(), ["name"]);
        assert_eq!(spec.usage(), "<name> [--async]");
    }

    #[test]
    fn test_empty_usage() {
        let spec = UsageSpec::parse("").unwrap();
        assert_eq!(spec.positional_count(), 0);
        assert_eq!(spec.options().count(), 0);
    }

    #[test]
    fn test_malformed_usage() {
        for usage in [
            "[name",
            "name]",
            "<name",
            "[--]",
            "[]",
            "--bare",
            "[[nested]]",
            "<>",
        ] {
            assert!(
                matches!(UsageSpec::parse(usage), Err(GlueError::InvalidUsageSpec { .. })),
                "expected '{usage}' to be rejected"
            );
        }
    }
}
