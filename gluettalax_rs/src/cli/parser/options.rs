//! Parsed option map and argument vector.

use std::collections::BTreeMap;

/// Prefix under which boolean flags are stored.
pub const FLAG_PREFIX: &str = "op_";

/// Value of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag(bool),
    Text(String),
}

/// Option map. Flags live under `op_<name>`, string options under `<name>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options(BTreeMap<String, OptionValue>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: default for a boolean flag.
    pub fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.set_flag(name, value);
        self
    }

    /// Builder: default for a string option.
    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_text(name, value);
        self
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.0
            .insert(format!("{FLAG_PREFIX}{name}"), OptionValue::Flag(value));
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.0
            .insert(name.to_string(), OptionValue::Text(value.into()));
    }

    /// Value of flag `name`; unset flags are `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.0.get(&format!("{FLAG_PREFIX}{name}")),
            Some(OptionValue::Flag(true))
        )
    }

    /// Value of string option `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(OptionValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Raw lookup by stored key (`op_async`, `timeout`, ...).
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    /// All string options, in key order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().filter_map(|(k, v)| match v {
            OptionValue::Text(text) => Some((k.as_str(), text.as_str())),
            OptionValue::Flag(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert_raw(&mut self, key: String, value: OptionValue) {
        self.0.insert(key, value);
    }
}

/// Result of parsing argv against a usage spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    /// Required then optional positionals; missing optionals are `None`.
    pub positionals: Vec<Option<String>>,
    pub options: Options,
}

impl ParsedArguments {
    /// Positional at `index`, `None` when absent or out of range.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).and_then(|p| p.as_deref())
    }

    /// The option map alone, for specs without positionals.
    pub fn into_options(self) -> Options {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_and_texts_are_distinct_keys() {
        let options = Options::new()
            .with_flag("async", true)
            .with_text("timeout", "30");
        assert!(options.flag("async"));
        assert!(!options.flag("timeout"));
        assert_eq!(options.text("timeout"), Some("30"));
        assert_eq!(options.text("async"), None);
        assert_eq!(options.get("op_async"), Some(&OptionValue::Flag(true)));
        assert_eq!(options.texts().collect::<Vec<_>>(), vec![("timeout", "30")]);
    }

    #[test]
    fn test_positional_lookup() {
        let parsed = ParsedArguments {
            positionals: vec![Some("db".into()), None],
            options: Options::new(),
        };
        assert_eq!(parsed.positional(0), Some("db"));
        assert_eq!(parsed.positional(1), None);
        assert_eq!(parsed.positional(5), None);
    }
}
