//! help [command]

use super::super::super::parser::ParsedArguments;
use super::super::Session;
use crate::error::Result;

pub fn help(session: &mut Session<'_>, args: &ParsedArguments) -> Result<i32> {
    let registry = session.registry;
    let text = match args.positional(0) {
        Some(name) => registry.lookup(name)?.format_help(),
        None => registry.format_help(),
    };
    session.write(&text)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::super::super::testing::Harness;

    #[test]
    fn test_help_variants() {
        let harness = Harness::new("{}");
        let (code, out) = harness.run(&["help"]);
        assert_eq!(code, 0);
        assert!(out.contains("COMMANDS:"));

        let (code, out) = harness.run(&["--help", "lsp"]);
        assert_eq!(code, 0);
        assert!(out.starts_with("usage: gluettalax list_partitions <db> <table>"));

        let (code, out) = harness.run(&["-h", "no_such_command"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
    }
}
