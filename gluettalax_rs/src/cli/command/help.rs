//! Help text generation for CLI commands.

use super::registry::CommandRegistry;
use super::types::Command;

impl Command {
    /// `gluettalax help <command>` text.
    pub fn format_help(&self) -> String {
        let mut help = format!("usage: gluettalax {} {}\n", self.name(), self.usage().usage());
        if !self.aliases().is_empty() {
            help.push_str(&format!("aliases: {}\n", self.aliases().join(", ")));
        }
        if let Some((_, details)) = self.usage_text().split_once('\n') {
            let details = details.trim_matches('\n');
            if !details.is_empty() {
                help.push('\n');
                help.push_str(details);
                help.push('\n');
            }
        } else if let Some(summary) = self.summary() {
            help.push('\n');
            help.push_str(summary);
            help.push('\n');
        }
        help
    }
}

impl CommandRegistry {
    /// Main help text: version header plus one line per command.
    pub fn format_help(&self) -> String {
        let mut help = format!(
            "gluettalax {} - ETL control plane from the command line\n\n",
            env!("CARGO_PKG_VERSION")
        );
        help.push_str("usage: gluettalax <command> [parameters]\n\n");
        help.push_str("COMMANDS:\n");

        let labels: Vec<String> = self
            .list()
            .iter()
            .map(|cmd| {
                if cmd.aliases().is_empty() {
                    cmd.name().to_string()
                } else {
                    format!("{} ({})", cmd.name(), cmd.aliases().join(", "))
                }
            })
            .collect();
        let width = labels.iter().map(String::len).max().unwrap_or(0);
        for (cmd, label) in self.list().iter().zip(&labels) {
            help.push_str(&format!(
                "  {label:<width$}  {}\n",
                cmd.summary().unwrap_or_default()
            ));
        }

        help.push_str("\nRun 'gluettalax help <command>' for the options of a command.\n");
        help
    }
}
