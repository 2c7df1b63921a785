//! Process entry point: load settings, open the catalog, dispatch.

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use super::command::CommandRegistry;
use super::dispatch::{Session, dispatch, report};
use crate::client::LocalGlue;
use crate::config::{CATALOG_ENV, CONFIG_ENV, Settings};
use crate::poller::SystemClock;
use crate::progress;

/// Run the CLI with `args` (command token first). Returns the exit code.
pub fn run(args: &[String]) -> i32 {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let explicit = env::var_os(CONFIG_ENV).map(PathBuf::from);
    let settings = Settings::load(explicit.as_deref(), &cwd);
    debug!(?settings, "settings loaded");

    let registry = match CommandRegistry::builtin() {
        Ok(registry) => registry,
        Err(e) => return report(&e),
    };
    let glue = match open_catalog(&settings) {
        Ok(glue) => glue,
        Err(e) => {
            progress::error(&format!("{e:#}"));
            return 1;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut session = Session {
        registry: &registry,
        client: &glue,
        clock: &SystemClock,
        settings: &settings,
        out: &mut out,
        show_progress: !settings.quiet && console::Term::stderr().is_term(),
    };
    dispatch(&mut session, args)
}

/// `$GLUETTALAX_CATALOG`, else the configured catalog, else an empty one.
fn open_catalog(settings: &Settings) -> anyhow::Result<LocalGlue> {
    let path = env::var_os(CATALOG_ENV)
        .map(PathBuf::from)
        .or_else(|| settings.catalog.clone());
    let glue = match path {
        Some(path) => LocalGlue::from_path(&path)
            .with_context(|| format!("failed to open catalog {}", path.display()))?,
        None => {
            debug!("no catalog configured, starting empty");
            LocalGlue::empty()
        }
    };
    Ok(glue.with_page_size(settings.page_size))
}
