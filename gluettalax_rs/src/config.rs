//! Configuration file support for gluettalax.
//!
//! Settings are read from the first existing file among `$GLUETTALAX_CONFIG`,
//! `./.gluettalax/config.toml` and `<config dir>/gluettalax/config.toml`.
//! A missing file means defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::crawler::{DEFAULT_CRAWLER_DELAY, DEFAULT_CRAWLER_TIMEOUT};
use crate::job::DEFAULT_JOB_DELAY;

pub const CONFIG_ENV: &str = "GLUETTALAX_CONFIG";
pub const CATALOG_ENV: &str = "GLUETTALAX_CATALOG";

fn default_crawler_delay() -> u64 {
    DEFAULT_CRAWLER_DELAY.as_secs()
}

fn default_crawler_timeout() -> u64 {
    DEFAULT_CRAWLER_TIMEOUT.as_secs()
}

fn default_job_delay() -> u64 {
    DEFAULT_JOB_DELAY.as_secs()
}

fn default_page_size() -> usize {
    100
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Seconds between crawler status checks
    #[serde(default = "default_crawler_delay")]
    pub crawler_delay_secs: u64,
    /// Seconds to wait for a crawler before giving up
    #[serde(default = "default_crawler_timeout")]
    pub crawler_timeout_secs: u64,
    /// Seconds between job run status checks
    #[serde(default = "default_job_delay")]
    pub job_delay_secs: u64,
    /// Seconds to wait for a job run; unset uses the job's own timeout
    pub job_timeout_secs: Option<u64>,
    /// JSON catalog backing the local control plane
    pub catalog: Option<PathBuf>,
    /// Items per page when listing
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Hide spinners while waiting
    pub quiet: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            crawler_delay_secs: default_crawler_delay(),
            crawler_timeout_secs: default_crawler_timeout(),
            job_delay_secs: default_job_delay(),
            job_timeout_secs: None,
            catalog: None,
            page_size: default_page_size(),
            quiet: false,
        }
    }
}

impl Settings {
    /// Load settings, honouring an explicit path first, then `cwd`, then the
    /// user config directory.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Self {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        let mut candidates = vec![cwd.join(".gluettalax").join("config.toml")];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("gluettalax").join("config.toml"));
        }
        candidates
            .iter()
            .find(|p| p.exists())
            .map(|p| Self::load_from_path(p))
            .unwrap_or_default()
    }

    /// Load settings from a specific path.
    /// Returns defaults if the file doesn't exist or is invalid.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("[gluettalax][warn] Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[gluettalax][warn] Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn crawler_delay(&self) -> Duration {
        Duration::from_secs(self.crawler_delay_secs)
    }

    pub fn crawler_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler_timeout_secs)
    }

    pub fn job_delay(&self) -> Duration {
        Duration::from_secs(self.job_delay_secs)
    }

    pub fn job_timeout(&self) -> Option<Duration> {
        self.job_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.crawler_delay(), Duration::from_secs(10));
        assert_eq!(settings.crawler_timeout(), Duration::from_secs(600));
        assert_eq!(settings.job_delay(), Duration::from_secs(10));
        assert_eq!(settings.job_timeout(), None);
        assert_eq!(settings.page_size, 100);
        assert!(settings.catalog.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().expect("temp dir");
        let settings = Settings::load_from_path(&temp.path().join("nope.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_cwd() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".gluettalax");
        std::fs::create_dir_all(&dir).expect("create .gluettalax");

        let mut file = std::fs::File::create(dir.join("config.toml")).expect("create config");
        writeln!(
            file,
            r#"
crawler_delay_secs = 1
crawler_timeout_secs = 30
job_timeout_secs = 120
catalog = "catalog.json"
quiet = true
"#
        )
        .expect("write config");

        let settings = Settings::load(None, temp.path());
        assert_eq!(settings.crawler_delay(), Duration::from_secs(1));
        assert_eq!(settings.crawler_timeout(), Duration::from_secs(30));
        assert_eq!(settings.job_delay(), Duration::from_secs(10));
        assert_eq!(settings.job_timeout(), Some(Duration::from_secs(120)));
        assert_eq!(settings.catalog, Some(PathBuf::from("catalog.json")));
        assert!(settings.quiet);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "crawler_delay_secs = \"soon\"").expect("write config");
        assert_eq!(Settings::load(Some(&path), temp.path()), Settings::default());
    }
}
