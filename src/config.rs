//! Client configuration.
//!
//! Settings come from `quality-report.toml` in the working directory (or an
//! explicit `--config` path) merged with CLI flags.
//! Defaults:
//! - `base_url`: `http://localhost:5033/api`
//! - `poll.max_attempts`: 30
//! - `poll.interval_ms`: 2000
//! - `simulated.enabled`: false
//! - `simulated.delay_ms`: 1500
//! - `locale`: `en`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::client::DEFAULT_BASE_URL;
use crate::labels::Locale;
use crate::poller::{PollPolicy, DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS};
use crate::simulated::DEFAULT_REPORT_DELAY;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "quality-report.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Polling section under `[poll]`.
pub struct PollCfg {
    pub max_attempts: Option<u32>,
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Simulated backend section under `[simulated]`.
pub struct SimulatedCfg {
    pub enabled: Option<bool>,
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root of `quality-report.toml`.
pub struct FileConfig {
    pub base_url: Option<String>,
    pub locale: Option<Locale>,
    pub poll: Option<PollCfg>,
    pub simulated: Option<SimulatedCfg>,
}

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub max_attempts: Option<u32>,
    pub interval_ms: Option<u64>,
    pub simulated: Option<bool>,
    pub locale: Option<Locale>,
}

#[derive(Debug, Clone, PartialEq)]
/// Fully-resolved settings after applying precedence.
pub struct ClientConfig {
    pub base_url: String,
    pub max_attempts: u32,
    pub interval: Duration,
    pub simulated: bool,
    pub simulated_delay: Duration,
    pub locale: Locale,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
            simulated: false,
            simulated_delay: DEFAULT_REPORT_DELAY,
            locale: Locale::default(),
        }
    }
}

impl ClientConfig {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(self.max_attempts, self.interval)
    }
}

/// Config file to use: the explicit path if given, else `quality-report.toml` in `dir` when present.
pub fn discover(dir: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn resolve(file: Option<&FileConfig>, cli: &Overrides) -> Result<ClientConfig, ConfigError> {
    let defaults = ClientConfig::default();
    let file = file.cloned().unwrap_or_default();
    let poll = file.poll.unwrap_or_default();
    let sim = file.simulated.unwrap_or_default();

    let base_url = cli
        .base_url
        .clone()
        .or(file.base_url)
        .unwrap_or(defaults.base_url);
    if base_url.trim().is_empty() {
        return Err(ConfigError::Invalid {
            key: "base_url",
            reason: "must not be empty".to_string(),
        });
    }

    let max_attempts = cli
        .max_attempts
        .or(poll.max_attempts)
        .unwrap_or(defaults.max_attempts);
    if max_attempts == 0 {
        return Err(ConfigError::Invalid {
            key: "poll.max_attempts",
            reason: "must be at least 1".to_string(),
        });
    }

    let interval = cli
        .interval_ms
        .or(poll.interval_ms)
        .map(Duration::from_millis)
        .unwrap_or(defaults.interval);

    Ok(ClientConfig {
        base_url,
        max_attempts,
        interval,
        simulated: cli.simulated.or(sim.enabled).unwrap_or(defaults.simulated),
        simulated_delay: sim
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.simulated_delay),
        locale: cli.locale.or(file.locale).unwrap_or(defaults.locale),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_without_file_or_flags() {
        let cfg = resolve(None, &Overrides::default()).unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.poll_policy(), PollPolicy::default());
    }

    #[test]
    fn file_values_override_defaults_and_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
base_url = "http://analysis.internal/api"
locale = "tr"

[poll]
max_attempts = 5
interval_ms = 250

[simulated]
enabled = true
delay_ms = 10
"#,
        )
        .unwrap();

        let found = discover(dir.path(), None).unwrap();
        let file = load_config(&found).unwrap();
        let cfg = resolve(
            Some(&file),
            &Overrides {
                max_attempts: Some(7),
                simulated: Some(false),
                ..Overrides::default()
            },
        )
        .unwrap();

        assert_eq!(cfg.base_url, "http://analysis.internal/api");
        assert_eq!(cfg.max_attempts, 7);
        assert_eq!(cfg.interval, Duration::from_millis(250));
        assert!(!cfg.simulated);
        assert_eq!(cfg.simulated_delay, Duration::from_millis(10));
        assert_eq!(cfg.locale, Locale::Tr);
    }

    #[test]
    fn missing_file_is_not_discovered() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), None).is_none());
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let err = resolve(
            None,
            &Overrides {
                max_attempts: Some(0),
                ..Overrides::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "poll.max_attempts", .. }));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "base_url = [").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
