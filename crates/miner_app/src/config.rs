use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use miner_engine::{FetchSettings, MinerSettings, DEFAULT_API_BASE, DEFAULT_STATE_FILENAME};
use miner_logging::{LogDestination, DEFAULT_LOG_FILE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "miner.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Runtime configuration. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Site checkout: stories, index, state file and the git working tree.
    pub repo_dir: PathBuf,
    pub api_base: String,
    pub state_filename: String,
    pub index_filename: String,
    pub per_page: u32,
    pub page_delay_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    /// Cursor for a repository that has no state file yet.
    pub initial_story_num: u64,
    /// `false` logs the publish message instead of committing and pushing.
    pub publish: bool,
    pub log_destination: LogTarget,
    pub log_file: PathBuf,
}

impl Default for MinerConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        let miner = MinerSettings::default_with_output(PathBuf::from("."));
        Self {
            repo_dir: miner.output_dir,
            api_base: DEFAULT_API_BASE.to_string(),
            state_filename: DEFAULT_STATE_FILENAME.to_string(),
            index_filename: miner.index_filename,
            per_page: miner.per_page,
            page_delay_ms: miner.page_delay.as_millis() as u64,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_response_bytes: fetch.max_bytes,
            initial_story_num: miner.first_story_num,
            publish: true,
            log_destination: LogTarget::Terminal,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl MinerConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            api_base: self.api_base.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn miner_settings(&self) -> MinerSettings {
        MinerSettings {
            output_dir: self.repo_dir.clone(),
            state_filename: self.state_filename.clone(),
            index_filename: self.index_filename.clone(),
            per_page: self.per_page,
            page_delay: Duration::from_millis(self.page_delay_ms),
            first_story_num: self.initial_story_num,
        }
    }
}

/// The config file to use: `explicit` if given, else `./miner.ron` when it
/// exists. `None` means defaults.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            fallback.is_file().then(|| fallback.to_path_buf())
        }
    }
}

/// Reads `path`, which must exist, or returns the defaults for `None`.
pub fn load_config(path: Option<&Path>) -> Result<MinerConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(MinerConfig::default());
    };
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("site.ron");
        fs::write(
            &path,
            r#"(
                repo_dir: "/srv/news",
                per_page: 50,
                publish: false,
                log_destination: Both,
            )"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.repo_dir, PathBuf::from("/srv/news"));
        assert_eq!(config.per_page, 50);
        assert!(!config.publish);
        assert_eq!(config.log_destination, LogTarget::Both);
        assert_eq!(config.state_filename, "fr_state.json");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn explicit_path_is_used_even_when_missing() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("absent.ron");
        assert_eq!(config_path(Some(explicit.as_path())), Some(explicit.clone()));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(load_config(None).unwrap(), MinerConfig::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config(Some(temp.path().join("absent.ron").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.ron");
        fs::write(&path, "(per_page: \"many\")").unwrap();
        assert!(matches!(
            load_config(Some(path.as_path())).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn settings_carry_config_values() {
        let config = MinerConfig {
            repo_dir: PathBuf::from("site"),
            page_delay_ms: 300,
            request_timeout_secs: 5,
            initial_story_num: 547,
            ..MinerConfig::default()
        };

        let miner = config.miner_settings();
        assert_eq!(miner.output_dir, PathBuf::from("site"));
        assert_eq!(miner.page_delay, Duration::from_millis(300));
        assert_eq!(miner.first_story_num, 547);
        assert_eq!(miner.per_page, 100);

        let fetch = config.fetch_settings();
        assert_eq!(fetch.request_timeout, Duration::from_secs(5));
        assert_eq!(fetch.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn defaults_round_trip_through_ron() {
        let text = ron::ser::to_string_pretty(&MinerConfig::default(), ron::ser::PrettyConfig::new())
            .unwrap();
        let parsed: MinerConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, MinerConfig::default());
    }
}
