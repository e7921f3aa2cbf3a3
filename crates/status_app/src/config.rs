use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use status_core::ViewKind;
use status_engine::FetchSettings;
use status_logging::status_info;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILENAME: &str = "recipe_status.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("config names unknown view {0:?}")]
    UnknownView(String),
}

/// Optional settings file. Every field can also be given on the command line,
/// which wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_bytes: Option<u64>,
    pub default_view: Option<String>,
    /// View name to column labels hidden in that view.
    pub disabled_columns: BTreeMap<String, Vec<String>>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `explicit` if given (it must exist), else the default file in the
    /// working directory if present, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
        };

        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        status_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn fetch_settings(&self, url_override: Option<&str>) -> FetchSettings {
        let mut settings = FetchSettings::default();
        if let Some(url) = url_override.or(self.url.as_deref()) {
            settings.url = url.to_string();
        }
        if let Some(secs) = self.connect_timeout_secs {
            settings.connect_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = self.request_timeout_secs {
            settings.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(max_bytes) = self.max_bytes {
            settings.max_bytes = max_bytes;
        }
        settings
    }

    pub fn default_view(&self) -> Result<Option<ViewKind>, ConfigError> {
        self.default_view
            .as_deref()
            .map(|name| {
                name.parse::<ViewKind>()
                    .map_err(|_| ConfigError::UnknownView(name.to_string()))
            })
            .transpose()
    }

    pub fn disabled_columns(&self) -> Result<Vec<(ViewKind, &str)>, ConfigError> {
        let mut disabled = Vec::new();
        for (view, labels) in &self.disabled_columns {
            let kind: ViewKind = view
                .parse()
                .map_err(|_| ConfigError::UnknownView(view.clone()))?;
            disabled.extend(labels.iter().map(|label| (kind, label.as_str())));
        }
        Ok(disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_ron_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ron");
        fs::write(
            &path,
            r#"(
                url: Some("http://localhost:8000/status.json"),
                request_timeout_secs: Some(30),
                default_view: Some("updates"),
                disabled_columns: {"updates": ["Current tag", "New tag"]},
            )"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.default_view().unwrap(), Some(ViewKind::Updates));
        assert_eq!(
            config.disabled_columns().unwrap(),
            vec![
                (ViewKind::Updates, "Current tag"),
                (ViewKind::Updates, "New tag")
            ]
        );
        let settings = config.fetch_settings(None);
        assert_eq!(settings.url, "http://localhost:8000/status.json");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(settings.connect_timeout, None);
    }

    #[test]
    fn cli_url_overrides_config() {
        let config = AppConfig {
            url: Some("http://config".to_string()),
            ..AppConfig::default()
        };

        assert_eq!(config.fetch_settings(Some("http://cli")).url, "http://cli");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = AppConfig::load(Some(&temp.path().join("absent.ron"))).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn unknown_view_is_rejected() {
        let config = AppConfig {
            default_view: Some("everything".to_string()),
            ..AppConfig::default()
        };

        assert!(matches!(
            config.default_view(),
            Err(ConfigError::UnknownView(name)) if name == "everything"
        ));
    }

    #[test]
    fn malformed_config_reports_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.ron");
        fs::write(&path, "(url: 42)").unwrap();

        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
