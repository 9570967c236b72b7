use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use shared::domain::DegreeId;

pub const DEFAULT_SETTINGS_FILE: &str = "planner.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub dismiss_after_ms: u64,
    pub download_dir: Option<PathBuf>,
    pub degrees: Vec<String>,
    pub log_level: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            request_timeout_secs: 180,
            dismiss_after_ms: 2000,
            download_dir: None,
            degrees: vec![
                "Computer Science".into(),
                "Software Engineering".into(),
                "Bioinformatics".into(),
            ],
            log_level: "info".into(),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }

    pub fn degree_ids(&self) -> Vec<DegreeId> {
        self.degrees
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(DegreeId::from)
            .collect()
    }
}

/// Defaults, then the settings file, then `APP__*` environment variables.
///
/// An explicit `path` must exist; otherwise `planner.toml` in the working
/// directory is read when present.
pub fn load_settings(path: Option<&Path>) -> Result<ClientSettings, ConfigError> {
    let defaults = ClientSettings::default();
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
    };

    Config::builder()
        .set_default("server_url", defaults.server_url)?
        .set_default("request_timeout_secs", defaults.request_timeout_secs)?
        .set_default("dismiss_after_ms", defaults.dismiss_after_ms)?
        .set_default("degrees", defaults.degrees)?
        .set_default("log_level", defaults.log_level)?
        .add_source(file)
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("degrees"),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let temp_root = env::temp_dir().join(format!("timetable_planner_config_test_{suffix}"));
        fs::create_dir_all(&temp_root).expect("temp root");
        let path = temp_root.join("planner.toml");
        fs::write(
            &path,
            "server_url = \"http://catalog.test:8080\"\ndismiss_after_ms = 500\ndegrees = [\"CS\", \" \"]\n",
        )
        .expect("write settings");

        let settings = load_settings(Some(&path)).expect("load settings");
        assert_eq!(settings.server_url, "http://catalog.test:8080");
        assert_eq!(settings.dismiss_after(), Duration::from_millis(500));
        assert_eq!(settings.request_timeout_secs, 180);
        assert_eq!(settings.degree_ids(), vec![DegreeId::from("CS")]);
        assert!(settings.download_dir.is_none());

        fs::remove_dir_all(temp_root).expect("cleanup");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = env::temp_dir().join("timetable_planner_missing_settings.toml");
        assert!(load_settings(Some(&missing)).is_err());
    }

    #[test]
    fn timeout_is_never_zero() {
        let settings = ClientSettings {
            request_timeout_secs: 0,
            ..ClientSettings::default()
        };
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    }
}
