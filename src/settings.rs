use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::warn;

pub const API_KEY_ENV: &str = "YTGRID_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("no config directory available on this platform")]
    NoConfigDir,
    #[error("failed to write settings to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persisted user settings. Field names follow the plugin `data.json`
/// layout so an existing file can be reused as-is.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Settings {
    /// Configured key, trimmed; blank keys count as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Stores `raw` trimmed; an empty value clears the key.
    pub fn set_api_key(&mut self, raw: &str) {
        let trimmed = raw.trim();
        self.api_key = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        };
    }

    /// Replaces the key when `key` is present and non-blank.
    pub fn with_override(mut self, key: Option<&str>) -> Self {
        if let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) {
            self.api_key = Some(key.to_owned());
        }
        self
    }

    /// Applies the `YTGRID_API_KEY` environment variable.
    pub fn with_env_override(self) -> Self {
        let from_env = std::env::var(API_KEY_ENV).ok();
        self.with_override(from_env.as_deref())
    }
}

pub fn settings_path() -> Result<PathBuf, SettingsError> {
    let proj = ProjectDirs::from("com", "ytgrid", "ytgrid").ok_or(SettingsError::NoConfigDir)?;
    Ok(proj.config_dir().join("settings.json"))
}

pub fn load_or_default() -> Settings {
    match settings_path() {
        Ok(path) => load_from(&path),
        Err(err) => {
            warn!("{err}; using default settings");
            Settings::default()
        }
    }
}

/// Reads settings from `path`, falling back to defaults when the file is
/// missing or unreadable.
pub fn load_from(path: &Path) -> Settings {
    let Ok(bytes) = fs::read(path) else {
        return Settings::default();
    };
    serde_json::from_slice::<Settings>(&bytes).unwrap_or_else(|err| {
        warn!(path = %path.display(), "ignoring malformed settings file: {err}");
        Settings::default()
    })
}

pub fn save(settings: &Settings) -> Result<PathBuf, SettingsError> {
    let path = settings_path()?;
    save_to(&path, settings)?;
    Ok(path)
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let io_err = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let bytes = serde_json::to_vec_pretty(settings)?;
    fs::write(path, bytes).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_api_key_trims_and_clears() {
        let mut settings = Settings::default();
        settings.set_api_key("  abc123 \n");
        assert_eq!(settings.api_key(), Some("abc123"));
        settings.set_api_key("   ");
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.api_key(), None);
    }

    #[test]
    fn blank_stored_key_counts_as_absent() {
        let settings = Settings {
            api_key: Some("  ".into()),
        };
        assert_eq!(settings.api_key(), None);
    }

    #[test]
    fn overrides_only_apply_when_non_blank() {
        let base = Settings {
            api_key: Some("file".into()),
        };
        assert_eq!(base.clone().with_override(None).api_key(), Some("file"));
        assert_eq!(base.clone().with_override(Some(" ")).api_key(), Some("file"));
        assert_eq!(base.with_override(Some(" cli ")).api_key(), Some("cli"));
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.set_api_key("abc");
        save_to(&path, &settings).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"apiKey\": \"abc\""));
        assert_eq!(load_from(&path), settings);
    }

    #[test]
    fn reads_plugin_data_file_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"apiKey":"from-plugin","other":1}"#).unwrap();
        assert_eq!(load_from(&path).api_key(), Some("from-plugin"));
    }

    #[test]
    fn missing_or_malformed_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_from(&dir.path().join("absent.json")), Settings::default());
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        assert_eq!(load_from(&bad), Settings::default());
    }

    #[test]
    fn absent_key_is_not_serialized() {
        let raw = serde_json::to_string(&Settings::default()).unwrap();
        assert_eq!(raw, "{}");
    }
}
