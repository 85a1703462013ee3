use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{NewsError, Result, DEFAULT_GEMINI_MODEL, DEFAULT_STORAGE_KEY};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the persisted article collection
    pub data_dir: PathBuf,

    /// Key the collection is stored under
    pub storage_key: String,

    /// Byline used when `--author` is omitted
    pub default_author: Option<String>,

    /// Default editor command
    pub editor_command: Option<String>,

    /// Gemini model used for draft generation
    pub gemini_model: String,

    /// API key for draft generation; environment variables are used when unset
    pub gemini_api_key: Option<String>,

    /// Upper bound on a single generation request, in seconds
    pub generation_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".newsdesk"));

        Self {
            data_dir,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_author: None,
            editor_command: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_key: None,
            generation_timeout_secs: 60,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "newsdesk", "newsdesk")
}

impl Config {
    /// Where the configuration lives when `--config` is not given
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from(".newsdesk").join("config.json"))
    }

    /// Reads the configuration at `path`, or returns defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw).map_err(|e| NewsError::ConfigError {
            message: format!("Invalid config file {}: {}", path.display(), e),
        })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Writes the configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|_| NewsError::DirectoryError {
                    path: parent.to_path_buf(),
                })?;
            }
        }

        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Applies a `key=value` assignment from the `config --set` command
    pub fn set_value(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .ok_or_else(|| NewsError::ConfigError {
                message: format!("Expected key=value, got '{}'", assignment),
            })?;

        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

        match key {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "storage_key" if !value.is_empty() => self.storage_key = value.to_string(),
            "default_author" => self.default_author = optional(value),
            "editor_command" => self.editor_command = optional(value),
            "gemini_model" if !value.is_empty() => self.gemini_model = value.to_string(),
            "gemini_api_key" => self.gemini_api_key = optional(value),
            "generation_timeout_secs" => {
                self.generation_timeout_secs =
                    value.parse().map_err(|_| NewsError::ConfigError {
                        message: format!("generation_timeout_secs must be a number, got '{}'", value),
                    })?
            }
            _ => {
                return Err(NewsError::ConfigError {
                    message: format!("Unknown or empty setting '{}'", key),
                })
            }
        }

        Ok(())
    }

    /// The configured API key, then `GEMINI_API_KEY`, then `API_KEY`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.gemini_api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs.max(1))
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -W -t".to_string()
        } else {
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            warn!("No editor found on PATH, defaulting to nano");
            "nano".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage_key, "crypto-articles");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("config.json");

        let mut config = Config::default();
        config.default_author = Some("Desk".to_string());
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"storage_key": "drafts"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage_key, "drafts");
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(NewsError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("default_author = Jane Doe").unwrap();
        config.set_value("generation_timeout_secs=15").unwrap();
        config.set_value("gemini_api_key=").unwrap();

        assert_eq!(config.default_author.as_deref(), Some("Jane Doe"));
        assert_eq!(config.generation_timeout(), Duration::from_secs(15));
        assert_eq!(config.gemini_api_key, None);

        assert!(config.set_value("no_equals_sign").is_err());
        assert!(config.set_value("colour=blue").is_err());
        assert!(config.set_value("storage_key=").is_err());
        assert!(config.set_value("generation_timeout_secs=soon").is_err());
    }

    #[test]
    fn test_configured_editor_wins() {
        let config = Config {
            editor_command: Some("code --wait".to_string()),
            ..Config::default()
        };
        assert_eq!(config.get_editor_command(), "code --wait");
    }
}
