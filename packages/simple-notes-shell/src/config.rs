/// Configuration for the SimpleNotes shell.
/// Reads config.json from ~/.config/simple-notes/config.json (or platform equivalent).

use serde::{Deserialize, Serialize};
use simple_notes_core::WidgetConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(flatten)]
    pub widget: WidgetConfig,
    /// Directory of the durable note store.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Where `export` writes notes.json.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub app_name: Option<String>,
    pub container: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

impl ShellConfig {
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(app_name) = overrides.app_name {
            self.widget.app_name = app_name;
        }
        if let Some(container) = overrides.container {
            self.widget.container = container;
        }
        if overrides.data_dir.is_some() {
            self.data_dir = overrides.data_dir;
        }
        if overrides.export_dir.is_some() {
            self.export_dir = overrides.export_dir;
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Default config path: ~/.config/simple-notes/config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("simple-notes")
        .join("config.json")
}

/// Default store location: ~/.local/share/simple-notes
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("simple-notes")
}

/// Where the loaded values came from. Logged by the caller once a logger is
/// installed.
#[derive(Debug, PartialEq)]
pub enum ConfigSource {
    File,
    Missing,
    /// Unreadable or unparsable file; defaults were used instead.
    Invalid(String),
}

impl ConfigSource {
    pub fn log(&self, path: &Path) {
        match self {
            ConfigSource::File => {
                log::info!("[simple_notes.shell] Config from {}", path.display())
            }
            ConfigSource::Missing => log::info!(
                "[simple_notes.shell] No config at {}, using defaults",
                path.display()
            ),
            ConfigSource::Invalid(e) => log::warn!(
                "[simple_notes.shell] Failed to load config {}: {}. Using defaults",
                path.display(),
                e
            ),
        }
    }
}

/// Load config from path. Falls back to defaults if the file is missing or broken.
pub fn load_config(path: &Path) -> (ShellConfig, ConfigSource) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => (config, ConfigSource::File),
            Err(e) => (ShellConfig::default(), ConfigSource::Invalid(e.to_string())),
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => (ShellConfig::default(), ConfigSource::Missing),
        Err(e) => (ShellConfig::default(), ConfigSource::Invalid(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let (config, source) = load_config(&tmp.path().join("config.json"));
        assert_eq!(source, ConfigSource::Missing);
        assert_eq!(config.widget, WidgetConfig::default());
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_reads_flat_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{"container":"work","data_dir":"/srv/notes","export_dir":"/tmp/out"}"#,
        )
        .unwrap();

        let (config, source) = load_config(&path);
        assert_eq!(source, ConfigSource::File);
        assert_eq!(config.widget.container, "work");
        assert_eq!(config.widget.app_name, "simple-notes-app");
        assert_eq!(config.data_dir(), PathBuf::from("/srv/notes"));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_broken_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();
        let (config, source) = load_config(&path);
        assert!(config.data_dir.is_none());
        match source {
            ConfigSource::Invalid(msg) => assert!(!msg.is_empty()),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_overrides_win() {
        let mut config = ShellConfig {
            data_dir: Some(PathBuf::from("/from/file")),
            ..ShellConfig::default()
        };
        config.apply(Overrides {
            container: Some("cli".into()),
            data_dir: Some(PathBuf::from("/from/flag")),
            ..Overrides::default()
        });
        assert_eq!(config.widget.container, "cli");
        assert_eq!(config.data_dir(), PathBuf::from("/from/flag"));
        assert!(config.export_dir.is_none());
    }
}
