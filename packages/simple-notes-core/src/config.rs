/// Per-instance widget configuration shared by every host.
use serde::{Deserialize, Serialize};

use crate::storage::Namespace;
use crate::NotesError;

pub const DEFAULT_APP_NAME: &str = "simple-notes-app";
pub const DEFAULT_CONTAINER: &str = "notes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Identifies the host element; two widgets on one page need distinct values.
    #[serde(default = "default_container")]
    pub container: String,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            container: default_container(),
        }
    }
}

impl WidgetConfig {
    pub fn namespace(&self) -> Result<Namespace, NotesError> {
        Namespace::new(&self.app_name, &self.container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: WidgetConfig = serde_json::from_str(r#"{"container":"sidebar"}"#).unwrap();
        assert_eq!(config.app_name, DEFAULT_APP_NAME);
        assert_eq!(config.container, "sidebar");
        assert_eq!(config.namespace().unwrap().prefix(), "simple-notes-app.sidebar.");
    }

    #[test]
    fn test_blank_container_rejected() {
        let config = WidgetConfig {
            container: "  ".into(),
            ..WidgetConfig::default()
        };
        assert!(matches!(config.namespace(), Err(NotesError::Validation(_))));
    }
}
