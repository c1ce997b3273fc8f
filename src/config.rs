//! Pipeline settings, loadable from a JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::clean::CleanerConfig;
use crate::detect::DEFAULT_TOP_N;

/// Environment variable naming a settings file for the viewer.
pub const CONFIG_ENV_VAR: &str = "RUSTY_OUTLIER_CONFIG";

/// Everything needed to run clean → score → rank.
///
/// ```json
/// { "dimension_name": "cpu", "drop_incomplete": true, "top_n": 5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub cleaner: CleanerConfig,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Settings {
    pub fn new(dimension_name: impl Into<String>) -> Self {
        Settings {
            cleaner: CleanerConfig::new(dimension_name),
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))
    }

    /// Settings from the file named by [`CONFIG_ENV_VAR`], or `fallback`
    /// when the variable is unset.
    pub fn from_env_or(fallback: Settings) -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_json_file(Path::new(&path)),
            None => Ok(fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_fields() {
        let settings: Settings = serde_json::from_str(r#"{"dimension_name": "mem"}"#).unwrap();
        assert_eq!(settings, Settings::new("mem"));
        assert_eq!(settings.top_n, 3);
        assert_eq!(settings.cleaner.separator_tag, "clustertag");
        assert!(!settings.cleaner.drop_incomplete);
    }

    #[test]
    fn test_dimension_name_required() {
        assert!(serde_json::from_str::<Settings>(r#"{"top_n": 5}"#).is_err());
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!("rusty_outlier_settings_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"dimension_name": "cpu", "drop_incomplete": true, "separator_tag": "pool", "top_n": 7}"#,
        )
        .unwrap();

        let settings = Settings::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.cleaner.dimension_name, "cpu");
        assert!(settings.cleaner.drop_incomplete);
        assert_eq!(settings.cleaner.separator_tag, "pool");
        assert_eq!(settings.top_n, 7);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = Settings::from_json_file(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(err.to_string().contains("reading settings file"));
    }
}
