// ⚙️ Pipeline Configuration
// File locations and report notice settings: defaults < JSON file < environment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_INPUT: &str = "HISTORY_QUOTES_INPUT";
pub const ENV_OUTPUT: &str = "HISTORY_QUOTES_OUTPUT";
pub const ENV_EMAIL_FROM: &str = "HISTORY_QUOTES_EMAIL_FROM";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source quotes file (JSON array, one object per line)
    pub input_file_path: PathBuf,

    /// Where the filtered CSV is written
    pub filtered_file_path: PathBuf,

    /// Explicit header row; empty means "derive from the first record"
    pub headers: Vec<String>,

    pub notice: NoticeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// Sender address of the report notice
    pub from: String,

    /// File name the attachment is presented under
    pub attachment_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input_file_path: PathBuf::from("data/history_quotes.json"),
            filtered_file_path: PathBuf::from("var/export/history_quotes.csv"),
            headers: Vec::new(),
            notice: NoticeConfig::default(),
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        NoticeConfig {
            from: "reports@our-company.com".to_string(),
            attachment_name: "history_quotes.csv".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file; missing keys fall back to defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: PipelineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        Ok(config)
    }

    /// Apply `HISTORY_QUOTES_*` environment overrides
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (environment, test maps, ...)
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(input) = non_empty(ENV_INPUT) {
            self.input_file_path = PathBuf::from(input);
        }
        if let Some(output) = non_empty(ENV_OUTPUT) {
            self.filtered_file_path = PathBuf::from(output);
        }
        if let Some(from) = non_empty(ENV_EMAIL_FROM) {
            self.notice.from = from;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_file_path, PathBuf::from("data/history_quotes.json"));
        assert_eq!(config.notice.from, "reports@our-company.com");
        assert_eq!(config.notice.attachment_name, "history_quotes.csv");
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_from_file_partial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"input_file_path": "/srv/quotes.json", "notice": {"from": "desk@example.com"}}"#,
        )
        .unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();

        assert_eq!(config.input_file_path, PathBuf::from("/srv/quotes.json"));
        assert_eq!(config.filtered_file_path, PathBuf::from("var/export/history_quotes.csv"));
        assert_eq!(config.notice.from, "desk@example.com");
        assert_eq!(config.notice.attachment_name, "history_quotes.csv");
    }

    #[test]
    fn test_from_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = PipelineConfig::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_from_file_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = PipelineConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_overrides_skip_blank_values() {
        let vars: HashMap<&str, &str> = [
            (ENV_INPUT, "/tmp/in.json"),
            (ENV_OUTPUT, "   "),
            (ENV_EMAIL_FROM, "ops@example.com"),
        ]
        .into_iter()
        .collect();

        let config = PipelineConfig::default()
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.input_file_path, PathBuf::from("/tmp/in.json"));
        assert_eq!(config.filtered_file_path, PathBuf::from("var/export/history_quotes.csv"));
        assert_eq!(config.notice.from, "ops@example.com");
    }
}
