use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use tracing::warn;

/// Names of the dataset columns the pipeline computes on.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnConfig {
    pub locality: String,
    pub year: String,
    pub price: String,
    pub demand: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            locality: "final location".into(),
            year: "year".into(),
            price: "flat - weighted average rate".into(),
            demand: "total_sales - igr".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub model: String,
    pub api_base: String,
    /// Environment variable holding the API key. Generation is disabled when unset.
    pub api_key_env: String,
    pub timeout_secs: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-5.1-mini".into(),
            api_base: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            timeout_secs: None,
        }
    }
}

impl GeneratorConfig {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub dataset_path: String,
    pub columns: ColumnConfig,
    pub generator: GeneratorConfig,
    /// Allowed browser origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".into(),
            dataset_path: "data/sample_data.csv".into(),
            columns: ColumnConfig::default(),
            generator: GeneratorConfig::default(),
            cors_origins: Vec::new(),
        }
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: &str) -> Result<AppConfig, ConfigError> {
    match load_config(path) {
        Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            warn!("Config file {} not found, using defaults", path);
            Ok(AppConfig::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "bind_addr": "0.0.0.0:9000", "columns": {{ "price": "rate" }} }}"#
        )
        .unwrap();

        let cfg = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.columns.price, "rate");
        assert_eq!(cfg.columns.locality, "final location");
        assert_eq!(cfg.generator.model, "gpt-5.1-mini");
        assert!(cfg.cors_origins.is_empty());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let cfg = load_config_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.dataset_path, "data/sample_data.csv");
    }

    #[test]
    fn broken_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_config_or_default(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn blank_api_key_counts_as_absent() {
        let cfg = GeneratorConfig {
            api_key_env: "LOCALITY_TRENDS_TEST_UNSET_KEY".into(),
            ..GeneratorConfig::default()
        };
        assert_eq!(cfg.api_key(), None);
    }
}
