//! Configuration management for txdesk
//!
//! This module handles loading, validation, and management of
//! txdesk configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Front-end server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8082
}

/// Remote transaction store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `/Transactions` resource hangs off
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Accept self-signed certificates (local development backends)
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            accept_invalid_certs: false,
        }
    }
}

fn default_base_url() -> String {
    "https://localhost:7039/api".to_string()
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Rows per table page
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    /// Page sizes offered in the table footer
    #[serde(default = "default_rows_per_page_options")]
    pub rows_per_page_options: Vec<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            rows_per_page: default_rows_per_page(),
            rows_per_page_options: default_rows_per_page_options(),
        }
    }
}

fn default_rows_per_page() -> usize {
    5
}

fn default_rows_per_page_options() -> Vec<usize> {
    vec![5, 10, 25]
}

/// How the transaction form splits its fields across screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormLayoutKind {
    /// Fixed-size groups shown as tabs
    Tabbed,
    /// Named steps with fixed field lists
    Stepper,
    /// Every field on one screen
    Single,
}

impl Default for FormLayoutKind {
    fn default() -> Self {
        FormLayoutKind::Tabbed
    }
}

impl std::str::FromStr for FormLayoutKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tabbed" | "tabs" => Ok(FormLayoutKind::Tabbed),
            "stepper" | "steps" => Ok(FormLayoutKind::Stepper),
            "single" => Ok(FormLayoutKind::Single),
            _ => Err(format!("Invalid form layout: {}", s)),
        }
    }
}

impl std::fmt::Display for FormLayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormLayoutKind::Tabbed => write!(f, "tabbed"),
            FormLayoutKind::Stepper => write!(f, "stepper"),
            FormLayoutKind::Single => write!(f, "single"),
        }
    }
}

/// Widget kind of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text
    Text,
    /// Numeric input
    Number,
    /// Calendar date picker
    Date,
    /// Enumerated choice
    Choice,
    /// On/off switch
    Toggle,
}

impl Default for FieldKind {
    fn default() -> Self {
        FieldKind::Text
    }
}

impl std::str::FromStr for FieldKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(FieldKind::Text),
            "number" => Ok(FieldKind::Number),
            "date" => Ok(FieldKind::Date),
            "choice" | "select" => Ok(FieldKind::Choice),
            "toggle" | "switch" => Ok(FieldKind::Toggle),
            _ => Err(format!("Invalid field kind: {}", s)),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::Choice => write!(f, "choice"),
            FieldKind::Toggle => write!(f, "toggle"),
        }
    }
}

/// One entry of a configured field descriptor table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Record key (camelCase, as sent to the store)
    pub key: String,
    /// Display label; derived from the key when absent
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: FieldKind,
    /// Choices for `choice` fields
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    /// Hidden on new records, disabled otherwise
    #[serde(default)]
    pub read_only: bool,
}

/// Transaction form settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub layout: FormLayoutKind,
    /// Group size for the tabbed layout
    #[serde(default = "default_fields_per_group")]
    pub fields_per_group: usize,
    /// Status choices used until the store provides its own
    #[serde(default = "default_status_options")]
    pub status_options: Vec<String>,
    /// Replaces the built-in transaction field table when set
    #[serde(default)]
    pub fields: Option<Vec<FieldConfig>>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            layout: FormLayoutKind::Tabbed,
            fields_per_group: default_fields_per_group(),
            status_options: default_status_options(),
            fields: None,
        }
    }
}

fn default_fields_per_group() -> usize {
    8
}

fn default_status_options() -> Vec<String> {
    vec![
        "Pending".to_string(),
        "Completed".to_string(),
        "Failed".to_string(),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Front-end server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote store settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Transaction form settings
    #[serde(default)]
    pub form: FormConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: e.to_string(),
        })?;

        let config = Self::from_yaml(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "Base URL cannot be empty".to_string(),
            });
        }

        if self.pagination.rows_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.rows_per_page".to_string(),
                reason: "Rows per page must be greater than 0".to_string(),
            });
        }

        if self.pagination.rows_per_page_options.iter().any(|&n| n == 0) {
            return Err(ConfigError::InvalidValue {
                field: "pagination.rows_per_page_options".to_string(),
                reason: "Page size options must be greater than 0".to_string(),
            });
        }

        if self.form.fields_per_group == 0 {
            return Err(ConfigError::InvalidValue {
                field: "form.fields_per_group".to_string(),
                reason: "Fields per group must be greater than 0".to_string(),
            });
        }

        if let Some(fields) = &self.form.fields {
            if fields.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "form.fields".to_string(),
                    reason: "Field table cannot be empty; omit it to use the built-in table"
                        .to_string(),
                });
            }
            let mut seen = HashSet::new();
            for field in fields {
                if field.key.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "form.fields.key".to_string(),
                        reason: "Field key cannot be empty".to_string(),
                    });
                }
                if !seen.insert(field.key.as_str()) {
                    return Err(ConfigError::InvalidValue {
                        field: format!("form.fields.{}", field.key),
                        reason: "Duplicate field key".to_string(),
                    });
                }
            }
        }

        let level = self.logging.level.to_lowercase();
        if !["trace", "debug", "info", "warn", "error", "off"].contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Unknown log level: {}", self.logging.level),
            });
        }

        Ok(())
    }

    /// Settings that load fine but are probably a mistake
    pub fn warnings(&self) -> Vec<ConfigError> {
        let mut warnings = Vec::new();

        if !self
            .pagination
            .rows_per_page_options
            .contains(&self.pagination.rows_per_page)
        {
            warnings.push(ConfigError::ValidationError {
                message: format!(
                    "pagination.rows_per_page {} is not one of the offered options {:?}",
                    self.pagination.rows_per_page, self.pagination.rows_per_page_options
                ),
            });
        }

        warnings
    }

    /// Bundled default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the front-end binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigErrorSeverity;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.api.base_url, "https://localhost:7039/api");
        assert_eq!(config.pagination.rows_per_page, 5);
        assert_eq!(config.pagination.rows_per_page_options, vec![5, 10, 25]);
        assert_eq!(config.form.layout, FormLayoutKind::Tabbed);
        assert_eq!(config.form.fields_per_group, 8);
        assert!(config.form.fields.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bundled_template_is_valid() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.pagination.rows_per_page, 5);
        assert_eq!(config.form.layout, FormLayoutKind::Tabbed);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "server:\n  port: 9000\nform:\n  layout: stepper\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.form.layout, FormLayoutKind::Stepper);
        assert_eq!(config.form.fields_per_group, 8);
    }

    #[test]
    fn test_field_table_from_yaml() {
        let yaml = r#"
form:
  fields:
    - key: amount
      kind: number
      required: true
    - key: status
      kind: choice
      options: [Open, Closed]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let fields = config.form.fields.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].kind, FieldKind::Number);
        assert!(fields[0].required);
        assert_eq!(fields[1].options, vec!["Open", "Closed"]);
        assert!(fields[1].label.is_none());
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port")
        );
    }

    #[test]
    fn test_rejects_zero_page_size_and_group_size() {
        assert!(Config::from_yaml("pagination:\n  rows_per_page: 0\n").is_err());
        assert!(Config::from_yaml("form:\n  fields_per_group: 0\n").is_err());
    }

    #[test]
    fn test_rejects_duplicate_field_keys() {
        let yaml = "form:\n  fields:\n    - key: amount\n    - key: amount\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate field key"));
    }

    #[test]
    fn test_rejects_unknown_field_kind() {
        let yaml = "form:\n  fields:\n    - key: amount\n      kind: slider\n";
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::InvalidYaml { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Config::from_yaml("logging:\n  level: loud\n").is_err());
    }

    #[test]
    fn test_page_size_outside_options_is_a_warning() {
        let config = Config::from_yaml("pagination:\n  rows_per_page: 7\n").unwrap();
        let warnings = config.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity(), ConfigErrorSeverity::Warning);
        assert!(warnings[0].to_details().suggestions[0].contains("rows_per_page 7"));

        assert!(Config::default().warnings().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/definitely/not/here/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("switch".parse::<FieldKind>().unwrap(), FieldKind::Toggle);
        assert_eq!("select".parse::<FieldKind>().unwrap(), FieldKind::Choice);
        assert!("slider".parse::<FieldKind>().is_err());
        assert_eq!("steps".parse::<FormLayoutKind>().unwrap(), FormLayoutKind::Stepper);
        assert_eq!(FormLayoutKind::Single.to_string(), "single");
    }

    #[test]
    fn test_bind_address() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8082");
    }
}
