use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// 只指定 API 位址，其他使用預設值
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                token: None,
                timeout_seconds: default_timeout(),
            },
            pagination: PaginationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ClientError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REBS_API_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ClientError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_positive_number("api.timeout_seconds", self.api.timeout_seconds, 1)?;
        validation::validate_positive_number("pagination.page_size", self.pagination.page_size, 1)?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ClientError::InvalidConfigValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Valid levels: {}", valid_levels.join(", ")),
            });
        }

        if let Some(token) = &self.api.token {
            if token.starts_with("${") {
                return Err(ClientError::MissingConfig {
                    field: format!("api.token ({} is not set)", token),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = ClientConfig::from_toml_str(
            r#"
[api]
base_url = "https://rebs.example.com/api/v1"
token = "abc"
timeout_seconds = 5

[pagination]
page_size = 15

[logging]
level = "debug"
json = true
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://rebs.example.com/api/v1");
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.pagination.page_size, 15);
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply() {
        let config = ClientConfig::from_toml_str(
            r#"
[api]
base_url = "http://localhost:8000/api/v1"
"#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("REBS_TEST_TOKEN_SUBST", "from-env");
        let config = ClientConfig::from_toml_str(
            r#"
[api]
base_url = "http://localhost:8000"
token = "${REBS_TEST_TOKEN_SUBST}"
"#,
        )
        .unwrap();
        assert_eq!(config.api.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_unset_env_token_fails_validation() {
        let config = ClientConfig::from_toml_str(
            r#"
[api]
base_url = "http://localhost:8000"
token = "${REBS_TEST_TOKEN_NEVER_SET}"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ClientError::MissingConfig { .. })
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ClientConfig::for_base_url("ftp://nope");
        assert!(config.validate().is_err());

        config.api.base_url = "http://localhost".to_string();
        config.pagination.page_size = 0;
        assert!(config.validate().is_err());

        config.pagination.page_size = 10;
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            ClientConfig::from_toml_str("[api\nbase_url = 1"),
            Err(ClientError::Config { .. })
        ));
    }
}
