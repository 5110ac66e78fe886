use crate::config::defaults::*;
use crate::core::ConfigProvider;
use crate::domain::model::LotNamePolicy;
use crate::utils::error::{AutofillError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_prefix: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesConfig {
    pub not_found: Option<String>,
    pub request_failed: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehaviorConfig {
    pub discard_stale_responses: Option<bool>,
    pub lot_name_policy: Option<LotNamePolicy>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AutofillError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AutofillError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LOOKUP_BASE_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AutofillError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("backend.base_url", &self.backend.base_url)?;
        validation::validate_path_prefix("backend.api_prefix", self.api_prefix())?;
        validation::validate_positive_number("backend.timeout_seconds", self.timeout_seconds(), 1)?;
        validation::validate_headers("backend.headers", &self.headers()?)?;

        if let Some(message) = &self.messages.not_found {
            validation::validate_non_empty_string("messages.not_found", message)?;
        }
        if let Some(message) = &self.messages.request_failed {
            validation::validate_non_empty_string("messages.request_failed", message)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.backend.base_url
    }

    fn api_prefix(&self) -> &str {
        self.backend.api_prefix.as_deref().unwrap_or(DEFAULT_API_PREFIX)
    }

    fn timeout_seconds(&self) -> u64 {
        self.backend.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn headers(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .backend
            .headers
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn not_found_message(&self) -> &str {
        self.messages.not_found.as_deref().unwrap_or(DEFAULT_NOT_FOUND_MESSAGE)
    }

    fn request_failed_message(&self) -> &str {
        self.messages
            .request_failed
            .as_deref()
            .unwrap_or(DEFAULT_REQUEST_FAILED_MESSAGE)
    }

    fn discard_stale_responses(&self) -> bool {
        self.behavior.discard_stale_responses.unwrap_or(true)
    }

    fn lot_name_policy(&self) -> LotNamePolicy {
        self.behavior.lot_name_policy.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
