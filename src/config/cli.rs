use crate::config::defaults::*;
use crate::core::ConfigProvider;
use crate::domain::model::{LookupKind, LotNamePolicy};
use crate::utils::error::{AutofillError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "item-autofill")]
#[command(about = "Look up an item by code, name or lot number and fill the related fields")]
pub struct CliConfig {
    /// Which lookup to run
    #[arg(value_enum)]
    pub kind: LookupKind,

    #[arg(long, default_value = "http://localhost:5000")]
    pub base_url: String,

    #[arg(long, default_value = DEFAULT_API_PREFIX)]
    pub api_prefix: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Extra request header, "Name: value"; may be repeated
    #[arg(long = "header")]
    pub headers: Vec<String>,

    /// TOML configuration file; its settings replace the backend flags
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = "")]
    pub item_code: String,

    #[arg(long, default_value = "")]
    pub item_name: String,

    #[arg(long, default_value = "")]
    pub lot_number: String,

    #[arg(long, default_value = DEFAULT_NOT_FOUND_MESSAGE)]
    pub not_found_message: String,

    #[arg(long, default_value = DEFAULT_REQUEST_FAILED_MESSAGE)]
    pub request_failed_message: String,

    /// Let every response write, even when a newer lookup of the same kind started
    #[arg(long)]
    pub keep_stale_responses: bool,

    #[arg(long, value_enum, default_value_t = LotNamePolicy::Unconditional)]
    pub lot_name_policy: LotNamePolicy,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 解析 "Name: value" 格式的標頭
    pub fn parsed_headers(&self) -> Result<Vec<(String, String)>> {
        self.headers
            .iter()
            .map(|raw| {
                let (name, value) =
                    raw.split_once(':')
                        .ok_or_else(|| AutofillError::InvalidConfigValueError {
                            field: "header".to_string(),
                            value: raw.clone(),
                            reason: "Expected 'Name: value'".to_string(),
                        })?;
                Ok((name.trim().to_string(), value.trim().to_string()))
            })
            .collect()
    }
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn headers(&self) -> Result<Vec<(String, String)>> {
        self.parsed_headers()
    }

    fn not_found_message(&self) -> &str {
        &self.not_found_message
    }

    fn request_failed_message(&self) -> &str {
        &self.request_failed_message
    }

    fn discard_stale_responses(&self) -> bool {
        !self.keep_stale_responses
    }

    fn lot_name_policy(&self) -> LotNamePolicy {
        self.lot_name_policy
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_path_prefix("api_prefix", &self.api_prefix)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validation::validate_headers("header", &self.parsed_headers()?)?;
        validation::validate_non_empty_string("not_found_message", &self.not_found_message)?;
        validation::validate_non_empty_string(
            "request_failed_message",
            &self.request_failed_message,
        )?;
        Ok(())
    }
}
