use crate::core::{ConfigProvider, LookupBackend};
use crate::domain::model::{LookupKind, LookupResponse};
use crate::utils::error::{AutofillError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// 透過 REST 端點查詢商品資料
#[derive(Debug, Clone)]
pub struct HttpLookupBackend {
    client: Client,
    base_url: String,
    api_prefix: String,
}

impl HttpLookupBackend {
    pub fn new(base_url: &str, api_prefix: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: api_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in config.headers()? {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                AutofillError::InvalidConfigValueError {
                    field: "headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let value = HeaderValue::from_str(&value).map_err(|e| {
                AutofillError::InvalidConfigValueError {
                    field: format!("headers.{}", name),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            api_prefix: config.api_prefix().trim_end_matches('/').to_string(),
        })
    }

    /// 欄位值直接接在路徑後面，不做百分比編碼
    pub fn lookup_url(&self, kind: LookupKind, value: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.base_url,
            self.api_prefix,
            kind.path_segment(),
            value
        )
    }
}

#[async_trait]
impl LookupBackend for HttpLookupBackend {
    async fn fetch(&self, kind: LookupKind, value: &str) -> Result<LookupResponse> {
        let raw_url = self.lookup_url(kind, value);
        let url = Url::parse(&raw_url).map_err(|e| AutofillError::InvalidUrl {
            url: raw_url.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!("{} request: GET {}", kind, url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("{} response status: {}", kind, status);

        if status == StatusCode::NOT_FOUND {
            return Ok(LookupResponse::default());
        }

        if !status.is_success() {
            return Err(AutofillError::UnexpectedStatus {
                url: raw_url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| AutofillError::MalformedResponse {
                url: raw_url.clone(),
                message: e.to_string(),
            })?;
        LookupResponse::from_json(value).map_err(|message| AutofillError::MalformedResponse {
            url: raw_url,
            message,
        })
    }
}
