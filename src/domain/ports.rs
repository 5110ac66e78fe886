use crate::domain::model::{FieldKey, LookupKind, LookupResponse, LotNamePolicy};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 表單欄位的存取介面，取代直接操作頁面上的全域元素
pub trait FormFields: Send + Sync {
    fn value(&self, field: FieldKey) -> String;
    fn set_value(&self, field: FieldKey, value: &str);
}

/// 阻斷式提示（對應頁面上的 alert）
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

#[async_trait]
pub trait LookupBackend: Send + Sync {
    /// 以原始欄位值查詢。找不到時回傳空的 `LookupResponse`。
    async fn fetch(&self, kind: LookupKind, value: &str) -> Result<LookupResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn api_prefix(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn headers(&self) -> Result<Vec<(String, String)>>;
    fn not_found_message(&self) -> &str;
    fn request_failed_message(&self) -> &str;
    fn discard_stale_responses(&self) -> bool;
    fn lot_name_policy(&self) -> LotNamePolicy;
}

impl<T: FormFields + ?Sized> FormFields for std::sync::Arc<T> {
    fn value(&self, field: FieldKey) -> String {
        (**self).value(field)
    }

    fn set_value(&self, field: FieldKey, value: &str) {
        (**self).set_value(field, value)
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }
}
