use crate::config::defaults::{DEFAULT_NOT_FOUND_MESSAGE, DEFAULT_REQUEST_FAILED_MESSAGE};
use crate::core::inflight::InFlightTracker;
use crate::core::{ConfigProvider, FormFields, LookupBackend, Notifier};
use crate::domain::model::{FieldKey, LookupKind, LookupOutcome, LotNamePolicy};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct HandlerOptions {
    pub not_found_message: String,
    pub request_failed_message: String,
    pub discard_stale_responses: bool,
    pub lot_name_policy: LotNamePolicy,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            not_found_message: DEFAULT_NOT_FOUND_MESSAGE.to_string(),
            request_failed_message: DEFAULT_REQUEST_FAILED_MESSAGE.to_string(),
            discard_stale_responses: true,
            lot_name_policy: LotNamePolicy::Unconditional,
        }
    }
}

impl HandlerOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            not_found_message: config.not_found_message().to_string(),
            request_failed_message: config.request_failed_message().to_string(),
            discard_stale_responses: config.discard_stale_responses(),
            lot_name_policy: config.lot_name_policy(),
        }
    }
}

/// 查詢並自動填入表單。
///
/// 讀取觸發欄位、向後端發出一次 GET，依查詢類型把回應寫回其他欄位；
/// 找不到商品時以 `Notifier` 提示一次，不修改任何欄位。
pub struct AutofillHandler<B: LookupBackend, F: FormFields, N: Notifier> {
    backend: B,
    form: F,
    notifier: N,
    options: HandlerOptions,
    in_flight: InFlightTracker,
}

impl<B: LookupBackend, F: FormFields, N: Notifier> AutofillHandler<B, F, N> {
    pub fn new(backend: B, form: F, notifier: N) -> Self {
        Self::with_options(backend, form, notifier, HandlerOptions::default())
    }

    pub fn with_options(backend: B, form: F, notifier: N, options: HandlerOptions) -> Self {
        Self {
            backend,
            form,
            notifier,
            options,
            in_flight: InFlightTracker::new(),
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    /// item_code -> item_name（與 lot_number）
    pub async fn lookup_by_code(&self) -> Result<LookupOutcome> {
        self.lookup(LookupKind::Code).await
    }

    /// item_name -> item_code（與 lot_number）
    pub async fn lookup_by_name(&self) -> Result<LookupOutcome> {
        self.lookup(LookupKind::Name).await
    }

    /// lot_number -> item_code 與 item_name
    pub async fn lookup_by_lot(&self) -> Result<LookupOutcome> {
        self.lookup(LookupKind::Lot).await
    }

    /// 欄位確定輸入（blur / enter）時觸發對應的查詢
    pub async fn on_field_committed(&self, field: FieldKey) -> Result<LookupOutcome> {
        self.lookup(LookupKind::for_trigger(field)).await
    }

    pub async fn lookup(&self, kind: LookupKind) -> Result<LookupOutcome> {
        let value = self.form.value(kind.trigger_field());
        if value.is_empty() {
            tracing::debug!("{} skipped: {} is empty", kind, kind.trigger_field());
            return Ok(LookupOutcome::Skipped);
        }

        let ticket = self.in_flight.begin(kind);
        let result = self.backend.fetch(kind, &value).await;
        let stale = self.options.discard_stale_responses && !self.in_flight.is_current(ticket);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} for '{}' failed: {}", kind, value, e);
                if !stale {
                    self.notifier.alert(&self.options.request_failed_message);
                }
                return Err(e);
            }
        };

        if stale {
            tracing::debug!("{} for '{}' superseded by a newer lookup", kind, value);
            return Ok(LookupOutcome::Superseded);
        }

        match kind.fill_plan(&response, self.options.lot_name_policy) {
            Some(writes) => {
                let mut written = Vec::with_capacity(writes.len());
                for write in writes {
                    tracing::debug!("{}: {} <- '{}'", kind, write.field, write.value);
                    self.form.set_value(write.field, &write.value);
                    written.push(write.field);
                }
                Ok(LookupOutcome::Filled { written })
            }
            None => {
                tracing::info!("{} for '{}': item not found", kind, value);
                self.notifier.alert(&self.options.not_found_message);
                Ok(LookupOutcome::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryForm;
    use crate::domain::model::LookupResponse;
    use crate::utils::error::AutofillError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockBackend {
        responses: Arc<Mutex<Vec<serde_json::Value>>>,
        calls: Arc<Mutex<Vec<(LookupKind, String)>>>,
        fail: bool,
    }

    impl MockBackend {
        fn returning(value: serde_json::Value) -> Self {
            let backend = Self::default();
            backend.responses.lock().unwrap().push(value);
            backend
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(LookupKind, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LookupBackend for MockBackend {
        async fn fetch(&self, kind: LookupKind, value: &str) -> Result<LookupResponse> {
            self.calls.lock().unwrap().push((kind, value.to_string()));
            if self.fail {
                return Err(AutofillError::UnexpectedStatus {
                    url: format!("/api/{}/{}", kind.path_segment(), value),
                    status: 502,
                });
            }
            let body = self.responses.lock().unwrap().pop().unwrap_or(json!({}));
            LookupResponse::from_json(body).map_err(|message| AutofillError::MalformedResponse {
                url: format!("/api/{}/{}", kind.path_segment(), value),
                message,
            })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn handler(
        backend: MockBackend,
        form: InMemoryForm,
    ) -> (
        AutofillHandler<MockBackend, InMemoryForm, RecordingNotifier>,
        RecordingNotifier,
    ) {
        let notifier = RecordingNotifier::default();
        (
            AutofillHandler::new(backend, form, notifier.clone()),
            notifier,
        )
    }

    #[tokio::test]
    async fn test_lookup_by_code_fills_name_and_lot() {
        let backend = MockBackend::returning(json!({"item_name": "Widget", "lot_number": "L9"}));
        let (handler, notifier) = handler(backend.clone(), InMemoryForm::with_values("A100", "", ""));

        let outcome = handler.lookup_by_code().await.unwrap();

        assert_eq!(
            outcome,
            LookupOutcome::Filled {
                written: vec![FieldKey::ItemName, FieldKey::LotNumber]
            }
        );
        let form = handler.form().snapshot();
        assert_eq!(form.item_code, "A100");
        assert_eq!(form.item_name, "Widget");
        assert_eq!(form.lot_number, "L9");
        assert_eq!(backend.calls(), vec![(LookupKind::Code, "A100".to_string())]);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_by_name_not_found_alerts_once() {
        let backend = MockBackend::returning(json!({}));
        let (handler, notifier) = handler(backend, InMemoryForm::with_values("OLD", "Widget", "L1"));

        let outcome = handler.lookup_by_name().await.unwrap();

        assert_eq!(outcome, LookupOutcome::NotFound);
        assert_eq!(notifier.messages(), vec!["商品が見つかりませんでした".to_string()]);
        let form = handler.form().snapshot();
        assert_eq!(form.item_code, "OLD");
        assert_eq!(form.item_name, "Widget");
        assert_eq!(form.lot_number, "L1");
    }

    #[test]
    fn test_empty_trigger_issues_no_request() {
        let backend = MockBackend::default();
        let (handler, notifier) = handler(backend.clone(), InMemoryForm::with_values("A100", "Widget", ""));

        let outcome = tokio_test::block_on(handler.lookup_by_lot()).unwrap();

        assert_eq!(outcome, LookupOutcome::Skipped);
        assert!(backend.calls().is_empty());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_trigger_still_issues_request() {
        let backend = MockBackend::returning(json!({"item_code": "A100"}));
        let (handler, _notifier) = handler(backend.clone(), InMemoryForm::with_values("", "  ", ""));

        handler.lookup_by_name().await.unwrap();

        assert_eq!(backend.calls(), vec![(LookupKind::Name, "  ".to_string())]);
    }

    #[tokio::test]
    async fn test_lookup_by_lot_overwrites_name_when_absent() {
        let backend = MockBackend::returning(json!({"item_code": "A100"}));
        let (handler, _notifier) =
            handler(backend, InMemoryForm::with_values("", "Stale name", "L9"));

        let outcome = handler.lookup_by_lot().await.unwrap();

        assert_eq!(
            outcome,
            LookupOutcome::Filled {
                written: vec![FieldKey::ItemCode, FieldKey::ItemName]
            }
        );
        let form = handler.form().snapshot();
        assert_eq!(form.item_code, "A100");
        assert_eq!(form.item_name, "");
    }

    #[tokio::test]
    async fn test_lookup_by_lot_when_present_policy_keeps_name() {
        let backend = MockBackend::returning(json!({"item_code": "A100"}));
        let options = HandlerOptions {
            lot_name_policy: LotNamePolicy::WhenPresent,
            ..HandlerOptions::default()
        };
        let handler = AutofillHandler::with_options(
            backend,
            InMemoryForm::with_values("", "Kept name", "L9"),
            RecordingNotifier::default(),
            options,
        );

        handler.lookup_by_lot().await.unwrap();

        assert_eq!(handler.form().snapshot().item_name, "Kept name");
    }

    #[tokio::test]
    async fn test_transport_failure_alerts_and_returns_error() {
        let (handler, notifier) = handler(
            MockBackend::failing(),
            InMemoryForm::with_values("A100", "Old", "L1"),
        );

        let err = handler.lookup_by_code().await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(notifier.messages(), vec!["商品情報の取得に失敗しました".to_string()]);
        assert_eq!(handler.form().snapshot().item_name, "Old");
    }

    #[tokio::test]
    async fn test_field_commit_dispatches_matching_lookup() {
        let backend = MockBackend::returning(json!({"item_code": "A100", "lot_number": "L9"}));
        let (handler, _notifier) = handler(backend.clone(), InMemoryForm::with_values("", "Widget", ""));

        handler.on_field_committed(FieldKey::ItemName).await.unwrap();

        assert_eq!(backend.calls(), vec![(LookupKind::Name, "Widget".to_string())]);
        assert_eq!(handler.form().snapshot().lot_number, "L9");
    }

    #[test]
    fn test_options_from_config() {
        use crate::config::TomlConfig;

        let config = TomlConfig::from_toml_str(
            r#"
[backend]
base_url = "http://localhost"

[messages]
not_found = "Item not found"

[behavior]
discard_stale_responses = false
"#,
        )
        .unwrap();

        let options = HandlerOptions::from_config(&config);
        assert_eq!(options.not_found_message, "Item not found");
        assert_eq!(options.request_failed_message, "商品情報の取得に失敗しました");
        assert!(!options.discard_stale_responses);
    }
}
