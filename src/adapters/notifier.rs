use crate::core::Notifier;

/// 將提示訊息輸出到 stderr
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        tracing::debug!("alert shown: {}", message);
        eprintln!("⚠️  {}", message);
    }
}
