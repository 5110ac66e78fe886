use crate::core::FormFields;
use crate::domain::model::FieldKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// 表單欄位的快照，用於輸出與比較
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub item_code: String,
    pub item_name: String,
    pub lot_number: String,
}

impl FormSnapshot {
    pub fn get(&self, field: FieldKey) -> &str {
        match field {
            FieldKey::ItemCode => &self.item_code,
            FieldKey::ItemName => &self.item_name,
            FieldKey::LotNumber => &self.lot_number,
        }
    }
}

/// 記憶體中的表單，對應頁面上的三個輸入欄位
#[derive(Debug, Default)]
pub struct InMemoryForm {
    fields: Mutex<HashMap<FieldKey, String>>,
}

impl InMemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(item_code: &str, item_name: &str, lot_number: &str) -> Self {
        let form = Self::new();
        form.set_value(FieldKey::ItemCode, item_code);
        form.set_value(FieldKey::ItemName, item_name);
        form.set_value(FieldKey::LotNumber, lot_number);
        form
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            item_code: self.value(FieldKey::ItemCode),
            item_name: self.value(FieldKey::ItemName),
            lot_number: self.value(FieldKey::LotNumber),
        }
    }
}

impl FormFields for InMemoryForm {
    fn value(&self, field: FieldKey) -> String {
        let fields = self.fields.lock().unwrap_or_else(|e| e.into_inner());
        fields.get(&field).cloned().unwrap_or_default()
    }

    fn set_value(&self, field: FieldKey, value: &str) {
        let mut fields = self.fields.lock().unwrap_or_else(|e| e.into_inner());
        fields.insert(field, value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_read_as_empty() {
        let form = InMemoryForm::new();
        for field in FieldKey::ALL {
            assert_eq!(form.value(field), "");
        }
    }

    #[test]
    fn test_snapshot_reflects_writes() {
        let form = InMemoryForm::with_values("A100", "", "");
        form.set_value(FieldKey::ItemName, "Widget");

        let snapshot = form.snapshot();
        assert_eq!(snapshot.item_code, "A100");
        assert_eq!(snapshot.get(FieldKey::ItemName), "Widget");
        assert_eq!(snapshot.lot_number, "");
    }
}
