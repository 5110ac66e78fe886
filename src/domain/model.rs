use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 表單上的三個欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    ItemCode,
    ItemName,
    LotNumber,
}

impl FieldKey {
    pub const ALL: [FieldKey; 3] = [FieldKey::ItemCode, FieldKey::ItemName, FieldKey::LotNumber];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::ItemCode => "item_code",
            FieldKey::ItemName => "item_name",
            FieldKey::LotNumber => "lot_number",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    /// item_code -> item_name (+ lot_number)
    Code,
    /// item_name -> item_code (+ lot_number)
    Name,
    /// lot_number -> item_code + item_name
    Lot,
}

impl LookupKind {
    pub const ALL: [LookupKind; 3] = [LookupKind::Code, LookupKind::Name, LookupKind::Lot];

    pub fn trigger_field(&self) -> FieldKey {
        match self {
            LookupKind::Code => FieldKey::ItemCode,
            LookupKind::Name => FieldKey::ItemName,
            LookupKind::Lot => FieldKey::LotNumber,
        }
    }

    pub fn for_trigger(field: FieldKey) -> Self {
        match field {
            FieldKey::ItemCode => LookupKind::Code,
            FieldKey::ItemName => LookupKind::Name,
            FieldKey::LotNumber => LookupKind::Lot,
        }
    }

    /// 後端路徑片段：/api/{segment}/{value}
    pub fn path_segment(&self) -> &'static str {
        match self {
            LookupKind::Code => "item",
            LookupKind::Name => "code",
            LookupKind::Lot => "lot",
        }
    }

    /// 判斷「找到 / 找不到」所依據的回應欄位
    pub fn primary_key(&self) -> FieldKey {
        match self {
            LookupKind::Code => FieldKey::ItemName,
            LookupKind::Name | LookupKind::Lot => FieldKey::ItemCode,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            LookupKind::Code => 0,
            LookupKind::Name => 1,
            LookupKind::Lot => 2,
        }
    }

    /// 根據回應決定要寫入哪些欄位。`None` 表示找不到商品。
    pub fn fill_plan(
        &self,
        response: &LookupResponse,
        lot_name_policy: LotNamePolicy,
    ) -> Option<Vec<FieldWrite>> {
        let primary_key = self.primary_key();
        let primary = response.get(primary_key).filter(|v| is_truthy(v))?;

        let mut writes = vec![FieldWrite::new(primary_key, field_text(primary))];

        match self {
            LookupKind::Code | LookupKind::Name => {
                if let Some(lot) = response.get(FieldKey::LotNumber).filter(|v| is_truthy(v)) {
                    writes.push(FieldWrite::new(FieldKey::LotNumber, field_text(lot)));
                }
            }
            LookupKind::Lot => {
                let name = response.get(FieldKey::ItemName);
                match lot_name_policy {
                    LotNamePolicy::Unconditional => {
                        let text = name.map(field_text).unwrap_or_default();
                        writes.push(FieldWrite::new(FieldKey::ItemName, text));
                    }
                    LotNamePolicy::WhenPresent => {
                        if let Some(name) = name.filter(|v| is_truthy(v)) {
                            writes.push(FieldWrite::new(FieldKey::ItemName, field_text(name)));
                        }
                    }
                }
            }
        }

        Some(writes)
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupKind::Code => "lookup-by-code",
            LookupKind::Name => "lookup-by-name",
            LookupKind::Lot => "lookup-by-lot",
        };
        f.write_str(name)
    }
}

/// 批號查詢時 item_name 的寫入方式。
/// `Unconditional` 即使回應缺少 item_name 也會覆寫（寫入空字串）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum LotNamePolicy {
    #[default]
    Unconditional,
    WhenPresent,
}

/// 後端查詢回應。欄位型別不做保證，因此保留原始 JSON 值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub item_code: Option<Value>,
    #[serde(default)]
    pub item_name: Option<Value>,
    #[serde(default)]
    pub lot_number: Option<Value>,
}

impl LookupResponse {
    pub fn get(&self, key: FieldKey) -> Option<&Value> {
        match key {
            FieldKey::ItemCode => self.item_code.as_ref(),
            FieldKey::ItemName => self.item_name.as_ref(),
            FieldKey::LotNumber => self.lot_number.as_ref(),
        }
    }

    /// 只接受 JSON 物件。陣列等其他型別不會依位置填入欄位；
    /// 重複的鍵以最後出現的值為準。
    pub fn from_json(value: Value) -> std::result::Result<Self, String> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Err("expected a JSON object, got null".to_string()),
            Value::Array(_) => return Err("expected a JSON object, got an array".to_string()),
            other => return Err(format!("expected a JSON object, got {}", other)),
        };

        let member = |key: FieldKey| map.get(key.as_str()).filter(|v| !v.is_null()).cloned();
        Ok(Self {
            item_code: member(FieldKey::ItemCode),
            item_name: member(FieldKey::ItemName),
            lot_number: member(FieldKey::LotNumber),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWrite {
    pub field: FieldKey,
    pub value: String,
}

impl FieldWrite {
    pub fn new(field: FieldKey, value: String) -> Self {
        Self { field, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// 觸發欄位為空，沒有發出請求
    Skipped,
    Filled { written: Vec<FieldKey> },
    NotFound,
    /// 同類型的較新查詢已經開始，這次回應被丟棄
    Superseded,
}

impl LookupOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, LookupOutcome::Filled { .. })
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 寫入表單用的文字；字串原樣輸出，其餘純量用 JSON 表示
pub fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
