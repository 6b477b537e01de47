//! Webhookレスポンスの正規化
//!
//! 外部ワークフローが返すJSONは形状が固定されていないため、
//! 次の優先順位で判定して `[{ action, response: { output } }]` に揃える:
//! 1. 配列で先頭要素が `response.output` か `output` を持つ
//! 2. 単一オブジェクトで `response.output` を持つ
//! 3. 単一オブジェクトでルートに `output` を持つ
//! 4. ルートに `food` / `total` / `status` が揃っている
//! 5. それ以外（`action: "unknown"`、出力なし）

use serde_json::{json, Map, Value};

use crate::types::{CanonicalResponse, Envelope, EnvelopeEntry};

const DEFAULT_ACTION: &str = "parse";

/// ペイロードの形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    EnvelopeList,
    SingleEnvelope,
    RootOutput,
    RootFields,
    Unknown,
}

/// 値が「存在する」か（null / false / 0 / 空文字は存在しない扱い）
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn present<'a>(value: Option<&'a Value>) -> Option<&'a Value> {
    value.filter(|v| is_present(v))
}

fn nested_output(value: &Value) -> Option<&Value> {
    present(value.get("response").and_then(|r| r.get("output")))
}

fn root_output(value: &Value) -> Option<&Value> {
    present(value.get("output"))
}

/// `action` が欠落またはnullなら "parse"
fn action_or_default(value: &Value) -> String {
    match value.get("action") {
        None | Some(Value::Null) => DEFAULT_ACTION.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// 形状を判定
pub fn classify(payload: &Value) -> PayloadShape {
    if let Some(items) = payload.as_array() {
        return match items.first() {
            Some(first) if nested_output(first).is_some() || root_output(first).is_some() => {
                PayloadShape::EnvelopeList
            }
            _ => PayloadShape::Unknown,
        };
    }

    let Some(map) = payload.as_object() else {
        return PayloadShape::Unknown;
    };

    if nested_output(payload).is_some() {
        PayloadShape::SingleEnvelope
    } else if root_output(payload).is_some() {
        PayloadShape::RootOutput
    } else if has_root_fields(map) {
        PayloadShape::RootFields
    } else {
        PayloadShape::Unknown
    }
}

fn has_root_fields(map: &Map<String, Value>) -> bool {
    ["food", "total", "status"]
        .iter()
        .all(|key| present(map.get(*key)).is_some())
}

/// ペイロードを正規化する。失敗はせず、不明な形状は「データなし」として返す。
pub fn normalize(payload: &Value) -> CanonicalResponse {
    match classify(payload) {
        PayloadShape::EnvelopeList => {
            let items = payload.as_array().map(Vec::as_slice).unwrap_or_default();
            CanonicalResponse::new(items.iter().map(lift_list_item).collect())
        }
        PayloadShape::SingleEnvelope => {
            let output = nested_output(payload).cloned().unwrap_or(Value::Null);
            CanonicalResponse::single(Envelope::new(action_or_default(payload), output))
        }
        PayloadShape::RootOutput => {
            let output = root_output(payload).cloned().unwrap_or(Value::Null);
            CanonicalResponse::single(Envelope::new(DEFAULT_ACTION, output))
        }
        PayloadShape::RootFields => {
            let output = json!({
                "status": payload["status"],
                "food": payload["food"],
                "total": payload["total"],
            });
            CanonicalResponse::single(Envelope::new(DEFAULT_ACTION, output))
        }
        PayloadShape::Unknown => CanonicalResponse::single(Envelope::unknown()),
    }
}

fn lift_list_item(item: &Value) -> EnvelopeEntry {
    if nested_output(item).is_some() {
        return EnvelopeEntry::Verbatim(item.clone());
    }
    match root_output(item) {
        Some(output) => EnvelopeEntry::Lifted(Envelope::new(action_or_default(item), output.clone())),
        None => EnvelopeEntry::Verbatim(item.clone()),
    }
}
