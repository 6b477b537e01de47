//! 栄養解析結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - FlatNutritionRecord: 失敗時のフォールバック／スタブサービスの平坦な結果
//! - AnalysisOutput: Webhookが返す食品リスト＋合計
//! - CanonicalResponse: 正規化済みのエンベロープ列

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::normalizer::is_present;

/// 平坦な栄養レコード（フォールバック表示用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatNutritionRecord {
    pub meal_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// 0〜100
    pub confidence: f64,
}

/// 食品1品目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub quantity: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// 合計値
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Webhookの解析出力
///
/// 欠けたフィールドをゼロで埋めることはしない。デコードできなければ呼び出し側で
/// 生データ表示に切り替える。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub status: String,
    pub food: Vec<FoodItem>,
    pub total: Totals,
}

/// `{ action, response: { output } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub action: String,
    pub response: EnvelopeResponse,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeResponse {
    /// Noneは「形状不明・データなし」
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

impl Envelope {
    pub fn new(action: impl Into<String>, output: Value) -> Self {
        Self {
            action: action.into(),
            response: EnvelopeResponse { output: Some(output) },
        }
    }

    /// 形状不明のペイロードを示すエンベロープ
    pub fn unknown() -> Self {
        Self {
            action: "unknown".to_string(),
            response: EnvelopeResponse { output: None },
        }
    }
}

/// 正規化済みレスポンスの要素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeEntry {
    /// 正規化で組み立てたエンベロープ
    Lifted(Envelope),
    /// 入力配列の要素をそのまま通したもの
    Verbatim(Value),
}

impl EnvelopeEntry {
    pub fn action(&self) -> Option<&str> {
        match self {
            EnvelopeEntry::Lifted(envelope) => Some(envelope.action.as_str()),
            EnvelopeEntry::Verbatim(value) => value.get("action").and_then(Value::as_str),
        }
    }

    /// `response.output` が存在すれば返す
    pub fn output(&self) -> Option<&Value> {
        let output = match self {
            EnvelopeEntry::Lifted(envelope) => envelope.response.output.as_ref(),
            EnvelopeEntry::Verbatim(value) => value.get("response").and_then(|r| r.get("output")),
        };
        output.filter(|v| is_present(v))
    }
}

/// 正規化済みレスポンス（エンベロープ列）
///
/// 表示側が読むのは先頭要素のみ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalResponse(Vec<EnvelopeEntry>);

impl CanonicalResponse {
    pub fn new(entries: Vec<EnvelopeEntry>) -> Self {
        Self(entries)
    }

    pub fn single(envelope: Envelope) -> Self {
        Self(vec![EnvelopeEntry::Lifted(envelope)])
    }

    pub fn entries(&self) -> &[EnvelopeEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&EnvelopeEntry> {
        self.0.first()
    }

    pub fn first_output(&self) -> Option<&Value> {
        self.first().and_then(EnvelopeEntry::output)
    }

    /// 先頭要素の出力を型付きでデコード
    pub fn first_analysis(&self) -> Option<AnalysisOutput> {
        self.first_output()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// 表示可能なデータがない（先頭の出力が欠落）
    pub fn is_no_data(&self) -> bool {
        self.first_output().is_none()
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "[]".to_string())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "quantity must be a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_record_serialize() {
        let record = FlatNutritionRecord {
            meal_name: "Avocado Toast".to_string(),
            calories: 350.0,
            protein: 12.0,
            carbs: 38.0,
            fat: 18.0,
            confidence: 90.0,
        };

        let json = serde_json::to_string(&record).expect("シリアライズ失敗");
        assert!(json.contains("\"mealName\":\"Avocado Toast\""));
        assert!(json.contains("\"confidence\":90"));
    }

    #[test]
    fn test_flat_record_deserialize() {
        let json = r#"{"mealName":"Turkey Sandwich","calories":450,"protein":28,"carbs":52,"fat":14,"confidence":83}"#;
        let record: FlatNutritionRecord = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(record.meal_name, "Turkey Sandwich");
        assert_eq!(record.calories, 450.0);
        assert_eq!(record.confidence, 83.0);
    }

    #[test]
    fn test_analysis_output_deserialize() {
        let value = json!({
            "status": "success",
            "food": [{"name": "Rice", "quantity": "1 cup", "calories": 206, "protein": 4.3, "carbs": 45, "fat": 0.4}],
            "total": {"calories": 206, "protein": 4.3, "carbs": 45, "fat": 0.4}
        });

        let output: AnalysisOutput = serde_json::from_value(value).expect("デシリアライズ失敗");
        assert_eq!(output.status, "success");
        assert_eq!(output.food.len(), 1);
        assert_eq!(output.food[0].quantity, "1 cup");
        assert_eq!(output.total.protein, 4.3);
    }

    #[test]
    fn test_analysis_output_missing_total_fails() {
        // ゼロ埋めせずにデコード失敗とする
        let value = json!({"status": "success", "food": []});
        assert!(serde_json::from_value::<AnalysisOutput>(value).is_err());
    }

    #[test]
    fn test_food_item_numeric_quantity() {
        let value = json!({"name": "Egg", "quantity": 2, "calories": 140, "protein": 12, "carbs": 1, "fat": 10});
        let item: FoodItem = serde_json::from_value(value).expect("デシリアライズ失敗");
        assert_eq!(item.quantity, "2");
    }

    #[test]
    fn test_unknown_envelope_serializes_without_output() {
        let response = CanonicalResponse::single(Envelope::unknown());
        let json = serde_json::to_string(&response).expect("シリアライズ失敗");
        assert_eq!(json, r#"[{"action":"unknown","response":{}}]"#);
        assert!(response.is_no_data());
    }

    #[test]
    fn test_verbatim_entry_output() {
        let entry = EnvelopeEntry::Verbatim(json!({"response": {"output": {"status": "ok"}}}));
        assert_eq!(entry.action(), None);
        assert_eq!(entry.output(), Some(&json!({"status": "ok"})));

        let empty = EnvelopeEntry::Verbatim(json!({"response": {"output": null}}));
        assert_eq!(empty.output(), None);
    }

    #[test]
    fn test_first_analysis_malformed_output() {
        let response = CanonicalResponse::single(Envelope::new("parse", json!("plain text")));
        assert!(!response.is_no_data());
        assert!(response.first_analysis().is_none());
    }
}
