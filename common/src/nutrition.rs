//! 結果表示用のビューモデル
//!
//! - フォールバックレコードとスタブメニュー
//! - マクロ栄養素バーの充填率、エネルギー比率
//! - 平坦レコード表示 / エンベロープ表示のモデル

use crate::types::{AnalysisOutput, CanonicalResponse, FlatNutritionRecord, FoodItem, Totals};

/// バー表示の基準量（g）
pub const PROTEIN_REFERENCE_G: f64 = 50.0;
pub const CARBS_REFERENCE_G: f64 = 50.0;
pub const FAT_REFERENCE_G: f64 = 30.0;

/// エネルギー換算係数（kcal/g）
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
pub const CARBS_KCAL_PER_G: f64 = 4.0;
pub const FAT_KCAL_PER_G: f64 = 9.0;

/// スタブサービスのメニュー項目（kcal・gは整数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl MenuItem {
    pub fn to_record(&self, confidence: f64) -> FlatNutritionRecord {
        FlatNutritionRecord {
            meal_name: self.name.to_string(),
            calories: f64::from(self.calories),
            protein: f64::from(self.protein),
            carbs: f64::from(self.carbs),
            fat: f64::from(self.fat),
            confidence,
        }
    }
}

pub const STUB_MENU: [MenuItem; 8] = [
    MenuItem { name: "Grilled Chicken Salad", calories: 425, protein: 38, carbs: 24, fat: 18 },
    MenuItem { name: "Salmon with Quinoa", calories: 520, protein: 42, carbs: 45, fat: 18 },
    MenuItem { name: "Vegetarian Buddha Bowl", calories: 380, protein: 15, carbs: 58, fat: 12 },
    MenuItem { name: "Turkey Sandwich", calories: 450, protein: 28, carbs: 52, fat: 14 },
    MenuItem { name: "Greek Yogurt Parfait", calories: 320, protein: 20, carbs: 42, fat: 8 },
    MenuItem { name: "Steak and Vegetables", calories: 580, protein: 48, carbs: 22, fat: 32 },
    MenuItem { name: "Pasta Primavera", calories: 480, protein: 16, carbs: 68, fat: 16 },
    MenuItem { name: "Avocado Toast", calories: 350, protein: 12, carbs: 38, fat: 18 },
];

/// スタブサービスの信頼度の範囲（両端含む）
pub const STUB_CONFIDENCE_RANGE: std::ops::RangeInclusive<u32> = 80..=94;

/// 解析失敗時に表示する固定レコード
pub fn fallback_record() -> FlatNutritionRecord {
    STUB_MENU[0].to_record(85.0)
}

/// バーの充填率（0〜100にクランプ）
pub fn bar_fill_percent(grams: f64, reference: f64) -> f64 {
    if reference <= 0.0 || !grams.is_finite() {
        return 0.0;
    }
    (grams / reference * 100.0).clamp(0.0, 100.0)
}

/// マクロ栄養素のエネルギー比率（%、四捨五入）
///
/// カロリーが0以下ならNone。各比率の合計は丸めにより100にならないことがある。
pub fn macro_energy_percent(grams: f64, kcal_per_gram: f64, calories: f64) -> Option<i64> {
    if calories <= 0.0 || !calories.is_finite() {
        return None;
    }
    let percent = grams * kcal_per_gram / calories * 100.0;
    // 0.5は切り上げ
    Some((percent + 0.5).floor() as i64)
}

/// 数値表示（整数ならそのまま、小数は最短表記）
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// マクロ栄養素の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Macro {
    Protein,
    Carbs,
    Fat,
}

impl Macro {
    pub const ALL: [Macro; 3] = [Macro::Protein, Macro::Carbs, Macro::Fat];

    pub fn label(&self) -> &'static str {
        match self {
            Macro::Protein => "Protein",
            Macro::Carbs => "Carbs",
            Macro::Fat => "Fat",
        }
    }

    /// 内訳表示のラベル
    pub fn breakdown_label(&self) -> &'static str {
        match self {
            Macro::Protein => "Protein",
            Macro::Carbs => "Carbohydrates",
            Macro::Fat => "Fat",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Macro::Protein => "protein",
            Macro::Carbs => "carbs",
            Macro::Fat => "fat",
        }
    }

    pub fn reference_grams(&self) -> f64 {
        match self {
            Macro::Protein => PROTEIN_REFERENCE_G,
            Macro::Carbs => CARBS_REFERENCE_G,
            Macro::Fat => FAT_REFERENCE_G,
        }
    }

    pub fn kcal_per_gram(&self) -> f64 {
        match self {
            Macro::Protein => PROTEIN_KCAL_PER_G,
            Macro::Carbs => CARBS_KCAL_PER_G,
            Macro::Fat => FAT_KCAL_PER_G,
        }
    }

    fn grams_of(&self, record: &FlatNutritionRecord) -> f64 {
        match self {
            Macro::Protein => record.protein,
            Macro::Carbs => record.carbs,
            Macro::Fat => record.fat,
        }
    }
}

/// マクロ栄養素バー
#[derive(Debug, Clone, PartialEq)]
pub struct MacroBar {
    pub nutrient: Macro,
    pub grams: f64,
    pub fill_percent: f64,
}

/// エネルギー比率の1行
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub nutrient: Macro,
    pub percent: Option<i64>,
}

impl BreakdownRow {
    pub fn display(&self) -> String {
        match self.percent {
            Some(p) => format!("{}%", p),
            None => "-".to_string(),
        }
    }
}

/// 平坦レコードの表示モデル
#[derive(Debug, Clone, PartialEq)]
pub struct FlatView {
    pub meal_name: String,
    pub confidence: f64,
    pub calories: f64,
    pub bars: Vec<MacroBar>,
    pub breakdown: Vec<BreakdownRow>,
}

impl FlatView {
    pub fn from_record(record: &FlatNutritionRecord) -> Self {
        let bars = Macro::ALL
            .iter()
            .map(|m| {
                let grams = m.grams_of(record);
                MacroBar {
                    nutrient: *m,
                    grams,
                    fill_percent: bar_fill_percent(grams, m.reference_grams()),
                }
            })
            .collect();

        let breakdown = Macro::ALL
            .iter()
            .map(|m| BreakdownRow {
                nutrient: *m,
                percent: macro_energy_percent(m.grams_of(record), m.kcal_per_gram(), record.calories),
            })
            .collect();

        Self {
            meal_name: record.meal_name.clone(),
            confidence: record.confidence,
            calories: record.calories,
            bars,
            breakdown,
        }
    }
}

/// エンベロープの表示モデル
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeView {
    /// 食品テーブル＋合計タイル
    Table {
        status: String,
        items: Vec<FoodItem>,
        totals: Totals,
    },
    /// データなし：正規化済みペイロードをそのまま表示
    Diagnostic { raw_json: String },
}

impl EnvelopeView {
    pub fn from_response(response: &CanonicalResponse) -> Self {
        match response.first_analysis() {
            Some(AnalysisOutput { status, food, total }) => EnvelopeView::Table {
                status,
                items: food,
                totals: total,
            },
            None => EnvelopeView::Diagnostic {
                raw_json: response.to_pretty_json(),
            },
        }
    }

    /// 合計タイル（ラベル, 値）
    pub fn total_tiles(totals: &Totals) -> [(&'static str, f64); 4] {
        [
            ("Total Calories", totals.calories),
            ("Protein (g)", totals.protein),
            ("Carbs (g)", totals.carbs),
            ("Fat (g)", totals.fat),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use crate::types::Envelope;
    use serde_json::json;

    #[test]
    fn test_fallback_record() {
        let record = fallback_record();
        assert_eq!(record.meal_name, "Grilled Chicken Salad");
        assert_eq!(record.calories, 425.0);
        assert_eq!(record.protein, 38.0);
        assert_eq!(record.carbs, 24.0);
        assert_eq!(record.fat, 18.0);
        assert_eq!(record.confidence, 85.0);
    }

    #[test]
    fn test_macro_percent_fallback_values() {
        assert_eq!(macro_energy_percent(38.0, PROTEIN_KCAL_PER_G, 425.0), Some(36));
        assert_eq!(macro_energy_percent(24.0, CARBS_KCAL_PER_G, 425.0), Some(23));
        assert_eq!(macro_energy_percent(18.0, FAT_KCAL_PER_G, 425.0), Some(38));
    }

    #[test]
    fn test_macro_percent_zero_calories() {
        assert_eq!(macro_energy_percent(10.0, PROTEIN_KCAL_PER_G, 0.0), None);
        assert_eq!(macro_energy_percent(10.0, PROTEIN_KCAL_PER_G, -5.0), None);
    }

    #[test]
    fn test_macro_percent_half_rounds_up() {
        // 1 * 4 / 8 * 100 = 50.0, 1 * 4 / 32 * 100 = 12.5
        assert_eq!(macro_energy_percent(1.0, 4.0, 8.0), Some(50));
        assert_eq!(macro_energy_percent(1.0, 4.0, 32.0), Some(13));
    }

    #[test]
    fn test_bar_fill_clamps() {
        assert_eq!(bar_fill_percent(25.0, PROTEIN_REFERENCE_G), 50.0);
        assert_eq!(bar_fill_percent(60.0, PROTEIN_REFERENCE_G), 100.0);
        assert_eq!(bar_fill_percent(45.0, FAT_REFERENCE_G), 100.0);
        assert_eq!(bar_fill_percent(-3.0, FAT_REFERENCE_G), 0.0);
        assert_eq!(bar_fill_percent(f64::NAN, FAT_REFERENCE_G), 0.0);
    }

    #[test]
    fn test_flat_view_keeps_true_grams_beyond_reference() {
        let record = STUB_MENU[5].to_record(88.0); // Steak and Vegetables: fat 32g
        let view = FlatView::from_record(&record);

        let fat = view.bars.iter().find(|b| b.nutrient == Macro::Fat).expect("fatバーなし");
        assert_eq!(fat.grams, 32.0);
        assert_eq!(fat.fill_percent, 100.0);
    }

    #[test]
    fn test_flat_view_breakdown() {
        let view = FlatView::from_record(&fallback_record());
        let shown: Vec<String> = view.breakdown.iter().map(BreakdownRow::display).collect();
        assert_eq!(shown, vec!["36%", "23%", "38%"]);
        assert_eq!(view.breakdown[1].nutrient.breakdown_label(), "Carbohydrates");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(95.0), "95");
        assert_eq!(format_amount(12.5), "12.5");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(-3.0), "-3");
    }

    #[test]
    fn test_envelope_view_table() {
        let payload = json!({
            "status": "success",
            "food": [{"name": "Apple", "quantity": "1", "calories": 95, "protein": 0, "carbs": 25, "fat": 0}],
            "total": {"calories": 95, "protein": 0, "carbs": 25, "fat": 0}
        });
        match EnvelopeView::from_response(&normalize(&payload)) {
            EnvelopeView::Table { status, items, totals } => {
                assert_eq!(status, "success");
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].name, "Apple");
                assert_eq!(totals.carbs, 25.0);
            }
            other => panic!("テーブル表示になっていない: {:?}", other),
        }
    }

    #[test]
    fn test_envelope_view_diagnostic_for_unknown() {
        let view = EnvelopeView::from_response(&normalize(&json!({"unexpected": true})));
        match view {
            EnvelopeView::Diagnostic { raw_json } => assert!(raw_json.contains("\"unknown\"")),
            other => panic!("診断表示になっていない: {:?}", other),
        }
    }

    #[test]
    fn test_envelope_view_diagnostic_for_malformed_output() {
        let response = CanonicalResponse::single(Envelope::new("parse", json!({"status": "success"})));
        assert!(matches!(
            EnvelopeView::from_response(&response),
            EnvelopeView::Diagnostic { .. }
        ));
    }

    #[test]
    fn test_total_tiles_order() {
        let totals = Totals { calories: 95.0, protein: 0.0, carbs: 25.0, fat: 0.0 };
        let tiles = EnvelopeView::total_tiles(&totals);
        assert_eq!(tiles[0], ("Total Calories", 95.0));
        assert_eq!(tiles[2], ("Carbs (g)", 25.0));
    }
}
