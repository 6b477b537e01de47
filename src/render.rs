//! 結果のテキスト表示

use meal_ai_common::nutrition::format_amount;
use meal_ai_common::{CanonicalResponse, EnvelopeView, FlatNutritionRecord, FlatView};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

fn bar(fill_percent: f64) -> String {
    let filled = ((fill_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// 平坦レコードの表示
pub fn render_flat(record: &FlatNutritionRecord) -> String {
    let view = FlatView::from_record(record);
    let mut out = String::new();

    let _ = writeln!(out, "🍽  {}", view.meal_name);
    let _ = writeln!(out, "   {}% confidence match", format_amount(view.confidence));
    let _ = writeln!(out);
    let _ = writeln!(out, "🔥 Calories: {} kcal", format_amount(view.calories));
    let _ = writeln!(out);

    for b in &view.bars {
        let _ = writeln!(
            out,
            "   {:<8} {:>6}g {}",
            b.nutrient.label(),
            format_amount(b.grams),
            bar(b.fill_percent)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Macronutrient Breakdown");
    for row in &view.breakdown {
        let _ = writeln!(out, "   {:<14} {:>5}", row.nutrient.breakdown_label(), row.display());
    }

    out
}

/// エンベロープの表示（データなしの場合は生JSON）
pub fn render_envelope(response: &CanonicalResponse) -> String {
    let mut out = String::new();

    match EnvelopeView::from_response(response) {
        EnvelopeView::Diagnostic { raw_json } => {
            let _ = writeln!(out, "No data returned from webhook.");
            let _ = writeln!(out, "{}", raw_json);
        }
        EnvelopeView::Table { status, items, totals } => {
            let _ = writeln!(out, "🍽  Meal Analysis");
            let _ = writeln!(out, "   Status: {}", status);
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{:<24} {:<12} {:>9} {:>12} {:>10} {:>8}",
                "Name", "Quantity", "Calories", "Protein (g)", "Carbs (g)", "Fat (g)"
            );
            for item in &items {
                let _ = writeln!(
                    out,
                    "{:<24} {:<12} {:>9} {:>12} {:>10} {:>8}",
                    item.name,
                    item.quantity,
                    format_amount(item.calories),
                    format_amount(item.protein),
                    format_amount(item.carbs),
                    format_amount(item.fat)
                );
            }
            let _ = writeln!(out);
            for (label, value) in EnvelopeView::total_tiles(&totals) {
                let _ = writeln!(out, "   {:<16} {}", label, format_amount(value));
            }
        }
    }

    out
}
