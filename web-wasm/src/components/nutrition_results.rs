//! 平坦レコードの結果表示

use super::results_card::ResultsCard;
use leptos::prelude::*;
use meal_ai_common::nutrition::format_amount;
use meal_ai_common::{FlatNutritionRecord, FlatView};

/// `notice` は解析失敗時のメッセージ（フォールバック表示の理由）
#[component]
pub fn NutritionResults<F>(
    record: FlatNutritionRecord,
    notice: Signal<Option<String>>,
    background: Signal<Option<String>>,
    on_reset: F,
) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    let view_model = FlatView::from_record(&record);

    let bars = view_model
        .bars
        .into_iter()
        .map(|bar| {
            let class = format!("macro-card macro-{}", bar.nutrient.css_class());
            view! {
                <div class=class>
                    <h3>{bar.nutrient.label()}</h3>
                    <p class="macro-amount">{format!("{}g", format_amount(bar.grams))}</p>
                    <div class="macro-track">
                        <div class="macro-fill" style=format!("width: {}%", bar.fill_percent) />
                    </div>
                </div>
            }
        })
        .collect_view();

    let breakdown = view_model
        .breakdown
        .into_iter()
        .map(|row| view! {
            <div class="breakdown-row">
                <span>{row.nutrient.breakdown_label()}</span>
                <span class="breakdown-value">{row.display()}</span>
            </div>
        })
        .collect_view();

    view! {
        <ResultsCard background=background on_reset=on_reset>
            {move || notice.get().map(|message| view! { <div class="error-banner">{message}</div> })}

            <div class="meal-heading">
                <h2>{view_model.meal_name}</h2>
                <p class="confidence">
                    <span class="dot" />
                    {format!("{}% confidence match", format_amount(view_model.confidence))}
                </p>
            </div>

            <div class="calories-card">
                <h3>"🔥 Calories"</h3>
                <p class="calories-amount">{format_amount(view_model.calories)}</p>
                <p class="unit">"kcal"</p>
            </div>

            <div class="macro-grid">{bars}</div>

            <div class="breakdown">
                <h3>"Macronutrient Breakdown"</h3>
                {breakdown}
            </div>
        </ResultsCard>
    }
}
