//! Webhook結果（エンベロープ）の表示

use super::results_card::ResultsCard;
use leptos::prelude::*;
use meal_ai_common::nutrition::format_amount;
use meal_ai_common::{CanonicalResponse, EnvelopeView};

#[component]
pub fn WebhookResults<F>(
    response: CanonicalResponse,
    background: Signal<Option<String>>,
    on_reset: F,
) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    let body = match EnvelopeView::from_response(&response) {
        EnvelopeView::Diagnostic { raw_json } => view! {
            <div>
                <div class="no-data">"No data returned from webhook."</div>
                <pre class="raw-json">{raw_json}</pre>
            </div>
        }
        .into_any(),
        EnvelopeView::Table {
            status,
            items,
            totals,
        } => {
            let rows = items
                .into_iter()
                .map(|item| view! {
                    <tr>
                        <td>{item.name}</td>
                        <td>{item.quantity}</td>
                        <td class="num">{format_amount(item.calories)}</td>
                        <td class="num">{format_amount(item.protein)}</td>
                        <td class="num">{format_amount(item.carbs)}</td>
                        <td class="num">{format_amount(item.fat)}</td>
                    </tr>
                })
                .collect_view();

            let tiles = EnvelopeView::total_tiles(&totals)
                .into_iter()
                .map(|(label, value)| view! {
                    <div class="total-tile">
                        <div class="tile-label">{label}</div>
                        <div class="tile-value">{format_amount(value)}</div>
                    </div>
                })
                .collect_view();

            view! {
                <div class="analysis">
                    <div>
                        <h2>"Meal Analysis"</h2>
                        <p class="status">{format!("Status: {}", status)}</p>
                    </div>

                    <div>
                        <h3>"Items"</h3>
                        <div class="table-wrap">
                            <table class="food-table">
                                <thead>
                                    <tr>
                                        <th>"Name"</th>
                                        <th>"Quantity"</th>
                                        <th class="num">"Calories"</th>
                                        <th class="num">"Protein (g)"</th>
                                        <th class="num">"Carbs (g)"</th>
                                        <th class="num">"Fat (g)"</th>
                                    </tr>
                                </thead>
                                <tbody>{rows}</tbody>
                            </table>
                        </div>
                    </div>

                    <div class="total-grid">{tiles}</div>
                </div>
            }
            .into_any()
        }
    };

    view! {
        <ResultsCard background=background on_reset=on_reset>
            {body}
        </ResultsCard>
    }
}
