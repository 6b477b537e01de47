//! 結果表示の共通枠（背景プレビュー＋戻るボタン）

use leptos::prelude::*;

/// 背景画像のstyle属性
pub fn background_style(url: &str) -> String {
    format!("background-image: url({})", url)
}

#[component]
pub fn ResultsCard<F>(
    background: Signal<Option<String>>,
    on_reset: F,
    children: Children,
) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <div class="results-card">
            {move || background.get().map(|url| view! {
                <div class="results-background" style=background_style(&url) />
                <div class="results-veil" />
            })}
            <div class="results-body">
                <button
                    class="back-button"
                    on:click={
                        let on_reset = on_reset.clone();
                        move |_| on_reset(())
                    }
                >
                    "← "
                    <span>"Analyze Another Meal"</span>
                </button>
                {children()}
            </div>
        </div>
    }
}
